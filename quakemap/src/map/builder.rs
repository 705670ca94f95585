use std::sync::Arc;

use bytes::Bytes;
use log::warn;
use quakemap_types::{GeoPoint2d, Size};

use super::{LayerCollection, Map};
use crate::config::{MapConfig, DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::control::{LayerControl, EARTHQUAKES_OVERLAY, PLATES_OVERLAY};
use crate::depth::{BelowRangePolicy, DepthClassifier};
use crate::error::QuakeMapError;
use crate::layer::raster_tile_layer::{
    BaseLayerKind, FileCacheController, PersistentCacheController, RestTileProvider,
};
use crate::layer::{Layer, LayerGroup, RasterTileLayer};
use crate::legend::Legend;
use crate::messenger::Messenger;
use crate::platform::PlatformService;
use crate::view::MapView;

/// Convenience type to initialize a [Map].
///
/// ```
/// use quakemap::MapBuilder;
/// use quakemap_types::latlon;
/// # use approx::assert_relative_eq;
///
/// let map = MapBuilder::default()
///     .with_position(latlon!(35.0, 139.0))
///     .with_zoom(5.0)
///     .build();
///
/// assert_relative_eq!(map.view().zoom(), 5.0, epsilon = 1e-9);
/// assert_eq!(map.control().overlay_names(), ["Earthquakes", "Tectonic Plates"]);
/// ```
#[derive(Default)]
pub struct MapBuilder {
    position: Option<GeoPoint2d>,
    zoom: Option<f64>,
    size: Option<Size>,
    base_layers: LayerCollection,
    selected_base: usize,
    below_range: BelowRangePolicy,
    messenger: Option<Arc<dyn Messenger>>,
}

impl MapBuilder {
    /// Builder with the base maps and settings of the configuration.
    ///
    /// The three base maps are added in the order of [`BaseLayerKind::ALL`]. If the configuration
    /// has a tile cache folder, downloaded tiles are stored there.
    pub fn from_config(
        config: &MapConfig,
        platform_service: &PlatformService,
    ) -> Result<Self, QuakeMapError> {
        let cache = config
            .tile_cache_dir
            .as_ref()
            .map(FileCacheController::new)
            .transpose()?;

        let mut builder = Self::default()
            .with_position(config.center)
            .with_zoom(config.zoom)
            .with_below_range(config.below_range)
            .with_selected_base(config.base_layer.index());

        for kind in BaseLayerKind::ALL {
            builder = builder.with_base_map(kind, platform_service, cache.clone());
        }

        Ok(builder)
    }

    /// Sets the center point of the map.
    ///
    /// Defaults to [`DEFAULT_CENTER`].
    pub fn with_position(mut self, position: GeoPoint2d) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the center point of the map to the given coordinates.
    pub fn with_latlon(self, lat: f64, lon: f64) -> Self {
        self.with_position(GeoPoint2d::latlon(lat, lon))
    }

    /// Sets the zoom level of the map. Defaults to [`DEFAULT_ZOOM`].
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Sets the screen size of the map view.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Adds a base layer. Base layers are listed in the layer control in the order they were
    /// added.
    pub fn with_base_layer(mut self, name: impl Into<String>, layer: impl Layer + 'static) -> Self {
        self.base_layers.push(name, layer);
        self
    }

    /// Adds one of the standard base maps loading tiles over HTTP.
    pub fn with_base_map(
        self,
        kind: BaseLayerKind,
        platform_service: &PlatformService,
        cache: Option<FileCacheController>,
    ) -> Self {
        let source = kind.source();
        let cache = cache.map(|c| Box::new(c) as Box<dyn PersistentCacheController<str, Bytes>>);
        let provider = RestTileProvider::new(source.clone(), platform_service.clone(), cache);
        let name = source.name().to_owned();
        self.with_base_layer(name, RasterTileLayer::new(source, provider))
    }

    /// Index of the base layer shown first. Defaults to the first added one.
    pub fn with_selected_base(mut self, index: usize) -> Self {
        self.selected_base = index;
        self
    }

    /// Sets how depths below the first depth band are colored.
    pub fn with_below_range(mut self, below_range: BelowRangePolicy) -> Self {
        self.below_range = below_range;
        self
    }

    /// Sets the messenger of the map and its layers.
    pub fn with_messenger(mut self, messenger: Arc<dyn Messenger>) -> Self {
        self.messenger = Some(messenger);
        self
    }

    /// Consumes the builder and constructs the [Map].
    pub fn build(self) -> Map {
        let mut view = MapView::from_zoom(
            &self.position.unwrap_or(DEFAULT_CENTER),
            self.zoom.unwrap_or(DEFAULT_ZOOM),
        );
        if let Some(size) = self.size {
            view = view.with_size(size);
        }

        let classifier = DepthClassifier::new(self.below_range);
        let legend = Legend::from_bands(classifier.bands());

        let earthquakes = LayerGroup::new();
        let plates = LayerGroup::new();
        let mut overlays = LayerCollection::default();
        overlays.push(EARTHQUAKES_OVERLAY, earthquakes.clone());
        overlays.push(PLATES_OVERLAY, plates.clone());

        let mut control = LayerControl::new(self.base_layers, overlays);
        if !control.base_layers().is_empty() && !control.select_base(self.selected_base) {
            warn!(
                "Base layer {} does not exist, showing the first one",
                self.selected_base
            );
        }

        let mut map = Map {
            view,
            control,
            legend,
            classifier,
            earthquakes,
            plates,
            messenger: None,
        };

        if let Some(messenger) = self.messenger {
            map.set_messenger(messenger);
        }

        map
    }
}
