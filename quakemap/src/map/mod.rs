//! [`Map`] owns the view, the layers and the layer control, and starts loading of the feeds.

use std::future::Future;
use std::sync::Arc;

use log::{info, warn};
use quakemap_types::{Point2, Size};

use crate::config::MapConfig;
use crate::control::{LayerControl, EARTHQUAKES_OVERLAY};
use crate::depth::DepthClassifier;
use crate::error::QuakeMapError;
use crate::feed::{parse_earthquake_feed, parse_plate_feed, provider_for, FeedProvider};
use crate::layer::{
    build_earthquake_layer, build_plate_layer, EarthquakeLayer, LayerGroup, PlateLayer,
};
use crate::legend::Legend;
use crate::messenger::Messenger;
use crate::platform::PlatformService;
use crate::popup::Popup;
use crate::render::Canvas;
use crate::view::MapView;

mod builder;
mod layer_collection;

pub use builder::MapBuilder;
pub use layer_collection::LayerCollection;

/// Earthquake map: base layers, the earthquake and plate overlays, the legend and the current
/// view.
///
/// The overlays start empty. [`Map::load_feeds`] fetches both feeds in the background and
/// attaches each overlay as soon as its feed is decoded.
pub struct Map {
    view: MapView,
    control: LayerControl,
    legend: Legend,
    classifier: DepthClassifier,
    earthquakes: LayerGroup<EarthquakeLayer>,
    plates: LayerGroup<PlateLayer>,
    messenger: Option<Arc<dyn Messenger>>,
}

impl std::fmt::Debug for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("view", &self.view)
            .field("control", &self.control)
            .field("earthquakes", &self.earthquakes)
            .field("plates", &self.plates)
            .finish()
    }
}

impl Map {
    /// Current view of the map.
    pub fn view(&self) -> &MapView {
        &self.view
    }

    /// Replaces the view and requests a redraw.
    pub fn set_view(&mut self, view: MapView) {
        self.view = view;
        self.redraw();
    }

    /// Updates the screen size of the view.
    pub fn set_size(&mut self, size: Size) {
        if self.view.size() != size {
            self.set_view(self.view.with_size(size));
        }
    }

    /// Layer control of the map.
    pub fn control(&self) -> &LayerControl {
        &self.control
    }

    /// Mutable access to the layer control.
    pub fn control_mut(&mut self) -> &mut LayerControl {
        &mut self.control
    }

    /// Depth legend.
    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Classifier coloring the earthquake markers.
    pub fn classifier(&self) -> &DepthClassifier {
        &self.classifier
    }

    /// Group the earthquake layer is attached to.
    pub fn earthquakes(&self) -> &LayerGroup<EarthquakeLayer> {
        &self.earthquakes
    }

    /// Group the plate boundary layer is attached to.
    pub fn plates(&self) -> &LayerGroup<PlateLayer> {
        &self.plates
    }

    /// Sets the messenger used to request redraws.
    pub fn set_messenger(&mut self, messenger: Arc<dyn Messenger>) {
        self.control.set_messenger(messenger.clone());
        self.messenger = Some(messenger);
    }

    /// Requests the map to be redrawn.
    pub fn redraw(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }
    }

    /// Starts loading data required for the current view.
    pub fn load_layers(&self) {
        for layer in self.control.visible_layers() {
            layer.prepare(&self.view);
        }
    }

    /// Renders visible layers to the canvas.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        for layer in self.control.visible_layers() {
            layer.render(&self.view, canvas);
        }
    }

    /// Popups of the earthquake markers under the screen point, topmost first. Empty if the
    /// earthquake overlay is hidden or not loaded yet.
    pub fn popups_at(&self, point: Point2) -> Vec<Popup> {
        let overlay_index = self
            .control
            .overlay_names()
            .iter()
            .position(|name| *name == EARTHQUAKES_OVERLAY);
        if !overlay_index.is_some_and(|index| self.control.is_overlay_visible(index)) {
            return vec![];
        }

        match &*self.earthquakes.read() {
            Some(layer) => layer
                .markers_at(point, &self.view)
                .into_iter()
                .map(|marker| marker.popup().clone())
                .collect(),
            None => vec![],
        }
    }

    /// Fetches both feeds concurrently in background tasks.
    ///
    /// Must be called from within a tokio runtime. Each task attaches its overlay when done and
    /// requests a redraw. A failed task only logs a warning and leaves its overlay empty.
    pub fn load_feeds(
        &self,
        earthquake_provider: Box<dyn FeedProvider>,
        plates_provider: Box<dyn FeedProvider>,
    ) {
        crate::async_runtime::spawn(self.earthquake_task(earthquake_provider));
        crate::async_runtime::spawn(self.plates_task(plates_provider));
    }

    /// Fetches the feeds given in the configuration. See [`Map::load_feeds`].
    pub fn load_configured_feeds(&self, config: &MapConfig, platform_service: &PlatformService) {
        self.load_feeds(
            provider_for(&config.earthquake_feed, platform_service),
            provider_for(&config.plates_feed, platform_service),
        );
    }

    fn earthquake_task(
        &self,
        provider: Box<dyn FeedProvider>,
    ) -> impl Future<Output = ()> + Send + 'static {
        let group = self.earthquakes.clone();
        let classifier = self.classifier.clone();
        feed_task(
            "earthquake",
            async move { load_earthquakes(&*provider, &group, &classifier).await },
            self.messenger.clone(),
        )
    }

    fn plates_task(
        &self,
        provider: Box<dyn FeedProvider>,
    ) -> impl Future<Output = ()> + Send + 'static {
        let group = self.plates.clone();
        feed_task(
            "tectonic plates",
            async move { load_plates(&*provider, &group).await },
            self.messenger.clone(),
        )
    }
}

async fn feed_task(
    name: &'static str,
    load: impl Future<Output = Result<usize, QuakeMapError>>,
    messenger: Option<Arc<dyn Messenger>>,
) {
    match load.await {
        Ok(count) => {
            info!("Attached {name} layer with {count} items");
            if let Some(messenger) = messenger {
                messenger.request_redraw();
            }
        }
        Err(err) => warn!("Failed to load {name} feed, the layer stays empty: {err}"),
    }
}

/// Loads the earthquake feed, builds one marker per event and attaches the layer to the group.
///
/// Returns the number of markers. On error the group is left untouched.
pub async fn load_earthquakes(
    provider: &dyn FeedProvider,
    group: &LayerGroup<EarthquakeLayer>,
    classifier: &DepthClassifier,
) -> Result<usize, QuakeMapError> {
    info!("Loading earthquakes from {}", provider.describe());
    let bytes = provider.load().await?;
    let features = parse_earthquake_feed(&bytes)?;
    let layer = build_earthquake_layer(&features, classifier);
    let count = layer.len();
    group.attach(layer);
    Ok(count)
}

/// Loads the plate boundary feed and attaches the boundary layer to the group.
///
/// Returns the number of boundary lines. On error the group is left untouched.
pub async fn load_plates(
    provider: &dyn FeedProvider,
    group: &LayerGroup<PlateLayer>,
) -> Result<usize, QuakeMapError> {
    info!("Loading tectonic plates from {}", provider.describe());
    let bytes = provider.load().await?;
    let boundaries = parse_plate_feed(&bytes)?;
    let count = boundaries.len();
    group.attach(build_plate_layer(boundaries));
    Ok(count)
}
