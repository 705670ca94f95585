//! Raster tile layer and its providers

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;

use quakemap_types::{Point2, Rect};
use quick_cache::sync::Cache;

use super::Layer;
use crate::decoded_image::DecodedImage;
use crate::layer::attribution::Attribution;
use crate::messenger::Messenger;
use crate::render::Canvas;
use crate::tile_schema::{TileIndex, TileSchema, WrappingTileIndex};
use crate::view::MapView;

mod file_cache;
pub use file_cache::{FileCacheController, PersistentCacheController};

mod provider;
pub use provider::{RestTileProvider, TileProvider};

mod source;
pub use source::{BaseLayerKind, TileSource};

const TILE_CACHE_CAPACITY: usize = 5000;

/// Raster tile layers load prerendered tile sets using a [tile provider](TileProvider) and render
/// them to the map.
pub struct RasterTileLayer {
    source: TileSource,
    tile_provider: Arc<dyn TileProvider>,
    tile_schema: TileSchema,
    tiles: Arc<Cache<TileIndex, TileState>>,
    messenger: Option<Arc<dyn Messenger>>,
}

impl std::fmt::Debug for RasterTileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterTileLayer")
            .field("source", &self.source.name())
            .field("tile_schema", &self.tile_schema)
            .finish()
    }
}

#[derive(Clone)]
enum TileState {
    Loading,
    Loaded(Arc<DecodedImage>),
    Error,
}

impl RasterTileLayer {
    /// Creates a new layer.
    pub fn new(source: TileSource, tile_provider: impl TileProvider + 'static) -> Self {
        Self {
            tile_schema: TileSchema::web_mercator(source.max_zoom()),
            source,
            tile_provider: Arc::new(tile_provider),
            tiles: Arc::new(Cache::new(TILE_CACHE_CAPACITY)),
            messenger: None,
        }
    }

    /// Tile source of the layer.
    pub fn source(&self) -> &TileSource {
        &self.source
    }

    /// Returns tile schema of the layer.
    pub fn tile_schema(&self) -> &TileSchema {
        &self.tile_schema
    }

    fn tile_key(&self, index: TileIndex) -> String {
        format!("{}/{}/{}/{}", self.source.name(), index.z, index.x, index.y)
    }

    fn loaded_image(&self, index: &TileIndex) -> Option<Arc<DecodedImage>> {
        match self.tiles.get(index) {
            Some(TileState::Loaded(image)) => Some(image),
            _ => None,
        }
    }

    /// Returns the tiles to draw for the view, lower z-levels first.
    ///
    /// Tiles that are not loaded yet are substituted by the closest loaded tile of a lower
    /// z-level covering them.
    fn get_tiles_to_draw(&self, view: &MapView) -> Vec<(WrappingTileIndex, Arc<DecodedImage>)> {
        let Some(tile_iter) = self.tile_schema.iter_tiles(view) else {
            return vec![];
        };

        let mut tiles = vec![];
        let mut substitutes = vec![];
        let mut substitute_indices = HashSet::new();
        for tile in tile_iter {
            if let Some(image) = self.loaded_image(&tile.index) {
                tiles.push((tile, image));
                continue;
            }

            let mut parent = tile;
            while let Some(next) = parent_tile(parent) {
                parent = next;
                if let Some(image) = self.loaded_image(&parent.index) {
                    if substitute_indices.insert(parent) {
                        substitutes.push((parent, image));
                    }
                    break;
                }
            }
        }

        substitutes.sort_by_key(|(tile, _)| tile.index.z);
        substitutes.append(&mut tiles);
        substitutes
    }

    async fn load_tile(
        index: TileIndex,
        tile_provider: Arc<dyn TileProvider>,
        tiles: &Cache<TileIndex, TileState>,
        messenger: Option<Arc<dyn Messenger>>,
    ) {
        match tiles.get_value_or_guard_async(&index).await {
            Ok(_) => {}
            Err(guard) => {
                let _ = guard.insert(TileState::Loading);

                match tile_provider.load(index).await {
                    Ok(decoded_image) => {
                        tiles.insert(index, TileState::Loaded(Arc::new(decoded_image)));

                        if let Some(messenger) = messenger {
                            messenger.request_redraw();
                        }
                    }
                    Err(err) => {
                        log::debug!("Failed to load tile {index:?}: {err}");
                        tiles.insert(index, TileState::Error)
                    }
                }
            }
        }
    }

    /// Loads all tiles of the given `view` that are not loaded yet and waits for them.
    pub async fn load_tiles(&self, view: &MapView) {
        if let Some(iter) = self.tile_schema.iter_tiles(view) {
            for tile in iter {
                Self::load_tile(
                    tile.index,
                    self.tile_provider.clone(),
                    &self.tiles,
                    self.messenger.clone(),
                )
                .await;
            }
        }
    }
}

fn parent_tile(tile: WrappingTileIndex) -> Option<WrappingTileIndex> {
    let z = tile.index.z.checked_sub(1)?;
    Some(WrappingTileIndex {
        index: TileIndex::new(tile.index.x.div_euclid(2), tile.index.y.div_euclid(2), z),
        display_x: tile.display_x.div_euclid(2),
    })
}

impl Layer for RasterTileLayer {
    fn render(&self, view: &MapView, canvas: &mut dyn Canvas) {
        for (tile, image) in self.get_tiles_to_draw(view) {
            let bbox = self.tile_schema.tile_bbox(tile);
            let top_left = view.map_to_screen(&Point2::new(bbox.x_min(), bbox.y_max()));
            let bottom_right = view.map_to_screen(&Point2::new(bbox.x_max(), bbox.y_min()));
            canvas.draw_image(
                &self.tile_key(tile.index),
                &image,
                Rect::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y),
            );
        }
    }

    fn prepare(&self, view: &MapView) {
        if let Some(iter) = self.tile_schema.iter_tiles(view) {
            for tile in iter {
                if self.tiles.get(&tile.index).is_some() {
                    continue;
                }

                let tile_provider = self.tile_provider.clone();
                let tiles = self.tiles.clone();
                let messenger = self.messenger.clone();
                crate::async_runtime::spawn(async move {
                    Self::load_tile(tile.index, tile_provider, &tiles, messenger).await;
                });
            }
        }
    }

    fn set_messenger(&mut self, messenger: Arc<dyn Messenger>) {
        self.messenger = Some(messenger);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn attribution(&self) -> Option<Attribution> {
        Some(self.source.attribution().clone())
    }
}
