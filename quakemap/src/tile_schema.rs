//! [`TileSchema`] is used by tile layers to calculate [tile indices](TileIndex) needed for a given
//! [`MapView`].

use quakemap_types::{Rect, WebMercator};
use serde::{Deserialize, Serialize};

use crate::view::{MapView, TILE_SIZE};

/// Tile index. `y == 0` is the northernmost row.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: u32,
}

impl TileIndex {
    /// Create a new index instance.
    pub fn new(x: i32, y: i32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Tile index with additional virtual `display_x` index that is used to wrap tiles over the
/// 180 longitude line.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct WrappingTileIndex {
    /// Index of the tile to load.
    pub index: TileIndex,
    /// Column where the tile is drawn. Differs from `index.x` for the copies of the world to the
    /// left and to the right of the main one.
    pub display_x: i32,
}

/// Square Web Mercator tile grid of the OSM slippy map scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSchema {
    max_z: u32,
    tile_size: u32,
    projection: WebMercator,
}

impl TileSchema {
    /// Standard 256 pixel tile grid with levels from 0 to `max_z`.
    pub fn web_mercator(max_z: u32) -> Self {
        Self {
            max_z,
            tile_size: TILE_SIZE,
            projection: WebMercator::default(),
        }
    }

    /// Deepest z-level of the schema.
    pub fn max_z(&self) -> u32 {
        self.max_z
    }

    /// Resolution of the tiles of the given z-level.
    pub fn z_resolution(&self, z: u32) -> f64 {
        self.projection.world_width() / (self.tile_size as f64 * 2f64.powi(z as i32))
    }

    /// Z-level whose resolution is closest to the given one, limited by the levels of the schema.
    pub fn select_z(&self, resolution: f64) -> Option<u32> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return None;
        }

        let z = (self.z_resolution(0) / resolution).log2().round();
        Some(z.clamp(0.0, self.max_z as f64) as u32)
    }

    /// Iterate over tile indices that should be displayed for the given map view.
    ///
    /// Columns outside of the world are wrapped around, so that panning across the antimeridian
    /// shows the tiles of the other side. Rows outside of the world are not returned.
    pub fn iter_tiles(&self, view: &MapView) -> Option<impl Iterator<Item = WrappingTileIndex>> {
        let bbox = view.get_bbox()?;
        let z = self.select_z(view.resolution())?;
        Some(self.iter_tiles_over_bbox(z, bbox))
    }

    fn iter_tiles_over_bbox(&self, z: u32, bbox: Rect) -> impl Iterator<Item = WrappingTileIndex> {
        let tile_count = 1i32 << z;
        let tile_width = self.z_resolution(z) * self.tile_size as f64;
        let half_world = self.projection.half_world();

        let x_min = ((bbox.x_min() + half_world) / tile_width).floor() as i32;
        let x_max = ((bbox.x_max() + half_world) / tile_width).ceil() as i32 - 1;
        let x_min = x_min.max(-tile_count);
        let x_max = x_max.min(2 * tile_count - 1);

        let y_min = ((half_world - bbox.y_max()) / tile_width).floor() as i32;
        let y_max = ((half_world - bbox.y_min()) / tile_width).ceil() as i32 - 1;
        let y_min = y_min.max(0);
        let y_max = y_max.min(tile_count - 1);

        (x_min..=x_max).flat_map(move |display_x| {
            (y_min..=y_max).map(move |y| WrappingTileIndex {
                index: TileIndex::new(display_x.rem_euclid(tile_count), y, z),
                display_x,
            })
        })
    }

    /// Area covered by the tile in map coordinates, placed at its display column.
    pub fn tile_bbox(&self, tile: WrappingTileIndex) -> Rect {
        let tile_width = self.z_resolution(tile.index.z) * self.tile_size as f64;
        let half_world = self.projection.half_world();

        let x_min = tile.display_x as f64 * tile_width - half_world;
        let y_max = half_world - tile.index.y as f64 * tile_width;
        Rect::new(x_min, y_max - tile_width, x_min + tile_width, y_max)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use quakemap_types::{Point2, Size};

    use super::*;
    use crate::view::{zoom_to_resolution, ZOOM_0_RESOLUTION};

    fn tiles(view: &MapView, schema: &TileSchema) -> Vec<(i32, i32, u32, i32)> {
        schema
            .iter_tiles(view)
            .unwrap()
            .map(|t| (t.index.x, t.index.y, t.index.z, t.display_x))
            .collect()
    }

    #[test]
    fn select_z() {
        let schema = TileSchema::web_mercator(18);
        assert_abs_diff_eq!(schema.z_resolution(0), ZOOM_0_RESOLUTION, epsilon = 1e-6);
        assert_eq!(schema.select_z(ZOOM_0_RESOLUTION), Some(0));
        assert_eq!(schema.select_z(zoom_to_resolution(2.0)), Some(2));
        assert_eq!(schema.select_z(zoom_to_resolution(2.4)), Some(2));
        assert_eq!(schema.select_z(zoom_to_resolution(2.6)), Some(3));
        assert_eq!(schema.select_z(zoom_to_resolution(20.0)), Some(18));
        assert_eq!(schema.select_z(ZOOM_0_RESOLUTION * 4.0), Some(0));
        assert_eq!(schema.select_z(f64::NAN), None);
        assert_eq!(schema.select_z(0.0), None);
    }

    #[test]
    fn whole_world_at_zoom_0() {
        let schema = TileSchema::web_mercator(18);
        let view = MapView::new_projected(Point2::origin(), schema.z_resolution(0))
            .with_size(Size::new(256.0, 256.0));
        assert_eq!(tiles(&view, &schema), vec![(0, 0, 0, 0)]);
    }

    #[test]
    fn four_tiles_at_zoom_1() {
        let schema = TileSchema::web_mercator(18);
        let view = MapView::new_projected(Point2::origin(), schema.z_resolution(1))
            .with_size(Size::new(512.0, 512.0));
        assert_eq!(
            tiles(&view, &schema),
            vec![(0, 0, 1, 0), (0, 1, 1, 0), (1, 0, 1, 1), (1, 1, 1, 1)]
        );
    }

    #[test]
    fn columns_wrap_across_antimeridian() {
        let schema = TileSchema::web_mercator(18);
        let half_world = WebMercator::default().half_world();
        let view = MapView::new_projected(Point2::new(half_world, 0.0), schema.z_resolution(1))
            .with_size(Size::new(256.0, 256.0));

        let tiles = tiles(&view, &schema);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.contains(&(0, 0, 1, 2)));
        assert!(tiles.contains(&(1, 1, 1, 1)));
    }

    #[test]
    fn tile_bbox_matches_index() {
        let schema = TileSchema::web_mercator(18);
        let half_world = WebMercator::default().half_world();

        let bbox = schema.tile_bbox(WrappingTileIndex {
            index: TileIndex::new(0, 0, 1),
            display_x: 0,
        });
        assert_abs_diff_eq!(bbox.x_min(), -half_world);
        assert_abs_diff_eq!(bbox.x_max(), 0.0);
        assert_abs_diff_eq!(bbox.y_min(), 0.0);
        assert_abs_diff_eq!(bbox.y_max(), half_world);

        let wrapped = schema.tile_bbox(WrappingTileIndex {
            index: TileIndex::new(0, 0, 1),
            display_x: 2,
        });
        assert_abs_diff_eq!(wrapped.x_min(), half_world);
    }
}
