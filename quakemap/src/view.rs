//! Position, scale and size of the visible part of the map.

use quakemap_types::{GeoPoint2d, Point2, Projection, Rect, Size, Vector2, WebMercator};

/// Width of a standard slippy map tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Resolution (meters per pixel at the equator) of zoom level 0.
pub const ZOOM_0_RESOLUTION: f64 = 156_543.033_928_040_97;

/// Deepest zoom level the view can reach.
pub const MAX_ZOOM: f64 = 20.0;

/// Converts a zoom level into a view resolution.
pub fn zoom_to_resolution(zoom: f64) -> f64 {
    ZOOM_0_RESOLUTION / 2f64.powf(zoom)
}

/// Converts a view resolution into a (fractional) zoom level.
pub fn resolution_to_zoom(resolution: f64) -> f64 {
    (ZOOM_0_RESOLUTION / resolution).log2()
}

/// Map view specifies the area of the map that should be drawn.
///
/// Map coordinates are Web Mercator meters with `y` pointing north. Screen coordinates are pixels
/// with the origin at the top left corner and `y` pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    position: Point2,
    resolution: f64,
    size: Size,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            position: Point2::origin(),
            resolution: ZOOM_0_RESOLUTION,
            size: Size::new(0.0, 0.0),
        }
    }
}

impl MapView {
    /// Creates a view centered at the projected `position`.
    pub fn new_projected(position: Point2, resolution: f64) -> Self {
        Self {
            position,
            resolution,
            ..Default::default()
        }
    }

    /// Creates a view centered at the geographic `center` with the given zoom level.
    ///
    /// A center that cannot be projected falls back to the projection origin.
    pub fn from_zoom(center: &GeoPoint2d, zoom: f64) -> Self {
        let position = WebMercator::default()
            .project(center)
            .unwrap_or_else(Point2::origin);
        Self::new_projected(position, zoom_to_resolution(zoom.clamp(0.0, MAX_ZOOM)))
    }

    /// Center of the view in map coordinates.
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Geographic center of the view.
    pub fn center(&self) -> Option<GeoPoint2d> {
        WebMercator::default().unproject(&self.position)
    }

    /// Size of the map pixel in meters.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Zoom level corresponding to the resolution of the view.
    pub fn zoom(&self) -> f64 {
        resolution_to_zoom(self.resolution)
    }

    /// Size of the view in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns a copy of the view with the given screen size.
    pub fn with_size(&self, size: Size) -> Self {
        Self { size, ..*self }
    }

    /// Projects a map point onto the screen.
    pub fn map_to_screen(&self, point: &Point2) -> Point2 {
        Point2::new(
            (point.x - self.position.x) / self.resolution + self.size.half_width(),
            self.size.half_height() - (point.y - self.position.y) / self.resolution,
        )
    }

    /// Converts a screen pixel position into map coordinates.
    pub fn screen_to_map(&self, point: &Point2) -> Point2 {
        Point2::new(
            self.position.x + (point.x - self.size.half_width()) * self.resolution,
            self.position.y + (self.size.half_height() - point.y) * self.resolution,
        )
    }

    /// Projects a geographic point onto the screen.
    pub fn geo_to_screen(&self, point: &GeoPoint2d) -> Option<Point2> {
        let projected = WebMercator::default().project(point)?;
        Some(self.map_to_screen(&projected))
    }

    /// Area of the map visible in the view. Returns `None` while the view has no size.
    pub fn get_bbox(&self) -> Option<Rect> {
        if self.size.is_zero() || !self.resolution.is_finite() {
            return None;
        }

        let top_left = self.screen_to_map(&Point2::new(0.0, 0.0));
        let bottom_right = self.screen_to_map(&Point2::new(self.size.width(), self.size.height()));
        Some(Rect::new(
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
        ))
    }

    /// Moves the view so that the map point under the `from` pixel ends up under the `to` pixel.
    pub fn translate_by_pixels(&self, from: Point2, to: Point2) -> Self {
        let delta: Vector2 = to - from;
        let position = Point2::new(
            self.position.x - delta.x * self.resolution,
            self.position.y + delta.y * self.resolution,
        );

        Self { position, ..*self }
    }

    /// Multiplies the resolution by `zoom_factor` keeping the map point under `base_point` in place.
    ///
    /// The resulting zoom level is limited to `0..=MAX_ZOOM`.
    pub fn zoom_by(&self, zoom_factor: f64, base_point: Point2) -> Self {
        if !zoom_factor.is_finite() || zoom_factor <= 0.0 {
            return *self;
        }

        let resolution = (self.resolution * zoom_factor)
            .clamp(zoom_to_resolution(MAX_ZOOM), ZOOM_0_RESOLUTION);
        let base = self.screen_to_map(&base_point);
        let scale = resolution / self.resolution;
        let position = Point2::new(
            base.x - (base.x - self.position.x) * scale,
            base.y - (base.y - self.position.y) * scale,
        );

        Self {
            position,
            resolution,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use quakemap_types::latlon;

    use super::*;

    fn view() -> MapView {
        MapView::new_projected(Point2::new(1000.0, 2000.0), 10.0).with_size(Size::new(200.0, 100.0))
    }

    #[test]
    fn zoom_conversion() {
        assert_abs_diff_eq!(zoom_to_resolution(0.0), ZOOM_0_RESOLUTION);
        assert_abs_diff_eq!(zoom_to_resolution(2.0), ZOOM_0_RESOLUTION / 4.0);
        assert_abs_diff_eq!(resolution_to_zoom(ZOOM_0_RESOLUTION / 8.0), 3.0);
    }

    #[test]
    fn screen_and_map_coordinates() {
        let view = view();
        assert_eq!(view.map_to_screen(&Point2::new(1000.0, 2000.0)), Point2::new(100.0, 50.0));
        assert_eq!(view.map_to_screen(&Point2::new(1100.0, 2100.0)), Point2::new(110.0, 40.0));
        assert_eq!(view.screen_to_map(&Point2::new(0.0, 0.0)), Point2::new(0.0, 2500.0));

        let bbox = view.get_bbox().unwrap();
        assert_eq!(bbox, Rect::new(0.0, 1500.0, 2000.0, 2500.0));
    }

    #[test]
    fn view_without_size_has_no_bbox() {
        assert!(MapView::default().get_bbox().is_none());
    }

    #[test]
    fn translate_keeps_point_under_cursor() {
        let view = view();
        let from = Point2::new(20.0, 30.0);
        let to = Point2::new(50.0, 10.0);
        let map_point = view.screen_to_map(&from);

        let moved = view.translate_by_pixels(from, to);
        assert_eq!(moved.map_to_screen(&map_point), to);
    }

    #[test]
    fn zoom_keeps_base_point() {
        let view = view();
        let base = Point2::new(150.0, 20.0);
        let map_point = view.screen_to_map(&base);

        let zoomed = view.zoom_by(0.5, base);
        assert_abs_diff_eq!(zoomed.resolution(), 5.0);
        let screen = zoomed.map_to_screen(&map_point);
        assert_abs_diff_eq!(screen.x, base.x, epsilon = 1e-9);
        assert_abs_diff_eq!(screen.y, base.y, epsilon = 1e-9);
    }

    #[test]
    fn zoom_is_limited() {
        let view = MapView::from_zoom(&latlon!(0.0, 0.0), 0.0).with_size(Size::new(256.0, 256.0));
        let zoomed = view.zoom_by(4.0, Point2::new(0.0, 0.0));
        assert_abs_diff_eq!(zoomed.resolution(), ZOOM_0_RESOLUTION);

        assert_eq!(view.zoom_by(f64::NAN, Point2::new(0.0, 0.0)), view);
    }

    #[test]
    fn initial_view() {
        let view = MapView::from_zoom(&latlon!(15.5994, -28.6731), 2.0);
        assert_abs_diff_eq!(view.zoom(), 2.0, epsilon = 1e-12);

        let center = view.center().unwrap();
        assert_abs_diff_eq!(center.lat(), 15.5994, epsilon = 1e-9);
        assert_abs_diff_eq!(center.lon(), -28.6731, epsilon = 1e-9);
    }
}
