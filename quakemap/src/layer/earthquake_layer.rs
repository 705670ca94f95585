//! Circle markers of earthquake events.

use std::any::Any;

use quakemap_types::{GeoPoint2d, Point2};

use super::Layer;
use crate::depth::DepthClassifier;
use crate::feed::EarthquakeFeature;
use crate::popup::Popup;
use crate::render::{Canvas, CirclePaint};
use crate::view::MapView;
use crate::Color;

/// Marker radius in pixels per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f64 = 5.0;

/// Opacity of the marker fill.
pub const MARKER_FILL_OPACITY: f32 = 0.75;

/// Color of the marker outline.
pub const MARKER_STROKE_COLOR: Color = Color::BLACK;

/// Width of the marker outline in pixels.
pub const MARKER_STROKE_WIDTH: f64 = 1.0;

/// Circle marker of a single earthquake.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    position: GeoPoint2d,
    radius: f64,
    fill_color: Color,
    popup: Popup,
}

impl Marker {
    /// Builds the marker of an earthquake.
    ///
    /// The radius is the magnitude times [`RADIUS_PER_MAGNITUDE`] without any clamping, so a
    /// negative magnitude gives a negative radius. A missing magnitude gives radius 0.
    pub fn for_earthquake(feature: &EarthquakeFeature, classifier: &DepthClassifier) -> Self {
        Self {
            position: feature.position,
            radius: feature.magnitude.unwrap_or(0.0) * RADIUS_PER_MAGNITUDE,
            fill_color: classifier.classify_opt(feature.depth),
            popup: Popup::for_earthquake(feature),
        }
    }

    /// Epicenter of the event.
    pub fn position(&self) -> GeoPoint2d {
        self.position
    }

    /// Radius in pixels.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Fill color before the fill opacity is applied.
    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    /// Popup content of the marker.
    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    /// Paint the marker is drawn with.
    pub fn paint(&self) -> CirclePaint {
        CirclePaint {
            radius: self.radius,
            fill: self.fill_color.with_opacity(MARKER_FILL_OPACITY),
            stroke_color: MARKER_STROKE_COLOR,
            stroke_width: MARKER_STROKE_WIDTH,
        }
    }

    fn is_drawable(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }
}

/// Layer of earthquake markers in feed order. Later markers are drawn on top.
#[derive(Debug, Clone, Default)]
pub struct EarthquakeLayer {
    markers: Vec<Marker>,
}

impl EarthquakeLayer {
    /// Creates a layer from markers.
    pub fn new(markers: Vec<Marker>) -> Self {
        Self { markers }
    }

    /// Markers of the layer.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns true if the layer has no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Markers whose circle contains the screen point, topmost first.
    pub fn markers_at(&self, point: Point2, view: &MapView) -> Vec<&Marker> {
        self.markers
            .iter()
            .rev()
            .filter(|marker| marker.is_drawable())
            .filter(|marker| {
                view.geo_to_screen(&marker.position)
                    .is_some_and(|center| (center - point).norm() <= marker.radius)
            })
            .collect()
    }
}

impl Layer for EarthquakeLayer {
    fn render(&self, view: &MapView, canvas: &mut dyn Canvas) {
        for marker in self.markers.iter().filter(|marker| marker.is_drawable()) {
            if let Some(center) = view.geo_to_screen(&marker.position) {
                canvas.draw_circle(center, &marker.paint());
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builds one marker per feature, in feed order.
pub fn build_earthquake_layer(
    features: &[EarthquakeFeature],
    classifier: &DepthClassifier,
) -> EarthquakeLayer {
    EarthquakeLayer::new(
        features
            .iter()
            .map(|feature| Marker::for_earthquake(feature, classifier))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};
    use quakemap_types::{latlon, Size};

    use super::*;
    use crate::depth::BelowRangePolicy;
    use crate::render::test_canvas::RecordingCanvas;

    fn feature(lat: f64, lon: f64, depth: Option<f64>, magnitude: Option<f64>) -> EarthquakeFeature {
        EarthquakeFeature {
            id: None,
            position: latlon!(lat, lon),
            depth,
            magnitude,
            place: Some("X".into()),
            time: Utc.timestamp_millis_opt(1_700_000_000_000).single(),
            url: None,
        }
    }

    fn view() -> MapView {
        MapView::from_zoom(&latlon!(0.0, 0.0), 2.0).with_size(Size::new(800.0, 600.0))
    }

    #[test]
    fn marker_of_known_event() {
        let layer = build_earthquake_layer(
            &[feature(37.8, -122.4, Some(5.0), Some(4.2))],
            &DepthClassifier::default(),
        );
        let marker = &layer.markers()[0];

        assert_eq!(marker.position(), latlon!(37.8, -122.4));
        assert_abs_diff_eq!(marker.radius(), 21.0);
        assert_eq!(marker.fill_color(), Color::from_hex("#00FF00"));
        assert_eq!(
            marker.popup().to_string(),
            "Magnitude: 4.2\nDepth: 5 km\nLocation: X\nTime: Tue Nov 14 2023 22:13:20 UTC"
        );

        let paint = marker.paint();
        assert_eq!(paint.stroke_color, Color::BLACK);
        assert_eq!(paint.stroke_width, 1.0);
        assert_eq!(paint.fill, Color::rgba(0, 255, 0, 191));
    }

    #[test]
    fn radius_is_five_times_magnitude() {
        for magnitude in [-1.0, 0.0, 0.5, 2.3, 7.8] {
            let marker = Marker::for_earthquake(
                &feature(0.0, 0.0, Some(0.0), Some(magnitude)),
                &DepthClassifier::default(),
            );
            assert_abs_diff_eq!(marker.radius(), magnitude * 5.0);
        }

        let unknown = Marker::for_earthquake(
            &feature(0.0, 0.0, Some(0.0), None),
            &DepthClassifier::default(),
        );
        assert_eq!(unknown.radius(), 0.0);
    }

    #[test]
    fn one_marker_per_feature_in_order() {
        let features: Vec<_> = (0..10)
            .map(|i| feature(i as f64, i as f64, Some(i as f64 * 10.0), Some(1.0)))
            .collect();
        let layer = build_earthquake_layer(&features, &DepthClassifier::default());

        assert_eq!(layer.len(), 10);
        for (marker, feature) in layer.markers().iter().zip(&features) {
            assert_eq!(marker.position(), feature.position);
        }
    }

    #[test]
    fn empty_feed_gives_empty_layer() {
        let layer = build_earthquake_layer(&[], &DepthClassifier::default());
        assert!(layer.is_empty());
    }

    #[test]
    fn color_follows_classifier_policy() {
        let deep_negative = [feature(0.0, 0.0, Some(-15.0), Some(1.0))];

        let quirk = build_earthquake_layer(&deep_negative, &DepthClassifier::default());
        assert_eq!(quirk.markers()[0].fill_color(), Color::from_hex("#FF0000"));

        let fixed = build_earthquake_layer(
            &deep_negative,
            &DepthClassifier::new(BelowRangePolicy::FirstBand),
        );
        assert_eq!(fixed.markers()[0].fill_color(), Color::from_hex("#00FF00"));

        let unknown = build_earthquake_layer(
            &[feature(0.0, 0.0, None, Some(1.0))],
            &DepthClassifier::default(),
        );
        assert_eq!(unknown.markers()[0].fill_color(), Color::GRAY);
    }

    #[test]
    fn render_skips_markers_without_size() {
        let layer = build_earthquake_layer(
            &[
                feature(0.0, 0.0, Some(5.0), Some(2.0)),
                feature(0.0, 0.0, Some(5.0), None),
                feature(0.0, 0.0, Some(5.0), Some(-0.5)),
            ],
            &DepthClassifier::default(),
        );
        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        layer.render(&view(), &mut canvas);

        let circles = canvas.circles();
        assert_eq!(circles.len(), 1);
        assert_abs_diff_eq!(circles[0].0.x, 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(circles[0].0.y, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(circles[0].1.radius, 10.0);
    }

    #[test]
    fn markers_at_returns_topmost_first() {
        let layer = build_earthquake_layer(
            &[
                feature(0.0, 0.0, Some(5.0), Some(4.0)),
                feature(0.0, 0.0, Some(95.0), Some(1.0)),
                feature(60.0, 60.0, Some(5.0), Some(4.0)),
            ],
            &DepthClassifier::default(),
        );
        let view = view();

        let hits = layer.markers_at(Point2::new(402.0, 300.0), &view);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].fill_color(), Color::from_hex("#FF0000"));

        let hits = layer.markers_at(Point2::new(415.0, 300.0), &view);
        assert_eq!(hits.len(), 1);

        assert!(layer.markers_at(Point2::new(10.0, 10.0), &view).is_empty());
    }
}
