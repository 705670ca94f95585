//! Lines of the tectonic plate boundaries.

use std::any::Any;

use quakemap_types::Point2;

use super::Layer;
use crate::feed::PlateBoundaries;
use crate::render::{Canvas, LinePaint};
use crate::view::MapView;
use crate::Color;

/// Style of the boundary lines.
pub const PLATE_LINE_PAINT: LinePaint = LinePaint {
    color: Color::RED,
    width: 2.0,
};

/// Layer drawing plate boundaries as red lines.
#[derive(Debug, Clone)]
pub struct PlateLayer {
    boundaries: PlateBoundaries,
    paint: LinePaint,
}

impl PlateLayer {
    /// Creates a layer drawing the boundaries with the given style.
    pub fn new(boundaries: PlateBoundaries, paint: LinePaint) -> Self {
        Self { boundaries, paint }
    }

    /// Boundaries drawn by the layer.
    pub fn boundaries(&self) -> &PlateBoundaries {
        &self.boundaries
    }

    /// Style of the lines.
    pub fn paint(&self) -> LinePaint {
        self.paint
    }
}

impl Layer for PlateLayer {
    fn render(&self, view: &MapView, canvas: &mut dyn Canvas) {
        let mut points: Vec<Point2> = vec![];
        for line in self.boundaries.lines() {
            points.clear();
            points.extend(line.iter().filter_map(|point| view.geo_to_screen(point)));
            if points.len() >= 2 {
                canvas.draw_polyline(&points, &self.paint);
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

/// Wraps the fetched boundaries into a layer with the default red style.
pub fn build_plate_layer(boundaries: PlateBoundaries) -> PlateLayer {
    PlateLayer::new(boundaries, PLATE_LINE_PAINT)
}
