//! Rendering surface used by the layers.

use quakemap_types::{Point2, Rect, Size};

use crate::decoded_image::DecodedImage;
use crate::Color;

/// Surface the layers draw to. All coordinates are screen pixels.
pub trait Canvas {
    /// Size of the canvas in pixels.
    fn size(&self) -> Size;

    /// Draws the image stretched over the given screen rectangle.
    ///
    /// `key` identifies the image between frames, so that implementations can keep uploaded
    /// textures instead of creating them every frame.
    fn draw_image(&mut self, key: &str, image: &DecodedImage, bbox: Rect);

    /// Draws a filled circle with an outline.
    fn draw_circle(&mut self, center: Point2, paint: &CirclePaint);

    /// Draws a line through the given points.
    fn draw_polyline(&mut self, points: &[Point2], paint: &LinePaint);
}

/// Style of a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePaint {
    /// Radius in pixels.
    pub radius: f64,
    /// Fill color, with the fill opacity already applied.
    pub fill: Color,
    /// Color of the outline.
    pub stroke_color: Color,
    /// Width of the outline in pixels.
    pub stroke_width: f64,
}

/// Style of a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePaint {
    /// Line color.
    pub color: Color,
    /// Line width in pixels.
    pub width: f64,
}
