//! Cartesian (projected or screen space) primitives.

use num_traits::{Float, Num};
use serde::{Deserialize, Serialize};

/// Point in a cartesian plane.
pub type Point2<N = f64> = nalgebra::Point2<N>;

/// Vector in a cartesian plane.
pub type Vector2<N = f64> = nalgebra::Vector2<N>;

/// Axis aligned rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    x_min: N,
    y_min: N,
    x_max: N,
    y_max: N,
}

impl<N: Float + nalgebra::Scalar> Rect<N> {
    /// Creates a new rectangle. The coordinates are normalized so that `min <= max` holds on both
    /// axes.
    pub fn new(x1: N, y1: N, x2: N, y2: N) -> Self {
        Self {
            x_min: x1.min(x2),
            y_min: y1.min(y2),
            x_max: x1.max(x2),
            y_max: y1.max(y2),
        }
    }

    /// Minimum X coordinate.
    pub fn x_min(&self) -> N {
        self.x_min
    }

    /// Maximum X coordinate.
    pub fn x_max(&self) -> N {
        self.x_max
    }

    /// Minimum Y coordinate.
    pub fn y_min(&self) -> N {
        self.y_min
    }

    /// Maximum Y coordinate.
    pub fn y_max(&self) -> N {
        self.y_max
    }

    /// Width of the rectangle.
    pub fn width(&self) -> N {
        self.x_max - self.x_min
    }

    /// Height of the rectangle.
    pub fn height(&self) -> N {
        self.y_max - self.y_min
    }
}

/// Size of a rectangular area, e.g. a screen or a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size<N = f64> {
    width: N,
    height: N,
}

impl<N: Num + Copy> Size<N> {
    /// Creates a new size.
    pub fn new(width: N, height: N) -> Self {
        Self { width, height }
    }

    /// Width.
    pub fn width(&self) -> N {
        self.width
    }

    /// Height.
    pub fn height(&self) -> N {
        self.height
    }

    /// Half of the width.
    pub fn half_width(&self) -> N {
        self.width / (N::one() + N::one())
    }

    /// Half of the height.
    pub fn half_height(&self) -> N {
        self.height / (N::one() + N::one())
    }

    /// Returns true if either of dimensions is zero.
    pub fn is_zero(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_normalized() {
        let rect = Rect::new(10.0, 5.0, -10.0, -5.0);
        assert_eq!(rect.x_min(), -10.0);
        assert_eq!(rect.y_max(), 5.0);
        assert_eq!(rect.width(), 20.0);
        assert_eq!(rect.height(), 10.0);
    }

    #[test]
    fn size_halves() {
        let size = Size::new(800.6, 600.2);
        assert_eq!(size.half_width(), 400.3);
        assert_eq!(size.half_height(), 300.1);
        assert!(Size::new(0, 10).is_zero());
        assert!(!Size::new(1u32, 1).is_zero());
    }
}
