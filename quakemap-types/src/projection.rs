//! Projections between geographic and cartesian coordinates.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::cartesian::Point2;
use crate::geo::{GeoPoint2d, WGS84_SEMIMAJOR};

/// Converts points from one coordinate space into another.
pub trait Projection {
    /// Type of the input point.
    type InPoint;
    /// Type of the output point.
    type OutPoint;

    /// Projects a point. Returns `None` if the point cannot be represented in the target space.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Inverse of [`Projection::project`].
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// Spherical Web Mercator (EPSG:3857), the projection used by the slippy map tile providers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercator {
    semimajor: f64,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            semimajor: WGS84_SEMIMAJOR,
        }
    }
}

impl WebMercator {
    /// Latitude beyond which the projection is cut off so that the world becomes a square.
    pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

    /// Length of the equator in projected meters.
    pub fn world_width(&self) -> f64 {
        2.0 * PI * self.semimajor
    }

    /// Half of [`WebMercator::world_width`]. Projected coordinates of the world lie in
    /// `[-half_world, half_world]` on both axes.
    pub fn half_world(&self) -> f64 {
        PI * self.semimajor
    }
}

impl Projection for WebMercator {
    type InPoint = GeoPoint2d;
    type OutPoint = Point2;

    fn project(&self, input: &GeoPoint2d) -> Option<Point2> {
        let lat = input
            .lat()
            .clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE)
            .to_radians();
        let x = self.semimajor * input.lon_rad();
        let y = self.semimajor * (FRAC_PI_4 + lat / 2.0).tan().ln();

        if x.is_finite() && y.is_finite() {
            Some(Point2::new(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Point2) -> Option<GeoPoint2d> {
        if !input.x.is_finite() || !input.y.is_finite() {
            return None;
        }

        let lat = 2.0 * (input.y / self.semimajor).exp().atan() - FRAC_PI_2;
        let lon = input.x / self.semimajor;

        Some(GeoPoint2d::latlon(lat.to_degrees(), lon.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::latlon;

    #[test]
    fn project_known_points() {
        let projection = WebMercator::default();

        let origin = projection.project(&latlon!(0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(origin.x, 0.0);
        assert_abs_diff_eq!(origin.y, 0.0, epsilon = 1e-9);

        let corner = projection
            .project(&latlon!(WebMercator::MAX_LATITUDE, 180.0))
            .unwrap();
        assert_abs_diff_eq!(corner.x, projection.half_world(), epsilon = 1e-6);
        assert_abs_diff_eq!(corner.y, projection.half_world(), epsilon = 1e-3);
    }

    #[test]
    fn latitude_is_clamped() {
        let projection = WebMercator::default();
        let pole = projection.project(&latlon!(90.0, 0.0)).unwrap();
        let limit = projection
            .project(&latlon!(WebMercator::MAX_LATITUDE, 0.0))
            .unwrap();
        assert_abs_diff_eq!(pole.y, limit.y);
    }

    #[test]
    fn unproject_inverts_project() {
        let projection = WebMercator::default();
        for point in [
            latlon!(37.8, -122.4),
            latlon!(-33.9, 151.2),
            latlon!(15.5994, -28.6731),
        ] {
            let projected = projection.project(&point).unwrap();
            let restored = projection.unproject(&projected).unwrap();
            assert_abs_diff_eq!(restored.lat(), point.lat(), epsilon = 1e-9);
            assert_abs_diff_eq!(restored.lon(), point.lon(), epsilon = 1e-9);
        }
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let projection = WebMercator::default();
        assert!(projection.project(&latlon!(0.0, f64::NAN)).is_none());
        assert!(projection
            .unproject(&Point2::new(f64::INFINITY, 0.0))
            .is_none());
    }
}
