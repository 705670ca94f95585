//! Geometry primitives shared by the `quakemap` crates.
//!
//! Geographic coordinates are represented by [`geo::GeoPoint2d`] (latitude and longitude in
//! degrees). Everything that is drawn is first projected into the cartesian
//! [Web Mercator](projection::WebMercator) plane, where [`cartesian::Point2`],
//! [`cartesian::Rect`] and [`cartesian::Size`] are used.

pub mod cartesian;
pub mod geo;
pub mod projection;

pub use cartesian::{Point2, Rect, Size, Vector2};
pub use geo::GeoPoint2d;
pub use projection::{Projection, WebMercator};
