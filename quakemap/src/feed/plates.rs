//! Tectonic plate boundary lines of the PB2002 data set.

use geojson::{GeoJson, Geometry, Position, Value};
use quakemap_types::GeoPoint2d;

use crate::error::QuakeMapError;

/// Tectonic plate boundaries as a set of polylines.
///
/// Every line string of the source document, and every ring of its polygons, becomes one
/// polyline. Points and invalid positions are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlateBoundaries {
    lines: Vec<Vec<GeoPoint2d>>,
}

impl PlateBoundaries {
    /// Collects all lines of the GeoJSON document.
    pub fn from_geojson(geojson: &GeoJson) -> Self {
        let mut boundaries = Self::default();
        match geojson {
            GeoJson::FeatureCollection(collection) => {
                for feature in &collection.features {
                    if let Some(geometry) = &feature.geometry {
                        boundaries.add_geometry(geometry);
                    }
                }
            }
            GeoJson::Feature(feature) => {
                if let Some(geometry) = &feature.geometry {
                    boundaries.add_geometry(geometry);
                }
            }
            GeoJson::Geometry(geometry) => boundaries.add_geometry(geometry),
        }

        boundaries
    }

    /// Polylines of the boundaries.
    pub fn lines(&self) -> &[Vec<GeoPoint2d>] {
        &self.lines
    }

    /// Number of polylines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn add_geometry(&mut self, geometry: &Geometry) {
        match &geometry.value {
            Value::Point(_) | Value::MultiPoint(_) => {}
            Value::LineString(line) => self.add_line(line),
            Value::MultiLineString(lines) | Value::Polygon(lines) => {
                lines.iter().for_each(|line| self.add_line(line))
            }
            Value::MultiPolygon(polygons) => polygons
                .iter()
                .flatten()
                .for_each(|line| self.add_line(line)),
            Value::GeometryCollection(geometries) => geometries
                .iter()
                .for_each(|geometry| self.add_geometry(geometry)),
        }
    }

    fn add_line(&mut self, positions: &[Position]) {
        let line: Vec<_> = positions
            .iter()
            .filter_map(|position| match position.as_slice() {
                [lon, lat, ..] => Some(GeoPoint2d::latlon(*lat, *lon)),
                _ => None,
            })
            .filter(GeoPoint2d::is_finite)
            .collect();

        if line.len() >= 2 {
            self.lines.push(line);
        }
    }
}

/// Decodes a plate boundary feed document.
pub fn parse_plate_feed(bytes: &[u8]) -> Result<PlateBoundaries, QuakeMapError> {
    let geojson = serde_json::from_slice::<GeoJson>(bytes)?;
    Ok(PlateBoundaries::from_geojson(&geojson))
}
