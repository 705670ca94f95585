//! Events of the USGS earthquake feed.

use chrono::{DateTime, TimeZone, Utc};
use quakemap_types::GeoPoint2d;
use serde_json::{Map as JsonObject, Value as JsonValue};

use crate::error::QuakeMapError;

/// Single earthquake event of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeFeature {
    /// Event identifier, if the feed provides one.
    pub id: Option<String>,
    /// Epicenter.
    pub position: GeoPoint2d,
    /// Depth in kilometers. Negative values are above the sea level.
    pub depth: Option<f64>,
    /// Magnitude.
    pub magnitude: Option<f64>,
    /// Description of the location.
    pub place: Option<String>,
    /// Time of the event.
    pub time: Option<DateTime<Utc>>,
    /// Link to the event page.
    pub url: Option<String>,
}

impl EarthquakeFeature {
    /// Extracts an earthquake from a GeoJSON feature object.
    ///
    /// Returns `None` if the feature has no point geometry with finite longitude and latitude.
    /// Missing or non-numeric properties and depth become `None` instead.
    pub fn from_json(feature: &JsonValue) -> Option<Self> {
        let geometry = feature.get("geometry")?;
        if geometry.get("type")?.as_str()? != "Point" {
            return None;
        }

        let coordinates = geometry.get("coordinates")?.as_array()?;
        let lon = coordinates.first()?.as_f64()?;
        let lat = coordinates.get(1)?.as_f64()?;
        let position = GeoPoint2d::latlon(lat, lon);
        if !position.is_finite() {
            return None;
        }

        let properties = feature.get("properties").and_then(JsonValue::as_object);
        let time = property(properties, "time")
            .and_then(|value| value.as_i64().or_else(|| value.as_f64().map(|v| v as i64)))
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single());

        Some(Self {
            id: feature.get("id").and_then(|id| match id {
                JsonValue::String(id) => Some(id.clone()),
                JsonValue::Number(id) => Some(id.to_string()),
                _ => None,
            }),
            position,
            depth: coordinates.get(2).and_then(JsonValue::as_f64),
            magnitude: property(properties, "mag").and_then(JsonValue::as_f64),
            place: string_property(properties, "place"),
            time,
            url: string_property(properties, "url"),
        })
    }
}

type Properties = JsonObject<String, JsonValue>;

fn property<'a>(properties: Option<&'a Properties>, name: &str) -> Option<&'a JsonValue> {
    properties?.get(name)
}

fn string_property(properties: Option<&Properties>, name: &str) -> Option<String> {
    property(properties, name)
        .and_then(JsonValue::as_str)
        .map(str::to_owned)
}

/// Decodes an earthquake feed document.
///
/// The document must be a GeoJSON feature collection. Each feature is decoded on its own:
/// features that cannot be placed on the map are skipped with a warning, and the order of the
/// remaining features is preserved.
pub fn parse_earthquake_feed(bytes: &[u8]) -> Result<Vec<EarthquakeFeature>, QuakeMapError> {
    let document: JsonValue = serde_json::from_slice(bytes)?;
    let features = match (
        document.get("type").and_then(JsonValue::as_str),
        document.get("features").and_then(JsonValue::as_array),
    ) {
        (Some("FeatureCollection"), Some(features)) => features,
        _ => {
            return Err(QuakeMapError::InvalidFeed(
                "earthquake feed is not a feature collection".into(),
            ))
        }
    };

    let total = features.len();
    let features: Vec<_> = features
        .iter()
        .filter_map(EarthquakeFeature::from_json)
        .collect();

    if features.len() < total {
        log::warn!(
            "Skipped {} of {total} earthquake features without a valid location",
            total - features.len()
        );
    }

    Ok(features)
}
