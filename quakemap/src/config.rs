//! Runtime configuration of the map.

use std::path::{Path, PathBuf};

use quakemap_types::{latlon, GeoPoint2d};
use serde::{Deserialize, Serialize};

use crate::depth::BelowRangePolicy;
use crate::error::QuakeMapError;
use crate::feed::{PB2002_BOUNDARIES, USGS_ALL_WEEK};
use crate::layer::raster_tile_layer::BaseLayerKind;
use crate::platform::DEFAULT_USER_AGENT;
use crate::view::MAX_ZOOM;

/// Initial center of the map: the middle of the Atlantic, showing most plate boundaries.
pub const DEFAULT_CENTER: GeoPoint2d = latlon!(15.5994, -28.6731);

/// Initial zoom level of the map.
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Settings of the map. Every field is optional in the configuration file.
///
/// ```json
/// {
///     "center": {"lat": 35.0, "lon": 139.0},
///     "zoom": 5,
///     "base_layer": "topographic",
///     "below_range": "first_band"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial center of the view.
    pub center: GeoPoint2d,
    /// Initial zoom level.
    pub zoom: f64,
    /// Url or file path of the earthquake GeoJSON feed.
    pub earthquake_feed: String,
    /// Url or file path of the plate boundaries GeoJSON feed.
    pub plates_feed: String,
    /// Base map shown on start.
    pub base_layer: BaseLayerKind,
    /// Coloring of depths below the first depth band.
    pub below_range: BelowRangePolicy,
    /// Folder to keep downloaded tiles in. Tiles are only kept in memory if not set.
    pub tile_cache_dir: Option<PathBuf>,
    /// User agent of the HTTP requests.
    pub user_agent: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            earthquake_feed: USGS_ALL_WEEK.to_owned(),
            plates_feed: PB2002_BOUNDARIES.to_owned(),
            base_layer: BaseLayerKind::default(),
            below_range: BelowRangePolicy::default(),
            tile_cache_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl MapConfig {
    /// Reads the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, QuakeMapError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_json(&bytes)
    }

    /// Parses the configuration from JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self, QuakeMapError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values can be used to build a map.
    pub fn validate(&self) -> Result<(), QuakeMapError> {
        if !self.center.is_finite() || self.center.lat().abs() > 90.0 {
            return Err(QuakeMapError::Configuration(format!(
                "invalid map center {:?}",
                self.center
            )));
        }

        if !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            return Err(QuakeMapError::Configuration(format!(
                "zoom must be between 0 and {MAX_ZOOM}, got {}",
                self.zoom
            )));
        }

        if self.earthquake_feed.is_empty() || self.plates_feed.is_empty() {
            return Err(QuakeMapError::Configuration(
                "feed locations must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = MapConfig::from_json(b"{}").unwrap();
        assert_eq!(config, MapConfig::default());
        assert_eq!(config.center, latlon!(15.5994, -28.6731));
        assert_eq!(config.zoom, 2.0);
        assert_eq!(config.base_layer, BaseLayerKind::Street);
        assert_eq!(config.below_range, BelowRangePolicy::CatchAll);
    }

    #[test]
    fn partial_config() {
        let config = MapConfig::from_json(
            br#"{
                "center": {"lat": 35.0, "lon": 139.0},
                "zoom": 5,
                "base_layer": "topographic",
                "below_range": "first_band",
                "tile_cache_dir": "/tmp/tiles"
            }"#,
        )
        .unwrap();

        assert_eq!(config.center, latlon!(35.0, 139.0));
        assert_eq!(config.zoom, 5.0);
        assert_eq!(config.base_layer, BaseLayerKind::Topographic);
        assert_eq!(config.below_range, BelowRangePolicy::FirstBand);
        assert_eq!(config.tile_cache_dir, Some(PathBuf::from("/tmp/tiles")));
        assert_eq!(config.earthquake_feed, USGS_ALL_WEEK);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            MapConfig::from_json(br#"{"zoom": 42}"#),
            Err(QuakeMapError::Configuration(_))
        ));
        assert!(matches!(
            MapConfig::from_json(br#"{"center": {"lat": 95.0, "lon": 0.0}}"#),
            Err(QuakeMapError::Configuration(_))
        ));
        assert!(matches!(
            MapConfig::from_json(br#"{"earthquake_feed": ""}"#),
            Err(QuakeMapError::Configuration(_))
        ));
        assert!(matches!(
            MapConfig::from_json(br#"{"base_layer": "terrain"}"#),
            Err(QuakeMapError::Json(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            MapConfig::from_file("no/such/config.json"),
            Err(QuakeMapError::FsIo(_))
        ));
    }
}
