//! Remote GeoJSON feeds and their decoding into map features.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::QuakeMapError;
use crate::platform::PlatformService;

pub mod earthquake;
pub mod plates;

pub use earthquake::{parse_earthquake_feed, EarthquakeFeature};
pub use plates::{parse_plate_feed, PlateBoundaries};

/// Default earthquake feed: every event of the past week from USGS.
pub const USGS_ALL_WEEK: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// Default tectonic plate boundary feed (PB2002 model).
pub const PB2002_BOUNDARIES: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Source of a feed document.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Loads the raw feed document.
    async fn load(&self) -> Result<Bytes, QuakeMapError>;

    /// Human readable description of the source, used in log messages.
    fn describe(&self) -> String;
}

/// Loads a feed with a single GET request.
#[derive(Debug, Clone)]
pub struct UrlFeedProvider {
    url: String,
    platform_service: PlatformService,
}

impl UrlFeedProvider {
    /// Creates a provider for the given url.
    pub fn new(url: impl Into<String>, platform_service: PlatformService) -> Self {
        Self {
            url: url.into(),
            platform_service,
        }
    }
}

#[async_trait]
impl FeedProvider for UrlFeedProvider {
    async fn load(&self) -> Result<Bytes, QuakeMapError> {
        self.platform_service.load_bytes_from_url(&self.url).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads a feed from a local file.
#[derive(Debug, Clone)]
pub struct FileFeedProvider {
    path: PathBuf,
}

impl FileFeedProvider {
    /// Creates a provider reading the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedProvider for FileFeedProvider {
    async fn load(&self) -> Result<Bytes, QuakeMapError> {
        Ok(std::fs::read(&self.path)?.into())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Creates a provider for a feed location. Locations starting with `http://` or `https://` are
/// requested over the network, anything else is treated as a local file path.
pub fn provider_for(location: &str, platform_service: &PlatformService) -> Box<dyn FeedProvider> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(UrlFeedProvider::new(location, platform_service.clone()))
    } else {
        Box::new(FileFeedProvider::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::DEFAULT_USER_AGENT;

    #[test]
    fn provider_is_selected_by_scheme() {
        let service = PlatformService::new(DEFAULT_USER_AGENT).unwrap();
        assert_eq!(provider_for(USGS_ALL_WEEK, &service).describe(), USGS_ALL_WEEK);
        assert_eq!(
            provider_for("data/quakes.geojson", &service).describe(),
            "data/quakes.geojson"
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let provider = FileFeedProvider::new("this/file/does/not/exist.geojson");
        let result = tokio_test::block_on(provider.load());
        assert!(matches!(result, Err(QuakeMapError::FsIo(_))));
    }

    #[test]
    fn file_provider_reads_contents() {
        let provider = FileFeedProvider::new(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
        let bytes = tokio_test::block_on(provider.load()).unwrap();
        assert!(bytes.starts_with(b"[package]"));
    }
}
