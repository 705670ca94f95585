use async_trait::async_trait;
use bytes::Bytes;

use super::file_cache::PersistentCacheController;
use super::source::TileSource;
use crate::decoded_image::DecodedImage;
use crate::error::QuakeMapError;
use crate::platform::PlatformService;
use crate::tile_schema::TileIndex;

/// Provider of tiles for a [`RasterTileLayer`](super::RasterTileLayer).
#[async_trait]
pub trait TileProvider: Send + Sync {
    /// Loads the tile with the given index.
    async fn load(&self, index: TileIndex) -> Result<DecodedImage, QuakeMapError>;
}

/// Tile provider that loads tiles one by one with HTTP GET requests to the urls of a
/// [`TileSource`].
///
/// If constructed with a [`PersistentCacheController`] it will cache the loaded tiles and only
/// request new tiles from the source if they are not in the cache.
pub struct RestTileProvider {
    source: TileSource,
    platform_service: PlatformService,
    cache: Option<Box<dyn PersistentCacheController<str, Bytes>>>,
}

impl std::fmt::Debug for RestTileProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTileProvider")
            .field("source", &self.source.name())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl RestTileProvider {
    /// Creates a new instance of the provider.
    pub fn new(
        source: TileSource,
        platform_service: PlatformService,
        cache: Option<Box<dyn PersistentCacheController<str, Bytes>>>,
    ) -> Self {
        Self {
            source,
            platform_service,
            cache,
        }
    }

    async fn download_tile(&self, index: TileIndex) -> Result<Bytes, QuakeMapError> {
        let url = self.source.url(index)?;

        if let Some(cache) = &self.cache {
            if let Some(data) = cache.get(&url) {
                return Ok(data);
            }
        }

        let data = self.platform_service.load_bytes_from_url(&url).await?;

        if let Some(cache) = &self.cache {
            if let Err(error) = cache.insert(&url, &data) {
                log::warn!("Failed to write persistent cache entry: {error:?}");
            }
        }

        Ok(data)
    }
}

#[async_trait]
impl TileProvider for RestTileProvider {
    async fn load(&self, index: TileIndex) -> Result<DecodedImage, QuakeMapError> {
        let bytes = self.download_tile(index).await?;
        DecodedImage::decode(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage};
    use parking_lot::Mutex;

    use super::*;
    use crate::platform::DEFAULT_USER_AGENT;

    #[derive(Default)]
    struct MemoryCache(Mutex<HashMap<String, Bytes>>);

    impl PersistentCacheController<str, Bytes> for MemoryCache {
        fn get(&self, key: &str) -> Option<Bytes> {
            self.0.lock().get(key).cloned()
        }

        fn insert(&self, key: &str, data: &Bytes) -> Result<(), QuakeMapError> {
            self.0.lock().insert(key.to_owned(), data.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn cached_tile_is_not_downloaded() {
        let mut png = Cursor::new(Vec::new());
        RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();

        let cache = MemoryCache::default();
        cache
            .insert(
                "https://a.tile.openstreetmap.org/0/0/0.png",
                &Bytes::from(png.into_inner()),
            )
            .unwrap();

        let provider = RestTileProvider::new(
            TileSource::street(),
            PlatformService::new(DEFAULT_USER_AGENT).unwrap(),
            Some(Box::new(cache)),
        );
        let tile = provider.load(TileIndex::new(0, 0, 0)).await.unwrap();
        assert_eq!(tile.size().width(), 4);
    }
}
