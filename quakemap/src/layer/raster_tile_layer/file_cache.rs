use std::path::{Path, PathBuf};

use bytes::Bytes;
use log::debug;

use crate::error::QuakeMapError;

/// Storage of downloaded data that survives application restarts.
pub trait PersistentCacheController<Key: ?Sized, Data>: Send + Sync {
    /// Returns the cached entry, if any.
    fn get(&self, key: &Key) -> Option<Data>;
    /// Stores an entry.
    fn insert(&self, key: &Key, data: &Data) -> Result<(), QuakeMapError>;
}

/// Stores the cached data as a set of files in the specified folder. File names are derived from
/// the urls of the cached entries.
///
/// There is no eviction.
#[derive(Debug, Clone)]
pub struct FileCacheController {
    folder_path: PathBuf,
}

impl PersistentCacheController<str, Bytes> for FileCacheController {
    fn get(&self, key: &str) -> Option<Bytes> {
        std::fs::read(self.get_file_path(key)).ok().map(Bytes::from)
    }

    fn insert(&self, key: &str, data: &Bytes) -> Result<(), QuakeMapError> {
        let file_path = self.get_file_path(key);
        let Some(folder) = file_path.parent() else {
            return Err(QuakeMapError::Configuration(format!(
                "cache file {file_path:?} has no parent folder"
            )));
        };

        std::fs::create_dir_all(folder)?;
        std::fs::write(&file_path, data)?;
        debug!("Entry {key} saved to cache file {file_path:?}");
        Ok(())
    }
}

impl FileCacheController {
    /// Creates a new instance. The folder is created if it doesn't exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, QuakeMapError> {
        std::fs::create_dir_all(path.as_ref())?;
        Ok(Self {
            folder_path: path.as_ref().into(),
        })
    }

    /// Folder the cache files are stored in.
    pub fn folder_path(&self) -> &Path {
        &self.folder_path
    }

    fn get_file_path(&self, url: &str) -> PathBuf {
        let stripped = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .unwrap_or(url);

        // Query parameters stay in the file name: `vt/lyrs=s,h&x=1&y=2&z=2`.
        let file_name: String = stripped
            .chars()
            .map(|c| match c {
                '?' | '&' | '=' | ',' | ':' => '_',
                c => c,
            })
            .collect();

        self.folder_path.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_folder(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("quakemap-cache-{name}-{}", std::process::id()))
    }

    #[test]
    fn stores_and_reads_entries() {
        let folder = temp_folder("roundtrip");
        let cache = FileCacheController::new(&folder).unwrap();
        let url = "https://a.tile.openstreetmap.org/1/0/1.png";

        assert_eq!(cache.get(url), None);
        cache.insert(url, &Bytes::from_static(b"tile")).unwrap();
        assert_eq!(cache.get(url), Some(Bytes::from_static(b"tile")));
        assert!(folder.join("a.tile.openstreetmap.org/1/0/1.png").exists());

        std::fs::remove_dir_all(folder).unwrap();
    }

    #[test]
    fn query_urls_get_separate_files() {
        let folder = temp_folder("query");
        let cache = FileCacheController::new(&folder).unwrap();

        cache
            .insert("https://mt0.google.com/vt/lyrs=s,h&x=0&y=0&z=1", &Bytes::from_static(b"a"))
            .unwrap();
        cache
            .insert("https://mt1.google.com/vt/lyrs=s,h&x=1&y=0&z=1", &Bytes::from_static(b"b"))
            .unwrap();

        assert_eq!(
            cache.get("https://mt0.google.com/vt/lyrs=s,h&x=0&y=0&z=1"),
            Some(Bytes::from_static(b"a"))
        );
        assert!(folder.join("mt0.google.com/vt/lyrs_s_h_x_0_y_0_z_1").exists());

        std::fs::remove_dir_all(folder).unwrap();
    }
}
