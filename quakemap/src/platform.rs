//! HTTP access shared by feed and tile providers.

use bytes::Bytes;
use log::{debug, info};

use crate::error::QuakeMapError;

/// User agent sent with every request unless configured otherwise. Some tile servers reject
/// requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// Loads data from the network.
#[derive(Debug, Clone)]
pub struct PlatformService {
    http_client: reqwest::Client,
}

impl PlatformService {
    /// Creates a new service with the given user agent.
    pub fn new(user_agent: &str) -> Result<Self, QuakeMapError> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(Self { http_client })
    }

    /// Loads a byte array from the given url.
    pub async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, QuakeMapError> {
        debug!("Loading {url}");
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            info!("Failed to load {url}: {status}");
            return Err(QuakeMapError::HttpStatus {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_agent_has_version() {
        assert!(DEFAULT_USER_AGENT.starts_with("quakemap/"));
        assert!(PlatformService::new(DEFAULT_USER_AGENT).is_ok());
    }
}
