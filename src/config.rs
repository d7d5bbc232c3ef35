//! Key source configuration

use crate::error::{Error, Result};
use crate::keys::caching::{CachingKeySource, DEFAULT_KEY_SET_TTL};
use crate::keys::source::{FileKeySource, KeySource};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Public endpoint serving the issuer's key set
pub const DEFAULT_KEYS_URL: &str = "https://covid-status.service.nhsx.nhs.uk/pubkeys/keys.json";

/// Local copy of the key set used when the endpoint is unreachable
pub const DEFAULT_CACHE_PATH: &str = "cache/keys.json";

/// Default request timeout for the key set endpoint
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where verification keys come from
///
/// The default arrangement fetches from [`DEFAULT_KEYS_URL`], falls back to
/// [`DEFAULT_CACHE_PATH`], and keeps the result in memory for
/// [`DEFAULT_KEY_SET_TTL`].
#[derive(Debug, Clone)]
pub struct KeySourceConfig {
    endpoint: String,
    cache_path: PathBuf,
    timeout: Duration,
    ttl: Duration,
    offline: bool,
}

impl Default for KeySourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_KEYS_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            timeout: DEFAULT_TIMEOUT,
            ttl: DEFAULT_KEY_SET_TTL,
            offline: false,
        }
    }
}

impl KeySourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key set endpoint
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Set the local key set file
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Set the request timeout for the endpoint
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long a fetched key set is reused
    ///
    /// A zero TTL disables in-memory caching.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Read keys from the local file only
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint
    }

    pub fn cache_file(&self) -> &std::path::Path {
        &self.cache_path
    }

    /// Assemble the configured key source
    pub fn build_source(&self) -> Result<Box<dyn KeySource>> {
        if self.timeout.is_zero() {
            return Err(Error::ConfigurationInvalid(
                "timeout must be greater than zero".into(),
            ));
        }

        let file = FileKeySource::new(self.cache_path.clone());
        let source = if self.offline {
            debug!(path = %self.cache_path.display(), "Using local key set only");
            Box::new(file) as Box<dyn KeySource>
        } else {
            self.network_source(file)?
        };

        if self.ttl.is_zero() {
            return Ok(source);
        }
        Ok(Box::new(CachingKeySource::with_ttl(source, self.ttl)))
    }

    #[cfg(feature = "remote")]
    fn network_source(&self, file: FileKeySource) -> Result<Box<dyn KeySource>> {
        use crate::keys::remote::HttpKeySource;
        use crate::keys::source::FallbackKeySource;

        let http = HttpKeySource::new(&self.endpoint, self.timeout)?;
        debug!(
            url = http.url(),
            path = %self.cache_path.display(),
            "Using remote key set with local fallback"
        );
        Ok(Box::new(FallbackKeySource::new(http, file)))
    }

    #[cfg(not(feature = "remote"))]
    fn network_source(&self, file: FileKeySource) -> Result<Box<dyn KeySource>> {
        debug!(path = %self.cache_path.display(), "Built without remote support, using local key set");
        Ok(Box::new(file))
    }
}
