//! Key set retrieval over HTTP

use crate::error::{Error, Result};
use crate::keys::KeySet;
use crate::keys::source::KeySource;
use crate::limits::MAX_KEY_SET_RESPONSE_SIZE;
use crate::url::validate_endpoint_url;
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// Fetches the key set from an HTTP endpoint returning a JSON array
pub struct HttpKeySource {
    client: reqwest::blocking::Client,
    url: url::Url,
}

impl HttpKeySource {
    /// Create a source for `url` with a request timeout
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigurationInvalid(format!("http client: {e}")))?;
        Self::with_client(client, url)
    }

    /// Create a source using an existing client
    pub fn with_client(client: reqwest::blocking::Client, url: &str) -> Result<Self> {
        let url = validate_endpoint_url(url)?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    fn fetch_bytes(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .map_err(|e| Error::RemoteError(format!("network: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::RemoteError(format!(
                "http: status {}",
                response.status()
            )));
        }

        if let Some(length) = response.content_length() {
            if length > MAX_KEY_SET_RESPONSE_SIZE as u64 {
                return Err(Error::KeySetResponseTooLarge {
                    size: length as usize,
                    max: MAX_KEY_SET_RESPONSE_SIZE,
                });
            }
        }

        // Content-Length is optional; bound the read itself
        let mut bytes = Vec::new();
        response
            .take(MAX_KEY_SET_RESPONSE_SIZE as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| Error::RemoteError(format!("network: {e}")))?;

        Ok(bytes)
    }
}

impl KeySource for HttpKeySource {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fetch(&self) -> Result<KeySet> {
        let bytes = self.fetch_bytes()?;

        // Validate response size before parsing to prevent resource exhaustion
        if bytes.len() > MAX_KEY_SET_RESPONSE_SIZE {
            return Err(Error::KeySetResponseTooLarge {
                size: bytes.len(),
                max: MAX_KEY_SET_RESPONSE_SIZE,
            });
        }

        let body = std::str::from_utf8(&bytes)
            .map_err(|e| Error::RemoteError(format!("keys: utf8 decode failed: {e}")))?;

        let set = KeySet::from_json(body)?;
        debug!(url = %self.url, keys = set.len(), "Fetched key set");
        Ok(set)
    }
}
