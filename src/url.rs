//! URL validation for the key set endpoint
//!
//! The endpoint is operator configuration, but it still goes through the
//! same checks before any request is made: bounded length, http(s) scheme
//! and a host.

use crate::error::{Error, Result};
use crate::limits::MAX_ENDPOINT_URL_LENGTH;

/// Validate a key set endpoint URL and return it parsed
pub(crate) fn validate_endpoint_url(url: &str) -> Result<url::Url> {
    if url.trim().is_empty() {
        return Err(Error::RemoteError("key set URL cannot be empty".into()));
    }

    if url.len() > MAX_ENDPOINT_URL_LENGTH {
        return Err(Error::RemoteUrlTooLong {
            length: url.len(),
            max: MAX_ENDPOINT_URL_LENGTH,
        });
    }

    let parsed = url
        .parse::<url::Url>()
        .map_err(|e| Error::RemoteError(format!("invalid key set URL: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::RemoteError(
            "key set URL must use http or https scheme".into(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(Error::RemoteError(
            "key set URL must have a valid host".into(),
        ));
    }

    Ok(parsed)
}
