//! Key set sources
//!
//! The validator never fetches keys itself; it asks a [`KeySource`]. The
//! standard arrangement is a network source backed by a local file:
//! [`FallbackKeySource`] tries the primary, then the fallback, and reports
//! [`Error::SourceUnavailable`] when both fail.

use crate::error::{Error, Result};
use crate::keys::KeySet;
use crate::limits::MAX_KEY_SET_RESPONSE_SIZE;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supplies the current set of verification keys
pub trait KeySource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fetch the current key set
    fn fetch(&self) -> Result<KeySet>;
}

impl KeySource for KeySet {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch(&self) -> Result<KeySet> {
        Ok(self.clone())
    }
}

impl<S: KeySource + ?Sized> KeySource for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch(&self) -> Result<KeySet> {
        (**self).fetch()
    }
}

/// Reads a key set from a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileKeySource {
    path: PathBuf,
}

impl FileKeySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_error(&self, details: impl std::fmt::Display) -> Error {
        Error::KeySetFile(format!("{}: {details}", self.path.display()))
    }
}

impl KeySource for FileKeySource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn fetch(&self) -> Result<KeySet> {
        let bytes = std::fs::read(&self.path).map_err(|e| self.file_error(e))?;

        if bytes.len() > MAX_KEY_SET_RESPONSE_SIZE {
            return Err(Error::KeySetResponseTooLarge {
                size: bytes.len(),
                max: MAX_KEY_SET_RESPONSE_SIZE,
            });
        }

        let body = std::str::from_utf8(&bytes)
            .map_err(|e| self.file_error(format!("utf8 decode failed: {e}")))?;

        let set = KeySet::from_json(body)?;
        debug!(path = %self.path.display(), keys = set.len(), "Loaded key set from file");
        Ok(set)
    }
}

/// Tries a primary source and falls back to a second one on any failure
pub struct FallbackKeySource<P, F> {
    primary: P,
    fallback: F,
}

impl<P: KeySource, F: KeySource> FallbackKeySource<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: KeySource, F: KeySource> KeySource for FallbackKeySource<P, F> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn fetch(&self) -> Result<KeySet> {
        let primary_error = match self.primary.fetch() {
            Ok(set) => return Ok(set),
            Err(e) => e,
        };

        warn!(
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            error = %primary_error,
            "Key source failed, using fallback"
        );

        self.fallback
            .fetch()
            .map_err(|fallback_error| Error::SourceUnavailable {
                primary: primary_error.to_string(),
                fallback: fallback_error.to_string(),
            })
    }
}
