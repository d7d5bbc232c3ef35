//! Errors for healthpass

use thiserror::Error;

/// Healthpass Errors
///
/// Variants stay distinct so logs and tests can tell failure modes apart.
/// [`Error::rejection`] collapses them into the verdict classes callers see.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Invalid token format: expected three non-empty parts separated by '.'")]
    FormatInvalid,

    #[error("Base64 decoding failed: {0}")]
    FormatInvalidBase64(String),

    // ============================================================================
    // Payload Errors
    // ============================================================================
    #[error("Payload too short: {length} bytes (minimum: {min} bytes)")]
    PayloadTooShort { length: usize, min: usize },

    #[error("Payload field '{field}' is not valid UTF-8")]
    PayloadInvalidText { field: &'static str },

    #[error("Payload field '{field}' must be exactly 2 bytes, found {length}")]
    PayloadFieldWidth { field: &'static str, length: usize },

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("No key found for kid '{0}'")]
    KeyNotFound(String),

    #[error("Multiple keys found with kid '{kid}' ({count} matches)")]
    MultipleKeysFound { kid: String, count: usize },

    #[error("Public key for kid '{kid}' rejected: {reason}")]
    KeyInvalid { kid: String, reason: String },

    #[error("Signature verification failed")]
    SignatureInvalid,

    // ============================================================================
    // Expiry Errors
    // ============================================================================
    #[error("Pass expired at {expired_at} (now: {now})")]
    Expired { expired_at: String, now: String },

    #[error("Expiry '{0}' is not a valid timestamp")]
    ExpiryUnparseable(String),

    // ============================================================================
    // Key Source Errors
    // ============================================================================
    #[error("Remote error: {0}")]
    RemoteError(String),

    #[error("Remote URL too long: {length} characters (maximum: {max} characters)")]
    RemoteUrlTooLong { length: usize, max: usize },

    #[error("Key set too large: {size} bytes (maximum: {max} bytes)")]
    KeySetResponseTooLarge { size: usize, max: usize },

    #[error("Key set has too many keys: {key_count} (maximum: {max})")]
    KeySetTooLarge { key_count: usize, max: usize },

    #[error("Key set is not valid JSON: {0}")]
    KeySetInvalidJson(String),

    #[error("Key set file error: {0}")]
    KeySetFile(String),

    #[error("No key source available: primary failed ({primary}); fallback failed ({fallback})")]
    SourceUnavailable { primary: String, fallback: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),
}

/// Verdict class an error collapses into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Malformed token or payload
    Structure,
    /// Unknown key or failed cryptographic check
    Signature,
    /// Signed and well-formed, but past its expiry
    Expired,
}

impl Error {
    /// Classify this error for the verdict boundary
    ///
    /// Returns `None` for errors that abort a run instead of producing a
    /// verdict (no key set could be obtained, or the validator is misconfigured).
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Error::TokenTooLarge { .. }
            | Error::FormatInvalid
            | Error::FormatInvalidBase64(_)
            | Error::PayloadTooShort { .. }
            | Error::PayloadInvalidText { .. }
            | Error::PayloadFieldWidth { .. } => Some(Rejection::Structure),

            Error::KeyNotFound(_)
            | Error::MultipleKeysFound { .. }
            | Error::KeyInvalid { .. }
            | Error::SignatureInvalid => Some(Rejection::Signature),

            Error::Expired { .. } | Error::ExpiryUnparseable(_) => Some(Rejection::Expired),

            Error::RemoteError(_)
            | Error::RemoteUrlTooLong { .. }
            | Error::KeySetResponseTooLarge { .. }
            | Error::KeySetTooLarge { .. }
            | Error::KeySetInvalidJson(_)
            | Error::KeySetFile(_)
            | Error::SourceUnavailable { .. }
            | Error::ConfigurationInvalid(_) => None,
        }
    }
}

/// Result type alias for healthpass operations
pub type Result<T> = std::result::Result<T, Error>;
