//! Size limit constants for input validation

/// Maximum length for a token string (4KB)
/// A version 40 QR code holds at most 2953 bytes of binary data
pub(crate) const MAX_TOKEN_LENGTH: usize = 4 * 1024;

/// Maximum size for decoded payload bytes (3KB)
/// Base64 of any payload segment that fits in a token decodes below this
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = MAX_TOKEN_LENGTH / 4 * 3;

/// Maximum size for decoded signature bytes (512 bytes)
/// P-256 signatures are 64 bytes in fixed-width form
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 512;

/// Maximum length for the key set endpoint URL (2048 characters)
#[cfg(feature = "remote")]
pub(crate) const MAX_ENDPOINT_URL_LENGTH: usize = 2048;

// ============================================================================
// Key set limits
// ============================================================================

/// Maximum size for a key set document, remote or on disk (512KB)
pub(crate) const MAX_KEY_SET_RESPONSE_SIZE: usize = 512 * 1024;

/// Maximum number of keys in a key set (100 keys)
pub(crate) const MAX_KEY_SET_SIZE: usize = 100;

/// Maximum size for a PEM-encoded public key (8KB)
pub(crate) const MAX_PUBLIC_KEY_PEM_SIZE: usize = 8 * 1024;
