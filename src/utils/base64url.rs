//! Base64 helpers for token segments
//!
//! Token segments travel without `=` padding. They are right-padded to a
//! multiple of four before decoding, so the strict padded engines of the
//! `base64` crate do the actual work. Signatures use the URL-safe alphabet,
//! payloads the standard one.

use crate::error::{Error, Result};
use base64::{
    Engine,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE},
};

/// Right-pad `input` with `=` to the next multiple of four characters
pub(crate) fn pad(input: &str) -> String {
    let missing = (4 - input.len() % 4) % 4;
    let mut padded = String::with_capacity(input.len() + missing);
    padded.push_str(input);
    padded.extend(std::iter::repeat_n('=', missing));
    padded
}

/// Decode an unpadded Base64URL string (`-`/`_` alphabet) with a size limit
pub(crate) fn decode_url_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    let result = URL_SAFE
        .decode(pad(input))
        .map_err(|e| Error::FormatInvalidBase64(format!("Base64URL decode failed: {e}")))?;
    check_size(result, max_size)
}

/// Decode an unpadded standard Base64 string (`+`/`/` alphabet) with a size limit
pub(crate) fn decode_standard_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    let result = STANDARD
        .decode(pad(input))
        .map_err(|e| Error::FormatInvalidBase64(format!("Base64 decode failed: {e}")))?;
    check_size(result, max_size)
}

/// Encode bytes as standard Base64 without padding
pub(crate) fn encode_standard_bytes(input: &[u8]) -> String {
    STANDARD_NO_PAD.encode(input)
}

fn check_size(bytes: Vec<u8>, max_size: usize) -> Result<Vec<u8>> {
    if bytes.len() > max_size {
        return Err(Error::FormatInvalidBase64(format!(
            "Decoded size exceeds limit: {} bytes (max: {})",
            bytes.len(),
            max_size
        )));
    }
    Ok(bytes)
}
