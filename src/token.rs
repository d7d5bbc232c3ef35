//! Token structure: `<kid>.<payload>.<signature>`

use crate::error::{Error, Result};
use crate::limits::MAX_TOKEN_LENGTH;

/// A health-pass token split into its three segments
///
/// No segment is decoded at this stage. The header is an opaque key
/// identifier; payload and signature are still in their unpadded Base64
/// transport form, which is also what the signature covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    header: String,
    payload: String,
    signature: String,
}

impl Token {
    /// Split a raw token string into header, payload and signature
    ///
    /// Succeeds only for exactly three non-empty segments.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() > MAX_TOKEN_LENGTH {
            return Err(Error::TokenTooLarge {
                size: raw.len(),
                max: MAX_TOKEN_LENGTH,
            });
        }

        let mut parts = raw.split('.');
        let header = parts.next().ok_or(Error::FormatInvalid)?;
        let payload = parts.next().ok_or(Error::FormatInvalid)?;
        let signature = parts.next().ok_or(Error::FormatInvalid)?;
        if parts.next().is_some() {
            return Err(Error::FormatInvalid);
        }

        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(Error::FormatInvalid);
        }

        Ok(Self {
            header: header.to_string(),
            payload: payload.to_string(),
            signature: signature.to_string(),
        })
    }

    /// Key identifier segment
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Payload segment (unpadded Base64)
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Signature segment (unpadded Base64URL)
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Bytes covered by the signature
    ///
    /// The issuer signs `header.payload` encoded as UTF-16LE, not UTF-8.
    pub fn signing_input(&self) -> Vec<u8> {
        utf16le(&format!("{}.{}", self.header, self.payload))
    }
}

fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}
