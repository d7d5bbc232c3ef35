//! Binary payload codec
//!
//! Decoded payload layout:
//!
//! ```text
//! byte  0      reserved, ignored on decode
//! bytes 1..=10 five 2-byte text fields: YY MM DD hh mm
//! bytes 11..   subject name, UTF-8
//! ```

use crate::error::{Error, Result};
use crate::limits::MAX_DECODED_PAYLOAD_SIZE;
use crate::utils::base64url;

/// Width of each expiry field in bytes
pub(crate) const FIELD_WIDTH: usize = 2;

/// Offset of the first expiry field
const EXPIRY_OFFSET: usize = 1;

/// Offset of the subject name; also the minimum decoded length
const NAME_OFFSET: usize = EXPIRY_OFFSET + 5 * FIELD_WIDTH;

/// Reserved leading byte written by [`encode`]
pub const RESERVED_BYTE: u8 = 0x00;

/// Expiry as carried in the payload: five 2-character fields, UTC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryFields {
    /// Two-digit year within the 2000s
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
}

impl ExpiryFields {
    pub fn new(
        year: impl Into<String>,
        month: impl Into<String>,
        day: impl Into<String>,
        hour: impl Into<String>,
        minute: impl Into<String>,
    ) -> Self {
        Self {
            year: year.into(),
            month: month.into(),
            day: day.into(),
            hour: hour.into(),
            minute: minute.into(),
        }
    }

    fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("year", self.year.as_str()),
            ("month", self.month.as_str()),
            ("day", self.day.as_str()),
            ("hour", self.hour.as_str()),
            ("minute", self.minute.as_str()),
        ]
    }
}

impl std::fmt::Display for ExpiryFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "20{}-{}-{} {}:{}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

/// Payload contents after decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub expiry: ExpiryFields,
    pub name: String,
}

/// Decode a payload segment
pub fn decode(payload: &str) -> Result<DecodedPayload> {
    let bytes = base64url::decode_standard_bytes(payload, MAX_DECODED_PAYLOAD_SIZE)?;
    decode_bytes(&bytes)
}

/// Decode raw payload bytes
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedPayload> {
    if bytes.len() < NAME_OFFSET {
        return Err(Error::PayloadTooShort {
            length: bytes.len(),
            min: NAME_OFFSET,
        });
    }

    let field = |index: usize, name: &'static str| -> Result<String> {
        let start = EXPIRY_OFFSET + index * FIELD_WIDTH;
        text(&bytes[start..start + FIELD_WIDTH], name)
    };

    let expiry = ExpiryFields {
        year: field(0, "year")?,
        month: field(1, "month")?,
        day: field(2, "day")?,
        hour: field(3, "hour")?,
        minute: field(4, "minute")?,
    };
    let name = text(&bytes[NAME_OFFSET..], "name")?;

    Ok(DecodedPayload { expiry, name })
}

/// Encode a payload into its transport form (standard Base64, unpadded)
pub fn encode(payload: &DecodedPayload) -> Result<String> {
    let bytes = encode_bytes(RESERVED_BYTE, payload)?;
    Ok(base64url::encode_standard_bytes(&bytes))
}

/// Encode a payload into raw bytes with a caller-chosen reserved byte
pub fn encode_bytes(reserved: u8, payload: &DecodedPayload) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(NAME_OFFSET + payload.name.len());
    bytes.push(reserved);

    for (field, value) in payload.expiry.fields() {
        if value.len() != FIELD_WIDTH {
            return Err(Error::PayloadFieldWidth {
                field,
                length: value.len(),
            });
        }
        bytes.extend_from_slice(value.as_bytes());
    }

    bytes.extend_from_slice(payload.name.as_bytes());
    Ok(bytes)
}

fn text(bytes: &[u8], field: &'static str) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(ToString::to_string)
        .map_err(|_| Error::PayloadInvalidText { field })
}
