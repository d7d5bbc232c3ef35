//! Validation verdicts

use crate::error::Rejection;
use chrono::{DateTime, Utc};

/// Final outcome of validating one pass
///
/// Rejections carry no detail on purpose: an unknown key and a forged
/// signature look the same to the holder of the pass. The underlying
/// [`Error`](crate::Error) is logged and available through
/// [`check`](crate::check).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Signed by a known key and not yet expired
    Valid {
        name: String,
        expiry: DateTime<Utc>,
    },
    /// Malformed token or payload
    InvalidStructure,
    /// Unknown key identifier or failed signature check
    InvalidSignature,
    /// Well-formed and signed, but past its expiry
    Expired,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid { .. })
    }

    /// Rejection class, or `None` for a valid pass
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Verdict::Valid { .. } => None,
            Verdict::InvalidStructure => Some(Rejection::Structure),
            Verdict::InvalidSignature => Some(Rejection::Signature),
            Verdict::Expired => Some(Rejection::Expired),
        }
    }
}

impl From<Rejection> for Verdict {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Structure => Verdict::InvalidStructure,
            Rejection::Signature => Verdict::InvalidSignature,
            Rejection::Expired => Verdict::Expired,
        }
    }
}
