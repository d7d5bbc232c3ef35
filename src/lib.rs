//! # healthpass - Health pass QR token validation
//!
//! A health pass is a compact signed token carried in a QR code:
//!
//! ```text
//! <kid>.<payload>.<signature>
//! ```
//!
//! - `kid` selects the issuer's public key from a published key set.
//! - `payload` is standard Base64 (unpadded) of a small binary record: one
//!   reserved byte, five two-character expiry fields (`YY MM DD hh mm`) and
//!   the holder's name in UTF-8.
//! - `signature` is Base64URL (unpadded) of an ECDSA P-256 / SHA-256
//!   signature in fixed `r || s` form, computed over the UTF-16LE encoding of
//!   `kid.payload`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use healthpass::{KeySourceConfig, PassValidator, report};
//!
//! let source = KeySourceConfig::default().build_source()?;
//! let validator = PassValidator::new().source(source).build();
//!
//! let verdict = validator.verify(scanned)?;
//! println!("{}", report::render(&verdict));
//! ```
//!
//! ## Validation Flow
//!
//! ```text
//! raw token
//!     │ Token::parse            → InvalidStructure
//!     ▼
//! signature::verify (KeySet)    → InvalidSignature
//!     │
//!     ▼
//! payload::decode               → InvalidStructure
//!     │
//!     ▼
//! expiry check (now)            → Expired
//!     │
//!     ▼
//! Verdict::Valid { name, expiry }
//! ```
//!
//! Every stage fails fast. Internal [`Error`]s keep their detail for logs;
//! [`validate`] and [`PassValidator`] collapse them into a [`Verdict`]. The
//! only errors that escape a validator are an unreachable key source and a
//! validator built without keys.
//!
//! ## Key Sources
//!
//! Keys come from a [`KeySource`]. [`KeySourceConfig`] builds the standard
//! chain: HTTP endpoint, falling back to a local file, cached in memory.
//! The HTTP source needs the `remote` feature (enabled by default).

mod error;
mod keys;
mod verdict;

// Internal modules
pub(crate) mod config;
pub(crate) mod token;
#[cfg(feature = "remote")]
pub(crate) mod url;
pub(crate) mod utils;
pub(crate) mod validator;

// Pipeline stages
pub mod expiry;
pub mod payload;
pub mod report;
pub mod signature;

// Public Interface
pub use config::{DEFAULT_CACHE_PATH, DEFAULT_KEYS_URL, DEFAULT_TIMEOUT, KeySourceConfig};
pub use error::{Error, Rejection, Result};
pub use keys::caching::{CachingKeySource, DEFAULT_KEY_SET_TTL};
pub use keys::source::{FallbackKeySource, FileKeySource, KeySource};
pub use keys::{KeySet, VerificationKey};
pub use payload::{DecodedPayload, ExpiryFields};
pub use token::Token;
pub use validator::{HealthPass, PassValidator, check, validate};
pub use verdict::Verdict;

#[cfg(feature = "remote")]
pub use keys::remote::HttpKeySource;

pub(crate) mod limits;
