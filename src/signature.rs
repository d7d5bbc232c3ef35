//! Signature verification
//!
//! Passes are signed with ECDSA P-256 / SHA-256 over the UTF-16LE encoding
//! of `header.payload`. Signatures use the fixed-width `r || s` form
//! (IEEE P1363), not ASN.1 DER.

use crate::error::{Error, Result};
use crate::keys::KeySet;
use crate::limits::MAX_DECODED_SIGNATURE_SIZE;
use crate::token::Token;
use crate::utils::base64url;

use aws_lc_rs::signature::{self, UnparsedPublicKey};

/// Verify the token's signature against the key its header selects
///
/// Every failure (unknown or ambiguous kid, unusable key material, bad
/// signature encoding, cryptographic mismatch) is an error. Callers that
/// need a verdict collapse them all into an invalid signature.
pub fn verify(token: &Token, keys: &KeySet) -> Result<()> {
    let key = keys.find(token.header())?;
    let point = key.p256_point()?;
    verify_with_point(&token.signing_input(), token.signature(), &point)
}

/// Verify a Base64URL signature over `message` with an uncompressed P-256 point
pub(crate) fn verify_with_point(message: &[u8], signature: &str, point: &[u8]) -> Result<()> {
    let signature_bytes = base64url::decode_url_bytes(signature, MAX_DECODED_SIGNATURE_SIZE)
        .map_err(|_| Error::SignatureInvalid)?;

    let public_key = UnparsedPublicKey::new(&signature::ECDSA_P256_SHA256_FIXED, point);

    public_key
        .verify(message, &signature_bytes)
        .map_err(|_| Error::SignatureInvalid)
}
