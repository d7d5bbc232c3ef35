//! Verification keys and key sets
//!
//! A key set is the JSON array published by the pass issuer:
//!
//! ```json
//! [{"kid": "...", "publicKey": "-----BEGIN PUBLIC KEY-----\n..."}]
//! ```
//!
//! Lookup is by exact match on the token header. Keys are only parsed when
//! a token actually selects them.

pub(crate) mod caching;
#[cfg(feature = "remote")]
pub(crate) mod remote;
pub(crate) mod source;

use crate::error::{Error, Result};
use crate::limits::{MAX_KEY_SET_SIZE, MAX_PUBLIC_KEY_PEM_SIZE};
use crate::utils::der;
use miniserde::Deserialize;

/// A public key published under a key identifier
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerificationKey {
    kid: String,
    #[serde(rename = "publicKey")]
    public_key: String,
}

impl VerificationKey {
    /// Create a key from its identifier and PEM-encoded SubjectPublicKeyInfo
    pub fn new(kid: impl Into<String>, public_key_pem: impl Into<String>) -> Self {
        Self {
            kid: kid.into(),
            public_key: public_key_pem.into(),
        }
    }

    /// Create a key from an uncompressed P-256 point (`0x04 || X || Y`)
    pub fn from_p256_point(kid: impl Into<String>, point: &[u8]) -> Result<Self> {
        let spki = der::p256_spki_from_point(point)?;
        Ok(Self::new(kid, der::der_to_pem(spki)))
    }

    /// Key identifier
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// PEM-encoded public key as published
    pub fn public_key_pem(&self) -> &str {
        &self.public_key
    }

    /// Uncompressed P-256 point for signature verification
    pub(crate) fn p256_point(&self) -> Result<Vec<u8>> {
        if self.public_key.len() > MAX_PUBLIC_KEY_PEM_SIZE {
            return Err(self.invalid(format!(
                "PEM too large: {} bytes (maximum: {MAX_PUBLIC_KEY_PEM_SIZE} bytes)",
                self.public_key.len()
            )));
        }

        let spki = der::pem_to_der(&self.public_key).map_err(|reason| self.invalid(reason))?;
        der::p256_point_from_spki(&spki).map_err(|reason| self.invalid(reason))
    }

    fn invalid(&self, reason: String) -> Error {
        Error::KeyInvalid {
            kid: self.kid.clone(),
            reason,
        }
    }
}

/// The set of keys a pass may be signed with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<VerificationKey>,
}

impl KeySet {
    pub fn new(keys: Vec<VerificationKey>) -> Self {
        Self { keys }
    }

    /// Parse a key set from its JSON array form
    pub fn from_json(json: &str) -> Result<Self> {
        let keys: Vec<VerificationKey> = miniserde::json::from_str(json)
            .map_err(|_| Error::KeySetInvalidJson("expected array of {kid, publicKey}".into()))?;

        if keys.len() > MAX_KEY_SET_SIZE {
            return Err(Error::KeySetTooLarge {
                key_count: keys.len(),
                max: MAX_KEY_SET_SIZE,
            });
        }

        Ok(Self::new(keys))
    }

    /// Find the key whose identifier equals `kid`
    ///
    /// Returns an error if no key matches, or if several keys share the
    /// identifier (ambiguous, so verification must fail).
    pub fn find(&self, kid: &str) -> Result<&VerificationKey> {
        let mut matches = self.keys.iter().filter(|k| k.kid == kid);

        match (matches.next(), matches.count()) {
            (None, _) => Err(Error::KeyNotFound(kid.into())),
            (Some(key), 0) => Ok(key),
            (Some(_), extra) => Err(Error::MultipleKeysFound {
                kid: kid.into(),
                count: extra + 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VerificationKey> {
        self.keys.iter()
    }
}

impl FromIterator<VerificationKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = VerificationKey>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS_JSON: &str = r#"[
        {"kid": "k1", "publicKey": "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n"},
        {"kid": "k2", "publicKey": "pem2", "extra": true}
    ]"#;

    #[test]
    fn test_from_json() {
        let set = KeySet::from_json(KEYS_JSON).expect("key set parse");
        assert_eq!(set.len(), 2);
        assert_eq!(set.find("k2").unwrap().public_key_pem(), "pem2");
    }

    #[test]
    fn test_from_json_empty_array() {
        let set = KeySet::from_json("[]").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_json_invalid() {
        for json in [
            "{ invalid json }",
            r#"{"keys": []}"#,
            r#"[{"kid": "k1"}]"#,
            r#"[{"kid": 1, "publicKey": "pem"}]"#,
        ] {
            assert!(
                matches!(KeySet::from_json(json), Err(Error::KeySetInvalidJson(_))),
                "expected KeySetInvalidJson for {json}"
            );
        }
    }

    #[test]
    fn test_from_json_too_many_keys() {
        let entries: Vec<String> = (0..=MAX_KEY_SET_SIZE)
            .map(|i| format!(r#"{{"kid":"k{i}","publicKey":"pem"}}"#))
            .collect();
        let json = format!("[{}]", entries.join(","));

        assert!(matches!(
            KeySet::from_json(&json),
            Err(Error::KeySetTooLarge { .. })
        ));
    }

    #[test]
    fn test_find_exact_match_only() {
        let set = KeySet::new(vec![VerificationKey::new("abc", "pem")]);
        assert!(set.find("abc").is_ok());
        assert!(matches!(set.find("ab"), Err(Error::KeyNotFound(_))));
        assert!(matches!(set.find("abc="), Err(Error::KeyNotFound(_))));
        assert!(matches!(set.find("ABC"), Err(Error::KeyNotFound(_))));
    }

    #[test]
    fn test_find_duplicate_kid() {
        let set: KeySet = vec![
            VerificationKey::new("dup", "a"),
            VerificationKey::new("other", "b"),
            VerificationKey::new("dup", "c"),
        ]
        .into_iter()
        .collect();

        assert!(matches!(
            set.find("dup"),
            Err(Error::MultipleKeysFound { count: 2, .. })
        ));
        assert!(set.find("other").is_ok());
    }

    #[test]
    fn test_p256_point_from_pem() {
        let mut point = vec![0x04];
        point.extend([7u8; 64]);
        let key = VerificationKey::from_p256_point("k", &point).unwrap();
        assert!(key.public_key_pem().contains("BEGIN PUBLIC KEY"));
        assert_eq!(key.p256_point().unwrap(), point);
    }

    #[test]
    fn test_p256_point_invalid_pem() {
        let key = VerificationKey::new("bad", "garbage");
        assert!(matches!(
            key.p256_point(),
            Err(Error::KeyInvalid { ref kid, .. }) if kid == "bad"
        ));
    }

    #[test]
    fn test_p256_point_oversized_pem() {
        let key = VerificationKey::new("big", "A".repeat(MAX_PUBLIC_KEY_PEM_SIZE + 1));
        assert!(matches!(key.p256_point(), Err(Error::KeyInvalid { .. })));
    }
}
