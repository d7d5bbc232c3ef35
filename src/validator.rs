//! Pass validation pipeline
//!
//! A pass moves through `parse → verify signature → decode payload → check
//! expiry`, stopping at the first failure. [`check`] exposes the failure as an
//! [`Error`]; [`validate`] folds it into a [`Verdict`].
//!
//! [`PassValidator`] is configured once with keys and reused across passes.
//! The token is parsed before any key set is fetched, so malformed input never
//! causes a network request.

use crate::error::{Error, Result};
use crate::expiry;
use crate::keys::KeySet;
use crate::keys::source::KeySource;
use crate::payload;
use crate::signature;
use crate::token::Token;
use crate::verdict::Verdict;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A pass that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthPass {
    pub name: String,
    pub expiry: DateTime<Utc>,
}

impl From<HealthPass> for Verdict {
    fn from(pass: HealthPass) -> Self {
        Verdict::Valid {
            name: pass.name,
            expiry: pass.expiry,
        }
    }
}

/// Run every validation stage and return the first error
pub fn check(raw: &str, keys: &KeySet, now: DateTime<Utc>) -> Result<HealthPass> {
    let token = Token::parse(raw)?;
    check_token(&token, keys, now)
}

/// Validate a raw pass against a key set at instant `now`
pub fn validate(raw: &str, keys: &KeySet, now: DateTime<Utc>) -> Verdict {
    conclude(check(raw, keys, now))
}

fn check_token(token: &Token, keys: &KeySet, now: DateTime<Utc>) -> Result<HealthPass> {
    debug!(kid = token.header(), "Token parsed");

    signature::verify(token, keys)?;
    debug!(kid = token.header(), "Signature verified");

    let decoded = payload::decode(token.payload())?;
    debug!(expiry = %decoded.expiry, "Payload decoded");

    let expiry = expiry::check(&decoded.expiry, now)?;

    Ok(HealthPass {
        name: decoded.name,
        expiry,
    })
}

fn conclude(result: Result<HealthPass>) -> Verdict {
    match result {
        Ok(pass) => {
            info!(expiry = %pass.expiry, "Pass valid");
            pass.into()
        }
        Err(error) => {
            warn!(%error, "Pass rejected");
            // Stage errors always classify; anything else fails closed
            error
                .rejection()
                .map(Verdict::from)
                .unwrap_or(Verdict::InvalidSignature)
        }
    }
}

/// Reusable pass validator
///
/// ```ignore
/// let validator = PassValidator::new().source(config.build_source()?).build();
/// match validator.verify(token)? {
///     Verdict::Valid { name, .. } => println!("{name}"),
///     other => println!("{other:?}"),
/// }
/// ```
#[derive(Clone)]
pub struct PassValidator {
    config_keys: Option<Arc<dyn KeySource>>,
}

impl PassValidator {
    /// Create a validator with no keys configured
    pub fn new() -> Self {
        Self { config_keys: None }
    }

    /// Configure a static key set
    pub fn keys(&mut self, keys: KeySet) -> &mut Self {
        self.config_keys = Some(Arc::new(keys));
        self
    }

    /// Configure a key source consulted on every verification
    pub fn source(&mut self, source: impl KeySource + 'static) -> &mut Self {
        self.config_keys = Some(Arc::new(source));
        self
    }

    pub fn build(&mut self) -> Self {
        self.clone()
    }
}

impl Default for PassValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl PassValidator {
    /// Validate a pass at the current time
    pub fn verify(&self, token: &str) -> Result<Verdict> {
        self.verify_at(token, Utc::now())
    }

    /// Validate a pass at instant `now`
    ///
    /// Rejections are returned as verdicts. The only errors are a key source
    /// that cannot supply a key set and a validator built without keys.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Verdict> {
        let source = self.config_keys.as_ref().ok_or_else(|| {
            Error::ConfigurationInvalid("Must configure keys or a key source".into())
        })?;

        let token = match Token::parse(token) {
            Ok(token) => token,
            Err(error) => return Ok(conclude(Err(error))),
        };

        let keys = source.fetch().inspect_err(|error| {
            warn!(source = source.name(), %error, "Key set unavailable");
        })?;

        Ok(conclude(check_token(&token, &keys, now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::VerificationKey;
    use crate::payload::{DecodedPayload, ExpiryFields};
    use aws_lc_rs::rand::SystemRandom;
    use aws_lc_rs::signature::{ECDSA_P256_SHA256_FIXED_SIGNING, EcdsaKeyPair, KeyPair};
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Issuer {
        keypair: EcdsaKeyPair,
    }

    impl Issuer {
        fn new() -> Self {
            let rng = SystemRandom::new();
            let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
                .expect("Failed to generate key");
            let keypair =
                EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8.as_ref())
                    .expect("Failed to parse key");
            Self { keypair }
        }

        fn key_set(&self, kid: &str) -> KeySet {
            let key = VerificationKey::from_p256_point(kid, self.keypair.public_key().as_ref())
                .expect("Failed to encode key");
            KeySet::new(vec![key])
        }

        fn issue(&self, kid: &str, payload: &str) -> String {
            let unsigned = Token::parse(&format!("{kid}.{payload}.x")).unwrap();
            let signature = self
                .keypair
                .sign(&SystemRandom::new(), &unsigned.signing_input())
                .expect("Signing failed");
            format!("{kid}.{payload}.{}", URL_SAFE_NO_PAD.encode(signature.as_ref()))
        }
    }

    fn jane_doe() -> String {
        payload::encode(&DecodedPayload {
            expiry: ExpiryFields::new("25", "01", "15", "09", "30"),
            name: "JANE DOE".into(),
        })
        .unwrap()
    }

    fn expiry_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()
    }

    struct CountingSource {
        keys: KeySet,
        calls: Arc<AtomicUsize>,
    }

    impl KeySource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn fetch(&self) -> Result<KeySet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.keys.clone())
        }
    }

    struct UnavailableSource;

    impl KeySource for UnavailableSource {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        fn fetch(&self) -> Result<KeySet> {
            Err(Error::SourceUnavailable {
                primary: "network: timed out".into(),
                fallback: "cache/keys.json: not found".into(),
            })
        }
    }

    #[test]
    fn test_check_valid() {
        let issuer = Issuer::new();
        let token = issuer.issue("X", &jane_doe());

        let pass = check(&token, &issuer.key_set("X"), expiry_instant()).unwrap();
        assert_eq!(pass.name, "JANE DOE");
        assert_eq!(pass.expiry, expiry_instant());
    }

    #[test]
    fn test_validate_stages() {
        let issuer = Issuer::new();
        let keys = issuer.key_set("X");
        let now = expiry_instant();

        assert_eq!(validate("not-a-token", &keys, now), Verdict::InvalidStructure);
        assert_eq!(
            validate(&issuer.issue("Y", &jane_doe()), &keys, now),
            Verdict::InvalidSignature
        );
        assert_eq!(
            validate(&issuer.issue("X", &jane_doe()), &keys, now + chrono::Duration::minutes(1)),
            Verdict::Expired
        );
    }

    #[test]
    fn test_short_payload_after_valid_signature() {
        let issuer = Issuer::new();
        let token = issuer.issue("X", "AAECAw");

        assert!(matches!(
            check(&token, &issuer.key_set("X"), expiry_instant()),
            Err(Error::PayloadTooShort { .. })
        ));
        assert_eq!(
            validate(&token, &issuer.key_set("X"), expiry_instant()),
            Verdict::InvalidStructure
        );
    }

    #[test]
    fn test_signature_checked_before_payload() {
        // Unsigned garbage payload must fail on the signature, not the decode
        let issuer = Issuer::new();
        let forged = format!("X.AAEC.{}", URL_SAFE_NO_PAD.encode([0u8; 64]));

        assert_eq!(
            validate(&forged, &issuer.key_set("X"), expiry_instant()),
            Verdict::InvalidSignature
        );
    }

    #[test]
    fn test_validator_requires_keys() {
        let validator = PassValidator::new().build();
        assert!(matches!(
            validator.verify("a.b.c"),
            Err(Error::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn test_validator_with_static_keys() {
        let issuer = Issuer::new();
        let validator = PassValidator::new().keys(issuer.key_set("X")).build();

        let verdict = validator
            .verify_at(&issuer.issue("X", &jane_doe()), expiry_instant())
            .unwrap();
        assert_eq!(
            verdict,
            Verdict::Valid {
                name: "JANE DOE".into(),
                expiry: expiry_instant(),
            }
        );
    }

    #[test]
    fn test_validator_source_unavailable_is_fatal() {
        let issuer = Issuer::new();
        let validator = PassValidator::new().source(UnavailableSource).build();

        let result = validator.verify_at(&issuer.issue("X", &jane_doe()), expiry_instant());
        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }

    #[test]
    fn test_malformed_token_skips_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let validator = PassValidator::new()
            .source(CountingSource {
                keys: KeySet::default(),
                calls: calls.clone(),
            })
            .build();

        assert_eq!(validator.verify("a..c").unwrap(), Verdict::InvalidStructure);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Structural errors win even when no key set is reachable
        let offline = PassValidator::new().source(UnavailableSource).build();
        assert_eq!(offline.verify("a.b").unwrap(), Verdict::InvalidStructure);
    }

    #[test]
    fn test_validator_clones_share_source() {
        let issuer = Issuer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let validator = PassValidator::new()
            .source(CountingSource {
                keys: issuer.key_set("X"),
                calls: calls.clone(),
            })
            .build();
        let clone = validator.clone();
        let token = issuer.issue("X", &jane_doe());

        assert!(validator.verify_at(&token, expiry_instant()).unwrap().is_valid());
        assert!(clone.verify_at(&token, expiry_instant()).unwrap().is_valid());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
