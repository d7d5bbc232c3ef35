//! Shared fixtures: a test issuer that signs passes the way the real one does

#![allow(dead_code)]

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{ECDSA_P256_SHA256_FIXED_SIGNING, EcdsaKeyPair, KeyPair};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeZone, Utc};
use healthpass::{DecodedPayload, ExpiryFields, KeySet, Token, VerificationKey, payload};

pub struct Issuer {
    pub kid: String,
    keypair: EcdsaKeyPair,
}

impl Issuer {
    pub fn new(kid: &str) -> Self {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
            .expect("Failed to generate key");
        let keypair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8.as_ref())
            .expect("Failed to parse key");
        Self {
            kid: kid.to_string(),
            keypair,
        }
    }

    pub fn key(&self) -> VerificationKey {
        VerificationKey::from_p256_point(&self.kid, self.keypair.public_key().as_ref())
            .expect("Failed to encode key")
    }

    pub fn key_set(&self) -> KeySet {
        KeySet::new(vec![self.key()])
    }

    /// Key set as the endpoint publishes it
    pub fn key_set_json(&self) -> String {
        let key = self.key();
        format!(
            r#"[{{"kid":"{}","publicKey":"{}"}}]"#,
            key.kid(),
            key.public_key_pem().replace('\n', "\\n")
        )
    }

    /// Sign `kid.payload` over UTF-16LE and return the full token
    pub fn issue(&self, payload: &str) -> String {
        let unsigned = Token::parse(&format!("{}.{payload}.x", self.kid)).unwrap();
        self.issue_over(payload, &unsigned.signing_input())
    }

    /// Token for `payload` whose signature covers arbitrary `message` bytes
    pub fn issue_over(&self, payload: &str, message: &[u8]) -> String {
        let signature = self
            .keypair
            .sign(&SystemRandom::new(), message)
            .expect("Signing failed");
        format!(
            "{}.{payload}.{}",
            self.kid,
            URL_SAFE_NO_PAD.encode(signature.as_ref())
        )
    }
}

pub fn encode_payload(expiry: [&str; 5], name: &str) -> String {
    let [year, month, day, hour, minute] = expiry;
    payload::encode(&DecodedPayload {
        expiry: ExpiryFields::new(year, month, day, hour, minute),
        name: name.to_string(),
    })
    .expect("Failed to encode payload")
}

/// `{25,01,15,09,30}` + `JANE DOE`
pub fn jane_doe() -> String {
    encode_payload(["25", "01", "15", "09", "30"], "JANE DOE")
}

/// 2025-01-15 09:30 UTC
pub fn jane_doe_expiry() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()
}
