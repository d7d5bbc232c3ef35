//! DER and PEM handling for EC public keys
//!
//! Key sets carry PEM "PUBLIC KEY" blocks (DER SubjectPublicKeyInfo). This
//! module uses the RustCrypto `spki` and `der` crates to check that a key is
//! an `id-ecPublicKey` on `prime256v1` and to extract the uncompressed point
//! that the aws-lc-rs verifier consumes.

use crate::error::{Error, Result};
use der::{Decode, Encode, asn1::BitString};
use spki::{
    AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned, SubjectPublicKeyInfoRef,
};

/// id-ecPublicKey (RFC 5480)
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// secp256r1 / prime256v1 (RFC 5480)
const SECP256R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// PEM label for SubjectPublicKeyInfo
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

/// Length of an uncompressed P-256 point (0x04 || X || Y)
const P256_POINT_LENGTH: usize = 65;

fn key_error(operation: &str, details: impl std::fmt::Display) -> String {
    format!("{operation}: {details}")
}

/// Decode a PEM "PUBLIC KEY" block into DER bytes
pub(crate) fn pem_to_der(pem_data: &str) -> std::result::Result<Vec<u8>, String> {
    let pem_obj =
        ::pem::parse(pem_data.as_bytes()).map_err(|e| key_error("failed to parse PEM", e))?;

    if pem_obj.tag() != PUBLIC_KEY_LABEL {
        return Err(key_error(
            "unexpected PEM label",
            format!("expected '{PUBLIC_KEY_LABEL}', found '{}'", pem_obj.tag()),
        ));
    }

    Ok(pem_obj.contents().to_vec())
}

/// Extract the uncompressed P-256 point from a DER SubjectPublicKeyInfo
pub(crate) fn p256_point_from_spki(spki_der: &[u8]) -> std::result::Result<Vec<u8>, String> {
    let spki = SubjectPublicKeyInfoRef::from_der(spki_der)
        .map_err(|e| key_error("failed to decode SPKI", e))?;

    if spki.algorithm.oid != EC_PUBLIC_KEY_OID {
        return Err(key_error("not an EC key", spki.algorithm.oid));
    }

    let curve = spki
        .algorithm
        .parameters_oid()
        .map_err(|e| key_error("missing curve parameters", e))?;
    if curve != SECP256R1_OID {
        return Err(key_error("unsupported curve", curve));
    }

    let point = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| key_error("malformed public key bit string", "unused bits"))?;

    if point.len() != P256_POINT_LENGTH || point[0] != 0x04 {
        return Err(key_error(
            "expected uncompressed P-256 point",
            format!("{} bytes", point.len()),
        ));
    }

    Ok(point.to_vec())
}

/// Build DER SubjectPublicKeyInfo for an uncompressed P-256 point
pub(crate) fn p256_spki_from_point(point: &[u8]) -> Result<Vec<u8>> {
    if point.len() != P256_POINT_LENGTH || point[0] != 0x04 {
        return Err(Error::ConfigurationInvalid(format!(
            "expected uncompressed P-256 point of {P256_POINT_LENGTH} bytes, found {}",
            point.len()
        )));
    }

    let parameters = der::Any::encode_from(&SECP256R1_OID)
        .map_err(|e| Error::ConfigurationInvalid(key_error("failed to encode curve", e)))?;

    let algorithm = AlgorithmIdentifierOwned {
        oid: EC_PUBLIC_KEY_OID,
        parameters: Some(parameters),
    };

    let subject_public_key = BitString::from_bytes(point)
        .map_err(|e| Error::ConfigurationInvalid(key_error("failed to create bit string", e)))?;

    let spki = SubjectPublicKeyInfoOwned {
        algorithm,
        subject_public_key,
    };

    spki.to_der()
        .map_err(|e| Error::ConfigurationInvalid(key_error("failed to encode SPKI", e)))
}

/// Wrap DER SubjectPublicKeyInfo bytes in a PEM "PUBLIC KEY" block
pub(crate) fn der_to_pem(spki_der: Vec<u8>) -> String {
    let config = ::pem::EncodeConfig::new().set_line_ending(::pem::LineEnding::LF);
    ::pem::encode_config(&::pem::Pem::new(PUBLIC_KEY_LABEL, spki_der), config)
}
