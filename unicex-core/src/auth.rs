//! Signing primitives for exchange authentication.
//!
//! - Keyless digests and HMAC over SHA-1, SHA-256, SHA-384, SHA-512 and MD5
//! - Hex, base64 or raw output
//! - Deterministic (sorted) query-string encoding for signature payloads
//! - HS256/HS384/HS512 JWT tokens
//!
//! An unsupported algorithm or encoding is an adapter bug, so every failure
//! here is an `InternalError`.

use base64::{Engine as _, engine::general_purpose};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use serde_json::{Map, Value, json};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::parser_utils::value_to_string;

/// Supported hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-1
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// MD5
    Md5,
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "md5" => Ok(HashAlgorithm::Md5),
            _ => Err(Error::internal(format!("Unsupported hash algorithm: {s}"))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Md5 => "md5",
        };
        write!(f, "{s}")
    }
}

/// Output encoding for digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestFormat {
    /// Lowercase hexadecimal
    Hex,
    /// Standard base64 with padding
    Base64,
    /// Raw bytes; only available through the `*_bytes` functions
    Binary,
}

impl FromStr for DigestFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hex" => Ok(DigestFormat::Hex),
            "base64" => Ok(DigestFormat::Base64),
            "binary" | "raw" => Ok(DigestFormat::Binary),
            _ => Err(Error::internal(format!("Unsupported digest encoding: {s}"))),
        }
    }
}

/// Keyless digest of `data`, raw bytes.
pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        HashAlgorithm::Md5 => md5::Md5::digest(data).to_vec(),
    }
}

/// Keyless digest of `data`, encoded as text.
///
/// # Examples
/// ```
/// use unicex_core::auth::{hash, DigestFormat, HashAlgorithm};
///
/// let hashed = hash("abc", HashAlgorithm::Md5, DigestFormat::Hex).unwrap();
/// assert_eq!(hashed, "900150983cd24fb0d6963f7d28e17f72");
/// ```
pub fn hash(data: &str, algorithm: HashAlgorithm, digest: DigestFormat) -> Result<String> {
    encode_bytes(&hash_bytes(data.as_bytes(), algorithm), digest)
}

/// HMAC of `data` under `secret`, raw bytes.
pub fn hmac_bytes(data: &[u8], secret: &[u8], algorithm: HashAlgorithm) -> Result<Vec<u8>> {
    match algorithm {
        HashAlgorithm::Sha1 => mac::<Hmac<Sha1>>(data, secret),
        HashAlgorithm::Sha256 => mac::<Hmac<Sha256>>(data, secret),
        HashAlgorithm::Sha384 => mac::<Hmac<Sha384>>(data, secret),
        HashAlgorithm::Sha512 => mac::<Hmac<Sha512>>(data, secret),
        HashAlgorithm::Md5 => mac::<Hmac<md5::Md5>>(data, secret),
    }
}

/// HMAC of `message` under `secret`, encoded as text.
///
/// # Examples
/// ```
/// use unicex_core::auth::{hmac_sign, DigestFormat, HashAlgorithm};
///
/// let signature = hmac_sign(
///     "The quick brown fox jumps over the lazy dog",
///     "key",
///     HashAlgorithm::Sha256,
///     DigestFormat::Hex,
/// )
/// .unwrap();
/// assert_eq!(
///     signature,
///     "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
/// );
/// ```
pub fn hmac_sign(
    message: &str,
    secret: &str,
    algorithm: HashAlgorithm,
    digest: DigestFormat,
) -> Result<String> {
    let signature = hmac_bytes(message.as_bytes(), secret.as_bytes(), algorithm)?;
    encode_bytes(&signature, digest)
}

fn mac<M: Mac + KeyInit>(data: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|e| Error::internal(format!("Invalid HMAC key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Renders digest bytes as text.
///
/// # Errors
/// [`DigestFormat::Binary`] has no text form; asking for one is an
/// `InternalError`.
pub fn encode_bytes(bytes: &[u8], digest: DigestFormat) -> Result<String> {
    match digest {
        DigestFormat::Hex => Ok(hex::encode(bytes)),
        DigestFormat::Base64 => Ok(general_purpose::STANDARD.encode(bytes)),
        DigestFormat::Binary => Err(Error::internal(
            "Binary digest has no text form; use the *_bytes functions",
        )),
    }
}

/// Standard base64 with padding.
pub fn base64_encode(data: impl AsRef<[u8]>) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Decodes standard base64, e.g. a secret that exchanges hand out encoded.
pub fn base64_decode(data: &str) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(data)
        .map_err(|e| Error::authentication(format!("Secret is not valid base64: {e}")))
}

/// URL-safe base64 without padding, as used in JWTs.
pub fn base64url_encode(data: impl AsRef<[u8]>) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(data)
}

// ============================================================================
// Query strings
// ============================================================================

/// Encodes a parameter map as `k=v&...` with keys sorted and both sides
/// percent-encoded. Null values are skipped; containers are sent as JSON.
///
/// ```
/// use serde_json::json;
/// use unicex_core::auth::urlencode;
///
/// let params = json!({"symbol": "BTC/USDT", "limit": 5, "a": null});
/// assert_eq!(urlencode(params.as_object().unwrap()), "limit=5&symbol=BTC%2FUSDT");
/// ```
pub fn urlencode(params: &Map<String, Value>) -> String {
    join_sorted(params, |s| urlencoding::encode(s).into_owned())
}

/// Like [`urlencode`] but without percent-encoding, for payloads an exchange
/// signs verbatim.
pub fn rawencode(params: &Map<String, Value>) -> String {
    join_sorted(params, str::to_string)
}

fn join_sorted(params: &Map<String, Value>, encode: impl Fn(&str) -> String) -> String {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();

    keys.into_iter()
        .filter_map(|key| {
            let value = &params[key.as_str()];
            let text = match value {
                Value::Null => return None,
                Value::Array(_) | Value::Object(_) => value.to_string(),
                scalar => value_to_string(scalar)?,
            };
            Some(format!("{}={}", encode(key), encode(&text)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

// ============================================================================
// JWT
// ============================================================================

/// Builds an HMAC-signed JWT (`HS256`, `HS384` or `HS512`).
///
/// # Errors
/// Algorithms other than SHA-256/384/512 are an `InternalError`.
pub fn jwt(payload: &Value, secret: &[u8], algorithm: HashAlgorithm) -> Result<String> {
    let alg = match algorithm {
        HashAlgorithm::Sha256 => "HS256",
        HashAlgorithm::Sha384 => "HS384",
        HashAlgorithm::Sha512 => "HS512",
        other => return Err(Error::internal(format!("JWT does not support {other}"))),
    };

    let header = json!({"alg": alg, "typ": "JWT"});
    let signing_input = format!(
        "{}.{}",
        base64url_encode(header.to_string()),
        base64url_encode(payload.to_string())
    );
    let signature = hmac_bytes(signing_input.as_bytes(), secret, algorithm)?;
    Ok(format!("{signing_input}.{}", base64url_encode(signature)))
}
