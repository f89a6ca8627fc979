//! API credentials held in memory only.
//!
//! Secrets are zeroed when dropped and redacted from `Debug`/`Display`, so a
//! stray `debug!(?config)` never leaks them.
//!
//! ```rust
//! use unicex_core::credentials::{Credentials, RequiredCredentials, SecretString};
//!
//! let creds = Credentials {
//!     api_key: Some(SecretString::new("key")),
//!     ..Credentials::default()
//! };
//! assert_eq!(format!("{:?}", creds.api_key), "Some([REDACTED])");
//!
//! let err = creds.check_required("binance", RequiredCredentials::API_KEY_SECRET).unwrap_err();
//! assert!(err.to_string().contains("secret"));
//! ```

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// A string that is zeroed on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value. Use it immediately; do not store it.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret string is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The credential set an exchange may ask for.
#[derive(Clone, Default, Debug)]
pub struct Credentials {
    /// Public API key
    pub api_key: Option<SecretString>,
    /// Signing secret
    pub secret: Option<SecretString>,
    /// Passphrase (OKX calls it `passphrase`)
    pub password: Option<SecretString>,
    /// Account or user id
    pub uid: Option<SecretString>,
}

/// Which credentials an exchange's private endpoints need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct RequiredCredentials {
    /// `api_key` is needed
    pub api_key: bool,
    /// `secret` is needed
    pub secret: bool,
    /// `password` is needed
    pub password: bool,
    /// `uid` is needed
    pub uid: bool,
}

impl RequiredCredentials {
    /// Key and secret, the common case.
    pub const API_KEY_SECRET: Self = Self {
        api_key: true,
        secret: true,
        password: false,
        uid: false,
    };

    /// Key, secret and passphrase.
    pub const API_KEY_SECRET_PASSWORD: Self = Self {
        api_key: true,
        secret: true,
        password: true,
        uid: false,
    };
}

impl Credentials {
    /// Fails with `AuthenticationError` naming the first missing credential.
    pub fn check_required(&self, exchange_id: &str, required: RequiredCredentials) -> Result<()> {
        let checks = [
            ("apiKey", required.api_key, &self.api_key),
            ("secret", required.secret, &self.secret),
            ("password", required.password, &self.password),
            ("uid", required.uid, &self.uid),
        ];

        for (name, needed, value) in checks {
            let present = value.as_ref().is_some_and(|v| !v.is_empty());
            if needed && !present {
                return Err(Error::authentication(format!(
                    "{exchange_id} requires \"{name}\" credential"
                )));
            }
        }
        Ok(())
    }

    /// The API key, or an `AuthenticationError` when it is missing.
    pub fn api_key(&self) -> Result<&str> {
        expose(&self.api_key, "apiKey")
    }

    /// The secret, or an `AuthenticationError` when it is missing.
    pub fn secret(&self) -> Result<&str> {
        expose(&self.secret, "secret")
    }

    /// The passphrase, or an `AuthenticationError` when it is missing.
    pub fn password(&self) -> Result<&str> {
        expose(&self.password, "password")
    }
}

fn expose<'a>(value: &'a Option<SecretString>, name: &str) -> Result<&'a str> {
    value
        .as_ref()
        .map(SecretString::expose_secret)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::authentication(format!("Missing \"{name}\" credential")))
}
