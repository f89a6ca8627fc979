//! Declarative exchange description and endpoint resolution.
//!
//! An adapter describes its exchange once: base urls per access tier, the
//! endpoint catalog, rate-limit hint, error tables and precision mode. The
//! engine turns the catalog into an [`EndpointTable`] whose entries are
//! addressed by camel-cased names such as `publicGetDepth`.
//!
//! ```
//! use unicex_core::description::{EndpointTable, ExchangeDescription};
//! use unicex_core::signed_request::HttpMethod;
//!
//! let description = ExchangeDescription::new("demo", "Demo")
//!     .url("public", "https://api.demo.com/v1")
//!     .api("public", HttpMethod::Get, &["depth", "ticker/{symbol}"]);
//! let table = EndpointTable::new(&description);
//!
//! let endpoint = table.resolve("publicGetTickerSymbol").unwrap();
//! assert_eq!(endpoint.path, "ticker/{symbol}");
//! assert!(table.resolve("publicGetNothing").is_err());
//! ```

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::classifier::{ExceptionTable, HttpExceptions};
use crate::credentials::RequiredCredentials;
use crate::error::{Error, Result};
use crate::parser_utils::value_to_string;
use crate::precision::PrecisionMode;
use crate::signed_request::HttpMethod;

/// Everything the engine needs to know about one exchange.
#[derive(Debug, Clone)]
pub struct ExchangeDescription {
    /// Lowercase identifier, e.g. `binance`
    pub id: String,
    /// Display name
    pub name: String,
    /// API version label
    pub version: Option<String>,
    /// Minimum spacing between requests, in milliseconds
    pub rate_limit: u64,
    /// Substituted for `{hostname}` in urls
    pub hostname: Option<String>,
    /// Base url per access tier
    pub urls: BTreeMap<String, String>,
    /// Sandbox base url per access tier
    pub test_urls: BTreeMap<String, String>,
    /// Endpoint catalog: (tier, method, paths)
    pub api: Vec<(String, HttpMethod, Vec<String>)>,
    /// Exact and broad error tables
    pub exceptions: ExceptionTable,
    /// Status code table
    pub http_exceptions: HttpExceptions,
    /// How market precision values are expressed
    pub precision_mode: PrecisionMode,
    /// Credentials private endpoints need
    pub required_credentials: RequiredCredentials,
    /// Free-form defaults, merged under the user's options
    pub options: Map<String, Value>,
}

impl ExchangeDescription {
    /// A description with the default HTTP table and a 1s rate limit.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: None,
            rate_limit: 1000,
            hostname: None,
            urls: BTreeMap::new(),
            test_urls: BTreeMap::new(),
            api: Vec::new(),
            exceptions: ExceptionTable::new(),
            http_exceptions: HttpExceptions::default(),
            precision_mode: PrecisionMode::default(),
            required_credentials: RequiredCredentials::API_KEY_SECRET,
            options: Map::new(),
        }
    }

    /// Sets the version label.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the request spacing in milliseconds.
    #[must_use]
    pub fn rate_limit(mut self, millis: u64) -> Self {
        self.rate_limit = millis;
        self
    }

    /// Sets the `{hostname}` substitution.
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Adds a tier base url.
    #[must_use]
    pub fn url(mut self, tier: impl Into<String>, url: impl Into<String>) -> Self {
        self.urls.insert(tier.into(), url.into());
        self
    }

    /// Adds a sandbox tier base url.
    #[must_use]
    pub fn test_url(mut self, tier: impl Into<String>, url: impl Into<String>) -> Self {
        self.test_urls.insert(tier.into(), url.into());
        self
    }

    /// Adds endpoint paths for a tier and method.
    #[must_use]
    pub fn api(mut self, tier: impl Into<String>, method: HttpMethod, paths: &[&str]) -> Self {
        self.api.push((
            tier.into(),
            method,
            paths.iter().map(|p| (*p).to_string()).collect(),
        ));
        self
    }

    /// Replaces the exact/broad tables.
    #[must_use]
    pub fn exceptions(mut self, exceptions: ExceptionTable) -> Self {
        self.exceptions = exceptions;
        self
    }

    /// Replaces the HTTP status table.
    #[must_use]
    pub fn http_exceptions(mut self, http: HttpExceptions) -> Self {
        self.http_exceptions = http;
        self
    }

    /// Sets the precision mode.
    #[must_use]
    pub fn precision_mode(mut self, mode: PrecisionMode) -> Self {
        self.precision_mode = mode;
        self
    }

    /// Sets the credentials private endpoints need.
    #[must_use]
    pub fn required_credentials(mut self, required: RequiredCredentials) -> Self {
        self.required_credentials = required;
        self
    }

    /// Adds a default option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Base url for `tier`.
    ///
    /// `overrides` wins over everything; in sandbox mode the test urls are
    /// used and a tier without one is `NotSupported`.
    pub fn base_url(
        &self,
        tier: &str,
        sandbox: bool,
        overrides: &HashMap<String, String>,
    ) -> Result<String> {
        if let Some(url) = overrides.get(tier) {
            return Ok(url.clone());
        }
        let url = if sandbox {
            self.test_urls.get(tier).ok_or_else(|| {
                Error::not_supported(format!("{} has no sandbox url for \"{tier}\"", self.id))
            })?
        } else {
            self.urls.get(tier).ok_or_else(|| {
                Error::internal(format!("{} has no url for api tier \"{tier}\"", self.id))
            })?
        };
        Ok(match &self.hostname {
            Some(host) => url.replace("{hostname}", host),
            None => url.clone(),
        })
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Camel-cased name, e.g. `privateDeleteOrder`
    pub name: String,
    /// Access tier
    pub tier: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the tier url, may contain `{placeholders}`
    pub path: String,
}

/// Name-addressable endpoint catalog.
#[derive(Debug, Clone, Default)]
pub struct EndpointTable {
    endpoints: HashMap<String, Endpoint>,
}

impl EndpointTable {
    /// Builds the table from a description's catalog.
    pub fn new(description: &ExchangeDescription) -> Self {
        let mut endpoints = HashMap::new();
        for (tier, method, paths) in &description.api {
            for path in paths {
                let name = endpoint_name(tier, *method, path);
                endpoints.insert(
                    name.clone(),
                    Endpoint {
                        name,
                        tier: tier.clone(),
                        method: *method,
                        path: path.clone(),
                    },
                );
            }
        }
        Self { endpoints }
    }

    /// Looks an endpoint up by name; an unknown name is `InternalError`.
    pub fn resolve(&self, name: &str) -> Result<&Endpoint> {
        self.endpoints
            .get(name)
            .ok_or_else(|| Error::internal(format!("Undefined endpoint \"{name}\"")))
    }

    /// Number of endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Sorted endpoint names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// `tier + Method + PathParts`, e.g. `("private", Delete, "order/{id}")` →
/// `privateDeleteOrderId`.
pub fn endpoint_name(tier: &str, method: HttpMethod, path: &str) -> String {
    let mut name = String::with_capacity(tier.len() + path.len() + 6);
    name.push_str(tier);
    name.push_str(method.camel());
    for part in path.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Placeholder names in `path`, in order.
///
/// ```
/// use unicex_core::description::extract_params;
///
/// assert_eq!(extract_params("orders/{instId}/{ordId}"), vec!["instId", "ordId"]);
/// ```
pub fn extract_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                params.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    params
}

/// Replaces each `{name}` in `path` with the matching parameter. Placeholders
/// without a scalar parameter are left in place.
pub fn implode_params(path: &str, params: &Map<String, Value>) -> String {
    let mut result = path.to_string();
    for name in extract_params(path) {
        if let Some(value) = params.get(name).and_then(value_to_string) {
            result = result.replace(&format!("{{{name}}}"), &value);
        }
    }
    result
}
