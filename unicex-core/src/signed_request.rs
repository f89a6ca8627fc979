//! Request values passed through the sign stage.
//!
//! The pipeline resolves an endpoint into a [`SignRequest`], hands it to the
//! adapter's `sign` hook together with a [`SignContext`], and transmits the
//! [`PreparedRequest`] that comes back.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::auth::urlencode;
use crate::credentials::Credentials;
use crate::error::Result;

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// Parameters travel in the query string
    #[default]
    Get,
    /// Parameters travel in the body
    Post,
    /// Parameters travel in the body
    Put,
    /// Parameters travel in the query string
    Delete,
}

impl HttpMethod {
    /// Uppercase name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Capitalized name used in endpoint names (`publicGetDepth`).
    pub fn camel(&self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Delete => "Delete",
        }
    }

    /// Case-insensitive parse.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Whether parameters belong in the query string rather than the body.
    pub fn uses_query(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A resolved endpoint call, before authentication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignRequest {
    /// Path relative to the tier's base url, placeholders already filled
    pub path: String,
    /// Access tier, e.g. `public` or `private`
    pub tier: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Remaining parameters (those not consumed by the path)
    pub params: Map<String, Value>,
    /// Caller-supplied headers
    pub headers: BTreeMap<String, String>,
    /// Caller-supplied raw body
    pub body: Option<String>,
}

impl SignRequest {
    /// Sorted, percent-encoded query string of `params`.
    pub fn query_string(&self) -> String {
        urlencode(&self.params)
    }
}

/// What the sign stage may consult besides the request itself.
#[derive(Debug, Clone, Copy)]
pub struct SignContext<'a> {
    /// Exchange id, for error messages
    pub exchange_id: &'a str,
    /// Base url of the request's tier
    pub base_url: &'a str,
    /// Credentials supplied at construction
    pub credentials: &'a Credentials,
    /// Current time in milliseconds
    pub timestamp: i64,
    /// Free-form exchange options
    pub options: &'a Map<String, Value>,
}

/// A fully built request, ready to transmit.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// Absolute url including the query string
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Headers to send
    pub headers: BTreeMap<String, String>,
    /// Body to send
    pub body: Option<String>,
}

impl PreparedRequest {
    /// The unauthenticated default: tier url + path, with parameters in a
    /// sorted query string for GET/DELETE or a JSON body otherwise.
    ///
    /// ```
    /// use serde_json::json;
    /// use unicex_core::credentials::Credentials;
    /// use unicex_core::signed_request::{HttpMethod, PreparedRequest, SignContext, SignRequest};
    ///
    /// let request = SignRequest {
    ///     path: "/depth".into(),
    ///     tier: "public".into(),
    ///     method: HttpMethod::Get,
    ///     params: json!({"symbol": "BTCUSDT", "limit": 5}).as_object().unwrap().clone(),
    ///     ..SignRequest::default()
    /// };
    /// let ctx = SignContext {
    ///     exchange_id: "demo",
    ///     base_url: "https://api.example.com/v1",
    ///     credentials: &Credentials::default(),
    ///     timestamp: 0,
    ///     options: &Default::default(),
    /// };
    /// let prepared = PreparedRequest::public(&request, &ctx).unwrap();
    /// assert_eq!(prepared.url, "https://api.example.com/v1/depth?limit=5&symbol=BTCUSDT");
    /// ```
    pub fn public(request: &SignRequest, ctx: &SignContext<'_>) -> Result<Self> {
        let mut url = join_url(ctx.base_url, &request.path);
        let mut headers = request.headers.clone();
        let mut body = request.body.clone();

        if !request.params.is_empty() {
            if request.method.uses_query() {
                url.push('?');
                url.push_str(&request.query_string());
            } else if body.is_none() {
                body = Some(serde_json::to_string(&request.params)?);
                headers
                    .entry("Content-Type".to_string())
                    .or_insert_with(|| "application/json".to_string());
            }
        }

        Ok(Self {
            url,
            method: request.method,
            headers,
            body,
        })
    }
}

/// Joins a base url and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) if !path.is_empty() => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx<'a>(credentials: &'a Credentials, options: &'a Map<String, Value>) -> SignContext<'a> {
        SignContext {
            exchange_id: "test",
            base_url: "https://api.test.com/",
            credentials,
            timestamp: 1,
            options,
        }
    }

    #[test]
    fn test_post_params_go_to_json_body() {
        let creds = Credentials::default();
        let options = Map::new();
        let request = SignRequest {
            path: "order".into(),
            tier: "public".into(),
            method: HttpMethod::Post,
            params: json!({"side": "buy"}).as_object().unwrap().clone(),
            ..SignRequest::default()
        };
        let prepared = PreparedRequest::public(&request, &ctx(&creds, &options)).unwrap();
        assert_eq!(prepared.url, "https://api.test.com/order");
        assert_eq!(prepared.body.as_deref(), Some(r#"{"side":"buy"}"#));
        assert_eq!(prepared.headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_no_params_no_query() {
        let creds = Credentials::default();
        let options = Map::new();
        let request = SignRequest {
            path: "/time".into(),
            ..SignRequest::default()
        };
        let prepared = PreparedRequest::public(&request, &ctx(&creds, &options)).unwrap();
        assert_eq!(prepared.url, "https://api.test.com/time");
        assert_eq!(prepared.body, None);
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.com", "/x"), "https://a.com/x");
        assert_eq!(join_url("https://a.com/", "/x"), "https://a.com/x");
        assert_eq!(join_url("https://a.com", "x"), "https://a.com/x");
        assert_eq!(join_url("https://a.com", ""), "https://a.com");
    }

    #[test]
    fn test_http_method_names() {
        assert_eq!(HttpMethod::parse("delete"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::Post.camel(), "Post");
        assert_eq!(reqwest::Method::from(HttpMethod::Put), reqwest::Method::PUT);
        assert!(!HttpMethod::Post.uses_query());
    }
}
