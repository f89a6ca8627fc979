//! The request pipeline: resolve → sign → throttle → transmit → decode →
//! classify.
//!
//! A call makes exactly one attempt. Transport failures surface as network
//! errors without touching the classifier; everything that produced a
//! response goes through the adapter's `handle_errors` hook and then the
//! generic [`ErrorClassifier`].

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use super::BaseExchange;
use crate::classifier::ErrorClassifier;
use crate::description::{extract_params, implode_params};
use crate::error::{Error, Result};
use crate::http_client::HttpResponse;
use crate::signed_request::{HttpMethod, SignContext, SignRequest};
use crate::time::milliseconds;

impl BaseExchange {
    /// Calls a catalog endpoint by name, e.g. `publicGetDepth`.
    ///
    /// Parameters named by `{placeholders}` in the path are substituted and
    /// removed; the rest go to the query string or body.
    ///
    /// # Errors
    ///
    /// `InternalError` for an unknown endpoint name, `ArgumentsRequired` for
    /// a missing path parameter, a network error when no response arrived,
    /// or the classified failure of the response.
    pub async fn fetch(&self, endpoint: &str, params: Map<String, Value>) -> Result<Value> {
        let endpoint = self.endpoints().resolve(endpoint)?;
        self.request(&endpoint.path, &endpoint.tier, endpoint.method, params)
            .await
    }

    /// Calls an arbitrary path on a tier.
    pub async fn request(
        &self,
        path: &str,
        tier: &str,
        method: HttpMethod,
        mut params: Map<String, Value>,
    ) -> Result<Value> {
        let placeholders = extract_params(path);
        if let Some(missing) = placeholders.iter().find(|name| !params.contains_key(**name)) {
            return Err(Error::arguments_required(format!(
                "{} {path} requires a \"{missing}\" argument",
                self.id()
            )));
        }
        let imploded = implode_params(path, &params);
        for name in placeholders {
            params.remove(name);
        }

        let request = SignRequest {
            path: imploded,
            tier: tier.to_string(),
            method,
            params,
            headers: BTreeMap::new(),
            body: None,
        };
        self.send(&request).await
    }

    /// Runs a fully specified request through sign, transmit and classify.
    #[instrument(
        name = "exchange_request",
        skip(self, request),
        fields(exchange = %self.id(), tier = %request.tier, path = %request.path)
    )]
    pub async fn send(&self, request: &SignRequest) -> Result<Value> {
        let base_url = self.description().base_url(
            &request.tier,
            self.config().sandbox,
            &self.config().url_overrides,
        )?;
        let ctx = SignContext {
            exchange_id: self.id(),
            base_url: &base_url,
            credentials: self.credentials(),
            timestamp: milliseconds(),
            options: self.options(),
        };
        let prepared = self.adapter().sign(request, &ctx)?;

        self.throttle(1.0).await;
        let response = self.http_client.execute(&prepared).await?;

        let decoded = decode_body(&response.body);
        self.handle_response(&response, decoded.as_ref())?;

        debug!(status = response.status, "Request succeeded");
        Ok(match decoded {
            Some(value) => value,
            None if response.body.trim().is_empty() => Value::Null,
            None => Value::String(response.body),
        })
    }

    /// Adapter hook first, then the generic classifier.
    pub fn handle_response(&self, response: &HttpResponse, decoded: Option<&Value>) -> Result<()> {
        if let Some(err) = self.adapter().handle_errors(response, decoded) {
            warn!(
                exchange = self.id(),
                status = response.status,
                kind = %err.kind(),
                "Request failed (adapter)"
            );
            return Err(err);
        }
        let description = self.description();
        ErrorClassifier::new(
            self.id(),
            &description.exceptions,
            &description.http_exceptions,
        )
        .classify(response, decoded)
    }
}

/// Best-effort JSON decode; non-JSON bodies are not an error here.
fn decode_body(body: &str) -> Option<Value> {
    let trimmed = body.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(r#" {"a":1}"#), Some(json!({"a": 1})));
        assert_eq!(decode_body("[1,2]"), Some(json!([1, 2])));
        assert_eq!(decode_body("<html>"), None);
        assert_eq!(decode_body("{broken"), None);
        assert_eq!(decode_body("42"), None);
    }
}
