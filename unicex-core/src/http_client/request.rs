use tracing::{debug, instrument, warn};

use super::builder::HttpClient;
use super::response::HttpResponse;
use crate::error::{Error, NetworkError, Result};
use crate::signed_request::PreparedRequest;

impl HttpClient {
    /// Sends one request and reads the full response.
    ///
    /// Any status code is a successful transmit; only transport failures are
    /// errors here. The whole round trip, body included, is bounded by the
    /// configured timeout.
    ///
    /// # Errors
    ///
    /// - `RequestTimeout` when the deadline passes
    /// - `NetworkError` when the connection fails or the body cannot be read
    /// - `BadResponse` when the body exceeds `max_response_size`
    #[instrument(
        name = "http_execute",
        skip(self, request),
        fields(method = %request.method, url = %request.url, status)
    )]
    pub async fn execute(&self, request: &PreparedRequest) -> Result<HttpResponse> {
        let timeout = self.config().timeout;

        match tokio::time::timeout(timeout, self.execute_once(request)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(
                    url = %request.url,
                    timeout_ms = %timeout.as_millis(),
                    "HTTP request timed out"
                );
                Err(Error::from(NetworkError::Timeout).context(format!(
                    "Request to {} timed out after {}ms",
                    request.url,
                    timeout.as_millis()
                )))
            }
        }
    }

    async fn execute_once(&self, request: &PreparedRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client()
            .request(request.method.into(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        if self.config().verbose {
            debug!(
                method = %request.method,
                url = %request.url,
                headers = ?request.headers.keys().collect::<Vec<_>>(),
                body = request.body.as_deref().unwrap_or(""),
                "HTTP request"
            );
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, url = %request.url, "HTTP request send failed");
            Error::from(e)
        })?;

        tracing::Span::current().record("status", response.status().as_u16());
        self.read_response(response, &request.url).await
    }
}
