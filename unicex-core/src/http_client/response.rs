use futures_util::StreamExt;
use reqwest::Response;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::builder::HttpClient;
use crate::error::{Error, NetworkError, Result};

/// Bytes of body included in log lines and error previews.
pub const BODY_PREVIEW_SIZE: usize = 200;

/// A received response, before any decoding or classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, names lower-cased
    pub headers: BTreeMap<String, String>,
    /// Body as text (lossy UTF-8)
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// The first [`BODY_PREVIEW_SIZE`] bytes of the body, cut at a char boundary.
    pub fn body_preview(&self) -> &str {
        if self.body.len() <= BODY_PREVIEW_SIZE {
            return &self.body;
        }
        let mut cut = BODY_PREVIEW_SIZE;
        while !self.body.is_char_boundary(cut) {
            cut -= 1;
        }
        &self.body[..cut]
    }
}

impl HttpClient {
    pub(crate) async fn read_response(&self, response: Response, url: &str) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();
        let max_size = self.config().max_response_size;

        if let Some(content_length) = response.content_length() {
            if content_length > max_size as u64 {
                warn!(
                    url = %url,
                    content_length = content_length,
                    max_size = max_size,
                    "Response exceeds size limit (Content-Length check)"
                );
                return Err(Error::bad_response(format!(
                    "Response size {content_length} bytes exceeds limit {max_size} bytes"
                )));
            }
        }

        let bytes = stream_with_limit(response, url, max_size).await?;
        let result = HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        };

        if self.config().verbose {
            debug!(status = status, body = %result.body, "HTTP response");
        } else {
            debug!(
                status = status,
                body_length = result.body.len(),
                body_preview = %result.body_preview(),
                "HTTP response received"
            );
        }
        Ok(result)
    }
}

async fn stream_with_limit(response: Response, url: &str, max_size: usize) -> Result<Vec<u8>> {
    #[allow(clippy::cast_possible_truncation)]
    let initial_capacity = response
        .content_length()
        .map_or(16 * 1024, |len| std::cmp::min(len as usize, max_size));

    let mut stream = response.bytes_stream();
    let mut body = Vec::with_capacity(initial_capacity);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            warn!(error = %e, "Failed to read response chunk");
            Error::from(NetworkError::BodyRead(e.to_string()))
        })?;

        if body.len().saturating_add(chunk.len()) > max_size {
            warn!(url = %url, max_size = max_size, "Response exceeds size limit during streaming");
            return Err(Error::bad_response(format!(
                "Response exceeds limit {max_size} bytes (streaming)"
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
