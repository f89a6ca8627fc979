//! HTTP transport
//!
//! Sends one [`PreparedRequest`](crate::signed_request::PreparedRequest) and
//! returns the raw status, headers and body. Classification happens in the
//! pipeline; this layer only reports transport failures:
//!
//! - Per-request timeout via `tokio::time::timeout`
//! - Response size limit enforced while streaming the body
//! - No retries; a failed attempt is returned to the caller as is
//!
//! ```rust,no_run
//! use unicex_core::http_client::{HttpClient, HttpConfig};
//! use unicex_core::signed_request::{HttpMethod, PreparedRequest};
//!
//! # async fn example() -> unicex_core::Result<()> {
//! let client = HttpClient::new(HttpConfig::default())?;
//! let request = PreparedRequest {
//!     url: "https://api.binance.com/api/v3/time".into(),
//!     method: HttpMethod::Get,
//!     headers: Default::default(),
//!     body: None,
//! };
//! let response = client.execute(&request).await?;
//! println!("{} {}", response.status, response.body);
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod request;
mod response;


pub use builder::HttpClient;
pub use config::HttpConfig;
pub use response::{BODY_PREVIEW_SIZE, HttpResponse};
