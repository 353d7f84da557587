//! HTTP transport seam
//!
//! The submission engine only needs "send this request, give me the status and
//! body". [`HyperTransport`] does that over HTTPS with hyper and rustls; tests
//! and callers with their own HTTP stack can plug in any [`Transport`].

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::Method;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;
use tracing::debug;

use crate::error::{PostmarkError, Result};

/// An outgoing HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Header name/value pairs in the order they are sent
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// First value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP status and body returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Executes one HTTP exchange
///
/// Implementations return `Err` only when no response was obtained; any HTTP
/// status, including 4xx and 5xx, is a successful exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.as_ref().execute(request).await
    }
}

// Same platform split as the crate's rustls features: aws-lc-rs, ring on Windows
#[cfg(not(windows))]
fn crypto_provider() -> rustls::crypto::CryptoProvider {
    rustls::crypto::aws_lc_rs::default_provider()
}

#[cfg(windows)]
fn crypto_provider() -> rustls::crypto::CryptoProvider {
    rustls::crypto::ring::default_provider()
}

/// Production transport built on hyper with rustls
///
/// Each call builds its own client and connection and drops them when the
/// call returns, so nothing is shared between submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyperTransport;

impl HyperTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(crypto_provider())
            .map_err(|e| PostmarkError::transport("Failed to configure TLS", e))?
            .https_or_http()
            .enable_http1()
            .build();
        let client: Client<_, Full<Bytes>> =
            Client::builder(TokioExecutor::new()).build(connector);

        debug!("{} {}", request.method, request.url);
        let mut builder = hyper::Request::builder()
            .method(request.method)
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let http_request = builder
            .body(Full::new(Bytes::from(request.body)))
            .map_err(|e| PostmarkError::transport("Failed to build HTTP request", e))?;

        let response = client
            .request(http_request)
            .await
            .map_err(|e| PostmarkError::transport(format!("Request to {} failed", request.url), e))?;

        let status = response.status().as_u16();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| PostmarkError::transport("Failed to read response body", e))?
            .to_bytes();
        let body = String::from_utf8(bytes.to_vec())
            .map_err(|e| PostmarkError::transport("Response body is not valid UTF-8", e))?;

        debug!("HTTP {} ({} bytes)", status, body.len());
        Ok(HttpResponse { status, body })
    }
}
