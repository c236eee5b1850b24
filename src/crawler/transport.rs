//! HTTP transport used by the fetcher
//!
//! A transport performs one plain GET and hands back the raw body chunks.
//! Status codes are not interpreted: an error page still has links.
//!
//! The body is buffered in full before extraction starts. The HTML rewriter
//! is `!Send`, so it must not be held across an `.await` inside a spawned
//! crawl task; extraction runs synchronously over the buffered chunks.

use crate::crawler::extractor::ExtractError;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// The request itself failed before any body was available
#[derive(Debug, Error)]
#[error("GET {url} failed: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(url: &str, message: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

/// Raw body of one response, chunk by chunk
///
/// If reading the body failed part way, the chunks received so far are kept
/// and the failure is replayed after them during extraction.
#[derive(Debug, Default, Clone)]
pub struct ResponseBody {
    chunks: Vec<Vec<u8>>,
    interrupted: Option<String>,
}

impl ResponseBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete body consisting of a single chunk
    pub fn from_html(html: &str) -> Self {
        Self {
            chunks: vec![html.as_bytes().to_vec()],
            interrupted: None,
        }
    }

    pub fn push(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }

    /// Records that the body stream broke off with `message`
    pub fn interrupt(&mut self, message: impl Into<String>) {
        self.interrupted = Some(message.into());
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.is_some()
    }

    /// Chunks in arrival order, followed by the interruption if any
    pub fn into_chunks(self) -> impl Iterator<Item = Result<Vec<u8>, ExtractError>> {
        self.chunks
            .into_iter()
            .map(Ok)
            .chain(self.interrupted.map(|m| Err(ExtractError::Stream(m))))
    }
}

/// Performs a single GET for the fetcher
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<ResponseBody, TransportError>;
}

/// Builds the HTTP client used for page fetches
///
/// Redirects follow reqwest's default policy; no timeout or extra headers
/// are configured.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder().gzip(true).brotli(true).build()
}

/// reqwest-backed transport
///
/// Reads the response chunk by chunk into memory; memory use grows with the
/// size of the page.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<ResponseBody, TransportError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        tracing::debug!("GET {} -> {}", url, response.status());

        let mut body = ResponseBody::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => body.push(chunk.to_vec()),
                Ok(None) => break,
                Err(e) => {
                    body.interrupt(e.to_string());
                    break;
                }
            }
        }

        Ok(body)
    }
}
