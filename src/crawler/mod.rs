//! Crawler module for fetching a page and harvesting its links
//!
//! This module contains the fetch-parse-cache pipeline, including:
//! - Streaming anchor extraction and fragment rendering
//! - The HTTP transport seam
//! - HTTP fetching with bounded retry
//! - Cache-first request coordination

mod coordinator;
mod extractor;
mod fetcher;
mod transport;

pub use coordinator::{Coordinator, CrawlFailure, CrawlOutcome, CrawlResult, SpeedTiers};
pub use extractor::{escape_html, extract, render_link, ExtractError, Extraction, Hrefs};
pub use fetcher::{FetchError, Fetcher, RetryPolicy};
pub use transport::{build_http_client, HttpTransport, ResponseBody, Transport, TransportError};
