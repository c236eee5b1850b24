//! Output module for presenting crawl outcomes
//!
//! This module handles:
//! - Rendering crawl outcomes as an HTML result page
//! - Writing that page to disk

mod html;

pub use html::{format_html_report, generate_html_report, ReportEntry};
