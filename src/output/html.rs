//! HTML result page generation
//!
//! Each requested URL gets a section: the link fragment with either a
//! cache notice or the crawl time, or an apology when the crawl failed.

use crate::crawler::{escape_html, CrawlOutcome};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const FAILURE_MESSAGE: &str =
    "Unable To Process The Crawling Details At This Moment. Check the URL and try again";

/// One requested URL and what became of it
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub url: String,
    pub outcome: CrawlOutcome,
}

/// Writes the HTML report for `entries` to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(LinkCacheError::Io)` - Failed to create or write the file
pub fn generate_html_report(entries: &[ReportEntry], output_path: &Path) -> crate::Result<()> {
    let html = format_html_report(entries);

    let mut file = File::create(output_path)?;
    file.write_all(html.as_bytes())?;

    Ok(())
}

/// Formats crawl outcomes as a standalone HTML document
///
/// Link fragments are embedded as-is; they are already escaped markup.
pub fn format_html_report(entries: &[ReportEntry]) -> String {
    let all_failed = !entries.is_empty() && entries.iter().all(|e| !e.outcome.is_success());
    let title = if all_failed { "Error" } else { "Crawling Result" };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str("</head>\n<body>\n");

    for entry in entries {
        html.push_str("<section>\n");
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&entry.url)));

        match &entry.outcome {
            CrawlOutcome::Completed(result) => {
                html.push_str("<h1>Crawling Completed</h1>\n");
                if result.from_cache {
                    html.push_str("<p>Details were fetched from the cache.</p>\n");
                } else {
                    html.push_str(&format!(
                        "<p>Crawl Time: {:.6} seconds</p>\n",
                        result.elapsed_seconds
                    ));
                }
                html.push_str(&result.content);
                html.push('\n');
            }
            CrawlOutcome::Failed(failure) => {
                html.push_str(&format!("<h1>{}</h1>\n", FAILURE_MESSAGE));
                html.push_str(&format!(
                    "<p>Crawl Time: {:.6} seconds</p>\n",
                    failure.elapsed_seconds
                ));
            }
        }

        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
