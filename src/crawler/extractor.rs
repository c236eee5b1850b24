//! Streaming anchor extraction
//!
//! This module turns a sequence of raw HTML body chunks into:
//! - A lazy sequence of anchor `href` values (`Hrefs`)
//! - A flat markup fragment listing those links (`render_link`, `extract`)
//!
//! Hrefs are neither resolved, validated, nor de-duplicated.

use html_escape::decode_html_entities;
use lol_html::{element, HtmlRewriter, OutputSink, Settings};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use thiserror::Error;

/// Errors raised while streaming a body through the extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("body stream interrupted: {0}")]
    Stream(String),

    #[error("html rewrite error: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

/// Lazy iterator over the `href` of every `<a>` start or self-closing tag
///
/// Character references in the attribute are decoded, so each value is the
/// href as a browser would see it.
///
/// Body chunks are pulled from the underlying iterator only when all hrefs
/// found so far have been handed out. Hrefs discovered before a failure are
/// yielded before the failure itself; after an error or the end of the
/// stream the iterator is exhausted.
pub struct Hrefs<I> {
    chunks: I,
    rewriter: Option<HtmlRewriter<'static, NoopSink>>,
    found: Rc<RefCell<VecDeque<String>>>,
    pending_error: Option<ExtractError>,
}

impl<I> Hrefs<I>
where
    I: Iterator<Item = Result<Vec<u8>, ExtractError>>,
{
    pub fn new(chunks: I) -> Self {
        let found = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&found);

        let handler = element!("a[href]", move |el| {
            // lol_html hands back the attribute's source text
            if let Some(href) = el.get_attribute("href") {
                sink.borrow_mut()
                    .push_back(decode_html_entities(&href).into_owned());
            }
            Ok(())
        });

        let rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![handler],
                ..Settings::default()
            },
            NoopSink,
        );

        Self {
            chunks,
            rewriter: Some(rewriter),
            found,
            pending_error: None,
        }
    }

    /// Feeds the next chunk to the rewriter, or finishes it at end of stream
    fn advance(&mut self) {
        let Some(rewriter) = self.rewriter.as_mut() else {
            return;
        };

        match self.chunks.next() {
            Some(Ok(chunk)) => {
                if let Err(e) = rewriter.write(&chunk) {
                    self.rewriter = None;
                    self.pending_error = Some(e.into());
                }
            }
            Some(Err(e)) => {
                self.rewriter = None;
                self.pending_error = Some(e);
            }
            None => {
                if let Some(rewriter) = self.rewriter.take() {
                    if let Err(e) = rewriter.end() {
                        self.pending_error = Some(e.into());
                    }
                }
            }
        }
    }
}

impl<I> Iterator for Hrefs<I>
where
    I: Iterator<Item = Result<Vec<u8>, ExtractError>>,
{
    type Item = Result<String, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.found.borrow_mut().pop_front();
            if let Some(href) = next {
                return Some(Ok(href));
            }
            if let Some(e) = self.pending_error.take() {
                return Some(Err(e));
            }
            if self.rewriter.is_none() {
                return None;
            }
            self.advance();
        }
    }
}

/// Result of running the extractor over a whole body
///
/// `fragment` holds every link rendered before `error` occurred.
#[derive(Debug)]
pub struct Extraction {
    pub fragment: String,
    pub error: Option<ExtractError>,
}

impl Extraction {
    /// Drops the partial fragment if extraction failed
    pub fn into_result(self) -> Result<String, ExtractError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.fragment),
        }
    }
}

/// Extracts and renders every anchor href in the body
///
/// # Example
///
/// ```
/// use linkcache::crawler::{extract, ExtractError};
///
/// let body: Vec<Result<Vec<u8>, ExtractError>> =
///     vec![Ok(br#"<a href="http://x.com">text</a>"#.to_vec())];
/// let extraction = extract(body);
/// assert_eq!(
///     extraction.fragment,
///     r#"<a href="http://x.com">http://x.com</a><br>"#
/// );
/// assert!(extraction.error.is_none());
/// ```
pub fn extract<I>(chunks: I) -> Extraction
where
    I: IntoIterator<Item = Result<Vec<u8>, ExtractError>>,
{
    let mut fragment = String::new();
    for href in Hrefs::new(chunks.into_iter()) {
        match href {
            Ok(href) => fragment.push_str(&render_link(&href)),
            Err(e) => {
                return Extraction {
                    fragment,
                    error: Some(e),
                }
            }
        }
    }
    Extraction {
        fragment,
        error: None,
    }
}

/// Renders one link as `<a href="E">E</a><br>` with `E` HTML-escaped
pub fn render_link(href: &str) -> String {
    let escaped = escape_html(href);
    format!("<a href=\"{}\">{}</a><br>", escaped, escaped)
}

/// Escapes `& ' < > "` and carriage returns
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\r' => escaped.push_str("&#13;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// The rewritten document is discarded; only the handler side effects matter.
pub struct NoopSink;

impl OutputSink for NoopSink {
    fn handle_chunk(&mut self, _chunk: &[u8]) {}
}
