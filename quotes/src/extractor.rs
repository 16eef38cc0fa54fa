//! # Extractor
//!
//! Module dedicated to the reply extractor, the main entry point of
//! the library.

use crate::{config::QuotesConfig, html, plain, Result};

/// The MIME type of plain text bodies.
pub const TEXT_PLAIN: &str = "text/plain";

/// The MIME type of HTML bodies.
pub const TEXT_HTML: &str = "text/html";

/// The reply extracted from a plain text body.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct PlainReply {
    /// The reply, or the original body if no quotation was found.
    pub body: String,

    pub did_find_quote: bool,
}

impl PlainReply {
    pub fn new(body: impl ToString, did_find_quote: bool) -> Self {
        Self {
            body: body.to_string(),
            did_find_quote,
        }
    }
}

/// The reply extracted from an HTML body.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct HtmlReply {
    /// The reply, or the original body if no quotation was found.
    pub body: String,

    pub did_find_quote: bool,

    /// Whether the quotation was found by the checkpoint method
    /// rather than by the heuristic one.
    pub did_use_checkpoints: bool,

    /// Whether the body is a forwarded message, left untouched.
    pub is_forwarded_message: bool,

    /// Whether the body exceeded the configured limits of the
    /// checkpoint method.
    pub is_too_long: bool,
}

impl HtmlReply {
    /// Creates a reply made of the given body, without any quotation
    /// found.
    pub fn new(body: impl ToString) -> Self {
        Self {
            body: body.to_string(),
            ..Default::default()
        }
    }
}

/// The reply extractor.
///
/// Extracts the reply part of message bodies, leaving the quoted
/// messages apart.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReplyExtractor {
    config: QuotesConfig,
}

impl ReplyExtractor {
    /// Creates a reply extractor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &QuotesConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: QuotesConfig) {
        self.config = config;
    }

    pub fn with_config(mut self, config: QuotesConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn set_max_lines_count(&mut self, count: usize) {
        self.config.set_max_lines_count(count);
    }

    pub fn with_max_lines_count(mut self, count: usize) -> Self {
        self.set_max_lines_count(count);
        self
    }

    pub fn set_node_limit(&mut self, limit: usize) {
        self.config.set_node_limit(limit);
    }

    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.set_node_limit(limit);
        self
    }

    /// Extracts the reply part of the given plain text body.
    pub fn extract_from_plain(&self, body: impl AsRef<str>) -> PlainReply {
        plain::extract(body.as_ref(), &self.config)
    }

    /// Extracts the reply part of the given HTML body.
    pub fn extract_from_html(&self, body: impl AsRef<str>) -> Result<HtmlReply> {
        html::extract(body.as_ref(), &self.config)
    }

    /// Extracts the reply part of the given body, according to its
    /// MIME type. Bodies of other types are returned unchanged.
    pub fn extract_from(&self, body: impl AsRef<str>, content_type: impl AsRef<str>) -> Result<String> {
        let body = body.as_ref();
        let content_type = content_type.as_ref().trim();

        if content_type.eq_ignore_ascii_case(TEXT_PLAIN) {
            Ok(self.extract_from_plain(body).body)
        } else if content_type.eq_ignore_ascii_case(TEXT_HTML) {
            Ok(self.extract_from_html(body)?.body)
        } else {
            Ok(body.to_owned())
        }
    }
}
