//! # Plain text
//!
//! Module dedicated to the extraction of the reply part of plain text
//! message bodies.
//!
//! The body is split into lines, each line gets a [`Marker`], then the
//! [`resolver`] looks for a quotation in the marker sequence. Links
//! wrapped in angle brackets are protected during the analysis, so
//! that their closing bracket cannot be taken for a quotation marker.

pub mod marker;
pub mod resolver;

use std::borrow::Cow;

use regex::Captures;
use tracing::debug;

#[doc(inline)]
pub use self::{
    marker::{classify, Marker},
    resolver::{resolve, Cut, Resolution},
};
use crate::{config::QuotesConfig, extractor::PlainReply, patterns::Patterns};

/// Detects the line delimiter of the given body: the first line
/// ending found, `\n` by default.
pub fn detect_delimiter(body: &str) -> &'static str {
    match body.find('\n') {
        Some(i) if i > 0 && body.as_bytes()[i - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// Replaces links wrapped in angle brackets by a neutral wrapper.
///
/// Links whose opening line is itself quoted keep their brackets.
pub fn protect_links(body: &str) -> Cow<'_, str> {
    Patterns::get().link.replace_all(body, |caps: &Captures| {
        let link = caps.get(0).map(|m| m.start()).unwrap_or_default();
        let line_start = body[..link].rfind('\n').map(|i| i + 1).unwrap_or(0);

        if body[line_start..].starts_with('>') {
            caps[0].to_owned()
        } else {
            format!("@@{}@@", &caps[1])
        }
    })
}

/// Restores the links protected by [`protect_links`].
pub fn restore_links(body: &str) -> Cow<'_, str> {
    Patterns::get().normalized_link.replace_all(body, "<$1>")
}

/// Moves "on <date>, <somebody> wrote:" splitters glued to the end of
/// a reply line onto their own line.
pub fn wrap_splitters<'a>(body: &'a str, delimiter: &str) -> Cow<'a, str> {
    Patterns::get()
        .on_date_smb_wrote
        .replace_all(body, |caps: &Captures| {
            let splitter = &caps[0];
            let start = caps.get(0).map(|m| m.start()).unwrap_or_default();

            if start > 0 && body.as_bytes()[start - 1] != b'\n' {
                format!("{delimiter}{splitter}")
            } else {
                splitter.to_owned()
            }
        })
}

/// Prepares the given body for the line analysis.
pub fn preprocess(body: &str, delimiter: &str) -> String {
    let body = protect_links(body);
    wrap_splitters(&body, delimiter).into_owned()
}

/// Restores the given body once the quotation has been removed.
pub fn postprocess(body: &str) -> String {
    restore_links(body).trim().to_owned()
}

/// Extracts the reply part of the given plain text body.
///
/// The body is returned unchanged when no quotation is found.
pub fn extract(body: &str, config: &QuotesConfig) -> PlainReply {
    if body.trim().is_empty() {
        return PlainReply::new(body, false);
    }

    let delimiter = detect_delimiter(body);
    debug!("detected line delimiter: {delimiter:?}");

    let preprocessed = preprocess(body, delimiter);
    let lines: Vec<&str> = preprocessed.split(delimiter).collect();

    let count = lines.len().min(config.max_lines_count);
    let (analyzed, overflow) = lines.split_at(count);
    if !overflow.is_empty() {
        debug!("analyzing the first {count} lines out of {}", lines.len());
    }

    let markers = classify(analyzed);
    let res = resolve(analyzed, &markers);

    let Some(cut) = res.cut else {
        return PlainReply::new(body, false);
    };

    let mut kept = res.lines;
    if cut.last + 1 < count {
        kept.extend_from_slice(overflow);
    }

    let body = postprocess(&kept.join(delimiter));
    PlainReply::new(body, true)
}
