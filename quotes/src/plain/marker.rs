//! # Line markers
//!
//! Module dedicated to line classification. Each line of a message
//! body gets exactly one [`Marker`].

use std::fmt;

use tracing::trace;

use crate::{config::SPLITTER_MAX_LINES, patterns::Patterns};

/// The category of a message line.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Marker {
    /// Empty or whitespace-only line.
    Empty,

    /// Line starting by one or more `>`.
    Quoted,

    /// Forwarded message header.
    Forward,

    /// Line (or part of a multi-lines) announcing a quoted message.
    Splitter,

    /// Any other line, most likely written by the sender.
    Text,
}

impl Marker {
    /// The one-letter representation of the marker, used to match
    /// marker sequences with regular expressions.
    pub fn as_char(&self) -> char {
        match self {
            Self::Empty => 'e',
            Self::Quoted => 'm',
            Self::Forward => 'f',
            Self::Splitter => 's',
            Self::Text => 't',
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Collects markers into their string representation.
pub fn to_string(markers: &[Marker]) -> String {
    markers.iter().map(Marker::as_char).collect()
}

/// Marks the given lines using the shared pattern tables.
pub fn classify(lines: &[impl AsRef<str>]) -> Vec<Marker> {
    classify_with(Patterns::get(), lines)
}

/// Marks the given lines using the given pattern tables.
///
/// A splitter may spread across up to [`SPLITTER_MAX_LINES`] lines,
/// in which case all the lines it covers are marked as splitter.
pub fn classify_with(patterns: &Patterns, lines: &[impl AsRef<str>]) -> Vec<Marker> {
    let mut markers = vec![Marker::Empty; lines.len()];
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_ref();
        let trimmed = line.trim();

        if trimmed.is_empty() {
            markers[i] = Marker::Empty;
        } else if patterns.quote.is_match(line.trim_start()) {
            markers[i] = Marker::Quoted;
        } else if patterns.is_forward(trimmed) {
            markers[i] = Marker::Forward;
        } else {
            let end = (i + SPLITTER_MAX_LINES).min(lines.len());
            let window = lines[i..end]
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join("\n");

            match patterns.find_splitter(&window) {
                Some(splitter) => {
                    let count = splitter.trim_end_matches('\n').matches('\n').count() + 1;
                    let count = count.min(end - i);
                    for marker in &mut markers[i..i + count] {
                        *marker = Marker::Splitter;
                    }
                    i += count;
                    continue;
                }
                None => {
                    markers[i] = Marker::Text;
                }
            }
        }

        i += 1;
    }

    trace!("line markers: {}", to_string(&markers));
    markers
}

#[cfg(test)]
mod tests {
    use super::{classify, to_string, Marker};

    #[test_log::test]
    fn basic_markers() {
        let lines = ["Reply", "", "  ", "> quoted", ">> nested", "---- Forwarded message ----"];
        let markers = classify(&lines);

        assert_eq!(
            markers,
            vec![
                Marker::Text,
                Marker::Empty,
                Marker::Empty,
                Marker::Quoted,
                Marker::Quoted,
                Marker::Forward,
            ]
        );
    }

    #[test_log::test]
    fn indented_quote_marker() {
        assert_eq!(classify(&["   > quoted"]), vec![Marker::Quoted]);
    }

    #[test_log::test]
    fn multi_lines_splitter() {
        let lines = [
            "Thanks",
            "On Mar 8, 2012 9:59 AM, \"Example.com\" <",
            "r+7f1b094ceb90e18cca93d53d3703feae@example.com> wrote:",
            "",
            ">**",
        ];

        assert_eq!(to_string(&classify(&lines)), "tssem");
    }

    #[test_log::test]
    fn splitter_window_at_the_end() {
        let lines = ["Reply", "From: bob@example.com", "Date: today", "To: rob@example.com"];
        assert_eq!(to_string(&classify(&lines)), "tsst");
    }

    #[test_log::test]
    fn same_length() {
        let lines: Vec<String> = vec![];
        assert!(classify(&lines).is_empty());

        let lines = ["a", "", "> b", "c"];
        assert_eq!(classify(&lines).len(), lines.len());
    }
}
