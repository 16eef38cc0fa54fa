//! # Boundary resolver
//!
//! Module dedicated to the detection of the quoted part of a message,
//! based on the sequence of its line [`Marker`]s.
//!
//! Marker sequences are matched as strings, one letter per line (see
//! [`Marker::as_char`]).

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::marker::{self, Marker};
use crate::patterns::Patterns;

/// Three quotation marker lines, optionally separated by empty lines.
static QUOTE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new("(me*){3}").unwrap());

/// Forward header preceded by text or empty lines only.
static FORWARD: Lazy<Regex> = Lazy::new(|| Regex::new("^[te]*f").unwrap());

/// Splitter(s) followed by text lines only, up to the end.
static TRAILING_SPLITTER: Lazy<Regex> =
    Lazy::new(|| Regex::new("(se*)+((t|f)e*)+$").unwrap());

/// Quotation starting by a splitter or a couple of quotation marker
/// lines, ending by a quotation marker line and followed by text
/// lines only.
static QUOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new("((?:s|(?:me*){2,}).*me*)[te]*$").unwrap());

/// Quotation made of splitters or quotation marker lines only.
static EMPTY_QUOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new("((?:(?:se*)+|(?:me*){2,}))e*").unwrap());

/// Inclusive range of lines detected as quoted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cut {
    pub first: usize,
    pub last: usize,
}

impl Cut {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub fn range(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }
}

/// The result of the boundary resolution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution<'a> {
    /// The remaining lines, once the quoted ones have been removed.
    pub lines: Vec<&'a str>,

    /// The range of removed lines, indexed in the original sequence.
    pub cut: Option<Cut>,

    /// Whether the message is a forwarded one, which must never be
    /// cut.
    pub is_forwarded: bool,
}

impl<'a> Resolution<'a> {
    fn uncut(lines: &'a [impl AsRef<str>]) -> Self {
        Self {
            lines: lines.iter().map(AsRef::as_ref).collect(),
            cut: None,
            is_forwarded: false,
        }
    }

    fn forwarded(lines: &'a [impl AsRef<str>]) -> Self {
        Self {
            is_forwarded: true,
            ..Self::uncut(lines)
        }
    }

    fn cut(lines: &'a [impl AsRef<str>], cut: Cut) -> Self {
        debug!("found quotation from line {} to line {}", cut.first, cut.last);

        let lines = lines
            .iter()
            .enumerate()
            .filter(|(i, _)| !cut.contains(*i))
            .map(|(_, line)| line.as_ref())
            .collect();

        Self {
            lines,
            cut: Some(cut),
            is_forwarded: false,
        }
    }

    pub fn was_cut(&self) -> bool {
        self.cut.is_some()
    }
}

/// Resolves the quotation boundaries of the given lines using the
/// shared pattern tables.
pub fn resolve<'a>(lines: &'a [impl AsRef<str>], markers: &[Marker]) -> Resolution<'a> {
    resolve_with(Patterns::get(), lines, markers)
}

/// Resolves the quotation boundaries of the given lines.
///
/// Both slices must have the same length.
pub fn resolve_with<'a>(
    patterns: &Patterns,
    lines: &'a [impl AsRef<str>],
    markers: &[Marker],
) -> Resolution<'a> {
    let mut markers = marker::to_string(markers);

    // without splitter, lonely quotation markers are not a reliable
    // sign of quotation
    if !markers.contains('s') && !QUOTE_RUN.is_match(&markers) {
        markers = markers.replace('m', "t");
    }

    if FORWARD.is_match(&markers) {
        debug!("found forwarded message, skipping");
        return Resolution::forwarded(lines);
    }

    if is_inline_reply(patterns, lines, markers.as_bytes()) {
        debug!("found inline reply, skipping");
        return Resolution::uncut(lines);
    }

    if let Some(quotation) = TRAILING_SPLITTER.find(&markers) {
        let cut = Cut::new(quotation.start(), lines.len() - 1);
        return Resolution::cut(lines, cut);
    }

    let quotation = QUOTATION
        .captures(&markers)
        .or_else(|| EMPTY_QUOTATION.captures(&markers))
        .and_then(|caps| caps.get(1));

    match quotation {
        Some(quotation) => {
            let cut = Cut::new(quotation.start(), quotation.end() - 1);
            Resolution::cut(lines, cut)
        }
        None => Resolution::uncut(lines),
    }
}

/// Searches for quotation / text / quotation sandwiches.
///
/// Long links can break a sequence of quotation lines, which should
/// not be considered as an inline reply. A sandwich is only tolerated
/// when a link surrounds its first text line.
fn is_inline_reply(patterns: &Patterns, lines: &[impl AsRef<str>], markers: &[u8]) -> bool {
    inline_reply_starts(markers).into_iter().any(|start| {
        let quoted = lines[start - 1].as_ref();
        let next = lines[start].as_ref().trim();

        let has_link = patterns.parenthesis_link.is_match(quoted)
            || patterns
                .parenthesis_link
                .find(next)
                .is_some_and(|link| link.start() == 0);

        !has_link
    })
}

/// Finds, possibly overlapping, sequences matching `m e* t [te]* m`,
/// and returns the index following their first `m`.
fn inline_reply_starts(markers: &[u8]) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut i = 1;

    while i < markers.len() {
        if markers[i - 1] == b'm' {
            let mut j = i;

            while j < markers.len() && markers[j] == b'e' {
                j += 1;
            }

            if j < markers.len() && markers[j] == b't' {
                while j < markers.len() && matches!(markers[j], b't' | b'e') {
                    j += 1;
                }

                if j < markers.len() && markers[j] == b'm' {
                    starts.push(i);
                    i = j + 1;
                    continue;
                }
            }
        }

        i += 1;
    }

    starts
}

#[cfg(test)]
mod tests {
    use super::{inline_reply_starts, resolve, Cut, Marker};

    fn markers(markers: &str) -> Vec<Marker> {
        markers
            .chars()
            .map(|c| match c {
                'e' => Marker::Empty,
                'm' => Marker::Quoted,
                'f' => Marker::Forward,
                's' => Marker::Splitter,
                _ => Marker::Text,
            })
            .collect()
    }

    fn lines(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("line {i}")).collect()
    }

    #[test_log::test]
    fn trailing_splitter() {
        let lines = lines(6);
        let res = resolve(&lines, &markers("teseet"));

        assert_eq!(res.cut, Some(Cut::new(2, 5)));
        assert_eq!(res.lines, vec!["line 0", "line 1"]);
        assert!(!res.is_forwarded);
    }

    #[test_log::test]
    fn quotation_with_splitter() {
        let lines = lines(6);
        let res = resolve(&lines, &markers("tsemmt"));

        assert_eq!(res.cut, Some(Cut::new(1, 4)));
        assert_eq!(res.lines, vec!["line 0", "line 5"]);
    }

    #[test_log::test]
    fn quotation_markers_only() {
        let lines = lines(6);
        let res = resolve(&lines, &markers("temmmt"));

        assert_eq!(res.cut, Some(Cut::new(2, 4)));
        assert_eq!(res.lines, vec!["line 0", "line 1", "line 5"]);
    }

    #[test_log::test]
    fn lonely_splitter() {
        let lines = lines(3);
        let res = resolve(&lines, &markers("tse"));

        assert_eq!(res.cut, Some(Cut::new(1, 1)));
        assert_eq!(res.lines, vec!["line 0", "line 2"]);
    }

    #[test_log::test]
    fn demoted_quotation_markers() {
        let lines = lines(4);
        let res = resolve(&lines, &markers("tmmt"));

        assert_eq!(res.cut, None);
        assert_eq!(res.lines.len(), 4);
    }

    #[test_log::test]
    fn forwarded_message() {
        let lines = lines(5);
        let res = resolve(&lines, &markers("tefst"));

        assert!(res.is_forwarded);
        assert!(!res.was_cut());
        assert_eq!(res.lines.len(), 5);
    }

    #[test_log::test]
    fn inline_reply() {
        let lines = lines(6);
        let res = resolve(&lines, &markers("smmtmm"));

        assert!(!res.was_cut());
        assert!(!res.is_forwarded);
    }

    #[test_log::test]
    fn inline_reply_broken_by_link() {
        let lines = vec![
            "On Mon, Bob wrote:",
            "> see the doc at the link",
            "(http://example.com/a/very/long/link)",
            "> and tell me",
        ];
        let res = resolve(&lines, &markers("smtm"));

        assert_eq!(res.cut, Some(Cut::new(0, 3)));
        assert!(res.lines.is_empty());
    }

    #[test_log::test]
    fn overlapping_inline_replies() {
        assert_eq!(inline_reply_starts(b"mtmtm"), vec![1, 3]);
        assert_eq!(inline_reply_starts(b"meetem"), vec![1]);
        assert_eq!(inline_reply_starts(b"meem"), Vec::<usize>::new());
        assert_eq!(inline_reply_starts(b"tmt"), Vec::<usize>::new());
    }

    #[test_log::test]
    fn nothing_to_cut() {
        let lines = lines(3);
        let res = resolve(&lines, &markers("tet"));

        assert_eq!(res.cut, None);
        assert_eq!(res.lines, vec!["line 0", "line 1", "line 2"]);
    }
}
