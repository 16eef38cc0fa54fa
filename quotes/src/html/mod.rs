//! # HTML
//!
//! Module dedicated to the extraction of the reply part of HTML
//! message bodies.
//!
//! Two methods are available. The checkpoint method stamps the tree
//! with [`checkpoint`]s, projects it into plain text, runs the plain
//! text algorithm on it, then removes the nodes whose checkpoints
//! ended up in the quotation. The heuristic method looks for the
//! markup well-known mail clients wrap quotations with (see
//! [`cutters`]). The checkpoint method is tried first, unless the
//! tree is too large for it.

pub mod checkpoint;
pub mod cutters;
pub mod projection;
pub mod prune;

use std::collections::HashSet;

use tracing::{debug, trace};

use self::cutters::CutMode;
use crate::{
    config::QuotesConfig,
    dom::{self, Tree},
    extractor::HtmlReply,
    plain::{self, Marker},
    Result,
};

/// The outcome of the checkpoint method.
#[derive(Clone, Debug)]
enum Attempt {
    /// The quotation has been found and removed from the tree.
    Pruned(Tree),

    /// The message is a forwarded one, it must not be cut.
    Forwarded,

    /// The tree exceeds the configured limits.
    TooLarge,

    NoQuoteFound,
}

/// Extracts the reply part of the given HTML body.
///
/// The body is returned unchanged when no quotation is found.
pub fn extract(body: &str, config: &QuotesConfig) -> Result<HtmlReply> {
    if body.trim().is_empty() {
        return Ok(HtmlReply::new(body));
    }

    let tree = dom::html::parse(&dom::html::normalize(body));

    match attempt_checkpoints(&tree, config) {
        Attempt::Pruned(pruned) => finish_checkpoints(body, pruned, false),
        Attempt::Forwarded => {
            let mut reply = HtmlReply::new(dom::html::serialize(&tree)?);
            reply.is_forwarded_message = true;
            Ok(reply)
        }
        Attempt::TooLarge => {
            debug!("html body too large for the checkpoint method");
            cut_heuristically(body, &tree, config, true)
        }
        Attempt::NoQuoteFound => cut_heuristically(body, &tree, config, false),
    }
}

/// Runs the checkpoint method on a copy of the given tree.
fn attempt_checkpoints(tree: &Tree, config: &QuotesConfig) -> Attempt {
    let mut stamped = tree.clone();
    let count = checkpoint::stamp(&mut stamped, config.node_limit);
    trace!("stamped {count} checkpoints");

    if count >= config.node_limit {
        return Attempt::TooLarge;
    }

    for ignore_block_tags in [false, true] {
        let projection = projection::project(&stamped, ignore_block_tags);
        let projection = plain::protect_links(&projection);

        let (lines, checkpoints): (Vec<String>, Vec<Vec<usize>>) =
            projection.split('\n').map(checkpoint::split).unzip();

        if lines.len() > config.max_lines_count {
            return Attempt::TooLarge;
        }

        let markers = plain::classify(&lines);
        let res = plain::resolve(&lines, &markers);

        if res.is_forwarded {
            return Attempt::Forwarded;
        }

        let Some(cut) = res.cut else {
            debug!("no quotation found (ignore block tags: {ignore_block_tags})");
            continue;
        };

        let mut quoted = vec![false; count];
        let mut splitter_tags = HashSet::new();

        for i in cut.range() {
            for checkpoint in &checkpoints[i] {
                if let Some(flag) = quoted.get_mut(*checkpoint) {
                    *flag = true;
                }
                if markers[i] == Marker::Splitter {
                    splitter_tags.insert(*checkpoint);
                }
            }
        }

        let mut pruned = tree.clone();
        prune::prune(&mut pruned, &quoted, splitter_tags);
        return Attempt::Pruned(pruned);
    }

    Attempt::NoQuoteFound
}

/// Cleans up the tree pruned by the checkpoint method.
fn finish_checkpoints(body: &str, mut pruned: Tree, is_too_long: bool) -> Result<HtmlReply> {
    cutters::cut(&mut pruned, CutMode::EmptyOnly);

    let mut reply = finish(body, &pruned)?;
    reply.did_use_checkpoints = reply.did_find_quote;
    reply.is_too_long = is_too_long;
    Ok(reply)
}

/// Runs the heuristic method on a copy of the given tree.
fn cut_heuristically(
    body: &str,
    tree: &Tree,
    config: &QuotesConfig,
    is_too_long: bool,
) -> Result<HtmlReply> {
    let mut cut = tree.clone();

    if !cutters::cut(&mut cut, CutMode::Normal) {
        debug!("no quotation found");
        let mut reply = HtmlReply::new(body);
        reply.is_too_long = is_too_long;
        return Ok(reply);
    }

    // the cut tree may now be small enough for the checkpoint method
    if is_too_long {
        if let Attempt::Pruned(pruned) = attempt_checkpoints(&cut, config) {
            return finish_checkpoints(body, pruned, is_too_long);
        }
    }

    let mut reply = finish(body, &cut)?;
    reply.is_too_long = is_too_long;
    Ok(reply)
}

/// Serializes the given cut tree, unless nothing readable remains in
/// it, in which case the original body is kept.
fn finish(body: &str, cut: &Tree) -> Result<HtmlReply> {
    if projection::project(cut, false).is_empty() {
        debug!("no readable text left, keeping original body");
        return Ok(HtmlReply::new(body));
    }

    let mut reply = HtmlReply::new(dom::html::serialize(cut)?);
    reply.did_find_quote = true;
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::extract;
    use crate::config::QuotesConfig;

    fn strip_whitespace(html: &str) -> String {
        html.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test_log::test]
    fn blank_body() {
        let reply = extract("", &QuotesConfig::default()).unwrap();

        assert_eq!(reply.body, "");
        assert!(!reply.did_find_quote);
    }

    #[test_log::test]
    fn splitter_inside_blockquote() {
        let body = concat!(
            "Reply\n",
            "<blockquote>\n\n",
            "<div>\n",
            "On 11-Apr-2011, at 6:54 PM, Bob &lt;bob@example.com&gt; wrote:\n",
            "</div>\n\n",
            "<div>\n",
            "Test\n",
            "</div>\n\n",
            "</blockquote>",
        );

        let reply = extract(body, &QuotesConfig::default()).unwrap();

        assert!(reply.did_find_quote);
        assert!(reply.did_use_checkpoints);
        assert_eq!(strip_whitespace(&reply.body), "<html><body>Reply</body></html>");
    }

    #[test_log::test]
    fn no_quotation() {
        let body = "<div>Hello</div><div>World</div>";
        let reply = extract(body, &QuotesConfig::default()).unwrap();

        assert_eq!(reply.body, body);
        assert!(!reply.did_find_quote);
        assert!(!reply.did_use_checkpoints);
    }

    #[test_log::test]
    fn splitter_broken_by_block_tags() {
        let body = concat!(
            "<div>Reply<br></div>",
            "<div>On Mon, Apr 4, 2011 at 3:59 PM,</div>",
            "<div>Bob</div>",
            "<div>Smith</div>",
            "<div>Jr</div>",
            "<div>wrote:</div>",
            "<div>Test</div>",
        );

        let reply = extract(body, &QuotesConfig::default()).unwrap();

        assert!(reply.did_find_quote);
        assert!(reply.did_use_checkpoints);
        assert_eq!(
            strip_whitespace(&reply.body),
            "<html><body><div>Reply<br></div></body></html>"
        );
    }

    #[test_log::test]
    fn too_large_body() {
        let config = QuotesConfig::default().with_node_limit(4);
        let body = "<div>Reply</div><blockquote>Quote</blockquote>";
        let reply = extract(body, &config).unwrap();

        assert!(reply.is_too_long);
        assert!(reply.did_find_quote);
        assert!(!reply.did_use_checkpoints);
        assert_eq!(strip_whitespace(&reply.body), "<html><body><div>Reply</div></body></html>");
    }

    #[test_log::test]
    fn forwarded_message() {
        let body = concat!(
            "<div>FYI</div>",
            "<div>---------- Forwarded message ----------</div>",
            "<div>From: Bob &lt;bob@example.com&gt;</div>",
            "<div>Date: Mon, Apr 4, 2011</div>",
            "<div>Hello</div>",
        );
        let reply = extract(body, &QuotesConfig::default()).unwrap();

        assert!(reply.is_forwarded_message);
        assert!(!reply.did_find_quote);
        assert!(reply.body.contains("Forwarded message"));
        assert!(reply.body.contains("Hello"));
    }
}
