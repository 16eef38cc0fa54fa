//! # Projection
//!
//! Module dedicated to the flattening of markup trees into plain
//! text, so that the plain text algorithm can run on them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::{NodeId, Tree};

/// Tags starting a new line.
const BLOCK_TAGS: &[&str] = &["div", "p", "ul", "li", "h1", "h2", "h3"];

/// Tags breaking the current line.
const HARD_BREAK_TAGS: &[&str] = &["br", "hr", "tr"];

/// Tags whose content is not readable text.
const SKIPPED_TAGS: &[&str] = &["style", "script"];

static EXCESSIVE_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Projects the given tree into plain text.
///
/// When `ignore_block_tags` is `true`, block elements do not start a
/// new line anymore.
pub fn project(tree: &Tree, ignore_block_tags: bool) -> String {
    let mut text = String::new();

    let Some(html) = tree.document_element() else {
        return text;
    };

    let mut stack = vec![html];

    while let Some(id) = stack.pop() {
        let name = tree.name(id).unwrap_or_default();
        let skipped = SKIPPED_TAGS.contains(&name);

        if !skipped {
            stack.extend(tree.element_children(id).into_iter().rev());
        }

        project_element(tree, id, name, skipped, ignore_block_tags, &mut text);
    }

    EXCESSIVE_NEWLINES
        .replace_all(&text, "\n\n")
        .trim()
        .to_owned()
}

fn project_element(
    tree: &Tree,
    id: NodeId,
    name: &str,
    skipped: bool,
    ignore_block_tags: bool,
    text: &mut String,
) {
    let own = match skipped {
        true => "",
        false => tree
            .own_text(id)
            .and_then(|text| tree.text(text))
            .unwrap_or_default(),
    };

    let tail = tree
        .tail(id)
        .and_then(|text| tree.text(text))
        .unwrap_or_default();

    if own.chars().count() + tail.chars().count() > 1 {
        if !ignore_block_tags && BLOCK_TAGS.contains(&name) {
            text.push('\n');
        }

        if name == "li" {
            text.push_str("  * ");
        }

        text.push_str(format!("{own}{tail}").trim());
        text.push(' ');

        for attr in ["href", "src"] {
            if let Some(link) = tree.attr(id, attr).filter(|link| !link.is_empty()) {
                text.push_str(&format!("({link}) "));
            }
        }
    }

    if HARD_BREAK_TAGS.contains(&name) {
        break_line(text);
    }
}

fn break_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}
