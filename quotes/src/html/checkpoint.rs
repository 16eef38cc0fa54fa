//! # Checkpoints
//!
//! Module dedicated to the stamping of markup trees.
//!
//! Every element gets two sequential checkpoint tags embedded into
//! the text of the tree: one at the end of its own text, one at the
//! end of its tail text. Once the tree is projected into plain text,
//! the checkpoints found on each line tell which nodes the line comes
//! from.

use crate::{
    dom::{NodeId, Tree},
    patterns::{checkpoint_tag, Patterns},
};

/// Stamps the elements of the given tree in document order, and
/// returns the amount of checkpoints stamped.
///
/// Stamping stops descending once `node_limit` checkpoints have been
/// stamped, in which case the returned count is at least `node_limit`
/// and the checkpoints cannot be trusted.
pub fn stamp(tree: &mut Tree, node_limit: usize) -> usize {
    match tree.document_element() {
        Some(html) => stamp_element(tree, html, 0, node_limit),
        None => 0,
    }
}

fn stamp_element(tree: &mut Tree, id: NodeId, mut counter: usize, node_limit: usize) -> usize {
    let tag = checkpoint_tag(counter);
    match tree.own_text(id) {
        Some(text) => tree.push_text(text, &tag),
        None => {
            let text = tree.create_text(tag);
            tree.insert(id, 0, text);
        }
    }
    counter += 1;

    for child in tree.element_children(id) {
        if counter >= node_limit {
            break;
        }
        counter = stamp_element(tree, child, counter, node_limit);
    }

    let tag = checkpoint_tag(counter);
    match tree.tail(id) {
        Some(text) => tree.push_text(text, &tag),
        None => {
            if let (Some(parent), Some(index)) = (tree.parent(id), tree.index(id)) {
                let text = tree.create_text(tag);
                tree.insert(parent, index + 1, text);
            }
        }
    }

    counter + 1
}

/// Removes the checkpoint tags from the given line, and returns the
/// cleaned line along with the checkpoints found, in order.
pub fn split(line: &str) -> (String, Vec<usize>) {
    let pattern = &Patterns::get().checkpoint;

    let checkpoints = pattern
        .captures_iter(line)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    let line = pattern.replace_all(line, "").into_owned();

    (line, checkpoints)
}
