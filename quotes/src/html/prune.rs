//! # Pruning
//!
//! Module dedicated to the removal of the quoted nodes of a markup
//! tree, once the quoted checkpoints are known.
//!
//! The pruned tree is a pristine copy of the stamped one: elements
//! are visited in the same order as the stamping, so the checkpoint
//! counter points at the same nodes in both trees.

use std::collections::HashSet;

use tracing::trace;

use crate::dom::{NodeId, Tree};

/// The state carried along the pruning walk.
#[derive(Clone, Debug, Default)]
struct Pruner<'a> {
    /// Whether each checkpoint lies inside the quotation.
    quoted: &'a [bool],

    /// Checkpoints found on splitter lines, not visited yet.
    splitter_tags: HashSet<usize>,

    /// The shallowest depth a splitter checkpoint was found at.
    quote_start_depth: Option<usize>,

    counter: usize,
}

/// Removes from the given pristine tree the text and the nodes whose
/// checkpoints are quoted.
pub fn prune(tree: &mut Tree, quoted: &[bool], splitter_tags: HashSet<usize>) {
    let Some(html) = tree.document_element() else {
        return;
    };

    let mut pruner = Pruner {
        quoted,
        splitter_tags,
        ..Default::default()
    };

    pruner.visit(tree, html, 0, false);
}

impl Pruner<'_> {
    /// Prunes the subtree of the given element, and returns `true` if
    /// the element is fully quoted, in which case its removal is left
    /// to its parent.
    fn visit(&mut self, tree: &mut Tree, id: NodeId, depth: usize, vetoed: bool) -> bool {
        let vetoed = vetoed || self.is_above_quote(depth);
        let mut fully_quoted = true;

        if self.resolve(depth, vetoed) {
            if let Some(text) = tree.own_text(id) {
                tree.set_text(text, "");
            }
        } else {
            fully_quoted = false;
        }

        let mut quoted_children = Vec::new();

        if tree.is(id, "table") && !fully_quoted {
            trace!("skipping partially quoted table");
            for child in tree.element_children(id) {
                self.skip(tree, child, depth + 1);
            }
        } else {
            for child in tree.element_children(id) {
                if self.visit(tree, child, depth + 1, vetoed) {
                    quoted_children.push(child);
                }
            }
        }

        if self.resolve(depth, vetoed) {
            if let Some(tail) = tree.tail(id) {
                tree.set_text(tail, "");
            }
        } else {
            fully_quoted = false;
        }

        if !fully_quoted {
            for child in quoted_children {
                if let Some(tail) = tree.tail(child) {
                    tree.detach(tail);
                }
                tree.detach(child);
            }
        }

        fully_quoted
    }

    /// Walks the subtree of the given element without touching it,
    /// so that the counter and the splitter tags stay in sync.
    fn skip(&mut self, tree: &Tree, id: NodeId, depth: usize) {
        self.resolve(depth, true);

        for child in tree.element_children(id) {
            self.skip(tree, child, depth + 1);
        }

        self.resolve(depth, true);
    }

    /// Consumes the current checkpoint, and returns `true` if it is
    /// quoted.
    fn resolve(&mut self, depth: usize, vetoed: bool) -> bool {
        let checkpoint = self.counter;
        self.counter += 1;

        if self.splitter_tags.remove(&checkpoint) {
            let depth = match self.quote_start_depth {
                Some(start) => start.min(depth),
                None => depth,
            };
            self.quote_start_depth = Some(depth);
        }

        !vetoed && self.quoted.get(checkpoint).copied().unwrap_or_default()
    }

    /// Returns `true` once the walk went back above the quotation
    /// start, with all the splitters visited.
    fn is_above_quote(&self, depth: usize) -> bool {
        self.splitter_tags.is_empty()
            && self
                .quote_start_depth
                .is_some_and(|start| depth < start)
    }
}
