//! # Cutters
//!
//! Module dedicated to the structural detection of quotations, based
//! on the markup some well-known mail clients produce.

use tracing::debug;

use crate::{
    dom::{NodeId, Tree},
    patterns::{Patterns, QUOTE_CONTAINER_CLASS, QUOTE_IDS},
};

/// Style of the splitter block of Windows Mail.
const WINDOWS_MAIL_SPLITTER_STYLE: &str = "padding-top: 5px; border-top-color: rgb(229, 229, 229); border-top-width: 1px; border-top-style: solid;";

/// Prefixes of the text starting a quoted headers block.
const FROM_BLOCK_PREFIXES: &[&str] = &["From:", "Date:"];

/// The way cutters treat the nodes they match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CutMode {
    /// Removes the matching nodes.
    #[default]
    Normal,

    /// Removes the matching nodes only if they do not contain any
    /// readable text.
    EmptyOnly,
}

impl CutMode {
    fn accepts(&self, tree: &Tree, nodes: &[NodeId]) -> bool {
        match self {
            Self::Normal => true,
            Self::EmptyOnly => nodes
                .iter()
                .all(|id| tree.text_content(*id).trim().is_empty()),
        }
    }
}

/// Runs the cutters one after the other, and stops at the first one
/// that cuts something. Returns `true` if the tree has been cut.
pub fn cut(tree: &mut Tree, mode: CutMode) -> bool {
    cut_quote_container(tree, mode)
        || cut_zimbra_quote(tree, mode)
        || cut_blockquote(tree, mode)
        || cut_microsoft_quote(tree, mode)
        || cut_by_id(tree, mode)
        || cut_from_block(tree, mode)
}

fn has_ancestor(tree: &Tree, id: NodeId, name: &str) -> bool {
    tree.ancestors(id).any(|id| tree.is(id, name))
}

fn is_quote_container(tree: &Tree, id: NodeId) -> bool {
    tree.has_class(id, QUOTE_CONTAINER_CLASS)
}

/// Gets the own text of the given element, or its whole text content
/// if the own text is blank.
fn leading_text(tree: &Tree, id: NodeId) -> String {
    tree.own_text(id)
        .and_then(|text| tree.text(text))
        .filter(|text| !text.trim().is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| tree.text_content(id))
}

fn remove_with_following_siblings(tree: &mut Tree, id: NodeId) {
    for sibling in tree.following_siblings(id) {
        tree.detach(sibling);
    }
    tree.detach(id);
}

/// Cuts the outermost quote container, whatever its tag.
///
/// Quote containers nested in a blockquote are left untouched, as
/// well as containers wrapping a forwarded message.
pub fn cut_quote_container(tree: &mut Tree, mode: CutMode) -> bool {
    let quote = tree
        .descendants(Tree::ROOT)
        .into_iter()
        .filter(|id| is_quote_container(tree, *id))
        .filter(|id| !has_ancestor(tree, *id, "blockquote"))
        .find(|id| mode.accepts(tree, &[*id]));

    match quote {
        Some(id) if !Patterns::get().starts_with_forward(&leading_text(tree, id)) => {
            debug!("cutting quote container");
            tree.detach(id);
            true
        }
        _ => false,
    }
}

/// Cuts the divider Zimbra puts before quotations.
pub fn cut_zimbra_quote(tree: &mut Tree, mode: CutMode) -> bool {
    let divider = tree
        .find_all(Tree::ROOT, "hr")
        .into_iter()
        .filter(|id| tree.attr(*id, "data-marker") == Some("__DIVIDER__"))
        .find(|id| mode.accepts(tree, &[*id]));

    match divider {
        Some(id) => {
            debug!("cutting zimbra divider");
            tree.detach(id);
            true
        }
        None => false,
    }
}

/// Cuts the last outermost blockquote.
///
/// Blockquotes that are themselves quote containers, or that wrap one,
/// are left untouched.
pub fn cut_blockquote(tree: &mut Tree, mode: CutMode) -> bool {
    let quote = tree
        .find_all(Tree::ROOT, "blockquote")
        .into_iter()
        .filter(|id| !is_quote_container(tree, *id))
        .filter(|id| !has_ancestor(tree, *id, "blockquote"))
        .filter(|id| {
            !tree
                .descendants(*id)
                .into_iter()
                .any(|id| is_quote_container(tree, id))
        })
        .filter(|id| mode.accepts(tree, &[*id]))
        .last();

    match quote {
        Some(id) => {
            debug!("cutting blockquote");
            tree.detach(id);
            true
        }
        None => false,
    }
}

/// Cuts the splitter block of Outlook and Windows Mail, with all the
/// blocks following it.
pub fn cut_microsoft_quote(tree: &mut Tree, mode: CutMode) -> bool {
    let Some(splitter) = find_microsoft_splitter(tree).or_else(|| find_outlook_2003_splitter(tree))
    else {
        return false;
    };

    let mut nodes = tree.following_siblings(splitter);
    nodes.push(splitter);

    if !mode.accepts(tree, &nodes) {
        return false;
    }

    debug!("cutting microsoft quote");
    remove_with_following_siblings(tree, splitter);
    true
}

/// Finds the splitter of Outlook 2007, 2010, 2013 and Windows Mail.
fn find_microsoft_splitter(tree: &Tree) -> Option<NodeId> {
    let patterns = Patterns::get();

    let splitter = tree.find_all(Tree::ROOT, "div").into_iter().find(|id| {
        tree.attr(*id, "style").is_some_and(|style| {
            patterns.outlook_splitter_style.is_match(style) || style == WINDOWS_MAIL_SPLITTER_STYLE
        })
    })?;

    // Outlook 2010 wraps the splitter into a dedicated block
    let parent = tree.parent(splitter)?;
    let is_wrapped = tree.element_children(parent).first() == Some(&splitter)
        && tree.is_element(parent)
        && !tree.is(parent, "body");

    if is_wrapped {
        Some(parent)
    } else {
        Some(splitter)
    }
}

/// Finds the splitter of Outlook 2003:
/// `div > div.MsoNormal > font > span > hr`.
fn find_outlook_2003_splitter(tree: &Tree) -> Option<NodeId> {
    tree.find_all(Tree::ROOT, "hr").into_iter().find_map(|hr| {
        let is_splitter = tree.attr(hr, "size") == Some("3")
            && tree.attr(hr, "width") == Some("100%")
            && tree.attr(hr, "align") == Some("center")
            && tree.attr(hr, "tabindex") == Some("-1");
        if !is_splitter {
            return None;
        }

        let span = tree.parent(hr).filter(|id| tree.is(*id, "span"))?;
        let font = tree.parent(span).filter(|id| tree.is(*id, "font"))?;
        let block = tree.parent(font).filter(|id| {
            tree.is(*id, "div")
                && tree.attr(*id, "class") == Some("MsoNormal")
                && tree.attr(*id, "align") == Some("center")
                && tree.attr(*id, "style") == Some("text-align:center")
        })?;

        tree.parent(block).filter(|id| tree.is(*id, "div"))
    })
}

/// Cuts the elements identified as quotations.
pub fn cut_by_id(tree: &mut Tree, mode: CutMode) -> bool {
    let mut found = false;

    for quote_id in QUOTE_IDS {
        let quote = tree
            .descendants(Tree::ROOT)
            .into_iter()
            .filter(|id| tree.attr(*id, "id") == Some(*quote_id))
            .find(|id| mode.accepts(tree, &[*id]));

        if let Some(id) = quote {
            debug!("cutting quote with id {quote_id}");
            tree.detach(id);
            found = true;
        }
    }

    found
}

fn starts_with_from_block(text: &str) -> bool {
    let text = text.trim();
    FROM_BLOCK_PREFIXES
        .iter()
        .any(|prefix| text.starts_with(prefix))
}

/// Cuts the block starting by quoted `From:` or `Date:` headers, with
/// all the blocks following it.
pub fn cut_from_block(tree: &mut Tree, mode: CutMode) -> bool {
    let elements: Vec<NodeId> = tree
        .descendants(Tree::ROOT)
        .into_iter()
        .filter(|id| tree.is_element(*id))
        .collect();

    // headers enclosed in a block
    let block = elements
        .iter()
        .copied()
        .filter(|id| starts_with_from_block(&tree.text_content(*id)))
        .last();

    if let Some(block) = block {
        let div = std::iter::once(block)
            .chain(tree.ancestors(block))
            .take_while(|id| tree.parent(*id).is_some())
            .find(|id| tree.is(*id, "div"));

        let Some(div) = div else {
            return false;
        };

        let is_all_content = tree.parent(div).is_some_and(|parent| {
            tree.is(parent, "body") && tree.element_children(parent).len() == 1
        });

        if !is_all_content {
            let mut nodes = tree.following_siblings(div);
            nodes.push(div);

            if !mode.accepts(tree, &nodes) {
                return false;
            }

            debug!("cutting from block");
            remove_with_following_siblings(tree, div);
            return true;
        }
    }

    // headers not enclosed, following another element
    let block = elements.into_iter().find(|id| {
        tree.tail(*id)
            .and_then(|tail| tree.text(tail))
            .is_some_and(starts_with_from_block)
    });

    let Some(block) = block else {
        return false;
    };

    let parent_text = tree
        .parent(block)
        .and_then(|parent| tree.own_text(parent))
        .and_then(|text| tree.text(text))
        .unwrap_or_default();

    if Patterns::get().starts_with_forward(parent_text) {
        return false;
    }

    let mut nodes = tree.following_siblings(block);
    nodes.push(block);

    if !mode.accepts(tree, &nodes) {
        return false;
    }

    debug!("cutting from block tail");
    remove_with_following_siblings(tree, block);
    true
}

#[cfg(test)]
mod tests {
    use super::{cut, cut_blockquote, cut_from_block, cut_microsoft_quote, CutMode};
    use crate::dom::{html::parse, Tree};

    fn body_text(tree: &Tree) -> String {
        tree.text_content(tree.body().unwrap())
    }

    #[test_log::test]
    fn quote_container() {
        let mut tree = parse(
            "<html><body>Reply<div class=\"gmail_quote\"><div class=\"gmail_quote\">On Monday, Bob wrote:<div>Test</div></div></div></body></html>",
        );

        assert!(cut(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "Reply");
        assert!(tree.find("div").is_none());
    }

    #[test_log::test]
    fn forwarded_quote_container() {
        let mut tree = parse(
            "<html><body>Fwd<div class=\"gmail_quote\">---------- Forwarded message ----------<br>From: bob@example.com</div></body></html>",
        );

        assert!(!cut(&mut tree, CutMode::Normal));
    }

    #[test_log::test]
    fn quote_container_in_blockquote() {
        let mut tree = parse(
            "<html><body>Message<blockquote><div class=\"gmail_quote\">My name is William Shakespeare.</div></blockquote></body></html>",
        );

        assert!(!cut(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "MessageMy name is William Shakespeare.");
    }

    #[test_log::test]
    fn blockquote_quote_container() {
        let mut tree = parse(concat!(
            "<html><body>Message<blockquote class=\"gmail_quote\">",
            "<div class=\"gmail_default\">My name is William Shakespeare.<br></div>",
            "</blockquote></body></html>",
        ));

        assert!(cut(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "Message");
        assert!(tree.find("blockquote").is_none());
    }

    #[test_log::test]
    fn zimbra_divider() {
        let mut tree = parse("<html><body>Reply<hr data-marker=\"__DIVIDER__\"><div>Quote</div></body></html>");

        assert!(cut(&mut tree, CutMode::Normal));
        assert!(tree.find("hr").is_none());
    }

    #[test_log::test]
    fn last_outermost_blockquote() {
        let mut tree = parse(
            "<html><body><blockquote>Regular</blockquote>Reply<blockquote>Quote<blockquote>Nested</blockquote></blockquote></body></html>",
        );

        assert!(cut_blockquote(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "RegularReply");
    }

    #[test_log::test]
    fn empty_only_mode() {
        let mut tree = parse("<html><body>Reply<blockquote>Quote</blockquote></body></html>");
        assert!(!cut(&mut tree, CutMode::EmptyOnly));
        assert_eq!(body_text(&tree), "ReplyQuote");

        let mut tree = parse("<html><body>Reply<blockquote>\n  \n</blockquote></body></html>");
        assert!(cut(&mut tree, CutMode::EmptyOnly));
        assert!(tree.find("blockquote").is_none());
    }

    #[test_log::test]
    fn outlook_quote() {
        let mut tree = parse(concat!(
            "<html><body><div>Reply</div>",
            "<div style=\"border:none;border-top:solid #B5C4DF 1.0pt;padding:3.0pt 0cm 0cm 0cm\">",
            "<p>From: Bob</p></div>",
            "<p>Quote</p>",
            "</body></html>",
        ));

        assert!(cut_microsoft_quote(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "Reply");
    }

    #[test_log::test]
    fn outlook_2010_quote() {
        let mut tree = parse(concat!(
            "<html><body><div>Reply</div>",
            "<div><div style=\"border:none; border-top:solid #E1E1E1 1.0pt; padding:3.0pt 0in 0in 0in\">",
            "<p>From: Bob</p></div><p>Quote</p></div>",
            "<p>Signature</p>",
            "</body></html>",
        ));

        assert!(cut_microsoft_quote(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "Reply");
    }

    #[test_log::test]
    fn outlook_2003_quote() {
        let mut tree = parse(concat!(
            "<html><body><div>Reply</div>",
            "<div><div class=\"MsoNormal\" align=\"center\" style=\"text-align:center\">",
            "<font><span><hr size=\"3\" width=\"100%\" align=\"center\" tabindex=\"-1\"></span></font>",
            "</div><p>From: Bob</p></div>",
            "<p>Quote</p>",
            "</body></html>",
        ));

        assert!(cut_microsoft_quote(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "Reply");
    }

    #[test_log::test]
    fn quote_id() {
        let mut tree = parse("<html><body><div>Reply</div><div id=\"OLK_SRC_BODY_SECTION\">Quote</div></body></html>");

        assert!(cut(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "Reply");
    }

    #[test_log::test]
    fn enclosed_from_block() {
        let mut tree = parse(concat!(
            "<html><body>",
            "<div>Reply</div>",
            "<div><b>From: bob@example.com</b><br><b>Date: today</b></div>",
            "<div>Quote</div>",
            "</body></html>",
        ));

        assert!(cut_from_block(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "Reply");
    }

    #[test_log::test]
    fn from_block_tail() {
        let mut tree = parse(concat!(
            "<html><body>",
            "<div>Reply<br><br><hr>Date: today<br>From: bob@example.com<br>Quote</div>",
            "</body></html>",
        ));

        assert!(cut_from_block(&mut tree, CutMode::Normal));
        assert_eq!(body_text(&tree), "Reply");
        assert_eq!(tree.find_all(Tree::ROOT, "br").len(), 2);
    }
}
