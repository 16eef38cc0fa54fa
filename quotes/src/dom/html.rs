//! # HTML
//!
//! Module dedicated to the conversion of HTML documents from and to
//! [`Tree`]s, using [`html5ever`] as parser and serializer.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use html5ever::{
    ns, parse_document,
    serialize::{SerializeOpts, TraversalScope},
    tendril::TendrilSink,
    Attribute, LocalName, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData as RcNodeData, RcDom, SerializableHandle};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::{NodeData, NodeId, Tree};
use crate::{Error, Result};

static XML_DECLARATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\?xml[^>]*\?>").unwrap());

static DOCTYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<!DOCTYPE[^>]*>").unwrap());

/// Prepares the given raw HTML for parsing: removes XML declarations
/// and doctypes, normalizes line endings and makes sure the content
/// is wrapped into `html` and `body` elements.
pub fn normalize(html: &str) -> String {
    let html = XML_DECLARATION.replace_all(html, "");
    let html = DOCTYPE.replace_all(&html, "");
    let html = html.replace("\r\n", "\n");

    let lowercase = html.to_lowercase();

    let html = if lowercase.contains("<body") || lowercase.contains("<html") {
        html
    } else {
        format!("<body>{html}</body>")
    };

    if lowercase.contains("<html") {
        html
    } else {
        format!("<html>{html}</html>")
    }
}

/// Parses the given HTML into a tree.
///
/// Parsing never fails: invalid markup is recovered the way browsers
/// do. Comments, doctypes and processing instructions are dropped, as
/// well as a stray text node trailing the `html` element.
pub fn parse(html: &str) -> Tree {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    let mut tree = Tree::new();
    import(&mut tree, &dom.document);

    if let Some(html) = tree.document_element() {
        let last = tree.children(html).last().copied();
        if let Some(text) = last.filter(|id| tree.is_text(*id)) {
            trace!("dropping trailing text node of html element");
            tree.detach(text);
        }
    }

    tree
}

/// Copies the children of the given rcdom document into the tree.
///
/// The walk uses an explicit stack, deeply nested documents would
/// overflow the call stack otherwise.
fn import(tree: &mut Tree, document: &Handle) {
    let mut stack: Vec<(NodeId, Handle)> = document
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| (Tree::ROOT, child.clone()))
        .collect();

    while let Some((parent, handle)) = stack.pop() {
        let id = match &handle.data {
            RcNodeData::Element { name, attrs, .. } => {
                let attrs: Vec<(String, String)> = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                tree.create_element(&*name.local, attrs)
            }
            RcNodeData::Text { contents } => {
                let contents = contents.borrow();
                let text: &str = &contents;
                tree.create_text(text)
            }
            _ => continue,
        };

        tree.append(parent, id);

        let children = handle.children.borrow();
        stack.extend(children.iter().rev().map(|child| (id, child.clone())));
    }
}

/// Serializes the given tree into HTML.
///
/// Empty `head` elements are omitted.
pub fn serialize(tree: &Tree) -> Result<String> {
    let document = export(tree);
    let mut output = Vec::new();

    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };

    html5ever::serialize(&mut output, &SerializableHandle::from(document), opts)
        .map_err(Error::SerializeHtmlError)?;

    String::from_utf8(output).map_err(Error::ConvertHtmlToUtf8Error)
}

/// Builds the rcdom counterpart of the given tree, with an explicit
/// stack for the same reason as [`import`].
fn export(tree: &Tree) -> Handle {
    let document = new_handle(RcNodeData::Document);
    let mut stack: Vec<(NodeId, Handle)> = vec![(Tree::ROOT, document.clone())];

    while let Some((id, handle)) = stack.pop() {
        let children: Vec<(NodeId, Handle)> = tree
            .children(id)
            .iter()
            .filter(|child| !is_empty_head(tree, **child))
            .map(|child| (*child, new_handle(export_data(tree, *child))))
            .collect();

        handle
            .children
            .borrow_mut()
            .extend(children.iter().map(|(_, child)| child.clone()));

        stack.extend(children.into_iter().rev());
    }

    document
}

fn export_data(tree: &Tree, id: NodeId) -> RcNodeData {
    match tree.data(id) {
        NodeData::Document => RcNodeData::Document,
        NodeData::Element { name, attrs } => RcNodeData::Element {
            name: QualName::new(None, ns!(html), LocalName::from(name.as_str())),
            attrs: RefCell::new(
                attrs
                    .iter()
                    .map(|(name, value)| Attribute {
                        name: QualName::new(None, ns!(), LocalName::from(name.as_str())),
                        value: value.as_str().into(),
                    })
                    .collect(),
            ),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
        NodeData::Text(text) => RcNodeData::Text {
            contents: RefCell::new(text.as_str().into()),
        },
    }
}

fn new_handle(data: RcNodeData) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data,
    })
}

fn is_empty_head(tree: &Tree, id: NodeId) -> bool {
    tree.is(id, "head") && tree.children(id).is_empty()
}
