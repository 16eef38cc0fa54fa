//! # DOM
//!
//! Module dedicated to the markup tree the HTML pipeline works on.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Detaching
//! a node unlinks it from its parent without freeing it, so ids stay
//! valid for the whole life of the tree. Cloning a [`Tree`] copies the
//! arena: both copies share the same ids but are fully independent.

pub mod html;

use std::mem;

/// Index of a node in its [`Tree`] arena.
pub type NodeId = usize;

/// The kind of content held by a node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeData {
    /// The root of the tree.
    Document,

    /// An element, with its lowercased tag name and its attributes.
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },

    /// A run of text.
    Text(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// The markup tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub const ROOT: NodeId = 0;

    /// Creates a tree made of a lonely document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node::new(data));
        self.nodes.len() - 1
    }

    /// Creates a detached element node.
    pub fn create_element<N, V>(
        &mut self,
        name: impl ToString,
        attrs: impl IntoIterator<Item = (N, V)>,
    ) -> NodeId
    where
        N: ToString,
        V: ToString,
    {
        let attrs = attrs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        self.push(NodeData::Element {
            name: name.to_string().to_lowercase(),
            attrs,
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: impl ToString) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Appends the given detached node to the children of the given
    /// parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let len = self.nodes[parent].children.len();
        self.insert(parent, len, child);
    }

    /// Inserts the given node at the given position among the
    /// children of the given parent. The node is detached first if it
    /// was attached somewhere else.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let index = index.min(self.nodes[parent].children.len());
        self.nodes[parent].children.insert(index, child);
        self.nodes[child].parent = Some(parent);
    }

    /// Unlinks the given node from its parent. Its subtree stays
    /// intact and can be attached again.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|child| *child != id);
        }
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Lists the element children of the given node.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Finds the position of the given node among its siblings.
    pub fn index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Lists the siblings following the given node.
    pub fn following_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match (self.parent(id), self.index(id)) {
            (Some(parent), Some(index)) => self.children(parent)[index + 1..].to_vec(),
            _ => Vec::new(),
        }
    }

    /// Iterates over the ancestors of the given node, closest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |id| self.parent(*id))
    }

    /// Lists the descendants of the given node in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            descendants.push(id);
            stack.extend(self.children(id).iter().rev());
        }

        descendants
    }

    /// Lists the element descendants of the given node with the given
    /// tag name, in document order.
    pub fn find_all(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|id| self.is(*id, name))
            .collect()
    }

    /// Finds the first element of the tree with the given tag name.
    #[cfg(test)]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.descendants(Self::ROOT)
            .into_iter()
            .find(|id| self.is(*id, name))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.data(id), NodeData::Element { .. })
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id), NodeData::Text(_))
    }

    /// Returns `true` if the given node is an element with the given
    /// tag name.
    pub fn is(&self, id: NodeId, name: &str) -> bool {
        self.name(id) == Some(name)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.data(id) {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or_default()
    }

    /// Gets the content of the given text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Replaces the content of the given text node, and returns the
    /// previous one.
    pub fn set_text(&mut self, id: NodeId, text: impl ToString) -> Option<String> {
        match &mut self.nodes[id].data {
            NodeData::Text(prev) => Some(mem::replace(prev, text.to_string())),
            _ => None,
        }
    }

    /// Appends the given string to the content of the given text node.
    pub fn push_text(&mut self, id: NodeId, text: &str) {
        if let NodeData::Text(prev) = &mut self.nodes[id].data {
            prev.push_str(text);
        }
    }

    /// Gets the text node starting the given element, if any.
    pub fn own_text(&self, id: NodeId) -> Option<NodeId> {
        self.first_child(id).filter(|child| self.is_text(*child))
    }

    /// Gets the text node directly following the given element, if
    /// any.
    pub fn tail(&self, id: NodeId) -> Option<NodeId> {
        self.next_sibling(id).filter(|sibling| self.is_text(*sibling))
    }

    /// Concatenates the content of all the text nodes of the given
    /// subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_owned();
        }

        self.descendants(id)
            .into_iter()
            .filter_map(|id| self.text(id))
            .collect()
    }

    /// Gets the `html` element of the document.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(Self::ROOT)
            .iter()
            .copied()
            .find(|id| self.is(*id, "html"))
    }

    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html).iter().copied().find(|id| self.is(*id, "body"))
    }
}
