//! Core tree types.
//!
//! A [`Document`] owns every node in a flat arena and hands out [`NodeId`]s.
//! Nodes keep a parent link and an ordered child list, so moving a node is
//! just relinking it: the node identity (and anything keyed by it) survives
//! relocation, which is what "append an existing element elsewhere" means in
//! a browser DOM.
//!
//! Every method taking a `NodeId` panics if the id was not produced by the
//! same document.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dataset::{Dataset, attribute_to_dataset_key};
use crate::error::{DomError, Result};

/// A document shared between the plugin and the callbacks it leaves behind.
///
/// Validation handlers and deferred layout tasks re-enter the document long
/// after initialization, so the tree lives behind `Rc<RefCell<_>>`.
pub type SharedDocument = Rc<RefCell<Document>>;

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Index of the node inside its document arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An attribute as written in the markup (name case preserved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element payload: tag name and attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl Element {
    /// Look up an attribute value. Names compare ASCII case-insensitively, as in HTML.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The synthetic root every parsed node hangs from.
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed node tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Wrap the document for sharing with callbacks.
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever allocated, root and detached nodes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is attached under the root.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element(Element {
            name: name.to_string(),
            attributes: Vec::new(),
        }))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// The element payload, if `id` is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(id.0)),
        }
    }

    /// Tag name of an element node.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Child nodes that are elements.
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some())
            .collect()
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root(), id)
    }

    /// Unlink a node from its parent. The node and its subtree stay allocated.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Append `child` as the last child of `parent`, moving it if it is already attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if child == self.root() || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest {
                parent: parent.0,
                child: child.0,
            });
        }
        if matches!(self.nodes[parent.0].data, NodeData::Text(_)) {
            return Err(DomError::NotAnElement(parent.0));
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Append several children in order.
    pub fn append_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        for &child in children {
            self.append_child(parent, child)?;
        }
        Ok(())
    }

    /// Detach every current child of `parent` and append `children` instead.
    pub fn replace_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        for old in std::mem::take(&mut self.nodes[parent.0].children) {
            self.nodes[old.0].parent = None;
        }
        self.append_children(parent, children)
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attribute(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute, replacing an existing one with the same (case-insensitive) name.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut(id)?;
        match element
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.value = value.to_string(),
            None => element.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.element_mut(id)?
            .attributes
            .retain(|a| !a.name.eq_ignore_ascii_case(name));
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get_attribute(id, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let classes = match self.get_attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", &classes)
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].data {
            NodeData::Text(text) => out.push_str(text),
            _ => {
                for &child in &self.nodes[id.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Replace all children with a single text node (no node for empty text).
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<()> {
        if let NodeData::Text(existing) = &mut self.nodes[id.0].data {
            *existing = text.to_string();
            return Ok(());
        }
        if text.is_empty() {
            return self.replace_children(id, &[]);
        }
        let node = self.create_text(text);
        self.replace_children(id, &[node])
    }

    /// All descendants of `id` in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// First descendant element carrying `attribute`, like `querySelector("[attr]")`.
    pub fn query_attribute(&self, scope: NodeId, attribute: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| self.has_attribute(id, attribute))
    }

    /// Descendant elements with the given tag name (ASCII case-insensitive).
    pub fn elements_by_tag(&self, scope: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.tag_name(id).is_some_and(|t| t.eq_ignore_ascii_case(name)))
            .collect()
    }

    /// The element's `data-*` attributes keyed the way `HTMLElement.dataset` keys them.
    pub fn dataset(&self, id: NodeId) -> Dataset {
        let mut dataset = Dataset::new();
        if let Some(element) = self.element(id) {
            for attr in &element.attributes {
                if let Some(key) = attribute_to_dataset_key(&attr.name) {
                    dataset.entry(key).or_insert_with(|| attr.value.clone());
                }
            }
        }
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let section = doc.create_element("section");
        let pre = doc.create_element("pre");
        let text = doc.create_text("hello");
        doc.append_child(root, section).unwrap();
        doc.append_child(section, pre).unwrap();
        doc.append_child(pre, text).unwrap();
        (doc, section, pre, text)
    }

    #[test]
    fn test_node_count_and_is_empty() {
        let mut doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.node_count(), 1);

        let detached = doc.create_element("p");
        assert!(doc.is_empty());
        assert_eq!(doc.node_count(), 2);

        let root = doc.root();
        doc.append_child(root, detached).unwrap();
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_append_child_moves_node() {
        let (mut doc, section, pre, _) = tree();
        let other = doc.create_element("div");
        doc.append_child(doc.root(), other).unwrap();

        doc.append_child(other, pre).unwrap();

        assert!(doc.children(section).is_empty());
        assert_eq!(doc.children(other), &[pre]);
        assert_eq!(doc.parent(pre), Some(other));
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let (mut doc, section, pre, _) = tree();
        assert!(matches!(
            doc.append_child(pre, section),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(doc.append_child(pre, pre).is_err());
        assert!(doc.append_child(section, doc.root()).is_err());
    }

    #[test]
    fn test_replace_children_detaches_old_children() {
        let (mut doc, section, pre, _) = tree();
        let div = doc.create_element("div");

        doc.replace_children(section, &[div]).unwrap();

        assert_eq!(doc.children(section), &[div]);
        assert_eq!(doc.parent(pre), None);
        assert!(!doc.is_connected(pre));
        assert!(doc.is_connected(div));
    }

    #[test]
    fn test_attributes_are_case_insensitive() {
        let (mut doc, section, _, _) = tree();
        doc.set_attribute(section, "data-code-exercise-content", "")
            .unwrap();
        assert!(doc.has_attribute(section, "data-code-exercise-Content"));

        doc.set_attribute(section, "DATA-CODE-EXERCISE-CONTENT", "x")
            .unwrap();
        assert_eq!(doc.element(section).unwrap().attributes.len(), 1);
        assert_eq!(doc.get_attribute(section, "data-code-exercise-content"), Some("x"));
    }

    #[test]
    fn test_text_attribute_errors() {
        let (mut doc, _, _, text) = tree();
        assert!(matches!(
            doc.set_attribute(text, "class", "x"),
            Err(DomError::NotAnElement(_))
        ));
    }

    #[test]
    fn test_add_class() {
        let (mut doc, section, _, _) = tree();
        doc.add_class(section, "a").unwrap();
        doc.add_class(section, "b").unwrap();
        doc.add_class(section, "a").unwrap();
        assert_eq!(doc.get_attribute(section, "class"), Some("a b"));
        assert!(doc.has_class(section, "b"));
        assert!(!doc.has_class(section, "c"));
    }

    #[test]
    fn test_text_content_roundtrip() {
        let (mut doc, section, pre, _) = tree();
        assert_eq!(doc.text_content(section), "hello");

        doc.set_text_content(pre, "bye").unwrap();
        assert_eq!(doc.text_content(section), "bye");

        doc.set_text_content(pre, "").unwrap();
        assert!(doc.children(pre).is_empty());
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("c");
        let d = doc.create_element("d");
        doc.append_child(root, a).unwrap();
        doc.append_child(a, b).unwrap();
        doc.append_child(a, c).unwrap();
        doc.append_child(b, d).unwrap();

        assert_eq!(doc.descendants(root), vec![a, b, d, c]);
    }

    #[test]
    fn test_query_attribute_finds_first_match() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.create_element("div");
        let second = doc.create_element("div");
        doc.set_attribute(first, "data-x", "1").unwrap();
        doc.set_attribute(second, "data-x", "2").unwrap();
        doc.append_children(root, &[first, second]).unwrap();

        assert_eq!(doc.query_attribute(root, "data-x"), Some(first));
        assert_eq!(doc.query_attribute(first, "data-x"), None);
    }
}
