//! Owned document tree with a framework-interception seam.

use std::collections::HashMap;
use std::sync::Arc;

use formpilot_protocols::PageError;
use parking_lot::Mutex;

use crate::events::{DomEvent, EventRecord};

/// Index of a node inside its [`PageDocument`].
pub type NodeId = usize;

/// A document behind a lock, shareable with the async injector.
pub type SharedDocument = Arc<Mutex<PageDocument>>;

/// The classes of fillable control the pipeline recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Text,
    Email,
    Password,
    Checkbox,
    Radio,
    Select,
    File,
    TextArea,
    ContentEditable,
}

impl ControlKind {
    /// Controls filled by writing a string value character by character.
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            ControlKind::Text | ControlKind::Email | ControlKind::Password | ControlKind::TextArea
        )
    }
}

/// Framework seam: a page framework that shadows plain value writes.
///
/// `on_assign` sees every plain assignment and returns the value the
/// control actually ends up holding. `on_event` may rewrite the value
/// again in reaction to a dispatched event, returning `Some` to
/// overwrite. Native writes bypass `on_assign` entirely.
pub trait ValueInterceptor: Send + Sync {
    fn on_assign(&self, target: NodeId, requested: &str, previous: &str) -> String;

    fn on_event(&self, target: NodeId, event: &DomEvent, current: &str) -> Option<String> {
        let _ = (target, event, current);
        None
    }
}

/// One element in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub value: String,
    pub checked: bool,
}

/// A mutable element tree standing in for the page being filled.
///
/// Nodes are arena-allocated and addressed by [`NodeId`]. Every value
/// write and event dispatch is recorded so callers can observe what a
/// fill attempt actually did to the page.
pub struct PageDocument {
    nodes: Vec<Node>,
    events: Vec<EventRecord>,
    interceptor: Option<Arc<dyn ValueInterceptor>>,
    cursor: Option<String>,
}

impl PageDocument {
    /// Creates a document holding a single `body` root.
    pub fn new() -> Self {
        let root = Node {
            id: 0,
            tag: "body".to_string(),
            attributes: HashMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            value: String::new(),
            checked: false,
        };
        Self { nodes: vec![root], events: Vec::new(), interceptor: None, cursor: None }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    /// Appends a child element under `parent`. Tags are stored lowercase.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            tag: tag.to_ascii_lowercase(),
            attributes: HashMap::new(),
            text: String::new(),
            parent: Some(parent),
            children: Vec::new(),
            value: String::new(),
            checked: false,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, PageError> {
        self.nodes
            .get(id)
            .ok_or_else(|| PageError::NoSuchNode(id.to_string()))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, PageError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| PageError::NoSuchNode(id.to_string()))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attributes.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id)?.attributes.get(name).map(String::as_str)
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.text = text.to_string();
        }
    }

    /// Number of nodes in the tree, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Classifies `id` as a fillable control, if it is one.
    ///
    /// `input` elements are split by their `type` attribute, with
    /// unknown or absent types treated as plain text. Any element
    /// carrying `contenteditable` or `role="textbox"` counts as an
    /// editable region.
    pub fn control_kind(&self, id: NodeId) -> Option<ControlKind> {
        let node = self.nodes.get(id)?;
        match node.tag.as_str() {
            "input" => {
                let ty = node
                    .attributes
                    .get("type")
                    .map(|t| t.to_ascii_lowercase())
                    .unwrap_or_default();
                Some(match ty.as_str() {
                    "checkbox" => ControlKind::Checkbox,
                    "radio" => ControlKind::Radio,
                    "file" => ControlKind::File,
                    "email" => ControlKind::Email,
                    "password" => ControlKind::Password,
                    _ => ControlKind::Text,
                })
            }
            "select" => Some(ControlKind::Select),
            "textarea" => Some(ControlKind::TextArea),
            _ => {
                let editable = node.attributes.contains_key("contenteditable")
                    || node.attributes.get("role").map(String::as_str) == Some("textbox");
                editable.then_some(ControlKind::ContentEditable)
            }
        }
    }

    /// Concatenated text of `id` and all its descendants, in document
    /// order, whitespace-normalized.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_text(id, &mut parts);
        parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, id: NodeId, out: &mut Vec<String>) {
        if let Some(node) = self.nodes.get(id) {
            if !node.text.is_empty() {
                out.push(node.text.clone());
            }
            for &child in &node.children {
                self.collect_text(child, out);
            }
        }
    }

    /// Current value of a control.
    pub fn value(&self, id: NodeId) -> Result<String, PageError> {
        let node = self.node(id)?;
        if self.control_kind(id).is_none() {
            return Err(PageError::NotAControl(node.tag.clone()));
        }
        if self.control_kind(id) == Some(ControlKind::ContentEditable) {
            return Ok(node.text.clone());
        }
        Ok(node.value.clone())
    }

    pub fn checked(&self, id: NodeId) -> bool {
        self.nodes.get(id).map(|n| n.checked).unwrap_or(false)
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), PageError> {
        self.node_mut(id)?.checked = checked;
        Ok(())
    }

    /// Plain value assignment, routed through the interceptor when one
    /// is installed. This is the write a managed framework can shadow.
    pub fn assign_value(&mut self, id: NodeId, value: &str) -> Result<(), PageError> {
        if self.control_kind(id).is_none() {
            let tag = self.node(id)?.tag.clone();
            return Err(PageError::NotAControl(tag));
        }
        let previous = self.nodes[id].value.clone();
        let effective = match &self.interceptor {
            Some(interceptor) => interceptor.on_assign(id, value, &previous),
            None => value.to_string(),
        };
        self.nodes[id].value = effective;
        Ok(())
    }

    /// Value write through the underlying prototype setter, bypassing
    /// any installed interceptor.
    pub fn set_value_native(&mut self, id: NodeId, value: &str) -> Result<(), PageError> {
        if self.control_kind(id).is_none() {
            let tag = self.node(id)?.tag.clone();
            return Err(PageError::NotAControl(tag));
        }
        self.nodes[id].value = value.to_string();
        Ok(())
    }

    /// Replaces the content of an editable region.
    pub fn set_content(&mut self, id: NodeId, text: &str) -> Result<(), PageError> {
        self.node_mut(id)?.text = text.to_string();
        Ok(())
    }

    /// Dispatches `event` at `id`, recording it and giving the
    /// interceptor a chance to rewrite the control's value in response.
    pub fn dispatch(&mut self, id: NodeId, event: DomEvent) {
        if let Some(interceptor) = self.interceptor.clone() {
            let current = self.nodes.get(id).map(|n| n.value.clone()).unwrap_or_default();
            if let Some(rewritten) = interceptor.on_event(id, &event, &current) {
                if let Some(node) = self.nodes.get_mut(id) {
                    node.value = rewritten;
                }
            }
        }
        self.events.push(EventRecord { target: id, event });
    }

    pub fn set_interceptor(&mut self, interceptor: Arc<dyn ValueInterceptor>) {
        self.interceptor = Some(interceptor);
    }

    pub fn clear_interceptor(&mut self) {
        self.interceptor = None;
    }

    /// All events dispatched so far, oldest first.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Events dispatched at a single node, oldest first.
    pub fn events_for(&self, id: NodeId) -> Vec<DomEvent> {
        self.events
            .iter()
            .filter(|r| r.target == id)
            .map(|r| r.event.clone())
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Document-wide cursor affordance, e.g. `"crosshair"` while the
    /// picker is active.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }

    /// Ids of all nodes in document order. Document order means the
    /// order elements were appended, a depth-first preorder walk.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.walk(self.root())
    }

    fn walk(&self, from: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(id) {
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        order.into_iter()
    }

    /// Descendants of `from` in document order, `from` excluded.
    pub fn descendants(&self, from: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.walk(from).skip(1)
    }

    /// Siblings preceding `id` under its parent, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) else {
            return Vec::new();
        };
        let siblings = &self.nodes[parent].children;
        let Some(pos) = siblings.iter().position(|&s| s == id) else {
            return Vec::new();
        };
        siblings[..pos].iter().rev().copied().collect()
    }

    /// Option children of a select: `(node, value, text)` triples.
    /// An option with no `value` attribute falls back to its text.
    pub fn select_options(&self, select: NodeId) -> Vec<(NodeId, String, String)> {
        let Some(node) = self.nodes.get(select) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter(|&&c| self.nodes[c].tag == "option")
            .map(|&c| {
                let text = self.inner_text(c);
                let value = self
                    .nodes[c]
                    .attributes
                    .get("value")
                    .cloned()
                    .unwrap_or_else(|| text.clone());
                (c, value, text)
            })
            .collect()
    }
}

impl Default for PageDocument {
    fn default() -> Self {
        Self::new()
    }
}
