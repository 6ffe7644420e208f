//! In-memory element tree implementing [`DomHost`] for tests and non-browser builds.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{order_tabbable, DomHost, NodeId, Rect, Size, TabbableCandidate};

const NATIVELY_FOCUSABLE: [&str; 4] = ["button", "input", "select", "textarea"];

#[derive(Debug, Clone, PartialEq)]
/// Mutating operation recorded by [`MemoryDom`], in call order.
pub enum DomOp {
    /// `reflow(node)` was requested.
    Reflow(NodeId),
    /// An inline style property was written.
    SetStyle(NodeId, String, String),
    /// An inline style property was removed.
    RemoveStyle(NodeId, String),
    /// An attribute was written.
    SetAttribute(NodeId, String, String),
    /// An attribute was removed.
    RemoveAttribute(NodeId, String),
    /// Focus moved to the node.
    Focus(NodeId),
}

#[derive(Debug, Clone, Default)]
struct MemoryNode {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    inline_style: Vec<(String, String)>,
    computed_style: BTreeMap<String, String>,
    text: String,
    rect: Rect,
    offset: Size,
    client: Size,
    scroll: Size,
    scroll_top: f64,
}

#[derive(Debug)]
struct MemoryDomInner {
    nodes: Vec<MemoryNode>,
    active: Option<NodeId>,
    viewport: Size,
    scrollbar_width: f64,
    log: Vec<DomOp>,
}

#[derive(Debug, Clone)]
/// Shared in-memory document with an `<html>` root and a `<body>` child.
pub struct MemoryDom {
    inner: Rc<RefCell<MemoryDomInner>>,
}

const HTML: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

impl Default for MemoryDom {
    fn default() -> Self {
        let html = MemoryNode {
            tag: "html".to_string(),
            children: vec![BODY],
            ..MemoryNode::default()
        };
        let body = MemoryNode {
            tag: "body".to_string(),
            parent: Some(HTML),
            ..MemoryNode::default()
        };
        Self {
            inner: Rc::new(RefCell::new(MemoryDomInner {
                nodes: vec![html, body],
                active: None,
                viewport: Size::new(1024.0, 768.0),
                scrollbar_width: 0.0,
                log: Vec::new(),
            })),
        }
    }
}

impl MemoryDom {
    /// Creates an empty document with a 1024×768 viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let id = NodeId(inner.nodes.len() as u64);
        inner.nodes.push(MemoryNode {
            tag: tag.to_ascii_lowercase(),
            ..MemoryNode::default()
        });
        id
    }

    /// Creates an element and appends it to `parent`.
    pub fn append_new(&self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        node
    }

    /// Appends `child` to `parent`, detaching it from any previous parent first.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let mut inner = self.inner.borrow_mut();
        if let Some(node) = inner.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = inner.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Detaches `node` (and its subtree) from the document.
    pub fn detach(&self, node: NodeId) {
        let mut inner = self.inner.borrow_mut();
        let Some(parent) = inner.node(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent) = inner.node_mut(parent) {
            parent.children.retain(|child| *child != node);
        }
        if let Some(node) = inner.node_mut(node) {
            node.parent = None;
        }
    }

    /// Sets the node's text.
    pub fn set_text(&self, node: NodeId, text: &str) {
        if let Some(node) = self.inner.borrow_mut().node_mut(node) {
            node.text = text.to_string();
        }
    }

    /// Sets the client bounding rectangle, also used for offset/client sizes when unset.
    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        if let Some(node) = self.inner.borrow_mut().node_mut(node) {
            node.rect = rect;
            node.offset = rect.size();
            node.client = rect.size();
            node.scroll = rect.size();
        }
    }

    /// Overrides `clientWidth`/`clientHeight`.
    pub fn set_client_size(&self, node: NodeId, size: Size) {
        if let Some(node) = self.inner.borrow_mut().node_mut(node) {
            node.client = size;
        }
    }

    /// Overrides `scrollWidth`/`scrollHeight`.
    pub fn set_scroll_size(&self, node: NodeId, size: Size) {
        if let Some(node) = self.inner.borrow_mut().node_mut(node) {
            node.scroll = size;
        }
    }

    /// Sets a computed style value.
    pub fn set_computed_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(node) = self.inner.borrow_mut().node_mut(node) {
            node.computed_style
                .insert(property.to_string(), value.to_string());
        }
    }

    /// Sets the window inner size.
    pub fn set_viewport(&self, size: Size) {
        self.inner.borrow_mut().viewport = size;
    }

    /// Sets the measured scrollbar width.
    pub fn set_scrollbar_width(&self, width: f64) {
        self.inner.borrow_mut().scrollbar_width = width;
    }

    /// Returns the inline style serialized like `element.style.cssText`.
    pub fn style_text(&self, node: NodeId) -> String {
        self.inner
            .borrow()
            .node(node)
            .map(|node| {
                node.inline_style
                    .iter()
                    .map(|(property, value)| format!("{property}: {value};"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    /// Returns the last written `scrollTop`.
    pub fn scroll_top(&self, node: NodeId) -> f64 {
        self.inner
            .borrow()
            .node(node)
            .map(|node| node.scroll_top)
            .unwrap_or_default()
    }

    /// Drains the recorded operation log.
    pub fn take_log(&self) -> Vec<DomOp> {
        std::mem::take(&mut self.inner.borrow_mut().log)
    }
}

impl MemoryDomInner {
    fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.node(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.node(root) else {
            return;
        };
        for child in &node.children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn collect_text(&self, root: NodeId, out: &mut String) {
        let Some(node) = self.node(root) else {
            return;
        };
        out.push_str(&node.text);
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    fn tab_index(&self, id: NodeId) -> Option<i32> {
        let node = self.node(id)?;
        if node.attributes.contains_key("disabled") {
            return None;
        }
        if let Some(raw) = node.attributes.get("tabindex") {
            return raw.trim().parse().ok();
        }
        let hidden_input = node.tag == "input"
            && node
                .attributes
                .get("type")
                .is_some_and(|kind| kind == "hidden");
        let anchor_with_href = node.tag == "a" && node.attributes.contains_key("href");
        if (NATIVELY_FOCUSABLE.contains(&node.tag.as_str()) && !hidden_input) || anchor_with_href
        {
            Some(0)
        } else {
            None
        }
    }
}

impl DomHost for MemoryDom {
    fn body(&self) -> NodeId {
        BODY
    }

    fn document_element(&self) -> NodeId {
        HTML
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inner.borrow().is_ancestor(ancestor, node)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.inner.borrow().is_ancestor(HTML, node)
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.inner
            .borrow()
            .node(node)
            .map(|n| n.tag.clone())
            .unwrap_or_default()
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        self.inner.borrow().collect_text(node, &mut text);
        text
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .node(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(n) = inner.node_mut(node) {
            n.attributes.insert(name.to_string(), value.to_string());
            inner.log.push(DomOp::SetAttribute(
                node,
                name.to_string(),
                value.to_string(),
            ));
        }
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(n) = inner.node_mut(node) {
            n.attributes.remove(name);
            inner
                .log
                .push(DomOp::RemoveAttribute(node, name.to_string()));
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.inner.borrow().node(node).and_then(|n| {
            n.inline_style
                .iter()
                .find(|(name, value)| name == property && !value.is_empty())
                .map(|(_, value)| value.clone())
        })
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if value.is_empty() {
            self.remove_style(node, property);
            return;
        }
        let mut inner = self.inner.borrow_mut();
        if let Some(n) = inner.node_mut(node) {
            match n.inline_style.iter_mut().find(|(name, _)| name == property) {
                Some((_, current)) => *current = value.to_string(),
                None => n
                    .inline_style
                    .push((property.to_string(), value.to_string())),
            }
            inner.log.push(DomOp::SetStyle(
                node,
                property.to_string(),
                value.to_string(),
            ));
        }
    }

    fn remove_style(&self, node: NodeId, property: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(n) = inner.node_mut(node) {
            n.inline_style.retain(|(name, _)| name != property);
            inner
                .log
                .push(DomOp::RemoveStyle(node, property.to_string()));
        }
    }

    fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        let inner = self.inner.borrow();
        let n = inner.node(node)?;
        n.inline_style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.clone())
            .or_else(|| n.computed_style.get(property).cloned())
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        let inner = self.inner.borrow();
        if !inner.is_ancestor(HTML, node) {
            return Rect::default();
        }
        inner.node(node).map(|n| n.rect).unwrap_or_default()
    }

    fn offset_size(&self, node: NodeId) -> Size {
        self.inner
            .borrow()
            .node(node)
            .map(|n| n.offset)
            .unwrap_or_default()
    }

    fn client_size(&self, node: NodeId) -> Size {
        self.inner
            .borrow()
            .node(node)
            .map(|n| n.client)
            .unwrap_or_default()
    }

    fn scroll_size(&self, node: NodeId) -> Size {
        self.inner
            .borrow()
            .node(node)
            .map(|n| n.scroll)
            .unwrap_or_default()
    }

    fn set_scroll_top(&self, node: NodeId, value: f64) {
        if let Some(n) = self.inner.borrow_mut().node_mut(node) {
            n.scroll_top = value;
        }
    }

    fn viewport_size(&self) -> Size {
        self.inner.borrow().viewport
    }

    fn scrollbar_width(&self) -> f64 {
        self.inner.borrow().scrollbar_width
    }

    fn reflow(&self, node: NodeId) {
        self.inner.borrow_mut().log.push(DomOp::Reflow(node));
    }

    fn active_element(&self) -> Option<NodeId> {
        let inner = self.inner.borrow();
        inner.active.filter(|node| inner.is_ancestor(HTML, *node))
    }

    fn focus(&self, node: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if !inner.is_ancestor(HTML, node) {
            return;
        }
        inner.active = Some(node);
        inner.log.push(DomOp::Focus(node));
    }

    fn tabbable_descendants(&self, root: NodeId) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        let mut nodes = Vec::new();
        inner.descendants(root, &mut nodes);
        let candidates = nodes
            .into_iter()
            .enumerate()
            .filter_map(|(document_order, node)| {
                inner.tab_index(node).map(|tab_index| TabbableCandidate {
                    node,
                    tab_index,
                    document_order,
                })
            })
            .collect();
        order_tabbable(candidates)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn detached_nodes_lose_geometry_and_focus() {
        let dom = MemoryDom::new();
        let button = dom.append_new(dom.body(), "button");
        dom.set_rect(button, Rect::new(10.0, 10.0, 40.0, 20.0));
        dom.focus(button);
        assert_eq!(dom.active_element(), Some(button));

        dom.detach(button);
        assert_eq!(dom.active_element(), None);
        assert!(dom.bounding_rect(button).is_degenerate());
        assert!(!dom.is_connected(button));
    }

    #[test]
    fn style_text_preserves_insertion_order() {
        let dom = MemoryDom::new();
        let body = dom.body();
        dom.set_style(body, "color", "red");
        dom.set_style(body, "overflow", "hidden");
        dom.set_style(body, "color", "blue");
        assert_eq!(dom.style_text(body), "color: blue; overflow: hidden;");
        dom.remove_style(body, "color");
        assert_eq!(dom.style_text(body), "overflow: hidden;");
    }

    #[test]
    fn tabbable_descendants_skip_disabled_and_negative_tab_index() {
        let dom = MemoryDom::new();
        let root = dom.append_new(dom.body(), "div");
        let first = dom.append_new(root, "button");
        let disabled = dom.append_new(root, "button");
        dom.set_attribute(disabled, "disabled", "");
        let skipped = dom.append_new(root, "div");
        dom.set_attribute(skipped, "tabindex", "-1");
        let custom = dom.append_new(root, "div");
        dom.set_attribute(custom, "tabindex", "0");

        assert_eq!(dom.tabbable_descendants(root), vec![first, custom]);
    }
}
