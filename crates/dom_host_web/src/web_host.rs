//! [`DomHost`] implementation over the live browser document.

use dom_host::{order_tabbable, DomHost, NodeId, Rect, Size, TabbableCandidate};
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, Window};

use crate::{effective_tab_index, ElementRegistry, TABBABLE_SELECTOR};

const SCROLLBAR_PROBE_STYLE: &str =
    "width: 99px; height: 99px; position: absolute; top: -9999px; overflow: scroll;";

#[derive(Debug, Clone, Default)]
/// Browser host; clones share one [`ElementRegistry`].
pub struct WebDomHost {
    registry: ElementRegistry,
}

impl WebDomHost {
    /// Creates a host with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns (registering if needed) the id of `element`.
    pub fn node_id(&self, element: &Element) -> NodeId {
        self.registry.node_id(element)
    }

    /// Resolves an id back to its element.
    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.registry.element(node)
    }

    /// Drops the registry entry for an element that has been unmounted.
    pub fn release(&self, node: NodeId) {
        self.registry.release(node);
    }

    fn html_element(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }

    fn inline_style(&self, node: NodeId) -> Option<CssStyleDeclaration> {
        self.html_element(node).map(|element| element.style())
    }
}

fn window() -> Option<Window> {
    web_sys::window()
}

fn document() -> Option<Document> {
    window()?.document()
}

impl DomHost for WebDomHost {
    fn body(&self) -> NodeId {
        match document().and_then(|doc| doc.body()) {
            Some(body) => self.node_id(&body),
            None => self.document_element(),
        }
    }

    fn document_element(&self) -> NodeId {
        match document().and_then(|doc| doc.document_element()) {
            Some(root) => self.node_id(&root),
            None => NodeId(0),
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.element(node)?.parent_element()?;
        Some(self.node_id(&parent))
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let Some(element) = self.element(node) else {
            return Vec::new();
        };
        let children = element.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .map(|child| self.node_id(&child))
            .collect()
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Some(ancestor), Some(node)) => ancestor.contains(Some(&node)),
            _ => false,
        }
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.element(node)
            .map(|element| element.is_connected())
            .unwrap_or(false)
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node)
            .map(|element| element.tag_name().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn text_content(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|element| element.text_content())
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.set_attribute(name, value);
        }
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.remove_attribute(name);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.inline_style(node)?
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(style) = self.inline_style(node) {
            let _ = style.set_property(property, value);
        }
    }

    fn remove_style(&self, node: NodeId, property: &str) {
        if let Some(style) = self.inline_style(node) {
            let _ = style.remove_property(property);
        }
    }

    fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        let element = self.element(node)?;
        window()?
            .get_computed_style(&element)
            .ok()
            .flatten()?
            .get_property_value(property)
            .ok()
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.element(node)
            .map(|element| {
                let rect = element.get_bounding_client_rect();
                Rect::new(rect.top(), rect.left(), rect.width(), rect.height())
            })
            .unwrap_or_default()
    }

    fn offset_size(&self, node: NodeId) -> Size {
        self.html_element(node)
            .map(|element| {
                Size::new(
                    f64::from(element.offset_width()),
                    f64::from(element.offset_height()),
                )
            })
            .unwrap_or_default()
    }

    fn client_size(&self, node: NodeId) -> Size {
        self.element(node)
            .map(|element| {
                Size::new(
                    f64::from(element.client_width()),
                    f64::from(element.client_height()),
                )
            })
            .unwrap_or_default()
    }

    fn scroll_size(&self, node: NodeId) -> Size {
        self.element(node)
            .map(|element| {
                Size::new(
                    f64::from(element.scroll_width()),
                    f64::from(element.scroll_height()),
                )
            })
            .unwrap_or_default()
    }

    fn set_scroll_top(&self, node: NodeId, value: f64) {
        if let Some(element) = self.element(node) {
            element.set_scroll_top(value.round() as i32);
        }
    }

    fn viewport_size(&self) -> Size {
        let Some(window) = window() else {
            return Size::default();
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or_default();
        let height = window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or_default();
        Size::new(width, height)
    }

    fn scrollbar_width(&self) -> f64 {
        let Some(document) = document() else {
            return 0.0;
        };
        let (Some(body), Ok(probe)) = (document.body(), document.create_element("div")) else {
            return 0.0;
        };
        let _ = probe.set_attribute("style", SCROLLBAR_PROBE_STYLE);
        if body.append_child(&probe).is_err() {
            return 0.0;
        }
        let width = probe
            .dyn_ref::<HtmlElement>()
            .map(|probe| f64::from(probe.offset_width() - probe.client_width()))
            .unwrap_or_default();
        probe.remove();
        width.max(0.0)
    }

    fn reflow(&self, node: NodeId) {
        if let Some(element) = self.element(node) {
            let _ = element.scroll_top();
        }
    }

    fn active_element(&self) -> Option<NodeId> {
        let active = document()?.active_element()?;
        Some(self.node_id(&active))
    }

    fn focus(&self, node: NodeId) {
        if let Some(element) = self.html_element(node) {
            let _ = element.focus();
        }
    }

    fn tabbable_descendants(&self, root: NodeId) -> Vec<NodeId> {
        let Some(root) = self.element(root) else {
            return Vec::new();
        };
        let Ok(list) = root.query_selector_all(TABBABLE_SELECTOR) else {
            return Vec::new();
        };
        let candidates = (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .filter(|element| !element.has_attribute("disabled"))
            .enumerate()
            .map(|(document_order, element)| TabbableCandidate {
                node: self.node_id(&element),
                tab_index: effective_tab_index(
                    element.get_attribute("tabindex").as_deref(),
                    &element.tag_name(),
                    element.is_content_editable(),
                    element.tab_index(),
                ),
                document_order,
            })
            .collect();
        order_tabbable(candidates)
    }
}
