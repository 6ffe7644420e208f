//! Container scroll locking with exact inline-style restoration.

use dom_host::{DomHost, NodeId};

use crate::theme::format_number;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SavedStyle {
    node: NodeId,
    property: &'static str,
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Inline styles overwritten by [`lock_container`], in write order.
pub struct ScrollLockSnapshot {
    saved: Vec<SavedStyle>,
}

impl ScrollLockSnapshot {
    /// Writes every captured value back, removing properties that were originally absent.
    pub fn restore(self, host: &dyn DomHost) {
        for SavedStyle {
            node,
            property,
            value,
        } in self.saved
        {
            match value {
                Some(value) => host.set_style(node, property, &value),
                None => host.remove_style(node, property),
            }
        }
    }

    /// Returns `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    fn capture(&mut self, host: &dyn DomHost, node: NodeId, property: &'static str) {
        self.saved.push(SavedStyle {
            node,
            property,
            value: host.style(node, property),
        });
    }
}

/// Returns `true` when the container currently shows a vertical scrollbar.
pub fn is_overflowing(host: &dyn DomHost, container: NodeId) -> bool {
    if container == host.body() {
        let viewport = host.viewport_size();
        let root = host.client_size(host.document_element());
        return viewport.width > root.width;
    }
    host.scroll_size(container).height > host.client_size(container).height
}

/// Returns the element whose overflow must be hidden to lock `container`.
///
/// Documents that force `overflow-y: scroll` on `<html>` scroll the root element rather than
/// the body.
pub fn scroll_container(host: &dyn DomHost, container: NodeId) -> NodeId {
    match host.parent(container) {
        Some(parent)
            if host.tag_name(parent) == "html"
                && host.computed_style(parent, "overflow-y").as_deref() == Some("scroll") =>
        {
            parent
        }
        _ => container,
    }
}

/// Hides the container's scrollbar and pads it by the scrollbar width when one was visible.
pub fn lock_container(host: &dyn DomHost, container: NodeId) -> ScrollLockSnapshot {
    let mut snapshot = ScrollLockSnapshot::default();

    if is_overflowing(host, container) {
        let scrollbar = host.scrollbar_width();
        let padding = host
            .computed_style(container, "padding-right")
            .and_then(|value| parse_px(&value))
            .unwrap_or_default();
        snapshot.capture(host, container, "padding-right");
        host.set_style(
            container,
            "padding-right",
            &format!("{}px", format_number(padding + scrollbar)),
        );
    }

    let target = scroll_container(host, container);
    for property in ["overflow", "overflow-x", "overflow-y"] {
        snapshot.capture(host, target, property);
    }
    host.set_style(target, "overflow", "hidden");

    snapshot
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use dom_host::{MemoryDom, Size};
    use pretty_assertions::assert_eq;

    use super::*;

    fn overflowing_body() -> MemoryDom {
        let dom = MemoryDom::new();
        dom.set_viewport(Size::new(1024.0, 768.0));
        dom.set_client_size(dom.document_element(), Size::new(1009.0, 768.0));
        dom.set_scrollbar_width(15.0);
        dom.set_computed_style(dom.body(), "padding-right", "8px");
        dom
    }

    #[test]
    fn lock_pads_by_measured_scrollbar_and_restores_exactly() {
        let dom = overflowing_body();
        let body = dom.body();
        dom.set_style(body, "color", "red");
        dom.set_style(body, "overflow", "auto");
        let before = dom.style_text(body);

        let snapshot = lock_container(&dom, body);
        assert_eq!(dom.style(body, "padding-right").as_deref(), Some("23px"));
        assert_eq!(dom.style(body, "overflow").as_deref(), Some("hidden"));

        snapshot.restore(&dom);
        assert_eq!(dom.style_text(body), before);
    }

    #[test]
    fn non_overflowing_container_only_hides_overflow() {
        let dom = MemoryDom::new();
        dom.set_client_size(dom.document_element(), Size::new(1024.0, 768.0));
        let body = dom.body();

        let snapshot = lock_container(&dom, body);
        assert_eq!(dom.style(body, "padding-right"), None);
        assert_eq!(dom.style_text(body), "overflow: hidden;");

        snapshot.restore(&dom);
        assert_eq!(dom.style_text(body), "");
    }

    #[test]
    fn html_with_forced_scroll_becomes_scroll_container() {
        let dom = MemoryDom::new();
        let html = dom.document_element();
        dom.set_computed_style(html, "overflow-y", "scroll");
        assert_eq!(scroll_container(&dom, dom.body()), html);
    }
}
