//! UI-node identity and the command surface overlay logic issues against a live tree.

use crate::{Rect, Size};

/// DOM `Node.ELEMENT_NODE` constant, used to tell real elements from virtual anchors.
pub const ELEMENT_NODE: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Stable identity of one element known to a [`DomHost`].
pub struct NodeId(pub u64);

/// Minimal element-tree interface consumed by the overlay runtime.
///
/// Every method is infallible from the caller's point of view: hosts report missing nodes as
/// `None`/empty values and ignore writes against nodes they no longer know.
pub trait DomHost {
    /// Returns the document body.
    fn body(&self) -> NodeId;

    /// Returns the document element (`<html>`).
    fn document_element(&self) -> NodeId;

    /// Returns the parent element, if any.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Returns element children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Returns `true` when `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Returns `true` while the node is attached to the document.
    fn is_connected(&self, node: NodeId) -> bool;

    /// Returns the lowercase tag name.
    fn tag_name(&self, node: NodeId) -> String;

    /// Returns the trimmed-ready rendered text of the node.
    fn text_content(&self, node: NodeId) -> String;

    /// Reads an attribute.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Writes an attribute.
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    /// Removes an attribute.
    fn remove_attribute(&self, node: NodeId, name: &str);

    /// Reads an inline style property (`None` when unset or empty).
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Writes an inline style property.
    fn set_style(&self, node: NodeId, property: &str, value: &str);

    /// Removes an inline style property.
    fn remove_style(&self, node: NodeId, property: &str);

    /// Reads a computed style property.
    fn computed_style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Returns the client bounding rectangle.
    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Returns `offsetWidth`/`offsetHeight`.
    fn offset_size(&self, node: NodeId) -> Size;

    /// Returns `clientWidth`/`clientHeight`.
    fn client_size(&self, node: NodeId) -> Size;

    /// Returns `scrollWidth`/`scrollHeight`.
    fn scroll_size(&self, node: NodeId) -> Size;

    /// Writes `scrollTop`.
    fn set_scroll_top(&self, node: NodeId, value: f64);

    /// Returns the window inner size.
    fn viewport_size(&self) -> Size;

    /// Measures the platform scrollbar width with a probe element.
    fn scrollbar_width(&self) -> f64;

    /// Forces a synchronous layout flush for `node`.
    fn reflow(&self, node: NodeId);

    /// Returns the focused element.
    fn active_element(&self) -> Option<NodeId>;

    /// Moves focus to `node`.
    fn focus(&self, node: NodeId);

    /// Returns keyboard-reachable descendants of `root` in sequential focus order.
    fn tabbable_descendants(&self, root: NodeId) -> Vec<NodeId>;
}
