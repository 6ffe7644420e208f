//! Sequential focus ordering and sibling filtering shared by host implementations.

use crate::NodeId;

/// Tags whose elements are never aria-hidden by the modal manager.
const FORBIDDEN_SIBLING_TAGS: [&str; 14] = [
    "template", "script", "style", "link", "map", "meta", "noscript", "picture", "col",
    "colgroup", "param", "slot", "source", "track",
];

/// Returns `true` for elements that carry no rendered content and must not be aria-hidden.
pub fn is_forbidden_sibling_tag(tag: &str, input_type: Option<&str>) -> bool {
    let tag = tag.to_ascii_lowercase();
    if FORBIDDEN_SIBLING_TAGS.contains(&tag.as_str()) {
        return true;
    }
    tag == "input" && input_type.is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One focusable candidate found under a trap root.
pub struct TabbableCandidate {
    /// Candidate node.
    pub node: NodeId,
    /// Effective `tabIndex`.
    pub tab_index: i32,
    /// Position in document order.
    pub document_order: usize,
}

/// Sorts candidates into browser sequential-navigation order.
///
/// Negative `tabIndex` values are dropped. Positive values come first in ascending order, ties
/// broken by document order; `tabIndex == 0` follows in document order.
pub fn order_tabbable(mut candidates: Vec<TabbableCandidate>) -> Vec<NodeId> {
    candidates.retain(|candidate| candidate.tab_index >= 0);
    candidates.sort_by(|a, b| {
        let rank = |c: &TabbableCandidate| (c.tab_index == 0, c.tab_index, c.document_order);
        rank(a).cmp(&rank(b))
    });
    candidates.into_iter().map(|candidate| candidate.node).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn candidate(id: u64, tab_index: i32, order: usize) -> TabbableCandidate {
        TabbableCandidate {
            node: NodeId(id),
            tab_index,
            document_order: order,
        }
    }

    #[test]
    fn positive_tab_index_precedes_document_order() {
        let ordered = order_tabbable(vec![
            candidate(1, 0, 0),
            candidate(2, 2, 1),
            candidate(3, -1, 2),
            candidate(4, 1, 3),
            candidate(5, 0, 4),
        ]);
        assert_eq!(ordered, vec![NodeId(4), NodeId(2), NodeId(1), NodeId(5)]);
    }

    #[test]
    fn hidden_inputs_and_metadata_tags_are_forbidden() {
        assert!(is_forbidden_sibling_tag("SCRIPT", None));
        assert!(is_forbidden_sibling_tag("input", Some("hidden")));
        assert!(!is_forbidden_sibling_tag("input", Some("text")));
        assert!(!is_forbidden_sibling_tag("div", None));
    }
}
