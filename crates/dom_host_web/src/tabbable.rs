//! Tabbable-element discovery rules used by the browser host.

/// Selector matching every element that may take part in sequential focus navigation.
pub const TABBABLE_SELECTOR: &str = "input:not([type=hidden]),select,textarea,a[href],button,[tabindex],audio[controls],video[controls],[contenteditable]:not([contenteditable=\"false\"])";

/// Resolves the effective tab index of a candidate.
///
/// An explicit, parseable `tabindex` attribute wins. Content-editable elements and media or
/// `details` elements without one behave as `0`; everything else reports the element's own
/// `tabIndex` property.
pub fn effective_tab_index(
    tab_index_attribute: Option<&str>,
    tag: &str,
    content_editable: bool,
    property_tab_index: i32,
) -> i32 {
    if let Some(parsed) = tab_index_attribute.and_then(|raw| raw.trim().parse::<i32>().ok()) {
        return parsed;
    }
    let tag = tag.to_ascii_lowercase();
    if content_editable || matches!(tag.as_str(), "audio" | "video" | "details") {
        return 0;
    }
    property_tab_index
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn explicit_attribute_overrides_property() {
        assert_eq!(effective_tab_index(Some("3"), "div", false, -1), 3);
        assert_eq!(effective_tab_index(Some("nope"), "button", false, 0), 0);
    }

    #[test]
    fn media_and_editable_default_to_zero() {
        assert_eq!(effective_tab_index(None, "VIDEO", false, -1), 0);
        assert_eq!(effective_tab_index(None, "div", true, -1), 0);
        assert_eq!(effective_tab_index(None, "div", false, -1), -1);
    }
}
