//! Menu surface rules layered on the popover: origins per text direction, initial focus, and
//! closing on Tab.

use dom_host::{DomHost, NodeId};

use crate::{
    menu_list::{active_item_index, MenuEntry, MenuVariant},
    modal::CloseReason,
    positioning::{HorizontalOrigin, Origin, VerticalOrigin},
    theme::TextDirection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Props of a menu that affect focus.
pub struct MenuOptions {
    /// Focus the list or an item on open.
    pub auto_focus: bool,
    /// Focus the list rather than an item.
    pub disable_auto_focus_item: bool,
    /// Initial item selection rule.
    pub variant: MenuVariant,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            auto_focus: true,
            disable_auto_focus_item: false,
            variant: MenuVariant::SelectedMenu,
        }
    }
}

/// `(anchor_origin, transform_origin)` for a menu: below the anchor, aligned to its start edge.
pub const fn menu_origins(direction: TextDirection) -> (Origin, Origin) {
    let horizontal = match direction {
        TextDirection::Ltr => HorizontalOrigin::Left,
        TextDirection::Rtl => HorizontalOrigin::Right,
    };
    (
        Origin::new(VerticalOrigin::Bottom, horizontal),
        Origin::new(VerticalOrigin::Top, horizontal),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where focus goes when a menu opens.
pub struct MenuFocusPlan {
    /// Focus the list element itself.
    pub focus_list: bool,
    /// Item that gets `autofocus`.
    pub focus_item: Option<usize>,
    /// Item holding the roving `tabindex="0"`.
    pub tab_stop: Option<usize>,
}

/// Computes the focus plan for an open (or closed) menu.
pub fn menu_focus_plan(options: MenuOptions, open: bool, entries: &[MenuEntry]) -> MenuFocusPlan {
    let active = active_item_index(entries, options.variant);
    let auto_focus_item = options.auto_focus && !options.disable_auto_focus_item && open;
    MenuFocusPlan {
        focus_list: options.auto_focus && (active.is_none() || options.disable_auto_focus_item),
        focus_item: active.filter(|_| auto_focus_item),
        tab_stop: active.filter(|_| options.variant == MenuVariant::SelectedMenu),
    }
}

/// Moves the roving `tabindex="0"` to `items[stop]`; every other item that held it drops to
/// `-1`, so the list keeps at most one tab stop.
pub fn apply_tab_stop(host: &dyn DomHost, items: &[NodeId], stop: Option<usize>) {
    for (index, item) in items.iter().enumerate() {
        if Some(index) == stop {
            host.set_attribute(*item, "tabindex", "0");
        } else if host.attribute(*item, "tabindex").as_deref() == Some("0") {
            host.set_attribute(*item, "tabindex", "-1");
        }
    }
}

/// Close request for a keydown inside the menu list; Tab closes without moving focus.
pub fn menu_key_close(key: &str) -> Option<CloseReason> {
    (key == "Tab").then_some(CloseReason::TabKeyDown)
}

#[cfg(test)]
mod tests {
    use dom_host::MemoryDom;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rtl_menus_hang_from_the_right_edge() {
        let (anchor, transform) = menu_origins(TextDirection::Rtl);
        assert_eq!(anchor, Origin::new(VerticalOrigin::Bottom, HorizontalOrigin::Right));
        assert_eq!(transform, Origin::new(VerticalOrigin::Top, HorizontalOrigin::Right));
        assert_eq!(
            menu_origins(TextDirection::Ltr).0.horizontal,
            HorizontalOrigin::Left
        );
    }

    #[test]
    fn focus_plan_targets_the_active_item_when_open() {
        let entries = [MenuEntry::default(), MenuEntry::default()];
        let plan = menu_focus_plan(MenuOptions::default(), true, &entries);
        assert_eq!(
            plan,
            MenuFocusPlan {
                focus_list: false,
                focus_item: Some(0),
                tab_stop: Some(0),
            }
        );

        let closed = menu_focus_plan(MenuOptions::default(), false, &entries);
        assert_eq!(closed.focus_item, None);

        let list_only = menu_focus_plan(
            MenuOptions {
                disable_auto_focus_item: true,
                variant: MenuVariant::Menu,
                ..MenuOptions::default()
            },
            true,
            &entries,
        );
        assert!(list_only.focus_list);
        assert_eq!(list_only.tab_stop, None);
    }

    #[test]
    fn tab_closes_with_tab_key_down() {
        assert_eq!(menu_key_close("Tab"), Some(CloseReason::TabKeyDown));
        assert_eq!(menu_key_close("ArrowDown"), None);
    }

    #[test]
    fn moving_the_tab_stop_leaves_a_single_one() {
        let dom = MemoryDom::new();
        let list = dom.append_new(dom.body(), "ul");
        let items: Vec<NodeId> = (0..3).map(|_| dom.append_new(list, "li")).collect();
        let separator = dom.append_new(list, "li");
        for item in &items {
            dom.set_attribute(*item, "tabindex", "-1");
        }

        apply_tab_stop(&dom, &items, Some(0));
        apply_tab_stop(&dom, &items, Some(2));
        let stops: Vec<Option<String>> =
            items.iter().map(|item| dom.attribute(*item, "tabindex")).collect();
        assert_eq!(
            stops,
            vec![Some("-1".to_string()), Some("-1".to_string()), Some("0".to_string())]
        );
        assert_eq!(dom.attribute(separator, "tabindex"), None);

        apply_tab_stop(&dom, &items, None);
        assert_eq!(dom.attribute(items[2], "tabindex").as_deref(), Some("-1"));
    }
}
