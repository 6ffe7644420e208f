//! Roving focus over a list of menu items: arrow/Home/End traversal and typeahead.

use dom_host::{DomHost, NodeId};

use crate::theme::{format_number, TextDirection};

/// Keystrokes further apart than this start a new typeahead search.
pub const TYPEAHEAD_WINDOW_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Traversal direction through the list.
pub enum Traversal {
    /// Towards the last item.
    Next,
    /// Towards the first item.
    Previous,
}

#[derive(Debug, Clone, PartialEq)]
/// Accumulated typeahead keys.
///
/// While every key repeats the first one the search cycles through items starting with that
/// letter; once a different key arrives the whole buffer is matched as a prefix.
pub struct TypeaheadBuffer {
    keys: String,
    repeating: bool,
    previous_key_matched: bool,
    last_time: Option<f64>,
}

impl Default for TypeaheadBuffer {
    fn default() -> Self {
        Self {
            keys: String::new(),
            repeating: true,
            previous_key_matched: true,
            last_time: None,
        }
    }
}

impl TypeaheadBuffer {
    /// Records `key` typed at `now_ms`, resetting the buffer when the window elapsed.
    pub fn push(&mut self, key: char, now_ms: f64) {
        let lower = key.to_lowercase().next().unwrap_or(key);
        if let Some(first) = self.keys.chars().next() {
            let expired = self
                .last_time
                .is_some_and(|last| now_ms - last > TYPEAHEAD_WINDOW_MS);
            if expired {
                *self = Self::default();
            } else if self.repeating && lower != first {
                self.repeating = false;
            }
        }
        self.last_time = Some(now_ms);
        self.keys.push(lower);
    }

    /// Returns `true` when `text` satisfies the current search.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return false;
        }
        if self.repeating {
            return text.chars().next() == self.keys.chars().next();
        }
        text.starts_with(&self.keys)
    }

    /// Lower-cased keys typed in the current window.
    pub fn keys(&self) -> &str {
        &self.keys
    }

    /// Whether every key so far was the same letter.
    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Whether the previous keystroke found a match.
    pub fn previous_key_matched(&self) -> bool {
        self.previous_key_matched
    }

    fn mark_unmatched(&mut self) {
        self.previous_key_matched = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Traversal switches of a menu list.
pub struct MenuListOptions {
    /// Stop at the ends instead of wrapping.
    pub disable_list_wrap: bool,
    /// Let disabled items receive focus.
    pub disabled_items_focusable: bool,
}

fn sibling(host: &dyn DomHost, item: NodeId, traversal: Traversal) -> Option<NodeId> {
    let parent = host.parent(item)?;
    let siblings = host.children(parent);
    let index = siblings.iter().position(|node| *node == item)?;
    match traversal {
        Traversal::Next => siblings.get(index + 1).copied(),
        Traversal::Previous => index.checked_sub(1).and_then(|i| siblings.get(i).copied()),
    }
}

/// Item after `item` in `list`; `None`/`Some(list)` starts from the top.
pub fn next_item(
    host: &dyn DomHost,
    list: NodeId,
    item: Option<NodeId>,
    disable_list_wrap: bool,
) -> Option<NodeId> {
    let children = host.children(list);
    let first = children.first().copied();
    match item {
        Some(item) if item == list => first,
        Some(item) => sibling(host, item, Traversal::Next)
            .or_else(|| (!disable_list_wrap).then_some(first).flatten()),
        None => (!disable_list_wrap).then_some(first).flatten(),
    }
}

/// Item before `item` in `list`; `None`/`Some(list)` starts from the bottom.
pub fn previous_item(
    host: &dyn DomHost,
    list: NodeId,
    item: Option<NodeId>,
    disable_list_wrap: bool,
) -> Option<NodeId> {
    let children = host.children(list);
    let first = children.first().copied();
    let last = children.last().copied();
    match item {
        Some(item) if item == list => {
            if disable_list_wrap {
                first
            } else {
                last
            }
        }
        Some(item) => sibling(host, item, Traversal::Previous)
            .or_else(|| (!disable_list_wrap).then_some(last).flatten()),
        None => (!disable_list_wrap).then_some(last).flatten(),
    }
}

fn traverse(
    host: &dyn DomHost,
    list: NodeId,
    item: Option<NodeId>,
    disable_list_wrap: bool,
    traversal: Traversal,
) -> Option<NodeId> {
    match traversal {
        Traversal::Next => next_item(host, list, item, disable_list_wrap),
        Traversal::Previous => previous_item(host, list, item, disable_list_wrap),
    }
}

/// Returns `true` when `item` is disabled natively or through `aria-disabled`.
pub fn is_item_disabled(host: &dyn DomHost, item: NodeId) -> bool {
    host.attribute(item, "disabled").is_some()
        || host.attribute(item, "aria-disabled").as_deref() == Some("true")
}

/// Moves focus from `current` to the next eligible item and returns whether it moved.
///
/// Items without a `tabindex` or disabled (unless `disabled_items_focusable`) are skipped;
/// with `criteria` only items whose text matches qualify. Visits each item at most once.
pub fn move_focus(
    host: &dyn DomHost,
    list: NodeId,
    current: Option<NodeId>,
    options: MenuListOptions,
    traversal: Traversal,
    criteria: Option<&TypeaheadBuffer>,
) -> bool {
    let first = host.children(list).first().copied();
    let mut wrapped_once = false;
    let mut next = traverse(
        host,
        list,
        current,
        current.is_some() && options.disable_list_wrap,
        traversal,
    );

    while let Some(candidate) = next {
        if Some(candidate) == first {
            if wrapped_once {
                return false;
            }
            wrapped_once = true;
        }

        let disabled = !options.disabled_items_focusable && is_item_disabled(host, candidate);
        let text_ok = criteria.map_or(true, |criteria| {
            criteria.matches(&host.text_content(candidate))
        });
        if host.attribute(candidate, "tabindex").is_none() || !text_ok || disabled {
            next = traverse(
                host,
                list,
                Some(candidate),
                options.disable_list_wrap,
                traversal,
            );
        } else {
            host.focus(candidate);
            return true;
        }
    }
    false
}

#[derive(Debug, Clone)]
/// Keyboard controller for one list element.
pub struct MenuListNavigator {
    list: NodeId,
    options: MenuListOptions,
    typeahead: TypeaheadBuffer,
}

impl MenuListNavigator {
    /// Creates a navigator over the children of `list`.
    pub fn new(list: NodeId, options: MenuListOptions) -> Self {
        Self {
            list,
            options,
            typeahead: TypeaheadBuffer::default(),
        }
    }

    /// The list element.
    pub fn list(&self) -> NodeId {
        self.list
    }

    /// Current typeahead state.
    pub fn typeahead(&self) -> &TypeaheadBuffer {
        &self.typeahead
    }

    /// Handles a keydown at `now_ms`; returns `true` when the default action must be
    /// prevented.
    pub fn handle_key_down(&mut self, host: &dyn DomHost, key: &str, now_ms: f64) -> bool {
        let current = host.active_element();
        match key {
            "ArrowDown" => {
                move_focus(host, self.list, current, self.options, Traversal::Next, None);
                true
            }
            "ArrowUp" => {
                move_focus(host, self.list, current, self.options, Traversal::Previous, None);
                true
            }
            "Home" => {
                move_focus(host, self.list, None, self.options, Traversal::Next, None);
                true
            }
            "End" => {
                move_focus(host, self.list, None, self.options, Traversal::Previous, None);
                true
            }
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => self.typeahead_key(host, current, ch, now_ms),
                    _ => false,
                }
            }
        }
    }

    fn typeahead_key(
        &mut self,
        host: &dyn DomHost,
        current: Option<NodeId>,
        key: char,
        now_ms: f64,
    ) -> bool {
        self.typeahead.push(key, now_ms);
        let keep_current = current.is_some_and(|node| {
            !self.typeahead.is_repeating() && self.typeahead.matches(&host.text_content(node))
        });
        let options = MenuListOptions {
            disable_list_wrap: false,
            ..self.options
        };
        let matched = self.typeahead.previous_key_matched()
            && (keep_current
                || move_focus(
                    host,
                    self.list,
                    current,
                    options,
                    Traversal::Next,
                    Some(&self.typeahead),
                ));
        if !matched {
            self.typeahead.mark_unmatched();
        }
        matched
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Render-time facts about one list child.
pub struct MenuEntry {
    /// The item is disabled.
    pub disabled: bool,
    /// The item is the selected value.
    pub selected: bool,
    /// The entry is not an item (divider, subheader) and never takes initial focus.
    pub skip_highlight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Which item receives initial focus.
pub enum MenuVariant {
    /// The first enabled item.
    Menu,
    #[default]
    /// The selected enabled item, else the first enabled one.
    SelectedMenu,
}

impl MenuVariant {
    /// Stable token used in `data-ui-variant`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::SelectedMenu => "selectedMenu",
        }
    }
}

/// Index of the item that takes initial focus (and the roving tab stop).
pub fn active_item_index(entries: &[MenuEntry], variant: MenuVariant) -> Option<usize> {
    let mut active: Option<usize> = None;
    for (index, entry) in entries.iter().enumerate() {
        if !entry.disabled {
            if variant == MenuVariant::SelectedMenu && entry.selected {
                active = Some(index);
            } else if active.is_none() {
                active = Some(index);
            }
        }
        if active == Some(index) && (entry.disabled || entry.skip_highlight) {
            active = Some(index + 1).filter(|next| *next < entries.len());
        }
    }
    active
}

/// Reads [`MenuEntry`] facts from the rendered children of `list`.
///
/// Separators and subheaders (`role="separator"`, `data-ui-skip-highlight`) never take focus.
pub fn menu_entries(host: &dyn DomHost, list: NodeId) -> Vec<MenuEntry> {
    host.children(list)
        .into_iter()
        .map(|item| MenuEntry {
            disabled: is_item_disabled(host, item),
            selected: host.attribute(item, "aria-selected").as_deref() == Some("true"),
            skip_highlight: host.attribute(item, "role").as_deref() == Some("separator")
                || host.attribute(item, "data-ui-skip-highlight").is_some(),
        })
        .collect()
}

/// Widens an overflowing list by the scrollbar width so items do not reflow under it.
///
/// Only applies when the list is taller than `container` and has no explicit width.
pub fn adjust_style_for_scrollbar(
    host: &dyn DomHost,
    list: NodeId,
    container: NodeId,
    direction: TextDirection,
) -> bool {
    let explicit_width = host.style(list, "width").is_some_and(|width| !width.is_empty());
    if explicit_width || host.client_size(container).height >= host.client_size(list).height {
        return false;
    }
    let scrollbar = format!("{}px", format_number(host.scrollbar_width()));
    let padding = match direction {
        TextDirection::Rtl => "padding-left",
        TextDirection::Ltr => "padding-right",
    };
    host.set_style(list, padding, &scrollbar);
    host.set_style(list, "width", &format!("calc(100% + {scrollbar})"));
    true
}

#[cfg(test)]
mod tests {
    use dom_host::{MemoryDom, Rect, Size};
    use pretty_assertions::assert_eq;

    use super::*;

    fn list_with(labels: &[&str]) -> (MemoryDom, NodeId, Vec<NodeId>) {
        let dom = MemoryDom::new();
        let list = dom.append_new(dom.body(), "ul");
        let items = labels
            .iter()
            .map(|label| {
                let item = dom.append_new(list, "li");
                dom.set_text(item, label);
                dom.set_attribute(item, "tabindex", "-1");
                item
            })
            .collect();
        (dom, list, items)
    }

    #[test]
    fn arrows_wrap_and_skip_disabled_items() {
        let (dom, list, items) = list_with(&["One", "Two", "Three"]);
        dom.set_attribute(items[1], "aria-disabled", "true");
        let mut nav = MenuListNavigator::new(list, MenuListOptions::default());
        dom.focus(items[0]);

        assert!(nav.handle_key_down(&dom, "ArrowDown", 0.0));
        assert_eq!(dom.active_element(), Some(items[2]));
        nav.handle_key_down(&dom, "ArrowDown", 0.0);
        assert_eq!(dom.active_element(), Some(items[0]));
        nav.handle_key_down(&dom, "ArrowUp", 0.0);
        assert_eq!(dom.active_element(), Some(items[2]));
    }

    #[test]
    fn disabled_wrap_stops_at_the_ends() {
        let (dom, list, items) = list_with(&["One", "Two"]);
        let mut nav = MenuListNavigator::new(
            list,
            MenuListOptions {
                disable_list_wrap: true,
                ..MenuListOptions::default()
            },
        );
        dom.focus(items[1]);
        nav.handle_key_down(&dom, "ArrowDown", 0.0);
        assert_eq!(dom.active_element(), Some(items[1]));
    }

    #[test]
    fn items_without_tab_stop_are_skipped_and_home_end_jump() {
        let (dom, list, items) = list_with(&["One", "Two", "Three"]);
        dom.remove_attribute(items[0], "tabindex");
        let mut nav = MenuListNavigator::new(list, MenuListOptions::default());
        dom.focus(items[1]);

        nav.handle_key_down(&dom, "End", 0.0);
        assert_eq!(dom.active_element(), Some(items[2]));
        nav.handle_key_down(&dom, "Home", 0.0);
        assert_eq!(dom.active_element(), Some(items[1]));
    }

    #[test]
    fn typeahead_prefix_repeat_cycle_and_new_word() {
        let (dom, list, items) = list_with(&["Apple", "Apricot", "Banana"]);
        let mut nav = MenuListNavigator::new(list, MenuListOptions::default());
        dom.focus(list);
        assert_eq!(nav.typeahead(), &TypeaheadBuffer::default());

        nav.handle_key_down(&dom, "a", 0.0);
        nav.handle_key_down(&dom, "p", 100.0);
        assert_eq!(dom.active_element(), Some(items[0]));

        nav.handle_key_down(&dom, "a", 1000.0);
        assert_eq!(dom.active_element(), Some(items[1]));
        nav.handle_key_down(&dom, "a", 1100.0);
        assert_eq!(dom.active_element(), Some(items[0]));

        nav.handle_key_down(&dom, "b", 2000.0);
        nav.handle_key_down(&dom, "a", 2100.0);
        nav.handle_key_down(&dom, "n", 2200.0);
        assert_eq!(dom.active_element(), Some(items[2]));
    }

    #[test]
    fn unmatched_key_stops_further_typeahead_until_window_resets() {
        let (dom, list, items) = list_with(&["Apple", "Banana"]);
        let mut nav = MenuListNavigator::new(list, MenuListOptions::default());
        dom.focus(items[0]);

        assert!(!nav.handle_key_down(&dom, "z", 0.0));
        assert!(!nav.typeahead().previous_key_matched());
        assert!(!nav.handle_key_down(&dom, "b", 100.0));
        assert_eq!(dom.active_element(), Some(items[0]));

        assert!(nav.handle_key_down(&dom, "b", 700.0));
        assert_eq!(dom.active_element(), Some(items[1]));
    }

    #[test]
    fn initial_focus_prefers_selected_enabled_item() {
        let entries = [
            MenuEntry {
                disabled: true,
                ..MenuEntry::default()
            },
            MenuEntry::default(),
            MenuEntry {
                selected: true,
                ..MenuEntry::default()
            },
        ];
        assert_eq!(active_item_index(&entries, MenuVariant::SelectedMenu), Some(2));
        assert_eq!(active_item_index(&entries, MenuVariant::Menu), Some(1));
        assert_eq!(active_item_index(&[], MenuVariant::Menu), None);

        let divider_first = [
            MenuEntry {
                skip_highlight: true,
                ..MenuEntry::default()
            },
            MenuEntry::default(),
        ];
        assert_eq!(active_item_index(&divider_first, MenuVariant::Menu), Some(1));
    }

    #[test]
    fn entries_are_read_from_rendered_items() {
        let (dom, list, items) = list_with(&["One", "Two", "Three"]);
        dom.set_attribute(items[0], "role", "separator");
        dom.set_attribute(items[1], "disabled", "");
        dom.set_attribute(items[2], "aria-selected", "true");
        let entries = menu_entries(&dom, list);
        assert_eq!(
            entries,
            vec![
                MenuEntry {
                    skip_highlight: true,
                    ..MenuEntry::default()
                },
                MenuEntry {
                    disabled: true,
                    ..MenuEntry::default()
                },
                MenuEntry {
                    selected: true,
                    ..MenuEntry::default()
                },
            ]
        );
        assert_eq!(active_item_index(&entries, MenuVariant::SelectedMenu), Some(2));
    }

    #[test]
    fn overflowing_list_is_widened_by_the_scrollbar() {
        let (dom, list, _) = list_with(&["One"]);
        let paper = dom.append_new(dom.body(), "div");
        dom.set_rect(paper, Rect::new(0.0, 0.0, 200.0, 100.0));
        dom.set_client_size(list, Size::new(200.0, 300.0));
        dom.set_scrollbar_width(17.0);

        assert!(adjust_style_for_scrollbar(&dom, list, paper, TextDirection::Rtl));
        assert_eq!(dom.style(list, "padding-left").as_deref(), Some("17px"));
        assert_eq!(dom.style(list, "width").as_deref(), Some("calc(100% + 17px)"));
        assert!(!adjust_style_for_scrollbar(&dom, list, paper, TextDirection::Ltr));
    }
}
