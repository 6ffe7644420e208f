//! Select state: open triggers, single/multiple choice, display text, and menu sizing.

use serde::{Deserialize, Serialize};

use crate::positioning::{HorizontalOrigin, Origin, VerticalOrigin};

/// Placeholder rendered when the display would be empty, so baseline alignment still works.
pub const EMPTY_DISPLAY: &str = "\u{200b}";

/// Keys that open a focused select.
pub const OPEN_KEYS: [&str; 4] = [" ", "ArrowUp", "ArrowDown", "Enter"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Current value of a select.
pub enum SelectValue {
    /// At most one value.
    Single(Option<String>),
    /// Ordered set of values.
    Multiple(Vec<String>),
}

impl SelectValue {
    /// Returns `true` when `value` is part of the selection.
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Single(current) => current.as_deref() == Some(value),
            Self::Multiple(values) => values.iter().any(|current| current == value),
        }
    }

    /// Returns `true` when something is selected.
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Single(current) => current.as_deref().is_some_and(|value| !value.is_empty()),
            Self::Multiple(values) => !values.is_empty(),
        }
    }

    /// Value submitted by the hidden native input (`a,b` for multiple).
    pub fn native_value(&self) -> String {
        match self {
            Self::Single(current) => current.clone().unwrap_or_default(),
            Self::Multiple(values) => values.join(","),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One option offered by the select menu.
pub struct SelectOption {
    /// Value stored when chosen.
    pub value: String,
    /// Text shown in the menu and in the display.
    pub label: String,
    /// The option cannot be chosen.
    pub disabled: bool,
}

impl SelectOption {
    /// Enabled option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Select props that affect state transitions.
pub struct SelectOptions {
    /// Allow multiple values.
    pub multiple: bool,
    /// Let the menu size itself instead of matching the anchor width.
    pub auto_width: bool,
    /// Compute the display even when nothing is selected.
    pub display_empty: bool,
    /// Ignore open requests.
    pub read_only: bool,
    /// Ignore all interaction.
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of choosing an option.
pub struct SelectChange {
    /// New value when it differs from the previous one.
    pub value: Option<SelectValue>,
    /// The menu should close.
    pub close: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// Uncontrolled select state.
pub struct SelectState {
    options: SelectOptions,
    value: SelectValue,
    open: bool,
    menu_min_width: Option<f64>,
}

impl SelectState {
    /// Creates a closed select holding `value`.
    pub fn new(options: SelectOptions, value: SelectValue) -> Self {
        Self {
            options,
            value,
            open: false,
            menu_min_width: None,
        }
    }

    /// Current value.
    pub fn value(&self) -> &SelectValue {
        &self.value
    }

    /// Whether the menu is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// `min-width` of the menu paper in px, captured from the anchor when opening.
    pub fn menu_min_width(&self) -> Option<f64> {
        self.menu_min_width
    }

    /// Opens or closes the menu; `anchor_width` is the display anchor's client width.
    pub fn update(&mut self, open: bool, anchor_width: f64) {
        self.menu_min_width = (!self.options.auto_width).then_some(anchor_width);
        self.open = open;
    }

    /// Handles a keydown on the display; returns `true` when it opened the menu.
    pub fn handle_key_down(&mut self, key: &str, anchor_width: f64) -> bool {
        if self.options.read_only || self.options.disabled || !OPEN_KEYS.contains(&key) {
            return false;
        }
        self.update(true, anchor_width);
        true
    }

    /// Handles a mousedown on the display; only the primary button opens.
    pub fn handle_mouse_down(&mut self, button: i16, anchor_width: f64) -> bool {
        if button != 0 || self.options.read_only || self.options.disabled {
            return false;
        }
        self.update(true, anchor_width);
        true
    }

    /// Chooses `option`: toggles membership when multiple, replaces and closes otherwise.
    pub fn choose(&mut self, option: &SelectOption, anchor_width: f64) -> SelectChange {
        if option.disabled {
            return SelectChange {
                value: None,
                close: false,
            };
        }
        let next = match &self.value {
            SelectValue::Multiple(values) if self.options.multiple => {
                let mut values = values.clone();
                match values.iter().position(|value| *value == option.value) {
                    Some(index) => {
                        values.remove(index);
                    }
                    None => values.push(option.value.clone()),
                }
                SelectValue::Multiple(values)
            }
            _ if self.options.multiple => SelectValue::Multiple(vec![option.value.clone()]),
            _ => SelectValue::Single(Some(option.value.clone())),
        };

        let changed = next != self.value;
        if changed {
            self.value = next.clone();
        }
        let close = !self.options.multiple;
        if close {
            self.update(false, anchor_width);
        }
        SelectChange {
            value: changed.then_some(next),
            close,
        }
    }

    /// Text for the display; `None` renders [`EMPTY_DISPLAY`].
    pub fn display_text(&self, options: &[SelectOption]) -> Option<String> {
        if !self.value.is_filled() && !self.options.display_empty {
            return None;
        }
        let labels: Vec<&str> = options
            .iter()
            .filter(|option| self.value.contains(&option.value))
            .map(|option| option.label.as_str())
            .collect();
        let text = labels.join(", ");
        (!text.trim().is_empty()).then_some(text)
    }

    /// `aria-expanded` token for the combobox.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }
}

/// `(anchor_origin, transform_origin)` of the select menu: centered below the display.
pub const fn select_menu_origins() -> (Origin, Origin) {
    (
        Origin::new(VerticalOrigin::Bottom, HorizontalOrigin::Center),
        Origin::new(VerticalOrigin::Top, HorizontalOrigin::Center),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fruits() -> Vec<SelectOption> {
        vec![
            SelectOption::new("apple", "Apple"),
            SelectOption::new("pear", "Pear"),
            SelectOption {
                disabled: true,
                ..SelectOption::new("plum", "Plum")
            },
        ]
    }

    #[test]
    fn open_keys_and_primary_button_open_the_menu() {
        let mut select = SelectState::new(SelectOptions::default(), SelectValue::Single(None));
        assert!(!select.handle_key_down("a", 120.0));
        assert!(!select.handle_mouse_down(2, 120.0));
        assert!(!select.is_open());

        assert!(select.handle_key_down("ArrowDown", 120.0));
        assert!(select.is_open());
        assert_eq!(select.menu_min_width(), Some(120.0));
        assert_eq!(select.aria_expanded(), "true");
    }

    #[test]
    fn auto_width_and_read_only() {
        let mut select = SelectState::new(
            SelectOptions {
                auto_width: true,
                ..SelectOptions::default()
            },
            SelectValue::Single(None),
        );
        assert!(select.handle_mouse_down(0, 120.0));
        assert_eq!(select.menu_min_width(), None);

        let mut read_only = SelectState::new(
            SelectOptions {
                read_only: true,
                ..SelectOptions::default()
            },
            SelectValue::Single(None),
        );
        assert!(!read_only.handle_key_down("Enter", 120.0));
    }

    #[test]
    fn single_choice_replaces_and_closes() {
        let options = fruits();
        let mut select = SelectState::new(SelectOptions::default(), SelectValue::Single(None));
        select.update(true, 100.0);

        let change = select.choose(&options[1], 100.0);
        assert_eq!(change.value, Some(SelectValue::Single(Some("pear".into()))));
        assert!(change.close);
        assert!(!select.is_open());
        assert_eq!(select.display_text(&options).as_deref(), Some("Pear"));

        select.update(true, 100.0);
        let same = select.choose(&options[1], 100.0);
        assert_eq!(same.value, None);
        assert!(same.close);
    }

    #[test]
    fn multiple_choice_toggles_and_stays_open() {
        let options = fruits();
        let mut select = SelectState::new(
            SelectOptions {
                multiple: true,
                ..SelectOptions::default()
            },
            SelectValue::Multiple(Vec::new()),
        );
        select.update(true, 100.0);
        select.choose(&options[0], 100.0);
        select.choose(&options[1], 100.0);
        assert!(select.is_open());
        assert_eq!(select.display_text(&options).as_deref(), Some("Apple, Pear"));
        assert_eq!(select.value().native_value(), "apple,pear");

        let change = select.choose(&options[0], 100.0);
        assert_eq!(change.value, Some(SelectValue::Multiple(vec!["pear".into()])));
        assert!(!select.choose(&options[2], 100.0).close);
        assert_eq!(select.value(), &SelectValue::Multiple(vec!["pear".into()]));
    }

    #[test]
    fn empty_display_needs_display_empty() {
        let options = fruits();
        let select = SelectState::new(SelectOptions::default(), SelectValue::Single(None));
        assert_eq!(select.display_text(&options), None);

        let with_empty = SelectState::new(
            SelectOptions {
                display_empty: true,
                ..SelectOptions::default()
            },
            SelectValue::Single(Some("pear".into())),
        );
        assert_eq!(with_empty.display_text(&options).as_deref(), Some("Pear"));
    }
}
