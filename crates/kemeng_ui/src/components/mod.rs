//! Overlay components built on `overlay_runtime`.
//!
//! Every component emits the `data-ui-primitive` / `data-ui-kind` DOM contract so stylesheets
//! target stable attributes instead of generated class names.

use std::time::Duration;

use dom_host::NodeId;
use leptos::*;
use leptos::leptos_dom::helpers::TimeoutHandle;
use overlay_runtime::theme::format_number;
use wasm_bindgen::JsCast;

use crate::context::OverlayContext;

mod button;
mod dialog;
mod drawer;
mod focus_trap;
mod menu;
mod modal;
mod popover;
mod portal;
mod select;
mod surface;
mod transitions;

pub use button::{AsyncClickHandler, Button};
pub use dialog::Dialog;
pub use drawer::Drawer;
pub use focus_trap::FocusTrap;
pub use menu::{Menu, MenuItem, MenuList, MenuSeparator};
pub use modal::{Modal, TransitionHooks};
pub use popover::{Popover, PopoverActions};
pub use portal::Portal;
pub use select::Select;
pub use surface::{Backdrop, Paper};
pub use transitions::{Fade, Grow, Slide};

/// How often an enabled focus trap re-checks where focus is.
const ENFORCE_FOCUS_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) fn merge_layout_class(base: &'static str, layout_class: Option<&'static str>) -> String {
    match layout_class {
        Some(layout_class) if !layout_class.is_empty() => format!("{base} {layout_class}"),
        _ => base.to_string(),
    }
}

pub(crate) fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub(crate) fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

pub(crate) fn event_element(event: &web_sys::Event) -> Option<web_sys::Element> {
    event.target()?.dyn_into::<web_sys::Element>().ok()
}

/// Routes document `focusin` events and a periodic tick to a focus trap for the lifetime of
/// the calling component.
pub(crate) fn install_focus_listeners(
    ctx: OverlayContext,
    on_focus_in: impl Fn(NodeId) + 'static,
    on_tick: impl Fn() + 'static,
) {
    let focus_listener = window_event_listener(ev::focusin, move |ev| {
        if let Some(target) = event_element(&ev) {
            on_focus_in(ctx.node_id(&target));
        }
    });
    on_cleanup(move || focus_listener.remove());

    if let Ok(interval) = set_interval_with_handle(on_tick, ENFORCE_FOCUS_INTERVAL) {
        on_cleanup(move || interval.clear());
    }
}

#[derive(Clone, Copy)]
/// Trailing-edge debounce: only the last scheduled call within `delay` runs.
pub(crate) struct Debounced {
    pending: StoredValue<Option<TimeoutHandle>>,
    delay: Duration,
}

impl Debounced {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            pending: store_value(None),
            delay,
        }
    }

    pub(crate) fn schedule(self, run: impl FnOnce() + 'static) {
        self.clear();
        if let Ok(handle) = set_timeout_with_handle(run, self.delay) {
            self.pending.set_value(Some(handle));
        }
    }

    pub(crate) fn clear(self) {
        if let Some(handle) = self.pending.try_update_value(Option::take).flatten() {
            handle.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn layout_class_is_appended_when_present() {
        assert_eq!(merge_layout_class("ui-paper", None), "ui-paper");
        assert_eq!(merge_layout_class("ui-paper", Some("")), "ui-paper");
        assert_eq!(merge_layout_class("ui-paper", Some("wide")), "ui-paper wide");
    }

    #[test]
    fn px_drops_trailing_zero_fraction() {
        assert_eq!(px(16.0), "16px");
        assert_eq!(px(12.5), "12.5px");
        assert_eq!(bool_token(true), "true");
    }
}
