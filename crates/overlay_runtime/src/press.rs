//! Press handling shared by buttons and selects: touch/mouse de-duplication, variant tokens,
//! and the `loading = auto` bookkeeping around async click handlers.

use std::future::Future;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Pointer event that starts a press.
pub enum PressStart {
    /// `touchstart`.
    Touch,
    /// `mousedown`.
    Mouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Drops the synthetic `mousedown` browsers emit after a `touchstart`.
pub struct PointerDedup {
    ignoring_mouse_down: bool,
}

impl PointerDedup {
    /// Returns `true` when the press should be handled.
    pub fn accept(&mut self, start: PressStart) -> bool {
        match start {
            PressStart::Mouse if self.ignoring_mouse_down => {
                self.ignoring_mouse_down = false;
                false
            }
            PressStart::Mouse => true,
            PressStart::Touch => {
                self.ignoring_mouse_down = true;
                true
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Visual weight of a button.
pub enum ButtonVariant {
    #[default]
    /// Filled.
    Contained,
    /// Outlined.
    Outline,
    /// Text only.
    Text,
}

impl ButtonVariant {
    /// Stable token used in `data-ui-variant`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Contained => "contained",
            Self::Outline => "outline",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Button size.
pub enum ButtonSize {
    /// Mini.
    Mini,
    /// Small.
    Small,
    #[default]
    /// Middle.
    Middle,
    /// Large.
    Large,
}

impl ButtonSize {
    /// Stable token used in `data-ui-size`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Mini => "mini",
            Self::Small => "small",
            Self::Middle => "middle",
            Self::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Corner treatment of a button.
pub enum ButtonShape {
    #[default]
    /// Theme radius.
    Default,
    /// Pill.
    Rounded,
    /// Square corners.
    Rectangular,
}

impl ButtonShape {
    /// Stable token used in `data-ui-shape`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Rounded => "rounded",
            Self::Rectangular => "rectangular",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// `loading` prop of a button.
pub enum ButtonLoading {
    #[default]
    /// Never loading.
    Off,
    /// Always loading.
    On,
    /// Loading while the click handler's future is pending.
    Auto,
}

impl ButtonLoading {
    /// Effective loading state given the internal pending flag.
    pub const fn resolve(self, pending: bool) -> bool {
        match self {
            Self::Off => false,
            Self::On => true,
            Self::Auto => pending,
        }
    }
}

/// Buttons are disabled while loading.
pub const fn button_disabled(disabled: bool, loading: bool) -> bool {
    disabled || loading
}

/// Runs `handler` with the loading flag raised and returns its result after lowering it.
///
/// A failed handler still resets the flag first, then hands the error back to the caller.
pub async fn settle_loading<F, T, E>(set_loading: impl Fn(bool), handler: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    set_loading(true);
    let result = handler.await;
    set_loading(false);
    result
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn touch_start_swallows_one_mouse_down() {
        let mut dedup = PointerDedup::default();
        assert!(dedup.accept(PressStart::Touch));
        assert!(!dedup.accept(PressStart::Mouse));
        assert!(dedup.accept(PressStart::Mouse));
    }

    #[test]
    fn loading_auto_follows_pending_and_disables() {
        assert!(ButtonLoading::Auto.resolve(true));
        assert!(!ButtonLoading::Auto.resolve(false));
        assert!(ButtonLoading::On.resolve(false));
        assert!(button_disabled(false, ButtonLoading::On.resolve(false)));
        assert_eq!(ButtonVariant::default().token(), "contained");
        assert_eq!(ButtonSize::default().token(), "middle");
    }

    #[test]
    fn rejected_handler_resurfaces_after_loading_resets() {
        let log = RefCell::new(Vec::new());
        let result: Result<(), &str> = block_on(settle_loading(
            |loading| log.borrow_mut().push(loading),
            async { Err("boom") },
        ));
        assert_eq!(result, Err("boom"));
        assert_eq!(log.into_inner(), vec![true, false]);
    }

    #[test]
    fn resolved_handler_value_passes_through() {
        let result: Result<u8, ()> = block_on(settle_loading(|_| {}, async { Ok(7) }));
        assert_eq!(result, Ok(7));
    }
}
