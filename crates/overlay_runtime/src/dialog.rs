//! Dialog layout variants and defaults on top of the modal.

use serde::{Deserialize, Serialize};

use crate::{
    theme::ThemeTokens,
    transition::{screen_timeout, Timeout},
};

/// Margin subtracted from the viewport for non-fullscreen papers.
pub const DIALOG_GUTTER_PX: f64 = 64.0;

/// Elevation of the dialog paper.
pub const DIALOG_ELEVATION: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Which element scrolls when content is taller than the viewport.
pub enum DialogScroll {
    #[default]
    /// The paper scrolls; the dialog stays in view.
    Paper,
    /// The whole container scrolls with the page.
    Body,
}

impl DialogScroll {
    /// Stable token used in `data-ui-scroll`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Body => "body",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Breakpoint capping the paper width.
pub enum DialogMaxWidth {
    /// 444px.
    Xs,
    #[default]
    /// 600px.
    Sm,
    /// 900px.
    Md,
    /// 1200px.
    Lg,
    /// 1536px.
    Xl,
    /// No cap beyond the gutter.
    None,
}

impl DialogMaxWidth {
    /// Stable token used in `data-ui-max-width`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
            Self::None => "none",
        }
    }

    /// Breakpoint width in px.
    pub const fn breakpoint(self) -> Option<f64> {
        match self {
            Self::Xs => Some(444.0),
            Self::Sm => Some(600.0),
            Self::Md => Some(900.0),
            Self::Lg => Some(1200.0),
            Self::Xl => Some(1536.0),
            Self::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
/// Dialog layout props.
pub struct DialogLayout {
    /// Scroll owner.
    pub scroll: DialogScroll,
    /// Width cap.
    pub max_width: DialogMaxWidth,
    /// Stretch the paper to the width cap.
    pub full_width: bool,
    /// Cover the viewport.
    pub full_screen: bool,
}

impl DialogLayout {
    /// `max-width` of the paper for a viewport `viewport_width` px wide.
    pub fn paper_max_width(&self, viewport_width: f64) -> String {
        if self.full_screen {
            return "100%".to_owned();
        }
        match self.max_width.breakpoint() {
            Some(breakpoint) if viewport_width > breakpoint + DIALOG_GUTTER_PX => {
                format!("{breakpoint}px")
            }
            _ => format!("calc(100% - {DIALOG_GUTTER_PX}px)"),
        }
    }

    /// `width` of the paper, if forced.
    pub fn paper_width(&self) -> Option<String> {
        if self.full_screen {
            Some("100%".to_owned())
        } else if self.full_width {
            Some(format!("calc(100% - {DIALOG_GUTTER_PX}px)"))
        } else {
            None
        }
    }

    /// Space-separated state tokens for `data-ui-state`.
    pub fn state_tokens(&self) -> String {
        [
            Some(self.scroll.token()),
            Some(self.max_width.token()),
            self.full_width.then_some("full-width"),
            self.full_screen.then_some("full-screen"),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Default fade timing for dialogs.
pub fn dialog_timeout(theme: &ThemeTokens) -> Timeout {
    screen_timeout(theme)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn max_width_caps_at_breakpoint_until_viewport_is_narrow() {
        let layout = DialogLayout::default();
        assert_eq!(layout.paper_max_width(1024.0), "600px");
        assert_eq!(layout.paper_max_width(640.0), "calc(100% - 64px)");
        assert_eq!(
            DialogLayout {
                max_width: DialogMaxWidth::None,
                ..layout
            }
            .paper_max_width(1024.0),
            "calc(100% - 64px)"
        );
    }

    #[test]
    fn full_screen_wins_over_width_props() {
        let layout = DialogLayout {
            full_width: true,
            full_screen: true,
            ..DialogLayout::default()
        };
        assert_eq!(layout.paper_max_width(1024.0), "100%");
        assert_eq!(layout.paper_width().as_deref(), Some("100%"));
        assert_eq!(layout.state_tokens(), "paper sm full-width full-screen");
    }

    #[test]
    fn dialog_fades_with_screen_durations() {
        assert_eq!(
            dialog_timeout(&ThemeTokens::default()),
            Timeout::Split {
                enter: 225.0,
                exit: 195.0
            }
        );
    }
}
