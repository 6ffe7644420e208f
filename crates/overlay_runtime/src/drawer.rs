//! Drawer anchoring and variants.

use serde::{Deserialize, Serialize};

use crate::{animations::SlideDirection, theme::TextDirection};

/// Paper elevation of a temporary drawer.
pub const DRAWER_ELEVATION: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Viewport edge a drawer is attached to.
pub enum DrawerAnchor {
    #[default]
    /// Left edge.
    Left,
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
}

impl DrawerAnchor {
    /// Stable token used in `data-ui-anchor`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
        }
    }

    /// `true` for the left and right edges.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// The opposite edge.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
        }
    }

    /// Physical edge after applying the text direction; RTL mirrors left and right.
    pub const fn resolve(self, direction: TextDirection) -> Self {
        match direction {
            TextDirection::Rtl if self.is_horizontal() => self.opposite(),
            _ => self,
        }
    }

    /// Slide direction that brings a drawer in from this edge.
    pub const fn slide_direction(self) -> SlideDirection {
        match self.opposite() {
            Self::Left => SlideDirection::Left,
            Self::Top => SlideDirection::Up,
            Self::Right => SlideDirection::Right,
            Self::Bottom => SlideDirection::Down,
        }
    }

    /// Border separating a docked drawer from the content.
    pub const fn docked_border(self) -> &'static str {
        match self {
            Self::Left => "border-right",
            Self::Top => "border-bottom",
            Self::Right => "border-left",
            Self::Bottom => "border-top",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// How a drawer participates in layout.
pub enum DrawerVariant {
    /// Always visible, docked, no transition.
    Permanent,
    /// Docked, slides in and out without a modal.
    Persistent,
    #[default]
    /// Modal overlay with backdrop.
    Temporary,
}

impl DrawerVariant {
    /// Stable token used in `data-ui-variant`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Persistent => "persistent",
            Self::Temporary => "temporary",
        }
    }

    /// Rendered through the modal stack.
    pub const fn is_modal(self) -> bool {
        matches!(self, Self::Temporary)
    }

    /// Wrapped in a slide transition.
    pub const fn slides(self) -> bool {
        !matches!(self, Self::Permanent)
    }

    /// Paper elevation for `elevation` requested by the caller.
    pub const fn elevation(self, elevation: u8) -> u8 {
        match self {
            Self::Temporary => elevation,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rtl_mirrors_horizontal_anchors_only() {
        assert_eq!(DrawerAnchor::Left.resolve(TextDirection::Rtl), DrawerAnchor::Right);
        assert_eq!(DrawerAnchor::Top.resolve(TextDirection::Rtl), DrawerAnchor::Top);
        assert_eq!(DrawerAnchor::Left.resolve(TextDirection::Ltr), DrawerAnchor::Left);
    }

    #[test]
    fn slide_direction_points_away_from_the_anchor_edge() {
        assert_eq!(DrawerAnchor::Left.slide_direction(), SlideDirection::Right);
        assert_eq!(DrawerAnchor::Right.slide_direction(), SlideDirection::Left);
        assert_eq!(DrawerAnchor::Top.slide_direction(), SlideDirection::Down);
        assert_eq!(DrawerAnchor::Bottom.slide_direction(), SlideDirection::Up);
    }

    #[test]
    fn only_temporary_drawers_are_modal_and_elevated() {
        assert!(DrawerVariant::Temporary.is_modal());
        assert!(!DrawerVariant::Persistent.is_modal());
        assert!(DrawerVariant::Persistent.slides());
        assert!(!DrawerVariant::Permanent.slides());
        assert_eq!(DrawerVariant::Temporary.elevation(DRAWER_ELEVATION), 16);
        assert_eq!(DrawerVariant::Permanent.elevation(DRAWER_ELEVATION), 0);
    }
}
