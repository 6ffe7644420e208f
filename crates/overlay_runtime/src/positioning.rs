//! Anchored placement geometry: origin offsets, viewport clamping, and transform origins.
//!
//! Everything here is a pure function of its inputs so placement can be recomputed on any
//! trigger (open, resize, scroll, explicit update) without hidden state.

use dom_host::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::{error::OverlayWarning, theme::format_number};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Vertical component of an [`Origin`].
pub enum VerticalOrigin {
    #[default]
    /// Top edge.
    Top,
    /// Vertical midpoint.
    Center,
    /// Bottom edge.
    Bottom,
    /// Absolute offset from the top edge in px.
    Offset(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Horizontal component of an [`Origin`].
pub enum HorizontalOrigin {
    #[default]
    /// Left edge.
    Left,
    /// Horizontal midpoint.
    Center,
    /// Right edge.
    Right,
    /// Absolute offset from the left edge in px.
    Offset(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// A point on a rectangle, used for both the anchor and the floating surface.
pub struct Origin {
    /// Vertical placement.
    pub vertical: VerticalOrigin,
    /// Horizontal placement.
    pub horizontal: HorizontalOrigin,
}

impl Origin {
    /// Creates an origin.
    pub const fn new(vertical: VerticalOrigin, horizontal: HorizontalOrigin) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }
}

/// Offset of `vertical` from the top of a box `height` tall.
pub fn offset_top(height: f64, vertical: VerticalOrigin) -> f64 {
    match vertical {
        VerticalOrigin::Top => 0.0,
        VerticalOrigin::Center => height / 2.0,
        VerticalOrigin::Bottom => height,
        VerticalOrigin::Offset(value) => value,
    }
}

/// Offset of `horizontal` from the left of a box `width` wide.
pub fn offset_left(width: f64, horizontal: HorizontalOrigin) -> f64 {
    match horizontal {
        HorizontalOrigin::Left => 0.0,
        HorizontalOrigin::Center => width / 2.0,
        HorizontalOrigin::Right => width,
        HorizontalOrigin::Offset(value) => value,
    }
}

/// Viewport point on `anchor` where the floating origin should land.
pub fn anchor_offset(anchor: Rect, origin: Origin) -> Point {
    Point::new(
        anchor.top + offset_top(anchor.height, origin.vertical),
        anchor.left + offset_left(anchor.width, origin.horizontal),
    )
}

/// Origin point expressed as px offsets from the floating surface's top-left corner.
pub fn origin_point(size: Size, origin: Origin) -> Point {
    Point::new(
        offset_top(size.height, origin.vertical),
        offset_left(size.width, origin.horizontal),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// `transform-origin` of the floating surface in px.
pub struct TransformOrigin {
    /// Horizontal component.
    pub horizontal: f64,
    /// Vertical component.
    pub vertical: f64,
}

impl TransformOrigin {
    /// Renders the CSS value, horizontal component first.
    pub fn to_css(self) -> String {
        format!(
            "{}px {}px",
            format_number(self.horizontal),
            format_number(self.vertical)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Output of [`compute_position`].
pub struct PositioningResult {
    /// Rounded top coordinate in px.
    pub top: f64,
    /// Rounded left coordinate in px.
    pub left: f64,
    /// Transform origin, shifted by any clamping delta.
    pub transform_origin: TransformOrigin,
}

impl PositioningResult {
    /// CSS `top` value.
    pub fn top_css(&self) -> String {
        format!("{}px", format_number(self.top))
    }

    /// CSS `left` value.
    pub fn left_css(&self) -> String {
        format!("{}px", format_number(self.left))
    }
}

/// Places a floating box so its `floating_origin` lands on `anchor_point`, then clamps it into
/// the viewport inset by `margin_threshold`.
///
/// Each axis is clamped against its leading edge first and its trailing edge otherwise; the
/// transform origin moves by the same delta so the surface still appears to grow out of the
/// anchor. `None` disables clamping.
pub fn compute_position(
    floating: Size,
    anchor_point: Point,
    floating_origin: Origin,
    margin_threshold: Option<f64>,
    viewport: Size,
) -> PositioningResult {
    let origin = origin_point(floating, floating_origin);
    let mut top = anchor_point.top - origin.top;
    let mut left = anchor_point.left - origin.left;
    let mut transform_origin = TransformOrigin {
        horizontal: origin.left,
        vertical: origin.top,
    };

    if let Some(threshold) = margin_threshold {
        let bottom = top + floating.height;
        let right = left + floating.width;
        let height_threshold = viewport.height - threshold;
        let width_threshold = viewport.width - threshold;

        if top < threshold {
            let diff = top - threshold;
            top -= diff;
            transform_origin.vertical += diff;
        } else if bottom > height_threshold {
            let diff = bottom - height_threshold;
            top -= diff;
            transform_origin.vertical += diff;
        }

        if left < threshold {
            let diff = left - threshold;
            left -= diff;
            transform_origin.horizontal += diff;
        } else if right > width_threshold {
            let diff = right - width_threshold;
            left -= diff;
            transform_origin.horizontal += diff;
        }
    }

    PositioningResult {
        top: top.round(),
        left: left.round(),
        transform_origin,
    }
}

/// Warns when the floating surface cannot fit between the vertical thresholds.
pub fn oversize_warning(
    floating: Size,
    margin_threshold: Option<f64>,
    viewport: Size,
) -> Option<OverlayWarning> {
    let threshold = margin_threshold?;
    let height_threshold = viewport.height - threshold;
    (floating.height > 0.0 && height_threshold > 0.0 && floating.height > height_threshold).then(
        || OverlayWarning::PopoverTooTall {
            overflow_px: floating.height - height_threshold,
        },
    )
}
