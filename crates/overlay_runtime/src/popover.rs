//! Anchored surface placement: anchor resolution, style application, and the `positioned` gate.

use std::{fmt, rc::Rc};

use dom_host::{DomHost, NodeId, Point, Rect, Size, ELEMENT_NODE};

use crate::{
    error::OverlayWarning,
    positioning::{
        anchor_offset, compute_position, oversize_warning, origin_point, Origin,
        PositioningResult, TransformOrigin,
    },
    theme::format_number,
};

/// Default inset kept between a popover and the viewport edges.
pub const DEFAULT_MARGIN_THRESHOLD: f64 = 16.0;

/// Default paper elevation for popovers.
pub const POPOVER_ELEVATION: u8 = 8;

/// Anchor that is not a real element, such as a text selection range.
pub trait VirtualElement {
    /// Viewport rectangle of the virtual anchor.
    fn bounding_rect(&self) -> Rect;

    /// DOM node type reported by the anchor.
    fn node_type(&self) -> u16 {
        ELEMENT_NODE
    }
}

impl VirtualElement for Rect {
    fn bounding_rect(&self) -> Rect {
        *self
    }
}

#[derive(Clone)]
/// What a popover is anchored to.
pub enum AnchorDescriptor {
    /// A concrete element.
    Element(NodeId),
    /// A callback producing the element at positioning time.
    Resolver(Rc<dyn Fn() -> Option<NodeId>>),
    /// A virtual element exposing only a rectangle.
    Virtual(Rc<dyn VirtualElement>),
}

impl fmt::Debug for AnchorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(node) => f.debug_tuple("Element").field(node).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
            Self::Virtual(element) => f
                .debug_tuple("Virtual")
                .field(&element.bounding_rect())
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Which input determines the anchor point.
pub enum AnchorReference {
    #[default]
    /// The anchor element's rectangle and `anchor_origin`.
    AnchorEl,
    /// An explicit viewport point.
    AnchorPosition,
    /// No anchoring; only the transform origin is computed.
    None,
}

#[derive(Debug, Clone)]
/// Placement inputs for one popover.
pub struct PopoverOptions {
    /// Anchor target.
    pub anchor: Option<AnchorDescriptor>,
    /// Anchor mode.
    pub anchor_reference: AnchorReference,
    /// Point used with [`AnchorReference::AnchorPosition`].
    pub anchor_position: Option<Point>,
    /// Point on the anchor the surface attaches to.
    pub anchor_origin: Origin,
    /// Point on the surface that attaches to the anchor.
    pub transform_origin: Origin,
    /// Viewport inset; `None` disables clamping.
    pub margin_threshold: Option<f64>,
}

impl Default for PopoverOptions {
    fn default() -> Self {
        Self {
            anchor: None,
            anchor_reference: AnchorReference::AnchorEl,
            anchor_position: None,
            anchor_origin: Origin::default(),
            transform_origin: Origin::default(),
            margin_threshold: Some(DEFAULT_MARGIN_THRESHOLD),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Styles to write onto the paper, plus any warnings raised while computing them.
pub struct Placement {
    /// `top` in px; absent when not anchored.
    pub top: Option<f64>,
    /// `left` in px; absent when not anchored.
    pub left: Option<f64>,
    /// `transform-origin` of the paper.
    pub transform_origin: TransformOrigin,
    /// Configuration warnings.
    pub warnings: Vec<OverlayWarning>,
}

impl From<PositioningResult> for Placement {
    fn from(result: PositioningResult) -> Self {
        Self {
            top: Some(result.top),
            left: Some(result.left),
            transform_origin: result.transform_origin,
            warnings: Vec::new(),
        }
    }
}

/// Resolves an anchor descriptor to a rectangle, falling back to the body for missing or
/// non-element anchors.
pub fn resolve_anchor_rect(
    host: &dyn DomHost,
    anchor: Option<&AnchorDescriptor>,
) -> (Rect, Option<OverlayWarning>) {
    let rect = match anchor {
        Some(AnchorDescriptor::Element(node)) => host.bounding_rect(*node),
        Some(AnchorDescriptor::Resolver(resolve)) => {
            host.bounding_rect(resolve().unwrap_or_else(|| host.body()))
        }
        Some(AnchorDescriptor::Virtual(element)) if element.node_type() == ELEMENT_NODE => {
            element.bounding_rect()
        }
        _ => host.bounding_rect(host.body()),
    };
    let warning = rect.is_degenerate().then_some(OverlayWarning::DetachedAnchor);
    (rect, warning)
}

/// Computes the paper placement for `paper_size`.
pub fn compute_placement(
    host: &dyn DomHost,
    options: &PopoverOptions,
    paper_size: Size,
) -> Placement {
    if options.anchor_reference == AnchorReference::None {
        let origin = origin_point(paper_size, options.transform_origin);
        return Placement {
            top: None,
            left: None,
            transform_origin: TransformOrigin {
                horizontal: origin.left,
                vertical: origin.top,
            },
            warnings: Vec::new(),
        };
    }

    let mut warnings = Vec::new();
    let anchor_point = if options.anchor_reference == AnchorReference::AnchorPosition {
        options.anchor_position.unwrap_or_else(|| {
            warnings.push(OverlayWarning::MissingAnchorPosition);
            Point::default()
        })
    } else {
        let (rect, warning) = resolve_anchor_rect(host, options.anchor.as_ref());
        warnings.extend(warning);
        anchor_offset(rect, options.anchor_origin)
    };

    let viewport = host.viewport_size();
    warnings.extend(oversize_warning(
        paper_size,
        options.margin_threshold,
        viewport,
    ));
    let mut placement = Placement::from(compute_position(
        paper_size,
        anchor_point,
        options.transform_origin,
        options.margin_threshold,
        viewport,
    ));
    placement.warnings = warnings;
    placement
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Window events a popover follows to keep its placement current.
pub struct RepositionListeners {
    /// Window `resize`.
    pub resize: bool,
    /// Window `scroll`, only followed when the page is allowed to scroll under the popover.
    pub scroll: bool,
}

impl RepositionListeners {
    /// Listeners wanted in the given state; a closed popover follows nothing.
    pub const fn for_state(open: bool, disable_scroll_lock: bool) -> Self {
        Self {
            resize: open,
            scroll: open && disable_scroll_lock,
        }
    }

    /// Returns `true` when no listener is wanted.
    pub const fn is_empty(self) -> bool {
        !self.resize && !self.scroll
    }
}

#[derive(Debug, Clone, Default)]
/// Applies placements to a mounted paper element and tracks whether it has been positioned.
pub struct PopoverPlacement {
    options: PopoverOptions,
    paper: Option<NodeId>,
    positioned: bool,
}

impl PopoverPlacement {
    /// Creates a controller for `options`.
    pub fn new(options: PopoverOptions) -> Self {
        Self {
            options,
            paper: None,
            positioned: false,
        }
    }

    /// Replaces the placement inputs.
    pub fn set_options(&mut self, options: PopoverOptions) {
        self.options = options;
    }

    /// Current placement inputs.
    pub fn options(&self) -> &PopoverOptions {
        &self.options
    }

    /// Attaches (or detaches) the paper element.
    pub fn set_paper(&mut self, paper: Option<NodeId>) {
        self.paper = paper;
    }

    /// Recomputes and writes `top`/`left`/`transform-origin` onto the paper.
    ///
    /// Without a mounted paper this does nothing.
    pub fn update_position(&mut self, host: &dyn DomHost) -> Vec<OverlayWarning> {
        let Some(paper) = self.paper.filter(|paper| host.is_connected(*paper)) else {
            return Vec::new();
        };
        let placement = compute_placement(host, &self.options, host.offset_size(paper));
        if let Some(top) = placement.top {
            host.set_style(paper, "top", &format!("{}px", format_number(top)));
        }
        if let Some(left) = placement.left {
            host.set_style(paper, "left", &format!("{}px", format_number(left)));
        }
        host.set_style(
            paper,
            "transform-origin",
            &placement.transform_origin.to_css(),
        );
        self.positioned = true;
        placement.warnings
    }

    /// Marks the paper as unpositioned once its exit transition finishes.
    pub fn handle_exited(&mut self) {
        self.positioned = false;
    }

    /// Returns `true` once a placement has been written since the last exit.
    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    /// Paper opacity override: `Some("0")` until positioned.
    pub fn paper_opacity(&self) -> Option<&'static str> {
        (!self.positioned).then_some("0")
    }
}

#[cfg(test)]
mod tests {
    use dom_host::MemoryDom;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::positioning::{HorizontalOrigin, VerticalOrigin};

    fn dom_with_anchor() -> (MemoryDom, NodeId, NodeId) {
        let dom = MemoryDom::new();
        dom.set_viewport(Size::new(800.0, 600.0));
        let anchor = dom.append_new(dom.body(), "button");
        dom.set_rect(anchor, Rect::new(500.0, 500.0, 100.0, 20.0));
        let paper = dom.append_new(dom.body(), "div");
        dom.set_rect(paper, Rect::new(0.0, 0.0, 160.0, 200.0));
        (dom, anchor, paper)
    }

    #[test]
    fn paper_stays_transparent_until_positioned() {
        let (dom, anchor, paper) = dom_with_anchor();
        let mut placement = PopoverPlacement::new(PopoverOptions {
            anchor: Some(AnchorDescriptor::Element(anchor)),
            anchor_origin: Origin::new(VerticalOrigin::Bottom, HorizontalOrigin::Left),
            ..PopoverOptions::default()
        });
        assert_eq!(placement.paper_opacity(), Some("0"));

        placement.set_paper(Some(paper));
        let warnings = placement.update_position(&dom);
        assert!(warnings.is_empty());
        assert_eq!(placement.paper_opacity(), None);
        assert_eq!(dom.style(paper, "top").as_deref(), Some("384px"));
        assert_eq!(dom.style(paper, "left").as_deref(), Some("500px"));
        assert_eq!(dom.style(paper, "transform-origin").as_deref(), Some("0px 136px"));

        placement.handle_exited();
        assert!(!placement.is_positioned());
    }

    #[test]
    fn missing_anchor_position_warns_and_degrades() {
        let (dom, _, paper) = dom_with_anchor();
        let placement = compute_placement(
            &dom,
            &PopoverOptions {
                anchor_reference: AnchorReference::AnchorPosition,
                ..PopoverOptions::default()
            },
            dom.offset_size(paper),
        );
        assert_eq!(placement.warnings, vec![OverlayWarning::MissingAnchorPosition]);
        assert_eq!(placement.top, Some(16.0));
    }

    #[test]
    fn listeners_follow_the_open_state() {
        assert!(RepositionListeners::for_state(false, true).is_empty());
        assert_eq!(
            RepositionListeners::for_state(true, false),
            RepositionListeners {
                resize: true,
                scroll: false,
            }
        );
        assert_eq!(
            RepositionListeners::for_state(true, true),
            RepositionListeners {
                resize: true,
                scroll: true,
            }
        );
    }

    #[test]
    fn detached_anchor_warns() {
        let (dom, anchor, paper) = dom_with_anchor();
        dom.detach(anchor);
        let placement = compute_placement(
            &dom,
            &PopoverOptions {
                anchor: Some(AnchorDescriptor::Element(anchor)),
                ..PopoverOptions::default()
            },
            dom.offset_size(paper),
        );
        assert_eq!(placement.warnings, vec![OverlayWarning::DetachedAnchor]);
    }

    #[test]
    fn virtual_and_resolved_anchors_use_their_rects() {
        let (dom, anchor, _) = dom_with_anchor();
        let virtual_anchor: Rc<dyn VirtualElement> = Rc::new(Rect::new(40.0, 60.0, 10.0, 10.0));
        let (rect, warning) =
            resolve_anchor_rect(&dom, Some(&AnchorDescriptor::Virtual(virtual_anchor)));
        assert_eq!(rect, Rect::new(40.0, 60.0, 10.0, 10.0));
        assert_eq!(warning, None);

        let resolver = AnchorDescriptor::Resolver(Rc::new(move || Some(anchor)));
        assert_eq!(
            resolve_anchor_rect(&dom, Some(&resolver)).0,
            Rect::new(500.0, 500.0, 100.0, 20.0)
        );
    }

    #[test]
    fn unanchored_popover_only_sets_transform_origin() {
        let (dom, _, paper) = dom_with_anchor();
        let mut placement = PopoverPlacement::new(PopoverOptions {
            anchor_reference: AnchorReference::None,
            transform_origin: Origin::new(VerticalOrigin::Center, HorizontalOrigin::Center),
            ..PopoverOptions::default()
        });
        placement.set_paper(Some(paper));
        placement.update_position(&dom);
        assert_eq!(dom.style(paper, "top"), None);
        assert_eq!(dom.style(paper, "transform-origin").as_deref(), Some("80px 100px"));
    }
}
