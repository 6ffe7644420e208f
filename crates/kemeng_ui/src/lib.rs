//! Leptos overlay components for the kemeng UI kit.
//!
//! Components own listeners, timers and markup; every decision about stacking, placement,
//! focus and transition phases is delegated to `overlay_runtime` through a shared
//! [`OverlayContext`]. Mount [`OverlayProvider`] once near the application root.
//!
//! All components emit the stable `data-ui-*` DOM contract (`data-ui-primitive`,
//! `data-ui-kind`, `data-ui-variant`, `data-ui-state`) so stylesheets can target them without
//! depending on generated class names.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod components;
mod context;

pub use components::{
    AsyncClickHandler, Backdrop, Button, Dialog, Drawer, Fade, FocusTrap, Grow, Menu, MenuItem,
    MenuList, MenuSeparator, Modal, Paper, Popover, PopoverActions, Portal, Select, Slide,
    TransitionHooks,
};
pub use context::{use_overlay, OverlayContext, OverlayProvider};
pub use overlay_runtime::{
    dialog::{DialogMaxWidth, DialogScroll},
    drawer::{DrawerAnchor, DrawerVariant},
    menu_list::MenuVariant,
    press::{ButtonLoading, ButtonShape, ButtonSize, ButtonVariant},
    select::{SelectOption, SelectValue},
    AnchorReference, CloseReason, HorizontalOrigin, Origin, SlideDirection, TextDirection,
    ThemeTokens, Timeout, TransitionEvent, VerticalOrigin,
};

/// Convenience imports for applications using the overlay components.
pub mod prelude {
    pub use crate::{
        use_overlay, Backdrop, Button, ButtonLoading, ButtonShape, ButtonSize, ButtonVariant,
        CloseReason, Dialog, DialogMaxWidth, DialogScroll, Drawer, DrawerAnchor, DrawerVariant,
        Fade, FocusTrap, Grow, HorizontalOrigin, Menu, MenuItem, MenuList, MenuSeparator,
        MenuVariant, Modal, Origin, OverlayProvider, Paper, Popover, Portal, Select,
        SelectOption, SelectValue, Slide, SlideDirection, ThemeTokens, Timeout, VerticalOrigin,
    };
}
