//! Overlay orchestration for the kemeng UI kit.
//!
//! Everything here runs against a [`dom_host::DomHost`] so it can be driven by the browser
//! adapter or by [`dom_host::MemoryDom`] in tests. The Leptos components in `kemeng_ui` own the
//! event listeners and timers; this crate decides what they do.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod animations;
pub mod dialog;
pub mod drawer;
pub mod error;
pub mod focus_trap;
pub mod menu;
pub mod menu_list;
pub mod modal;
pub mod popover;
pub mod positioning;
pub mod press;
pub mod scroll_lock;
pub mod select;
pub mod stack;
pub mod theme;
pub mod transition;

pub use animations::{
    AnimatedChild, DriverCommand, Fade, Grow, Slide, SlideDirection, TransitionDriver,
    TransitionEvent,
};
pub use error::{report, report_all, OverlayWarning, ThemeError};
pub use focus_trap::{FocusTrap, FocusTrapOptions, TabOutcome};
pub use modal::{
    BackdropClickGuard, CloseReason, KeyDownOutcome, ModalController, ModalLifecycle,
    ModalOptions,
};
pub use popover::{
    AnchorDescriptor, AnchorReference, PopoverOptions, PopoverPlacement, RepositionListeners,
};
pub use positioning::{compute_position, HorizontalOrigin, Origin, VerticalOrigin};
pub use stack::{ModalManager, ModalRegistration, ModalStack};
pub use theme::{TextDirection, ThemeTokens};
pub use transition::{
    reduce_transition, Timeout, TransitionAction, TransitionConfig, TransitionEffect,
    TransitionMachine, TransitionMode, TransitionPhase,
};
