//! Modal lifecycle: stack registration, close requests, focus trapping, and the
//! render/visibility rules for transitions and `keep_mounted`.

use std::fmt;

use dom_host::NodeId;

use crate::{
    focus_trap::{FocusTrap, FocusTrapOptions, TabOutcome},
    stack::{ModalRegistration, ModalStack},
};

/// `keyCode` reported while an IME composition is in progress.
pub const IME_PROCESS_KEY_CODE: u32 = 229;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Why a surface asked to be closed.
pub enum CloseReason {
    /// Click that both started and ended on the backdrop.
    BackdropClick,
    /// Escape pressed while the modal was topmost.
    EscapeKeyDown,
    /// Tab pressed inside a menu.
    TabKeyDown,
}

impl CloseReason {
    /// Wire name passed to `on_close`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BackdropClick => "backdropClick",
            Self::EscapeKeyDown => "escapeKeyDown",
            Self::TabKeyDown => "tabKeyDown",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Where a modal is in its open/close cycle.
pub enum ModalLifecycle {
    #[default]
    /// Not registered and not rendered (unless kept mounted).
    Closed,
    /// Open requested; the enter transition has not reported yet.
    Opening,
    /// Open and settled.
    Open,
    /// Close requested; waiting for the exit transition.
    Closing,
}

impl ModalLifecycle {
    /// Stable token used in `data-modal-state`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Behavior switches of one modal.
pub struct ModalOptions {
    /// Keep the subtree mounted (hidden) while closed.
    pub keep_mounted: bool,
    /// Stay registered until the child transition reports `exited`.
    pub close_after_transition: bool,
    /// Ignore the Escape key.
    pub disable_escape_key_down: bool,
    /// Skip container scroll locking.
    pub disable_scroll_lock: bool,
    /// Do not render the backdrop.
    pub hide_backdrop: bool,
    /// Render in place instead of through the portal.
    pub disable_portal: bool,
    /// Focus trap switches.
    pub focus: FocusTrapOptions,
    /// The child participates in the transition orchestrator.
    pub has_transition: bool,
    /// `aria-hidden` written onto the root when it is removed from the stack.
    pub aria_hidden: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            keep_mounted: false,
            close_after_transition: false,
            disable_escape_key_down: false,
            disable_scroll_lock: false,
            hide_backdrop: false,
            disable_portal: false,
            focus: FocusTrapOptions::default(),
            has_transition: false,
            aria_hidden: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of routing a keydown through the modal.
pub enum KeyDownOutcome {
    /// Not ours; let it propagate.
    Ignored,
    /// Request close with `reason` and stop propagation.
    Close(CloseReason),
}

impl KeyDownOutcome {
    /// Whether the event must stop bubbling to modals below.
    pub const fn stops_propagation(self) -> bool {
        matches!(self, Self::Close(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Target-identity check for backdrop clicks.
///
/// A click only closes when the press started on the same element the click lands on and
/// that element is the listener's own node, so drags out of the content do not close.
pub struct BackdropClickGuard {
    pressed: Option<NodeId>,
}

impl BackdropClickGuard {
    /// Records the `mousedown` target.
    pub fn pointer_down(&mut self, target: NodeId) {
        self.pressed = Some(target);
    }

    /// Consumes the recorded press and returns `true` when the click counts as a backdrop click.
    pub fn click(&mut self, target: NodeId, current_target: NodeId) -> bool {
        let pressed = self.pressed.take();
        target == current_target && pressed == Some(current_target)
    }
}

/// Drives one modal surface against the shared [`ModalStack`].
pub struct ModalController {
    stack: ModalStack,
    options: ModalOptions,
    container: NodeId,
    root: Option<NodeId>,
    open: bool,
    exited: bool,
    lifecycle: ModalLifecycle,
    trap: Option<FocusTrap>,
}

impl fmt::Debug for ModalController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalController")
            .field("options", &self.options)
            .field("container", &self.container)
            .field("root", &self.root)
            .field("open", &self.open)
            .field("exited", &self.exited)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

impl ModalController {
    /// Creates a closed controller mounting into `container` (the body when `None`).
    pub fn new(stack: ModalStack, options: ModalOptions, container: Option<NodeId>) -> Self {
        let container = container.unwrap_or_else(|| stack.host().body());
        Self {
            stack,
            options,
            container,
            root: None,
            open: false,
            exited: true,
            lifecycle: ModalLifecycle::Closed,
            trap: None,
        }
    }

    /// Current options.
    pub fn options(&self) -> ModalOptions {
        self.options
    }

    /// Replaces the options; takes effect on the next open.
    pub fn set_options(&mut self, options: ModalOptions) {
        self.options = options;
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> ModalLifecycle {
        self.lifecycle
    }

    /// Root element, once attached.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Whether the child transition has finished exiting.
    pub fn exited(&self) -> bool {
        self.exited
    }

    /// Whether the subtree should be in the DOM at all.
    pub fn should_render(&self) -> bool {
        self.options.keep_mounted || self.open || (self.options.has_transition && !self.exited)
    }

    /// `visibility` override for the root while closed but kept mounted.
    pub fn root_visibility(&self) -> Option<&'static str> {
        (!self.open && self.exited).then_some("hidden")
    }

    /// Returns `true` while registered as the topmost modal.
    pub fn is_top_modal(&self) -> bool {
        self.root.is_some_and(|root| self.stack.is_top_modal(root))
    }

    /// Returns `true` while registered with the stack.
    pub fn is_registered(&self) -> bool {
        self.root.is_some_and(|root| self.stack.contains(root))
    }

    /// Applies a new `open` prop.
    pub fn set_open(&mut self, open: bool) {
        if open == self.open {
            return;
        }
        self.open = open;

        if open {
            self.exited = false;
            self.lifecycle = if self.options.has_transition {
                ModalLifecycle::Opening
            } else {
                ModalLifecycle::Open
            };
            self.register();
            return;
        }

        if let Some(trap) = self.trap.as_mut() {
            trap.deactivate();
        }
        if !self.options.has_transition {
            self.exited = true;
            self.lifecycle = ModalLifecycle::Closed;
            self.unregister();
            return;
        }
        self.lifecycle = ModalLifecycle::Closing;
        if !self.options.close_after_transition {
            self.unregister();
        }
    }

    /// Binds the rendered root element.
    ///
    /// An open modal registers now if it could not earlier; a closed, kept-mounted one gets its
    /// `aria-hidden` state.
    pub fn attach_root(&mut self, root: NodeId) {
        if self.root == Some(root) {
            return;
        }
        self.detach_root();
        self.root = Some(root);
        self.trap = Some(FocusTrap::new(self.stack.host(), root, self.options.focus));

        if self.open {
            self.register();
        } else {
            let host = self.stack.host();
            if self.options.aria_hidden {
                host.set_attribute(root, "aria-hidden", "true");
            } else {
                host.remove_attribute(root, "aria-hidden");
            }
        }
    }

    /// Releases the root on unmount; pending registrations are dropped.
    pub fn detach_root(&mut self) {
        if let Some(mut trap) = self.trap.take() {
            trap.deactivate();
        }
        self.unregister();
        self.root = None;
    }

    /// Registers the focus trap's start/end guards.
    pub fn set_sentinels(&mut self, start: NodeId, end: NodeId) {
        if let Some(trap) = self.trap.as_mut() {
            trap.set_sentinels(start, end);
        }
    }

    /// Enables the focus trap iff this modal is open and topmost.
    pub fn sync_focus_trap(&mut self) {
        let enabled = self.open && self.is_top_modal();
        if let Some(trap) = self.trap.as_mut() {
            trap.set_enabled(enabled);
        }
    }

    /// Focus trap of the attached root.
    pub fn focus_trap(&self) -> Option<&FocusTrap> {
        self.trap.as_ref()
    }

    /// Child transition started entering.
    pub fn transition_enter(&mut self) {
        self.exited = false;
        if self.open {
            self.lifecycle = ModalLifecycle::Open;
        }
    }

    /// Child transition finished exiting.
    pub fn transition_exited(&mut self) {
        self.exited = true;
        if self.open {
            return;
        }
        self.lifecycle = ModalLifecycle::Closed;
        if self.options.close_after_transition {
            self.unregister();
        }
    }

    /// Routes a keydown on the root. `key_code` is the legacy `which` value.
    pub fn handle_key_down(&self, key: &str, key_code: u32) -> KeyDownOutcome {
        if key != "Escape" || key_code == IME_PROCESS_KEY_CODE || !self.is_top_modal() {
            return KeyDownOutcome::Ignored;
        }
        if self.options.disable_escape_key_down {
            return KeyDownOutcome::Ignored;
        }
        KeyDownOutcome::Close(CloseReason::EscapeKeyDown)
    }

    /// Routes Tab through the focus trap.
    pub fn handle_tab(&self, shift: bool) -> TabOutcome {
        self.trap
            .as_ref()
            .map_or(TabOutcome::Ignored, |trap| trap.handle_tab(shift))
    }

    /// Routes a document `focusin` through the focus trap.
    pub fn handle_focus_in(&self, target: NodeId) {
        if let Some(trap) = self.trap.as_ref() {
            trap.handle_focus_in(target);
        }
    }

    /// Periodic focus enforcement tick.
    pub fn enforce_focus(&self) {
        if let Some(trap) = self.trap.as_ref() {
            trap.enforce();
        }
    }

    fn register(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        if self.stack.contains(root) {
            return;
        }
        self.stack.add(ModalRegistration {
            root,
            container: self.container,
            disable_scroll_lock: self.options.disable_scroll_lock,
        });
        self.stack.host().set_scroll_top(root, 0.0);
    }

    fn unregister(&mut self) {
        if let Some(root) = self.root {
            self.stack.remove(root, self.options.aria_hidden);
        }
    }
}

impl Drop for ModalController {
    fn drop(&mut self) {
        self.unregister();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use dom_host::{DomHost, MemoryDom};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Page {
        dom: MemoryDom,
        stack: ModalStack,
    }

    fn page() -> Page {
        let dom = MemoryDom::new();
        dom.append_new(dom.body(), "main");
        let stack = ModalStack::new(Rc::new(dom.clone()));
        Page { dom, stack }
    }

    fn open_modal(page: &Page, options: ModalOptions) -> ModalController {
        let mut modal = ModalController::new(page.stack.clone(), options, None);
        modal.set_open(true);
        let root = page.dom.append_new(page.dom.body(), "div");
        page.dom.append_new(root, "button");
        modal.attach_root(root);
        modal.sync_focus_trap();
        modal
    }

    #[test]
    fn escape_closes_only_the_topmost_modal() {
        let page = page();
        let outer = open_modal(&page, ModalOptions::default());
        let inner = open_modal(&page, ModalOptions::default());

        assert_eq!(outer.handle_key_down("Escape", 27), KeyDownOutcome::Ignored);
        let outcome = inner.handle_key_down("Escape", 27);
        assert_eq!(outcome, KeyDownOutcome::Close(CloseReason::EscapeKeyDown));
        assert!(outcome.stops_propagation());
        assert_eq!(CloseReason::EscapeKeyDown.as_str(), "escapeKeyDown");
    }

    #[test]
    fn escape_during_composition_or_when_disabled_is_ignored() {
        let page = page();
        let modal = open_modal(
            &page,
            ModalOptions {
                disable_escape_key_down: true,
                ..ModalOptions::default()
            },
        );
        assert_eq!(modal.handle_key_down("Escape", 27), KeyDownOutcome::Ignored);

        let other = open_modal(&page, ModalOptions::default());
        assert_eq!(
            other.handle_key_down("Escape", IME_PROCESS_KEY_CODE),
            KeyDownOutcome::Ignored
        );
        assert_eq!(other.handle_key_down("Enter", 13), KeyDownOutcome::Ignored);
    }

    #[test]
    fn closing_the_outer_of_two_nested_dialogs_keeps_the_inner_on_top() {
        let page = page();
        let mut outer = open_modal(&page, ModalOptions::default());
        let mut inner = open_modal(&page, ModalOptions::default());
        assert!(inner.is_top_modal());

        outer.set_open(false);
        assert!(!outer.is_registered());
        assert!(inner.is_top_modal());
        inner.sync_focus_trap();
        assert!(inner.focus_trap().is_some_and(FocusTrap::is_enabled));
        assert_eq!(
            inner.handle_key_down("Escape", 27),
            KeyDownOutcome::Close(CloseReason::EscapeKeyDown)
        );

        inner.set_open(false);
        assert!(page.stack.is_empty());
        assert_eq!(page.dom.style_text(page.dom.body()), "");
    }

    #[test]
    fn close_after_transition_stays_registered_until_exited() {
        let page = page();
        let mut modal = open_modal(
            &page,
            ModalOptions {
                has_transition: true,
                close_after_transition: true,
                ..ModalOptions::default()
            },
        );
        assert_eq!(modal.lifecycle(), ModalLifecycle::Opening);
        modal.transition_enter();
        assert_eq!(modal.lifecycle(), ModalLifecycle::Open);

        modal.set_open(false);
        assert_eq!(modal.lifecycle(), ModalLifecycle::Closing);
        assert!(modal.is_registered());
        assert!(modal.should_render());

        modal.transition_exited();
        assert_eq!(modal.lifecycle(), ModalLifecycle::Closed);
        assert!(!modal.is_registered());
        assert!(!modal.should_render());
    }

    #[test]
    fn transition_without_close_after_transition_unregisters_immediately() {
        let page = page();
        let mut modal = open_modal(
            &page,
            ModalOptions {
                has_transition: true,
                ..ModalOptions::default()
            },
        );
        modal.set_open(false);
        assert!(!modal.is_registered());
        assert!(modal.should_render());
        assert_eq!(modal.root_visibility(), None);

        modal.transition_exited();
        assert!(!modal.should_render());
    }

    #[test]
    fn kept_mounted_modal_is_hidden_while_closed() {
        let page = page();
        let mut modal = open_modal(
            &page,
            ModalOptions {
                keep_mounted: true,
                ..ModalOptions::default()
            },
        );
        let root = modal.root().expect("root attached");
        modal.set_open(false);
        assert!(modal.should_render());
        assert_eq!(modal.root_visibility(), Some("hidden"));
        assert_eq!(page.dom.attribute(root, "aria-hidden").as_deref(), Some("true"));

        modal.set_open(true);
        assert_eq!(modal.root_visibility(), None);
        assert_eq!(page.dom.attribute(root, "aria-hidden"), None);
    }

    #[test]
    fn opening_scrolls_root_to_top_and_traps_focus() {
        let page = page();
        let opener = page.dom.append_new(page.dom.body(), "button");
        page.dom.focus(opener);
        let mut modal = open_modal(&page, ModalOptions::default());
        let root = modal.root().expect("root attached");
        assert_eq!(page.dom.scroll_top(root), 0.0);
        let first = page.dom.children(root)[0];
        assert_eq!(page.dom.active_element(), Some(first));

        modal.set_open(false);
        assert_eq!(page.dom.active_element(), Some(opener));
    }

    #[test]
    fn backdrop_click_requires_press_and_click_on_the_backdrop() {
        let backdrop = NodeId(10);
        let content = NodeId(11);
        let mut guard = BackdropClickGuard::default();

        guard.pointer_down(content);
        assert!(!guard.click(backdrop, backdrop));

        guard.pointer_down(backdrop);
        assert!(!guard.click(content, backdrop));

        guard.pointer_down(backdrop);
        assert!(guard.click(backdrop, backdrop));
    }

    #[test]
    fn backdrop_click_without_a_recorded_press_is_ignored() {
        let backdrop = NodeId(10);
        let mut guard = BackdropClickGuard::default();
        assert!(!guard.click(backdrop, backdrop));

        guard.pointer_down(backdrop);
        assert!(guard.click(backdrop, backdrop));
        assert!(!guard.click(backdrop, backdrop));
    }

    #[test]
    fn guards_rendered_in_the_root_hand_focus_to_the_content() {
        let page = page();
        let mut modal = ModalController::new(page.stack.clone(), ModalOptions::default(), None);
        modal.set_open(true);
        let root = page.dom.append_new(page.dom.body(), "div");
        let start = page.dom.append_new(root, "div");
        page.dom.set_attribute(start, "tabindex", "0");
        let button = page.dom.append_new(root, "button");
        let end = page.dom.append_new(root, "div");
        page.dom.set_attribute(end, "tabindex", "0");

        modal.attach_root(root);
        modal.set_sentinels(start, end);
        modal.sync_focus_trap();
        assert_eq!(page.dom.active_element(), Some(button));

        page.dom.focus(end);
        modal.handle_focus_in(end);
        assert_eq!(page.dom.active_element(), Some(button));
        assert_eq!(modal.handle_tab(false), TabOutcome::Handled);
        assert_eq!(page.dom.active_element(), Some(button));
    }
}
