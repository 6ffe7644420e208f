//! Keyboard focus containment for modal subtrees.

use std::rc::Rc;

use dom_host::{DomHost, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Behavior switches mirroring the modal props of the same names.
pub struct FocusTrapOptions {
    /// Do not move focus into the trap on activation.
    pub disable_auto_focus: bool,
    /// Do not pull focus back when it leaves the trap.
    pub disable_enforce_focus: bool,
    /// Do not restore focus on deactivation.
    pub disable_restore_focus: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Live state of an active trap.
pub struct FocusTrapState {
    /// Element focused before activation.
    pub return_target: Option<NodeId>,
    /// Whether the trap currently contains focus (only the topmost modal's trap does).
    pub enabled: bool,
    /// Focus guards rendered before and after the trapped subtree.
    pub sentinels: Option<(NodeId, NodeId)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of routing a Tab keypress through the trap.
pub enum TabOutcome {
    /// The trap moved focus; the default action must be prevented.
    Handled,
    /// Let the browser move focus.
    Ignored,
}

/// Focus trap bound to one subtree root.
pub struct FocusTrap {
    host: Rc<dyn DomHost>,
    root: NodeId,
    options: FocusTrapOptions,
    sentinels: Option<(NodeId, NodeId)>,
    state: Option<FocusTrapState>,
}

impl std::fmt::Debug for FocusTrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusTrap")
            .field("root", &self.root)
            .field("options", &self.options)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl FocusTrap {
    /// Creates an inactive trap for `root`.
    pub fn new(host: Rc<dyn DomHost>, root: NodeId, options: FocusTrapOptions) -> Self {
        Self {
            host,
            root,
            options,
            sentinels: None,
            state: None,
        }
    }

    /// Registers the start/end focus guards surrounding the root.
    pub fn set_sentinels(&mut self, start: NodeId, end: NodeId) {
        self.sentinels = Some((start, end));
        if let Some(state) = self.state.as_mut() {
            state.sentinels = self.sentinels;
        }
    }

    /// Current state; `None` while inactive.
    pub fn state(&self) -> Option<FocusTrapState> {
        self.state
    }

    /// Returns `true` while active and enabled.
    pub fn is_enabled(&self) -> bool {
        self.state.is_some_and(|state| state.enabled)
    }

    /// Updates `enabled`; a false→true edge activates the trap.
    pub fn set_enabled(&mut self, enabled: bool) {
        match self.state.as_mut() {
            Some(state) => state.enabled = enabled,
            None if enabled => self.activate(),
            None => {}
        }
    }

    fn activate(&mut self) {
        let return_target = self.host.active_element();
        self.state = Some(FocusTrapState {
            return_target,
            enabled: true,
            sentinels: self.sentinels,
        });

        if self.options.disable_auto_focus || self.focus_inside() {
            return;
        }
        self.focus_edge(false);
    }

    /// Tears the trap down, restoring focus to the captured target if it is still attached.
    pub fn deactivate(&mut self) {
        let Some(state) = self.state.take() else {
            return;
        };
        if self.options.disable_restore_focus {
            return;
        }
        if let Some(target) = state
            .return_target
            .filter(|target| self.host.is_connected(*target))
        {
            self.host.focus(target);
        }
    }

    /// Routes a Tab (`shift = false`) or Shift+Tab keypress.
    pub fn handle_tab(&self, shift: bool) -> TabOutcome {
        if !self.is_enabled() {
            return TabOutcome::Ignored;
        }
        let tabbable = self.tabbable();
        let (Some(first), Some(last)) = (tabbable.first().copied(), tabbable.last().copied())
        else {
            self.focus_root();
            return TabOutcome::Handled;
        };
        let active = self.host.active_element();
        let outside = !active.is_some_and(|node| self.host.contains(self.root, node));

        match (shift, active) {
            _ if outside => {
                self.host.focus(if shift { last } else { first });
                TabOutcome::Handled
            }
            (false, Some(node)) if node == last => {
                self.host.focus(first);
                TabOutcome::Handled
            }
            (true, Some(node)) if node == first || node == self.root => {
                self.host.focus(last);
                TabOutcome::Handled
            }
            _ => TabOutcome::Ignored,
        }
    }

    /// Handles focus landing on `target` (a `focusin` anywhere in the document).
    ///
    /// Focus reaching a sentinel wraps to the opposite edge; focus escaping the subtree is
    /// pulled back unless enforcement is disabled.
    pub fn handle_focus_in(&self, target: NodeId) {
        if !self.is_enabled() {
            return;
        }
        if let Some((start, end)) = self.sentinels {
            if target == start {
                self.focus_edge(true);
                return;
            }
            if target == end {
                self.focus_edge(false);
                return;
            }
        }
        if !self.host.contains(self.root, target) {
            self.enforce();
        }
    }

    /// Pulls focus back inside when it has left the subtree; called on focus events and on a
    /// short interval.
    pub fn enforce(&self) {
        if !self.is_enabled() || self.options.disable_enforce_focus || self.focus_inside() {
            return;
        }
        self.focus_edge(false);
    }

    fn focus_inside(&self) -> bool {
        self.host
            .active_element()
            .is_some_and(|node| self.host.contains(self.root, node))
    }

    /// Tabbable content of the root; the focus guards never count, even when rendered inside it.
    fn tabbable(&self) -> Vec<NodeId> {
        let mut tabbable = self.host.tabbable_descendants(self.root);
        if let Some((start, end)) = self.sentinels {
            tabbable.retain(|node| *node != start && *node != end);
        }
        tabbable
    }

    fn focus_edge(&self, last: bool) {
        let tabbable = self.tabbable();
        let edge = if last {
            tabbable.last()
        } else {
            tabbable.first()
        };
        match edge {
            Some(node) => self.host.focus(*node),
            None => self.focus_root(),
        }
    }

    fn focus_root(&self) {
        if self.host.attribute(self.root, "tabindex").is_none() {
            self.host.set_attribute(self.root, "tabindex", "-1");
        }
        self.host.focus(self.root);
    }
}

#[cfg(test)]
mod tests {
    use dom_host::MemoryDom;
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        dom: MemoryDom,
        opener: NodeId,
        root: NodeId,
        items: [NodeId; 3],
    }

    fn fixture() -> Fixture {
        let dom = MemoryDom::new();
        let opener = dom.append_new(dom.body(), "button");
        let root = dom.append_new(dom.body(), "div");
        let items = [
            dom.append_new(root, "button"),
            dom.append_new(root, "input"),
            dom.append_new(root, "button"),
        ];
        dom.focus(opener);
        Fixture {
            dom,
            opener,
            root,
            items,
        }
    }

    fn trap(fixture: &Fixture, options: FocusTrapOptions) -> FocusTrap {
        FocusTrap::new(Rc::new(fixture.dom.clone()), fixture.root, options)
    }

    #[test]
    fn tab_cycles_within_the_subtree() {
        let fixture = fixture();
        let mut trap = trap(&fixture, FocusTrapOptions::default());
        trap.set_enabled(true);
        let [a, b, c] = fixture.items;
        assert_eq!(fixture.dom.active_element(), Some(a));

        fixture.dom.focus(c);
        assert_eq!(trap.handle_tab(false), TabOutcome::Handled);
        assert_eq!(fixture.dom.active_element(), Some(a));

        assert_eq!(trap.handle_tab(true), TabOutcome::Handled);
        assert_eq!(fixture.dom.active_element(), Some(c));

        fixture.dom.focus(b);
        assert_eq!(trap.handle_tab(false), TabOutcome::Ignored);
    }

    #[test]
    fn deactivation_restores_focus_only_to_attached_targets() {
        let fixture = fixture();
        let mut trap = trap(&fixture, FocusTrapOptions::default());
        trap.set_enabled(true);
        trap.deactivate();
        assert_eq!(fixture.dom.active_element(), Some(fixture.opener));

        trap.set_enabled(true);
        fixture.dom.detach(fixture.opener);
        trap.deactivate();
        assert_eq!(fixture.dom.active_element(), Some(fixture.items[0]));
    }

    #[test]
    fn escaped_focus_is_pulled_back_unless_disabled() {
        let fixture = fixture();
        let mut trap = trap(&fixture, FocusTrapOptions::default());
        trap.set_enabled(true);
        fixture.dom.focus(fixture.opener);
        trap.handle_focus_in(fixture.opener);
        assert_eq!(fixture.dom.active_element(), Some(fixture.items[0]));

        let mut relaxed = self::trap(
            &fixture,
            FocusTrapOptions {
                disable_enforce_focus: true,
                ..FocusTrapOptions::default()
            },
        );
        trap.deactivate();
        relaxed.set_enabled(true);
        fixture.dom.focus(fixture.opener);
        relaxed.enforce();
        assert_eq!(fixture.dom.active_element(), Some(fixture.opener));
    }

    #[test]
    fn empty_trap_focuses_root_and_disabled_trap_ignores_tab() {
        let dom = MemoryDom::new();
        let root = dom.append_new(dom.body(), "div");
        let mut trap = FocusTrap::new(Rc::new(dom.clone()), root, FocusTrapOptions::default());
        trap.set_enabled(true);
        assert_eq!(dom.active_element(), Some(root));
        assert_eq!(dom.attribute(root, "tabindex").as_deref(), Some("-1"));

        trap.set_enabled(false);
        assert_eq!(trap.handle_tab(false), TabOutcome::Ignored);
    }

    #[test]
    fn sentinels_wrap_to_the_opposite_edge() {
        let fixture = fixture();
        let start = fixture.dom.create_element("div");
        let end = fixture.dom.create_element("div");
        let mut trap = trap(&fixture, FocusTrapOptions::default());
        trap.set_sentinels(start, end);
        trap.set_enabled(true);
        trap.handle_focus_in(start);
        assert_eq!(fixture.dom.active_element(), Some(fixture.items[2]));
        trap.handle_focus_in(end);
        assert_eq!(fixture.dom.active_element(), Some(fixture.items[0]));
    }

    #[test]
    fn guards_inside_the_root_are_not_content() {
        let dom = MemoryDom::new();
        let root = dom.append_new(dom.body(), "div");
        let start = dom.append_new(root, "div");
        dom.set_attribute(start, "tabindex", "0");
        let button = dom.append_new(root, "button");
        let end = dom.append_new(root, "div");
        dom.set_attribute(end, "tabindex", "0");

        let mut trap = FocusTrap::new(Rc::new(dom.clone()), root, FocusTrapOptions::default());
        trap.set_sentinels(start, end);
        trap.set_enabled(true);
        assert_eq!(dom.active_element(), Some(button));

        dom.focus(start);
        trap.handle_focus_in(start);
        assert_eq!(dom.active_element(), Some(button));
        dom.focus(end);
        trap.handle_focus_in(end);
        assert_eq!(dom.active_element(), Some(button));

        assert_eq!(trap.handle_tab(false), TabOutcome::Handled);
        assert_eq!(trap.handle_tab(true), TabOutcome::Handled);
        assert_eq!(dom.active_element(), Some(button));
    }
}
