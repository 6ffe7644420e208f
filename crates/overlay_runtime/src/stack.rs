//! Registry of mounted modal surfaces: topmost tracking, sibling `aria-hidden` bookkeeping, and
//! reference-counted scroll locking.
//!
//! One [`ModalStack`] is constructed at the application root and shared through context, so
//! every overlay in the tree observes the same ordering. Tests construct their own.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use dom_host::{is_forbidden_sibling_tag, DomHost, NodeId};

use crate::scroll_lock::{lock_container, ScrollLockSnapshot};

const ARIA_HIDDEN: &str = "aria-hidden";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One mounted modal surface.
pub struct ModalRegistration {
    /// Root element of the modal; its identity is the registration identity.
    pub root: NodeId,
    /// Element the modal is mounted into (the portal container).
    pub container: NodeId,
    /// Skip container scroll locking for this modal.
    pub disable_scroll_lock: bool,
}

impl ModalRegistration {
    /// Registration mounted into `container` with scroll locking enabled.
    pub const fn new(root: NodeId, container: NodeId) -> Self {
        Self {
            root,
            container,
            disable_scroll_lock: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HiddenNode {
    previous: Option<String>,
    holders: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct ContainerLock {
    count: usize,
    snapshot: ScrollLockSnapshot,
}

/// Ordered modal registry bound to one [`DomHost`].
pub struct ModalManager {
    host: Rc<dyn DomHost>,
    modals: Vec<ModalRegistration>,
    hidden: BTreeMap<NodeId, HiddenNode>,
    locks: BTreeMap<NodeId, ContainerLock>,
}

impl std::fmt::Debug for ModalManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalManager")
            .field("modals", &self.modals)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl ModalManager {
    /// Creates an empty manager.
    pub fn new(host: Rc<dyn DomHost>) -> Self {
        Self {
            host,
            modals: Vec::new(),
            hidden: BTreeMap::new(),
            locks: BTreeMap::new(),
        }
    }

    /// Registers a modal as the new topmost surface and returns its stack index.
    ///
    /// Registering an already-tracked root changes nothing.
    pub fn add(&mut self, modal: ModalRegistration) -> usize {
        if let Some(index) = self.index_of(modal.root) {
            return index;
        }

        if let Some(previous_top) = self.modals.last().map(|top| top.root) {
            self.hold_hidden(previous_top, modal.root);
        }
        self.reveal(modal.root);

        for sibling in self.host.children(modal.container) {
            if self.host.contains(sibling, modal.root) {
                self.unhide(sibling);
                continue;
            }
            if self.covers_tracked_modal(sibling) {
                continue;
            }
            let tag = self.host.tag_name(sibling);
            let input_type = self.host.attribute(sibling, "type");
            if is_forbidden_sibling_tag(&tag, input_type.as_deref()) {
                continue;
            }
            self.hold_hidden(sibling, modal.root);
        }

        if !modal.disable_scroll_lock {
            let host = Rc::clone(&self.host);
            let lock = self.locks.entry(modal.container).or_default();
            if lock.count == 0 {
                lock.snapshot = lock_container(host.as_ref(), modal.container);
            }
            lock.count += 1;
        }

        self.modals.push(modal);
        self.modals.len() - 1
    }

    /// Unregisters a modal; unknown roots are ignored.
    ///
    /// `aria_hidden` decides the removed root's own `aria-hidden` state, which matters for
    /// modals kept mounted while closed.
    pub fn remove(&mut self, root: NodeId, aria_hidden: bool) {
        let Some(index) = self.index_of(root) else {
            return;
        };
        let modal = self.modals.remove(index);

        self.hidden.remove(&root);
        let released: Vec<NodeId> = self
            .hidden
            .iter()
            .filter(|(_, entry)| entry.holders.contains(&root))
            .map(|(node, _)| *node)
            .collect();
        for node in released {
            self.release_hidden(node, root);
        }

        if aria_hidden {
            self.host.set_attribute(root, ARIA_HIDDEN, "true");
        } else {
            self.host.remove_attribute(root, ARIA_HIDDEN);
        }

        if !modal.disable_scroll_lock {
            self.release_lock(modal.container);
        }
    }

    /// Returns `true` iff `root` is the most recently added registered modal.
    pub fn is_top_modal(&self, root: NodeId) -> bool {
        self.modals.last().is_some_and(|top| top.root == root)
    }

    /// Returns `true` while `root` is registered.
    pub fn contains(&self, root: NodeId) -> bool {
        self.index_of(root).is_some()
    }

    /// Number of registered modals.
    pub fn len(&self) -> usize {
        self.modals.len()
    }

    /// Returns `true` when no modal is registered.
    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }

    /// Host the manager writes to.
    pub fn host(&self) -> Rc<dyn DomHost> {
        Rc::clone(&self.host)
    }

    fn index_of(&self, root: NodeId) -> Option<usize> {
        self.modals.iter().position(|modal| modal.root == root)
    }

    fn covers_tracked_modal(&self, node: NodeId) -> bool {
        self.modals
            .iter()
            .any(|modal| self.host.contains(node, modal.root))
    }

    fn hold_hidden(&mut self, node: NodeId, holder: NodeId) {
        if let Some(entry) = self.hidden.get_mut(&node) {
            if !entry.holders.contains(&holder) {
                entry.holders.push(holder);
            }
            return;
        }
        let previous = self.host.attribute(node, ARIA_HIDDEN);
        self.host.set_attribute(node, ARIA_HIDDEN, "true");
        self.hidden.insert(
            node,
            HiddenNode {
                previous,
                holders: vec![holder],
            },
        );
    }

    fn release_hidden(&mut self, node: NodeId, holder: NodeId) {
        let Some(entry) = self.hidden.get_mut(&node) else {
            return;
        };
        entry.holders.retain(|held_by| *held_by != holder);
        if entry.holders.is_empty() {
            self.unhide(node);
        }
    }

    fn unhide(&mut self, node: NodeId) {
        if let Some(entry) = self.hidden.remove(&node) {
            match entry.previous {
                Some(value) => self.host.set_attribute(node, ARIA_HIDDEN, &value),
                None => self.host.remove_attribute(node, ARIA_HIDDEN),
            }
        }
    }

    fn reveal(&mut self, root: NodeId) {
        self.hidden.remove(&root);
        self.host.remove_attribute(root, ARIA_HIDDEN);
    }

    fn release_lock(&mut self, container: NodeId) {
        let Some(lock) = self.locks.get_mut(&container) else {
            return;
        };
        lock.count = lock.count.saturating_sub(1);
        if lock.count > 0 {
            return;
        }
        if let Some(lock) = self.locks.remove(&container) {
            lock.snapshot.restore(self.host.as_ref());
        }
    }
}

#[derive(Debug, Clone)]
/// Shared handle to the application's [`ModalManager`].
pub struct ModalStack {
    manager: Rc<RefCell<ModalManager>>,
}

impl ModalStack {
    /// Creates a stack bound to `host`.
    pub fn new(host: Rc<dyn DomHost>) -> Self {
        Self {
            manager: Rc::new(RefCell::new(ModalManager::new(host))),
        }
    }

    /// See [`ModalManager::add`].
    pub fn add(&self, modal: ModalRegistration) -> usize {
        self.manager.borrow_mut().add(modal)
    }

    /// See [`ModalManager::remove`].
    pub fn remove(&self, root: NodeId, aria_hidden: bool) {
        self.manager.borrow_mut().remove(root, aria_hidden);
    }

    /// See [`ModalManager::is_top_modal`].
    pub fn is_top_modal(&self, root: NodeId) -> bool {
        self.manager.borrow().is_top_modal(root)
    }

    /// See [`ModalManager::contains`].
    pub fn contains(&self, root: NodeId) -> bool {
        self.manager.borrow().contains(root)
    }

    /// Number of registered modals.
    pub fn len(&self) -> usize {
        self.manager.borrow().len()
    }

    /// Returns `true` when no modal is registered.
    pub fn is_empty(&self) -> bool {
        self.manager.borrow().is_empty()
    }

    /// Host the stack writes to.
    pub fn host(&self) -> Rc<dyn DomHost> {
        self.manager.borrow().host()
    }
}

#[cfg(test)]
mod tests {
    use dom_host::{MemoryDom, Size};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Page {
        dom: MemoryDom,
        stack: ModalStack,
        app: NodeId,
        banner: NodeId,
        script: NodeId,
    }

    fn page() -> Page {
        let dom = MemoryDom::new();
        dom.set_client_size(dom.document_element(), Size::new(1009.0, 768.0));
        dom.set_scrollbar_width(15.0);
        let body = dom.body();
        let app = dom.append_new(body, "div");
        let banner = dom.append_new(body, "div");
        dom.set_attribute(banner, ARIA_HIDDEN, "false");
        let script = dom.append_new(body, "script");
        let stack = ModalStack::new(Rc::new(dom.clone()));
        Page {
            dom,
            stack,
            app,
            banner,
            script,
        }
    }

    fn mount_modal(page: &Page) -> NodeId {
        let body = page.dom.body();
        let portal = page.dom.append_new(body, "div");
        page.dom.append_new(portal, "div")
    }

    #[test]
    fn top_modal_is_the_latest_registered() {
        let page = page();
        let body = page.dom.body();
        let roots: Vec<NodeId> = (0..3).map(|_| mount_modal(&page)).collect();
        for root in &roots {
            page.stack.add(ModalRegistration::new(*root, body));
        }
        assert_eq!(
            roots
                .iter()
                .map(|root| page.stack.is_top_modal(*root))
                .collect::<Vec<_>>(),
            vec![false, false, true]
        );

        page.stack.remove(roots[2], false);
        assert!(page.stack.is_top_modal(roots[1]));
        assert!(!page.stack.is_top_modal(roots[2]));
    }

    #[test]
    fn adding_twice_keeps_one_registration() {
        let page = page();
        let root = mount_modal(&page);
        let body = page.dom.body();
        assert_eq!(page.stack.add(ModalRegistration::new(root, body)), 0);
        assert_eq!(page.stack.add(ModalRegistration::new(root, body)), 0);
        assert_eq!(page.stack.len(), 1);
    }

    #[test]
    fn siblings_regain_exact_aria_hidden_after_last_cover_closes() {
        let page = page();
        let body = page.dom.body();
        let outer = mount_modal(&page);
        let inner = mount_modal(&page);

        page.stack.add(ModalRegistration::new(outer, body));
        page.stack.add(ModalRegistration::new(inner, body));
        assert_eq!(page.dom.attribute(page.app, ARIA_HIDDEN).as_deref(), Some("true"));
        assert_eq!(page.dom.attribute(page.banner, ARIA_HIDDEN).as_deref(), Some("true"));
        assert_eq!(page.dom.attribute(outer, ARIA_HIDDEN).as_deref(), Some("true"));
        assert_eq!(page.dom.attribute(page.script, ARIA_HIDDEN), None);

        page.stack.remove(inner, false);
        assert_eq!(page.dom.attribute(page.app, ARIA_HIDDEN).as_deref(), Some("true"));
        assert_eq!(page.dom.attribute(outer, ARIA_HIDDEN), None);

        page.stack.remove(outer, false);
        assert_eq!(page.dom.attribute(page.app, ARIA_HIDDEN), None);
        assert_eq!(page.dom.attribute(page.banner, ARIA_HIDDEN).as_deref(), Some("false"));
    }

    #[test]
    fn scroll_lock_is_reference_counted() {
        let page = page();
        let body = page.dom.body();
        page.dom.set_style(body, "margin", "0px");
        let original = page.dom.style_text(body);
        let roots: Vec<NodeId> = (0..3).map(|_| mount_modal(&page)).collect();

        for root in &roots {
            page.stack.add(ModalRegistration::new(*root, body));
        }
        assert_eq!(page.dom.style(body, "padding-right").as_deref(), Some("15px"));

        page.stack.remove(roots[0], false);
        page.stack.remove(roots[2], false);
        assert_eq!(page.dom.style(body, "overflow").as_deref(), Some("hidden"));

        page.stack.remove(roots[1], false);
        assert_eq!(page.dom.style_text(body), original);
    }

    #[test]
    fn modals_without_scroll_lock_leave_container_styles_alone() {
        let page = page();
        let body = page.dom.body();
        let root = mount_modal(&page);
        page.stack.add(ModalRegistration {
            disable_scroll_lock: true,
            ..ModalRegistration::new(root, body)
        });
        assert_eq!(page.dom.style_text(body), "");
    }

    #[test]
    fn removing_unknown_modal_is_a_no_op() {
        let page = page();
        page.stack.remove(NodeId(999), true);
        assert!(page.stack.is_empty());
        assert_eq!(page.dom.attribute(NodeId(999), ARIA_HIDDEN), None);
    }

    #[test]
    fn outer_modal_closing_first_keeps_inner_on_top() {
        let page = page();
        let body = page.dom.body();
        let outer = mount_modal(&page);
        let inner = mount_modal(&page);
        page.stack.add(ModalRegistration::new(outer, body));
        page.stack.add(ModalRegistration::new(inner, body));

        page.stack.remove(outer, false);
        assert!(page.stack.is_top_modal(inner));
        assert_eq!(page.dom.attribute(inner, ARIA_HIDDEN), None);
        assert_eq!(page.dom.attribute(page.app, ARIA_HIDDEN).as_deref(), Some("true"));

        page.stack.remove(inner, false);
        assert!(page.stack.is_empty());
        assert_eq!(page.dom.attribute(page.app, ARIA_HIDDEN), None);
    }

    #[test]
    fn kept_mounted_root_stays_hidden_after_removal() {
        let page = page();
        let body = page.dom.body();
        let root = mount_modal(&page);
        page.stack.add(ModalRegistration::new(root, body));
        page.stack.remove(root, true);
        assert_eq!(page.dom.attribute(root, ARIA_HIDDEN).as_deref(), Some("true"));
    }
}
