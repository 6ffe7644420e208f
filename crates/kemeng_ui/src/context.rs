//! Overlay services shared through Leptos context.

use std::rc::Rc;

use dom_host::{DomHost, NodeId};
use dom_host_web::WebDomHost;
use leptos::*;
use overlay_runtime::{ModalStack, ThemeTokens};

#[derive(Debug, Clone, Copy)]
/// Handles every overlay component reads from context.
///
/// All fields are arena handles, so the context is `Copy` and cheap to capture in closures.
pub struct OverlayContext {
    host: StoredValue<WebDomHost>,
    stack: StoredValue<ModalStack>,
    /// Theme tokens; components read them untracked when building timings.
    pub theme: RwSignal<ThemeTokens>,
}

impl OverlayContext {
    /// Browser host shared by every overlay.
    pub fn web_host(&self) -> WebDomHost {
        self.host.get_value()
    }

    /// The host as the runtime's trait object.
    pub fn dom_host(&self) -> Rc<dyn DomHost> {
        Rc::new(self.web_host())
    }

    /// The application-wide modal stack.
    pub fn stack(&self) -> ModalStack {
        self.stack.get_value()
    }

    /// Registers `element` with the host and returns its id.
    pub fn node_id(&self, element: &web_sys::Element) -> NodeId {
        self.host.with_value(|host| host.node_id(element))
    }

    /// Forgets an unmounted element.
    pub fn release(&self, node: NodeId) {
        self.host.with_value(|host| host.release(node));
    }
}

#[component]
/// Provides [`OverlayContext`] to descendant overlays.
///
/// `theme_json`, when it parses, replaces `theme`; a malformed document is logged and ignored.
pub fn OverlayProvider(
    #[prop(optional)] theme: Option<ThemeTokens>,
    #[prop(optional, into)] theme_json: Option<String>,
    children: Children,
) -> impl IntoView {
    let mut tokens = theme.unwrap_or_default();
    if let Some(raw) = theme_json {
        match ThemeTokens::from_json_str(&raw) {
            Ok(parsed) => tokens = parsed,
            Err(err) => logging::warn!("kemeng-ui: {err}"),
        }
    }

    let web_host = WebDomHost::new();
    let stack = ModalStack::new(Rc::new(web_host.clone()));
    provide_context(OverlayContext {
        host: store_value(web_host),
        stack: store_value(stack),
        theme: create_rw_signal(tokens),
    });

    children().into_view()
}

/// Returns the current [`OverlayContext`].
///
/// # Panics
///
/// Panics if called outside [`OverlayProvider`].
pub fn use_overlay() -> OverlayContext {
    use_context::<OverlayContext>().expect("OverlayContext not provided")
}
