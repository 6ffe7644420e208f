use std::{rc::Rc, time::Duration};

use dom_host::{Point, Rect};
use leptos::leptos_dom::helpers::WindowListenerHandle;
use overlay_runtime::{
    popover::{DEFAULT_MARGIN_THRESHOLD, POPOVER_ELEVATION},
    report_all, AnchorDescriptor, AnchorReference, CloseReason, Origin, PopoverOptions,
    PopoverPlacement, RepositionListeners, Timeout, TransitionEvent,
};

use super::*;
use crate::context::{use_overlay, OverlayContext};

/// Resize/scroll debounce before a popover recomputes its placement.
const REPOSITION_DEBOUNCE: Duration = Duration::from_millis(166);

const PAPER_STYLE: &str = "position:absolute;min-width:16px;min-height:16px;\
    max-width:calc(100% - 32px);max-height:calc(100% - 32px);\
    overflow-x:hidden;overflow-y:auto;outline:0";

#[derive(Debug, Clone, Copy)]
/// Imperative handle passed to a popover's `action` callback.
pub struct PopoverActions {
    /// Recomputes and applies the placement now.
    pub update_position: Callback<()>,
}

fn anchor_descriptor(
    ctx: OverlayContext,
    anchor_el: Option<web_sys::Element>,
    virtual_anchor: Option<Rect>,
) -> Option<AnchorDescriptor> {
    match (anchor_el, virtual_anchor) {
        (Some(element), _) => Some(AnchorDescriptor::Element(ctx.node_id(&element))),
        (None, Some(rect)) => Some(AnchorDescriptor::Virtual(Rc::new(rect))),
        (None, None) => None,
    }
}

#[component]
/// Floating surface anchored to an element, a virtual rectangle, or a viewport point.
///
/// The paper stays transparent until its first placement is written, then follows window
/// resizes (and page scrolls when the scroll lock is disabled) while open.
pub fn Popover(
    #[prop(into)] open: MaybeSignal<bool>,
    #[prop(optional)] on_close: Option<Callback<CloseReason>>,
    #[prop(optional, into)] anchor_el: MaybeSignal<Option<web_sys::Element>>,
    #[prop(optional, into)] virtual_anchor: MaybeSignal<Option<Rect>>,
    #[prop(optional)] anchor_reference: AnchorReference,
    #[prop(optional)] anchor_position: Option<Point>,
    #[prop(optional)] anchor_origin: Origin,
    #[prop(optional)] transform_origin: Origin,
    #[prop(default = Some(DEFAULT_MARGIN_THRESHOLD))] margin_threshold: Option<f64>,
    #[prop(default = POPOVER_ELEVATION)] elevation: u8,
    #[prop(optional)] transition_duration: Option<Timeout>,
    #[prop(optional)] keep_mounted: bool,
    #[prop(optional)] disable_scroll_lock: bool,
    #[prop(optional)] disable_portal: bool,
    #[prop(optional)] disable_auto_focus: bool,
    #[prop(optional)] disable_enforce_focus: bool,
    #[prop(optional)] disable_restore_focus: bool,
    #[prop(optional)] container: Option<web_sys::Element>,
    #[prop(optional, into)] paper_min_width: MaybeSignal<Option<String>>,
    #[prop(optional)] paper_layout_class: Option<&'static str>,
    #[prop(optional)] paper_ref: NodeRef<html::Div>,
    #[prop(optional)] on_transition: Option<Callback<TransitionEvent>>,
    #[prop(optional)] action: Option<Callback<PopoverActions>>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_overlay();
    let anchor_el = Signal::derive(move || anchor_el.get());
    let paper_min_width = Signal::derive(move || paper_min_width.get());
    let placement = store_value(PopoverPlacement::new(PopoverOptions {
        anchor: None,
        anchor_reference,
        anchor_position,
        anchor_origin,
        transform_origin,
        margin_threshold,
    }));
    let positioned = create_rw_signal(false);

    let update_position = move || {
        let anchor = anchor_descriptor(
            ctx,
            anchor_el.get_untracked(),
            virtual_anchor.get_untracked(),
        );
        let paper = paper_ref.get_untracked().map(|paper| ctx.node_id(&paper));
        let host = ctx.dom_host();
        let warnings = placement
            .try_update_value(|placement| {
                let mut options = placement.options().clone();
                options.anchor = anchor;
                placement.set_options(options);
                placement.set_paper(paper);
                placement.update_position(host.as_ref())
            })
            .unwrap_or_default();
        report_all(&warnings);
        if let Some(is_positioned) = placement.try_with_value(PopoverPlacement::is_positioned) {
            positioned.set(is_positioned);
        }
    };

    if let Some(action) = action {
        action.call(PopoverActions {
            update_position: Callback::new(move |()| update_position()),
        });
    }

    create_effect(move |_| {
        anchor_el.track();
        virtual_anchor.track();
        if open.get() {
            update_position();
        }
    });

    let debounced = Debounced::new(REPOSITION_DEBOUNCE);
    let listeners = store_value(Vec::<WindowListenerHandle>::new());
    let remove_listeners = move || {
        if let Some(handles) = listeners.try_update_value(std::mem::take) {
            for handle in handles {
                handle.remove();
            }
        }
        debounced.clear();
    };
    create_effect(move |_| {
        let wanted = RepositionListeners::for_state(open.get(), disable_scroll_lock);
        if wanted.is_empty() {
            remove_listeners();
            return;
        }
        if listeners.with_value(|handles| !handles.is_empty()) {
            return;
        }
        let reposition = move || debounced.schedule(update_position);
        let mut handles = Vec::new();
        if wanted.resize {
            handles.push(window_event_listener(ev::resize, move |_| reposition()));
        }
        if wanted.scroll {
            handles.push(window_event_listener(ev::scroll, move |_| reposition()));
        }
        listeners.set_value(handles);
    });
    on_cleanup(remove_listeners);

    let handle_transition = Callback::new(move |event: TransitionEvent| {
        match event {
            TransitionEvent::Entering { .. } => update_position(),
            TransitionEvent::Exited => {
                placement.try_update_value(PopoverPlacement::handle_exited);
                positioned.set(false);
            }
            _ => {}
        }
        if let Some(on_transition) = on_transition {
            on_transition.call(event);
        }
    });

    let children = store_value(children);
    let paper_opacity = Signal::derive(move || (!positioned.get()).then_some("0"));

    view! {
        <Modal
            open=open
            on_close=Callback::new(move |reason: CloseReason| {
                if let Some(on_close) = on_close {
                    on_close.call(reason);
                }
            })
            keep_mounted=keep_mounted
            disable_scroll_lock=disable_scroll_lock
            disable_portal=disable_portal
            disable_auto_focus=disable_auto_focus
            disable_enforce_focus=disable_enforce_focus
            disable_restore_focus=disable_restore_focus
            container=container
            has_transition=true
            invisible_backdrop=true
            layout_class="ui-popover"
        >
            <Grow
                in_=open
                timeout=transition_duration
                on_event=Some(handle_transition)
                node_ref=paper_ref
                layout_class="ui-popover-paper"
                style=PAPER_STYLE
            >
                <Paper
                    elevation=elevation
                    layout_class=paper_layout_class.unwrap_or("")
                    opacity=paper_opacity
                    min_width=paper_min_width
                >
                    {children.with_value(|children| children())}
                </Paper>
            </Grow>
        </Modal>
    }
}
