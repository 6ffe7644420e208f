use overlay_runtime::{
    dialog::{dialog_timeout, DialogLayout, DialogMaxWidth, DialogScroll, DIALOG_ELEVATION},
    BackdropClickGuard, CloseReason, Timeout,
};
use web_sys::MouseEvent;

use super::*;
use crate::context::use_overlay;

#[component]
/// Centered modal surface that fades in over a backdrop.
///
/// Clicking outside the paper closes with [`CloseReason::BackdropClick`] only when both the
/// press and the click land on the surrounding container.
pub fn Dialog(
    #[prop(into)] open: MaybeSignal<bool>,
    #[prop(optional)] on_close: Option<Callback<CloseReason>>,
    #[prop(optional)] on_backdrop_click: Option<Callback<MouseEvent>>,
    #[prop(optional)] scroll: DialogScroll,
    #[prop(optional)] max_width: DialogMaxWidth,
    #[prop(optional)] full_width: bool,
    #[prop(optional)] full_screen: bool,
    #[prop(optional)] transition_duration: Option<Timeout>,
    #[prop(optional)] disable_escape_key_down: bool,
    #[prop(optional)] disable_portal: bool,
    #[prop(optional)] disable_scroll_lock: bool,
    #[prop(optional)] keep_mounted: bool,
    #[prop(optional)] hide_backdrop: bool,
    #[prop(optional, into)] aria_labelledby: Option<String>,
    #[prop(optional)] on_transition_exited: Option<Callback<()>>,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_overlay();
    let layout = DialogLayout {
        scroll,
        max_width,
        full_width,
        full_screen,
    };
    let timeout =
        transition_duration.unwrap_or_else(|| ctx.theme.with_untracked(dialog_timeout));
    let viewport_width = create_rw_signal(ctx.dom_host().viewport_size().width);
    let resize_listener = window_event_listener(ev::resize, move |_| {
        viewport_width.set(ctx.dom_host().viewport_size().width);
    });
    on_cleanup(move || resize_listener.remove());

    let paper_style = Signal::derive(move || {
        let mut style = format!("max-width:{}", layout.paper_max_width(viewport_width.get()));
        if let Some(width) = layout.paper_width() {
            style.push_str(&format!(";width:{width}"));
        }
        if layout.full_screen {
            style.push_str(";height:100%;max-height:none;margin:0;border-radius:0");
        }
        Some(style)
    });

    let guard = store_value(BackdropClickGuard::default());
    let on_container_mouse_down = move |ev: MouseEvent| {
        if let Some(target) = event_element(&ev) {
            let target = ctx.node_id(&target);
            guard.update_value(|guard| guard.pointer_down(target));
        }
    };
    let on_container_click = move |ev: MouseEvent| {
        let current = ev
            .current_target()
            .and_then(|current| current.dyn_into::<web_sys::Element>().ok());
        let (Some(target), Some(current)) = (event_element(&ev), current) else {
            return;
        };
        let (target, current) = (ctx.node_id(&target), ctx.node_id(&current));
        let accepted = guard
            .try_update_value(|guard| guard.click(target, current))
            .unwrap_or_default();
        if !accepted {
            return;
        }
        if let Some(on_backdrop_click) = on_backdrop_click {
            on_backdrop_click.call(ev);
        }
        if let Some(on_close) = on_close {
            on_close.call(CloseReason::BackdropClick);
        }
    };

    let children = store_value(children);
    let aria_labelledby = store_value(aria_labelledby);

    view! {
        <Modal
            open=open
            on_close=Callback::new(move |reason: CloseReason| {
                if let Some(on_close) = on_close {
                    on_close.call(reason);
                }
            })
            has_transition=true
            close_after_transition=true
            disable_escape_key_down=disable_escape_key_down
            disable_portal=disable_portal
            disable_scroll_lock=disable_scroll_lock
            keep_mounted=keep_mounted
            hide_backdrop=hide_backdrop
            backdrop_timeout=Some(timeout)
            on_transition_exited=Callback::new(move |()| {
                if let Some(on_transition_exited) = on_transition_exited {
                    on_transition_exited.call(());
                }
            })
            layout_class="ui-dialog"
        >
            <Fade in_=open timeout=Some(timeout) layout_class="ui-dialog-fade">
                <div
                    class=merge_layout_class("ui-dialog-container", layout_class)
                    role="presentation"
                    data-ui-primitive="true"
                    data-ui-kind="dialog"
                    data-ui-state=layout.state_tokens()
                    data-ui-scroll=scroll.token()
                    on:mousedown=on_container_mouse_down
                    on:click=on_container_click
                >
                    <Paper
                        role="dialog"
                        elevation=DIALOG_ELEVATION
                        square=full_screen
                        layout_class="ui-dialog-paper"
                        aria_labelledby=aria_labelledby.get_value()
                        style=paper_style
                    >
                        {children.with_value(|children| children())}
                    </Paper>
                </div>
            </Fade>
        </Modal>
    }
}
