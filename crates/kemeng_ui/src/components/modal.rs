use overlay_runtime::{
    BackdropClickGuard, CloseReason, FocusTrapOptions, KeyDownOutcome, ModalController,
    ModalLifecycle, ModalOptions, TabOutcome, Timeout,
};
use web_sys::{KeyboardEvent, MouseEvent};

use super::*;
use crate::context::use_overlay;

#[derive(Debug, Clone, Copy)]
/// Lifecycle callbacks a modal hands to the transition wrapping its content.
///
/// [`Fade`], [`Grow`] and [`Slide`] report to the nearest provider unless `isolated`.
pub struct TransitionHooks {
    /// The content transition started entering.
    pub on_enter: Callback<()>,
    /// The content transition finished exiting.
    pub on_exited: Callback<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ModalSnapshot {
    render: bool,
    visibility: Option<&'static str>,
    lifecycle: ModalLifecycle,
}

impl ModalSnapshot {
    fn of(controller: &ModalController) -> Self {
        Self {
            render: controller.should_render(),
            visibility: controller.root_visibility(),
            lifecycle: controller.lifecycle(),
        }
    }
}

#[component]
/// Full-viewport layer that stacks above the page, locks scrolling, traps focus, and closes on
/// Escape or backdrop click.
///
/// Set `has_transition` when `children` contain a [`Fade`], [`Grow`] or [`Slide`]; the modal
/// then stays mounted until that transition reports exited.
pub fn Modal(
    #[prop(into)] open: MaybeSignal<bool>,
    #[prop(optional)] on_close: Option<Callback<CloseReason>>,
    #[prop(optional)] on_backdrop_click: Option<Callback<MouseEvent>>,
    #[prop(optional)] keep_mounted: bool,
    #[prop(optional)] close_after_transition: bool,
    #[prop(optional)] disable_escape_key_down: bool,
    #[prop(optional)] disable_scroll_lock: bool,
    #[prop(optional)] hide_backdrop: bool,
    #[prop(optional)] disable_portal: bool,
    #[prop(optional)] disable_auto_focus: bool,
    #[prop(optional)] disable_enforce_focus: bool,
    #[prop(optional)] disable_restore_focus: bool,
    #[prop(default = true)] aria_hidden: bool,
    #[prop(optional)] has_transition: bool,
    #[prop(optional)] invisible_backdrop: bool,
    #[prop(optional_no_strip)] backdrop_timeout: Option<Timeout>,
    #[prop(optional_no_strip)] container: Option<web_sys::Element>,
    #[prop(optional)] z_index: Option<i32>,
    #[prop(optional)] on_transition_enter: Option<Callback<()>>,
    #[prop(optional)] on_transition_exited: Option<Callback<()>>,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_overlay();
    let options = ModalOptions {
        keep_mounted,
        close_after_transition,
        disable_escape_key_down,
        disable_scroll_lock,
        hide_backdrop,
        disable_portal,
        focus: FocusTrapOptions {
            disable_auto_focus,
            disable_enforce_focus,
            disable_restore_focus,
        },
        has_transition,
        aria_hidden,
    };
    let container_node = container.as_ref().map(|element| ctx.node_id(element));
    let controller = store_value(ModalController::new(ctx.stack(), options, container_node));
    let snapshot = create_rw_signal(controller.with_value(ModalSnapshot::of));
    let refresh = move || {
        if let Some(next) = controller.try_with_value(ModalSnapshot::of) {
            if snapshot.get_untracked() != next {
                snapshot.set(next);
            }
        }
    };
    let z_index =
        z_index.unwrap_or_else(|| ctx.theme.with_untracked(|theme| theme.z_index.modal));

    provide_context(TransitionHooks {
        on_enter: Callback::new(move |()| {
            controller.try_update_value(ModalController::transition_enter);
            refresh();
            if let Some(on_transition_enter) = on_transition_enter {
                on_transition_enter.call(());
            }
        }),
        on_exited: Callback::new(move |()| {
            controller.try_update_value(ModalController::transition_exited);
            refresh();
            if let Some(on_transition_exited) = on_transition_exited {
                on_transition_exited.call(());
            }
        }),
    });

    create_effect(move |_| {
        let open = open.get();
        controller.update_value(|controller| {
            controller.set_open(open);
            controller.sync_focus_trap();
        });
        refresh();
    });

    install_focus_listeners(
        ctx,
        move |target| {
            controller.try_with_value(|controller| controller.handle_focus_in(target));
        },
        move || {
            controller.try_update_value(|controller| {
                controller.sync_focus_trap();
                controller.enforce_focus();
            });
        },
    );

    on_cleanup(move || {
        controller.try_update_value(ModalController::detach_root);
    });

    let guard = store_value(BackdropClickGuard::default());
    let backdrop_mousedown = Callback::new(move |ev: MouseEvent| {
        if let Some(target) = event_element(&ev) {
            let target = ctx.node_id(&target);
            guard.update_value(|guard| guard.pointer_down(target));
        }
    });
    let backdrop_click = Callback::new(move |ev: MouseEvent| {
        let (Some(target), Some(current)) = (
            event_element(&ev),
            ev.current_target()
                .and_then(|current| current.dyn_into::<web_sys::Element>().ok()),
        ) else {
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
    });

    let on_key_down = move |ev: KeyboardEvent| {
        if ev.key() == "Tab" {
            let outcome =
                controller.with_value(|controller| controller.handle_tab(ev.shift_key()));
            if outcome == TabOutcome::Handled {
                ev.prevent_default();
            }
            return;
        }
        let outcome = controller
            .with_value(|controller| controller.handle_key_down(&ev.key(), ev.key_code()));
        if outcome.stops_propagation() {
            ev.stop_propagation();
        }
        if let (KeyDownOutcome::Close(reason), Some(on_close)) = (outcome, on_close) {
            on_close.call(reason);
        }
    };

    let children = store_value(children);
    let content = move || {
        let root_ref = create_node_ref::<html::Div>();
        let start_ref = create_node_ref::<html::Div>();
        let end_ref = create_node_ref::<html::Div>();
        let mounted = store_value(Vec::<NodeId>::new());

        create_effect(move |_| {
            let (Some(root), Some(start), Some(end)) =
                (root_ref.get(), start_ref.get(), end_ref.get())
            else {
                return;
            };
            let nodes = vec![ctx.node_id(&root), ctx.node_id(&start), ctx.node_id(&end)];
            controller.update_value(|controller| {
                controller.attach_root(nodes[0]);
                controller.set_sentinels(nodes[1], nodes[2]);
                controller.sync_focus_trap();
            });
            mounted.set_value(nodes);
            refresh();
        });

        on_cleanup(move || {
            controller.try_update_value(ModalController::detach_root);
            for node in mounted.try_get_value().unwrap_or_default() {
                ctx.release(node);
            }
        });

        view! {
            <div
                node_ref=root_ref
                class=merge_layout_class("ui-modal", layout_class)
                role="presentation"
                style=format!("position:fixed;inset:0;z-index:{z_index}")
                style:visibility=move || snapshot.with(|snapshot| snapshot.visibility)
                data-ui-primitive="true"
                data-ui-kind="modal"
                data-ui-state=move || snapshot.with(|snapshot| snapshot.lifecycle.token())
                on:keydown=on_key_down
            >
                {(!hide_backdrop)
                    .then(|| {
                        view! {
                            <Backdrop
                                open=open
                                invisible=invisible_backdrop
                                timeout=backdrop_timeout
                                on_mousedown=backdrop_mousedown
                                on_click=backdrop_click
                            />
                        }
                    })}
                <div tabindex="0" node_ref=start_ref data-ui-sentinel="start"></div>
                {children.with_value(|children| children())}
                <div tabindex="0" node_ref=end_ref data-ui-sentinel="end"></div>
            </div>
        }
    };

    view! {
        <Portal disable_portal=disable_portal container=container>
            <Show when=move || snapshot.with(|snapshot| snapshot.render)>{content}</Show>
        </Portal>
    }
}
