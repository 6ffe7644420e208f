use overlay_runtime::{FocusTrapOptions, TabOutcome};

use super::*;
use crate::context::use_overlay;

#[component]
/// Keeps keyboard focus inside `children` while `open`, outside of any modal.
///
/// Focus guards before and after the subtree wrap Tab navigation; focus is restored to the
/// previously focused element when the trap closes.
pub fn FocusTrap(
    #[prop(into)] open: MaybeSignal<bool>,
    #[prop(optional)] disable_auto_focus: bool,
    #[prop(optional)] disable_enforce_focus: bool,
    #[prop(optional)] disable_restore_focus: bool,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let ctx = use_overlay();
    let options = FocusTrapOptions {
        disable_auto_focus,
        disable_enforce_focus,
        disable_restore_focus,
    };
    let root_ref = create_node_ref::<html::Div>();
    let start_ref = create_node_ref::<html::Div>();
    let end_ref = create_node_ref::<html::Div>();
    let trap = store_value(None::<overlay_runtime::FocusTrap>);
    let nodes = store_value(Vec::<NodeId>::new());

    create_effect(move |_| {
        let (Some(root), Some(start), Some(end)) = (root_ref.get(), start_ref.get(), end_ref.get())
        else {
            return;
        };
        let enabled = open.get();
        if trap.with_value(Option::is_none) {
            let root = ctx.node_id(&root);
            let start = ctx.node_id(&start);
            let end = ctx.node_id(&end);
            let mut created = overlay_runtime::FocusTrap::new(ctx.dom_host(), root, options);
            created.set_sentinels(start, end);
            trap.set_value(Some(created));
            nodes.set_value(vec![root, start, end]);
        }
        trap.update_value(|trap| {
            if let Some(trap) = trap.as_mut() {
                if enabled {
                    trap.set_enabled(true);
                } else {
                    trap.deactivate();
                }
            }
        });
    });

    install_focus_listeners(
        ctx,
        move |target| {
            trap.try_with_value(|trap| {
                if let Some(trap) = trap {
                    trap.handle_focus_in(target);
                }
            });
        },
        move || {
            trap.try_with_value(|trap| {
                if let Some(trap) = trap {
                    trap.enforce();
                }
            });
        },
    );

    on_cleanup(move || {
        trap.try_update_value(|trap| {
            if let Some(mut trap) = trap.take() {
                trap.deactivate();
            }
        });
        for node in nodes.try_get_value().unwrap_or_default() {
            ctx.release(node);
        }
    });

    view! {
        <div tabindex="0" node_ref=start_ref data-ui-sentinel="start"></div>
        <div
            node_ref=root_ref
            tabindex="-1"
            class=merge_layout_class("ui-focus-trap", layout_class)
            data-ui-primitive="true"
            data-ui-kind="focus-trap"
            on:keydown=move |ev| {
                if ev.key() != "Tab" {
                    return;
                }
                let outcome = trap
                    .with_value(|trap| trap.as_ref().map(|trap| trap.handle_tab(ev.shift_key())));
                if outcome == Some(TabOutcome::Handled) {
                    ev.prevent_default();
                }
            }
        >
            {children()}
        </div>
        <div tabindex="0" node_ref=end_ref data-ui-sentinel="end"></div>
    }
}
