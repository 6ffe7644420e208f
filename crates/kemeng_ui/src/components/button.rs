use std::rc::Rc;

use futures::future::LocalBoxFuture;
use overlay_runtime::press::{
    button_disabled, settle_loading, ButtonLoading, ButtonShape, ButtonSize, ButtonVariant,
    PointerDedup, PressStart,
};
use web_sys::{MouseEvent, TouchEvent};

use super::*;

/// Async click handler; the button shows its loading state while the future is pending.
pub type AsyncClickHandler = Rc<dyn Fn(MouseEvent) -> LocalBoxFuture<'static, Result<(), String>>>;

#[component]
/// Button primitive with variant/size/shape tokens and optional async loading.
///
/// With `loading = ButtonLoading::Auto` the button is disabled while `on_press` runs. A failed
/// `on_press` goes to `on_error` once loading has been reset, or is logged when no handler is
/// set.
pub fn Button(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    #[prop(optional)] shape: ButtonShape,
    #[prop(optional)] block: bool,
    #[prop(optional)] loading: ButtonLoading,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    #[prop(optional)] on_press: Option<AsyncClickHandler>,
    #[prop(optional)] on_error: Option<Callback<String>>,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] node_ref: NodeRef<html::Button>,
    children: Children,
) -> impl IntoView {
    let pending = create_rw_signal(false);
    let pressed = create_rw_signal(false);
    let dedup = store_value(PointerDedup::default());
    let is_loading = move || loading.resolve(pending.get());
    let is_disabled = move || button_disabled(disabled.get(), is_loading());
    let press = move |start: PressStart| {
        if dedup.try_update_value(|dedup| dedup.accept(start)) == Some(true) {
            pressed.set(true);
        }
    };

    let on_click_event = move |ev: MouseEvent| {
        if is_disabled() {
            return;
        }
        if let Some(on_click) = on_click {
            on_click.call(ev.clone());
        }
        let Some(handler) = on_press.as_ref() else {
            return;
        };
        let future = handler(ev);
        spawn_local(async move {
            let result = settle_loading(
                |loading| {
                    pending.try_set(loading);
                },
                future,
            )
            .await;
            if let Err(err) = result {
                match on_error {
                    Some(on_error) => on_error.call(err),
                    None => logging::error!("kemeng-ui: click handler failed: {err}"),
                }
            }
        });
    };

    view! {
        <button
            type="button"
            node_ref=node_ref
            class=merge_layout_class("ui-button", layout_class)
            aria-label=aria_label
            aria-busy=move || is_loading().then_some("true")
            disabled=is_disabled
            data-ui-primitive="true"
            data-ui-kind="button"
            data-ui-variant=variant.token()
            data-ui-size=size.token()
            data-ui-shape=shape.token()
            data-ui-block=bool_token(block)
            data-ui-state=move || {
                if is_loading() {
                    "loading"
                } else if pressed.get() {
                    "pressed"
                } else {
                    "idle"
                }
            }
            data-ui-disabled=move || bool_token(is_disabled())
            on:touchstart=move |_: TouchEvent| press(PressStart::Touch)
            on:mousedown=move |_: MouseEvent| press(PressStart::Mouse)
            on:touchend=move |_: TouchEvent| pressed.set(false)
            on:mouseup=move |_: MouseEvent| pressed.set(false)
            on:mouseleave=move |_: MouseEvent| pressed.set(false)
            on:click=on_click_event
        >
            {move || {
                is_loading()
                    .then(|| view! { <span class="ui-button-spinner" aria-hidden="true"></span> })
            }}
            {children()}
        </button>
    }
}
