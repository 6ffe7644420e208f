use overlay_runtime::Timeout;

use super::*;

#[component]
/// Elevated surface shared by dialogs, drawers, menus and popovers.
pub fn Paper(
    #[prop(default = 1)] elevation: u8,
    #[prop(optional)] square: bool,
    #[prop(optional)] role: Option<&'static str>,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional_no_strip)] aria_labelledby: Option<String>,
    #[prop(optional, into)] style: MaybeSignal<Option<String>>,
    #[prop(optional, into)] opacity: MaybeSignal<Option<&'static str>>,
    #[prop(optional, into)] min_width: MaybeSignal<Option<String>>,
    #[prop(optional)] node_ref: NodeRef<html::Div>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            node_ref=node_ref
            class=merge_layout_class("ui-paper", layout_class)
            role=role
            aria-labelledby=aria_labelledby
            style=move || style.get()
            style:opacity=move || opacity.get()
            style:min-width=move || min_width.get()
            data-ui-primitive="true"
            data-ui-kind="paper"
            data-ui-elevation=elevation.to_string()
            data-ui-shape=if square { "square" } else { "rounded" }
        >
            {children()}
        </div>
    }
}

#[component]
/// Dimmed layer behind a modal surface; fades with the modal but does not drive its lifecycle.
pub fn Backdrop(
    #[prop(into)] open: MaybeSignal<bool>,
    #[prop(optional)] invisible: bool,
    #[prop(optional_no_strip)] timeout: Option<Timeout>,
    #[prop(optional)] on_mousedown: Option<Callback<web_sys::MouseEvent>>,
    #[prop(optional)] on_click: Option<Callback<web_sys::MouseEvent>>,
) -> impl IntoView {
    view! {
        <Fade in_=open isolated=true timeout=timeout layout_class="ui-backdrop-fade">
            <div
                class="ui-backdrop"
                aria-hidden="true"
                data-ui-primitive="true"
                data-ui-kind="backdrop"
                data-ui-invisible=bool_token(invisible)
                on:mousedown=move |ev| {
                    if let Some(on_mousedown) = on_mousedown.as_ref() {
                        on_mousedown.call(ev);
                    }
                }
                on:click=move |ev| {
                    if let Some(on_click) = on_click.as_ref() {
                        on_click.call(ev);
                    }
                }
            ></div>
        </Fade>
    }
}
