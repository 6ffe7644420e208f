use overlay_runtime::{
    modal::CloseReason,
    press::{PointerDedup, PressStart},
    select::{
        select_menu_origins, SelectOption, SelectOptions, SelectState, SelectValue,
        EMPTY_DISPLAY,
    },
};
use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

use super::*;

#[component]
/// Combobox that opens a [`Menu`] of `options` below its display.
///
/// With `multiple` the menu stays open and choosing toggles membership; `on_change` only fires
/// when the value actually changes.
pub fn Select(
    #[prop(into)] options: MaybeSignal<Vec<SelectOption>>,
    #[prop(optional)] value: Option<SelectValue>,
    #[prop(optional)] on_change: Option<Callback<SelectValue>>,
    #[prop(optional)] multiple: bool,
    #[prop(optional)] auto_width: bool,
    #[prop(optional)] display_empty: bool,
    #[prop(optional)] read_only: bool,
    #[prop(optional)] disabled: bool,
    #[prop(optional, into)] name: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] layout_class: Option<&'static str>,
) -> impl IntoView {
    let config = SelectOptions {
        multiple,
        auto_width,
        display_empty,
        read_only,
        disabled,
    };
    let initial = value.unwrap_or_else(|| {
        if multiple {
            SelectValue::Multiple(Vec::new())
        } else {
            SelectValue::Single(None)
        }
    });
    let state = create_rw_signal(SelectState::new(config, initial));
    let options = Signal::derive(move || options.get());
    let anchor_ref = create_node_ref::<html::Div>();
    let display_ref = create_node_ref::<html::Div>();
    let dedup = store_value(PointerDedup::default());

    let anchor_width = move || {
        anchor_ref
            .get_untracked()
            .map(|anchor| f64::from(anchor.client_width()))
            .unwrap_or_default()
    };
    let anchor_el = Signal::derive(move || {
        anchor_ref.get().map(|anchor| {
            let anchor: &web_sys::Element = &anchor;
            anchor.clone()
        })
    });
    let focus_display = move || {
        if let Some(display) = display_ref.get_untracked() {
            if let Err(err) = display.focus() {
                logging::warn!("kemeng-ui: select display could not take focus: {err:?}");
            }
        }
    };
    let open_from_pointer = move |button: i16| {
        let width = anchor_width();
        state
            .try_update(|state| state.handle_mouse_down(button, width))
            .unwrap_or_default()
    };

    let on_key_down = move |ev: KeyboardEvent| {
        let width = anchor_width();
        let opened = state
            .try_update(|state| state.handle_key_down(&ev.key(), width))
            .unwrap_or_default();
        if opened {
            ev.prevent_default();
        }
    };
    let on_mouse_down = move |ev: MouseEvent| {
        let accepted = dedup
            .try_update_value(|dedup| dedup.accept(PressStart::Mouse))
            .unwrap_or_default();
        if !accepted {
            return;
        }
        if open_from_pointer(ev.button()) {
            ev.prevent_default();
            focus_display();
        }
    };
    let on_touch_start = move |_: TouchEvent| {
        let accepted = dedup
            .try_update_value(|dedup| dedup.accept(PressStart::Touch))
            .unwrap_or_default();
        if accepted {
            open_from_pointer(0);
        }
    };
    let close = Callback::new(move |_: CloseReason| {
        let width = anchor_width();
        state.update(|state| state.update(false, width));
        focus_display();
    });

    let display = move || {
        state.with(|state| {
            options.with(|options| {
                state
                    .display_text(options)
                    .unwrap_or_else(|| EMPTY_DISPLAY.to_string())
            })
        })
    };
    let items = move || {
        options
            .get()
            .into_iter()
            .map(|option| {
                let selected = {
                    let value = option.value.clone();
                    Signal::derive(move || state.with(|state| state.value().contains(&value)))
                };
                let label = option.label.clone();
                let value = option.value.clone();
                let disabled = option.disabled;
                let choose = Callback::new(move |_: MouseEvent| {
                    let width = anchor_width();
                    let change = state.try_update(|state| state.choose(&option, width));
                    if let (Some(Some(value)), Some(on_change)) =
                        (change.map(|change| change.value), on_change)
                    {
                        on_change.call(value);
                    }
                });
                view! {
                    <MenuItem
                        value=value
                        role="option"
                        selected=selected
                        disabled=disabled
                        on_click=choose
                    >
                        {label}
                    </MenuItem>
                }
            })
            .collect_view()
    };

    view! {
        <div
            node_ref=anchor_ref
            class=merge_layout_class("ui-select", layout_class)
            data-ui-primitive="true"
            data-ui-kind="select"
            data-ui-state=move || {
                if disabled {
                    "disabled"
                } else if state.with(SelectState::is_open) {
                    "open"
                } else {
                    "idle"
                }
            }
        >
            <div
                node_ref=display_ref
                role="combobox"
                class="ui-select-display"
                tabindex=if disabled { "-1" } else { "0" }
                aria-label=aria_label
                aria-haspopup="listbox"
                aria-disabled=disabled.then_some("true")
                aria-expanded=move || state.with(SelectState::aria_expanded)
                on:keydown=on_key_down
                on:mousedown=on_mouse_down
                on:touchstart=on_touch_start
            >
                {display}
            </div>
            <input
                class="ui-select-native"
                aria-hidden="true"
                tabindex="-1"
                name=name
                prop:value=move || state.with(|state| state.value().native_value())
            />
            <Menu
                open=Signal::derive(move || state.with(SelectState::is_open))
                anchor_el=anchor_el
                on_close=close
                anchor_origin=select_menu_origins().0
                transform_origin=select_menu_origins().1
                paper_min_width=Signal::derive(move || {
                    state.with(|state| state.menu_min_width().map(px))
                })
            >
                {items}
            </Menu>
        </div>
    }
}
