use dom_host::monotonic_now_ms;
use overlay_runtime::{
    menu::{apply_tab_stop, menu_focus_plan, menu_key_close, menu_origins, MenuOptions},
    menu_list::{
        adjust_style_for_scrollbar, menu_entries, MenuListNavigator, MenuListOptions, MenuVariant,
    },
    CloseReason, Origin, Timeout, TransitionEvent,
};
use web_sys::{KeyboardEvent, MouseEvent};

use super::*;
use crate::context::use_overlay;

#[component]
/// Keyboard-navigable list of [`MenuItem`]s: arrows, Home/End and typeahead move focus.
///
/// On mount (and whenever `open` turns true) the list focuses itself or its active item and
/// gives the active item the roving tab stop.
pub fn MenuList(
    #[prop(default = true.into(), into)] open: MaybeSignal<bool>,
    #[prop(optional)] auto_focus: bool,
    #[prop(optional)] auto_focus_item: bool,
    #[prop(optional)] variant: MenuVariant,
    #[prop(optional)] disable_list_wrap: bool,
    #[prop(optional)] disabled_items_focusable: bool,
    #[prop(optional)] on_key_down: Option<Callback<KeyboardEvent>>,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] node_ref: NodeRef<html::Ul>,
    children: Children,
) -> impl IntoView {
    let ctx = use_overlay();
    let navigator = store_value(None::<MenuListNavigator>);
    let focus_options = MenuOptions {
        auto_focus: auto_focus || auto_focus_item,
        disable_auto_focus_item: !auto_focus_item,
        variant,
    };

    create_effect(move |_| {
        let Some(list) = node_ref.get() else {
            return;
        };
        let open = open.get();
        let list = ctx.node_id(&list);
        if navigator.with_value(|navigator| navigator.as_ref().map(MenuListNavigator::list))
            != Some(list)
        {
            let options = MenuListOptions {
                disable_list_wrap,
                disabled_items_focusable,
            };
            navigator.set_value(Some(MenuListNavigator::new(list, options)));
        }

        let host = ctx.dom_host();
        let items = host.children(list);
        let plan = menu_focus_plan(focus_options, open, &menu_entries(host.as_ref(), list));
        apply_tab_stop(host.as_ref(), &items, plan.tab_stop);
        if !open {
            return;
        }
        if let Some(item) = plan.focus_item.and_then(|index| items.get(index)) {
            host.focus(*item);
        } else if plan.focus_list {
            host.focus(list);
        }
    });

    on_cleanup(move || {
        let list = navigator
            .try_with_value(|navigator| navigator.as_ref().map(MenuListNavigator::list))
            .flatten();
        if let Some(list) = list {
            ctx.release(list);
        }
    });

    view! {
        <ul
            node_ref=node_ref
            role="menu"
            tabindex=if auto_focus { "0" } else { "-1" }
            class=merge_layout_class("ui-menu-list", layout_class)
            data-ui-primitive="true"
            data-ui-kind="menu-list"
            data-ui-variant=variant.token()
            on:keydown=move |ev: KeyboardEvent| {
                let key = ev.key();
                let modified = ev.ctrl_key() || ev.meta_key() || ev.alt_key();
                let typeahead = key.chars().count() == 1;
                if !(modified && typeahead) {
                    let host = ctx.dom_host();
                    let prevent = navigator
                        .try_update_value(|navigator| {
                            navigator.as_mut().is_some_and(|navigator| {
                                navigator.handle_key_down(host.as_ref(), &key, monotonic_now_ms())
                            })
                        })
                        .unwrap_or_default();
                    if prevent {
                        ev.prevent_default();
                    }
                }
                if let Some(on_key_down) = on_key_down {
                    on_key_down.call(ev);
                }
            }
        >
            {children()}
        </ul>
    }
}

#[component]
/// One entry of a [`MenuList`].
pub fn MenuItem(
    #[prop(optional, into)] value: Option<String>,
    #[prop(optional, into)] selected: MaybeSignal<bool>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(default = "menuitem")] role: &'static str,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <li
            role=role
            tabindex="-1"
            class=merge_layout_class("ui-menu-item", layout_class)
            aria-disabled=move || disabled.get().then_some("true")
            aria-selected=move || selected.get().then_some("true")
            data-value=value
            data-ui-primitive="true"
            data-ui-kind="menu-item"
            data-ui-state=move || {
                if disabled.get() {
                    "disabled"
                } else if selected.get() {
                    "selected"
                } else {
                    "idle"
                }
            }
            on:click=move |ev| {
                if disabled.get_untracked() {
                    return;
                }
                if let Some(on_click) = on_click.as_ref() {
                    on_click.call(ev);
                }
            }
        >
            {children()}
        </li>
    }
}

#[component]
/// Divider between menu items; never takes focus.
pub fn MenuSeparator(#[prop(optional)] layout_class: Option<&'static str>) -> impl IntoView {
    view! {
        <li
            class=merge_layout_class("ui-menu-separator", layout_class)
            role="separator"
            data-ui-skip-highlight="true"
            data-ui-primitive="true"
            data-ui-kind="menu-separator"
        ></li>
    }
}

#[component]
/// Popover holding a [`MenuList`], placed below its anchor at the text-direction start edge.
///
/// Tab closes the menu with [`CloseReason::TabKeyDown`].
pub fn Menu(
    #[prop(into)] open: MaybeSignal<bool>,
    #[prop(optional, into)] anchor_el: MaybeSignal<Option<web_sys::Element>>,
    #[prop(optional)] on_close: Option<Callback<CloseReason>>,
    #[prop(default = true)] auto_focus: bool,
    #[prop(optional)] disable_auto_focus_item: bool,
    #[prop(optional)] variant: MenuVariant,
    #[prop(optional)] disable_list_wrap: bool,
    #[prop(optional)] disabled_items_focusable: bool,
    #[prop(optional)] anchor_origin: Option<Origin>,
    #[prop(optional)] transform_origin: Option<Origin>,
    #[prop(optional)] transition_duration: Option<Timeout>,
    #[prop(optional)] keep_mounted: bool,
    #[prop(optional)] disable_scroll_lock: bool,
    #[prop(optional)] disable_portal: bool,
    #[prop(optional, into)] paper_min_width: MaybeSignal<Option<String>>,
    #[prop(optional)] on_transition: Option<Callback<TransitionEvent>>,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_overlay();
    let direction = ctx.theme.with_untracked(|theme| theme.direction);
    let (default_anchor, default_transform) = menu_origins(direction);
    let list_ref = create_node_ref::<html::Ul>();
    let paper_ref = create_node_ref::<html::Div>();
    let children = store_value(children);

    let handle_transition = Callback::new(move |event: TransitionEvent| {
        if let TransitionEvent::Entering { .. } = event {
            if let (Some(list), Some(paper)) = (list_ref.get_untracked(), paper_ref.get_untracked())
            {
                let host = ctx.dom_host();
                adjust_style_for_scrollbar(
                    host.as_ref(),
                    ctx.node_id(&list),
                    ctx.node_id(&paper),
                    direction,
                );
            }
        }
        if let Some(on_transition) = on_transition {
            on_transition.call(event);
        }
    });

    let handle_list_key_down = Callback::new(move |ev: KeyboardEvent| {
        if let Some(reason) = menu_key_close(&ev.key()) {
            ev.prevent_default();
            if let Some(on_close) = on_close {
                on_close.call(reason);
            }
        }
    });

    view! {
        <Popover
            open=open
            anchor_el=anchor_el
            on_close=Callback::new(move |reason: CloseReason| {
                if let Some(on_close) = on_close {
                    on_close.call(reason);
                }
            })
            anchor_origin=anchor_origin.unwrap_or(default_anchor)
            transform_origin=transform_origin.unwrap_or(default_transform)
            transition_duration=transition_duration.unwrap_or(Timeout::Auto)
            keep_mounted=keep_mounted
            disable_scroll_lock=disable_scroll_lock
            disable_portal=disable_portal
            paper_min_width=paper_min_width
            paper_layout_class="ui-menu-paper"
            paper_ref=paper_ref
            on_transition=handle_transition
        >
            <MenuList
                open=open
                auto_focus=auto_focus
                auto_focus_item=auto_focus && !disable_auto_focus_item
                variant=variant
                disable_list_wrap=disable_list_wrap
                disabled_items_focusable=disabled_items_focusable
                on_key_down=handle_list_key_down
                layout_class=layout_class.unwrap_or("")
                node_ref=list_ref
            >
                {children.with_value(|children| children())}
            </MenuList>
        </Popover>
    }
}
