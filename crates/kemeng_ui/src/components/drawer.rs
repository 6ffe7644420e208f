use overlay_runtime::{
    drawer::{DrawerAnchor, DrawerVariant, DRAWER_ELEVATION},
    CloseReason, Timeout,
};

use super::*;
use crate::context::use_overlay;

fn paper_style(anchor: DrawerAnchor, variant: DrawerVariant) -> String {
    let placement = if anchor.is_horizontal() {
        format!("top:0;height:100%;{}:0", anchor.token())
    } else {
        format!("left:0;right:0;height:auto;max-height:100%;{}:0", anchor.token())
    };
    let border = match variant {
        DrawerVariant::Temporary => String::new(),
        _ => format!(";{}:1px solid", anchor.docked_border()),
    };
    format!(
        "position:fixed;overflow-y:auto;display:flex;flex-direction:column;{placement}{border}"
    )
}

#[component]
/// Panel attached to a viewport edge.
///
/// `temporary` drawers are modal and slide in over a backdrop; `persistent` ones slide without
/// a modal; `permanent` ones are always shown. RTL themes mirror the left and right edges.
pub fn Drawer(
    #[prop(optional, into)] open: MaybeSignal<bool>,
    #[prop(optional)] on_close: Option<Callback<CloseReason>>,
    #[prop(optional)] anchor: DrawerAnchor,
    #[prop(optional)] variant: DrawerVariant,
    #[prop(default = DRAWER_ELEVATION)] elevation: u8,
    #[prop(optional)] transition_duration: Option<Timeout>,
    #[prop(optional)] hide_backdrop: bool,
    #[prop(optional)] keep_mounted: bool,
    #[prop(optional)] disable_portal: bool,
    #[prop(optional)] disable_scroll_lock: bool,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_overlay();
    let (direction, z_index) =
        ctx.theme.with_untracked(|theme| (theme.direction, theme.z_index.drawer));
    let anchor = anchor.resolve(direction);
    let class = merge_layout_class("ui-drawer", layout_class);
    let style = store_value(paper_style(anchor, variant));
    let elevation = variant.elevation(elevation);
    let children = store_value(children);
    let paper = move || {
        view! {
            <Paper
                elevation=elevation
                square=true
                layout_class="ui-drawer-paper"
                style=Some(style.get_value())
            >
                {children.with_value(|children| children())}
            </Paper>
        }
    };

    match variant {
        DrawerVariant::Permanent => view! {
            <div
                class=class
                data-ui-primitive="true"
                data-ui-kind="drawer"
                data-ui-variant=variant.token()
                data-ui-anchor=anchor.token()
            >
                {paper()}
            </div>
        }
        .into_view(),
        DrawerVariant::Persistent => view! {
            <div
                class=class
                data-ui-primitive="true"
                data-ui-kind="drawer"
                data-ui-variant=variant.token()
                data-ui-anchor=anchor.token()
            >
                <Slide
                    in_=open
                    direction=anchor.slide_direction()
                    timeout=transition_duration
                    appear=false
                    isolated=true
                >
                    {paper()}
                </Slide>
            </div>
        }
        .into_view(),
        DrawerVariant::Temporary => view! {
            <Modal
                open=open
                on_close=Callback::new(move |reason: CloseReason| {
                    if let Some(on_close) = on_close {
                        on_close.call(reason);
                    }
                })
                has_transition=true
                close_after_transition=true
                hide_backdrop=hide_backdrop
                keep_mounted=keep_mounted
                disable_portal=disable_portal
                disable_scroll_lock=disable_scroll_lock
                z_index=z_index
                layout_class="ui-drawer-modal"
            >
                <div
                    class=class.clone()
                    data-ui-primitive="true"
                    data-ui-kind="drawer"
                    data-ui-variant=variant.token()
                    data-ui-anchor=anchor.token()
                >
                    <Slide in_=open direction=anchor.slide_direction() timeout=transition_duration>
                        {paper()}
                    </Slide>
                </div>
            </Modal>
        }
        .into_view(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn temporary_paper_spans_the_anchor_edge() {
        assert_eq!(
            paper_style(DrawerAnchor::Right, DrawerVariant::Temporary),
            "position:fixed;overflow-y:auto;display:flex;flex-direction:column;\
             top:0;height:100%;right:0"
        );
    }

    #[test]
    fn docked_paper_gets_the_inner_border() {
        let style = paper_style(DrawerAnchor::Bottom, DrawerVariant::Persistent);
        assert!(style.contains("left:0;right:0;height:auto;max-height:100%;bottom:0"));
        assert!(style.ends_with(";border-top:1px solid"));
    }
}
