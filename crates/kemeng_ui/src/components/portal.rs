use leptos::Portal as MountPortal;

use super::*;

#[component]
/// Renders `children` into `container` (the document body by default).
///
/// With `disable_portal` the children render in place, which keeps server-rendered markup and
/// tests free of detached subtrees.
pub fn Portal(
    #[prop(optional)] disable_portal: bool,
    #[prop(optional_no_strip)] container: Option<web_sys::Element>,
    children: ChildrenFn,
) -> impl IntoView {
    let mount = container.or_else(|| document().body().map(Into::into));
    match mount {
        Some(mount) if !disable_portal => view! {
            <MountPortal mount=mount>{children()}</MountPortal>
        }
        .into_view(),
        _ => children().into_view(),
    }
}
