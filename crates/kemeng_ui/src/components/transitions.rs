use std::time::Duration;

use overlay_runtime::{
    animations::{self, AnimatedChild},
    transition::{EasingSpec, TimingOverrides},
    DriverCommand, SlideDirection, Timeout, TransitionAction, TransitionConfig, TransitionDriver,
    TransitionEvent,
};

use super::*;
use crate::context::use_overlay;

/// Resize debounce for viewport-dependent slide offsets.
const SLIDE_RESIZE_DEBOUNCE: Duration = Duration::from_millis(166);

#[derive(Clone, Copy)]
struct DriverHandle {
    driver: StoredValue<TransitionDriver>,
    timers: StoredValue<Vec<(u64, TimeoutHandle)>>,
    on_event: Option<Callback<TransitionEvent>>,
    hooks: Option<TransitionHooks>,
}

impl DriverHandle {
    fn dispatch(self, action: TransitionAction) {
        let commands = self
            .driver
            .try_update_value(|driver| driver.dispatch(action))
            .unwrap_or_default();
        self.run(commands);
    }

    fn set_in(self, in_prop: bool) {
        let commands = self
            .driver
            .try_update_value(|driver| driver.set_in(in_prop))
            .unwrap_or_default();
        self.run(commands);
    }

    fn run(self, commands: Vec<DriverCommand>) {
        for command in commands {
            match command {
                DriverCommand::StartTimer {
                    generation,
                    after_ms,
                } => {
                    let delay = Duration::from_secs_f64(after_ms.max(0.0) / 1000.0);
                    let finish = move || self.finish(generation);
                    if let Ok(timer) = set_timeout_with_handle(finish, delay) {
                        self.timers
                            .update_value(|timers| timers.push((generation, timer)));
                    }
                }
                DriverCommand::CancelTimer { generation } => {
                    self.timers.try_update_value(|timers| {
                        timers.retain(|(pending, timer)| {
                            if *pending == generation {
                                timer.clear();
                                false
                            } else {
                                true
                            }
                        });
                    });
                }
                DriverCommand::Notify(event) => self.notify(event),
            }
        }
    }

    fn finish(self, generation: u64) {
        self.timers
            .try_update_value(|timers| timers.retain(|(pending, _)| *pending != generation));
        self.dispatch(TransitionAction::Finished { generation });
    }

    fn notify(self, event: TransitionEvent) {
        if let Some(hooks) = self.hooks {
            match event {
                TransitionEvent::Enter { .. } => hooks.on_enter.call(()),
                TransitionEvent::Exited => hooks.on_exited.call(()),
                _ => {}
            }
        }
        if let Some(on_event) = self.on_event {
            on_event.call(event);
        }
    }

    fn clear_timers(self) {
        if let Some(timers) = self.timers.try_update_value(std::mem::take) {
            for (_, timer) in timers {
                timer.clear();
            }
        }
    }
}

struct TransitionProps {
    in_: MaybeSignal<bool>,
    appear: bool,
    timeout: Option<Timeout>,
    easing: Option<EasingSpec>,
    overrides: TimingOverrides,
    on_event: Option<Callback<TransitionEvent>>,
    isolated: bool,
    node_ref: NodeRef<html::Div>,
}

fn use_transition(child: Box<dyn AnimatedChild>, props: TransitionProps) -> DriverHandle {
    let ctx = use_overlay();
    let hooks = if props.isolated {
        None
    } else {
        use_context::<TransitionHooks>()
    };
    let config = TransitionConfig {
        easing: props.easing,
        overrides: props.overrides,
        appear: props.appear,
        ..TransitionConfig::default()
    };
    let driver = TransitionDriver::new(
        ctx.dom_host(),
        child,
        ctx.theme.get_untracked(),
        config,
        props.timeout,
        props.in_.get_untracked(),
    );
    let handle = DriverHandle {
        driver: store_value(driver),
        timers: store_value(Vec::new()),
        on_event: props.on_event,
        hooks,
    };

    let node_ref = props.node_ref;
    let mounted = store_value(None::<NodeId>);
    create_effect(move |_| {
        let Some(element) = node_ref.get() else {
            return;
        };
        let node = ctx.node_id(&element);
        if mounted.get_value() == Some(node) {
            return;
        }
        mounted.set_value(Some(node));
        let commands = handle
            .driver
            .try_update_value(|driver| driver.mount(node))
            .unwrap_or_default();
        handle.run(commands);
    });

    let in_ = props.in_;
    create_effect(move |previous: Option<bool>| {
        let current = in_.get();
        if previous.is_some_and(|previous| previous != current) {
            handle.set_in(current);
        }
        current
    });

    on_cleanup(move || {
        handle.clear_timers();
        handle.driver.try_update_value(|driver| driver.unmount());
        if let Some(node) = mounted.try_get_value().flatten() {
            ctx.release(node);
        }
    });

    handle
}

#[component]
/// Opacity transition around `children`.
///
/// Inside a [`Modal`] the transition reports enter/exited to the modal unless `isolated`.
pub fn Fade(
    #[prop(into)] in_: MaybeSignal<bool>,
    #[prop(default = true)] appear: bool,
    #[prop(optional_no_strip)] timeout: Option<Timeout>,
    #[prop(optional_no_strip)] easing: Option<EasingSpec>,
    #[prop(optional)] overrides: TimingOverrides,
    #[prop(optional_no_strip)] on_event: Option<Callback<TransitionEvent>>,
    #[prop(optional)] isolated: bool,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] node_ref: NodeRef<html::Div>,
    children: Children,
) -> impl IntoView {
    let hidden = !in_.get_untracked();
    use_transition(
        Box::new(animations::Fade),
        TransitionProps {
            in_,
            appear,
            timeout,
            easing,
            overrides,
            on_event,
            isolated,
            node_ref,
        },
    );
    view! {
        <div
            node_ref=node_ref
            class=merge_layout_class("ui-fade", layout_class)
            style:opacity=hidden.then_some("0")
            style:visibility=hidden.then_some("hidden")
            data-ui-primitive="true"
            data-ui-kind="fade"
        >
            {children()}
        </div>
    }
}

#[component]
/// Scale-and-fade transition whose default duration follows the rendered height.
pub fn Grow(
    #[prop(into)] in_: MaybeSignal<bool>,
    #[prop(default = true)] appear: bool,
    #[prop(optional_no_strip)] timeout: Option<Timeout>,
    #[prop(optional_no_strip)] easing: Option<EasingSpec>,
    #[prop(optional)] overrides: TimingOverrides,
    #[prop(optional_no_strip)] on_event: Option<Callback<TransitionEvent>>,
    #[prop(optional)] isolated: bool,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] style: Option<String>,
    #[prop(optional)] node_ref: NodeRef<html::Div>,
    children: Children,
) -> impl IntoView {
    let hidden = !in_.get_untracked();
    use_transition(
        Box::new(animations::Grow),
        TransitionProps {
            in_,
            appear,
            timeout,
            easing,
            overrides,
            on_event,
            isolated,
            node_ref,
        },
    );
    view! {
        <div
            node_ref=node_ref
            class=merge_layout_class("ui-grow", layout_class)
            style=style
            style:opacity=hidden.then_some("0")
            style:visibility=hidden.then_some("hidden")
            data-ui-primitive="true"
            data-ui-kind="grow"
        >
            {children()}
        </div>
    }
}

#[component]
/// Translate transition from beyond the viewport, or beyond `container` when given.
pub fn Slide(
    #[prop(into)] in_: MaybeSignal<bool>,
    #[prop(optional)] direction: SlideDirection,
    #[prop(optional)] container: Option<web_sys::Element>,
    #[prop(default = true)] appear: bool,
    #[prop(optional_no_strip)] timeout: Option<Timeout>,
    #[prop(optional_no_strip)] easing: Option<EasingSpec>,
    #[prop(optional)] overrides: TimingOverrides,
    #[prop(optional_no_strip)] on_event: Option<Callback<TransitionEvent>>,
    #[prop(optional)] isolated: bool,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] node_ref: NodeRef<html::Div>,
    children: Children,
) -> impl IntoView {
    let ctx = use_overlay();
    let hidden = !in_.get_untracked();
    let slide = animations::Slide {
        direction,
        container: container.as_ref().map(|element| ctx.node_id(element)),
    };
    let handle = use_transition(
        Box::new(slide),
        TransitionProps {
            in_,
            appear,
            timeout,
            easing,
            overrides,
            on_event,
            isolated,
            node_ref,
        },
    );

    if direction.depends_on_viewport() || slide.container.is_some() {
        let debounced = Debounced::new(SLIDE_RESIZE_DEBOUNCE);
        let listener = window_event_listener(ev::resize, move |_| {
            debounced.schedule(move || {
                handle
                    .driver
                    .try_with_value(|driver| driver.refresh_hidden_position());
            });
        });
        on_cleanup(move || {
            listener.remove();
            debounced.clear();
        });
    }

    view! {
        <div
            node_ref=node_ref
            class=merge_layout_class("ui-slide", layout_class)
            style:visibility=hidden.then_some("hidden")
            data-ui-primitive="true"
            data-ui-kind="slide"
            data-ui-direction=direction.token()
        >
            {children()}
        </div>
    }
}
