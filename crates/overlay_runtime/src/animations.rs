//! Fade, Grow and Slide as [`AnimatedChild`] implementations, plus the [`TransitionDriver`]
//! that turns phase effects into ordered style writes on a host node.

use std::rc::Rc;

use dom_host::{DomHost, NodeId};

use crate::{
    theme::{format_number, ThemeTokens, TransitionOptions},
    transition::{
        finish_delay, reduce_transition, screen_timeout, AutoDuration, EasingSpec,
        ResolvedTiming, Timeout, TransitionAction, TransitionConfig, TransitionEffect,
        TransitionMachine, TransitionMode, TransitionPhase,
    },
};

/// Inline styles a child wants applied, as `(property, value)` pairs; an empty value removes
/// the property.
pub type PhaseStyle = Vec<(&'static str, String)>;

/// Capability implemented by anything the transition driver can animate.
pub trait AnimatedChild {
    /// Stable kind token (`"fade"`, `"grow"`, `"slide"`).
    fn kind(&self) -> &'static str;

    /// Styles for `phase`; called after every phase change.
    fn phase_style(&self, host: &dyn DomHost, node: NodeId, phase: TransitionPhase)
        -> PhaseStyle;

    /// CSS `transition` value for `mode`.
    fn transition_css(
        &self,
        theme: &ThemeTokens,
        mode: TransitionMode,
        timing: &ResolvedTiming,
    ) -> String;

    /// Default timeout when the consumer supplies none.
    fn default_timeout(&self, theme: &ThemeTokens) -> Timeout {
        screen_timeout(theme)
    }

    /// Default easing when the consumer supplies none.
    fn default_easing(&self, _theme: &ThemeTokens) -> Option<EasingSpec> {
        None
    }

    /// Hook run before the enter reflow, while the node still shows its exited styles.
    fn prepare_enter(&self, _host: &dyn DomHost, _node: NodeId) {}
}

#[derive(Debug, Clone, Copy, Default)]
/// Opacity transition.
pub struct Fade;

impl AnimatedChild for Fade {
    fn kind(&self) -> &'static str {
        "fade"
    }

    fn phase_style(&self, _: &dyn DomHost, _: NodeId, phase: TransitionPhase) -> PhaseStyle {
        let opacity = match phase {
            TransitionPhase::Entering | TransitionPhase::Entered => "1",
            TransitionPhase::Exiting | TransitionPhase::Exited => "0",
        };
        vec![("opacity", opacity.to_string())]
    }

    fn transition_css(
        &self,
        theme: &ThemeTokens,
        _: TransitionMode,
        timing: &ResolvedTiming,
    ) -> String {
        theme.create_transition(&["opacity"], options(timing))
    }
}

/// Scale transform used by [`Grow`]: height shrinks faster than width.
pub fn grow_scale(value: f64) -> String {
    format!(
        "scale({}, {})",
        format_number(value),
        format_number(value * value)
    )
}

const GROW_TRANSFORM_RATIO: f64 = 0.666;
const GROW_EXIT_DELAY_RATIO: f64 = 0.333;

#[derive(Debug, Clone, Copy, Default)]
/// Opacity plus scale transition that defaults to a height-derived duration.
pub struct Grow;

impl AnimatedChild for Grow {
    fn kind(&self) -> &'static str {
        "grow"
    }

    fn phase_style(&self, _: &dyn DomHost, _: NodeId, phase: TransitionPhase) -> PhaseStyle {
        match phase {
            TransitionPhase::Entering => vec![
                ("opacity", "1".to_string()),
                ("transform", grow_scale(1.0)),
            ],
            TransitionPhase::Entered => {
                vec![("opacity", "1".to_string()), ("transform", "none".to_string())]
            }
            TransitionPhase::Exiting | TransitionPhase::Exited => vec![
                ("opacity", "0".to_string()),
                ("transform", grow_scale(0.75)),
            ],
        }
    }

    fn transition_css(
        &self,
        theme: &ThemeTokens,
        mode: TransitionMode,
        timing: &ResolvedTiming,
    ) -> String {
        let opacity = theme.create_transition(
            &["opacity"],
            TransitionOptions {
                duration: Some(timing.duration),
                easing: None,
                delay: timing.delay,
            },
        );
        let transform_delay = match mode {
            TransitionMode::Enter => timing.delay,
            TransitionMode::Exit => Some(
                timing
                    .delay
                    .filter(|delay| *delay != 0.0)
                    .unwrap_or(timing.duration * GROW_EXIT_DELAY_RATIO),
            ),
        };
        let transform = theme.create_transition(
            &["transform"],
            TransitionOptions {
                duration: Some(timing.duration * GROW_TRANSFORM_RATIO),
                easing: timing.easing.as_deref(),
                delay: transform_delay,
            },
        );
        format!("{opacity},{transform}")
    }

    fn default_timeout(&self, _: &ThemeTokens) -> Timeout {
        Timeout::Auto
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Edge a [`Slide`] moves towards while entering.
pub enum SlideDirection {
    /// Enters moving left (from the right edge).
    Left,
    /// Enters moving right (from the left edge).
    Right,
    /// Enters moving up (from the bottom edge).
    Up,
    #[default]
    /// Enters moving down (from the top edge).
    Down,
}

impl SlideDirection {
    /// Returns the direction token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// `true` when the hidden offset depends on the viewport size.
    pub const fn depends_on_viewport(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }
}

/// Extracts the `(x, y)` translation from a computed `matrix(...)`/`matrix3d(...)` transform.
pub fn matrix_translation(transform: &str) -> (f64, f64) {
    let transform = transform.trim();
    if transform.is_empty() || transform == "none" {
        return (0.0, 0.0);
    }
    let Some(inner) = transform
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(inner, _)| inner)
    else {
        return (0.0, 0.0);
    };
    let values: Vec<&str> = inner.split(',').map(str::trim).collect();
    let parse = |index: usize| {
        values
            .get(index)
            .and_then(|value| value.parse::<f64>().ok())
            .map(f64::trunc)
            .unwrap_or_default()
    };
    (parse(4), parse(5))
}

/// Translate transform that moves `node` fully outside `container` (or the viewport).
///
/// Any translation already applied to the node is folded in so repeated measurements converge
/// instead of drifting.
pub fn slide_translate_value(
    host: &dyn DomHost,
    direction: SlideDirection,
    node: NodeId,
    container: Option<NodeId>,
) -> String {
    let rect = host.bounding_rect(node);
    let container_rect = container.map(|container| host.bounding_rect(container));
    let viewport = host.viewport_size();
    let (offset_x, offset_y) = host
        .computed_style(node, "transform")
        .map(|transform| matrix_translation(&transform))
        .unwrap_or_default();

    let px = |value: f64| format_number(value);
    match (direction, container_rect) {
        (SlideDirection::Left, Some(c)) => {
            format!("translateX({}px)", px(c.right() + offset_x - rect.left))
        }
        (SlideDirection::Left, None) => {
            format!("translateX({}px)", px(viewport.width + offset_x - rect.left))
        }
        (SlideDirection::Right, Some(c)) => {
            format!("translateX(-{}px)", px(rect.right() - c.left - offset_x))
        }
        (SlideDirection::Right, None) => {
            format!("translateX(-{}px)", px(rect.left + rect.width - offset_x))
        }
        (SlideDirection::Up, Some(c)) => {
            format!("translateY({}px)", px(c.bottom() + offset_y - rect.top))
        }
        (SlideDirection::Up, None) => {
            format!("translateY({}px)", px(viewport.height + offset_y - rect.top))
        }
        (SlideDirection::Down, Some(c)) => format!(
            "translateY(-{}px)",
            px(rect.top - c.top + rect.height - offset_y)
        ),
        (SlideDirection::Down, None) => {
            format!("translateY(-{}px)", px(rect.top + rect.height - offset_y))
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Translate transition from outside the viewport or a container.
pub struct Slide {
    /// Direction of travel while entering.
    pub direction: SlideDirection,
    /// Element whose edges bound the hidden position.
    pub container: Option<NodeId>,
}

impl Slide {
    /// Slide travelling in `direction`.
    pub const fn new(direction: SlideDirection) -> Self {
        Self {
            direction,
            container: None,
        }
    }

    /// Writes the hidden translate onto `node`.
    pub fn set_translate_value(&self, host: &dyn DomHost, node: NodeId) {
        let transform = slide_translate_value(host, self.direction, node, self.container);
        host.set_style(node, "transform", &transform);
    }
}

impl AnimatedChild for Slide {
    fn kind(&self) -> &'static str {
        "slide"
    }

    fn phase_style(&self, host: &dyn DomHost, node: NodeId, phase: TransitionPhase) -> PhaseStyle {
        match phase {
            TransitionPhase::Entering | TransitionPhase::Entered => {
                vec![("transform", "none".to_string())]
            }
            TransitionPhase::Exiting | TransitionPhase::Exited => vec![(
                "transform",
                slide_translate_value(host, self.direction, node, self.container),
            )],
        }
    }

    fn transition_css(
        &self,
        theme: &ThemeTokens,
        _: TransitionMode,
        timing: &ResolvedTiming,
    ) -> String {
        theme.create_transition(&["transform"], options(timing))
    }

    fn default_easing(&self, theme: &ThemeTokens) -> Option<EasingSpec> {
        Some(EasingSpec::Split {
            enter: theme.easing.ease_out.clone(),
            exit: theme.easing.sharp.clone(),
        })
    }

    fn prepare_enter(&self, host: &dyn DomHost, node: NodeId) {
        self.set_translate_value(host, node);
    }
}

fn options(timing: &ResolvedTiming) -> TransitionOptions<'_> {
    TransitionOptions {
        duration: Some(timing.duration),
        easing: timing.easing.as_deref(),
        delay: timing.delay,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Consumer callback points, in the order they fire.
pub enum TransitionEvent {
    /// Enter styles are about to be applied.
    Enter {
        /// Mount-time enter.
        appearing: bool,
    },
    /// Entering styles were applied.
    Entering {
        /// Mount-time enter.
        appearing: bool,
    },
    /// Enter finished.
    Entered {
        /// Mount-time enter.
        appearing: bool,
    },
    /// Exit styles are about to be applied.
    Exit,
    /// Exiting styles were applied.
    Exiting,
    /// Exit finished.
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Work the UI layer must perform after [`TransitionDriver::dispatch`].
pub enum DriverCommand {
    /// Call back with `Finished { generation }` after `after_ms`.
    StartTimer {
        /// Generation to report.
        generation: u64,
        /// Delay in ms.
        after_ms: f64,
    },
    /// Clear the timer for `generation`.
    CancelTimer {
        /// Generation to cancel.
        generation: u64,
    },
    /// Invoke the consumer callback.
    Notify(TransitionEvent),
}

/// Drives one [`AnimatedChild`] on one host node.
pub struct TransitionDriver {
    host: Rc<dyn DomHost>,
    node: Option<NodeId>,
    child: Box<dyn AnimatedChild>,
    theme: ThemeTokens,
    config: TransitionConfig,
    machine: TransitionMachine,
    auto: AutoDuration,
}

impl std::fmt::Debug for TransitionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionDriver")
            .field("kind", &self.child.kind())
            .field("node", &self.node)
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

impl TransitionDriver {
    /// Creates a driver; unset timeout/easing fall back to the child's defaults.
    pub fn new(
        host: Rc<dyn DomHost>,
        child: Box<dyn AnimatedChild>,
        theme: ThemeTokens,
        mut config: TransitionConfig,
        timeout: Option<Timeout>,
        in_prop: bool,
    ) -> Self {
        config.timeout = timeout.unwrap_or_else(|| child.default_timeout(&theme));
        if config.easing.is_none() {
            config.easing = child.default_easing(&theme);
        }
        let machine = TransitionMachine::new(in_prop, config.appear);
        Self {
            host,
            node: None,
            child,
            theme,
            config,
            machine,
            auto: AutoDuration::default(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> TransitionPhase {
        self.machine.phase()
    }

    /// Effective configuration.
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Attaches the animated node, writes its resting styles, and starts the appear
    /// transition when configured.
    pub fn mount(&mut self, node: NodeId) -> Vec<DriverCommand> {
        self.node = Some(node);
        self.apply_phase(self.machine.phase());
        if self.machine.in_prop() && self.machine.phase() == TransitionPhase::Exited {
            return self.dispatch(TransitionAction::Enter { appearing: true });
        }
        Vec::new()
    }

    /// Detaches the node; later style writes become no-ops.
    pub fn unmount(&mut self) {
        self.node = None;
    }

    /// Re-measures the hidden slide offset while not `in` (viewport-dependent directions).
    pub fn refresh_hidden_position(&self) {
        if self.machine.in_prop() {
            return;
        }
        if let Some(node) = self.live_node() {
            let styles = self
                .child
                .phase_style(self.host.as_ref(), node, self.machine.phase());
            self.write_styles(node, styles);
        }
    }

    /// Updates `in`, returning commands for the UI layer.
    pub fn set_in(&mut self, in_prop: bool) -> Vec<DriverCommand> {
        if in_prop {
            self.dispatch(TransitionAction::Enter { appearing: false })
        } else {
            self.dispatch(TransitionAction::Exit)
        }
    }

    /// Applies an action and performs the style writes for every resulting phase change.
    pub fn dispatch(&mut self, action: TransitionAction) -> Vec<DriverCommand> {
        let mut commands = Vec::new();
        for effect in reduce_transition(&mut self.machine, action) {
            match effect {
                TransitionEffect::Phase { phase, appearing } => {
                    self.enter_phase(phase, appearing, &mut commands);
                }
                TransitionEffect::ScheduleFinish { generation, mode } => {
                    let host = Rc::clone(&self.host);
                    let node = self.live_node();
                    let after_ms = finish_delay(&self.config, mode, &mut self.auto, || {
                        node.map(|node| host.client_size(node).height)
                            .unwrap_or_default()
                    });
                    commands.push(DriverCommand::StartTimer {
                        generation,
                        after_ms,
                    });
                }
                TransitionEffect::CancelFinish { generation } => {
                    commands.push(DriverCommand::CancelTimer { generation });
                }
            }
        }
        commands
    }

    fn live_node(&self) -> Option<NodeId> {
        self.node.filter(|node| self.host.is_connected(*node))
    }

    fn enter_phase(
        &mut self,
        phase: TransitionPhase,
        appearing: bool,
        commands: &mut Vec<DriverCommand>,
    ) {
        match phase {
            TransitionPhase::Entering => {
                if let Some(node) = self.live_node() {
                    self.child.prepare_enter(self.host.as_ref(), node);
                    self.host.reflow(node);
                    self.write_transition(node, TransitionMode::Enter);
                }
                commands.push(DriverCommand::Notify(TransitionEvent::Enter { appearing }));
                self.apply_phase(phase);
                commands.push(DriverCommand::Notify(TransitionEvent::Entering { appearing }));
            }
            TransitionPhase::Entered => {
                self.apply_phase(phase);
                commands.push(DriverCommand::Notify(TransitionEvent::Entered { appearing }));
            }
            TransitionPhase::Exiting => {
                if let Some(node) = self.live_node() {
                    self.write_transition(node, TransitionMode::Exit);
                }
                commands.push(DriverCommand::Notify(TransitionEvent::Exit));
                self.apply_phase(phase);
                commands.push(DriverCommand::Notify(TransitionEvent::Exiting));
            }
            TransitionPhase::Exited => {
                if let Some(node) = self.live_node() {
                    self.host.remove_style(node, "transition");
                }
                self.apply_phase(phase);
                commands.push(DriverCommand::Notify(TransitionEvent::Exited));
            }
        }
    }

    fn write_transition(&mut self, node: NodeId, mode: TransitionMode) {
        let auto_ms = if self.config.is_auto() {
            let host = Rc::clone(&self.host);
            self.auto.for_mode(mode, || host.client_size(node).height)
        } else {
            0.0
        };
        let timing = self.config.resolve(mode, auto_ms);
        let css = self.child.transition_css(&self.theme, mode, &timing);
        self.host.set_style(node, "transition", &css);
    }

    fn apply_phase(&self, phase: TransitionPhase) {
        let Some(node) = self.live_node() else {
            return;
        };
        let mut styles = self.child.phase_style(self.host.as_ref(), node, phase);
        let hidden = phase == TransitionPhase::Exited && !self.machine.in_prop();
        styles.push(("visibility", if hidden { "hidden" } else { "" }.to_string()));
        self.write_styles(node, styles);
        self.host
            .set_attribute(node, "data-transition-phase", phase.token());
    }

    fn write_styles(&self, node: NodeId, styles: PhaseStyle) {
        for (property, value) in styles {
            if value.is_empty() {
                self.host.remove_style(node, property);
            } else {
                self.host.set_style(node, property, &value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dom_host::{DomOp, MemoryDom, Rect, Size};
    use pretty_assertions::assert_eq;

    use super::*;

    fn mounted(
        child: Box<dyn AnimatedChild>,
        timeout: Option<Timeout>,
    ) -> (MemoryDom, NodeId, TransitionDriver) {
        let dom = MemoryDom::new();
        dom.set_viewport(Size::new(800.0, 600.0));
        let node = dom.append_new(dom.body(), "div");
        dom.set_rect(node, Rect::new(100.0, 50.0, 200.0, 36.0));
        let driver = TransitionDriver::new(
            Rc::new(dom.clone()),
            child,
            ThemeTokens::default(),
            TransitionConfig {
                appear: true,
                ..TransitionConfig::default()
            },
            timeout,
            false,
        );
        (dom, node, driver)
    }

    #[test]
    fn enter_reflows_before_writing_transition_and_entering_styles() {
        let (dom, node, mut driver) = mounted(Box::new(Fade), None);
        driver.mount(node);
        assert_eq!(dom.style(node, "visibility").as_deref(), Some("hidden"));
        dom.take_log();

        let commands = driver.set_in(true);
        let log = dom.take_log();
        let reflow = log.iter().position(|op| *op == DomOp::Reflow(node));
        let transition = log.iter().position(
            |op| matches!(op, DomOp::SetStyle(n, p, _) if *n == node && p == "transition"),
        );
        let opacity = log.iter().position(
            |op| matches!(op, DomOp::SetStyle(n, p, v) if *n == node && p == "opacity" && v == "1"),
        );
        assert!(reflow < transition && transition < opacity, "{log:?}");
        assert_eq!(
            dom.style(node, "transition").as_deref(),
            Some("opacity 225ms cubic-bezier(0.4, 0, 0.2, 1) 0ms")
        );
        assert_eq!(
            commands,
            vec![
                DriverCommand::Notify(TransitionEvent::Enter { appearing: false }),
                DriverCommand::Notify(TransitionEvent::Entering { appearing: false }),
                DriverCommand::StartTimer {
                    generation: 1,
                    after_ms: 225.0
                },
            ]
        );
    }

    #[test]
    fn exited_clears_transition_and_hides() {
        let (dom, node, mut driver) = mounted(Box::new(Fade), None);
        driver.mount(node);
        driver.set_in(true);
        driver.dispatch(TransitionAction::Finished { generation: 1 });
        driver.set_in(false);
        assert_eq!(dom.style(node, "opacity").as_deref(), Some("0"));
        let commands = driver.dispatch(TransitionAction::Finished { generation: 2 });
        assert_eq!(commands, vec![DriverCommand::Notify(TransitionEvent::Exited)]);
        assert_eq!(dom.style(node, "transition"), None);
        assert_eq!(dom.style(node, "visibility").as_deref(), Some("hidden"));
    }

    #[test]
    fn grow_uses_auto_duration_and_delays_exit_transform() {
        let (dom, node, mut driver) = mounted(Box::new(Grow), None);
        driver.mount(node);
        let commands = driver.set_in(true);
        assert!(commands.contains(&DriverCommand::StartTimer {
            generation: 1,
            after_ms: 192.0
        }));
        assert_eq!(dom.style(node, "transform").as_deref(), Some("scale(1, 1)"));
        driver.dispatch(TransitionAction::Finished { generation: 1 });
        assert_eq!(dom.style(node, "transform").as_deref(), Some("none"));

        dom.set_rect(node, Rect::new(100.0, 50.0, 200.0, 3600.0));
        driver.set_in(false);
        assert_eq!(
            dom.style(node, "transition").as_deref(),
            Some("opacity 192ms cubic-bezier(0.4, 0, 0.2, 1) 0ms,transform 128ms cubic-bezier(0.4, 0, 0.2, 1) 64ms")
        );
        assert_eq!(dom.style(node, "transform").as_deref(), Some("scale(0.75, 0.5625)"));
    }

    #[test]
    fn slide_translates_out_of_viewport_and_composes_existing_transform() {
        let dom = MemoryDom::new();
        dom.set_viewport(Size::new(800.0, 600.0));
        let node = dom.append_new(dom.body(), "div");
        dom.set_rect(node, Rect::new(0.0, 600.0, 200.0, 600.0));
        assert_eq!(
            slide_translate_value(&dom, SlideDirection::Left, node, None),
            "translateX(200px)"
        );
        dom.set_computed_style(node, "transform", "matrix(1, 0, 0, 1, 200, 0)");
        dom.set_rect(node, Rect::new(0.0, 800.0, 200.0, 600.0));
        assert_eq!(
            slide_translate_value(&dom, SlideDirection::Left, node, None),
            "translateX(200px)"
        );
        assert_eq!(
            slide_translate_value(&dom, SlideDirection::Down, node, None),
            "translateY(-600px)"
        );
    }

    #[test]
    fn unmounted_node_still_advances_phases() {
        let (dom, node, mut driver) = mounted(Box::new(Slide::new(SlideDirection::Up)), None);
        driver.mount(node);
        driver.set_in(true);
        dom.detach(node);
        dom.take_log();
        driver.set_in(false);
        let commands = driver.dispatch(TransitionAction::Finished { generation: 2 });
        assert_eq!(commands, vec![DriverCommand::Notify(TransitionEvent::Exited)]);
        assert!(dom.take_log().is_empty());
        assert_eq!(driver.phase(), TransitionPhase::Exited);
    }

    #[test]
    fn matrix_translation_reads_offsets() {
        assert_eq!(matrix_translation("none"), (0.0, 0.0));
        assert_eq!(
            matrix_translation("matrix(1, 0, 0, 1, 12.7, -30)"),
            (12.0, -30.0)
        );
    }
}
