//! Transition phase machine and timing resolution.
//!
//! [`reduce_transition`] follows the runtime's reducer shape: it mutates a
//! [`TransitionMachine`] and returns effect intents. Finish timers are tagged with a generation
//! so a timer that outlives its phase (cancelled enter, unmounted node) resolves to a no-op.

use crate::theme::{auto_height_duration, ThemeTokens};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Lifecycle phase of one animated surface.
pub enum TransitionPhase {
    #[default]
    /// Hidden at rest.
    Exited,
    /// Animating towards visible.
    Entering,
    /// Visible at rest.
    Entered,
    /// Animating towards hidden.
    Exiting,
}

impl TransitionPhase {
    /// Returns the phase token used in `data-transition-phase` attributes.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Exited => "exited",
            Self::Entering => "entering",
            Self::Entered => "entered",
            Self::Exiting => "exiting",
        }
    }

    /// Phase that directly follows this one in the enter/exit cycle.
    pub const fn next(self) -> Self {
        match self {
            Self::Exited => Self::Entering,
            Self::Entering => Self::Entered,
            Self::Entered => Self::Exiting,
            Self::Exiting => Self::Exited,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Direction of a transition.
pub enum TransitionMode {
    /// Entering.
    Enter,
    /// Exiting.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// `transitionDuration` / `timeout`: one value, split enter/exit values, or height-derived.
pub enum Timeout {
    /// Same duration in both directions.
    Fixed(f64),
    /// Separate durations.
    Split {
        /// Enter duration in ms.
        enter: f64,
        /// Exit duration in ms.
        exit: f64,
    },
    #[default]
    /// Derived from the rendered height.
    Auto,
}

impl Timeout {
    /// Duration for `mode`; `None` for [`Timeout::Auto`].
    pub fn for_mode(self, mode: TransitionMode) -> Option<f64> {
        match (self, mode) {
            (Self::Fixed(ms), _) => Some(ms),
            (Self::Split { enter, .. }, TransitionMode::Enter) => Some(enter),
            (Self::Split { exit, .. }, TransitionMode::Exit) => Some(exit),
            (Self::Auto, _) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Easing for both directions or per direction.
pub enum EasingSpec {
    /// Same curve in both directions.
    Single(String),
    /// Separate curves.
    Split {
        /// Enter curve.
        enter: String,
        /// Exit curve.
        exit: String,
    },
}

impl EasingSpec {
    /// Curve for `mode`.
    pub fn for_mode(&self, mode: TransitionMode) -> &str {
        match (self, mode) {
            (Self::Single(easing), _) => easing,
            (Self::Split { enter, .. }, TransitionMode::Enter) => enter,
            (Self::Split { exit, .. }, TransitionMode::Exit) => exit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Inline `transition-duration`/`-timing-function`/`-delay` overrides; these beat props.
pub struct TimingOverrides {
    /// Duration override in ms.
    pub duration: Option<f64>,
    /// Easing override.
    pub easing: Option<String>,
    /// Delay override in ms.
    pub delay: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Timing configuration of one transition instance.
pub struct TransitionConfig {
    /// Duration specification.
    pub timeout: Timeout,
    /// Easing specification; `None` uses the component default.
    pub easing: Option<EasingSpec>,
    /// Inline overrides.
    pub overrides: TimingOverrides,
    /// Run the enter transition when first mounted already `in`.
    pub appear: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Timing for one direction after overrides and defaults are applied.
pub struct ResolvedTiming {
    /// Duration in ms.
    pub duration: f64,
    /// Easing; `None` lets the theme default apply.
    pub easing: Option<String>,
    /// Delay in ms.
    pub delay: Option<f64>,
}

impl TransitionConfig {
    /// Resolves timing for `mode`; `auto_duration` supplies the measured value for
    /// [`Timeout::Auto`].
    pub fn resolve(&self, mode: TransitionMode, auto_duration: f64) -> ResolvedTiming {
        ResolvedTiming {
            duration: self
                .overrides
                .duration
                .or_else(|| self.timeout.for_mode(mode))
                .unwrap_or(auto_duration),
            easing: self
                .overrides
                .easing
                .clone()
                .or_else(|| self.easing.as_ref().map(|e| e.for_mode(mode).to_string())),
            delay: self.overrides.delay,
        }
    }

    /// Returns `true` when the duration depends on the rendered height.
    pub fn is_auto(&self) -> bool {
        self.timeout == Timeout::Auto && self.overrides.duration.is_none()
    }
}

/// Keeps one height-derived duration for an enter/exit pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AutoDuration {
    measured: Option<f64>,
}

impl AutoDuration {
    /// Measures on enter; reuses the enter measurement on exit, measuring only if none exists.
    pub fn for_mode(&mut self, mode: TransitionMode, height: impl FnOnce() -> f64) -> f64 {
        match (mode, self.measured) {
            (TransitionMode::Exit, Some(ms)) => ms,
            _ => {
                let ms = auto_height_duration(height());
                self.measured = Some(ms);
                ms
            }
        }
    }

    /// Last measured duration.
    pub fn last(&self) -> Option<f64> {
        self.measured
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Inputs to [`reduce_transition`].
pub enum TransitionAction {
    /// `in` became `true`.
    Enter {
        /// `true` for the initial mount-time enter.
        appearing: bool,
    },
    /// `in` became `false`.
    Exit,
    /// A finish timer or `transitionend` fired.
    Finished {
        /// Generation the timer was scheduled for.
        generation: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Intents emitted by [`reduce_transition`].
pub enum TransitionEffect {
    /// The machine entered `phase`.
    Phase {
        /// New phase.
        phase: TransitionPhase,
        /// Set for the mount-time enter.
        appearing: bool,
    },
    /// Start waiting for the current phase to finish.
    ScheduleFinish {
        /// Generation to report back in [`TransitionAction::Finished`].
        generation: u64,
        /// Direction being animated.
        mode: TransitionMode,
    },
    /// Drop the pending finish timer for `generation`.
    CancelFinish {
        /// Generation being cancelled.
        generation: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Phase state of one animated surface.
pub struct TransitionMachine {
    phase: TransitionPhase,
    generation: u64,
    pending: bool,
    in_prop: bool,
    appearing: bool,
}

impl TransitionMachine {
    /// Machine for a surface mounted with `in_prop`.
    ///
    /// A surface mounted `in` without `appear` starts entered; with `appear` it starts exited
    /// and expects an `Enter { appearing: true }` action.
    pub fn new(in_prop: bool, appear: bool) -> Self {
        let phase = if in_prop && !appear {
            TransitionPhase::Entered
        } else {
            TransitionPhase::Exited
        };
        Self {
            phase,
            in_prop,
            ..Self::default()
        }
    }

    /// Current phase.
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Latest requested `in` value.
    pub fn in_prop(&self) -> bool {
        self.in_prop
    }

    /// Generation of the most recently scheduled finish.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn advance(&mut self, effects: &mut Vec<TransitionEffect>) {
        self.phase = self.phase.next();
        effects.push(TransitionEffect::Phase {
            phase: self.phase,
            appearing: self.appearing,
        });
    }

    fn cancel_pending(&mut self, effects: &mut Vec<TransitionEffect>) {
        if self.pending {
            self.pending = false;
            effects.push(TransitionEffect::CancelFinish {
                generation: self.generation,
            });
        }
    }

    fn schedule(&mut self, mode: TransitionMode, effects: &mut Vec<TransitionEffect>) {
        self.generation += 1;
        self.pending = true;
        effects.push(TransitionEffect::ScheduleFinish {
            generation: self.generation,
            mode,
        });
    }
}

/// Applies `action` and returns the resulting effects.
///
/// Phases only ever advance along `exited → entering → entered → exiting → exited`. Reversing
/// mid-animation cancels the pending finish and steps through the skipped rest phase
/// immediately, so observers never see a phase jump.
pub fn reduce_transition(
    machine: &mut TransitionMachine,
    action: TransitionAction,
) -> Vec<TransitionEffect> {
    let mut effects = Vec::new();
    match action {
        TransitionAction::Enter { appearing } => {
            machine.in_prop = true;
            match machine.phase {
                TransitionPhase::Entering | TransitionPhase::Entered => {}
                TransitionPhase::Exiting => {
                    machine.cancel_pending(&mut effects);
                    machine.appearing = false;
                    machine.advance(&mut effects);
                    machine.advance(&mut effects);
                    machine.schedule(TransitionMode::Enter, &mut effects);
                }
                TransitionPhase::Exited => {
                    machine.appearing = appearing;
                    machine.advance(&mut effects);
                    machine.schedule(TransitionMode::Enter, &mut effects);
                }
            }
        }
        TransitionAction::Exit => {
            machine.in_prop = false;
            match machine.phase {
                TransitionPhase::Exited | TransitionPhase::Exiting => {}
                TransitionPhase::Entering => {
                    machine.cancel_pending(&mut effects);
                    machine.advance(&mut effects);
                    machine.appearing = false;
                    machine.advance(&mut effects);
                    machine.schedule(TransitionMode::Exit, &mut effects);
                }
                TransitionPhase::Entered => {
                    machine.appearing = false;
                    machine.advance(&mut effects);
                    machine.schedule(TransitionMode::Exit, &mut effects);
                }
            }
        }
        TransitionAction::Finished { generation } => {
            let in_flight = matches!(
                machine.phase,
                TransitionPhase::Entering | TransitionPhase::Exiting
            );
            if machine.pending && generation == machine.generation && in_flight {
                machine.pending = false;
                machine.advance(&mut effects);
            }
        }
    }
    effects
}

/// Duration of the finish wait for `mode`, measuring height only in auto mode.
pub fn finish_delay(
    config: &TransitionConfig,
    mode: TransitionMode,
    auto: &mut AutoDuration,
    height: impl FnOnce() -> f64,
) -> f64 {
    let auto_ms = if config.is_auto() {
        auto.for_mode(mode, height)
    } else {
        0.0
    };
    let timing = config.resolve(mode, auto_ms);
    timing.duration + timing.delay.unwrap_or_default()
}

/// Default enter/exit durations for screen-level transitions.
pub fn screen_timeout(theme: &ThemeTokens) -> Timeout {
    Timeout::Split {
        enter: theme.durations.entering_screen,
        exit: theme.durations.leaving_screen,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn phases(effects: &[TransitionEffect]) -> Vec<TransitionPhase> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                TransitionEffect::Phase { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    fn run(machine: &mut TransitionMachine, actions: &[TransitionAction]) -> Vec<TransitionPhase> {
        let mut observed = vec![machine.phase()];
        for action in actions {
            observed.extend(phases(&reduce_transition(machine, *action)));
        }
        observed
    }

    #[test]
    fn phases_never_skip_or_reverse() {
        let mut machine = TransitionMachine::new(false, true);
        let observed = run(
            &mut machine,
            &[
                TransitionAction::Enter { appearing: false },
                TransitionAction::Exit,
                TransitionAction::Enter { appearing: false },
                TransitionAction::Finished { generation: 3 },
                TransitionAction::Exit,
                TransitionAction::Finished { generation: 4 },
                TransitionAction::Enter { appearing: false },
            ],
        );
        for pair in observed.windows(2) {
            assert_eq!(pair[1], pair[0].next(), "{observed:?}");
        }
        assert_eq!(machine.phase(), TransitionPhase::Entering);
    }

    #[test]
    fn stale_finish_is_ignored_after_cancel() {
        let mut machine = TransitionMachine::new(false, true);
        let effects = reduce_transition(&mut machine, TransitionAction::Enter { appearing: true });
        assert_eq!(
            effects,
            vec![
                TransitionEffect::Phase {
                    phase: TransitionPhase::Entering,
                    appearing: true
                },
                TransitionEffect::ScheduleFinish {
                    generation: 1,
                    mode: TransitionMode::Enter
                },
            ]
        );

        let effects = reduce_transition(&mut machine, TransitionAction::Exit);
        assert_eq!(effects[0], TransitionEffect::CancelFinish { generation: 1 });
        assert_eq!(phases(&effects), vec![TransitionPhase::Entered, TransitionPhase::Exiting]);

        assert!(reduce_transition(&mut machine, TransitionAction::Finished { generation: 1 })
            .is_empty());
        assert_eq!(machine.phase(), TransitionPhase::Exiting);

        let effects = reduce_transition(&mut machine, TransitionAction::Finished { generation: 2 });
        assert_eq!(phases(&effects), vec![TransitionPhase::Exited]);
        assert!(reduce_transition(&mut machine, TransitionAction::Finished { generation: 2 })
            .is_empty());
    }

    #[test]
    fn mounting_in_without_appear_starts_entered() {
        let machine = TransitionMachine::new(true, false);
        assert_eq!(machine.phase(), TransitionPhase::Entered);
        assert!(machine.in_prop());
    }

    #[test]
    fn overrides_beat_props_and_split_timeouts_follow_mode() {
        let config = TransitionConfig {
            timeout: Timeout::Split {
                enter: 225.0,
                exit: 195.0,
            },
            easing: Some(EasingSpec::Split {
                enter: "ease-out".to_string(),
                exit: "sharp".to_string(),
            }),
            overrides: TimingOverrides {
                delay: Some(20.0),
                ..TimingOverrides::default()
            },
            appear: true,
        };
        let exit = config.resolve(TransitionMode::Exit, 0.0);
        assert_eq!(exit.duration, 195.0);
        assert_eq!(exit.easing.as_deref(), Some("sharp"));
        assert_eq!(exit.delay, Some(20.0));

        let overridden = TransitionConfig {
            overrides: TimingOverrides {
                duration: Some(50.0),
                ..TimingOverrides::default()
            },
            ..config
        };
        assert_eq!(overridden.resolve(TransitionMode::Enter, 0.0).duration, 50.0);
    }

    #[test]
    fn auto_duration_is_reused_for_matching_exit() {
        let config = TransitionConfig::default();
        let mut auto = AutoDuration::default();
        assert_eq!(finish_delay(&config, TransitionMode::Enter, &mut auto, || 36.0), 192.0);
        assert_eq!(finish_delay(&config, TransitionMode::Exit, &mut auto, || 3600.0), 192.0);
        assert_eq!(auto.last(), Some(192.0));
    }
}
