//! Tab switcher mode state machine
//!
//! Owns the mode phase and the tab-switcher percent. The four phases form a
//! strict cycle. An exit request during entry is dropped; an entry request
//! during exit reverses the exit from wherever its percent has reached.
//!
//! ```text
//! StaticTab --enter--> EnteringSwitcher --done--> TabSwitcher
//!     ^                                               |
//!     +------done------- ExitingSwitcher <---exit-----+
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use chromebar_geometry::Easing;

use crate::animation::Animation;
use crate::axis::{AnimationAxis, AxisTick, AxisValue};
use crate::config::ToolbarConfig;
use crate::error::{EngineError, EngineResult};

/// Phase of the switcher state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModePhase {
    #[default]
    StaticTab,
    EnteringSwitcher,
    TabSwitcher,
    ExitingSwitcher,
}

impl ModePhase {
    /// Stable phases have no percent animation running
    pub fn is_stable(self) -> bool {
        matches!(self, ModePhase::StaticTab | ModePhase::TabSwitcher)
    }

    /// True while showing switcher assets, including during transitions
    pub fn is_in_switcher_mode(self) -> bool {
        self != ModePhase::StaticTab
    }

    /// Exiting resolves as static for visual state purposes
    pub fn is_in_or_entering_switcher(self) -> bool {
        matches!(self, ModePhase::EnteringSwitcher | ModePhase::TabSwitcher)
    }
}

/// Something observable that happened during a tick or a forced finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    PhaseChanged { from: ModePhase, to: ModePhase },
    SettleStarted,
    SettleFinished,
}

pub type ModeChanges = SmallVec<[ModeChange; 3]>;

/// Cosmetic slide-in that runs after an exit completes
#[derive(Debug, Clone)]
enum Settle {
    Idle,
    /// Waiting for the exit percent animation to finish
    Pending,
    Running(Animation),
}

#[derive(Debug, Clone, Copy)]
struct ModeTimings {
    enter_ms: f32,
    exit_ms: f32,
    exit_fade_ms: f32,
    settle_ms: f32,
    settle_distance: f32,
}

impl From<&ToolbarConfig> for ModeTimings {
    fn from(config: &ToolbarConfig) -> Self {
        Self {
            enter_ms: config.enter_switcher_duration_ms,
            exit_ms: config.exit_switcher_duration_ms,
            exit_fade_ms: config.exit_switcher_fade_duration_ms,
            settle_ms: config.settle_duration_ms,
            settle_distance: config.geometry().toolbar_height,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModeStateMachine {
    phase: ModePhase,
    percent: AnimationAxis,
    /// Show-toolbar flag of the transition in flight (or last completed)
    show_toolbar: bool,
    settle: Settle,
    timings: ModeTimings,
}

impl ModeStateMachine {
    pub fn new(config: &ToolbarConfig) -> Self {
        Self {
            phase: ModePhase::StaticTab,
            percent: AnimationAxis::new("tab_switcher_percent", AxisValue::percent(0.0)),
            show_toolbar: true,
            settle: Settle::Idle,
            timings: ModeTimings::from(config),
        }
    }

    pub fn phase(&self) -> ModePhase {
        self.phase
    }

    pub fn tab_switcher_percent(&self) -> f32 {
        self.percent.percent()
    }

    pub fn show_toolbar_during_animation(&self) -> bool {
        self.show_toolbar
    }

    /// The address field only takes focus on a static tab
    pub fn url_bar_focusable(&self) -> bool {
        self.phase == ModePhase::StaticTab
    }

    pub fn is_animating(&self) -> bool {
        !self.phase.is_stable() || !matches!(self.settle, Settle::Idle)
    }

    /// Vertical offset of the settle slide-in (0 when settled)
    pub fn settle_translation_y(&self) -> f32 {
        match &self.settle {
            Settle::Idle => 0.0,
            Settle::Pending => -self.timings.settle_distance,
            Settle::Running(animation) => animation.value(),
        }
    }

    /// Start entering the switcher
    ///
    /// Returns whether the request was accepted. Requests that would fight an
    /// in-flight exit are reported as errors.
    pub fn request_enter_switcher(&mut self, show_toolbar: bool) -> EngineResult<bool> {
        match self.phase {
            ModePhase::EnteringSwitcher | ModePhase::TabSwitcher => {
                log::debug!("Enter request ignored in {:?}", self.phase);
                return Ok(false);
            }
            ModePhase::ExitingSwitcher => {
                if show_toolbar != self.show_toolbar {
                    return Err(EngineError::ConflictingPhaseRequest {
                        phase: self.phase,
                        reason: "show-toolbar flag differs from the exit in flight",
                    });
                }
                if matches!(self.settle, Settle::Pending) {
                    return Err(EngineError::ConflictingPhaseRequest {
                        phase: self.phase,
                        reason: "a delayed settle animation is still pending",
                    });
                }
                log::debug!(
                    "Exit reversed at {:.3} by switcher entry",
                    self.percent.percent()
                );
            }
            ModePhase::StaticTab => {
                if let Settle::Running(_) = self.settle {
                    log::debug!("Settle animation cut short by switcher entry");
                }
            }
        }

        self.settle = Settle::Idle;
        self.show_toolbar = show_toolbar;
        self.set_phase(ModePhase::EnteringSwitcher);
        self.percent
            .animate_to(1.0, self.timings.enter_ms, Easing::Linear);
        Ok(true)
    }

    /// Start exiting the switcher
    ///
    /// With `delay_final_settle`, the slide-in waits for the percent
    /// animation to complete.
    pub fn request_exit_switcher(
        &mut self,
        show_toolbar: bool,
        delay_final_settle: bool,
    ) -> EngineResult<bool> {
        match self.phase {
            ModePhase::ExitingSwitcher | ModePhase::StaticTab | ModePhase::EnteringSwitcher => {
                log::debug!("Exit request ignored in {:?}", self.phase);
                Ok(false)
            }
            ModePhase::TabSwitcher => {
                self.show_toolbar = show_toolbar;
                self.settle = if delay_final_settle {
                    Settle::Pending
                } else {
                    Settle::Idle
                };
                let duration = if show_toolbar {
                    self.timings.exit_ms
                } else {
                    self.timings.exit_fade_ms
                };
                self.set_phase(ModePhase::ExitingSwitcher);
                self.percent.animate_to(0.0, duration, Easing::Linear);
                Ok(true)
            }
        }
    }

    pub fn tick(&mut self, delta_ms: f32) -> EngineResult<ModeChanges> {
        let mut changes = ModeChanges::new();

        // Settle first so one started by this tick begins next frame
        if let Settle::Running(animation) = &mut self.settle {
            animation.advance(delta_ms);
            if animation.is_complete() {
                self.settle = Settle::Idle;
                changes.push(ModeChange::SettleFinished);
            }
        }

        if self.percent.tick(delta_ms) == AxisTick::Completed {
            self.complete_transition(&mut changes)?;
        }

        Ok(changes)
    }

    /// Force every animation to its end value synchronously
    ///
    /// Idempotent: a second call finds nothing left to finish.
    pub fn finish_all_animations_immediately(&mut self) -> EngineResult<ModeChanges> {
        let mut changes = ModeChanges::new();

        if self.percent.finish() {
            self.complete_transition(&mut changes)?;
        } else if !self.phase.is_stable() {
            // Transient phase lost its animation; settle at the stable end
            self.complete_transition(&mut changes)?;
        }

        match std::mem::replace(&mut self.settle, Settle::Idle) {
            Settle::Idle => {}
            Settle::Pending | Settle::Running(_) => changes.push(ModeChange::SettleFinished),
        }

        Ok(changes)
    }

    /// The host's overview transition finished
    ///
    /// Commits a transient phase to its stable phase without waiting for the
    /// remaining frames. A deferred settle starts normally.
    pub fn on_transition_finished(&mut self) -> EngineResult<ModeChanges> {
        let mut changes = ModeChanges::new();
        if !self.phase.is_stable() {
            self.percent.finish();
            self.complete_transition(&mut changes)?;
        }
        Ok(changes)
    }

    /// Release-build recovery after a reported violation
    pub fn recover(&mut self) {
        if !self.phase.is_stable() && !self.percent.is_animating() {
            let stable = match self.phase {
                ModePhase::EnteringSwitcher => ModePhase::TabSwitcher,
                _ => ModePhase::StaticTab,
            };
            log::warn!("Recovering mode phase {:?} -> {:?}", self.phase, stable);
            self.phase = stable;
        }
    }

    fn complete_transition(&mut self, changes: &mut ModeChanges) -> EngineResult<()> {
        let from = self.phase;
        match from {
            ModePhase::EnteringSwitcher => {
                self.percent.set(AxisValue::percent(1.0));
                self.set_phase(ModePhase::TabSwitcher);
            }
            ModePhase::ExitingSwitcher => {
                self.percent.set(AxisValue::percent(0.0));
                self.set_phase(ModePhase::StaticTab);
                if matches!(self.settle, Settle::Pending) {
                    self.settle = Settle::Running(Animation::new(
                        -self.timings.settle_distance,
                        0.0,
                        self.timings.settle_ms,
                        Easing::Transform,
                    ));
                    changes.push(ModeChange::SettleStarted);
                }
            }
            ModePhase::StaticTab | ModePhase::TabSwitcher => {
                return Err(EngineError::UnreachableState(format!(
                    "switcher animation completed in stable phase {:?}",
                    from
                )));
            }
        }
        changes.insert(
            0,
            ModeChange::PhaseChanged {
                from,
                to: self.phase,
            },
        );
        Ok(())
    }

    fn set_phase(&mut self, phase: ModePhase) {
        log::debug!("Mode phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ModeStateMachine {
        ModeStateMachine::new(&ToolbarConfig::default())
    }

    fn run_to_completion(machine: &mut ModeStateMachine) {
        for _ in 0..100 {
            if !machine.is_animating() {
                return;
            }
            machine.tick(16.0).unwrap();
        }
        panic!("animation did not settle");
    }

    #[test]
    fn test_enter_reaches_switcher() {
        let mut m = machine();
        assert!(m.request_enter_switcher(true).unwrap());
        assert_eq!(m.phase(), ModePhase::EnteringSwitcher);
        assert!(m.is_animating());
        assert!(!m.url_bar_focusable());

        m.tick(100.0).unwrap();
        assert!((m.tab_switcher_percent() - 0.5).abs() < 1e-6);

        let changes = m.tick(100.0).unwrap();
        assert_eq!(m.phase(), ModePhase::TabSwitcher);
        assert_eq!(m.tab_switcher_percent(), 1.0);
        assert_eq!(
            changes.as_slice(),
            &[ModeChange::PhaseChanged {
                from: ModePhase::EnteringSwitcher,
                to: ModePhase::TabSwitcher,
            }]
        );
        assert!(!m.is_animating());
    }

    #[test]
    fn test_duplicate_enter_ignored() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        m.tick(50.0).unwrap();
        assert!(!m.request_enter_switcher(true).unwrap());
        // Not restarted
        assert!((m.tab_switcher_percent() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_exit_during_enter_is_ignored() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        m.tick(16.0).unwrap();
        assert!(!m.request_exit_switcher(true, false).unwrap());
        assert_eq!(m.phase(), ModePhase::EnteringSwitcher);

        run_to_completion(&mut m);
        assert_eq!(m.phase(), ModePhase::TabSwitcher);
    }

    #[test]
    fn test_exit_from_static_ignored() {
        let mut m = machine();
        assert!(!m.request_exit_switcher(true, true).unwrap());
        assert_eq!(m.phase(), ModePhase::StaticTab);
        assert!(!m.is_animating());
    }

    #[test]
    fn test_exit_uses_fade_duration_without_toolbar() {
        let mut m = machine();
        m.request_enter_switcher(false).unwrap();
        run_to_completion(&mut m);

        m.request_exit_switcher(false, false).unwrap();
        m.tick(50.0).unwrap();
        assert!((m.tab_switcher_percent() - 0.5).abs() < 1e-6);
        m.tick(50.0).unwrap();
        assert_eq!(m.phase(), ModePhase::StaticTab);
    }

    #[test]
    fn test_delayed_settle_starts_after_exit() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        run_to_completion(&mut m);

        m.request_exit_switcher(true, true).unwrap();
        assert_eq!(m.settle_translation_y(), -56.0);

        let changes = m.tick(250.0).unwrap();
        assert_eq!(m.phase(), ModePhase::StaticTab);
        assert!(changes.contains(&ModeChange::SettleStarted));
        // Settle still running: machine keeps animating in a stable phase
        assert!(m.is_animating());
        assert_eq!(m.settle_translation_y(), -56.0);

        let changes = m.tick(100.0).unwrap();
        assert!(changes.contains(&ModeChange::SettleFinished));
        assert_eq!(m.settle_translation_y(), 0.0);
        assert!(!m.is_animating());
    }

    #[test]
    fn test_finish_all_with_settle_still_pending() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        run_to_completion(&mut m);
        m.request_exit_switcher(true, true).unwrap();
        assert!(m.settle_translation_y() < 0.0);

        let changes = m.finish_all_animations_immediately().unwrap();
        assert!(changes.contains(&ModeChange::SettleFinished));
        assert_eq!(m.phase(), ModePhase::StaticTab);
        assert_eq!(m.settle_translation_y(), 0.0);
        assert!(!m.is_animating());
    }

    #[test]
    fn test_finish_all_is_idempotent() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        run_to_completion(&mut m);
        m.request_exit_switcher(true, true).unwrap();
        m.tick(16.0).unwrap();

        let first = m.finish_all_animations_immediately().unwrap();
        assert!(first.contains(&ModeChange::SettleFinished));
        let phase = m.phase();
        let percent = m.tab_switcher_percent();
        let settle = m.settle_translation_y();

        let second = m.finish_all_animations_immediately().unwrap();
        assert!(second.is_empty());
        assert_eq!(m.phase(), phase);
        assert_eq!(m.tab_switcher_percent(), percent);
        assert_eq!(m.settle_translation_y(), settle);
        assert_eq!(phase, ModePhase::StaticTab);
        assert!(!m.is_animating());
    }

    #[test]
    fn test_enter_with_different_flag_mid_exit_is_violation() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        run_to_completion(&mut m);
        m.request_exit_switcher(true, false).unwrap();

        let err = m.request_enter_switcher(false).unwrap_err();
        assert!(matches!(err, EngineError::ConflictingPhaseRequest { .. }));
        assert_eq!(m.phase(), ModePhase::ExitingSwitcher);
    }

    #[test]
    fn test_enter_while_settle_pending_is_violation() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        run_to_completion(&mut m);
        m.request_exit_switcher(true, true).unwrap();

        assert!(m.request_enter_switcher(true).is_err());
    }

    #[test]
    fn test_compatible_enter_mid_exit_reverses() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        run_to_completion(&mut m);
        m.request_exit_switcher(true, false).unwrap();
        m.tick(100.0).unwrap();
        let reached = m.tab_switcher_percent();
        assert!(reached > 0.0 && reached < 1.0);

        assert!(m.request_enter_switcher(true).unwrap());
        assert_eq!(m.phase(), ModePhase::EnteringSwitcher);
        assert!((m.tab_switcher_percent() - reached).abs() < 1e-6);

        run_to_completion(&mut m);
        assert_eq!(m.phase(), ModePhase::TabSwitcher);
    }

    #[test]
    fn test_enter_cuts_running_settle() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        run_to_completion(&mut m);
        m.request_exit_switcher(true, true).unwrap();
        m.tick(250.0).unwrap();
        assert!(m.is_animating());

        assert!(m.request_enter_switcher(true).unwrap());
        assert_eq!(m.settle_translation_y(), 0.0);
    }

    #[test]
    fn test_transition_finished_commits_phase() {
        let mut m = machine();
        m.request_enter_switcher(true).unwrap();
        let changes = m.on_transition_finished().unwrap();
        assert_eq!(m.phase(), ModePhase::TabSwitcher);
        assert_eq!(changes.len(), 1);

        // Nothing to do once stable
        assert!(m.on_transition_finished().unwrap().is_empty());
    }
}
