//! Animation axes
//!
//! A percent value in [0, 1] that owns at most one running animation.

use serde::{Deserialize, Serialize};

use chromebar_geometry::{clamp_percent, Easing};

use crate::animation::Animation;

/// Value of an axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisValue {
    /// No scroll-linked surface is attached; contributes nothing
    Uninitialized,
    Percent(f32),
}

impl AxisValue {
    /// Clamped percent value
    pub fn percent(p: f32) -> Self {
        AxisValue::Percent(clamp_percent(p))
    }

    pub fn as_percent(&self) -> Option<f32> {
        match self {
            AxisValue::Uninitialized => None,
            AxisValue::Percent(p) => Some(*p),
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self, AxisValue::Percent(_))
    }
}

/// Result of advancing an axis by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisTick {
    /// Nothing was running
    Idle,
    /// The value moved and the animation continues
    Running,
    /// The animation reached its target this frame
    Completed,
}

/// One animated percent
#[derive(Debug, Clone)]
pub struct AnimationAxis {
    name: &'static str,
    value: AxisValue,
    animation: Option<Animation>,
}

impl AnimationAxis {
    pub fn new(name: &'static str, value: AxisValue) -> Self {
        Self {
            name,
            value,
            animation: None,
        }
    }

    pub fn value(&self) -> AxisValue {
        self.value
    }

    /// Current percent, treating `Uninitialized` as 0
    pub fn percent(&self) -> f32 {
        self.value.as_percent().unwrap_or(0.0)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Animation target, if one is running
    pub fn target(&self) -> Option<f32> {
        self.animation.as_ref().map(|a| a.to)
    }

    /// Set the value directly, cancelling any running animation
    pub fn set(&mut self, value: AxisValue) {
        self.cancel();
        self.value = match value {
            AxisValue::Percent(p) => AxisValue::percent(p),
            AxisValue::Uninitialized => AxisValue::Uninitialized,
        };
    }

    /// Start animating from the current value toward `target`
    ///
    /// Any animation already driving this axis is cancelled first.
    pub fn animate_to(&mut self, target: f32, duration_ms: f32, easing: Easing) {
        self.animate_to_with_delay(target, duration_ms, 0.0, easing);
    }

    pub fn animate_to_with_delay(
        &mut self,
        target: f32,
        duration_ms: f32,
        delay_ms: f32,
        easing: Easing,
    ) {
        self.cancel();
        let target = clamp_percent(target);
        let from = self.percent();
        log::debug!(
            "{}: animating {:.3} -> {:.3} over {}ms",
            self.name,
            from,
            target,
            duration_ms
        );
        self.animation = Some(Animation::new(from, target, duration_ms, easing).with_delay(delay_ms));
    }

    /// Drop the running animation, leaving the value where it is
    pub fn cancel(&mut self) {
        if let Some(animation) = self.animation.take() {
            log::debug!(
                "{}: cancelled animation toward {:.3} at {:.3}",
                self.name,
                animation.to,
                self.percent()
            );
        }
    }

    pub fn tick(&mut self, delta_ms: f32) -> AxisTick {
        let Some(animation) = self.animation.as_mut() else {
            return AxisTick::Idle;
        };
        let value = animation.advance(delta_ms);
        let complete = animation.is_complete();
        self.value = AxisValue::percent(value);
        log::trace!("{}: {:.3}", self.name, value);
        if complete {
            self.animation = None;
            AxisTick::Completed
        } else {
            AxisTick::Running
        }
    }

    /// Jump a running animation to its end value
    ///
    /// Returns true when an animation was finished.
    pub fn finish(&mut self) -> bool {
        match self.animation.take() {
            Some(mut animation) => {
                self.value = AxisValue::percent(animation.finish());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clamps() {
        let mut axis = AnimationAxis::new("test", AxisValue::percent(0.0));
        axis.set(AxisValue::Percent(1.7));
        assert_eq!(axis.value(), AxisValue::Percent(1.0));
        axis.set(AxisValue::Percent(-3.0));
        assert_eq!(axis.value(), AxisValue::Percent(0.0));
    }

    #[test]
    fn test_uninitialized_is_distinct_from_zero() {
        let axis = AnimationAxis::new("ntp", AxisValue::Uninitialized);
        assert_ne!(axis.value(), AxisValue::Percent(0.0));
        assert!(!axis.value().is_initialized());
        assert_eq!(axis.percent(), 0.0);
    }

    #[test]
    fn test_animate_and_complete() {
        let mut axis = AnimationAxis::new("test", AxisValue::percent(0.0));
        axis.animate_to(1.0, 200.0, Easing::Linear);
        assert!(axis.is_animating());

        assert_eq!(axis.tick(100.0), AxisTick::Running);
        assert!((axis.percent() - 0.5).abs() < 1e-6);

        assert_eq!(axis.tick(100.0), AxisTick::Completed);
        assert_eq!(axis.percent(), 1.0);
        assert!(!axis.is_animating());
        assert_eq!(axis.tick(16.0), AxisTick::Idle);
    }

    #[test]
    fn test_new_animation_replaces_old() {
        let mut axis = AnimationAxis::new("test", AxisValue::percent(0.0));
        axis.animate_to(1.0, 200.0, Easing::Linear);
        axis.tick(100.0);
        axis.animate_to(0.0, 100.0, Easing::Linear);
        assert_eq!(axis.target(), Some(0.0));

        // Starts from where the first one was interrupted
        axis.tick(50.0);
        assert!((axis.percent() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_direct_set_cancels() {
        let mut axis = AnimationAxis::new("test", AxisValue::percent(0.0));
        axis.animate_to(1.0, 200.0, Easing::Linear);
        axis.set(AxisValue::percent(0.3));
        assert!(!axis.is_animating());
        assert_eq!(axis.tick(100.0), AxisTick::Idle);
        assert_eq!(axis.percent(), 0.3);
    }

    #[test]
    fn test_finish() {
        let mut axis = AnimationAxis::new("test", AxisValue::percent(1.0));
        axis.animate_to(0.0, 200.0, Easing::Transform);
        assert!(axis.finish());
        assert_eq!(axis.percent(), 0.0);
        assert!(!axis.finish());
    }
}
