//! Time-based animations
//!
//! An [`Animation`] interpolates one scalar over a wall-clock duration. It is
//! advanced by the host's frame tick and never runs on its own.

use tokio_util::sync::CancellationToken;

use chromebar_geometry::{apply_easing, lerp, Easing};

/// A single scalar animation
#[derive(Debug, Clone)]
pub struct Animation {
    /// Starting value
    pub from: f32,
    /// Target value
    pub to: f32,
    /// Duration in milliseconds
    pub duration_ms: f32,
    /// Delay before starting in milliseconds
    pub delay_ms: f32,
    /// Elapsed time in milliseconds
    pub elapsed_ms: f32,
    /// Easing function
    pub easing: Easing,
}

impl Animation {
    pub fn new(from: f32, to: f32, duration_ms: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms,
            delay_ms: 0.0,
            elapsed_ms: 0.0,
            easing,
        }
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Get the progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        let active_elapsed = (self.elapsed_ms - self.delay_ms).max(0.0);
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (active_elapsed / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Calculate current interpolated value
    pub fn value(&self) -> f32 {
        if self.is_complete() {
            return self.to;
        }
        lerp(self.from, self.to, apply_easing(self.progress(), self.easing))
    }

    /// Check if animation is still in delay phase
    pub fn is_delayed(&self) -> bool {
        self.elapsed_ms < self.delay_ms
    }

    /// Check if animation is complete
    pub fn is_complete(&self) -> bool {
        self.elapsed_ms >= self.delay_ms + self.duration_ms
    }

    /// Advance by `delta_ms`, returning the new value
    pub fn advance(&mut self, delta_ms: f32) -> f32 {
        self.elapsed_ms += delta_ms.max(0.0);
        self.value()
    }

    /// Jump to the end value
    pub fn finish(&mut self) -> f32 {
        self.elapsed_ms = self.delay_ms + self.duration_ms;
        self.to
    }
}

/// Handle to a running animation batch
///
/// Cloning shares the underlying token, so a collaborator holding a clone can
/// cancel a batch the engine is still driving. Cancellation is observed on
/// the next tick, before any further value is written.
#[derive(Debug, Clone, Default)]
pub struct AnimationHandle {
    token: CancellationToken,
}

impl AnimationHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
