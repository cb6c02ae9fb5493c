//! Brand color transition animator
//!
//! Owns the rendered toolbar color and, while a transition runs, the location
//! bar background alpha. At most one transition is in flight; a new brand
//! color cancels the old transition instead of queueing behind it.

use chromebar_geometry::{apply_easing, lerp_alpha, lerp_color, Color, Easing};

use crate::animation::Animation;
use crate::visual_state::VisualState;

/// One in-flight color/alpha blend
#[derive(Debug, Clone)]
pub struct BrandColorTransition {
    pub initial_color: Color,
    pub final_color: Color,
    pub initial_alpha: u8,
    pub final_alpha: u8,
    /// Engine clock time the transition started at
    pub start_ms: f64,
    pub duration_ms: f32,
    progress: Animation,
}

impl BrandColorTransition {
    pub fn is_active(&self) -> bool {
        !self.progress.is_complete()
    }

    fn fraction(&self) -> f32 {
        apply_easing(self.progress.progress(), Easing::Transform)
    }
}

/// What a brand color change did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandChange {
    /// Target already rendered; nothing to animate
    Unchanged,
    /// Color written without animation
    Applied,
    /// A transition is now running
    Started,
}

#[derive(Debug)]
pub struct BrandColorAnimator {
    current_color: Color,
    current_alpha: Option<u8>,
    transition: Option<BrandColorTransition>,
    duration_ms: f32,
    transparent_alpha: u8,
}

impl BrandColorAnimator {
    pub fn new(initial_color: Color, duration_ms: f32, transparent_alpha: u8) -> Self {
        Self {
            current_color: initial_color,
            current_alpha: None,
            transition: None,
            duration_ms,
            transparent_alpha,
        }
    }

    /// Color currently rendered in the toolbar background
    pub fn current_color(&self) -> Color {
        self.current_color
    }

    /// Location bar alpha while a transition owns it
    pub fn alpha_override(&self) -> Option<u8> {
        self.current_alpha
    }

    pub fn transition(&self) -> Option<&BrandColorTransition> {
        self.transition.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Write a color outside of any transition
    pub fn set_color(&mut self, color: Color) {
        self.current_color = color;
    }

    /// React to the active page's brand color changing
    ///
    /// `rendered_alpha` is the location bar alpha on screen right now and
    /// becomes the starting alpha of the blend.
    pub fn on_brand_color_changed(
        &mut self,
        new_color: Color,
        animate: bool,
        visual_state: VisualState,
        rendered_alpha: u8,
        now_ms: f64,
    ) -> BrandChange {
        self.cancel();

        let initial_color = self.current_color;
        if initial_color == new_color {
            return BrandChange::Unchanged;
        }

        if !animate || !visual_state.permits_brand_transition() {
            self.current_color = new_color;
            return BrandChange::Applied;
        }

        let final_alpha = if new_color.should_use_opaque_textbox_background() {
            255
        } else {
            self.transparent_alpha
        };
        log::debug!(
            "Brand color transition {:?} -> {:?} (alpha {} -> {})",
            initial_color,
            new_color,
            rendered_alpha,
            final_alpha
        );
        self.transition = Some(BrandColorTransition {
            initial_color,
            final_color: new_color,
            initial_alpha: rendered_alpha,
            final_alpha,
            start_ms: now_ms,
            duration_ms: self.duration_ms,
            progress: Animation::new(0.0, 1.0, self.duration_ms, Easing::Linear),
        });
        self.current_alpha = Some(rendered_alpha);
        BrandChange::Started
    }

    /// Advance the running transition
    ///
    /// Returns true on the frame the transition completes.
    pub fn tick(&mut self, delta_ms: f32) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        transition.progress.advance(delta_ms);
        let fraction = transition.fraction();
        self.current_color =
            lerp_color(transition.initial_color, transition.final_color, fraction);
        self.current_alpha = Some(lerp_alpha(
            transition.initial_alpha,
            transition.final_alpha,
            fraction,
        ));
        log::trace!("Brand color {:?} ({:.3})", self.current_color, fraction);

        if transition.is_active() {
            return false;
        }
        self.transition = None;
        self.current_alpha = None;
        true
    }

    /// Jump a running transition to its final color
    pub fn finish(&mut self) -> bool {
        match self.transition.take() {
            Some(transition) => {
                self.current_color = transition.final_color;
                self.current_alpha = None;
                true
            }
            None => false,
        }
    }

    /// Stop a running transition where it is
    pub fn cancel(&mut self) {
        if self.transition.take().is_some() {
            log::debug!("Brand color transition cancelled at {:?}", self.current_color);
            self.current_alpha = None;
        }
    }
}
