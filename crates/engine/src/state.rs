//! Toolbar presentation state
//!
//! All mutable presentation state lives here, owned by the facade and lent
//! to the components. Nothing is read from anywhere else.

use smallvec::SmallVec;
use url::Url;

use chromebar_geometry::{Color, Rect};

use crate::brand::BrandColorAnimator;
use crate::compositor::{CompositorInput, Sibling, MAX_INLINE_SIBLINGS};
use crate::config::ToolbarConfig;
use crate::event::SecurityLevel;
use crate::expansion::ExpansionCoordinator;
use crate::mode::ModeStateMachine;
use crate::visual_state::{VisualState, VisualStateInputs};

/// Reference geometry supplied by the host layout
#[derive(Debug, Clone, Default)]
pub struct HostLayout {
    pub collapsed: Rect,
    pub expanded: Rect,
    pub siblings: SmallVec<[Sibling; MAX_INLINE_SIBLINGS]>,
    pub rtl: bool,
}

/// What the toolbar knows about the active tab
#[derive(Debug, Clone, Default)]
pub struct TabSnapshot {
    pub url: Option<Url>,
    pub title: String,
    pub load_progress: f32,
    pub loading: bool,
    pub security: SecurityLevel,
    pub is_native_page: bool,
    pub last_error: Option<String>,
}

/// A scroll-linked new-tab surface attached to the active tab
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewTabSurface {
    pub search_box: Rect,
}

/// Saved while texture capture mode is on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureCapture {
    pub pre_capture_alpha: f32,
}

#[derive(Debug)]
pub struct ToolbarPresentationState {
    pub mode: ModeStateMachine,
    pub expansion: ExpansionCoordinator,
    pub brand: BrandColorAnimator,
    pub visual_state: VisualState,
    pub incognito: bool,
    /// Brand color of the active page, if it differs from the theme default
    pub brand_color: Option<Color>,
    pub new_tab_surface: Option<NewTabSurface>,
    pub layout: HostLayout,
    pub tab: TabSnapshot,
    pub tab_count: usize,
    pub texture_capture: Option<TextureCapture>,
    pub toolbar_alpha: f32,
    /// Engine clock, advanced by frame ticks
    pub clock_ms: f64,
}

impl ToolbarPresentationState {
    pub fn new(config: &ToolbarConfig) -> Self {
        Self {
            mode: ModeStateMachine::new(config),
            expansion: ExpansionCoordinator::new(config),
            brand: BrandColorAnimator::new(
                config.theme.default_primary,
                config.brand_color_duration_ms,
                config.transparent_background_alpha,
            ),
            visual_state: VisualState::Normal,
            incognito: false,
            brand_color: None,
            new_tab_surface: None,
            layout: HostLayout::default(),
            tab: TabSnapshot::default(),
            tab_count: 0,
            texture_capture: None,
            toolbar_alpha: 1.0,
            clock_ms: 0.0,
        }
    }

    pub fn visual_state_inputs(&self) -> VisualStateInputs {
        VisualStateInputs {
            in_or_entering_switcher: self.mode.phase().is_in_or_entering_switcher(),
            incognito: self.incognito,
            has_brand_color: self.brand_color.is_some(),
            location_bar_in_new_tab_surface: self.new_tab_surface.is_some(),
        }
    }

    /// Offset from the collapsed field to the new-tab search box
    pub fn ntp_offset(&self) -> Option<Rect> {
        self.new_tab_surface
            .map(|surface| surface.search_box.delta_from(&self.layout.collapsed))
    }

    pub fn compositor_input<'a>(&'a self, config: &ToolbarConfig) -> CompositorInput<'a> {
        CompositorInput {
            expansion_percent: self.expansion.expansion_percent(),
            mode_phase: self.mode.phase(),
            tab_switcher_percent: self.mode.tab_switcher_percent(),
            collapsed_bounds: self.layout.collapsed,
            expanded_bounds: self.layout.expanded,
            ntp_offset: self.ntp_offset(),
            visual_state: self.visual_state,
            brand_color: self.brand_color,
            brand_alpha_override: self.brand.alpha_override(),
            transparent_alpha: config.transparent_background_alpha,
            geometry: config.geometry(),
            siblings: &self.layout.siblings,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.mode.is_animating() || self.expansion.is_animating() || self.brand.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntp_offset_relative_to_collapsed() {
        let mut state = ToolbarPresentationState::new(&ToolbarConfig::default());
        state.layout.collapsed = Rect::new(50.0, 0.0, 250.0, 40.0);
        assert_eq!(state.ntp_offset(), None);

        state.new_tab_surface = Some(NewTabSurface {
            search_box: Rect::new(60.0, 100.0, 240.0, 140.0),
        });
        assert_eq!(
            state.ntp_offset(),
            Some(Rect::new(10.0, 100.0, -10.0, 100.0))
        );
    }

    #[test]
    fn test_new_tab_surface_resolves_ahead_of_incognito() {
        let mut state = ToolbarPresentationState::new(&ToolbarConfig::default());
        state.incognito = true;
        assert_eq!(
            VisualState::resolve(&state.visual_state_inputs()),
            VisualState::Incognito
        );

        state.new_tab_surface = Some(NewTabSurface {
            search_box: Rect::zero(),
        });
        assert!(state.visual_state_inputs().location_bar_in_new_tab_surface);
        assert_eq!(
            VisualState::resolve(&state.visual_state_inputs()),
            VisualState::NewTabSurfaceNormal
        );
    }
}
