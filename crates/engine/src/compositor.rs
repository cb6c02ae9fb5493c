//! Bounds & background compositor
//!
//! Pure per-frame computation of the location bar rectangle, its background
//! alpha and the clip regions of the views beside it. Holds no state; the
//! result is a function of the snapshot passed in.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use chromebar_geometry::{lerp_alpha, lerp_rect, Color, Rect};

use crate::config::DeviceGeometry;
use crate::mode::ModePhase;
use crate::visual_state::VisualState;

/// Clip regions stay inline up to this many siblings
pub const MAX_INLINE_SIBLINGS: usize = 4;

/// Views laid out beside the location bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiblingKind {
    HomeButton,
    NavigationButton,
    TabSwitcherButton,
    MenuButton,
}

impl SiblingKind {
    /// Buttons in the row that collapses when the field is fully expanded
    fn in_button_row(self) -> bool {
        matches!(self, SiblingKind::TabSwitcherButton | SiblingKind::MenuButton)
    }
}

/// A sibling view and its laid-out bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sibling {
    pub kind: SiblingKind,
    pub bounds: Rect,
}

/// Region a sibling may paint into this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChildClip {
    pub kind: SiblingKind,
    pub clip: Rect,
    /// Nothing of the sibling is visible
    pub hidden: bool,
}

/// Location bar rectangle plus the scroll-linked surface offset on top
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LocationBarBounds {
    pub base: Rect,
    pub ntp_offset: Rect,
}

impl LocationBarBounds {
    /// On-screen rectangle
    pub fn visible(&self) -> Rect {
        self.base.offset_by(&self.ntp_offset)
    }
}

/// Snapshot of everything a frame's geometry depends on
#[derive(Debug, Clone, Copy)]
pub struct CompositorInput<'a> {
    pub expansion_percent: f32,
    pub mode_phase: ModePhase,
    pub tab_switcher_percent: f32,
    pub collapsed_bounds: Rect,
    pub expanded_bounds: Rect,
    /// Offset toward the new-tab search box; `None` when no surface is attached
    pub ntp_offset: Option<Rect>,
    pub visual_state: VisualState,
    pub brand_color: Option<Color>,
    /// Alpha written by a running brand color transition
    pub brand_alpha_override: Option<u8>,
    pub transparent_alpha: u8,
    pub geometry: DeviceGeometry,
    pub siblings: &'a [Sibling],
}

/// Computed geometry for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameGeometry {
    pub location_bar: LocationBarBounds,
    pub background_alpha: u8,
    pub child_clips: SmallVec<[ChildClip; MAX_INLINE_SIBLINGS]>,
    /// Alpha of the views shown while browsing a tab
    pub browsing_alpha: f32,
    /// Alpha of the views shown in the tab switcher
    pub switcher_alpha: f32,
}

pub fn compute_bounds(input: &CompositorInput<'_>) -> FrameGeometry {
    if input.mode_phase != ModePhase::StaticTab {
        return switcher_layout(input);
    }

    let expansion = input.expansion_percent;
    let base = lerp_rect(&input.collapsed_bounds, &input.expanded_bounds, expansion);
    let ntp_offset = input
        .ntp_offset
        .map(|offset| offset.scaled(1.0 - expansion))
        .unwrap_or_else(Rect::zero);
    let location_bar = LocationBarBounds { base, ntp_offset };

    let visible = location_bar.visible();
    let hide_button_row = input.geometry.hides_buttons_when_expanded && expansion >= 1.0;
    let child_clips = input
        .siblings
        .iter()
        .map(|sibling| {
            let clip = clip_beside(&sibling.bounds, &visible);
            ChildClip {
                kind: sibling.kind,
                clip,
                hidden: clip.is_empty() || (hide_button_row && sibling.kind.in_button_row()),
            }
        })
        .collect();

    FrameGeometry {
        location_bar,
        background_alpha: background_alpha(input),
        child_clips,
        browsing_alpha: 1.0,
        switcher_alpha: 0.0,
    }
}

/// Overview elements are driven by the switcher percent alone
fn switcher_layout(input: &CompositorInput<'_>) -> FrameGeometry {
    let p = input.tab_switcher_percent;
    FrameGeometry {
        location_bar: LocationBarBounds {
            base: input.collapsed_bounds,
            ntp_offset: Rect::zero(),
        },
        background_alpha: input.transparent_alpha,
        child_clips: SmallVec::new(),
        browsing_alpha: 1.0 - p,
        switcher_alpha: p,
    }
}

fn background_alpha(input: &CompositorInput<'_>) -> u8 {
    if let Some(alpha) = input.brand_alpha_override {
        return alpha;
    }
    let expansion = input.expansion_percent;
    match input.visual_state {
        VisualState::Normal => 255,
        VisualState::Incognito
        | VisualState::TabSwitcherNormal
        | VisualState::TabSwitcherIncognito => input.transparent_alpha,
        VisualState::NewTabSurfaceNormal => {
            // The surface's own search box shows until expansion starts
            if expansion > 0.0 {
                255
            } else {
                0
            }
        }
        VisualState::BrandColor => match input.brand_color {
            Some(color) if !color.should_use_opaque_textbox_background() => {
                lerp_alpha(input.transparent_alpha, 255, expansion)
            }
            _ => 255,
        },
    }
}

/// Clip a sibling against the side of the field it sits on
fn clip_beside(sibling: &Rect, field: &Rect) -> Rect {
    if sibling.center_x() < field.center_x() {
        Rect::new(
            sibling.left,
            sibling.top,
            sibling.right.min(field.left),
            sibling.bottom,
        )
    } else {
        Rect::new(
            sibling.left.max(field.right),
            sibling.top,
            sibling.right,
            sibling.bottom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormFactor, LOCATION_BAR_TRANSPARENT_BACKGROUND_ALPHA};

    const COLLAPSED: Rect = Rect::new(50.0, 0.0, 250.0, 40.0);
    const EXPANDED: Rect = Rect::new(0.0, 0.0, 300.0, 40.0);

    fn input(expansion: f32) -> CompositorInput<'static> {
        CompositorInput {
            expansion_percent: expansion,
            mode_phase: ModePhase::StaticTab,
            tab_switcher_percent: 0.0,
            collapsed_bounds: COLLAPSED,
            expanded_bounds: EXPANDED,
            ntp_offset: None,
            visual_state: VisualState::Normal,
            brand_color: None,
            brand_alpha_override: None,
            transparent_alpha: LOCATION_BAR_TRANSPARENT_BACKGROUND_ALPHA,
            geometry: FormFactor::Phone.geometry(),
            siblings: &[],
        }
    }

    #[test]
    fn test_collapsed_and_expanded_endpoints() {
        assert_eq!(compute_bounds(&input(0.0)).location_bar.visible(), COLLAPSED);
        assert_eq!(compute_bounds(&input(1.0)).location_bar.visible(), EXPANDED);
    }

    #[test]
    fn test_left_edge_is_monotone() {
        let mut previous = f32::INFINITY;
        for i in 0..=20 {
            let p = i as f32 / 20.0;
            let left = compute_bounds(&input(p)).location_bar.visible().left;
            assert!(left <= previous, "left edge grew at p={}", p);
            previous = left;
        }
    }

    #[test]
    fn test_full_expansion_drops_ntp_offset() {
        let frame = compute_bounds(&CompositorInput {
            ntp_offset: Some(Rect::new(10.0, 0.0, -10.0, 0.0)),
            ..input(1.0)
        });
        assert_eq!(frame.location_bar.ntp_offset, Rect::zero());
        assert_eq!(frame.location_bar.visible(), EXPANDED);
    }

    #[test]
    fn test_ntp_offset_applies_when_collapsed() {
        let frame = compute_bounds(&CompositorInput {
            ntp_offset: Some(Rect::new(10.0, 0.0, -10.0, 0.0)),
            ..input(0.0)
        });
        assert_eq!(frame.location_bar.visible(), Rect::new(60.0, 0.0, 240.0, 40.0));
    }

    #[test]
    fn test_switcher_layout_follows_percent() {
        let frame = compute_bounds(&CompositorInput {
            mode_phase: ModePhase::EnteringSwitcher,
            tab_switcher_percent: 0.25,
            ..input(1.0)
        });
        assert_eq!(frame.browsing_alpha, 0.75);
        assert_eq!(frame.switcher_alpha, 0.25);
        assert_eq!(frame.background_alpha, LOCATION_BAR_TRANSPARENT_BACKGROUND_ALPHA);
        assert!(frame.child_clips.is_empty());
    }

    #[test]
    fn test_background_alpha_rules() {
        assert_eq!(compute_bounds(&input(0.0)).background_alpha, 255);

        let incognito = CompositorInput {
            visual_state: VisualState::Incognito,
            ..input(1.0)
        };
        assert_eq!(compute_bounds(&incognito).background_alpha, 51);

        let dark_brand = |p| CompositorInput {
            visual_state: VisualState::BrandColor,
            brand_color: Some(Color::rgb(20, 40, 120)),
            ..input(p)
        };
        assert_eq!(compute_bounds(&dark_brand(0.0)).background_alpha, 51);
        assert_eq!(compute_bounds(&dark_brand(1.0)).background_alpha, 255);
        let mid = compute_bounds(&dark_brand(0.5)).background_alpha;
        assert!(mid > 51 && mid < 255);

        let light_brand = CompositorInput {
            visual_state: VisualState::BrandColor,
            brand_color: Some(Color::rgb(250, 250, 250)),
            ..input(0.0)
        };
        assert_eq!(compute_bounds(&light_brand).background_alpha, 255);
    }

    #[test]
    fn test_new_tab_surface_alpha() {
        let ntp = |p| CompositorInput {
            visual_state: VisualState::NewTabSurfaceNormal,
            ..input(p)
        };
        assert_eq!(compute_bounds(&ntp(0.0)).background_alpha, 0);
        assert_eq!(compute_bounds(&ntp(0.1)).background_alpha, 255);
    }

    #[test]
    fn test_brand_transition_alpha_wins() {
        let frame = compute_bounds(&CompositorInput {
            brand_alpha_override: Some(120),
            ..input(0.0)
        });
        assert_eq!(frame.background_alpha, 120);
    }

    #[test]
    fn test_child_clips_exclude_field() {
        let siblings = [
            Sibling {
                kind: SiblingKind::HomeButton,
                bounds: Rect::new(0.0, 0.0, 48.0, 40.0),
            },
            Sibling {
                kind: SiblingKind::MenuButton,
                bounds: Rect::new(252.0, 0.0, 300.0, 40.0),
            },
        ];
        let half = CompositorInput {
            siblings: &siblings,
            ..input(0.5)
        };
        let frame = compute_bounds(&half);
        // Field spans 25..275 at half expansion
        assert_eq!(frame.child_clips[0].clip, Rect::new(0.0, 0.0, 25.0, 40.0));
        assert_eq!(frame.child_clips[1].clip, Rect::new(275.0, 0.0, 300.0, 40.0));
        assert!(!frame.child_clips[0].hidden);

        let full = CompositorInput {
            siblings: &siblings,
            ..input(1.0)
        };
        let frame = compute_bounds(&full);
        assert!(frame.child_clips.iter().all(|c| c.hidden));
        assert!(!frame.child_clips.spilled());
    }
}
