//! Visual state resolution

use serde::{Deserialize, Serialize};

use chromebar_geometry::Color;

use crate::config::ThemeColors;

/// What the toolbar is currently dressed as
///
/// Recomputed from its inputs whenever one of them changes; never stored
/// beyond the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualState {
    #[default]
    Normal,
    Incognito,
    BrandColor,
    NewTabSurfaceNormal,
    TabSwitcherNormal,
    TabSwitcherIncognito,
}

/// Inputs to visual state resolution
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VisualStateInputs {
    /// Switcher shown or being entered; exiting counts as static
    pub in_or_entering_switcher: bool,
    pub incognito: bool,
    /// Active page supplies a brand color different from the theme default
    pub has_brand_color: bool,
    /// The location bar is shown inside a scroll-linked new-tab surface
    pub location_bar_in_new_tab_surface: bool,
}

impl VisualState {
    pub fn resolve(inputs: &VisualStateInputs) -> VisualState {
        match inputs {
            VisualStateInputs {
                in_or_entering_switcher: true,
                incognito: true,
                ..
            } => VisualState::TabSwitcherIncognito,
            VisualStateInputs {
                in_or_entering_switcher: true,
                ..
            } => VisualState::TabSwitcherNormal,
            VisualStateInputs {
                location_bar_in_new_tab_surface: true,
                ..
            } => VisualState::NewTabSurfaceNormal,
            VisualStateInputs { incognito: true, .. } => VisualState::Incognito,
            VisualStateInputs {
                has_brand_color: true,
                ..
            } => VisualState::BrandColor,
            _ => VisualState::Normal,
        }
    }

    /// Brand color transitions only run between normal and branded pages
    pub fn permits_brand_transition(self) -> bool {
        matches!(self, VisualState::Normal | VisualState::BrandColor)
    }

    pub fn is_tab_switcher(self) -> bool {
        matches!(
            self,
            VisualState::TabSwitcherNormal | VisualState::TabSwitcherIncognito
        )
    }

    /// Toolbar background color for this state
    pub fn toolbar_color(self, theme: &ThemeColors, brand_color: Option<Color>) -> Color {
        match self {
            VisualState::Normal => theme.default_primary,
            VisualState::Incognito => theme.incognito_primary,
            VisualState::BrandColor => brand_color.unwrap_or(theme.default_primary),
            VisualState::NewTabSurfaceNormal => Color::transparent(),
            VisualState::TabSwitcherNormal | VisualState::TabSwitcherIncognito => {
                theme.tab_switcher_background
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> VisualStateInputs {
        VisualStateInputs::default()
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(VisualState::resolve(&inputs()), VisualState::Normal);
    }

    #[test]
    fn test_switcher_wins_over_everything() {
        let state = VisualState::resolve(&VisualStateInputs {
            in_or_entering_switcher: true,
            incognito: true,
            has_brand_color: true,
            location_bar_in_new_tab_surface: true,
        });
        assert_eq!(state, VisualState::TabSwitcherIncognito);

        let state = VisualState::resolve(&VisualStateInputs {
            in_or_entering_switcher: true,
            has_brand_color: true,
            ..inputs()
        });
        assert_eq!(state, VisualState::TabSwitcherNormal);
    }

    #[test]
    fn test_new_tab_surface_before_incognito() {
        let state = VisualState::resolve(&VisualStateInputs {
            incognito: true,
            location_bar_in_new_tab_surface: true,
            ..inputs()
        });
        assert_eq!(state, VisualState::NewTabSurfaceNormal);
    }

    #[test]
    fn test_incognito_hides_brand() {
        let state = VisualState::resolve(&VisualStateInputs {
            incognito: true,
            has_brand_color: true,
            ..inputs()
        });
        assert_eq!(state, VisualState::Incognito);
    }

    #[test]
    fn test_brand_transition_permission() {
        assert!(VisualState::Normal.permits_brand_transition());
        assert!(VisualState::BrandColor.permits_brand_transition());
        assert!(!VisualState::Incognito.permits_brand_transition());
        assert!(!VisualState::NewTabSurfaceNormal.permits_brand_transition());
        assert!(!VisualState::TabSwitcherNormal.permits_brand_transition());
    }

    #[test]
    fn test_toolbar_color() {
        let theme = ThemeColors::default();
        let brand = Color::rgb(200, 30, 30);
        assert_eq!(VisualState::BrandColor.toolbar_color(&theme, Some(brand)), brand);
        assert_eq!(
            VisualState::BrandColor.toolbar_color(&theme, None),
            theme.default_primary
        );
        assert!(VisualState::NewTabSurfaceNormal
            .toolbar_color(&theme, None)
            .is_transparent());
    }
}
