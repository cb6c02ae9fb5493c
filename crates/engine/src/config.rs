//! Toolbar configuration
//!
//! Timing constants, theme colors and the per-form-factor geometry table.

use serde::{Deserialize, Serialize};

use chromebar_geometry::Color;

use crate::error::{EngineError, EngineResult};

/// Alpha of the location bar background over dark or incognito toolbars
pub const LOCATION_BAR_TRANSPARENT_BACKGROUND_ALPHA: u8 = 51;

/// Device class the toolbar is laid out for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    #[default]
    Phone,
    Tablet,
}

/// Device-specific geometry constants injected into layout computations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceGeometry {
    /// Height of the toolbar, and so the distance of the settle slide-in
    pub toolbar_height: f32,
    /// Horizontal distance the menu and tab-switcher buttons slide on focus
    pub focus_button_translation_dp: f32,
    /// Whether the button row disappears once the field is fully expanded
    pub hides_buttons_when_expanded: bool,
}

impl FormFactor {
    pub fn geometry(self) -> DeviceGeometry {
        match self {
            FormFactor::Phone => DeviceGeometry {
                toolbar_height: 56.0,
                focus_button_translation_dp: 10.0,
                hides_buttons_when_expanded: true,
            },
            FormFactor::Tablet => DeviceGeometry {
                toolbar_height: 64.0,
                focus_button_translation_dp: 0.0,
                hides_buttons_when_expanded: false,
            },
        }
    }
}

/// Toolbar colors per theme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub default_primary: Color,
    pub incognito_primary: Color,
    pub tab_switcher_background: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            default_primary: Color::rgb(242, 242, 242),
            incognito_primary: Color::rgb(80, 80, 80),
            tab_switcher_background: Color::rgb(66, 66, 66),
        }
    }
}

/// Toolbar engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    pub form_factor: FormFactor,
    /// Display density (pixels per dp)
    pub density: f32,
    pub enter_switcher_duration_ms: f32,
    /// Exit duration when the toolbar animates in with the switcher
    pub exit_switcher_duration_ms: f32,
    /// Exit duration when the toolbar just fades
    pub exit_switcher_fade_duration_ms: f32,
    pub settle_duration_ms: f32,
    pub url_focus_duration_ms: f32,
    pub toolbar_buttons_duration_ms: f32,
    pub clear_focus_menu_delay_ms: f32,
    pub clear_focus_tab_stack_delay_ms: f32,
    pub brand_color_duration_ms: f32,
    pub transparent_background_alpha: u8,
    pub theme: ThemeColors,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            form_factor: FormFactor::Phone,
            density: 1.0,
            enter_switcher_duration_ms: 200.0,
            exit_switcher_duration_ms: 250.0,
            exit_switcher_fade_duration_ms: 100.0,
            settle_duration_ms: 100.0,
            url_focus_duration_ms: 225.0,
            toolbar_buttons_duration_ms: 100.0,
            clear_focus_menu_delay_ms: 250.0,
            clear_focus_tab_stack_delay_ms: 200.0,
            brand_color_duration_ms: 250.0,
            transparent_background_alpha: LOCATION_BAR_TRANSPARENT_BACKGROUND_ALPHA,
            theme: ThemeColors::default(),
        }
    }
}

impl ToolbarConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: ToolbarConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn geometry(&self) -> DeviceGeometry {
        self.form_factor.geometry()
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "density must be positive, got {}",
                self.density
            )));
        }

        let durations = [
            ("enter_switcher_duration_ms", self.enter_switcher_duration_ms),
            ("exit_switcher_duration_ms", self.exit_switcher_duration_ms),
            ("exit_switcher_fade_duration_ms", self.exit_switcher_fade_duration_ms),
            ("settle_duration_ms", self.settle_duration_ms),
            ("url_focus_duration_ms", self.url_focus_duration_ms),
            ("toolbar_buttons_duration_ms", self.toolbar_buttons_duration_ms),
            ("clear_focus_menu_delay_ms", self.clear_focus_menu_delay_ms),
            ("clear_focus_tab_stack_delay_ms", self.clear_focus_tab_stack_delay_ms),
            ("brand_color_duration_ms", self.brand_color_duration_ms),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be a non-negative number of milliseconds, got {}",
                    name, value
                )));
            }
        }

        // Entering is the latency-sensitive direction
        if self.enter_switcher_duration_ms > self.exit_switcher_duration_ms {
            return Err(EngineError::InvalidConfig(format!(
                "enter duration ({}ms) must not exceed exit duration ({}ms)",
                self.enter_switcher_duration_ms, self.exit_switcher_duration_ms
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ToolbarConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.enter_switcher_duration_ms < config.exit_switcher_duration_ms);
        assert_eq!(config.brand_color_duration_ms, 250.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ToolbarConfig::from_json(r#"{ "form_factor": "tablet", "density": 2.0 }"#).unwrap();
        assert_eq!(config.form_factor, FormFactor::Tablet);
        assert_eq!(config.density, 2.0);
        assert_eq!(config.url_focus_duration_ms, 225.0);
        assert_eq!(config.theme, ThemeColors::default());
    }

    #[test]
    fn test_rejects_bad_density() {
        let err = ToolbarConfig::from_json(r#"{ "density": 0.0 }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_slow_enter() {
        let err = ToolbarConfig::from_json(r#"{ "enter_switcher_duration_ms": 400.0 }"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = ToolbarConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn test_form_factor_geometry() {
        assert!(FormFactor::Phone.geometry().hides_buttons_when_expanded);
        assert!(!FormFactor::Tablet.geometry().hides_buttons_when_expanded);
    }
}
