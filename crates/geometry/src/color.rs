//! Toolbar colors
//!
//! RGBA color plus the contrast rules that decide between opaque and
//! translucent location bar backgrounds and between light and dark drawables.

use serde::{Deserialize, Serialize};

/// HSL lightness above which a brand color needs an opaque text box
pub const OPAQUE_TEXTBOX_LIGHTNESS_THRESHOLD: f32 = 0.82;

/// Minimum contrast with white for light foreground drawables
pub const LIGHT_FOREGROUND_CONTRAST_THRESHOLD: f32 = 3.0;

/// Color (RGBA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Check if color is fully transparent
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse a hex color string (with or without a leading `#`)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// HSL lightness in [0, 1]
    pub fn lightness(&self) -> f32 {
        let max = self.r.max(self.g).max(self.b) as f32 / 255.0;
        let min = self.r.min(self.g).min(self.b) as f32 / 255.0;
        (max + min) / 2.0
    }

    /// WCAG relative luminance in [0, 1]
    pub fn relative_luminance(&self) -> f32 {
        fn linear(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// WCAG contrast ratio between two colors, in [1, 21]
    pub fn contrast_ratio(&self, other: &Color) -> f32 {
        let a = self.relative_luminance() + 0.05;
        let b = other.relative_luminance() + 0.05;
        a.max(b) / a.min(b)
    }

    /// Light brand colors need an opaque location bar background to keep the
    /// URL text readable; darker ones get the translucent one.
    pub fn should_use_opaque_textbox_background(&self) -> bool {
        self.lightness() > OPAQUE_TEXTBOX_LIGHTNESS_THRESHOLD
    }

    /// Whether light (white) icons read well on this background
    pub fn should_use_light_foreground(&self) -> bool {
        self.contrast_ratio(&Color::white()) >= LIGHT_FOREGROUND_CONTRAST_THRESHOLD
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}
