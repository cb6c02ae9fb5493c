//! Chromebar Geometry
//!
//! Rectangles, colors, and the interpolation helpers shared by the toolbar engine.

mod color;
mod interpolate;
mod rect;

pub use color::{Color, LIGHT_FOREGROUND_CONTRAST_THRESHOLD, OPAQUE_TEXTBOX_LIGHTNESS_THRESHOLD};
pub use interpolate::{apply_easing, clamp_percent, lerp, lerp_alpha, lerp_color, lerp_rect, Easing};
pub use rect::Rect;
