//! Interpolation utilities
//!
//! Linear and eased interpolation between scalars, rectangles and colors.
//! Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};

use crate::{Color, Rect};

/// Easing curve applied to an animation's linear progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    /// Fast-out, slow-in curve used for layout transforms
    Transform,
    /// Accelerating curve used for elements leaving
    FadeOut,
    /// Decelerating curve used for elements entering
    FadeIn,
    CubicBezier(f32, f32, f32, f32),
}

/// Apply an easing function to a progress value (0.0 to 1.0)
pub fn apply_easing(t: f32, easing: Easing) -> f32 {
    match easing {
        Easing::Linear => t.clamp(0.0, 1.0),
        Easing::Transform => cubic_bezier(t, 0.4, 0.0, 0.2, 1.0),
        Easing::FadeOut => cubic_bezier(t, 0.4, 0.0, 1.0, 1.0),
        Easing::FadeIn => cubic_bezier(t, 0.0, 0.0, 0.2, 1.0),
        Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
    }
}

/// Calculate cubic bezier curve value at time t
/// Uses binary search to find the x parameter, then evaluates y
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Exact endpoints so finished animations land on their targets
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut low = 0.0_f32;
    let mut high = 1.0_f32;

    for _ in 0..20 {
        let mid = (low + high) / 2.0;
        if bezier_point(mid, x1, x2) < t {
            low = mid;
        } else {
            high = mid;
        }
    }

    bezier_point((low + high) / 2.0, y1, y2)
}

/// Evaluate a cubic bezier curve at parameter t
/// B(t) = 3(1-t)^2*t*p1 + 3(1-t)*t^2*p2 + t^3
fn bezier_point(t: f32, p1: f32, p2: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * p1 + 3.0 * mt * t2 * p2 + t3
}

/// Clamp to [0, 1], mapping NaN to 0
pub fn clamp_percent(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Linear interpolation between `start` and `end`
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Interpolate each edge independently
pub fn lerp_rect(start: &Rect, end: &Rect, t: f32) -> Rect {
    Rect::new(
        lerp(start.left, end.left, t),
        lerp(start.top, end.top, t),
        lerp(start.right, end.right, t),
        lerp(start.bottom, end.bottom, t),
    )
}

/// Interpolate an 8-bit alpha, truncating like integer pixel code does
pub fn lerp_alpha(start: u8, end: u8, t: f32) -> u8 {
    lerp(start as f32, end as f32, clamp_percent(t)).clamp(0.0, 255.0) as u8
}

/// Blend `start` toward `end` channel by channel
pub fn lerp_color(start: Color, end: Color, t: f32) -> Color {
    let t = clamp_percent(t);
    let channel = |a: u8, b: u8| lerp(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8;
    Color::new(
        channel(start.r, end.r),
        channel(start.g, end.g),
        channel(start.b, end.b),
        channel(start.a, end.a),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_easing() {
        assert_eq!(apply_easing(0.0, Easing::Linear), 0.0);
        assert_eq!(apply_easing(0.5, Easing::Linear), 0.5);
        assert_eq!(apply_easing(1.0, Easing::Linear), 1.0);
    }

    #[test]
    fn test_transform_curve_endpoints() {
        assert_eq!(apply_easing(0.0, Easing::Transform), 0.0);
        assert_eq!(apply_easing(1.0, Easing::Transform), 1.0);
        // Fast out, slow in: ahead of linear at the midpoint
        assert!(apply_easing(0.5, Easing::Transform) > 0.5);
    }

    #[test]
    fn test_fade_curves() {
        assert!(apply_easing(0.5, Easing::FadeOut) < 0.5);
        assert!(apply_easing(0.5, Easing::FadeIn) > 0.5);
    }

    #[test]
    fn test_easing_is_monotone() {
        let mut previous = 0.0;
        for i in 0..=100 {
            let value = apply_easing(i as f32 / 100.0, Easing::Transform);
            assert!(value + 1e-4 >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(-0.5), 0.0);
        assert_eq!(clamp_percent(1.5), 1.0);
        assert_eq!(clamp_percent(f32::NAN), 0.0);
        assert_eq!(clamp_percent(0.25), 0.25);
    }

    #[test]
    fn test_lerp_rect() {
        let collapsed = Rect::new(50.0, 0.0, 250.0, 40.0);
        let expanded = Rect::new(0.0, 0.0, 300.0, 40.0);
        assert_eq!(lerp_rect(&collapsed, &expanded, 0.0), collapsed);
        assert_eq!(lerp_rect(&collapsed, &expanded, 1.0), expanded);
        assert_eq!(
            lerp_rect(&collapsed, &expanded, 0.5),
            Rect::new(25.0, 0.0, 275.0, 40.0)
        );
    }

    #[test]
    fn test_lerp_color_and_alpha() {
        let mid = lerp_color(Color::black(), Color::white(), 0.5);
        assert_eq!(mid, Color::rgb(128, 128, 128));
        assert_eq!(lerp_color(Color::black(), Color::white(), 1.0), Color::white());
        assert_eq!(lerp_alpha(51, 255, 0.0), 51);
        assert_eq!(lerp_alpha(51, 255, 1.0), 255);
    }
}
