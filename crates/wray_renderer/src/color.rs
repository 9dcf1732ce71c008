//! Color type and the per-pixel color mapping policies.

use serde::{Deserialize, Serialize};
use wray_math::Vec3;

/// Color type alias (linear RGB, nominally 0-1)
pub type Color = Vec3;

pub const BLACK: Color = Color::ZERO;
pub const WHITE: Color = Color::ONE;
pub const RED: Color = Color::new(1.0, 0.0, 0.0);

/// How out-of-gamut pixel colors are brought back into `[0, 1]`.
///
/// Exactly one policy is active per render. It is applied once per pixel,
/// after the samples have been averaged, never inside recursive shading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ColorMapping {
    /// Scale the color down by its largest channel, preserving hue.
    MaxToOne,
    /// Replace any out-of-range color with `fallback` (useful for spotting
    /// overexposed pixels while debugging).
    ClampToColor { fallback: Color },
}

impl Default for ColorMapping {
    fn default() -> Self {
        ColorMapping::MaxToOne
    }
}

impl ColorMapping {
    /// Flag out-of-range pixels in red.
    pub const SHOW_OUT_OF_GAMUT: ColorMapping = ColorMapping::ClampToColor { fallback: RED };

    pub fn apply(&self, c: Color) -> Color {
        match *self {
            ColorMapping::MaxToOne => max_to_one(c),
            ColorMapping::ClampToColor { fallback } => clamp_to_color(c, fallback),
        }
    }
}

/// If any channel exceeds 1, divide all channels by the largest one.
pub fn max_to_one(c: Color) -> Color {
    let max_value = c.max_element();
    if max_value > 1.0 {
        c / max_value
    } else {
        c
    }
}

/// Return `fallback` when any channel lies outside `[0, 1]`, else `c` unchanged.
pub fn clamp_to_color(c: Color, fallback: Color) -> Color {
    let in_range = |v: f32| (0.0..=1.0).contains(&v);
    if in_range(c.x) && in_range(c.y) && in_range(c.z) {
        c
    } else {
        fallback
    }
}

/// Raise each channel to `1 / gamma`. A gamma of 1 is the identity.
pub fn gamma_correct(c: Color, gamma: f32) -> Color {
    if gamma == 1.0 || gamma <= 0.0 {
        return c;
    }
    let inv_gamma = 1.0 / gamma;
    Color::new(
        c.x.max(0.0).powf(inv_gamma),
        c.y.max(0.0).powf(inv_gamma),
        c.z.max(0.0).powf(inv_gamma),
    )
}

/// Convert a display-ready color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let quantize = |v: f32| (255.0 * v.clamp(0.0, 1.0)).round() as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}
