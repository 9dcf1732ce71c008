//! Image-plane settings for a render.

use serde::{Deserialize, Serialize};

use crate::color::{gamma_correct, Color, ColorMapping};

/// Resolution, sampling and output settings of the image plane.
///
/// Every field has a default, so a configuration file only needs to name the
/// settings it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPlane {
    /// Horizontal resolution in pixels
    pub hres: u32,
    /// Vertical resolution in pixels
    pub vres: u32,
    /// Edge length of one pixel on the view plane
    pub pixel_size: f32,
    /// Samples per pixel
    pub num_samples: u32,
    /// Maximum recursion depth for secondary rays
    pub max_depth: u32,
    pub gamma: f32,
    pub color_mapping: ColorMapping,
}

impl Default for ViewPlane {
    fn default() -> Self {
        Self {
            hres: 400,
            vres: 400,
            pixel_size: 1.0,
            num_samples: 1,
            max_depth: 5,
            gamma: 1.0,
            color_mapping: ColorMapping::default(),
        }
    }
}

impl ViewPlane {
    /// Set image resolution.
    pub fn with_resolution(mut self, hres: u32, vres: u32) -> Self {
        self.hres = hres;
        self.vres = vres;
        self
    }

    pub fn with_pixel_size(mut self, pixel_size: f32) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, num_samples: u32, max_depth: u32) -> Self {
        self.num_samples = num_samples.max(1);
        self.max_depth = max_depth;
        self
    }

    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_color_mapping(mut self, color_mapping: ColorMapping) -> Self {
        self.color_mapping = color_mapping;
        self
    }

    /// Total number of pixels.
    pub fn num_pixels(&self) -> u64 {
        self.hres as u64 * self.vres as u64
    }

    /// Turn an averaged pixel radiance into a display color: the color
    /// mapping policy first, then gamma.
    pub fn map_color(&self, c: Color) -> Color {
        gamma_correct(self.color_mapping.apply(c), self.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RED;

    #[test]
    fn test_map_color_order() {
        let vp = ViewPlane::default().with_gamma(2.0);

        // Mapped to (1, 0.25, 0) first, then gamma
        let c = vp.map_color(Color::new(4.0, 1.0, 0.0));
        assert!((c - Color::new(1.0, 0.5, 0.0)).length() < 1e-6);

        let debug = ViewPlane::default().with_color_mapping(ColorMapping::SHOW_OUT_OF_GAMUT);
        assert_eq!(debug.map_color(Color::new(1.5, 0.0, 0.0)), RED);
    }

    #[test]
    fn test_partial_config() {
        let vp: ViewPlane = serde_json::from_str(r#"{ "hres": 64, "num_samples": 16 }"#).unwrap();
        assert_eq!(vp.hres, 64);
        assert_eq!(vp.num_samples, 16);
        assert_eq!(vp.vres, ViewPlane::default().vres);
        assert_eq!(vp.color_mapping, ColorMapping::MaxToOne);
    }
}
