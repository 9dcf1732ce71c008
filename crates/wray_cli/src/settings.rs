//! Render settings from a JSON file and the command line.
//!
//! Every setting is optional. Scenes choose their own defaults and only the
//! settings that are present override them, command-line flags winning over
//! the file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wray_renderer::{Color, ColorMapping, TracerKind, World};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub hres: Option<u32>,
    pub vres: Option<u32>,
    pub pixel_size: Option<f32>,
    pub num_samples: Option<u32>,
    pub max_depth: Option<u32>,
    pub gamma: Option<f32>,
    pub color_mapping: Option<ColorMapping>,
    pub tracer: Option<TracerKind>,
    pub background: Option<Color>,
}

impl RenderSettings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Settings present in `other` replace ours.
    pub fn merge(self, other: RenderSettings) -> Self {
        Self {
            hres: other.hres.or(self.hres),
            vres: other.vres.or(self.vres),
            pixel_size: other.pixel_size.or(self.pixel_size),
            num_samples: other.num_samples.or(self.num_samples),
            max_depth: other.max_depth.or(self.max_depth),
            gamma: other.gamma.or(self.gamma),
            color_mapping: other.color_mapping.or(self.color_mapping),
            tracer: other.tracer.or(self.tracer),
            background: other.background.or(self.background),
        }
    }

    /// Override the world's view plane, tracer and background.
    pub fn apply(&self, world: &mut World) {
        let vp = &mut world.vp;
        if let Some(hres) = self.hres {
            vp.hres = hres;
        }
        if let Some(vres) = self.vres {
            vp.vres = vres;
        }
        if let Some(pixel_size) = self.pixel_size {
            vp.pixel_size = pixel_size;
        }
        if let Some(num_samples) = self.num_samples {
            vp.num_samples = num_samples.max(1);
        }
        if let Some(max_depth) = self.max_depth {
            vp.max_depth = max_depth;
        }
        if let Some(gamma) = self.gamma {
            vp.gamma = gamma;
        }
        if let Some(color_mapping) = self.color_mapping {
            vp.color_mapping = color_mapping;
        }
        if let Some(tracer) = self.tracer {
            world.set_tracer(tracer.build());
        }
        if let Some(background) = self.background {
            world.background_color = background;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings() {
        let settings = RenderSettings::from_json(
            r#"{
                "hres": 320,
                "num_samples": 4,
                "tracer": "ray_cast",
                "color_mapping": { "policy": "clamp_to_color", "fallback": [1.0, 0.0, 0.0] }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.hres, Some(320));
        assert_eq!(settings.vres, None);
        assert_eq!(settings.tracer, Some(TracerKind::RayCast));
        assert_eq!(settings.color_mapping, Some(ColorMapping::SHOW_OUT_OF_GAMUT));
    }

    #[test]
    fn test_unknown_setting_is_an_error() {
        assert!(RenderSettings::from_json(r#"{ "hress": 320 }"#).is_err());
    }

    #[test]
    fn test_merge_prefers_other() {
        let file = RenderSettings {
            hres: Some(100),
            vres: Some(50),
            ..Default::default()
        };
        let flags = RenderSettings {
            hres: Some(200),
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.hres, Some(200));
        assert_eq!(merged.vres, Some(50));
    }

    #[test]
    fn test_apply_only_touches_present_settings() {
        let mut world = World::new();
        world.vp.hres = 640;
        world.vp.max_depth = 3;

        let settings = RenderSettings {
            vres: Some(10),
            num_samples: Some(0),
            background: Some(Color::ONE),
            ..Default::default()
        };
        settings.apply(&mut world);

        assert_eq!(world.vp.hres, 640);
        assert_eq!(world.vp.vres, 10);
        assert_eq!(world.vp.num_samples, 1);
        assert_eq!(world.vp.max_depth, 3);
        assert_eq!(world.background_color, Color::ONE);
    }
}
