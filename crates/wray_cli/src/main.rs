//! wray - render a built-in scene to a PNG file.

mod scenes;
mod settings;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wray_renderer::{ColorMapping, FrameSink, TracerKind, DEFAULT_GRID_MULTIPLIER};

use scenes::{SceneName, SceneOptions};
use settings::RenderSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TracerArg {
    RayCast,
    Whitted,
}

impl From<TracerArg> for TracerKind {
    fn from(arg: TracerArg) -> Self {
        match arg {
            TracerArg::RayCast => TracerKind::RayCast,
            TracerArg::Whitted => TracerKind::Whitted,
        }
    }
}

/// Whitted-style ray tracer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scene to render
    #[arg(value_enum, default_value_t = SceneName::Spheres)]
    scene: SceneName,

    /// Output PNG file
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// JSON file with render settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tracer to use
    #[arg(long, value_enum)]
    tracer: Option<TracerArg>,

    /// Samples per pixel
    #[arg(short, long)]
    samples: Option<u32>,

    /// Maximum recursion depth for reflected and transmitted rays
    #[arg(long)]
    max_depth: Option<u32>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Add the city's buildings to the world directly instead of a grid
    #[arg(long)]
    no_grid: bool,

    /// Grid cells per building along each axis
    #[arg(long, default_value_t = DEFAULT_GRID_MULTIPLIER)]
    grid_multiplier: f32,

    /// Seed for the scene's random content
    #[arg(long, default_value_t = 15)]
    seed: u64,

    /// Paint out-of-range pixels red instead of scaling them
    #[arg(long)]
    show_out_of_gamut: bool,
}

impl Args {
    fn settings(&self) -> RenderSettings {
        RenderSettings {
            hres: self.width,
            vres: self.height,
            num_samples: self.samples,
            max_depth: self.max_depth,
            tracer: self.tracer.map(TracerKind::from),
            color_mapping: self.show_out_of_gamut.then_some(ColorMapping::SHOW_OUT_OF_GAMUT),
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let file_settings = match &args.config {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };
    let settings = file_settings.merge(args.settings());

    let mut rng = StdRng::seed_from_u64(args.seed);
    let options = SceneOptions {
        use_grid: !args.no_grid,
        grid_multiplier: args.grid_multiplier,
    };
    let mut world = scenes::build(args.scene, &options, &mut rng);
    settings.apply(&mut world);
    log::info!("Built {:?} scene with {} objects", args.scene, world.num_objects());

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            log::warn!("Interrupted, finishing current pixels");
            cancel.store(true, Ordering::Relaxed);
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let sink = FrameSink::new(world.vp.hres, world.vp.vres);
    let stats = world.render_scene_with_cancel(&sink, &cancel)?;

    let image = sink.into_image();
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("Image buffer size does not match its resolution")?;
    rgba.save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if stats.cancelled {
        log::warn!("Saved partial render to {}", args.output.display());
    } else {
        log::info!("Saved {}", args.output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_become_settings() {
        let args = Args::parse_from([
            "wray",
            "city",
            "--width",
            "320",
            "-s",
            "4",
            "--tracer",
            "ray-cast",
            "--show-out-of-gamut",
            "--grid-multiplier",
            "0.5",
        ]);
        assert_eq!(args.scene, SceneName::City);
        assert_eq!(args.grid_multiplier, 0.5);

        let settings = args.settings();
        assert_eq!(settings.hres, Some(320));
        assert_eq!(settings.vres, None);
        assert_eq!(settings.num_samples, Some(4));
        assert_eq!(settings.tracer, Some(TracerKind::RayCast));
        assert_eq!(settings.color_mapping, Some(ColorMapping::SHOW_OUT_OF_GAMUT));
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["wray"]);
        assert_eq!(args.scene, SceneName::Spheres);
        assert_eq!(args.output, PathBuf::from("render.png"));
        assert_eq!(args.seed, 15);
        assert_eq!(args.grid_multiplier, DEFAULT_GRID_MULTIPLIER);
        assert_eq!(args.settings(), RenderSettings::default());
    }
}
