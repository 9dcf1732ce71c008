//! Multithreaded render driver.
//!
//! Splits the view plane into buckets and renders them in parallel with
//! rayon. Each finished pixel goes straight to the display sink.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, DEFAULT_BUCKET_SIZE};
use crate::error::{RenderResult, WorldError};
use crate::sampler::{map_to_disk, Sampler, DEFAULT_NUM_SETS};
use crate::{Camera, Color, DisplaySink, PixelSample, World, BLACK};

/// Seed for the pixel and lens sample sets, so renders are repeatable.
const SAMPLE_SEED: u64 = 0x5eed;

/// Summary of a finished (or cancelled) render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    /// Pixels delivered to the sink
    pub pixels: u64,
    /// Whether the render stopped early
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Sample sets for the pixel area and the lens aperture.
struct PixelSamplers {
    square: Sampler,
    lens: Sampler,
}

impl PixelSamplers {
    fn new(num_samples: u32) -> Self {
        if num_samples <= 1 {
            return Self {
                square: Sampler::regular(1),
                lens: Sampler::regular(1),
            };
        }

        let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
        let square = Sampler::jittered(num_samples as usize, DEFAULT_NUM_SETS, &mut rng);
        let lens = Sampler::jittered(num_samples as usize, DEFAULT_NUM_SETS, &mut rng);
        Self { square, lens }
    }
}

impl World {
    /// Render the whole view plane into `sink`.
    pub fn render_scene(&self, sink: &dyn DisplaySink) -> RenderResult<RenderStats> {
        let cancel = AtomicBool::new(false);
        self.render_scene_with_cancel(sink, &cancel)
    }

    /// Render the whole view plane into `sink`, stopping early once `cancel`
    /// is set. The flag is checked between pixels.
    pub fn render_scene_with_cancel(
        &self,
        sink: &dyn DisplaySink,
        cancel: &AtomicBool,
    ) -> RenderResult<RenderStats> {
        self.check()?;
        let camera = self.camera().ok_or(WorldError::MissingCamera)?;

        let samplers = PixelSamplers::new(self.vp.num_samples);
        let buckets = generate_buckets(self.vp.hres, self.vp.vres, DEFAULT_BUCKET_SIZE);

        log::info!(
            "Rendering {}x{} at {} samples per pixel ({} buckets, max depth {})",
            self.vp.hres,
            self.vp.vres,
            samplers.square.num_samples(),
            buckets.len(),
            self.vp.max_depth
        );

        let start = Instant::now();
        let pixels = AtomicU64::new(0);

        buckets.par_iter().for_each(|bucket| {
            for (row, col) in bucket.pixels() {
                if cancel.load(Ordering::Relaxed) {
                    return;
                }
                let color = self.render_pixel(camera, &samplers, row, col);
                sink.display_pixel(row, col, color);
                pixels.fetch_add(1, Ordering::Relaxed);
            }
            log::debug!("Bucket {} done ({} pixels)", bucket.index, bucket.pixel_count());
        });

        let stats = RenderStats {
            pixels: pixels.into_inner(),
            cancelled: cancel.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        };

        if stats.cancelled {
            log::info!(
                "Render cancelled after {} of {} pixels ({:.2?})",
                stats.pixels,
                self.vp.num_pixels(),
                stats.elapsed
            );
        } else {
            log::info!("Render finished: {} pixels in {:.2?}", stats.pixels, stats.elapsed);
        }

        Ok(stats)
    }

    /// Average of all samples through pixel `(row, col)`, color mapped for display.
    fn render_pixel(&self, camera: &dyn Camera, samplers: &PixelSamplers, row: u32, col: u32) -> Color {
        let squares = samplers.square.pixel_set(row, col);
        let disks = samplers.lens.pixel_set(row, col);

        let mut radiance = BLACK;
        for (k, square) in squares.iter().enumerate() {
            let sample = PixelSample {
                row,
                col,
                square: *square,
                disk: map_to_disk(disks[k % disks.len()]),
            };
            let ray = camera.ray(&self.vp, &sample);
            radiance += self.trace_ray(&ray, 0);
        }

        self.vp.map_color(radiance / squares.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Ambient, FrameSink, ImageBuffer, Matte, Pinhole, PointLight, RayCast, Sphere, ThinLens, Whitted, WHITE,
    };
    use std::sync::Arc;
    use wray_math::Vec3;

    /// Unit sphere at the origin seen head-on through an 11x11 view plane.
    fn lambertian_sphere() -> World {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut world = World::new();
        world.vp = world.vp.clone().with_resolution(11, 11).with_quality(1, 0);
        world.set_tracer(Box::new(RayCast));
        world.set_camera(Box::new(Pinhole::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 100.0)));
        world.set_ambient_light(Box::new(Ambient::new(1.0, WHITE)));
        world.add_light(Box::new(PointLight::new(Vec3::new(0.0, 0.0, 10.0), 1.0, WHITE).with_shadows(false)));
        world.add_object(Box::new(Sphere::new(Vec3::ZERO, 1.0, Arc::new(Matte::new(0.25, 0.5, WHITE)))));
        world
    }

    fn render(world: &World) -> ImageBuffer {
        let sink = FrameSink::new(world.vp.hres, world.vp.vres);
        world.render_scene(&sink).unwrap();
        sink.into_image()
    }

    #[test]
    fn test_lambertian_center_pixel() {
        let world = lambertian_sphere();
        let image = render(&world);

        // ka * cd * 1 + kd * cd / pi * 1 * cos(0)
        let expected = 0.25 + 0.5 * std::f32::consts::FRAC_1_PI;
        let center = image.get(5, 5);
        assert!((center.x - expected).abs() < 1e-4, "center = {:?}", center);
        assert!((center.x - 0.409155).abs() < 1e-4);

        // Light at the eye: the shading is symmetric about the center
        assert!((image.get(0, 0) - image.get(10, 10)).length() < 1e-5);
        assert!(image.get(0, 0).x < center.x);
    }

    #[test]
    fn test_render_reports_stats() {
        let world = lambertian_sphere();
        let sink = FrameSink::new(11, 11);
        let stats = world.render_scene(&sink).unwrap();

        assert_eq!(stats.pixels, 121);
        assert!(!stats.cancelled);
    }

    #[test]
    fn test_cancelled_render_stops() {
        let world = lambertian_sphere();
        let sink = FrameSink::new(11, 11);
        let cancel = AtomicBool::new(true);

        let stats = world.render_scene_with_cancel(&sink, &cancel).unwrap();
        assert!(stats.cancelled);
        assert_eq!(stats.pixels, 0);
    }

    #[test]
    fn test_render_requires_camera_and_tracer() {
        let sink = FrameSink::new(1, 1);
        let world = World::new();
        assert_eq!(world.render_scene(&sink), Err(WorldError::MissingCamera));

        let mut world = World::new();
        world.set_camera(Box::new(Pinhole::new(Vec3::Z, Vec3::ZERO, 1.0)));
        assert_eq!(world.render_scene(&sink), Err(WorldError::MissingTracer));
    }

    #[test]
    fn test_multisampled_render_is_repeatable() {
        let mut world = lambertian_sphere();
        world.vp.num_samples = 16;
        let pinhole = Pinhole::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 100.0);
        world.set_camera(Box::new(ThinLens::new(pinhole, 0.5, 10.0)));
        world.set_tracer(Box::new(Whitted));

        let first = render(&world);
        let second = render(&world);
        assert_eq!(first.pixels, second.pixels);

        // Jittered samples stay close to the single-sample value
        let center = first.get(5, 5).x;
        assert!(center > 0.3 && center < 0.5);
    }
}
