//! Tracers: what the world does with a ray.

use serde::{Deserialize, Serialize};

use crate::{Color, World, BLACK};
use wray_math::Ray;

/// Trait for ray tracers.
///
/// The world is passed explicitly so tracers hold no reference back to it.
pub trait Tracer: Send + Sync {
    /// Radiance arriving along `ray`, which is `depth` bounces from the camera.
    fn trace_ray(&self, world: &World, ray: &Ray, depth: u32) -> Color;
}

/// Local shading only: ambient and direct light at the first hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayCast;

impl Tracer for RayCast {
    fn trace_ray(&self, world: &World, ray: &Ray, depth: u32) -> Color {
        if depth > world.vp.max_depth {
            return BLACK;
        }

        match world.hit_objects_at_depth(ray, depth) {
            Some(sr) => sr.material.shade(&sr),
            None => world.background_color,
        }
    }
}

/// Recursive Whitted tracing: local shading plus reflected and transmitted rays.
#[derive(Debug, Clone, Copy, Default)]
pub struct Whitted;

impl Tracer for Whitted {
    fn trace_ray(&self, world: &World, ray: &Ray, depth: u32) -> Color {
        if depth > world.vp.max_depth {
            return BLACK;
        }

        match world.hit_objects_at_depth(ray, depth) {
            Some(sr) => sr.material.shade(&sr) + sr.material.trace_further(&sr),
            None => world.background_color,
        }
    }
}

/// Tracer selection for configuration files and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TracerKind {
    RayCast,
    #[default]
    Whitted,
}

impl TracerKind {
    pub fn build(self) -> Box<dyn Tracer> {
        match self {
            TracerKind::RayCast => Box::new(RayCast),
            TracerKind::Whitted => Box::new(Whitted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Phong, Plane, Reflective, ShadeRec, Sphere, WHITE};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use wray_math::Vec3;

    #[test]
    fn test_miss_returns_background() {
        let mut world = World::new();
        world.background_color = Color::new(0.1, 0.2, 0.3);
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        assert_eq!(RayCast.trace_ray(&world, &ray, 0), world.background_color);
        assert_eq!(Whitted.trace_ray(&world, &ray, 0), world.background_color);
    }

    #[test]
    fn test_depth_over_limit_is_black() {
        let mut world = World::new();
        world.background_color = WHITE;
        world.vp.max_depth = 2;
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        assert_eq!(Whitted.trace_ray(&world, &ray, 2), WHITE);
        assert_eq!(Whitted.trace_ray(&world, &ray, 3), BLACK);
    }

    #[test]
    fn test_ray_cast_ignores_reflections() {
        let mirror = Reflective::new(Phong::new(0.0, 0.0, WHITE, 0.0, 1.0), 1.0, WHITE);
        let mut world = World::new();
        world.background_color = WHITE;
        world.add_object(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Arc::new(mirror))));
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        world.set_tracer(Box::new(RayCast));
        assert_eq!(world.trace_ray(&ray, 0), BLACK);

        // Straight back at the camera, into the background
        world.set_tracer(Box::new(Whitted));
        assert_eq!(world.trace_ray(&ray, 0), WHITE);
    }

    /// Mirror that records the deepest recursion level it was shaded at.
    struct DepthProbe {
        mirror: Reflective,
        deepest: AtomicU32,
        calls: AtomicU32,
    }

    impl Material for DepthProbe {
        fn shade(&self, sr: &ShadeRec) -> Color {
            self.deepest.fetch_max(sr.depth, Ordering::Relaxed);
            self.calls.fetch_add(1, Ordering::Relaxed);
            BLACK
        }

        fn trace_further(&self, sr: &ShadeRec) -> Color {
            self.mirror.trace_further(sr)
        }
    }

    #[test]
    fn test_recursion_is_bounded_by_max_depth() {
        for max_depth in [0, 1, 4] {
            let probe = Arc::new(DepthProbe {
                mirror: Reflective::new(Phong::new(0.0, 0.0, WHITE, 0.0, 1.0), 1.0, WHITE),
                deepest: AtomicU32::new(0),
                calls: AtomicU32::new(0),
            });

            // Two parallel mirrors facing each other
            let mut world = World::new();
            world.vp.max_depth = max_depth;
            world.set_tracer(Box::new(Whitted));
            world.add_object(Box::new(Plane::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z, probe.clone())));
            world.add_object(Box::new(Plane::new(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z, probe.clone())));

            let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
            world.trace_ray(&ray, 0);

            assert_eq!(probe.deepest.load(Ordering::Relaxed), max_depth);
            assert_eq!(probe.calls.load(Ordering::Relaxed), max_depth + 1);
        }
    }

    #[test]
    fn test_tracer_kind_from_config() {
        let kind: TracerKind = serde_json::from_str(r#""ray_cast""#).unwrap();
        assert_eq!(kind, TracerKind::RayCast);
        assert_eq!(TracerKind::default(), TracerKind::Whitted);

        let world = World::new();
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        assert_eq!(kind.build().trace_ray(&world, &ray, 0), world.background_color);
    }
}
