//! Light sources.
//!
//! Materials ask each light for the direction toward it and the incident
//! radiance at the hit point, and (when the light casts shadows) whether a
//! shadow ray toward it is blocked.

use std::f32::consts::PI;

use rand::Rng;

use crate::sampler::{map_to_hemisphere, Sampler};
use crate::{Color, ShadeRec, WHITE};
use wray_math::{any_perpendicular, Ray, Vec3, K_EPSILON};

/// Trait for light sources.
pub trait Light: Send + Sync {
    /// Unit direction from the hit point toward the light.
    fn direction(&self, sr: &ShadeRec) -> Vec3;

    /// Incident radiance at the hit point.
    fn radiance(&self, sr: &ShadeRec) -> Color;

    /// Whether `ray` (leaving the hit point along [`direction`](Light::direction))
    /// is blocked before reaching the light.
    fn in_shadow(&self, ray: &Ray, sr: &ShadeRec) -> bool;

    /// Whether shading should run the occlusion test for this light.
    fn casts_shadows(&self) -> bool;
}

/// Constant ambient illumination.
#[derive(Debug, Clone, Copy)]
pub struct Ambient {
    pub ls: f32,
    pub color: Color,
}

impl Ambient {
    pub fn new(ls: f32, color: Color) -> Self {
        Self { ls, color }
    }
}

impl Default for Ambient {
    fn default() -> Self {
        Self::new(1.0, WHITE)
    }
}

impl Light for Ambient {
    fn direction(&self, _sr: &ShadeRec) -> Vec3 {
        Vec3::ZERO
    }

    fn radiance(&self, _sr: &ShadeRec) -> Color {
        self.ls * self.color
    }

    fn in_shadow(&self, _ray: &Ray, _sr: &ShadeRec) -> bool {
        false
    }

    fn casts_shadows(&self) -> bool {
        false
    }
}

/// Point light with no distance falloff.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub location: Vec3,
    pub ls: f32,
    pub color: Color,
    shadows: bool,
}

impl PointLight {
    pub fn new(location: Vec3, ls: f32, color: Color) -> Self {
        Self {
            location,
            ls,
            color,
            shadows: true,
        }
    }

    /// Enable or disable shadows from this light.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }
}

impl Light for PointLight {
    fn direction(&self, sr: &ShadeRec) -> Vec3 {
        (self.location - sr.hit_point).normalize_or_zero()
    }

    fn radiance(&self, _sr: &ShadeRec) -> Color {
        self.ls * self.color
    }

    fn in_shadow(&self, ray: &Ray, sr: &ShadeRec) -> bool {
        // Occluders behind the light don't count
        let distance = self.location.distance(ray.origin());
        sr.world.shadow_hit(ray, distance - K_EPSILON)
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }
}

/// Light arriving from a fixed direction, as from a distant source.
#[derive(Debug, Clone, Copy)]
pub struct Directional {
    /// Unit direction toward the light
    direction: Vec3,
    pub ls: f32,
    pub color: Color,
    shadows: bool,
}

impl Directional {
    /// `direction` points from the scene toward the light.
    pub fn new(direction: Vec3, ls: f32, color: Color) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            ls,
            color,
            shadows: true,
        }
    }

    /// Enable or disable shadows from this light.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }
}

impl Light for Directional {
    fn direction(&self, _sr: &ShadeRec) -> Vec3 {
        self.direction
    }

    fn radiance(&self, _sr: &ShadeRec) -> Color {
        self.ls * self.color
    }

    fn in_shadow(&self, ray: &Ray, sr: &ShadeRec) -> bool {
        sr.world.shadow_hit(ray, f32::INFINITY)
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }
}

/// One-sided emitting parallelogram `p0 + u * a + v * b`, `u, v` in `[0, 1]`.
///
/// Emits on the side of `a x b`. The sample points are stratified over the
/// parallelogram once, at construction. Occlusion is estimated per sample
/// inside [`radiance`](Light::radiance), so [`in_shadow`](Light::in_shadow)
/// always reports false.
#[derive(Debug, Clone)]
pub struct AreaLight {
    p0: Vec3,
    a: Vec3,
    b: Vec3,
    normal: Vec3,
    area: f32,
    pub ls: f32,
    pub color: Color,
    points: Vec<Vec3>,
    shadows: bool,
}

impl AreaLight {
    pub fn new<R: Rng + ?Sized>(
        p0: Vec3,
        a: Vec3,
        b: Vec3,
        ls: f32,
        color: Color,
        num_samples: usize,
        rng: &mut R,
    ) -> Self {
        let cross = a.cross(b);
        let sampler = Sampler::jittered(num_samples, 1, rng);
        let points = sampler.set(0).iter().map(|s| p0 + s.x * a + s.y * b).collect();

        Self {
            p0,
            a,
            b,
            normal: cross.normalize_or_zero(),
            area: cross.length(),
            ls,
            color,
            points,
            shadows: true,
        }
    }

    /// Enable or disable shadows from this light.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    /// Center of the emitting surface.
    pub fn center(&self) -> Vec3 {
        self.p0 + 0.5 * (self.a + self.b)
    }

    /// Emitted radiance `ls * color`.
    pub fn emitted(&self) -> Color {
        self.ls * self.color
    }
}

impl Light for AreaLight {
    fn direction(&self, sr: &ShadeRec) -> Vec3 {
        (self.center() - sr.hit_point).normalize_or_zero()
    }

    fn radiance(&self, sr: &ShadeRec) -> Color {
        if self.points.is_empty() || self.area == 0.0 {
            return Color::ZERO;
        }

        let mut total = 0.0;
        for &point in &self.points {
            let to_light = point - sr.hit_point;
            let d2 = to_light.length_squared();
            if d2 <= K_EPSILON * K_EPSILON {
                continue;
            }
            let d = d2.sqrt();
            let wi = to_light / d;

            let cos_light = -self.normal.dot(wi);
            if cos_light <= 0.0 {
                continue;
            }
            if self.shadows && sr.world.shadow_hit(&sr.spawn_ray(wi), d - K_EPSILON) {
                continue;
            }
            total += cos_light / d2;
        }

        self.emitted() * self.area * total / self.points.len() as f32
    }

    fn in_shadow(&self, _ray: &Ray, _sr: &ShadeRec) -> bool {
        false
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }
}

/// Uniform sky radiance from every direction of the hemisphere.
///
/// [`direction`](Light::direction) is the surface normal and
/// [`radiance`](Light::radiance) returns the cosine-weighted irradiance
/// `pi * Le` scaled by the fraction of sky samples that are not blocked.
#[derive(Debug, Clone)]
pub struct EnvironmentLight {
    pub ls: f32,
    pub color: Color,
    /// Cosine-weighted directions around +Z
    directions: Vec<Vec3>,
    shadows: bool,
}

impl EnvironmentLight {
    pub fn new<R: Rng + ?Sized>(ls: f32, color: Color, num_samples: usize, rng: &mut R) -> Self {
        let sampler = Sampler::jittered(num_samples, 1, rng);
        let directions = sampler
            .set(0)
            .iter()
            .map(|s| map_to_hemisphere(*s, 1.0))
            .collect();

        Self {
            ls,
            color,
            directions,
            shadows: true,
        }
    }

    /// Enable or disable sky occlusion.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    fn visible_fraction(&self, sr: &ShadeRec) -> f32 {
        if !self.shadows || self.directions.is_empty() {
            return 1.0;
        }

        let w = sr.normal;
        let u = any_perpendicular(w);
        let v = w.cross(u);

        let visible = self
            .directions
            .iter()
            .filter(|d| {
                let wi = d.x * u + d.y * v + d.z * w;
                !sr.world.shadow_hit(&sr.spawn_ray(wi), f32::INFINITY)
            })
            .count();

        visible as f32 / self.directions.len() as f32
    }
}

impl Light for EnvironmentLight {
    fn direction(&self, sr: &ShadeRec) -> Vec3 {
        sr.normal
    }

    fn radiance(&self, sr: &ShadeRec) -> Color {
        PI * self.ls * self.color * self.visible_fraction(sr)
    }

    fn in_shadow(&self, _ray: &Ray, _sr: &ShadeRec) -> bool {
        false
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }
}
