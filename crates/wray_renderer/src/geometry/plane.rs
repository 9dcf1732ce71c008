//! Infinite plane primitive.

use std::sync::Arc;

use super::GeometricObject;
use crate::{Hit, Material};
use wray_math::{Aabb, Interval, Ray, Vec3};

/// Rays closer to parallel than this are treated as missing the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// An infinite plane through `point` with unit `normal`.
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: Arc<dyn Material>,
    shadows: bool,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            material,
            shadows: true,
        }
    }

    /// Enable or disable shadow casting.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    fn root(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let denom = ray.direction().dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.point - ray.origin()).dot(self.normal) / denom;
        ray_t.surrounds(t).then_some(t)
    }
}

impl GeometricObject for Plane {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Hit<'a>> {
        let t = self.root(ray, ray_t)?;
        Some(Hit {
            t,
            normal: self.normal,
            material: self.material.as_ref(),
        })
    }

    fn shadow_hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        self.root(ray, ray_t)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        None
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }
}
