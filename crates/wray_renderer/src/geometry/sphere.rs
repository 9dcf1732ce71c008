//! Sphere primitive.

use std::sync::Arc;

use super::GeometricObject;
use crate::{Hit, Material};
use wray_math::{Aabb, Interval, Ray, Vec3};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    shadows: bool,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            shadows: true,
            bbox,
        }
    }

    /// Enable or disable shadow casting.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Smallest root of the ray-sphere quadratic inside `ray_t`.
    ///
    /// Uses the half-b form; the ray direction is unit length so `a = 1`.
    fn root(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        if self.radius <= 0.0 || ray.is_degenerate() {
            return None;
        }

        let oc = self.center - ray.origin();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let near = h - sqrtd;
        if ray_t.surrounds(near) {
            return Some(near);
        }
        let far = h + sqrtd;
        ray_t.surrounds(far).then_some(far)
    }
}

impl GeometricObject for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Hit<'a>> {
        let t = self.root(ray, ray_t)?;
        let outward_normal = (ray.at(t) - self.center) / self.radius;

        Some(Hit {
            t,
            normal: outward_normal,
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
        Some(self.bbox)
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::test_util::white_matte;

    #[test]
    fn test_sphere_hit_returns_nearest_root() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 2.0, white_matte());
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        let hit = sphere.hit(&ray, Interval::ray(f32::INFINITY)).unwrap();

        // Roots are 8 and 12; the smaller one wins
        assert!((hit.t - 8.0).abs() < 1e-5);
        let expected_normal = (ray.at(hit.t) - sphere.center()) / sphere.radius();
        assert!((hit.normal - expected_normal).length() < 1e-6);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, white_matte());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let hit = sphere.hit(&ray, Interval::ray(f32::INFINITY)).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-6);

        // Outward normal, even though the ray travels along it
        assert!((hit.normal - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, white_matte());

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        assert!(sphere.hit(&ray, Interval::ray(f32::INFINITY)).is_none());

        // Sphere behind the ray origin
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Z);
        assert!(sphere.hit(&ray, Interval::ray(f32::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_rejects_epsilon_roots() {
        // Ray starting on the surface and leaving it
        let sphere = Sphere::new(Vec3::ZERO, 1.0, white_matte());
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);

        assert!(sphere.hit(&ray, Interval::ray(f32::INFINITY)).is_none());
        assert!(sphere.shadow_hit(&ray, Interval::ray(f32::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_shadow_flag() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, white_matte()).with_shadows(false);
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        assert!(sphere.hit(&ray, Interval::ray(f32::INFINITY)).is_some());
        assert!(sphere.shadow_hit(&ray, Interval::ray(f32::INFINITY)).is_none());
        assert!(!sphere.casts_shadows());
    }

    #[test]
    fn test_degenerate_sphere_never_hits() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 0.0, white_matte());
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        assert!(sphere.hit(&ray, Interval::ray(f32::INFINITY)).is_none());
    }
}
