//! Axis-aligned box primitive.

use std::sync::Arc;

use super::GeometricObject;
use crate::{Hit, Material};
use wray_math::{Aabb, Interval, Ray, Vec3};

/// A solid axis-aligned box between two corners.
pub struct AaBox {
    bounds: Aabb,
    material: Arc<dyn Material>,
    shadows: bool,
}

/// Entry and exit parameters of a ray through the box slabs, with the axis
/// of the face crossed at each.
struct SlabCrossing {
    t_in: f32,
    t_out: f32,
    face_in: usize,
    face_out: usize,
}

impl AaBox {
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            bounds: Aabb::from_points(p0, p1),
            material,
            shadows: true,
        }
    }

    /// Enable or disable shadow casting.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    /// Slab test tracking which face is crossed on the way in and out.
    fn cross(&self, ray: &Ray) -> Option<SlabCrossing> {
        let origin = ray.origin();
        let dir = ray.direction();

        let mut crossing = SlabCrossing {
            t_in: f32::NEG_INFINITY,
            t_out: f32::INFINITY,
            face_in: 0,
            face_out: 0,
        };

        for axis in 0..3 {
            let slab = self.bounds.axis_interval(axis);
            let (o, d) = (origin[axis], dir[axis]);

            if d == 0.0 {
                if o < slab.min || o > slab.max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t0, t1) = if inv >= 0.0 {
                ((slab.min - o) * inv, (slab.max - o) * inv)
            } else {
                ((slab.max - o) * inv, (slab.min - o) * inv)
            };

            if t0 > crossing.t_in {
                crossing.t_in = t0;
                crossing.face_in = axis;
            }
            if t1 < crossing.t_out {
                crossing.t_out = t1;
                crossing.face_out = axis;
            }
        }

        (crossing.t_in < crossing.t_out).then_some(crossing)
    }

    /// Outward normal of the face on `axis` that a ray travelling along `dir`
    /// enters (`entering == true`) or leaves.
    fn face_normal(axis: usize, dir: Vec3, entering: bool) -> Vec3 {
        let mut n = Vec3::ZERO;
        let toward_positive = dir[axis] >= 0.0;
        n[axis] = if toward_positive == entering { -1.0 } else { 1.0 };
        n
    }

    /// Nearest accepted parameter plus the outward normal of the face hit.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, Vec3)> {
        let crossing = self.cross(ray)?;

        if ray_t.surrounds(crossing.t_in) {
            Some((crossing.t_in, Self::face_normal(crossing.face_in, ray.direction(), true)))
        } else if ray_t.surrounds(crossing.t_out) {
            // Ray starts inside the box
            Some((crossing.t_out, Self::face_normal(crossing.face_out, ray.direction(), false)))
        } else {
            None
        }
    }
}

impl GeometricObject for AaBox {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Hit<'a>> {
        let (t, normal) = self.intersect(ray, ray_t)?;
        Some(Hit {
            t,
            normal,
            material: self.material.as_ref(),
        })
    }

    fn shadow_hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        let crossing = self.cross(ray)?;
        [crossing.t_in, crossing.t_out]
            .into_iter()
            .find(|&t| ray_t.surrounds(t))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bounds)
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

    fn unit_box() -> AaBox {
        AaBox::new(Vec3::splat(-1.0), Vec3::splat(1.0), white_matte())
    }

    #[test]
    fn test_box_hit_front_face() {
        let aa_box = unit_box();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);

        let hit = aa_box.hit(&ray, Interval::ray(f32::INFINITY)).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_box_hit_each_axis() {
        let aa_box = unit_box();

        let hit = aa_box
            .hit(&Ray::new_simple(Vec3::new(-3.0, 0.2, 0.1), Vec3::X), Interval::ray(f32::INFINITY))
            .unwrap();
        assert_eq!(hit.normal, -Vec3::X);

        let hit = aa_box
            .hit(&Ray::new_simple(Vec3::new(0.3, 4.0, 0.1), -Vec3::Y), Interval::ray(f32::INFINITY))
            .unwrap();
        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.t - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_box_hit_from_inside() {
        let aa_box = unit_box();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);

        let hit = aa_box.hit(&ray, Interval::ray(f32::INFINITY)).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-5);
        // Outward normal of the exit face
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_box_miss() {
        let aa_box = unit_box();

        let ray = Ray::new_simple(Vec3::new(0.0, 3.0, 5.0), -Vec3::Z);
        assert!(aa_box.hit(&ray, Interval::ray(f32::INFINITY)).is_none());

        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(aa_box.hit(&ray, Interval::ray(f32::INFINITY)).is_none());
        assert!(aa_box.shadow_hit(&ray, Interval::ray(f32::INFINITY)).is_none());
    }

    #[test]
    fn test_box_shadow_hit_limited_by_interval() {
        let aa_box = unit_box();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);

        assert!(aa_box.shadow_hit(&ray, Interval::ray(3.0)).is_none());
        let t = aa_box.shadow_hit(&ray, Interval::ray(10.0)).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }
}
