//! Hit and ShadeRec: the results of ray-object intersection queries.

use crate::{Material, World};
use wray_math::{Ray, Vec3};

/// A single ray-object intersection, as reported by a geometric object.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Ray parameter (world-space distance) of the intersection
    pub t: f32,
    /// Outward surface normal at the intersection (unit length)
    pub normal: Vec3,
    /// Material of the object that was hit
    pub material: &'a dyn Material,
}

/// Everything a material needs to shade one ray-object intersection.
///
/// Built by [`World::hit_objects`] for the nearest hit only. Borrows the
/// world it came from, so it cannot outlive the query that produced it.
#[derive(Clone, Copy)]
pub struct ShadeRec<'w> {
    /// World-space hit point
    pub hit_point: Vec3,
    /// Unit normal at the hit point, facing against the incoming ray
    pub normal: Vec3,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
    /// The ray that produced this hit
    pub ray: Ray,
    /// Material of the hit object
    pub material: &'w dyn Material,
    /// Ray parameter of the hit
    pub t: f32,
    /// Recursion depth of `ray` (0 for primary rays)
    pub depth: u32,
    /// The world being rendered, for shadow and secondary-ray queries
    pub world: &'w World,
}

impl<'w> ShadeRec<'w> {
    /// Build a shading record from the nearest hit along `ray`.
    pub fn new(world: &'w World, ray: Ray, hit: Hit<'w>, depth: u32) -> Self {
        // If the ray and normal point in the same direction, we're inside
        let front_face = ray.direction().dot(hit.normal) < 0.0;
        let normal = if front_face { hit.normal } else { -hit.normal };

        Self {
            hit_point: ray.at(hit.t),
            normal,
            front_face,
            ray,
            material: hit.material,
            t: hit.t,
            depth,
            world,
        }
    }

    /// Unit vector pointing back along the incoming ray.
    #[inline]
    pub fn wo(&self) -> Vec3 {
        -self.ray.direction()
    }

    /// A ray leaving the hit point in direction `dir`, at the same time as the incoming ray.
    #[inline]
    pub fn spawn_ray(&self, dir: Vec3) -> Ray {
        Ray::new(self.hit_point, dir, self.ray.time())
    }
}
