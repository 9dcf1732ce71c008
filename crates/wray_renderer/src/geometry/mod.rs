//! Geometric objects and the nearest-hit reduction shared by containers.

use std::sync::Arc;

use crate::{Hit, Material};
use wray_math::{Aabb, Interval, Ray};

mod aa_box;
mod compound;
mod grid;
mod plane;
mod sphere;
mod triangle;

pub use aa_box::AaBox;
pub use compound::Compound;
pub use grid::{Grid, DEFAULT_GRID_MULTIPLIER};
pub use plane::Plane;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Trait for objects that can be hit by rays.
///
/// Every query takes the interval of acceptable ray parameters. Callers pass
/// intervals whose lower bound is `K_EPSILON`, and implementations only
/// report roots strictly inside the interval. Degenerate numerics (parallel
/// rays, zero-area faces, NaN roots) are reported as misses.
pub trait GeometricObject: Send + Sync {
    /// Nearest intersection inside `ray_t`, with outward normal and material.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Hit<'a>>;

    /// Nearest intersection parameter inside `ray_t`, for occlusion tests.
    ///
    /// Returns `None` for objects that do not cast shadows.
    fn shadow_hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32>;

    /// World-space bounds, or `None` for unbounded objects such as planes.
    fn bounding_box(&self) -> Option<Aabb>;

    /// Whether this object occludes shadow rays.
    fn casts_shadows(&self) -> bool;

    /// Replace the material (for compounds, the material of every child).
    fn set_material(&mut self, material: Arc<dyn Material>);
}

/// Nearest hit among `objects`.
///
/// The interval shrinks to each accepted hit, so a later object only
/// replaces the current one when it is strictly closer.
pub(crate) fn nearest_hit<'a>(
    objects: impl IntoIterator<Item = &'a Box<dyn GeometricObject>>,
    ray: &Ray,
    ray_t: Interval,
) -> Option<Hit<'a>> {
    let mut closest = None;
    let mut interval = ray_t;

    for object in objects {
        if let Some(hit) = object.hit(ray, interval) {
            interval = interval.with_max(hit.t);
            closest = Some(hit);
        }
    }

    closest
}

/// Nearest shadow-hit parameter among `objects`.
pub(crate) fn nearest_shadow_hit<'a>(
    objects: impl IntoIterator<Item = &'a Box<dyn GeometricObject>>,
    ray: &Ray,
    ray_t: Interval,
) -> Option<f32> {
    let mut closest = None;
    let mut interval = ray_t;

    for object in objects {
        if let Some(t) = object.shadow_hit(ray, interval) {
            interval = interval.with_max(t);
            closest = Some(t);
        }
    }

    closest
}
