//! Compound object: a group of child objects hit as one.

use std::sync::Arc;

use super::{nearest_hit, nearest_shadow_hit, GeometricObject};
use crate::{Hit, Material};
use wray_math::{Aabb, Interval, Ray};

/// A list of child objects tested by brute force.
///
/// The compound's bounding box is the union of its children's boxes, or
/// `None` as soon as one child is unbounded.
pub struct Compound {
    objects: Vec<Box<dyn GeometricObject>>,
    bbox: Option<Aabb>,
    shadows: bool,
}

impl Compound {
    /// Create a new empty compound.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Some(Aabb::EMPTY),
            shadows: true,
        }
    }

    /// Enable or disable shadow casting for the whole group.
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    /// Add an object to the compound.
    pub fn add_object(&mut self, object: Box<dyn GeometricObject>) {
        self.bbox = match (self.bbox, object.bounding_box()) {
            (Some(bbox), Some(child)) => Some(Aabb::surrounding(&bbox, &child)),
            _ => None,
        };
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the compound is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for Compound {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometricObject for Compound {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Hit<'a>> {
        nearest_hit(&self.objects, ray, ray_t)
    }

    fn shadow_hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        nearest_shadow_hit(&self.objects, ray, ray_t)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        for object in &mut self.objects {
            object.set_material(material.clone());
        }
    }
}
