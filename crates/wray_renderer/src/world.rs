//! The scene: objects, lights, camera, tracer and view plane.

use crate::error::{RenderResult, WorldError};
use crate::geometry::{nearest_hit, GeometricObject};
use crate::{Camera, Color, Light, ShadeRec, Tracer, ViewPlane, BLACK};
use wray_math::{Interval, Ray};

/// Everything needed to render one image.
///
/// The world owns its objects and lights. It is shared read-only between the
/// render workers, and passed explicitly to tracers, materials and lights
/// that need to query it.
pub struct World {
    pub vp: ViewPlane,
    pub background_color: Color,
    tracer: Option<Box<dyn Tracer>>,
    ambient: Option<Box<dyn Light>>,
    camera: Option<Box<dyn Camera>>,
    objects: Vec<Box<dyn GeometricObject>>,
    lights: Vec<Box<dyn Light>>,
}

impl World {
    /// Create an empty world with a default view plane and a black background.
    pub fn new() -> Self {
        Self {
            vp: ViewPlane::default(),
            background_color: BLACK,
            tracer: None,
            ambient: None,
            camera: None,
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: Box<dyn GeometricObject>) {
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: Box<dyn Light>) {
        self.lights.push(light);
    }

    pub fn set_ambient_light(&mut self, light: Box<dyn Light>) {
        self.ambient = Some(light);
    }

    pub fn set_camera(&mut self, camera: Box<dyn Camera>) {
        self.camera = Some(camera);
    }

    pub fn set_tracer(&mut self, tracer: Box<dyn Tracer>) {
        self.tracer = Some(tracer);
    }

    /// The lights used for direct illumination (not including ambient).
    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn camera(&self) -> Option<&dyn Camera> {
        self.camera.as_deref()
    }

    pub fn tracer(&self) -> Option<&dyn Tracer> {
        self.tracer.as_deref()
    }

    /// Ambient radiance at the hit point, black without an ambient light.
    pub fn ambient_radiance(&self, sr: &ShadeRec) -> Color {
        self.ambient.as_ref().map_or(BLACK, |ambient| ambient.radiance(sr))
    }

    /// Check that the world can be rendered.
    ///
    /// A missing camera or tracer is an error. A missing ambient light, no
    /// lights, or no objects only produce warnings, since the image is still
    /// well defined.
    pub fn check(&self) -> RenderResult<()> {
        if self.camera.is_none() {
            return Err(WorldError::MissingCamera);
        }
        if self.tracer.is_none() {
            return Err(WorldError::MissingTracer);
        }
        if self.vp.hres == 0 || self.vp.vres == 0 {
            return Err(WorldError::EmptyViewPlane {
                hres: self.vp.hres,
                vres: self.vp.vres,
            });
        }

        if self.ambient.is_none() {
            log::warn!("World has no ambient light");
        }
        if self.lights.is_empty() {
            log::warn!("World has no lights");
        }
        if self.objects.is_empty() {
            log::warn!("World has no objects to display");
        }

        Ok(())
    }

    /// Nearest hit along `ray`, as a shading record for recursion depth 0.
    pub fn hit_objects(&self, ray: &Ray) -> Option<ShadeRec<'_>> {
        self.hit_objects_at_depth(ray, 0)
    }

    /// Nearest hit along `ray`, for a ray `depth` bounces from the camera.
    pub fn hit_objects_at_depth(&self, ray: &Ray, depth: u32) -> Option<ShadeRec<'_>> {
        if ray.is_degenerate() {
            return None;
        }

        let hit = nearest_hit(&self.objects, ray, Interval::ray(f32::INFINITY))?;
        Some(ShadeRec::new(self, *ray, hit, depth))
    }

    /// Whether any shadow-casting object lies along `ray` in `(K_EPSILON, max_t)`.
    pub fn shadow_hit(&self, ray: &Ray, max_t: f32) -> bool {
        if ray.is_degenerate() {
            return false;
        }

        let interval = Interval::ray(max_t);
        self.objects
            .iter()
            .filter(|object| object.casts_shadows())
            .any(|object| object.shadow_hit(ray, interval).is_some())
    }

    /// Radiance along `ray` according to the world's tracer, or the background
    /// color when no tracer is set.
    pub fn trace_ray(&self, ray: &Ray, depth: u32) -> Color {
        match &self.tracer {
            Some(tracer) => tracer.trace_ray(self, ray, depth),
            None => self.background_color,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
