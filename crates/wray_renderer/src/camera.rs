//! Cameras for primary ray generation.

use crate::ViewPlane;
use wray_math::{any_perpendicular, Ray, Vec2, Vec3};

/// Where on the view plane (and lens) a primary ray is shot through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    /// Pixel row, 0 at the bottom of the image
    pub row: u32,
    /// Pixel column, 0 at the left
    pub col: u32,
    /// Offset inside the pixel, in `[0, 1)^2`
    pub square: Vec2,
    /// Point on the unit disk, for cameras with an aperture
    pub disk: Vec2,
}

impl PixelSample {
    /// Sample through the center of pixel `(row, col)`.
    pub fn center(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            square: Vec2::splat(0.5),
            disk: Vec2::ZERO,
        }
    }

    /// Point on the view plane (camera space, before scaling by `pixel_size / zoom`).
    fn plane_offset(&self, vp: &ViewPlane) -> Vec2 {
        Vec2::new(
            self.col as f32 - 0.5 * vp.hres as f32 + self.square.x,
            self.row as f32 - 0.5 * vp.vres as f32 + self.square.y,
        )
    }
}

/// Trait for cameras.
pub trait Camera: Send + Sync {
    /// Primary ray for one sample of one pixel.
    fn ray(&self, vp: &ViewPlane, sample: &PixelSample) -> Ray;
}

/// Orthonormal camera frame. `w` points from the look-at point back to the eye.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Basis {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Basis {
    fn new(eye: Vec3, lookat: Vec3, up: Vec3) -> Self {
        let w = match (eye - lookat).try_normalize() {
            Some(w) => w,
            None => Vec3::Z,
        };

        // Looking along the up vector: any frame around w will do
        let u = match up.cross(w).try_normalize() {
            Some(u) => u,
            None => any_perpendicular(w),
        };
        let v = w.cross(u);

        Self { u, v, w }
    }
}

/// Pinhole perspective camera.
#[derive(Debug, Clone, Copy)]
pub struct Pinhole {
    eye: Vec3,
    lookat: Vec3,
    up: Vec3,
    /// Distance from the eye to the view plane
    view_distance: f32,
    zoom: f32,
    basis: Basis,
}

impl Pinhole {
    pub fn new(eye: Vec3, lookat: Vec3, view_distance: f32) -> Self {
        Self {
            eye,
            lookat,
            up: Vec3::Y,
            view_distance,
            zoom: 1.0,
            basis: Basis::new(eye, lookat, Vec3::Y),
        }
    }

    /// Set the up vector.
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self.basis = Basis::new(self.eye, self.lookat, up);
        self
    }

    /// Set the zoom factor (values above 1 magnify).
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Direction from the eye through view-plane point `p`.
    fn direction(&self, p: Vec2) -> Vec3 {
        p.x * self.basis.u + p.y * self.basis.v - self.view_distance * self.basis.w
    }
}

impl Camera for Pinhole {
    fn ray(&self, vp: &ViewPlane, sample: &PixelSample) -> Ray {
        let p = sample.plane_offset(vp) * (vp.pixel_size / self.zoom);
        Ray::new_simple(self.eye, self.direction(p))
    }
}

/// Thin-lens camera: a pinhole with a circular aperture of radius
/// `lens_radius`, in sharp focus at `focal_distance` along the view axis.
#[derive(Debug, Clone, Copy)]
pub struct ThinLens {
    pinhole: Pinhole,
    lens_radius: f32,
    focal_distance: f32,
}

impl ThinLens {
    pub fn new(pinhole: Pinhole, lens_radius: f32, focal_distance: f32) -> Self {
        Self {
            pinhole,
            lens_radius,
            focal_distance,
        }
    }
}

impl Camera for ThinLens {
    fn ray(&self, vp: &ViewPlane, sample: &PixelSample) -> Ray {
        let camera = &self.pinhole;
        let basis = &camera.basis;

        let p = sample.plane_offset(vp) * (vp.pixel_size / camera.zoom);
        let lens = sample.disk * self.lens_radius;

        // Point on the focal plane that the pinhole ray through p would reach
        let focus = p * (self.focal_distance / camera.view_distance);

        let origin = camera.eye + lens.x * basis.u + lens.y * basis.v;
        let dir = (focus.x - lens.x) * basis.u + (focus.y - lens.y) * basis.v
            - self.focal_distance * basis.w;

        Ray::new_simple(origin, dir)
    }
}
