//! Materials: how a surface turns incident light into outgoing radiance.

use std::sync::Arc;

use crate::brdf::{fresnel_split, GlossySpecular, Lambertian, PerfectSpecular};
use crate::texture::Texture;
use crate::{Color, ShadeRec, BLACK, WHITE};
use wray_math::Vec3;

/// Trait for surface materials.
///
/// `shade` evaluates ambient and direct illumination at the hit. Materials
/// that spawn secondary rays also implement `trace_further`, which the
/// Whitted tracer adds on top.
pub trait Material: Send + Sync {
    /// Ambient plus direct lighting at the hit point.
    fn shade(&self, sr: &ShadeRec) -> Color;

    /// Contribution of secondary rays (reflection, transmission).
    fn trace_further(&self, _sr: &ShadeRec) -> Color {
        BLACK
    }
}

/// Sum over the world's lights of `brdf(wi) * L * (n . wi)`.
///
/// Lights facing away from the surface are skipped, as are shadow-casting
/// lights whose shadow ray is blocked.
fn direct_lighting(sr: &ShadeRec, brdf: impl Fn(Vec3) -> Color) -> Color {
    let mut radiance = BLACK;

    for light in sr.world.lights() {
        let wi = light.direction(sr);
        let n_dot_wi = sr.normal.dot(wi);
        if n_dot_wi <= 0.0 {
            continue;
        }
        if light.casts_shadows() && light.in_shadow(&sr.spawn_ray(wi), sr) {
            continue;
        }
        radiance += brdf(wi) * light.radiance(sr) * n_dot_wi;
    }

    radiance
}

/// Secondary rays are only spawned while below the depth limit.
#[inline]
fn can_recurse(sr: &ShadeRec) -> bool {
    sr.depth < sr.world.vp.max_depth
}

/// Perfectly diffuse material.
#[derive(Debug, Clone, Copy)]
pub struct Matte {
    ambient: Lambertian,
    diffuse: Lambertian,
}

impl Matte {
    /// `ka` scales the ambient term, `kd` the diffuse term, both tinted by `cd`.
    pub fn new(ka: f32, kd: f32, cd: Color) -> Self {
        Self {
            ambient: Lambertian::new(ka, cd),
            diffuse: Lambertian::new(kd, cd),
        }
    }
}

impl Material for Matte {
    fn shade(&self, sr: &ShadeRec) -> Color {
        let ambient = self.ambient.rho() * sr.world.ambient_radiance(sr);
        ambient + direct_lighting(sr, |_| self.diffuse.f())
    }
}

/// Diffuse plus a glossy highlight.
#[derive(Debug, Clone, Copy)]
pub struct Phong {
    ambient: Lambertian,
    diffuse: Lambertian,
    specular: GlossySpecular,
}

impl Phong {
    /// Matte terms plus a white highlight of strength `ks` and sharpness `exp`.
    pub fn new(ka: f32, kd: f32, cd: Color, ks: f32, exp: f32) -> Self {
        Self {
            ambient: Lambertian::new(ka, cd),
            diffuse: Lambertian::new(kd, cd),
            specular: GlossySpecular::new(ks, WHITE, exp),
        }
    }

    /// Tint the highlight.
    pub fn with_specular_color(mut self, cs: Color) -> Self {
        self.specular.cs = cs;
        self
    }
}

impl Material for Phong {
    fn shade(&self, sr: &ShadeRec) -> Color {
        let wo = sr.wo();
        let ambient = self.ambient.rho() * sr.world.ambient_radiance(sr);
        ambient
            + direct_lighting(sr, |wi| {
                self.diffuse.f() + self.specular.f(sr.normal, wi, wo)
            })
    }
}

/// Phong surface with a perfect mirror component.
#[derive(Debug, Clone, Copy)]
pub struct Reflective {
    phong: Phong,
    mirror: PerfectSpecular,
}

impl Reflective {
    pub fn new(phong: Phong, kr: f32, cr: Color) -> Self {
        Self {
            phong,
            mirror: PerfectSpecular::new(kr, cr),
        }
    }
}

impl Material for Reflective {
    fn shade(&self, sr: &ShadeRec) -> Color {
        self.phong.shade(sr)
    }

    fn trace_further(&self, sr: &ShadeRec) -> Color {
        if !can_recurse(sr) {
            return BLACK;
        }

        let (wi, fr) = self.mirror.sample_f(sr.normal, sr.wo());
        fr * sr.world.trace_ray(&sr.spawn_ray(wi), sr.depth + 1)
    }
}

/// Dielectric with index of refraction `ior` relative to the surrounding medium.
///
/// The surface normal points out of the object. Reflected and transmitted
/// rays are weighted by the exact Fresnel reflectance; under total internal
/// reflection all the energy goes to the reflected ray.
#[derive(Debug, Clone, Copy)]
pub struct Transparent {
    phong: Phong,
    ior: f32,
}

impl Transparent {
    pub fn new(phong: Phong, ior: f32) -> Self {
        Self { phong, ior }
    }
}

impl Material for Transparent {
    fn shade(&self, sr: &ShadeRec) -> Color {
        self.phong.shade(sr)
    }

    fn trace_further(&self, sr: &ShadeRec) -> Color {
        if !can_recurse(sr) {
            return BLACK;
        }

        let eta = if sr.front_face { self.ior } else { 1.0 / self.ior };
        let split = fresnel_split(sr.normal, sr.wo(), eta);
        let depth = sr.depth + 1;

        let mut radiance = split.kr * sr.world.trace_ray(&sr.spawn_ray(split.reflected), depth);
        if let Some(wt) = split.transmitted {
            // Radiance is compressed by eta^2 entering a denser medium
            let scale = split.kt() / (eta * eta);
            radiance += scale * sr.world.trace_ray(&sr.spawn_ray(wt), depth);
        }

        radiance
    }
}

/// Self-luminous surface, used to make area lights visible.
#[derive(Debug, Clone, Copy)]
pub struct Emissive {
    pub ls: f32,
    pub ce: Color,
}

impl Emissive {
    pub fn new(ls: f32, ce: Color) -> Self {
        Self { ls, ce }
    }

    /// Emitted radiance `ls * ce`.
    pub fn radiance(&self) -> Color {
        self.ls * self.ce
    }
}

impl Material for Emissive {
    fn shade(&self, sr: &ShadeRec) -> Color {
        if sr.front_face {
            self.radiance()
        } else {
            BLACK
        }
    }
}

/// Matte whose diffuse color comes from a texture.
#[derive(Clone)]
pub struct SvMatte {
    ka: f32,
    kd: f32,
    cd: Arc<dyn Texture>,
}

impl SvMatte {
    pub fn new(ka: f32, kd: f32, cd: Arc<dyn Texture>) -> Self {
        Self { ka, kd, cd }
    }
}

impl Material for SvMatte {
    fn shade(&self, sr: &ShadeRec) -> Color {
        let cd = self.cd.color(sr);
        let ambient = Lambertian::new(self.ka, cd).rho() * sr.world.ambient_radiance(sr);
        let diffuse = Lambertian::new(self.kd, cd);
        ambient + direct_lighting(sr, |_| diffuse.f())
    }
}
