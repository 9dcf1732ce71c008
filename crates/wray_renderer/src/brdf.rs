//! Reflectance functions used by the materials.
//!
//! Each BRDF works on unit vectors in world space: `wi` points toward the
//! light, `wo` back toward the viewer, and `n` is the shading normal facing
//! `wo`.

use std::f32::consts::FRAC_1_PI;

use crate::{Color, BLACK};
use wray_math::Vec3;

/// Mirror `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Perfectly diffuse reflection.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    pub kd: f32,
    pub cd: Color,
}

impl Lambertian {
    pub fn new(kd: f32, cd: Color) -> Self {
        Self { kd, cd }
    }

    /// `kd * cd / pi`, independent of direction.
    #[inline]
    pub fn f(&self) -> Color {
        self.kd * self.cd * FRAC_1_PI
    }

    /// Bihemispherical reflectance, `kd * cd`.
    #[inline]
    pub fn rho(&self) -> Color {
        self.kd * self.cd
    }
}

/// Phong-style glossy lobe around the mirror direction.
#[derive(Debug, Clone, Copy)]
pub struct GlossySpecular {
    pub ks: f32,
    pub cs: Color,
    pub exp: f32,
}

impl GlossySpecular {
    pub fn new(ks: f32, cs: Color, exp: f32) -> Self {
        Self { ks, cs, exp }
    }

    /// `ks * cs * (r . wo)^exp` where `r` is `wi` mirrored about `n`.
    pub fn f(&self, n: Vec3, wi: Vec3, wo: Vec3) -> Color {
        let r = -wi + 2.0 * n.dot(wi) * n;
        let r_dot_wo = r.dot(wo);

        if r_dot_wo > 0.0 {
            self.ks * self.cs * r_dot_wo.powf(self.exp)
        } else {
            BLACK
        }
    }
}

/// Perfect mirror reflection.
#[derive(Debug, Clone, Copy)]
pub struct PerfectSpecular {
    pub kr: f32,
    pub cr: Color,
}

impl PerfectSpecular {
    pub fn new(kr: f32, cr: Color) -> Self {
        Self { kr, cr }
    }

    /// Mirror direction of `wo` about `n`, and the reflected fraction `kr * cr`.
    pub fn sample_f(&self, n: Vec3, wo: Vec3) -> (Vec3, Color) {
        let wi = reflect(-wo, n);
        (wi, self.kr * self.cr)
    }
}

/// Result of splitting a ray at a dielectric boundary.
#[derive(Debug, Clone, Copy)]
pub struct FresnelSplit {
    /// Mirror direction
    pub reflected: Vec3,
    /// Refracted direction, `None` under total internal reflection
    pub transmitted: Option<Vec3>,
    /// Fraction of energy reflected
    pub kr: f32,
    /// Ratio of indices across the boundary (`eta_t / eta_i`)
    pub eta: f32,
}

impl FresnelSplit {
    /// Fraction of energy transmitted.
    #[inline]
    pub fn kt(&self) -> f32 {
        1.0 - self.kr
    }
}

/// Exact unpolarized Fresnel split of the ray arriving along `-wo` at a
/// surface with normal `n` (facing `wo`), going from a medium into one whose
/// relative index is `eta`.
pub fn fresnel_split(n: Vec3, wo: Vec3, eta: f32) -> FresnelSplit {
    let reflected = reflect(-wo, n);
    let cos_i = n.dot(wo).clamp(0.0, 1.0);
    let sin2_t = (1.0 - cos_i * cos_i) / (eta * eta);

    if sin2_t >= 1.0 {
        return FresnelSplit {
            reflected,
            transmitted: None,
            kr: 1.0,
            eta,
        };
    }

    let cos_t = (1.0 - sin2_t).sqrt();
    let r_parallel = (eta * cos_i - cos_t) / (eta * cos_i + cos_t);
    let r_perpendicular = (cos_i - eta * cos_t) / (cos_i + eta * cos_t);
    let kr = 0.5 * (r_parallel * r_parallel + r_perpendicular * r_perpendicular);

    let transmitted = (-wo / eta - (cos_t - cos_i / eta) * n).normalize_or_zero();

    FresnelSplit {
        reflected,
        transmitted: Some(transmitted),
        kr,
        eta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WHITE;

    #[test]
    fn test_lambertian() {
        let brdf = Lambertian::new(0.5, WHITE);
        assert!((brdf.f().x - 0.5 / std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(brdf.rho(), Color::splat(0.5));
    }

    #[test]
    fn test_glossy_peak_at_mirror_direction() {
        let brdf = GlossySpecular::new(0.5, WHITE, 20.0);
        let wi = Vec3::new(1.0, 1.0, 0.0).normalize();
        let mirror = Vec3::new(-1.0, 1.0, 0.0).normalize();

        assert!((brdf.f(Vec3::Y, wi, mirror).x - 0.5).abs() < 1e-5);
        assert!(brdf.f(Vec3::Y, wi, Vec3::Y).x < 0.5);
        assert_eq!(brdf.f(Vec3::Y, wi, wi * Vec3::new(1.0, -1.0, 1.0)), BLACK);
    }

    #[test]
    fn test_perfect_specular() {
        let brdf = PerfectSpecular::new(0.75, WHITE);
        let wo = Vec3::new(1.0, 1.0, 0.0).normalize();
        let (wi, fr) = brdf.sample_f(Vec3::Y, wo);

        assert!((wi - Vec3::new(-1.0, 1.0, 0.0).normalize()).length() < 1e-6);
        assert_eq!(fr, Color::splat(0.75));
    }

    #[test]
    fn test_fresnel_normal_incidence() {
        let split = fresnel_split(Vec3::Y, Vec3::Y, 1.5);

        // ((n - 1) / (n + 1))^2 = 0.04 for glass
        assert!((split.kr - 0.04).abs() < 1e-5);
        assert!((split.kt() - 0.96).abs() < 1e-5);
        let t = split.transmitted.unwrap();
        assert!((t + Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_fresnel_total_internal_reflection() {
        // Leaving glass at a grazing angle
        let wo = Vec3::new(0.9, 0.1, 0.0).normalize();
        let split = fresnel_split(Vec3::Y, wo, 1.0 / 1.5);

        assert!(split.transmitted.is_none());
        assert_eq!(split.kr, 1.0);
        assert_eq!(split.kt(), 0.0);
    }

    #[test]
    fn test_fresnel_obeys_snell() {
        let eta = 1.5;
        let wo = Vec3::new(0.5, 0.5, 0.0).normalize();
        let split = fresnel_split(Vec3::Y, wo, eta);
        let t = split.transmitted.unwrap();

        let sin_i = wo.cross(Vec3::Y).length();
        let sin_t = t.cross(-Vec3::Y).length();
        assert!((sin_i - eta * sin_t).abs() < 1e-5);
        assert!(split.kr > 0.04 && split.kr < 1.0);
    }
}
