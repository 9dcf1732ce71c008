use crate::Vec3;

/// A ray in 3D space with origin, direction, and time.
///
/// The direction is normalized on construction, so the ray parameter `t`
/// is a world-space distance. A zero or non-finite direction collapses to
/// `Vec3::ZERO`; such rays are [`degenerate`](Ray::is_degenerate) and never
/// hit anything.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    time: f32,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            time,
        }
    }

    /// Create a ray at time 0.
    #[inline]
    pub fn new_simple(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the time value of the ray.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// True when the direction could not be normalized, or the origin is not finite.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO || !self.origin.is_finite()
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0), 0.5);

        assert!((ray.direction().length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.direction(), Vec3::new(0.0, 0.6, 0.8));
        assert_eq!(ray.time(), 0.5);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.5), Vec3::new(2.5, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_degenerate_ray() {
        assert!(Ray::new_simple(Vec3::ZERO, Vec3::ZERO).is_degenerate());
        assert!(Ray::new_simple(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 1.0)).is_degenerate());
        assert!(Ray::new_simple(Vec3::splat(f32::INFINITY), Vec3::Z).is_degenerate());
        assert!(!Ray::new_simple(Vec3::ONE, Vec3::Z).is_degenerate());
    }
}
