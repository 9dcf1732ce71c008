// Re-export glam for convenience
pub use glam::*;

// wray math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Smallest ray parameter accepted as a hit.
///
/// Intersections at `t <= K_EPSILON` are discarded so that secondary rays
/// leaving a surface do not hit the surface they start on.
pub const K_EPSILON: f32 = 1e-3;

/// A unit vector perpendicular to the unit vector `n`. Used to build
/// orthonormal bases around normals.
pub fn any_perpendicular(n: Vec3) -> Vec3 {
    if n.x.abs() > 0.9 {
        n.cross(Vec3::Y).normalize()
    } else {
        n.cross(Vec3::X).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        let c = a + b;
        assert_eq!(c, Vec3::new(5.0, 7.0, 9.0));
    }

    #[test]
    fn test_any_perpendicular() {
        for n in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 1.0, 1.0).normalize()] {
            let p = any_perpendicular(n);
            assert!(p.dot(n).abs() < 1e-6);
            assert!((p.length() - 1.0).abs() < 1e-6);
        }
    }
}
