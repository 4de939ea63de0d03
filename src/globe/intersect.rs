//! Analytic ray/sphere intersection.

use crate::math3d::Vec3;

/// Nearest forward hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the (unit) ray direction, never negative
    pub t: f32,
    pub point: Vec3,
}

/// Intersect a ray with a sphere.
///
/// `dir` is expected to be unit length. An origin inside the sphere yields a
/// hit at `t = 0` (the origin itself) rather than a negative distance.
/// Returns `None` when the origin is outside and the ray points away, or when
/// the ray misses entirely.
#[inline]
pub fn intersect(center: Vec3, radius: f32, origin: Vec3, dir: Vec3) -> Option<Hit> {
    let oc = origin - center;
    let b = oc.dot(&dir);
    let c = oc.dot(&oc) - radius * radius;

    // Outside and facing away: no need for the discriminant
    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()).max(0.0);
    Some(Hit {
        t,
        point: origin + dir * t,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_on_hit() {
        let hit = intersect(Vec3::ZERO, 1.0, Vec3::new(0.0, 0.0, 5.0), -Vec3::Z).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-6);
        assert!(hit.point.approx_eq(&Vec3::Z, 1e-6));
    }

    #[test]
    fn test_pointing_away_misses() {
        assert!(intersect(Vec3::ZERO, 1.0, Vec3::new(0.0, 0.0, 5.0), Vec3::Z).is_none());
    }

    #[test]
    fn test_passing_beside_misses() {
        let origin = Vec3::new(2.0, 0.0, 5.0);
        assert!(intersect(Vec3::ZERO, 1.0, origin, -Vec3::Z).is_none());
    }

    #[test]
    fn test_grazing_hit() {
        let origin = Vec3::new(1.0, 0.0, 5.0);
        let hit = intersect(Vec3::ZERO, 1.0, origin, -Vec3::Z).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_origin_inside_clamps_to_zero() {
        let origin = Vec3::new(0.0, 0.2, 0.0);
        let hit = intersect(Vec3::ZERO, 1.0, origin, Vec3::X).unwrap();
        assert_eq!(hit.t, 0.0);
        assert_eq!(hit.point, origin);
    }

    #[test]
    fn test_offset_center() {
        let center = Vec3::new(10.0, 0.0, 0.0);
        let hit = intersect(center, 2.0, Vec3::ZERO, Vec3::X).unwrap();
        assert!((hit.t - 8.0).abs() < 1e-5);
        assert!(hit.point.approx_eq(&Vec3::new(8.0, 0.0, 0.0), 1e-5));
    }
}
