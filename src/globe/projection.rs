//! Equirectangular projection between unit directions and texture space.

use std::f32::consts::{PI, TAU};

use crate::math3d::{Vec2, Vec3};

/// Map a unit direction to `(u, v)` texture coordinates.
///
/// Longitude runs along `u` (mirrored so the map reads east-to-west when seen
/// from outside), latitude along `v` with the north pole (`+y`) at `v = 0`.
#[inline]
pub fn to_tex_coord(dir: Vec3) -> Vec2 {
    // Normalization upstream can overshoot 1 by an ulp; asin would return NaN.
    let sin_lat = (-dir.y).clamp(-1.0, 1.0);
    Vec2::new(
        1.0 - (0.5 + dir.z.atan2(dir.x) / TAU),
        0.5 + sin_lat.asin() / PI,
    )
}

/// Inverse of [`to_tex_coord`]: the unit direction that projects to `uv`.
#[cfg(test)]
pub fn from_tex_coord(uv: Vec2) -> Vec3 {
    let lon = (0.5 - uv.x) * TAU;
    let lat = (uv.y - 0.5) * PI;
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    Vec3::new(cos_lat * cos_lon, -sin_lat, cos_lat * sin_lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_poles() {
        let north = to_tex_coord(Vec3::Y);
        let south = to_tex_coord(-Vec3::Y);
        assert!((north.y - 0.0).abs() < 1e-6);
        assert!((south.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_overshooting_pole_is_not_nan() {
        let uv = to_tex_coord(Vec3::new(0.0, 1.000_000_1, 0.0));
        assert!(uv.x.is_finite() && uv.y.is_finite());
        assert!((uv.y - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_equator_reference_points() {
        // +x: atan2(0, 1) = 0 -> u = 0.5
        let uv = to_tex_coord(Vec3::X);
        assert!(uv.approx_eq(&Vec2::new(0.5, 0.5), 1e-6));
        // +z: atan2(1, 0) = pi/2 -> u = 0.25
        let uv = to_tex_coord(Vec3::Z);
        assert!(uv.approx_eq(&Vec2::new(0.25, 0.5), 1e-6));
    }

    #[test]
    fn test_output_in_unit_square() {
        for i in 0..64 {
            let a = i as f32 * 0.37;
            let dir = Vec3::new(a.cos(), (a * 0.7).sin(), a.sin()).normalize();
            let uv = to_tex_coord(dir);
            assert!((0.0..=1.0).contains(&uv.x), "u = {}", uv.x);
            assert!((0.0..=1.0).contains(&uv.y), "v = {}", uv.y);
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip_away_from_poles(u in 0.01f32..0.99, v in 0.05f32..0.95) {
            let uv = Vec2::new(u, v);
            let dir = from_tex_coord(uv);
            prop_assert!((dir.length() - 1.0).abs() < 1e-5);
            let back = to_tex_coord(dir);
            prop_assert!(back.approx_eq(&uv, 1e-4), "{:?} -> {:?}", uv, back);
        }
    }
}
