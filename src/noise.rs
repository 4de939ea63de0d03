//! Noise Generation Utilities
//!
//! Hash-based 3D value noise and the fractal Brownian motion sum that drives
//! the animated cloud layer. The lattice hash is the polynomial permutation
//! `mod289((34x + 1) x)`, so results depend only on the input coordinates.

use crate::math3d::Vec3;

/// Octave count the cloud layer is tuned for.
pub const CLOUD_OCTAVES: u32 = 16;

/// Per-millisecond drift applied to every fbm sample coordinate.
const TIME_DRIFT: f32 = 0.00008;

/// Frequency gain between octaves.
const LACUNARITY: f32 = 1.95;

/// Constant offset added after each octave's domain rotation.
const OCTAVE_OFFSET: f32 = 14.5;

/// Columns of the fixed domain rotation applied between octaves.
const OCTAVE_ROTATION: [Vec3; 3] = [
    Vec3::new(0.8168387, 0.5092981, 0.2709058),
    Vec3::new(-0.5514276, 0.5514418, 0.6259709),
    Vec3::new(0.1694170, -0.6607022, 0.7312800),
];

/// `x - floor(x / 289) * 289`, computed as an exact Euclidean remainder so
/// deep octaves with large lattice coordinates stay bounded.
#[inline]
fn mod289(x: f32) -> f32 {
    x.rem_euclid(289.0)
}

/// Polynomial permutation used to hash lattice coordinates.
#[inline]
pub fn perm(x: f32) -> f32 {
    mod289(((x * 34.0) + 1.0) * x)
}

/// Fractional part rounding towards negative infinity (always in [0, 1)).
#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Smoothstep interpolation: 3t² - 2t³
/// Maps [0,1] to [0,1] with smooth acceleration and deceleration.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 3D value noise with smoothstep interpolation.
/// Returns a value in [0.0, 1.0].
pub fn value_noise(p: Vec3) -> f32 {
    let ax = p.x.floor();
    let ay = p.y.floor();
    let az = p.z.floor();
    let dx = smoothstep(p.x - ax);
    let dy = smoothstep(p.y - ay);
    let dz = smoothstep(p.z - az);

    // Hash x, then fold in y, then z
    let hx0 = perm(ax);
    let hx1 = perm(ax + 1.0);
    let hxy = [
        perm(hx0 + ay),
        perm(hx1 + ay),
        perm(hx0 + ay + 1.0),
        perm(hx1 + ay + 1.0),
    ];

    // Corner values on the near (z0) and far (z1) faces, lerped along z
    let mut face = [0.0f32; 4];
    for (out, &h) in face.iter_mut().zip(hxy.iter()) {
        let c = h + az;
        let z0 = fract(perm(c) * (1.0 / 41.0));
        let z1 = fract(perm(c + 1.0) * (1.0 / 41.0));
        *out = z1 * dz + z0 * (1.0 - dz);
    }

    // face = [x0y0, x1y0, x0y1, x1y1]
    let y0 = face[1] * dx + face[0] * (1.0 - dx);
    let y1 = face[3] * dx + face[2] * (1.0 - dx);

    y1 * dy + y0 * (1.0 - dy)
}

#[inline]
fn rotate_octave(q: Vec3) -> Vec3 {
    OCTAVE_ROTATION[0] * q.x + OCTAVE_ROTATION[1] * q.y + OCTAVE_ROTATION[2] * q.z
}

/// Fractional Brownian motion over `value_noise`, animated by `time_ms`.
///
/// Each octave halves the weight, rotates the domain by a fixed matrix, scales
/// it by 1.95 and offsets it by 14.5. Uses the full [`CLOUD_OCTAVES`] count.
///
/// # Returns
/// Value in [0.0, 1.0)
#[inline]
pub fn fbm(p: Vec3, time_ms: f32) -> f32 {
    fbm_octaves(p, time_ms, CLOUD_OCTAVES)
}

/// `fbm` with a reduced octave count for cheaper previews.
/// `octaves` is clamped to `1..=CLOUD_OCTAVES`.
pub fn fbm_octaves(p: Vec3, time_ms: f32, octaves: u32) -> f32 {
    let octaves = octaves.clamp(1, CLOUD_OCTAVES);
    let mut q = p + Vec3::splat(time_ms * TIME_DRIFT);
    let mut weight = 0.5;
    let mut value = 0.0;

    for _ in 0..octaves {
        value += weight * value_noise(q);
        q = rotate_octave(q) * LACUNARITY + Vec3::splat(OCTAVE_OFFSET);
        weight *= 0.5;
    }
    value
}
