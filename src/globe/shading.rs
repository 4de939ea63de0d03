//! Planet Surface and Sky Shading
//!
//! Pure per-pixel functions: given the view ray and the bound textures they
//! produce a linear RGBA color. The sphere is the unit sphere at the origin.

use crate::loader::TextureSet;
use crate::math3d::{lerp, Vec3};
use crate::noise::{fbm, fbm_octaves, CLOUD_OCTAVES};

use super::intersect::intersect;
use super::projection::to_tex_coord;

/// Half-width of the bump map finite-difference taps, in UV units
const BUMP_TAP: f32 = 0.00025;
/// Height bias on the tangent-space "up" component of the bump normal
const BUMP_BIAS: f32 = 0.3;
/// Cloud noise frequency on the unit sphere
const CLOUD_SCALE: f32 = 13.0;
const SPECULAR_POWER: i32 = 16;
const SPECULAR_STRENGTH: f32 = 0.8;
const ATMOSPHERE_TINT: Vec3 = Vec3::new(0.4, 0.6, 1.0);
const ATMOSPHERE_EXPONENT: f32 = 2.5;
const ATMOSPHERE_FLOOR: f32 = 0.1;

/// Per-frame scalars shared by every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneUniforms {
    pub time_ms: f32,
    /// Output width over height
    pub aspect_ratio: f32,
    pub cloud_octaves: u32,
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            time_ms: 0.0,
            aspect_ratio: 1.0,
            cloud_octaves: CLOUD_OCTAVES,
        }
    }
}

/// Intermediate values of one surface evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub hit_point: Vec3,
    pub normal_dir: Vec3,
    pub tex_coord: (f32, f32),
    pub cloud_density: f32,
    pub day_color: Vec3,
    pub night_color: Vec3,
    pub specular: f32,
}

/// Slowly orbiting sun direction at `time_ms`.
pub fn light_direction(time_ms: f32) -> Vec3 {
    Vec3::new(
        (time_ms / 10_000.0).sin(),
        (time_ms / 40_000.0).cos() * 0.25,
        (time_ms / 10_000.0).cos(),
    )
    .normalize()
}

/// Clamp to [0, 1], mapping NaN to 0.
#[inline]
fn saturate(x: f32) -> f32 {
    if x > 0.0 {
        x.min(1.0)
    } else {
        0.0
    }
}

#[inline]
fn rgb(c: [f32; 4]) -> Vec3 {
    Vec3::new(c[0], c[1], c[2])
}

/// Animated cloud coverage at a point on the unit sphere.
///
/// `coverage` is the static bias from the cloud map's red channel.
pub fn cloud_density(g: Vec3, coverage: f32, time_ms: f32, octaves: u32) -> f32 {
    let p = g * CLOUD_SCALE;
    let field = if octaves >= CLOUD_OCTAVES {
        fbm(p, time_ms)
    } else {
        fbm_octaves(p, time_ms, octaves)
    };
    saturate((field - 1.0 + coverage) * 2.0)
}

/// Bump-mapped world-space normal at `g` with texture coordinate `(u, v)`.
///
/// The frame `(g, tangent, bitangent)` is not orthonormal, so the result is
/// generally shorter than unit length. It is used as-is for lighting.
pub fn bumped_normal(g: Vec3, u: f32, v: f32, textures: &TextureSet) -> Vec3 {
    let bump = textures.bump();
    let du = bump.sample_red(u - BUMP_TAP, v) - bump.sample_red(u + BUMP_TAP, v);
    let dv = bump.sample_red(u, v - BUMP_TAP) - bump.sample_red(u, v + BUMP_TAP);
    let nrm = Vec3::new(-du, BUMP_BIAS, -dv).normalize();

    let tangent = Vec3::new(g.z, g.y, -g.x);
    let bitangent = nrm.cross(&tangent);
    g * nrm.x + tangent * nrm.y + bitangent * nrm.z
}

/// Shade a ray that hit the planet at `hit_point`.
pub fn shade_surface(
    hit_point: Vec3,
    ray_dir: Vec3,
    uniforms: &SceneUniforms,
    textures: &TextureSet,
) -> ([f32; 4], SurfaceSample) {
    let g = hit_point.normalize();
    let uv = to_tex_coord(g);
    let (u, v) = (uv.x, uv.y);

    let clouds = cloud_density(
        g,
        textures.clouds().sample_red(u, v),
        uniforms.time_ms,
        uniforms.cloud_octaves,
    );
    let diffuse_tex = rgb(textures.diffuse().sample(u, v));
    let day = lerp(diffuse_tex, Vec3::ONE, clouds);
    let night = lerp(rgb(textures.night().sample(u, v)), Vec3::ZERO, clouds);

    let world_normal = bumped_normal(g, u, v, textures);
    let light = light_direction(uniforms.time_ms);
    let diffuse = world_normal.dot(&light).max(0.0);

    let half = (light - ray_dir).normalize();
    let specular = textures.spec().sample_red(u, v)
        * world_normal.dot(&half).max(0.0).powi(SPECULAR_POWER)
        * SPECULAR_STRENGTH;

    let mut col = day + Vec3::splat(specular);
    let rim = ATMOSPHERE_FLOOR.max((1.0 - g.dot(&-ray_dir)).max(0.0).powf(ATMOSPHERE_EXPONENT));
    col = lerp(col, ATMOSPHERE_TINT, rim);
    col = lerp(night, col, diffuse);

    let sample = SurfaceSample {
        hit_point,
        normal_dir: g,
        tex_coord: (u, v),
        cloud_density: clouds,
        day_color: day,
        night_color: night,
        specular,
    };
    ([col.x, col.y, col.z, 1.0], sample)
}

/// Panorama lookup for rays that miss the planet.
pub fn shade_sky(ray_dir: Vec3, textures: &TextureSet) -> [f32; 4] {
    let uv = to_tex_coord(ray_dir);
    let c = textures.sky().sample(uv.x, uv.y);
    [c[0], c[1], c[2], 1.0]
}

/// Full pipeline for one ray: intersect, then surface or sky.
pub fn shade_pixel(
    origin: Vec3,
    ray_dir: Vec3,
    uniforms: &SceneUniforms,
    textures: &TextureSet,
) -> [f32; 4] {
    match intersect(Vec3::ZERO, 1.0, origin, ray_dir) {
        Some(hit) => shade_surface(hit.point, ray_dir, uniforms, textures).0,
        None => shade_sky(ray_dir, textures),
    }
}
