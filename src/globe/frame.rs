//! Per-frame camera snapshot and the data-parallel shading pass.

use rayon::prelude::*;

use crate::display::{write_pixel_rgba, PixelBuffer};
use crate::loader::TextureSet;
use crate::math3d::{Mat4, Vec2, Vec3};

use super::arcball::CameraState;
use super::shading::{shade_pixel, SceneUniforms};

/// Camera-to-world matrix: rotation by the orientation followed by a
/// translation of the current radius along the local backward axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    matrix: Mat4,
}

impl CameraTransform {
    pub fn from_state(state: &CameraState) -> Self {
        Self::from_matrix(
            Mat4::from_quat(state.orientation).translate(Vec3::new(0.0, 0.0, state.radius_current)),
        )
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.matrix.column(0)
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.matrix.column(1)
    }

    /// Viewing direction; column 2 points away from the scene.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        -self.matrix.column(2)
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.matrix.column(3)
    }

    /// Unit view ray through `ndc` (x right, y up, both in [-1, 1]).
    #[inline]
    pub fn ray_direction(&self, ndc: Vec2, aspect_ratio: f32) -> Vec3 {
        (self.forward() + self.right() * (ndc.x * aspect_ratio) + self.up() * ndc.y).normalize()
    }
}

/// Normalized device coordinates of pixel center `(px, py)`.
#[inline]
pub fn pixel_ndc(px: u32, py: u32, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (px as f32 + 0.5) / width as f32 * 2.0 - 1.0,
        1.0 - (py as f32 + 0.5) / height as f32 * 2.0,
    )
}

#[inline]
fn to_byte(c: f32) -> u8 {
    // NaN saturates to 0 under `as`
    (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Shade every pixel of `buffer`, one row per rayon task.
///
/// The camera and uniforms are read-only snapshots for the whole pass.
pub fn render(
    buffer: &mut PixelBuffer,
    transform: &CameraTransform,
    uniforms: &SceneUniforms,
    textures: &TextureSet,
) {
    let width = buffer.width();
    let height = buffer.height();
    if width == 0 || height == 0 {
        return;
    }
    let eye = transform.eye();

    buffer
        .as_bytes_mut()
        .par_chunks_exact_mut(width as usize * 4)
        .enumerate()
        .for_each(|(py, row)| {
            for (px, dest) in row.chunks_exact_mut(4).enumerate() {
                let ndc = pixel_ndc(px as u32, py as u32, width, height);
                let dir = transform.ray_direction(ndc, uniforms.aspect_ratio);
                let [r, g, b, a] = shade_pixel(eye, dir, uniforms, textures);
                write_pixel_rgba(dest, to_byte(r), to_byte(g), to_byte(b), to_byte(a));
            }
        });
}
