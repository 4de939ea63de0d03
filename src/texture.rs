//! Texture Storage and Sampling
//!
//! RGBA8 textures sampled the way a GPU sampler with `REPEAT` wrapping and
//! `LINEAR` filtering would: texel centers sit at `(i + 0.5) / size` and both
//! axes wrap. Samples are returned as raw channel values in [0, 1].

use std::path::Path;

use crate::error::{Error, Result};

/// A texture stored as RGBA pixels
#[derive(Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>, // RGBA format, 4 bytes per pixel
}

impl Texture {
    /// 1x1 opaque texture of a single color
    pub fn solid(r: u8, g: u8, b: u8) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![r, g, b, 255],
        }
    }

    /// Stand-in bound to every slot until its image finishes streaming.
    pub fn placeholder() -> Self {
        Self::solid(0, 0, 0)
    }

    /// Create texture from raw RGBA data
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if width > 0 && height > 0 && expected == Some(data.len()) {
            Ok(Self {
                width,
                height,
                pixels: data,
            })
        } else {
            Err(Error::InvalidTexture {
                width,
                height,
                len: data.len(),
            })
        }
    }

    /// Decode an image file (any format `image` was built with) into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| Error::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(width, height, img.into_raw())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx] as f32 / 255.0,
            self.pixels[idx + 1] as f32 / 255.0,
            self.pixels[idx + 2] as f32 / 255.0,
            self.pixels[idx + 3] as f32 / 255.0,
        ]
    }

    /// Bilinear sample with repeat wrapping on both axes.
    /// Returns RGBA in [0, 1]. Non-finite coordinates sample at the origin.
    pub fn sample(&self, u: f32, v: f32) -> [f32; 4] {
        let x = wrap_unit(u) * self.width as f32 - 0.5;
        let y = wrap_unit(v) * self.height as f32 - 0.5;

        let xf = x.floor();
        let yf = y.floor();
        let fx = x - xf;
        let fy = y - yf;

        let w = i64::from(self.width);
        let h = i64::from(self.height);
        let x0 = (xf as i64).rem_euclid(w) as u32;
        let y0 = (yf as i64).rem_euclid(h) as u32;
        let x1 = (x0 + 1) % self.width;
        let y1 = (y0 + 1) % self.height;

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x1, y0);
        let c01 = self.texel(x0, y1);
        let c11 = self.texel(x1, y1);

        let mut out = [0.0; 4];
        for i in 0..4 {
            let top = c00[i] + (c10[i] - c00[i]) * fx;
            let bottom = c01[i] + (c11[i] - c01[i]) * fx;
            out[i] = top + (bottom - top) * fy;
        }
        out
    }

    /// Red channel only, for single-channel data maps (bump, specular, clouds).
    #[inline]
    pub fn sample_red(&self, u: f32, v: f32) -> f32 {
        self.sample(u, v)[0]
    }
}

impl Default for Texture {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Wrap a texture coordinate into [0, 1].
#[inline]
fn wrap_unit(t: f32) -> f32 {
    if t.is_finite() {
        t.rem_euclid(1.0)
    } else {
        0.0
    }
}
