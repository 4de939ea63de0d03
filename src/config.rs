//! Viewer configuration.
//!
//! Settings come from an optional pretty-printed JSON file and are then
//! overridden by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};
use crate::globe::{MAX_RADIUS, MIN_RADIUS};
use crate::loader::TextureSlot;
use crate::math3d::Quat;
use crate::noise::CLOUD_OCTAVES;

/// Supersampling factor bounds.
const MIN_QUALITY: f32 = 0.25;
const MAX_QUALITY: f32 = 4.0;

/// Orientation the viewer opens with (x, y, z, w).
const DEFAULT_ORIENTATION: [f32; 4] = [
    0.379_381_72,
    0.271_072_57,
    0.082_467_95,
    -0.880_788_4,
];

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "globe", about = "Interactive per-pixel planet renderer")]
pub struct Args {
    /// JSON configuration file (optional).
    #[arg(long, default_value = "globe.json")]
    pub config: PathBuf,

    /// Window width in pixels.
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Window height in pixels.
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Render resolution relative to the window (0.25 - 4).
    #[arg(short, long)]
    pub quality: Option<f32>,

    /// Directory holding the texture images.
    #[arg(long)]
    pub textures: Option<PathBuf>,

    /// Fractal octaves for the cloud layer (1 - 16).
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Disable VSync for uncapped framerate.
    #[arg(long)]
    pub no_vsync: bool,
}

/// File names for each texture slot, relative to `texture_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureFiles {
    pub diffuse: String,
    pub bump: String,
    pub night: String,
    pub spec: String,
    pub clouds: String,
    pub sky: String,
}

impl Default for TextureFiles {
    fn default() -> Self {
        Self {
            diffuse: "diffuse4.jpg".into(),
            bump: "bump4.jpg".into(),
            night: "night4.jpg".into(),
            spec: "spec4.jpg".into(),
            clouds: "clouds4.jpg".into(),
            sky: "sky.png".into(),
        }
    }
}

impl TextureFiles {
    pub fn get(&self, slot: TextureSlot) -> &str {
        match slot {
            TextureSlot::Diffuse => &self.diffuse,
            TextureSlot::Bump => &self.bump,
            TextureSlot::Night => &self.night,
            TextureSlot::Spec => &self.spec,
            TextureSlot::Clouds => &self.clouds,
            TextureSlot::Sky => &self.sky,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub quality: f32,
    pub cloud_octaves: u32,
    pub texture_dir: PathBuf,
    pub textures: TextureFiles,
    pub initial_orientation: [f32; 4],
    pub initial_radius: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vsync: true,
            quality: 1.5,
            cloud_octaves: CLOUD_OCTAVES,
            texture_dir: PathBuf::from("textures"),
            textures: TextureFiles::default(),
            initial_orientation: DEFAULT_ORIENTATION,
            initial_radius: 2.0,
        }
    }
}

impl GlobeConfig {
    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load `path` if it exists, otherwise start from defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!(path = %path.display(), "loading configuration");
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides.
    pub fn merge(mut self, args: &Args) -> Self {
        if let Some(width) = args.width {
            self.width = width;
        }
        if let Some(height) = args.height {
            self.height = height;
        }
        if let Some(quality) = args.quality {
            self.quality = quality;
        }
        if let Some(dir) = &args.textures {
            self.texture_dir = dir.clone();
        }
        if let Some(octaves) = args.octaves {
            self.cloud_octaves = octaves;
        }
        if args.no_vsync {
            self.vsync = false;
        }
        self
    }

    /// Clamp every field into its usable range.
    pub fn validate(mut self) -> Self {
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self.quality = if self.quality.is_finite() {
            self.quality.clamp(MIN_QUALITY, MAX_QUALITY)
        } else {
            1.0
        };
        self.cloud_octaves = self.cloud_octaves.clamp(1, CLOUD_OCTAVES);
        self.initial_radius = if self.initial_radius.is_finite() {
            self.initial_radius.clamp(MIN_RADIUS, MAX_RADIUS)
        } else {
            MIN_RADIUS
        };
        self.initial_orientation = Quat::from_array(self.initial_orientation)
            .normalize()
            .to_array();
        self
    }

    pub fn initial_orientation(&self) -> Quat {
        Quat::from_array(self.initial_orientation)
    }

    /// `(slot, path)` pairs for the texture loader.
    pub fn texture_requests(&self) -> Vec<(TextureSlot, PathBuf)> {
        TextureSlot::ALL
            .iter()
            .map(|&slot| (slot, self.texture_dir.join(self.textures.get(slot))))
            .collect()
    }
}
