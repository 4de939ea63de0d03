//! Error types for the globe viewer.
//!
//! Only the host side (configuration, texture decoding, window setup) can
//! fail. Shading and camera control clamp instead of returning errors.

use std::fmt;
use std::path::PathBuf;

/// Result type for fallible host operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Filesystem access failed.
    Io {
        /// The path being read or written.
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configuration JSON could not be parsed or serialized.
    Config(serde_json::Error),
    /// An image file could not be decoded.
    Image {
        /// The image that failed.
        path: PathBuf,
        source: image::ImageError,
    },
    /// Decoded pixel data did not match the stated dimensions.
    InvalidTexture {
        width: u32,
        height: u32,
        len: usize,
    },
    /// SDL2 reports errors as plain strings.
    Display(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Error::Config(e) => write!(f, "invalid configuration: {e}"),
            Error::Image { path, source } => {
                write!(f, "failed to decode {}: {source}", path.display())
            }
            Error::InvalidTexture { width, height, len } => {
                write!(f, "texture data of {len} bytes does not match {width}x{height} RGBA")
            }
            Error::Display(message) => write!(f, "display error: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Config(e) => Some(e),
            Error::Image { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e)
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Display(message)
    }
}
