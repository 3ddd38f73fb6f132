//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides the crop, output size and encoder) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock) without
//! changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 80). Clamped on construction.
//! - [`EncodeOptions`] — Closed set of per-format encoder settings, chosen from the input extension.
//! - [`SquareParams`] — Full specification for one square crop: source, output, crop region, output side, encoder.

use super::calculations::CropRegion;
use std::path::{Path, PathBuf};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// PNG deflate effort.
///
/// `Best` is the zlib level 9 equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngCompression {
    Fast,
    Default,
    Best,
}

/// Encoder settings, one variant per output container family.
///
/// The variant is picked from the **input** file's extension, so a `.png`
/// source always yields PNG bytes and a `.jpg` source always yields JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOptions {
    /// `.jpg` / `.jpeg`
    Jpeg { quality: Quality },
    /// `.png` — `quality` is only a hint; lossless encoders ignore it.
    Png {
        compression: PngCompression,
        quality: Quality,
    },
    /// `.webp`
    WebP { quality: Quality },
    /// Any other supported container (`.tiff`, `.gif`), encoded with the
    /// codec's own defaults.
    Default { extension: DefaultFormat },
}

/// Containers re-encoded without explicit settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultFormat {
    Tiff,
    Gif,
}

impl EncodeOptions {
    /// Select encoder settings from a file extension (case-insensitive).
    ///
    /// Returns `None` for extensions with no encoder.
    pub fn for_extension(ext: &str, quality: Quality) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg { quality }),
            "png" => Some(Self::Png {
                compression: PngCompression::Best,
                quality,
            }),
            "webp" => Some(Self::WebP { quality }),
            "tif" | "tiff" => Some(Self::Default {
                extension: DefaultFormat::Tiff,
            }),
            "gif" => Some(Self::Default {
                extension: DefaultFormat::Gif,
            }),
            _ => None,
        }
    }

    /// Select encoder settings from a path's extension.
    pub fn for_path(path: &Path, quality: Quality) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| Self::for_extension(ext, quality))
    }
}

/// Parameters for a square crop + resize + encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Region of the source to keep.
    pub crop: CropRegion,
    /// Final side length; never larger than `crop.width`.
    pub side: u32,
    pub encode: EncodeOptions,
}
