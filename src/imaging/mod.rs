//! Image processing — pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` (format sniffed from content) |
//! | **Crop + resize** | `crop_imm` + `resize_exact` (Lanczos3) |
//! | **Encode** | per-format `image::codecs` encoders, `webp` for lossy WebP |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop/size math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{CropRegion, calculate_crop_region, calculate_output_side};
pub use operations::{SquareConfig, TransformOutcome, get_dimensions, plan_square, transform};
pub use params::{DefaultFormat, EncodeOptions, PngCompression, Quality, SquareParams};
pub use rust_backend::{RustBackend, decodable_extensions};
