//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{calculate_crop_region, calculate_output_side};
use super::params::{EncodeOptions, Quality, SquareParams};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Settings for square image generation.
#[derive(Debug, Clone, Copy)]
pub struct SquareConfig {
    /// Maximum output side length.
    pub target_size: u32,
    pub quality: Quality,
}

/// Outcome of transforming a single file.
///
/// Transformation never returns an error: every failure is captured here so
/// one bad file cannot stop a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Success { output: PathBuf, bytes: u64 },
    Failure { input: PathBuf, message: String },
}

impl TransformOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Build the backend parameters for squaring `source` into `output`.
pub fn plan_square(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &SquareConfig,
) -> Result<SquareParams> {
    let encode = EncodeOptions::for_path(source, config.quality).ok_or_else(|| {
        BackendError::ProcessingFailed(format!("No encoder for {}", source.display()))
    })?;

    let dimensions = get_dimensions(backend, source)?;
    let crop = calculate_crop_region(dimensions);
    let side = calculate_output_side(crop.width, config.target_size);

    Ok(SquareParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        crop,
        side,
        encode,
    })
}

fn try_transform(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &SquareConfig,
) -> Result<u64> {
    let params = plan_square(backend, source, output, config)?;
    debug!(
        source = %source.display(),
        crop = ?params.crop,
        side = params.side,
        "squaring image"
    );
    backend.square(&params)
}

/// Crop `source` to a centered square, scale it down to the target size,
/// re-encode it in its own format and write it to `output`.
pub fn transform(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &SquareConfig,
) -> TransformOutcome {
    match try_transform(backend, source, output, config) {
        Ok(bytes) => TransformOutcome::Success {
            output: output.to_path_buf(),
            bytes,
        },
        Err(e) => {
            warn!(source = %source.display(), error = %e, "image failed");
            TransformOutcome::Failure {
                input: source.to_path_buf(),
                message: e.to_string(),
            }
        }
    }
}
