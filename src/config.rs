//! Processing configuration.
//!
//! Settings are fixed constants: there is no config file and no flag that
//! changes them. They are still gathered into one immutable
//! [`ProcessingConfig`] that is handed to the pipeline at startup, so tests
//! (and any future front end) can run it against other roots and sizes.
//!
//! ## Defaults
//!
//! ```text
//! input_dir     = "input"
//! output_dir    = "output"
//! target_size   = 1024                      # output side, pixels
//! quality       = 80                        # JPEG/WebP quality (1-100)
//! extensions    = jpg jpeg png webp tiff gif
//! max_processes = 1                         # sequential
//! ```

use crate::imaging::{Quality, SquareConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INPUT_DIR: &str = "input";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const TARGET_SIZE: u32 = 1024;
pub const COMPRESSION_QUALITY: u32 = 80;
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tiff", "gif"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything the pipeline needs to know, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingConfig {
    /// Root scanned for source images.
    pub input_dir: PathBuf,
    /// Root the mirrored tree is written under.
    pub output_dir: PathBuf,
    /// Square output side; smaller crops are left at their own size.
    pub target_size: u32,
    pub quality: Quality,
    /// Lowercase extensions, without the dot.
    pub extensions: Vec<String>,
    /// Maximum number of parallel workers. `Some(1)` processes files one at
    /// a time; `None` means one worker per CPU core.
    pub max_processes: Option<usize>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            target_size: TARGET_SIZE,
            quality: Quality::new(COMPRESSION_QUALITY),
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_processes: Some(1),
        }
    }
}

impl ProcessingConfig {
    /// Default settings rooted at the given directories.
    pub fn with_roots(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_size == 0 {
            return Err(ConfigError::Validation(
                "target_size must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.quality.value()) {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        if self.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Whether the path's extension (case-insensitive) is one we process.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }

    /// Settings for the per-image transform.
    pub fn square(&self) -> SquareConfig {
        SquareConfig {
            target_size: self.target_size,
            quality: self.quality,
        }
    }

    /// Resolve the effective worker count.
    ///
    /// - `None` → use all available cores
    /// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
    pub fn effective_threads(&self) -> usize {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
    }
}
