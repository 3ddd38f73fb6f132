//! Batch orchestration.
//!
//! Runs the whole pipeline for one input root:
//!
//! ```text
//! Init → EnsureRoots → Scan ─┬─ empty ──────────────→ Done
//!                            └─ non-empty → ProcessEach → Done
//! ```
//!
//! - **EnsureRoots**: both roots are created if missing. Failure is fatal.
//! - **Scan**: see [`crate::scan`]. Failure is fatal; no file is processed.
//! - **ProcessEach**: every discovered file, in scan order, gets its mirrored
//!   output path, its output directory, and one transform attempt. A failing
//!   file is counted and the batch moves on.
//! - **Done**: a [`RunSummary`] with exact counts.
//!
//! ## Output Structure
//!
//! ```text
//! input/                     output/
//! ├── a.jpg   (2000x1000)    ├── a.jpg      (1000x1000)
//! └── sub/                   └── sub/
//!     └── b.png (500x500)        └── b.png  (500x500, never upscaled)
//! ```
//!
//! ## Parallel Processing
//!
//! Files are processed one at a time unless
//! [`ProcessingConfig::max_processes`] allows more workers, in which case they
//! run on a dedicated [rayon](https://docs.rs/rayon) pool. Outcomes are
//! collected per file and tallied afterwards, so counts are identical either
//! way.

use crate::config::{ConfigError, ProcessingConfig};
use crate::imaging::{ImageBackend, RustBackend, TransformOutcome, transform};
use crate::paths::{ensure_dir, mirror_path};
use crate::scan::{ScanError, scan};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot create directory {path}: {source}")]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Progress events streamed while a run is in flight.
///
/// Paths are relative to the input root.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// Scan finished with at least one image.
    Discovered { count: usize, skipped: usize },
    /// Scan finished with nothing to do.
    NoImages { input_root: PathBuf, skipped: usize },
    ImageProcessed {
        index: usize,
        total: usize,
        source: PathBuf,
        bytes: u64,
    },
    ImageFailed {
        index: usize,
        total: usize,
        source: PathBuf,
        message: String,
    },
}

/// Totals for a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Files ignored for having an unsupported extension.
    pub skipped: usize,
    pub output_root: PathBuf,
}

impl RunSummary {
    fn empty(output_root: &Path, skipped: usize) -> Self {
        Self {
            discovered: 0,
            succeeded: 0,
            failed: 0,
            skipped,
            output_root: output_root.to_path_buf(),
        }
    }
}

pub fn process(
    config: &ProcessingConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, config, events)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    config: &ProcessingConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    config.validate()?;

    for root in [&config.input_dir, &config.output_dir] {
        ensure_dir(root).map_err(|source| ProcessError::Setup {
            path: root.clone(),
            source,
        })?;
    }

    let found = scan(&config.input_dir, config)?;
    let total = found.images.len();
    info!(
        input = %config.input_dir.display(),
        discovered = total,
        skipped = found.skipped,
        "scan complete"
    );

    if total == 0 {
        emit(
            &events,
            ProcessEvent::NoImages {
                input_root: config.input_dir.clone(),
                skipped: found.skipped,
            },
        );
        return Ok(RunSummary::empty(&config.output_dir, found.skipped));
    }

    emit(
        &events,
        ProcessEvent::Discovered {
            count: total,
            skipped: found.skipped,
        },
    );

    let threads = config.effective_threads();
    let outcomes: Vec<TransformOutcome> = if threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        pool.install(|| {
            found
                .images
                .par_iter()
                .enumerate()
                .map_with(events.clone(), |tx, (i, path)| {
                    process_one(backend, config, path, i + 1, total, tx)
                })
                .collect()
        })
    } else {
        found
            .images
            .iter()
            .enumerate()
            .map(|(i, path)| process_one(backend, config, path, i + 1, total, &events))
            .collect()
    };

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let summary = RunSummary {
        discovered: total,
        succeeded,
        failed: total - succeeded,
        skipped: found.skipped,
        output_root: config.output_dir.clone(),
    };
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "run complete"
    );
    Ok(summary)
}

/// Resolve and create the output location for one input file.
fn prepare_output(config: &ProcessingConfig, source: &Path) -> std::io::Result<PathBuf> {
    let output = mirror_path(&config.input_dir, &config.output_dir, source)?;
    if let Some(parent) = output.parent() {
        ensure_dir(parent)?;
    }
    Ok(output)
}

fn process_one(
    backend: &impl ImageBackend,
    config: &ProcessingConfig,
    source: &Path,
    index: usize,
    total: usize,
    events: &Option<Sender<ProcessEvent>>,
) -> TransformOutcome {
    debug!(index, total, source = %source.display(), "processing");

    let outcome = match prepare_output(config, source) {
        Ok(output) => transform(backend, source, &output, &config.square()),
        Err(e) => {
            warn!(source = %source.display(), error = %e, "cannot prepare output");
            TransformOutcome::Failure {
                input: source.to_path_buf(),
                message: e.to_string(),
            }
        }
    };

    let relative = source
        .strip_prefix(&config.input_dir)
        .unwrap_or(source)
        .to_path_buf();
    let event = match &outcome {
        TransformOutcome::Success { bytes, .. } => ProcessEvent::ImageProcessed {
            index,
            total,
            source: relative,
            bytes: *bytes,
        },
        TransformOutcome::Failure { message, .. } => ProcessEvent::ImageFailed {
            index,
            total,
            source: relative,
            message: message.clone(),
        },
    };
    emit(events, event);

    outcome
}

fn emit(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is printing.
        let _ = tx.send(event);
    }
}
