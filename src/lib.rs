//! # Square Crop
//!
//! Batch-converts a directory tree of photos into square, compressed copies.
//! Every supported image under the input root is cropped to its largest
//! centered square, scaled down to the target size, re-encoded in its own
//! format, and written to the same relative path under the output root.
//!
//! ```text
//! input/a.jpg      (2000x1000)  →  output/a.jpg      (1000x1000, JPEG q80)
//! input/sub/b.png  (500x500)    →  output/sub/b.png  (500x500, PNG level 9)
//! input/notes.txt               →  skipped
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Fixed settings gathered in one immutable [`config::ProcessingConfig`] |
//! | [`scan`] | Recursive, sorted discovery of supported image files |
//! | [`paths`] | Output path mirroring and idempotent directory creation |
//! | [`imaging`] | Crop math, encoder selection, the `image`-crate backend |
//! | [`process`] | Orchestration: roots → scan → per-file transform → summary |
//! | [`output`] | Console line formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## One Bad File Never Stops a Batch
//!
//! The per-file transform returns a [`imaging::TransformOutcome`] instead of
//! an error. Only setup and scan failures abort a run; everything that goes
//! wrong with an individual image is counted and reported.
//!
//! ## Backend Trait
//!
//! Pixel work sits behind [`imaging::ImageBackend`]. The orchestration and
//! transform logic is tested against a recording mock, and the real
//! [`imaging::RustBackend`] is tested separately on synthetic images.
//!
//! ## Same Format In, Same Format Out
//!
//! The encoder is chosen from the input extension, never from user input, so
//! the output tree can be dropped in place of the input tree.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod paths;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
