//! Filesystem scanning.
//!
//! Walks the input root depth-first and collects every regular file whose
//! extension is in [`ProcessingConfig::extensions`]. Any depth is visited.
//!
//! ```text
//! input/
//! ├── a.jpg          ✓
//! ├── notes.txt      skipped (counted)
//! └── sub/
//!     ├── b.PNG      ✓  (extension match is case-insensitive)
//!     └── deeper/
//!         └── c.gif  ✓
//! ```
//!
//! ## Ordering
//!
//! Entries are sorted by file name within each directory, so the result is
//! deterministic for a given filesystem state.
//!
//! ## Symlinks
//!
//! Symlinked directories are followed. A link that points back at one of its
//! own ancestors is reported as a loop by `walkdir`; that entry is skipped
//! with a warning rather than aborting the scan. Every other traversal error
//! (unreadable root or subdirectory) is fatal.

use crate::config::ProcessingConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Files found under the input root.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Supported image files, in traversal order.
    pub images: Vec<PathBuf>,
    /// Regular files ignored for having an unsupported extension.
    pub skipped: usize,
}

pub fn scan(root: &Path, config: &ProcessingConfig) -> Result<ScanResult, ScanError> {
    let mut result = ScanResult::default();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.loop_ancestor().is_some() => {
                warn!(
                    path = ?e.path(),
                    "skipping symlink loop"
                );
                continue;
            }
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                return Err(ScanError::Walk { path, source: e });
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if config.is_supported(entry.path()) {
            result.images.push(entry.into_path());
        } else {
            debug!(path = %entry.path().display(), "unsupported extension");
            result.skipped += 1;
        }
    }

    Ok(result)
}
