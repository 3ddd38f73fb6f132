//! Output path mirroring and directory creation.
//!
//! An input file at `<input_root>/<rel>` is written to `<output_root>/<rel>`:
//! same subdirectories, same filename, same extension.

use std::io;
use std::path::{Path, PathBuf};

/// Make sure `dir` exists, creating missing parents.
///
/// An existing directory is left alone, including when another thread or
/// process creates it concurrently. A non-directory at `dir` is an error.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Map a file under `input_root` to its mirrored location under `output_root`.
///
/// Fails if `file` is not inside `input_root`.
pub fn mirror_path(input_root: &Path, output_root: &Path, file: &Path) -> io::Result<PathBuf> {
    let relative = file.strip_prefix(input_root).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} is not under {}",
                file.display(),
                input_root.display()
            ),
        )
    })?;
    Ok(output_root.join(relative))
}
