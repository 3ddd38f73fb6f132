//! Shared test utilities: synthetic images and input trees.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_test_image(&tmp.path().join("a.jpg"), 200, 100);
//! write_test_tree(tmp.path(), &[("a.jpg", 200, 100), ("sub/b.png", 50, 50)]);
//! ```

use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

/// Gradient pixels so encoders have real content to compress.
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// Write a valid image of the given size, encoded by the path's extension.
///
/// Parent directories are created as needed.
pub fn write_test_image(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let rgb = gradient(width, height);
    let is_gif = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    let img = if is_gif {
        DynamicImage::ImageRgba8(DynamicImage::ImageRgb8(rgb).to_rgba8())
    } else {
        DynamicImage::ImageRgb8(rgb)
    };
    img.save(path).unwrap();
}

/// Write several test images under `root`: `(relative path, width, height)`.
pub fn write_test_tree(root: &Path, files: &[(&str, u32, u32)]) {
    for (rel, width, height) in files {
        write_test_image(&root.join(rel), *width, *height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_decodable_images_for_each_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        for ext in ["jpg", "jpeg", "png", "webp", "tiff", "gif"] {
            let path = tmp.path().join(format!("nested/img.{ext}"));
            write_test_image(&path, 30, 20);
            assert_eq!(image::image_dimensions(&path).unwrap(), (30, 20), "{ext}");
        }
    }

    #[test]
    fn writes_tree() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_test_tree(tmp.path(), &[("a.png", 4, 4), ("x/y/b.jpg", 8, 6)]);
        assert!(tmp.path().join("a.png").is_file());
        assert!(tmp.path().join("x/y/b.jpg").is_file());
    }
}
