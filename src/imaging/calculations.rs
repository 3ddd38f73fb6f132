//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// A rectangle inside the source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Calculate the largest centered square that fits inside the source.
///
/// The side is the shorter edge; the offsets split the excess on the longer
/// edge evenly, rounding down (an odd excess leaves the extra pixel on the
/// right or bottom).
///
/// # Examples
/// ```
/// # use square_crop::imaging::{CropRegion, calculate_crop_region};
/// // 2000x1000 landscape → 1000x1000 square starting at x=500
/// assert_eq!(
///     calculate_crop_region((2000, 1000)),
///     CropRegion { left: 500, top: 0, width: 1000, height: 1000 }
/// );
/// ```
pub fn calculate_crop_region(source: (u32, u32)) -> CropRegion {
    let (width, height) = source;
    let side = width.min(height);

    CropRegion {
        left: (width - side) / 2,
        top: (height - side) / 2,
        width: side,
        height: side,
    }
}

/// Calculate the output side length for a square crop.
///
/// Cover fit on a square source into a square target is a plain scale, so
/// only the side matters. Images already smaller than the target keep their
/// cropped size — no upscaling.
pub fn calculate_output_side(crop_side: u32, target: u32) -> u32 {
    crop_side.min(target)
}
