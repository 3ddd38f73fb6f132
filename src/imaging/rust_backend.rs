//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image::ImageReader` |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (fixed quality, baseline) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (`CompressionType::Best`, adaptive filter) |
//! | Encode → WebP | `webp::Encoder` (lossy VP8, fixed quality) |
//! | Encode → TIFF, GIF | `image::DynamicImage::write_to` (codec defaults) |
//!
//! The decoder is picked from the file's leading bytes, falling back to the
//! extension, so a PNG saved as `photo.jpg` still decodes. The encoder always
//! follows the extension.
//!
//! Encoding goes to an in-memory buffer first. The buffer is written to a
//! hidden sibling file and renamed over the output, so a failed write never
//! clobbers an existing output.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{DefaultFormat, EncodeOptions, PngCompression, SquareParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::error::{EncodingError, ImageFormatHint};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions whose decoders are compiled in.
const DECODER_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
];

/// Returns the image file extensions that have working decoders compiled in.
pub fn decodable_extensions() -> Vec<&'static str> {
    DECODER_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a reader whose format is sniffed from the content.
fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open_reader(path)?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Reduce to 8-bit RGB or RGBA, keeping alpha only when the source has it.
///
/// JPEG, WebP, TIFF and GIF encoders reject some of the layouts the decoders
/// can produce (16-bit, float, luma+alpha).
fn to_8bit(img: &DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

fn png_compression(compression: PngCompression) -> CompressionType {
    match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    }
}

/// Encode an image into memory according to `options`.
fn encode(img: &DynamicImage, options: EncodeOptions) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();

    match options {
        // Baseline only: the encoder has no Huffman optimisation or progressive mode.
        EncodeOptions::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8);
            rgb.write_with_encoder(encoder)?;
        }
        // No lossy PNG mode in the encoder: the quality hint is dropped.
        EncodeOptions::Png { compression, .. } => {
            let encoder = PngEncoder::new_with_quality(
                &mut bytes,
                png_compression(compression),
                PngFilter::Adaptive,
            );
            img.write_with_encoder(encoder)?;
        }
        EncodeOptions::WebP { quality } => {
            let converted = to_8bit(img);
            let encoder = webp::Encoder::from_image(&converted).map_err(webp_error)?;
            bytes.extend_from_slice(&encoder.encode(quality.value() as f32));
        }
        EncodeOptions::Default { extension } => {
            let (converted, format) = match extension {
                DefaultFormat::Tiff => (to_8bit(img), ImageFormat::Tiff),
                DefaultFormat::Gif => (DynamicImage::ImageRgba8(img.to_rgba8()), ImageFormat::Gif),
            };
            converted.write_to(&mut Cursor::new(&mut bytes), format)?;
        }
    }

    Ok(bytes)
}

fn webp_error(message: &str) -> ImageError {
    ImageError::Encoding(EncodingError::new(
        ImageFormatHint::Exact(ImageFormat::WebP),
        message.to_string(),
    ))
}

/// `dir/.name.part` next to the final output.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".part");
    path.with_file_name(name)
}

/// Write the whole buffer to a staging file, then rename it over `path`.
///
/// On failure only the staging file is removed; an existing output is kept.
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let staging = staging_path(path);
    if let Err(e) = std::fs::write(&staging, bytes).and_then(|()| std::fs::rename(&staging, path))
    {
        let _ = std::fs::remove_file(&staging);
        return Err(BackendError::Io(e));
    }
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) =
            open_reader(path)?
                .into_dimensions()
                .map_err(|e| BackendError::Decode {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
        Ok(Dimensions { width, height })
    }

    fn square(&self, params: &SquareParams) -> Result<u64, BackendError> {
        let crop = params.crop;
        let img = load_image(&params.source)?;

        if crop.left + crop.width > img.width() || crop.top + crop.height > img.height() {
            return Err(BackendError::ProcessingFailed(format!(
                "Crop {}x{}+{}+{} outside {}x{} image",
                crop.width,
                crop.height,
                crop.left,
                crop.top,
                img.width(),
                img.height()
            )));
        }

        let cropped = img.crop_imm(crop.left, crop.top, crop.width, crop.height);
        drop(img);

        let squared = if params.side < crop.width {
            cropped.resize_exact(params.side, params.side, FilterType::Lanczos3)
        } else {
            cropped
        };

        let bytes = encode(&squared, params.encode).map_err(|e| BackendError::Encode {
            path: params.output.clone(),
            message: e.to_string(),
        })?;
        drop(squared);

        debug!(
            output = %params.output.display(),
            bytes = bytes.len(),
            "encoded square image"
        );
        write_output(&params.output, &bytes)?;
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::calculations::CropRegion;
    use crate::imaging::params::Quality;
    use crate::test_helpers::write_test_image;
    use std::path::PathBuf;

    fn square_params(source: PathBuf, output: PathBuf, crop: CropRegion, side: u32) -> SquareParams {
        let encode = EncodeOptions::for_path(&output, Quality::default()).unwrap();
        SquareParams {
            source,
            output,
            crop,
            side,
            encode,
        }
    }

    #[test]
    fn decodable_extensions_cover_supported_formats() {
        let exts = decodable_extensions();
        for expected in &["jpg", "jpeg", "png", "tiff", "webp", "gif"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in decodable extensions"
            );
        }
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_test_image(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn square_crops_and_resizes_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        write_test_image(&source, 400, 300);

        let output = tmp.path().join("out.jpg");
        let crop = CropRegion {
            left: 50,
            top: 0,
            width: 300,
            height: 300,
        };
        RustBackend::new()
            .square(&square_params(source, output.clone(), crop, 100))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (100, 100));
        assert_eq!(
            image::ImageReader::open(&output)
                .unwrap()
                .with_guessed_format()
                .unwrap()
                .format(),
            Some(ImageFormat::Jpeg)
        );
    }

    #[test]
    fn square_keeps_crop_size_when_side_matches() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        write_test_image(&source, 80, 120);

        let output = tmp.path().join("out.png");
        let crop = CropRegion {
            left: 0,
            top: 20,
            width: 80,
            height: 80,
        };
        RustBackend::new()
            .square(&square_params(source, output.clone(), crop, 80))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (80, 80));
    }

    #[test]
    fn square_encodes_every_default_format() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = RustBackend::new();

        for (ext, format) in [
            ("webp", ImageFormat::WebP),
            ("tiff", ImageFormat::Tiff),
            ("gif", ImageFormat::Gif),
        ] {
            let source = tmp.path().join(format!("source.{ext}"));
            write_test_image(&source, 60, 40);
            let output = tmp.path().join(format!("out.{ext}"));
            let crop = CropRegion {
                left: 10,
                top: 0,
                width: 40,
                height: 40,
            };

            backend
                .square(&square_params(source, output.clone(), crop, 20))
                .unwrap();

            let reader = image::ImageReader::open(&output)
                .unwrap()
                .with_guessed_format()
                .unwrap();
            assert_eq!(reader.format(), Some(format), "{ext} output format");
            assert_eq!(image::image_dimensions(&output).unwrap(), (20, 20));
        }
    }

    #[test]
    fn square_corrupt_source_errors_without_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("bad.jpg");
        std::fs::write(&source, b"definitely not a jpeg").unwrap();

        let output = tmp.path().join("out.jpg");
        let crop = CropRegion {
            left: 0,
            top: 0,
            width: 10,
            height: 10,
        };
        let result = RustBackend::new().square(&square_params(source, output.clone(), crop, 10));

        assert!(matches!(result, Err(BackendError::Decode { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn square_rejects_crop_outside_image() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("small.png");
        write_test_image(&source, 10, 10);

        let output = tmp.path().join("out.png");
        let crop = CropRegion {
            left: 5,
            top: 0,
            width: 10,
            height: 10,
        };
        let result = RustBackend::new().square(&square_params(source, output.clone(), crop, 10));

        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
        assert!(!output.exists());
    }

    #[test]
    fn square_decodes_by_content_not_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let png = tmp.path().join("actually.png");
        write_test_image(&png, 90, 60);
        let source = tmp.path().join("photo.jpg");
        std::fs::rename(&png, &source).unwrap();

        let backend = RustBackend::new();
        assert_eq!(
            backend.identify(&source).unwrap(),
            Dimensions {
                width: 90,
                height: 60
            }
        );

        let output = tmp.path().join("out.jpg");
        let crop = CropRegion {
            left: 15,
            top: 0,
            width: 60,
            height: 60,
        };
        backend
            .square(&square_params(source, output.clone(), crop, 60))
            .unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn square_reports_bytes_written() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        write_test_image(&source, 30, 30);
        let output = tmp.path().join("out.png");
        let crop = CropRegion {
            left: 0,
            top: 0,
            width: 30,
            height: 30,
        };

        let written = RustBackend::new()
            .square(&square_params(source, output.clone(), crop, 30))
            .unwrap();

        assert_eq!(written, std::fs::metadata(&output).unwrap().len());
        assert!(!staging_path(&output).exists());
    }

    #[test]
    fn write_output_replaces_existing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("a.jpg");
        std::fs::write(&output, "old").unwrap();

        write_output(&output, b"new contents").unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"new contents");
        assert!(!staging_path(&output).exists());
    }

    #[test]
    fn failed_write_keeps_previous_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("a.jpg");
        std::fs::write(&output, "previous run").unwrap();
        // A directory in the staging spot makes the write fail.
        std::fs::create_dir(staging_path(&output)).unwrap();

        let result = write_output(&output, b"new contents");

        assert!(matches!(result, Err(BackendError::Io(_))));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous run");
    }

    #[test]
    fn staging_path_is_hidden_sibling() {
        assert_eq!(
            staging_path(Path::new("/out/sub/b.png")),
            PathBuf::from("/out/sub/.b.png.part")
        );
    }

    fn noisy(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, y| {
            let n = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)).wrapping_mul(31);
            image::Rgb([(n % 256) as u8, ((n >> 8) % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn webp_is_lossy_and_honours_quality() {
        let img = noisy(400, 300);
        let low = encode(&img, EncodeOptions::WebP { quality: Quality::new(10) }).unwrap();
        let high = encode(&img, EncodeOptions::WebP { quality: Quality::new(80) }).unwrap();

        assert_eq!(&high[0..4], b"RIFF");
        assert_eq!(&high[12..16], b"VP8 ");
        assert_eq!(&low[12..16], b"VP8 ");
        assert!(low.len() < high.len());
    }

    #[test]
    fn webp_encodes_rgba_source() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(16, 16));
        let bytes = encode(&img, EncodeOptions::WebP { quality: Quality::default() }).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn png_best_compression_not_larger_than_fast() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(128, 128, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }));
        let fast = encode(
            &img,
            EncodeOptions::Png {
                compression: PngCompression::Fast,
                quality: Quality::default(),
            },
        )
        .unwrap();
        let best = encode(
            &img,
            EncodeOptions::Png {
                compression: PngCompression::Best,
                quality: Quality::default(),
            },
        )
        .unwrap();
        assert!(best.len() <= fast.len());
    }

    #[test]
    fn jpeg_quality_affects_size() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(128, 128, |x, y| {
            image::Rgb([((x * y) % 256) as u8, (x % 256) as u8, (y % 256) as u8])
        }));
        let low = encode(&img, EncodeOptions::Jpeg { quality: Quality::new(10) }).unwrap();
        let high = encode(&img, EncodeOptions::Jpeg { quality: Quality::new(95) }).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn jpeg_encodes_rgba_source() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(16, 16));
        let bytes = encode(&img, EncodeOptions::Jpeg { quality: Quality::default() }).unwrap();
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            ImageFormat::Jpeg
        );
    }
}
