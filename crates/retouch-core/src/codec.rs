//! Image file decoding and encoding.
//!
//! Loading goes through the `image` crate's format detection, then collapses
//! the decoder's pixel-format zoo into the four 8-bit modes the pipeline
//! distinguishes: grayscale, grayscale+alpha, color, color+alpha. Saving
//! always encodes JPEG, flattening any alpha channel first.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Errors from reading or writing image files.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The file could not be read or decoded as an image.
    #[error("failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image could not be encoded or written.
    #[error("failed to write image {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Load an image from disk, normalized to an 8-bit mode.
pub fn load_image(path: &Path) -> Result<DynamicImage, CodecError> {
    let image = image::open(path).map_err(|source| CodecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize_mode(image))
}

/// Collapse any decoded pixel format into `Luma8`, `LumaA8`, `Rgb8` or
/// `Rgba8`, whichever loses the least.
pub fn normalize_mode(image: DynamicImage) -> DynamicImage {
    use image::ColorType;

    match image.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => image,
        ColorType::L16 => DynamicImage::ImageLuma8(image.to_luma8()),
        ColorType::La16 => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        ColorType::Rgb16 | ColorType::Rgb32F => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}

/// Write an image to `path` as JPEG.
///
/// JPEG cannot store alpha, so color+alpha flattens to color and
/// grayscale+alpha to grayscale before encoding (alpha is dropped, not
/// composited).
pub fn save_jpeg(image: &DynamicImage, path: &Path) -> Result<(), CodecError> {
    let flattened;
    let to_encode = match image {
        DynamicImage::ImageLumaA8(_) => {
            flattened = DynamicImage::ImageLuma8(image.to_luma8());
            &flattened
        }
        DynamicImage::ImageRgba8(_) => {
            flattened = DynamicImage::ImageRgb8(image.to_rgb8());
            &flattened
        }
        _ => image,
    };

    to_encode
        .save_with_format(path, ImageFormat::Jpeg)
        .map_err(|source| CodecError::Write {
            path: path.to_path_buf(),
            source,
        })
}
