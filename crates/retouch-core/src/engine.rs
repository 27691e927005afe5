//! The fixed-order adjustment pipeline.
//!
//! ## Step Order
//! 1. Grayscale conversion
//! 2. Brightness
//! 3. Contrast
//! 4. Sharpness
//! 5. Blur
//! 6. Rotation
//! 7. Resize
//! 8. Saturation
//!
//! The order is part of the contract and is never rearranged: converting to
//! grayscale first means a later saturation request is skipped, and rotating
//! before resizing changes how the target dimensions land. A step runs only
//! when its adjustment is present in the spec; a present identity value
//! still runs its step.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::enhance;
use crate::rotation::rotate_degrees;
use crate::AdjustmentSpec;

/// Apply every adjustment present in `spec` to `image`, in the fixed
/// pipeline order.
///
/// Consumes the input and returns the transformed image; the caller keeps
/// its own clone if it needs the original back.
///
/// Parameter values are applied as given. The ranges quoted by the
/// interactive prompts are guidance for the user, not a validation layer.
pub fn apply(image: DynamicImage, spec: &AdjustmentSpec) -> DynamicImage {
    let mut image = image;

    if spec.grayscale {
        // Single-channel luminance; any alpha is dropped with the color
        image = DynamicImage::ImageLuma8(image.to_luma8());
    }
    if let Some(factor) = spec.brightness {
        image = enhance::brightness(&image, factor);
    }
    if let Some(factor) = spec.contrast {
        image = enhance::contrast(&image, factor);
    }
    if let Some(factor) = spec.sharpness {
        image = enhance::sharpness(&image, factor);
    }
    if let Some(radius) = spec.blur {
        // A zero radius means "no blur"; the library would substitute its
        // own default sigma for it
        if radius > 0.0 {
            image = image.blur(radius);
        }
    }
    if let Some(degrees) = spec.rotation {
        image = rotate_degrees(&image, degrees);
    }
    if let Some((width, height)) = spec.resize {
        image = image.resize_exact(width, height, FilterType::CatmullRom);
    }
    if let Some(factor) = spec.saturation {
        // Hard precondition: saturation never touches a single-channel
        // image, even when requested
        if !is_single_channel(&image) {
            image = enhance::color(&image, factor);
        }
    }

    image
}

/// Whether the image is currently in a single-channel (grayscale) mode,
/// with or without alpha.
pub fn is_single_channel(image: &DynamicImage) -> bool {
    image.color().channel_count() < 3
}


// ============================================================================
// Property-Based Tests
// ============================================================================
