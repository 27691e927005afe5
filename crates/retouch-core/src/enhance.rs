//! Factor-based enhancement operations.
//!
//! Each enhancer blends its input toward a "degenerate" image and returns
//! `degenerate + (input - degenerate) * factor`:
//!
//! - a factor of 1.0 reproduces the input exactly,
//! - 0.0 yields the degenerate image,
//! - values above 1.0 amplify the effect.
//!
//! The degenerate image is black for [`brightness`], a uniform gray at the
//! image's mean luminance for [`contrast`], a 3x3-smoothed copy for
//! [`sharpness`] and the per-pixel luminance gray for [`color`].
//!
//! Enhancers preserve the color mode of their input and never touch an
//! alpha channel. They operate on the four 8-bit modes the codec produces
//! (`Luma8`, `LumaA8`, `Rgb8`, `Rgba8`); any other mode is converted to
//! `Rgba8` first.

use std::borrow::Cow;

use image::{ColorType, DynamicImage, ImageBuffer};

/// ITU-R BT.709 luminance coefficients.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Adjust brightness by `factor`.
///
/// The degenerate image is black, so each color channel is simply scaled:
/// 0.0 produces a black image, 2.0 doubles every channel (clamped).
pub fn brightness(image: &DynamicImage, factor: f32) -> DynamicImage {
    let image = eight_bit(image);
    blend_scalar(&image, 0.0, factor)
}

/// Adjust contrast by `factor`.
///
/// The degenerate image is a uniform gray at the mean luminance of the
/// input, so 0.0 produces a flat gray image and larger factors push every
/// channel away from that mean.
pub fn contrast(image: &DynamicImage, factor: f32) -> DynamicImage {
    let image = eight_bit(image);
    let mean = mean_luminance(&image);
    blend_scalar(&image, mean, factor)
}

/// Adjust sharpness by `factor`.
///
/// The degenerate image is a 3x3-smoothed copy of the input, so 0.0
/// produces the smoothed image and factors above 1.0 exaggerate the
/// difference from it (sharpening).
pub fn sharpness(image: &DynamicImage, factor: f32) -> DynamicImage {
    let image = eight_bit(image);
    let smoothed = smooth3x3(&image);
    blend_image(&image, &smoothed, factor)
}

/// Adjust color saturation by `factor`.
///
/// The degenerate image is the per-pixel luminance gray, so 0.0 produces a
/// desaturated (but still multi-channel) image and larger factors
/// intensify color. Single-channel images are returned unchanged; there is
/// no color to enhance.
pub fn color(image: &DynamicImage, factor: f32) -> DynamicImage {
    let image = eight_bit(image);
    let layout = ChannelLayout::of(&image);
    if layout.color < 3 {
        return image.into_owned();
    }

    let mut pixels = image.as_bytes().to_vec();
    for px in pixels.chunks_exact_mut(layout.total) {
        let gray = luminance(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        );
        for v in px.iter_mut().take(layout.color) {
            *v = store(gray + (*v as f32 / 255.0 - gray) * factor);
        }
    }
    rebuild(&image, pixels)
}

/// How the raw byte buffer of an image is laid out.
#[derive(Debug, Clone, Copy)]
struct ChannelLayout {
    /// Bytes per pixel.
    total: usize,
    /// Leading channels that carry color; the remainder is alpha.
    color: usize,
}

impl ChannelLayout {
    fn of(image: &DynamicImage) -> Self {
        let total = image.color().channel_count() as usize;
        let color = if image.color().has_alpha() {
            total - 1
        } else {
            total
        };
        Self { total, color }
    }
}

/// Borrow 8-bit images as-is, convert anything else up front.
pub(crate) fn eight_bit(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        _ => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
    }
}

#[inline]
fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Clamp a normalized channel value back into an 8-bit sample.
#[inline]
fn store(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Mean luminance of the image, normalized to 0.0..=1.0.
fn mean_luminance(image: &DynamicImage) -> f32 {
    let layout = ChannelLayout::of(image);
    let bytes = image.as_bytes();
    let pixel_count = bytes.len() / layout.total;
    if pixel_count == 0 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    for px in bytes.chunks_exact(layout.total) {
        let l = if layout.color < 3 {
            px[0] as f32 / 255.0
        } else {
            luminance(
                px[0] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[2] as f32 / 255.0,
            )
        };
        sum += l as f64;
    }
    (sum / pixel_count as f64) as f32
}

/// Blend every color channel toward a single normalized `level`.
fn blend_scalar(image: &DynamicImage, level: f32, factor: f32) -> DynamicImage {
    let layout = ChannelLayout::of(image);
    let mut pixels = image.as_bytes().to_vec();
    for px in pixels.chunks_exact_mut(layout.total) {
        for v in px.iter_mut().take(layout.color) {
            *v = store(level + (*v as f32 / 255.0 - level) * factor);
        }
    }
    rebuild(image, pixels)
}

/// Blend every color channel toward the matching channel of `degenerate`.
///
/// Both images must share dimensions and mode; `degenerate` is always
/// produced internally from `image`, so this holds by construction.
fn blend_image(image: &DynamicImage, degenerate: &DynamicImage, factor: f32) -> DynamicImage {
    let layout = ChannelLayout::of(image);
    let mut pixels = image.as_bytes().to_vec();
    let base = degenerate.as_bytes();
    for (px, deg) in pixels
        .chunks_exact_mut(layout.total)
        .zip(base.chunks_exact(layout.total))
    {
        for (v, d) in px.iter_mut().zip(deg.iter()).take(layout.color) {
            let d = *d as f32 / 255.0;
            *v = store(d + (*v as f32 / 255.0 - d) * factor);
        }
    }
    rebuild(image, pixels)
}

/// Apply a 3x3 smoothing kernel (center weight 5, neighbors 1, sum 13) to
/// the color channels. The one-pixel border is copied through unchanged,
/// as is any alpha channel.
fn smooth3x3(image: &DynamicImage) -> DynamicImage {
    let layout = ChannelLayout::of(image);
    let (width, height) = (image.width() as usize, image.height() as usize);
    let src = image.as_bytes();
    let mut out = src.to_vec();

    if width < 3 || height < 3 {
        return rebuild(image, out);
    }

    let row = width * layout.total;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = y * row + x * layout.total;
            for c in 0..layout.color {
                let mut acc = 0u32;
                for ky in 0..3 {
                    let n = (y + ky - 1) * row + x * layout.total + c;
                    acc += src[n - layout.total] as u32
                        + src[n] as u32
                        + src[n + layout.total] as u32;
                }
                // center pixel counted once so far; bump its weight to 5
                acc += 4 * src[idx + c] as u32;
                out[idx + c] = ((acc + 6) / 13) as u8;
            }
        }
    }
    rebuild(image, out)
}

/// Reassemble a raw byte buffer into the same mode as `reference`.
fn rebuild(reference: &DynamicImage, pixels: Vec<u8>) -> DynamicImage {
    rebuild_as(reference, reference.width(), reference.height(), pixels)
}

/// Reassemble a raw byte buffer of `width` x `height` pixels into the same
/// 8-bit mode as `reference`.
pub(crate) fn rebuild_as(
    reference: &DynamicImage,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
) -> DynamicImage {
    // Callers size the buffer for the mode and dimensions they pass, so
    // `from_raw` cannot fail here.
    match reference.color() {
        ColorType::L8 => DynamicImage::ImageLuma8(
            ImageBuffer::from_raw(width, height, pixels).expect("buffer length preserved"),
        ),
        ColorType::La8 => DynamicImage::ImageLumaA8(
            ImageBuffer::from_raw(width, height, pixels).expect("buffer length preserved"),
        ),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(
            ImageBuffer::from_raw(width, height, pixels).expect("buffer length preserved"),
        ),
        _ => DynamicImage::ImageRgba8(
            ImageBuffer::from_raw(width, height, pixels).expect("buffer length preserved"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    /// Build a solid-colored RGB test image.
    fn solid_rgb(width: u32, height: u32, px: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(px)))
    }

    fn first_pixel(image: &DynamicImage) -> &[u8] {
        let layout = ChannelLayout::of(image);
        &image.as_bytes()[..layout.total]
    }

    // ===== Brightness =====

    #[test]
    fn test_brightness_identity() {
        let img = solid_rgb(4, 4, [100, 150, 200]);
        let out = brightness(&img, 1.0);
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_brightness_zero_is_black() {
        let img = solid_rgb(4, 4, [100, 150, 200]);
        let out = brightness(&img, 0.0);
        assert_eq!(first_pixel(&out), &[0, 0, 0]);
    }

    #[test]
    fn test_brightness_doubles() {
        let img = solid_rgb(4, 4, [64, 64, 64]);
        let out = brightness(&img, 2.0);
        assert_eq!(first_pixel(&out), &[128, 128, 128]);
    }

    #[test]
    fn test_brightness_clamps_at_white() {
        let img = solid_rgb(4, 4, [200, 200, 200]);
        let out = brightness(&img, 2.0);
        assert_eq!(first_pixel(&out), &[255, 255, 255]);
    }

    #[test]
    fn test_brightness_preserves_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([64, 64, 64, 77])));
        let out = brightness(&img, 2.0);
        assert_eq!(first_pixel(&out), &[128, 128, 128, 77]);
        assert_eq!(out.color(), ColorType::Rgba8);
    }

    #[test]
    fn test_brightness_on_grayscale_mode() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(3, 3, image::Luma([50])));
        let out = brightness(&img, 2.0);
        assert_eq!(out.color(), ColorType::L8);
        assert_eq!(first_pixel(&out), &[100]);
    }

    // ===== Contrast =====

    #[test]
    fn test_contrast_identity() {
        let img = solid_rgb(4, 4, [30, 130, 230]);
        let out = contrast(&img, 1.0);
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_contrast_zero_flattens_to_mean() {
        // Uniform image: mean luminance equals the pixel luminance, so a
        // zero factor collapses every channel onto one gray value.
        let img = solid_rgb(4, 4, [100, 100, 100]);
        let out = contrast(&img, 0.0);
        assert_eq!(first_pixel(&out), &[100, 100, 100]);
    }

    #[test]
    fn test_contrast_pushes_away_from_mean() {
        let mut buf = RgbImage::new(2, 1);
        buf.put_pixel(0, 0, Rgb([50, 50, 50]));
        buf.put_pixel(1, 0, Rgb([200, 200, 200]));
        let out = contrast(&DynamicImage::ImageRgb8(buf), 2.0);
        let bytes = out.as_bytes();
        assert!(bytes[0] < 50, "dark pixel should get darker, was {}", bytes[0]);
        assert!(bytes[3] > 200, "bright pixel should get brighter, was {}", bytes[3]);
    }

    // ===== Sharpness =====

    #[test]
    fn test_sharpness_identity() {
        let mut buf = RgbImage::new(5, 5);
        for (x, y, px) in buf.enumerate_pixels_mut() {
            *px = Rgb([(x * 40) as u8, (y * 40) as u8, 128]);
        }
        let img = DynamicImage::ImageRgb8(buf);
        let out = sharpness(&img, 1.0);
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_sharpness_uniform_unchanged() {
        // Smoothing a flat image reproduces it, so any factor is a no-op
        let img = solid_rgb(6, 6, [90, 120, 30]);
        let out = sharpness(&img, 3.0);
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_sharpness_amplifies_edges() {
        // Vertical edge between dark and bright halves
        let mut buf = RgbImage::new(6, 5);
        for (x, _, px) in buf.enumerate_pixels_mut() {
            *px = Rgb(if x < 3 { [50, 50, 50] } else { [200, 200, 200] });
        }
        let img = DynamicImage::ImageRgb8(buf);
        let out = sharpness(&img, 3.0);

        // The bright side of the edge overshoots past its original value
        let edge = out.as_bytes()[(2 * 6 + 3) * 3];
        assert!(edge > 200, "edge pixel should overshoot, was {}", edge);
    }

    #[test]
    fn test_sharpness_small_image_passthrough() {
        // Too small for a 3x3 interior; smoothing leaves it untouched
        let img = solid_rgb(2, 2, [10, 20, 30]);
        let out = sharpness(&img, 0.0);
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_smooth_border_preserved() {
        let mut buf = RgbImage::from_pixel(5, 5, Rgb([0, 0, 0]));
        buf.put_pixel(2, 2, Rgb([255, 255, 255]));
        let img = DynamicImage::ImageRgb8(buf);
        let smoothed = smooth3x3(&img);
        // Corner is on the border: untouched
        assert_eq!(&smoothed.as_bytes()[..3], &[0, 0, 0]);
        // Center was averaged down from pure white
        let center = smoothed.as_bytes()[(2 * 5 + 2) * 3];
        assert!(center < 255 && center > 0, "center was {}", center);
    }

    // ===== Color =====

    #[test]
    fn test_color_identity() {
        let img = solid_rgb(4, 4, [200, 100, 50]);
        let out = color(&img, 1.0);
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_color_zero_desaturates() {
        let img = solid_rgb(4, 4, [200, 100, 50]);
        let out = color(&img, 0.0);
        let px = first_pixel(&out);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        // Still a three-channel image
        assert_eq!(out.color(), ColorType::Rgb8);
    }

    #[test]
    fn test_color_boost_spreads_channels() {
        let img = solid_rgb(4, 4, [180, 120, 80]);
        let out = color(&img, 2.0);
        let px = first_pixel(&out);
        assert!(
            px[0] as i32 - px[2] as i32 > 100,
            "channel spread should grow, got {:?}",
            px
        );
    }

    #[test]
    fn test_color_single_channel_untouched() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(4, 4, image::Luma([77])));
        let out = color(&img, 3.0);
        assert_eq!(out.as_bytes(), img.as_bytes());
        assert_eq!(out.color(), ColorType::L8);
    }

    #[test]
    fn test_color_preserves_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 31])));
        let out = color(&img, 0.0);
        assert_eq!(first_pixel(&out)[3], 31);
    }

    // ===== Mode handling =====

    #[test]
    fn test_sixteen_bit_input_converted() {
        let img = DynamicImage::ImageRgb16(image::ImageBuffer::from_pixel(
            2,
            2,
            image::Rgb([32768u16, 32768, 32768]),
        ));
        let out = brightness(&img, 1.0);
        assert_eq!(out.color(), ColorType::Rgba8);
    }

    #[test]
    fn test_mean_luminance_uniform_gray() {
        let img = solid_rgb(4, 4, [128, 128, 128]);
        let mean = mean_luminance(&img);
        assert!((mean - 128.0 / 255.0).abs() < 1e-4, "mean was {}", mean);
    }
}
