//! Image rotation with canvas expansion.
//!
//! Rotation angles are in degrees, positive = counter-clockwise. The output
//! canvas always grows to the bounding box of the rotated content; corners
//! are never cropped away. Regions of the canvas with no source pixel are
//! zero-filled, which is black for opaque modes and transparent for modes
//! with alpha.
//!
//! Exact quarter turns (including 0) are delegated to the `image` crate's
//! lossless rotations. Any other angle is resampled with inverse mapping:
//! for each output pixel, the source position is found by applying the
//! inverse rotation and the value is interpolated bilinearly.

use image::DynamicImage;

/// Compute the bounding box of an image rotated by `degrees`.
///
/// # Example
///
/// ```ignore
/// // A quarter turn swaps dimensions
/// assert_eq!(rotated_bounds(100, 50, 90.0), (50, 100));
/// ```
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let turns = degrees.rem_euclid(360.0);

    // Exact cases first: no resampling error should leak into the bounds
    if turns.abs() < 0.001 || (turns - 180.0).abs() < 0.001 || (360.0 - turns) < 0.001 {
        return (width, height);
    }
    if (turns - 90.0).abs() < 0.001 || (turns - 270.0).abs() < 0.001 {
        return (height, width);
    }

    let rad = turns.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    let (w, h) = (width as f64, height as f64);

    // Bounding box of a rotated rectangle
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;
    (new_w.max(1), new_h.max(1))
}

/// Rotate an image counter-clockwise by a whole number of degrees,
/// expanding the canvas to fit.
///
/// Any angle is accepted; it is reduced modulo 360 first.
pub fn rotate_degrees(image: &DynamicImage, degrees: i32) -> DynamicImage {
    match degrees.rem_euclid(360) {
        0 => image.clone(),
        // `image` names its rotations clockwise; a counter-clockwise
        // quarter turn is its rotate270
        90 => image.rotate270(),
        180 => image.rotate180(),
        270 => image.rotate90(),
        turns => resample_rotation(image, turns as f64),
    }
}

/// Inverse-mapped bilinear rotation for non-quarter angles.
fn resample_rotation(image: &DynamicImage, degrees: f64) -> DynamicImage {
    let image = crate::enhance::eight_bit(image);
    let image = image.as_ref();
    let channels = image.color().channel_count() as usize;
    let (src_w, src_h) = (image.width(), image.height());
    let (dst_w, dst_h) = rotated_bounds(src_w, src_h, degrees);

    // Inverse transform: rotate destination coordinates back by -degrees.
    // The negation also flips the visual direction so that positive input
    // angles come out counter-clockwise.
    let rad = -degrees.to_radians();
    let (sin, cos) = (rad.sin(), rad.cos());

    let src_cx = src_w as f64 / 2.0;
    let src_cy = src_h as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let src = image.as_bytes();
    let mut out = vec![0u8; dst_w as usize * dst_h as usize * channels];
    let mut sample = vec![0u8; channels];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 - dst_cx;
            let dy = dst_y as f64 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx;
            let src_y = dx * sin + dy * cos + src_cy;

            if sample_bilinear(src, src_w, src_h, channels, src_x, src_y, &mut sample) {
                let idx = (dst_y as usize * dst_w as usize + dst_x as usize) * channels;
                out[idx..idx + channels].copy_from_slice(&sample);
            }
        }
    }

    crate::enhance::rebuild_as(image, dst_w, dst_h, out)
}

/// Sample `(x, y)` with bilinear interpolation into `out`.
///
/// Returns false when the position falls outside the source image; the
/// caller leaves the destination zero-filled in that case.
fn sample_bilinear(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    x: f64,
    y: f64,
    out: &mut [u8],
) -> bool {
    if x < 0.0 || y < 0.0 || x >= (width - 1) as f64 || y >= (height - 1) as f64 {
        return false;
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let row = width as usize * channels;
    let p00 = y0 * row + x0 * channels;
    let p10 = p00 + channels;
    let p01 = p00 + row;
    let p11 = p01 + channels;

    for c in 0..channels {
        let v = src[p00 + c] as f64 * (1.0 - fx) * (1.0 - fy)
            + src[p10 + c] as f64 * fx * (1.0 - fy)
            + src[p01 + c] as f64 * (1.0 - fx) * fy
            + src[p11 + c] as f64 * fx * fy;
        out[c] = v.clamp(0.0, 255.0).round() as u8;
    }
    true
}
