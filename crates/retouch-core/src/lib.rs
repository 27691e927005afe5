//! Retouch Core - Image adjustment library
//!
//! This crate provides the image processing functionality for retouch:
//! the adjustment model, factor-based enhancement operations, geometric
//! transforms, and the fixed-order engine that applies a full
//! [`AdjustmentSpec`] to an image.

pub mod codec;
pub mod engine;
pub mod enhance;
pub mod rotation;

pub use codec::{load_image, save_jpeg, CodecError};
pub use engine::{apply, is_single_channel};
pub use rotation::{rotate_degrees, rotated_bounds};

/// The sparse set of edits requested for a run.
///
/// Each adjustment kind is optional: a `None` field is not applied at all,
/// which is distinct from a present identity value (e.g. `brightness:
/// Some(1.0)` still invokes the brightness enhancer, a no-op in effect but
/// not in cost). Grayscale is the one exception and is always carried as a
/// plain flag.
///
/// The stated ranges are what the prompts advertise; the engine applies
/// whatever values are present without correcting them.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AdjustmentSpec {
    /// Brightness factor (0.0 to 3.0, 1.0 = unchanged)
    pub brightness: Option<f32>,
    /// Contrast factor (0.0 to 3.0, 1.0 = unchanged)
    pub contrast: Option<f32>,
    /// Sharpness factor (0.0 to 3.0, 1.0 = unchanged)
    pub sharpness: Option<f32>,
    /// Gaussian blur radius (0 to 10, 0 = unchanged)
    pub blur: Option<f32>,
    /// Rotation in degrees counter-clockwise (0 to 360)
    pub rotation: Option<i32>,
    /// Exact target dimensions in pixels, aspect ratio ignored
    pub resize: Option<(u32, u32)>,
    /// Saturation factor (0.0 to 3.0, 1.0 = unchanged)
    pub saturation: Option<f32>,
    /// Convert to single-channel grayscale before any other step
    pub grayscale: bool,
}

impl AdjustmentSpec {
    /// Create a new AdjustmentSpec with no edits requested
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether no edit was requested at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
