//! Image preview via the platform viewer.
//!
//! A preview writes the image to a uniquely named PNG under the system temp
//! directory and opens it detached with whatever the desktop associates
//! with PNG files. The file is left behind for the viewer to read; the OS
//! temp cleanup owns it from there.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Errors from writing or opening a preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The preview file could not be encoded or written.
    #[error("failed to write preview {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Handing the file to the platform viewer failed.
    #[error("failed to open preview in viewer: {0}")]
    Open(#[from] io::Error),
}

/// Something that can show an image to the user.
///
/// The session controller only depends on this trait, so tests can record
/// preview requests instead of launching a viewer.
pub trait Previewer {
    fn show(&mut self, image: &DynamicImage, label: &str) -> Result<(), PreviewError>;
}

/// Opens previews with the platform image viewer.
pub struct SystemViewer;

impl Previewer for SystemViewer {
    fn show(&mut self, image: &DynamicImage, label: &str) -> Result<(), PreviewError> {
        let path = preview_path(label);
        // PNG keeps alpha and grayscale modes intact, unlike the JPEG
        // output path
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| PreviewError::Write {
                path: path.clone(),
                source,
            })?;
        open::that_detached(&path)?;
        tracing::debug!(path = %path.display(), label, "opened preview");
        Ok(())
    }
}

static PREVIEW_SEQ: AtomicU32 = AtomicU32::new(0);

fn preview_path(label: &str) -> PathBuf {
    let seq = PREVIEW_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "retouch_preview_{}_{}_{}.png",
        std::process::id(),
        seq,
        label
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_paths_are_unique() {
        let a = preview_path("edited");
        let b = preview_path("edited");
        assert_ne!(a, b);
    }

    #[test]
    fn test_preview_path_carries_label() {
        let path = preview_path("original");
        assert!(path.to_str().unwrap().contains("original"));
        assert_eq!(path.extension().unwrap(), "png");
    }
}
