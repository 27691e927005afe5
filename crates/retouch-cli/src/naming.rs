//! Collision-free output naming.
//!
//! Output files are named `<sourceBasename>_<YYYYMMDD_HHMMSS>_edit_<n>.jpg`
//! where `n` is the smallest counter that is free at call time. Two saves of
//! the same source within the same second therefore get `_edit_0` and
//! `_edit_1` rather than clobbering each other. The extension is always
//! `jpg` no matter what format the source had.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Every edited image is written in this format.
pub const OUTPUT_EXTENSION: &str = "jpg";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build a path under `output_dir` for an edit of `source` that does not
/// collide with any existing file.
///
/// The timestamp is passed in rather than read from the clock so callers
/// (and tests) control the second-granularity component.
pub fn output_path(source: &Path, output_dir: &Path, timestamp: DateTime<Local>) -> PathBuf {
    let base = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let stamp = timestamp.format(TIMESTAMP_FORMAT).to_string();

    let mut counter = 0u32;
    loop {
        let candidate =
            output_dir.join(format!("{base}_{stamp}_edit_{counter}.{OUTPUT_EXTENSION}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
