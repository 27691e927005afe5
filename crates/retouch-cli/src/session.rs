//! Per-image editing session.
//!
//! One session owns exactly one image from load to its terminal state:
//!
//! ```text
//! Loaded -> Transformed -> {Previewed} -> {Saved | Discarded | Retrying}
//! ```
//!
//! The untouched original is kept alongside the working copy for the whole
//! session so undo can restore it pixel-for-pixel; both are dropped when
//! the session ends. In batch mode the preview/undo/save stages collapse
//! into an unconditional save.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use image::DynamicImage;
use retouch_core::AdjustmentSpec;

use crate::batch::RunMode;
use crate::naming;
use crate::preview::Previewer;
use crate::prompt::{Prompter, SaveDecision};

/// Terminal state of one per-image session.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The working image was written to the returned path.
    Saved(PathBuf),
    /// The user declined to save; nothing was written.
    Discarded,
    /// The user asked to re-enter adjustments; the whole batch restarts.
    Retry,
}

/// Run one image through the session state machine.
pub fn process_image<R: BufRead, W: Write, P: Previewer>(
    source: &Path,
    output_dir: &Path,
    spec: &AdjustmentSpec,
    mode: RunMode,
    prompter: &mut Prompter<R, W>,
    previewer: &mut P,
) -> anyhow::Result<SessionOutcome> {
    let original = retouch_core::load_image(source)
        .with_context(|| format!("loading {}", source.display()))?;
    tracing::debug!(
        path = %source.display(),
        width = original.width(),
        height = original.height(),
        "loaded image"
    );

    let mut working = retouch_core::apply(original.clone(), spec);

    if mode == RunMode::Batch {
        let path = persist(&working, source, output_dir, prompter)?;
        return Ok(SessionOutcome::Saved(path));
    }

    previewer
        .show(&working, "edited")
        .context("previewing edited image")?;

    if prompter.ask_undo()? {
        previewer
            .show(&original, "original")
            .context("previewing original image")?;
        // Full revert to the untouched original, not a step-wise undo
        working = original;
    }

    match prompter.ask_save_decision()? {
        SaveDecision::Yes => {
            let path = persist(&working, source, output_dir, prompter)?;
            Ok(SessionOutcome::Saved(path))
        }
        SaveDecision::No => {
            prompter.say("Changes discarded.")?;
            tracing::info!(path = %source.display(), "changes discarded");
            Ok(SessionOutcome::Discarded)
        }
        SaveDecision::Retry => Ok(SessionOutcome::Retry),
    }
}

fn persist<R: BufRead, W: Write>(
    image: &DynamicImage,
    source: &Path,
    output_dir: &Path,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<PathBuf> {
    let path = naming::output_path(source, output_dir, Local::now());
    retouch_core::save_jpeg(image, &path)
        .with_context(|| format!("saving {}", path.display()))?;
    prompter.say(&format!("Image saved as: {}", path.display()))?;
    tracing::info!(path = %path.display(), "image saved");
    Ok(path)
}
