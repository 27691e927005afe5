//! Batch orchestration across the source directory.
//!
//! The orchestrator walks every entry of the source directory and runs one
//! [`session`](crate::session) per entry. A `Retry` outcome from any session
//! abandons the rest of the pass, collects a brand-new spec and restarts
//! from a fresh directory listing, as an explicit loop with replaced state
//! so repeated retries cannot grow the call stack. Earlier images are
//! reprocessed on restart; their previous outputs are kept (the namer never
//! overwrites).
//!
//! There is no skip policy: a single entry that fails to load aborts the
//! whole batch.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use retouch_core::AdjustmentSpec;

use crate::preview::Previewer;
use crate::prompt::Prompter;
use crate::session::{self, SessionOutcome};

/// Whether sessions run silently or with preview and confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Transform and save every image, no questions asked.
    Batch,
    /// Preview each image and ask before saving.
    Interactive,
}

/// Injected source and output locations.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Counters for the end-of-run report.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub saved: usize,
    pub discarded: usize,
    pub restarts: usize,
}

/// Process the whole source directory under `spec`.
pub fn run<R: BufRead, W: Write, P: Previewer>(
    config: &BatchConfig,
    mut spec: AdjustmentSpec,
    mode: RunMode,
    prompter: &mut Prompter<R, W>,
    previewer: &mut P,
) -> anyhow::Result<BatchSummary> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "creating output directory {}",
            config.output_dir.display()
        )
    })?;

    let mut summary = BatchSummary::default();
    'batch: loop {
        let entries = list_entries(&config.source_dir)?;
        tracing::info!(
            count = entries.len(),
            dir = %config.source_dir.display(),
            "processing directory"
        );

        for source in &entries {
            let outcome = session::process_image(
                source,
                &config.output_dir,
                &spec,
                mode,
                prompter,
                previewer,
            )?;
            match outcome {
                SessionOutcome::Saved(path) => {
                    tracing::debug!(path = %path.display(), "session saved");
                    summary.saved += 1;
                }
                SessionOutcome::Discarded => summary.discarded += 1,
                SessionOutcome::Retry => {
                    summary.restarts += 1;
                    tracing::info!("retry requested; collecting new adjustments");
                    spec = prompter.acquire_spec()?;
                    continue 'batch;
                }
            }
        }
        break;
    }

    tracing::info!(
        saved = summary.saved,
        discarded = summary.discarded,
        restarts = summary.restarts,
        "batch finished"
    );
    Ok(summary)
}

/// Every entry of the source directory, sorted by name.
///
/// No file-type filtering happens here; entries that are not readable
/// images fail later, at load.
fn list_entries(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let read = fs::read_dir(dir)
        .with_context(|| format!("reading source directory {}", dir.display()))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry =
            entry.with_context(|| format!("reading source directory {}", dir.display()))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}
