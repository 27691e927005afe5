//! retouch - apply a shared set of adjustments to every image in a folder.
//!
//! The binary wires the interactive dialogue, the adjustment engine and the
//! batch orchestrator together: ask for the run mode once, collect one
//! [`AdjustmentSpec`](retouch_core::AdjustmentSpec), then walk the source
//! directory with it.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod batch;
mod naming;
mod preview;
mod prompt;
mod session;

use batch::{BatchConfig, RunMode};
use preview::SystemViewer;
use prompt::Prompter;

#[derive(Parser)]
#[command(name = "retouch")]
#[command(about = "Apply a shared set of adjustments to every image in a folder")]
struct Cli {
    /// Directory containing the images to edit
    #[arg(short, long, default_value = "./imgs")]
    input: PathBuf,

    /// Directory the edited images are written to (created if missing)
    #[arg(short, long, default_value = "./editedImgs")]
    output: PathBuf,

    /// Process every image without preview or confirmation
    #[arg(long)]
    batch: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retouch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    prompter.say("Welcome to the retouch image editing tool!")?;

    let mode = if cli.batch || prompter.ask_batch_mode()? {
        RunMode::Batch
    } else {
        RunMode::Interactive
    };

    let spec = prompter.acquire_spec()?;

    let config = BatchConfig {
        source_dir: cli.input,
        output_dir: cli.output,
    };
    let summary = batch::run(&config, spec, mode, &mut prompter, &mut SystemViewer)?;

    prompter.say(&format!(
        "\nAll images have been processed. ({} saved, {} discarded)",
        summary.saved, summary.discarded
    ))?;
    Ok(())
}
