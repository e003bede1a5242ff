use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use cursor_trail_core::TrailSettings;
use cursor_trail_platform::{Result, ViewportRect};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod host;
mod pointer;
mod surface;

use host::{log_summary, run_live, run_simulated, HostOptions};

/// Headless cursor trail host: feeds a scripted pointer through the trail engine.
#[derive(Debug, Parser)]
#[command(name = "cursor-trail", version)]
struct Cli {
    /// Settings file (.toml or .json). Without one the trail runs enabled with defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the jitter random source.
    #[arg(long)]
    seed: Option<u64>,

    /// Redraw frames to run.
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Timer tick in milliseconds.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..=1000))]
    tick_ms: u64,

    /// Viewport width and height.
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [1280.0, 720.0])]
    viewport: Vec<f32>,

    /// Step a manual clock instead of running in real time.
    #[arg(long)]
    simulate: bool,

    /// Write the last frame's mesh as JSON.
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Init logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let cli = Cli::parse();
    info!("Cursor trail starting");
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cursor-trail error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => TrailSettings::load(path)?,
        None => TrailSettings {
            enabled: true,
            ..TrailSettings::default()
        },
    };
    let options = HostOptions {
        settings,
        seed: cli.seed,
        frames: cli.frames,
        tick: Duration::from_millis(cli.tick_ms),
        viewport: ViewportRect::new(0.0, 0.0, cli.viewport[0], cli.viewport[1]),
    };
    info!(
        frames = options.frames,
        tick_ms = cli.tick_ms,
        simulate = cli.simulate,
        "running trail host"
    );

    let summary = if cli.simulate {
        run_simulated(&options)?
    } else {
        run_live(&options)?
    };
    log_summary(&summary);

    if let Some(path) = &cli.dump {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &summary.final_mesh)?;
        info!(path = %path.display(), "final mesh written");
    }
    Ok(())
}
