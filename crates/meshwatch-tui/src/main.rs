//! `meshwatch` — live terminal view of a simulated mesh network.
//!
//! Built on [ratatui](https://ratatui.rs) with data from `meshwatch-sim`'s
//! snapshot surface, reconciled into display projections by
//! `meshwatch-core`. Four panels show the coordinator hierarchy, the node
//! graph, active streams, and the selected node's routing table.
//!
//! Logs are written to a file (default `/tmp/meshwatch.log`) to avoid
//! corrupting the terminal UI. A background driver task mutates the
//! simulation; a bridge task forwards topology changes into the action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod panel;
mod panels;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use meshwatch_sim::{demo_scenario, driver};

use crate::app::App;

/// Terminal viewer for a simulated mesh network.
#[derive(Parser, Debug)]
#[command(name = "meshwatch", version, about)]
struct Cli {
    /// Config file path (defaults to the platform config dir)
    #[arg(short = 'c', long, env = "MESHWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Display refresh interval in milliseconds (overrides config)
    #[arg(short = 'r', long)]
    refresh_ms: Option<u64>,

    /// Log file path (defaults to /tmp/meshwatch.log)
    #[arg(long, default_value = "/tmp/meshwatch.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "meshwatch={log_level},meshwatch_core={log_level},meshwatch_sim={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("meshwatch.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(meshwatch_config::config_path);
    let mut config = meshwatch_config::load_config_from(&config_path)?;
    if let Some(refresh_ms) = cli.refresh_ms {
        config.refresh_interval_ms = refresh_ms;
        config.validate()?;
    }

    info!(
        refresh_ms = config.refresh_interval_ms,
        sim_step_ms = config.sim_step_ms,
        "starting meshwatch"
    );

    let scenario = Arc::new(demo_scenario());
    let cancel = CancellationToken::new();

    let sim_task = driver::spawn_simulation(
        Arc::clone(&scenario),
        Duration::from_millis(config.sim_step_ms),
        cancel.child_token(),
    );

    let mut app = App::new(scenario, config, config_path, cancel.clone());
    let result = app.run().await;

    cancel.cancel();
    let _ = sim_task.await;

    result
}
