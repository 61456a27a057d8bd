//! `linkdash-tui`: Terminal analytics dashboard for a URL-shortening service.
//!
//! Built on [ratatui](https://ratatui.rs) with data from `linkdash-core`'s
//! [`DashboardController`](linkdash_core::DashboardController). Screens are
//! navigable via number keys (1-3): Overview, Links and Analytics.
//!
//! Logs are written to a file (default `/tmp/linkdash-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task forwards every
//! published dashboard view into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use linkdash_core::{DashboardConfig, DashboardController, TlsVerification};

use crate::app::App;

/// Terminal dashboard for short-link analytics.
#[derive(Parser, Debug)]
#[command(name = "linkdash-tui", version, about)]
struct Cli {
    /// Links API base URL (e.g., http://localhost:3000/api)
    #[arg(short = 'u', long, env = "LINKDASH_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Config profile to use (defaults to the config's default profile)
    #[arg(short = 'p', long, env = "LINKDASH_PROFILE")]
    profile: Option<String>,

    /// Request timeout (e.g., "10s", "1m"). Unset waits indefinitely.
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Auto-refresh period in seconds (0 disables)
    #[arg(long)]
    refresh_interval: Option<u64>,

    /// Log file path (defaults to /tmp/linkdash-tui.log)
    #[arg(long, default_value = "/tmp/linkdash-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Never log to stdout/stderr: it would
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
            "linkdash_tui={log_level},linkdash_core={log_level},linkdash_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("linkdash-tui.log"));

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

/// Resolve the session config. Priority: CLI flags > config file > built-in defaults.
fn build_config(cli: &Cli) -> Result<DashboardConfig> {
    let file_config = match linkdash_config::load_config() {
        Ok(cfg) => cfg,
        Err(e) if cli.profile.is_none() => {
            warn!(error = %e, "ignoring unreadable config file");
            linkdash_config::Config::default()
        }
        Err(e) => return Err(e).wrap_err("failed to load config file"),
    };

    let mut config = file_config
        .dashboard_config(cli.profile.as_deref())
        .wrap_err("invalid dashboard configuration")?;

    if let Some(ref raw) = cli.api_base_url {
        config.api_base_url = linkdash_config::parse_base_url(raw)?;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = (!timeout.is_zero()).then_some(timeout);
    }
    if cli.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = cli.refresh_interval {
        config.refresh_interval_secs = secs;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file: hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = build_config(&cli)?;
    info!(
        api_base_url = %config.api_base_url,
        refresh_interval_secs = config.refresh_interval_secs,
        "starting linkdash-tui"
    );

    let controller = DashboardController::new(config).wrap_err("failed to build HTTP client")?;
    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
