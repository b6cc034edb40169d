mod app;

use anyhow::Result;
use app::{App, OutputFormat};
use clap::{Parser, Subcommand};
use procmetrics_core::CollectorConfig;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Per-process metrics from the procfs process table.
#[derive(Parser)]
#[command(name = "procmetrics", about = "Per-process metrics collector", version)]
struct Args {
    /// Path to the process table root (defaults to /proc or PROCMETRICS_PROC_PATH).
    #[arg(long, global = true)]
    proc_path: Option<PathBuf>,

    /// Log level or filter directive (defaults to info or PROCMETRICS_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every namespace that can be collected.
    Catalog,
    /// Run a single collection cycle.
    Collect {
        /// Namespaces to collect, as printed by `catalog`. All when omitted.
        patterns: Vec<String>,
    },
    /// Run collection cycles on a fixed interval until interrupted.
    Watch {
        patterns: Vec<String>,

        /// Seconds between cycles.
        #[arg(short, long, default_value = "10")]
        interval: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = CollectorConfig::from_env();
    if let Some(proc_path) = args.proc_path {
        config.proc_path = proc_path;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    setup_logging(&config.log_level);

    match args.command {
        Command::Catalog => app::write_catalog(&mut io::stdout().lock(), args.format)?,
        Command::Collect { patterns } => {
            let app = App::new(config, &patterns, args.format)?;
            let metrics = app.run_cycle()?;
            app.write_metrics(&mut io::stdout().lock(), &metrics)?;
        }
        Command::Watch { patterns, interval } => {
            let app = App::new(config, &patterns, args.format)?;
            let interval = Duration::from_secs(interval.max(1));
            run_watch(&app, interval, tokio::signal::ctrl_c()).await?;
        }
    }

    Ok(())
}

fn setup_logging(level: &str) {
    // Logs go to stderr so stdout stays machine readable
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run_watch<F: Future>(app: &App, interval: Duration, shutdown: F) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Pinned once so a shutdown that fires during a cycle is still seen on the next select
    tokio::pin!(shutdown);

    info!(interval_secs = interval.as_secs(), "watching process table");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // One cycle at a time; a failed cycle is logged and the next tick starts fresh
                match app.run_cycle() {
                    Ok(metrics) => app.write_metrics(&mut io::stdout().lock(), &metrics)?,
                    Err(e) => error!("collection cycle failed: {:#}", e),
                }
            }
            _ = &mut shutdown => {
                info!("interrupted, stopping");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_watch_stops_when_shutdown_fires_between_cycles() {
        let root = tempfile::tempdir().unwrap();
        let config = CollectorConfig::default().with_proc_path(root.path());
        let app = App::new(
            config,
            &["/intel/procfs/processes/running".to_string()],
            OutputFormat::Json,
        )
        .unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            // let several cycles run first
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(());
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            run_watch(&app, Duration::from_millis(10), rx),
        )
        .await
        .expect("watch loop ignored shutdown")
        .unwrap();
    }

    #[tokio::test]
    async fn test_watch_stops_on_shutdown_sent_before_start() {
        let root = tempfile::tempdir().unwrap();
        let config = CollectorConfig::default().with_proc_path(root.path());
        let app = App::new(config, &[], OutputFormat::Text).unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        tx.send(()).unwrap();

        tokio::time::timeout(
            Duration::from_secs(5),
            run_watch(&app, Duration::from_millis(10), rx),
        )
        .await
        .expect("watch loop ignored shutdown")
        .unwrap();
    }
}
