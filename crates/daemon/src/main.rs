//! Msgloop - Demonstration entry point
//! Starts named workers, posts sample messages, lets them run, shuts them down.

mod script;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use msgloop_core::{Worker, WorkerConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "msgloop")]
#[command(about = "Run named worker threads and post messages to them", long_about = None)]
#[command(version)]
struct Args {
    /// Comma-separated worker names
    #[arg(
        long,
        env = "MSGLOOP_WORKERS",
        value_delimiter = ',',
        default_value = "WorkerThread1,WorkerThread2"
    )]
    workers: Vec<String>,

    /// Interval between timer ticks, in milliseconds
    #[arg(long, env = "MSGLOOP_TIMER_PERIOD_MS", default_value = "250")]
    timer_period_ms: u64,

    /// Do not start timer generators
    #[arg(long)]
    no_timer: bool,

    /// How long to let the workers run before shutting down, in milliseconds
    #[arg(long, default_value = "1000")]
    run_for_ms: u64,

    /// Run until Ctrl+C instead of for a fixed time
    #[arg(long)]
    until_signal: bool,

    /// JSON array of {"worker", "text", "value"} objects to post
    #[arg(long, env = "MSGLOOP_MESSAGES")]
    messages: Option<String>,

    /// Log format: pretty or json
    #[arg(long, env = "MSGLOOP_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

impl Args {
    fn worker_config(&self) -> WorkerConfig {
        let config =
            WorkerConfig::default().with_timer_period(Duration::from_millis(self.timer_period_ms));
        if self.no_timer {
            config.without_timer()
        } else {
            config
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Initialize logging
    telemetry::init_logging(&args.log_format)?;
    info!("Msgloop v{} starting...", VERSION);

    // 2. Resolve the message script
    let postings = match &args.messages {
        Some(json) => script::parse_postings(json)?,
        None => script::default_postings(&args.workers),
    };
    script::check_targets(&postings, &args.workers)?;

    // 3. Create and start workers (start blocks on the rendezvous)
    let config = args.worker_config();
    let mut workers = Vec::with_capacity(args.workers.len());
    for name in &args.workers {
        let worker = Arc::new(
            Worker::with_config(name.as_str(), config.clone(), msgloop_core::LogHandler)
                .with_context(|| format!("Invalid configuration for worker {}", name))?,
        );
        let starting = Arc::clone(&worker);
        tokio::task::spawn_blocking(move || starting.start())
            .await
            .context("Start task failed")?
            .with_context(|| format!("Failed to start worker {}", name))?;
        workers.push(worker);
    }

    // 4. Post messages
    for posting in postings {
        if let Some(worker) = workers.iter().find(|w| w.name() == posting.worker) {
            worker.post(posting.envelope);
        }
    }

    // 5. Give the workers time to process
    if args.until_signal {
        info!("Press Ctrl+C to shutdown");
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        info!("Shutdown signal received");
    } else {
        tokio::time::sleep(Duration::from_millis(args.run_for_ms)).await;
    }

    // 6. Shut down in creation order (shutdown blocks on join)
    for worker in workers {
        let name = worker.name().to_string();
        let summary = tokio::task::spawn_blocking(move || worker.shutdown())
            .await
            .context("Shutdown task failed")?
            .with_context(|| format!("Failed to shut down worker {}", name))?;
        info!(
            worker = %name,
            dispatched = summary.dispatched,
            timer_ticks = summary.timer_ticks,
            discarded = summary.discarded,
            "Worker finished"
        );
    }

    info!("Shutdown complete.");
    Ok(())
}
