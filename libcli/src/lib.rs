use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use libengine::{Event, EventSink, HttpBackend, LatencySummary, TestSession};
use libprotocol::LoadTestRequest;

#[derive(Debug, Parser)]
#[command(name = "loadboard")]
#[command(about = "Live dashboard for an HTTP load-testing backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start a test cycle and render rolling statistics on every update
    Run {
        /// Target url to load test
        #[arg(long)]
        url: String,
        /// Queries per second; the window keeps qps * 20 samples
        #[arg(long, default_value_t = 1)]
        qps: u32,
        /// Base address of the load-generating backend
        #[arg(long, default_value = "http://localhost:8000")]
        backend: String,
        /// Stop after this many completed polls (runs until Ctrl-C when omitted)
        #[arg(long)]
        polls: Option<u64>,
        #[arg(long, default_value_t = 5000)]
        interval_ms: u64,
    },
    /// Validate a url/qps pair without starting anything
    Check {
        #[arg(long)]
        url: String,
        #[arg(long, default_value_t = 1)]
        qps: u32,
    },
}

pub fn run() -> anyhow::Result<()> {
    let args = Cli::parse();

    match args.command {
        Commands::Run { url, qps, backend, polls, interval_ms } => {
            libprotocol::validate(&LoadTestRequest { url: url.clone(), qps })?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_session(
                url,
                qps,
                backend,
                polls,
                Duration::from_millis(interval_ms),
            ))
        }
        Commands::Check { url, qps } => {
            libprotocol::validate(&LoadTestRequest { url, qps })?;
            println!("ok");
            Ok(())
        }
    }
}

async fn run_session(
    url: String,
    qps: u32,
    backend: String,
    polls: Option<u64>,
    interval: Duration,
) -> anyhow::Result<()> {
    let (tx, mut events) = tokio::sync::mpsc::unbounded_channel();
    let mut session = TestSession::with_poll_interval(
        Arc::new(HttpBackend::new(backend)),
        EventSink::new(tx),
        interval,
    );

    let mut revisions = session.subscribe();
    session.start(&url, qps).await;

    let mut completed: u64 = 0;
    loop {
        while let Ok(event) = events.try_recv() {
            match event {
                Event::BatchAppended { .. } => completed += 1,
                Event::FetchFailed { reason, .. } => {
                    completed += 1;
                    eprintln!("poll failed: {reason}");
                }
                _ => {}
            }
        }

        if let Some(summary) = session.snapshot() {
            let (filled, capacity) = session.window_fill();
            println!("{}", render_table(&summary));
            println!("window: {filled}/{capacity} slots filled");
        } else {
            println!("no data yet");
        }

        if let Some(limit) = polls {
            if completed >= limit {
                break;
            }
        }

        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.stop();
    Ok(())
}

/// Rendering-layer formatting: metrics at 4 decimal places, deltas at 2,
/// "N/A" for not-applicable values. Internal computation stays full
/// precision; rounding happens only here.
pub fn render_table(summary: &LatencySummary) -> String {
    let delta = match summary.delta_percent {
        Some(value) => format!("{value:.2}"),
        None => "N/A".to_string(),
    };

    let mut out = String::new();
    out.push_str(&format!("latest latency (s):     {:.4}\n", summary.latest));
    out.push_str(&format!("performance change (%): {delta}\n"));
    out.push_str(&format!("average latency (s):    {:.4}\n", summary.average));
    out.push_str(&format!("median latency (s):     {:.4}\n", summary.median));
    out.push_str(&format!("maximum latency (s):    {:.4}\n", summary.max));
    out.push_str(&format!("minimum latency (s):    {:.4}\n", summary.min));
    out.push_str(&format!("standard deviation (s): {:.4}\n", summary.std_dev));
    out.push_str(&format!("90th percentile (s):    {:.4}\n", summary.p90));
    out.push_str(&format!("total requests:         {}\n", summary.total_requests));
    out.push_str(&format!("total errors:           {:.4}", summary.total_errors));
    out
}
