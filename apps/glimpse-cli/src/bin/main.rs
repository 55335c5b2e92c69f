use std::env;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glimpse_core::config::Config;
use glimpse_core::error::{Error, Result as CoreResult};
use glimpse_core::traits::EventSink;
use glimpse_core::types::{Event, SearchRecord};
use glimpse_pipeline::ScreenshotService;

/// Ticks a spinner per indexed screenshot and prints search records as JSON lines.
struct TerminalSink {
    progress: ProgressBar,
}

impl TerminalSink {
    fn spinner() -> anyhow::Result<Self> {
        let progress = ProgressBar::new_spinner();
        progress.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} indexed {msg}")?);
        Ok(Self { progress })
    }

    fn quiet() -> Self {
        Self { progress: ProgressBar::hidden() }
    }
}

impl EventSink for TerminalSink {
    fn emit(&self, event: &Event) -> CoreResult<()> {
        match event {
            Event::ResultFound(doc) => {
                self.progress.inc(1);
                self.progress.set_message(doc.path.clone());
            }
            Event::SearchFound(record) => {
                let line = SearchRecord { path: record.path.clone(), content: None };
                let json = serde_json::to_string(&line).map_err(|e| Error::Event(e.to_string()))?;
                println!("{json}");
            }
        }
        Ok(())
    }
}

fn init_tracing(level: &str) {
    // Logs go to stderr so search output stays parseable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <scan|search> [query]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    init_tracing(&settings.log_level);
    let (cmd, args) = parse_args();

    match cmd.as_str() {
        "scan" => {
            let sink = Arc::new(TerminalSink::spinner()?);
            sink.progress.enable_steady_tick(Duration::from_millis(120));
            let service = ScreenshotService::from_settings(&settings, sink.clone())?;

            let token = service.cancellation_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupted, skipping screenshots that have not started");
                    token.cancel();
                }
            });

            let outcome = service.scan_once().await;
            sink.progress.finish_and_clear();
            let report = outcome?;
            println!(
                "Indexed {} of {} screenshots ({} without text, {} failed, {} cancelled)",
                report.indexed,
                report.candidates,
                report.empty,
                report.failed(),
                report.cancelled
            );
            for failure in &report.failures {
                println!("  {}: {}", failure.path.display(), failure.error);
            }
        }
        "search" => {
            let query = args.join(" ");
            if query.trim().is_empty() {
                eprintln!("Usage: glimpse search \"<query>\"");
                std::process::exit(1);
            }
            let service = ScreenshotService::from_settings(&settings, Arc::new(TerminalSink::quiet()))?;
            let outcome = service.search(&query);
            let closed = service.shutdown();
            let count = outcome?;
            closed?;
            info!("{} screenshots matched {:?}", count, query);
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
