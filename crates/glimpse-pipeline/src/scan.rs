use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::join_all;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use glimpse_core::error::{Error, Result};
use glimpse_core::traits::{EventSink, KeywordRanker, SearchIndex, TextExtractor};
use glimpse_core::types::{CandidateFile, Event, ExtractionResult, ScreenshotDocument};

use crate::report::{FileFailure, ScanReport};
use crate::service::{ScanOptions, ScreenshotService};

enum Outcome {
    Indexed,
    Empty,
    Cancelled,
    Failed,
}

/// The slice of the service each per-file task needs.
#[derive(Clone)]
struct TaskContext {
    ocr: Arc<dyn TextExtractor>,
    ranker: Arc<dyn KeywordRanker>,
    index: Arc<dyn SearchIndex>,
    options: ScanOptions,
    cancel: CancellationToken,
}

impl ScreenshotService {
    /// Discovers screenshots, OCRs and ranks each one in its own blocking
    /// task and upserts the resulting documents.
    ///
    /// Only root resolution, listing, helper materialization and index open
    /// can fail the call. Per-file failures are logged and returned in the
    /// report; indexed documents are emitted as `result:found` events.
    pub async fn scan_and_index(&self) -> Result<ScanReport> {
        let root = self.dir.resolve_root().map_err(|e| Error::scan("resolving the home directory", e))?;
        let entries = self
            .dir
            .list_candidates(&root)
            .map_err(|e| Error::scan("listing the screenshot folder", e))?;

        self.ocr.materialize().map_err(|e| Error::setup("materializing the OCR helper", e))?;
        self.index.open().map_err(|e| Error::setup("opening the search index", e))?;

        let listed = entries.len();
        let candidates: Vec<CandidateFile> = entries.into_iter().filter_map(CandidateFile::from_entry).collect();
        info!("scanning {} of {} entries under {}", candidates.len(), listed, root.display());

        // Each task sends at most one message, so sends never wait.
        let capacity = candidates.len().max(1);
        let (result_tx, result_rx) = mpsc::channel(capacity);
        let (error_tx, error_rx) = mpsc::channel(capacity);
        let forwarder = tokio::spawn(forward_results(result_rx, Arc::clone(&self.events)));
        let collector = tokio::spawn(collect_failures(error_rx));

        let ctx = TaskContext {
            ocr: Arc::clone(&self.ocr),
            ranker: Arc::clone(&self.ranker),
            index: Arc::clone(&self.index),
            options: self.options,
            cancel: self.cancel.clone(),
        };
        let tasks: Vec<_> = candidates
            .into_iter()
            .map(|candidate| {
                let ctx = ctx.clone();
                let results = result_tx.clone();
                let errors = error_tx.clone();
                tokio::task::spawn_blocking(move || run_task(&ctx, &candidate, &results, &errors))
            })
            .collect();
        // The sinks close once the last task drops its senders.
        drop(result_tx);
        drop(error_tx);

        let mut report = ScanReport { candidates: tasks.len(), ..ScanReport::default() };
        for outcome in join_all(tasks).await {
            match outcome {
                Ok(Outcome::Indexed) => report.indexed += 1,
                Ok(Outcome::Empty) => report.empty += 1,
                Ok(Outcome::Cancelled) => report.cancelled += 1,
                Ok(Outcome::Failed) => {}
                Err(e) => error!("screenshot task did not finish: {}", e),
            }
        }

        match forwarder.await {
            Ok(forwarded) => debug!("forwarded {} results", forwarded),
            Err(e) => error!("result forwarder did not finish: {}", e),
        }
        report.failures = collector.await.unwrap_or_else(|e| {
            error!("error collector did not finish: {}", e);
            Vec::new()
        });

        info!(
            "scan finished: {} indexed, {} without text, {} failed, {} cancelled",
            report.indexed,
            report.empty,
            report.failed(),
            report.cancelled
        );
        Ok(report)
    }
}

fn run_task(
    ctx: &TaskContext,
    candidate: &CandidateFile,
    results: &mpsc::Sender<ScreenshotDocument>,
    errors: &mpsc::Sender<FileFailure>,
) -> Outcome {
    if ctx.cancel.is_cancelled() {
        return Outcome::Cancelled;
    }
    match index_file(ctx, &candidate.path) {
        Ok(Some(doc)) => {
            if results.blocking_send(doc).is_err() {
                debug!("result sink closed before {} was reported", candidate.path.display());
            }
            Outcome::Indexed
        }
        Ok(None) => Outcome::Empty,
        Err(error) => {
            let failure = FileFailure { path: candidate.path.clone(), error };
            if errors.blocking_send(failure).is_err() {
                debug!("error sink closed before {} was reported", candidate.path.display());
            }
            Outcome::Failed
        }
    }
}

/// Extract, rank, read and upsert one file. `Ok(None)` means no text.
fn index_file(ctx: &TaskContext, path: &Path) -> Result<Option<ScreenshotDocument>> {
    let text = ctx.ocr.extract(path).map_err(|e| match e {
        Error::Extraction { .. } => e,
        other => Error::Extraction { path: path.to_path_buf(), reason: other.to_string() },
    })?;
    let extraction = ExtractionResult { source_path: path.to_path_buf(), text };
    if !extraction.has_content() {
        debug!("no text in {}", path.display());
        return Ok(None);
    }

    let tags = top_tags(ctx.ranker.as_ref(), &extraction.text, ctx.options.max_tags);
    let content = if ctx.options.store_content {
        Some(STANDARD.encode(std::fs::read(path)?))
    } else {
        None
    };
    let key = extraction.source_path.to_string_lossy().to_string();
    let doc = ScreenshotDocument { path: key.clone(), tags, text: extraction.text, content };

    ctx.index.index(&key, &doc).map_err(|e| Error::IndexWrite { path: path.to_path_buf(), reason: e.to_string() })?;
    debug!("indexed {} with {} tags", key, doc.tags.len());
    Ok(Some(doc))
}

pub(crate) fn top_tags(ranker: &dyn KeywordRanker, text: &str, max_tags: usize) -> Vec<String> {
    ranker.rank(text).into_iter().take(max_tags).map(|p| p.phrase).collect()
}

async fn forward_results(mut rx: mpsc::Receiver<ScreenshotDocument>, events: Arc<dyn EventSink>) -> usize {
    let mut forwarded = 0;
    while let Some(doc) = rx.recv().await {
        let event = Event::ResultFound(doc);
        if let Err(e) = events.emit(&event) {
            warn!("dropping {} event: {}", event.name(), e);
        }
        forwarded += 1;
    }
    forwarded
}

async fn collect_failures(mut rx: mpsc::Receiver<FileFailure>) -> Vec<FileFailure> {
    let mut failures = Vec::new();
    while let Some(failure) = rx.recv().await {
        warn!("{}", failure.error);
        failures.push(failure);
    }
    failures
}
