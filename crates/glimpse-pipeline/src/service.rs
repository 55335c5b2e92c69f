use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use glimpse_core::config::Settings;
use glimpse_core::error::Result;
use glimpse_core::scanner::ScreenshotDir;
use glimpse_core::traits::{DirProvider, EventSink, KeywordRanker, SearchIndex, TextExtractor};
use glimpse_core::types::{Event, SearchRecord, DEFAULT_MAX_TAGS};
use glimpse_ocr::OcrHelper;
use glimpse_rank::RakeRanker;
use glimpse_text::ScreenshotIndex;

use crate::report::ScanReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub max_tags: usize,
    pub store_content: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { max_tags: DEFAULT_MAX_TAGS, store_content: true }
    }
}

impl From<&Settings> for ScanOptions {
    fn from(settings: &Settings) -> Self {
        Self { max_tags: settings.max_tags, store_content: settings.store_content }
    }
}

/// Owns every piece of process-wide state: the providers, the shared index
/// handle and the cancellation signal. Construct one per process.
pub struct ScreenshotService {
    pub(crate) dir: Arc<dyn DirProvider>,
    pub(crate) ocr: Arc<dyn TextExtractor>,
    pub(crate) ranker: Arc<dyn KeywordRanker>,
    pub(crate) index: Arc<dyn SearchIndex>,
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) options: ScanOptions,
    pub(crate) cancel: CancellationToken,
}

impl ScreenshotService {
    pub fn new(
        dir: Arc<dyn DirProvider>,
        ocr: Arc<dyn TextExtractor>,
        ranker: Arc<dyn KeywordRanker>,
        index: Arc<dyn SearchIndex>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self { dir, ocr, ranker, index, events, options: ScanOptions::default(), cancel: CancellationToken::new() }
    }

    /// Wires the production providers: `$HOME/<screenshot_dir>`, the helper
    /// at `ocr_helper`, RAKE ranking and the tantivy index under the config dir.
    pub fn from_settings(settings: &Settings, events: Arc<dyn EventSink>) -> Result<Self> {
        let dir = ScreenshotDir::new(settings.screenshot_dir.clone());
        let ocr = OcrHelper::from_file(settings.ocr_helper_path()?);
        let index = ScreenshotIndex::from_settings(settings)?;
        Ok(Self::new(Arc::new(dir), Arc::new(ocr), Arc::new(RakeRanker::new()), Arc::new(index), events)
            .with_options(ScanOptions::from(settings)))
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Tasks that have not started yet exit without side effects; tasks
    /// already extracting run to completion.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Queries the index and emits one `search:found` event per hit.
    /// Returns the number of hits.
    pub fn search(&self, keyword: &str) -> Result<usize> {
        self.index.open()?;
        let hits = self.index.search(keyword)?;
        let count = hits.len();
        debug!("query {:?} matched {} screenshots", keyword, count);
        for hit in hits {
            let event = Event::SearchFound(SearchRecord::from(hit));
            if let Err(e) = self.events.emit(&event) {
                warn!("dropping {} event: {}", event.name(), e);
            }
        }
        Ok(count)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.index.close()
    }

    /// One scan followed by `shutdown`, which runs even when the scan fails.
    /// A scan error takes precedence over a close error.
    pub async fn scan_once(&self) -> Result<ScanReport> {
        let outcome = self.scan_and_index().await;
        let closed = self.shutdown();
        let report = outcome?;
        closed?;
        Ok(report)
    }
}
