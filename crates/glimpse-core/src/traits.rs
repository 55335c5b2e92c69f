use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{DirEntry, Event, RankedPhrase, ScreenshotDocument, SearchHit};

/// Source of screenshot candidates. Listing only; filtering is the
/// pipeline's job.
pub trait DirProvider: Send + Sync {
    fn resolve_root(&self) -> Result<PathBuf>;
    fn list_candidates(&self, root: &Path) -> Result<Vec<DirEntry>>;
}

/// OCR front end. `materialize` must succeed before `extract` is called;
/// `extract` may be called concurrently for different paths.
pub trait TextExtractor: Send + Sync {
    fn materialize(&self) -> Result<PathBuf>;
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Deterministic, stateless phrase ranking, best first.
pub trait KeywordRanker: Send + Sync {
    fn rank(&self, text: &str) -> Vec<RankedPhrase>;
}

/// Persisted full-text store keyed by screenshot path.
///
/// `open` is idempotent and `close` is a no-op on a store that was never
/// opened. Concurrent `index` calls are serialized by the implementation.
pub trait SearchIndex: Send + Sync {
    fn open(&self) -> Result<()>;
    fn index(&self, key: &str, doc: &ScreenshotDocument) -> Result<()>;
    fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
    fn close(&self) -> Result<()>;
}

/// The presentation layer's event channel.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event) -> Result<()>;
}
