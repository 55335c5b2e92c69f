//! Domain types shared by the scanner, extractor, index and pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Image extensions eligible for OCR, compared case-insensitively.
pub const SUPPORTED_IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Upper bound on the number of ranked phrases kept as tags.
pub const DEFAULT_MAX_TAGS: usize = 20;

/// One entry of a listed directory. Mirrors the parts of `std::fs::DirEntry`
/// the pipeline looks at, so listings can be faked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), is_dir: false }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), is_dir: true }
    }
}

/// A listed file whose extension is in [`SUPPORTED_IMAGE_EXTS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub extension: String,
}

impl CandidateFile {
    /// Returns `None` for directories and for unsupported or missing extensions.
    pub fn from_entry(entry: DirEntry) -> Option<Self> {
        if entry.is_dir {
            return None;
        }
        let extension = entry.path.extension()?.to_str()?.to_string();
        if !is_supported_extension(&extension) {
            return None;
        }
        Some(Self { path: entry.path, extension })
    }
}

pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_IMAGE_EXTS.iter().any(|s| s.eq_ignore_ascii_case(ext))
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_supported_extension)
}

/// Output of the text extractor for one file. Empty `text` means the image
/// has nothing readable and is not indexed.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub source_path: PathBuf,
    pub text: String,
}

impl ExtractionResult {
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// A phrase scored by a keyword ranker; higher is more relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPhrase {
    pub phrase: String,
    pub score: f64,
}

/// The persisted unit. `path` is the index key; re-indexing a path replaces
/// the previous document.
///
/// - `tags`: top ranked phrases, best first, at most `max_tags` of them
/// - `text`: the trimmed OCR output the tags were ranked from
/// - `content`: base64 of the image bytes, absent when content storage is off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotDocument {
    pub path: String,
    pub tags: Vec<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A raw hit as returned by the search index, in relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub tags: Vec<String>,
    pub content: Option<String>,
}

/// What the query service hands to the presentation layer per hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<SearchHit> for SearchRecord {
    fn from(hit: SearchHit) -> Self {
        Self { path: hit.id, content: hit.content }
    }
}

pub const RESULT_FOUND: &str = "result:found";
pub const SEARCH_FOUND: &str = "search:found";

/// Events pushed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum Event {
    #[serde(rename = "result:found")]
    ResultFound(ScreenshotDocument),
    #[serde(rename = "search:found")]
    SearchFound(SearchRecord),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResultFound(_) => RESULT_FOUND,
            Self::SearchFound(_) => SEARCH_FOUND,
        }
    }
}
