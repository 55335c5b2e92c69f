#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use glimpse_core::error::{Error, Result};
use glimpse_core::traits::{DirProvider, EventSink, KeywordRanker, SearchIndex, TextExtractor};
use glimpse_core::types::{DirEntry, Event, RankedPhrase, ScreenshotDocument, SearchHit, SearchRecord};

/// Directory provider with canned results.
pub struct FakeDir {
    pub root: PathBuf,
    pub entries: Vec<DirEntry>,
    pub fail_root: bool,
    pub fail_list: bool,
}

impl FakeDir {
    pub fn with_entries(root: impl Into<PathBuf>, entries: Vec<DirEntry>) -> Self {
        Self { root: root.into(), entries, fail_root: false, fail_list: false }
    }
}

impl DirProvider for FakeDir {
    fn resolve_root(&self) -> Result<PathBuf> {
        if self.fail_root {
            return Err(Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "home dir error")));
        }
        Ok(self.root.clone())
    }

    fn list_candidates(&self, _root: &Path) -> Result<Vec<DirEntry>> {
        if self.fail_list {
            return Err(Error::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "error reading dir")));
        }
        Ok(self.entries.clone())
    }
}

/// OCR stand-in keyed by file name. Missing names extract to "".
#[derive(Default)]
pub struct FakeOcr {
    pub texts: HashMap<String, std::result::Result<String, String>>,
    pub fail_materialize: bool,
    pub materialized: AtomicUsize,
    pub calls: Mutex<Vec<PathBuf>>,
}

impl FakeOcr {
    pub fn with_text(mut self, name: &str, text: &str) -> Self {
        self.texts.insert(name.to_string(), Ok(text.to_string()));
        self
    }

    pub fn with_failure(mut self, name: &str, reason: &str) -> Self {
        self.texts.insert(name.to_string(), Err(reason.to_string()));
        self
    }

    pub fn called_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

impl TextExtractor for FakeOcr {
    fn materialize(&self) -> Result<PathBuf> {
        if self.fail_materialize {
            return Err(Error::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "chmod error")));
        }
        self.materialized.fetch_add(1, Ordering::SeqCst);
        Ok(PathBuf::from("/tmp/fake-ocr-helper"))
    }

    fn extract(&self, path: &Path) -> Result<String> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        match self.texts.get(&name) {
            Some(Ok(text)) => Ok(text.trim().to_string()),
            Some(Err(reason)) => Err(Error::Extraction { path: path.to_path_buf(), reason: reason.clone() }),
            None => Ok(String::new()),
        }
    }
}

/// Returns `count` phrases "phrase 0", "phrase 1", ... with descending scores.
pub struct FixedRanker {
    pub count: usize,
}

impl KeywordRanker for FixedRanker {
    fn rank(&self, _text: &str) -> Vec<RankedPhrase> {
        (0..self.count)
            .map(|i| RankedPhrase { phrase: format!("phrase {i}"), score: (self.count - i) as f64 })
            .collect()
    }
}

/// In-memory index with substring matching over tags and text.
#[derive(Default)]
pub struct MemoryIndex {
    pub docs: Mutex<HashMap<String, ScreenshotDocument>>,
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub fail_open: bool,
    pub fail_search: bool,
    pub fail_keys: HashSet<String>,
}

impl MemoryIndex {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.docs.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl SearchIndex for MemoryIndex {
    fn open(&self) -> Result<()> {
        if self.fail_open {
            return Err(Error::Index("error opening indexer".into()));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn index(&self, key: &str, doc: &ScreenshotDocument) -> Result<()> {
        if self.fail_keys.iter().any(|k| key.ends_with(k.as_str())) {
            return Err(Error::Index("index error".into()));
        }
        self.docs.lock().unwrap().insert(key.to_string(), doc.clone());
        Ok(())
    }

    fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        if self.fail_search {
            return Err(Error::Index("search error".into()));
        }
        let needle = query.to_lowercase();
        let docs = self.docs.lock().unwrap();
        let mut hits: Vec<SearchHit> = docs
            .values()
            .filter(|d| d.text.to_lowercase().contains(&needle) || d.tags.iter().any(|t| t.contains(&needle)))
            .map(|d| SearchHit { id: d.path.clone(), score: 1.0, tags: d.tags.clone(), content: d.content.clone() })
            .collect();
        hits.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(hits)
    }

    fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Records every emitted event; optionally fails every emit.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Event>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn results(&self) -> Vec<ScreenshotDocument> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::ResultFound(doc) => Some(doc.clone()),
                Event::SearchFound(_) => None,
            })
            .collect()
    }

    pub fn searches(&self) -> Vec<SearchRecord> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::SearchFound(rec) => Some(rec.clone()),
                Event::ResultFound(_) => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &Event) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        if self.fail {
            return Err(Error::Event("window closed".into()));
        }
        Ok(())
    }
}

/// Creates `<tmp>/Desktop` with the given files and returns the home dir.
pub fn desktop_with(tmp: &Path, files: &[(&str, &[u8])]) -> PathBuf {
    let desktop = tmp.join("Desktop");
    std::fs::create_dir_all(&desktop).unwrap();
    for (name, bytes) in files {
        std::fs::write(desktop.join(name), bytes).unwrap();
    }
    tmp.to_path_buf()
}

pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
