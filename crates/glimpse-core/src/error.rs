use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Root resolution or directory listing failed; the whole scan is aborted.
    #[error("Scan failed while {stage}: {source}")]
    Scan {
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Helper materialization or index open failed before any file was processed.
    #[error("Setup failed while {stage}: {source}")]
    Setup {
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("Text extraction failed for {}: {reason}", path.display())]
    Extraction { path: PathBuf, reason: String },

    #[error("OCR helper used before it was materialized")]
    HelperNotMaterialized,

    #[error("Index write failed for {}: {reason}", path.display())]
    IndexWrite { path: PathBuf, reason: String },

    #[error("Index error: {0}")]
    Index(String),

    #[error("Event delivery failed: {0}")]
    Event(String),
}

impl Error {
    pub fn scan(stage: &'static str, source: Error) -> Self {
        Self::Scan { stage, source: Box::new(source) }
    }

    pub fn setup(stage: &'static str, source: Error) -> Self {
        Self::Setup { stage, source: Box::new(source) }
    }

    /// True for the errors that stop `scan_and_index` before any per-file work.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Scan { .. } | Self::Setup { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
