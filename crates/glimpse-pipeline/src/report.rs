use std::path::PathBuf;

use glimpse_core::error::Error;

/// A per-file failure drained from the error sink. Never fatal to a scan.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of one `scan_and_index` call.
///
/// `candidates` counts files that passed the extension filter. `empty` are
/// images whose OCR text was blank; `cancelled` never started work.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub candidates: usize,
    pub indexed: usize,
    pub empty: usize,
    pub cancelled: usize,
    pub failures: Vec<FileFailure>,
}

impl ScanReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
