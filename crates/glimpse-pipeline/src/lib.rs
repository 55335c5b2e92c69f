//! glimpse-pipeline
//!
//! The scan-extract-index orchestrator and the query service on top of the
//! capability traits from `glimpse-core`.

mod report;
mod scan;
mod service;

pub use report::{FileFailure, ScanReport};
pub use service::{ScanOptions, ScreenshotService};
pub use tokio_util::sync::CancellationToken;
