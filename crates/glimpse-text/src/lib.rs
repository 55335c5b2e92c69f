//! glimpse-text
//!
//! Tantivy-backed persisted index for screenshot documents: open-or-create,
//! keyed upsert, query-string search and close.

pub mod tantivy_utils;
pub mod index;
mod search;

pub use index::ScreenshotIndex;
