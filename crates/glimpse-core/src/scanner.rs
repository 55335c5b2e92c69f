use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::{home_dir, resolve_with_base};
use crate::error::Result;
use crate::traits::DirProvider;
use crate::types::DirEntry;

/// Lists the screenshot folder under the user's home directory.
///
/// `home` overrides home lookup; `folder` is relative to the root unless absolute.
pub struct ScreenshotDir {
    home: Option<PathBuf>,
    folder: String,
}

impl ScreenshotDir {
    pub fn new(folder: impl Into<String>) -> Self {
        Self { home: None, folder: folder.into() }
    }

    pub fn with_home(home: impl Into<PathBuf>, folder: impl Into<String>) -> Self {
        Self { home: Some(home.into()), folder: folder.into() }
    }

    pub fn folder_in(&self, root: &Path) -> PathBuf {
        resolve_with_base(root, &self.folder)
    }
}

impl Default for ScreenshotDir {
    fn default() -> Self {
        Self::new("Desktop")
    }
}

impl DirProvider for ScreenshotDir {
    fn resolve_root(&self) -> Result<PathBuf> {
        match &self.home {
            Some(home) => Ok(home.clone()),
            None => home_dir(),
        }
    }

    /// Immediate children only, sorted by file name. The folder itself
    /// failing to read is an error; unreadable children are skipped.
    fn list_candidates(&self, root: &Path) -> Result<Vec<DirEntry>> {
        let folder = self.folder_in(root);
        std::fs::read_dir(&folder)?;

        let mut entries = Vec::new();
        for entry in WalkDir::new(&folder).min_depth(1).max_depth(1).sort_by_file_name() {
            match entry {
                Ok(e) => entries.push(DirEntry {
                    path: e.path().to_path_buf(),
                    is_dir: e.file_type().is_dir(),
                }),
                Err(e) => debug!("skipping unreadable entry in {}: {}", folder.display(), e),
            }
        }
        debug!("listed {} entries in {}", entries.len(), folder.display());
        Ok(entries)
    }
}
