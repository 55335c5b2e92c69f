//! glimpse-ocr
//!
//! Runs an external OCR helper per image. The helper payload is written to a
//! temporary executable once per process; every extraction spawns its own
//! helper process, so calls for different paths can run in parallel.

use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempPath;
use tracing::{debug, info};

use glimpse_core::error::{Error, Result};
use glimpse_core::traits::TextExtractor;

pub enum HelperPayload {
    Bytes(Vec<u8>),
    File(PathBuf),
}

struct Runnable {
    path: PathBuf,
    // Removes the materialized helper when the extractor is dropped.
    _file: TempPath,
}

pub struct OcrHelper {
    payload: HelperPayload,
    runnable: OnceCell<Runnable>,
}

impl OcrHelper {
    pub fn new(payload: HelperPayload) -> Self {
        Self { payload, runnable: OnceCell::new() }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(HelperPayload::Bytes(bytes.into()))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(HelperPayload::File(path.into()))
    }

    /// The materialized executable, once [`TextExtractor::materialize`] succeeded.
    pub fn runnable_path(&self) -> Option<&Path> {
        self.runnable.get().map(|r| r.path.as_path())
    }

    fn write_runnable(&self) -> Result<Runnable> {
        let bytes: Cow<'_, [u8]> = match &self.payload {
            HelperPayload::Bytes(b) => Cow::Borrowed(b),
            HelperPayload::File(p) => Cow::Owned(std::fs::read(p)?),
        };
        let mut file = tempfile::Builder::new().prefix("glimpse-ocr-").tempfile()?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        // The write handle must be closed before exec, or the kernel reports
        // the file as busy.
        let temp_path = file.into_temp_path();
        make_executable(&temp_path)?;
        Ok(Runnable { path: temp_path.to_path_buf(), _file: temp_path })
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl TextExtractor for OcrHelper {
    fn materialize(&self) -> Result<PathBuf> {
        let runnable = self.runnable.get_or_try_init(|| {
            let runnable = self.write_runnable()?;
            info!("materialized OCR helper at {}", runnable.path.display());
            Ok::<_, Error>(runnable)
        })?;
        Ok(runnable.path.clone())
    }

    /// Runs `<helper> <path>` and returns its trimmed stdout.
    fn extract(&self, path: &Path) -> Result<String> {
        let helper = self.runnable_path().ok_or(Error::HelperNotMaterialized)?;
        let output = Command::new(helper)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::Extraction {
                path: path.to_path_buf(),
                reason: format!("could not start OCR helper: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Extraction {
                path: path.to_path_buf(),
                reason: format!("OCR helper exited with {}: {}", output.status, stderr.trim()),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("extracted {} bytes of text from {}", text.len(), path.display());
        Ok(text)
    }
}
