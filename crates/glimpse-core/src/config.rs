//! Layered configuration and path helpers.
//!
//! Uses Figment to merge compiled-in defaults, `config.toml`,
//! `config.<env>.toml` and `GLIMPSE_*` env vars. The files live in the
//! per-user config directory so the result never depends on where the
//! process was started from.

use directories::BaseDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::DEFAULT_MAX_TAGS;

pub const DEFAULT_APP_NAME: &str = "Glimpse";
pub const DEFAULT_INDEX_FILE: &str = "screenshots.tantivy";

/// Smallest writer budget tantivy accepts for a single indexing thread.
const MIN_WRITER_HEAP_BYTES: usize = 15_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_name: String,
    pub index_file: String,
    /// Folder scanned for screenshots; relative values are taken from `$HOME`.
    pub screenshot_dir: String,
    /// Helper payload to materialize; relative values are taken from the app dir.
    pub ocr_helper: String,
    pub store_content: bool,
    pub max_tags: usize,
    pub writer_heap_bytes: usize,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            screenshot_dir: "Desktop".to_string(),
            ocr_helper: "ocr-helper".to_string(),
            store_content: true,
            max_tags: DEFAULT_MAX_TAGS,
            writer_heap_bytes: 50_000_000,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// `<config root>/<app_name>`, created if missing.
    pub fn app_dir(&self) -> Result<PathBuf> {
        app_dir_in(&user_config_dir()?, &self.app_name)
    }

    pub fn index_path(&self) -> Result<PathBuf> {
        Ok(self.app_dir()?.join(&self.index_file))
    }

    /// Same as [`Settings::index_path`] but rooted at an explicit config root.
    pub fn index_path_in(&self, config_root: &Path) -> Result<PathBuf> {
        Ok(app_dir_in(config_root, &self.app_name)?.join(&self.index_file))
    }

    pub fn ocr_helper_path(&self) -> Result<PathBuf> {
        Ok(resolve_with_base(&self.app_dir()?, &self.ocr_helper))
    }

    fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(Error::Config("app_name must not be empty".into()));
        }
        if self.index_file.trim().is_empty() {
            return Err(Error::Config("index_file must not be empty".into()));
        }
        if self.max_tags == 0 {
            return Err(Error::Config("max_tags must be at least 1".into()));
        }
        if self.writer_heap_bytes < MIN_WRITER_HEAP_BYTES {
            return Err(Error::Config(format!(
                "writer_heap_bytes must be at least {MIN_WRITER_HEAP_BYTES}"
            )));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Loads from `<user config dir>/Glimpse/`.
    pub fn load() -> Result<Self> {
        let dir = user_config_dir()?.join(DEFAULT_APP_NAME);
        Self::load_from(&dir)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("GLIMPSE_"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::Config(format!("Failed to get '{key}': {e}")))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }
}

pub fn user_config_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| Error::Config("could not determine the user config directory".into()))
}

pub fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine the home directory",
            ))
        })
}

fn app_dir_in(config_root: &Path, app_name: &str) -> Result<PathBuf> {
    let dir = config_root.join(app_name);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
