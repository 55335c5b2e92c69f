use parking_lot::{Mutex, RwLock};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tantivy::directory::MmapDirectory;
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, Term};
use tracing::{debug, info};

use glimpse_core::config::Settings;
use glimpse_core::error::{Error, Result};
use glimpse_core::traits::SearchIndex;
use glimpse_core::types::{ScreenshotDocument, SearchHit};

use crate::tantivy_utils::{build_schema, register_tokenizer, Fields};

pub(crate) fn index_err(e: impl Display) -> Error {
	Error::Index(e.to_string())
}

pub(crate) struct OpenIndex {
	pub(crate) index: Index,
	pub(crate) reader: IndexReader,
	pub(crate) fields: Fields,
	writer: Mutex<Option<IndexWriter>>,
}

/// Tantivy store for screenshot documents, opened lazily and shared by
/// every indexing task and the query path.
///
/// The writer sits behind a mutex, so concurrent `index` calls are applied
/// one at a time. Each write is committed and made visible to readers
/// before the call returns.
pub struct ScreenshotIndex {
	path: PathBuf,
	writer_heap_bytes: usize,
	state: RwLock<Option<Arc<OpenIndex>>>,
}

impl ScreenshotIndex {
	pub fn new(path: impl Into<PathBuf>, writer_heap_bytes: usize) -> Self {
		Self { path: path.into(), writer_heap_bytes, state: RwLock::new(None) }
	}

	/// Resolves `<config dir>/<app>/<index_file>` from the settings.
	pub fn from_settings(settings: &Settings) -> Result<Self> {
		Ok(Self::new(settings.index_path()?, settings.writer_heap_bytes))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn is_open(&self) -> bool {
		self.state.read().is_some()
	}

	pub fn num_docs(&self) -> Result<u64> {
		Ok(self.handle()?.reader.searcher().num_docs())
	}

	pub(crate) fn handle(&self) -> Result<Arc<OpenIndex>> {
		self.state
			.read()
			.clone()
			.ok_or_else(|| Error::Index(format!("index at {} is not open", self.path.display())))
	}
}

impl SearchIndex for ScreenshotIndex {
	fn open(&self) -> Result<()> {
		let mut state = self.state.write();
		if state.is_some() {
			return Ok(());
		}

		std::fs::create_dir_all(&self.path).map_err(index_err)?;
		let directory = MmapDirectory::open(&self.path).map_err(index_err)?;
		let existed = Index::exists(&directory).map_err(index_err)?;
		let index = Index::open_or_create(directory, build_schema()).map_err(index_err)?;
		register_tokenizer(&index);
		let fields = Fields::from_schema(&index.schema()).map_err(index_err)?;
		let writer: IndexWriter = index.writer(self.writer_heap_bytes).map_err(index_err)?;
		let reader: IndexReader = index
			.reader_builder()
			.reload_policy(ReloadPolicy::Manual)
			.try_into()
			.map_err(index_err)?;

		if existed {
			info!("opened screenshot index at {}", self.path.display());
		} else {
			info!("created screenshot index at {}", self.path.display());
		}
		*state = Some(Arc::new(OpenIndex { index, reader, fields, writer: Mutex::new(Some(writer)) }));
		Ok(())
	}

	fn index(&self, key: &str, doc: &ScreenshotDocument) -> Result<()> {
		let open = self.handle()?;
		let f = open.fields;
		let mut document = doc!(
			f.path => key.to_string(),
			f.path_text => key.to_string(),
			f.text => doc.text.clone(),
		);
		for tag in &doc.tags {
			document.add_text(f.tags, tag.as_str());
		}
		if let Some(content) = &doc.content {
			document.add_text(f.content, content.as_str());
		}

		{
			let mut guard = open.writer.lock();
			let writer = guard.as_mut().ok_or_else(|| Error::Index("index writer is closed".into()))?;
			writer.delete_term(Term::from_field_text(f.path, key));
			writer.add_document(document).map_err(index_err)?;
			writer.commit().map_err(index_err)?;
		}
		open.reader.reload().map_err(index_err)?;
		debug!("indexed {}", key);
		Ok(())
	}

	fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
		let open = self.handle()?;
		crate::search::run(&open, query)
	}

	fn close(&self) -> Result<()> {
		let Some(open) = self.state.write().take() else {
			return Ok(());
		};
		let writer = open.writer.lock().take();
		if let Some(writer) = writer {
			writer.wait_merging_threads().map_err(index_err)?;
		}
		info!("closed screenshot index at {}", self.path.display());
		Ok(())
	}
}
