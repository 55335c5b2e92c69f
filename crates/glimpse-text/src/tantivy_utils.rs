use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

use glimpse_core::stopwords::STOP_WORDS;

pub const TEXT_TOKENIZER: &str = "screenshot_text";

#[derive(Debug, Clone, Copy)]
pub struct Fields {
	pub path: Field,
	pub tags: Field,
	pub text: Field,
	pub content: Field,
	pub path_text: Field,
}

impl Fields {
	pub fn from_schema(schema: &Schema) -> tantivy::Result<Self> {
		Ok(Self {
			path: schema.get_field("path")?,
			tags: schema.get_field("tags")?,
			text: schema.get_field("text")?,
			content: schema.get_field("content")?,
			path_text: schema.get_field("path_text")?,
		})
	}
}

/// `path` is the exact-match key and `path_text` its tokenized copy, so file
/// names match free-text queries. `tags` and `text` are full-text, `content`
/// is stored only.
pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field("path", STRING | STORED);
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(TEXT_TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let text_options = TextOptions::default().set_indexing_options(text_field_indexing.clone()).set_stored();
	schema_builder.add_text_field("tags", text_options.clone());
	schema_builder.add_text_field("text", text_options);
	schema_builder.add_text_field("content", STORED);
	schema_builder.add_text_field("path_text", TextOptions::default().set_indexing_options(text_field_indexing));
	schema_builder.build()
}

/// Lowercases and drops the same stop words the keyword ranker splits on.
pub fn register_tokenizer(index: &Index) {
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(STOP_WORDS.iter().map(|w| w.to_string())))
		.build();
	index.tokenizers().register(TEXT_TOKENIZER, tokenizer);
}
