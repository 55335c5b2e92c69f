use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::TantivyDocument;
use tracing::debug;

use glimpse_core::error::Result;
use glimpse_core::types::SearchHit;

use crate::index::{index_err, OpenIndex};

/// Runs a query-string query over `tags`, `text` and the tokenized path and
/// returns every hit, best first. Field prefixes (`tags:invoice`) and boolean
/// operators follow tantivy's query grammar. Parsing is lenient: a clause the
/// grammar cannot execute, such as `12:30` naming a field `12`, matches nothing
/// instead of failing the whole query.
pub(crate) fn run(open: &OpenIndex, query_text: &str) -> Result<Vec<SearchHit>> {
	if query_text.trim().is_empty() {
		return Ok(Vec::new());
	}
	let searcher = open.reader.searcher();
	let f = open.fields;
	let query_parser = QueryParser::for_index(&open.index, vec![f.tags, f.text, f.path_text]);
	let (query, errors) = query_parser.parse_query_lenient(query_text);
	for error in &errors {
		debug!("ignoring part of query {:?}: {}", query_text, error);
	}
	let limit = usize::try_from(searcher.num_docs()).unwrap_or(usize::MAX).max(1);
	let top_docs = searcher.search(&query, &TopDocs::with_limit(limit)).map_err(index_err)?;

	let mut hits = Vec::with_capacity(top_docs.len());
	for (score, addr) in top_docs {
		let doc: TantivyDocument = searcher.doc(addr).map_err(index_err)?;
		let id = doc.get_first(f.path).and_then(|v| v.as_str()).unwrap_or("").to_string();
		let tags = doc.get_all(f.tags).filter_map(|v| v.as_str().map(str::to_string)).collect();
		let content = doc.get_first(f.content).and_then(|v| v.as_str()).map(str::to_string);
		hits.push(SearchHit { id, score, tags, content });
	}
	Ok(hits)
}
