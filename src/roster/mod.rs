//! Name lookup over numbered rosters: Arabic name normalization, entry
//! extraction from raw PDF text, and exact matching of a queried name.

pub mod extractor;
pub mod normalizer;

use serde::Serialize;
use serde_json::json;

pub use extractor::{EntryExtractor, DEFAULT_MARKER_WIDTH};
pub use normalizer::normalize_name;

/// One `(number, name)` record found in a roster.
///
/// The normalized name is always computed from the original name, so an
/// `Entry` can only be built through [`Entry::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    number: String,
    original_name: String,
    normalized_name: String,
}

impl Entry {
    pub fn new(number: impl Into<String>, original_name: impl Into<String>) -> Self {
        let original_name = original_name.into();
        let normalized_name = normalize_name(&original_name);
        Self {
            number: number.into(),
            original_name,
            normalized_name,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Found(Entry),
    NotFound,
}

impl MatchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found(_))
    }

    /// Response body shared by the MCP tool and the one-shot CLI.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            MatchResult::Found(entry) => json!({
                "found": true,
                "number": entry.number(),
                "normalizedName": entry.normalized_name(),
                "originalName": entry.original_name(),
            }),
            MatchResult::NotFound => json!({
                "found": false,
                "message": "Name not found in PDF",
            }),
        }
    }
}

/// Returns the first entry, in document order, whose normalized name equals the
/// normalized query.
///
/// Only Arabic letters survive normalization, so a query with none of them
/// normalizes to `""` and matches the first entry whose name has none either.
pub fn search(entries: &[Entry], query_name: &str) -> MatchResult {
    let query = normalize_name(query_name);
    entries
        .iter()
        .find(|entry| entry.normalized_name() == query)
        .cloned()
        .map_or(MatchResult::NotFound, MatchResult::Found)
}

/// Runs the full pipeline over already-extracted text.
pub fn find_name(extractor: &EntryExtractor, raw_text: &str, query_name: &str) -> MatchResult {
    let entries = extractor.extract(raw_text);
    search(&entries, query_name)
}
