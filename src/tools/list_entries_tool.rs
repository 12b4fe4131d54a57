use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::load_upload_text;
use crate::config::LookupConfig;
use crate::mcp::types::{CallToolResult, ToolAnnotations, ToolDefinition};
use crate::roster::{Entry, EntryExtractor};

pub static LIST_ENTRIES_TOOL_DEFINITION: Lazy<ToolDefinition> = Lazy::new(|| ToolDefinition {
    name: "list-entries".to_string(),
    description: "List the numbered entries extracted from an uploaded PDF roster, with each \
        name in original and normalized form. The upload is deleted once it has been read."
        .to_string(),
    input_schema: json!({
        "type": "object",
        "properties": {
            "file": {
                "type": "string",
                "description": "Name of the PDF staged in the server's upload directory"
            },
            "limit": {
                "type": "integer",
                "description": "Maximum number of entries to return (default: 200)",
                "default": 200,
                "minimum": 1,
                "maximum": 10000
            }
        },
        "required": ["file"]
    }),
    annotations: Some(ToolAnnotations {
        title: Some("List PDF Roster Entries".to_string()),
        read_only_hint: Some(false),
        destructive_hint: Some(true),
        open_world_hint: Some(false),
    }),
});

#[derive(Debug, Deserialize)]
struct ListEntriesParams {
    file: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    200
}

pub struct ListEntriesTool<'a> {
    config: &'a LookupConfig,
    extractor: &'a EntryExtractor,
}

impl<'a> ListEntriesTool<'a> {
    pub fn new(config: &'a LookupConfig, extractor: &'a EntryExtractor) -> Self {
        Self { config, extractor }
    }

    pub async fn execute(&self, arguments: Option<serde_json::Value>) -> CallToolResult {
        let params = match arguments {
            Some(args) => match serde_json::from_value::<ListEntriesParams>(args) {
                Ok(params) => params,
                Err(e) => {
                    error!("Invalid list-entries parameters: {}", e);
                    return CallToolResult::error(format!("Invalid parameters: {}", e));
                }
            },
            None => {
                return CallToolResult::error("Missing required parameters");
            }
        };

        if params.limit == 0 {
            return CallToolResult::error("Invalid parameters: limit must be at least 1");
        }

        let text = match load_upload_text(self.config, &params.file).await {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %params.file, code = e.code(), "Roster could not be read: {}", e);
                return CallToolResult::error(e.to_payload(json!({ "file": params.file })));
            }
        };

        let entries = self.extractor.extract(&text);
        info!(
            file = %params.file,
            entries = entries.len(),
            marker_width = self.extractor.marker_width(),
            "Extracted roster entries"
        );

        CallToolResult::json(&summarize(&entries, params.limit))
    }
}

fn summarize(entries: &[Entry], limit: usize) -> serde_json::Value {
    let shown = &entries[..entries.len().min(limit)];
    json!({
        "total": entries.len(),
        "truncated": shown.len() < entries.len(),
        "entries": shown,
    })
}

#[cfg(test)]
mod tests {
    use super::{summarize, ListEntriesTool};
    use crate::config::LookupConfig;
    use crate::roster::{Entry, EntryExtractor};
    use crate::test_support::roster_pdf;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn summary_truncates_to_limit() {
        let entries = vec![
            Entry::new("1111", "احمد كمال"),
            Entry::new("2222", "محمود سالم"),
            Entry::new("3333", "سعيد حسن"),
        ];
        let summary = summarize(&entries, 2);

        assert_eq!(summary["total"], 3);
        assert_eq!(summary["truncated"], true);
        assert_eq!(summary["entries"].as_array().expect("array").len(), 2);
        assert_eq!(summary["entries"][1]["number"], "2222");
        assert_eq!(summary["entries"][1]["normalizedName"], "محمود سالم");
    }

    #[test]
    fn summary_of_empty_roster() {
        let summary = summarize(&[], 10);
        assert_eq!(summary["total"], 0);
        assert_eq!(summary["truncated"], false);
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() {
        let config = LookupConfig::default();
        let extractor = EntryExtractor::default();
        let tool = ListEntriesTool::new(&config, &extractor);

        let result = tool
            .execute(Some(json!({ "file": "roster.pdf", "limit": 0 })))
            .await;
        assert!(result.is_error());
    }

    #[tokio::test]
    async fn lists_entries_of_uploaded_pdf_in_document_order() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("roster.pdf");
        std::fs::write(&path, roster_pdf(&["1234 علي حسن", "5678 محمد احمد", "9012 س"]))
            .expect("write upload");

        let config = LookupConfig {
            upload_dir: dir.path().to_path_buf(),
            ..LookupConfig::default()
        };
        let extractor = EntryExtractor::default();
        let tool = ListEntriesTool::new(&config, &extractor);

        let result = tool.execute(Some(json!({ "file": "roster.pdf" }))).await;
        assert!(!result.is_error());
        let body: Value = serde_json::from_str(result.text().expect("text")).expect("json body");
        assert_eq!(body["total"], 2);
        assert_eq!(body["truncated"], false);
        assert_eq!(body["entries"][0]["number"], "1234");
        assert_eq!(body["entries"][0]["normalizedName"], "على حسن");
        assert_eq!(body["entries"][1]["number"], "5678");
        assert!(!path.exists());
    }
}
