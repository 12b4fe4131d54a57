use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::load_upload_text;
use crate::config::LookupConfig;
use crate::mcp::types::{CallToolResult, ToolAnnotations, ToolDefinition};
use crate::roster::{find_name, EntryExtractor, MatchResult};

pub static SEARCH_NAME_TOOL_DEFINITION: Lazy<ToolDefinition> = Lazy::new(|| ToolDefinition {
    name: "search-name".to_string(),
    description: "Check whether a name appears in an uploaded PDF roster of numbered entries. \
        Arabic names are compared after removing diacritics and folding letter variants. \
        The upload is deleted once it has been read."
        .to_string(),
    input_schema: json!({
        "type": "object",
        "properties": {
            "file": {
                "type": "string",
                "description": "Name of the PDF staged in the server's upload directory"
            },
            "name": {
                "type": "string",
                "description": "The name to look for"
            }
        },
        "required": ["file", "name"]
    }),
    annotations: Some(ToolAnnotations {
        title: Some("Search Name in PDF".to_string()),
        read_only_hint: Some(false),
        destructive_hint: Some(true),
        open_world_hint: Some(false),
    }),
});

#[derive(Debug, Deserialize)]
struct SearchNameParams {
    file: String,
    name: String,
}

pub struct SearchNameTool<'a> {
    config: &'a LookupConfig,
    extractor: &'a EntryExtractor,
}

impl<'a> SearchNameTool<'a> {
    pub fn new(config: &'a LookupConfig, extractor: &'a EntryExtractor) -> Self {
        Self { config, extractor }
    }

    pub async fn execute(&self, arguments: Option<serde_json::Value>) -> CallToolResult {
        let params = match arguments {
            Some(args) => match serde_json::from_value::<SearchNameParams>(args) {
                Ok(params) => params,
                Err(e) => {
                    error!("Invalid search-name parameters: {}", e);
                    return CallToolResult::error(format!("Invalid parameters: {}", e));
                }
            },
            None => {
                return CallToolResult::error("Missing required parameters");
            }
        };

        info!(file = %params.file, "Searching uploaded roster for a name");

        let text = match load_upload_text(self.config, &params.file).await {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %params.file, code = e.code(), "Roster could not be read: {}", e);
                return CallToolResult::error(e.to_payload(json!({ "file": params.file })));
            }
        };

        let result = find_name(self.extractor, &text, &params.name);
        match &result {
            MatchResult::Found(entry) => {
                info!(file = %params.file, number = entry.number(), "Name found")
            }
            MatchResult::NotFound => info!(file = %params.file, "Name not found"),
        }

        CallToolResult::json(&result.to_json())
    }
}
