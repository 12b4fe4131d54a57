use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use super::transport::{LineTransport, StdioTransport};
use super::types::*;
use crate::config::LookupConfig;
use crate::roster::EntryExtractor;
use crate::tools::{
    list_entries_tool::{ListEntriesTool, LIST_ENTRIES_TOOL_DEFINITION},
    search_name_tool::{SearchNameTool, SEARCH_NAME_TOOL_DEFINITION},
};

pub struct McpServer {
    config: LookupConfig,
    extractor: EntryExtractor,
}

impl McpServer {
    pub fn new(config: LookupConfig) -> Result<Self> {
        let extractor = EntryExtractor::new(config.marker_width)?;
        Ok(Self { config, extractor })
    }

    pub async fn start(&self) -> Result<()> {
        let mut transport = StdioTransport::stdio();
        self.serve(&mut transport).await
    }

    pub async fn serve<R, W>(&self, transport: &mut LineTransport<R, W>) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            upload_dir = %self.config.upload_dir.display(),
            marker_width = self.config.marker_width,
            "MCP server started and listening"
        );

        while let Some(message) = transport.read_message().await? {
            match message {
                McpMessage::Request(request) => {
                    let response = self.handle_request(request).await;
                    transport.write_response(&response).await?;
                }
                McpMessage::Notification(notification) => {
                    self.handle_notification(notification);
                }
                McpMessage::Invalid(reason) => {
                    let response = McpResponse::failure(Value::Null, PARSE_ERROR, reason);
                    transport.write_response(&response).await?;
                }
            }
        }

        info!("Client disconnected");
        Ok(())
    }

    pub async fn handle_request(&self, request: McpRequest) -> McpResponse {
        let id = Self::ensure_valid_id(request.id.clone());

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "tools/list" => Self::handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "ping" => McpResponse::success(id, serde_json::json!({})),
            _ => McpResponse::failure(id, METHOD_NOT_FOUND, "Method not found"),
        }
    }

    fn handle_notification(&self, notification: McpNotification) {
        debug!("Received notification: {}", notification.method);

        match notification.method.as_str() {
            "notifications/initialized" => {
                info!("Client initialization completed");
            }
            "notifications/cancelled" => {
                debug!("Request cancelled notification received");
            }
            _ => {
                warn!("Unknown notification method: {}", notification.method);
            }
        }
    }

    fn ensure_valid_id(id: Option<Value>) -> Value {
        match id {
            Some(Value::Null) | None => Value::String("0".to_string()),
            Some(value) => value,
        }
    }

    fn handle_initialize(&self, id: Value, params: Option<Value>) -> McpResponse {
        let Some(params) = params else {
            return McpResponse::failure(id, INVALID_PARAMS, "Missing params");
        };

        match serde_json::from_value::<InitializeParams>(params) {
            Ok(init_params) => {
                info!(
                    client = %init_params.client_info.name,
                    protocol = %init_params.protocol_version,
                    "Initializing session"
                );
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    server_info: ServerInfo {
                        name: "PDF Name Lookup MCP".to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                        description: Some(
                            "Looks up Arabic names in numbered PDF rosters".to_string(),
                        ),
                    },
                    capabilities: ServerCapabilities {
                        tools: Some(ToolsCapability {
                            list_changed: Some(false),
                        }),
                        logging: Some(serde_json::json!({})),
                    },
                };
                Self::respond(id, &result)
            }
            Err(e) => McpResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {}", e)),
        }
    }

    fn handle_list_tools(id: Value) -> McpResponse {
        let result = ListToolsResult {
            tools: vec![
                SEARCH_NAME_TOOL_DEFINITION.clone(),
                LIST_ENTRIES_TOOL_DEFINITION.clone(),
            ],
        };
        Self::respond(id, &result)
    }

    async fn handle_call_tool(&self, id: Value, params: Option<Value>) -> McpResponse {
        let Some(params) = params else {
            return McpResponse::failure(id, INVALID_PARAMS, "Missing params");
        };

        match serde_json::from_value::<CallToolParams>(params) {
            Ok(call_params) => {
                let result = self.execute_tool(call_params).await;
                Self::respond(id, &result)
            }
            Err(e) => McpResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {}", e)),
        }
    }

    async fn execute_tool(&self, params: CallToolParams) -> CallToolResult {
        match params.name.as_str() {
            "search-name" => {
                let tool = SearchNameTool::new(&self.config, &self.extractor);
                tool.execute(params.arguments).await
            }
            "list-entries" => {
                let tool = ListEntriesTool::new(&self.config, &self.extractor);
                tool.execute(params.arguments).await
            }
            _ => CallToolResult::error(format!("Tool not found: {}", params.name)),
        }
    }

    fn respond<T: serde::Serialize>(id: Value, result: &T) -> McpResponse {
        match serde_json::to_value(result) {
            Ok(value) => McpResponse::success(id, value),
            Err(e) => McpResponse::failure(id, INTERNAL_ERROR, format!("Internal error: {}", e)),
        }
    }
}
