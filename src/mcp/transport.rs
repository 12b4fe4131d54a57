use anyhow::Result;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, BufReader, Stdin, Stdout};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, error, warn};

use super::types::{McpMessage, McpNotification, McpRequest, McpResponse};

// Requests only carry a file name and a query, so anything this long is garbage.
const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Newline-delimited JSON-RPC over any async reader/writer pair.
pub struct LineTransport<R, W> {
    reader: FramedRead<R, LinesCodec>,
    writer: FramedWrite<W, LinesCodec>,
}

pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
            writer: FramedWrite::new(writer, LinesCodec::new()),
        }
    }

    /// Reads the next non-blank message. `Ok(None)` means the peer closed the stream.
    pub async fn read_message(&mut self) -> Result<Option<McpMessage>> {
        loop {
            match self.reader.next().await {
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    debug!("Received: {}", line);
                    return Ok(Some(parse_message(&line)));
                }
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    warn!("Discarding message longer than {} bytes", MAX_LINE_LENGTH);
                    return Ok(Some(McpMessage::Invalid("Message too long".to_string())));
                }
                Some(Err(LinesCodecError::Io(e))) => {
                    error!("Error reading from input: {}", e);
                    return Err(anyhow::anyhow!("Transport error: {}", e));
                }
                None => {
                    debug!("EOF reached");
                    return Ok(None);
                }
            }
        }
    }

    pub async fn write_response(&mut self, response: &McpResponse) -> Result<()> {
        let json = serde_json::to_string(response)?;
        debug!("Sending: {}", json);
        self.writer.send(json).await?;
        Ok(())
    }
}

/// Classifies one line: objects with an `id` are requests, objects without are notifications.
pub fn parse_message(line: &str) -> McpMessage {
    let value = match serde_json::from_str::<serde_json::Value>(line) {
        Ok(value) => value,
        Err(e) => {
            error!("Failed to parse JSON: {}", e);
            return McpMessage::Invalid(format!("Invalid JSON: {}", e));
        }
    };

    let is_request = match value.as_object() {
        Some(obj) => obj.contains_key("id"),
        None => {
            error!("Invalid JSON-RPC message structure");
            return McpMessage::Invalid("Invalid JSON-RPC message structure".to_string());
        }
    };

    if is_request {
        match serde_json::from_value::<McpRequest>(value) {
            Ok(request) => McpMessage::Request(request),
            Err(e) => {
                error!("Failed to parse request: {}", e);
                McpMessage::Invalid(format!("Invalid JSON-RPC request: {}", e))
            }
        }
    } else {
        match serde_json::from_value::<McpNotification>(value) {
            Ok(notification) => McpMessage::Notification(notification),
            Err(e) => {
                error!("Failed to parse notification: {}", e);
                McpMessage::Invalid(format!("Invalid JSON-RPC notification: {}", e))
            }
        }
    }
}
