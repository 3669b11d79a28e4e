//! MCP stdio server. Reads requests, runs each on its own task, writes
//! responses through a single writer task.

use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::mcp::codec::{read_message, write_message};
use crate::mcp::router::{error_response, route_request, success_response, RpcError};
use crate::tools::ToolDispatcher;

const OUTBOUND_CAPACITY: usize = 64;

/// MCP server wrapping the tool dispatcher.
#[derive(Debug)]
pub struct McpServer {
    dispatcher: Arc<ToolDispatcher>,
    cancel: CancellationToken,
}

impl McpServer {
    pub fn new(dispatcher: Arc<ToolDispatcher>) -> Self {
        Self {
            dispatcher,
            cancel: CancellationToken::new(),
        }
    }

    /// Request graceful shutdown. In-flight calls still complete.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels [`serve`](Self::serve) when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Serve until EOF on `reader` or shutdown.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut lines = BufReader::new(reader).lines();
        let (tx, rx) = mpsc::channel::<Value>(OUTBOUND_CAPACITY);
        let writer_task = tokio::spawn(write_loop(writer, rx));
        let mut in_flight = JoinSet::new();

        tracing::info!("MCP server ready on stdio");

        let read_result = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("MCP server shutting down");
                    break Ok(());
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!("request task failed: {}", e);
                    }
                }
                next = read_message(&mut lines) => {
                    let line = match next {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            tracing::info!("stdin closed");
                            break Ok(());
                        }
                        Err(e) => break Err(e),
                    };
                    let dispatcher = self.dispatcher.clone();
                    let tx = tx.clone();
                    in_flight.spawn(async move {
                        if let Some(response) = handle_message(&dispatcher, &line).await {
                            if tx.send(response).await.is_err() {
                                tracing::warn!("response dropped: writer closed");
                            }
                        }
                    });
                }
            }
        };

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                tracing::error!("request task failed: {}", e);
            }
        }
        drop(tx);

        match writer_task.await {
            Ok(write_result) => write_result?,
            Err(e) => tracing::error!("writer task failed: {}", e),
        }
        read_result
    }
}

async fn write_loop<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut rx: mpsc::Receiver<Value>,
) -> std::io::Result<()> {
    while let Some(message) = rx.recv().await {
        write_message(&mut writer, &message).await?;
    }
    Ok(())
}

/// Handle one raw line. Returns `None` for notifications.
pub async fn handle_message(dispatcher: &ToolDispatcher, line: &str) -> Option<Value> {
    let message: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(error_response(
                Value::Null,
                RpcError::parse_error(format!("Parse error: {e}")),
            ))
        }
    };

    let Value::Object(mut request) = message else {
        return Some(error_response(
            Value::Null,
            RpcError::invalid_request("Request must be a JSON object"),
        ));
    };

    let id = request.remove("id");
    if request.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Some(error_response(
            id.unwrap_or(Value::Null),
            RpcError::invalid_request("jsonrpc must be \"2.0\""),
        ));
    }

    let method = match request.get("method").and_then(Value::as_str) {
        Some(method) => method.to_string(),
        None => {
            // A method-less message without an id needs no reply.
            return id.map(|id| error_response(id, RpcError::invalid_request("Missing method")));
        }
    };
    let params = request.remove("params").unwrap_or(Value::Null);

    let Some(id) = id else {
        tracing::debug!(method = %method, "notification");
        return None;
    };

    Some(match route_request(dispatcher, &method, params).await {
        Ok(result) => success_response(id, result),
        Err(error) => {
            tracing::debug!(method = %method, code = error.code, "request rejected: {}", error.message);
            error_response(id, error)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{api_config, RecordingTransport, Reply};
    use crate::api::FeedmobClient;
    use serde_json::json;

    fn dispatcher() -> ToolDispatcher {
        let transport = Arc::new(RecordingTransport::new(Reply::Payload(json!({"ok": true}))));
        ToolDispatcher::new(Arc::new(FeedmobClient::with_transport(&api_config(), transport)))
    }

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let response = handle_message(&dispatcher(), "{not json").await.unwrap();
        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_batch_is_invalid_request() {
        let response = handle_message(&dispatcher(), "[]").await.unwrap();
        assert_eq!(response["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let response = handle_message(&dispatcher(), r#"{"jsonrpc":"1.0","id":4,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(response["id"], 4);
        assert_eq!(response["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let response = handle_message(
            &dispatcher(),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        )
        .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_ping_echoes_id() {
        let response = handle_message(&dispatcher(), r#"{"jsonrpc":"2.0","id":"abc","method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": "abc", "result": {}}));
    }

    #[tokio::test]
    async fn test_serve_drains_until_eof() {
        let server = McpServer::new(Arc::new(dispatcher()));
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let (client, server_side) = tokio::io::duplex(64 * 1024);

        server.serve(input.as_bytes(), server_side).await.unwrap();

        let mut lines = BufReader::new(client).lines();
        let mut ids = Vec::new();
        for _ in 0..2 {
            let line = read_message(&mut lines).await.unwrap().unwrap();
            let value: Value = serde_json::from_str(&line).unwrap();
            ids.push(value["id"].as_i64().unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_shutdown_stops_serving() {
        let server = McpServer::new(Arc::new(dispatcher()));
        let (_client, server_side) = tokio::io::duplex(1024);
        let (read_half, write_half) = tokio::io::split(server_side);

        server.shutdown();
        server.serve(read_half, write_half).await.unwrap();
    }
}
