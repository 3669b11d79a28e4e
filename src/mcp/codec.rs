//! Message codec for the MCP stdio transport.
//!
//! Framing:
//! ```text
//! ┌──────────────────────────────┬────┐
//! │ JSON-RPC message (one line)  │ \n │
//! └──────────────────────────────┴────┘
//! ```
//! Messages must not contain embedded newlines. Blank lines are skipped.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};

/// Read the next non-blank line. Returns `None` on clean EOF.
///
/// Cancel safe: `Lines::next_line` keeps partial input buffered between calls.
pub async fn read_message<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
) -> std::io::Result<Option<String>> {
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed.to_string()));
        }
    }
    Ok(None)
}

/// Write one message followed by a newline, then flush.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &Value,
) -> std::io::Result<()> {
    let mut bytes = serde_json::to_vec(message)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
