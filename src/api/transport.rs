//! Transport executor: one HTTP call, one classification.
//!
//! The response body of a successful call is passed through untouched. Every
//! failure goes through [`classify_status`] or [`classify_failure`], so error
//! behavior is identical for every operation. No retries.

use crate::api::operation::{HttpMethod, Operation};
use crate::api::request::RequestEnvelope;
use crate::types::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Executes an authorized request envelope.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn execute(&self, request: RequestEnvelope) -> Result<Value>;
}

/// Map a non-success HTTP status to a domain error.
pub fn classify_status(operation: Operation, status: StatusCode) -> Error {
    let operation = operation.name();
    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized { operation },
        StatusCode::BAD_REQUEST => Error::BadRequest { operation },
        StatusCode::NOT_FOUND => Error::NotFound { operation },
        other => Error::Upstream {
            operation,
            status: other.as_u16(),
        },
    }
}

/// Map a reqwest error to a domain error. Raw error text stays in the logs.
pub fn classify_failure(operation: Operation, err: &reqwest::Error, timeout: Duration) -> Error {
    if let Some(status) = err.status() {
        return classify_status(operation, status);
    }

    tracing::debug!(operation = %operation, error = %err, "upstream transport failure");
    let reason = if err.is_timeout() {
        format!("timed out after {}s", timeout.as_secs_f64())
    } else if err.is_connect() {
        "could not connect to FeedMob API".to_string()
    } else if err.is_body() || err.is_decode() {
        "failed to read response body".to_string()
    } else {
        "network error".to_string()
    };
    Error::transport(operation.name(), reason)
}

/// Interpret a success body: JSON when it parses, raw text otherwise.
pub fn parse_payload(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

// =============================================================================
// reqwest implementation
// =============================================================================

/// HTTP transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("feedmob-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: RequestEnvelope) -> Result<Value> {
        let operation = request.operation;
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_failure(operation, &e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(operation = %operation, status = status.as_u16(), "upstream returned error status");
            return Err(classify_status(operation, status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_failure(operation, &e, self.timeout))?;

        Ok(parse_payload(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_status_classification() {
        let op = Operation::GetInmobiReports;
        assert_eq!(
            classify_status(op, StatusCode::UNAUTHORIZED).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            classify_status(op, StatusCode::BAD_REQUEST).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            classify_status(op, StatusCode::NOT_FOUND).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            classify_status(op, StatusCode::FORBIDDEN).kind(),
            ErrorKind::UpstreamOther(403)
        );
        assert_eq!(
            classify_status(op, StatusCode::INTERNAL_SERVER_ERROR).kind(),
            ErrorKind::UpstreamOther(500)
        );
    }

    #[test]
    fn test_classification_names_every_operation() {
        for op in Operation::ALL {
            let err = classify_status(op, StatusCode::NOT_FOUND);
            assert_eq!(err.to_string(), format!("{} request failed: Not Found", op.name()));
        }
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload(br#"{"data":[1,2]}"#), json!({"data": [1, 2]}));
        assert_eq!(parse_payload(b"[]"), json!([]));
        assert_eq!(parse_payload(b"OK"), json!("OK"));
        assert_eq!(parse_payload(b""), Value::Null);
        assert_eq!(parse_payload(b"  \n"), Value::Null);
    }
}
