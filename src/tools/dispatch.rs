//! Tool dispatch: tool name and arguments go to one client operation and come back as an envelope.
//!
//! Every domain error is converted into [`ToolOutcome::Error`] here. The only
//! error that escapes is [`Error::UnknownTool`], which is a protocol concern.

use crate::api::{DirectSpend, FeedmobClient, Operation};
use crate::tools::catalog::{ToolCatalog, ToolEntry};
use crate::types::{Error, RequestId, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Result envelope of a tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Error(String),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Error(_))
    }
}

// =============================================================================
// Typed arguments
// =============================================================================

#[derive(Debug, Deserialize)]
struct DirectSpendsArgs {
    start_date: String,
    end_date: String,
    click_url_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DateRangeArgs {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Deserialize)]
struct ReportStatusArgs {
    start_date: String,
    end_date: String,
    report_id: String,
}

#[derive(Debug, Deserialize)]
struct InmobiReportsArgs {
    start_date: String,
    end_date: String,
    skan_report_id: String,
    non_skan_report_id: String,
}

#[derive(Debug, Deserialize)]
struct AppsflyerArgs {
    start_date: String,
    end_date: String,
    #[serde(default)]
    click_url_ids: Option<Vec<String>>,
    #[serde(default)]
    af_app_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AdopsArgs {
    month: String,
}

#[derive(Debug, Deserialize)]
struct DirectSpendsByClientArgs {
    client_id: i64,
    start_date: String,
    end_date: String,
    #[serde(default)]
    vendor_id: Option<i64>,
    #[serde(default)]
    click_url_ids: Option<String>,
}

fn parse_args<T: DeserializeOwned>(operation: Operation, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| Error::validation(operation.name(), format!("invalid arguments: {e}")))
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Routes tool calls onto a shared [`FeedmobClient`].
#[derive(Debug)]
pub struct ToolDispatcher {
    catalog: ToolCatalog,
    client: Arc<FeedmobClient>,
}

impl ToolDispatcher {
    pub fn new(client: Arc<FeedmobClient>) -> Self {
        Self {
            catalog: ToolCatalog::new(),
            client,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Invoke a tool by name. `Err` only for names not in the catalog.
    pub async fn invoke(&self, tool_name: &str, args: Value) -> Result<ToolOutcome> {
        let entry = self
            .catalog
            .get(tool_name)
            .ok_or_else(|| Error::UnknownTool(tool_name.to_string()))?;

        let request_id = RequestId::new();
        let span = tracing::info_span!("tool_call", tool = tool_name, request_id = %request_id);

        let outcome = async {
            let started = std::time::Instant::now();
            match self.call(entry, args).await {
                Ok(payload) => {
                    tracing::info!(latency_ms = started.elapsed().as_millis() as u64, "tool call succeeded");
                    ToolOutcome::Success(payload)
                }
                Err(err) => {
                    tracing::warn!(
                        error_code = err.code(),
                        latency_ms = started.elapsed().as_millis() as u64,
                        "tool call failed: {}",
                        err
                    );
                    ToolOutcome::Error(err.to_string())
                }
            }
        }
        .instrument(span)
        .await;

        Ok(outcome)
    }

    async fn call(&self, entry: &ToolEntry, args: Value) -> Result<Value> {
        let operation = entry.operation;

        let errors = entry.validate_params(&args);
        if !errors.is_empty() {
            return Err(Error::validation(operation.name(), errors.join("; ")));
        }
        let args = if args.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            args
        };

        let client = &self.client;
        match operation {
            Operation::GetDirectSpends => {
                let a: DirectSpendsArgs = parse_args(operation, args)?;
                client
                    .fetch_direct_spends(&a.start_date, &a.end_date, &a.click_url_ids)
                    .await
            }
            Operation::GetInmobiReportIds => {
                let a: DateRangeArgs = parse_args(operation, args)?;
                client.get_inmobi_report_ids(&a.start_date, &a.end_date).await
            }
            Operation::CheckInmobiReportStatus => {
                let a: ReportStatusArgs = parse_args(operation, args)?;
                client
                    .check_inmobi_report_status(&a.start_date, &a.end_date, &a.report_id)
                    .await
            }
            Operation::GetInmobiReports => {
                let a: InmobiReportsArgs = parse_args(operation, args)?;
                client
                    .get_inmobi_reports(
                        &a.start_date,
                        &a.end_date,
                        &a.skan_report_id,
                        &a.non_skan_report_id,
                    )
                    .await
            }
            Operation::CreateDirectSpend => {
                let spend: DirectSpend = parse_args(operation, args)?;
                client.create_or_update_direct_spend(&spend).await
            }
            Operation::GetAppsflyerReports => {
                let a: AppsflyerArgs = parse_args(operation, args)?;
                client
                    .get_appsflyer_reports(
                        &a.start_date,
                        &a.end_date,
                        a.click_url_ids.as_deref(),
                        a.af_app_ids.as_deref(),
                    )
                    .await
            }
            Operation::GetAdopsReports => {
                let a: AdopsArgs = parse_args(operation, args)?;
                client.get_adops_reports(&a.month).await
            }
            Operation::GetInmobiCampaignMappings => client.get_inmobi_campaign_mappings().await,
            Operation::GetDirectSpendsByClient => {
                let a: DirectSpendsByClientArgs = parse_args(operation, args)?;
                client
                    .fetch_direct_spends_by_client(
                        a.client_id,
                        &a.start_date,
                        &a.end_date,
                        a.vendor_id,
                        a.click_url_ids.as_deref(),
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{api_config, RecordingTransport, Reply};
    use crate::types::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dispatcher(reply: Reply) -> (ToolDispatcher, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new(reply));
        let client = FeedmobClient::with_transport(&api_config(), transport.clone());
        (ToolDispatcher::new(Arc::new(client)), transport)
    }

    #[tokio::test]
    async fn test_unknown_tool_is_protocol_error() {
        let (dispatcher, _) = dispatcher(Reply::Payload(json!({})));
        let err = dispatcher.invoke("drop_tables", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownTool);
    }

    #[tokio::test]
    async fn test_success_wraps_payload() {
        let payload = json!({"report_ids": {"skan": "a", "non_skan": "b"}});
        let (dispatcher, transport) = dispatcher(Reply::Payload(payload.clone()));

        let outcome = dispatcher
            .invoke(
                "get_inmobi_report_ids",
                json!({"start_date": "2024-01-01", "end_date": "2024-01-07"}),
            )
            .await
            .unwrap();

        assert_eq!(outcome, ToolOutcome::Success(payload));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_spend_metric_yields_error_envelope_without_call() {
        let (dispatcher, transport) = dispatcher(Reply::Payload(json!({})));

        let outcome = dispatcher
            .invoke(
                "create_direct_spend",
                json!({"click_url_id": 5, "spend_date": "2024-02-01"}),
            )
            .await
            .unwrap();

        match outcome {
            ToolOutcome::Error(msg) => {
                assert!(msg.starts_with("create_direct_spend validation failed"), "{msg}");
                assert!(msg.contains("at least one spend metric"));
            }
            other => panic!("expected error envelope, got {other:?}"),
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_null_metrics_count_as_absent() {
        let (dispatcher, transport) = dispatcher(Reply::Payload(json!({})));

        let outcome = dispatcher
            .invoke(
                "create_direct_spend",
                json!({"click_url_id": 5, "spend_date": "2024-02-01", "net_spend": null}),
            )
            .await
            .unwrap();

        assert!(outcome.is_error());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_single_metric_body() {
        let (dispatcher, transport) = dispatcher(Reply::Payload(json!({"status": "ok"})));

        let outcome = dispatcher
            .invoke(
                "create_direct_spend",
                json!({"click_url_id": 5, "spend_date": "2024-02-01", "net_spend": 10.5}),
            )
            .await
            .unwrap();

        assert!(!outcome.is_error());
        assert_eq!(
            transport.last().body,
            Some(json!({"click_url_id": 5, "spend_date": "2024-02-01", "net_spend": 10.5}))
        );
    }

    #[tokio::test]
    async fn test_schema_violation_makes_no_call() {
        let (dispatcher, transport) = dispatcher(Reply::Payload(json!({})));

        let outcome = dispatcher
            .invoke("get_direct_spends", json!({"start_date": "2024-01-01"}))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ToolOutcome::Error(
                "get_direct_spends validation failed: Missing required parameter: end_date; \
                 Missing required parameter: click_url_ids"
                    .to_string()
            )
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_error_envelope() {
        let (dispatcher, _) = dispatcher(Reply::Status(401));
        let outcome = dispatcher
            .invoke("get_inmobi_campaign_mappings", Value::Null)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ToolOutcome::Error(
                "get_inmobi_campaign_mappings request failed: Unauthorized (Invalid API Key or Token)"
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_timeout_becomes_error_envelope() {
        let (dispatcher, _) = dispatcher(Reply::Timeout);
        let outcome = dispatcher
            .invoke("get_adops_reports", json!({"month": "2024-05"}))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ToolOutcome::Error("get_adops_reports request failed: timed out after 30s".to_string())
        );
    }

    #[tokio::test]
    async fn test_every_tool_dispatches_to_its_path() {
        let (dispatcher, transport) = dispatcher(Reply::Payload(json!([])));
        let calls = [
            ("get_direct_spends", json!({"start_date": "a", "end_date": "b", "click_url_ids": []})),
            ("get_inmobi_report_ids", json!({"start_date": "a", "end_date": "b"})),
            ("check_inmobi_report_status", json!({"start_date": "a", "end_date": "b", "report_id": "r"})),
            ("get_inmobi_reports", json!({"start_date": "a", "end_date": "b", "skan_report_id": "s", "non_skan_report_id": "n"})),
            ("create_direct_spend", json!({"click_url_id": 1, "spend_date": "a", "gross_spend": 0})),
            ("get_appsflyer_reports", json!({"start_date": "a", "end_date": "b"})),
            ("get_adops_reports", json!({"month": "2024-05"})),
            ("get_inmobi_campaign_mappings", json!({})),
            ("get_direct_spends_by_client", json!({"client_id": 3, "start_date": "a", "end_date": "b"})),
        ];

        for (tool, args) in calls {
            let outcome = dispatcher.invoke(tool, args).await.unwrap();
            assert!(!outcome.is_error(), "{tool}: {outcome:?}");
            let op = Operation::from_name(tool).unwrap();
            let req = transport.last();
            assert_eq!(req.operation, op);
            assert_eq!(req.url.path(), op.path());
        }
        assert_eq!(transport.calls(), 9);
    }
}
