//! Operation catalog: one method per FeedMob capability.
//!
//! Every method builds its request, mints a fresh token, and hands the
//! authorized envelope to the transport. Payloads are returned unchanged.

use crate::api::operation::Operation;
use crate::api::request::{build_direct_spend, build_get, DirectSpend, Query, RequestEnvelope};
use crate::api::token::TokenIssuer;
use crate::api::transport::{HttpTransport, Transport};
use crate::types::{ApiConfig, Result};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Authenticated FeedMob API client. Stateless apart from immutable config.
#[derive(Debug, Clone)]
pub struct FeedmobClient {
    base_url: Url,
    issuer: TokenIssuer,
    transport: Arc<dyn Transport>,
}

impl FeedmobClient {
    /// Client over real HTTP.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.base_url.clone(),
            issuer: TokenIssuer::new(config.credentials.clone()),
            transport,
        }
    }

    async fn send(&self, request: RequestEnvelope) -> Result<Value> {
        let token = self.issuer.mint()?;
        let request = request.authorize(self.issuer.key(), &token);
        tracing::debug!(
            operation = %request.operation,
            url = %request.url,
            "sending FeedMob API request"
        );
        self.transport.execute(request).await
    }

    async fn get(&self, operation: Operation, query: Query) -> Result<Value> {
        self.send(build_get(&self.base_url, operation, query)?).await
    }

    pub async fn fetch_direct_spends(
        &self,
        start_date: &str,
        end_date: &str,
        click_url_ids: &[String],
    ) -> Result<Value> {
        let query = Query::new()
            .param("start_date", start_date)
            .param("end_date", end_date)
            .array("click_url_ids", click_url_ids);
        self.get(Operation::GetDirectSpends, query).await
    }

    pub async fn get_inmobi_report_ids(&self, start_date: &str, end_date: &str) -> Result<Value> {
        let query = Query::new()
            .param("start_date", start_date)
            .param("end_date", end_date);
        self.get(Operation::GetInmobiReportIds, query).await
    }

    pub async fn check_inmobi_report_status(
        &self,
        start_date: &str,
        end_date: &str,
        report_id: &str,
    ) -> Result<Value> {
        let query = Query::new()
            .param("start_date", start_date)
            .param("end_date", end_date)
            .param("report_id", report_id);
        self.get(Operation::CheckInmobiReportStatus, query).await
    }

    pub async fn get_inmobi_reports(
        &self,
        start_date: &str,
        end_date: &str,
        skan_report_id: &str,
        non_skan_report_id: &str,
    ) -> Result<Value> {
        let query = Query::new()
            .param("start_date", start_date)
            .param("end_date", end_date)
            .param("skan_report_id", skan_report_id)
            .param("non_skan_report_id", non_skan_report_id);
        self.get(Operation::GetInmobiReports, query).await
    }

    /// Create or update a direct spend. Fails with a validation error, without
    /// touching the network, when no spend metric is present.
    pub async fn create_or_update_direct_spend(&self, spend: &DirectSpend) -> Result<Value> {
        self.send(build_direct_spend(&self.base_url, spend)?).await
    }

    pub async fn get_appsflyer_reports(
        &self,
        start_date: &str,
        end_date: &str,
        click_url_ids: Option<&[String]>,
        af_app_ids: Option<&[String]>,
    ) -> Result<Value> {
        let query = Query::new()
            .param("start_date", start_date)
            .param("end_date", end_date)
            .array("click_url_ids", click_url_ids.unwrap_or_default())
            .array("af_app_ids", af_app_ids.unwrap_or_default());
        self.get(Operation::GetAppsflyerReports, query).await
    }

    /// `month` is `YYYY-MM`.
    pub async fn get_adops_reports(&self, month: &str) -> Result<Value> {
        let query = Query::new().param("month", month);
        self.get(Operation::GetAdopsReports, query).await
    }

    pub async fn get_inmobi_campaign_mappings(&self) -> Result<Value> {
        self.get(Operation::GetInmobiCampaignMappings, Query::new())
            .await
    }

    /// Legacy lookup keyed by client. `click_url_ids` is passed through as a
    /// single `click_url_id` parameter.
    pub async fn fetch_direct_spends_by_client(
        &self,
        client_id: i64,
        start_date: &str,
        end_date: &str,
        vendor_id: Option<i64>,
        click_url_ids: Option<&str>,
    ) -> Result<Value> {
        let query = Query::new()
            .param("client_id", client_id)
            .param("start_date", start_date)
            .param("end_date", end_date)
            .optional_param("vendor_id", vendor_id)
            .optional_param("click_url_id", click_url_ids);
        self.get(Operation::GetDirectSpendsByClient, query).await
    }
}
