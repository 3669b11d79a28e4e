//! Operation descriptors: the fixed set of upstream capabilities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP method used by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

/// One upstream capability. The name doubles as the exposed tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Direct spends for a set of click URLs.
    GetDirectSpends,
    GetInmobiReportIds,
    CheckInmobiReportStatus,
    GetInmobiReports,
    /// Create or update a direct spend (the only POST).
    CreateDirectSpend,
    GetAppsflyerReports,
    GetAdopsReports,
    GetInmobiCampaignMappings,
    /// Legacy direct-spend lookup keyed by client.
    GetDirectSpendsByClient,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::GetDirectSpends,
        Operation::GetInmobiReportIds,
        Operation::CheckInmobiReportStatus,
        Operation::GetInmobiReports,
        Operation::CreateDirectSpend,
        Operation::GetAppsflyerReports,
        Operation::GetAdopsReports,
        Operation::GetInmobiCampaignMappings,
        Operation::GetDirectSpendsByClient,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::GetDirectSpends => "get_direct_spends",
            Operation::GetInmobiReportIds => "get_inmobi_report_ids",
            Operation::CheckInmobiReportStatus => "check_inmobi_report_status",
            Operation::GetInmobiReports => "get_inmobi_reports",
            Operation::CreateDirectSpend => "create_direct_spend",
            Operation::GetAppsflyerReports => "get_appsflyer_reports",
            Operation::GetAdopsReports => "get_adops_reports",
            Operation::GetInmobiCampaignMappings => "get_inmobi_campaign_mappings",
            Operation::GetDirectSpendsByClient => "get_direct_spends_by_client",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Operation::CreateDirectSpend => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    /// Path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Operation::GetDirectSpends
            | Operation::CreateDirectSpend
            | Operation::GetDirectSpendsByClient => "/ai/api/direct_spends",
            Operation::GetInmobiReportIds => "/ai/api/inmobi_api_reports/get_inmobi_report_ids",
            Operation::CheckInmobiReportStatus => {
                "/ai/api/inmobi_api_reports/check_inmobi_report_id_status"
            }
            Operation::GetInmobiReports => "/ai/api/inmobi_api_reports",
            Operation::GetAppsflyerReports => "/ai/api/appsflyer_reports",
            Operation::GetAdopsReports => "/ai/api/adops_reports",
            Operation::GetInmobiCampaignMappings => "/ai/api/inmobi_campaign_mappings",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
