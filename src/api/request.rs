//! Request builder: URL, query string and JSON body assembly.
//!
//! GET operations serialize scalars as one query parameter each and arrays as
//! repeated `name[]` parameters in input order. The single POST operation
//! sends a flat JSON object where omitted optional metrics are absent rather
//! than zero.

use crate::api::operation::{HttpMethod, Operation};
use crate::api::token::SignedToken;
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use url::Url;

pub const HEADER_FEEDMOB_KEY: &str = "FEEDMOB-KEY";
pub const HEADER_FEEDMOB_TOKEN: &str = "FEEDMOB-TOKEN";
pub const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// Query parameters
// =============================================================================

/// Ordered query parameters for a GET operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// One scalar parameter.
    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.pairs.push((name.to_string(), value.to_string()));
        self
    }

    /// A scalar parameter that is skipped when absent.
    pub fn optional_param<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(name, v),
            None => self,
        }
    }

    /// One `name[]` parameter per element, in order. Empty slices add nothing.
    pub fn array(mut self, name: &str, values: &[String]) -> Self {
        let key = format!("{name}[]");
        for value in values {
            self.pairs.push((key.clone(), value.clone()));
        }
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// =============================================================================
// Direct spend body
// =============================================================================

/// Body of the direct-spend create/update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectSpend {
    pub click_url_id: i64,
    /// `YYYY-MM-DD`.
    pub spend_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_spend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_spend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_paid_action_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_paid_action_count: Option<i64>,
}

impl DirectSpend {
    pub fn new(click_url_id: i64, spend_date: impl Into<String>) -> Self {
        Self {
            click_url_id,
            spend_date: spend_date.into(),
            net_spend: None,
            gross_spend: None,
            partner_paid_action_count: None,
            client_paid_action_count: None,
        }
    }

    /// True when at least one spend metric is present. Zero counts as present.
    pub fn has_metric(&self) -> bool {
        self.net_spend.is_some()
            || self.gross_spend.is_some()
            || self.partner_paid_action_count.is_some()
            || self.client_paid_action_count.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.has_metric() {
            return Err(Error::validation(
                Operation::CreateDirectSpend.name(),
                "at least one spend metric is required: net_spend, gross_spend, \
                 partner_paid_action_count or client_paid_action_count",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Request envelope
// =============================================================================

/// Fully assembled request, discarded once the call completes.
#[derive(Clone)]
pub struct RequestEnvelope {
    pub operation: Operation,
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl RequestEnvelope {
    fn new(operation: Operation, url: Url, body: Option<Value>) -> Self {
        Self {
            operation,
            method: operation.method(),
            url,
            headers: vec![
                ("Content-Type", JSON_CONTENT_TYPE.to_string()),
                ("Accept", JSON_CONTENT_TYPE.to_string()),
            ],
            body,
        }
    }

    /// Attach the static key and a freshly minted token.
    pub fn authorize(mut self, key: &str, token: &SignedToken) -> Self {
        self.headers.push((HEADER_FEEDMOB_KEY, key.to_string()));
        self.headers
            .push((HEADER_FEEDMOB_TOKEN, token.as_str().to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for RequestEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case(HEADER_FEEDMOB_TOKEN) {
                    (*k, "<redacted>")
                } else {
                    (*k, v.as_str())
                }
            })
            .collect();
        f.debug_struct("RequestEnvelope")
            .field("operation", &self.operation)
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

// =============================================================================
// Builders
// =============================================================================

fn endpoint(base_url: &Url, operation: Operation) -> Result<Url> {
    let raw = format!(
        "{}{}",
        base_url.as_str().trim_end_matches('/'),
        operation.path()
    );
    Url::parse(&raw).map_err(|e| Error::config(format!("invalid endpoint URL '{raw}': {e}")))
}

/// Build a GET request. No `?` is emitted when the query is empty.
pub fn build_get(base_url: &Url, operation: Operation, query: Query) -> Result<RequestEnvelope> {
    let mut url = endpoint(base_url, operation)?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in query.pairs() {
            pairs.append_pair(name, value);
        }
    }
    Ok(RequestEnvelope::new(operation, url, None))
}

/// Build a POST request with a JSON body.
pub fn build_post<T: Serialize>(
    base_url: &Url,
    operation: Operation,
    body: &T,
) -> Result<RequestEnvelope> {
    let url = endpoint(base_url, operation)?;
    let body = serde_json::to_value(body)?;
    Ok(RequestEnvelope::new(operation, url, Some(body)))
}

/// Validate and build the direct-spend create/update request.
pub fn build_direct_spend(base_url: &Url, spend: &DirectSpend) -> Result<RequestEnvelope> {
    spend.validate()?;
    build_post(base_url, Operation::CreateDirectSpend, spend)
}
