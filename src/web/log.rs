//! The per-request JSON log line written by the response mapper.

use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde_json::json;
use serde_with::skip_serializing_none;
use tracing::debug;
use uuid::Uuid;

use super::{error::ClientError, routes::SubscribeOutcome, Error};

/// What the response mapper knows about a finished request.
pub struct RequestRecord<'a> {
    pub req_id: Uuid,
    pub req_method: &'a Method,
    pub uri: &'a Uri,
    /// Status the client actually receives.
    pub status: StatusCode,
    pub web_error: Option<&'a Error>,
    pub client_error: Option<&'a ClientError>,
    pub subscribe_outcome: Option<SubscribeOutcome>,
}

impl RequestRecord<'_> {
    pub fn emit(&self) {
        debug!("LOGLINE: {}", json!(self.log_line()));
    }

    /// `outcome` is `spam` or `created` for a handled subscription, and the failure kind
    /// (e.g. `missing_api_key`) when the subscription was rejected.
    fn log_line(&self) -> LogLine<'_> {
        let outcome = match (&self.subscribe_outcome, self.web_error) {
            (Some(outcome), _) => Some(outcome.as_ref()),
            (None, Some(Error::Subscribe(sub_err))) => Some(sub_err.as_ref()),
            _ => None,
        };

        LogLine {
            timestamp: chrono::Utc::now().to_rfc3339(),
            req_id: self.req_id.to_string(),
            req_method: self.req_method.as_str(),
            uri: self.uri.to_string(),
            status_code: self.status.as_u16(),
            outcome,
            client_error_type: self.client_error.map(|ce| ce.as_ref()),
            web_error_type: self.web_error.map(|we| we.as_ref()),
            web_error_data: self.web_error.map(|we| we.to_string()),
        }
    }
}

#[skip_serializing_none]
#[derive(Serialize)]
struct LogLine<'a> {
    timestamp: String,
    req_id: String,

    req_method: &'a str,
    uri: String,
    status_code: u16,

    outcome: Option<&'a str>,
    client_error_type: Option<&'a str>,
    web_error_type: Option<&'a str>,
    web_error_data: Option<String>,
}
