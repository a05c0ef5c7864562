use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::routes::SubscribeError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),

    #[error("templating error: {0}")]
    Tera(#[from] tera::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::Subscribe(sub_err) => match sub_err {
                SubscribeError::MalformedRequest(details) => {
                    (StatusCode::BAD_REQUEST, InvalidRequest(details.clone()))
                }
                SubscribeError::InvalidEmail(_) => (StatusCode::BAD_REQUEST, InvalidEmail),
                SubscribeError::MissingApiKey => {
                    (StatusCode::INTERNAL_SERVER_ERROR, ServiceConfiguration)
                }
                SubscribeError::MissingAudienceId => {
                    (StatusCode::INTERNAL_SERVER_ERROR, MissingListId)
                }
                SubscribeError::Provider(provider_err) => {
                    let details = provider_err.to_string();
                    if provider_err.is_api_error() {
                        (StatusCode::INTERNAL_SERVER_ERROR, SubscriptionFailed(details))
                    } else {
                        (StatusCode::INTERNAL_SERVER_ERROR, ProviderUnavailable(details))
                    }
                }
            },
            _ => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The error as the client gets to see it.
#[derive(Debug, AsRefStr)]
pub enum ClientError {
    InvalidRequest(String),
    InvalidEmail,
    ServiceConfiguration,
    MissingListId,
    SubscriptionFailed(String),
    ProviderUnavailable(String),
    ServiceError,
}

impl ClientError {
    /// The JSON body sent to the client: `{"error": ..., "details": ...}`.
    pub fn body(&self) -> ClientErrorBody<'_> {
        use ClientError::*;

        let (error, details) = match self {
            InvalidRequest(details) => ("Invalid request", Some(details.as_str())),
            InvalidEmail => ("Invalid email address", None),
            ServiceConfiguration => ("Email service configuration error.", None),
            MissingListId => ("Email service configuration error (missing list ID).", None),
            SubscriptionFailed(details) => ("Failed to subscribe email.", Some(details.as_str())),
            ProviderUnavailable(details) => (
                "An unexpected error occurred with the email service.",
                Some(details.as_str()),
            ),
            ServiceError => ("Service Error!", None),
        };

        ClientErrorBody { error, details }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct ClientErrorBody<'a> {
    pub error: &'a str,
    pub details: Option<&'a str>,
}
