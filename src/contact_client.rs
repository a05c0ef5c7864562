//! The client for the third-party contact-list provider (Resend audiences).
//!
//! The rest of the app only talks to the provider through the `ContactProvider` trait,
//! `ResendClient` is the implementation used in production.

use async_trait::async_trait;
use derive_more::{Deref, Display};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::web::types::ValidEmail;

// ###################################
// ->   STRUCTS
// ###################################
/// Identifier of the list (audience) new contacts are added to.
#[derive(Debug, Clone, Deref, Display, PartialEq, Eq)]
pub struct AudienceId(String);

impl From<&str> for AudienceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for AudienceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier the provider assigned to a created contact.
#[derive(Debug, Clone, Deref, Display, PartialEq, Eq, Deserialize)]
pub struct ContactId(String);

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The capability the subscription endpoint needs from a contact-list provider.
#[async_trait]
pub trait ContactProvider: Send + Sync {
    /// Creates a contact for `email` on the list `audience_id`.
    async fn create_contact(&self, email: &ValidEmail, audience_id: &AudienceId)
        -> Result<ContactId>;
}

#[derive(Debug)]
pub struct ResendClient {
    pub http_client: Client,
    pub url: reqwest::Url,
    api_key: SecretString,
}

impl ResendClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        api_key: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let mut url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;
        // `Url::join` replaces the last path segment unless the base ends with a slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(ResendClient {
            http_client,
            url,
            api_key,
        })
    }
}

#[async_trait]
impl ContactProvider for ResendClient {
    async fn create_contact(
        &self,
        email: &ValidEmail,
        audience_id: &AudienceId,
    ) -> Result<ContactId> {
        let url = self
            .url
            .join(&format!("audiences/{audience_id}/contacts"))
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let contact = NewContact {
            email: email.as_ref(),
            unsubscribed: false,
        };

        let resp = self
            .http_client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&contact)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // The body of an error response may or may not be the structured error we expect.
            let message = resp
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string());

            return Err(Error::Api { status, message });
        }

        let created: CreatedContact = resp.json().await?;
        Ok(created.id)
    }
}

pub const UNKNOWN_API_ERROR: &str = "Unknown Resend API error";

#[derive(Serialize)]
pub struct NewContact<'a> {
    pub email: &'a str,
    pub unsubscribed: bool,
}

#[derive(Deserialize)]
struct CreatedContact {
    id: ContactId,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The provider answered, but with a structured failure.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// Whether the provider itself reported the failure, as opposed to the call failing to complete.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::Api { .. })
    }
}
