use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    response::Redirect,
    Extension, Form,
};
use strum_macros::AsRefStr;
use tracing::{field, info, Span};

use crate::{
    contact_client,
    web::{
        self,
        types::{
            DataParsingError, SubscribeForm, SubscriptionRequest, EMAIL_FIELD, HONEYPOT_FIELD,
        },
        WebResult,
    },
    AppState,
};

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, AsRefStr, thiserror::Error)]
#[strum(serialize_all = "snake_case")]
pub enum SubscribeError {
    #[error("failed to parse the request body: {0}")]
    MalformedRequest(String),
    #[error("invalid email: {0}")]
    InvalidEmail(DataParsingError),

    #[error("the contact provider api key is not configured")]
    MissingApiKey,
    #[error("the contact provider audience id is not configured")]
    MissingAudienceId,

    #[error("contact provider error: {0}")]
    Provider(#[from] contact_client::Error),
}

/// Attached to the response extensions of every successful subscribe call so the request log
/// can tell a created contact from a dropped spam submission. Both get the same redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SubscribeOutcome {
    Spam,
    Created,
}

// ###################################
// ->   EXTRACTOR
// ###################################
/// Accepts both `multipart/form-data` and `application/x-www-form-urlencoded` bodies.
/// Repeated fields keep their first value in either encoding.
impl<S> FromRequest<S> for SubscribeForm
where
    S: Send + Sync,
{
    type Rejection = web::Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rej| SubscribeError::MalformedRequest(rej.to_string()))?;
            read_multipart(multipart).await
        } else {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rej| SubscribeError::MalformedRequest(rej.to_string()))?;
            Ok(SubscribeForm::from_fields(fields))
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> WebResult<SubscribeForm> {
    let malformed = |er: axum::extract::multipart::MultipartError| {
        SubscribeError::MalformedRequest(er.to_string())
    };

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field
            .name()
            .filter(|name| [EMAIL_FIELD, HONEYPOT_FIELD].contains(name))
            .map(str::to_owned)
        else {
            continue;
        };
        fields.push((name, field.text().await.map_err(malformed)?));
    }

    Ok(SubscribeForm::from_fields(fields))
}

// ###################################
// ->   API
// ###################################
/// Adds the submitted email to the configured contact list and redirects to the success page.
///
/// Spam submissions get the exact same redirect, without the provider ever being contacted.
#[tracing::instrument(
    name = "Adding a new contact to the mailing list",
    skip_all,
    fields(subscriber_email = field::Empty)
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    form: SubscribeForm,
) -> WebResult<(Extension<SubscribeOutcome>, Redirect)> {
    let success = Redirect::to(&app_state.success_path);

    if form.is_spam() {
        info!("honeypot field filled, likely spam");
        return Ok((Extension(SubscribeOutcome::Spam), success));
    }

    let SubscriptionRequest { email } =
        SubscriptionRequest::try_from(form).map_err(SubscribeError::InvalidEmail)?;
    Span::current().record("subscriber_email", field::display(&email));

    let provider = app_state
        .contact_provider
        .as_deref()
        .ok_or(SubscribeError::MissingApiKey)?;
    let audience_id = app_state
        .audience_id
        .as_ref()
        .ok_or(SubscribeError::MissingAudienceId)?;

    let contact_id = provider
        .create_contact(&email, audience_id)
        .await
        .map_err(SubscribeError::Provider)?;

    info!(%contact_id, "SUCCESS");
    Ok((Extension(SubscribeOutcome::Created), success))
}
