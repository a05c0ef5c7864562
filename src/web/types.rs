//! Most of the structs in `web` module and their implementations live here.
//! Includes structs that need to be validated, their parsing implementations and tests for those

use lazy_regex::regex_is_match;

// ###################################
// ->   STRUCTS
// ###################################
/// Name of the decoy field rendered hidden on the subscription form.
pub const HONEYPOT_FIELD: &str = "honeypot-email";
pub const EMAIL_FIELD: &str = "email";

/// The subscription form as submitted.
/// The fields are taken as they come, nothing is validated yet.
#[derive(Debug, Default)]
pub struct SubscribeForm {
    pub email: String,
    pub honeypot: String,
}

impl SubscribeForm {
    pub fn new(email: impl Into<String>, honeypot: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            honeypot: honeypot.into(),
        }
    }

    /// Builds the form from raw `(name, value)` pairs in body order.
    /// A field sent more than once keeps its first value, unknown fields are ignored.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut email = None;
        let mut honeypot = None;

        for (name, value) in fields {
            let slot = match name.as_ref() {
                EMAIL_FIELD => &mut email,
                HONEYPOT_FIELD => &mut honeypot,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }

        Self {
            email: email.unwrap_or_default(),
            honeypot: honeypot.unwrap_or_default(),
        }
    }

    /// Humans never see the decoy field, so anything in it came from a bot.
    pub fn is_spam(&self) -> bool {
        !self.honeypot.is_empty()
    }
}

/// Subscription request with a validated email. The spam check happens before this is built.
#[derive(Debug, Clone)]
pub struct SubscriptionRequest {
    pub email: ValidEmail,
}

impl TryFrom<SubscribeForm> for SubscriptionRequest {
    type Error = DataParsingError;

    fn try_from(form: SubscribeForm) -> Result<Self, Self::Error> {
        Ok(SubscriptionRequest {
            email: ValidEmail::parse(form.email)?,
        })
    }
}

/// An email that passed the shape check: `<non-space>@<non-space>.<non-space>`.
/// This is deliberately permissive, the provider has the final word on deliverability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ValidEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        if regex_is_match!(r"\S+@\S+\.\S+", value) {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email missing")]
    EmailMissing,
    #[error("email invalid")]
    EmailInvalid,
}
