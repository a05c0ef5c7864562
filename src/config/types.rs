//! The configuration structs used to build the AppConfig, and their impls.
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use strum_macros::AsRefStr;

use crate::config::ConfigError;
use crate::contact_client::AudienceId;

// ###################################
// ->  STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub provider_config: ProviderConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
    /// Where both successful and spam submissions get redirected to.
    pub success_path: String,
}

/// Settings for the contact-list provider.
/// Both `api_key` and `audience_id` are optional here, missing values get reported per request.
#[derive(Deserialize, Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub audience_id: Option<String>,
    pub timeout_millis: u64,
}

// ###################################
// ->  IMPLs
// ###################################
impl ProviderConfig {
    /// Returns the API key unless it is unset or blank.
    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }

    /// Returns the target list identifier unless it is unset or blank.
    pub fn audience_id(&self) -> Option<AudienceId> {
        self.audience_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(AudienceId::from)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

// ###################################
// ->  TRY FROMs
// ###################################
impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}
