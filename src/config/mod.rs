//! Tries to create an `AppConfig` from config files and the environment.
//! Sources are layered with `figment`: `base.toml`, then the environment specific file,
//! then the raw provider variables and finally `APP_` prefixed overrides.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod types;

use std::{path::Path, sync::OnceLock};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, Environment, NetConfig, ProviderConfig};

/// Raw environment variables that hold the provider settings.
pub const API_KEY_ENV: &str = "RESEND_API_KEY";
pub const AUDIENCE_ID_ENV: &str = "RESEND_CONTACT_LIST_ID";

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<20} - Initializing the configuration",
            "get_or_init_config"
        );
        let base_path = std::env::current_dir().expect("Failed to determine the current DIR.");
        let config_dir = base_path.join("config");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .unwrap_or_else(|er| panic!("Fatal Error: Parsing APP_ENVIRONMENT: {er}"));

        load_config(environment, &config_dir)
            .unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}

/// Builds the `AppConfig` for `environment` from the TOML files found in `config_dir`
/// merged with the process environment.
pub fn load_config(environment: Environment, config_dir: &Path) -> ConfigResult<AppConfig> {
    let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

    let config = Figment::new()
        .merge(Toml::file(config_dir.join("base.toml")))
        .merge(Toml::file(config_dir.join(environment_filename)))
        .merge(
            Env::raw()
                .only(&[API_KEY_ENV, AUDIENCE_ID_ENV])
                .map(|key| {
                    if key == API_KEY_ENV {
                        "provider_config.api_key".into()
                    } else if key == AUDIENCE_ID_ENV {
                        "provider_config.audience_id".into()
                    } else {
                        key.into()
                    }
                }),
        )
        .merge(Env::prefixed("APP_").split("__"))
        .extract()?;

    Ok(config)
}
