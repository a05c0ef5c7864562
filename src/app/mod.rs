pub mod serve;

// re-export
pub use serve::serve;

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, API_KEY_ENV, AUDIENCE_ID_ENV},
    contact_client::{AudienceId, ContactProvider, ResendClient},
    templ_manager::TemplateManager,
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Resolves everything the handlers need from `config` and binds the listener.
    ///
    /// Missing provider settings don't stop the app from starting, the subscription
    /// endpoint reports them on every request instead.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let provider_config = &config.provider_config;

        let contact_provider: Option<Box<dyn ContactProvider>> = match provider_config.api_key() {
            Some(api_key) => Some(Box::new(ResendClient::new(
                &provider_config.base_url,
                api_key.clone(),
                provider_config.timeout(),
            )?)),
            None => {
                warn!("{API_KEY_ENV} is not set, subscriptions will fail");
                None
            }
        };
        let audience_id = provider_config.audience_id();
        if audience_id.is_none() {
            warn!("{AUDIENCE_ID_ENV} is not set, subscriptions will fail");
        }

        let tm = TemplateManager::init();

        let app_state = AppState::new(
            tm,
            contact_provider,
            audience_id,
            config.net_config.success_path,
        );

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

pub struct InternalState {
    pub templ_mgr: TemplateManager,
    /// `None` when no API key was configured.
    pub contact_provider: Option<Box<dyn ContactProvider>>,
    pub audience_id: Option<AudienceId>,
    pub success_path: String,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(
        templ_mgr: TemplateManager,
        contact_provider: Option<Box<dyn ContactProvider>>,
        audience_id: Option<AudienceId>,
        success_path: String,
    ) -> Self {
        AppState(Arc::new(InternalState {
            templ_mgr,
            contact_provider,
            audience_id,
            success_path,
        }))
    }
}
