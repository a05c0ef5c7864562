//! A small web service for a course landing page: it serves the page and adds
//! subscribers to a contact list kept by a third-party provider.

pub mod app;
pub mod config;
pub mod contact_client;
mod error;
pub mod templ_manager;
pub mod web;

pub use app::{serve, App, AppState};
pub use contact_client::{ContactProvider, ResendClient};
pub use error::{Error, Result};

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Console tracing for development, defaults to the `debug` level unless `RUST_LOG` says otherwise.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .init();
}

/// Tracing for production, defaults to the `info` level unless `RUST_LOG` says otherwise.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
