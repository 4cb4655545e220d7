pub mod model;

use crate::error::ConfigError;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const ENV_VAR_PREFIX: &str = "FLIGHT_STATS__";
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub api: Option<ApiConfig>,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub listen_addr: String,
}

/// Default policy values for the report endpoints. Per-request query
/// parameters may override the threshold; keeping the defaults in one place
/// means the two high-occupancy reports share one definition.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub high_occupancy_threshold: f64,
    pub min_run_length: usize,
    pub top_routes_per_country: usize,
    pub min_altitude_delta: i32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            high_occupancy_threshold: 0.85,
            min_run_length: 2,
            top_routes_per_country: 5,
            min_altitude_delta: 1000,
        }
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file(SETTINGS_FILE))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
        .extract::<Config>()?)
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Config(#[from] ConfigError),
    }
}

pub async fn shutdown_listener(token: Option<CancellationToken>) {
    let ctrl_c = signal::ctrl_c();
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(name: "signal.ctrlc.received", "received Ctrl+C signal, shutting down"),
        _ = terminate => info!(name: "signal.sigterm.received", "received SIGTERM signal, shutting down"),
    }

    if let Some(token) = token {
        token.cancel();
    }
}
