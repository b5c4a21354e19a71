pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod ton;

use crate::config::AppConfig;
use crate::ton::TonClient;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub ton: TonClient,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
