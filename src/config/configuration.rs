use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub test_url: String,
    pub max_pool_size: usize,
}

/// Settings shared by the `crm_jobs` commands.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSettings {
    pub graphql_endpoint: String,
    pub request_timeout_secs: u64,
    pub heartbeat_probe: bool,
    pub heartbeat_log: String,
    pub low_stock_log: String,
    pub order_reminders_log: String,
    pub report_log: String,
    pub low_stock_threshold: i32,
    pub low_stock_increment: i32,
    pub reminder_window_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jobs: JobSettings,
}

impl Settings {
    /// Reads `configuration.yaml` and layers `CRM_SECTION__KEY` variables on top,
    /// e.g. `CRM_JOBS__GRAPHQL_ENDPOINT`.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut s = Config::default();
        s.merge(File::with_name("configuration"))?;
        s.merge(Environment::with_prefix("CRM").separator("__"))?;
        s.try_into()
    }
}
