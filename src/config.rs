use std::{env, net::SocketAddr};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    /// Base for links embedded in notifications (`/trips/{id}/confirm`, ...).
    pub api_base_url: String,
    /// Base for redirect targets after a confirmation.
    pub web_base_url: String,
    pub mail_from_name: String,
    pub mail_from_address: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://planner.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3333".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let api_base_url = base_url(
            "API_BASE_URL",
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3333".to_string()),
        )?;
        let web_base_url = base_url(
            "WEB_BASE_URL",
            env::var("WEB_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        )?;

        let mail_from_name =
            env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "Trip Planner".to_string());
        let mail_from_address =
            env::var("MAIL_FROM_ADDRESS").unwrap_or_else(|_| "oi@planner.com".to_string());

        Ok(Self {
            database_url,
            listen_addr,
            api_base_url,
            web_base_url,
            mail_from_name,
            mail_from_address,
        })
    }
}

/// Checks that `raw` is an absolute URL and strips trailing slashes so paths
/// can be appended with a single `/`.
pub fn base_url(name: &str, raw: String) -> Result<String, AppError> {
    Url::parse(&raw).map_err(|err| AppError::Config(format!("invalid {name}: {err}")))?;
    Ok(raw.trim_end_matches('/').to_string())
}
