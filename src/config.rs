use std::net::IpAddr;
use std::time::Duration;

use crate::api::normalize_base_url;

#[derive(Debug, Clone)]
pub struct Config {
    /// Effective backend base URL, already normalized.
    pub api_url: String,
    pub api_timeout: Option<Duration>,
    pub host: IpAddr,
    pub port: u16,
    pub secure_cookies: bool,
    pub max_upload_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_url = normalize_base_url(lookup("CRM_API_URL").as_deref());

        let api_timeout = match lookup("CRM_API_TIMEOUT_SECS") {
            Some(secs) => Some(Duration::from_secs(
                secs.trim()
                    .parse()
                    .map_err(|e| format!("Invalid CRM_API_TIMEOUT_SECS: {e}"))?,
            )),
            None => None,
        };

        let host: IpAddr = env_or("CRM_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CRM_HOST: {e}"))?;

        let port: u16 = env_or("CRM_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CRM_PORT: {e}"))?;

        let secure_cookies = match env_or("CRM_SECURE_COOKIES", "false").to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => return Err(format!("Invalid CRM_SECURE_COOKIES: {other}")),
        };

        let max_upload_size: usize = env_or("CRM_MAX_UPLOAD_SIZE", "5242880")
            .parse()
            .map_err(|e| format!("Invalid CRM_MAX_UPLOAD_SIZE: {e}"))?;

        let log_level = env_or("CRM_LOG_LEVEL", "info");

        Ok(Config {
            api_url,
            api_timeout,
            host,
            port,
            secure_cookies,
            max_upload_size,
            log_level,
        })
    }

    /// Defaults pointed at the given backend. Used by tools and tests.
    pub fn for_api(url: &str) -> Self {
        Config {
            api_url: normalize_base_url(Some(url)),
            api_timeout: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            secure_cookies: false,
            max_upload_size: 5 * 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}
