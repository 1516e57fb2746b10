//! Client configuration: application identity, credentials and base URLs.
//!
//! Credentials are checked lazily, when a request needs them, so a client
//! configured for only one of the two APIs can still use that one.

use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

pub const MAIN_API_BASE_URL: &str = "https://orderdaily.nl";
pub const PARTNER_API_BASE_URL: &str = "https://partner.orderdaily.nl";

/// Prefix of the `User-Agent` header; the application name follows it.
pub const USER_AGENT_PREFIX: &str = "orderdaily-api-rust/";

const ENV_APPLICATION_NAME: &str = "ORDERDAILY_APPLICATION_NAME";
const ENV_MAIN_API_KEY: &str = "ORDERDAILY_MAIN_API_KEY";
const ENV_PARTNER_API_KEY: &str = "ORDERDAILY_PARTNER_API_KEY";
const ENV_MAIN_BASE_URL: &str = "ORDERDAILY_MAIN_BASE_URL";
const ENV_PARTNER_BASE_URL: &str = "ORDERDAILY_PARTNER_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub application_name: String,
    pub main_api_key: String,
    pub partner_api_key: String,
    #[serde(deserialize_with = "base_url")]
    pub main_base_url: String,
    #[serde(deserialize_with = "base_url")]
    pub partner_base_url: String,
}

/// Base URLs are stored without a trailing `/`, however they were supplied.
fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn base_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|url| trim_base_url(&url))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            application_name: String::new(),
            main_api_key: String::new(),
            partner_api_key: String::new(),
            main_base_url: MAIN_API_BASE_URL.to_string(),
            partner_base_url: PARTNER_API_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn new(application_name: &str) -> Self {
        Self::default().with_application_name(application_name)
    }

    /// Reads `ORDERDAILY_*` environment variables. Unset credentials stay
    /// empty; unset base URLs keep the production defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(name) = lookup(ENV_APPLICATION_NAME) {
            config.application_name = name;
        }
        if let Some(key) = lookup(ENV_MAIN_API_KEY) {
            config.main_api_key = key;
        }
        if let Some(key) = lookup(ENV_PARTNER_API_KEY) {
            config.partner_api_key = key;
        }
        if let Some(url) = lookup(ENV_MAIN_BASE_URL) {
            config = config.with_main_base_url(&url);
        }
        if let Some(url) = lookup(ENV_PARTNER_BASE_URL) {
            config = config.with_partner_base_url(&url);
        }
        config
    }

    pub fn with_application_name(mut self, name: &str) -> Self {
        self.application_name = name.to_string();
        self
    }

    pub fn with_main_api_key(mut self, key: &str) -> Self {
        self.main_api_key = key.to_string();
        self
    }

    pub fn with_partner_api_key(mut self, key: &str) -> Self {
        self.partner_api_key = key.to_string();
        self
    }

    pub fn with_main_base_url(mut self, url: &str) -> Self {
        self.main_base_url = trim_base_url(url);
        self
    }

    pub fn with_partner_base_url(mut self, url: &str) -> Self {
        self.partner_base_url = trim_base_url(url);
        self
    }

    /// Headers for the main API: bearer token, user agent, JSON content type.
    pub fn main_headers(&self) -> Result<Vec<(String, String)>, ApiError> {
        let agent = self.user_agent()?;
        if self.main_api_key.is_empty() {
            return Err(ApiError::MissingMainApiKey);
        }
        Ok(headers(format!("Bearer {}", self.main_api_key), agent))
    }

    /// Headers for the partner API. The key is sent without a scheme.
    pub fn partner_headers(&self) -> Result<Vec<(String, String)>, ApiError> {
        let agent = self.user_agent()?;
        if self.partner_api_key.is_empty() {
            return Err(ApiError::MissingPartnerApiKey);
        }
        Ok(headers(self.partner_api_key.clone(), agent))
    }

    fn user_agent(&self) -> Result<String, ApiError> {
        if self.application_name.is_empty() {
            return Err(ApiError::MissingApplicationName);
        }
        Ok(format!("{USER_AGENT_PREFIX}{}", self.application_name))
    }
}

fn headers(authorization: String, user_agent: String) -> Vec<(String, String)> {
    vec![
        ("Authorization".to_string(), authorization),
        ("User-Agent".to_string(), user_agent),
        ("Content-Type".to_string(), "application/json".to_string()),
    ]
}
