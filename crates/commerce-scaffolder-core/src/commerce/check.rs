//! Adobe I/O Events configuration check against a Commerce store

use crate::error::CheckInputError;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

/// Path of the Commerce REST endpoint reporting the I/O Events configuration
pub const CHECK_CONFIGURATION_ENDPOINT: &str = "/rest/V1/adobe_io_events/check_configuration";

/// Timeout for the whole check request
const CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a configuration check. Exactly one applies per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCheckOutcome {
    /// Store reports a fully valid configuration
    Verified { provider_id: String },
    /// Service account private key check failed
    ServiceAccountInvalid,
    /// Workspace cannot connect to I/O Events
    WorkspaceInvalid,
    /// No event provider id configured in the store
    ProviderMissing,
    /// Configured provider id does not exist in the organization
    ProviderIdInvalid { provider_id: String },
    /// Non-2xx response
    RequestFailed { message: String },
    /// Network failure, timeout or undecodable response
    TransportError { message: String },
}

impl ConfigCheckOutcome {
    /// User-facing description of a failed check
    pub fn describe(&self) -> String {
        match self {
            ConfigCheckOutcome::Verified { provider_id } => {
                format!("Verified configuration for Adobe I/O Event Provider '{}'", provider_id)
            }
            ConfigCheckOutcome::ServiceAccountInvalid => {
                "Adobe I/O Service Account Private Key not valid".to_string()
            }
            ConfigCheckOutcome::WorkspaceInvalid => {
                "Adobe I/O Workspace Configuration not valid".to_string()
            }
            ConfigCheckOutcome::ProviderMissing => {
                "Adobe I/O Event Provider ID not found".to_string()
            }
            ConfigCheckOutcome::ProviderIdInvalid { provider_id } => format!(
                "Adobe I/O Event Provider ID '{}' doesn't exist in your organization",
                provider_id
            ),
            ConfigCheckOutcome::RequestFailed { message }
            | ConfigCheckOutcome::TransportError { message } => message.clone(),
        }
    }
}

/// Body returned by the check endpoint. A flag the store does not report counts as failed.
#[derive(Debug, Clone, Default, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    technical_service_account_configured: Option<bool>,
    #[serde(default)]
    technical_service_account_can_connect_to_io_events: Option<bool>,
    #[serde(default)]
    provider_id_configured: Option<String>,
    #[serde(default)]
    provider_id_valid: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

impl CheckResponse {
    fn classify(self) -> ConfigCheckOutcome {
        let provider_id = self.provider_id_configured.unwrap_or_default();

        if self.status.as_deref() == Some("ok") {
            return ConfigCheckOutcome::Verified { provider_id };
        }
        if self.technical_service_account_configured != Some(true) {
            return ConfigCheckOutcome::ServiceAccountInvalid;
        }
        if self.technical_service_account_can_connect_to_io_events != Some(true) {
            return ConfigCheckOutcome::WorkspaceInvalid;
        }
        if provider_id.is_empty() {
            return ConfigCheckOutcome::ProviderMissing;
        }
        if self.provider_id_valid != Some(true) {
            return ConfigCheckOutcome::ProviderIdInvalid { provider_id };
        }

        // Every flag passed but the store still refused the configuration
        ConfigCheckOutcome::RequestFailed {
            message: self.message.unwrap_or_else(|| {
                format!(
                    "Unexpected configuration status '{}'",
                    self.status.as_deref().unwrap_or("unknown")
                )
            }),
        }
    }
}

fn store_url_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(http|https)://.*$").ok())
        .as_ref()
}

fn access_token_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9]+$").ok())
        .as_ref()
}

/// Validate a store URL before it is submitted
pub fn validate_store_url(store_url: &str) -> Result<(), CheckInputError> {
    if store_url_pattern().is_some_and(|re| re.is_match(store_url)) {
        Ok(())
    } else {
        Err(CheckInputError::InvalidStoreUrl)
    }
}

/// Validate a Commerce integration access token before it is submitted
pub fn validate_access_token(access_token: &str) -> Result<(), CheckInputError> {
    if access_token_pattern().is_some_and(|re| re.is_match(access_token)) {
        Ok(())
    } else {
        Err(CheckInputError::InvalidAccessToken)
    }
}

/// Calls the Commerce configuration check endpoint and classifies the answer.
/// Never retries; the caller decides whether to ask again.
#[derive(Debug, Clone)]
pub struct ConfigChecker {
    client: reqwest::Client,
}

impl ConfigChecker {
    /// Create a new checker with a custom user agent
    pub fn new(user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(CHECK_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Build the check URL, tolerating a trailing slash on the store URL
    pub fn check_url(store_url: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}{}",
            store_url.trim_end_matches('/'),
            CHECK_CONFIGURATION_ENDPOINT
        ))
    }

    /// Check the I/O Events configuration of a Commerce store
    pub async fn check(
        &self,
        store_url: &str,
        access_token: &str,
    ) -> Result<ConfigCheckOutcome, CheckInputError> {
        validate_store_url(store_url)?;
        validate_access_token(access_token)?;

        let url = match Self::check_url(store_url) {
            Ok(url) => url,
            Err(e) => {
                return Ok(ConfigCheckOutcome::TransportError {
                    message: format!("Invalid store URL '{}': {}", store_url, e),
                })
            }
        };

        tracing::debug!("Checking I/O Events configuration at {}", url);

        let response = match self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return Ok(ConfigCheckOutcome::TransportError {
                    message: e.to_string(),
                })
            }
        };

        let status = response.status();
        tracing::debug!("Configuration check responded with HTTP {}", status);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Ok(ConfigCheckOutcome::TransportError {
                    message: e.to_string(),
                })
            }
        };

        if !status.is_success() {
            let message = serde_json::from_str::<CheckResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("Request failed with HTTP {}", status));
            return Ok(ConfigCheckOutcome::RequestFailed { message });
        }

        match serde_json::from_str::<CheckResponse>(&body) {
            Ok(parsed) => Ok(parsed.classify()),
            Err(e) => Ok(ConfigCheckOutcome::TransportError {
                message: format!("Unexpected configuration check response: {}", e),
            }),
        }
    }
}
