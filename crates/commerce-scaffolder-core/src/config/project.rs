//! Adobe Developer Console project configuration and I/O Events credentials

use crate::error::ConfigError;
use crate::product::ProductConfig;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// File written by `aio app use` holding the selected console project
pub const PROJECT_CONFIG_FILE: &str = ".aio";

/// Environment variable holding the IMS access token for the I/O Events API
pub const ACCESS_TOKEN_ENV: &str = "AIO_EVENTS_ACCESS_TOKEN";

/// Environment variable holding the workspace credential client id (API key)
pub const API_KEY_ENV: &str = "AIO_EVENTS_API_KEY";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OrgConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub ims_org_id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub id: String,
    pub name: String,
}

/// The `project` node of the `.aio` file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProjectConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub org: OrgConfig,
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Deserialize)]
struct AioFile {
    project: Option<ProjectConfig>,
}

impl ProjectConfig {
    /// Load the project configuration from `<dir>/.aio`
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(PROJECT_CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Err(ConfigError::MissingProjectConfig { path }),
        };

        let file: AioFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidProjectConfig {
                path: path.clone(),
                error: e.to_string(),
            })?;

        file.project
            .ok_or(ConfigError::MissingProjectConfig { path })
    }
}

/// Everything needed to call the I/O Events API for one organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsSettings {
    pub base_url: Url,
    pub access_token: String,
    pub api_key: String,
    pub project: ProjectConfig,
}

impl EventsSettings {
    /// Resolve settings from the project folder and the environment
    pub fn from_env<C: ProductConfig>(config: &C, dir: &Path) -> Result<Self, ConfigError> {
        Self::resolve(config, dir, |var| std::env::var(var).ok())
    }

    /// Resolve settings with an explicit variable lookup
    pub fn resolve<C, F>(config: &C, dir: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        C: ProductConfig,
        F: Fn(&str) -> Option<String>,
    {
        let project = ProjectConfig::load(dir)?;

        let url_str = lookup(config.events_api_url_env())
            .unwrap_or_else(|| config.default_events_api_url().to_string());
        let base_url =
            Url::parse(&url_str).map_err(|_| ConfigError::InvalidApiUrl { url: url_str })?;

        let access_token = lookup(ACCESS_TOKEN_ENV)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCredential {
                var: ACCESS_TOKEN_ENV,
            })?;
        let api_key = lookup(API_KEY_ENV)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCredential { var: API_KEY_ENV })?;

        Ok(Self {
            base_url,
            access_token,
            api_key,
            project,
        })
    }
}
