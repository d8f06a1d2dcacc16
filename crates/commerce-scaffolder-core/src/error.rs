//! Error types for the scaffolder
//!
//! Domain-specific error types using thiserror. Orchestration code wraps
//! these in `anyhow::Error` with context.

use std::path::PathBuf;
use thiserror::Error;

/// Local configuration errors (fatal preconditions)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No Adobe Developer Console project configuration in the working folder
    #[error(
        "Incomplete .aio configuration at {path}, please import a valid Adobe Developer Console \
         configuration via `aio app use` first."
    )]
    MissingProjectConfig { path: PathBuf },

    /// The project configuration exists but could not be parsed
    #[error("Failed to parse project configuration {path}: {error}")]
    InvalidProjectConfig { path: PathBuf, error: String },

    /// A required credential environment variable is unset
    #[error("Missing credentials: set the {var} environment variable")]
    MissingCredential { var: &'static str },

    /// The I/O Events API URL is not a valid URL
    #[error("Invalid I/O Events API URL: {url}")]
    InvalidApiUrl { url: String },
}

/// Store credentials rejected before any request is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckInputError {
    #[error("Invalid Web URL!")]
    InvalidStoreUrl,

    #[error("Invalid Access Token!")]
    InvalidAccessToken,
}

/// I/O Events API errors
#[derive(Error, Debug)]
pub enum EventsError {
    /// Provider list is empty after filtering
    #[error(
        "Event providers list is empty. You need to specify at least one provider to select from."
    )]
    NoProvidersAvailable,

    /// Event metadata could not be fetched for a provider
    #[error("Failed to fetch event codes for provider '{provider_id}': {message}")]
    ProviderLookupFailed { provider_id: String, message: String },

    /// Any other failed API call
    #[error("I/O Events API request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The selected provider id is not part of the offered list
    #[error("Selected event provider '{provider_id}' is not in the provider list")]
    UnknownProvider { provider_id: String },
}

/// Manifest invariant violations (programming errors, never user input)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("Internal error: runtime action '{name}' already exists in the manifest")]
    DuplicateActionName { name: String },

    #[error("Internal error: runtime action '{name}' has no event codes")]
    EmptyEventCodes { name: String },
}
