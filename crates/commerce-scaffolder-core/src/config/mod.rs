//! Local configuration: console project selection and API credentials

pub mod project;

pub use project::{
    EventsSettings, OrgConfig, ProjectConfig, WorkspaceConfig, ACCESS_TOKEN_ENV, API_KEY_ENV,
    PROJECT_CONFIG_FILE,
};
