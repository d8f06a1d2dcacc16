//! Project generation from a finalized extension manifest

mod actions;
mod dotenv;

pub use actions::{
    update_app_config, write_action_files, ACTION_FOLDER, APP_CONFIG_FILE, DEFAULT_RUNTIME_KIND,
};
pub use dotenv::{append_dot_env, dot_env_vars, DOT_ENV_FILE, PREFERRED_PROVIDERS_VAR};

use crate::manifest::ProjectManifest;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Package name in app.config.yaml: the manifest id, else the folder name
pub fn package_name(manifest: &ProjectManifest, target_dir: &Path) -> String {
    manifest
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .or_else(|| {
            target_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "extension".to_string())
}

/// Files touched by one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generated {
    /// Project-relative paths written
    pub files: Vec<String>,
    /// Handlers and app.config.yaml entries that already existed and were kept
    pub skipped: Vec<String>,
}

/// Generate action handlers, runtime config and .env stubs.
///
/// Existing handlers and configured actions are never rewritten.
pub async fn generate(manifest: &ProjectManifest, target_dir: &Path) -> Result<Generated> {
    fs::create_dir_all(target_dir)
        .await
        .context("Failed to create target directory")?;

    let mut generated = write_action_files(manifest, target_dir).await?;

    let package = package_name(manifest, target_dir);
    let configured = update_app_config(manifest, target_dir, &package).await?;
    generated.files.push(APP_CONFIG_FILE.to_string());
    generated.skipped.extend(
        configured
            .into_iter()
            .map(|name| format!("{} ({})", APP_CONFIG_FILE, name)),
    );

    let added = append_dot_env(manifest, target_dir).await?;
    if !added.is_empty() {
        generated.files.push(DOT_ENV_FILE.to_string());
    }

    tracing::debug!(
        "Generated {} file(s), kept {} existing for package '{}' in {}",
        generated.files.len(),
        generated.skipped.len(),
        package,
        target_dir.display()
    );
    Ok(generated)
}
