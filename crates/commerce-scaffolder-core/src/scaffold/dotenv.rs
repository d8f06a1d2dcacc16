//! Commented `.env` stubs for variables the actions read

use crate::manifest::ProjectManifest;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

pub const DOT_ENV_FILE: &str = ".env";

const DOT_ENV_HEADER: &str = "## Place your local environment variables here";

/// Variable listing the providers the actions were generated for
pub const PREFERRED_PROVIDERS_VAR: &str = "PREFERRED_PROVIDERS";

/// Variables to stub in .env, with a value when one is known
pub fn dot_env_vars(manifest: &ProjectManifest) -> Vec<(String, Option<String>)> {
    if let Some(vars) = &manifest.template_dot_env_vars {
        return vars.iter().map(|v| (v.clone(), None)).collect();
    }

    let mut vars = vec![("API_ENDPOINT".to_string(), None)];
    let providers = manifest.provider_ids();
    if !providers.is_empty() {
        vars.push((PREFERRED_PROVIDERS_VAR.to_string(), Some(providers.join(","))));
    }
    vars
}

/// Whether `content` already defines `var`, commented out or not
fn defines(content: &str, var: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim_start().trim_start_matches('#').trim_start();
        line.strip_prefix(var)
            .is_some_and(|rest| rest.trim_start().starts_with('='))
    })
}

/// Append stubs for variables not yet present; returns the names added
pub async fn append_dot_env(manifest: &ProjectManifest, target_dir: &Path) -> Result<Vec<String>> {
    let path = target_dir.join(DOT_ENV_FILE);
    let mut content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let mut added = Vec::new();
    let mut stubs = String::new();
    for (var, value) in dot_env_vars(manifest) {
        if defines(&content, &var) {
            continue;
        }
        match value {
            // Provider ids are known, so this one is written active
            Some(value) => stubs.push_str(&format!("{}={}\n", var, value)),
            None => stubs.push_str(&format!("#{}=\n", var)),
        }
        added.push(var);
    }

    if added.is_empty() {
        return Ok(added);
    }

    if !content.contains(DOT_ENV_HEADER) {
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(DOT_ENV_HEADER);
        content.push('\n');
    } else if !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&stubs);

    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(added)
}
