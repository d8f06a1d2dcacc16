//! Action handler files and app.config.yaml runtime manifest entries

use super::Generated;
use crate::manifest::{ActionManifestEntry, ProjectManifest};
use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tokio::fs;

/// Folder holding one sub-folder per runtime action
pub const ACTION_FOLDER: &str = "actions";

/// App Builder project configuration file
pub const APP_CONFIG_FILE: &str = "app.config.yaml";

/// Runtime kind of the generated actions
pub const DEFAULT_RUNTIME_KIND: &str = "nodejs:16";

const GENERIC_ACTION_TEMPLATE: &str = include_str!("../../templates/generic/stub-action.js");
const SLACK_DEMO_ACTION_TEMPLATE: &str = include_str!("../../templates/slack-demo/action.js");

/// Pick the handler template for the manifest
fn action_template(manifest: &ProjectManifest) -> Result<&'static str> {
    match manifest.template_folder.as_deref() {
        None => Ok(GENERIC_ACTION_TEMPLATE),
        Some("slack-demo") => Ok(SLACK_DEMO_ACTION_TEMPLATE),
        Some(other) => anyhow::bail!("Unknown template folder: {}", other),
    }
}

/// Fill the template placeholders for one action
fn render_action(template: &str, action: &ActionManifestEntry) -> String {
    let codes = if action.event_codes.is_empty() {
        "(no event codes yet)".to_string()
    } else {
        action.event_codes.join(", ")
    };
    template
        .replace("{{ACTION_NAME}}", &action.name)
        .replace("{{EVENT_CODES}}", &codes)
}

/// Write `actions/<name>/index.js` for every runtime action.
///
/// A handler already on disk holds user code and is left as is.
pub async fn write_action_files(
    manifest: &ProjectManifest,
    target_dir: &Path,
) -> Result<Generated> {
    let template = action_template(manifest)?;
    let mut generated = Generated::default();

    for action in manifest.actions() {
        let relative = format!("{}/{}/index.js", ACTION_FOLDER, action.name);
        let target_path = target_dir.join(&relative);
        if fs::try_exists(&target_path)
            .await
            .with_context(|| format!("Failed to access file: {}", target_path.display()))?
        {
            tracing::debug!("Keeping existing handler {}", relative);
            generated.skipped.push(relative);
            continue;
        }

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, render_action(template, action))
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;
        generated.files.push(relative);
    }

    Ok(generated)
}

/// Inputs passed to every action: the demo's own, or the generic defaults
fn action_inputs(manifest: &ProjectManifest) -> Result<Value> {
    match (&manifest.template_folder, &manifest.template_inputs) {
        (Some(_), Some(inputs)) => {
            serde_yaml::to_value(inputs).context("Failed to convert template inputs")
        }
        (Some(_), None) => Ok(Value::Mapping(Mapping::new())),
        (None, _) => {
            let mut inputs = Mapping::new();
            inputs.insert("LOG_LEVEL".into(), "debug".into());
            inputs.insert("API_ENDPOINT".into(), "$API_ENDPOINT".into());
            Ok(Value::Mapping(inputs))
        }
    }
}

/// Get a child mapping, creating it when absent
fn child_mapping<'a>(map: &'a mut Mapping, key: &str) -> Result<&'a mut Mapping> {
    if !map.contains_key(key) {
        map.insert(key.into(), Value::Mapping(Mapping::new()));
    }
    match map.get_mut(key) {
        Some(Value::Mapping(child)) => Ok(child),
        _ => anyhow::bail!("'{}' in {} is not a mapping", key, APP_CONFIG_FILE),
    }
}

fn action_config(action: &ActionManifestEntry, inputs: &Value) -> Value {
    let mut annotations = Mapping::new();
    annotations.insert("final".into(), true.into());
    annotations.insert("require-adobe-auth".into(), false.into());

    let mut relations = Mapping::new();
    relations.insert(
        "event-listener-for".into(),
        Value::Sequence(action.event_codes.iter().map(|c| c.as_str().into()).collect()),
    );

    let mut config = Mapping::new();
    config.insert(
        "function".into(),
        format!("{}/{}/index.js", ACTION_FOLDER, action.name).into(),
    );
    config.insert("web".into(), "no".into());
    config.insert("runtime".into(), DEFAULT_RUNTIME_KIND.into());
    config.insert("inputs".into(), inputs.clone());
    config.insert("annotations".into(), Value::Mapping(annotations));
    config.insert("relations".into(), Value::Mapping(relations));
    Value::Mapping(config)
}

/// Add runtime actions missing from `app.config.yaml`, keeping every existing entry.
///
/// Returns the names of the actions that were already configured.
pub async fn update_app_config(
    manifest: &ProjectManifest,
    target_dir: &Path,
    package_name: &str,
) -> Result<Vec<String>> {
    let path = target_dir.join(APP_CONFIG_FILE);
    let mut root: Value = match fs::read_to_string(&path).await {
        Ok(content) if !content.trim().is_empty() => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?,
        _ => Value::Mapping(Mapping::new()),
    };

    let Value::Mapping(root_map) = &mut root else {
        anyhow::bail!("{} must contain a mapping", path.display());
    };

    let inputs = action_inputs(manifest)?;
    let application = child_mapping(root_map, "application")?;
    application.insert("actions".into(), ACTION_FOLDER.into());

    let package = child_mapping(
        child_mapping(child_mapping(application, "runtimeManifest")?, "packages")?,
        package_name,
    )?;
    if !package.contains_key("license") {
        package.insert("license".into(), "Apache-2.0".into());
    }
    let actions = child_mapping(package, "actions")?;

    let mut configured = Vec::new();
    for action in manifest.actions() {
        if actions.contains_key(action.name.as_str()) {
            configured.push(action.name.clone());
            continue;
        }
        actions.insert(action.name.as_str().into(), action_config(action, &inputs));
    }

    let content = serde_yaml::to_string(&root).context("Failed to serialize app config")?;
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(configured)
}
