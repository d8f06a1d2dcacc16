//! Extension manifest types, merging and persistence

use crate::error::ManifestError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// File name of the extension manifest in the project folder
pub const MANIFEST_FILE: &str = "extension-manifest.json";

/// Run-scoped bookkeeping keys that must never reach the persisted manifest
pub const BOOKKEEPING_KEYS: &[&str] = &[
    "seenNames",
    "lastIndexByBaseName",
    "seenActionNames",
    "lastNameIdxs",
];

/// Manifest of the Slack demo project offered from the guide menu
const DEMO_MANIFEST: &str = include_str!("../templates/slack-demo/extension-manifest.json");

/// One runtime action listening to a set of event codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionManifestEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_provider_id: Option<String>,

    #[serde(default)]
    pub event_codes: Vec<String>,
}

impl ActionManifestEntry {
    pub fn new(
        name: impl Into<String>,
        event_provider_id: impl Into<String>,
        event_codes: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            event_provider_id: Some(event_provider_id.into()),
            event_codes,
        }
    }

    /// Action without events, generated when the user adds no listener
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event_provider_id: None,
            event_codes: Vec::new(),
        }
    }
}

/// Project descriptor: metadata plus the runtime actions to generate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Template folder of a demo project; generic stubs are used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_folder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_provider_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_actions: Option<Vec<ActionManifestEntry>>,

    /// Action inputs written into app.config.yaml
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_inputs: Option<Map<String, Value>>,

    /// Variables stubbed in .env
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dot_env_vars: Option<Vec<String>>,

    /// Keys this tool does not know about, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectManifest {
    /// Load a manifest; a missing file yields an empty manifest
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))
    }

    /// Manifest of the bundled demo project
    pub fn demo() -> Result<Self> {
        serde_json::from_str(DEMO_MANIFEST).context("Failed to parse demo manifest")
    }

    /// Write the manifest with two-space indentation
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content =
            serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        content.push('\n');
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn actions(&self) -> &[ActionManifestEntry] {
        self.runtime_actions.as_deref().unwrap_or_default()
    }

    pub fn action_names(&self) -> Vec<String> {
        self.actions().iter().map(|a| a.name.clone()).collect()
    }

    pub fn is_demo(&self) -> bool {
        self.template_folder.is_some()
    }

    /// Append an action entry, keeping insertion order.
    ///
    /// Names are allocated uniquely before reaching this point, so a duplicate
    /// or an empty event code list is an internal error.
    pub fn merge(&mut self, entry: ActionManifestEntry) -> Result<(), ManifestError> {
        if entry.event_codes.is_empty() {
            return Err(ManifestError::EmptyEventCodes { name: entry.name });
        }
        if self.actions().iter().any(|a| a.name == entry.name) {
            return Err(ManifestError::DuplicateActionName { name: entry.name });
        }
        self.runtime_actions.get_or_insert_with(Vec::new).push(entry);
        Ok(())
    }

    /// Add the `generic` placeholder when the manifest has no action list.
    ///
    /// An explicit empty `runtimeActions` list is left alone.
    pub fn ensure_fallback_action(&mut self, name: &str) -> bool {
        if self.runtime_actions.is_none() {
            self.runtime_actions = Some(vec![ActionManifestEntry::placeholder(name)]);
            return true;
        }
        false
    }

    /// Remove run-scoped bookkeeping keys before persisting
    pub fn strip_bookkeeping(&mut self) {
        for key in BOOKKEEPING_KEYS {
            self.extra.remove(*key);
        }
    }

    /// Distinct provider ids referenced by runtime actions, in first-seen order
    pub fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.actions().iter().filter_map(|a| a.event_provider_id.as_ref()) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}
