//! The generation pipeline: load, ask, finalize, persist, scaffold

use super::{ProjectDetails, Session, Wizard, WizardPrompts};
use crate::events::{slugify, EventsClient};
use crate::manifest::{ProjectManifest, MANIFEST_FILE};
use crate::naming::GENERIC_ACTION_NAME;
use crate::plugin::PluginInstaller;
use crate::product::ProductConfig;
use crate::scaffold;
use crate::version::DEFAULT_EXTENSION_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Options shaping one run
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Project folder holding the manifest and receiving the generated files
    pub project_dir: PathBuf,

    /// Generate from the manifest on disk without asking anything
    pub skip_prompt: bool,

    /// Manifest to generate from instead of asking; it is not written back
    pub injected_manifest: Option<ProjectManifest>,
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub manifest: ProjectManifest,
    /// `None` when the manifest was injected
    pub manifest_path: Option<PathBuf>,
    pub files: Vec<String>,
    /// Existing handlers and app.config.yaml entries left untouched
    pub skipped: Vec<String>,
}

impl<C, P, E, I> Wizard<'_, C, P, E, I>
where
    C: ProductConfig,
    P: WizardPrompts,
    E: EventsClient,
    I: PluginInstaller,
{
    /// Run every stage in order
    pub async fn run(mut self, options: PipelineOptions) -> Result<PipelineReport> {
        let manifest_path = options.project_dir.join(MANIFEST_FILE);

        let (manifest, persist) = match options.injected_manifest {
            Some(manifest) => {
                tracing::debug!("Using injected extension manifest");
                (finalize(manifest, None), false)
            }
            None => {
                let manifest = ProjectManifest::load(&manifest_path)?;
                let manifest = if options.skip_prompt {
                    finalize(manifest, None)
                } else {
                    self.prompts.overview(self.config.overview())?;
                    let manifest = self.ask_project_details(manifest)?;
                    let mut session = Session::start(&manifest);
                    let mut manifest = manifest;
                    let exit = self.main_menu(&mut session, &mut manifest).await?;
                    tracing::debug!("Main menu ended with {:?}", exit);
                    finalize(manifest, Some(session))
                };
                (manifest, true)
            }
        };

        let manifest_path = if persist {
            manifest.save(&manifest_path)?;
            Some(manifest_path)
        } else {
            None
        };

        let json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        self.prompts.show_manifest(&json)?;

        let generated = self.scaffold(&manifest, &options.project_dir).await?;
        self.prompts.next_steps(&self.config.next_steps())?;

        Ok(PipelineReport {
            manifest,
            manifest_path,
            files: generated.files,
            skipped: generated.skipped,
        })
    }

    /// Ask name, description and version until they are valid
    fn ask_project_details(&mut self, mut manifest: ProjectManifest) -> Result<ProjectManifest> {
        let defaults = ProjectDetails {
            name: manifest.name.clone().unwrap_or_default(),
            description: manifest.description.clone().unwrap_or_default(),
            version: manifest
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTENSION_VERSION.to_string()),
        };

        let details = loop {
            let details = self.prompts.project_details(&defaults)?;
            match details.validate() {
                Ok(()) => break details,
                Err(message) => self.prompts.error(&message)?,
            }
        };

        manifest.id = Some(slugify(&details.name));
        manifest.name = Some(details.name);
        manifest.description = Some(details.description);
        manifest.version = Some(details.version);
        Ok(manifest)
    }

    async fn scaffold(
        &mut self,
        manifest: &ProjectManifest,
        project_dir: &std::path::Path,
    ) -> Result<scaffold::Generated> {
        self.prompts.start_progress("Generating project files...");
        match scaffold::generate(manifest, project_dir).await {
            Ok(generated) => {
                self.prompts.stop_progress(&format!(
                    "Generated {} file(s) in {}",
                    generated.files.len(),
                    project_dir.display()
                ));
                if !generated.skipped.is_empty() {
                    self.prompts.info(&format!(
                        "Kept existing code, not regenerated:\n{}",
                        generated.skipped.join("\n")
                    ))?;
                }
                Ok(generated)
            }
            Err(e) => {
                self.prompts.stop_progress("Failed to generate project files");
                Err(e)
            }
        }
    }
}

/// Close the session and prepare the manifest for writing: drop the naming
/// state, strip bookkeeping keys and add the fallback action when there is
/// no action list.
fn finalize(mut manifest: ProjectManifest, session: Option<Session>) -> ProjectManifest {
    drop(session);
    manifest.strip_bookkeeping();
    if manifest.ensure_fallback_action(GENERIC_ACTION_NAME) {
        tracing::debug!("No runtime action added, using the '{}' placeholder", GENERIC_ACTION_NAME);
    }
    manifest
}
