//! Charm-style CLI prompts using cliclack

use crate::commerce::{validate_access_token, validate_store_url, ConfigChecker};
use crate::config::EventsSettings;
use crate::error::ConfigError;
use crate::events::{EventMetadata, EventProvider, HttpEventsClient};
use crate::manifest::ProjectManifest;
use crate::naming::validate_action_name;
use crate::plugin::AioPluginInstaller;
use crate::product::ProductConfig;
use crate::version::validate_version;
use crate::wizard::{
    validate_required, EventsAccess, GuideMenuChoice, MainMenuChoice, PipelineOptions,
    ProjectDetails, StoreCredentials, Wizard, WizardPrompts,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const ACTION_NAME_PROMPT: &str =
    "What do you want to name the serverless runtime action for listening to selected event(s)?";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project folder; defaults to the current directory
    pub dest_folder: Option<PathBuf>,

    /// Generate from the manifest on disk without asking anything
    pub skip_prompt: bool,

    /// Generate from this manifest instead of running the wizard
    pub extension_manifest: Option<PathBuf>,
}

/// `WizardPrompts` rendered with cliclack
#[derive(Default)]
pub struct CliclackPrompts {
    spinner: Option<cliclack::ProgressBar>,
}

impl WizardPrompts for CliclackPrompts {
    fn overview(&mut self, text: &str) -> Result<()> {
        cliclack::note("Commerce Events Extension Template Overview", text)?;
        Ok(())
    }

    fn info(&mut self, message: &str) -> Result<()> {
        cliclack::log::info(message)?;
        Ok(())
    }

    fn warning(&mut self, message: &str) -> Result<()> {
        cliclack::log::warning(message)?;
        Ok(())
    }

    fn success(&mut self, message: &str) -> Result<()> {
        cliclack::log::success(message)?;
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        cliclack::log::error(message)?;
        Ok(())
    }

    fn start_progress(&mut self, message: &str) {
        let spinner = cliclack::spinner();
        spinner.start(message);
        self.spinner = Some(spinner);
    }

    fn stop_progress(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        }
    }

    fn project_details(&mut self, defaults: &ProjectDetails) -> Result<ProjectDetails> {
        let mut name = cliclack::input("What do you want to name your extension?")
            .validate(|input: &String| validate_required(input));
        if !defaults.name.is_empty() {
            name = name.default_input(&defaults.name);
        }
        let name: String = name.interact()?;

        let mut description =
            cliclack::input("Please provide a short description of your extension:")
                .validate(|input: &String| validate_required(input));
        if !defaults.description.is_empty() {
            description = description.default_input(&defaults.description);
        }
        let description: String = description.interact()?;

        let version: String = cliclack::input("What version would you like to start with?")
            .default_input(&defaults.version)
            .validate(|input: &String| validate_version(input))
            .interact()?;

        Ok(ProjectDetails {
            name,
            description,
            version,
        })
    }

    fn main_menu(&mut self, offer_plugin: bool) -> Result<MainMenuChoice> {
        let mut select = cliclack::select("What would you like to do next?")
            .item(
                MainMenuChoice::AddFromCommerceInstance,
                "Add event listener for the event provider configured in your Adobe Commerce store",
                "",
            )
            .item(
                MainMenuChoice::AddFromEventProvider,
                "Add event listener for an existing Commerce event provider",
                "",
            );

        if offer_plugin {
            select = select.item(
                MainMenuChoice::InstallPlugin,
                "Subscribe to events automatically during deployment",
                "",
            );
        }

        let choice = select
            .item(MainMenuChoice::Done, "I'm done", "")
            .item(MainMenuChoice::Guide, "I don't know", "")
            .interact()?;
        Ok(choice)
    }

    fn guide_menu(&mut self) -> Result<GuideMenuChoice> {
        let choice = cliclack::select("What about this then?")
            .item(GuideMenuChoice::DemoProject, "Try a demo project", "")
            .item(GuideMenuChoice::FindHelp, "Find some help", "")
            .item(GuideMenuChoice::GoBack, "Go back", "")
            .interact()?;
        Ok(choice)
    }

    fn store_credentials(&mut self) -> Result<StoreCredentials> {
        let store_url: String = cliclack::input("Enter Store URL:")
            .placeholder("https://")
            .validate(|input: &String| validate_store_url(input).map_err(|e| e.to_string()))
            .interact()?;

        let access_token: String = cliclack::input("Enter Access Token:")
            .validate(|input: &String| validate_access_token(input).map_err(|e| e.to_string()))
            .interact()?;

        Ok(StoreCredentials {
            store_url,
            access_token,
        })
    }

    fn confirm_retry(&mut self) -> Result<bool> {
        let retry = cliclack::confirm("Retry again?")
            .initial_value(false)
            .interact()?;
        Ok(retry)
    }

    fn select_provider(&mut self, providers: &[EventProvider]) -> Result<String> {
        let mut select =
            cliclack::select("Please select an event provider to fetch event codes of interest:");
        for provider in providers {
            select = select.item(provider.id.clone(), &provider.label, &provider.instance_id);
        }
        let provider_id = select.filter_mode().interact()?;
        Ok(provider_id)
    }

    fn select_events(&mut self, events: &[EventMetadata]) -> Result<Vec<usize>> {
        let mut multi = cliclack::multiselect("Select event codes of interest:");
        for (idx, event) in events.iter().enumerate() {
            multi = multi.item(idx, event.display_label(), "");
        }
        let selected = multi.required(false).interact()?;
        Ok(selected)
    }

    fn action_name(&mut self, default: Option<&str>, taken: bool) -> Result<String> {
        let message = if taken {
            format!("The name is already taken. {}", ACTION_NAME_PROMPT)
        } else {
            ACTION_NAME_PROMPT.to_string()
        };

        let mut input =
            cliclack::input(message).validate(|input: &String| validate_action_name(input));
        if let Some(default) = default {
            input = input.default_input(default);
        }
        let name: String = input.interact()?;
        Ok(name)
    }

    fn confirm_plugin_install(&mut self, plugin_name: &str) -> Result<bool> {
        let install = cliclack::confirm(format!(
            "Do you want to subscribe to specified events automatically during the deploy phase? \
             This will install {}.",
            plugin_name
        ))
        .initial_value(false)
        .interact()?;
        Ok(install)
    }

    fn confirm_open_docs(&mut self, _url: &str) -> Result<bool> {
        let open = cliclack::confirm("Open the documentation in your browser?")
            .initial_value(false)
            .interact()?;
        Ok(open)
    }

    fn show_manifest(&mut self, manifest_json: &str) -> Result<()> {
        cliclack::note("Extension Manifest for Code Pre-generation", manifest_json)?;
        Ok(())
    }

    fn next_steps(&mut self, steps: &[String]) -> Result<()> {
        println!();
        println!("  Next steps");
        println!();

        for (i, step) in steps.iter().enumerate() {
            println!("  {}.  {}", i + 1, step);
        }

        cliclack::outro("Sample code files have been generated.")?;
        Ok(())
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(format!("{} v{}", config.display_name(), cli_version))?;

    // Step 1: Resolve the project folder
    let project_dir = select_directory(&args)?;

    // Step 2: Load an injected manifest, if any
    let injected_manifest = match &args.extension_manifest {
        Some(path) => Some(load_injected_manifest(path)?),
        None => None,
    };

    // Step 3: Connect to I/O Events; only the listener paths need it
    let events = connect_events(config, &project_dir);
    if let Err(e) = &events {
        tracing::debug!("I/O Events access unavailable: {}", e);
    }

    // Step 4: Run the wizard pipeline
    let installer = AioPluginInstaller::new(config.plugin_name());
    let mut prompts = CliclackPrompts::default();
    let report = Wizard::new(
        config,
        &mut prompts,
        ConfigChecker::new(config.user_agent()),
        events,
        &installer,
    )
    .run(PipelineOptions {
        project_dir,
        skip_prompt: args.skip_prompt,
        injected_manifest,
    })
    .await?;

    tracing::debug!(
        "Generated {} file(s), manifest at {:?}",
        report.files.len(),
        report.manifest_path
    );
    Ok(())
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = match &args.dest_folder {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };

    if !path.exists() {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        cliclack::log::info(format!("Created directory: {}", path.display()))?;
    } else if !path.is_dir() {
        anyhow::bail!("Not a directory: {}", path.display());
    }

    Ok(path)
}

fn load_injected_manifest(path: &Path) -> Result<ProjectManifest> {
    if !path.is_file() {
        anyhow::bail!("Extension manifest not found: {}", path.display());
    }
    let manifest = ProjectManifest::load(path)?;
    cliclack::log::info(format!("Using extension manifest {}", path.display()))?;
    Ok(manifest)
}

fn connect_events<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
) -> Result<EventsAccess<HttpEventsClient>, ConfigError> {
    let settings = EventsSettings::from_env(config, project_dir)?;
    Ok(EventsAccess {
        client: HttpEventsClient::new(&settings, config.user_agent()),
        org_id: settings.project.org.id.clone(),
    })
}
