//! Interactive wizard: menus, listener workflows and the generation pipeline
//!
//! The wizard talks to the user only through [`WizardPrompts`], so the same
//! flow runs against the cliclack front end and against scripted answers.
//! Remote access goes through [`EventsClient`] and [`ConfigChecker`], and the
//! optional plugin through [`PluginInstaller`].

mod check_flow;
mod listener;
mod menu;
mod pipeline;
mod session;

pub use check_flow::CheckState;
pub use menu::MenuExit;
pub use pipeline::{PipelineOptions, PipelineReport};
pub use session::Session;

use crate::commerce::ConfigChecker;
use crate::error::ConfigError;
use crate::events::{EventMetadata, EventProvider, EventsClient};
use crate::plugin::PluginInstaller;
use crate::product::ProductConfig;
use anyhow::Result;

/// Commerce store URL and integration access token typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCredentials {
    pub store_url: String,
    pub access_token: String,
}

/// Top-level extension fields asked before the main menu
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDetails {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl ProjectDetails {
    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.name)?;
        validate_required(&self.description)?;
        crate::version::validate_version(&self.version)
    }
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MainMenuChoice {
    AddFromCommerceInstance,
    AddFromEventProvider,
    InstallPlugin,
    Done,
    Guide,
}

/// Guide menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideMenuChoice {
    DemoProject,
    FindHelp,
    GoBack,
}

/// Required free-text answer
pub fn validate_required(answer: &str) -> Result<(), String> {
    if answer.trim().is_empty() {
        return Err("Required.".to_string());
    }
    Ok(())
}

/// Every question and message the wizard needs from a front end
pub trait WizardPrompts {
    /// Template overview shown once before the first question
    fn overview(&mut self, text: &str) -> Result<()>;

    fn info(&mut self, message: &str) -> Result<()>;
    fn warning(&mut self, message: &str) -> Result<()>;
    fn success(&mut self, message: &str) -> Result<()>;
    fn error(&mut self, message: &str) -> Result<()>;

    /// Start a progress indicator for a network call
    fn start_progress(&mut self, message: &str);

    /// Stop the running progress indicator, if any
    fn stop_progress(&mut self, message: &str);

    fn project_details(&mut self, defaults: &ProjectDetails) -> Result<ProjectDetails>;

    /// `offer_plugin` adds the plugin subscription entry
    fn main_menu(&mut self, offer_plugin: bool) -> Result<MainMenuChoice>;

    fn guide_menu(&mut self) -> Result<GuideMenuChoice>;

    fn store_credentials(&mut self) -> Result<StoreCredentials>;

    /// Ask whether to retry a failed configuration check (default no)
    fn confirm_retry(&mut self) -> Result<bool>;

    /// Choose among several providers; returns the chosen provider id
    fn select_provider(&mut self, providers: &[EventProvider]) -> Result<String>;

    /// Choose any number of events; returns indices into `events`
    fn select_events(&mut self, events: &[EventMetadata]) -> Result<Vec<usize>>;

    /// Ask for a runtime action name. `taken` means the previous answer
    /// collided with an existing action.
    fn action_name(&mut self, default: Option<&str>, taken: bool) -> Result<String>;

    fn confirm_plugin_install(&mut self, plugin_name: &str) -> Result<bool>;

    fn confirm_open_docs(&mut self, url: &str) -> Result<bool>;

    /// Print the manifest that is about to be generated
    fn show_manifest(&mut self, manifest_json: &str) -> Result<()>;

    fn next_steps(&mut self, steps: &[String]) -> Result<()>;
}

/// I/O Events client bound to the organization of the console project
#[derive(Debug, Clone)]
pub struct EventsAccess<E> {
    pub client: E,
    pub org_id: String,
}

/// Borrow the events access, surfacing the configuration error when it is
/// missing. Only the paths that talk to I/O Events need it.
fn events_access<E>(events: &Result<EventsAccess<E>, ConfigError>) -> Result<&EventsAccess<E>> {
    events
        .as_ref()
        .map_err(|e| anyhow::Error::new(e.clone()))
}

/// One interactive run with its collaborators
pub struct Wizard<'a, C, P, E, I> {
    config: &'a C,
    prompts: &'a mut P,
    checker: ConfigChecker,
    events: Result<EventsAccess<E>, ConfigError>,
    installer: &'a I,
}

impl<'a, C, P, E, I> Wizard<'a, C, P, E, I>
where
    C: ProductConfig,
    P: WizardPrompts,
    E: EventsClient,
    I: PluginInstaller,
{
    pub fn new(
        config: &'a C,
        prompts: &'a mut P,
        checker: ConfigChecker,
        events: Result<EventsAccess<E>, ConfigError>,
        installer: &'a I,
    ) -> Self {
        Self {
            config,
            prompts,
            checker,
            events,
            installer,
        }
    }

    fn doc_hint(&mut self, url: &str) -> Result<()> {
        self.prompts.info(&format!(
            "To fix the issue, refer to this URL and try again:\n-> {}",
            url
        ))
    }
}
