//! Test doubles shared by the unit tests

use crate::error::EventsError;
use crate::events::{EventMetadata, EventMetadataRecord, EventProvider, EventsClient, ProviderRecord};
use crate::plugin::PluginInstaller;
use crate::product::ProductConfig;
use crate::wizard::{
    GuideMenuChoice, MainMenuChoice, ProjectDetails, StoreCredentials, WizardPrompts,
};
use anyhow::Result;
use std::cell::Cell;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct TestProduct;

impl ProductConfig for TestProduct {
    fn name(&self) -> &'static str {
        "test-events"
    }

    fn display_name(&self) -> &'static str {
        "Test Events"
    }

    fn overview(&self) -> &'static str {
        "Test overview"
    }

    fn docs_url(&self) -> &'static str {
        "https://docs.example.com/events"
    }

    fn commerce_integration_doc_url(&self) -> &'static str {
        "https://docs.example.com/integration"
    }

    fn commerce_configuration_doc_url(&self) -> &'static str {
        "https://docs.example.com/configure"
    }

    fn default_events_api_url(&self) -> &'static str {
        "https://events.example.com/events"
    }

    fn events_api_url_env(&self) -> &'static str {
        "TEST_EVENTS_API_URL"
    }

    fn plugin_name(&self) -> &'static str {
        "test-plugin"
    }

    fn plugin_overview(&self) -> &'static str {
        "Plugin overview"
    }

    fn next_steps(&self) -> Vec<String> {
        vec!["Run it".to_string()]
    }

    fn cli_description(&self) -> &'static str {
        "Test CLI"
    }
}

/// In-memory I/O Events API
#[derive(Debug, Default)]
pub struct InMemoryEvents {
    providers: Vec<(ProviderRecord, Vec<EventMetadataRecord>)>,
    provider_list_calls: Cell<usize>,
}

impl InMemoryEvents {
    pub fn with_provider(
        mut self,
        id: &str,
        label: &str,
        provider_metadata: &str,
        events: &[(&str, &str)],
    ) -> Self {
        let record = ProviderRecord {
            id: id.to_string(),
            label: label.to_string(),
            instance_id: Some(format!("{}-instance", id)),
            provider_metadata: provider_metadata.to_string(),
        };
        let metadata = events
            .iter()
            .map(|(code, label)| EventMetadataRecord {
                event_code: code.to_string(),
                label: label.to_string(),
                description: None,
            })
            .collect();
        self.providers.push((record, metadata));
        self
    }

    pub fn provider_list_calls(&self) -> usize {
        self.provider_list_calls.get()
    }
}

impl EventsClient for InMemoryEvents {
    async fn list_providers(&self, _org_id: &str) -> Result<Vec<ProviderRecord>, EventsError> {
        self.provider_list_calls.set(self.provider_list_calls.get() + 1);
        Ok(self.providers.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn event_metadata(
        &self,
        provider_id: &str,
    ) -> Result<Vec<EventMetadataRecord>, EventsError> {
        self.providers
            .iter()
            .find(|(p, _)| p.id == provider_id)
            .map(|(_, events)| events.clone())
            .ok_or_else(|| EventsError::Request {
                url: format!("memory://providers/{}/eventmetadata", provider_id),
                message: "HTTP 404 Not Found".to_string(),
            })
    }
}

/// Plugin installer recording what the wizard asked of it
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    installed: Cell<bool>,
    fail: bool,
    install_calls: Cell<usize>,
}

impl RecordingInstaller {
    pub fn installed() -> Self {
        Self {
            installed: Cell::new(true),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn install_calls(&self) -> usize {
        self.install_calls.get()
    }
}

impl PluginInstaller for RecordingInstaller {
    fn plugin_name(&self) -> &str {
        "test-plugin"
    }

    async fn is_installed(&self) -> bool {
        self.installed.get()
    }

    async fn install(&self) -> Result<()> {
        self.install_calls.set(self.install_calls.get() + 1);
        if self.fail {
            anyhow::bail!("registry unreachable");
        }
        self.installed.set(true);
        Ok(())
    }
}

/// One scripted answer, consumed in order
#[derive(Debug, Clone)]
pub enum Answer {
    Details(ProjectDetails),
    Menu(MainMenuChoice),
    Guide(GuideMenuChoice),
    Credentials(String, String),
    Retry(bool),
    Provider(&'static str),
    Events(Vec<usize>),
    /// Accept the offered default
    DefaultName,
    Name(&'static str),
    PluginInstall(bool),
    OpenDocs(bool),
}

impl Answer {
    pub fn credentials(store_url: &str, access_token: &str) -> Self {
        Answer::Credentials(store_url.to_string(), access_token.to_string())
    }
}

/// Front end answering from a script and recording everything shown
#[derive(Debug, Default)]
pub struct ScriptedPrompts {
    answers: VecDeque<Answer>,
    pub messages: Vec<String>,
    pub name_prompts: Vec<(Option<String>, bool)>,
    pub plugin_offers: Vec<bool>,
    pub provider_choices: Vec<Vec<String>>,
    pub shown_manifest: Option<String>,
    pub steps: Vec<String>,
}

impl ScriptedPrompts {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn saw(&self, fragment: &str) -> bool {
        self.messages.iter().any(|m| m.contains(fragment))
    }

    fn next(&mut self, prompt: &str) -> Result<Answer> {
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("prompt '{}' aborted: script exhausted", prompt))
    }
}

macro_rules! unexpected {
    ($prompt:expr, $answer:expr) => {
        anyhow::bail!("prompt '{}' got unexpected answer {:?}", $prompt, $answer)
    };
}

impl WizardPrompts for ScriptedPrompts {
    fn overview(&mut self, text: &str) -> Result<()> {
        self.messages.push(text.to_string());
        Ok(())
    }

    fn info(&mut self, message: &str) -> Result<()> {
        self.messages.push(format!("info: {}", message));
        Ok(())
    }

    fn warning(&mut self, message: &str) -> Result<()> {
        self.messages.push(format!("warning: {}", message));
        Ok(())
    }

    fn success(&mut self, message: &str) -> Result<()> {
        self.messages.push(format!("success: {}", message));
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        self.messages.push(format!("error: {}", message));
        Ok(())
    }

    fn start_progress(&mut self, message: &str) {
        self.messages.push(format!("progress: {}", message));
    }

    fn stop_progress(&mut self, message: &str) {
        self.messages.push(format!("done: {}", message));
    }

    fn project_details(&mut self, _defaults: &ProjectDetails) -> Result<ProjectDetails> {
        match self.next("project details")? {
            Answer::Details(details) => Ok(details),
            other => unexpected!("project details", other),
        }
    }

    fn main_menu(&mut self, offer_plugin: bool) -> Result<MainMenuChoice> {
        self.plugin_offers.push(offer_plugin);
        match self.next("main menu")? {
            Answer::Menu(choice) => Ok(choice),
            other => unexpected!("main menu", other),
        }
    }

    fn guide_menu(&mut self) -> Result<GuideMenuChoice> {
        match self.next("guide menu")? {
            Answer::Guide(choice) => Ok(choice),
            other => unexpected!("guide menu", other),
        }
    }

    fn store_credentials(&mut self) -> Result<StoreCredentials> {
        match self.next("store credentials")? {
            Answer::Credentials(store_url, access_token) => Ok(StoreCredentials {
                store_url,
                access_token,
            }),
            other => unexpected!("store credentials", other),
        }
    }

    fn confirm_retry(&mut self) -> Result<bool> {
        match self.next("retry")? {
            Answer::Retry(retry) => Ok(retry),
            other => unexpected!("retry", other),
        }
    }

    fn select_provider(&mut self, providers: &[EventProvider]) -> Result<String> {
        self.provider_choices
            .push(providers.iter().map(|p| p.label.clone()).collect());
        match self.next("provider")? {
            Answer::Provider(id) => Ok(id.to_string()),
            other => unexpected!("provider", other),
        }
    }

    fn select_events(&mut self, _events: &[EventMetadata]) -> Result<Vec<usize>> {
        match self.next("events")? {
            Answer::Events(indices) => Ok(indices),
            other => unexpected!("events", other),
        }
    }

    fn action_name(&mut self, default: Option<&str>, taken: bool) -> Result<String> {
        self.name_prompts.push((default.map(str::to_string), taken));
        match self.next("action name")? {
            Answer::DefaultName => default
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("no default offered")),
            Answer::Name(name) => Ok(name.to_string()),
            other => unexpected!("action name", other),
        }
    }

    fn confirm_plugin_install(&mut self, _plugin_name: &str) -> Result<bool> {
        match self.next("plugin install")? {
            Answer::PluginInstall(install) => Ok(install),
            other => unexpected!("plugin install", other),
        }
    }

    fn confirm_open_docs(&mut self, _url: &str) -> Result<bool> {
        match self.next("open docs")? {
            Answer::OpenDocs(open) => Ok(open),
            other => unexpected!("open docs", other),
        }
    }

    fn show_manifest(&mut self, manifest_json: &str) -> Result<()> {
        self.shown_manifest = Some(manifest_json.to_string());
        Ok(())
    }

    fn next_steps(&mut self, steps: &[String]) -> Result<()> {
        self.steps = steps.to_vec();
        Ok(())
    }
}

pub fn details(name: &str) -> ProjectDetails {
    ProjectDetails {
        name: name.to_string(),
        description: "Listens to Commerce events".to_string(),
        version: "0.0.1".to_string(),
    }
}
