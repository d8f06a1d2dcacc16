//! Store configuration check with user-driven retries

use super::{StoreCredentials, Wizard, WizardPrompts};
use crate::commerce::ConfigCheckOutcome;
use crate::events::EventsClient;
use crate::plugin::PluginInstaller;
use crate::product::ProductConfig;
use anyhow::Result;

/// States of the check loop.
///
/// `AskCredentials -> Checking -> Verified | Failed`, and a failure goes back
/// to `AskCredentials` on retry or ends in `Abandoned`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckState {
    AskCredentials,
    Checking(StoreCredentials),
    Failed(ConfigCheckOutcome),
    Verified { provider_id: String },
    Abandoned,
}

impl CheckState {
    /// Transition out of `Failed` given the user's retry answer
    pub fn after_failure(retry: bool) -> Self {
        if retry {
            CheckState::AskCredentials
        } else {
            CheckState::Abandoned
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckState::Verified { .. } | CheckState::Abandoned)
    }
}

impl<C, P, E, I> Wizard<'_, C, P, E, I>
where
    C: ProductConfig,
    P: WizardPrompts,
    E: EventsClient,
    I: PluginInstaller,
{
    /// Run the check loop until the store is verified or the user gives up.
    ///
    /// Returns the provider id configured in the store, `None` when abandoned.
    pub(crate) async fn verify_commerce_instance(&mut self) -> Result<Option<String>> {
        let mut state = CheckState::AskCredentials;

        while !state.is_terminal() {
            state = match state {
                CheckState::AskCredentials => {
                    self.prompts.info(&format!(
                        "Please refer to the link below for setting up your Commerce integration:\n-> {}",
                        self.config.commerce_integration_doc_url()
                    ))?;
                    CheckState::Checking(self.prompts.store_credentials()?)
                }
                CheckState::Checking(credentials) => {
                    self.prompts
                        .start_progress("Checking Adobe I/O Event Provider configuration...");
                    match self
                        .checker
                        .check(&credentials.store_url, &credentials.access_token)
                        .await
                    {
                        Err(e) => {
                            self.prompts.stop_progress("Store credentials rejected");
                            self.prompts.error(&e.to_string())?;
                            CheckState::AskCredentials
                        }
                        Ok(ConfigCheckOutcome::Verified { provider_id }) => {
                            self.prompts
                                .stop_progress("Verified configuration for Adobe I/O Event Provider");
                            CheckState::Verified { provider_id }
                        }
                        Ok(outcome) => {
                            self.prompts.stop_progress(
                                "Adobe I/O Event Provider configuration could not be verified",
                            );
                            CheckState::Failed(outcome)
                        }
                    }
                }
                CheckState::Failed(outcome) => {
                    self.prompts.warning(&outcome.describe())?;
                    if !matches!(
                        outcome,
                        ConfigCheckOutcome::RequestFailed { .. }
                            | ConfigCheckOutcome::TransportError { .. }
                    ) {
                        let url = self.config.commerce_configuration_doc_url();
                        self.doc_hint(url)?;
                    }
                    CheckState::after_failure(self.prompts.confirm_retry()?)
                }
                terminal => terminal,
            };

            tracing::debug!("Configuration check state: {:?}", state);
        }

        match state {
            CheckState::Verified { provider_id } => Ok(Some(provider_id)),
            _ => Ok(None),
        }
    }
}
