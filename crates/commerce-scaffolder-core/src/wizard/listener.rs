//! Add-listener workflows: resolve a provider, pick events, name the action
//! and merge it into the manifest

use super::{events_access, Session, Wizard, WizardPrompts};
use crate::events::{fetch_event_metadata, select_provider, EventMetadata, EventsClient};
use crate::manifest::{ActionManifestEntry, ProjectManifest};
use crate::naming::{candidate_base_name, validate_action_name, NamingState};
use crate::plugin::PluginInstaller;
use crate::product::ProductConfig;
use anyhow::Result;

impl<C, P, E, I> Wizard<'_, C, P, E, I>
where
    C: ProductConfig,
    P: WizardPrompts,
    E: EventsClient,
    I: PluginInstaller,
{
    /// Add a listener for the provider configured in a Commerce store.
    ///
    /// When the user gives up on the store check, falls back to choosing one
    /// of the organization's Commerce providers.
    pub async fn add_listener_for_commerce_instance(
        &mut self,
        session: &mut Session,
        manifest: &mut ProjectManifest,
    ) -> Result<bool> {
        match self.verify_commerce_instance().await? {
            Some(provider_id) => self.add_events_to_manifest(session, manifest, &provider_id).await,
            None => {
                self.prompts
                    .info("Choose one of the Commerce event providers of your organization instead")?;
                self.add_listener_for_event_provider(session, manifest).await
            }
        }
    }

    /// Add a listener for one of the organization's Commerce providers
    pub async fn add_listener_for_event_provider(
        &mut self,
        session: &mut Session,
        manifest: &mut ProjectManifest,
    ) -> Result<bool> {
        let access = events_access(&self.events)?;

        self.prompts.start_progress("Fetching Commerce event providers...");
        let providers = match session
            .providers
            .get_or_fetch(&access.client, &access.org_id)
            .await
        {
            Ok(providers) => {
                self.prompts
                    .stop_progress(&format!("Found {} Commerce event provider(s)", providers.len()));
                providers
            }
            Err(e) => {
                self.prompts
                    .stop_progress("Failed to fetch Commerce event providers");
                return Err(e.into());
            }
        };

        let prompts = &mut *self.prompts;
        let provider = select_provider(providers, |choices| prompts.select_provider(choices))?;
        tracing::debug!("Selected event provider {} ({})", provider.label, provider.id);

        self.add_events_to_manifest(session, manifest, &provider.id)
            .await
    }

    /// Fetch the provider's events, let the user pick some, allocate a name
    /// and merge the new action. Returns whether an action was added.
    pub(crate) async fn add_events_to_manifest(
        &mut self,
        session: &mut Session,
        manifest: &mut ProjectManifest,
        provider_id: &str,
    ) -> Result<bool> {
        let access = events_access(&self.events)?;

        self.prompts.start_progress("Fetching event codes...");
        let metadata = match fetch_event_metadata(&access.client, provider_id).await {
            Ok(metadata) => {
                self.prompts
                    .stop_progress(&format!("Fetched {} event code(s)", metadata.len()));
                metadata
            }
            Err(e) => {
                self.prompts.stop_progress("Failed to fetch event codes");
                self.prompts.error(&e.to_string())?;
                let url = self.config.commerce_configuration_doc_url();
                self.doc_hint(url)?;
                Vec::new()
            }
        };

        if metadata.is_empty() {
            self.prompts
                .warning("No event codes available for the selected provider")?;
            return Ok(false);
        }

        let selection: Vec<EventMetadata> = self
            .prompts
            .select_events(&metadata)?
            .into_iter()
            .filter_map(|idx| metadata.get(idx).cloned())
            .collect();

        let Some(base_name) = candidate_base_name(&selection) else {
            self.prompts.info("No event codes selected")?;
            return Ok(false);
        };

        let existing = manifest.action_names();
        let name = self.allocate_action_name(&mut session.naming, &base_name, &existing)?;
        let event_codes = selection.into_iter().map(|meta| meta.event_code).collect();

        manifest.merge(ActionManifestEntry::new(name.as_str(), provider_id, event_codes))?;
        self.prompts
            .success(&format!("Added runtime action '{}'", name))?;
        Ok(true)
    }

    /// Offer the computed default and commit once a free, valid name is typed
    fn allocate_action_name(
        &mut self,
        naming: &mut NamingState,
        base_name: &str,
        existing: &[String],
    ) -> Result<String> {
        let proposal = naming.propose(base_name, existing);
        let mut default = Some(proposal.name.clone());
        let mut taken = false;

        let chosen = loop {
            let answer = self.prompts.action_name(default.as_deref(), taken)?;
            let answer = answer.trim();

            if let Err(message) = validate_action_name(answer) {
                self.prompts.error(&message)?;
                continue;
            }
            if existing.iter().any(|name| name == answer) {
                taken = true;
                default = None;
                continue;
            }
            break answer.to_string();
        };

        naming.commit(proposal, &chosen);
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commerce::ConfigChecker;
    use crate::error::EventsError;
    use crate::events::COMMERCE_PROVIDER_METADATA;
    use crate::test_support::{Answer, InMemoryEvents, RecordingInstaller, ScriptedPrompts, TestProduct};
    use crate::wizard::EventsAccess;
    use crate::error::ConfigError;

    const ORDER_CREATED: (&str, &str) = ("com.adobe.commerce.order.created", "Order Created");
    const ORDER_SHIPPED: (&str, &str) = ("com.adobe.commerce.order.shipped", "Order Shipped");

    fn commerce_events() -> InMemoryEvents {
        InMemoryEvents::default().with_provider(
            "p-1",
            "Commerce Stage",
            COMMERCE_PROVIDER_METADATA,
            &[ORDER_CREATED, ORDER_SHIPPED],
        )
    }

    fn access(client: InMemoryEvents) -> Result<EventsAccess<InMemoryEvents>, ConfigError> {
        Ok(EventsAccess {
            client,
            org_id: "org".to_string(),
        })
    }

    fn manifest_with(names: &[&str]) -> ProjectManifest {
        let mut manifest = ProjectManifest::default();
        for name in names {
            manifest
                .merge(ActionManifestEntry::new(*name, "p-0", vec!["code".into()]))
                .unwrap();
        }
        manifest
    }

    async fn add_from_provider(
        prompts: &mut ScriptedPrompts,
        events: InMemoryEvents,
        session: &mut Session,
        manifest: &mut ProjectManifest,
    ) -> Result<bool> {
        let installer = RecordingInstaller::default();
        let mut wizard = Wizard::new(
            &TestProduct,
            prompts,
            ConfigChecker::new("test"),
            access(events),
            &installer,
        );
        wizard.add_listener_for_event_provider(session, manifest).await
    }

    #[tokio::test]
    async fn test_collision_offers_indexed_default() {
        let mut manifest = manifest_with(&["order-created"]);
        let mut session = Session::start(&manifest);
        let mut prompts = ScriptedPrompts::new([Answer::Events(vec![0]), Answer::DefaultName]);

        let added = add_from_provider(&mut prompts, commerce_events(), &mut session, &mut manifest)
            .await
            .unwrap();

        assert!(added);
        assert_eq!(prompts.name_prompts, vec![(Some("order-created-1".to_string()), false)]);
        assert_eq!(manifest.action_names(), vec!["order-created", "order-created-1"]);
        assert_eq!(session.naming().last_index("order-created"), Some(1));
    }

    #[tokio::test]
    async fn test_multiple_events_default_to_generic() {
        let mut manifest = ProjectManifest::default();
        let mut session = Session::start(&manifest);
        let mut prompts = ScriptedPrompts::new([Answer::Events(vec![0, 1]), Answer::DefaultName]);

        add_from_provider(&mut prompts, commerce_events(), &mut session, &mut manifest)
            .await
            .unwrap();

        let action = &manifest.actions()[0];
        assert_eq!(action.name, "generic");
        assert_eq!(action.event_provider_id.as_deref(), Some("p-1"));
        assert_eq!(
            action.event_codes,
            vec![ORDER_CREATED.0.to_string(), ORDER_SHIPPED.0.to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_selection_leaves_manifest_untouched() {
        let mut manifest = manifest_with(&["order-created"]);
        let before = manifest.clone();
        let mut session = Session::start(&manifest);
        let naming_before = session.naming().clone();
        let mut prompts = ScriptedPrompts::new([Answer::Events(vec![])]);

        let added = add_from_provider(&mut prompts, commerce_events(), &mut session, &mut manifest)
            .await
            .unwrap();

        assert!(!added);
        assert_eq!(manifest, before);
        assert_eq!(session.naming(), &naming_before);
        assert!(prompts.name_prompts.is_empty());
    }

    #[tokio::test]
    async fn test_taken_name_reprompts_without_default() {
        let mut manifest = manifest_with(&["order-created", "my-listener"]);
        let mut session = Session::start(&manifest);
        let mut prompts = ScriptedPrompts::new([
            Answer::Events(vec![0]),
            Answer::Name("my-listener"),
            Answer::Name("x"),
            Answer::Name("fresh-listener"),
        ]);

        add_from_provider(&mut prompts, commerce_events(), &mut session, &mut manifest)
            .await
            .unwrap();

        assert_eq!(
            prompts.name_prompts,
            vec![
                (Some("order-created-1".to_string()), false),
                (None, true),
                (None, true),
            ]
        );
        assert!(prompts.saw("'x' is not a valid action name"));
        assert_eq!(manifest.actions().last().unwrap().name, "fresh-listener");
        // Override keeps the index counters untouched
        assert_eq!(session.naming().last_index("order-created"), None);
        assert!(session.naming().is_seen("fresh-listener"));
    }

    #[tokio::test]
    async fn test_aborted_name_prompt_commits_nothing() {
        let mut manifest = manifest_with(&["order-created"]);
        let mut session = Session::start(&manifest);
        let naming_before = session.naming().clone();
        let mut prompts = ScriptedPrompts::new([Answer::Events(vec![0])]);

        let result =
            add_from_provider(&mut prompts, commerce_events(), &mut session, &mut manifest).await;

        assert!(result.is_err());
        assert_eq!(session.naming(), &naming_before);
        assert_eq!(manifest.action_names(), vec!["order-created"]);
    }

    #[tokio::test]
    async fn test_several_providers_prompt_by_label() {
        let events = commerce_events().with_provider(
            "p-2",
            "Commerce Production",
            COMMERCE_PROVIDER_METADATA,
            &[ORDER_SHIPPED],
        );
        let mut manifest = ProjectManifest::default();
        let mut session = Session::start(&manifest);
        let mut prompts = ScriptedPrompts::new([
            Answer::Provider("p-2"),
            Answer::Events(vec![0]),
            Answer::DefaultName,
        ]);

        add_from_provider(&mut prompts, events, &mut session, &mut manifest)
            .await
            .unwrap();

        assert_eq!(
            prompts.provider_choices,
            vec![vec!["Commerce Stage".to_string(), "Commerce Production".to_string()]]
        );
        assert_eq!(manifest.actions()[0].name, "order-shipped");
        assert_eq!(manifest.actions()[0].event_provider_id.as_deref(), Some("p-2"));
    }

    #[tokio::test]
    async fn test_no_commerce_provider_is_fatal() {
        let events = InMemoryEvents::default().with_provider("p-9", "Custom", "custom", &[]);
        let mut manifest = ProjectManifest::default();
        let mut session = Session::start(&manifest);
        let mut prompts = ScriptedPrompts::new([]);

        let err = add_from_provider(&mut prompts, events, &mut session, &mut manifest)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EventsError>(),
            Some(EventsError::NoProvidersAvailable)
        ));
    }

    #[tokio::test]
    async fn test_missing_configuration_is_fatal() {
        let installer = RecordingInstaller::default();
        let mut prompts = ScriptedPrompts::new([]);
        let mut manifest = ProjectManifest::default();
        let mut session = Session::start(&manifest);

        let mut wizard = Wizard::<_, _, InMemoryEvents, _>::new(
            &TestProduct,
            &mut prompts,
            ConfigChecker::new("test"),
            Err(ConfigError::MissingCredential {
                var: crate::config::ACCESS_TOKEN_ENV,
            }),
            &installer,
        );
        let err = wizard
            .add_listener_for_event_provider(&mut session, &mut manifest)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("AIO_EVENTS_ACCESS_TOKEN"));
    }

    #[tokio::test]
    async fn test_unknown_provider_is_reported_and_skipped() {
        let mut manifest = ProjectManifest::default();
        let mut session = Session::start(&manifest);
        let mut prompts = ScriptedPrompts::new([]);
        let installer = RecordingInstaller::default();

        let added = {
            let mut wizard = Wizard::new(
                &TestProduct,
                &mut prompts,
                ConfigChecker::new("test"),
                access(commerce_events()),
                &installer,
            );
            wizard
                .add_events_to_manifest(&mut session, &mut manifest, "missing")
                .await
                .unwrap()
        };

        assert!(!added);
        assert!(prompts.saw("error: Failed to fetch event codes for provider 'missing'"));
        assert!(prompts.saw("https://docs.example.com/configure"));
        assert!(manifest.actions().is_empty());
    }
}
