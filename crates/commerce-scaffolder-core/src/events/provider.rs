//! Commerce event provider discovery and selection

use super::client::EventsClient;
use crate::error::EventsError;

/// Provider metadata tag identifying Commerce event providers
pub const COMMERCE_PROVIDER_METADATA: &str = "dx_commerce_events";

/// A Commerce event provider with the event codes it emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventProvider {
    pub id: String,
    pub label: String,
    pub instance_id: String,
    pub metadata_tag: String,
    pub event_codes: Vec<String>,
}

/// List the organization's providers tagged as Commerce event providers,
/// together with their event codes.
pub async fn find_commerce_providers<E: EventsClient>(
    client: &E,
    org_id: &str,
) -> Result<Vec<EventProvider>, EventsError> {
    let records = client.list_providers(org_id).await?;

    let mut providers = Vec::new();
    for record in records {
        if record.provider_metadata != COMMERCE_PROVIDER_METADATA {
            continue;
        }

        let event_codes = client
            .event_metadata(&record.id)
            .await?
            .into_iter()
            .map(|meta| meta.event_code)
            .collect();

        providers.push(EventProvider {
            id: record.id,
            label: record.label,
            instance_id: record.instance_id.unwrap_or_default(),
            metadata_tag: record.provider_metadata,
            event_codes,
        });
    }

    Ok(providers)
}

/// Provider list cached for the lifetime of one wizard session.
///
/// An empty result is not cached so a later attempt can pick up providers
/// created in the meantime.
#[derive(Debug, Default)]
pub struct ProviderCache {
    providers: Option<Vec<EventProvider>>,
}

impl ProviderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached providers, fetching them first if needed
    pub async fn get_or_fetch<E: EventsClient>(
        &mut self,
        client: &E,
        org_id: &str,
    ) -> Result<&[EventProvider], EventsError> {
        let cached = self.providers.as_ref().is_some_and(|p| !p.is_empty());
        if cached {
            tracing::debug!("Using cached Commerce event providers");
        } else {
            self.providers = Some(find_commerce_providers(client, org_id).await?);
        }
        Ok(self.providers.as_deref().unwrap_or_default())
    }
}

/// Resolve a provider list to exactly one provider.
///
/// A single provider is returned without asking. With several, `choose` is
/// given the list and must return the id of the chosen provider; selection is
/// by id so duplicate labels stay unambiguous.
pub fn select_provider<F>(providers: &[EventProvider], choose: F) -> anyhow::Result<EventProvider>
where
    F: FnOnce(&[EventProvider]) -> anyhow::Result<String>,
{
    match providers {
        [] => Err(EventsError::NoProvidersAvailable.into()),
        [only] => {
            tracing::debug!("There is a single matching event provider found for event");
            Ok(only.clone())
        }
        _ => {
            let provider_id = choose(providers)?;
            providers
                .iter()
                .find(|p| p.id == provider_id)
                .cloned()
                .ok_or_else(|| EventsError::UnknownProvider { provider_id }.into())
        }
    }
}
