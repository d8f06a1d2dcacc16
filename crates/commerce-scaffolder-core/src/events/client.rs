//! I/O Events API client
//!
//! The wizard only needs two calls: list the providers of an organization and
//! list the event metadata of one provider. They sit behind `EventsClient` so
//! the wizard can run against an in-memory client in tests.

use crate::config::EventsSettings;
use crate::error::EventsError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider as returned by the I/O Events API
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProviderRecord {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub provider_metadata: String,
}

/// Event metadata as returned by the I/O Events API
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventMetadataRecord {
    pub event_code: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProvidersPage {
    #[serde(rename = "_embedded", default)]
    embedded: ProvidersEmbedded,
}

#[derive(Debug, Default, Deserialize)]
struct ProvidersEmbedded {
    #[serde(default)]
    providers: Vec<ProviderRecord>,
}

#[derive(Debug, Deserialize)]
struct EventMetadataPage {
    #[serde(rename = "_embedded", default)]
    embedded: EventMetadataEmbedded,
}

#[derive(Debug, Default, Deserialize)]
struct EventMetadataEmbedded {
    #[serde(default)]
    eventmetadata: Vec<EventMetadataRecord>,
}

/// Read access to the I/O Events API
#[allow(async_fn_in_trait)]
pub trait EventsClient {
    /// List every event provider visible to an organization
    async fn list_providers(&self, org_id: &str) -> Result<Vec<ProviderRecord>, EventsError>;

    /// List the event metadata registered for a provider
    async fn event_metadata(
        &self,
        provider_id: &str,
    ) -> Result<Vec<EventMetadataRecord>, EventsError>;
}

/// `EventsClient` backed by the I/O Events REST API
pub struct HttpEventsClient {
    base_url: Url,
    client: reqwest::Client,
    access_token: String,
    api_key: String,
    ims_org_id: String,
}

impl HttpEventsClient {
    /// Create a new client with a custom user agent
    pub fn new(settings: &EventsSettings, user_agent: &str) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            access_token: settings.access_token.clone(),
            api_key: settings.api_key.clone(),
            ims_org_id: settings.project.org.ims_org_id.clone(),
        }
    }

    /// Build a URL by appending path segments, preserving query parameters
    fn build_url(&self, segments: &[&str]) -> Result<Url, EventsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EventsError::Request {
                url: self.base_url.to_string(),
                message: "URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, EventsError> {
        let request_error = |message: String| EventsError::Request {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .header("x-api-key", &self.api_key)
            .header("x-ims-org-id", &self.ims_org_id)
            .header(reqwest::header::ACCEPT, "application/hal+json")
            .send()
            .await
            .map_err(|e| request_error(e.to_string()))?;

        let status = response.status();
        tracing::debug!("GET {} responded with HTTP {}", url, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(request_error(format!("HTTP {} {}", status, body.trim())));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| request_error(format!("invalid response body: {}", e)))
    }
}

impl EventsClient for HttpEventsClient {
    async fn list_providers(&self, org_id: &str) -> Result<Vec<ProviderRecord>, EventsError> {
        let url = self.build_url(&[org_id, "providers"])?;
        let page: ProvidersPage = self.get_json(url).await?;
        Ok(page.embedded.providers)
    }

    async fn event_metadata(
        &self,
        provider_id: &str,
    ) -> Result<Vec<EventMetadataRecord>, EventsError> {
        let url = self.build_url(&["providers", provider_id, "eventmetadata"])?;
        let page: EventMetadataPage = self.get_json(url).await?;
        Ok(page.embedded.eventmetadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OrgConfig, ProjectConfig, WorkspaceConfig};

    fn settings(base: &str) -> EventsSettings {
        EventsSettings {
            base_url: Url::parse(base).unwrap(),
            access_token: "ims-token".to_string(),
            api_key: "client-id".to_string(),
            project: ProjectConfig {
                id: "p1".to_string(),
                name: None,
                org: OrgConfig {
                    id: "org-1".to_string(),
                    name: None,
                    ims_org_id: "ABCD@AdobeOrg".to_string(),
                },
                workspace: WorkspaceConfig {
                    id: "w1".to_string(),
                    name: "Stage".to_string(),
                },
            },
        }
    }

    #[tokio::test]
    async fn test_list_providers_sends_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/events/org-1/providers")
            .match_header("authorization", "Bearer ims-token")
            .match_header("x-api-key", "client-id")
            .match_header("x-ims-org-id", "ABCD@AdobeOrg")
            .with_status(200)
            .with_header("content-type", "application/hal+json")
            .with_body(
                r#"{"_embedded":{"providers":[
                    {"id":"p-1","label":"Commerce Stage","instance_id":"stage-1",
                     "provider_metadata":"dx_commerce_events"},
                    {"id":"p-2","label":"Custom","provider_metadata":"3rd_party_custom_events"}
                ]}}"#,
            )
            .create_async()
            .await;

        let client = HttpEventsClient::new(&settings(&format!("{}/events", server.url())), "t");
        let providers = client.list_providers("org-1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].instance_id.as_deref(), Some("stage-1"));
        assert_eq!(providers[1].provider_metadata, "3rd_party_custom_events");
    }

    #[tokio::test]
    async fn test_event_metadata_without_embedded_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/events/providers/p-1/eventmetadata")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = HttpEventsClient::new(&settings(&format!("{}/events/", server.url())), "t");
        let metadata = client.event_metadata("p-1").await.unwrap();
        assert!(metadata.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_request_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/events/providers/missing/eventmetadata")
            .with_status(404)
            .with_body("provider not found")
            .create_async()
            .await;

        let client = HttpEventsClient::new(&settings(&format!("{}/events", server.url())), "t");
        let err = client.event_metadata("missing").await.unwrap_err();
        match err {
            EventsError::Request { message, .. } => {
                assert!(message.contains("404"));
                assert!(message.contains("provider not found"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
