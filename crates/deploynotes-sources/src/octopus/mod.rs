//! Octopus Deploy client
//!
//! Read-only access to the Octopus Deploy REST API.
//!
//! ## Authentication
//!
//! Every request carries the configured API key in the `X-Octopus-ApiKey`
//! header.
//!
//! ## Usage
//!
//! ```ignore
//! use deploynotes_sources::octopus::OctopusClient;
//!
//! let client = OctopusClient::new(&config.octopus)?;
//! let deployment = client.latest_deployment(&scope).await?;
//! ```

mod models;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

use deploynotes_core::config::OctopusConfig;
use deploynotes_core::{BuildInfoRecord, Deployment, NamedEntity, Release, ResolvedScope};

use crate::error::{Result, SourceError};
use crate::traits::DeploymentSource;

use models::{
    BuildInformationResource, DeploymentResource, NamedResource, ReleaseResource,
    ResourceCollection,
};

const API_KEY_HEADER: &str = "X-Octopus-ApiKey";

/// Octopus Deploy REST client
pub struct OctopusClient {
    base_url: Url,
    api_key: String,
    only_successful: bool,
    client: Client,
}

impl OctopusClient {
    /// Create a new client from configuration
    pub fn new(config: &OctopusConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                SourceError::ConfigurationError("Octopus API key not configured".to_string())
            })?;

        let base_url = Url::parse(&config.server_url).map_err(|e| {
            SourceError::ConfigurationError(format!(
                "Invalid Octopus server URL '{}': {}",
                config.server_url, e
            ))
        })?;

        let client = Client::builder()
            .user_agent(concat!("deploynotes/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            only_successful: config.only_successful,
            client,
        })
    }

    /// Build `<server>/api/<segments...>`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SourceError::ConfigurationError(format!(
                    "Octopus server URL cannot be a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        debug!(url = %url, what, "GET");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::from_status(status, what, error_text));
        }

        Ok(response.json().await?)
    }

    async fn list_named(&self, segments: &[&str], what: &str) -> Result<Vec<NamedEntity>> {
        let url = self.endpoint(segments)?;
        let resources: Vec<NamedResource> = self.get_json(url, &[], what).await?;
        debug!(what, count = resources.len(), "listed entities");
        Ok(resources.into_iter().map(NamedEntity::from).collect())
    }

    /// Query parameters for the latest-deployment lookup
    fn deployment_query<'a>(&self, scope: &'a ResolvedScope) -> Vec<(&'static str, &'a str)> {
        let mut query = vec![
            ("projects", scope.project_id.as_str()),
            ("environments", scope.environment_id.as_str()),
            ("take", "1"),
        ];
        if self.only_successful {
            query.push(("taskState", "Success"));
        }
        query
    }
}

#[async_trait::async_trait]
impl DeploymentSource for OctopusClient {
    fn name(&self) -> &str {
        "Octopus Deploy"
    }

    #[instrument(skip(self))]
    async fn list_spaces(&self) -> Result<Vec<NamedEntity>> {
        self.list_named(&["spaces", "all"], "spaces").await
    }

    #[instrument(skip(self))]
    async fn list_projects(&self, space_id: &str) -> Result<Vec<NamedEntity>> {
        self.list_named(&[space_id, "projects", "all"], "projects")
            .await
    }

    #[instrument(skip(self))]
    async fn list_environments(&self, space_id: &str) -> Result<Vec<NamedEntity>> {
        self.list_named(&[space_id, "environments", "all"], "environments")
            .await
    }

    #[instrument(skip(self, scope), fields(project = %scope.project_id, environment = %scope.environment_id))]
    async fn latest_deployment(&self, scope: &ResolvedScope) -> Result<Option<Deployment>> {
        let url = self.endpoint(&[&scope.space_id, "deployments"])?;
        let query = self.deployment_query(scope);

        let collection: ResourceCollection<DeploymentResource> =
            self.get_json(url, &query, "deployments").await?;

        let deployment = collection.items.into_iter().next().map(Deployment::from);
        info!(found = deployment.is_some(), "queried latest deployment");
        Ok(deployment)
    }

    #[instrument(skip(self))]
    async fn get_release(&self, space_id: &str, release_id: &str) -> Result<Release> {
        let url = self.endpoint(&[space_id, "releases", release_id])?;
        let resource: ReleaseResource = self
            .get_json(url, &[], &format!("release {}", release_id))
            .await?;
        Ok(resource.into())
    }

    #[instrument(skip(self))]
    async fn get_build_information(
        &self,
        space_id: &str,
        build_info_id: &str,
    ) -> Result<BuildInfoRecord> {
        let url = self.endpoint(&[space_id, "build-information", build_info_id])?;
        let resource: BuildInformationResource = self
            .get_json(url, &[], &format!("build information {}", build_info_id))
            .await?;
        Ok(resource.into())
    }
}
