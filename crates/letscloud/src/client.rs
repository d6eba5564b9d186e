//! Asynchronous LetsCloud client implementation.
//!
//! Every operation validates its arguments, sends exactly one request through
//! the configured [`Requester`] and decodes the response envelope. Nothing is
//! retried, cached or run in the background.

use crate::models::{
    CreateInstanceRequest, Image, Instance, InstancePasswordResetRequest, Location,
    LocationPlans, Plan, Profile, Snapshot, SnapshotLabelRequest, SshKey, SshKeyCreateRequest,
    SshKeyDeleteRequest,
};
use crate::Result;
use chrono::TimeDelta;
use letscloud_core::config::{parse_base_url, path_segment};
use letscloud_core::{ClientConfig, Envelope, Error, HttpRequester, Requester};
use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use std::time::Duration;
use validator::Validate;

/// Builder for [`LetsCloud`].
#[derive(Debug, Clone)]
pub struct LetsCloudBuilder {
    config: ClientConfig,
}

impl LetsCloudBuilder {
    /// Create a builder for the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            config: ClientConfig::new(api_key)?,
        })
    }

    /// Override the request timeout. `Duration::ZERO` disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Override the API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL cannot be parsed.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.config = self.config.with_base_url(base_url)?;
        Ok(self)
    }

    /// Enable or disable debug logging of each call.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config = self.config.with_debug(debug);
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.with_user_agent(user_agent);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<LetsCloud> {
        LetsCloud::from_config(self.config)
    }
}

/// Asynchronous LetsCloud API client.
///
/// Setters take `&mut self`; wrap the client in a lock to share it between
/// tasks that reconfigure it.
pub struct LetsCloud {
    requester: Box<dyn Requester>,
}

impl std::fmt::Debug for LetsCloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LetsCloud")
            .field("debug", &self.requester.debug())
            .finish_non_exhaustive()
    }
}

impl LetsCloud {
    /// Construct a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        LetsCloudBuilder::new(api_key)?.build()
    }

    /// Start a builder for the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if the key is empty.
    pub fn builder(api_key: impl Into<String>) -> Result<LetsCloudBuilder> {
        LetsCloudBuilder::new(api_key)
    }

    /// Construct a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let requester = HttpRequester::new(config)?;
        Ok(Self {
            requester: Box::new(requester),
        })
    }

    /// Construct a client from `LETSCLOUD_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] when `LETSCLOUD_API_KEY` is unset or
    /// empty and [`Error::Config`] when another variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Construct a client around a custom transport.
    #[must_use]
    pub fn with_requester(requester: Box<dyn Requester>) -> Self {
        Self { requester }
    }

    /// Return the configured API key.
    #[must_use]
    pub fn api_key(&self) -> &SecretString {
        self.requester.api_key()
    }

    /// Replace the API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] for an empty key; the current key is kept.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) -> Result<()> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::InvalidToken);
        }

        self.requester.set_api_key(SecretString::from(api_key));
        Ok(())
    }

    /// Replace the request timeout. A zero timeout disables it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeout`] for a negative delta; the current
    /// timeout is kept.
    pub fn set_timeout(&mut self, timeout: TimeDelta) -> Result<()> {
        let timeout = timeout.to_std().map_err(|_| Error::InvalidTimeout)?;
        self.requester.set_timeout(timeout);
        Ok(())
    }

    /// Replace the API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL cannot be parsed; the current URL is kept.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        let base_url = parse_base_url(base_url)?;
        self.requester.set_base_url(base_url);
        Ok(())
    }

    /// Return whether debug logging is enabled.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.requester.debug()
    }

    /// Enable or disable debug logging of each call.
    pub fn set_debug(&mut self, debug: bool) {
        self.requester.set_debug(debug);
    }

    /// Fetch the profile of the API key owner.
    pub async fn profile(&self) -> Result<Profile> {
        self.get_json("/profile").await
    }

    /// List all locations.
    pub async fn locations(&self) -> Result<Vec<Location>> {
        self.get_json("/locations").await
    }

    /// List the plans offered at a location, flattened across location entries.
    pub async fn location_plans(&self, slug: &str) -> Result<Vec<Plan>> {
        let slug = segment(slug, INVALID_LOCATION)?;

        let locations: Vec<LocationPlans> =
            self.get_json(&format!("/locations/{slug}/plans")).await?;

        Ok(locations
            .into_iter()
            .flat_map(|location| location.plans)
            .collect())
    }

    /// List the images available at a location.
    pub async fn location_images(&self, slug: &str) -> Result<Vec<Image>> {
        let slug = segment(slug, INVALID_LOCATION)?;
        self.get_json(&format!("/locations/{slug}/images")).await
    }

    /// Register an SSH key. When `key` is empty the provider generates a pair.
    pub async fn new_ssh_key(&self, title: &str, key: &str) -> Result<SshKey> {
        let payload = SshKeyCreateRequest {
            title: title.to_string(),
            key: (!key.is_empty()).then(|| key.to_string()),
        };
        payload.validate()?;

        self.send(Method::POST, "/sshkeys", Some(&payload))
            .await?
            .into_data()
    }

    /// List the SSH keys of the account.
    pub async fn ssh_keys(&self) -> Result<Vec<SshKey>> {
        self.get_json("/sshkeys").await
    }

    /// Fetch an SSH key by title.
    pub async fn ssh_key(&self, title: &str) -> Result<SshKey> {
        let title = segment(title, "please provide a valid ssh key title")?;
        self.get_json(&format!("/sshkeys/{title}")).await
    }

    /// Delete an SSH key by slug.
    pub async fn delete_ssh_key(&self, slug: &str) -> Result<()> {
        require(slug, "please provide a valid slug")?;
        let payload = SshKeyDeleteRequest {
            slug: slug.to_string(),
        };

        self.send(Method::DELETE, "/sshkeys", Some(&payload))
            .await?
            .check()
    }

    /// List all instances.
    pub async fn instances(&self) -> Result<Vec<Instance>> {
        self.get_json("/instances").await
    }

    /// Create an instance.
    pub async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<()> {
        request.validate()?;

        self.send(Method::POST, "/instances", Some(request))
            .await?
            .check()
    }

    /// Fetch an instance by identifier.
    pub async fn instance(&self, identifier: &str) -> Result<Instance> {
        let identifier = segment(identifier, INVALID_INSTANCE)?;
        self.get_json(&format!("/instances/{identifier}")).await
    }

    /// Delete an instance.
    pub async fn delete_instance(&self, identifier: &str) -> Result<()> {
        let identifier = segment(identifier, INVALID_INSTANCE)?;
        self.action(Method::DELETE, &format!("/instances/{identifier}"))
            .await
    }

    /// Power on an instance.
    pub async fn power_on_instance(&self, identifier: &str) -> Result<()> {
        let identifier = segment(identifier, INVALID_INSTANCE)?;
        self.action(Method::PUT, &format!("/instances/{identifier}/power-on"))
            .await
    }

    /// Power off an instance.
    pub async fn power_off_instance(&self, identifier: &str) -> Result<()> {
        let identifier = segment(identifier, INVALID_INSTANCE)?;
        self.action(Method::PUT, &format!("/instances/{identifier}/power-off"))
            .await
    }

    /// Reboot an instance.
    pub async fn reboot_instance(&self, identifier: &str) -> Result<()> {
        let identifier = segment(identifier, INVALID_INSTANCE)?;
        self.action(Method::PUT, &format!("/instances/{identifier}/reboot"))
            .await
    }

    /// Reset the root password of an instance.
    pub async fn reset_password_instance(&self, identifier: &str, password: &str) -> Result<()> {
        let message = "please provide a valid instance identifier and new password";
        let identifier = segment(identifier, message)?;
        require(password, message)?;
        let payload = InstancePasswordResetRequest {
            password: password.to_string(),
        };

        self.send(
            Method::PUT,
            &format!("/instances/{identifier}/reset-password"),
            Some(&payload),
        )
        .await?
        .check()
    }

    /// Snapshot an instance. Returns the full envelope so the provider message
    /// is available alongside the snapshot.
    pub async fn new_snapshot(&self, label: &str, identifier: &str) -> Result<Envelope<Snapshot>> {
        let message = "please provide a valid instance identifier and label";
        let identifier = segment(identifier, message)?;
        require(label, message)?;
        let payload = SnapshotLabelRequest {
            label: label.to_string(),
        };

        self.send(
            Method::POST,
            &format!("/instances/{identifier}/snapshots"),
            Some(&payload),
        )
        .await?
        .into_typed()
    }

    /// List all snapshots.
    pub async fn snapshots(&self) -> Result<Vec<Snapshot>> {
        self.get_json("/snapshots").await
    }

    /// Fetch a snapshot by slug.
    pub async fn snapshot(&self, slug: &str) -> Result<Snapshot> {
        let slug = segment(slug, INVALID_SNAPSHOT)?;
        self.get_json(&format!("/snapshots/{slug}")).await
    }

    /// Rename a snapshot.
    pub async fn update_snapshot(&self, slug: &str, label: &str) -> Result<()> {
        let message = "please provide a valid snapshot slug and label";
        let slug = segment(slug, message)?;
        require(label, message)?;
        let payload = SnapshotLabelRequest {
            label: label.to_string(),
        };

        self.send(Method::PUT, &format!("/snapshots/{slug}"), Some(&payload))
            .await?
            .check()
    }

    /// Delete a snapshot.
    pub async fn delete_snapshot(&self, slug: &str) -> Result<()> {
        let slug = segment(slug, INVALID_SNAPSHOT)?;
        self.action(Method::DELETE, &format!("/snapshots/{slug}"))
            .await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        self.send::<()>(Method::GET, path, None)
            .await?
            .into_data()
    }

    async fn action(&self, method: Method, path: &str) -> Result<()> {
        self.send::<()>(method, path, None).await?.check()
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|err| Error::MakingRequest(format!("Failed to encode payload: {err}")))?;

        let request = self.requester.build_request(method, path, body)?;
        let bytes = self.requester.send_request(request).await?;

        Envelope::decode(&bytes)
    }
}

const INVALID_INSTANCE: &str = "please provide a valid instance identifier";
const INVALID_SNAPSHOT: &str = "please provide a valid snapshot slug";
const INVALID_LOCATION: &str = "please provide a valid location slug";

fn require(value: &str, message: &str) -> Result<()> {
    if value.is_empty() {
        Err(Error::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

// Checks a required identifier and escapes it as one path segment.
fn segment(value: &str, message: &str) -> Result<String> {
    require(value, message)?;
    path_segment(value)
}
