use std::collections::HashMap;

use reqwest::{Method, Response, Url};
use thiserror::Error;

use super::{
    groups::{HttpServiceGroup, HttpServiceGroups, OAuth2Binding},
    manager::AuthorizationError,
};

/// Errors that can occur when calling a service group.
#[derive(Debug, Error)]
pub enum ServiceClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The manager could not supply a token
    #[error("service group `{group}` could not be authorized: {source}")]
    Authorization {
        group: String,
        #[source]
        source: AuthorizationError,
    },

    /// Path could not be resolved to a URL
    #[error("invalid URL `{path}` for service group `{group}`: {reason}")]
    InvalidUrl {
        group: String,
        path: String,
        reason: String,
    },

    #[error("unknown service group `{0}`")]
    UnknownGroup(String),
}

/// HTTP client for one service group.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    group: String,
    client: reqwest::Client,
    base_url: Option<Url>,
    oauth2: Option<OAuth2Binding>,
}

impl ServiceClient {
    fn from_group(group: HttpServiceGroup) -> Result<Self, ServiceClientError> {
        let client = reqwest::Client::builder()
            .default_headers(group.default_headers().clone())
            .build()?;
        Ok(Self {
            group: group.name().to_string(),
            client,
            base_url: group.base_url_value().cloned(),
            oauth2: group.oauth2().cloned(),
        })
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    fn resolve(&self, path: &str) -> Result<Url, ServiceClientError> {
        let resolved = match &self.base_url {
            Some(base) => base.join(path),
            None => Url::parse(path),
        };
        resolved.map_err(|e| ServiceClientError::InvalidUrl {
            group: self.group.clone(),
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Send a request with no body.
    ///
    /// `path` is joined onto the group's base URL, or parsed as an absolute
    /// URL when the group has none.
    ///
    /// # Errors
    /// Returns an error if the URL cannot be resolved, no token can be
    /// obtained for a bound group, or the request fails.
    pub async fn send(&self, method: Method, path: &str) -> Result<Response, ServiceClientError> {
        let url = self.resolve(path)?;
        let mut request = self.client.request(method, url);

        if let Some(binding) = &self.oauth2 {
            let token = binding
                .manager
                .authorize(&binding.registration_id)
                .await
                .map_err(|source| ServiceClientError::Authorization {
                    group: self.group.clone(),
                    source,
                })?;
            request = request.bearer_auth(token.secret());
        }

        tracing::debug!(group = %self.group, "sending service group request");
        Ok(request.send().await?)
    }

    /// # Errors
    /// See [`Self::send`].
    pub async fn get(&self, path: &str) -> Result<Response, ServiceClientError> {
        self.send(Method::GET, path).await
    }
}

/// Built clients, one per group.
#[derive(Debug, Clone, Default)]
pub struct ServiceClients {
    clients: HashMap<String, ServiceClient>,
}

impl ServiceClients {
    /// # Errors
    /// Returns [`ServiceClientError::UnknownGroup`] for undeclared groups.
    pub fn client(&self, group: &str) -> Result<&ServiceClient, ServiceClientError> {
        self.clients
            .get(group)
            .ok_or_else(|| ServiceClientError::UnknownGroup(group.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl HttpServiceGroups {
    /// Build one client per group.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn into_clients(self) -> Result<ServiceClients, ServiceClientError> {
        let clients = self
            .into_inner()
            .into_iter()
            .map(|group| -> Result<_, ServiceClientError> {
                let client = ServiceClient::from_group(group)?;
                Ok((client.group.clone(), client))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        tracing::info!(groups = clients.len(), "HTTP service group clients built");
        Ok(ServiceClients { clients })
    }
}
