use std::{collections::HashMap, sync::Arc};

use gk_dsl::{ApplyError, DisableFlag, Section};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Url,
};

use super::manager::AuthorizedClientManager;

/// OAuth2 binding of a service group: which registration to request a
/// token for, and who to ask.
#[derive(Debug, Clone)]
pub struct OAuth2Binding {
    pub registration_id: String,
    pub manager: Arc<dyn AuthorizedClientManager>,
}

/// Client settings shared by every service interface in one group.
#[derive(Debug, Clone)]
pub struct HttpServiceGroup {
    name: String,
    base_url: Option<Url>,
    default_headers: HeaderMap,
    oauth2: Option<OAuth2Binding>,
}

impl HttpServiceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: None,
            default_headers: HeaderMap::new(),
            oauth2: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn base_url_value(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    #[must_use]
    pub const fn oauth2(&self) -> Option<&OAuth2Binding> {
        self.oauth2.as_ref()
    }

    /// # Errors
    /// Rejects values that are not absolute `http(s)` URLs.
    pub fn base_url(&mut self, url: &str) -> Result<(), ApplyError> {
        let parsed =
            Url::parse(url).map_err(|e| ApplyError::invalid("base_url", url, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApplyError::invalid(
                "base_url",
                url,
                "scheme must be http or https",
            ));
        }
        self.base_url = Some(parsed);
        Ok(())
    }

    /// # Errors
    /// Rejects invalid header names or values.
    pub fn default_header(&mut self, name: &str, value: &str) -> Result<(), ApplyError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApplyError::invalid("default_headers", name, e.to_string()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ApplyError::invalid("default_headers", value, e.to_string()))?;
        self.default_headers.insert(header_name, header_value);
        Ok(())
    }

    pub fn bind_oauth2(&mut self, binding: OAuth2Binding) {
        self.oauth2 = Some(binding);
    }

    pub fn clear_oauth2(&mut self) {
        self.oauth2 = None;
    }
}

/// All declared service groups, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct HttpServiceGroups {
    groups: Vec<HttpServiceGroup>,
}

impl HttpServiceGroups {
    /// Groups with the given names and no settings yet.
    ///
    /// A name listed more than once declares a single group, kept at the
    /// position of its first occurrence.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut groups: Vec<HttpServiceGroup> = Vec::new();
        for name in names {
            let name = name.into();
            if groups.iter().any(|g| g.name == name) {
                tracing::debug!(group = %name, "service group declared twice");
                continue;
            }
            groups.push(HttpServiceGroup::new(name));
        }
        Self { groups }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HttpServiceGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HttpServiceGroup> {
        self.groups.iter()
    }

    pub(super) fn into_inner(self) -> Vec<HttpServiceGroup> {
        self.groups
    }

    /// Run `configure` on every group, stopping at the first error.
    ///
    /// # Errors
    /// Returns the first error `configure` reports.
    pub fn for_each_group<F>(&mut self, mut configure: F) -> Result<(), ApplyError>
    where
        F: FnMut(&mut HttpServiceGroup) -> Result<(), ApplyError>,
    {
        self.groups.iter_mut().try_for_each(|group| configure(group))
    }
}

/// Base URL and default headers for every group.
#[derive(Debug, Clone, Default)]
pub struct ClientDefaultsDsl {
    base_url: Option<String>,
    default_headers: Vec<(String, String)>,
}

impl ClientDefaultsDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }
}

impl Section<HttpServiceGroups> for ClientDefaultsDsl {
    fn apply(&self, groups: &mut HttpServiceGroups) -> Result<(), ApplyError> {
        groups.for_each_group(|group| {
            if let Some(url) = &self.base_url {
                group.base_url(url)?;
            }
            for (name, value) in &self.default_headers {
                group.default_header(name, value)?;
            }
            Ok(())
        })
    }
}

/// Attach an [`AuthorizedClientManager`] to every group so each request
/// carries a bearer token.
///
/// The registration id defaults to the group name.
#[derive(Debug, Clone)]
pub struct OAuth2ServiceGroupDsl {
    manager: Arc<dyn AuthorizedClientManager>,
    registration_ids: HashMap<String, String>,
    disabled: DisableFlag,
}

impl OAuth2ServiceGroupDsl {
    pub fn new(manager: Arc<dyn AuthorizedClientManager>) -> Self {
        Self {
            manager,
            registration_ids: HashMap::new(),
            disabled: DisableFlag::new(),
        }
    }

    /// Use `registration_id` instead of the group name for `group`.
    #[must_use]
    pub fn registration_id(
        mut self,
        group: impl Into<String>,
        registration_id: impl Into<String>,
    ) -> Self {
        self.registration_ids
            .insert(group.into(), registration_id.into());
        self
    }

    /// Remove OAuth2 bindings from every group.
    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }
}

impl Section<HttpServiceGroups> for OAuth2ServiceGroupDsl {
    fn apply(&self, groups: &mut HttpServiceGroups) -> Result<(), ApplyError> {
        groups.for_each_group(|group| {
            if self.disabled.is_set() {
                group.clear_oauth2();
                return Ok(());
            }
            let registration_id = self
                .registration_ids
                .get(group.name())
                .cloned()
                .unwrap_or_else(|| group.name().to_string());
            group.bind_oauth2(OAuth2Binding {
                registration_id,
                manager: Arc::clone(&self.manager),
            });
            Ok(())
        })
    }
}
