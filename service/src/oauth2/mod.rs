//! OAuth2-aware HTTP service groups.
//!
//! A service group is a named set of outbound HTTP interfaces that share
//! client settings. Groups are configured with the same section pattern as
//! the inbound security configuration:
//!
//! - [`ClientDefaultsDsl`] - base URL and default headers for every group
//! - [`OAuth2ServiceGroupDsl`] - bind an [`AuthorizedClientManager`] so each
//!   request carries a bearer token
//!
//! ```ignore
//! use gatekeeper_api::oauth2::{
//!     ClientDefaultsDsl, HttpServiceGroups, InMemoryAuthorizedClientManager,
//!     OAuth2ServiceGroupDsl,
//! };
//! use gk_dsl::Section;
//!
//! let manager = Arc::new(InMemoryAuthorizedClientManager::new());
//! let mut groups = HttpServiceGroups::new(["github"]);
//! ClientDefaultsDsl::new()
//!     .base_url("https://api.github.com/")
//!     .default_header("Accept", "application/vnd.github.v3+json")
//!     .apply(&mut groups)?;
//! OAuth2ServiceGroupDsl::new(manager).apply(&mut groups)?;
//! let clients = groups.into_clients()?;
//! let response = clients.client("github")?.get("user").await?;
//! ```

mod client;
mod groups;
mod manager;

pub use client::{ServiceClient, ServiceClientError, ServiceClients};
pub use groups::{
    ClientDefaultsDsl, HttpServiceGroup, HttpServiceGroups, OAuth2Binding, OAuth2ServiceGroupDsl,
};
pub use manager::{
    AccessToken, AuthorizationError, AuthorizedClientManager, InMemoryAuthorizedClientManager,
};
