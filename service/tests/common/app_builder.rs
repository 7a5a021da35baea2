//! Test app builder that mirrors main.rs wiring with injectable security sections.
//!
//! This module provides a [`TestAppBuilder`] that constructs an Axum router matching
//! the production configuration in `main.rs`, but with test-specific routes and
//! security declarations.
//!
//! # Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_full_app() {
//!     let app = TestAppBuilder::minimal()
//!         .with_cors(&["http://localhost:3000"])
//!         .build();
//!
//!     // Use app.oneshot(...) to send requests
//! }
//! ```
//!
//! # Preset Builders
//!
//! - [`TestAppBuilder::minimal()`] - Health check only, default headers
//! - [`TestAppBuilder::with_form_login()`] - Health check plus generated login page

use axum::{
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, MethodRouter},
    Router,
};
use gatekeeper_api::{
    http::secure,
    security::{CorsDsl, FormLoginDsl, HeadersDsl, HttpSecurity, HttpSecurityDsl},
};
use gk_dsl::ApplyError;

/// Health check handler (mirrors main.rs)
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Builder for test applications that mirrors main.rs wiring.
///
/// Security sections are collected into an [`HttpSecurityDsl`] in the order
/// the `with_*` methods are called, then applied once by [`Self::build`].
pub struct TestAppBuilder {
    /// Whether to include health check route
    include_health: bool,
    /// Routes whose handler sets its own header, keyed by path
    header_routes: Vec<(&'static str, HeaderName, &'static str)>,
    /// Application routes registered before security is applied
    routes: Vec<(&'static str, MethodRouter)>,
    /// Declared security sections
    security: HttpSecurityDsl,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    /// Create a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_health: false,
            header_routes: Vec::new(),
            routes: Vec::new(),
            security: HttpSecurityDsl::new(),
        }
    }

    // =========================================================================
    // Preset Builders
    // =========================================================================

    /// Create a minimal app with only the health check endpoint.
    #[must_use]
    pub fn minimal() -> Self {
        Self::new().with_health()
    }

    /// Health check plus a form login section with defaults.
    #[must_use]
    pub fn with_form_login() -> Self {
        Self::minimal().with_login(FormLoginDsl::new().permit_all())
    }

    // =========================================================================
    // Component Configuration
    // =========================================================================

    /// Include health check route (/health).
    #[must_use]
    pub fn with_health(mut self) -> Self {
        self.include_health = true;
        self
    }

    /// Add a `GET path` route whose handler sets `name: value` itself.
    #[must_use]
    pub fn with_header_route(
        mut self,
        path: &'static str,
        name: HeaderName,
        value: &'static str,
    ) -> Self {
        self.header_routes.push((path, name, value));
        self
    }

    /// Add an application route at `path`.
    #[must_use]
    pub fn with_route(mut self, path: &'static str, route: MethodRouter) -> Self {
        self.routes.push((path, route));
        self
    }

    /// Declare a form login section.
    #[must_use]
    pub fn with_login(mut self, dsl: FormLoginDsl) -> Self {
        self.security = self.security.form_login(dsl);
        self
    }

    /// Declare a headers section.
    #[must_use]
    pub fn with_headers(mut self, dsl: HeadersDsl) -> Self {
        self.security = self.security.headers(dsl);
        self
    }

    /// Declare a CORS section allowing `origins`.
    #[must_use]
    pub fn with_cors(mut self, origins: &[&str]) -> Self {
        self.security = self
            .security
            .cors(CorsDsl::new().allowed_origins(origins.iter().copied()));
        self
    }

    /// Replace every declared section with `dsl`.
    #[must_use]
    pub fn with_security(mut self, dsl: HttpSecurityDsl) -> Self {
        self.security = dsl;
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Build the router, panicking if a section is rejected.
    pub fn build(self) -> Router {
        self.try_build().expect("security sections should apply")
    }

    /// Build the router and the resolved security configuration.
    pub fn try_build(self) -> Result<Router, ApplyError> {
        self.try_build_with_security().map(|(router, _)| router)
    }

    /// Like [`Self::try_build`], also returning the applied configuration.
    pub fn try_build_with_security(self) -> Result<(Router, HttpSecurity), ApplyError> {
        let security = self.security.build()?;

        let mut router = Router::new();
        if self.include_health {
            router = router.route("/health", get(health_check));
        }
        for (path, route) in self.routes {
            router = router.route(path, route);
        }
        for (path, name, value) in self.header_routes {
            router = router.route(
                path,
                get(move || async move {
                    let mut response = StatusCode::OK.into_response();
                    response
                        .headers_mut()
                        .insert(name.clone(), HeaderValue::from_static(value));
                    response
                }),
            );
        }

        Ok((secure(router, &security), security))
    }
}
