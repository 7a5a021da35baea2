//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! This module provides a thin wrapper around `wiremock` for declarative
//! HTTP stubbing. Use it to mock the APIs behind service group clients.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_external_api_call() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/user")
//!         .with_header("Authorization", "Bearer token")
//!         .respond_with_json(json!({"login": "octocat"}))
//!         .mount()
//!         .await;
//!
//!     // Point the client at server.url()
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)` or `.respond_with_body(string)`
//! - **Error response**: `.respond_with_status(500)`
//! - **Request verification**: `.expect_times(1)` to assert call count

use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// A running stub server. Expectations are verified when it is dropped.
pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL with a trailing slash, suitable as a service group base.
    pub fn url(&self) -> String {
        format!("{}/", self.server.uri())
    }

    /// Stub `GET path`.
    pub fn expect_get(&self, route: &str) -> StubBuilder<'_> {
        StubBuilder {
            server: &self.server,
            builder: Mock::given(method("GET")).and(path(route)),
            response: ResponseTemplate::new(200),
            times: None,
        }
    }
}

/// Fluent stub definition, mounted with [`StubBuilder::mount`].
pub struct StubBuilder<'a> {
    server: &'a MockServer,
    builder: MockBuilder,
    response: ResponseTemplate,
    times: Option<u64>,
}

impl StubBuilder<'_> {
    /// Only match requests carrying `name: value`.
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.builder = self.builder.and(header(name, value));
        self
    }

    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.response = ResponseTemplate::new(200).set_body_json(body);
        self
    }

    pub fn respond_with_body(mut self, body: impl Into<String>) -> Self {
        self.response = ResponseTemplate::new(200).set_body_string(body.into());
        self
    }

    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.response = ResponseTemplate::new(status);
        self
    }

    /// Assert the stub is hit exactly `n` times.
    pub fn expect_times(mut self, n: u64) -> Self {
        self.times = Some(n);
        self
    }

    pub async fn mount(self) {
        let mut mock = self.builder.respond_with(self.response);
        if let Some(n) = self.times {
            mock = mock.expect(n);
        }
        mock.mount(self.server).await;
    }
}
