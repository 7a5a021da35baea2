//! Form login section.
//!
//! [`FormLoginDsl`] collects the optional login settings; [`FormLoginTarget`]
//! is the configurer they are forwarded to. [`FormLoginConfigurer`] is the
//! built-in target consumed by [`crate::http::secure`].

use std::{fmt, sync::Arc};

use axum::{
    http::{header::LOCATION, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use gk_dsl::{ApplyError, DisableFlag, Section};

pub const DEFAULT_LOGIN_PAGE: &str = "/login";
pub const DEFAULT_FAILURE_URL: &str = "/login?error";
pub const DEFAULT_SUCCESS_URL: &str = "/";

/// Invoked after credentials were accepted.
pub trait AuthenticationSuccessHandler: Send + Sync + fmt::Debug {
    fn on_authentication_success(&self, username: &str) -> Response;
}

/// Invoked after credentials were rejected.
pub trait AuthenticationFailureHandler: Send + Sync + fmt::Debug {
    fn on_authentication_failure(&self, reason: &str) -> Response;
}

/// Redirects to the default success URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectSuccessHandler {
    target_url: String,
    always_use: bool,
}

impl RedirectSuccessHandler {
    pub fn new(target_url: impl Into<String>, always_use: bool) -> Self {
        Self {
            target_url: target_url.into(),
            always_use,
        }
    }

    #[must_use]
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Whether the target URL is used even when a protected page was
    /// requested before login.
    #[must_use]
    pub const fn always_use(&self) -> bool {
        self.always_use
    }
}

impl AuthenticationSuccessHandler for RedirectSuccessHandler {
    fn on_authentication_success(&self, username: &str) -> Response {
        tracing::debug!(username, target = %self.target_url, "login succeeded, redirecting");
        redirect(&self.target_url)
    }
}

/// Redirects to the failure URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectFailureHandler {
    failure_url: String,
}

impl RedirectFailureHandler {
    pub fn new(failure_url: impl Into<String>) -> Self {
        Self {
            failure_url: failure_url.into(),
        }
    }

    #[must_use]
    pub fn failure_url(&self) -> &str {
        &self.failure_url
    }
}

impl AuthenticationFailureHandler for RedirectFailureHandler {
    fn on_authentication_failure(&self, reason: &str) -> Response {
        tracing::debug!(reason, target = %self.failure_url, "login failed, redirecting");
        redirect(&self.failure_url)
    }
}

fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// Setters a form login section forwards to.
pub trait FormLoginTarget {
    /// # Errors
    /// Rejects values that are neither absolute URLs nor paths.
    fn login_page(&mut self, url: &str) -> Result<(), ApplyError>;
    /// # Errors
    /// Rejects values that are neither absolute URLs nor paths.
    fn login_processing_url(&mut self, url: &str) -> Result<(), ApplyError>;
    /// # Errors
    /// Rejects values that are neither absolute URLs nor paths.
    fn failure_url(&mut self, url: &str) -> Result<(), ApplyError>;
    fn permit_all(&mut self, permit: bool);
    /// # Errors
    /// Rejects values that are neither absolute URLs nor paths.
    fn default_success_url(&mut self, url: &str, always_use: bool) -> Result<(), ApplyError>;
    fn success_handler(&mut self, handler: Arc<dyn AuthenticationSuccessHandler>);
    fn failure_handler(&mut self, handler: Arc<dyn AuthenticationFailureHandler>);
    /// # Errors
    /// Rejects empty names and names containing whitespace.
    fn username_parameter(&mut self, name: &str) -> Result<(), ApplyError>;
    /// # Errors
    /// Rejects empty names and names containing whitespace.
    fn password_parameter(&mut self, name: &str) -> Result<(), ApplyError>;
    fn disable(&mut self);
}

/// Where to land after a successful login, and whether to go there even
/// when a protected page was requested first. Always set as a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSuccessUrl {
    pub url: String,
    pub always_use: bool,
}

/// Optional form login settings.
///
/// ```
/// use gatekeeper_api::security::{FormLoginConfigurer, FormLoginDsl};
/// use gk_dsl::Section;
///
/// let dsl = FormLoginDsl::new()
///     .login_processing_url("/auth/login")
///     .default_success_url("/home", true);
/// let mut login = FormLoginConfigurer::default();
/// dsl.apply(&mut login).unwrap();
/// assert_eq!(login.processing_url(), "/auth/login");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormLoginDsl {
    login_page: Option<String>,
    login_processing_url: Option<String>,
    failure_url: Option<String>,
    permit_all: Option<bool>,
    default_success_url: Option<DefaultSuccessUrl>,
    success_handler: Option<Arc<dyn AuthenticationSuccessHandler>>,
    failure_handler: Option<Arc<dyn AuthenticationFailureHandler>>,
    username_parameter: Option<String>,
    password_parameter: Option<String>,
    disabled: DisableFlag,
}

impl FormLoginDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn login_page(mut self, url: impl Into<String>) -> Self {
        self.login_page = Some(url.into());
        self
    }

    #[must_use]
    pub fn login_processing_url(mut self, url: impl Into<String>) -> Self {
        self.login_processing_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn failure_url(mut self, url: impl Into<String>) -> Self {
        self.failure_url = Some(url.into());
        self
    }

    /// Let every user reach the login page, processing URL and failure URL.
    #[must_use]
    pub fn permit_all(mut self) -> Self {
        self.permit_all = Some(true);
        self
    }

    #[must_use]
    pub fn set_permit_all(mut self, permit: bool) -> Self {
        self.permit_all = Some(permit);
        self
    }

    #[must_use]
    pub fn default_success_url(mut self, url: impl Into<String>, always_use: bool) -> Self {
        self.default_success_url = Some(DefaultSuccessUrl {
            url: url.into(),
            always_use,
        });
        self
    }

    #[must_use]
    pub fn success_handler(mut self, handler: Arc<dyn AuthenticationSuccessHandler>) -> Self {
        self.success_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn failure_handler(mut self, handler: Arc<dyn AuthenticationFailureHandler>) -> Self {
        self.failure_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn username_parameter(mut self, name: impl Into<String>) -> Self {
        self.username_parameter = Some(name.into());
        self
    }

    #[must_use]
    pub fn password_parameter(mut self, name: impl Into<String>) -> Self {
        self.password_parameter = Some(name.into());
        self
    }

    /// Turn form login off. Anything else set on this section is ignored.
    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled.is_set()
    }
}

impl<T: FormLoginTarget + ?Sized> Section<T> for FormLoginDsl {
    fn apply(&self, login: &mut T) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            login.disable();
            return Ok(());
        }
        if let Some(url) = &self.login_page {
            login.login_page(url)?;
        }
        if let Some(url) = &self.login_processing_url {
            login.login_processing_url(url)?;
        }
        if let Some(url) = &self.failure_url {
            login.failure_url(url)?;
        }
        if let Some(permit) = self.permit_all {
            login.permit_all(permit);
        }
        if let Some(DefaultSuccessUrl { url, always_use }) = &self.default_success_url {
            login.default_success_url(url, *always_use)?;
        }
        if let Some(handler) = &self.success_handler {
            login.success_handler(Arc::clone(handler));
        }
        if let Some(handler) = &self.failure_handler {
            login.failure_handler(Arc::clone(handler));
        }
        if let Some(name) = &self.username_parameter {
            login.username_parameter(name)?;
        }
        if let Some(name) = &self.password_parameter {
            login.password_parameter(name)?;
        }
        Ok(())
    }
}

/// Built form login state.
#[derive(Debug, Clone)]
pub struct FormLoginConfigurer {
    enabled: bool,
    login_page: String,
    custom_login_page: bool,
    processing_url: String,
    failure_url: String,
    permit_all: bool,
    default_success_url: DefaultSuccessUrl,
    success_handler: Option<Arc<dyn AuthenticationSuccessHandler>>,
    failure_handler: Option<Arc<dyn AuthenticationFailureHandler>>,
    username_parameter: String,
    password_parameter: String,
}

impl Default for FormLoginConfigurer {
    fn default() -> Self {
        Self {
            enabled: true,
            login_page: DEFAULT_LOGIN_PAGE.to_string(),
            custom_login_page: false,
            processing_url: DEFAULT_LOGIN_PAGE.to_string(),
            failure_url: DEFAULT_FAILURE_URL.to_string(),
            permit_all: false,
            default_success_url: DefaultSuccessUrl {
                url: DEFAULT_SUCCESS_URL.to_string(),
                always_use: false,
            },
            success_handler: None,
            failure_handler: None,
            username_parameter: "username".to_string(),
            password_parameter: "password".to_string(),
        }
    }
}

impl FormLoginConfigurer {
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn login_page_url(&self) -> &str {
        &self.login_page
    }

    /// Whether the framework should serve its own login page.
    #[must_use]
    pub const fn generates_login_page(&self) -> bool {
        self.enabled && !self.custom_login_page
    }

    #[must_use]
    pub fn processing_url(&self) -> &str {
        &self.processing_url
    }

    #[must_use]
    pub fn failure_url_value(&self) -> &str {
        &self.failure_url
    }

    #[must_use]
    pub const fn permits_all(&self) -> bool {
        self.permit_all
    }

    #[must_use]
    pub const fn default_success(&self) -> &DefaultSuccessUrl {
        &self.default_success_url
    }

    #[must_use]
    pub fn username_param(&self) -> &str {
        &self.username_parameter
    }

    #[must_use]
    pub fn password_param(&self) -> &str {
        &self.password_parameter
    }

    /// Paths every user may reach when `permit_all` is on.
    #[must_use]
    pub fn permitted_paths(&self) -> Vec<&str> {
        if !self.enabled || !self.permit_all {
            return Vec::new();
        }
        let mut paths = Vec::with_capacity(3);
        for path in [
            self.login_page.as_str(),
            self.processing_url.as_str(),
            self.failure_url.as_str(),
        ] {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// The configured success handler, or a redirect to the default success URL.
    #[must_use]
    pub fn resolved_success_handler(&self) -> Arc<dyn AuthenticationSuccessHandler> {
        self.success_handler.clone().unwrap_or_else(|| {
            Arc::new(RedirectSuccessHandler::new(
                self.default_success_url.url.clone(),
                self.default_success_url.always_use,
            ))
        })
    }

    /// The configured failure handler, or a redirect to the failure URL.
    #[must_use]
    pub fn resolved_failure_handler(&self) -> Arc<dyn AuthenticationFailureHandler> {
        self.failure_handler
            .clone()
            .unwrap_or_else(|| Arc::new(RedirectFailureHandler::new(self.failure_url.clone())))
    }
}

fn validate_url(option: &'static str, value: &str) -> Result<(), ApplyError> {
    let uri: Uri = value
        .parse()
        .map_err(|e: axum::http::uri::InvalidUri| ApplyError::invalid(option, value, e.to_string()))?;
    if uri.scheme().is_some() || value.starts_with('/') {
        Ok(())
    } else {
        Err(ApplyError::invalid(
            option,
            value,
            "must be an absolute URL or start with '/'",
        ))
    }
}

fn validate_parameter(option: &'static str, value: &str) -> Result<(), ApplyError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ApplyError::invalid(
            option,
            value,
            "must be non-empty and contain no whitespace",
        ));
    }
    Ok(())
}

impl FormLoginTarget for FormLoginConfigurer {
    fn login_page(&mut self, url: &str) -> Result<(), ApplyError> {
        validate_url("login_page", url)?;
        self.login_page = url.to_string();
        self.custom_login_page = true;
        Ok(())
    }

    fn login_processing_url(&mut self, url: &str) -> Result<(), ApplyError> {
        validate_url("login_processing_url", url)?;
        self.processing_url = url.to_string();
        Ok(())
    }

    fn failure_url(&mut self, url: &str) -> Result<(), ApplyError> {
        validate_url("failure_url", url)?;
        self.failure_url = url.to_string();
        Ok(())
    }

    fn permit_all(&mut self, permit: bool) {
        self.permit_all = permit;
    }

    fn default_success_url(&mut self, url: &str, always_use: bool) -> Result<(), ApplyError> {
        validate_url("default_success_url", url)?;
        self.default_success_url = DefaultSuccessUrl {
            url: url.to_string(),
            always_use,
        };
        Ok(())
    }

    fn success_handler(&mut self, handler: Arc<dyn AuthenticationSuccessHandler>) {
        self.success_handler = Some(handler);
    }

    fn failure_handler(&mut self, handler: Arc<dyn AuthenticationFailureHandler>) {
        self.failure_handler = Some(handler);
    }

    fn username_parameter(&mut self, name: &str) -> Result<(), ApplyError> {
        validate_parameter("username_parameter", name)?;
        self.username_parameter = name.to_string();
        Ok(())
    }

    fn password_parameter(&mut self, name: &str) -> Result<(), ApplyError> {
        validate_parameter("password_parameter", name)?;
        self.password_parameter = name.to_string();
        Ok(())
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::missing_const_for_fn, clippy::must_use_candidate)]
pub mod mock {
    //! Target that records every setter call, for asserting what a section
    //! forwarded.

    use super::{
        ApplyError, AuthenticationFailureHandler, AuthenticationSuccessHandler, FormLoginTarget,
    };
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LoginCall {
        LoginPage(String),
        LoginProcessingUrl(String),
        FailureUrl(String),
        PermitAll(bool),
        DefaultSuccessUrl(String, bool),
        SuccessHandler,
        FailureHandler,
        UsernameParameter(String),
        PasswordParameter(String),
        Disable,
    }

    #[derive(Debug, Default)]
    pub struct RecordingLoginTarget {
        calls: Vec<LoginCall>,
    }

    impl RecordingLoginTarget {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> &[LoginCall] {
            &self.calls
        }
    }

    impl FormLoginTarget for RecordingLoginTarget {
        fn login_page(&mut self, url: &str) -> Result<(), ApplyError> {
            self.calls.push(LoginCall::LoginPage(url.to_string()));
            Ok(())
        }

        fn login_processing_url(&mut self, url: &str) -> Result<(), ApplyError> {
            self.calls.push(LoginCall::LoginProcessingUrl(url.to_string()));
            Ok(())
        }

        fn failure_url(&mut self, url: &str) -> Result<(), ApplyError> {
            self.calls.push(LoginCall::FailureUrl(url.to_string()));
            Ok(())
        }

        fn permit_all(&mut self, permit: bool) {
            self.calls.push(LoginCall::PermitAll(permit));
        }

        fn default_success_url(&mut self, url: &str, always_use: bool) -> Result<(), ApplyError> {
            self.calls
                .push(LoginCall::DefaultSuccessUrl(url.to_string(), always_use));
            Ok(())
        }

        fn success_handler(&mut self, _handler: Arc<dyn AuthenticationSuccessHandler>) {
            self.calls.push(LoginCall::SuccessHandler);
        }

        fn failure_handler(&mut self, _handler: Arc<dyn AuthenticationFailureHandler>) {
            self.calls.push(LoginCall::FailureHandler);
        }

        fn username_parameter(&mut self, name: &str) -> Result<(), ApplyError> {
            self.calls
                .push(LoginCall::UsernameParameter(name.to_string()));
            Ok(())
        }

        fn password_parameter(&mut self, name: &str) -> Result<(), ApplyError> {
            self.calls
                .push(LoginCall::PasswordParameter(name.to_string()));
            Ok(())
        }

        fn disable(&mut self) {
            self.calls.push(LoginCall::Disable);
        }
    }
}
