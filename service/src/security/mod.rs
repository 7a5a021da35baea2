//! Declarative HTTP security configuration.
//!
//! An [`HttpSecurityDsl`] lists the policy sections a service wants (form
//! login, response headers, CORS) in the order they were declared.
//! [`HttpSecurityDsl::build`] applies them to a fresh [`HttpSecurity`]
//! target, which [`crate::http::secure`] then wires into an axum router.
//!
//! ```
//! use gatekeeper_api::security::{
//!     headers::{ContentSecurityPolicyDsl, HeadersDsl},
//!     FormLoginDsl, HttpSecurityDsl,
//! };
//!
//! let security = HttpSecurityDsl::new()
//!     .form_login(FormLoginDsl::new().permit_all())
//!     .headers(HeadersDsl::new().content_security_policy(
//!         ContentSecurityPolicyDsl::new()
//!             .policy_directives("default-src 'self'; script-src trustedscripts.example.com"),
//!     ))
//!     .build()
//!     .unwrap();
//! assert!(security.is_form_login_enabled());
//! ```

pub mod cors;
pub mod headers;
pub mod login;

use gk_dsl::{ApplyError, CompositionRoot};

pub use cors::{CorsConfigurer, CorsDsl};
pub use headers::{HeadersConfigurer, HeadersDsl};
pub use login::{
    AuthenticationFailureHandler, AuthenticationSuccessHandler, DefaultSuccessUrl,
    FormLoginConfigurer, FormLoginDsl, FormLoginTarget,
};

/// The built security configuration handed to the router.
///
/// Headers are active by default; form login and CORS exist only once their
/// section has been applied.
#[derive(Debug, Clone, Default)]
pub struct HttpSecurity {
    form_login: Option<FormLoginConfigurer>,
    headers: HeadersConfigurer,
    cors: Option<CorsConfigurer>,
}

impl HttpSecurity {
    /// Form login configuration, created with defaults on first access.
    pub fn form_login_mut(&mut self) -> &mut FormLoginConfigurer {
        self.form_login.get_or_insert_with(FormLoginConfigurer::default)
    }

    pub fn headers_mut(&mut self) -> &mut HeadersConfigurer {
        &mut self.headers
    }

    /// CORS configuration, created with defaults on first access.
    pub fn cors_mut(&mut self) -> &mut CorsConfigurer {
        self.cors.get_or_insert_with(CorsConfigurer::default)
    }

    #[must_use]
    pub const fn form_login(&self) -> Option<&FormLoginConfigurer> {
        self.form_login.as_ref()
    }

    #[must_use]
    pub fn is_form_login_enabled(&self) -> bool {
        self.form_login.as_ref().is_some_and(FormLoginConfigurer::is_enabled)
    }

    #[must_use]
    pub const fn headers(&self) -> &HeadersConfigurer {
        &self.headers
    }

    #[must_use]
    pub const fn cors(&self) -> Option<&CorsConfigurer> {
        self.cors.as_ref()
    }
}

#[derive(Debug, Clone)]
enum SecuritySection {
    FormLogin(FormLoginDsl),
    Headers(HeadersDsl),
    Cors(CorsDsl),
}

/// Ordered list of security sections.
///
/// Declaring the same area twice is allowed; the later section is applied
/// after the earlier one and overrides whatever it set.
#[derive(Debug, Clone, Default)]
pub struct HttpSecurityDsl {
    sections: Vec<SecuritySection>,
}

impl HttpSecurityDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn form_login(mut self, dsl: FormLoginDsl) -> Self {
        self.sections.push(SecuritySection::FormLogin(dsl));
        self
    }

    #[must_use]
    pub fn headers(mut self, dsl: HeadersDsl) -> Self {
        self.sections.push(SecuritySection::Headers(dsl));
        self
    }

    #[must_use]
    pub fn cors(mut self, dsl: CorsDsl) -> Self {
        self.sections.push(SecuritySection::Cors(dsl));
        self
    }

    /// Apply every section to a fresh [`HttpSecurity`].
    ///
    /// # Errors
    ///
    /// Returns the first rejected option. Use [`Self::build_into`] to
    /// inspect what was applied before the failure.
    pub fn build(self) -> Result<HttpSecurity, ApplyError> {
        let mut security = HttpSecurity::default();
        self.build_into(&mut security)?;
        Ok(security)
    }

    /// Apply every section to `security`, in declaration order.
    ///
    /// Sections before a failing one stay applied; nothing is rolled back.
    ///
    /// # Errors
    ///
    /// Returns the first rejected option, wrapped with its section name.
    pub fn build_into(self, security: &mut HttpSecurity) -> Result<(), ApplyError> {
        let mut root = CompositionRoot::new();
        for section in &self.sections {
            root = match section {
                SecuritySection::FormLogin(dsl) => {
                    root.section("form_login", HttpSecurity::form_login_mut, dsl)
                }
                SecuritySection::Headers(dsl) => {
                    root.section("headers", HttpSecurity::headers_mut, dsl)
                }
                SecuritySection::Cors(dsl) => root.section("cors", HttpSecurity::cors_mut, dsl),
            };
        }
        tracing::debug!(sections = ?root.names(), "building http security");
        root.build(security)
    }
}
