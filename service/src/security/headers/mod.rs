//! Response header policy sections.
//!
//! [`HeadersConfigurer`] holds one child configuration per header family.
//! Content type options, XSS protection, cache control and frame options are
//! on by default; HSTS, CSP and referrer policy are written only once their
//! section is declared. [`HeadersDsl`] applies declared children in a fixed
//! order through a nested [`CompositionRoot`].

mod cache_control;
mod content_security_policy;
mod content_type_options;
mod frame_options;
mod hsts;
mod referrer_policy;
mod xss_protection;

use axum::http::{HeaderName, HeaderValue};
use gk_dsl::{ApplyError, CompositionRoot, DisableFlag, Section};

pub use cache_control::{CacheControlConfig, CacheControlDsl};
pub use content_security_policy::{
    ContentSecurityPolicyConfig, ContentSecurityPolicyDsl, DEFAULT_POLICY_DIRECTIVES,
};
pub use content_type_options::{ContentTypeOptionsConfig, ContentTypeOptionsDsl};
pub use frame_options::{FrameOptionsConfig, FrameOptionsDsl, FrameOptionsMode};
pub use hsts::{HstsConfig, HstsDsl, DEFAULT_HSTS_MAX_AGE};
pub use referrer_policy::{ReferrerPolicy, ReferrerPolicyConfig, ReferrerPolicyDsl};
pub use xss_protection::{XssHeaderValue, XssProtectionConfig, XssProtectionDsl};

/// Built header state for every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersConfigurer {
    enabled: bool,
    content_type_options: ContentTypeOptionsConfig,
    xss_protection: XssProtectionConfig,
    cache_control: CacheControlConfig,
    hsts: HstsConfig,
    frame_options: FrameOptionsConfig,
    content_security_policy: ContentSecurityPolicyConfig,
    referrer_policy: ReferrerPolicyConfig,
}

impl Default for HeadersConfigurer {
    fn default() -> Self {
        Self {
            enabled: true,
            content_type_options: ContentTypeOptionsConfig::default(),
            xss_protection: XssProtectionConfig::default(),
            cache_control: CacheControlConfig::default(),
            hsts: HstsConfig::default(),
            frame_options: FrameOptionsConfig::default(),
            content_security_policy: ContentSecurityPolicyConfig::default(),
            referrer_policy: ReferrerPolicyConfig::default(),
        }
    }
}

impl HeadersConfigurer {
    /// Stop writing security headers altogether.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Turn off the writers that are on by default. Sections declared
    /// afterwards switch their own writer back on.
    pub fn defaults_disabled(&mut self) {
        self.content_type_options.disable();
        self.xss_protection.disable();
        self.cache_control.disable();
        self.hsts.disable();
        self.frame_options.disable();
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn content_type_options(&mut self) -> &mut ContentTypeOptionsConfig {
        self.content_type_options.enable();
        &mut self.content_type_options
    }

    pub fn xss_protection(&mut self) -> &mut XssProtectionConfig {
        self.xss_protection.enable();
        &mut self.xss_protection
    }

    pub fn cache_control(&mut self) -> &mut CacheControlConfig {
        self.cache_control.enable();
        &mut self.cache_control
    }

    pub fn hsts(&mut self) -> &mut HstsConfig {
        self.hsts.enable();
        &mut self.hsts
    }

    pub fn frame_options(&mut self) -> &mut FrameOptionsConfig {
        self.frame_options.enable();
        &mut self.frame_options
    }

    pub fn content_security_policy(&mut self) -> &mut ContentSecurityPolicyConfig {
        self.content_security_policy.enable();
        &mut self.content_security_policy
    }

    pub fn referrer_policy(&mut self) -> &mut ReferrerPolicyConfig {
        self.referrer_policy.enable();
        &mut self.referrer_policy
    }

    #[must_use]
    pub const fn csp(&self) -> &ContentSecurityPolicyConfig {
        &self.content_security_policy
    }

    /// Headers to add to every response, in write order. Empty when
    /// disabled.
    #[must_use]
    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut out = Vec::new();
        if !self.enabled {
            return out;
        }
        self.content_type_options.write(&mut out);
        self.xss_protection.write(&mut out);
        self.cache_control.write(&mut out);
        self.hsts.write(&mut out);
        self.frame_options.write(&mut out);
        self.content_security_policy.write(&mut out);
        self.referrer_policy.write(&mut out);
        out
    }
}

/// Optional settings for the headers area.
///
/// ```
/// use gatekeeper_api::security::headers::{
///     ContentSecurityPolicyDsl, HeadersConfigurer, HeadersDsl,
/// };
/// use gk_dsl::Section;
///
/// let dsl = HeadersDsl::new().content_security_policy(
///     ContentSecurityPolicyDsl::new().report_only(true),
/// );
/// let mut headers = HeadersConfigurer::default();
/// dsl.apply(&mut headers).unwrap();
/// assert!(headers
///     .headers()
///     .iter()
///     .any(|(name, _)| name == "content-security-policy-report-only"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeadersDsl {
    content_type_options: Option<ContentTypeOptionsDsl>,
    xss_protection: Option<XssProtectionDsl>,
    cache_control: Option<CacheControlDsl>,
    hsts: Option<HstsDsl>,
    frame_options: Option<FrameOptionsDsl>,
    content_security_policy: Option<ContentSecurityPolicyDsl>,
    referrer_policy: Option<ReferrerPolicyDsl>,
    defaults_disabled: bool,
    disabled: DisableFlag,
}

impl HeadersDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn content_type_options(mut self, dsl: ContentTypeOptionsDsl) -> Self {
        self.content_type_options = Some(dsl);
        self
    }

    #[must_use]
    pub fn xss_protection(mut self, dsl: XssProtectionDsl) -> Self {
        self.xss_protection = Some(dsl);
        self
    }

    #[must_use]
    pub fn cache_control(mut self, dsl: CacheControlDsl) -> Self {
        self.cache_control = Some(dsl);
        self
    }

    #[must_use]
    pub fn hsts(mut self, dsl: HstsDsl) -> Self {
        self.hsts = Some(dsl);
        self
    }

    #[must_use]
    pub fn frame_options(mut self, dsl: FrameOptionsDsl) -> Self {
        self.frame_options = Some(dsl);
        self
    }

    #[must_use]
    pub fn content_security_policy(mut self, dsl: ContentSecurityPolicyDsl) -> Self {
        self.content_security_policy = Some(dsl);
        self
    }

    #[must_use]
    pub fn referrer_policy(mut self, dsl: ReferrerPolicyDsl) -> Self {
        self.referrer_policy = Some(dsl);
        self
    }

    #[must_use]
    pub fn defaults_disabled(mut self) -> Self {
        self.defaults_disabled = true;
        self
    }

    /// Remove every security header. Child sections are ignored.
    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }
}

impl Section<HeadersConfigurer> for HeadersDsl {
    fn apply(&self, headers: &mut HeadersConfigurer) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            headers.disable();
            return Ok(());
        }
        if self.defaults_disabled {
            headers.defaults_disabled();
        }

        let mut root = CompositionRoot::new();
        if let Some(dsl) = &self.content_type_options {
            root = root.section(
                "content_type_options",
                HeadersConfigurer::content_type_options,
                dsl,
            );
        }
        if let Some(dsl) = &self.xss_protection {
            root = root.section("xss_protection", HeadersConfigurer::xss_protection, dsl);
        }
        if let Some(dsl) = &self.cache_control {
            root = root.section("cache_control", HeadersConfigurer::cache_control, dsl);
        }
        if let Some(dsl) = &self.hsts {
            root = root.section("hsts", HeadersConfigurer::hsts, dsl);
        }
        if let Some(dsl) = &self.frame_options {
            root = root.section("frame_options", HeadersConfigurer::frame_options, dsl);
        }
        if let Some(dsl) = &self.content_security_policy {
            root = root.section(
                "content_security_policy",
                HeadersConfigurer::content_security_policy,
                dsl,
            );
        }
        if let Some(dsl) = &self.referrer_policy {
            root = root.section("referrer_policy", HeadersConfigurer::referrer_policy, dsl);
        }
        root.build(headers)
    }
}
