use axum::http::{
    header::{CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_REPORT_ONLY},
    HeaderName, HeaderValue,
};
use gk_dsl::{ApplyError, DisableFlag, Section};

pub const DEFAULT_POLICY_DIRECTIVES: &str = "default-src 'self'";

/// `Content-Security-Policy`, or its `-Report-Only` variant. Exactly one of
/// the two header names is written. Off until declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSecurityPolicyConfig {
    enabled: bool,
    policy_directives: String,
    report_only: bool,
}

impl Default for ContentSecurityPolicyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            policy_directives: DEFAULT_POLICY_DIRECTIVES.to_string(),
            report_only: false,
        }
    }
}

impl ContentSecurityPolicyConfig {
    pub(super) fn enable(&mut self) {
        self.enabled = true;
    }

    /// # Errors
    /// Rejects blank directives and values that cannot be sent as a header.
    pub fn policy_directives(&mut self, directives: &str) -> Result<(), ApplyError> {
        if directives.trim().is_empty() {
            return Err(ApplyError::invalid(
                "policy_directives",
                directives,
                "must not be empty",
            ));
        }
        HeaderValue::from_str(directives).map_err(|e| {
            ApplyError::invalid("policy_directives", directives, e.to_string())
        })?;
        self.policy_directives = directives.to_string();
        Ok(())
    }

    pub fn report_only(&mut self, report_only: bool) {
        self.report_only = report_only;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn directives(&self) -> &str {
        &self.policy_directives
    }

    #[must_use]
    pub fn header_name(&self) -> HeaderName {
        if self.report_only {
            CONTENT_SECURITY_POLICY_REPORT_ONLY
        } else {
            CONTENT_SECURITY_POLICY
        }
    }

    pub(super) fn write(&self, out: &mut Vec<(HeaderName, HeaderValue)>) {
        if !self.enabled {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(&self.policy_directives) {
            out.push((self.header_name(), value));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentSecurityPolicyDsl {
    policy_directives: Option<String>,
    report_only: Option<bool>,
    disabled: DisableFlag,
}

impl ContentSecurityPolicyDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn policy_directives(mut self, directives: impl Into<String>) -> Self {
        self.policy_directives = Some(directives.into());
        self
    }

    /// Ask browsers to report violations without enforcing the policy.
    #[must_use]
    pub fn report_only(mut self, report_only: bool) -> Self {
        self.report_only = Some(report_only);
        self
    }

    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }
}

impl Section<ContentSecurityPolicyConfig> for ContentSecurityPolicyDsl {
    fn apply(&self, target: &mut ContentSecurityPolicyConfig) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            target.disable();
            return Ok(());
        }
        if let Some(directives) = &self.policy_directives {
            target.policy_directives(directives)?;
        }
        if let Some(report_only) = self.report_only {
            target.report_only(report_only);
        }
        Ok(())
    }
}
