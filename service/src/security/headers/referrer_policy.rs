use std::fmt;

use axum::http::{header::REFERRER_POLICY, HeaderName, HeaderValue};
use gk_dsl::{ApplyError, DisableFlag, Section};
use serde::{Deserialize, Serialize};

/// Referrer-Policy tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    NoReferrer,
    NoReferrerWhenDowngrade,
    SameOrigin,
    Origin,
    StrictOrigin,
    OriginWhenCrossOrigin,
    #[default]
    StrictOriginWhenCrossOrigin,
    UnsafeUrl,
}

impl ReferrerPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoReferrer => "no-referrer",
            Self::NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
            Self::SameOrigin => "same-origin",
            Self::Origin => "origin",
            Self::StrictOrigin => "strict-origin",
            Self::OriginWhenCrossOrigin => "origin-when-cross-origin",
            Self::StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
            Self::UnsafeUrl => "unsafe-url",
        }
    }
}

impl fmt::Display for ReferrerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Referrer-Policy`. Off until declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferrerPolicyConfig {
    enabled: bool,
    policy: ReferrerPolicy,
}

impl ReferrerPolicyConfig {
    pub(super) fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn policy(&mut self, policy: ReferrerPolicy) {
        self.policy = policy;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(super) fn write(&self, out: &mut Vec<(HeaderName, HeaderValue)>) {
        if self.enabled {
            out.push((REFERRER_POLICY, HeaderValue::from_static(self.policy.as_str())));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferrerPolicyDsl {
    policy: Option<ReferrerPolicy>,
    disabled: DisableFlag,
}

impl ReferrerPolicyDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn policy(mut self, policy: ReferrerPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }
}

impl Section<ReferrerPolicyConfig> for ReferrerPolicyDsl {
    fn apply(&self, target: &mut ReferrerPolicyConfig) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            target.disable();
            return Ok(());
        }
        if let Some(policy) = self.policy {
            target.policy(policy);
        }
        Ok(())
    }
}
