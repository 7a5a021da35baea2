use axum::http::{header::STRICT_TRANSPORT_SECURITY, HeaderName, HeaderValue};
use gk_dsl::{ApplyError, DisableFlag, Section};

pub const DEFAULT_HSTS_MAX_AGE: u64 = 31_536_000; // 1 year

/// `Strict-Transport-Security`. Off until declared; only meant for HTTPS
/// deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HstsConfig {
    enabled: bool,
    max_age: u64,
    include_subdomains: bool,
    preload: bool,
}

impl Default for HstsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_age: DEFAULT_HSTS_MAX_AGE,
            include_subdomains: true,
            preload: false,
        }
    }
}

impl HstsConfig {
    pub(super) fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn max_age_seconds(&mut self, seconds: u64) {
        self.max_age = seconds;
    }

    pub fn include_subdomains(&mut self, include: bool) {
        self.include_subdomains = include;
    }

    pub fn preload(&mut self, preload: bool) {
        self.preload = preload;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn header_value(&self) -> String {
        let mut value = format!("max-age={}", self.max_age);
        if self.include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if self.preload {
            value.push_str("; preload");
        }
        value
    }

    pub(super) fn write(&self, out: &mut Vec<(HeaderName, HeaderValue)>) {
        if !self.enabled {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(&self.header_value()) {
            out.push((STRICT_TRANSPORT_SECURITY, value));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HstsDsl {
    max_age_seconds: Option<u64>,
    include_subdomains: Option<bool>,
    preload: Option<bool>,
    disabled: DisableFlag,
}

impl HstsDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_age_seconds(mut self, seconds: u64) -> Self {
        self.max_age_seconds = Some(seconds);
        self
    }

    #[must_use]
    pub fn include_subdomains(mut self, include: bool) -> Self {
        self.include_subdomains = Some(include);
        self
    }

    #[must_use]
    pub fn preload(mut self, preload: bool) -> Self {
        self.preload = Some(preload);
        self
    }

    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }
}

impl Section<HstsConfig> for HstsDsl {
    fn apply(&self, target: &mut HstsConfig) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            target.disable();
            return Ok(());
        }
        if let Some(seconds) = self.max_age_seconds {
            target.max_age_seconds(seconds);
        }
        if let Some(include) = self.include_subdomains {
            target.include_subdomains(include);
        }
        if let Some(preload) = self.preload {
            target.preload(preload);
        }
        Ok(())
    }
}
