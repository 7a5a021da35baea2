use axum::http::{
    header::{CACHE_CONTROL, EXPIRES, PRAGMA},
    HeaderName, HeaderValue,
};
use gk_dsl::{ApplyError, DisableFlag, Section};

/// Headers that stop browsers and proxies from caching responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheControlConfig {
    enabled: bool,
}

impl Default for CacheControlConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl CacheControlConfig {
    pub(super) fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(super) fn write(&self, out: &mut Vec<(HeaderName, HeaderValue)>) {
        if !self.enabled {
            return;
        }
        out.push((
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, max-age=0, must-revalidate"),
        ));
        out.push((PRAGMA, HeaderValue::from_static("no-cache")));
        out.push((EXPIRES, HeaderValue::from_static("0")));
    }
}

/// Cache control has no settings of its own; it can only be switched off.
#[derive(Debug, Clone, Default)]
pub struct CacheControlDsl {
    disabled: DisableFlag,
}

impl CacheControlDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }
}

impl Section<CacheControlConfig> for CacheControlDsl {
    fn apply(&self, target: &mut CacheControlConfig) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            target.disable();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_three_headers_when_enabled() {
        let mut out = Vec::new();
        CacheControlConfig::default().write(&mut out);
        let names: Vec<_> = out.iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(names, vec![CACHE_CONTROL, PRAGMA, EXPIRES]);
    }

    #[test]
    fn disable_removes_all_of_them() {
        let mut config = CacheControlConfig::default();
        CacheControlDsl::new()
            .disable()
            .apply(&mut config)
            .expect("apply");
        let mut out = Vec::new();
        config.write(&mut out);
        assert!(out.is_empty());
    }
}
