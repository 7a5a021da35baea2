use axum::http::{header::X_CONTENT_TYPE_OPTIONS, HeaderName, HeaderValue};
use gk_dsl::{ApplyError, DisableFlag, Section};

/// `X-Content-Type-Options: nosniff`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeOptionsConfig {
    enabled: bool,
}

impl Default for ContentTypeOptionsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ContentTypeOptionsConfig {
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
        if self.enabled {
            out.push((X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentTypeOptionsDsl {
    disabled: DisableFlag,
}

impl ContentTypeOptionsDsl {
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

impl Section<ContentTypeOptionsConfig> for ContentTypeOptionsDsl {
    fn apply(&self, target: &mut ContentTypeOptionsConfig) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            target.disable();
        }
        Ok(())
    }
}
