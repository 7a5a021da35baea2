use std::fmt;

use axum::http::{header::X_XSS_PROTECTION, HeaderName, HeaderValue};
use gk_dsl::{ApplyError, DisableFlag, Section};
use serde::{Deserialize, Serialize};

/// Value of the legacy `X-XSS-Protection` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum XssHeaderValue {
    #[serde(rename = "0")]
    Disabled,
    #[serde(rename = "1")]
    Enabled,
    #[default]
    #[serde(rename = "1; mode=block")]
    EnabledModeBlock,
}

impl XssHeaderValue {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "0",
            Self::Enabled => "1",
            Self::EnabledModeBlock => "1; mode=block",
        }
    }
}

impl fmt::Display for XssHeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XssProtectionConfig {
    enabled: bool,
    header_value: XssHeaderValue,
}

impl Default for XssProtectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            header_value: XssHeaderValue::default(),
        }
    }
}

impl XssProtectionConfig {
    pub(super) fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn header_value(&mut self, value: XssHeaderValue) {
        self.header_value = value;
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
            out.push((
                X_XSS_PROTECTION,
                HeaderValue::from_static(self.header_value.as_str()),
            ));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct XssProtectionDsl {
    header_value: Option<XssHeaderValue>,
    disabled: DisableFlag,
}

impl XssProtectionDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header_value(mut self, value: XssHeaderValue) -> Self {
        self.header_value = Some(value);
        self
    }

    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }
}

impl Section<XssProtectionConfig> for XssProtectionDsl {
    fn apply(&self, target: &mut XssProtectionConfig) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            target.disable();
            return Ok(());
        }
        if let Some(value) = self.header_value {
            target.header_value(value);
        }
        Ok(())
    }
}
