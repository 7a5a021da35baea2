use std::{fmt, str::FromStr};

use axum::http::{header::X_FRAME_OPTIONS, HeaderName, HeaderValue};
use gk_dsl::{ApplyError, DisableFlag, Section};
use serde::{Deserialize, Serialize};

/// `X-Frame-Options` value. Parsing is case-insensitive; the deprecated
/// `ALLOW-FROM` form is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum FrameOptionsMode {
    #[default]
    Deny,
    SameOrigin,
}

impl FrameOptionsMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deny => "DENY",
            Self::SameOrigin => "SAMEORIGIN",
        }
    }
}

impl FromStr for FrameOptionsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DENY" => Ok(Self::Deny),
            "SAMEORIGIN" => Ok(Self::SameOrigin),
            _ => Err(format!(
                "frame options must be 'DENY' or 'SAMEORIGIN', got: '{s}'"
            )),
        }
    }
}

impl TryFrom<String> for FrameOptionsMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FrameOptionsMode> for String {
    fn from(mode: FrameOptionsMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for FrameOptionsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOptionsConfig {
    enabled: bool,
    mode: FrameOptionsMode,
}

impl Default for FrameOptionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: FrameOptionsMode::Deny,
        }
    }
}

impl FrameOptionsConfig {
    pub(super) fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn mode(&mut self, mode: FrameOptionsMode) {
        self.mode = mode;
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
            out.push((X_FRAME_OPTIONS, HeaderValue::from_static(self.mode.as_str())));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameOptionsDsl {
    mode: Option<FrameOptionsMode>,
    disabled: DisableFlag,
}

impl FrameOptionsDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(mut self, mode: FrameOptionsMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn same_origin(self) -> Self {
        self.mode(FrameOptionsMode::SameOrigin)
    }

    #[must_use]
    pub fn deny(self) -> Self {
        self.mode(FrameOptionsMode::Deny)
    }

    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }
}

impl Section<FrameOptionsConfig> for FrameOptionsDsl {
    fn apply(&self, target: &mut FrameOptionsConfig) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            target.disable();
            return Ok(());
        }
        if let Some(mode) = self.mode {
            target.mode(mode);
        }
        Ok(())
    }
}
