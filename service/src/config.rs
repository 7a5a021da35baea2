use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;
use tracing_subscriber::EnvFilter;

use crate::security::{
    headers::{
        CacheControlDsl, ContentSecurityPolicyDsl, ContentTypeOptionsDsl, FrameOptionsDsl,
        FrameOptionsMode, HeadersDsl, HstsDsl, ReferrerPolicy, ReferrerPolicyDsl,
        XssHeaderValue, XssProtectionDsl,
    },
    CorsDsl, FormLoginDsl, HttpSecurityDsl,
};

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with GK_ prefix (always wins)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP server bind address.
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log filter directive (e.g. `info`, `gatekeeper_api=debug,info`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Declarative security sections. Absent sections leave the framework
/// defaults in place; unknown section names are rejected.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    pub form_login: Option<FormLoginSettings>,
    #[serde(default)]
    pub headers: HeadersSettings,
    pub cors: Option<CorsSettings>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FormLoginSettings {
    pub login_page: Option<String>,
    pub login_processing_url: Option<String>,
    pub failure_url: Option<String>,
    pub permit_all: Option<bool>,
    pub default_success_url: Option<DefaultSuccessUrlSettings>,
    pub username_parameter: Option<String>,
    pub password_parameter: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Success URL and its "always use" flag, always given together.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultSuccessUrlSettings {
    pub url: String,
    #[serde(default)]
    pub always_use: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeadersSettings {
    /// Remove every security header.
    #[serde(default)]
    pub disabled: bool,

    /// Only write headers whose section is listed below.
    #[serde(default)]
    pub defaults_disabled: bool,

    pub content_type_options: Option<ToggleSettings>,
    pub xss_protection: Option<XssProtectionSettings>,
    pub cache_control: Option<ToggleSettings>,
    pub hsts: Option<HstsSettings>,
    pub frame_options: Option<FrameOptionsSettings>,
    pub content_security_policy: Option<ContentSecurityPolicySettings>,
    pub referrer_policy: Option<ReferrerPolicySettings>,
}

/// A header section whose only setting is the kill switch.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleSettings {
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct XssProtectionSettings {
    pub header_value: Option<XssHeaderValue>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HstsSettings {
    pub max_age_seconds: Option<u64>,
    pub include_subdomains: Option<bool>,
    pub preload: Option<bool>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FrameOptionsSettings {
    /// "DENY" or "SAMEORIGIN" (case-insensitive).
    pub mode: Option<FrameOptionsMode>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContentSecurityPolicySettings {
    pub policy_directives: Option<String>,
    pub report_only: Option<bool>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReferrerPolicySettings {
    pub policy: Option<ReferrerPolicy>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorsSettings {
    /// Allowed origins for CORS requests.
    /// Use `"*"` to allow any origin (not recommended for production).
    /// Accepts either an array or comma-separated string.
    /// Example: `["http://localhost:5173"]` or `"http://localhost:5173,https://app.example.com"`
    #[serde(default, deserialize_with = "deserialize_list")]
    pub allowed_origins: Vec<String>,

    /// Allowed methods; same formats as `allowed_origins`.
    #[serde(default, deserialize_with = "deserialize_list")]
    pub allowed_methods: Vec<String>,

    #[serde(default)]
    pub disabled: bool,
}

/// Deserialize a list from comma-separated string or array, filtering empty values.
fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(items.into_iter().filter(|s| !s.is_empty()).collect())
}

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl FormLoginSettings {
    fn to_dsl(&self) -> FormLoginDsl {
        let mut dsl = FormLoginDsl::new();
        if let Some(url) = &self.login_page {
            dsl = dsl.login_page(url);
        }
        if let Some(url) = &self.login_processing_url {
            dsl = dsl.login_processing_url(url);
        }
        if let Some(url) = &self.failure_url {
            dsl = dsl.failure_url(url);
        }
        if let Some(permit) = self.permit_all {
            dsl = dsl.set_permit_all(permit);
        }
        if let Some(success) = &self.default_success_url {
            dsl = dsl.default_success_url(&success.url, success.always_use);
        }
        if let Some(name) = &self.username_parameter {
            dsl = dsl.username_parameter(name);
        }
        if let Some(name) = &self.password_parameter {
            dsl = dsl.password_parameter(name);
        }
        if self.disabled {
            dsl = dsl.disable();
        }
        dsl
    }
}

impl HeadersSettings {
    fn to_dsl(&self) -> HeadersDsl {
        let mut dsl = HeadersDsl::new();
        if self.defaults_disabled {
            dsl = dsl.defaults_disabled();
        }
        if let Some(settings) = &self.content_type_options {
            let mut section = ContentTypeOptionsDsl::new();
            if settings.disabled {
                section = section.disable();
            }
            dsl = dsl.content_type_options(section);
        }
        if let Some(settings) = &self.xss_protection {
            let mut section = XssProtectionDsl::new();
            if let Some(value) = settings.header_value {
                section = section.header_value(value);
            }
            if settings.disabled {
                section = section.disable();
            }
            dsl = dsl.xss_protection(section);
        }
        if let Some(settings) = &self.cache_control {
            let mut section = CacheControlDsl::new();
            if settings.disabled {
                section = section.disable();
            }
            dsl = dsl.cache_control(section);
        }
        if let Some(settings) = &self.hsts {
            let mut section = HstsDsl::new();
            if let Some(seconds) = settings.max_age_seconds {
                section = section.max_age_seconds(seconds);
            }
            if let Some(include) = settings.include_subdomains {
                section = section.include_subdomains(include);
            }
            if let Some(preload) = settings.preload {
                section = section.preload(preload);
            }
            if settings.disabled {
                section = section.disable();
            }
            dsl = dsl.hsts(section);
        }
        if let Some(settings) = &self.frame_options {
            let mut section = FrameOptionsDsl::new();
            if let Some(mode) = settings.mode {
                section = section.mode(mode);
            }
            if settings.disabled {
                section = section.disable();
            }
            dsl = dsl.frame_options(section);
        }
        if let Some(settings) = &self.content_security_policy {
            let mut section = ContentSecurityPolicyDsl::new();
            if let Some(directives) = &settings.policy_directives {
                section = section.policy_directives(directives);
            }
            if let Some(report_only) = settings.report_only {
                section = section.report_only(report_only);
            }
            if settings.disabled {
                section = section.disable();
            }
            dsl = dsl.content_security_policy(section);
        }
        if let Some(settings) = &self.referrer_policy {
            let mut section = ReferrerPolicyDsl::new();
            if let Some(policy) = settings.policy {
                section = section.policy(policy);
            }
            if settings.disabled {
                section = section.disable();
            }
            dsl = dsl.referrer_policy(section);
        }
        if self.disabled {
            dsl = dsl.disable();
        }
        dsl
    }
}

impl CorsSettings {
    fn to_dsl(&self) -> CorsDsl {
        let mut dsl = CorsDsl::new();
        if !self.allowed_origins.is_empty() {
            dsl = dsl.allowed_origins(self.allowed_origins.iter().cloned());
        }
        if !self.allowed_methods.is_empty() {
            dsl = dsl.allowed_methods(self.allowed_methods.iter().cloned());
        }
        if self.disabled {
            dsl = dsl.disable();
        }
        dsl
    }
}

impl SecurityConfig {
    /// Sections in fixed order: form login, headers, CORS.
    #[must_use]
    pub fn to_dsl(&self) -> HttpSecurityDsl {
        let mut dsl = HttpSecurityDsl::new();
        if let Some(login) = &self.form_login {
            dsl = dsl.form_login(login.to_dsl());
        }
        dsl = dsl.headers(self.headers.to_dsl());
        if let Some(cors) = &self.cors {
            dsl = dsl.cors(cors.to_dsl());
        }
        dsl
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. config.yaml file (if exists)
    /// 3. Environment variables with GK_ prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("GK_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Security option values are checked when the sections are applied,
    /// not here.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Port must be non-zero
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".into()));
        }

        if let Err(e) = EnvFilter::try_new(&self.logging.level) {
            return Err(ConfigError::Validation(format!(
                "logging.level '{}' is not a valid filter: {e}",
                self.logging.level
            )));
        }

        Ok(())
    }
}
