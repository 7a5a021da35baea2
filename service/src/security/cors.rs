//! Cross-origin request policy.

use axum::http::{HeaderValue, Method};
use gk_dsl::{ApplyError, DisableFlag, Section};

/// Built CORS policy. Absent from [`HttpSecurity`](super::HttpSecurity)
/// until a CORS section is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfigurer {
    enabled: bool,
    allowed_origins: Vec<String>,
    origin_values: Vec<HeaderValue>,
    allowed_methods: Vec<Method>,
}

impl Default for CorsConfigurer {
    fn default() -> Self {
        Self {
            enabled: true,
            // Block cross-origin requests until origins are configured
            allowed_origins: Vec::new(),
            origin_values: Vec::new(),
            allowed_methods: vec![Method::GET, Method::POST, Method::OPTIONS],
        }
    }
}

impl CorsConfigurer {
    /// # Errors
    /// Rejects origins that are neither `*` nor `http(s)://` URLs, and
    /// origins that are not valid header values.
    pub fn allowed_origins(&mut self, origins: &[String]) -> Result<(), ApplyError> {
        let mut values = Vec::with_capacity(origins.len());
        for origin in origins {
            if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://")
            {
                return Err(ApplyError::invalid(
                    "allowed_origins",
                    origin.as_str(),
                    "must be '*' or start with http:// or https://",
                ));
            }
            let value = HeaderValue::from_str(origin).map_err(|e| {
                ApplyError::invalid("allowed_origins", origin.as_str(), e.to_string())
            })?;
            values.push(value);
        }
        self.allowed_origins = origins.to_vec();
        self.origin_values = values;
        Ok(())
    }

    /// # Errors
    /// Rejects tokens that are not valid HTTP method names.
    pub fn allowed_methods(&mut self, methods: &[String]) -> Result<(), ApplyError> {
        let parsed = methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_uppercase().as_bytes())
                    .map_err(|e| ApplyError::invalid("allowed_methods", m.as_str(), e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.allowed_methods = parsed;
        Ok(())
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Origins as header values, in the order they were given.
    #[must_use]
    pub fn origin_values(&self) -> &[HeaderValue] {
        &self.origin_values
    }

    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsDsl {
    allowed_origins: Option<Vec<String>>,
    allowed_methods: Option<Vec<String>>,
    disabled: DisableFlag,
}

impl CorsDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass `["*"]` to allow any origin, an empty list to block all.
    #[must_use]
    pub fn allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = Some(origins.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn allowed_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn disable(mut self) -> Self {
        self.disabled.set();
        self
    }
}

impl Section<CorsConfigurer> for CorsDsl {
    fn apply(&self, cors: &mut CorsConfigurer) -> Result<(), ApplyError> {
        if self.disabled.is_set() {
            cors.disable();
            return Ok(());
        }
        if let Some(origins) = &self.allowed_origins {
            cors.allowed_origins(origins)?;
        }
        if let Some(methods) = &self.allowed_methods {
            cors.allowed_methods(methods)?;
        }
        Ok(())
    }
}
