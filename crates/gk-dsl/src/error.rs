use thiserror::Error;

/// Errors raised while applying sections to a target.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A target setter rejected the value it was given.
    #[error("invalid value {value:?} for `{option}`: {reason}")]
    InvalidValue {
        option: &'static str,
        value: String,
        reason: String,
    },

    /// A section inside a composition root failed.
    #[error("section `{section}` failed: {source}")]
    Section {
        section: &'static str,
        #[source]
        source: Box<ApplyError>,
    },
}

impl ApplyError {
    /// Shorthand for [`ApplyError::InvalidValue`].
    pub fn invalid(
        option: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            option,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Section names from the outermost composition down to the failing
    /// option, e.g. `["headers", "content_security_policy",
    /// "policy_directives"]`.
    #[must_use]
    pub fn path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut current = self;
        loop {
            match current {
                Self::Section { section, source } => {
                    path.push(*section);
                    current = source;
                }
                Self::InvalidValue { option, .. } => {
                    path.push(*option);
                    return path;
                }
            }
        }
    }
}
