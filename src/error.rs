use thiserror::Error;

/// Errors raised while turning external parameters into a [`ParameterSet`].
///
/// Both variants are fatal: the engine never runs on a configuration that
/// produced one of them.
///
/// [`ParameterSet`]: crate::config::ParameterSet
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A required top-level section is absent.
    #[error("missing required section `{section}`")]
    Shape { section: &'static str },

    /// A value is present but outside its admissible range.
    #[error("invalid `{field}`: {reason}")]
    Range { field: String, reason: String },
}

impl ConfigError {
    pub fn range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Range {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Dotted path of the offending section or field.
    pub fn field(&self) -> &str {
        match self {
            Self::Shape { section } => section,
            Self::Range { field, .. } => field,
        }
    }
}
