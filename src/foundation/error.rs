/// Convenience result type used across the showroom crate.
pub type ShowroomResult<T> = Result<T, ShowroomError>;

/// Top-level error taxonomy for the lifecycle controller and the palette.
#[derive(thiserror::Error, Debug)]
pub enum ShowroomError {
    /// Schema or a required asset could not be fetched or decoded.
    #[error("load failure: {0}")]
    Load(String),

    /// UI wiring references a category or target the schema does not define.
    #[error("configuration schema violation: {0}")]
    SchemaViolation(String),

    /// Invalid user-provided schema or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Sequencing contract broken by the caller (e.g. palette used before initialization).
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShowroomError {
    /// Build a [`ShowroomError::Load`] value naming the failed item.
    pub fn load(item: impl Into<String>) -> Self {
        Self::Load(item.into())
    }

    /// Build a [`ShowroomError::SchemaViolation`] value.
    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Build a [`ShowroomError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShowroomError::Invariant`] value.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Build a [`ShowroomError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that end the session (load failures and schema violations).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Load(_) | Self::SchemaViolation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
