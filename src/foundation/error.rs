/// Convenience result type used across dwellscope.
pub type DwellResult<T> = Result<T, DwellError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum DwellError {
    /// Invalid configuration or API arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unreadable keyframe tables or schedules.
    #[error("parse error: {0}")]
    Parse(String),

    /// A track needs at least two samples to define an interval.
    #[error("not enough samples: entity '{entity}' has fewer than 2 samples")]
    NotEnoughSamples {
        /// Canonical id of the entity whose track is too short.
        entity: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DwellError {
    /// Build a [`DwellError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DwellError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`DwellError::NotEnoughSamples`] value.
    pub fn not_enough_samples(entity: impl Into<String>) -> Self {
        Self::NotEnoughSamples {
            entity: entity.into(),
        }
    }

    /// Build a [`DwellError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for DwellError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
