//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use crate::types::SectionSlug;

/// Core layer error type
///
/// Validation failures and server field errors are never reported through this type;
/// they travel as [`FieldErrors`](crate::types::FieldErrors) data.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// A setter was called while the section is in view mode
    #[error("Section {slug} is read-only, refused to change {field}")]
    ReadOnlyViolation { slug: SectionSlug, field: String },

    /// The controller was unregistered and must no longer change
    #[error("Controller for {0} has been disposed")]
    ControllerDisposed(SectionSlug),

    /// A patch was requested for a draft that does not validate
    #[error("Draft for {0} does not validate")]
    InvalidDraft(SectionSlug),

    /// The item already has a request in flight
    #[error("Item {item} of {slug} has a pending request")]
    ItemPending { slug: SectionSlug, item: String },

    /// The section exists in the vocabulary but cannot be mounted as a controller
    #[error("Section cannot be mounted: {0}")]
    UnsupportedSection(SectionSlug),

    /// Slug string outside the closed vocabulary
    #[error("Unknown section slug: {0}")]
    UnknownSlug(String),

    /// Baseline values for a section could not be decoded
    #[error("Failed to decode baseline for {slug}: {detail}")]
    BaselineDecode { slug: SectionSlug, detail: String },

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Builder or configuration misuse
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    ConfigError(String),

    /// network error
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, stale UI, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ReadOnlyViolation { .. }
            | Self::ControllerDisposed(_)
            | Self::InvalidDraft(_)
            | Self::ItemPending { .. }
            | Self::UnsupportedSection(_)
            | Self::UnknownSlug(_)
            | Self::ValidationError(_) => true,
            Self::BaselineDecode { .. }
            | Self::SerializationError(_)
            | Self::ConfigError(_)
            | Self::NetworkError(_) => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_violation_is_expected() {
        let err = CoreError::ReadOnlyViolation {
            slug: SectionSlug::Title,
            field: "title".to_string(),
        };
        assert!(err.is_expected());
        assert_eq!(
            err.to_string(),
            "Section title is read-only, refused to change title"
        );
    }

    #[test]
    fn transport_faults_are_not_expected() {
        assert!(!CoreError::NetworkError("reset".to_string()).is_expected());
        assert!(!CoreError::ConfigError("missing".to_string()).is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let json = serde_json::to_value(CoreError::InvalidDraft(SectionSlug::Price)).unwrap();
        assert_eq!(json["code"], "InvalidDraft");
        assert_eq!(json["details"], "price");
    }
}
