//! Error types for the switchboard.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::types::CapabilityKind;

/// Primary error type for all switchboard operations.
///
/// Only session creation and stream consumption surface these to callers.
/// Probing and diagnostics absorb failures into status values instead.
#[derive(Error, Debug)]
pub enum SwitchboardError {
    #[error("Capability unavailable: {capability} is not exposed by the host")]
    CapabilityUnavailable { capability: CapabilityKind },

    #[error("Capability construction failed for {capability}: {message}")]
    CapabilityConstructionFailed {
        capability: CapabilityKind,
        message: String,
    },

    #[error("Availability probe timed out after {0}ms")]
    ProbeTimeout(u64),

    #[error("Streaming failure in {capability}: {message}")]
    Streaming {
        capability: CapabilityKind,
        message: String,
    },

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SwitchboardError {
    /// Create a construction failure for a capability.
    pub fn construction(capability: CapabilityKind, message: impl Into<String>) -> Self {
        Self::CapabilityConstructionFailed {
            capability,
            message: message.into(),
        }
    }

    /// Create a mid-stream failure for a capability.
    pub fn streaming(capability: CapabilityKind, message: impl Into<String>) -> Self {
        Self::Streaming {
            capability,
            message: message.into(),
        }
    }

    /// The capability this error concerns, if any.
    pub fn capability(&self) -> Option<CapabilityKind> {
        match self {
            Self::CapabilityUnavailable { capability }
            | Self::CapabilityConstructionFailed { capability, .. }
            | Self::Streaming { capability, .. } => Some(*capability),
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CapabilityUnavailable { .. } => ErrorCategory::Availability,
            Self::CapabilityConstructionFailed { .. } => ErrorCategory::Construction,
            Self::ProbeTimeout(_) => ErrorCategory::Timeout,
            Self::Streaming { .. } => ErrorCategory::Streaming,
            Self::UnknownStrategy(_) | Self::UnsupportedOperation(_) => ErrorCategory::Usage,
            Self::Configuration(_) | Self::Toml(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Io(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether a caller may reasonably retry the failed operation.
    ///
    /// Providers never retry on their own; this only informs caller policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Timeout | ErrorCategory::Streaming
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Availability => RecoverySuggestion::RunDiagnostics,
            ErrorCategory::Construction => RecoverySuggestion::CheckOptions,
            ErrorCategory::Timeout => RecoverySuggestion::ProbeAgain,
            ErrorCategory::Streaming => RecoverySuggestion::RecreateSession,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Usage => RecoverySuggestion::FixCaller,
            _ => RecoverySuggestion::ReportBug,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SwitchboardError>;
