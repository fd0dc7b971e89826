//! Error classification and recovery hints.

use serde::{Deserialize, Serialize};

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Availability,
    Construction,
    Timeout,
    Streaming,
    Usage,
    Configuration,
    Serialization,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoverySuggestion {
    /// Collect a diagnostics report and show setup guidance.
    RunDiagnostics,
    /// The host rejected the session configuration.
    CheckOptions,
    /// Call the availability check again.
    ProbeAgain,
    /// Discard the session and create a fresh one.
    RecreateSession,
    CheckConfiguration,
    /// The caller used the API incorrectly.
    FixCaller,
    ReportBug,
}
