//! Convenience re-exports for common use.

pub use crate::config::{FallbackPolicy, ProbeSettings, SwitchboardConfig};
pub use crate::diagnostics::{DiagnosticStatus, DiagnosticsReport, RemediationHint};
pub use crate::error::{Result, SwitchboardError};
pub use crate::host::{CapabilityNamespace, Host, HostError, NativeMethod, NativeSession};
pub use crate::provider::{Backing, CapabilityProvider};
pub use crate::session::Session;
pub use crate::stream::{accumulate_stream, StreamAccumulator, StreamOutcome, TextChunkStream};
pub use crate::switchboard::Switchboard;
pub use crate::types::{
    AvailabilityStatus, CapabilityKind, DownloadProgress, Length, SessionRequestOptions, Tone,
};
