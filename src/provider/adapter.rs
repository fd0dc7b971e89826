//! Host-shape adapter.
//!
//! Host versions disagree on entry point names and construction style. Each
//! table below lists the known shapes in preference order; an entry point that
//! answers `NotSupported` is treated as absent and the next one is tried. Any
//! other error is final.

use serde_json::Value;

use crate::host::{CapabilityNamespace, DownloadMonitor, HostError, NativeMethod, NativeSession, NativeStream};
use crate::types::AvailabilityStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AvailabilityEntry {
    /// `availability()` returning a status string.
    Availability,
    /// Legacy `capabilities()` returning `{ available: .. }`.
    Capabilities,
}

const AVAILABILITY_ENTRIES: [AvailabilityEntry; 2] =
    [AvailabilityEntry::Availability, AvailabilityEntry::Capabilities];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstructionEntry {
    /// `Namespace.create(options)`.
    Factory,
    /// `new Namespace(options)`.
    Constructor,
}

const CONSTRUCTION_ENTRIES: [ConstructionEntry; 2] =
    [ConstructionEntry::Factory, ConstructionEntry::Constructor];

/// Ask the namespace for its availability and normalize the answer.
pub(crate) async fn query_availability(
    namespace: &dyn CapabilityNamespace,
) -> Result<AvailabilityStatus, HostError> {
    for entry in AVAILABILITY_ENTRIES {
        let raw = match entry {
            AvailabilityEntry::Availability => namespace.availability().await,
            AvailabilityEntry::Capabilities => namespace.capabilities().await,
        };
        match raw {
            Ok(raw) => {
                let status = AvailabilityStatus::from_raw(&raw);
                tracing::debug!(?entry, raw = %raw, %status, "availability answered");
                return Ok(status);
            }
            Err(e) if e.is_not_supported() => continue,
            Err(e) => return Err(e),
        }
    }
    Err(HostError::NotSupported(
        "no availability entry point".into(),
    ))
}

/// Construct a native session through whichever entry point the host has.
pub(crate) async fn construct_session(
    namespace: &dyn CapabilityNamespace,
    config: Value,
    monitor: Option<DownloadMonitor>,
) -> Result<Box<dyn NativeSession>, HostError> {
    for entry in CONSTRUCTION_ENTRIES {
        let result = match entry {
            ConstructionEntry::Factory => namespace.create(config.clone(), monitor.clone()).await,
            ConstructionEntry::Constructor => {
                namespace.construct(config.clone(), monitor.clone()).await
            }
        };
        match result {
            Ok(session) => {
                tracing::debug!(?entry, "native session constructed");
                return Ok(session);
            }
            Err(e) if e.is_not_supported() => continue,
            Err(e) => return Err(e),
        }
    }
    Err(HostError::NotSupported(
        "no construction entry point".into(),
    ))
}

/// Open the first streaming method in `methods` the session supports.
pub(crate) async fn open_stream(
    native: &dyn NativeSession,
    methods: &[NativeMethod],
    input: &str,
) -> Result<(NativeMethod, NativeStream), HostError> {
    for &method in methods {
        match native.stream(method, input).await {
            Ok(stream) => return Ok((method, stream)),
            Err(e) if e.is_not_supported() => continue,
            Err(e) => return Err(e),
        }
    }
    Err(HostError::NotSupported(format!(
        "none of {} supported",
        method_list(methods)
    )))
}

/// Run the first direct method in `methods` the session supports.
pub(crate) async fn call_direct(
    native: &dyn NativeSession,
    methods: &[NativeMethod],
    input: &str,
) -> Result<String, HostError> {
    for &method in methods {
        match native.call(method, input).await {
            Err(e) if e.is_not_supported() => continue,
            other => return other,
        }
    }
    Err(HostError::NotSupported(format!(
        "none of {} supported",
        method_list(methods)
    )))
}

fn method_list(methods: &[NativeMethod]) -> String {
    methods
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
