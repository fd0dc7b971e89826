//! Host environment surface.
//!
//! The host is whatever exposes on-device generative capabilities: one
//! namespace per [`CapabilityKind`], each with an availability check, a
//! construction entry point and capability-specific operations. Native
//! shapes vary across host versions, so every entry point defaults to
//! [`HostError::NotSupported`] and the provider adapter probes them in order.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, IntoEnumIterator};
use thiserror::Error;

use crate::types::{CapabilityKind, DownloadProgress, ProgressObserver};

/// Error raised by the host environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The entry point does not exist in this host version.
    #[error("not supported: {0}")]
    NotSupported(String),
    /// The host rejected the request (bad configuration, policy).
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("aborted: {0}")]
    Aborted(String),
    #[error("failed: {0}")]
    Failed(String),
}

impl HostError {
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported(_))
    }
}

/// Raw chunk stream produced by a native session.
pub type NativeStream = BoxStream<'static, Result<String, HostError>>;

/// Native operations a host session may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "camelCase")]
pub enum NativeMethod {
    PromptStreaming,
    WriteStreaming,
    RewriteStreaming,
    Prompt,
    Write,
    Rewrite,
}

/// Forwards host download-progress events to a caller-supplied observer.
#[derive(Clone)]
pub struct DownloadMonitor {
    capability: CapabilityKind,
    observer: ProgressObserver,
}

impl DownloadMonitor {
    pub fn new(capability: CapabilityKind, observer: ProgressObserver) -> Self {
        Self {
            capability,
            observer,
        }
    }

    /// Called by the host for every `downloadprogress` event.
    pub fn emit(&self, loaded: u64, total: u64) {
        let progress = DownloadProgress::new(loaded, total);
        tracing::debug!(
            capability = %self.capability,
            loaded,
            total,
            "download progress"
        );
        (self.observer)(progress);
    }

    pub fn capability(&self) -> CapabilityKind {
        self.capability
    }
}

impl std::fmt::Debug for DownloadMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadMonitor")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

/// A live host session. Owned exclusively by a [`crate::session::Session`].
#[async_trait]
pub trait NativeSession: Send + Sync {
    /// Start a streaming operation.
    async fn stream(&self, method: NativeMethod, _input: &str) -> Result<NativeStream, HostError> {
        Err(HostError::NotSupported(method.to_string()))
    }

    /// Run a direct (non-streaming) operation.
    async fn call(&self, method: NativeMethod, _input: &str) -> Result<String, HostError> {
        Err(HostError::NotSupported(method.to_string()))
    }

    /// Release host resources. Called exactly once.
    fn destroy(&self);
}

/// One capability namespace as exposed by the host.
#[async_trait]
pub trait CapabilityNamespace: Send + Sync {
    /// Modern availability entry point; returns the raw host answer.
    async fn availability(&self) -> Result<Value, HostError> {
        Err(HostError::NotSupported("availability".into()))
    }

    /// Legacy availability entry point; returns an object with `available`.
    async fn capabilities(&self) -> Result<Value, HostError> {
        Err(HostError::NotSupported("capabilities".into()))
    }

    /// Factory-style construction.
    async fn create(
        &self,
        _config: Value,
        _monitor: Option<DownloadMonitor>,
    ) -> Result<Box<dyn NativeSession>, HostError> {
        Err(HostError::NotSupported("create".into()))
    }

    /// Constructor-style construction.
    async fn construct(
        &self,
        _config: Value,
        _monitor: Option<DownloadMonitor>,
    ) -> Result<Box<dyn NativeSession>, HostError> {
        Err(HostError::NotSupported("constructor".into()))
    }
}

/// Environment flags read synchronously from the host.
///
/// `None` means the host does not expose the property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFlags {
    pub secure_context: Option<bool>,
    pub protocol: Option<String>,
    pub cross_origin_isolated: Option<bool>,
}

/// Storage quota estimate in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEstimate {
    pub quota: u64,
    pub usage: u64,
}

impl StorageEstimate {
    pub fn headroom(&self) -> u64 {
        self.quota.saturating_sub(self.usage)
    }
}

/// The host environment.
#[async_trait]
pub trait Host: Send + Sync {
    /// The namespace backing `kind`, if the host currently exposes it.
    ///
    /// Hosts may populate namespaces lazily, so answers can change over time.
    fn namespace(&self, kind: CapabilityKind) -> Option<Arc<dyn CapabilityNamespace>>;

    fn has_any_namespace(&self) -> bool {
        CapabilityKind::iter().any(|kind| self.namespace(kind).is_some())
    }

    fn environment(&self) -> EnvironmentFlags {
        EnvironmentFlags::default()
    }

    /// `Ok(None)` when the host has no storage estimate API.
    async fn storage_estimate(&self) -> Result<Option<StorageEstimate>, HostError> {
        Ok(None)
    }
}
