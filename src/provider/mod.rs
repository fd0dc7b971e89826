//! Capability provider trait and implementations.

pub(crate) mod adapter;
pub mod chat;
pub mod rewriter;
pub mod writer;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use crate::config::{FallbackPolicy, SwitchboardConfig};
use crate::error::{Result, SwitchboardError};
use crate::host::{CapabilityNamespace, DownloadMonitor, Host};
use crate::session::{Session, SessionRoutes};
use crate::types::{AvailabilityStatus, CapabilityKind, SessionRequestOptions};

pub use chat::ChatProvider;
pub use rewriter::RewriterProvider;
pub use writer::WriterProvider;

/// How a session's capability is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Backing {
    /// The host's dedicated namespace.
    Native,
    /// The chat namespace standing in with an engineered system prompt.
    Simulated,
}

/// The namespace a provider would use right now.
#[derive(Clone)]
pub enum Resolution {
    Native(Arc<dyn CapabilityNamespace>),
    Simulated(Arc<dyn CapabilityNamespace>),
    Missing,
}

impl Resolution {
    pub fn backing(&self) -> Option<Backing> {
        match self {
            Self::Native(_) => Some(Backing::Native),
            Self::Simulated(_) => Some(Backing::Simulated),
            Self::Missing => None,
        }
    }

    pub fn namespace(&self) -> Option<&Arc<dyn CapabilityNamespace>> {
        match self {
            Self::Native(ns) | Self::Simulated(ns) => Some(ns),
            Self::Missing => None,
        }
    }
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.backing() {
            Some(backing) => write!(f, "Resolution::{backing:?}"),
            None => f.write_str("Resolution::Missing"),
        }
    }
}

/// Core trait implemented by every capability provider.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    fn kind(&self) -> CapabilityKind;

    /// Which namespace backs this provider in the current host state.
    fn resolve(&self) -> Resolution;

    /// Native availability check, normalized. No timeout at this level.
    ///
    /// A missing namespace or a failing check reports `Unavailable`.
    async fn probe(&self) -> AvailabilityStatus {
        let resolution = self.resolve();
        let Some(namespace) = resolution.namespace() else {
            return AvailabilityStatus::Unavailable;
        };
        match adapter::query_availability(namespace.as_ref()).await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!(capability = %self.kind(), error = %e, "availability check failed");
                AvailabilityStatus::Unavailable
            }
        }
    }

    /// Instantiate the capability and wrap it in the uniform session contract.
    async fn create_session(&self, options: &SessionRequestOptions) -> Result<Session>;
}

/// Create the built-in provider for `kind`.
pub fn create_provider(
    kind: CapabilityKind,
    host: Arc<dyn Host>,
    config: &SwitchboardConfig,
) -> Arc<dyn CapabilityProvider> {
    match kind {
        CapabilityKind::Chat => Arc::new(ChatProvider::new(host)),
        CapabilityKind::Writer => Arc::new(WriterProvider::new(host, config.writer_fallback)),
        CapabilityKind::Rewriter => {
            Arc::new(RewriterProvider::new(host, config.rewriter_fallback))
        }
    }
}

/// Resolve a specialized kind: its own namespace, else Chat if policy allows.
pub(crate) fn resolve_with_fallback(
    host: &dyn Host,
    kind: CapabilityKind,
    fallback: FallbackPolicy,
) -> Resolution {
    if let Some(namespace) = host.namespace(kind) {
        return Resolution::Native(namespace);
    }
    if kind.can_simulate() && fallback == FallbackPolicy::Simulate {
        if let Some(chat) = host.namespace(CapabilityKind::Chat) {
            return Resolution::Simulated(chat);
        }
    }
    Resolution::Missing
}

/// Construct a native session and wrap it.
///
/// Shared by all providers: wires the progress monitor, maps host
/// construction failures, and attaches the routes for the resolved backing.
pub(crate) async fn open_session(
    kind: CapabilityKind,
    resolution: Resolution,
    config: Value,
    options: &SessionRequestOptions,
    routes: SessionRoutes,
) -> Result<Session> {
    let (namespace, backing) = match &resolution {
        Resolution::Native(ns) => (ns.clone(), Backing::Native),
        Resolution::Simulated(ns) => {
            tracing::warn!(capability = %kind, "dedicated capability absent, simulating via chat");
            (ns.clone(), Backing::Simulated)
        }
        Resolution::Missing => {
            return Err(SwitchboardError::CapabilityUnavailable { capability: kind })
        }
    };

    let monitor = options
        .progress_observer
        .clone()
        .map(|observer| DownloadMonitor::new(kind, observer));

    let native = adapter::construct_session(namespace.as_ref(), config, monitor)
        .await
        .map_err(|e| {
            tracing::debug!(capability = %kind, error = %e, "host rejected session construction");
            SwitchboardError::construction(kind, e.to_string())
        })?;

    Ok(Session::new(kind, backing, native, routes))
}
