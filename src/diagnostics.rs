//! Environment diagnostics for setup guidance.
//!
//! Collected when no capability is usable so the caller can render
//! actionable remediation instead of a bare failure. Collection never fails:
//! each check is raced against the probe timeout on its own, and a missing or
//! failing capability only affects its own entry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoEnumIterator};

use crate::config::SwitchboardConfig;
use crate::host::{CapabilityNamespace, Host};
use crate::provider::{adapter, Backing, CapabilityProvider};
use crate::types::{AvailabilityStatus, CapabilityKind};
use crate::util::timeout::with_timeout;

/// Per-capability status as seen by diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum DiagnosticStatus {
    Ready,
    Downloadable,
    Unavailable,
    UnknownTimeout,
    /// The host does not expose the namespace.
    Missing,
    /// The availability check raised.
    Error { message: String },
}

impl DiagnosticStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Downloadable => "downloadable",
            Self::Unavailable => "unavailable",
            Self::UnknownTimeout => "unknown-timeout",
            Self::Missing => "missing",
            Self::Error { .. } => "error",
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Ready | Self::Downloadable)
    }
}

impl From<AvailabilityStatus> for DiagnosticStatus {
    fn from(status: AvailabilityStatus) -> Self {
        match status {
            AvailabilityStatus::Ready => Self::Ready,
            AvailabilityStatus::Downloadable => Self::Downloadable,
            AvailabilityStatus::Unavailable => Self::Unavailable,
            AvailabilityStatus::UnknownTimeout => Self::UnknownTimeout,
        }
    }
}

impl fmt::Display for DiagnosticStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error { message } => write!(f, "error: {message}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// One capability's entry in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDiagnostic {
    pub namespace_present: bool,
    /// Status of the capability's own namespace.
    pub status: DiagnosticStatus,
    /// How a session would be satisfied; `None` when it cannot be.
    pub backing: Option<Backing>,
}

/// Coarse storage headroom classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageClass {
    Ample,
    Constrained,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentReport {
    pub secure_context: Option<bool>,
    pub protocol: Option<String>,
    pub cross_origin_isolated: Option<bool>,
    pub storage: StorageClass,
    pub storage_headroom_bytes: Option<u64>,
}

/// Machine-readable setup guidance, localized by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RemediationHint {
    InsecureContext,
    NotCrossOriginIsolated,
    StorageConstrained,
    NoCapabilityNamespace,
    CapabilityDownloadable,
}

/// Snapshot of capability and environment state. Fresh on every collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub generated_at: DateTime<Utc>,
    pub capabilities: BTreeMap<CapabilityKind, CapabilityDiagnostic>,
    pub environment: EnvironmentReport,
}

impl DiagnosticsReport {
    pub fn capability(&self, kind: CapabilityKind) -> Option<&CapabilityDiagnostic> {
        self.capabilities.get(&kind)
    }

    /// Whether any capability namespace reported a usable status.
    pub fn any_usable(&self) -> bool {
        self.capabilities.values().any(|c| c.status.is_usable())
    }

    pub fn hints(&self) -> Vec<RemediationHint> {
        let mut hints = Vec::new();
        if self.environment.secure_context == Some(false) {
            hints.push(RemediationHint::InsecureContext);
        }
        if self.environment.cross_origin_isolated == Some(false) {
            hints.push(RemediationHint::NotCrossOriginIsolated);
        }
        if self.environment.storage == StorageClass::Constrained {
            hints.push(RemediationHint::StorageConstrained);
        }
        if self.capabilities.values().all(|c| !c.namespace_present) {
            hints.push(RemediationHint::NoCapabilityNamespace);
        }
        if self
            .capabilities
            .values()
            .any(|c| c.status == DiagnosticStatus::Downloadable)
        {
            hints.push(RemediationHint::CapabilityDownloadable);
        }
        hints
    }
}

/// Builds [`DiagnosticsReport`]s from the host.
#[derive(Clone)]
pub struct DiagnosticsCollector {
    host: Arc<dyn Host>,
    config: SwitchboardConfig,
}

impl DiagnosticsCollector {
    pub fn new(host: Arc<dyn Host>, config: SwitchboardConfig) -> Self {
        Self { host, config }
    }

    /// Collect a report. `providers` decides each kind's backing.
    pub async fn collect(
        &self,
        providers: &HashMap<CapabilityKind, Arc<dyn CapabilityProvider>>,
    ) -> DiagnosticsReport {
        let checks = CapabilityKind::iter().map(|kind| async move {
            let backing = providers
                .get(&kind)
                .and_then(|provider| provider.resolve().backing());
            let namespace = self.host.namespace(kind);
            let namespace_present = namespace.is_some();
            let status = match namespace {
                Some(namespace) => self.check_namespace(kind, namespace).await,
                None => DiagnosticStatus::Missing,
            };
            (
                kind,
                CapabilityDiagnostic {
                    namespace_present,
                    status,
                    backing,
                },
            )
        });
        let capabilities = join_all(checks).await.into_iter().collect();
        let environment = self.environment().await;

        let report = DiagnosticsReport {
            generated_at: Utc::now(),
            capabilities,
            environment,
        };
        tracing::debug!(hints = ?report.hints(), "diagnostics collected");
        report
    }

    async fn check_namespace(
        &self,
        kind: CapabilityKind,
        namespace: Arc<dyn CapabilityNamespace>,
    ) -> DiagnosticStatus {
        let timeout = self.config.probe.availability_timeout();
        match with_timeout(timeout, adapter::query_availability(namespace.as_ref())).await {
            Ok(Ok(status)) => status.into(),
            Ok(Err(e)) => {
                tracing::debug!(capability = %kind, error = %e, "diagnostic check raised");
                DiagnosticStatus::Error {
                    message: e.to_string(),
                }
            }
            Err(_) => DiagnosticStatus::UnknownTimeout,
        }
    }

    async fn environment(&self) -> EnvironmentReport {
        let flags = self.host.environment();
        let timeout = self.config.probe.availability_timeout();
        let headroom = match with_timeout(timeout, self.host.storage_estimate()).await {
            Ok(Ok(Some(estimate))) => Some(estimate.headroom()),
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "storage estimate failed");
                None
            }
            Err(_) => {
                tracing::debug!("storage estimate timed out");
                None
            }
        };
        let storage = match headroom {
            Some(bytes) if bytes < self.config.storage_headroom_threshold_bytes => {
                StorageClass::Constrained
            }
            Some(_) => StorageClass::Ample,
            None => StorageClass::Unknown,
        };

        EnvironmentReport {
            secure_context: flags.secure_context,
            protocol: flags.protocol,
            cross_origin_isolated: flags.cross_origin_isolated,
            storage,
            storage_headroom_bytes: headroom,
        }
    }
}

impl fmt::Debug for DiagnosticsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsCollector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
