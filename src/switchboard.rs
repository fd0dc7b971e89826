//! Strategy selection over capability providers.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::config::SwitchboardConfig;
use crate::diagnostics::{DiagnosticsCollector, DiagnosticsReport};
use crate::error::{Result, SwitchboardError};
use crate::host::Host;
use crate::probe::AvailabilityProber;
use crate::provider::{create_provider, CapabilityProvider};
use crate::session::Session;
use crate::types::{AvailabilityStatus, CapabilityKind, SessionRequestOptions};

/// Routes capability-agnostic calls to the active provider.
///
/// Exactly one provider is active at any time. Sessions already created keep
/// the kind they were created with; changing the strategy only affects later
/// `create_session` calls.
///
/// `set_strategy` takes `&mut self`, so it cannot overlap a `create_session`
/// on the same handle. A caller that shares the switchboard behind its own
/// lock and swaps strategies mid-creation gets the provider captured when the
/// creation started.
pub struct Switchboard {
    providers: HashMap<CapabilityKind, Arc<dyn CapabilityProvider>>,
    active: CapabilityKind,
    prober: AvailabilityProber,
    diagnostics: DiagnosticsCollector,
}

impl Switchboard {
    /// Switchboard with all built-in providers, starting on
    /// `config.default_capability`.
    pub fn new(host: Arc<dyn Host>, config: SwitchboardConfig) -> Self {
        let providers = CapabilityKind::iter()
            .map(|kind| (kind, create_provider(kind, host.clone(), &config)))
            .collect();
        Self {
            providers,
            active: config.default_capability,
            prober: AvailabilityProber::new(host.clone(), config.probe),
            diagnostics: DiagnosticsCollector::new(host, config),
        }
    }

    /// Switchboard over an explicit provider set. The first provider starts
    /// active; a later provider for the same kind replaces an earlier one.
    pub fn with_providers(
        host: Arc<dyn Host>,
        config: SwitchboardConfig,
        providers: impl IntoIterator<Item = Arc<dyn CapabilityProvider>>,
    ) -> Result<Self> {
        let mut registry = HashMap::new();
        let mut first = None;
        for provider in providers {
            let kind = provider.kind();
            first.get_or_insert(kind);
            registry.insert(kind, provider);
        }
        let active = first.ok_or_else(|| {
            SwitchboardError::Configuration("switchboard needs at least one provider".into())
        })?;

        Ok(Self {
            providers: registry,
            active,
            prober: AvailabilityProber::new(host.clone(), config.probe),
            diagnostics: DiagnosticsCollector::new(host, config),
        })
    }

    pub fn active_kind(&self) -> CapabilityKind {
        self.active
    }

    /// Registered kinds in declaration order.
    pub fn registered_kinds(&self) -> Vec<CapabilityKind> {
        CapabilityKind::iter()
            .filter(|kind| self.providers.contains_key(kind))
            .collect()
    }

    fn active_provider(&self) -> Arc<dyn CapabilityProvider> {
        // `active` is only ever set to a registered kind.
        self.providers[&self.active].clone()
    }

    /// Make `kind` the active strategy. Unregistered kinds leave the binding
    /// unchanged and report `UnknownStrategy`.
    pub fn set_strategy(&mut self, kind: CapabilityKind) -> Result<()> {
        if !self.providers.contains_key(&kind) {
            tracing::warn!(capability = %kind, active = %self.active, "no provider registered");
            return Err(SwitchboardError::UnknownStrategy(kind.to_string()));
        }
        if self.active != kind {
            tracing::info!(from = %self.active, to = %kind, "strategy changed");
        }
        self.active = kind;
        Ok(())
    }

    /// Like [`Self::set_strategy`], parsing the kind from its name.
    pub fn set_strategy_by_name(&mut self, name: &str) -> Result<()> {
        let kind = CapabilityKind::from_str(name).map_err(|_| {
            tracing::warn!(name, active = %self.active, "unknown strategy name");
            SwitchboardError::UnknownStrategy(name.to_string())
        })?;
        self.set_strategy(kind)
    }

    /// Create a session on the active provider. Failures pass through as-is.
    pub async fn create_session(&self, options: &SessionRequestOptions) -> Result<Session> {
        let provider = self.active_provider();
        provider.create_session(options).await
    }

    /// Bounded availability check for the active provider.
    pub async fn check_availability(&self) -> AvailabilityStatus {
        let provider = self.active_provider();
        self.prober.check(provider.as_ref()).await
    }

    /// Fresh diagnostics report across every capability kind.
    pub async fn get_diagnostics(&self) -> DiagnosticsReport {
        self.diagnostics.collect(&self.providers).await
    }
}

impl std::fmt::Debug for Switchboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Switchboard")
            .field("active", &self.active)
            .field("registered", &self.registered_kinds())
            .field("prober", &self.prober)
            .finish_non_exhaustive()
    }
}
