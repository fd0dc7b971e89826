//! Bounded-time availability probing.

use std::sync::Arc;

use crate::config::ProbeSettings;
use crate::host::Host;
use crate::provider::CapabilityProvider;
use crate::types::AvailabilityStatus;
use crate::util::timeout::with_timeout;

/// Decides, within a fixed budget, whether a provider is usable.
///
/// Hosts may inject their capability namespaces some time after start, so
/// the prober first polls for any namespace, then races the provider's native
/// check against a timer. One timeout or one `unavailable` is final for the
/// call; callers that want a retry call again.
#[derive(Clone)]
pub struct AvailabilityProber {
    host: Arc<dyn Host>,
    settings: ProbeSettings,
}

impl AvailabilityProber {
    pub fn new(host: Arc<dyn Host>, settings: ProbeSettings) -> Self {
        Self { host, settings }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Poll until the host exposes any capability namespace.
    ///
    /// Returns `false` once `max_poll_attempts` intervals pass without one.
    pub async fn wait_for_namespace(&self) -> bool {
        for attempt in 0..self.settings.max_poll_attempts {
            if self.host.has_any_namespace() {
                return true;
            }
            tracing::debug!(attempt = attempt + 1, "no capability namespace yet");
            tokio::time::sleep(self.settings.poll_interval()).await;
        }
        self.host.has_any_namespace()
    }

    /// Probe `provider` and normalize the answer.
    pub async fn check(&self, provider: &dyn CapabilityProvider) -> AvailabilityStatus {
        let capability = provider.kind();
        if !self.wait_for_namespace().await {
            tracing::warn!(
                capability = %capability,
                budget_ms = self.settings.polling_budget().as_millis() as u64,
                "host exposed no capability namespace"
            );
            return AvailabilityStatus::Unavailable;
        }

        match with_timeout(self.settings.availability_timeout(), provider.probe()).await {
            Ok(status) => {
                tracing::debug!(capability = %capability, %status, "availability probed");
                status
            }
            Err(e) => {
                tracing::warn!(capability = %capability, error = %e, "availability check timed out");
                AvailabilityStatus::UnknownTimeout
            }
        }
    }
}

impl std::fmt::Debug for AvailabilityProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityProber")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
