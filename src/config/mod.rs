//! Configuration system (layered: defaults < TOML file < env).

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Result, SwitchboardError};
use crate::types::CapabilityKind;

/// Minimum free storage the host typically needs to fetch an on-device model.
pub const DEFAULT_STORAGE_HEADROOM_BYTES: u64 = 22 * 1024 * 1024 * 1024;

/// What a specialized provider does when its dedicated namespace is absent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FallbackPolicy {
    /// Satisfy the contract with the chat capability and a synthesized prompt.
    #[default]
    Simulate,
    /// Report `CapabilityUnavailable`.
    Fail,
}

/// Timing budget for availability probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Delay between namespace presence checks.
    pub poll_interval_ms: u64,
    /// Presence checks before giving up on a lazily injected namespace.
    pub max_poll_attempts: u32,
    /// Budget for a single native availability check.
    pub availability_timeout_ms: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 150,
            max_poll_attempts: 20,
            availability_timeout_ms: 1500,
        }
    }
}

impl ProbeSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn availability_timeout(&self) -> Duration {
        Duration::from_millis(self.availability_timeout_ms)
    }

    /// Upper bound on time spent waiting for any namespace to appear.
    pub fn polling_budget(&self) -> Duration {
        self.poll_interval() * self.max_poll_attempts
    }
}

/// Switchboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    /// Capability active when the switchboard starts.
    #[builder(default = CapabilityKind::Chat)]
    pub default_capability: CapabilityKind,
    #[builder(default)]
    pub probe: ProbeSettings,
    #[builder(default = FallbackPolicy::Simulate)]
    pub writer_fallback: FallbackPolicy,
    #[builder(default = FallbackPolicy::Fail)]
    pub rewriter_fallback: FallbackPolicy,
    /// Storage headroom below which diagnostics report `constrained`.
    #[builder(default = DEFAULT_STORAGE_HEADROOM_BYTES)]
    pub storage_headroom_threshold_bytes: u64,
}

impl Default for SwitchboardConfig {
    fn default() -> Self {
        Self {
            default_capability: CapabilityKind::Chat,
            probe: ProbeSettings::default(),
            writer_fallback: FallbackPolicy::Simulate,
            rewriter_fallback: FallbackPolicy::Fail,
            storage_headroom_threshold_bytes: DEFAULT_STORAGE_HEADROOM_BYTES,
        }
    }
}

impl SwitchboardConfig {
    /// Fallback policy for a capability. Chat has no fallback.
    pub fn fallback_for(&self, kind: CapabilityKind) -> FallbackPolicy {
        match kind {
            CapabilityKind::Chat => FallbackPolicy::Fail,
            CapabilityKind::Writer => self.writer_fallback,
            CapabilityKind::Rewriter => self.rewriter_fallback,
        }
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SwitchboardError::Configuration(e.to_string()))
    }

    /// Per-user config file location (`<config dir>/switchboard.toml`).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "switchboard")
            .map(|dirs| dirs.config_dir().join("switchboard.toml"))
    }

    /// Defaults, then the per-user file if it exists, then the environment.
    pub fn resolve() -> Result<Self> {
        let base = match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path)?,
            _ => Self::default(),
        };
        Ok(base.with_env())
    }

    /// Defaults overlaid with environment variables (loads `.env` if present).
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Overlay `SWITCHBOARD_*` environment variables onto this config.
    pub fn with_env(self) -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Overlay values looked up through `lookup`. Unparseable values are
    /// logged and skipped.
    pub fn with_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = parse_var::<CapabilityKind>(&lookup, "SWITCHBOARD_DEFAULT_CAPABILITY") {
            self.default_capability = kind;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "SWITCHBOARD_POLL_INTERVAL_MS") {
            self.probe.poll_interval_ms = ms;
        }
        if let Some(n) = parse_var::<u32>(&lookup, "SWITCHBOARD_MAX_POLL_ATTEMPTS") {
            self.probe.max_poll_attempts = n;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "SWITCHBOARD_AVAILABILITY_TIMEOUT_MS") {
            self.probe.availability_timeout_ms = ms;
        }
        if let Some(policy) = parse_var::<FallbackPolicy>(&lookup, "SWITCHBOARD_WRITER_FALLBACK") {
            self.writer_fallback = policy;
        }
        if let Some(policy) = parse_var::<FallbackPolicy>(&lookup, "SWITCHBOARD_REWRITER_FALLBACK")
        {
            self.rewriter_fallback = policy;
        }
        if let Some(bytes) = parse_var::<u64>(&lookup, "SWITCHBOARD_STORAGE_THRESHOLD_BYTES") {
            self.storage_headroom_threshold_bytes = bytes;
        }
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable config variable");
            None
        }
    }
}
