//! Normalized availability status.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Normalized result of probing a capability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AvailabilityStatus {
    /// Usable immediately.
    Ready,
    /// Usable after a download that happens on first session creation.
    Downloadable,
    Unavailable,
    /// The host did not answer within the probe budget.
    UnknownTimeout,
}

impl AvailabilityStatus {
    /// Map a raw host availability answer onto the normalized set.
    ///
    /// Accepts the modern string form and the legacy `{ "available": .. }`
    /// capabilities object.
    pub fn from_raw(raw: &Value) -> Self {
        match raw {
            Value::String(s) => Self::from_raw_str(s),
            Value::Object(map) => map
                .get("available")
                .map(Self::from_raw)
                .unwrap_or(Self::Unavailable),
            _ => Self::Unavailable,
        }
    }

    /// Map a raw host availability string onto the normalized set.
    pub fn from_raw_str(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "available" | "readily" | "ready" => Self::Ready,
            "downloadable" | "after-download" | "downloading" => Self::Downloadable,
            "unavailable" | "no" => Self::Unavailable,
            other => {
                tracing::warn!(raw = other, "unrecognized host availability value");
                Self::Unavailable
            }
        }
    }

    /// Whether a caller may proceed to create a session.
    pub fn is_usable(self) -> bool {
        matches!(self, Self::Ready | Self::Downloadable)
    }
}
