//! Capability kinds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// One discrete generative capability the host may expose.
///
/// Used as the lookup key into the provider registry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CapabilityKind {
    /// General chat (host language-model capability).
    Chat,
    /// Long-form writing.
    Writer,
    /// Text rewriting.
    Rewriter,
}

impl CapabilityKind {
    /// Canonical name of the host namespace backing this kind.
    pub const fn namespace_name(self) -> &'static str {
        match self {
            Self::Chat => "LanguageModel",
            Self::Writer => "Writer",
            Self::Rewriter => "Rewriter",
        }
    }

    /// Whether this kind can fall back to a simulated provider on top of Chat.
    pub const fn can_simulate(self) -> bool {
        !matches!(self, Self::Chat)
    }
}
