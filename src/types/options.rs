//! Session request options and download progress.

use std::fmt;
use std::sync::Arc;

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// System prompt used for chat sessions when none is given.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Callback receiving host download-progress events.
pub type ProgressObserver = Arc<dyn Fn(DownloadProgress) + Send + Sync>;

/// A single download-progress event forwarded from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// Bytes (or host units) loaded so far.
    pub loaded: u64,
    /// Total expected, in the same units as `loaded`.
    pub total: u64,
}

impl DownloadProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        Self { loaded, total }
    }

    /// Progress in `[0, 1]`. Unknown totals report `0.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.loaded as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.loaded >= self.total
    }
}

/// Rewriter tone.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Tone {
    #[default]
    MoreFormal,
    AsIs,
    MoreCasual,
}

/// Rewriter output length.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Length {
    Shorter,
    #[default]
    AsIs,
    Longer,
}

/// Options for creating a session. Every field has a default.
///
/// Each provider reads only the fields meaningful to it and ignores the rest.
#[derive(Clone, Builder, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionRequestOptions {
    /// Chat only.
    #[builder(into, default = DEFAULT_SYSTEM_PROMPT.to_string())]
    pub system_prompt: String,
    /// Writer only.
    #[builder(into, default)]
    pub shared_context: String,
    /// Rewriter only.
    #[builder(default)]
    pub tone: Tone,
    /// Rewriter only.
    #[builder(default)]
    pub length: Length,
    #[serde(skip)]
    pub progress_observer: Option<ProgressObserver>,
}

impl Default for SessionRequestOptions {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            shared_context: String::new(),
            tone: Tone::default(),
            length: Length::default(),
            progress_observer: None,
        }
    }
}

impl SessionRequestOptions {
    /// Attach a download-progress callback.
    pub fn observe_progress<F>(mut self, observer: F) -> Self
    where
        F: Fn(DownloadProgress) + Send + Sync + 'static,
    {
        self.progress_observer = Some(Arc::new(observer));
        self
    }
}

impl fmt::Debug for SessionRequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRequestOptions")
            .field("system_prompt", &self.system_prompt)
            .field("shared_context", &self.shared_context)
            .field("tone", &self.tone)
            .field("length", &self.length)
            .field(
                "progress_observer",
                &self.progress_observer.as_ref().map(|_| ".."),
            )
            .finish()
    }
}
