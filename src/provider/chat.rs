//! Chat provider over the host language-model capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::Result;
use crate::host::{Host, NativeMethod};
use crate::session::{Session, SessionRoutes};
use crate::types::{CapabilityKind, SessionRequestOptions};

use super::{open_session, CapabilityProvider, Resolution};

pub(crate) const CHAT_ROUTES: SessionRoutes = SessionRoutes {
    stream: &[NativeMethod::PromptStreaming],
    direct: &[],
    input_prefix: None,
};

/// General chat. Has no fallback: a missing namespace is `CapabilityUnavailable`.
pub struct ChatProvider {
    host: Arc<dyn Host>,
}

impl ChatProvider {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl CapabilityProvider for ChatProvider {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Chat
    }

    fn resolve(&self) -> Resolution {
        match self.host.namespace(CapabilityKind::Chat) {
            Some(namespace) => Resolution::Native(namespace),
            None => Resolution::Missing,
        }
    }

    async fn create_session(&self, options: &SessionRequestOptions) -> Result<Session> {
        let config = json!({ "systemPrompt": options.system_prompt });
        open_session(
            CapabilityKind::Chat,
            self.resolve(),
            config,
            options,
            CHAT_ROUTES,
        )
        .await
    }
}
