//! Writer provider, with optional simulation on top of chat.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::config::FallbackPolicy;
use crate::error::Result;
use crate::host::{Host, NativeMethod};
use crate::session::{Session, SessionRoutes};
use crate::types::{CapabilityKind, SessionRequestOptions};

use super::chat::CHAT_ROUTES;
use super::{open_session, resolve_with_fallback, CapabilityProvider, Resolution};

const WRITER_ROUTES: SessionRoutes = SessionRoutes {
    stream: &[NativeMethod::WriteStreaming, NativeMethod::PromptStreaming],
    direct: &[],
    input_prefix: None,
};

const WRITER_INSTRUCTION: &str = "You are a writing assistant. Write the text the user asks for. \
Reply with the requested text only, without preamble, explanations or closing remarks.";

/// System prompt standing in for a dedicated writer capability.
pub fn simulated_system_prompt(shared_context: &str) -> String {
    let context = shared_context.trim();
    if context.is_empty() {
        WRITER_INSTRUCTION.to_string()
    } else {
        format!("{WRITER_INSTRUCTION}\n\nShared context for every request:\n{context}")
    }
}

/// Long-form writing.
pub struct WriterProvider {
    host: Arc<dyn Host>,
    fallback: FallbackPolicy,
}

impl WriterProvider {
    pub fn new(host: Arc<dyn Host>, fallback: FallbackPolicy) -> Self {
        Self { host, fallback }
    }
}

#[async_trait]
impl CapabilityProvider for WriterProvider {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Writer
    }

    fn resolve(&self) -> Resolution {
        resolve_with_fallback(self.host.as_ref(), CapabilityKind::Writer, self.fallback)
    }

    async fn create_session(&self, options: &SessionRequestOptions) -> Result<Session> {
        let resolution = self.resolve();
        let (config, routes) = match resolution {
            Resolution::Simulated(_) => (
                json!({ "systemPrompt": simulated_system_prompt(&options.shared_context) }),
                CHAT_ROUTES,
            ),
            _ => (
                json!({ "sharedContext": options.shared_context }),
                WRITER_ROUTES,
            ),
        };
        open_session(CapabilityKind::Writer, resolution, config, options, routes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_prompt_embeds_context_only_when_present() {
        assert_eq!(simulated_system_prompt("  "), WRITER_INSTRUCTION);
        let prompt = simulated_system_prompt("Audience: new hires");
        assert!(prompt.starts_with(WRITER_INSTRUCTION));
        assert!(prompt.ends_with("Audience: new hires"));
    }
}
