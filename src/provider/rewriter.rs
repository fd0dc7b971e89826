//! Rewriter provider, with optional simulation on top of chat.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::config::FallbackPolicy;
use crate::error::Result;
use crate::host::{Host, NativeMethod};
use crate::session::{Session, SessionRoutes};
use crate::types::{CapabilityKind, Length, SessionRequestOptions, Tone};

use super::{open_session, resolve_with_fallback, CapabilityProvider, Resolution};

const REWRITER_ROUTES: SessionRoutes = SessionRoutes {
    stream: &[NativeMethod::RewriteStreaming, NativeMethod::PromptStreaming],
    direct: &[NativeMethod::Rewrite],
    input_prefix: None,
};

const SIMULATED_ROUTES: SessionRoutes = SessionRoutes {
    stream: &[NativeMethod::PromptStreaming],
    direct: &[],
    input_prefix: Some("Text to rewrite:\n"),
};

fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::MoreFormal => "Make the tone more formal.",
        Tone::AsIs => "Keep the original tone.",
        Tone::MoreCasual => "Make the tone more casual.",
    }
}

fn length_instruction(length: Length) -> &'static str {
    match length {
        Length::Shorter => "Make it shorter.",
        Length::AsIs => "Keep roughly the same length.",
        Length::Longer => "Make it longer.",
    }
}

/// System prompt standing in for a dedicated rewriter capability.
pub fn simulated_system_prompt(tone: Tone, length: Length) -> String {
    format!(
        "You are a rewriting assistant. Rewrite the text the user provides. {} {} \
Reply with the rewritten text only.",
        tone_instruction(tone),
        length_instruction(length)
    )
}

/// Host configuration for a native rewriter.
fn native_config(options: &SessionRequestOptions) -> Value {
    let mut config = Map::new();
    config.insert("tone".into(), json!(options.tone.to_string()));
    config.insert("length".into(), json!(options.length.to_string()));
    if !options.shared_context.is_empty() {
        config.insert("sharedContext".into(), json!(options.shared_context));
    }
    Value::Object(config)
}

/// Text rewriting.
pub struct RewriterProvider {
    host: Arc<dyn Host>,
    fallback: FallbackPolicy,
}

impl RewriterProvider {
    pub fn new(host: Arc<dyn Host>, fallback: FallbackPolicy) -> Self {
        Self { host, fallback }
    }
}

#[async_trait]
impl CapabilityProvider for RewriterProvider {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Rewriter
    }

    fn resolve(&self) -> Resolution {
        resolve_with_fallback(self.host.as_ref(), CapabilityKind::Rewriter, self.fallback)
    }

    async fn create_session(&self, options: &SessionRequestOptions) -> Result<Session> {
        let resolution = self.resolve();
        let (config, routes) = match resolution {
            Resolution::Simulated(_) => (
                json!({ "systemPrompt": simulated_system_prompt(options.tone, options.length) }),
                SIMULATED_ROUTES,
            ),
            _ => (native_config(options), REWRITER_ROUTES),
        };
        open_session(CapabilityKind::Rewriter, resolution, config, options, routes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn native_config_uses_host_field_names() {
        let options = SessionRequestOptions::builder()
            .tone(Tone::MoreCasual)
            .length(Length::Shorter)
            .build();
        assert_eq!(
            native_config(&options),
            json!({ "tone": "more-casual", "length": "shorter" })
        );
    }

    #[test]
    fn native_config_forwards_shared_context_when_set() {
        let options = SessionRequestOptions::builder()
            .shared_context("support ticket")
            .build();
        assert_eq!(native_config(&options)["sharedContext"], "support ticket");
    }

    #[test]
    fn simulated_prompt_mentions_tone_and_length() {
        let prompt = simulated_system_prompt(Tone::MoreFormal, Length::Longer);
        assert!(prompt.contains("more formal"));
        assert!(prompt.contains("longer"));
    }
}
