//! Uniform session over a native host session.

use std::fmt;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use uuid::Uuid;

use crate::error::{Result, SwitchboardError};
use crate::host::{NativeMethod, NativeSession};
use crate::provider::{adapter, Backing};
use crate::stream::{accumulate_stream, TextChunkStream};
use crate::types::CapabilityKind;

/// Which native methods a session drives, in preference order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionRoutes {
    pub stream: &'static [NativeMethod],
    pub direct: &'static [NativeMethod],
    /// Prepended to every input before it reaches the host.
    pub input_prefix: Option<&'static str>,
}

/// A live handle to an instantiated capability.
///
/// Bound to the capability kind active when it was created. The native
/// handle is released exactly once: by [`Session::destroy`], or on drop.
pub struct Session {
    id: Uuid,
    kind: CapabilityKind,
    backing: Backing,
    created_at: DateTime<Utc>,
    native: Box<dyn NativeSession>,
    routes: SessionRoutes,
    released: bool,
}

impl Session {
    pub(crate) fn new(
        kind: CapabilityKind,
        backing: Backing,
        native: Box<dyn NativeSession>,
        routes: SessionRoutes,
    ) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            kind,
            backing,
            created_at: Utc::now(),
            native,
            routes,
            released: false,
        };
        tracing::debug!(session_id = %session.id, capability = %kind, %backing, "session created");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    pub fn backing(&self) -> Backing {
        self.backing
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Stream the response to `input` as text chunks, in host delivery order.
    ///
    /// Chunks may be full-text-so-far or suffix-only depending on the host;
    /// fold them with [`crate::stream::StreamAccumulator`]. A host failure
    /// mid-stream is yielded once as [`SwitchboardError::Streaming`] and ends
    /// the stream.
    pub async fn prompt_streaming(&self, input: &str) -> Result<TextChunkStream> {
        let capability = self.kind;
        let input = self.frame(input);
        let (method, mut native) =
            adapter::open_stream(self.native.as_ref(), self.routes.stream, &input)
                .await
                .map_err(|e| SwitchboardError::streaming(capability, e.to_string()))?;
        tracing::debug!(session_id = %self.id, %method, "stream opened");

        let stream = async_stream::stream! {
            while let Some(item) = native.next().await {
                match item {
                    Ok(chunk) => yield Ok(chunk),
                    Err(e) => {
                        tracing::warn!(capability = %capability, error = %e, "host failed mid-stream");
                        yield Err(SwitchboardError::streaming(capability, e.to_string()));
                        break;
                    }
                }
            }
        };
        Ok(Box::pin(stream))
    }

    /// Run `input` to completion and return the accumulated text.
    pub async fn prompt(&self, input: &str) -> Result<String> {
        let stream = self.prompt_streaming(input).await?;
        accumulate_stream(stream, |_| {}).await.into_result()
    }

    /// Rewrite `input` in one call. Rewriter sessions only.
    ///
    /// Uses the host's direct rewrite when present, otherwise accumulates the
    /// streaming output.
    pub async fn rewrite(&self, input: &str) -> Result<String> {
        if self.kind != CapabilityKind::Rewriter {
            return Err(SwitchboardError::UnsupportedOperation(format!(
                "rewrite on a {} session",
                self.kind
            )));
        }
        if !self.routes.direct.is_empty() {
            match adapter::call_direct(self.native.as_ref(), self.routes.direct, input).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_not_supported() => {
                    tracing::debug!(session_id = %self.id, "no direct rewrite, streaming instead");
                }
                Err(e) => return Err(SwitchboardError::streaming(self.kind, e.to_string())),
            }
        }
        self.prompt(input).await
    }

    /// Release the native session.
    pub fn destroy(mut self) {
        self.release();
    }

    fn frame(&self, input: &str) -> String {
        match self.routes.input_prefix {
            Some(prefix) => format!("{prefix}{input}"),
            None => input.to_string(),
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.native.destroy();
        tracing::debug!(session_id = %self.id, capability = %self.kind, "session destroyed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("backing", &self.backing)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostError, NativeStream};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSession {
        destroyed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NativeSession for CountingSession {
        async fn stream(
            &self,
            method: NativeMethod,
            input: &str,
        ) -> std::result::Result<NativeStream, HostError> {
            if method != NativeMethod::PromptStreaming {
                return Err(HostError::NotSupported(method.to_string()));
            }
            let echoed = input.to_string();
            Ok(async_stream::stream! {
                yield Ok(echoed);
                yield Err(HostError::Aborted("quota".into()));
            }
            .boxed())
        }

        fn destroy(&self) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    const CHAT: SessionRoutes = SessionRoutes {
        stream: &[NativeMethod::PromptStreaming],
        direct: &[],
        input_prefix: Some("> "),
    };

    fn session(kind: CapabilityKind, destroyed: &Arc<AtomicUsize>) -> Session {
        Session::new(
            kind,
            Backing::Native,
            Box::new(CountingSession {
                destroyed: destroyed.clone(),
            }),
            CHAT,
        )
    }

    #[tokio::test]
    async fn destroy_releases_exactly_once() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        session(CapabilityKind::Chat, &destroyed).destroy();
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);

        drop(session(CapabilityKind::Chat, &destroyed));
        assert_eq!(destroyed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn mid_stream_host_error_is_yielded_then_ends() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let session = session(CapabilityKind::Chat, &destroyed);
        let items: Vec<_> = session.prompt_streaming("hi").await.unwrap().collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "> hi");
        assert!(matches!(
            items[1],
            Err(SwitchboardError::Streaming {
                capability: CapabilityKind::Chat,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn rewrite_is_rejected_outside_rewriter_sessions() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let session = session(CapabilityKind::Writer, &destroyed);
        let err = session.rewrite("text").await.unwrap_err();
        assert!(matches!(err, SwitchboardError::UnsupportedOperation(_)));
    }
}
