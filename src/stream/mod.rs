//! Streaming accumulation.
//!
//! Hosts deliver streamed text in one of two styles: each chunk is the full
//! response so far (replace), or each chunk is only the new suffix (append).
//! [`StreamAccumulator`] handles both without being told which one is in use:
//! a chunk that starts with everything accumulated so far replaces it,
//! anything else is appended.
//!
//! The heuristic misclassifies an append-style chunk whose new suffix itself
//! begins with the whole accumulated text (e.g. a repeated phrase). That case
//! is accepted; chunks must arrive in order for either style to work.

use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::SwitchboardError;

/// Stream of text chunks produced by a session.
pub type TextChunkStream = BoxStream<'static, Result<String, SwitchboardError>>;

/// How a chunk was folded into the accumulated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    First,
    Replace,
    Append,
}

/// Folds streamed chunks into the full response text.
#[derive(Debug, Clone, Default)]
pub struct StreamAccumulator {
    text: String,
    chunks: usize,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk in delivery order.
    pub fn push(&mut self, chunk: &str) -> Delivery {
        self.chunks += 1;
        if self.chunks == 1 {
            self.text = chunk.to_string();
            return Delivery::First;
        }
        if chunk.starts_with(self.text.as_str()) {
            self.text.clear();
            self.text.push_str(chunk);
            Delivery::Replace
        } else {
            self.text.push_str(chunk);
            Delivery::Append
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of chunks folded so far.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Result of driving a chunk stream to its end.
#[derive(Debug)]
pub struct StreamOutcome {
    /// Accumulated text, partial if `error` is set.
    pub text: String,
    pub chunks: usize,
    /// The failure that ended the stream early, if any.
    pub error: Option<SwitchboardError>,
}

impl StreamOutcome {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// The text with an inline error annotation appended when the stream failed.
    pub fn annotated(&self) -> String {
        match &self.error {
            None => self.text.clone(),
            Some(e) if self.text.is_empty() => format!("[error: {e}]"),
            Some(e) => format!("{}\n\n[error: {e}]", self.text),
        }
    }

    /// Convert into the final text, or the error that ended the stream.
    pub fn into_result(self) -> Result<String, SwitchboardError> {
        match self.error {
            None => Ok(self.text),
            Some(e) => Err(e),
        }
    }
}

/// Consume a chunk stream, calling `on_update` with the accumulated text
/// after every chunk. Stops at the first error and keeps the partial text.
pub async fn accumulate_stream<F>(mut stream: TextChunkStream, mut on_update: F) -> StreamOutcome
where
    F: FnMut(&str),
{
    let mut acc = StreamAccumulator::new();
    let mut error = None;

    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                acc.push(&chunk);
                on_update(acc.text());
            }
            Err(e) => {
                tracing::debug!(error = %e, chunks = acc.chunks(), "stream ended with error");
                error = Some(e);
                break;
            }
        }
    }

    StreamOutcome {
        chunks: acc.chunks(),
        text: acc.into_text(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CapabilityKind;
    use pretty_assertions::assert_eq;

    fn fold(chunks: &[&str]) -> String {
        let mut acc = StreamAccumulator::new();
        for chunk in chunks {
            acc.push(chunk);
        }
        acc.into_text()
    }

    #[test]
    fn replace_style_yields_final_chunk() {
        assert_eq!(fold(&["Hel", "Hello", "Hello world"]), "Hello world");
    }

    #[test]
    fn append_style_yields_concatenation() {
        assert_eq!(fold(&["Hel", "lo", " world"]), "Hello world");
    }

    #[test]
    fn reports_delivery_kind() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(acc.push("a"), Delivery::First);
        assert_eq!(acc.push("ab"), Delivery::Replace);
        assert_eq!(acc.push("c"), Delivery::Append);
        assert_eq!(acc.text(), "abc");
        assert_eq!(acc.chunks(), 3);
    }

    #[test]
    fn repeated_phrase_is_misread_as_replace() {
        // Known limitation: an appended suffix that repeats the whole text so far.
        assert_eq!(fold(&["ha", "ha"]), "ha");
    }

    #[test]
    fn empty_stream_yields_empty_text() {
        assert_eq!(fold(&[]), "");
    }

    #[tokio::test]
    async fn accumulate_stream_reports_each_update() {
        let stream = async_stream::stream! {
            yield Ok::<_, SwitchboardError>("Hel".to_string());
            yield Ok("lo".to_string());
        };
        let mut updates = Vec::new();
        let outcome = accumulate_stream(Box::pin(stream), |text| updates.push(text.to_string())).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.text, "Hello");
        assert_eq!(updates, vec!["Hel".to_string(), "Hello".to_string()]);
    }

    #[tokio::test]
    async fn accumulate_stream_keeps_partial_text_on_error() {
        let stream = async_stream::stream! {
            yield Ok("partial".to_string());
            yield Err(SwitchboardError::streaming(CapabilityKind::Chat, "host reset"));
            yield Ok(" never seen".to_string());
        };
        let outcome = accumulate_stream(Box::pin(stream), |_| {}).await;

        assert_eq!(outcome.text, "partial");
        assert_eq!(outcome.chunks, 1);
        assert_eq!(
            outcome.annotated(),
            "partial\n\n[error: Streaming failure in chat: host reset]"
        );
    }

    #[test]
    fn annotation_without_partial_text() {
        let outcome = StreamOutcome {
            text: String::new(),
            chunks: 0,
            error: Some(SwitchboardError::streaming(CapabilityKind::Writer, "boom")),
        };
        assert_eq!(outcome.annotated(), "[error: Streaming failure in writer: boom]");
        assert!(outcome.into_result().is_err());
    }
}
