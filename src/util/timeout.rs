//! Timeout helpers.

use std::future::Future;
use std::time::Duration;

use crate::error::SwitchboardError;

/// Race a future against a timer. The first to finish wins; the loser is
/// dropped, which abandons its work without any further cancellation.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = T>,
) -> Result<T, SwitchboardError> {
    match tokio::time::timeout(duration, future).await {
        Ok(value) => Ok(value),
        Err(_) => Err(SwitchboardError::ProbeTimeout(duration.as_millis() as u64)),
    }
}
