//! Static file server that makes served pages cross-origin isolated.
//!
//! Hosts gate some on-device features behind cross-origin isolation, which
//! requires COOP `same-origin` and COEP `require-corp` on the document.

use std::net::SocketAddr;
use std::path::Path;

use axum::http::{header::HeaderName, HeaderValue};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::{Result, SwitchboardError};

pub const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");
pub const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");

/// Router serving `dir`, with isolation headers on every response.
pub fn router(dir: impl AsRef<Path>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir.as_ref()))
        .layer(SetResponseHeaderLayer::overriding(
            CROSS_ORIGIN_OPENER_POLICY,
            HeaderValue::from_static("same-origin"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CROSS_ORIGIN_EMBEDDER_POLICY,
            HeaderValue::from_static("require-corp"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn run(host: &str, port: u16, dir: &Path) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| SwitchboardError::Configuration(format!("invalid address {host}:{port}: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, dir = %dir.display(), "serving with COOP/COEP headers");
    axum::serve(listener, router(dir)).await?;
    Ok(())
}
