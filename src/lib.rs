//! Switchboard: uniform sessions over on-device generative capabilities.
//!
//! A host environment may expose any of several generative capabilities
//! (chat, writing, rewriting), possibly still downloading, possibly under
//! differing API shapes. The switchboard picks a provider per
//! [`types::CapabilityKind`], probes availability within a fixed time
//! budget, and hands out [`session::Session`]s that stream text the same way
//! regardless of which capability, or which simulation of it, sits behind.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use switchboard::prelude::*;
//!
//! # async fn example(host: Arc<dyn Host>) -> switchboard::error::Result<()> {
//! let mut board = Switchboard::new(host, SwitchboardConfig::from_env());
//! board.set_strategy(CapabilityKind::Writer)?;
//!
//! if board.check_availability().await.is_usable() {
//!     let session = board.create_session(&SessionRequestOptions::default()).await?;
//!     let stream = session.prompt_streaming("A haiku about rust").await?;
//!     let outcome = accumulate_stream(stream, |text| println!("{text}")).await;
//!     println!("{}", outcome.annotated());
//!     session.destroy();
//! } else {
//!     let report = board.get_diagnostics().await;
//!     println!("{:?}", report.hints());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod prelude;
pub mod probe;
pub mod provider;
pub mod session;
pub mod stream;
pub mod switchboard;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
