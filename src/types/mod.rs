//! Core types for the switchboard.

pub mod availability;
pub mod kind;
pub mod options;

pub use availability::*;
pub use kind::*;
pub use options::*;
