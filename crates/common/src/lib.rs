//! Shared plumbing for the catalog service layers.
//!
//! Every repository and service call takes a [`Context`], which carries the
//! caller's cancellation token and optional deadline.

pub mod context;

pub use context::{Context, ContextError};
