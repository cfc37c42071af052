#![forbid(unsafe_code)]

//! Structured logging support.
//!
//! Logging is optional and feature-gated: with the `tracing` feature
//! enabled this module re-exports the `tracing` macros so downstream crates
//! write `rowkit_core::debug!(...)` without taking their own dependency;
//! with the feature off the engines compile with zero logging overhead.
//! Widget hot paths wrap their work in `debug_span!`s under
//! `#[cfg(feature = "tracing")]`.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn,
    warn_span};
