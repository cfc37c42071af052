#![forbid(unsafe_code)]

//! Core: input events, gesture recognition, and host-service seams.
//!
//! # Role in rowkit
//! `rowkit-core` is the input layer. It owns the normalized event types the
//! widget engines consume, the pointer gesture recognizer, and the small
//! abstractions through which a host framework provides services (animation
//! scheduling, deferred action dispatch, model liveness).
//!
//! # Primary responsibilities
//! - **Event**: canonical input events (keys, pointer, wheel) with
//!   host-supplied monotonic timestamps.
//! - **Gesture recognition**: click / double-click / drag disambiguation.
//! - **Host services**: [`animation::AnimationScheduler`],
//!   [`task::ActionQueue`], [`shared::ModelRef`].
//!
//! # How it fits in the system
//! The widget engines (`rowkit-widgets`) consume `rowkit_core` events and
//! emit state changes; they never talk to a windowing system directly. A
//! thin adapter owned by the host framework translates native input into
//! these types and drives the engines.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod shared;
pub mod task;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
