#![forbid(unsafe_code)]

//! Transition scheduling seam.
//!
//! Widgets never run animations themselves; they describe a transition and
//! hand it to the host's [`AnimationScheduler`]. The host drives frames with
//! whatever timer service it owns and reports completion back to the widget
//! by handle. Completion handling must be idempotent: if the widget state
//! changed again before the callback arrives, the stale handle is simply
//! ignored.

use std::time::Duration;

/// Opaque identity of a scheduled transition.
///
/// Handles are monotonically increasing per scheduler, so a widget can
/// detect and ignore completions for transitions it has since superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

impl AnimationHandle {
    /// Mint a handle from a raw id. Host scheduler implementations use this
    /// to issue handles; ids should be unique per scheduler.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Raw id, for host-side bookkeeping.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Direction content slides in from during a paged transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDirection {
    /// New content enters from the right (drill down).
    #[default]
    FromRight,
    /// New content enters from the left (navigate back).
    FromLeft,
    /// Content slides out to the left (dismissal).
    OutToLeft,
}

/// A transition request handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    pub slide: SlideDirection,
    pub duration: Duration,
    /// Whether the host should snapshot the outgoing view and cross-fade it
    /// behind the incoming content.
    pub snapshot_outgoing: bool,
}

impl TransitionSpec {
    /// A paged slide with the default menu transition length.
    #[must_use]
    pub fn slide(direction: SlideDirection) -> Self {
        Self {
            slide: direction,
            duration: Duration::from_millis(300),
            snapshot_outgoing: true,
        }
    }

    /// Set the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set whether the outgoing view is snapshotted.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot_outgoing = snapshot;
        self
    }
}

/// Host-provided transition driver.
///
/// `begin` must return immediately; the host later calls the owning
/// widget's completion entry point with the returned handle.
pub trait AnimationScheduler {
    /// Start a transition and return its handle.
    fn begin(&mut self, spec: TransitionSpec) -> AnimationHandle;
}

/// A scheduler that records requests and hands out handles without driving
/// any frames. Useful for hosts without an animator and for tests, which
/// complete transitions by hand.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    next_id: u64,
    requests: Vec<(AnimationHandle, TransitionSpec)>,
}

impl RecordingScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> &[(AnimationHandle, TransitionSpec)] {
        &self.requests
    }

    /// Handle of the most recent request, if any.
    #[must_use]
    pub fn last_handle(&self) -> Option<AnimationHandle> {
        self.requests.last().map(|(h, _)| *h)
    }
}

impl AnimationScheduler for RecordingScheduler {
    fn begin(&mut self, spec: TransitionSpec) -> AnimationHandle {
        let handle = AnimationHandle::from_raw(self.next_id);
        self.next_id += 1;
        self.requests.push((handle, spec));
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_monotonic() {
        let mut s = RecordingScheduler::new();
        let a = s.begin(TransitionSpec::slide(SlideDirection::FromRight));
        let b = s.begin(TransitionSpec::slide(SlideDirection::FromLeft));
        assert!(b.id() > a.id());
        assert_eq!(s.requests().len(), 2);
        assert_eq!(s.last_handle(), Some(b));
    }

    #[test]
    fn test_spec_builder() {
        let spec = TransitionSpec::slide(SlideDirection::OutToLeft)
            .with_duration(Duration::from_millis(120))
            .with_snapshot(false);
        assert_eq!(spec.duration, Duration::from_millis(120));
        assert!(!spec.snapshot_outgoing);
    }
}
