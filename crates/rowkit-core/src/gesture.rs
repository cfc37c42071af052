#![forbid(unsafe_code)]

//! Pointer gesture disambiguation.
//!
//! [`GestureRecognizer`] turns raw pointer events into gesture events so a
//! widget can tell a click from the start of a drag without duplicating the
//! threshold bookkeeping.
//!
//! # Invariants
//!
//! 1. The machine is either `Idle`, `Pressed`, or `Dragging`; a button
//!    release always returns it to `Idle`.
//! 2. `DragStarted` fires at most once per press, and only after movement
//!    exceeds the drag threshold.
//! 3. Click multiplicity resets when a press lands outside the multi-click
//!    radius or after the multi-click window expires.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Release with no press | Host dropped the down event | Ignored, stays `Idle` |
//! | Second press mid-gesture | Multi-button chord | Ignored until release |

use std::time::Duration;

use smallvec::SmallVec;

use crate::event::{Modifiers, PointerButton, PointerEvent, PointerEventKind};
use crate::geometry::Point;

/// Tuning knobs for gesture recognition.
#[derive(Debug, Clone, Copy)]
pub struct GestureConfig {
    /// Movement (in pixels) beyond which a press becomes a drag.
    pub drag_threshold: u32,
    /// Maximum gap between clicks that still extends a multi-click chain.
    pub multi_click_window: Duration,
    /// Maximum distance between chained clicks, in pixels.
    pub multi_click_radius: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 4,
            multi_click_window: Duration::from_millis(400),
            multi_click_radius: 8,
        }
    }
}

impl GestureConfig {
    /// Set the drag threshold in pixels.
    #[must_use]
    pub fn with_drag_threshold(mut self, pixels: u32) -> Self {
        self.drag_threshold = pixels;
        self
    }

    /// Set the multi-click time window.
    #[must_use]
    pub fn with_multi_click_window(mut self, window: Duration) -> Self {
        self.multi_click_window = window;
        self
    }
}

/// Current phase of the active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No button held.
    #[default]
    Idle,
    /// Button held, movement still under the drag threshold.
    Pressed,
    /// Button held and moved past the threshold.
    Dragging,
}

impl GesturePhase {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pressed => "pressed",
            Self::Dragging => "dragging",
        }
    }
}

/// A recognized gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Button went down. `click_count` is 1 for a fresh click, 2 for the
    /// press that will complete a double-click, and so on.
    Pressed {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
        click_count: u8,
    },
    /// Movement exceeded the drag threshold for the first time.
    DragStarted {
        origin: Point,
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// Further movement while dragging.
    DragMoved {
        origin: Point,
        pos: Point,
        delta: (i32, i32),
    },
    /// Button released. `was_drag` tells the consumer whether the press
    /// turned into a drag (in which case it is not a click).
    Released {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
        click_count: u8,
        was_drag: bool,
    },
    /// Hover movement with no button held.
    Moved { pos: Point },
    /// Wheel scroll.
    Wheel { pos: Point, dx: f32, dy: f32 },
}

#[derive(Debug, Clone, Copy)]
struct PressState {
    origin: Point,
    last: Point,
    button: PointerButton,
    modifiers: Modifiers,
    time: Duration,
    click_count: u8,
}

/// Pointer gesture state machine.
///
/// Feed every pointer event through [`GestureRecognizer::feed`]; each call
/// returns the gesture events the input resolved to (usually zero or one,
/// two when a drag starts and moves in the same report).
#[derive(Debug, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    press: Option<PressState>,
    dragging: bool,
    last_press: Option<(Point, Duration, u8)>,
}

/// Gesture events produced by a single input event.
pub type GestureEvents = SmallVec<[GestureEvent; 2]>;

impl GestureRecognizer {
    /// Create a recognizer with the given config.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match (&self.press, self.dragging) {
            (None, _) => GesturePhase::Idle,
            (Some(_), false) => GesturePhase::Pressed,
            (Some(_), true) => GesturePhase::Dragging,
        }
    }

    /// Abandon any in-flight gesture (e.g. on focus loss).
    pub fn cancel(&mut self) {
        self.press = None;
        self.dragging = false;
    }

    /// Advance the machine with one pointer event.
    pub fn feed(&mut self, ev: &PointerEvent) -> GestureEvents {
        let mut out = GestureEvents::new();
        match ev.kind {
            PointerEventKind::Down(button) => {
                if self.press.is_some() {
                    // Chorded second button; first press wins.
                    return out;
                }
                let click_count = self.next_click_count(ev.pos, ev.timestamp);
                self.press = Some(PressState {
                    origin: ev.pos,
                    last: ev.pos,
                    button,
                    modifiers: ev.modifiers,
                    time: ev.timestamp,
                    click_count,
                });
                self.dragging = false;
                self.last_press = Some((ev.pos, ev.timestamp, click_count));
                out.push(GestureEvent::Pressed {
                    pos: ev.pos,
                    button,
                    modifiers: ev.modifiers,
                    click_count,
                });
            }
            PointerEventKind::Up(button) => {
                let Some(press) = self.press else {
                    return out;
                };
                if press.button != button {
                    return out;
                }
                out.push(GestureEvent::Released {
                    pos: ev.pos,
                    button,
                    modifiers: ev.modifiers,
                    click_count: press.click_count,
                    was_drag: self.dragging,
                });
                self.press = None;
                self.dragging = false;
            }
            PointerEventKind::Move => {
                let Some(press) = &mut self.press else {
                    out.push(GestureEvent::Moved { pos: ev.pos });
                    return out;
                };
                let delta = (ev.pos.x - press.last.x, ev.pos.y - press.last.y);
                press.last = ev.pos;
                let threshold = u64::from(self.config.drag_threshold);
                let exceeded = press.origin.distance_squared(ev.pos) > threshold * threshold;
                if !self.dragging && exceeded {
                    self.dragging = true;
                    out.push(GestureEvent::DragStarted {
                        origin: press.origin,
                        pos: ev.pos,
                        button: press.button,
                        modifiers: press.modifiers,
                    });
                }
                if self.dragging && delta != (0, 0) {
                    out.push(GestureEvent::DragMoved {
                        origin: press.origin,
                        pos: ev.pos,
                        delta,
                    });
                }
            }
            PointerEventKind::Wheel { dx, dy } => {
                out.push(GestureEvent::Wheel {
                    pos: ev.pos,
                    dx,
                    dy,
                });
            }
        }
        out
    }

    fn next_click_count(&self, pos: Point, time: Duration) -> u8 {
        let Some((last_pos, last_time, last_count)) = self.last_press else {
            return 1;
        };
        let radius = u64::from(self.config.multi_click_radius);
        let in_radius = last_pos.distance_squared(pos) <= radius * radius;
        let in_window = time.saturating_sub(last_time) <= self.config.multi_click_window;
        if in_radius && in_window {
            last_count.saturating_add(1)
        } else {
            1
        }
    }
}
