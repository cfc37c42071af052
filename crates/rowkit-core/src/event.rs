#![forbid(unsafe_code)]

//! Normalized input events.
//!
//! Hosts translate native toolkit input into these types. Pointer events
//! carry a host-supplied monotonic timestamp (offset from an arbitrary
//! epoch) so that multi-click detection is deterministic and testable
//! without reading a wall clock.

use std::time::Duration;

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Keyboard modifier state attached to key and pointer events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT   = 0b0001;
        const CONTROL = 0b0010;
        const ALT     = 0b0100;
        const SUPER   = 0b1000;
    }
}

impl Modifiers {
    /// True if the platform "command" modifier is held (Ctrl, or Super on
    /// platforms that use it as the primary shortcut key).
    #[must_use]
    pub const fn is_command(self) -> bool {
        self.intersects(Self::CONTROL.union(Self::SUPER))
    }
}

/// Key identity for the navigation keys the widget engines consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Delete,
    Backspace,
    Escape,
    Tab,
    Char(char),
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Create a key event with the given modifiers.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Pointer button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Left mouse button / primary touch.
    #[default]
    Primary,
    /// Right mouse button / long-press equivalent.
    Secondary,
    Middle,
}

/// What a pointer event reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEventKind {
    /// Button pressed at `pos`.
    Down(PointerButton),
    /// Button released at `pos`.
    Up(PointerButton),
    /// Pointer moved (with or without a button held).
    Move,
    /// Scroll wheel; deltas are in pixels, positive `dy` scrolls content up.
    Wheel { dx: f32, dy: f32 },
}

/// A pointer event in widget-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub pos: Point,
    pub modifiers: Modifiers,
    /// Monotonic offset from a host-chosen epoch.
    pub timestamp: Duration,
}

impl PointerEvent {
    /// Create a pointer event.
    #[must_use]
    pub const fn new(
        kind: PointerEventKind,
        pos: Point,
        modifiers: Modifiers,
        timestamp: Duration,
    ) -> Self {
        Self {
            kind,
            pos,
            modifiers,
            timestamp,
        }
    }

    /// True for a secondary-button press or release.
    #[must_use]
    pub const fn is_secondary(&self) -> bool {
        matches!(
            self.kind,
            PointerEventKind::Down(PointerButton::Secondary)
                | PointerEventKind::Up(PointerButton::Secondary)
        )
    }
}

/// Cursor shape a row can request from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorKind {
    #[default]
    Default,
    Hand,
    Crosshair,
    Text,
    Forbidden,
}

/// Result of offering an input event to a widget engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The widget consumed the event; the host should stop routing it.
    Consumed,
    /// Not relevant to the widget; the host may route it elsewhere.
    Ignored,
}

impl EventOutcome {
    /// True if the event was consumed.
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}
