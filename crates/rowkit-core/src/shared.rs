#![forbid(unsafe_code)]

//! Model liveness handles.
//!
//! A widget engine holds its content provider through a non-owning
//! [`ModelRef`]; the host keeps the owning [`Shared`]. The provider must
//! outlive the widget. That contract is checked, not assumed: every
//! dereference upgrades the weak handle first, `debug_assert!`s on a dead
//! provider, and degrades to a no-op in release builds instead of touching
//! freed state. This is a debug-time contract, not a recoverable runtime
//! condition.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Owning handle to a model. Host-side.
#[derive(Debug, Default)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    /// Wrap a model.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Create a non-owning reference for a widget to hold.
    #[must_use]
    pub fn downgrade(&self) -> ModelRef<T> {
        ModelRef {
            weak: Rc::downgrade(&self.0),
            attached: true,
        }
    }

    /// Borrow the model immutably.
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrow the model mutably.
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

/// Non-owning handle to a model. Widget-side.
#[derive(Debug)]
pub struct ModelRef<T> {
    weak: Weak<RefCell<T>>,
    attached: bool,
}

impl<T> ModelRef<T> {
    /// A reference that was never attached to a model. Dereferencing it is
    /// a quiet no-op, not a liveness violation.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            weak: Weak::new(),
            attached: false,
        }
    }

    /// True if the owning [`Shared`] is still alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.weak.strong_count() > 0
    }

    /// Run `f` against the model, or return `None` if there is none.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        match self.weak.upgrade() {
            Some(rc) => Some(f(&rc.borrow())),
            None => {
                debug_assert!(
                    !self.attached,
                    "content provider destroyed while still referenced"
                );
                None
            }
        }
    }

    /// Run `f` against the model mutably, or return `None` if there is none.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        match self.weak.upgrade() {
            Some(rc) => Some(f(&mut rc.borrow_mut())),
            None => {
                debug_assert!(
                    !self.attached,
                    "content provider destroyed while still referenced"
                );
                None
            }
        }
    }
}

impl<T> Clone for ModelRef<T> {
    fn clone(&self) -> Self {
        Self {
            weak: Weak::clone(&self.weak),
            attached: self.attached,
        }
    }
}

impl<T> Default for ModelRef<T> {
    fn default() -> Self {
        Self::detached()
    }
}
