#![forbid(unsafe_code)]

//! Deferred single-threaded action dispatch.
//!
//! Everything in rowkit runs on the UI thread. "Asynchronous" here means
//! postponed to the next host event-loop turn, not a separate thread: a
//! menu item's action is posted to the queue during click handling and runs
//! when the host drains the queue, so the action can freely mutate the menu
//! tree without re-entering the widget mid-event.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Action = Box<dyn FnOnce()>;

/// A clone-able handle to a FIFO of deferred actions.
///
/// The host owns one queue per UI loop and calls [`ActionQueue::run_pending`]
/// once per turn. Widgets hold clones and post.
#[derive(Clone, Default)]
pub struct ActionQueue {
    inner: Rc<RefCell<VecDeque<Action>>>,
}

impl ActionQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an action for the next drain.
    pub fn post(&self, action: impl FnOnce() + 'static) {
        self.inner.borrow_mut().push_back(Box::new(action));
    }

    /// Number of queued actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// True if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Run every queued action, including actions posted while draining.
    /// Returns the number of actions run.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        // Pop one at a time so actions may post follow-ups, and so the
        // queue is never borrowed while an action runs.
        loop {
            let next = self.inner.borrow_mut().pop_front();
            match next {
                Some(action) => {
                    action();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl std::fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionQueue")
            .field("pending", &self.len())
            .finish()
    }
}
