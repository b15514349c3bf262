//! Trailing-edge debounce over a [`Timers`] host.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::host::Timers;

/// Collapses bursts of [`Debounce::trigger`] calls into one handler run,
/// `wait` after the last call. Each trigger discards the pending run.
pub struct Debounce<T: Timers> {
    timers: T,
    wait: Duration,
    handler: Rc<dyn Fn()>,
    pending: Rc<RefCell<Option<T::Handle>>>,
}

impl<T: Timers> Debounce<T> {
    pub fn new(timers: T, wait: Duration, handler: impl Fn() + 'static) -> Self {
        Self {
            timers,
            wait,
            handler: Rc::new(handler),
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn trigger(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            self.timers.clear_timeout(handle);
        }

        let handler = self.handler.clone();
        let pending = self.pending.clone();
        let handle = self.timers.set_timeout(
            self.wait,
            Box::new(move || {
                pending.borrow_mut().take();
                handler();
            }),
        );
        *self.pending.borrow_mut() = Some(handle);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Drop the pending run, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            self.timers.clear_timeout(handle);
        }
    }
}
