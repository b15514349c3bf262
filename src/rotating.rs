//! Hero tagline that cycles with a fade.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::host::{Dom, Timers};

pub const ROTATING_TEXT_ID: &str = "rotating-text";
const FADE_CLASS: &str = "fade-out";

/// Cycling index over a fixed list.
#[derive(Clone, Debug, PartialEq)]
pub struct Rotation {
    texts: Vec<String>,
    index: usize,
}

impl Rotation {
    pub fn new(texts: Vec<String>) -> Self {
        Self { texts, index: 0 }
    }

    pub fn current(&self) -> Option<&str> {
        self.texts.get(self.index).map(String::as_str)
    }

    /// Step forward, wrapping. `None` for an empty list.
    pub fn advance(&mut self) -> Option<&str> {
        if self.texts.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.texts.len();
        self.current()
    }
}

/// Drives the `#rotating-text` element: every `interval` it fades out,
/// swaps the text after `fade`, and fades back in.
pub struct RotatingText<D: Dom, T: Timers> {
    dom: D,
    timers: T,
    element: D::Element,
    rotation: RefCell<Rotation>,
    interval: Duration,
    fade: Duration,
    tick: RefCell<Option<T::Handle>>,
    swap: RefCell<Option<T::Handle>>,
}

impl<D, T> RotatingText<D, T>
where
    D: Dom + Clone + 'static,
    D::Element: 'static,
    T: Timers + 'static,
{
    pub fn discover(
        dom: D,
        timers: T,
        texts: Vec<String>,
        interval: Duration,
        fade: Duration,
    ) -> Option<Rc<Self>> {
        let element = dom.element_by_id(ROTATING_TEXT_ID)?;
        Some(Rc::new(Self {
            dom,
            timers,
            element,
            rotation: RefCell::new(Rotation::new(texts)),
            interval,
            fade,
            tick: RefCell::new(None),
            swap: RefCell::new(None),
        }))
    }

    /// Schedule the next tick, replacing any that is pending.
    pub fn start(self: &Rc<Self>) {
        let this = self.clone();
        let handle = self
            .timers
            .set_timeout(self.interval, Box::new(move || this.tick()));
        if let Some(previous) = self.tick.borrow_mut().replace(handle) {
            self.timers.clear_timeout(previous);
        }
    }

    /// Cancel the pending tick and text swap. The element keeps whatever
    /// text it shows now.
    pub fn stop(&self) {
        if let Some(handle) = self.tick.borrow_mut().take() {
            self.timers.clear_timeout(handle);
        }
        if let Some(handle) = self.swap.borrow_mut().take() {
            self.timers.clear_timeout(handle);
            self.dom.remove_class(&self.element, FADE_CLASS);
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick.borrow().is_some()
    }

    fn tick(self: Rc<Self>) {
        // This tick's handle is spent.
        self.tick.borrow_mut().take();
        let next = self.rotation.borrow_mut().advance().map(str::to_string);
        if let Some(text) = next {
            self.dom.add_class(&self.element, FADE_CLASS);
            let this = self.clone();
            let handle = self.timers.set_timeout(
                self.fade,
                Box::new(move || {
                    this.swap.borrow_mut().take();
                    this.dom.set_text_content(&this.element, &text);
                    this.dom.remove_class(&this.element, FADE_CLASS);
                }),
            );
            *self.swap.borrow_mut() = Some(handle);
        }
        self.start();
    }
}
