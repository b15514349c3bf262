//! Entrance animations: `reveal active` classes added when elements
//! scroll into view, or on a stagger after a gallery refresh.

use std::time::Duration;

use crate::config::RevealConfig;
use crate::host::{Dom, Timers};
use crate::observe::{ObserverOptions, VisibilityEntry};

pub const REVEAL_CLASSES: [&str; 2] = ["reveal", "active"];

fn reveal<D: Dom>(dom: &D, element: &D::Element) {
    for class in REVEAL_CLASSES {
        dom.add_class(element, class);
    }
}

/// Elements to reveal one after another, `step` apart.
#[derive(Clone, Debug, PartialEq)]
pub struct StaggeredReveal<E> {
    pub steps: Vec<(E, Duration)>,
}

impl<E> StaggeredReveal<E> {
    pub fn new(elements: Vec<E>, step: Duration) -> Self {
        let steps = elements
            .into_iter()
            .zip(0u32..)
            .map(|(element, index)| (element, step * index))
            .collect();
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Queue every step on `timers`.
    pub fn schedule<D, T>(self, dom: &D, timers: &T)
    where
        D: Dom<Element = E> + Clone + 'static,
        E: 'static,
        T: Timers,
    {
        for (element, delay) in self.steps {
            let dom = dom.clone();
            timers.set_timeout(delay, Box::new(move || reveal(&dom, &element)));
        }
    }
}

/// One-way reveal of the configured elements as they become visible.
pub struct ScrollReveal<D: Dom> {
    dom: D,
    elements: Vec<D::Element>,
    options: ObserverOptions,
}

impl<D: Dom> ScrollReveal<D> {
    pub fn discover(dom: D, config: &RevealConfig) -> Self {
        let elements = dom.query_all(&config.selector);
        Self {
            dom,
            elements,
            options: config.observer_options(),
        }
    }

    pub fn elements(&self) -> &[D::Element] {
        &self.elements
    }

    pub fn observer_options(&self) -> ObserverOptions {
        self.options
    }

    /// Reveal every intersecting entry; returns how many were revealed.
    pub fn handle_visibility(&self, batch: &[VisibilityEntry<D::Element>]) -> usize {
        let mut revealed = 0;
        for entry in batch.iter().filter(|e| e.is_intersecting) {
            reveal(&self.dom, &entry.target);
            revealed += 1;
        }
        revealed
    }
}
