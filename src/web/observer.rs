//! `IntersectionObserver` registration.

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom::js_error;
use crate::error::Result;
use crate::observe::{ObserverOptions, VisibilityEntry};

/// Disconnects the observer on drop and owns its callback.
pub struct ObserverGuard {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Observe `targets`, delivering each batch to `on_batch` in order.
pub fn observe(
    targets: &[Element],
    options: ObserverOptions,
    mut on_batch: impl FnMut(&[VisibilityEntry<Element>]) + 'static,
) -> Result<ObserverGuard> {
    let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
        let batch: Vec<VisibilityEntry<Element>> = entries
            .iter()
            .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
            .map(|entry| VisibilityEntry::new(entry.target(), entry.is_intersecting()))
            .collect();
        on_batch(&batch);
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin.to_string());

    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        .map_err(js_error)?;
    for target in targets {
        observer.observe(target);
    }

    Ok(ObserverGuard {
        observer,
        _callback: callback,
    })
}
