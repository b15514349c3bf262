//! Capabilities the page provides to the site components.
//!
//! Every component is generic over these traits and never names a browser
//! type. `memory` is a complete in-process host for tests, built under
//! `cfg(test)` or the `test-util` feature; the wasm build implements the
//! same traits over `web-sys` in `crate::web`.

use std::fmt;
use std::time::Duration;

use crate::error::Result;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
#[cfg(any(test, feature = "test-util"))]
mod selector;

/// Document access: queries, attributes, classes, and a little layout.
///
/// Handles are cheap clones; all mutation goes through `&self` because the
/// underlying document is shared, interior-mutable state.
pub trait Dom {
    type Element: Clone + PartialEq + fmt::Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    fn query_first(&self, selector: &str) -> Option<Self::Element> {
        self.query_all(selector).into_iter().next()
    }

    /// First descendant of `scope` matching `selector`.
    fn query_within(&self, scope: &Self::Element, selector: &str) -> Option<Self::Element>;

    /// `element` itself or its nearest ancestor matching `selector`.
    fn closest(&self, element: &Self::Element, selector: &str) -> Option<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    fn add_class(&self, element: &Self::Element, class: &str);
    fn remove_class(&self, element: &Self::Element, class: &str);
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn set_style(&self, element: &Self::Element, property: &str, value: &str);

    fn text_content(&self, element: &Self::Element) -> String;
    fn set_text_content(&self, element: &Self::Element, text: &str);

    /// Distance from the top of the document to the element's top edge.
    fn document_top(&self, element: &Self::Element) -> f64;
    fn height(&self, element: &Self::Element) -> f64;

    /// The `<html>` element.
    fn root(&self) -> Self::Element;
    fn body(&self) -> Self::Element;

    /// Create `<tag class=...>` with `inner_html`, append it to `parent`.
    fn append_element(
        &self,
        parent: &Self::Element,
        tag: &str,
        class: &str,
        inner_html: &str,
    ) -> Option<Self::Element>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Viewport, location and popups.
pub trait Window {
    /// Request a scroll to an absolute vertical offset. The host clamps.
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);

    /// Replace the current location.
    fn navigate(&self, url: &str);

    fn location(&self) -> String;
    fn pathname(&self) -> String;
    fn document_title(&self) -> String;

    fn scroll_y(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn scroll_height(&self) -> f64;

    fn open_popup(&self, url: &str, name: &str, features: &str);
}

/// Browser-local key/value persistence.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One-shot timers with cancellable handles.
pub trait Timers {
    /// Handles outlive the call that created them; pending callbacks
    /// capture them to clear themselves.
    type Handle: 'static;

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Self::Handle;
    fn clear_timeout(&self, handle: Self::Handle);
}
