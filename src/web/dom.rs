//! `host` traits over `web-sys`.

use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollToOptions};

use crate::error::{Error, Result};
use crate::host::{Dom, ScrollBehavior, Storage, Timers, Window};

pub(crate) fn js_error(e: JsValue) -> Error {
    Error::Host(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

#[derive(Clone)]
pub struct WebDom {
    document: Document,
    root: Element,
    body: Element,
}

impl WebDom {
    /// `None` before the document has a root and a body.
    pub fn new(document: Document) -> Option<Self> {
        let root = document.document_element()?;
        let body: Element = document.body()?.into();
        Some(Self {
            document,
            root,
            body,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn collect(list: std::result::Result<web_sys::NodeList, JsValue>, selector: &str) -> Vec<Element> {
    let list = match list {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("Bad selector {:?}: {}", selector, js_error(e));
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Dom for WebDom {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        collect(self.document.query_selector_all(selector), selector)
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn closest(&self, element: &Element, selector: &str) -> Option<Element> {
        element.closest(selector).ok().flatten()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) {
        if let Err(e) = element.set_attribute(name, value) {
            tracing::warn!("Failed to set {}: {}", name, js_error(e));
        }
    }

    fn add_class(&self, element: &Element, class: &str) {
        let _ = element.class_list().add_1(class);
    }

    fn remove_class(&self, element: &Element, class: &str) {
        let _ = element.class_list().remove_1(class);
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property(property, value);
        }
    }

    fn text_content(&self, element: &Element) -> String {
        element.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn document_top(&self, element: &Element) -> f64 {
        element
            .dyn_ref::<HtmlElement>()
            .map(|html| f64::from(html.offset_top()))
            .unwrap_or_default()
    }

    fn height(&self, element: &Element) -> f64 {
        element
            .dyn_ref::<HtmlElement>()
            .map(|html| f64::from(html.offset_height()))
            .unwrap_or_default()
    }

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn body(&self) -> Element {
        self.body.clone()
    }

    fn append_element(
        &self,
        parent: &Element,
        tag: &str,
        class: &str,
        inner_html: &str,
    ) -> Option<Element> {
        let element = match self.document.create_element(tag) {
            Ok(element) => element,
            Err(e) => {
                tracing::warn!("Failed to create <{}>: {}", tag, js_error(e));
                return None;
            }
        };
        element.set_class_name(class);
        element.set_inner_html(inner_html);
        parent.append_child(&element).ok()?;
        Some(element)
    }
}

#[derive(Clone)]
pub struct WebWindow {
    window: web_sys::Window,
    document: Document,
}

impl WebWindow {
    pub fn new(window: web_sys::Window, document: Document) -> Self {
        Self { window, document }
    }
}

impl Window for WebWindow {
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn navigate(&self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            tracing::warn!("Navigation to {} failed: {}", url, js_error(e));
        }
    }

    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn document_title(&self) -> String {
        self.document.title()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or_default()
    }

    fn scroll_height(&self) -> f64 {
        self.document
            .document_element()
            .map(|root| f64::from(root.scroll_height()))
            .unwrap_or_default()
    }

    fn open_popup(&self, url: &str, name: &str, features: &str) {
        if let Err(e) = self
            .window
            .open_with_url_and_target_and_features(url, name, features)
        {
            tracing::warn!("Popup blocked: {}", js_error(e));
        }
    }
}

/// `localStorage`; `None` inner when the browser denies access.
#[derive(Clone)]
pub struct WebStorage {
    storage: Option<web_sys::Storage>,
}

impl WebStorage {
    pub fn new(window: &web_sys::Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl Storage for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let storage = self.storage.as_ref().ok_or_else(|| Error::Storage {
            key: key.to_string(),
            reason: "localStorage unavailable".into(),
        })?;
        storage.set_item(key, value).map_err(|e| Error::Storage {
            key: key.to_string(),
            reason: js_error(e).to_string(),
        })
    }
}

/// `setTimeout`/`clearTimeout`. A failed registration yields `None`.
#[derive(Clone)]
pub struct WebTimers {
    window: web_sys::Window,
}

impl WebTimers {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }
}

impl Timers for WebTimers {
    type Handle = Option<i32>;

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Option<i32> {
        let callback = Closure::once_into_js(move || callback());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis,
            ) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("setTimeout failed: {}", js_error(e));
                None
            }
        }
    }

    fn clear_timeout(&self, handle: Option<i32>) {
        if let Some(handle) = handle {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}
