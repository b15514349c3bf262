//! Browser clipboard: `navigator.clipboard.writeText` with an
//! `execCommand("copy")` fallback.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlDocument, HtmlTextAreaElement};

use super::dom::js_error;
use crate::clipboard::{Clipboard, FallbackCopy};
use crate::error::{Error, Result};

/// `navigator.clipboard`, looked up dynamically since older browsers and
/// insecure origins leave it undefined.
pub struct AsyncClipboard {
    target: JsValue,
    write_text: Function,
}

impl AsyncClipboard {
    pub fn detect(window: &web_sys::Window) -> Option<Self> {
        let target = Reflect::get(&window.navigator(), &JsValue::from_str("clipboard")).ok()?;
        if target.is_undefined() || target.is_null() {
            return None;
        }
        let write_text = Reflect::get(&target, &JsValue::from_str("writeText"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some(Self { target, write_text })
    }
}

#[async_trait(?Send)]
impl Clipboard for AsyncClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let promise = self
            .write_text
            .call1(&self.target, &JsValue::from_str(text))
            .map_err(js_error)?
            .dyn_into::<Promise>()
            .map_err(|_| Error::Clipboard("writeText did not return a promise".into()))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| Error::Clipboard(js_error(e).to_string()))?;
        Ok(())
    }
}

/// Hidden textarea plus `document.execCommand("copy")`.
pub struct ExecCommandCopy {
    document: Document,
}

impl ExecCommandCopy {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn try_copy(&self, text: &str) -> anyhow::Result<()> {
        let body = self.document.body().context("document has no body")?;
        let textarea: HtmlTextAreaElement = self
            .document
            .create_element("textarea")
            .map_err(|e| anyhow!("{}", js_error(e)))?
            .dyn_into()
            .map_err(|_| anyhow!("created element is not a textarea"))?;
        textarea.set_value(text);
        let style = textarea.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("left", "-999999px");
        let _ = style.set_property("top", "-999999px");
        body.append_child(&textarea)
            .map_err(|e| anyhow!("{}", js_error(e)))?;

        let _ = textarea.focus();
        textarea.select();
        let copied = self
            .document
            .dyn_ref::<HtmlDocument>()
            .context("document is not an HTML document")
            .and_then(|html| {
                html.exec_command("copy")
                    .map_err(|e| anyhow!("{}", js_error(e)))
            });
        textarea.remove();

        if copied? {
            Ok(())
        } else {
            Err(anyhow!("execCommand(\"copy\") returned false"))
        }
    }
}

impl FallbackCopy for ExecCommandCopy {
    fn copy(&self, text: &str) -> Result<()> {
        self.try_copy(text)
            .map_err(|e| Error::Clipboard(format!("{:#}", e)))
    }
}
