//! Copy buttons on code blocks.
//!
//! The async clipboard API is tried first; when it is missing or rejects,
//! the text goes through a synchronous fallback (a hidden textarea and
//! `execCommand("copy")` in the browser).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::host::{Dom, Timers};

pub const COPY_BUTTON_CLASS: &str = "copy-to-clipboard-button";
pub const COPIED_LABEL: &str = "Copied!";

#[async_trait(?Send)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<()>;
}

pub trait FallbackCopy {
    fn copy(&self, text: &str) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Clipboard,
    Fallback,
    Failed,
}

/// Copy `text`, falling back when the primary mechanism is absent or fails.
pub async fn copy_text(
    primary: Option<&dyn Clipboard>,
    fallback: &dyn FallbackCopy,
    text: &str,
) -> CopyOutcome {
    if let Some(clipboard) = primary {
        match clipboard.write_text(text).await {
            Ok(()) => {
                tracing::debug!("Code copied to clipboard");
                return CopyOutcome::Clipboard;
            }
            Err(e) => tracing::warn!("Failed to copy code: {}", e),
        }
    }

    match fallback.copy(text) {
        Ok(()) => {
            tracing::debug!("Code copied to clipboard (fallback)");
            CopyOutcome::Fallback
        }
        Err(e) => {
            tracing::error!("Fallback copy failed: {}", e);
            CopyOutcome::Failed
        }
    }
}

/// Click handling for copy buttons: extracts the code and shows feedback.
pub struct CodeCopy<D: Dom, T: Timers> {
    dom: D,
    timers: T,
    feedback: Duration,
}

impl<D, T> CodeCopy<D, T>
where
    D: Dom + Clone + 'static,
    D::Element: 'static,
    T: Timers,
{
    pub fn new(dom: D, timers: T, feedback: Duration) -> Self {
        Self {
            dom,
            timers,
            feedback,
        }
    }

    /// Document click. Returns the text to copy when `target` is a copy
    /// button inside a `pre` with a `code` child.
    pub fn on_click(&self, target: &D::Element) -> Option<String> {
        if !self.dom.has_class(target, COPY_BUTTON_CLASS) {
            return None;
        }
        let pre = self.dom.closest(target, "pre")?;
        let code = self.dom.query_within(&pre, "code")?;
        let text = self.dom.text_content(&code);

        let original = self.dom.text_content(target);
        self.dom.set_text_content(target, COPIED_LABEL);
        let dom = self.dom.clone();
        let button = target.clone();
        self.timers.set_timeout(
            self.feedback,
            Box::new(move || dom.set_text_content(&button, &original)),
        );

        Some(text)
    }
}
