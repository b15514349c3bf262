//! Portfolio client
//!
//! Client-side behaviour for a personal portfolio/blog site.
//!
//! This library provides:
//! - Scroll-spy navigation shared by every nav surface on a page
//! - Light/dark theme persisted in local storage
//! - Category and search filtering for blog and project grids
//! - Scroll reveal, rotating tagline and reading progress effects
//! - Social share links and copy-to-clipboard for code blocks
//! - Previous/next and related-post links on post pages
//!
//! Components only see the page through the traits in [`host`]; the
//! `web` module (wasm32 only) binds them to the browser.

pub mod clipboard;
pub mod config;
pub mod debounce;
pub mod error;
pub mod gallery;
pub mod host;
pub mod nav;
pub mod observe;
pub mod posts;
pub mod progress;
pub mod reveal;
pub mod rotating;
pub mod share;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{Error, Result};

/// Version string stamped at build time.
pub fn version() -> &'static str {
    env!("PORTFOLIO_VERSION")
}

/// Git SHA stamped at build time.
pub fn git_sha() -> &'static str {
    env!("PORTFOLIO_GIT_SHA")
}
