//! Light/dark theme with local storage persistence.
//!
//! The theme is mirrored to `data-theme` on the root element and to the
//! sun/moon icons inside every toggle button.

use crate::config::ThemeConfig;
use crate::host::{Dom, Storage};

/// Theme options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything but `light` is dark.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Ids of the theme toggle buttons (desktop and mobile).
pub const TOGGLE_IDS: [&str; 2] = ["theme-toggle", "mobile-theme-toggle"];

pub struct ThemeManager<D: Dom, S: Storage> {
    dom: D,
    storage: S,
    key: String,
    theme: Theme,
    toggles: Vec<D::Element>,
}

impl<D: Dom, S: Storage> ThemeManager<D, S> {
    /// Load the stored theme (or the configured default) and apply it.
    pub fn init(dom: D, storage: S, config: &ThemeConfig) -> Self {
        let theme = storage
            .get(&config.storage_key)
            .map(|stored| Theme::parse(&stored))
            .unwrap_or_else(|| Theme::parse(&config.default));
        let toggles = TOGGLE_IDS
            .iter()
            .filter_map(|id| dom.element_by_id(id))
            .collect();

        let mut manager = Self {
            dom,
            storage,
            key: config.storage_key.clone(),
            theme,
            toggles,
        };
        manager.set_theme(theme);
        manager
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggles(&self) -> &[D::Element] {
        &self.toggles
    }

    /// Set, apply and persist.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.dom
            .set_attribute(&self.dom.root(), "data-theme", theme.as_str());

        if let Err(e) = self.storage.set(&self.key, theme.as_str()) {
            tracing::warn!("Theme not persisted: {}", e);
        }

        for toggle in &self.toggles {
            self.update_icons(toggle, theme);
        }
    }

    pub fn toggle(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(next);
        next
    }

    fn update_icons(&self, toggle: &D::Element, theme: Theme) {
        let sun = self.dom.query_within(toggle, ".sun-icon");
        let moon = self.dom.query_within(toggle, ".moon-icon");
        // Both icons must be present; a half-built toggle is left alone.
        if let (Some(sun), Some(moon)) = (sun, moon) {
            let (sun_opacity, moon_opacity) = match theme {
                Theme::Light => ("1", "0"),
                Theme::Dark => ("0", "1"),
            };
            self.dom.set_style(&sun, "opacity", sun_opacity);
            self.dom.set_style(&moon, "opacity", moon_opacity);
        }
    }
}
