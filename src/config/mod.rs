//! Site configuration
//!
//! Everything has a default matching the stock portfolio markup, so an
//! empty JSON object is a valid config.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::observe::{ObserverOptions, RootMargin};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub navigation: NavigationConfig,
    pub reveal: RevealConfig,
    pub timing: TimingConfig,
    pub theme: ThemeConfig,
    pub taglines: Vec<String>,
    /// Ordered posts used for previous/next links.
    pub series: Vec<PostEntry>,
    /// Candidates for the related-posts block.
    pub related: Vec<PostEntry>,
    /// `EnvFilter` directive for the console logger.
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationConfig::default(),
            reveal: RevealConfig::default(),
            timing: TimingConfig::default(),
            theme: ThemeConfig::default(),
            taglines: default_taglines(),
            series: default_series(),
            related: default_related(),
            log_level: "info".to_string(),
        }
    }
}

fn default_taglines() -> Vec<String> {
    [
        "one line of code at a time",
        "through advanced threat detection",
        "with machine learning algorithms",
        "by building robust defenses",
        "using cutting-edge research",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Every navigation control on the page (dock, bars, menus).
    pub controls: String,
    pub sections: String,
    pub threshold: f64,
    pub root_margin: RootMargin,
    /// Space kept free above a section after a click-scroll.
    pub header_offset_px: f64,
    pub active_class: String,
    /// Controls carrying this class are not navigation (theme toggle).
    pub skip_class: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            controls: ".unified-dock .dock-item".to_string(),
            sections: "section[id]".to_string(),
            threshold: 0.3,
            root_margin: RootMargin {
                top: crate::observe::Length::Percent(-20.0),
                right: crate::observe::Length::Px(0.0),
                bottom: crate::observe::Length::Percent(-70.0),
                left: crate::observe::Length::Px(0.0),
            },
            header_offset_px: 32.0,
            active_class: "active".to_string(),
            skip_class: "theme-toggle".to_string(),
        }
    }
}

impl NavigationConfig {
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.threshold,
            root_margin: self.root_margin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".hero-badge, .hero-title, .hero-description, .hero-stats, \
                       .hero-actions, .hero-social, .skill-item, .project-card, \
                       .tool-card, .about-text"
                .to_string(),
            threshold: 0.1,
            root_margin: RootMargin {
                bottom: crate::observe::Length::Px(-50.0),
                ..RootMargin::ZERO
            },
        }
    }
}

impl RevealConfig {
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.threshold,
            root_margin: self.root_margin,
        }
    }
}

/// Delays in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub scroll_debounce_ms: u64,
    pub search_debounce_ms: u64,
    pub resize_debounce_ms: u64,
    pub stagger_ms: u64,
    pub rotation_ms: u64,
    pub fade_ms: u64,
    pub copy_feedback_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scroll_debounce_ms: 10,
            search_debounce_ms: 200,
            resize_debounce_ms: 250,
            stagger_ms: 100,
            rotation_ms: 4000,
            fade_ms: 400,
            copy_feedback_ms: 2000,
        }
    }
}

impl TimingConfig {
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn rotation(&self) -> Duration {
        Duration::from_millis(self.rotation_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub default: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            default: "dark".to_string(),
        }
    }
}

/// A blog post as listed in the series or related catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostEntry {
    pub title: String,
    pub url: String,
    pub category: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

impl PostEntry {
    fn stock(title: &str, url: &str, category: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            category: category.to_string(),
            date: None,
            excerpt: None,
        }
    }

    fn dated(mut self, year: i32, month: u32, day: u32) -> Self {
        self.date = NaiveDate::from_ymd_opt(year, month, day);
        self
    }

    fn with_excerpt(mut self, excerpt: &str) -> Self {
        self.excerpt = Some(excerpt.to_string());
        self
    }
}

/// Published posts in reading order. URLs are relative to the
/// `_posts/cybersecurity/` directory the series starts in.
fn default_series() -> Vec<PostEntry> {
    vec![
        PostEntry::stock(
            "Zero-Day Exploit Detection Techniques",
            "zero-day-detection.html",
            "cybersecurity",
        )
        .dated(2024, 12, 10),
        PostEntry::stock(
            "Advanced Threat Detection with Machine Learning",
            "ml-threat-detection.html",
            "cybersecurity",
        )
        .dated(2024, 12, 15),
        PostEntry::stock(
            "AI-Powered Network Security Monitoring",
            "ai-network-security.html",
            "cybersecurity",
        )
        .dated(2024, 12, 20),
        PostEntry::stock(
            "Reverse Engineering Modern Ransomware",
            "../malware/ransomware-analysis.html",
            "malware",
        )
        .dated(2024, 11, 28),
        PostEntry::stock(
            "Dynamic Malware Analysis in Sandboxed Environments",
            "../malware/dynamic-analysis.html",
            "malware",
        )
        .dated(2024, 11, 20),
    ]
}

fn default_related() -> Vec<PostEntry> {
    vec![
        PostEntry::stock(
            "Advanced Threat Detection with Machine Learning",
            "_posts/cybersecurity/ml-threat-detection.html",
            "cybersecurity",
        )
        .with_excerpt("Exploring how ML algorithms can identify zero-day threats..."),
        PostEntry::stock(
            "Building Scalable Security Infrastructure",
            "_posts/engineering/scalable-security.html",
            "engineering",
        )
        .with_excerpt("Best practices for designing security systems..."),
        PostEntry::stock(
            "Reverse Engineering Modern Ransomware",
            "_posts/malware/ransomware-analysis.html",
            "malware",
        )
        .with_excerpt("A deep dive into the latest ransomware techniques..."),
        PostEntry::stock(
            "Zero-Day Vulnerability Research",
            "_posts/cybersecurity/zero-day-research.html",
            "cybersecurity",
        )
        .with_excerpt("Methods and tools for discovering security flaws..."),
        PostEntry::stock(
            "API Security Best Practices",
            "_posts/engineering/api-security.html",
            "engineering",
        )
        .with_excerpt("Securing modern web APIs against common attacks..."),
    ]
}

/// Parse a JSON config.
pub fn from_json(source: &str) -> Result<SiteConfig> {
    let config: SiteConfig = serde_json::from_str(source)?;
    tracing::debug!(
        "Site config loaded: {} series posts, {} related posts",
        config.series.len(),
        config.related.len()
    );
    Ok(config)
}

/// Read and parse a JSON config file.
pub fn load_config(path: &Path) -> Result<SiteConfig> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::ConfigFile {
        path: path.display().to_string(),
        source,
    })?;
    from_json(&source)
}
