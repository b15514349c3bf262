//! Loading a site config from disk.

use std::io::Write;

use portfolio_client::config::{from_json, load_config, SiteConfig};
use portfolio_client::observe::Length;
use portfolio_client::Error;
use tempfile::NamedTempFile;

#[test]
fn loads_a_full_site_config() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "navigation": {{
                "controls": ".bottom-nav .nav-item, .mobile-bottom-nav .mobile-nav-item",
                "root_margin": "-10% 0px -60% 0px"
            }},
            "theme": {{ "default": "light" }},
            "taglines": ["one", "two"],
            "series": [
                {{ "title": "Zero-Day", "url": "zero-day.html", "category": "cybersecurity",
                   "date": "2024-03-01" }}
            ],
            "log_level": "portfolio_client=debug"
        }}"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(
        config.navigation.controls,
        ".bottom-nav .nav-item, .mobile-bottom-nav .mobile-nav-item"
    );
    assert_eq!(config.navigation.root_margin.top, Length::Percent(-10.0));
    assert_eq!(config.navigation.header_offset_px, 32.0);
    assert_eq!(config.theme.default, "light");
    assert_eq!(config.theme.storage_key, "theme");
    assert_eq!(config.taglines, vec!["one", "two"]);
    assert_eq!(
        config.series[0].date.map(|d| d.to_string()).as_deref(),
        Some("2024-03-01")
    );
    assert_eq!(config.timing, SiteConfig::default().timing);
    assert_eq!(config.log_level, "portfolio_client=debug");
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.json");

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigFile { .. }));
    assert!(err.to_string().contains("site.json"));
}

#[test]
fn invalid_root_margin_is_rejected_at_load() {
    let err = from_json(r#"{ "reveal": { "root_margin": "0px 0px -50em 0px" } }"#).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("root margin"), "{}", err);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = from_json("{ navigation: }").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
