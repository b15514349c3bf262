/// What a navigation control points at, from its `href`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavHref {
    /// `#id`: a section on this page.
    Section(String),
    /// Anything else with content: another page or site.
    External(String),
    /// Missing, empty, or a bare `#`.
    Inert,
}

impl NavHref {
    pub fn parse(href: Option<&str>) -> Self {
        match href.map(str::trim) {
            None | Some("") | Some("#") => NavHref::Inert,
            Some(h) => match h.strip_prefix('#') {
                Some(id) => NavHref::Section(id.to_string()),
                None => NavHref::External(h.to_string()),
            },
        }
    }

    pub fn section_id(&self) -> Option<&str> {
        match self {
            NavHref::Section(id) => Some(id),
            _ => None,
        }
    }
}

/// Resolve `href` against the current location for a full-page load.
pub(crate) fn resolve_external(location: &str, href: &str) -> String {
    match url::Url::parse(location).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}
