//! Social sharing links for blog posts.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::host::{Dom, Window};

pub const SHARE_BUTTON_SELECTOR: &str = ".share-btn";
pub const POPUP_NAME: &str = "social-share";
pub const POPUP_FEATURES: &str = "width=600,height=400,scrollbars=yes,resizable=yes";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SharePlatform {
    Twitter,
    LinkedIn,
    Bluesky,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 3] = [
        SharePlatform::Twitter,
        SharePlatform::LinkedIn,
        SharePlatform::Bluesky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SharePlatform::Twitter => "twitter",
            SharePlatform::LinkedIn => "linkedin",
            SharePlatform::Bluesky => "bluesky",
        }
    }

    fn aria_label(&self) -> &'static str {
        match self {
            SharePlatform::Twitter => "Share on Twitter/X",
            SharePlatform::LinkedIn => "Share on LinkedIn",
            SharePlatform::Bluesky => "Share on Bluesky",
        }
    }

    fn icon_path(&self) -> &'static str {
        match self {
            SharePlatform::Twitter => "M18.244 2.25h3.308l-7.227 8.26 8.502 11.24H16.17l-5.214-6.817L4.99 21.75H1.68l7.73-8.835L1.254 2.25H8.08l4.713 6.231zm-1.161 17.52h1.833L7.084 4.126H5.117z",
            SharePlatform::LinkedIn => "M20.447 20.452h-3.554v-5.569c0-1.328-.027-3.037-1.852-3.037-1.853 0-2.136 1.445-2.136 2.939v5.667H9.351V9h3.564v11.452zM5.337 7.433c-1.144 0-2.063-.926-2.063-2.065 0-1.138.92-2.063 2.063-2.063 1.14 0 2.064.925 2.064 2.065 0 1.139-.925 2.065-2.064 2.065zm1.782 13.019H3.555V9h3.564v11.452zM22.225 0H1.771C.792 0 0 .774 0 1.729v20.542C0 23.227.792 24 1.771 24h20.451C23.2 24 24 23.227 24 22.271V1.729C24 .774 23.2 0 22.222 0h.003z",
            SharePlatform::Bluesky => "M12 10.8c-1.087-2.114-4.046-6.053-6.798-7.995C2.566.944 1.561 1.266.902 1.565.139 1.908 0 3.08 0 3.768c0 .69.378 5.65.624 6.479.815 2.736 3.713 3.66 6.383 3.364.136-.02.275-.039.415-.056-.138.022-.276.04-.415.056-2.67-.296-5.568.628-6.383 3.364C.378 17.902 0 22.862 0 23.55c0 .688.139 1.86.902 2.203.659.299 1.664.621 4.3-1.239C16.046 4.747 13.087 8.686 12 10.8z",
        }
    }

    /// The platform's share-intent URL for a page.
    pub fn share_url(&self, url: &str, title: &str) -> String {
        let encoded_url = urlencoding::encode(url);
        let text = format!("Check out this article: \"{}\"", title);
        let encoded_text = urlencoding::encode(&text);

        match self {
            SharePlatform::Twitter => format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                encoded_text, encoded_url
            ),
            SharePlatform::LinkedIn => format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}",
                encoded_url
            ),
            SharePlatform::Bluesky => format!(
                "https://bsky.app/intent/compose?text={}%20{}",
                encoded_text, encoded_url
            ),
        }
    }
}

impl FromStr for SharePlatform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        SharePlatform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownPlatform(s.to_string()))
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a document click as far as sharing is concerned.
#[derive(Clone, Debug, PartialEq)]
pub enum ShareClick {
    /// Popup opened at this share URL.
    Opened(String),
    /// A share button with a platform we do not know.
    UnknownPlatform(String),
    /// The click was not inside a share button.
    Missed,
}

impl ShareClick {
    /// Whether the click landed on a share button, so the host should
    /// suppress the button's own navigation.
    pub fn handled(&self) -> bool {
        !matches!(self, ShareClick::Missed)
    }

    pub fn opened(&self) -> Option<&str> {
        match self {
            ShareClick::Opened(url) => Some(url),
            _ => None,
        }
    }
}

/// Handles clicks inside share buttons anywhere in the document.
pub struct SocialSharing<D: Dom, W: Window> {
    dom: D,
    window: W,
}

impl<D: Dom, W: Window> SocialSharing<D, W> {
    pub fn new(dom: D, window: W) -> Self {
        Self { dom, window }
    }

    /// Document click. Any click inside a share button is handled, even
    /// when its platform is unknown.
    pub fn on_click(&self, target: &D::Element) -> ShareClick {
        let Some(button) = self.dom.closest(target, SHARE_BUTTON_SELECTOR) else {
            return ShareClick::Missed;
        };
        let platform = self
            .dom
            .attribute(&button, "data-platform")
            .unwrap_or_default();
        let url = self
            .dom
            .attribute(&button, "data-url")
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.window.location());
        let title = self
            .dom
            .attribute(&button, "data-title")
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.window.document_title());

        match platform.parse::<SharePlatform>() {
            Ok(platform) => {
                let share_url = platform.share_url(&url, &title);
                self.window.open_popup(&share_url, POPUP_NAME, POPUP_FEATURES);
                ShareClick::Opened(share_url)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                ShareClick::UnknownPlatform(platform)
            }
        }
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup for the share button row of a post.
pub fn sharing_buttons_html(post_url: &str, post_title: &str) -> String {
    let url = escape_html(post_url);
    let title = escape_html(post_title);
    let mut html = String::from("<div class=\"blog-social-share\">\n");
    for platform in SharePlatform::ALL {
        html.push_str(&format!(
            "  <a href=\"#\" class=\"share-btn {name}\" data-platform=\"{name}\" \
             data-url=\"{url}\" data-title=\"{title}\" aria-label=\"{label}\">\n    \
             <svg viewBox=\"0 0 24 24\" fill=\"currentColor\"><path d=\"{path}\"/></svg>\n  </a>\n",
            name = platform.as_str(),
            url = url,
            title = title,
            label = platform.aria_label(),
            path = platform.icon_path(),
        ));
    }
    html.push_str("</div>");
    html
}
