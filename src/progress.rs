//! Reading progress bar for blog posts.

use crate::host::{Dom, Window};

pub const PROGRESS_BAR_ID: &str = "reading-progress";

const POST_MARKERS: [&str; 3] = [".blog-post-content", "article", ".blog-section"];

/// Percentage of the scrollable distance covered, capped at 100.
/// A page that cannot scroll reports 0.
pub fn scroll_percent(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

pub struct ReadingProgress<D: Dom, W: Window> {
    dom: D,
    window: W,
    bar: D::Element,
}

impl<D: Dom, W: Window> ReadingProgress<D, W> {
    /// `None` when the page has no progress bar.
    pub fn discover(dom: D, window: W) -> Option<Self> {
        let bar = dom.element_by_id(PROGRESS_BAR_ID)?;
        Some(Self { dom, window, bar })
    }

    pub fn is_blog_post(&self) -> bool {
        self.window.pathname().contains("_posts/")
            || POST_MARKERS
                .iter()
                .any(|selector| self.dom.query_first(selector).is_some())
            || self.dom.has_class(&self.dom.body(), "blog-post")
    }

    /// Recompute and apply; returns the shown percentage, if shown.
    pub fn update(&self) -> Option<f64> {
        if !self.is_blog_post() {
            self.dom.set_style(&self.bar, "display", "none");
            return None;
        }
        self.dom.set_style(&self.bar, "display", "block");

        let percent = scroll_percent(
            self.window.scroll_y(),
            self.window.scroll_height(),
            self.window.viewport_height(),
        );
        self.dom
            .set_style(&self.bar, "width", &format!("{}%", percent));
        if percent > 1.0 {
            self.dom.add_class(&self.bar, "visible");
        } else {
            self.dom.remove_class(&self.bar, "visible");
        }
        Some(percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_capped_and_safe_for_short_pages() {
        assert_eq!(scroll_percent(500.0, 2000.0, 1000.0), 50.0);
        assert_eq!(scroll_percent(1500.0, 2000.0, 1000.0), 100.0);
        assert_eq!(scroll_percent(0.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_percent(10.0, 500.0, 800.0), 0.0);
    }
}
