//! Previous/next links and the related-posts block on blog post pages.

use crate::config::PostEntry;
use crate::host::{Dom, Window};
use crate::share::escape_html;

pub const POSTS_PATH_MARKER: &str = "_posts/";
pub const PREV_LINK_ID: &str = "prev-post-link";
pub const NEXT_LINK_ID: &str = "next-post-link";
const DEFAULT_CATEGORY: &str = "cybersecurity";
const SAME_CATEGORY_LIMIT: usize = 2;
const OTHER_CATEGORY_LIMIT: usize = 1;
const RELATED_LIMIT: usize = 3;

pub fn is_post_path(pathname: &str) -> bool {
    pathname.contains(POSTS_PATH_MARKER)
}

/// Neighbours of the current page within an ordered series.
#[derive(Debug, PartialEq)]
pub struct Neighbours<'a> {
    pub previous: Option<&'a PostEntry>,
    pub next: Option<&'a PostEntry>,
}

/// Locate `pathname`'s file in `series`. `None` when it is not listed.
pub fn neighbours<'a>(series: &'a [PostEntry], pathname: &str) -> Option<Neighbours<'a>> {
    let file = pathname.rsplit('/').next().unwrap_or_default();
    if file.is_empty() {
        return None;
    }
    let index = series.iter().position(|post| post.url.contains(file))?;
    Some(Neighbours {
        previous: index.checked_sub(1).and_then(|i| series.get(i)),
        next: series.get(index + 1),
    })
}

/// The directory a post lives in names its category.
pub fn category_from_path(pathname: &str) -> &str {
    let parts: Vec<&str> = pathname.split('/').collect();
    parts
        .len()
        .checked_sub(2)
        .and_then(|i| parts.get(i))
        .copied()
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Up to two posts sharing `category`, then one from elsewhere.
pub fn related<'a>(catalog: &'a [PostEntry], category: &str) -> Vec<&'a PostEntry> {
    let same = catalog
        .iter()
        .filter(|p| p.category == category)
        .take(SAME_CATEGORY_LIMIT);
    let other = catalog
        .iter()
        .filter(|p| p.category != category)
        .take(OTHER_CATEGORY_LIMIT);
    same.chain(other).take(RELATED_LIMIT).collect()
}

pub fn related_html(posts: &[&PostEntry]) -> String {
    let mut html = String::from("<h3>Related Posts</h3>\n<div class=\"related-posts-grid\">\n");
    for post in posts {
        let category = escape_html(&post.category);
        html.push_str(&format!(
            "  <div class=\"related-post-card\">\n    \
             <span class=\"blog-category {category}\">{category}</span>\n    \
             <h4>{title}</h4>\n    <p>{excerpt}</p>\n    \
             <a href=\"{url}\" class=\"blog-link\">Read more</a>\n  </div>\n",
            category = category,
            title = escape_html(&post.title),
            excerpt = escape_html(post.excerpt.as_deref().unwrap_or_default()),
            url = escape_html(&post.url),
        ));
    }
    html.push_str("</div>");
    html
}

/// Fill in the previous/next links of a post page.
pub fn apply_neighbours<D: Dom, W: Window>(dom: &D, window: &W, series: &[PostEntry]) -> bool {
    let pathname = window.pathname();
    if !is_post_path(&pathname) {
        return false;
    }
    let Some(found) = neighbours(series, &pathname) else {
        return false;
    };

    for (id, post) in [(PREV_LINK_ID, found.previous), (NEXT_LINK_ID, found.next)] {
        let Some(link) = dom.element_by_id(id) else {
            continue;
        };
        match post {
            Some(post) => {
                dom.set_attribute(&link, "href", &post.url);
                dom.set_attribute(&link, "title", &post.title);
                dom.set_style(&link, "display", "inline-flex");
            }
            None => dom.set_style(&link, "display", "none"),
        }
    }
    true
}

/// Append the related-posts block to `main` (or the body).
pub fn render_related<D: Dom, W: Window>(
    dom: &D,
    window: &W,
    catalog: &[PostEntry],
) -> Option<D::Element> {
    let pathname = window.pathname();
    if !is_post_path(&pathname) {
        return None;
    }
    let posts = related(catalog, category_from_path(&pathname));
    if posts.is_empty() {
        return None;
    }
    let container = dom.query_first("main").unwrap_or_else(|| dom.body());
    dom.append_element(&container, "div", "related-posts", &related_html(&posts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, url: &str, category: &str) -> PostEntry {
        PostEntry {
            title: title.into(),
            url: url.into(),
            category: category.into(),
            date: None,
            excerpt: None,
        }
    }

    fn series() -> Vec<PostEntry> {
        vec![
            post("Zero-Day", "zero-day-detection.html", "cybersecurity"),
            post("ML Threats", "ml-threat-detection.html", "cybersecurity"),
            post("Ransomware", "../malware/ransomware-analysis.html", "malware"),
        ]
    }

    #[test]
    fn neighbours_at_edges_and_middle() {
        let series = series();
        let first = neighbours(&series, "/_posts/cybersecurity/zero-day-detection.html").unwrap();
        assert_eq!(first.previous, None);
        assert_eq!(first.next.map(|p| p.title.as_str()), Some("ML Threats"));

        let last = neighbours(&series, "/_posts/malware/ransomware-analysis.html").unwrap();
        assert_eq!(last.previous.map(|p| p.title.as_str()), Some("ML Threats"));
        assert_eq!(last.next, None);

        assert!(neighbours(&series, "/_posts/cybersecurity/").is_none());
        assert!(neighbours(&series, "/_posts/unknown.html").is_none());
    }

    #[test]
    fn category_comes_from_parent_directory() {
        assert_eq!(category_from_path("/_posts/malware/x.html"), "malware");
        assert_eq!(category_from_path("x.html"), "cybersecurity");
        assert_eq!(category_from_path("/x.html"), "cybersecurity");
    }

    #[test]
    fn related_prefers_same_category_then_one_other() {
        let catalog = vec![
            post("A", "a", "engineering"),
            post("B", "b", "cybersecurity"),
            post("C", "c", "cybersecurity"),
            post("D", "d", "cybersecurity"),
            post("E", "e", "malware"),
        ];
        let picked: Vec<_> = related(&catalog, "cybersecurity")
            .into_iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(picked, vec!["B", "C", "A"]);

        let picked: Vec<_> = related(&catalog, "nothing")
            .into_iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(picked, vec!["A"]);
    }
}
