//! Category and search filtering for the blog and project card grids.

use std::time::Duration;

use crate::host::Dom;
use crate::reveal::StaggeredReveal;

/// Which grid a [`Gallery`] drives. Only the blog grid is searchable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GalleryKind {
    Blog,
    Projects,
}

impl GalleryKind {
    fn grid_ids(self) -> &'static [&'static str] {
        match self {
            GalleryKind::Blog => &["blog-grid", "blog-posts-grid"],
            GalleryKind::Projects => &["projects-grid"],
        }
    }

    fn card_selector(self) -> &'static str {
        match self {
            GalleryKind::Blog => ".blog-card",
            GalleryKind::Projects => ".project-card",
        }
    }

    fn button_selector(self) -> &'static str {
        match self {
            GalleryKind::Blog => ".category-btn, .filter-btn",
            GalleryKind::Projects => ".project-category-btn, .filter-btn",
        }
    }
}

const SEARCH_INPUT_IDS: [&str; 2] = ["search-input", "blog-search"];
const SEARCH_BUTTON_ID: &str = "search-btn";
const NO_RESULTS_CLASS: &str = "no-results";

const NO_RESULTS_HTML: &str = r#"
<div style="text-align: center; padding: 4rem 2rem; color: var(--text-secondary);">
  <div style="font-size: 3rem; margin-bottom: 1rem;">&#128269;</div>
  <h3 style="margin-bottom: 1rem; color: var(--text-primary);">No posts found</h3>
  <p>Try adjusting your search terms or category filter.</p>
</div>
"#;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// From a button's `data-category`; missing or `all` means no filter.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("all") => CategoryFilter::All,
            Some(category) => CategoryFilter::Only(category.to_string()),
        }
    }

    pub fn admits(&self, category: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category == Some(wanted.as_str()),
        }
    }
}

/// Lower-cased trimmed search input.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Searchable text of one card, lower-cased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardText {
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub tags: String,
}

impl CardText {
    pub fn read<D: Dom>(dom: &D, card: &D::Element) -> Self {
        let text = |selector: &str| {
            dom.query_within(card, selector)
                .map(|el| dom.text_content(&el).to_lowercase())
                .unwrap_or_default()
        };
        Self {
            title: text("h2, .blog-title"),
            excerpt: text("p, .blog-excerpt"),
            category: text(".blog-category"),
            tags: dom
                .attribute(card, "data-tags")
                .map(|t| t.to_lowercase())
                .unwrap_or_default(),
        }
    }

    /// Substring match against any field; an empty query matches.
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty()
            || self.title.contains(query)
            || self.excerpt.contains(query)
            || self.category.contains(query)
            || self.tags.contains(query)
    }
}

pub struct Gallery<D: Dom> {
    dom: D,
    kind: GalleryKind,
    grid: D::Element,
    cards: Vec<D::Element>,
    buttons: Vec<D::Element>,
    search_input: Option<D::Element>,
    search_button: Option<D::Element>,
    category: CategoryFilter,
    query: String,
    stagger: Duration,
}

impl<D: Dom> Gallery<D> {
    /// `None` when the page has no grid of this kind.
    pub fn discover(dom: D, kind: GalleryKind, stagger: Duration) -> Option<Self> {
        let grid = kind.grid_ids().iter().find_map(|id| dom.element_by_id(id))?;
        let cards = dom.query_all(kind.card_selector());
        let buttons = dom.query_all(kind.button_selector());
        let (search_input, search_button) = match kind {
            GalleryKind::Blog => (
                SEARCH_INPUT_IDS.iter().find_map(|id| dom.element_by_id(id)),
                dom.element_by_id(SEARCH_BUTTON_ID),
            ),
            GalleryKind::Projects => (None, None),
        };
        tracing::debug!("{:?} gallery with {} cards", kind, cards.len());

        Some(Self {
            dom,
            kind,
            grid,
            cards,
            buttons,
            search_input,
            search_button,
            category: CategoryFilter::All,
            query: String::new(),
            stagger,
        })
    }

    pub fn kind(&self) -> GalleryKind {
        self.kind
    }

    pub fn cards(&self) -> &[D::Element] {
        &self.cards
    }

    pub fn buttons(&self) -> &[D::Element] {
        &self.buttons
    }

    pub fn search_input(&self) -> Option<&D::Element> {
        self.search_input.as_ref()
    }

    pub fn search_button(&self) -> Option<&D::Element> {
        self.search_button.as_ref()
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    /// A category button was clicked: it becomes the only active one.
    pub fn select_category(&mut self, button: &D::Element) -> StaggeredReveal<D::Element> {
        for b in &self.buttons {
            self.dom.remove_class(b, "active");
        }
        self.dom.add_class(button, "active");
        self.category = CategoryFilter::parse(self.dom.attribute(button, "data-category").as_deref());
        self.apply()
    }

    /// New search text. Ignored for non-searchable galleries.
    pub fn set_query(&mut self, raw: &str) -> StaggeredReveal<D::Element> {
        if self.kind == GalleryKind::Blog {
            self.query = normalize_query(raw);
        }
        self.apply()
    }

    /// Cards passing both the category and the search predicate.
    pub fn visible_cards(&self) -> Vec<D::Element> {
        self.cards
            .iter()
            .filter(|card| {
                self.category
                    .admits(self.dom.attribute(card, "data-category").as_deref())
            })
            .filter(|card| self.query.is_empty() || CardText::read(&self.dom, card).matches(&self.query))
            .cloned()
            .collect()
    }

    /// Hide everything, show matches, and return their reveal schedule.
    pub fn apply(&self) -> StaggeredReveal<D::Element> {
        for card in &self.cards {
            self.dom.set_style(card, "display", "none");
            self.dom.remove_class(card, "reveal");
            self.dom.remove_class(card, "active");
        }

        let visible = self.visible_cards();
        for card in &visible {
            self.dom.set_style(card, "display", "block");
        }

        if self.kind == GalleryKind::Blog {
            self.toggle_no_results(visible.is_empty());
        }

        StaggeredReveal::new(visible, self.stagger)
    }

    fn toggle_no_results(&self, empty: bool) {
        let selector = format!(".{}", NO_RESULTS_CLASS);
        let existing = self.dom.query_first(&selector);
        match (existing, empty) {
            (Some(block), true) => self.dom.set_style(&block, "display", "block"),
            (None, true) => {
                if let Some(block) =
                    self.dom
                        .append_element(&self.grid, "div", NO_RESULTS_CLASS, NO_RESULTS_HTML)
                {
                    self.dom.set_style(&block, "display", "block");
                }
            }
            (Some(block), false) => self.dom.set_style(&block, "display", "none"),
            (None, false) => {}
        }
    }
}
