//! Peripheral page behaviour driven through the in-memory host.

use std::time::Duration;

use portfolio_client::clipboard::{copy_text, CodeCopy, CopyOutcome, FallbackCopy, COPIED_LABEL};
use portfolio_client::config::{PostEntry, RevealConfig, ThemeConfig};
use portfolio_client::gallery::{CategoryFilter, Gallery, GalleryKind};
use portfolio_client::host::memory::{ManualTimers, MemoryDom, MemoryStorage, MemoryWindow, NodeId};
use portfolio_client::host::{Dom, Storage};
use portfolio_client::observe::VisibilityEntry;
use portfolio_client::posts::{apply_neighbours, render_related};
use portfolio_client::progress::ReadingProgress;
use portfolio_client::reveal::ScrollReveal;
use portfolio_client::rotating::RotatingText;
use portfolio_client::share::{ShareClick, SocialSharing, POPUP_FEATURES, POPUP_NAME};
use portfolio_client::theme::{Theme, ThemeManager};
use portfolio_client::Error;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

// ============ Theme ============

fn theme_toggle(dom: &MemoryDom, id: &str) -> (NodeId, NodeId) {
    let toggle = dom.add_with(&dom.body(), "button", &[("id", id)]);
    let sun = dom.add_with(&toggle, "span", &[("class", "sun-icon")]);
    let moon = dom.add_with(&toggle, "span", &[("class", "moon-icon")]);
    (sun, moon)
}

#[test]
fn theme_defaults_to_dark_and_persists_toggles() {
    let dom = MemoryDom::new();
    let (sun, moon) = theme_toggle(&dom, "theme-toggle");
    let (mobile_sun, _) = theme_toggle(&dom, "mobile-theme-toggle");
    let storage = MemoryStorage::new();

    let mut theme = ThemeManager::init(dom.clone(), storage.clone(), &ThemeConfig::default());
    assert_eq!(theme.theme(), Theme::Dark);
    assert_eq!(theme.toggles().len(), 2);
    assert_eq!(dom.attribute(&dom.root(), "data-theme").as_deref(), Some("dark"));
    assert_eq!(dom.style(&sun, "opacity").as_deref(), Some("0"));
    assert_eq!(dom.style(&moon, "opacity").as_deref(), Some("1"));

    assert_eq!(theme.toggle(), Theme::Light);
    assert_eq!(dom.attribute(&dom.root(), "data-theme").as_deref(), Some("light"));
    assert_eq!(storage.get("theme").as_deref(), Some("light"));
    assert_eq!(dom.style(&mobile_sun, "opacity").as_deref(), Some("1"));

    // A fresh page load picks the stored value up.
    let reloaded = ThemeManager::init(dom.clone(), storage, &ThemeConfig::default());
    assert_eq!(reloaded.theme(), Theme::Light);
}

#[test]
fn theme_still_applies_when_storage_rejects_writes() {
    let dom = MemoryDom::new();
    let storage = MemoryStorage::new();
    storage.reject_writes(true);

    let mut theme = ThemeManager::init(dom.clone(), storage.clone(), &ThemeConfig::default());
    theme.toggle();

    assert_eq!(theme.theme(), Theme::Light);
    assert_eq!(dom.attribute(&dom.root(), "data-theme").as_deref(), Some("light"));
    assert_eq!(storage.get("theme"), None);
    assert!(matches!(
        storage.set("theme", "dark"),
        Err(Error::Storage { key, .. }) if key == "theme"
    ));
}

// ============ Galleries ============

fn blog_card(dom: &MemoryDom, grid: &NodeId, category: &str, title: &str, tags: &str) -> NodeId {
    let card = dom.add_with(
        grid,
        "article",
        &[
            ("class", "blog-card"),
            ("data-category", category),
            ("data-tags", tags),
        ],
    );
    let heading = dom.add(&card, "h2");
    dom.set_text_content(&heading, title);
    let excerpt = dom.add(&card, "p");
    dom.set_text_content(&excerpt, "Notes from the lab.");
    let label = dom.add_with(&card, "span", &[("class", "blog-category")]);
    dom.set_text_content(&label, category);
    card
}

struct Blog {
    dom: MemoryDom,
    all: NodeId,
    malware: NodeId,
    cards: Vec<NodeId>,
}

fn blog_page() -> Blog {
    let dom = MemoryDom::new();
    let body = dom.body();
    let filters = dom.add_with(&body, "div", &[("class", "blog-filters")]);
    let all = dom.add_with(
        &filters,
        "button",
        &[("class", "category-btn active"), ("data-category", "all")],
    );
    let malware = dom.add_with(
        &filters,
        "button",
        &[("class", "category-btn"), ("data-category", "malware")],
    );
    dom.add_with(&body, "input", &[("id", "search-input")]);

    let grid = dom.add_with(&body, "div", &[("id", "blog-grid")]);
    let cards = vec![
        blog_card(&dom, &grid, "cybersecurity", "Zero-Day Detection", "ids,zeek"),
        blog_card(&dom, &grid, "malware", "Ransomware Analysis", "ida,ghidra"),
        blog_card(&dom, &grid, "malware", "Packing Tricks", "upx"),
    ];
    Blog {
        dom,
        all,
        malware,
        cards,
    }
}

fn displayed(dom: &MemoryDom, cards: &[NodeId]) -> Vec<bool> {
    cards
        .iter()
        .map(|c| dom.style(c, "display").as_deref() == Some("block"))
        .collect()
}

#[test]
fn category_button_filters_and_staggers_the_reveal() {
    let blog = blog_page();
    let dom = &blog.dom;
    let timers = ManualTimers::new();
    let mut gallery = Gallery::discover(dom.clone(), GalleryKind::Blog, ms(100)).unwrap();
    assert!(gallery.search_input().is_some());

    let reveal = gallery.select_category(&blog.malware);
    assert_eq!(gallery.category(), &CategoryFilter::Only("malware".into()));
    assert!(dom.has_class(&blog.malware, "active"));
    assert!(!dom.has_class(&blog.all, "active"));
    assert_eq!(displayed(dom, &blog.cards), vec![false, true, true]);
    assert_eq!(
        reveal.steps,
        vec![(blog.cards[1], ms(0)), (blog.cards[2], ms(100))]
    );

    reveal.schedule(dom, &timers);
    timers.advance(ms(0));
    assert!(dom.has_class(&blog.cards[1], "reveal"));
    assert!(!dom.has_class(&blog.cards[2], "reveal"));
    timers.advance(ms(100));
    assert!(dom.has_class(&blog.cards[2], "active"));

    gallery.select_category(&blog.all);
    assert_eq!(displayed(dom, &blog.cards), vec![true, true, true]);
    // Re-filtering strips the reveal classes until the new stagger runs.
    assert!(!dom.has_class(&blog.cards[1], "reveal"));
}

#[test]
fn search_matches_any_field_and_toggles_no_results() {
    let blog = blog_page();
    let dom = &blog.dom;
    let mut gallery = Gallery::discover(dom.clone(), GalleryKind::Blog, ms(100)).unwrap();

    gallery.set_query("  GHIDRA ");
    assert_eq!(displayed(dom, &blog.cards), vec![false, true, false]);

    gallery.set_query("cybersecurity");
    assert_eq!(displayed(dom, &blog.cards), vec![true, false, false]);

    // Category and search combine.
    gallery.select_category(&blog.malware);
    assert_eq!(displayed(dom, &blog.cards), vec![false, false, false]);
    let block = dom.query_first(".no-results").unwrap();
    assert_eq!(dom.style(&block, "display").as_deref(), Some("block"));
    assert!(dom.inner_html(&block).contains("No posts found"));

    gallery.set_query("");
    assert_eq!(displayed(dom, &blog.cards), vec![false, true, true]);
    assert_eq!(dom.style(&block, "display").as_deref(), Some("none"));

    // The block is created once, inside the grid.
    gallery.set_query("nothing matches this");
    assert_eq!(dom.query_all(".no-results").len(), 1);
    assert_eq!(dom.query_all("#blog-grid .no-results").len(), 1);
}

#[test]
fn project_gallery_ignores_search() {
    let dom = MemoryDom::new();
    let body = dom.body();
    let button = dom.add_with(
        &body,
        "button",
        &[("class", "project-category-btn"), ("data-category", "tools")],
    );
    let grid = dom.add_with(&body, "div", &[("id", "projects-grid")]);
    let tool = dom.add_with(&grid, "div", &[("class", "project-card"), ("data-category", "tools")]);
    let research = dom.add_with(
        &grid,
        "div",
        &[("class", "project-card"), ("data-category", "research")],
    );

    let mut gallery = Gallery::discover(dom.clone(), GalleryKind::Projects, ms(100)).unwrap();
    assert!(gallery.search_input().is_none());
    gallery.set_query("zzz");
    assert_eq!(displayed(&dom, &[tool, research]), vec![true, true]);

    gallery.select_category(&button);
    assert_eq!(displayed(&dom, &[tool, research]), vec![true, false]);
    assert!(dom.query_first(".no-results").is_none());
}

#[test]
fn gallery_needs_a_grid() {
    let dom = MemoryDom::new();
    dom.add_with(&dom.body(), "div", &[("class", "blog-card")]);
    assert!(Gallery::discover(dom, GalleryKind::Blog, ms(100)).is_none());
}

// ============ Scroll reveal ============

#[test]
fn scroll_reveal_is_one_way() {
    let dom = MemoryDom::new();
    let badge = dom.add_with(&dom.body(), "div", &[("class", "hero-badge")]);
    let skill = dom.add_with(&dom.body(), "div", &[("class", "skill-item")]);
    dom.add_with(&dom.body(), "div", &[("class", "unrelated")]);

    let reveal = ScrollReveal::discover(dom.clone(), &RevealConfig::default());
    assert_eq!(reveal.elements(), &[badge, skill]);
    assert_eq!(reveal.observer_options().threshold, 0.1);

    let revealed = reveal.handle_visibility(&[
        VisibilityEntry::new(badge, true),
        VisibilityEntry::new(skill, false),
    ]);
    assert_eq!(revealed, 1);
    assert!(dom.has_class(&badge, "reveal") && dom.has_class(&badge, "active"));
    assert!(!dom.has_class(&skill, "reveal"));

    reveal.handle_visibility(&[VisibilityEntry::new(badge, false)]);
    assert!(dom.has_class(&badge, "reveal"));
}

// ============ Sharing ============

#[test]
fn share_click_opens_a_popup_for_the_page() {
    let dom = MemoryDom::new();
    let window = MemoryWindow::new("https://portfolio.example/_posts/malware/ransomware.html");
    window.set_title("Ransomware Analysis");
    let button = dom.add_with(
        &dom.body(),
        "a",
        &[("class", "share-btn linkedin"), ("data-platform", "linkedin")],
    );
    let icon = dom.add(&button, "svg");

    let sharing = SocialSharing::new(dom.clone(), window.clone());
    let click = sharing.on_click(&icon);
    assert!(click.handled());
    let opened = click.opened().unwrap().to_string();

    assert_eq!(
        opened,
        "https://www.linkedin.com/sharing/share-offsite/?url=\
         https%3A%2F%2Fportfolio.example%2F_posts%2Fmalware%2Fransomware.html"
    );
    assert_eq!(
        window.popups(),
        vec![(opened, POPUP_NAME.to_string(), POPUP_FEATURES.to_string())]
    );
}

#[test]
fn share_button_attributes_override_the_page() {
    let dom = MemoryDom::new();
    let window = MemoryWindow::new("https://portfolio.example/blog.html");
    let button = dom.add_with(
        &dom.body(),
        "a",
        &[
            ("class", "share-btn"),
            ("data-platform", "twitter"),
            ("data-url", "https://portfolio.example/post"),
            ("data-title", "Hi"),
        ],
    );
    let outside = dom.add(&dom.body(), "p");

    let sharing = SocialSharing::new(dom.clone(), window.clone());
    assert_eq!(
        sharing.on_click(&button).opened(),
        Some(
            "https://twitter.com/intent/tweet?text=Check%20out%20this%20article%3A%20%22Hi%22\
             &url=https%3A%2F%2Fportfolio.example%2Fpost"
        )
    );
    assert_eq!(sharing.on_click(&outside), ShareClick::Missed);
    assert!(!sharing.on_click(&outside).handled());
    assert_eq!(window.popups().len(), 1);
}

#[test]
fn unknown_platform_click_is_still_handled() {
    let dom = MemoryDom::new();
    let window = MemoryWindow::new("https://portfolio.example/_posts/malware/ransomware.html");
    let button = dom.add_with(
        &dom.body(),
        "a",
        &[("class", "share-btn"), ("href", "#"), ("data-platform", "myspace")],
    );
    let label = dom.add(&button, "span");

    let sharing = SocialSharing::new(dom.clone(), window.clone());
    let click = sharing.on_click(&label);

    assert_eq!(click, ShareClick::UnknownPlatform("myspace".into()));
    assert!(click.handled());
    assert_eq!(click.opened(), None);
    assert!(window.popups().is_empty());
    assert!(window.navigations().is_empty());
}

// ============ Code copy ============

struct FailingFallback;

impl FallbackCopy for FailingFallback {
    fn copy(&self, _text: &str) -> portfolio_client::Result<()> {
        Err(Error::Clipboard("execCommand unsupported".into()))
    }
}

#[test]
fn copy_button_shows_feedback_then_restores() {
    let dom = MemoryDom::new();
    let pre = dom.add(&dom.body(), "pre");
    let code = dom.add(&pre, "code");
    dom.set_text_content(&code, "cargo build --release");
    let button = dom.add_with(&pre, "button", &[("class", "copy-to-clipboard-button")]);
    dom.set_text_content(&button, "Copy");
    let timers = ManualTimers::new();

    let copy = CodeCopy::new(dom.clone(), timers.clone(), ms(2000));
    assert_eq!(copy.on_click(&button).as_deref(), Some("cargo build --release"));
    assert_eq!(dom.text_content(&button), COPIED_LABEL);

    timers.advance(ms(1999));
    assert_eq!(dom.text_content(&button), COPIED_LABEL);
    timers.advance(ms(1));
    assert_eq!(dom.text_content(&button), "Copy");

    assert_eq!(copy.on_click(&code), None);
}

#[test]
fn copy_with_nothing_working_reports_failure() {
    let outcome = tokio_test::block_on(copy_text(None, &FailingFallback, "text"));
    assert_eq!(outcome, CopyOutcome::Failed);
}

// ============ Reading progress ============

#[test]
fn reading_progress_tracks_post_pages() {
    let dom = MemoryDom::new();
    let bar = dom.add_with(&dom.body(), "div", &[("id", "reading-progress")]);
    let window = MemoryWindow::new("https://portfolio.example/_posts/malware/ransomware.html");
    window.set_metrics(600.0, 800.0, 2000.0);

    let progress = ReadingProgress::discover(dom.clone(), window.clone()).unwrap();
    assert_eq!(progress.update(), Some(50.0));
    assert_eq!(dom.style(&bar, "width").as_deref(), Some("50%"));
    assert_eq!(dom.style(&bar, "display").as_deref(), Some("block"));
    assert!(dom.has_class(&bar, "visible"));

    window.set_metrics(5.0, 800.0, 2000.0);
    progress.update();
    assert!(!dom.has_class(&bar, "visible"));

    // A page that cannot scroll sits at zero.
    window.set_metrics(0.0, 800.0, 800.0);
    assert_eq!(progress.update(), Some(0.0));
}

#[test]
fn reading_progress_hides_outside_posts() {
    let dom = MemoryDom::new();
    let bar = dom.add_with(&dom.body(), "div", &[("id", "reading-progress")]);
    let window = MemoryWindow::new("https://portfolio.example/index.html");

    let progress = ReadingProgress::discover(dom.clone(), window).unwrap();
    assert_eq!(progress.update(), None);
    assert_eq!(dom.style(&bar, "display").as_deref(), Some("none"));

    dom.add(&dom.body(), "article");
    assert!(progress.is_blog_post());
}

// ============ Rotating text ============

#[test]
fn tagline_fades_and_rotates() {
    let dom = MemoryDom::new();
    let text = dom.add_with(&dom.body(), "span", &[("id", "rotating-text")]);
    dom.set_text_content(&text, "first");
    let timers = ManualTimers::new();

    let rotating = RotatingText::discover(
        dom.clone(),
        timers.clone(),
        vec!["first".into(), "second".into()],
        ms(4000),
        ms(400),
    )
    .unwrap();
    rotating.start();

    timers.advance(ms(4000));
    assert!(dom.has_class(&text, "fade-out"));
    assert_eq!(dom.text_content(&text), "first");

    timers.advance(ms(400));
    assert!(!dom.has_class(&text, "fade-out"));
    assert_eq!(dom.text_content(&text), "second");

    timers.advance(ms(4000));
    assert_eq!(dom.text_content(&text), "first");
}

// ============ Post navigation ============

fn post(title: &str, url: &str, category: &str) -> PostEntry {
    PostEntry {
        title: title.into(),
        url: url.into(),
        category: category.into(),
        date: None,
        excerpt: Some(format!("About {}", title)),
    }
}

#[test]
fn post_page_gets_neighbour_links() {
    let dom = MemoryDom::new();
    let prev = dom.add_with(&dom.body(), "a", &[("id", "prev-post-link")]);
    let next = dom.add_with(&dom.body(), "a", &[("id", "next-post-link")]);
    let series = vec![
        post("Zero-Day", "zero-day-detection.html", "cybersecurity"),
        post("ML Threats", "ml-threat-detection.html", "cybersecurity"),
    ];

    let window = MemoryWindow::new("https://portfolio.example/_posts/cybersecurity/ml-threat-detection.html");
    assert!(apply_neighbours(&dom, &window, &series));
    assert_eq!(dom.attribute(&prev, "href").as_deref(), Some("zero-day-detection.html"));
    assert_eq!(dom.attribute(&prev, "title").as_deref(), Some("Zero-Day"));
    assert_eq!(dom.style(&prev, "display").as_deref(), Some("inline-flex"));
    assert_eq!(dom.style(&next, "display").as_deref(), Some("none"));

    let elsewhere = MemoryWindow::new("https://portfolio.example/blog.html");
    assert!(!apply_neighbours(&dom, &elsewhere, &series));
}

#[test]
fn related_posts_render_escaped_into_main() {
    let dom = MemoryDom::new();
    dom.add(&dom.body(), "main");
    let catalog = vec![
        post("Fuzzing <libpng>", "fuzz.html", "research"),
        post("Zeek Rules", "zeek.html", "cybersecurity"),
        post("Sigma & YARA", "sigma.html", "cybersecurity"),
        post("Extra", "extra.html", "cybersecurity"),
    ];
    let window = MemoryWindow::new("https://portfolio.example/_posts/cybersecurity/zero-day.html");

    let block = render_related(&dom, &window, &catalog).unwrap();
    assert_eq!(dom.query_all("main .related-posts"), vec![block]);
    let html = dom.inner_html(&block);
    assert_eq!(html.matches("related-post-card").count(), 3);
    assert!(html.contains("Sigma &amp; YARA"));
    assert!(html.contains("Fuzzing &lt;libpng&gt;"));
    assert!(!html.contains("Extra"));

    let elsewhere = MemoryWindow::new("https://portfolio.example/index.html");
    assert!(render_related(&dom, &elsewhere, &catalog).is_none());
}
