//! Browser bindings and the wasm entry point.
//!
//! `start` builds every component against the live document, wires the
//! event listeners, and parks the result in a thread-local [`Site`] so the
//! closures live as long as the page.

pub mod clipboard;
pub mod dom;
pub mod logging;
pub mod observer;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlInputElement, KeyboardEvent};

use self::clipboard::{AsyncClipboard, ExecCommandCopy};
use self::dom::{WebDom, WebStorage, WebTimers, WebWindow};
use self::observer::ObserverGuard;
use crate::clipboard::{copy_text, Clipboard, CodeCopy};
use crate::config::SiteConfig;
use crate::debounce::Debounce;
use crate::gallery::{Gallery, GalleryKind};
use crate::nav::ScrollSpyNavigator;
use crate::observe::VisibilityEntry;
use crate::progress::ReadingProgress;
use crate::reveal::ScrollReveal;
use crate::rotating::RotatingText;
use crate::share::SocialSharing;
use crate::theme::ThemeManager;

thread_local! {
    static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
}

/// An event listener, removed again on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> anyhow::Result<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("addEventListener({}) failed: {:?}", event, e))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Everything that has to stay alive while the page is open.
#[derive(Default)]
struct Site {
    listeners: Vec<Listener>,
    observers: Vec<ObserverGuard>,
    rotating: Option<Rc<RotatingText<WebDom, WebTimers>>>,
}

impl Drop for Site {
    fn drop(&mut self) {
        if let Some(rotating) = self.rotating.take() {
            rotating.stop();
        }
    }
}

impl Site {
    fn listen(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> anyhow::Result<()> {
        self.listeners.push(Listener::add(target, event, handler)?);
        Ok(())
    }
}

/// Initialize the page. `config` is a plain JS object shaped like
/// [`SiteConfig`]; `undefined` or `null` selects the defaults.
///
/// Calling it again tears down the previous wiring first.
#[wasm_bindgen]
pub fn start(config: JsValue) -> Result<(), JsValue> {
    let config: SiteConfig = if config.is_undefined() || config.is_null() {
        SiteConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid site config: {}", e)))?
    };

    logging::init(&config.log_level);

    stop();
    let site = boot(&config).map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    SITE.with(|slot| *slot.borrow_mut() = Some(site));

    tracing::info!(
        "Portfolio client v{} ({}) initialized",
        crate::version(),
        crate::git_sha()
    );
    Ok(())
}

/// Remove every listener and observer installed by [`start`].
#[wasm_bindgen]
pub fn stop() {
    if let Some(site) = SITE.with(|slot| slot.borrow_mut().take()) {
        tracing::debug!(
            "Tearing down {} listeners and {} observers",
            site.listeners.len(),
            site.observers.len()
        );
    }
}

fn boot(config: &SiteConfig) -> anyhow::Result<Site> {
    let window = web_sys::window().context("no global window")?;
    let document = window.document().context("window has no document")?;
    let dom = WebDom::new(document.clone()).context("document has no root or body yet")?;
    let web_window = WebWindow::new(window.clone(), document.clone());
    let timers = WebTimers::new(window.clone());
    let timing = &config.timing;
    let mut site = Site::default();

    // Theme
    let theme = Rc::new(RefCell::new(ThemeManager::init(
        dom.clone(),
        WebStorage::new(&window),
        &config.theme,
    )));
    let toggles = theme.borrow().toggles().to_vec();
    for toggle in toggles {
        let theme = theme.clone();
        site.listen(&toggle, "click", move |_| {
            theme.borrow_mut().toggle();
        })?;
    }
    tracing::debug!("Theme initialized: {}", theme.borrow().theme().as_str());

    // Scroll-spy navigation
    let navigator = Rc::new(RefCell::new(ScrollSpyNavigator::discover(
        dom.clone(),
        web_window.clone(),
        config.navigation.clone(),
    )));
    let controls: Vec<Element> = navigator
        .borrow()
        .groups()
        .iter()
        .flat_map(|group| group.controls.iter().cloned())
        .collect();
    for control in controls {
        let navigator = navigator.clone();
        let target = control.clone();
        site.listen(&control, "click", move |event| {
            event.prevent_default();
            navigator.borrow().on_control_activated(&target);
        })?;
    }
    wire_scroll_spy(&mut site, &navigator, &window, &timers, config)?;

    // Galleries
    for kind in [GalleryKind::Blog, GalleryKind::Projects] {
        if let Some(gallery) = Gallery::discover(dom.clone(), kind, timing.stagger()) {
            wire_gallery(&mut site, gallery, &dom, &timers, config)?;
        }
    }

    // Scroll reveal
    let reveal = Rc::new(ScrollReveal::discover(dom.clone(), &config.reveal));
    if !reveal.elements().is_empty() {
        let handler = reveal.clone();
        match observer::observe(reveal.elements(), reveal.observer_options(), move |batch| {
            handler.handle_visibility(batch);
        }) {
            Ok(guard) => site.observers.push(guard),
            Err(e) => {
                tracing::warn!("Scroll reveal observer unavailable, revealing all: {}", e);
                let all: Vec<_> = reveal
                    .elements()
                    .iter()
                    .cloned()
                    .map(|element| VisibilityEntry::new(element, true))
                    .collect();
                reveal.handle_visibility(&all);
            }
        }
    }

    // Share buttons and code copy share one document-level click listener
    let sharing = SocialSharing::new(dom.clone(), web_window.clone());
    let code_copy = CodeCopy::new(dom.clone(), timers.clone(), timing.copy_feedback());
    let primary = AsyncClipboard::detect(&window).map(Rc::new);
    let fallback = Rc::new(ExecCommandCopy::new(document.clone()));
    site.listen(&document, "click", move |event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        if sharing.on_click(&target).handled() {
            event.prevent_default();
            return;
        }
        if let Some(text) = code_copy.on_click(&target) {
            let primary = primary.clone();
            let fallback = fallback.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let clipboard = primary.as_deref().map(|c| c as &dyn Clipboard);
                copy_text(clipboard, &*fallback, &text).await;
            });
        }
    })?;

    // Reading progress
    if let Some(progress) = ReadingProgress::discover(dom.clone(), web_window.clone()) {
        progress.update();
        let debounced = Debounce::new(timers.clone(), timing.scroll_debounce(), move || {
            progress.update();
        });
        site.listen(&window, "scroll", move |_| debounced.trigger())?;
    }

    // Rotating tagline
    if let Some(rotating) = RotatingText::discover(
        dom.clone(),
        timers.clone(),
        config.taglines.clone(),
        timing.rotation(),
        timing.fade(),
    ) {
        rotating.start();
        site.rotating = Some(rotating);
    }

    // Post navigation
    crate::posts::apply_neighbours(&dom, &web_window, &config.series);
    crate::posts::render_related(&dom, &web_window, &config.related);

    let resized = Debounce::new(timers.clone(), timing.resize_debounce(), || {
        tracing::debug!("Window resized");
    });
    site.listen(&window, "resize", move |_| resized.trigger())?;

    Ok(site)
}

fn wire_scroll_spy(
    site: &mut Site,
    navigator: &Rc<RefCell<ScrollSpyNavigator<WebDom, WebWindow>>>,
    window: &web_sys::Window,
    timers: &WebTimers,
    config: &SiteConfig,
) -> anyhow::Result<()> {
    let sections: Vec<Element> = navigator
        .borrow()
        .sections()
        .iter()
        .map(|section| section.element.clone())
        .collect();
    if sections.is_empty() {
        tracing::debug!("No sections to observe");
        return Ok(());
    }

    let options = navigator.borrow().observer_options();
    let handler = navigator.clone();
    match observer::observe(&sections, options, move |batch| {
        handler.borrow_mut().handle_visibility(batch);
    }) {
        Ok(guard) => {
            site.observers.push(guard);
            return Ok(());
        }
        Err(e) => tracing::warn!("IntersectionObserver unavailable, sampling on scroll: {}", e),
    }

    let sampler = navigator.clone();
    let sample = Rc::new(Debounce::new(
        timers.clone(),
        config.timing.scroll_debounce(),
        move || {
            let batch = sampler.borrow().sample_visibility();
            sampler.borrow_mut().handle_visibility(&batch);
        },
    ));
    sample.trigger();
    site.listen(window, "scroll", move |_| sample.trigger())
}

fn wire_gallery(
    site: &mut Site,
    gallery: Gallery<WebDom>,
    dom: &WebDom,
    timers: &WebTimers,
    config: &SiteConfig,
) -> anyhow::Result<()> {
    let gallery = Rc::new(RefCell::new(gallery));
    gallery.borrow().apply().schedule(dom, timers);

    let buttons = gallery.borrow().buttons().to_vec();
    for button in buttons {
        let gallery = gallery.clone();
        let dom = dom.clone();
        let timers = timers.clone();
        let clicked = button.clone();
        site.listen(&button, "click", move |_| {
            let reveal = gallery.borrow_mut().select_category(&clicked);
            reveal.schedule(&dom, &timers);
        })?;
    }

    let input = gallery.borrow().search_input().cloned();
    let Some(input) = input else {
        return Ok(());
    };

    let search: Rc<dyn Fn()> = {
        let gallery = gallery.clone();
        let dom = dom.clone();
        let timers = timers.clone();
        let input = input.clone();
        Rc::new(move || {
            let value = input
                .dyn_ref::<HtmlInputElement>()
                .map(HtmlInputElement::value)
                .unwrap_or_default();
            let reveal = gallery.borrow_mut().set_query(&value);
            reveal.schedule(&dom, &timers);
        })
    };

    let debounced = {
        let search = search.clone();
        Debounce::new(timers.clone(), config.timing.search_debounce(), move || search())
    };
    site.listen(&input, "input", move |_| debounced.trigger())?;

    let on_enter = search.clone();
    site.listen(&input, "keypress", move |event| {
        let enter = event
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|key| key.key() == "Enter");
        if enter {
            on_enter();
        }
    })?;

    let search_button = gallery.borrow().search_button().cloned();
    if let Some(button) = search_button {
        site.listen(&button, "click", move |_| search())?;
    }
    Ok(())
}
