//! Scroll-spy navigation.
//!
//! One [`ScrollSpyNavigator`] serves every navigation surface on a page
//! (desktop bar, mobile bar, dock). Controls pointing at the same section
//! are grouped and toggled together; visibility batches from the host
//! decide which section is current; clicks scroll smoothly or leave the
//! page.

mod href;

pub use href::NavHref;

use crate::config::NavigationConfig;
use crate::host::{Dom, ScrollBehavior, Window};
use crate::observe::{Band, ObserverOptions, VisibilityEntry};

/// A single control and the target it declares.
#[derive(Clone, Debug, PartialEq)]
pub struct NavTarget<E> {
    pub href: NavHref,
    pub control: E,
}

/// All controls sharing one target, toggled in lockstep.
#[derive(Clone, Debug, PartialEq)]
pub struct NavGroup<E> {
    pub href: NavHref,
    pub controls: Vec<E>,
}

/// A watched page region.
#[derive(Clone, Debug, PartialEq)]
pub struct Section<E> {
    pub id: String,
    pub element: E,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NavigationState {
    #[default]
    NoTargetActive,
    TargetActive(String),
}

impl NavigationState {
    pub fn active(&self) -> Option<&str> {
        match self {
            NavigationState::NoTargetActive => None,
            NavigationState::TargetActive(id) => Some(id),
        }
    }
}

/// Result of a user activating a control.
#[derive(Clone, Debug, PartialEq)]
pub enum NavOutcome {
    /// Smooth scroll requested to this document offset.
    Scrolled { id: String, top: f64 },
    /// Full navigation to another page.
    External(String),
    /// Nothing to do.
    Ignored,
}

impl NavOutcome {
    /// Whether the host should suppress the control's default action.
    pub fn handled(&self) -> bool {
        !matches!(self, NavOutcome::Ignored)
    }
}

pub struct ScrollSpyNavigator<D: Dom, W: Window> {
    dom: D,
    window: W,
    config: NavigationConfig,
    groups: Vec<NavGroup<D::Element>>,
    sections: Vec<Section<D::Element>>,
    state: NavigationState,
}

impl<D: Dom, W: Window> ScrollSpyNavigator<D, W> {
    /// Build from explicit targets and sections.
    pub fn new(
        dom: D,
        window: W,
        config: NavigationConfig,
        targets: Vec<NavTarget<D::Element>>,
        sections: Vec<Section<D::Element>>,
    ) -> Self {
        let mut groups: Vec<NavGroup<D::Element>> = Vec::new();
        for target in targets {
            match groups.iter_mut().find(|g| g.href == target.href) {
                Some(group) => group.controls.push(target.control),
                None => groups.push(NavGroup {
                    href: target.href,
                    controls: vec![target.control],
                }),
            }
        }

        tracing::debug!(
            "Scroll-spy watching {} sections with {} nav groups",
            sections.len(),
            groups.len()
        );

        Self {
            dom,
            window,
            config,
            groups,
            sections,
            state: NavigationState::NoTargetActive,
        }
    }

    /// Query controls and sections once using the configured selectors.
    pub fn discover(dom: D, window: W, config: NavigationConfig) -> Self {
        let targets = dom
            .query_all(&config.controls)
            .into_iter()
            .filter(|control| !dom.has_class(control, &config.skip_class))
            .map(|control| NavTarget {
                href: NavHref::parse(dom.attribute(&control, "href").as_deref()),
                control,
            })
            .collect();

        let sections = dom
            .query_all(&config.sections)
            .into_iter()
            .filter_map(|element| {
                let id = dom.attribute(&element, "id").filter(|id| !id.is_empty())?;
                Some(Section { id, element })
            })
            .collect();

        Self::new(dom, window, config, targets, sections)
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn active(&self) -> Option<&str> {
        self.state.active()
    }

    pub fn groups(&self) -> &[NavGroup<D::Element>] {
        &self.groups
    }

    pub fn sections(&self) -> &[Section<D::Element>] {
        &self.sections
    }

    /// Options the host should register each section with.
    pub fn observer_options(&self) -> ObserverOptions {
        self.config.observer_options()
    }

    /// Make `id` the single active target and mirror it onto every control.
    pub fn activate_target(&mut self, id: &str) {
        if self.state.active() != Some(id) {
            tracing::debug!("Active section: {}", id);
        }
        self.state = NavigationState::TargetActive(id.to_string());

        let class = &self.config.active_class;
        for group in &self.groups {
            let selected = group.href.section_id() == Some(id);
            for control in &group.controls {
                if selected {
                    self.dom.add_class(control, class);
                } else {
                    self.dom.remove_class(control, class);
                }
            }
        }
    }

    /// Follow `href` the way a click on a control carrying it would.
    pub fn navigate_to(&self, href: &NavHref) -> NavOutcome {
        match href {
            NavHref::Section(id) => {
                let element = self
                    .sections
                    .iter()
                    .find(|s| &s.id == id)
                    .map(|s| s.element.clone())
                    .or_else(|| self.dom.element_by_id(id));
                let Some(element) = element else {
                    tracing::trace!("No section #{} on this page", id);
                    return NavOutcome::Ignored;
                };
                let top = self.dom.document_top(&element) - self.config.header_offset_px;
                self.window.scroll_to(top, ScrollBehavior::Smooth);
                NavOutcome::Scrolled {
                    id: id.clone(),
                    top,
                }
            }
            NavHref::External(target) => {
                let url = href::resolve_external(&self.window.location(), target);
                tracing::debug!("Leaving page for {}", url);
                self.window.navigate(&url);
                NavOutcome::External(url)
            }
            NavHref::Inert => NavOutcome::Ignored,
        }
    }

    /// Click handler entry point for one of the discovered controls.
    pub fn on_control_activated(&self, control: &D::Element) -> NavOutcome {
        let href = NavHref::parse(self.dom.attribute(control, "href").as_deref());
        self.navigate_to(&href)
    }

    /// React to one observer batch; the last intersecting entry wins.
    pub fn handle_visibility(&mut self, batch: &[VisibilityEntry<D::Element>]) -> Option<&str> {
        for entry in batch.iter().filter(|e| e.is_intersecting) {
            let id = self
                .sections
                .iter()
                .find(|s| s.element == entry.target)
                .map(|s| s.id.clone())
                .or_else(|| self.dom.attribute(&entry.target, "id"));
            if let Some(id) = id {
                self.activate_target(&id);
            }
        }
        self.active()
    }

    /// Build a batch from layout, for hosts without a native observer.
    pub fn sample_visibility(&self) -> Vec<VisibilityEntry<D::Element>> {
        let band = Band::from_viewport(
            self.window.scroll_y(),
            self.window.viewport_height(),
            &self.config.root_margin,
        );
        self.sections
            .iter()
            .map(|s| {
                let top = self.dom.document_top(&s.element);
                let height = self.dom.height(&s.element);
                VisibilityEntry::new(
                    s.element.clone(),
                    band.qualifies(top, height, self.config.threshold),
                )
            })
            .collect()
    }
}
