//! In-process host: a small element tree, a recording window, map-backed
//! storage and virtual-time timers.
//!
//! Only compiled for tests and the `test-util` feature, which the
//! integration tests turn on through the crate's own dev-dependency.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use super::selector::{Ancestry, SelectorList};
use super::{Dom, ScrollBehavior, Storage, Timers, Window};
use crate::error::{Error, Result};

/// Handle to a node in a [`MemoryDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    inner_html: String,
    parent: Option<usize>,
    children: Vec<usize>,
    top: f64,
    height: f64,
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn push(&mut self, parent: Option<usize>, tag: &str) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            tag: tag.to_string(),
            parent,
            ..Node::default()
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    /// Every attached node below `from`, in document order.
    fn descendants(&self, from: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[from].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node].children.iter().rev().copied());
        }
        out
    }

    fn text_of(&self, node: usize, out: &mut String) {
        out.push_str(&self.nodes[node].text);
        for &child in &self.nodes[node].children {
            self.text_of(child, out);
        }
    }
}

impl Ancestry for Tree {
    fn tag(&self, node: usize) -> &str {
        &self.nodes[node].tag
    }

    fn attribute(&self, node: usize, name: &str) -> Option<&str> {
        self.nodes[node].attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, node: usize, class: &str) -> bool {
        self.nodes[node]
            .attrs
            .get("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }
}

const ROOT: usize = 0;
const BODY: usize = 1;

/// Shared, mutable element tree rooted at `<html><body>`.
#[derive(Clone, Debug)]
pub struct MemoryDom {
    tree: Rc<RefCell<Tree>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        tree.push(None, "html");
        tree.push(Some(ROOT), "body");
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    /// Append an empty `<tag>` under `parent`.
    pub fn add(&self, parent: &NodeId, tag: &str) -> NodeId {
        NodeId(self.tree.borrow_mut().push(Some(parent.0), tag))
    }

    /// Append `<tag>` under `parent` with the given attributes.
    pub fn add_with(&self, parent: &NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = self.add(parent, tag);
        for (name, value) in attrs {
            self.set_attribute(&node, name, value);
        }
        node
    }

    pub fn set_layout(&self, element: &NodeId, top: f64, height: f64) {
        let mut tree = self.tree.borrow_mut();
        let node = &mut tree.nodes[element.0];
        node.top = top;
        node.height = height;
    }

    pub fn style(&self, element: &NodeId, property: &str) -> Option<String> {
        self.tree.borrow().nodes[element.0].style.get(property).cloned()
    }

    pub fn inner_html(&self, element: &NodeId) -> String {
        self.tree.borrow().nodes[element.0].inner_html.clone()
    }

    fn matching(&self, from: usize, selector: &str) -> Vec<NodeId> {
        let Some(list) = SelectorList::parse(selector) else {
            tracing::debug!("unsupported selector {:?}", selector);
            return Vec::new();
        };
        let tree = self.tree.borrow();
        let found = tree
            .descendants(from)
            .into_iter()
            .filter(|&node| list.matches(&*tree, node))
            .map(NodeId)
            .collect();
        found
    }
}

impl Dom for MemoryDom {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let found = tree
            .descendants(ROOT)
            .into_iter()
            .find(|&node| tree.attribute(node, "id") == Some(id));
        found.map(NodeId)
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.matching(ROOT, selector)
    }

    fn query_within(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.matching(scope.0, selector).into_iter().next()
    }

    fn closest(&self, element: &NodeId, selector: &str) -> Option<NodeId> {
        let list = SelectorList::parse(selector)?;
        let tree = self.tree.borrow();
        let mut cursor = Some(element.0);
        while let Some(node) = cursor {
            if list.matches(&*tree, node) {
                return Some(NodeId(node));
            }
            cursor = tree.parent(node);
        }
        None
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.tree.borrow().attribute(element.0, name).map(str::to_string)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        self.tree.borrow_mut().nodes[element.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn add_class(&self, element: &NodeId, class: &str) {
        if self.has_class(element, class) {
            return;
        }
        let mut tree = self.tree.borrow_mut();
        let list = tree.nodes[element.0].attrs.entry("class".into()).or_default();
        if !list.is_empty() {
            list.push(' ');
        }
        list.push_str(class);
    }

    fn remove_class(&self, element: &NodeId, class: &str) {
        let mut tree = self.tree.borrow_mut();
        if let Some(list) = tree.nodes[element.0].attrs.get_mut("class") {
            let kept = list
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
            *list = kept;
        }
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.tree.borrow().has_class(element.0, class)
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) {
        self.tree.borrow_mut().nodes[element.0]
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn text_content(&self, element: &NodeId) -> String {
        let mut out = String::new();
        self.tree.borrow().text_of(element.0, &mut out);
        out
    }

    fn set_text_content(&self, element: &NodeId, text: &str) {
        let mut tree = self.tree.borrow_mut();
        let children = std::mem::take(&mut tree.nodes[element.0].children);
        for child in children {
            tree.nodes[child].parent = None;
        }
        tree.nodes[element.0].text = text.to_string();
    }

    fn document_top(&self, element: &NodeId) -> f64 {
        self.tree.borrow().nodes[element.0].top
    }

    fn height(&self, element: &NodeId) -> f64 {
        self.tree.borrow().nodes[element.0].height
    }

    fn root(&self) -> NodeId {
        NodeId(ROOT)
    }

    fn body(&self) -> NodeId {
        NodeId(BODY)
    }

    fn append_element(
        &self,
        parent: &NodeId,
        tag: &str,
        class: &str,
        inner_html: &str,
    ) -> Option<NodeId> {
        let node = self.add_with(parent, tag, &[("class", class)]);
        self.tree.borrow_mut().nodes[node.0].inner_html = inner_html.to_string();
        Some(node)
    }
}

#[derive(Debug)]
struct WindowState {
    location: String,
    title: String,
    scroll_y: f64,
    viewport_height: f64,
    scroll_height: f64,
    scrolls: Vec<(f64, ScrollBehavior)>,
    navigations: Vec<String>,
    popups: Vec<(String, String, String)>,
}

/// Window that records every scroll, navigation and popup request.
#[derive(Clone, Debug)]
pub struct MemoryWindow {
    state: Rc<RefCell<WindowState>>,
}

impl MemoryWindow {
    pub fn new(location: &str) -> Self {
        Self {
            state: Rc::new(RefCell::new(WindowState {
                location: location.to_string(),
                title: String::new(),
                scroll_y: 0.0,
                viewport_height: 800.0,
                scroll_height: 800.0,
                scrolls: Vec::new(),
                navigations: Vec::new(),
                popups: Vec::new(),
            })),
        }
    }

    pub fn set_title(&self, title: &str) {
        self.state.borrow_mut().title = title.to_string();
    }

    pub fn set_metrics(&self, scroll_y: f64, viewport_height: f64, scroll_height: f64) {
        let mut state = self.state.borrow_mut();
        state.scroll_y = scroll_y;
        state.viewport_height = viewport_height;
        state.scroll_height = scroll_height;
    }

    pub fn scrolls(&self) -> Vec<(f64, ScrollBehavior)> {
        self.state.borrow().scrolls.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.borrow().navigations.clone()
    }

    pub fn popups(&self) -> Vec<(String, String, String)> {
        self.state.borrow().popups.clone()
    }
}

impl Window for MemoryWindow {
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        self.state.borrow_mut().scrolls.push((top, behavior));
    }

    fn navigate(&self, url: &str) {
        let mut state = self.state.borrow_mut();
        state.navigations.push(url.to_string());
        state.location = url.to_string();
    }

    fn location(&self) -> String {
        self.state.borrow().location.clone()
    }

    fn pathname(&self) -> String {
        let location = self.location();
        match url::Url::parse(&location) {
            Ok(url) => url.path().to_string(),
            Err(_) => location,
        }
    }

    fn document_title(&self) -> String {
        self.state.borrow().title.clone()
    }

    fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.state.borrow().viewport_height
    }

    fn scroll_height(&self) -> f64 {
        self.state.borrow().scroll_height
    }

    fn open_popup(&self, url: &str, name: &str, features: &str) {
        self.state
            .borrow_mut()
            .popups
            .push((url.to_string(), name.to_string(), features.to_string()));
    }
}

/// Map-backed storage; writes can be made to fail.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: Rc<RefCell<HashMap<String, String>>>,
    reject_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a full or disabled store.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.reject_writes.get() {
            return Err(Error::Storage {
                key: key.to_string(),
                reason: "quota exceeded".into(),
            });
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Identifier of a pending [`ManualTimers`] callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerId(u64);

struct Pending {
    id: u64,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

/// Virtual clock: callbacks run only when the test advances time.
#[derive(Clone, Default)]
pub struct ManualTimers {
    clock: Rc<RefCell<Clock>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().pending.len()
    }

    /// Move time forward, running due callbacks in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let earliest = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.id))
                    .map(|(index, _)| index);
                earliest.map(|index| {
                    let pending = clock.pending.remove(index);
                    clock.now = pending.due;
                    pending.callback
                })
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }
}

impl Timers for ManualTimers {
    type Handle = TimerId;

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let due = clock.now + delay;
        clock.pending.push(Pending { id, due, callback });
        TimerId(id)
    }

    fn clear_timeout(&self, handle: TimerId) {
        self.clock.borrow_mut().pending.retain(|p| p.id != handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_all_walks_in_document_order() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let first = dom.add_with(&body, "section", &[("id", "a")]);
        let second = dom.add_with(&body, "section", &[("id", "b")]);
        // Appended later but nested earlier in the document.
        let nested = dom.add_with(&first, "section", &[("id", "a-inner")]);

        assert_eq!(dom.query_all("section[id]"), vec![first, nested, second]);
    }

    #[test]
    fn class_edits_keep_attribute_in_sync() {
        let dom = MemoryDom::new();
        let link = dom.add_with(&dom.body(), "a", &[("class", "dock-item")]);
        dom.add_class(&link, "active");
        dom.add_class(&link, "active");
        assert_eq!(dom.attribute(&link, "class").as_deref(), Some("dock-item active"));
        dom.remove_class(&link, "dock-item");
        assert_eq!(dom.attribute(&link, "class").as_deref(), Some("active"));
    }

    #[test]
    fn timers_run_in_deadline_order_and_can_be_cleared() {
        let timers = ManualTimers::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        timers.set_timeout(Duration::from_millis(20), Box::new(move || l.borrow_mut().push(20)));
        let l = log.clone();
        let cancelled =
            timers.set_timeout(Duration::from_millis(5), Box::new(move || l.borrow_mut().push(5)));
        let l = log.clone();
        timers.set_timeout(Duration::from_millis(10), Box::new(move || l.borrow_mut().push(10)));
        timers.clear_timeout(cancelled);

        timers.advance(Duration::from_millis(15));
        assert_eq!(*log.borrow(), vec![10]);
        timers.advance(Duration::from_millis(5));
        assert_eq!(*log.borrow(), vec![10, 20]);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn pathname_comes_from_location() {
        let window = MemoryWindow::new("https://example.com/_posts/malware/a.html?x=1");
        assert_eq!(window.pathname(), "/_posts/malware/a.html");
    }
}
