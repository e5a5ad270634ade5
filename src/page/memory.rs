//! In-memory page double used by the demo binary and the tests.
//! Models just enough of a document and its session history for the
//! controller: elements with ids/classes, visibility flags, form submit
//! counters, and a history stack that records replace/back calls.

use serde::Serialize;

use super::{NodeId, Page, PageError};

#[derive(Debug, Clone, Serialize)]
pub struct Element {
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Link target, present on anchor-like elements
    pub href: Option<String>,
    pub hidden: bool,
    /// True once the element has been removed from layout (display: none)
    pub display_none: bool,
    /// How many times the element was submitted as a form
    pub submit_count: u32,
}

impl Element {
    fn new() -> Self {
        Self {
            id: None,
            classes: Vec::new(),
            href: None,
            hidden: false,
            display_none: false,
            submit_count: 0,
        }
    }
}

/// Session history as the browser would keep it. `reached_via_post` is the
/// flag behind the resubmission warning; replacing the current entry with a
/// state-free one clears it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionHistory {
    pub len: usize,
    pub url: String,
    pub reached_via_post: bool,
    pub replace_calls: u32,
    pub back_calls: u32,
}

#[derive(Debug, Serialize)]
pub struct MemoryPage {
    elements: Vec<Element>,
    pub history: SessionHistory,
    /// Cleared to simulate hosts without history.replaceState
    pub replace_state_supported: bool,
}

impl MemoryPage {
    pub fn new(url: &str) -> Self {
        Self {
            elements: Vec::new(),
            history: SessionHistory {
                len: 1,
                url: url.to_string(),
                reached_via_post: false,
                replace_calls: 0,
                back_calls: 0,
            },
            replace_state_supported: true,
        }
    }

    /// Mark the current entry as created by a form POST, with `depth`
    /// entries already on the stack
    pub fn reached_via_post(mut self, depth: usize) -> Self {
        self.history.reached_via_post = true;
        // A live session always has at least its current entry
        self.history.len = depth.max(1);
        self
    }

    pub fn without_replace_state(mut self) -> Self {
        self.replace_state_supported = false;
        self
    }

    pub fn add_link(&mut self, class: &str, href: &str) -> NodeId {
        let mut el = Element::new();
        el.classes.push(class.to_string());
        el.href = Some(href.to_string());
        self.push(el)
    }

    pub fn add_link_by_id(&mut self, id: &str, href: &str) -> NodeId {
        let mut el = Element::new();
        el.id = Some(id.to_string());
        el.href = Some(href.to_string());
        self.push(el)
    }

    pub fn add_button(&mut self, id: &str) -> NodeId {
        let mut el = Element::new();
        el.id = Some(id.to_string());
        self.push(el)
    }

    /// An element carrying the hidden attribute, e.g. a spinner indicator
    pub fn add_hidden(&mut self, id: &str) -> NodeId {
        let mut el = Element::new();
        el.id = Some(id.to_string());
        el.hidden = true;
        self.push(el)
    }

    pub fn add_form(&mut self, id: &str) -> NodeId {
        let mut el = Element::new();
        el.id = Some(id.to_string());
        self.push(el)
    }

    fn push(&mut self, el: Element) -> NodeId {
        self.elements.push(el);
        NodeId(self.elements.len() - 1)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0)
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element, PageError> {
        self.elements.get_mut(node.0).ok_or(PageError::StaleNode(node))
    }
}

impl Page for MemoryPage {
    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        if let Some(class) = selector.strip_prefix('.') {
            self.elements
                .iter()
                .position(|el| el.classes.iter().any(|c| c == class))
                .map(NodeId)
        } else if let Some(id) = selector.strip_prefix('#') {
            self.element_by_id(id)
        } else {
            None
        }
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|el| el.id.as_deref() == Some(id))
            .map(NodeId)
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> Result<(), PageError> {
        self.element_mut(node)?.hidden = hidden;
        Ok(())
    }

    fn remove_from_layout(&mut self, node: NodeId) -> Result<(), PageError> {
        self.element_mut(node)?.display_none = true;
        Ok(())
    }

    fn submit_form(&mut self, node: NodeId) -> Result<(), PageError> {
        self.element_mut(node)?.submit_count += 1;
        Ok(())
    }

    fn supports_replace_state(&self) -> bool {
        self.replace_state_supported
    }

    fn replace_state(&mut self) {
        // Same URL, no state object: entry count does not change, the
        // POST provenance of the current entry is gone
        self.history.replace_calls += 1;
        self.history.reached_via_post = false;
    }

    fn history_back(&mut self) {
        self.history.back_calls += 1;
        self.history.len = self.history.len.saturating_sub(1).max(1);
    }

    fn history_len(&self) -> usize {
        self.history.len
    }
}
