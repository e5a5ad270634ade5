pub mod memory;

use thiserror::Error;

/// Opaque handle to an element on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Error)]
pub enum PageError {
    #[error("node {0:?} is not part of this page")]
    StaleNode(NodeId),
}

/// A click being dispatched to the controller. The controller flips the
/// flags; whoever dispatched the click reads them back afterwards.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub target: NodeId,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl ClickEvent {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Platform capabilities the controller needs from the hosting page.
///
/// Element lookup, visibility, form submission, and session history in one
/// trait since a page owns all four. `MemoryPage` implements it for the demo
/// and tests; a real browser binding would be another implementation.
pub trait Page {
    /// First element matching a ".class" or "#id" selector, if any
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Set or clear the element's hidden attribute
    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> Result<(), PageError>;

    /// Remove the element from layout entirely (display: none)
    fn remove_from_layout(&mut self, node: NodeId) -> Result<(), PageError>;

    /// Submit a form programmatically, bypassing submit-button semantics
    fn submit_form(&mut self, node: NodeId) -> Result<(), PageError>;

    /// Whether the host supports replacing the current history entry
    fn supports_replace_state(&self) -> bool;

    /// Replace the current history entry with a state-free entry at the
    /// same URL. Creates no new entry and does not change the visible URL.
    fn replace_state(&mut self);

    /// Go back one history entry
    fn history_back(&mut self);

    fn history_len(&self) -> usize;
}
