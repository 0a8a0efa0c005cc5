#![forbid(unsafe_code)]

//! In-memory document.
//!
//! Holds the inline style declarations of the document root (`html`) and the
//! body, plus the overlay nodes portalled directly under the body. Every
//! [`Document`] clone is a handle to the same state, so the scroll lock and
//! each overlay's portal can write to it while tests read it back.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use berth_core::backend::{PortalHost, StylePriority, StyleSink, StyleTarget};
use berth_core::event::OverlayId;
use tracing::trace;

/// One inline style declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDecl {
    /// Property value.
    pub value: String,
    /// Priority.
    pub priority: StylePriority,
}

impl StyleDecl {
    /// Whether the declaration carries `!important`.
    #[must_use]
    pub fn is_important(&self) -> bool {
        self.priority == StylePriority::Important
    }
}

#[derive(Debug, Default)]
struct DocumentState {
    root: BTreeMap<String, StyleDecl>,
    body: BTreeMap<String, StyleDecl>,
    portal: Vec<OverlayId>,
    mutations: u64,
}

impl DocumentState {
    fn styles(&self, target: StyleTarget) -> &BTreeMap<String, StyleDecl> {
        match target {
            StyleTarget::Root => &self.root,
            StyleTarget::Body => &self.body,
        }
    }

    fn styles_mut(&mut self, target: StyleTarget) -> &mut BTreeMap<String, StyleDecl> {
        match target {
            StyleTarget::Root => &mut self.root,
            StyleTarget::Body => &mut self.body,
        }
    }
}

/// Shared handle to the in-memory document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    state: Rc<RefCell<DocumentState>>,
}

impl Document {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inline declaration of `name` on `target`.
    #[must_use]
    pub fn style(&self, target: StyleTarget, name: &str) -> Option<StyleDecl> {
        self.state.borrow().styles(target).get(name).cloned()
    }

    /// Rendered inline `style` attribute of `target`, properties in name order.
    #[must_use]
    pub fn style_attr(&self, target: StyleTarget) -> String {
        let state = self.state.borrow();
        state
            .styles(target)
            .iter()
            .map(|(name, decl)| {
                if decl.is_important() {
                    format!("{name}: {} !important;", decl.value)
                } else {
                    format!("{name}: {};", decl.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether page scrolling is suppressed on both root and body.
    #[must_use]
    pub fn is_scroll_suppressed(&self) -> bool {
        [StyleTarget::Root, StyleTarget::Body].into_iter().all(|target| {
            self.style(target, "overflow")
                .is_some_and(|d| d.value == "hidden" && d.is_important())
        })
    }

    /// Overlay nodes under the body, in insertion order (last is topmost).
    #[must_use]
    pub fn portal_nodes(&self) -> Vec<OverlayId> {
        self.state.borrow().portal.clone()
    }

    /// Whether the node for `id` is in the document.
    #[must_use]
    pub fn has_node(&self, id: OverlayId) -> bool {
        self.state.borrow().portal.contains(&id)
    }

    /// Total style and node mutations applied.
    #[must_use]
    pub fn mutation_count(&self) -> u64 {
        self.state.borrow().mutations
    }
}

impl StyleSink for Document {
    fn set_property(
        &mut self,
        target: StyleTarget,
        name: &str,
        value: &str,
        priority: StylePriority,
    ) {
        let mut state = self.state.borrow_mut();
        state.styles_mut(target).insert(
            name.to_string(),
            StyleDecl {
                value: value.to_string(),
                priority,
            },
        );
        state.mutations += 1;
        trace!(element = target.as_str(), property = name, value, "style set");
    }

    fn remove_property(&mut self, target: StyleTarget, name: &str) {
        let mut state = self.state.borrow_mut();
        if state.styles_mut(target).remove(name).is_some() {
            state.mutations += 1;
            trace!(element = target.as_str(), property = name, "style removed");
        }
    }
}

impl PortalHost for Document {
    fn attach(&mut self, id: OverlayId) {
        let mut state = self.state.borrow_mut();
        if !state.portal.contains(&id) {
            state.portal.push(id);
            state.mutations += 1;
            trace!(overlay = %id, "node attached");
        }
    }

    fn detach(&mut self, id: OverlayId) {
        let mut state = self.state.borrow_mut();
        let before = state.portal.len();
        state.portal.retain(|n| *n != id);
        if state.portal.len() != before {
            state.mutations += 1;
            trace!(overlay = %id, "node detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn style_roundtrip_through_handles() {
        let doc = Document::new();
        let mut writer = doc.clone();
        writer.set_property(StyleTarget::Body, "overflow", "hidden", StylePriority::Important);
        assert_eq!(
            doc.style_attr(StyleTarget::Body),
            "overflow: hidden !important;"
        );
        assert!(!doc.is_scroll_suppressed());

        writer.set_property(StyleTarget::Root, "overflow", "hidden", StylePriority::Important);
        assert!(doc.is_scroll_suppressed());

        writer.remove_property(StyleTarget::Root, "overflow");
        assert!(!doc.is_scroll_suppressed());
        assert_eq!(doc.style(StyleTarget::Root, "overflow"), None);
    }

    #[test]
    fn normal_priority_does_not_count_as_suppressed() {
        let mut doc = Document::new();
        doc.set_property(StyleTarget::Root, "overflow", "hidden", StylePriority::Normal);
        doc.set_property(StyleTarget::Body, "overflow", "hidden", StylePriority::Normal);
        assert!(!doc.is_scroll_suppressed());
    }

    #[test]
    fn portal_nodes_keep_insertion_order() {
        let mut doc = Document::new();
        let (a, b) = (OverlayId::new(1), OverlayId::new(2));
        doc.attach(a);
        doc.attach(b);
        doc.attach(a);
        assert_eq!(doc.portal_nodes(), vec![a, b]);
        doc.detach(a);
        assert_eq!(doc.portal_nodes(), vec![b]);
        assert!(!doc.has_node(a));
        doc.detach(a);
        assert_eq!(doc.mutation_count(), 3);
    }
}
