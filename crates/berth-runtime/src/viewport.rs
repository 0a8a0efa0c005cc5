#![forbid(unsafe_code)]

//! Live viewport with a shared narrow/wide classification.
//!
//! One [`Viewport`] exists per host. The host feeds it resize notifications;
//! overlays read the classification and may subscribe to flips. Listeners are
//! called only when the classification changes, not on every resize.

use std::cell::Cell;
use std::rc::Rc;

use berth_core::geometry::Size;
use berth_layout::{Breakpoint, ViewportClass};
use tracing::debug;

use crate::subscription::{Observable, Subscription};

#[derive(Debug)]
struct ViewportInner {
    size: Cell<Size>,
    breakpoint: Breakpoint,
    class: Observable<ViewportClass>,
}

/// Shared viewport handle. Cloning yields another handle to the same state.
#[derive(Debug, Clone)]
pub struct Viewport {
    inner: Rc<ViewportInner>,
}

impl Viewport {
    /// Create a viewport of `size`, classified against `breakpoint`.
    #[must_use]
    pub fn new(size: Size, breakpoint: Breakpoint) -> Self {
        Self {
            inner: Rc::new(ViewportInner {
                size: Cell::new(size),
                breakpoint,
                class: Observable::new(breakpoint.classify_size(size)),
            }),
        }
    }

    /// Apply a resize. Returns `true` if the classification flipped, in
    /// which case every subscriber has already been notified.
    pub fn resize(&self, size: Size) -> bool {
        self.inner.size.set(size);
        let class = self.inner.breakpoint.classify_size(size);
        let flipped = self.inner.class.set(class);
        if flipped {
            debug!(width = size.width, class = %class, "viewport classification flipped");
        }
        flipped
    }

    /// Current size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.inner.size.get()
    }

    /// Current classification.
    #[must_use]
    pub fn class(&self) -> ViewportClass {
        self.inner.class.get()
    }

    /// Whether the viewport is currently narrow.
    #[must_use]
    pub fn is_narrow(&self) -> bool {
        self.class().is_narrow()
    }

    /// Breakpoint this viewport classifies against.
    #[must_use]
    pub fn breakpoint(&self) -> Breakpoint {
        self.inner.breakpoint
    }

    /// Listen for classification flips.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ViewportClass) + 'static,
    {
        self.inner.class.subscribe(move |class| listener(*class))
    }

    /// Number of live classification listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.class.subscriber_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn viewport(width: u32) -> Viewport {
        Viewport::new(Size::new(width, 800), Breakpoint::DEFAULT)
    }

    #[test]
    fn initial_classification() {
        assert!(viewport(767).is_narrow());
        assert!(!viewport(768).is_narrow());
    }

    #[test]
    fn resize_within_class_does_not_notify() {
        let vp = viewport(1024);
        let flips = Rc::new(RefCell::new(Vec::new()));
        let f = Rc::clone(&flips);
        let _sub = vp.subscribe(move |c| f.borrow_mut().push(c));

        assert!(!vp.resize(Size::new(900, 700)));
        assert_eq!(vp.size(), Size::new(900, 700));
        assert!(flips.borrow().is_empty());
    }

    #[test]
    fn crossing_breakpoint_notifies_each_way() {
        let vp = viewport(1024);
        let flips = Rc::new(RefCell::new(Vec::new()));
        let f = Rc::clone(&flips);
        let _sub = vp.subscribe(move |c| f.borrow_mut().push(c));

        assert!(vp.resize(Size::new(767, 800)));
        assert!(vp.resize(Size::new(768, 800)));
        assert_eq!(
            *flips.borrow(),
            vec![ViewportClass::Narrow, ViewportClass::Wide]
        );
    }

    #[test]
    fn clones_share_state() {
        let vp = viewport(1024);
        let other = vp.clone();
        vp.resize(Size::new(320, 640));
        assert!(other.is_narrow());
    }

    #[test]
    fn subscriptions_are_counted() {
        let vp = viewport(1024);
        let a = vp.subscribe(|_| {});
        let b = vp.subscribe(|_| {});
        assert_eq!(vp.subscriber_count(), 2);
        drop(a);
        drop(b);
        assert_eq!(vp.subscriber_count(), 0);
    }
}
