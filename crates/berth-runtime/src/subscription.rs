#![forbid(unsafe_code)]

//! Observable values with subscription-counted listeners.
//!
//! An [`Observable`] holds a value and a list of listeners. Setting a value
//! that differs from the current one notifies every listener synchronously,
//! in subscription order, before `set` returns. Setting an equal value does
//! nothing.
//!
//! [`Observable::subscribe`] returns a [`Subscription`]; dropping it removes
//! the listener, so a component that goes away cannot leak a callback.
//!
//! Listeners run after the internal borrow is released and may read the
//! observable. A listener that calls [`Observable::set`] re-enters the
//! notification loop for the new value.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Identifier of one listener within an [`Observable`].
pub type SubId = u64;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Shared<T> {
    value: T,
    next_id: SubId,
    listeners: Vec<(SubId, Listener<T>)>,
}

trait Detach {
    fn detach(&self, id: SubId);
}

impl<T> Detach for RefCell<Shared<T>> {
    fn detach(&self, id: SubId) {
        if let Ok(mut shared) = self.try_borrow_mut() {
            shared.listeners.retain(|(sid, _)| *sid != id);
        }
    }
}

/// Shared, observable value. Cloning yields another handle to the same value.
pub struct Observable<T> {
    inner: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &shared.value)
            .field("listeners", &shared.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Shared {
                value,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Replace the value. Returns `true` (and notifies) if it changed.
    pub fn set(&self, value: T) -> bool {
        let listeners: Vec<Listener<T>> = {
            let mut shared = self.inner.borrow_mut();
            if shared.value == value {
                return false;
            }
            shared.value = value.clone();
            shared.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
        };
        for listener in listeners {
            listener(&value);
        }
        true
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = {
            let mut shared = self.inner.borrow_mut();
            let id = shared.next_id;
            shared.next_id += 1;
            shared.listeners.push((id, Rc::new(listener)));
            id
        };
        let weak: Weak<RefCell<Shared<T>>> = Rc::downgrade(&self.inner);
        let weak: Weak<dyn Detach> = weak;
        Subscription { id, owner: weak }
    }

    /// Number of live listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Handle to a registered listener; dropping it unsubscribes.
pub struct Subscription {
    id: SubId,
    owner: Weak<dyn Detach>,
}

impl Subscription {
    /// Listener ID within its observable.
    #[must_use]
    pub const fn id(&self) -> SubId {
        self.id
    }

    /// Unsubscribe now. Equivalent to dropping.
    pub fn cancel(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.detach(self.id);
        }
    }
}
