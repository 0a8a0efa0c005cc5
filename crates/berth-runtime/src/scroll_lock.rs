#![forbid(unsafe_code)]

//! Reference-counted document scroll lock.
//!
//! While any overlay is mounted the page behind it must not scroll. Each
//! overlay [`acquire`](ScrollLock::acquire)s a [`ScrollLockGuard`] on mount;
//! the suppression style is applied when the holder count goes 0 → 1 and
//! removed when it goes 1 → 0.
//!
//! # Invariants
//!
//! 1. The suppression is applied iff at least one guard is alive.
//! 2. Releasing one of several guards leaves the page locked.
//! 3. Every exit path releases: explicit [`release`](ScrollLock::release),
//!    dropping the guard, or unwinding through its owner.
//!
//! The style is `overflow: hidden !important` on both the document root and
//! the body by default, so ordinary page styling cannot override it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use berth_core::backend::{StylePriority, StyleSink, StyleTargets};
use tracing::{debug, trace};

const OVERFLOW: &str = "overflow";
const HIDDEN: &str = "hidden";

struct LockState {
    holders: usize,
    targets: StyleTargets,
    sink: Box<dyn StyleSink>,
    acquisitions: u64,
}

impl LockState {
    fn apply(&mut self) {
        for target in self.targets.targets() {
            self.sink
                .set_property(target, OVERFLOW, HIDDEN, StylePriority::Important);
        }
        debug!(targets = ?self.targets, "scroll lock applied");
    }

    fn remove(&mut self) {
        for target in self.targets.targets() {
            self.sink.remove_property(target, OVERFLOW);
        }
        debug!(targets = ?self.targets, "scroll lock removed");
    }

    fn release_one(&mut self) {
        match self.holders {
            0 => trace!("scroll lock release with no holders ignored"),
            1 => {
                self.holders = 0;
                self.remove();
            }
            n => {
                self.holders = n - 1;
                trace!(holders = self.holders, "scroll lock still held");
            }
        }
    }
}

/// Process-wide scroll lock service. Cloning yields another handle to the
/// same counter.
#[derive(Clone)]
pub struct ScrollLock {
    state: Rc<RefCell<LockState>>,
}

impl ScrollLock {
    /// Create a lock that suppresses scrolling on the root and the body.
    #[must_use]
    pub fn new(sink: Box<dyn StyleSink>) -> Self {
        Self::with_targets(sink, StyleTargets::default())
    }

    /// Create a lock that only touches `targets`.
    #[must_use]
    pub fn with_targets(sink: Box<dyn StyleSink>, targets: StyleTargets) -> Self {
        Self {
            state: Rc::new(RefCell::new(LockState {
                holders: 0,
                targets,
                sink,
                acquisitions: 0,
            })),
        }
    }

    /// Take a hold on the lock, applying it if this is the first holder.
    #[must_use = "the lock is released as soon as the guard is dropped"]
    pub fn acquire(&self) -> ScrollLockGuard {
        let mut state = self.state.borrow_mut();
        state.holders += 1;
        state.acquisitions += 1;
        if state.holders == 1 {
            state.apply();
        } else {
            trace!(holders = state.holders, "scroll lock already applied");
        }
        ScrollLockGuard {
            state: Rc::clone(&self.state),
        }
    }

    /// Release a hold explicitly. Equivalent to dropping the guard.
    pub fn release(&self, guard: ScrollLockGuard) {
        drop(guard);
    }

    /// Whether the suppression is currently applied.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.borrow().holders > 0
    }

    /// Number of live guards.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.state.borrow().holders
    }

    /// Total guards handed out since creation (diagnostic).
    #[must_use]
    pub fn acquisitions(&self) -> u64 {
        self.state.borrow().acquisitions
    }
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ScrollLock")
            .field("holders", &state.holders)
            .field("targets", &state.targets)
            .finish()
    }
}

/// One hold on a [`ScrollLock`]. Dropping it releases the hold.
pub struct ScrollLockGuard {
    state: Rc<RefCell<LockState>>,
}

impl fmt::Debug for ScrollLockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLockGuard").finish_non_exhaustive()
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.release_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_core::backend::StyleTarget;

    type Log = Rc<RefCell<Vec<String>>>;

    struct RecordingSink(Log);

    impl StyleSink for RecordingSink {
        fn set_property(
            &mut self,
            target: StyleTarget,
            name: &str,
            value: &str,
            priority: StylePriority,
        ) {
            let bang = if priority == StylePriority::Important {
                " !important"
            } else {
                ""
            };
            self.0
                .borrow_mut()
                .push(format!("set {}.{name}={value}{bang}", target.as_str()));
        }

        fn remove_property(&mut self, target: StyleTarget, name: &str) {
            self.0
                .borrow_mut()
                .push(format!("remove {}.{name}", target.as_str()));
        }
    }

    fn lock() -> (ScrollLock, Log) {
        let log: Log = Rc::default();
        (ScrollLock::new(Box::new(RecordingSink(Rc::clone(&log)))), log)
    }

    #[test]
    fn first_acquire_applies_important_overflow_on_root_and_body() {
        let (lock, log) = lock();
        let _g = lock.acquire();
        assert!(lock.is_locked());
        assert_eq!(
            *log.borrow(),
            vec![
                "set html.overflow=hidden !important",
                "set body.overflow=hidden !important",
            ]
        );
    }

    #[test]
    fn nested_holders_keep_lock_until_last_release() {
        let (lock, log) = lock();
        let a = lock.acquire();
        let b = lock.acquire();
        assert_eq!(lock.holders(), 2);
        assert_eq!(log.borrow().len(), 2, "second acquire must not re-apply");

        lock.release(b);
        assert!(lock.is_locked());
        assert_eq!(log.borrow().len(), 2, "releasing B must not unlock");

        lock.release(a);
        assert!(!lock.is_locked());
        assert_eq!(
            log.borrow()[2..],
            ["remove html.overflow", "remove body.overflow"]
        );
    }

    #[test]
    fn release_order_does_not_matter() {
        let (lock, _log) = lock();
        let a = lock.acquire();
        let b = lock.acquire();
        drop(a);
        assert!(lock.is_locked());
        drop(b);
        assert!(!lock.is_locked());
    }

    #[test]
    fn guard_released_during_unwind() {
        let (lock, _log) = lock();
        let l = lock.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = l.acquire();
            panic!("render failed");
        }));
        assert!(result.is_err());
        assert!(!lock.is_locked());
    }

    #[test]
    fn body_only_targets() {
        let log: Log = Rc::default();
        let lock = ScrollLock::with_targets(
            Box::new(RecordingSink(Rc::clone(&log))),
            StyleTargets::BODY,
        );
        drop(lock.acquire());
        assert_eq!(
            *log.borrow(),
            vec!["set body.overflow=hidden !important", "remove body.overflow"]
        );
    }

    #[test]
    fn relock_after_full_release() {
        let (lock, log) = lock();
        drop(lock.acquire());
        let _g = lock.acquire();
        assert!(lock.is_locked());
        assert_eq!(log.borrow().len(), 6);
        assert_eq!(lock.acquisitions(), 2);
    }
}
