#![forbid(unsafe_code)]

//! Runtime services shared by overlays: cancellable timers, observable
//! values, the reference-counted scroll lock, and the live viewport.
//!
//! Everything here is single-threaded. Shared services are cheap-clone `Rc`
//! handles and deliberately `!Send`: the host drives them from one event loop.

pub mod scroll_lock;
pub mod subscription;
pub mod timer;
pub mod viewport;

pub use scroll_lock::{ScrollLock, ScrollLockGuard};
pub use subscription::{Observable, SubId, Subscription};
pub use timer::{Timer, TimerToken};
pub use viewport::Viewport;
