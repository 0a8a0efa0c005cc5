#![forbid(unsafe_code)]

//! Lifecycle transitions are emitted as structured `tracing` events.
//!
//!   cargo test -p berth-overlay --features tracing --test lifecycle_events

#![cfg(feature = "tracing")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use berth_overlay::{LifecycleController, LifecycleTimings};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone, Default)]
struct Captured {
    message: String,
    from: Option<String>,
    to: Option<String>,
}

struct EventCapture(Arc<Mutex<Vec<Captured>>>);

struct FieldVisitor<'a>(&'a mut Captured);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{value:?}");
        match field.name() {
            "message" => self.0.message = rendered,
            "from" => self.0.from = Some(rendered),
            "to" => self.0.to = Some(rendered),
            _ => {}
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut captured = Captured::default();
        event.record(&mut FieldVisitor(&mut captured));
        self.0.lock().unwrap().push(captured);
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture(Arc::clone(&events)));
    tracing::subscriber::with_default(subscriber, f);
    let out = events.lock().unwrap().clone();
    out
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn every_transition_is_logged_once() {
    let events = capture(|| {
        let mut c = LifecycleController::new(LifecycleTimings::new(ms(50), ms(300)));
        c.request_open(ms(0));
        c.poll(ms(50));
        c.request_close(ms(100));
        c.poll(ms(400));
    });

    let transitions: Vec<(String, String)> = events
        .iter()
        .filter(|e| e.message == "overlay transition")
        .filter_map(|e| Some((e.from.clone()?, e.to.clone()?)))
        .collect();

    assert_eq!(
        transitions,
        vec![
            ("unmounted".to_string(), "mounting".to_string()),
            ("mounting".to_string(), "visible".to_string()),
            ("visible".to_string(), "dismissing".to_string()),
            ("dismissing".to_string(), "unmounted".to_string()),
        ]
    );
}

#[test]
fn ignored_requests_do_not_log_transitions() {
    let events = capture(|| {
        let mut c = LifecycleController::default();
        c.request_close(ms(0));
        c.poll(ms(1000));
    });
    assert!(events.iter().all(|e| e.message != "overlay transition"));
    assert!(events.iter().any(|e| e.message == "close request ignored"));
}
