//! Facade surface: prelude imports, error conversion, and a full round trip.

use std::error::Error as _;
use std::time::Duration;

use berth::prelude::*;
use berth::{ConfigError, WebHostError};

#[test]
fn config_errors_convert() {
    let err: Error = OverlayConfig::default()
        .max_content_height(1.5)
        .validate()
        .map_err(Error::from)
        .unwrap_err();
    assert_eq!(err, Error::Config(ConfigError::MaxContentHeight(1.5)));
    assert!(err.source().is_some());
}

#[test]
fn host_errors_convert() {
    fn unregister_missing(host: &mut StepHost) -> berth::Result<()> {
        host.unregister(OverlayId(5))?;
        Ok(())
    }
    let mut host = StepHost::new(OverlayConfig::default(), 1024, 768);
    let err = unregister_missing(&mut host).unwrap_err();
    assert_eq!(err, Error::Host(WebHostError::UnknownOverlay(OverlayId(5))));
    assert_eq!(err.to_string(), "unknown overlay: overlay#5");
}

#[test]
fn prelude_drives_a_drawer() {
    let mut host = StepHost::new(OverlayConfig::default(), 1280, 800);
    host.register(OverlayId(1), Variant::Drawer, OverlayOptions::default())
        .unwrap();

    host.push_event(Event::Open(OverlayId(1)));
    host.step().unwrap();
    host.advance_time(Duration::from_millis(50));
    host.step().unwrap();

    let frame: &OverlayFrame = &host.frames()[0];
    assert_eq!(frame.surface, Surface::RightDrawer);
    assert_eq!(frame.state, OverlayState::Visible);
    assert_eq!(
        frame.css(),
        "transform: translateX(0%); transition: transform 300ms ease-out"
    );
    assert!(host.document().is_scroll_suppressed());
}
