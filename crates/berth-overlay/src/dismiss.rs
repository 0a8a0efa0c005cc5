#![forbid(unsafe_code)]

//! Why an overlay was asked to close, and which reasons it honors.

/// Origin of a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DismissReason {
    /// The overlay's own close button.
    CloseButton,
    /// Click on the backdrop behind the overlay.
    Backdrop,
    /// Escape key.
    Escape,
    /// The app closed it (form saved, prop turned false, route change).
    Programmatic,
    /// The trigger that opened it was clicked again.
    Toggle,
}

impl DismissReason {
    /// Short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CloseButton => "close-button",
            Self::Backdrop => "backdrop",
            Self::Escape => "escape",
            Self::Programmatic => "programmatic",
            Self::Toggle => "toggle",
        }
    }
}

/// Per-overlay behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayOptions {
    /// Close when the backdrop is clicked.
    /// Default: true
    pub dismiss_on_backdrop: bool,
    /// Close on the Escape key.
    /// Default: true
    pub dismiss_on_escape: bool,
    /// Hold the document scroll lock while mounted.
    /// Default: true
    pub lock_scroll: bool,
    /// Track the "more content below" affordance.
    /// Default: true
    pub scroll_indicator: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            dismiss_on_backdrop: true,
            dismiss_on_escape: true,
            lock_scroll: true,
            scroll_indicator: true,
        }
    }
}

impl OverlayOptions {
    /// Options for a blocking dialog: only explicit buttons or the app close it.
    #[must_use]
    pub fn blocking() -> Self {
        Self {
            dismiss_on_backdrop: false,
            dismiss_on_escape: false,
            ..Self::default()
        }
    }

    /// Whether a close request for `reason` should be honored.
    #[must_use]
    pub const fn allows(&self, reason: DismissReason) -> bool {
        match reason {
            DismissReason::Backdrop => self.dismiss_on_backdrop,
            DismissReason::Escape => self.dismiss_on_escape,
            DismissReason::CloseButton | DismissReason::Programmatic | DismissReason::Toggle => {
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_everything() {
        let opts = OverlayOptions::default();
        for reason in [
            DismissReason::CloseButton,
            DismissReason::Backdrop,
            DismissReason::Escape,
            DismissReason::Programmatic,
            DismissReason::Toggle,
        ] {
            assert!(opts.allows(reason), "{}", reason.as_str());
        }
    }

    #[test]
    fn blocking_ignores_backdrop_and_escape() {
        let opts = OverlayOptions::blocking();
        assert!(!opts.allows(DismissReason::Backdrop));
        assert!(!opts.allows(DismissReason::Escape));
        assert!(opts.allows(DismissReason::CloseButton));
        assert!(opts.allows(DismissReason::Programmatic));
        assert!(opts.lock_scroll);
    }
}
