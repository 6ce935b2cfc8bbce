use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element_id::ElementId;
use crate::toast::ToastKind;

/// A single, stateless DOM mutation.
///
/// The core emits a `Vec<DomCommand>` in response to every event. Hosts
/// apply the list in order; each command carries everything it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomCommand {
    /// Add or remove the `active` class on the nav link whose `href` is
    /// `#section`.
    SetLinkActive { section: ElementId, active: bool },

    /// Put a reveal target into its hidden pre-animation style.
    SetPendingStyle {
        element: ElementId,
        opacity: f64,
        translate_y: f64,
        /// CSS `animation` shorthand, applied in the paused state.
        animation: String,
    },

    /// Start the paused reveal animation and add `class`.
    PlayReveal { element: ElementId, class: String },

    /// Set a skill bar's `--width` custom property and run its animation.
    SetProgressWidth { element: ElementId, percent: f64 },

    /// Show or hide the floating scroll-to-top button.
    SetScrollTopVisible { visible: bool },

    /// Scroll the window.
    ScrollTo { top: f64, smooth: bool },

    /// Open or close the mobile nav menu (and swap the bars/times icon).
    SetMenuOpen { open: bool },

    /// Fade the hero greeting in.
    RevealGreeting,

    /// Empty the hero name before typing starts.
    ClearHeroText,

    /// Append one typed character to the hero name. Spaces arrive with
    /// `letter: false` and render as a non-breaking space.
    AppendHeroChar { ch: char, letter: bool },

    /// Replace the hero name outright (typing skipped).
    SetHeroText { text: String },

    /// Persist the session flag that suppresses the typing effect.
    MarkTypingShown,

    /// Disable (busy) or re-enable the contact submit button.
    SetSubmitBusy { busy: bool },

    /// Ask the mail relay to deliver a templated message. The host answers
    /// with the delivery outcome.
    SendMail {
        service: String,
        template: String,
        params: BTreeMap<String, String>,
    },

    /// Clear the contact form inputs.
    ResetContactForm,

    /// Replace any visible toast with a new one.
    ShowToast { message: String, kind: ToastKind },
}
