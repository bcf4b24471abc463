//! Input context guard: keeps shortcuts out of text-editing widgets.

use crate::event::NormalizedKey;
use serde::{Deserialize, Serialize};

/// What currently has keyboard focus, as classified by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusKind {
    /// Nothing focused
    #[default]
    None,
    /// A non-editable widget (button, list row, panel)
    Widget,
    /// Single-line text input
    TextInput,
    /// Multi-line text area
    TextArea,
    /// Selectable list control (drop-down)
    Select,
    /// Free-form editable content region
    ContentEditable,
}

impl FocusKind {
    /// Whether keystrokes belong to the focused widget.
    pub fn is_text_editing(self) -> bool {
        matches!(
            self,
            Self::TextInput | Self::TextArea | Self::Select | Self::ContentEditable
        )
    }
}

/// Host-side view of focus.
pub trait FocusContext {
    /// Classify the focused element.
    fn focus_kind(&self) -> FocusKind;

    /// Remove focus from the focused element.
    fn blur(&mut self);
}

/// A bare classification acts as its own context; blurring clears it.
impl FocusContext for FocusKind {
    fn focus_kind(&self) -> FocusKind {
        *self
    }

    fn blur(&mut self) {
        *self = FocusKind::None;
    }
}

/// Outcome of the guard for one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Hand the event to the dispatcher.
    Proceed,
    /// Escape inside a text widget: blur it, dispatch nothing.
    Blur,
    /// Leave the event to the focused widget.
    Suppress,
}

impl GuardDecision {
    pub fn should_dispatch(self) -> bool {
        self == Self::Proceed
    }
}

/// Decide whether a key event may reach the dispatcher.
pub fn check(key: &NormalizedKey, focus: FocusKind) -> GuardDecision {
    if !focus.is_text_editing() {
        return GuardDecision::Proceed;
    }
    if key.is_escape() {
        GuardDecision::Blur
    } else {
        GuardDecision::Suppress
    }
}
