//! Binding types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Placeholder token that stands for the platform's primary modifier.
pub const PRIMARY_PLACEHOLDER: &str = "mod";

/// Tokens that name modifier keys rather than keys that produce input.
pub const MODIFIER_TOKENS: [&str; 5] = [PRIMARY_PLACEHOLDER, "meta", "ctrl", "shift", "alt"];

/// Check whether a token names a modifier key.
pub fn is_modifier_token(token: &str) -> bool {
    MODIFIER_TOKENS.contains(&token)
}

/// Ways a binding can violate its shape invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedBinding {
    #[error("binding has no keys")]
    Empty,
    #[error("combination has no non-modifier key")]
    MissingKey,
    #[error("combination has more than one non-modifier key")]
    MultipleKeys,
    #[error("sequence step '{0}' is a modifier")]
    ModifierInSequence(String),
}

/// A key binding: either one simultaneous combination or an ordered sequence
/// of plain key presses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    /// Key tokens, lowercase. May contain [`PRIMARY_PLACEHOLDER`].
    pub keys: Vec<String>,
    /// Whether `keys` are pressed one after another.
    #[serde(default)]
    pub is_sequence: bool,
}

impl Binding {
    /// Create a combination binding (modifiers plus one key).
    pub fn combo(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_lowercase()).collect(),
            is_sequence: false,
        }
    }

    /// Create a sequence binding (plain keys pressed in order).
    pub fn sequence(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_lowercase()).collect(),
            is_sequence: true,
        }
    }

    /// Create a single-key binding with no modifiers.
    pub fn key(key: &str) -> Self {
        Self::combo(&[key])
    }

    /// Check the shape invariant.
    pub fn check(&self) -> Result<(), MalformedBinding> {
        if self.keys.is_empty() {
            return Err(MalformedBinding::Empty);
        }

        if self.is_sequence {
            if let Some(m) = self.keys.iter().find(|k| is_modifier_token(k)) {
                return Err(MalformedBinding::ModifierInSequence(m.clone()));
            }
            return Ok(());
        }

        match self.keys.iter().filter(|k| !is_modifier_token(k)).count() {
            0 => Err(MalformedBinding::MissingKey),
            1 => Ok(()),
            _ => Err(MalformedBinding::MultipleKeys),
        }
    }

    /// The non-modifier key of a combination.
    pub fn key_token(&self) -> Option<&str> {
        if self.is_sequence {
            return None;
        }
        self.keys
            .iter()
            .map(String::as_str)
            .find(|k| !is_modifier_token(k))
    }

    /// A combination of exactly one plain key and no modifiers.
    pub fn is_single_key(&self) -> bool {
        !self.is_sequence && self.keys.len() == 1 && !is_modifier_token(&self.keys[0])
    }

    /// Whether this binding uses the primary-modifier placeholder.
    pub fn uses_placeholder(&self) -> bool {
        self.keys.iter().any(|k| k == PRIMARY_PLACEHOLDER)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sequence {
            write!(f, "{}", self.keys.join(" "))
        } else {
            write!(f, "{}", self.keys.join("+"))
        }
    }
}
