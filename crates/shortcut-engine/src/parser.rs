//! Binding notation parser.

use crate::binding::{is_modifier_token, Binding, PRIMARY_PLACEHOLDER};
use thiserror::Error;

/// Error parsing a binding notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty key notation")]
    Empty,
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
    #[error("modifier '{0}' used as the key")]
    ModifierAsKey(String),
    #[error("sequence step '{0}' cannot carry modifiers")]
    ModifiedStep(String),
    #[error("'{0}' combines more than one non-modifier key")]
    MultipleKeys(String),
}

/// Parse a binding notation.
///
/// Supported formats:
/// - `"g d"` - whitespace-separated plain keys form a sequence
/// - `"mod+k"`, `"ctrl+shift+p"`, `"Cmd+K"` - a combination
/// - `"?"`, `"escape"`, `"f2"` - a single key
/// - `"shift++"` - the `+` key itself
///
/// `mod` (or `$mod`, `primary`) is the placeholder for the platform's
/// primary modifier and stays unresolved in the result.
pub fn parse_binding(s: &str) -> Result<Binding, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }

    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() > 1 {
        let mut keys = Vec::with_capacity(parts.len());
        for part in parts {
            if part.len() > 1 && part.contains('+') {
                return Err(ParseError::ModifiedStep(part.to_string()));
            }
            let key = key_name(part);
            if is_modifier_token(&key) || modifier_name(&key).is_some() {
                return Err(ParseError::ModifiedStep(part.to_string()));
            }
            keys.push(key);
        }
        return Ok(Binding {
            keys,
            is_sequence: true,
        });
    }

    parse_combo(s)
}

fn parse_combo(s: &str) -> Result<Binding, ParseError> {
    // A trailing "++" names the plus key.
    let (head, key) = match s.strip_suffix("++") {
        Some(head) => (head, "+"),
        None if s == "+" => ("", "+"),
        None => match s.rsplit_once('+') {
            Some((head, key)) => (head, key),
            None => ("", s),
        },
    };

    if key.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut keys = Vec::new();
    if !head.is_empty() {
        for part in head.split('+') {
            let lower = part.trim().to_lowercase();
            let modifier = match modifier_name(&lower) {
                Some(modifier) => modifier,
                None if is_key_name(&lower) => return Err(ParseError::MultipleKeys(s.to_string())),
                None => return Err(ParseError::UnknownModifier(lower)),
            };
            if !keys.iter().any(|k| k == modifier) {
                keys.push(modifier.to_string());
            }
        }
    }

    let key = key_name(key);
    if modifier_name(&key).is_some() {
        return Err(ParseError::ModifierAsKey(key));
    }
    keys.push(key);

    Ok(Binding {
        keys,
        is_sequence: false,
    })
}

/// Canonical modifier token for an alias.
fn modifier_name(s: &str) -> Option<&'static str> {
    let token = match s {
        "mod" | "$mod" | "primary" => PRIMARY_PLACEHOLDER,
        "meta" | "cmd" | "command" | "super" => "meta",
        "ctrl" | "control" => "ctrl",
        "shift" => "shift",
        "alt" | "option" | "opt" => "alt",
        _ => return None,
    };
    Some(token)
}

/// Whether `s` names a key rather than a misspelled modifier.
fn is_key_name(s: &str) -> bool {
    if s.chars().count() == 1 || key_name(s) != s {
        return true;
    }
    let named = [
        "escape", "enter", "tab", "backspace", "delete", "insert", "space", "up", "down",
        "left", "right", "home", "end", "pageup", "pagedown",
    ];
    named.contains(&s)
        || s
            .strip_prefix('f')
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Canonical key token for an alias.
fn key_name(s: &str) -> String {
    let lower = s.to_lowercase();
    let token = match lower.as_str() {
        "esc" => "escape",
        "return" | "cr" => "enter",
        "del" => "delete",
        "bs" => "backspace",
        "ins" => "insert",
        "pgup" => "pageup",
        "pgdn" | "pgdown" => "pagedown",
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",
        " " => "space",
        _ => return lower,
    };
    token.to_string()
}
