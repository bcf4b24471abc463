//! Key event normalization.
//!
//! Host events are reduced to a lowercase token plus a modifier set before
//! they reach the matcher, so nothing downstream depends on the host's event
//! shape.

use crate::platform::Platform;
use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::BTreeSet;
use std::fmt;

bitflags! {
    /// Modifiers the matcher distinguishes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Command on Apple platforms, Control elsewhere.
        const PRIMARY = 0b001;
        const SHIFT = 0b010;
        const ALT = 0b100;
        /// Whichever of Control and Command is not primary here.
        const SECONDARY = 0b1000;
    }
}

/// A key press reduced to what the matcher needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedKey {
    /// Lowercase key token (`"a"`, `"?"`, `"space"`, `"escape"`).
    pub token: String,
    pub modifiers: Modifiers,
    /// Auto-repeat from a physically held key.
    pub repeat: bool,
}

impl NormalizedKey {
    pub fn new(token: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            token: token.into().to_lowercase(),
            modifiers,
            repeat: false,
        }
    }

    /// A key with no modifiers.
    pub fn plain(token: impl Into<String>) -> Self {
        Self::new(token, Modifiers::empty())
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn has_primary(&self) -> bool {
        self.modifiers.contains(Modifiers::PRIMARY)
    }

    pub fn has_shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    pub fn has_alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    pub fn has_secondary(&self) -> bool {
        self.modifiers.contains(Modifiers::SECONDARY)
    }

    pub fn is_escape(&self) -> bool {
        self.token == "escape"
    }

    /// The held combination: modifier tokens plus the key token.
    pub fn combo(&self, platform: Platform) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        if self.has_primary() {
            set.insert(platform.primary_token().to_string());
        }
        if self.has_secondary() {
            set.insert(platform.secondary_token().to_string());
        }
        if self.has_shift() {
            set.insert("shift".to_string());
        }
        if self.has_alt() {
            set.insert("alt".to_string());
        }
        set.insert(self.token.clone());
        set
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_primary() {
            write!(f, "mod+")?;
        }
        if self.has_secondary() {
            write!(f, "secondary+")?;
        }
        if self.has_shift() {
            write!(f, "shift+")?;
        }
        if self.has_alt() {
            write!(f, "alt+")?;
        }
        write!(f, "{}", self.token)
    }
}

/// Token for a key code, or `None` for keys the engine never binds
/// (bare modifiers, media keys, lock keys).
pub fn key_token(code: &KeyCode) -> Option<String> {
    let token = match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().collect(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Tab | KeyCode::BackTab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::F(n) => format!("f{}", n),
        _ => return None,
    };
    Some(token)
}

/// Normalize a crossterm key event.
///
/// Returns `None` for release events and keys without a token.
pub fn normalize(event: &KeyEvent, platform: Platform) -> Option<NormalizedKey> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let token = key_token(&event.code)?;

    let command = KeyModifiers::SUPER | KeyModifiers::META;
    let (primary, secondary) = match platform {
        Platform::Apple => (command, KeyModifiers::CONTROL),
        Platform::Other => (KeyModifiers::CONTROL, command),
    };

    let mut modifiers = Modifiers::empty();
    if event.modifiers.intersects(primary) {
        modifiers |= Modifiers::PRIMARY;
    }
    if event.modifiers.intersects(secondary) {
        modifiers |= Modifiers::SECONDARY;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        modifiers |= Modifiers::ALT;
    }

    // Some terminals report an uppercase letter without the shift flag.
    let implied_shift = match event.code {
        KeyCode::Char(c) => c.is_uppercase(),
        KeyCode::BackTab => true,
        _ => false,
    };
    if event.modifiers.contains(KeyModifiers::SHIFT) || implied_shift {
        modifiers |= Modifiers::SHIFT;
    }

    Some(NormalizedKey {
        token,
        modifiers,
        repeat: event.kind == KeyEventKind::Repeat,
    })
}
