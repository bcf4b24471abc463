//! Scripted key input for tests and demos.
//!
//! ```
//! use shortcut_engine::testing::KeyScript;
//! use shortcut_engine::{FocusKind, KeyOutcome, ManualClock, ShortcutEngine, PresetStore, Platform};
//! use shortcut_engine::DispatcherConfig;
//! use std::sync::Arc;
//!
//! let store = Arc::new(PresetStore::with_builtins(Platform::Other));
//! let mut engine = ShortcutEngine::with_clock(store, DispatcherConfig::default(), ManualClock::new());
//! engine.register_action("nav.files", || {});
//!
//! let outcomes = KeyScript::new()
//!     .text("g")
//!     .delay(300)
//!     .text("f")
//!     .play(&mut engine, &mut FocusKind::None);
//! assert_eq!(outcomes.last(), Some(&KeyOutcome::Dispatched("nav.files".into())));
//! ```

use crate::engine::{KeyOutcome, ShortcutEngine};
use crate::guard::FocusContext;
use crate::platform::Platform;
use crate::timer::ManualClock;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Step {
    Press(KeyEvent),
    Wait(Duration),
}

/// Key presses and pauses, played against an engine on a [`ManualClock`].
#[derive(Debug, Clone, Default)]
pub struct KeyScript {
    steps: Vec<Step>,
}

impl KeyScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press `code` with `modifiers` held.
    pub fn press(&mut self, code: KeyCode, modifiers: KeyModifiers) -> &mut Self {
        self.push(code, modifiers, KeyEventKind::Press)
    }

    pub fn char(&mut self, c: char) -> &mut Self {
        self.press(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// One unmodified press per character.
    pub fn text(&mut self, s: &str) -> &mut Self {
        s.chars().fold(self, |script, c| script.char(c))
    }

    pub fn ctrl(&mut self, c: char) -> &mut Self {
        self.press(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// The primary modifier as `platform` reports it: Super on Apple, Control elsewhere.
    pub fn primary(&mut self, platform: Platform, c: char) -> &mut Self {
        let held = match platform {
            Platform::Apple => KeyModifiers::SUPER,
            Platform::Other => KeyModifiers::CONTROL,
        };
        self.press(KeyCode::Char(c), held)
    }

    pub fn alt(&mut self, c: char) -> &mut Self {
        self.press(KeyCode::Char(c), KeyModifiers::ALT)
    }

    /// Letters arrive uppercase, as terminals send them.
    pub fn shift(&mut self, c: char) -> &mut Self {
        self.press(KeyCode::Char(c.to_ascii_uppercase()), KeyModifiers::SHIFT)
    }

    /// Auto-repeat of a held character key.
    pub fn repeat(&mut self, c: char) -> &mut Self {
        self.push(KeyCode::Char(c), KeyModifiers::NONE, KeyEventKind::Repeat)
    }

    pub fn esc(&mut self) -> &mut Self {
        self.press(KeyCode::Esc, KeyModifiers::NONE)
    }

    pub fn enter(&mut self) -> &mut Self {
        self.press(KeyCode::Enter, KeyModifiers::NONE)
    }

    pub fn delay(&mut self, ms: u64) -> &mut Self {
        self.steps.push(Step::Wait(Duration::from_millis(ms)));
        self
    }

    pub fn key_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Press(_)))
            .count()
    }

    /// Feed the script to `engine`, one outcome per key.
    ///
    /// A pause advances the clock and then ticks, like a polling host.
    pub fn play(
        &self,
        engine: &mut ShortcutEngine<ManualClock>,
        focus: &mut dyn FocusContext,
    ) -> Vec<KeyOutcome> {
        let mut outcomes = Vec::with_capacity(self.key_count());
        for step in &self.steps {
            match step {
                Step::Press(event) => outcomes.push(engine.handle_key(event, focus)),
                Step::Wait(pause) => {
                    engine.clock().advance(*pause);
                    engine.tick();
                }
            }
        }
        outcomes
    }

    fn push(&mut self, code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> &mut Self {
        self.steps.push(Step::Press(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }));
        self
    }
}
