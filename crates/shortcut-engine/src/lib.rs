//! # shortcut-engine
//!
//! Keyboard shortcut dispatch for dashboard-style hosts.
//!
//! ## Features
//!
//! - Modifier combinations and timed multi-key sequences (`g d`)
//! - Swappable presets (default, vim, classic, or your own) with atomic switching
//! - Platform primary modifier (`mod`: Cmd on Apple platforms, Ctrl elsewhere)
//! - Text-editing guard: shortcuts never steal keys from text fields, Escape blurs
//! - Categorized binding data for help overlays
//! - Preset validation and a binding notation parser for configuration files
//!
//! ## Example
//!
//! ```no_run
//! use shortcut_engine::{FocusKind, ShortcutEngine};
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//!
//! let mut engine: ShortcutEngine = ShortcutEngine::default();
//! engine.register_action("nav.dashboard", || println!("dashboard"));
//!
//! let mut focus = FocusKind::None;
//! for c in ['g', 'd'] {
//!     engine.handle_key(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), &mut focus);
//! }
//! ```

mod binding;
mod catalog;
mod config;
mod dispatcher;
mod engine;
mod event;
mod guard;
mod help;
mod parser;
mod platform;
mod preset;
mod store;
pub mod testing;
mod timer;
mod validate;

pub use binding::{is_modifier_token, Binding, MalformedBinding, MODIFIER_TOKENS, PRIMARY_PLACEHOLDER};
pub use catalog::{descriptor, is_known, ActionDescriptor, ActionId, Category, CATALOG};
pub use config::{ConfigError, EngineConfig, PresetConfig};
pub use dispatcher::{
    Dispatcher, DispatcherConfig, MatchState, Step, DEFAULT_MAX_SEQUENCE_LEN,
    DEFAULT_SEQUENCE_TIMEOUT, SHIFTED_SYMBOLS,
};
pub use engine::{ActionHandler, ActionRegistry, KeyOutcome, ShortcutEngine};
pub use event::{key_token, normalize, Modifiers, NormalizedKey};
pub use guard::{check as check_input, FocusContext, FocusKind, GuardDecision};
pub use help::{categorized_bindings, render_help, HelpEntry, HelpSection, KeyDisplayConfig, KeyDisplayFormat};
pub use parser::{parse_binding, ParseError};
pub use platform::{Platform, CTRL_TOKEN, META_TOKEN};
pub use preset::{builtin_presets, BuiltinPreset, Preset};
pub use store::{ActiveBindings, PresetStore, ResolvedBinding};
pub use timer::{Clock, ManualClock, SystemClock, TimerHandle, TimerSlot};
pub use validate::{validate_preset, IssueKind, Severity, ValidationReport};
