//! Shortcut engine: the surface hosts talk to.

use crate::binding::Binding;
use crate::catalog::{self, ActionId};
use crate::dispatcher::{Dispatcher, DispatcherConfig, Step};
use crate::event::{normalize, NormalizedKey};
use crate::guard::{self, FocusContext, GuardDecision};
use crate::help::{categorized_bindings, HelpSection};
use crate::platform::Platform;
use crate::preset::Preset;
use crate::store::PresetStore;
use crate::timer::{Clock, SystemClock, TimerHandle};

use crossterm::event::KeyEvent;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Callback run when an action's shortcut is pressed.
pub type ActionHandler = Box<dyn FnMut()>;

/// What the engine did with a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The action's handler ran.
    Dispatched(ActionId),
    /// The key started or continued a sequence and was consumed.
    Pending,
    /// Escape inside a text widget; focus was removed.
    Blurred,
    /// Not a shortcut; the host should handle the key normally.
    Ignored,
}

impl KeyOutcome {
    /// Whether the host should skip its default handling of the key.
    pub fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Registered action handlers.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<ActionId, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for the same id.
    pub fn register(&mut self, id: ActionId, handler: ActionHandler) {
        if !catalog::is_known(id.as_str()) {
            warn!(action = %id, "registering handler for an action outside the catalog");
        }
        if self.handlers.insert(id.clone(), handler).is_some() {
            debug!(action = %id, "handler replaced");
        }
    }

    pub fn unregister(&mut self, id: &str) -> bool {
        self.handlers.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Run the handler for `id`. Returns whether one was registered.
    pub fn invoke(&mut self, id: &str) -> bool {
        match self.handlers.get_mut(id) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.handlers.keys().map(ActionId::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ActionRegistry").field("handlers", &ids).finish()
    }
}

/// Keyboard shortcut engine.
///
/// Feed it key events with [`ShortcutEngine::handle_key`]; it runs at most
/// one registered handler per event. Hosts that poll should call
/// [`ShortcutEngine::tick`] so abandoned sequences time out without waiting
/// for the next key.
pub struct ShortcutEngine<C: Clock = SystemClock> {
    store: Arc<PresetStore>,
    dispatcher: Dispatcher,
    registry: ActionRegistry,
    clock: C,
}

impl ShortcutEngine<SystemClock> {
    pub fn new(store: Arc<PresetStore>, config: DispatcherConfig) -> Self {
        Self::with_clock(store, config, SystemClock)
    }
}

impl Default for ShortcutEngine<SystemClock> {
    fn default() -> Self {
        Self::new(Arc::new(PresetStore::default()), DispatcherConfig::default())
    }
}

impl<C: Clock> ShortcutEngine<C> {
    pub fn with_clock(store: Arc<PresetStore>, config: DispatcherConfig, clock: C) -> Self {
        let dispatcher = Dispatcher::new(config, store.platform());
        Self {
            store,
            dispatcher,
            registry: ActionRegistry::new(),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn platform(&self) -> Platform {
        self.store.platform()
    }

    pub fn store(&self) -> &Arc<PresetStore> {
        &self.store
    }

    /// Register the handler for an action.
    pub fn register_action(&mut self, id: impl Into<ActionId>, handler: impl FnMut() + 'static) {
        self.registry.register(id.into(), Box::new(handler));
    }

    /// Remove an action's handler; its bindings go inert.
    pub fn unregister(&mut self, id: &str) -> bool {
        let removed = self.registry.unregister(id);
        if removed {
            // A pending prefix may only have been live through this action.
            self.dispatcher.reset();
        }
        removed
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    /// Switch presets. Unknown ids are ignored and return `false`.
    pub fn set_active_preset(&mut self, id: &str) -> bool {
        if !self.store.set_active_preset(id) {
            return false;
        }
        self.dispatcher.reset();
        true
    }

    pub fn active_preset_id(&self) -> String {
        self.store.active_preset_id()
    }

    pub fn presets(&self) -> &[Preset] {
        self.store.presets()
    }

    /// The active table, placeholders unresolved.
    pub fn active_bindings(&self) -> BTreeMap<ActionId, Binding> {
        self.store.active_bindings()
    }

    pub fn resolve_primary_modifier<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        self.store.resolve_primary_modifier(tokens)
    }

    /// Help data for the active preset, registered actions only.
    pub fn categorized_bindings(&self) -> Vec<HelpSection> {
        let registry = &self.registry;
        categorized_bindings(&self.store.active(), |id| registry.contains(id.as_str()))
    }

    /// Keys of the sequence in progress.
    pub fn pending_keys(&self) -> &[String] {
        self.dispatcher.state().buffer()
    }

    /// Handle a host key event.
    pub fn handle_key(&mut self, event: &KeyEvent, focus: &mut dyn FocusContext) -> KeyOutcome {
        match normalize(event, self.platform()) {
            Some(key) => self.handle_normalized(&key, focus),
            None => {
                trace!(?event, "event has no key token");
                KeyOutcome::Ignored
            }
        }
    }

    /// Handle an already normalized key.
    pub fn handle_normalized(
        &mut self,
        key: &NormalizedKey,
        focus: &mut dyn FocusContext,
    ) -> KeyOutcome {
        match guard::check(key, focus.focus_kind()) {
            GuardDecision::Proceed => {}
            GuardDecision::Blur => {
                debug!("escape in text field, blurring");
                focus.blur();
                return KeyOutcome::Blurred;
            }
            GuardDecision::Suppress => {
                trace!(%key, "text field has focus, not dispatching");
                return KeyOutcome::Ignored;
            }
        }

        let active = self.store.active();
        let registry = &self.registry;
        let step = self.dispatcher.handle(
            key,
            &active,
            |id| registry.contains(id.as_str()),
            self.clock.now(),
        );

        match step {
            Step::Dispatch(id) => {
                self.registry.invoke(id.as_str());
                KeyOutcome::Dispatched(id)
            }
            Step::Pending => KeyOutcome::Pending,
            Step::Unmatched => KeyOutcome::Ignored,
        }
    }

    /// Expire the pending sequence if its window has passed.
    pub fn tick(&mut self) -> bool {
        self.dispatcher.expire(self.clock.now())
    }

    /// How long a polling host may wait before calling [`ShortcutEngine::tick`].
    pub fn time_until_timeout(&self) -> Option<Duration> {
        self.dispatcher.time_until_timeout(self.clock.now())
    }

    /// Handle of the pending abandonment timer.
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.dispatcher.pending_timer()
    }

    /// Timer callback for hosts that schedule the abandonment timer themselves.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        self.dispatcher.on_timer(handle)
    }
}

impl<C: Clock> std::fmt::Debug for ShortcutEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutEngine")
            .field("preset", &self.store.active_preset_id())
            .field("dispatcher", &self.dispatcher)
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::FocusKind;
    use crate::timer::ManualClock;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> (ShortcutEngine<ManualClock>, Rc<RefCell<Vec<String>>>) {
        let store = Arc::new(PresetStore::with_builtins(Platform::Other));
        let mut engine = ShortcutEngine::with_clock(store, DispatcherConfig::default(), ManualClock::new());
        let fired = Rc::new(RefCell::new(Vec::new()));
        for action in catalog::CATALOG {
            let fired = Rc::clone(&fired);
            let id = action.id;
            engine.register_action(id, move || fired.borrow_mut().push(id.to_string()));
        }
        (engine, fired)
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_dispatch_runs_handler_once() {
        let (mut engine, fired) = engine();
        let mut focus = FocusKind::None;
        assert_eq!(engine.handle_key(&key('g'), &mut focus), KeyOutcome::Pending);
        assert_eq!(engine.pending_keys(), ["g"]);
        assert_eq!(
            engine.handle_key(&key('d'), &mut focus),
            KeyOutcome::Dispatched(ActionId::from("nav.dashboard"))
        );
        assert_eq!(*fired.borrow(), vec!["nav.dashboard"]);
        assert!(engine.pending_keys().is_empty());
    }

    #[test]
    fn test_text_field_suppresses() {
        let (mut engine, fired) = engine();
        let mut focus = FocusKind::TextInput;
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(engine.handle_key(&ctrl_k, &mut focus), KeyOutcome::Ignored);
        assert_eq!(engine.handle_key(&key('g'), &mut focus), KeyOutcome::Ignored);
        assert!(engine.pending_keys().is_empty());
        assert!(fired.borrow().is_empty());
    }

    #[test]
    fn test_escape_blurs_without_close() {
        let (mut engine, fired) = engine();
        let mut focus = FocusKind::TextArea;
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(engine.handle_key(&esc, &mut focus), KeyOutcome::Blurred);
        assert_eq!(focus, FocusKind::None);
        assert!(fired.borrow().is_empty());

        // Out of the text field, escape is an ordinary shortcut again.
        assert_eq!(
            engine.handle_key(&esc, &mut focus),
            KeyOutcome::Dispatched(ActionId::from("ui.close"))
        );
    }

    #[test]
    fn test_unregistered_action_inert() {
        let (mut engine, fired) = engine();
        let mut focus = FocusKind::None;
        assert!(engine.unregister("ui.toggle_sidebar"));
        assert!(!engine.unregister("ui.toggle_sidebar"));
        let ctrl_b = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert_eq!(engine.handle_key(&ctrl_b, &mut focus), KeyOutcome::Ignored);
        assert!(fired.borrow().is_empty());
        assert!(engine
            .categorized_bindings()
            .iter()
            .flat_map(|s| &s.entries)
            .all(|e| e.action.as_str() != "ui.toggle_sidebar"));
    }

    #[test]
    fn test_set_active_preset() {
        let (mut engine, fired) = engine();
        let mut focus = FocusKind::None;
        assert_eq!(engine.handle_key(&key('g'), &mut focus), KeyOutcome::Pending);
        assert!(!engine.set_active_preset("missing"));
        assert_eq!(engine.pending_keys(), ["g"]);

        assert!(engine.set_active_preset("vim"));
        assert!(engine.pending_keys().is_empty());
        assert_eq!(engine.active_preset_id(), "vim");
        assert_eq!(
            engine.handle_key(&key('j'), &mut focus),
            KeyOutcome::Dispatched(ActionId::from("list.next"))
        );
        assert_eq!(*fired.borrow(), vec!["list.next"]);
    }

    #[test]
    fn test_tick_expires() {
        let (mut engine, _) = engine();
        let mut focus = FocusKind::None;
        engine.handle_key(&key('g'), &mut focus);
        assert_eq!(engine.time_until_timeout(), Some(Duration::from_millis(1000)));
        engine.clock().advance_ms(999);
        assert!(!engine.tick());
        engine.clock().advance_ms(1);
        assert!(engine.tick());
        assert!(engine.pending_keys().is_empty());
        assert_eq!(engine.time_until_timeout(), None);
    }

    #[test]
    fn test_outcome_consumed() {
        assert!(KeyOutcome::Pending.is_consumed());
        assert!(KeyOutcome::Blurred.is_consumed());
        assert!(KeyOutcome::Dispatched(ActionId::from("ui.help")).is_consumed());
        assert!(!KeyOutcome::Ignored.is_consumed());
    }

    #[test]
    fn test_registry_replace() {
        let mut registry = ActionRegistry::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        registry.register(ActionId::from("ui.help"), Box::new(move || *c.borrow_mut() += 1));
        let c = Rc::clone(&count);
        registry.register(ActionId::from("ui.help"), Box::new(move || *c.borrow_mut() += 10));
        assert_eq!(registry.len(), 1);
        assert!(registry.invoke("ui.help"));
        assert!(!registry.invoke("ui.close"));
        assert_eq!(*count.borrow(), 10);
    }
}
