use proptest::prelude::*;
use shortcut_engine::{
    DispatcherConfig, FocusKind, KeyOutcome, ManualClock, Modifiers, NormalizedKey, Platform,
    PresetStore, ShortcutEngine, CATALOG, DEFAULT_MAX_SEQUENCE_LEN,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Input {
    Key(NormalizedKey),
    Wait(u64),
    Switch(&'static str),
}

fn token() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "g", "d", "f", "y", "c", "w", "j", "k", "x", "?", "/", ":", "b", "1", "escape", "enter",
        "down", "f2",
    ])
}

fn modifiers() -> impl Strategy<Value = Modifiers> {
    prop_oneof![
        6 => Just(Modifiers::empty()),
        1 => Just(Modifiers::PRIMARY),
        1 => Just(Modifiers::SHIFT),
        1 => Just(Modifiers::ALT),
        1 => Just(Modifiers::SECONDARY),
        1 => Just(Modifiers::PRIMARY | Modifiers::SHIFT),
    ]
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        8 => (token(), modifiers()).prop_map(|(t, m)| Input::Key(NormalizedKey::new(t, m))),
        2 => (0u64..1500).prop_map(Input::Wait),
        1 => prop::sample::select(vec!["default", "vim", "classic"]).prop_map(Input::Switch),
    ]
}

fn counting_engine() -> (ShortcutEngine<ManualClock>, Rc<RefCell<usize>>) {
    let store = Arc::new(PresetStore::with_builtins(Platform::Other));
    let mut engine =
        ShortcutEngine::with_clock(store, DispatcherConfig::default(), ManualClock::new());
    let count = Rc::new(RefCell::new(0));
    for action in CATALOG {
        let count = Rc::clone(&count);
        engine.register_action(action.id, move || *count.borrow_mut() += 1);
    }
    (engine, count)
}

proptest! {
    #[test]
    fn buffer_never_exceeds_cap(inputs in prop::collection::vec(input(), 0..64)) {
        let (mut engine, _) = counting_engine();
        let mut focus = FocusKind::None;
        for input in inputs {
            match input {
                Input::Key(key) => {
                    engine.handle_normalized(&key, &mut focus);
                }
                Input::Wait(ms) => {
                    engine.clock().advance_ms(ms);
                    engine.tick();
                }
                Input::Switch(id) => {
                    engine.set_active_preset(id);
                }
            }
            prop_assert!(engine.pending_keys().len() <= DEFAULT_MAX_SEQUENCE_LEN);
        }
    }

    #[test]
    fn at_most_one_dispatch_per_event(inputs in prop::collection::vec(input(), 0..64)) {
        let (mut engine, count) = counting_engine();
        let mut focus = FocusKind::None;
        for input in inputs {
            let before = *count.borrow();
            let outcome = match input {
                Input::Key(key) => engine.handle_normalized(&key, &mut focus),
                Input::Wait(ms) => {
                    engine.clock().advance_ms(ms);
                    engine.tick();
                    KeyOutcome::Ignored
                }
                Input::Switch(id) => {
                    engine.set_active_preset(id);
                    KeyOutcome::Ignored
                }
            };
            let fired = *count.borrow() - before;
            let expected = usize::from(matches!(outcome, KeyOutcome::Dispatched(_)));
            prop_assert_eq!(fired, expected);
        }
    }

    #[test]
    fn text_focus_never_dispatches(inputs in prop::collection::vec(input(), 0..32)) {
        let (mut engine, count) = counting_engine();
        let mut focus = FocusKind::TextArea;
        for input in inputs {
            if let Input::Key(key) = input {
                if key.is_escape() {
                    continue;
                }
                prop_assert_eq!(engine.handle_normalized(&key, &mut focus), KeyOutcome::Ignored);
            }
        }
        prop_assert_eq!(*count.borrow(), 0);
        prop_assert!(engine.pending_keys().is_empty());
    }

    #[test]
    fn resolved_bindings_never_contain_placeholder(
        preset in prop::sample::select(vec!["default", "vim", "classic"]),
        apple in any::<bool>(),
    ) {
        let platform = if apple { Platform::Apple } else { Platform::Other };
        let store = PresetStore::with_builtins(platform);
        prop_assert!(store.set_active_preset(preset));
        for binding in store.active().resolved() {
            prop_assert!(binding.keys.iter().all(|k| k != "mod"));
        }
    }
}
