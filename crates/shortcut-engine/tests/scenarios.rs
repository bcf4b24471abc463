//! End-to-end shortcut scenarios against the built-in presets.

use crossterm::event::{KeyCode, KeyModifiers};
use shortcut_engine::testing::KeyScript;
use shortcut_engine::{
    ActionId, Binding, DispatcherConfig, FocusKind, KeyOutcome, ManualClock, Platform, Preset,
    PresetStore, ShortcutEngine, CATALOG,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

type Fired = Rc<RefCell<Vec<&'static str>>>;

fn engine_with(preset: &str, platform: Platform) -> (ShortcutEngine<ManualClock>, Fired) {
    let store = Arc::new(PresetStore::with_builtins(platform));
    let mut engine =
        ShortcutEngine::with_clock(store, DispatcherConfig::default(), ManualClock::new());
    assert!(engine.set_active_preset(preset));

    let fired: Fired = Rc::new(RefCell::new(Vec::new()));
    for action in CATALOG {
        let fired = Rc::clone(&fired);
        let id = action.id;
        engine.register_action(id, move || fired.borrow_mut().push(id));
    }
    (engine, fired)
}

fn engine(preset: &str) -> (ShortcutEngine<ManualClock>, Fired) {
    engine_with(preset, Platform::Other)
}

fn dispatched(id: &str) -> KeyOutcome {
    KeyOutcome::Dispatched(ActionId::from(id))
}

#[test]
fn go_to_dashboard_sequence() {
    let (mut engine, fired) = engine("default");
    let mut focus = FocusKind::None;

    let outcomes = KeyScript::new()
        .char('g')
        .delay(400)
        .char('d')
        .play(&mut engine, &mut focus);

    assert_eq!(outcomes, vec![KeyOutcome::Pending, dispatched("nav.dashboard")]);
    assert_eq!(*fired.borrow(), vec!["nav.dashboard"]);
    assert!(engine.pending_keys().is_empty());
    assert!(engine.pending_timer().is_none());
}

#[test]
fn timeout_abandons_sequence() {
    let (mut engine, fired) = engine("default");
    let mut focus = FocusKind::None;

    let outcomes = KeyScript::new()
        .char('g')
        .delay(1200)
        .char('d')
        .play(&mut engine, &mut focus);

    assert_eq!(outcomes, vec![KeyOutcome::Pending, KeyOutcome::Ignored]);
    assert!(fired.borrow().is_empty());
}

#[test]
fn timeout_falls_through_to_single_key() {
    // Vim binds "k" alone; "g" then "k" after the window only moves up.
    let (mut engine, fired) = engine("vim");
    let mut focus = FocusKind::None;

    let outcomes = KeyScript::new()
        .char('g')
        .delay(1001)
        .char('k')
        .play(&mut engine, &mut focus);

    assert_eq!(outcomes, vec![KeyOutcome::Pending, dispatched("list.prev")]);
    assert_eq!(*fired.borrow(), vec!["list.prev"]);
}

#[test]
fn timeout_without_tick_expires_on_next_key() {
    let (mut engine, fired) = engine("default");
    let mut focus = FocusKind::None;

    KeyScript::new().char('g').play(&mut engine, &mut focus);
    engine.clock().advance_ms(1500);
    KeyScript::new().char('d').play(&mut engine, &mut focus);

    assert!(fired.borrow().is_empty());
    assert_eq!(engine.pending_keys(), ["d"]);
}

#[test]
fn combo_cancels_pending_sequence() {
    let (mut engine, fired) = engine("default");
    let mut focus = FocusKind::None;

    let outcomes = KeyScript::new()
        .char('g')
        .ctrl('b')
        .char('d')
        .play(&mut engine, &mut focus);

    assert_eq!(
        outcomes,
        vec![
            KeyOutcome::Pending,
            dispatched("ui.toggle_sidebar"),
            KeyOutcome::Ignored
        ]
    );
    assert_eq!(*fired.borrow(), vec!["ui.toggle_sidebar"]);
}

#[test]
fn preset_switch_is_atomic() {
    let (mut engine, fired) = engine("default");
    let mut focus = FocusKind::None;

    KeyScript::new().char('g').play(&mut engine, &mut focus);
    assert!(engine.set_active_preset("classic"));

    // Classic has no sequences; neither the old buffer nor "g d" survives.
    let outcomes = KeyScript::new()
        .char('d')
        .char('g')
        .char('d')
        .play(&mut engine, &mut focus);
    assert!(outcomes.iter().all(|o| *o == KeyOutcome::Ignored));
    assert!(fired.borrow().is_empty());

    let outcomes = KeyScript::new().ctrl('1').play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![dispatched("nav.dashboard")]);
}

#[test]
fn preset_switch_through_shared_store() {
    let (mut engine, fired) = engine("default");
    let mut focus = FocusKind::None;
    let store = Arc::clone(engine.store());

    KeyScript::new().char('d').play(&mut engine, &mut focus);
    assert!(store.set_active_preset("vim"));

    // The "d" typed under the old preset must not complete "d d".
    let outcomes = KeyScript::new().char('d').play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![KeyOutcome::Pending]);
    assert!(fired.borrow().is_empty());

    let outcomes = KeyScript::new().char('d').play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![dispatched("file.delete")]);
}

#[test]
fn text_field_blocks_everything_but_escape() {
    let (mut engine, fired) = engine("default");
    let mut focus = FocusKind::TextInput;

    let outcomes = KeyScript::new()
        .text("gd")
        .ctrl('k')
        .shift('?')
        .play(&mut engine, &mut focus);
    assert!(outcomes.iter().all(|o| *o == KeyOutcome::Ignored));
    assert!(engine.pending_keys().is_empty());

    let outcomes = KeyScript::new().esc().play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![KeyOutcome::Blurred]);
    assert_eq!(focus, FocusKind::None);
    assert!(fired.borrow().is_empty());
}

#[test]
fn unmatched_buffer_resets_past_cap() {
    let (mut engine, fired) = engine("default");
    let mut focus = FocusKind::None;

    KeyScript::new().text("xqzw").play(&mut engine, &mut focus);
    assert_eq!(engine.pending_keys().len(), 4);

    KeyScript::new().char('v').play(&mut engine, &mut focus);
    assert!(engine.pending_keys().is_empty());
    assert!(engine.pending_timer().is_none());
    assert!(fired.borrow().is_empty());
}

#[test]
fn vim_delete_sequence() {
    let (mut engine, fired) = engine("vim");
    let mut focus = FocusKind::None;

    let outcomes = KeyScript::new()
        .char('d')
        .delay(200)
        .char('d')
        .play(&mut engine, &mut focus);

    assert_eq!(outcomes, vec![KeyOutcome::Pending, dispatched("file.delete")]);
    assert_eq!(*fired.borrow(), vec!["file.delete"]);
}

#[test]
fn shifted_question_mark_opens_help_in_every_preset() {
    for preset in ["default", "vim", "classic"] {
        let (mut engine, fired) = engine(preset);
        let mut focus = FocusKind::None;
        let outcomes = KeyScript::new().shift('?').play(&mut engine, &mut focus);
        assert_eq!(outcomes, vec![dispatched("ui.help")], "{preset}");
        assert_eq!(*fired.borrow(), vec!["ui.help"]);
    }
}

#[test]
fn unbound_primary_combo_leaves_buffer() {
    let (mut engine, fired) = engine("vim");
    let mut focus = FocusKind::None;

    let outcomes = KeyScript::new()
        .char('g')
        .ctrl('k')
        .play(&mut engine, &mut focus);

    assert_eq!(outcomes, vec![KeyOutcome::Pending, KeyOutcome::Ignored]);
    assert_eq!(engine.pending_keys(), ["g"]);
    assert!(fired.borrow().is_empty());

    // The sequence is still alive.
    let outcomes = KeyScript::new().char('g').play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![dispatched("list.first")]);
}

#[test]
fn primary_modifier_follows_platform() {
    for platform in [Platform::Apple, Platform::Other] {
        let (mut engine, fired) = engine_with("default", platform);
        let mut focus = FocusKind::None;
        let outcomes = KeyScript::new()
            .primary(platform, 'k')
            .play(&mut engine, &mut focus);
        assert_eq!(outcomes, vec![dispatched("search.command_palette")]);
        assert_eq!(*fired.borrow(), vec!["search.command_palette"]);
    }

    let (mut engine, fired) = engine_with("default", Platform::Apple);
    let mut focus = FocusKind::None;
    let outcomes = KeyScript::new().ctrl('k').play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![KeyOutcome::Ignored]);
    assert!(engine.pending_keys().is_empty());
    assert!(fired.borrow().is_empty());
}

#[test]
fn non_primary_control_is_not_a_plain_key() {
    let (mut engine, fired) = engine_with("vim", Platform::Apple);
    let mut focus = FocusKind::None;
    let outcomes = KeyScript::new()
        .ctrl('j')
        .ctrl('d')
        .ctrl('d')
        .play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![KeyOutcome::Ignored; 3]);
    assert!(engine.pending_keys().is_empty());
    assert!(fired.borrow().is_empty());

    let (mut engine, fired) = engine_with("vim", Platform::Other);
    let outcomes = KeyScript::new()
        .press(KeyCode::Char('j'), KeyModifiers::SUPER)
        .play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![KeyOutcome::Ignored]);
    assert!(engine.pending_keys().is_empty());
    assert!(fired.borrow().is_empty());
}

#[test]
fn literal_modifier_binding_matches_on_either_platform() {
    for platform in [Platform::Apple, Platform::Other] {
        let preset = Preset::new("custom", "Custom")
            .with("list.next", Binding::combo(&["ctrl", "n"]))
            .with("list.prev", Binding::combo(&["meta", "p"]));
        let store = Arc::new(PresetStore::new(vec![preset], platform));
        let mut engine =
            ShortcutEngine::with_clock(store, DispatcherConfig::default(), ManualClock::new());
        engine.register_action("list.next", || {});
        engine.register_action("list.prev", || {});

        let mut focus = FocusKind::None;
        let outcomes = KeyScript::new()
            .ctrl('n')
            .press(KeyCode::Char('p'), KeyModifiers::SUPER)
            .play(&mut engine, &mut focus);
        assert_eq!(outcomes, vec![dispatched("list.next"), dispatched("list.prev")]);
    }
}

#[test]
fn capital_letter_does_not_fire_lowercase_binding() {
    let (mut engine, fired) = engine("vim");
    let mut focus = FocusKind::None;

    let outcomes = KeyScript::new().shift('j').play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![KeyOutcome::Ignored]);

    let outcomes = KeyScript::new().shift('g').play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![dispatched("list.last")]);
    assert_eq!(*fired.borrow(), vec!["list.last"]);
}

#[test]
fn key_repeat_completes_sequence_by_default() {
    let (mut engine, fired) = engine("vim");
    let mut focus = FocusKind::None;

    let outcomes = KeyScript::new()
        .char('d')
        .repeat('d')
        .play(&mut engine, &mut focus);
    assert_eq!(outcomes, vec![KeyOutcome::Pending, dispatched("file.delete")]);
    assert_eq!(fired.borrow().len(), 1);
}

#[test]
fn key_repeat_ignored_when_configured() {
    let store = Arc::new(PresetStore::with_builtins(Platform::Other));
    let config = DispatcherConfig {
        ignore_key_repeat: true,
        ..DispatcherConfig::default()
    };
    let mut engine = ShortcutEngine::with_clock(store, config, ManualClock::new());
    engine.set_active_preset("vim");
    engine.register_action("file.delete", || {});
    engine.register_action("list.next", || {});
    let mut focus = FocusKind::None;

    let outcomes = KeyScript::new()
        .char('d')
        .repeat('d')
        .repeat('j')
        .play(&mut engine, &mut focus);
    // Repeats still reach combinations, so a held "j" keeps moving.
    assert_eq!(
        outcomes,
        vec![KeyOutcome::Pending, KeyOutcome::Ignored, dispatched("list.next")]
    );
}

#[test]
fn help_lists_resolved_keys() {
    let (engine, _) = engine_with("default", Platform::Apple);
    let sections = engine.categorized_bindings();
    let palette = sections
        .iter()
        .flat_map(|s| &s.entries)
        .find(|e| e.action.as_str() == "search.command_palette")
        .unwrap();
    assert_eq!(palette.keys, vec!["meta", "k"]);
    assert!(!palette.is_sequence);

    let bindings = engine.active_bindings();
    assert_eq!(bindings["search.command_palette"].keys, vec!["mod", "k"]);
}
