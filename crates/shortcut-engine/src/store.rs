//! Preset store: owns the presets and the active binding table.

use crate::binding::Binding;
use crate::catalog::{self, ActionId};
use crate::platform::Platform;
use crate::preset::{builtin_presets, Preset};
use arc_swap::ArcSwap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// A binding with the primary-modifier placeholder resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub action: ActionId,
    /// Resolved tokens, in binding order.
    pub keys: Vec<String>,
    pub is_sequence: bool,
    token_set: BTreeSet<String>,
}

impl ResolvedBinding {
    fn new(action: ActionId, binding: &Binding, platform: Platform) -> Self {
        let keys = platform.resolve_primary_modifier(&binding.keys);
        let token_set = keys.iter().cloned().collect();
        Self {
            action,
            keys,
            is_sequence: binding.is_sequence,
            token_set,
        }
    }

    /// Exact set equality against a held combination.
    pub fn matches_combo(&self, combo: &BTreeSet<String>) -> bool {
        !self.is_sequence && self.keys.len() == combo.len() && self.token_set == *combo
    }

    /// Whether `buffer` equals this sequence.
    pub fn matches_sequence(&self, buffer: &[String]) -> bool {
        self.is_sequence && self.keys.as_slice() == buffer
    }

    /// Whether `buffer` is a strict prefix of this sequence.
    pub fn has_strict_prefix(&self, buffer: &[String]) -> bool {
        self.is_sequence && buffer.len() < self.keys.len() && self.keys.starts_with(buffer)
    }

    /// The token of a plain single-key combination.
    pub fn single_key(&self) -> Option<&str> {
        if self.is_sequence || self.keys.len() != 1 {
            return None;
        }
        let key = self.keys[0].as_str();
        (!crate::binding::is_modifier_token(key)).then_some(key)
    }
}

/// Snapshot of the active preset.
///
/// Snapshots are immutable; a preset switch publishes a new one.
#[derive(Debug)]
pub struct ActiveBindings {
    preset_id: String,
    generation: u64,
    bindings: BTreeMap<ActionId, Binding>,
    resolved: Vec<ResolvedBinding>,
}

impl ActiveBindings {
    fn build(preset: &Preset, platform: Platform, generation: u64) -> Self {
        let mut resolved = Vec::with_capacity(preset.bindings.len());
        for (action, binding) in &preset.bindings {
            if !catalog::is_known(action.as_str()) {
                warn!(preset = %preset.id, %action, "ignoring binding for unknown action");
                continue;
            }
            if let Err(err) = binding.check() {
                warn!(preset = %preset.id, %action, %err, "ignoring malformed binding");
                continue;
            }
            resolved.push(ResolvedBinding::new(action.clone(), binding, platform));
        }

        Self {
            preset_id: preset.id.clone(),
            generation,
            bindings: preset.bindings.clone(),
            resolved,
        }
    }

    fn empty() -> Self {
        Self {
            preset_id: String::new(),
            generation: 0,
            bindings: BTreeMap::new(),
            resolved: Vec::new(),
        }
    }

    pub fn preset_id(&self) -> &str {
        &self.preset_id
    }

    /// Increases with every successful preset switch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The table as defined, placeholders unresolved.
    pub fn bindings(&self) -> &BTreeMap<ActionId, Binding> {
        &self.bindings
    }

    /// Bindings the matcher works from: catalog actions only, placeholders resolved.
    pub fn resolved(&self) -> &[ResolvedBinding] {
        &self.resolved
    }

    pub fn resolved_for(&self, action: &str) -> Option<&ResolvedBinding> {
        self.resolved.iter().find(|r| r.action.as_str() == action)
    }
}

/// Owns the known presets and publishes the active one atomically.
pub struct PresetStore {
    presets: Vec<Preset>,
    platform: Platform,
    active: ArcSwap<ActiveBindings>,
    generation: AtomicU64,
}

impl PresetStore {
    /// Create a store; the first preset starts active.
    pub fn new(presets: Vec<Preset>, platform: Platform) -> Self {
        let active = presets
            .first()
            .map(|p| ActiveBindings::build(p, platform, 0))
            .unwrap_or_else(ActiveBindings::empty);

        Self {
            presets,
            platform,
            active: ArcSwap::from_pointee(active),
            generation: AtomicU64::new(0),
        }
    }

    /// Create a store holding the built-in presets.
    pub fn with_builtins(platform: Platform) -> Self {
        Self::new(builtin_presets(), platform)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Current snapshot. Holding it keeps the table alive across a switch.
    pub fn active(&self) -> Arc<ActiveBindings> {
        self.active.load_full()
    }

    pub fn active_preset_id(&self) -> String {
        self.active.load().preset_id.clone()
    }

    /// The active table with placeholders left unresolved.
    pub fn active_bindings(&self) -> BTreeMap<ActionId, Binding> {
        self.active.load().bindings.clone()
    }

    /// Resolve the placeholder for this store's platform.
    pub fn resolve_primary_modifier<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        self.platform.resolve_primary_modifier(tokens)
    }

    /// Switch the active preset.
    ///
    /// Unknown ids leave the current table in place and return `false`.
    pub fn set_active_preset(&self, id: &str) -> bool {
        let Some(preset) = self.preset(id) else {
            warn!(preset = id, "unknown preset, keeping current bindings");
            return false;
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let table = ActiveBindings::build(preset, self.platform, generation);
        self.active.store(Arc::new(table));
        debug!(preset = id, generation, "active preset switched");
        true
    }
}

impl Default for PresetStore {
    fn default() -> Self {
        Self::with_builtins(Platform::current())
    }
}
