//! Sequence dispatcher: the key-by-key matching state machine.
//!
//! Per event, in priority order:
//! 1. Combinations: the held modifiers plus the key must equal a combination
//!    binding exactly. A hit fires immediately and drops any pending sequence.
//! 2. Sequences, only without the primary modifier or alt: the key is
//!    appended to the buffer and the abandonment timer restarts. An exact
//!    sequence fires; a strict prefix waits; otherwise a plain single-key
//!    binding may still fire (shift allowed only for shifted punctuation).
//!    A buffer that grows past the cap without matching is dropped.
//! 3. Timeout: an expired timer drops the buffer without dispatching.

use crate::catalog::ActionId;
use crate::event::NormalizedKey;
use crate::platform::Platform;
use crate::store::{ActiveBindings, ResolvedBinding};
use crate::timer::{TimerHandle, TimerSlot};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Abandonment window for an in-progress sequence.
pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Unmatched tokens tolerated before the buffer is dropped.
pub const DEFAULT_MAX_SEQUENCE_LEN: usize = 4;

/// Characters that need shift to type; shift does not disqualify them from
/// single-key bindings.
pub const SHIFTED_SYMBOLS: [&str; 21] = [
    "!", "@", "#", "$", "%", "^", "&", "*", "(", ")", "_", "+", "{", "}", "|", ":", "\"", "<",
    ">", "?", "~",
];

/// Tuning for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub sequence_timeout: Duration,
    pub max_sequence_len: usize,
    /// Keep auto-repeat events out of the sequence buffer.
    pub ignore_key_repeat: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            sequence_timeout: DEFAULT_SEQUENCE_TIMEOUT,
            max_sequence_len: DEFAULT_MAX_SEQUENCE_LEN,
            ignore_key_repeat: false,
        }
    }
}

/// Result of feeding one key to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A binding matched; its action should run once.
    Dispatch(ActionId),
    /// The buffer is a prefix of a sequence; the key is consumed.
    Pending,
    /// Nothing matched; the host keeps the key.
    Unmatched,
}

/// Buffer and timer of an in-progress sequence.
#[derive(Debug, Default)]
pub struct MatchState {
    buffer: Vec<String>,
    timer: TimerSlot,
}

impl MatchState {
    pub fn buffer(&self) -> &[String] {
        &self.buffer
    }

    pub fn is_idle(&self) -> bool {
        self.buffer.is_empty() && !self.timer.is_pending()
    }

    pub fn timer(&self) -> &TimerSlot {
        &self.timer
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.timer.cancel();
    }
}

/// Stateful matcher over the active bindings.
#[derive(Debug)]
pub struct Dispatcher {
    config: DispatcherConfig,
    platform: Platform,
    state: MatchState,
    seen_generation: Option<u64>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig, platform: Platform) -> Self {
        Self {
            config,
            platform,
            state: MatchState::default(),
            seen_generation: None,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Drop any in-progress sequence.
    pub fn reset(&mut self) {
        if !self.state.is_idle() {
            trace!(buffer = ?self.state.buffer, "match state reset");
        }
        self.state.reset();
    }

    /// Handle of the pending abandonment timer, for hosts that schedule it
    /// on their own event loop.
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.state.timer.current()
    }

    /// Time left before the pending sequence is abandoned.
    pub fn time_until_timeout(&self, now: Instant) -> Option<Duration> {
        self.state.timer.remaining(now)
    }

    /// Abandon the pending sequence if its deadline has passed.
    ///
    /// Returns whether a sequence was abandoned.
    pub fn expire(&mut self, now: Instant) -> bool {
        if !self.state.timer.is_due(now) {
            return false;
        }
        debug!(buffer = ?self.state.buffer, "sequence timed out");
        self.state.reset();
        true
    }

    /// Timer callback from an external scheduler. Stale handles do nothing.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if !self.state.timer.is_current(handle) {
            return false;
        }
        debug!(buffer = ?self.state.buffer, "sequence timed out");
        self.state.reset();
        true
    }

    /// Feed one key that has passed the input guard.
    ///
    /// `is_live` filters out bindings whose action has no handler.
    pub fn handle(
        &mut self,
        key: &NormalizedKey,
        bindings: &ActiveBindings,
        is_live: impl Fn(&ActionId) -> bool,
        now: Instant,
    ) -> Step {
        self.sync_generation(bindings);
        self.expire(now);

        let mut live = bindings.resolved().iter().filter(|b| is_live(&b.action));

        let combo = key.combo(self.platform);
        if let Some(hit) = live.clone().find(|b| b.matches_combo(&combo)) {
            return self.fire(hit, "combo");
        }

        if key.has_primary() || key.has_secondary() || key.has_alt() {
            trace!(%key, "modified key with no combination bound");
            return Step::Unmatched;
        }
        if key.repeat && self.config.ignore_key_repeat {
            trace!(%key, "auto-repeat kept out of sequence buffer");
            return Step::Unmatched;
        }

        self.state.buffer.push(key.token.clone());
        self.state.timer.schedule(now, self.config.sequence_timeout);
        let buffer = self.state.buffer.as_slice();

        if let Some(hit) = live.clone().find(|b| b.matches_sequence(buffer)) {
            return self.fire(hit, "sequence");
        }

        if live.clone().any(|b| b.has_strict_prefix(buffer)) {
            trace!(buffer = ?buffer, "sequence prefix, waiting for next key");
            return Step::Pending;
        }

        let shift_ok = !key.has_shift() || SHIFTED_SYMBOLS.contains(&key.token.as_str());
        if shift_ok {
            if let Some(hit) = live.find(|b| b.single_key() == Some(key.token.as_str())) {
                return self.fire(hit, "single key");
            }
        }

        if self.state.buffer.len() > self.config.max_sequence_len {
            debug!(buffer = ?self.state.buffer, "unmatched sequence over cap, dropping");
            self.state.reset();
        }
        Step::Unmatched
    }

    fn fire(&mut self, hit: &ResolvedBinding, kind: &'static str) -> Step {
        debug!(action = %hit.action, keys = ?hit.keys, kind, "shortcut matched");
        self.state.reset();
        Step::Dispatch(hit.action.clone())
    }

    fn sync_generation(&mut self, bindings: &ActiveBindings) {
        let generation = bindings.generation();
        if self.seen_generation.is_some_and(|seen| seen != generation) {
            debug!(preset = bindings.preset_id(), "preset changed, dropping pending sequence");
            self.state.reset();
        }
        self.seen_generation = Some(generation);
    }
}
