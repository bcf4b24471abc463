//! Engine configuration.

use crate::dispatcher::{DispatcherConfig, DEFAULT_MAX_SEQUENCE_LEN, DEFAULT_SEQUENCE_TIMEOUT};
use crate::engine::ShortcutEngine;
use crate::help::KeyDisplayConfig;
use crate::parser::{parse_binding, ParseError};
use crate::platform::Platform;
use crate::preset::{builtin_presets, Preset};
use crate::store::PresetStore;
use crate::validate::{validate_preset, ValidationReport};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Error loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("preset '{preset}', action '{action}': {source}")]
    Binding {
        preset: String,
        action: String,
        #[source]
        source: ParseError,
    },
    #[error("preset rejected:\n{0}")]
    InvalidPreset(ValidationReport),
}

/// A preset defined in the configuration file.
///
/// ```toml
/// [[presets]]
/// id = "mine"
/// name = "Mine"
///
/// [presets.bindings]
/// "nav.dashboard" = "g h"
/// "search.command_palette" = "mod+p"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Action id to binding notation.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

impl PresetConfig {
    /// Parse every binding notation into a [`Preset`].
    pub fn to_preset(&self) -> Result<Preset, ConfigError> {
        let mut preset =
            Preset::new(self.id.clone(), self.name.clone()).with_description(self.description.clone());
        for (action, notation) in &self.bindings {
            let binding = parse_binding(notation).map_err(|source| ConfigError::Binding {
                preset: self.id.clone(),
                action: action.clone(),
                source,
            })?;
            preset.bind(action.as_str(), binding);
        }
        Ok(preset)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Preset active at start-up.
    #[serde(default = "default_preset")]
    pub preset: String,
    /// Abandonment window for key sequences.
    #[serde(default = "default_timeout_ms")]
    pub sequence_timeout_ms: u64,
    /// Unmatched keys kept before the sequence buffer is dropped.
    #[serde(default = "default_max_len")]
    pub max_sequence_len: usize,
    /// Keep auto-repeat events out of key sequences.
    #[serde(default)]
    pub ignore_key_repeat: bool,
    /// Help display settings.
    #[serde(default)]
    pub display: KeyDisplayConfig,
    /// Additional presets; an id matching a built-in replaces it.
    #[serde(default)]
    pub presets: Vec<PresetConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            sequence_timeout_ms: default_timeout_ms(),
            max_sequence_len: default_max_len(),
            ignore_key_repeat: false,
            display: KeyDisplayConfig::default(),
            presets: Vec::new(),
        }
    }
}

fn default_preset() -> String {
    "default".to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_SEQUENCE_TIMEOUT.as_millis() as u64
}

fn default_max_len() -> usize {
    DEFAULT_MAX_SEQUENCE_LEN
}

impl EngineConfig {
    /// Configuration file path for an application.
    pub fn config_path(app: &str) -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", app).map(|d| d.config_dir().join("config.toml"))
    }

    /// Load the application's configuration, falling back to defaults when
    /// the file is missing or unreadable.
    pub fn load(app: &str) -> Self {
        let Some(path) = Self::config_path(app) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Load configuration from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            sequence_timeout: Duration::from_millis(self.sequence_timeout_ms),
            max_sequence_len: self.max_sequence_len,
            ignore_key_repeat: self.ignore_key_repeat,
        }
    }

    /// Built-in presets plus configured ones, validated for `platform`.
    pub fn presets_for(&self, platform: Platform) -> Result<Vec<Preset>, ConfigError> {
        let mut presets = builtin_presets();
        for config in &self.presets {
            let preset = config.to_preset()?;
            let report = validate_preset(&preset, platform);
            if report.has_errors() {
                return Err(ConfigError::InvalidPreset(report));
            }
            for issue in report.warnings() {
                warn!(preset = %preset.id, %issue, "preset warning");
            }

            match presets.iter_mut().find(|p| p.id == preset.id) {
                Some(existing) => *existing = preset,
                None => presets.push(preset),
            }
        }
        Ok(presets)
    }

    /// Build a preset store with the configured preset active.
    pub fn build_store(&self, platform: Platform) -> Result<PresetStore, ConfigError> {
        let store = PresetStore::new(self.presets_for(platform)?, platform);
        if !store.set_active_preset(&self.preset) {
            warn!(preset = %self.preset, "configured preset not found, using default");
        }
        Ok(store)
    }

    /// Build an engine for the current platform.
    pub fn build_engine(&self) -> Result<ShortcutEngine, ConfigError> {
        let store = self.build_store(Platform::current())?;
        Ok(ShortcutEngine::new(Arc::new(store), self.dispatcher_config()))
    }
}
