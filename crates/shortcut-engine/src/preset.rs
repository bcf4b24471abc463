//! Presets: named, swappable binding tables.

use crate::binding::Binding;
use crate::catalog::ActionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete table of action bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// One binding per action.
    #[serde(default)]
    pub bindings: BTreeMap<ActionId, Binding>,
}

impl Preset {
    /// Create an empty preset.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            bindings: BTreeMap::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Bind an action, replacing any earlier binding for it.
    pub fn bind(&mut self, action: impl Into<ActionId>, binding: Binding) {
        self.bindings.insert(action.into(), binding);
    }

    /// Builder form of [`Preset::bind`].
    pub fn with(mut self, action: impl Into<ActionId>, binding: Binding) -> Self {
        self.bind(action, binding);
        self
    }

    /// The binding for an action, if any.
    pub fn binding(&self, action: &str) -> Option<&Binding> {
        self.bindings.get(action)
    }

    /// Whether any binding in this preset is a sequence.
    pub fn has_sequences(&self) -> bool {
        self.bindings.values().any(|b| b.is_sequence)
    }
}

/// Built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinPreset {
    /// Modern bindings: `g`-prefixed sequences plus primary-modifier combos
    #[default]
    Default,
    /// Vim-like bindings
    Vim,
    /// Combination-only bindings, no sequences
    Classic,
}

impl BuiltinPreset {
    pub const ALL: [BuiltinPreset; 3] = [Self::Default, Self::Vim, Self::Classic];

    pub fn id(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Vim => "vim",
            Self::Classic => "classic",
        }
    }

    /// Build the preset table.
    pub fn load(self) -> Preset {
        match self {
            Self::Default => default_preset(),
            Self::Vim => vim_preset(),
            Self::Classic => classic_preset(),
        }
    }
}

/// All built-in presets, default first.
pub fn builtin_presets() -> Vec<Preset> {
    BuiltinPreset::ALL.iter().map(|p| p.load()).collect()
}

/// Bindings shared by every built-in preset.
fn common(preset: Preset) -> Preset {
    preset
        .with("ui.help", Binding::key("?"))
        .with("ui.close", Binding::key("escape"))
}

fn default_preset() -> Preset {
    let preset = Preset::new("default", "Default")
        .with_description("Go-to sequences (g d, g f) and primary-modifier shortcuts")
        // Go-to sequences
        .with("nav.dashboard", Binding::sequence(&["g", "d"]))
        .with("nav.files", Binding::sequence(&["g", "f"]))
        .with("nav.activity", Binding::sequence(&["g", "a"]))
        .with("nav.notifications", Binding::sequence(&["g", "n"]))
        .with("nav.settings", Binding::sequence(&["g", "s"]))
        .with("nav.back", Binding::combo(&["alt", "left"]))
        // Lists
        .with("list.next", Binding::key("down"))
        .with("list.prev", Binding::key("up"))
        .with("list.first", Binding::key("home"))
        .with("list.last", Binding::key("end"))
        .with("list.open", Binding::key("enter"))
        // Files
        .with("file.upload", Binding::combo(&["mod", "u"]))
        .with("file.new_folder", Binding::combo(&["mod", "shift", "n"]))
        .with("file.rename", Binding::key("f2"))
        .with("file.download", Binding::combo(&["mod", "shift", "d"]))
        .with("file.delete", Binding::key("delete"))
        // Search
        .with("search.focus", Binding::key("/"))
        .with("search.command_palette", Binding::combo(&["mod", "k"]))
        // Interface
        .with("ui.toggle_sidebar", Binding::combo(&["mod", "b"]))
        .with("ui.refresh", Binding::combo(&["mod", "shift", "r"]));

    common(preset)
}

fn vim_preset() -> Preset {
    let preset = Preset::new("vim", "Vim")
        .with_description("Home-row movement and operator-style sequences (dd, yy, gg)")
        .with("nav.dashboard", Binding::sequence(&["g", "d"]))
        .with("nav.files", Binding::sequence(&["g", "f"]))
        .with("nav.activity", Binding::sequence(&["g", "a"]))
        .with("nav.notifications", Binding::sequence(&["g", "n"]))
        .with("nav.settings", Binding::sequence(&["g", "s"]))
        .with("nav.back", Binding::key("h"))
        .with("list.next", Binding::key("j"))
        .with("list.prev", Binding::key("k"))
        .with("list.first", Binding::sequence(&["g", "g"]))
        .with("list.last", Binding::combo(&["shift", "g"]))
        .with("list.open", Binding::key("enter"))
        .with("file.upload", Binding::key("o"))
        .with("file.new_folder", Binding::combo(&["shift", "o"]))
        .with("file.rename", Binding::sequence(&["c", "w"]))
        .with("file.download", Binding::sequence(&["y", "y"]))
        .with("file.delete", Binding::sequence(&["d", "d"]))
        .with("search.focus", Binding::key("/"))
        .with("search.command_palette", Binding::key(":"))
        .with("ui.toggle_sidebar", Binding::combo(&["mod", "b"]))
        .with("ui.refresh", Binding::combo(&["shift", "r"]));

    common(preset)
}

fn classic_preset() -> Preset {
    let preset = Preset::new("classic", "Classic")
        .with_description("Modifier combinations only, no multi-key sequences")
        .with("nav.dashboard", Binding::combo(&["mod", "1"]))
        .with("nav.files", Binding::combo(&["mod", "2"]))
        .with("nav.activity", Binding::combo(&["mod", "3"]))
        .with("nav.notifications", Binding::combo(&["mod", "4"]))
        .with("nav.settings", Binding::combo(&["mod", ","]))
        .with("nav.back", Binding::combo(&["alt", "left"]))
        .with("list.next", Binding::key("down"))
        .with("list.prev", Binding::key("up"))
        .with("list.first", Binding::key("home"))
        .with("list.last", Binding::key("end"))
        .with("list.open", Binding::key("enter"))
        .with("file.upload", Binding::combo(&["mod", "u"]))
        .with("file.new_folder", Binding::combo(&["mod", "shift", "n"]))
        .with("file.rename", Binding::key("f2"))
        .with("file.download", Binding::combo(&["mod", "shift", "d"]))
        .with("file.delete", Binding::key("delete"))
        .with("search.focus", Binding::combo(&["mod", "f"]))
        .with("search.command_palette", Binding::combo(&["mod", "shift", "p"]))
        .with("ui.toggle_sidebar", Binding::combo(&["mod", "b"]))
        .with("ui.refresh", Binding::key("f5"));

    common(preset)
}
