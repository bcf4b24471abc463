//! Help display data and key formatting.

use crate::catalog::{ActionId, Category, CATALOG};
use crate::store::ActiveBindings;
use serde::{Deserialize, Serialize};

/// Format for displaying key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyDisplayFormat {
    /// Unicode symbols: ⌘K, ⌃B, ⇧?
    Symbolic,
    /// Text labels: Ctrl+K, Cmd+B, Shift+?
    #[default]
    Text,
}

/// Configuration for key display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyDisplayConfig {
    #[serde(default)]
    pub format: KeyDisplayFormat,
}

impl KeyDisplayConfig {
    pub fn symbolic() -> Self {
        Self {
            format: KeyDisplayFormat::Symbolic,
        }
    }

    pub fn text() -> Self {
        Self {
            format: KeyDisplayFormat::Text,
        }
    }

    /// Format one resolved token.
    pub fn format_token(&self, token: &str) -> String {
        let symbolic = self.format == KeyDisplayFormat::Symbolic;
        let label = match (symbolic, token) {
            (true, "meta") => "\u{2318}",
            (true, "ctrl") => "\u{2303}",
            (true, "alt") => "\u{2325}",
            (true, "shift") => "\u{21e7}",
            (true, "enter") => "\u{23ce}",
            (true, "escape") => "\u{238b}",
            (true, "tab") => "\u{21e5}",
            (true, "backspace") => "\u{232b}",
            (true, "delete") => "\u{2326}",
            (true, "space") => "\u{2423}",
            (true, "up") => "\u{2191}",
            (true, "down") => "\u{2193}",
            (true, "left") => "\u{2190}",
            (true, "right") => "\u{2192}",
            (_, "meta") => "Cmd",
            (_, "ctrl") => "Ctrl",
            (_, "alt") => "Alt",
            (_, "shift") => "Shift",
            (_, "enter") => "Enter",
            (_, "escape") => "Esc",
            (_, "tab") => "Tab",
            (_, "backspace") => "Backspace",
            (_, "delete") => "Delete",
            (_, "insert") => "Insert",
            (_, "space") => "Space",
            (_, "up") => "Up",
            (_, "down") => "Down",
            (_, "left") => "Left",
            (_, "right") => "Right",
            (_, "home") => "Home",
            (_, "end") => "End",
            (_, "pageup") => "PageUp",
            (_, "pagedown") => "PageDown",
            _ => return token.to_uppercase(),
        };
        label.to_string()
    }

    /// Format a resolved key list.
    pub fn format_keys(&self, keys: &[String], is_sequence: bool) -> String {
        let parts: Vec<String> = keys.iter().map(|k| self.format_token(k)).collect();
        match (is_sequence, self.format) {
            (true, KeyDisplayFormat::Text) => parts.join(" then "),
            (true, KeyDisplayFormat::Symbolic) => parts.join(" "),
            (false, KeyDisplayFormat::Text) => parts.join("+"),
            (false, KeyDisplayFormat::Symbolic) => parts.join(""),
        }
    }
}

/// One shortcut line on the help screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    pub action: ActionId,
    pub description: &'static str,
    /// Resolved key tokens.
    pub keys: Vec<String>,
    pub is_sequence: bool,
}

impl HelpEntry {
    pub fn format(&self, config: &KeyDisplayConfig) -> String {
        config.format_keys(&self.keys, self.is_sequence)
    }
}

/// Help entries of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpSection {
    pub category: Category,
    pub entries: Vec<HelpEntry>,
}

/// Group the active bindings by category, in catalog order.
///
/// Actions rejected by `include` and categories left empty are skipped.
pub fn categorized_bindings(
    active: &ActiveBindings,
    include: impl Fn(&ActionId) -> bool,
) -> Vec<HelpSection> {
    Category::ALL
        .iter()
        .filter_map(|&category| {
            let entries: Vec<HelpEntry> = CATALOG
                .iter()
                .filter(|a| a.category == category)
                .filter_map(|a| {
                    let resolved = active.resolved_for(a.id)?;
                    include(&resolved.action).then(|| HelpEntry {
                        action: resolved.action.clone(),
                        description: a.description,
                        keys: resolved.keys.clone(),
                        is_sequence: resolved.is_sequence,
                    })
                })
                .collect();
            (!entries.is_empty()).then_some(HelpSection { category, entries })
        })
        .collect()
}

/// Render sections as plain text, one shortcut per line.
pub fn render_help(sections: &[HelpSection], config: &KeyDisplayConfig) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(section.category.label());
        out.push('\n');
        for entry in &section.entries {
            out.push_str(&format!("  {:<14} {}\n", entry.format(config), entry.description));
        }
    }
    out
}
