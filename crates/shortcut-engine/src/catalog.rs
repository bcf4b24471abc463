//! Catalog of recognized actions.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of an action, e.g. `nav.dashboard`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for ActionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Help-screen grouping of actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Navigation,
    Files,
    Search,
    Interface,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Navigation,
        Category::Files,
        Category::Search,
        Category::Interface,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Navigation => "Navigation",
            Self::Files => "Files",
            Self::Search => "Search",
            Self::Interface => "Interface",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static description of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub id: &'static str,
    pub description: &'static str,
    pub category: Category,
}

const fn action(id: &'static str, description: &'static str, category: Category) -> ActionDescriptor {
    ActionDescriptor {
        id,
        description,
        category,
    }
}

/// Every action the engine knows about, in help-screen order.
pub static CATALOG: &[ActionDescriptor] = &[
    action("nav.dashboard", "Go to dashboard", Category::Navigation),
    action("nav.files", "Go to files", Category::Navigation),
    action("nav.activity", "Go to activity feed", Category::Navigation),
    action("nav.notifications", "Go to notifications", Category::Navigation),
    action("nav.settings", "Go to settings", Category::Navigation),
    action("nav.back", "Go back", Category::Navigation),
    action("list.next", "Select next item", Category::Navigation),
    action("list.prev", "Select previous item", Category::Navigation),
    action("list.first", "Jump to first item", Category::Navigation),
    action("list.last", "Jump to last item", Category::Navigation),
    action("list.open", "Open selected item", Category::Navigation),
    action("file.upload", "Upload a file", Category::Files),
    action("file.new_folder", "Create a folder", Category::Files),
    action("file.rename", "Rename selected item", Category::Files),
    action("file.download", "Download selected item", Category::Files),
    action("file.delete", "Delete selected item", Category::Files),
    action("search.focus", "Focus the search box", Category::Search),
    action("search.command_palette", "Open the command palette", Category::Search),
    action("ui.help", "Show keyboard shortcuts", Category::Interface),
    action("ui.close", "Close the current panel", Category::Interface),
    action("ui.toggle_sidebar", "Toggle the sidebar", Category::Interface),
    action("ui.refresh", "Refresh the current view", Category::Interface),
];

/// Look up an action by id.
pub fn descriptor(id: &str) -> Option<&'static ActionDescriptor> {
    CATALOG.iter().find(|a| a.id == id)
}

/// Check whether an action id is in the catalog.
pub fn is_known(id: &str) -> bool {
    descriptor(id).is_some()
}
