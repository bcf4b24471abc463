//! Application state and logic.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use shortcut_engine::{
    ActionId, FocusContext, FocusKind, KeyDisplayConfig, KeyDisplayFormat, KeyOutcome,
    ShortcutEngine, CATALOG,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, info};

const LOG_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Files,
    Activity,
    Notifications,
    Settings,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::Files,
        Page::Activity,
        Page::Notifications,
        Page::Settings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Files => "Files",
            Page::Activity => "Activity",
            Page::Notifications => "Notifications",
            Page::Settings => "Settings",
        }
    }

    fn for_action(id: &str) -> Option<Self> {
        match id {
            "nav.dashboard" => Some(Page::Dashboard),
            "nav.files" => Some(Page::Files),
            "nav.activity" => Some(Page::Activity),
            "nav.notifications" => Some(Page::Notifications),
            "nav.settings" => Some(Page::Settings),
            _ => None,
        }
    }
}

/// Which text field has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Search,
    Palette,
}

/// Focus as seen by the shortcut engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Focus {
    pub input: Option<InputMode>,
}

impl FocusContext for Focus {
    fn focus_kind(&self) -> FocusKind {
        match self.input {
            Some(_) => FocusKind::TextInput,
            None => FocusKind::Widget,
        }
    }

    fn blur(&mut self) {
        self.input = None;
    }
}

pub struct App {
    pub engine: ShortcutEngine,
    pub focus: Focus,
    pub display: KeyDisplayConfig,
    pub page: Page,
    pub previous_page: Option<Page>,
    pub files: Vec<String>,
    pub selected: usize,
    pub input: String,
    pub search: String,
    pub show_help: bool,
    pub show_sidebar: bool,
    pub log: VecDeque<String>,
    pub should_quit: bool,
    fired: Rc<RefCell<Vec<ActionId>>>,
}

impl App {
    pub fn new(mut engine: ShortcutEngine, display: KeyDisplayConfig) -> Self {
        // Handlers only record; the app applies actions once the engine returns.
        let fired = Rc::new(RefCell::new(Vec::new()));
        for action in CATALOG {
            let fired = Rc::clone(&fired);
            let id = ActionId::from(action.id);
            engine.register_action(action.id, move || fired.borrow_mut().push(id.clone()));
        }

        let files = [
            "README.md",
            "budget.xlsx",
            "design",
            "photos",
            "release-notes.txt",
            "roadmap.pdf",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            engine,
            focus: Focus::default(),
            display,
            page: Page::Dashboard,
            previous_page: None,
            files,
            selected: 0,
            input: String::new(),
            search: String::new(),
            show_help: false,
            show_sidebar: true,
            log: VecDeque::new(),
            should_quit: false,
            fired,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let outcome = self.engine.handle_key(&key, &mut self.focus);
        let fired: Vec<ActionId> = self.fired.borrow_mut().drain(..).collect();
        for id in fired {
            self.apply(&id);
        }

        if outcome == KeyOutcome::Blurred {
            self.input.clear();
        }
        if !outcome.is_consumed() {
            self.handle_unbound_key(key);
        }
    }

    /// Tick the engine so an abandoned sequence leaves the status line.
    pub fn tick(&mut self) {
        if self.engine.tick() {
            debug!("pending sequence expired");
        }
    }

    pub fn pending_keys(&self) -> String {
        self.engine.pending_keys().join(" ")
    }

    pub fn preset_name(&self) -> String {
        let id = self.engine.active_preset_id();
        self.engine
            .presets()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or(id)
    }

    pub fn visible_files(&self) -> Vec<&str> {
        let needle = self.search.to_lowercase();
        self.files
            .iter()
            .filter(|f| f.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    fn apply(&mut self, id: &ActionId) {
        info!(action = %id, "action");
        let id = id.as_str();

        if let Some(page) = Page::for_action(id) {
            if page != self.page {
                self.previous_page = Some(self.page);
                self.page = page;
            }
            self.record(format!("Go to {}", page.title()));
            return;
        }

        let count = self.visible_files().len();
        match id {
            "nav.back" => {
                if let Some(page) = self.previous_page.take() {
                    self.page = page;
                    self.record(format!("Back to {}", page.title()));
                }
            }
            "list.next" => {
                if count > 0 {
                    self.selected = (self.selected + 1).min(count - 1);
                }
            }
            "list.prev" => self.selected = self.selected.saturating_sub(1),
            "list.first" => self.selected = 0,
            "list.last" => self.selected = count.saturating_sub(1),
            "list.open" => {
                if let Some(name) = self.selected_file() {
                    self.record(format!("Open {}", name));
                }
            }
            "file.upload" => self.record("Upload".to_string()),
            "file.new_folder" => self.record("New folder".to_string()),
            "file.rename" | "file.download" => {
                if let Some(name) = self.selected_file() {
                    let verb = if id == "file.rename" { "Rename" } else { "Download" };
                    self.record(format!("{} {}", verb, name));
                }
            }
            "file.delete" => self.delete_selected(),
            "search.focus" => {
                self.focus.input = Some(InputMode::Search);
                self.input = self.search.clone();
            }
            "search.command_palette" => {
                self.focus.input = Some(InputMode::Palette);
                self.input.clear();
            }
            "ui.help" => self.show_help = !self.show_help,
            "ui.close" => {
                if self.show_help {
                    self.show_help = false;
                } else if !self.search.is_empty() {
                    self.search.clear();
                    self.selected = 0;
                }
            }
            "ui.toggle_sidebar" => self.show_sidebar = !self.show_sidebar,
            "ui.refresh" => self.record("Refreshed".to_string()),
            other => debug!(action = other, "no behavior for action"),
        }
    }

    fn selected_file(&self) -> Option<String> {
        self.visible_files().get(self.selected).map(|s| s.to_string())
    }

    fn delete_selected(&mut self) {
        let Some(name) = self.selected_file() else {
            return;
        };
        self.files.retain(|f| *f != name);
        let count = self.visible_files().len();
        self.selected = self.selected.min(count.saturating_sub(1));
        self.record(format!("Delete {}", name));
    }

    /// Keys the engine left alone: text entry and lab controls.
    fn handle_unbound_key(&mut self, key: KeyEvent) {
        if let Some(mode) = self.focus.input {
            match key.code {
                KeyCode::Char(c) => self.input.push(c),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => {
                    self.focus.input = None;
                    let input = std::mem::take(&mut self.input);
                    match mode {
                        InputMode::Search => {
                            self.search = input;
                            self.selected = 0;
                        }
                        InputMode::Palette => self.run_command(input.trim()),
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::F(10) => self.cycle_preset(),
            KeyCode::F(9) => self.toggle_display_format(),
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            _ => {}
        }
    }

    /// Palette commands: `preset <id>` and `format <text|symbolic>`.
    fn run_command(&mut self, command: &str) {
        let mut words = command.split_whitespace();
        match (words.next(), words.next()) {
            (Some("preset"), Some(id)) => {
                if !self.switch_preset(id) {
                    self.record(format!("No preset '{}'", id));
                }
            }
            (Some("format"), Some("text")) => self.display = KeyDisplayConfig::text(),
            (Some("format"), Some("symbolic")) => self.display = KeyDisplayConfig::symbolic(),
            (None, _) => {}
            _ => self.record(format!("Unknown command '{}'", command)),
        }
    }

    fn cycle_preset(&mut self) {
        let ids: Vec<String> = self.engine.presets().iter().map(|p| p.id.clone()).collect();
        let active = self.engine.active_preset_id();
        let next = ids
            .iter()
            .position(|id| *id == active)
            .map(|i| (i + 1) % ids.len())
            .and_then(|i| ids.get(i));
        if let Some(id) = next {
            self.switch_preset(id);
        }
    }

    fn switch_preset(&mut self, id: &str) -> bool {
        if !self.engine.set_active_preset(id) {
            return false;
        }
        self.record(format!("Preset: {}", self.preset_name()));
        true
    }

    fn toggle_display_format(&mut self) {
        self.display = match self.display.format {
            KeyDisplayFormat::Text => KeyDisplayConfig::symbolic(),
            KeyDisplayFormat::Symbolic => KeyDisplayConfig::text(),
        };
    }

    fn record(&mut self, entry: String) {
        if self.log.len() == LOG_LIMIT {
            self.log.pop_front();
        }
        self.log.push_back(entry);
    }
}
