//! Shortcut Lab - try keyboard shortcut presets in the terminal.

mod app;
mod logging;
mod ui;

use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use shortcut_engine::EngineConfig;
use std::io;
use std::time::Duration;
use tracing::info;

/// Poll interval when no sequence is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let _log_guard = logging::init()?;

    let config = EngineConfig::load("shortcut-lab");
    let engine = config.build_engine()?;
    info!(preset = %engine.active_preset_id(), platform = ?engine.platform(), "starting");
    let mut app = App::new(engine, config.display);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Wake up in time to drop an abandoned sequence.
        let timeout = app.engine.time_until_timeout().unwrap_or(IDLE_POLL);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    app.handle_key(key);
                }
            }
        }
        app.tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
