//! build_tui - Interactive TUI for composing and sharing character builds
//!
//! Usage: `build_tui [SHARE_CODE_OR_URL]`
//!
//! Environment:
//! - `BUILD_CATALOG_DIR`: load catalog TOML files from this directory
//! - `BUILD_SHARE_URL`: base URL for share links
//! - `BUILD_TUI_LOG`: append tracing output to this file (filter via `RUST_LOG`)

mod app;
mod ui;

use app::{App, DEFAULT_SHARE_BASE};
use build_core::{Catalog, ConfigError};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
enum TuiError {
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to load catalog: {0}")]
    Catalog(#[from] ConfigError),
}

/// Log to a file so tracing output never lands on the alternate screen
fn init_logging() -> io::Result<()> {
    let Some(path) = std::env::var_os("BUILD_TUI_LOG") else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

fn load_catalog() -> Result<Catalog, ConfigError> {
    match std::env::var_os("BUILD_CATALOG_DIR") {
        Some(dir) => Catalog::load_dir(&PathBuf::from(dir)),
        None => Catalog::reference(),
    }
}

fn main() -> Result<(), TuiError> {
    init_logging()?;

    let catalog = load_catalog()?;
    info!(
        races = catalog.races.len(),
        modifiers = catalog.modifiers.len(),
        moves = catalog.moves.len(),
        "catalog loaded"
    );
    let share_base = std::env::var("BUILD_SHARE_URL").unwrap_or_else(|_| DEFAULT_SHARE_BASE.to_string());

    // Create app
    let mut app = App::new(catalog, share_base);
    if let Some(code) = std::env::args().nth(1) {
        app.load_share(&code);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.is_editing() {
            match key.code {
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.input_backspace(),
                KeyCode::Enter => app.commit_input(),
                KeyCode::Esc => app.cancel_input(),
                _ => {}
            }
            continue;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
            (KeyCode::Tab, _) => app.next_tab(),
            (KeyCode::BackTab, _) => app.prev_tab(),
            (KeyCode::Char('1'), _) => app.set_tab(0),
            (KeyCode::Char('2'), _) => app.set_tab(1),
            (KeyCode::Char('3'), _) => app.set_tab(2),
            (KeyCode::Char('4'), _) => app.set_tab(3),
            (KeyCode::Char('5'), _) => app.set_tab(4),
            (KeyCode::Char('6'), _) => app.set_tab(5),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.on_up(),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.on_down(),
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.on_left(),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.on_right(),
            (KeyCode::Enter, _) => app.on_enter(),
            (KeyCode::Char(' '), _) => app.on_space(),
            (KeyCode::Char('s'), _) => app.share(),
            (KeyCode::Char('r'), _) => app.reset(),
            (KeyCode::Char('m'), _) => app.quick_max(),
            (KeyCode::Char('c'), _) => app.clear_forms(),
            (KeyCode::Char('u'), _) => app.unequip_current_slot(),
            (KeyCode::Char('?'), _) => app.toggle_help(),
            (KeyCode::Esc, _) => app.message = None,
            _ => {}
        }
    }
    Ok(())
}
