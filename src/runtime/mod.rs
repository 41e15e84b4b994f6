//! Runtime wiring: settings, startup, terminal lifecycle and the event loop.

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

use std::error::Error;
use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub fn run() -> Result<(), Box<dyn Error>> {
    let settings = settings::load_settings();
    let (mut app, player, mpris, control_rx) = startup::init(&settings);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop::run(
        &mut terminal,
        &mut app,
        &player,
        &mpris,
        &control_rx,
        &settings,
    );

    // Restore the terminal before the fade-out so a stuck sink can't leave
    // raw mode enabled.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    result
}
