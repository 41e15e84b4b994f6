use std::error::Error;
use std::io::Stdout;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::mpris_sync::{self, Published};
use crate::app::App;
use crate::audio::{AudioPlayer, PlaybackState, TransportCmd};
use crate::config::Settings;
use crate::library;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::ui;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// The main loop: draw, publish to MPRIS, drain remote commands, then
/// block briefly on keyboard input. Returns when the user quits.
pub fn run(
    terminal: &mut Term,
    app: &mut App,
    player: &AudioPlayer,
    mpris: &MprisHandle,
    control_rx: &Receiver<ControlCmd>,
    settings: &Settings,
) -> Result<(), Box<dyn Error>> {
    let mut spectrum = vec![settings.visualizer.floor; settings.visualizer.bars];
    let mut published = Published::default();

    loop {
        sync_playback_state(app);
        if let Some(slot) = &app.spectrum_handle {
            slot.snapshot(&mut spectrum);
        }
        mpris_sync::update_mpris(mpris, app, &mut published);

        terminal.draw(|frame| {
            ui::draw(
                frame,
                app,
                &spectrum,
                &settings.ui,
                &settings.controls,
                &settings.visualizer,
            )
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control(cmd, app, player) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(key, app, player, settings) {
                    return Ok(());
                }
            }
        }
    }
}

/// Mirror the transport's state into the app model for rendering.
fn sync_playback_state(app: &mut App) {
    if let Some(handle) = &app.playback_handle {
        if let Ok(info) = handle.lock() {
            app.playback = info.state;
        }
    }
}

/// Handle one keypress. Returns true to quit.
fn handle_key(key: KeyEvent, app: &mut App, player: &AudioPlayer, settings: &Settings) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => {
            if app.has_tracks() {
                let _ = player.send(TransportCmd::Play(app.selected));
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            let _ = player.send(TransportCmd::TogglePause);
        }
        KeyCode::Char('x') => {
            let _ = player.send(TransportCmd::Stop);
        }
        KeyCode::Char('h') => {
            let _ = player.send(TransportCmd::Prev);
        }
        KeyCode::Char('l') => {
            let _ = player.send(TransportCmd::Next);
        }
        KeyCode::Char('H') => scrub(player, -(settings.controls.scrub_seconds as i64)),
        KeyCode::Char('L') => scrub(player, settings.controls.scrub_seconds as i64),
        KeyCode::Char('s') => {
            app.toggle_shuffle();
            let _ = player.send(TransportCmd::ToggleShuffle);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = app.adjust_volume(settings.controls.volume_step);
            let _ = player.send(TransportCmd::SetVolume(v));
        }
        KeyCode::Char('-') => {
            let v = app.adjust_volume(-settings.controls.volume_step);
            let _ = player.send(TransportCmd::SetVolume(v));
        }
        KeyCode::Char('a') => add_new_tracks(app, player, settings),
        KeyCode::Char('c') => {
            app.clear_tracks();
            let _ = player.send(TransportCmd::ClearPlaylist);
        }
        _ => {}
    }
    false
}

/// Every seek, keyboard or MPRIS, is bracketed by scrubbing markers so the
/// position ticker does not fight the transition.
fn seek_commands(delta_secs: i64) -> [TransportCmd; 3] {
    [
        TransportCmd::SetScrubbing(true),
        TransportCmd::SeekBy(delta_secs),
        TransportCmd::SetScrubbing(false),
    ]
}

fn scrub(player: &AudioPlayer, delta_secs: i64) {
    for cmd in seek_commands(delta_secs) {
        let _ = player.send(cmd);
    }
}

/// Rescan the current directory and append anything new, keeping the UI's
/// playlist copy and the transport's in lockstep.
fn add_new_tracks(app: &mut App, player: &AudioPlayer, settings: &Settings) {
    let Some(dir) = app.current_dir.clone() else {
        return;
    };
    let fresh = library::scan_new(Path::new(&dir), &settings.library, &app.tracks);
    if fresh.is_empty() {
        return;
    }
    let _ = player.send(TransportCmd::AppendTracks(fresh.clone()));
    app.append_tracks(&fresh);
}

/// Handle one remote (MPRIS) command. Returns true to quit.
fn handle_control(cmd: ControlCmd, app: &mut App, player: &AudioPlayer) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if app.playback != PlaybackState::Playing {
                let _ = player.send(TransportCmd::TogglePause);
            }
        }
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                let _ = player.send(TransportCmd::TogglePause);
            }
        }
        ControlCmd::PlayPause => {
            let _ = player.send(TransportCmd::TogglePause);
        }
        ControlCmd::Stop => {
            let _ = player.send(TransportCmd::Stop);
        }
        ControlCmd::Next => {
            let _ = player.send(TransportCmd::Next);
        }
        ControlCmd::Prev => {
            let _ = player.send(TransportCmd::Prev);
        }
        ControlCmd::SeekBy(micros) => {
            scrub(player, micros / 1_000_000);
        }
    }
    false
}
