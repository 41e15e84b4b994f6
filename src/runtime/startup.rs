use std::env;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config::Settings;
use crate::library;
use crate::mpris::{self, ControlCmd, MprisHandle};

/// Resolve the music directory: first CLI argument, then
/// `TINAMP_MUSIC_DIR`, then the current directory.
fn music_dir() -> PathBuf {
    if let Some(arg) = env::args().nth(1) {
        return PathBuf::from(arg);
    }
    if let Some(dir) = env::var_os("TINAMP_MUSIC_DIR") {
        return PathBuf::from(dir);
    }
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Scan the library and wire up the app model, the transport thread and
/// the MPRIS service.
pub fn init(settings: &Settings) -> (App, AudioPlayer, MprisHandle, Receiver<ControlCmd>) {
    let dir = music_dir();
    let tracks = library::scan(&dir, &settings.library);
    if tracks.is_empty() {
        eprintln!("tinamp: no audio files found under {}", dir.display());
    }

    let player = AudioPlayer::new(
        tracks.clone(),
        &settings.playback,
        settings.visualizer.clone(),
    );

    let mut app = App::new(tracks);
    app.shuffle = settings.playback.shuffle;
    app.volume = settings.playback.volume;
    app.set_playback_handle(player.playback_handle());
    app.set_spectrum_handle(player.spectrum_handle());
    app.set_current_dir(dir.display().to_string());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = mpris::spawn_mpris(control_tx);

    (app, player, mpris, control_rx)
}
