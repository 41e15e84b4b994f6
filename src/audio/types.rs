//! Small shared types for the audio subsystem: transport commands,
//! playback state and the cross-thread info handle.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

/// The transport state machine's three states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Commands accepted by the transport thread. One transition is in flight
/// at a time; the channel serializes callers (UI keys and MPRIS alike).
#[derive(Debug)]
pub enum TransportCmd {
    /// Load the track at the given index and force playback (playlist click).
    Play(usize),
    /// Toggle between Playing and Paused; from Stopped, starts the current
    /// or first track.
    TogglePause,
    /// Stop playback, reset position to zero, clear the spectrum to floor.
    Stop,
    /// Advance to the next track, inheriting the prior play/pause state.
    Next,
    /// Go back to the previous track, inheriting the prior play/pause state.
    Prev,
    /// Seek relative to the current position (seconds, may be negative).
    SeekBy(i64),
    /// Mark a UI scrub as in progress; position ticks are suppressed while set.
    SetScrubbing(bool),
    ToggleShuffle,
    SetVolume(f32),
    /// Append freshly scanned tracks to the playlist.
    AppendTracks(Vec<crate::library::Track>),
    /// Stop and forget the entire playlist.
    ClearPlaylist,
    Quit {
        fade_out_ms: u64,
    },
}

/// Errors the transport surfaces to the UI. Neither is fatal: the state
/// machine stays consistent and keeps accepting commands.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("playlist is empty - add some tracks first")]
    NoTrackAvailable,
    #[error("cannot play {path}: {reason}")]
    DecodeFailure { path: PathBuf, reason: String },
}

/// Snapshot of playback state shared between the transport thread and the
/// UI/MPRIS side. Last-value-wins: readers only ever see the most recent
/// complete update.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    pub index: Option<usize>,
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    pub state: PlaybackState,
    /// While true, the position ticker leaves `elapsed` alone so a
    /// user-driven scrub does not fight the engine-reported position.
    pub scrubbing: bool,
    pub last_error: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            elapsed: Duration::ZERO,
            duration: None,
            state: PlaybackState::Stopped,
            scrubbing: false,
            last_error: None,
        }
    }
}

impl PlaybackInfo {
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
