//! Application model: the UI-side view of the playlist and playback state.
//!
//! The transport thread owns the authoritative state; `App` keeps the
//! UI's mirror of it (synced from the playback handle every frame) plus
//! cursor position and the playlist copy the list widget renders.

use crate::audio::{PlaybackHandle, PlaybackState, SpectrumHandle};
use crate::library::Track;

pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,
    pub spectrum_handle: Option<SpectrumHandle>,

    pub shuffle: bool,
    pub volume: f32,
    pub current_dir: Option<String>,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            playback: PlaybackState::Stopped,
            playback_handle: None,
            spectrum_handle: None,
            shuffle: false,
            volume: 0.8,
            current_dir: None,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Attach the shared spectrum slot the visualizer panel snapshots.
    pub fn set_spectrum_handle(&mut self, h: SpectrumHandle) {
        self.spectrum_handle = Some(h);
    }

    /// Record the library directory in the app state.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Set the cursor, clamping into range.
    pub fn set_selected(&mut self, idx: usize) {
        if self.tracks.is_empty() {
            self.selected = 0;
        } else {
            self.selected = idx.min(self.tracks.len() - 1);
        }
    }

    /// Move the cursor to the next track, wrapping at the end.
    pub fn select_next(&mut self) {
        if !self.tracks.is_empty() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move the cursor to the previous track, wrapping at the start.
    pub fn select_prev(&mut self) {
        if !self.tracks.is_empty() {
            self.selected = (self.selected + self.tracks.len() - 1) % self.tracks.len();
        }
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    /// Append freshly scanned tracks (the UI's copy; the transport gets the
    /// same batch via `TransportCmd::AppendTracks`).
    pub fn append_tracks(&mut self, new_tracks: &[Track]) {
        self.tracks.extend_from_slice(new_tracks);
    }

    /// Forget the playlist and reset the cursor.
    pub fn clear_tracks(&mut self) {
        self.tracks.clear();
        self.selected = 0;
        self.playback = PlaybackState::Stopped;
    }

    /// Nudge the volume by `step`, clamped to `0.0..=1.0`.
    pub fn adjust_volume(&mut self, step: f32) -> f32 {
        self.volume = (self.volume + step).clamp(0.0, 1.0);
        self.volume
    }
}
