//! The transport thread: owns the playback state machine and the rodio
//! output stream, and is the only writer of the shared `PlaybackInfo`.
//!
//! Commands arrive over an mpsc channel, so transitions are serialized by
//! construction. The `recv_timeout` loop doubles as the end-of-stream
//! poll for auto-advance.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::analyzer::SpectrumAnalyzer;
use super::select;
use super::sink::create_sink_at;
use super::spectrum::SpectrumHandle;
use super::types::{PlaybackHandle, PlaybackState, PlayerError, TransportCmd};
use crate::config::VisualizerSettings;
use crate::library::Track;

pub(super) fn spawn_transport_thread(
    tracks: Vec<Track>,
    rx: Receiver<TransportCmd>,
    playback_info: PlaybackHandle,
    spectrum: SpectrumHandle,
    visualizer: VisualizerSettings,
    initial_shuffle: bool,
    initial_volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("tinamp: no audio output device: {e}");
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped; noisy for a TUI.
        stream.log_on_drop(false);

        let mut transport = Transport {
            stream,
            tracks,
            index: None,
            state: PlaybackState::Stopped,
            sink: None,
            started_at: None,
            accumulated: Duration::ZERO,
            shuffle: initial_shuffle,
            volume: initial_volume.clamp(0.0, 1.0),
            playback_info,
            spectrum,
            visualizer,
        };

        let ticker_quit = Arc::new(AtomicBool::new(false));
        let _ = spawn_position_ticker(transport.playback_info.clone(), ticker_quit.clone());

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => {
                    if transport.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    // End-of-stream auto-advance, only while Playing.
                    let drained = transport
                        .sink
                        .as_ref()
                        .map(|s| s.empty())
                        .unwrap_or(false);
                    if transport.state == PlaybackState::Playing && drained {
                        transport.next(false);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        ticker_quit.store(true, Ordering::Release);
    })
}

/// Advances the published elapsed time while playing. Suppressed while a
/// UI scrub is in flight and clamped to the known duration. Exits when
/// `quit` is set by the departing transport thread.
pub(crate) fn spawn_position_ticker(info: PlaybackHandle, quit: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            if quit.load(Ordering::Acquire) {
                return;
            }
            thread::sleep(Duration::from_millis(250));
            let Ok(mut info) = info.lock() else { return };
            if info.is_playing() && !info.scrubbing {
                let next = info.elapsed + Duration::from_millis(250);
                info.elapsed = match info.duration {
                    Some(total) => next.min(total),
                    None => next,
                };
            }
        }
    })
}

struct Transport {
    stream: OutputStream,
    tracks: Vec<Track>,
    index: Option<usize>,
    state: PlaybackState,
    sink: Option<Sink>,
    started_at: Option<Instant>,
    accumulated: Duration,
    shuffle: bool,
    volume: f32,
    playback_info: PlaybackHandle,
    spectrum: SpectrumHandle,
    visualizer: VisualizerSettings,
}

impl Transport {
    /// Dispatch one command. Returns true when the thread should exit.
    fn handle(&mut self, cmd: TransportCmd) -> bool {
        match cmd {
            TransportCmd::Play(i) => self.load_track(i, true),
            TransportCmd::TogglePause => self.toggle_pause(),
            TransportCmd::Stop => self.stop(),
            TransportCmd::Next => self.next(false),
            TransportCmd::Prev => self.prev(),
            TransportCmd::SeekBy(secs) => self.seek_by(secs),
            TransportCmd::SetScrubbing(on) => {
                if let Ok(mut info) = self.playback_info.lock() {
                    info.scrubbing = on;
                }
            }
            TransportCmd::ToggleShuffle => self.shuffle = !self.shuffle,
            TransportCmd::SetVolume(v) => {
                self.volume = v.clamp(0.0, 1.0);
                if let Some(s) = &self.sink {
                    s.set_volume(self.volume);
                }
            }
            TransportCmd::AppendTracks(new_tracks) => self.append_tracks(new_tracks),
            TransportCmd::ClearPlaylist => self.clear_playlist(),
            TransportCmd::Quit { fade_out_ms } => {
                if let Some(s) = &self.sink {
                    if self.state == PlaybackState::Playing {
                        fade_out_sink(s, self.volume, fade_out_ms);
                    }
                    s.stop();
                }
                self.state = PlaybackState::Stopped;
                self.publish_info();
                return true;
            }
        }
        false
    }

    /// Load the track at `start`. Out-of-range indices are a no-op
    /// (defensive against racing playlist mutations). A decode failure is
    /// surfaced and then treated like end-of-stream: advance, bounded to
    /// one full pass over the playlist.
    fn load_track(&mut self, start: usize, force_play: bool) {
        let len = self.tracks.len();
        if start >= len {
            return;
        }

        let target = select::state_after_switch(self.state, force_play);
        let mut i = start;
        // First failure of this dispatch, kept so the message survives the
        // fallback load and still reaches the status line.
        let mut skipped: Option<String> = None;
        for _ in 0..len {
            match self.try_start(i, target, skipped.clone()) {
                Ok(()) => return,
                Err(e) => {
                    self.set_error(&e);
                    skipped.get_or_insert(e.to_string());
                    i = (i + 1) % len;
                }
            }
        }
        // Every track failed to open; give up cleanly.
        self.stop();
    }

    fn try_start(
        &mut self,
        i: usize,
        target: PlaybackState,
        skipped_error: Option<String>,
    ) -> Result<(), PlayerError> {
        // Invalidate before teardown so no frame from the old track can be
        // published once the switch has completed.
        self.spectrum.invalidate();
        self.spectrum.clear_to_floor();

        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let analyzer = SpectrumAnalyzer::new(&self.visualizer);
        let (sink, decoded_duration) = create_sink_at(
            &self.stream,
            &self.tracks[i],
            Duration::ZERO,
            analyzer,
            &self.spectrum,
        )?;
        sink.set_volume(self.volume);

        let playing = target == PlaybackState::Playing;
        if playing {
            sink.play();
        }

        self.sink = Some(sink);
        self.index = Some(i);
        self.state = target;
        self.started_at = playing.then(Instant::now);
        self.accumulated = Duration::ZERO;

        // Tag duration beats the decoder's guess; both may be missing for a
        // while and the UI tolerates that.
        let duration = self.tracks[i].duration.or(decoded_duration);
        publish_loaded(&self.playback_info, i, duration, target, skipped_error);
        Ok(())
    }

    fn toggle_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => {
                if let Some(s) = &self.sink {
                    s.pause();
                }
                if let Some(st) = self.started_at.take() {
                    self.accumulated += st.elapsed();
                }
                self.state = PlaybackState::Paused;
                self.publish_info();
            }
            PlaybackState::Paused => {
                if let Some(s) = &self.sink {
                    s.play();
                }
                self.started_at = Some(Instant::now());
                self.state = PlaybackState::Playing;
                self.publish_info();
            }
            PlaybackState::Stopped => {
                if self.tracks.is_empty() {
                    self.set_error(&PlayerError::NoTrackAvailable);
                    return;
                }
                let i = self
                    .index
                    .filter(|&i| i < self.tracks.len())
                    .unwrap_or(0);
                self.load_track(i, true);
            }
        }
    }

    /// Stop playback: position back to zero, spectrum to the floor, but
    /// the current track stays loaded so play restarts it.
    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.state = PlaybackState::Stopped;
        self.started_at = None;
        self.accumulated = Duration::ZERO;

        self.spectrum.invalidate();
        self.spectrum.clear_to_floor();

        if let Ok(mut info) = self.playback_info.lock() {
            info.elapsed = Duration::ZERO;
            info.state = PlaybackState::Stopped;
        }
    }

    fn next(&mut self, force_play: bool) {
        if let Some(i) = select::pick_next(
            self.index,
            self.tracks.len(),
            self.shuffle,
            &mut rand::rng(),
        ) {
            self.load_track(i, force_play);
        }
    }

    fn prev(&mut self) {
        if let Some(i) = select::pick_prev(
            self.index,
            self.tracks.len(),
            self.shuffle,
            &mut rand::rng(),
        ) {
            self.load_track(i, false);
        }
    }

    /// Relative seek, clamped to `[0, duration]`. Valid only with a track
    /// loaded and a live sink; rebuilds the sink at the new offset.
    fn seek_by(&mut self, secs: i64) {
        let Some(i) = self.index else { return };
        if self.sink.is_none() || i >= self.tracks.len() {
            return;
        }

        let elapsed = self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| st.elapsed());
        let duration = self
            .playback_info
            .lock()
            .ok()
            .and_then(|info| info.duration);
        let target = clamp_seek(elapsed, secs, duration);

        self.spectrum.invalidate();
        self.spectrum.clear_to_floor();
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let analyzer = SpectrumAnalyzer::new(&self.visualizer);
        match create_sink_at(&self.stream, &self.tracks[i], target, analyzer, &self.spectrum) {
            Ok((sink, _)) => {
                sink.set_volume(self.volume);
                let playing = self.state == PlaybackState::Playing;
                if playing {
                    sink.play();
                }
                self.sink = Some(sink);
                self.accumulated = target;
                self.started_at = playing.then(Instant::now);
                if let Ok(mut info) = self.playback_info.lock() {
                    info.elapsed = target;
                }
            }
            Err(e) => {
                self.set_error(&e);
                self.stop();
            }
        }
    }

    fn append_tracks(&mut self, new_tracks: Vec<Track>) {
        self.tracks.extend(new_tracks);
        // First tracks ever: select the head without starting playback.
        if self.index.is_none() && !self.tracks.is_empty() {
            self.index = Some(0);
            if let Ok(mut info) = self.playback_info.lock() {
                info.index = Some(0);
                info.duration = self.tracks[0].duration;
            }
        }
    }

    fn clear_playlist(&mut self) {
        self.stop();
        self.tracks.clear();
        self.index = None;
        if let Ok(mut info) = self.playback_info.lock() {
            info.index = None;
            info.duration = None;
            info.elapsed = Duration::ZERO;
        }
    }

    fn publish_info(&self) {
        if let Ok(mut info) = self.playback_info.lock() {
            info.index = self.index;
            info.state = self.state;
        }
    }

    fn set_error(&self, e: &PlayerError) {
        if let Ok(mut info) = self.playback_info.lock() {
            info.last_error = Some(e.to_string());
        }
    }
}

/// Publish a completed track load. `skipped_error` carries the message of
/// a decode failure skipped over during the same command; only a clean
/// load clears `last_error`, so the failure stays visible after the
/// fallback track starts.
pub(crate) fn publish_loaded(
    playback: &PlaybackHandle,
    index: usize,
    duration: Option<Duration>,
    state: PlaybackState,
    skipped_error: Option<String>,
) {
    if let Ok(mut info) = playback.lock() {
        info.index = Some(index);
        info.elapsed = Duration::ZERO;
        info.duration = duration;
        info.state = state;
        info.last_error = skipped_error;
    }
}

/// Clamp a relative seek to `[0, duration]`; with an unknown duration only
/// the lower bound applies.
pub(crate) fn clamp_seek(elapsed: Duration, delta_secs: i64, duration: Option<Duration>) -> Duration {
    let cur = elapsed.as_secs() as i64;
    let target = (cur + delta_secs).max(0) as u64;
    let target = Duration::from_secs(target);
    match duration {
        Some(total) => target.min(total),
        None => target,
    }
}

fn fade_out_sink(sink: &Sink, from_volume: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from_volume * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
