use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use super::spectrum::{SpectrumHandle, SpectrumSlot};
use super::thread::spawn_transport_thread;
use super::types::{PlaybackHandle, PlaybackInfo, TransportCmd};
use crate::config::{PlaybackSettings, VisualizerSettings};
use crate::library::Track;

/// Handle to the transport thread. Commands go in through `send`; state
/// comes back through the playback and spectrum handles.
pub struct AudioPlayer {
    tx: Sender<TransportCmd>,
    playback: PlaybackHandle,
    spectrum: SpectrumHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(
        tracks: Vec<Track>,
        playback_settings: &PlaybackSettings,
        visualizer: VisualizerSettings,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<TransportCmd>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let spectrum = SpectrumSlot::new(visualizer.bars, visualizer.floor);

        let join = spawn_transport_thread(
            tracks,
            rx,
            playback.clone(),
            spectrum.clone(),
            visualizer,
            playback_settings.shuffle,
            playback_settings.volume,
        );

        Self {
            tx,
            playback,
            spectrum,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn spectrum_handle(&self) -> SpectrumHandle {
        self.spectrum.clone()
    }

    pub fn send(&self, cmd: TransportCmd) -> Result<(), mpsc::SendError<TransportCmd>> {
        self.tx.send(cmd)
    }

    /// Ask the transport to fade out and exit, then wait for it.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.tx.send(TransportCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }
}
