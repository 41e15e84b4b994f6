//! Last-value-wins handoff for spectrum frames.
//!
//! The mixer thread publishes through `try_publish` (never blocks, drops
//! on contention); the UI snapshots whatever frame is current. An epoch
//! counter lets the transport invalidate in-flight frames on stop or
//! track switch so stale data never lands after the switch completed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub struct SpectrumSlot {
    frame: Mutex<Vec<f32>>,
    epoch: AtomicU64,
    floor: f32,
}

pub type SpectrumHandle = Arc<SpectrumSlot>;

impl SpectrumSlot {
    pub fn new(bars: usize, floor: f32) -> SpectrumHandle {
        Arc::new(Self {
            frame: Mutex::new(vec![floor; bars]),
            epoch: AtomicU64::new(0),
            floor,
        })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Invalidate all frames published under previous epochs. Called by the
    /// transport before stopping or switching tracks; returns the new epoch
    /// a freshly created tap should publish under.
    pub fn invalidate(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Overwrite the slot with an all-floor frame. Transport-side, so a
    /// plain lock is fine here.
    pub fn clear_to_floor(&self) {
        if let Ok(mut slot) = self.frame.lock() {
            slot.fill(self.floor);
        }
    }

    /// Publish a completed frame from the mixer thread. Returns false when
    /// the frame was dropped: either the epoch is stale (track switched
    /// under us) or the slot is momentarily held by a reader. Dropping is
    /// deliberate; the audio path never waits.
    pub fn try_publish(&self, epoch: u64, frame: &[f32]) -> bool {
        if epoch != self.epoch.load(Ordering::Acquire) {
            return false;
        }
        let Ok(mut slot) = self.frame.try_lock() else {
            return false;
        };
        // Re-check under the lock: invalidate may have raced the first load.
        if epoch != self.epoch.load(Ordering::Acquire) {
            return false;
        }
        slot.clear();
        slot.extend_from_slice(frame);
        true
    }

    /// Copy the current frame into `out` (UI side).
    pub fn snapshot(&self, out: &mut Vec<f32>) {
        if let Ok(slot) = self.frame.lock() {
            out.clear();
            out.extend_from_slice(&slot);
        }
    }
}
