use crate::app::App;
use crate::audio::PlaybackState;
use crate::mpris::MprisHandle;

/// What the MPRIS service last saw, so metadata and status only get
/// republished on actual change. Position updates every tick regardless.
pub struct Published {
    index: Option<usize>,
    state: PlaybackState,
}

impl Default for Published {
    fn default() -> Self {
        Self {
            index: None,
            state: PlaybackState::Stopped,
        }
    }
}

pub fn update_mpris(mpris: &MprisHandle, app: &App, last: &mut Published) {
    let Some(handle) = &app.playback_handle else {
        return;
    };
    let Ok(info) = handle.lock() else { return };

    if info.index != last.index {
        match info.index {
            Some(i) => mpris.set_track_metadata(Some(i), app.tracks.get(i)),
            None => mpris.set_track_metadata(None, None),
        }
        last.index = info.index;
    }

    if info.state != last.state {
        mpris.set_playback(info.state);
        last.state = info.state;
    }

    mpris.set_position(info.elapsed.as_micros() as i64);
}
