//! Track selection policy for next/prev.
//!
//! Shuffle is a selection policy, not a reorder: the playlist keeps its
//! insertion order and shuffle just picks a differing random index.

use rand::Rng;

use super::types::PlaybackState;

pub(crate) fn pick_next<R: Rng>(
    current: Option<usize>,
    len: usize,
    shuffle: bool,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    // A stale index (playlist shrank) counts as unset.
    let cur = match current {
        Some(i) if i < len => i,
        _ => return Some(0),
    };
    if shuffle && len > 1 {
        // Rejection sampling; terminates because len > 1.
        loop {
            let candidate = rng.random_range(0..len);
            if candidate != cur {
                return Some(candidate);
            }
        }
    }
    Some((cur + 1) % len)
}

pub(crate) fn pick_prev<R: Rng>(
    current: Option<usize>,
    len: usize,
    shuffle: bool,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let cur = match current {
        Some(i) if i < len => i,
        _ => return Some(len - 1),
    };
    if shuffle && len > 1 {
        loop {
            let candidate = rng.random_range(0..len);
            if candidate != cur {
                return Some(candidate);
            }
        }
    }
    Some((cur + len - 1) % len)
}

/// State the transport ends in after a track switch: a playlist click
/// forces Playing, next/prev/auto-advance inherit the prior state.
pub(crate) fn state_after_switch(prior: PlaybackState, force_play: bool) -> PlaybackState {
    if force_play || prior == PlaybackState::Playing {
        PlaybackState::Playing
    } else {
        PlaybackState::Paused
    }
}
