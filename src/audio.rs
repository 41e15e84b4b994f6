//! Audio subsystem: transport state machine, spectrum pipeline and the
//! shared handles the UI reads from.
//!
//! The transport runs on a dedicated command thread (`thread`), decoded
//! audio flows through a `rodio` sink whose source is wrapped by the
//! spectrum tap (`tap`), and completed frames land in a last-value-wins
//! slot (`spectrum`) the UI snapshots on every draw.

mod analyzer;
mod player;
mod select;
mod sink;
mod spectrum;
mod tap;
mod thread;
mod types;

pub use analyzer::SpectrumAnalyzer;
pub use player::AudioPlayer;
pub use spectrum::{SpectrumHandle, SpectrumSlot};
pub use tap::SpectrumTap;
pub use types::{PlaybackHandle, PlaybackInfo, PlaybackState, PlayerError, TransportCmd};
