//! Sink construction: open, decode, tap and prepare a paused `rodio::Sink`.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::analyzer::SpectrumAnalyzer;
use super::spectrum::SpectrumHandle;
use super::tap::SpectrumTap;
use super::types::PlayerError;
use crate::library::Track;

/// Create a paused `Sink` for `track` starting at `start_at`, with the
/// spectrum tap wired between decoder and mixer. Also returns the
/// decoder-reported duration, which may be unknown for some formats.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    track: &Track,
    start_at: Duration,
    analyzer: SpectrumAnalyzer,
    spectrum: &SpectrumHandle,
) -> Result<(Sink, Option<Duration>), PlayerError> {
    let file = File::open(&track.path).map_err(|e| PlayerError::DecodeFailure {
        path: track.path.clone(),
        reason: e.to_string(),
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| PlayerError::DecodeFailure {
        path: track.path.clone(),
        reason: e.to_string(),
    })?;

    let total = source.total_duration();

    // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
    let source = source.skip_duration(start_at);
    let tapped = SpectrumTap::new(source, analyzer, spectrum.clone());

    let sink = Sink::connect_new(stream.mixer());
    sink.append(tapped);
    sink.pause();
    Ok((sink, total))
}
