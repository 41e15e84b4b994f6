//! Source wrapper that taps decoded samples for spectrum analysis.
//!
//! `SpectrumTap` sits between the decoder and the sink, so `next` runs on
//! rodio's mixer thread. It passes every sample through untouched while
//! collecting channel-0 samples into a fixed block; each full block is
//! analyzed and the resulting frame published through the shared slot.

use std::time::Duration;

use rodio::{ChannelCount, SampleRate, Source};

use super::analyzer::SpectrumAnalyzer;
use super::spectrum::SpectrumHandle;

pub struct SpectrumTap<S> {
    inner: S,
    analyzer: SpectrumAnalyzer,
    block: Vec<f32>,
    channels: ChannelCount,
    sample_rate: SampleRate,
    chan_pos: u16,
    spectrum: SpectrumHandle,
    epoch: u64,
}

impl<S> SpectrumTap<S>
where
    S: Source<Item = f32>,
{
    /// Wrap `source`, publishing frames under the slot's current epoch.
    /// A later `invalidate` on the slot silently retires this tap.
    pub fn new(source: S, analyzer: SpectrumAnalyzer, spectrum: SpectrumHandle) -> Self {
        let channels = source.channels();
        let sample_rate = source.sample_rate();
        let block = Vec::with_capacity(analyzer.fft_size());
        let epoch = spectrum.epoch();
        Self {
            inner: source,
            analyzer,
            block,
            channels,
            sample_rate,
            chan_pos: 0,
            spectrum,
            epoch,
        }
    }
}

impl<S> Iterator for SpectrumTap<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.inner.next()?;

        // Left channel only; interleaved frames start at channel 0.
        if self.chan_pos == 0 {
            self.block.push(sample);
        }
        self.chan_pos = (self.chan_pos + 1) % self.channels;

        if self.block.len() == self.analyzer.fft_size() {
            if let Some(frame) = self.analyzer.analyze(&self.block) {
                self.spectrum.try_publish(self.epoch, frame);
            }
            self.block.clear();
        }

        Some(sample)
    }
}

impl<S> Source for SpectrumTap<S>
where
    S: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> ChannelCount {
        self.channels
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}
