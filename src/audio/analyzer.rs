//! Spectrum analysis: fixed-size PCM blocks in, display-ready magnitude
//! bars out.
//!
//! The transform plan, window and every scratch buffer are allocated once
//! at construction so `analyze` is allocation-free; the analyzer runs on
//! rodio's mixer thread and must stay cheap.

use std::f32::consts::PI;
use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use crate::config::VisualizerSettings;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    input: Vec<f32>,
    output: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    frame: Vec<f32>,
    fft_size: usize,
    bars: usize,
    gain: f32,
    floor: f32,
    ceiling: f32,
}

impl SpectrumAnalyzer {
    /// Build an analyzer for the given settings. Assumes the settings have
    /// passed `Settings::validate` (power-of-two fft_size, sane bar count).
    pub fn new(cfg: &VisualizerSettings) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(cfg.fft_size);

        // Hann window. The rectangular window would match the reference
        // visuals but leaks badly across bands.
        let window: Vec<f32> = (0..cfg.fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / cfg.fft_size as f32).cos()))
            .collect();

        let input = fft.make_input_vec();
        let output = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();

        Self {
            fft,
            window,
            input,
            output,
            scratch,
            frame: vec![cfg.floor; cfg.bars],
            fft_size: cfg.fft_size,
            bars: cfg.bars,
            gain: cfg.gain,
            floor: cfg.floor,
            ceiling: cfg.ceiling,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// A frame with every bar at the display floor; what silence looks like.
    pub fn floor_frame(&self) -> Vec<f32> {
        vec![self.floor; self.bars]
    }

    /// Analyze one PCM block. Returns `None` when the block is not exactly
    /// `fft_size` samples long: short blocks are skipped rather than
    /// zero-padded so they cannot manufacture false energy.
    pub fn analyze(&mut self, block: &[f32]) -> Option<&[f32]> {
        if block.len() != self.fft_size {
            return None;
        }

        for ((dst, &s), &w) in self.input.iter_mut().zip(block).zip(&self.window) {
            *dst = s * w;
        }

        if self
            .fft
            .process_with_scratch(&mut self.input, &mut self.output, &mut self.scratch)
            .is_err()
        {
            return None;
        }

        // Group the first fft_size/2 bins into equal-width bands; the last
        // band absorbs any remainder when bars does not divide evenly.
        let half = self.fft_size / 2;
        let band_width = half / self.bars;
        let norm = 1.0 / self.fft_size as f32;

        for b in 0..self.bars {
            let start = b * band_width;
            let end = if b + 1 == self.bars {
                half
            } else {
                start + band_width
            };

            let mut sum = 0.0f32;
            for bin in &self.output[start..end] {
                sum += bin.norm() * norm;
            }
            let avg = sum / (end - start) as f32;

            let mut v = avg.sqrt() * self.gain;
            if !v.is_finite() {
                v = self.floor;
            }
            self.frame[b] = v.clamp(self.floor, self.ceiling);
        }

        Some(&self.frame)
    }
}
