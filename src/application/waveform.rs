//! Live recording waveform
//!
//! Purely cosmetic frequency-domain bars computed from the capture session's
//! analysis tap. Nothing here touches note state.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of FFT bins
const FFT_SIZE: usize = 512;

/// Number of rendered bars
pub const BAR_COUNT: usize = 24;

/// Minimum bar amplitude so quiet input stays visible
const MIN_AMPLITUDE: f32 = 0.02;

/// Amplification applied to raw magnitudes before clamping
const SAMPLE_AMPLIFICATION: f32 = 6.0;

// Smoothing filter weights (must sum to 1.0)
const PREV_BAR_WEIGHT: f32 = 0.2;
const CURRENT_BAR_WEIGHT: f32 = 0.6;
const NEXT_BAR_WEIGHT: f32 = 0.2;

/// Computes frequency-domain bar magnitudes from raw capture samples.
pub struct WaveformAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    input: Vec<Complex<f32>>,
    bars: Vec<f32>,
}

impl WaveformAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        // Hann window for better frequency resolution
        let window = (0..FFT_SIZE)
            .map(|i| {
                let x = i as f32 / (FFT_SIZE - 1) as f32;
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * x).cos())
            })
            .collect();

        Self {
            fft,
            window,
            input: vec![Complex { re: 0.0, im: 0.0 }; FFT_SIZE],
            bars: vec![MIN_AMPLITUDE; BAR_COUNT],
        }
    }

    /// Latest bar magnitudes, each in 0..=1
    pub fn bars(&self) -> &[f32] {
        &self.bars
    }

    /// Recompute the bars from the latest samples.
    pub fn update(&mut self, samples: &[f32]) -> &[f32] {
        for (i, slot) in self.input.iter_mut().enumerate() {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            slot.re = sample * self.window[i];
            slot.im = 0.0;
        }

        self.fft.process(&mut self.input);

        // Average the magnitudes of the lower half into BAR_COUNT bins
        let usable_bins = FFT_SIZE / 2;
        let bins_per_bar = usable_bins / BAR_COUNT;
        let mut raw = [0.0f32; BAR_COUNT];
        for (bar, value) in raw.iter_mut().enumerate() {
            let start = bar * bins_per_bar;
            let sum: f32 = self.input[start..start + bins_per_bar]
                .iter()
                .map(|c| (c.re * c.re + c.im * c.im).sqrt())
                .sum();
            let mean = sum / bins_per_bar as f32 / FFT_SIZE as f32;
            *value = (mean * SAMPLE_AMPLIFICATION)
                .sqrt()
                .clamp(MIN_AMPLITUDE, 1.0);
        }

        // Neighbor smoothing so adjacent bars move together
        for bar in 0..BAR_COUNT {
            let prev = raw[bar.saturating_sub(1)];
            let next = raw[(bar + 1).min(BAR_COUNT - 1)];
            self.bars[bar] =
                prev * PREV_BAR_WEIGHT + raw[bar] * CURRENT_BAR_WEIGHT + next * NEXT_BAR_WEIGHT;
        }

        &self.bars
    }
}

impl Default for WaveformAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_count_is_stable() {
        let mut analyzer = WaveformAnalyzer::new();
        assert_eq!(analyzer.bars().len(), BAR_COUNT);
        assert_eq!(analyzer.update(&[0.5; 128]).len(), BAR_COUNT);
    }

    #[test]
    fn silence_stays_at_the_floor() {
        let mut analyzer = WaveformAnalyzer::new();
        let bars = analyzer.update(&[0.0; FFT_SIZE]);
        for &bar in bars {
            assert!((MIN_AMPLITUDE..=MIN_AMPLITUDE * 1.5).contains(&bar));
        }
    }

    #[test]
    fn tone_raises_low_frequency_bars() {
        let mut analyzer = WaveformAnalyzer::new();

        // A low-frequency tone spanning a few FFT bins
        let samples: Vec<f32> = (0..FFT_SIZE)
            .map(|i| (2.0 * std::f32::consts::PI * 8.0 * i as f32 / FFT_SIZE as f32).sin())
            .collect();
        let bars = analyzer.update(&samples).to_vec();

        // Energy concentrates in the first bar's bin range (bin 8 of 256)
        let loudest = bars
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(BAR_COUNT);
        assert!(loudest <= 1, "expected a low bar, got {}", loudest);
        assert!(bars[loudest] > MIN_AMPLITUDE * 2.0);
    }

    #[test]
    fn bars_are_clamped_to_unit_range() {
        let mut analyzer = WaveformAnalyzer::new();
        let bars = analyzer.update(&[1.0; FFT_SIZE]);
        for &bar in bars {
            assert!((0.0..=1.0).contains(&bar));
        }
    }
}
