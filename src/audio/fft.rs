//! FFT analysis thread and band extraction.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::ops::Range;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::AudioLevels;
use crate::params::FftConfig;

/// Spawn the analysis thread.
///
/// The thread exits once it holds the last reference to `fft_buffer`, i.e.
/// after the owning audio system is dropped.
pub(super) fn spawn_fft_thread(
    config: FftConfig,
    fft_buffer: Arc<Mutex<Vec<f32>>>,
    levels: Arc<Mutex<AudioLevels>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let mut scratch = vec![Complex::new(0.0, 0.0); config.fft_size];

        while Arc::strong_count(&fft_buffer) > 1 {
            thread::sleep(Duration::from_millis(config.update_interval_ms));

            let Ok(mut fft_buf) = fft_buffer.lock() else {
                break;
            };
            if fft_buf.len() < config.fft_size {
                continue;
            }

            let bands = analyze_bands(
                fft.as_ref(),
                &fft_buf[..config.fft_size],
                &config,
                &mut scratch,
            );

            // 50% overlap (drain half the window)
            fft_buf.drain(0..config.fft_size / 2);
            drop(fft_buf);

            if let Ok(mut shared) = levels.lock() {
                *shared = bands;
            }
        }
        log::debug!("FFT analysis thread stopped");
    })
}

/// Window `samples`, transform them and average the magnitude of each band.
///
/// `samples` and `scratch` must both hold `config.fft_size` values.
pub fn analyze_bands(
    fft: &dyn Fft<f32>,
    samples: &[f32],
    config: &FftConfig,
    scratch: &mut [Complex<f32>],
) -> AudioLevels {
    let size = config.fft_size;
    for (i, slot) in scratch.iter_mut().enumerate().take(size) {
        let sample = samples.get(i).copied().unwrap_or(0.0);
        *slot = Complex::new(sample * hann_window(i, size), 0.0);
    }
    fft.process(scratch);

    let band = |bins: Range<usize>| -> f32 {
        let bins = bins.start.max(1)..bins.end.min(size / 2);
        if bins.is_empty() {
            return 0.0;
        }
        let mean = scratch[bins.clone()].iter().map(|c| c.norm()).sum::<f32>() / bins.len() as f32;
        (mean / size as f32 * config.level_scale).min(1.0)
    };

    AudioLevels {
        low: band(config.bass_bins()),
        mid: band(config.mid_bins()),
        high: band(config.high_bins()),
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(hz: f32, config: &FftConfig) -> Vec<f32> {
        (0..config.fft_size)
            .map(|i| 0.3 * (2.0 * PI * hz * i as f32 / config.sample_rate_hz as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Zero at the edges, one at the center
        assert!(hann_window(0, size).abs() < 0.01);
        assert!(hann_window(size - 1, size).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_bass_tone_lands_in_low_band() {
        let config = FftConfig::default();
        let fft = FftPlanner::new().plan_fft_forward(config.fft_size);
        let mut scratch = vec![Complex::new(0.0, 0.0); config.fft_size];

        let levels = analyze_bands(fft.as_ref(), &sine(150.0, &config), &config, &mut scratch);
        assert!(levels.low > levels.mid);
        assert!(levels.low > levels.high);
        assert!(levels.low <= 1.0);
    }

    #[test]
    fn test_high_tone_lands_in_high_band() {
        let config = FftConfig::default();
        let fft = FftPlanner::new().plan_fft_forward(config.fft_size);
        let mut scratch = vec![Complex::new(0.0, 0.0); config.fft_size];

        let levels = analyze_bands(fft.as_ref(), &sine(2500.0, &config), &config, &mut scratch);
        assert!(levels.high > levels.low);
    }

    #[test]
    fn test_silence_has_no_energy() {
        let config = FftConfig::default();
        let fft = FftPlanner::new().plan_fft_forward(config.fft_size);
        let mut scratch = vec![Complex::new(0.0, 0.0); config.fft_size];

        let levels = analyze_bands(fft.as_ref(), &vec![0.0; config.fft_size], &config, &mut scratch);
        assert_eq!(levels, AudioLevels::default());
    }
}
