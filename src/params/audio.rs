//! Audio output and analysis configuration.

use std::ops::Range;

use crate::audio::AudioError;

/// Output mixer configuration
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Master volume (0..=1)
    pub master_volume: f32,

    /// Start muted
    pub muted: bool,

    /// Hard limiter applied to the mixed signal
    pub limiter: f32,

    /// Maximum simultaneously sounding voices (oldest dropped beyond)
    pub max_voices: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: 0.6,
            muted: false,
            // Hard clip to ±0.5 to protect ears
            limiter: 0.5,
            max_voices: 64,
        }
    }
}

/// FFT analysis configuration with frequency band mappings
#[derive(Debug, Clone)]
pub struct FftConfig {
    /// Audio sample rate (Hz), replaced by the device rate when the stream opens
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2)
    pub fft_size: usize,

    /// FFT update interval (milliseconds)
    pub update_interval_ms: u64,

    /// Bass frequency range (Hz)
    pub bass_range_hz: (f32, f32),

    /// Mid frequency range (Hz)
    pub mid_range_hz: (f32, f32),

    /// High frequency range (Hz)
    pub high_range_hz: (f32, f32),

    /// Divisor turning mean bin magnitude into a 0..=1 level
    pub level_scale: f32,
}

impl Default for FftConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 1024,
            update_interval_ms: 50,
            bass_range_hz: (20.0, 200.0),
            mid_range_hz: (200.0, 1000.0),
            high_range_hz: (1000.0, 4000.0),
            level_scale: 8.0,
        }
    }
}

impl FftConfig {
    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// FFT bin range for bass frequencies
    pub fn bass_bins(&self) -> Range<usize> {
        self.hz_to_bin(self.bass_range_hz.0)..self.hz_to_bin(self.bass_range_hz.1)
    }

    /// FFT bin range for mid frequencies
    pub fn mid_bins(&self) -> Range<usize> {
        self.hz_to_bin(self.mid_range_hz.0)..self.hz_to_bin(self.mid_range_hz.1)
    }

    /// FFT bin range for high frequencies
    pub fn high_bins(&self) -> Range<usize> {
        self.hz_to_bin(self.high_range_hz.0)..self.hz_to_bin(self.high_range_hz.1)
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), AudioError> {
        if !self.fft_size.is_power_of_two() {
            return Err(AudioError::Config(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            )));
        }
        if self.sample_rate_hz == 0 {
            return Err(AudioError::Config("Sample rate must be > 0".to_string()));
        }
        if self.high_range_hz.1 * 2.0 > self.sample_rate_hz as f32 {
            return Err(AudioError::Config(format!(
                "High band {} Hz exceeds Nyquist at {} Hz",
                self.high_range_hz.1, self.sample_rate_hz
            )));
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    pub const BLOCK_SIZE: usize = 128;
}
