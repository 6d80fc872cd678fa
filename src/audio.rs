//! Audio collaborator: fire-and-forget tone and horn-blast requests.
//!
//! The scene only talks to the [`AudioEngine`] trait. [`AudioSystem`] renders
//! Glicol voices through cpal and analyses its own output with an FFT;
//! [`SilentAudio`] stands in when no device is available so visuals never
//! depend on sound.

mod fft;
mod synthesis;
mod system;

use thiserror::Error;

pub use fft::{analyze_bands, hann_window};
pub use synthesis::{horn_blast_patches, tone_patch, Envelope, Patch, Source, Voice};
pub use system::AudioSystem;

/// Request for a single filtered tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub filter_cutoff_hz: f32,
    pub duration_ms: f32,
    pub gain: f32,
}

/// Frequency band energies of the audio output (each 0..=1)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioLevels {
    pub low: f32,  // Bass (20-200 Hz)
    pub mid: f32,  // Mids (200-1000 Hz)
    pub high: f32, // Highs (1000-4000 Hz)
}

/// Errors raised while bringing up audio output
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Invalid audio configuration: {0}")]
    Config(String),

    #[error("Failed to query output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Synth patch rejected: {0}")]
    Patch(String),
}

/// Non-blocking sound requests issued by the scene
pub trait AudioEngine {
    /// Play one filtered tone
    fn play_tone(&self, tone: ToneSpec);

    /// Play the horn blast: layered partials, delayed echoes and a noise tail
    fn play_burst(&self);

    /// Set master volume (0..=1)
    fn set_volume(&self, _volume: f32) {}

    /// Current master volume
    fn volume(&self) -> f32 {
        0.0
    }

    fn toggle_mute(&self) {}

    /// Latest band levels of the output signal
    fn levels(&self) -> AudioLevels {
        AudioLevels::default()
    }
}

/// Audio engine used when no output device can be opened
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioEngine for SilentAudio {
    fn play_tone(&self, _tone: ToneSpec) {}

    fn play_burst(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_audio_reports_no_energy() {
        let audio = SilentAudio;
        audio.play_burst();
        audio.play_tone(ToneSpec {
            frequency_hz: 440.0,
            filter_cutoff_hz: 800.0,
            duration_ms: 300.0,
            gain: 0.1,
        });
        audio.set_volume(1.0);
        assert_eq!(audio.levels(), AudioLevels::default());
        assert_eq!(audio.volume(), 0.0);
    }
}
