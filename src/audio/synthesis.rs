//! Glicol voice patches for ring chimes and the horn blast.
//!
//! Glicol renders the raw oscillator and filter; amplitude shaping and onset
//! delays are applied per sample by [`Voice`] so every request is a one-shot.

use glicol::Engine;

use super::{AudioError, ToneSpec};
use crate::params::audio_constants::BLOCK_SIZE;

/// Level treated as silence by exponential releases
const SILENCE: f32 = 0.001;

/// Horn partials (Hz) and their relative gains
const HORN_PARTIALS: [(f32, f32); 4] = [(150.0, 0.4), (225.0, 0.3), (300.0, 0.2), (450.0, 0.15)];

/// Echo layers: (delay s, relative volume)
const HORN_ECHOES: [(f32, f32); 3] = [(0.2, 0.5), (0.4, 0.35), (0.8, 0.2)];

/// Oscillator feeding a patch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    Sine(f32),
    Saw(f32),
    Noise(u32),
}

/// Amplitude envelope: linear attack, hold, exponential release to silence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Level at onset
    pub start_level: f32,
    /// Peak level reached after the attack
    pub peak: f32,
    /// Attack duration (s)
    pub attack_s: f32,
    /// Time at which the release begins (s, >= attack)
    pub release_start_s: f32,
    /// Time at which the voice ends (s)
    pub end_s: f32,
}

impl Envelope {
    /// Gain at `t` seconds after onset
    pub fn gain(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.end_s {
            return 0.0;
        }
        if t < self.attack_s {
            return self.start_level + (self.peak - self.start_level) * t / self.attack_s;
        }
        if t < self.release_start_s || self.peak <= SILENCE {
            return self.peak;
        }
        let span = (self.end_s - self.release_start_s).max(f32::EPSILON);
        let progress = (t - self.release_start_s) / span;
        self.peak * (SILENCE / self.peak).powf(progress)
    }
}

/// A one-shot synth voice description
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub source: Source,
    pub cutoff_hz: f32,
    pub resonance: f32,
    pub envelope: Envelope,
    /// Delay before the voice sounds (s)
    pub onset_s: f32,
}

impl Patch {
    /// Glicol program rendering the filtered source
    pub fn glicol_code(&self) -> String {
        let source = match self.source {
            Source::Sine(hz) => format!("sin {:.3}", hz),
            Source::Saw(hz) => format!("saw {:.3}", hz),
            Source::Noise(seed) => format!("noise {}", seed),
        };
        format!(
            "o: {} >> lpf {:.3} {:.3}\n",
            source, self.cutoff_hz, self.resonance
        )
    }

    /// Total length including onset delay (s)
    pub fn length_s(&self) -> f32 {
        self.onset_s + self.envelope.end_s
    }
}

/// Patch for a ring chime
pub fn tone_patch(tone: &ToneSpec) -> Patch {
    Patch {
        source: Source::Sine(tone.frequency_hz),
        cutoff_hz: tone.filter_cutoff_hz,
        resonance: 1.0,
        envelope: Envelope {
            start_level: 0.0,
            peak: tone.gain,
            attack_s: 0.05,
            release_start_s: 0.05,
            end_s: tone.duration_ms / 1000.0,
        },
        onset_s: 0.0,
    }
}

/// Patches of the horn blast: sustained partials, three fading echoes and a
/// filtered noise tail
pub fn horn_blast_patches() -> Vec<Patch> {
    let mut patches = Vec::with_capacity(HORN_PARTIALS.len() * (1 + HORN_ECHOES.len()) + 1);

    for &(hz, gain) in &HORN_PARTIALS {
        patches.push(Patch {
            source: Source::Saw(hz),
            cutoff_hz: 800.0,
            resonance: 2.0,
            envelope: Envelope {
                start_level: 0.0,
                peak: gain * 0.6,
                attack_s: 0.05,
                release_start_s: 0.3,
                end_s: 1.5,
            },
            onset_s: 0.0,
        });
    }

    for (layer, &(delay_s, volume)) in HORN_ECHOES.iter().enumerate() {
        for &(hz, gain) in &HORN_PARTIALS {
            patches.push(Patch {
                // Each echo sags slightly in pitch
                source: Source::Saw(hz * (1.0 - layer as f32 * 0.02)),
                cutoff_hz: 700.0 - layer as f32 * 100.0,
                resonance: 1.5,
                envelope: Envelope {
                    start_level: 0.0,
                    peak: gain * volume * 0.4,
                    attack_s: 0.05,
                    release_start_s: 0.05,
                    end_s: 1.2,
                },
                onset_s: delay_s,
            });
        }
    }

    patches.push(Patch {
        source: Source::Noise(42),
        cutoff_hz: 400.0,
        resonance: 2.0,
        envelope: Envelope {
            start_level: 0.3,
            peak: 0.3,
            attack_s: 0.0,
            release_start_s: 0.0,
            end_s: 2.5,
        },
        onset_s: 0.8,
    });

    patches
}

/// A sounding voice: one Glicol engine plus envelope and onset bookkeeping
pub struct Voice {
    engine: Engine<BLOCK_SIZE>,
    block: [f32; BLOCK_SIZE],
    cursor: usize,
    delay_samples: usize,
    elapsed_samples: usize,
    total_samples: usize,
    envelope: Envelope,
    sample_rate: f32,
}

impl Voice {
    /// Compile `patch` into a ready-to-render voice
    pub fn new(patch: &Patch, sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::Config("Sample rate must be > 0".to_string()));
        }
        let frequency = match patch.source {
            Source::Sine(hz) | Source::Saw(hz) => hz,
            Source::Noise(_) => patch.cutoff_hz,
        };
        if !(frequency.is_finite() && frequency > 0.0 && patch.cutoff_hz > 0.0) {
            return Err(AudioError::Patch(patch.glicol_code()));
        }

        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate as usize);
        engine.update_with_code(&patch.glicol_code());

        let rate = sample_rate as f32;
        Ok(Self {
            engine,
            block: [0.0; BLOCK_SIZE],
            cursor: BLOCK_SIZE,
            delay_samples: (patch.onset_s * rate) as usize,
            elapsed_samples: 0,
            total_samples: (patch.envelope.end_s * rate).ceil() as usize,
            envelope: patch.envelope,
            sample_rate: rate,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.delay_samples == 0 && self.elapsed_samples >= self.total_samples
    }

    /// Next mono sample (silence during the onset delay)
    pub fn next_sample(&mut self) -> f32 {
        if self.delay_samples > 0 {
            self.delay_samples -= 1;
            return 0.0;
        }
        if self.elapsed_samples >= self.total_samples {
            return 0.0;
        }

        if self.cursor == BLOCK_SIZE {
            let (buffers, _) = self.engine.next_block(vec![]);
            for i in 0..BLOCK_SIZE {
                self.block[i] = buffers[0][i];
            }
            self.cursor = 0;
        }

        let t = self.elapsed_samples as f32 / self.sample_rate;
        let sample = self.block[self.cursor] * self.envelope.gain(t);
        self.cursor += 1;
        self.elapsed_samples += 1;
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_envelope_shape() {
        let env = Envelope {
            start_level: 0.0,
            peak: 0.24,
            attack_s: 0.05,
            release_start_s: 0.3,
            end_s: 1.5,
        };

        assert_eq!(env.gain(-0.1), 0.0);
        assert_relative_eq!(env.gain(0.025), 0.12, epsilon = 1e-6);
        assert_relative_eq!(env.gain(0.2), 0.24, epsilon = 1e-6);
        assert!(env.gain(0.9) < 0.24 && env.gain(0.9) > SILENCE);
        assert_relative_eq!(env.gain(1.4999), SILENCE, epsilon = 1e-4);
        assert_eq!(env.gain(1.5), 0.0);
    }

    #[test]
    fn test_envelope_release_is_monotonic() {
        let env = tone_patch(&ToneSpec {
            frequency_hz: 250.0,
            filter_cutoff_hz: 400.0,
            duration_ms: 300.0,
            gain: 0.08,
        })
        .envelope;

        let mut previous = env.gain(0.05);
        for i in 1..250 {
            let g = env.gain(0.05 + i as f32 * 0.001);
            assert!(g <= previous);
            previous = g;
        }
    }

    #[test]
    fn test_horn_blast_layout() {
        let patches = horn_blast_patches();
        assert_eq!(patches.len(), 4 + 12 + 1);

        // Main partials start immediately, echoes are delayed
        assert!(patches[..4].iter().all(|p| p.onset_s == 0.0));
        assert!(patches[4..16].iter().all(|p| p.onset_s >= 0.2));

        let tail = patches.last().unwrap();
        assert_eq!(tail.source, Source::Noise(42));
        assert_relative_eq!(tail.length_s(), 3.3, epsilon = 1e-5);
    }

    #[test]
    fn test_glicol_code_formats_chain() {
        let patch = tone_patch(&ToneSpec {
            frequency_hz: 180.0,
            filter_cutoff_hz: 300.0,
            duration_ms: 300.0,
            gain: 0.08,
        });
        assert_eq!(patch.glicol_code(), "o: sin 180.000 >> lpf 300.000 1.000\n");
    }

    #[test]
    fn test_invalid_patches_are_rejected() {
        let silent = tone_patch(&ToneSpec {
            frequency_hz: 0.0,
            filter_cutoff_hz: 300.0,
            duration_ms: 300.0,
            gain: 0.08,
        });
        assert!(matches!(Voice::new(&silent, 44100), Err(AudioError::Patch(_))));

        let horn = &horn_blast_patches()[0];
        assert!(matches!(Voice::new(horn, 0), Err(AudioError::Config(_))));
    }
}
