//! Audio system: cpal output stream mixing one-shot Glicol voices.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use std::thread;

use super::fft::spawn_fft_thread;
use super::synthesis::{horn_blast_patches, tone_patch, Patch, Voice};
use super::{AudioEngine, AudioError, AudioLevels, ToneSpec};
use crate::params::{AudioConfig, FftConfig};

/// Voice mixer shared between the scene thread and the audio callback
struct Mixer {
    voices: Vec<Voice>,
    volume: f32,
    muted: bool,
    limiter: f32,
    max_voices: usize,
}

impl Mixer {
    fn new(config: &AudioConfig) -> Self {
        Self {
            voices: Vec::new(),
            volume: config.master_volume.clamp(0.0, 1.0),
            muted: config.muted,
            limiter: config.limiter,
            max_voices: config.max_voices,
        }
    }

    fn add(&mut self, voice: Voice) {
        if self.voices.len() >= self.max_voices {
            self.voices.remove(0);
        }
        self.voices.push(voice);
    }

    /// Mix the next mono sample and retire finished voices
    fn next_sample(&mut self) -> f32 {
        let mut mix = 0.0;
        for voice in &mut self.voices {
            mix += voice.next_sample();
        }
        self.voices.retain(|v| !v.is_finished());

        let gain = if self.muted { 0.0 } else { self.volume };
        (mix * gain).clamp(-self.limiter, self.limiter)
    }
}

/// Audio system rendering scene requests to the default output device
pub struct AudioSystem {
    mixer: Arc<Mutex<Mixer>>,

    /// Shared FFT band levels (thread-safe)
    levels: Arc<Mutex<AudioLevels>>,

    sample_rate: u32,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    /// FFT analysis thread handle
    _fft_thread: Option<thread::JoinHandle<()>>,
}

impl AudioSystem {
    /// Open the default output device and start streaming
    pub fn new(config: AudioConfig, mut fft_config: FftConfig) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let supported = device.default_output_config()?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(AudioError::Config(format!(
                "Unsupported sample format {:?}",
                supported.sample_format()
            )));
        }

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        fft_config.sample_rate_hz = sample_rate as usize;
        fft_config.validate()?;

        log::info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let mixer = Arc::new(Mutex::new(Mixer::new(&config)));
        let mixer_callback = Arc::clone(&mixer);

        let fft_buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let fft_buffer_callback = Arc::clone(&fft_buffer);
        let fft_capacity = fft_config.fft_size * 4;

        let levels = Arc::new(Mutex::new(AudioLevels::default()));

        let stream = device.build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let Ok(mut mixer) = mixer_callback.lock() else {
                    data.fill(0.0);
                    return;
                };
                let mut fft_buf = fft_buffer_callback.lock().ok();

                for frame in data.chunks_mut(channels) {
                    let sample = mixer.next_sample();
                    frame.fill(sample);

                    if let Some(buf) = fft_buf.as_mut() {
                        buf.push(sample);
                    }
                }

                // Bound the analysis backlog if the FFT thread falls behind
                if let Some(buf) = fft_buf.as_mut() {
                    if buf.len() > fft_capacity {
                        let excess = buf.len() - fft_capacity;
                        buf.drain(0..excess);
                    }
                }
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )?;

        stream.play()?;

        let fft_thread = spawn_fft_thread(fft_config, fft_buffer, Arc::clone(&levels));

        Ok(Self {
            mixer,
            levels,
            sample_rate,
            _stream: stream,
            _fft_thread: Some(fft_thread),
        })
    }

    /// Compile patches off the audio thread, then hand them to the mixer together
    fn schedule(&self, patches: &[Patch]) {
        let voices: Vec<Voice> = patches
            .iter()
            .filter_map(|patch| match Voice::new(patch, self.sample_rate) {
                Ok(voice) => Some(voice),
                Err(e) => {
                    log::warn!("Skipping voice: {}", e);
                    None
                }
            })
            .collect();

        if let Ok(mut mixer) = self.mixer.lock() {
            for voice in voices {
                mixer.add(voice);
            }
        }
    }
}

impl AudioEngine for AudioSystem {
    fn play_tone(&self, tone: ToneSpec) {
        self.schedule(&[tone_patch(&tone)]);
    }

    fn play_burst(&self) {
        self.schedule(&horn_blast_patches());
    }

    fn set_volume(&self, volume: f32) {
        if let Ok(mut mixer) = self.mixer.lock() {
            mixer.volume = volume.clamp(0.0, 1.0);
        }
    }

    fn volume(&self) -> f32 {
        self.mixer.lock().map(|m| m.volume).unwrap_or(0.0)
    }

    fn toggle_mute(&self) {
        if let Ok(mut mixer) = self.mixer.lock() {
            mixer.muted = !mixer.muted;
            log::debug!("Audio muted: {}", mixer.muted);
        }
    }

    fn levels(&self) -> AudioLevels {
        self.levels.lock().map(|l| *l).unwrap_or_default()
    }
}
