//! The scene aggregate: clock, camera, guardian and every entity collection.
//!
//! One [`Scene`] owns all mutable state. Each display frame the caller hands
//! over the commands sampled since the previous frame; they are applied in
//! order, then a running clock drives one update tick:
//!
//! camera zoom → backdrop phases → guardian → camera follow → spawn → entity
//! update and eviction.

mod backdrop;
mod entities;
mod guardian;
mod spawner;

pub use backdrop::{
    Backdrop, Bridge, BridgeSegment, Constellation, ConstellationStar, SacredPattern, Star,
};
pub use entities::{BoundedQueue, EchoRing, Particle, Relic, RelicKind, RingKind, Rune, Traveler};
pub use guardian::Guardian;
pub use spawner::{SpawnTimer, Spawner};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Instant;

use crate::audio::{AudioEngine, AudioLevels, ToneSpec};
use crate::camera::CameraSystem;
use crate::clock::{Clock, FrameTime};
use crate::params::{CameraParams, EchoMode, GuardianParams, SceneParams};

/// User intent, sampled once per frame and applied before the update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Shift the guardian target one step along a direction
    MoveIntent(Vec2),
    /// Pointer click at a screen position
    Click(Vec2),
    /// Step through echo modes (±1)
    CycleMode(i32),
    /// Jump to echo mode by zero-based index
    SelectMode(usize),
    TriggerBurst,
    TogglePause,
    ToggleBirdsEye,
    Reset,
    AdjustIntensity(f32),
    AdjustVolume(f32),
    ToggleMute,
}

pub struct Scene {
    pub params: SceneParams,
    pub clock: Clock,
    pub camera: CameraSystem,
    pub guardian: Guardian,
    pub backdrop: Backdrop,

    pub echo_rings: BoundedQueue<EchoRing>,
    pub runes: Vec<Rune>,
    pub travelers: Vec<Traveler>,
    pub relics: BoundedQueue<Relic>,
    pub particles: Vec<Particle>,

    pub spawner: Spawner,

    /// Visual intensity multiplier applied to draw alpha and chime gain
    pub intensity: f32,

    /// Band levels of the audio output, sampled once per tick
    pub resonance: AudioLevels,

    /// Scene time at which the current horn blast stops blocking new ones
    horn_until_ms: Option<f64>,

    rng: StdRng,
}

impl Scene {
    pub fn new(
        params: SceneParams,
        camera_params: CameraParams,
        guardian_params: GuardianParams,
        viewport: Vec2,
        mut rng: StdRng,
        now: Instant,
    ) -> Self {
        let backdrop = Backdrop::generate(&params.backdrop, viewport, &mut rng);
        let (lo, hi) = params.intensity_range;
        let intensity = params.intensity.clamp(lo, hi.max(lo));

        Self {
            clock: Clock::new(now),
            camera: CameraSystem::new(camera_params, viewport),
            guardian: Guardian::new(guardian_params),
            backdrop,
            echo_rings: BoundedQueue::new(params.echo.max_rings),
            runes: Vec::new(),
            travelers: Vec::new(),
            relics: BoundedQueue::new(params.relic.max_relics),
            particles: Vec::new(),
            spawner: Spawner::new(params.start_mode),
            intensity,
            resonance: AudioLevels::default(),
            horn_until_ms: None,
            rng,
            params,
        }
    }

    pub fn mode(&self) -> EchoMode {
        self.spawner.mode()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Whether a horn blast is still blocking the next one
    pub fn burst_in_flight(&self) -> bool {
        self.horn_until_ms.is_some()
    }

    /// Apply `commands`, then run one tick if the clock is running.
    ///
    /// Returns `None` while paused; the frame should not be drawn.
    pub fn frame(
        &mut self,
        now: Instant,
        commands: impl IntoIterator<Item = Command>,
        audio: &dyn AudioEngine,
    ) -> Option<FrameTime> {
        for command in commands {
            self.apply(command, now, audio);
        }

        let time = self.clock.tick(now)?;
        self.update(time.scene_ms, audio);
        Some(time)
    }

    pub fn apply(&mut self, command: Command, now: Instant, audio: &dyn AudioEngine) {
        match command {
            Command::MoveIntent(direction) => {
                if !self.is_paused() {
                    self.guardian.nudge_target(direction);
                }
            }
            Command::Click(screen) => {
                let world = self.camera.screen_to_world(screen);
                self.guardian.set_target_clamped(world);
            }
            Command::CycleMode(direction) => {
                let mode = self.mode().cycled(direction);
                self.spawner.set_mode(mode);
            }
            Command::SelectMode(index) => match EchoMode::from_index(index) {
                Some(mode) => self.spawner.set_mode(mode),
                None => log::warn!("No echo mode at index {}", index),
            },
            Command::TriggerBurst => {
                self.trigger_burst(audio);
            }
            Command::TogglePause => {
                self.clock.toggle(now);
                log::debug!("Paused: {}", self.is_paused());
            }
            Command::ToggleBirdsEye => self.camera.toggle_birds_eye(),
            Command::Reset => self.reset(),
            Command::AdjustIntensity(delta) => {
                let (lo, hi) = self.params.intensity_range;
                self.intensity = (self.intensity + delta).clamp(lo, hi.max(lo));
            }
            Command::AdjustVolume(delta) => {
                audio.set_volume((audio.volume() + delta).clamp(0.0, 1.0));
            }
            Command::ToggleMute => audio.toggle_mute(),
        }
    }

    /// One running tick at scene time `now_ms`
    pub fn update(&mut self, now_ms: f64, audio: &dyn AudioEngine) {
        self.camera.update_zoom();
        self.backdrop.update();
        self.guardian.update(now_ms);
        self.camera.follow(self.guardian.position);

        if self.horn_until_ms.is_some_and(|until| now_ms >= until) {
            self.horn_until_ms = None;
        }

        self.spawn(now_ms, audio);

        let params = &self.params;
        for ring in self.echo_rings.iter_mut() {
            ring.update(&params.echo);
        }
        self.echo_rings.retain(|r| !r.is_faded());

        for rune in &mut self.runes {
            rune.update(&params.rune);
        }
        self.runes.retain(|r| !r.is_faded());

        for traveler in &mut self.travelers {
            traveler.update(&params.traveler);
        }
        self.travelers.retain(|t| !t.is_gone(&params.traveler));

        for relic in self.relics.iter_mut() {
            relic.update();
        }

        for particle in &mut self.particles {
            particle.update(&params.particle);
        }
        self.particles.retain(|p| !p.is_faded());

        self.resonance = audio.levels();
    }

    fn spawn(&mut self, now_ms: f64, audio: &dyn AudioEngine) {
        if self.spawner.echo_due(now_ms) {
            self.spawn_echo(audio);
        }

        if self
            .spawner
            .traveler_due(now_ms, &self.params.traveler, &mut self.rng)
        {
            let origin = self.backdrop.bridge.origin;
            let traveler = Traveler::spawn(origin, &self.params.traveler, &mut self.rng);
            self.travelers.push(traveler);
        }
    }

    /// Ring at the guardian in the current mode, maybe with a chime and a rune
    fn spawn_echo(&mut self, audio: &dyn AudioEngine) {
        let mode = self.mode();
        let origin = self.guardian.position;
        let ring = EchoRing::spawn(origin, mode, &self.params.echo, &mut self.rng);
        let color = ring.color;
        self.echo_rings.push(ring);

        if self.rng.random::<f64>() < self.params.echo.tone_chance {
            let (frequency_hz, filter_cutoff_hz) = mode.tone();
            audio.play_tone(ToneSpec {
                frequency_hz,
                filter_cutoff_hz,
                duration_ms: self.params.echo.tone_duration_ms,
                gain: self.params.echo.tone_gain * self.intensity,
            });
        }

        if self.rng.random::<f64>() < self.params.rune.spawn_chance {
            let rune = Rune::spawn(origin, color, &self.params.rune, &mut self.rng);
            self.runes.push(rune);
        }
    }

    /// Sound the horn at the guardian: ring cascade, one relic and a
    /// radial particle explosion.
    ///
    /// Returns `false` without effect while a previous blast is in flight.
    pub fn trigger_burst(&mut self, audio: &dyn AudioEngine) -> bool {
        if self.burst_in_flight() {
            return false;
        }

        let now_ms = self.clock.scene_ms();
        let origin = self.guardian.position;
        let burst = &self.params.burst;

        audio.play_burst();

        for i in 0..burst.ring_count {
            self.echo_rings.push(EchoRing::horn(origin, i, burst));
        }

        self.relics
            .push(Relic::spawn(origin, now_ms, &self.params.relic, &mut self.rng));

        for i in 0..burst.particle_count {
            self.particles
                .push(Particle::radial(origin, i, burst, &mut self.rng));
        }

        self.horn_until_ms = Some(now_ms + burst.cooldown_ms);
        log::debug!("Horn blast at ({:.0}, {:.0})", origin.x, origin.y);
        true
    }

    /// Clear every dynamic collection and bring guardian and camera home.
    ///
    /// Zoom, echo mode, intensity and spawn timers are kept.
    pub fn reset(&mut self) {
        self.echo_rings.clear();
        self.runes.clear();
        self.travelers.clear();
        self.relics.clear();
        self.particles.clear();
        self.guardian.reset();
        self.camera.recenter();
        log::debug!("Scene reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use std::cell::{Cell, RefCell};
    use std::f32::consts::TAU;
    use std::time::Duration;

    /// Audio engine double recording every request
    #[derive(Default)]
    struct RecordingAudio {
        tones: RefCell<Vec<ToneSpec>>,
        bursts: Cell<usize>,
        volume: Cell<f32>,
        mutes: Cell<usize>,
    }

    impl AudioEngine for RecordingAudio {
        fn play_tone(&self, tone: ToneSpec) {
            self.tones.borrow_mut().push(tone);
        }

        fn play_burst(&self) {
            self.bursts.set(self.bursts.get() + 1);
        }

        fn set_volume(&self, volume: f32) {
            self.volume.set(volume);
        }

        fn volume(&self) -> f32 {
            self.volume.get()
        }

        fn toggle_mute(&self) {
            self.mutes.set(self.mutes.get() + 1);
        }

        fn levels(&self) -> AudioLevels {
            AudioLevels {
                low: 0.5,
                mid: 0.25,
                high: 0.125,
            }
        }
    }

    fn scene_at(t0: Instant, seed: u64) -> Scene {
        Scene::new(
            SceneParams::default(),
            CameraParams::default(),
            GuardianParams::default(),
            Vec2::new(1280.0, 720.0),
            StdRng::seed_from_u64(seed),
            t0,
        )
    }

    const NO_INPUT: [Command; 0] = [];

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn test_burst_on_empty_scene() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 1);
        let audio = RecordingAudio::default();

        assert!(scene.trigger_burst(&audio));
        assert_eq!(audio.bursts.get(), 1);
        assert_eq!(scene.echo_rings.len(), 8);
        assert_eq!(scene.relics.len(), 1);
        assert_eq!(scene.particles.len(), 30);

        for (i, ring) in scene.echo_rings.iter().enumerate() {
            assert_eq!(ring.kind, RingKind::Horn);
            assert_relative_eq!(ring.radius, 10.0 + 5.0 * i as f32);
            assert_relative_eq!(ring.speed, 3.0 + 0.3 * i as f32, epsilon = 1e-6);
        }

        for (i, particle) in scene.particles.iter().enumerate() {
            let expected = Vec2::from_angle(i as f32 * TAU / 30.0);
            let direction = particle.velocity.normalize();
            assert_relative_eq!(direction.x, expected.x, epsilon = 1e-4);
            assert_relative_eq!(direction.y, expected.y, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_burst_blocked_while_in_flight() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 2);
        let audio = RecordingAudio::default();

        assert!(scene.trigger_burst(&audio));
        assert!(!scene.trigger_burst(&audio));
        scene.frame(at(t0, 100), [Command::TriggerBurst], &audio);

        assert_eq!(audio.bursts.get(), 1);
        assert_eq!(scene.relics.len(), 1);
        assert_eq!(scene.particles.len(), 30);
        assert!(scene.burst_in_flight());

        // The in-flight flag clears 500 ms of scene time after the blast
        for i in 2..=7 {
            scene.frame(at(t0, i * 100), NO_INPUT, &audio);
        }
        assert!(!scene.burst_in_flight());
        assert!(scene.trigger_burst(&audio));
        assert_eq!(scene.relics.len(), 2);
    }

    #[test]
    fn test_selected_mode_spawns_one_ring_per_interval() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 3);
        let audio = RecordingAudio::default();

        scene.frame(at(t0, 16), [Command::SelectMode(2)], &audio);
        assert_eq!(scene.mode(), EchoMode::DistantFootsteps);

        // 400 ms of scene time is not yet past the interval
        for i in 2..=25 {
            scene.frame(at(t0, i * 16), NO_INPUT, &audio);
        }
        assert!(scene.echo_rings.is_empty());

        scene.frame(at(t0, 26 * 16), NO_INPUT, &audio);
        assert_eq!(scene.echo_rings.len(), 1);

        let ring = scene.echo_rings.iter().next().unwrap();
        assert_eq!(ring.kind, RingKind::Echo(EchoMode::DistantFootsteps));
        assert!(EchoMode::DistantFootsteps.palette().contains(&ring.color));
        assert_eq!(ring.speed, 2.0);
    }

    #[test]
    fn test_mode_change_leaves_live_rings_alone() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 4);
        let audio = RecordingAudio::default();

        for i in 1..=40 {
            scene.frame(at(t0, i * 16), NO_INPUT, &audio);
        }
        assert_eq!(scene.echo_rings.len(), 1);

        scene.frame(at(t0, 41 * 16), [Command::CycleMode(-1)], &audio);
        assert_eq!(scene.mode(), EchoMode::CosmicTravelers);
        let ring = scene.echo_rings.iter().next().unwrap();
        assert_eq!(ring.kind, RingKind::Echo(EchoMode::GrassGrowing));
        assert_eq!(ring.speed, 1.2);
    }

    #[test]
    fn test_collections_respect_caps() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 5);
        let audio = RecordingAudio::default();
        scene.spawner.set_mode(EchoMode::CosmicTravelers);

        for i in 1..=3000u64 {
            scene.frame(at(t0, i * 100), [Command::TriggerBurst], &audio);
            assert!(scene.echo_rings.len() <= 150);
            assert!(scene.relics.len() <= 50);
        }
        assert_eq!(scene.relics.len(), 50);
        assert!(audio.bursts.get() > 50);
    }

    #[test]
    fn test_decaying_entities_never_brighten() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 6);
        let audio = RecordingAudio::default();
        scene.trigger_burst(&audio);

        for i in 1..=60u64 {
            let rings: Vec<f32> = scene.echo_rings.iter().map(|r| r.alpha).collect();
            let particles: Vec<f32> = scene.particles.iter().map(|p| p.alpha).collect();

            scene.frame(at(t0, i * 16), NO_INPUT, &audio);

            // Nothing expires this early and new rings are appended at the back
            for (after, before) in scene.echo_rings.iter().zip(&rings) {
                assert!(after.alpha <= *before);
            }
            for (after, before) in scene.particles.iter().zip(&particles) {
                assert!(after.alpha <= *before);
            }
        }
        assert!(scene.particles.iter().all(|p| p.alpha > 0.0));
    }

    #[test]
    fn test_particles_expire() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 7);
        let audio = RecordingAudio::default();
        scene.trigger_burst(&audio);

        for i in 1..=80u64 {
            scene.frame(at(t0, i * 5), NO_INPUT, &audio);
        }
        assert!(scene.particles.is_empty());
        assert_eq!(scene.relics.len(), 1);
    }

    #[test]
    fn test_guardian_stays_in_bounds_under_input() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 8);
        let audio = RecordingAudio::default();

        for i in 1..=600u64 {
            let direction = if i < 300 { Vec2::new(1.0, -1.0) } else { Vec2::new(-1.0, 1.0) };
            scene.frame(at(t0, i * 16), [Command::MoveIntent(direction)], &audio);
            let p = scene.guardian.position;
            assert!((-250.0..=50.0).contains(&p.x));
            assert!((-150.0..=150.0).contains(&p.y));
        }
    }

    #[test]
    fn test_click_targets_clamped_world_point() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 9);
        let audio = RecordingAudio::default();

        // Camera at the origin, zoom 1: screen (1240, 40) is world (600, -320)
        scene.apply(Command::Click(Vec2::new(1240.0, 40.0)), t0, &audio);
        assert_eq!(scene.guardian.target, Vec2::new(50.0, -150.0));
    }

    #[test]
    fn test_pause_freezes_scene_and_skips_frames() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 10);
        let audio = RecordingAudio::default();

        scene.frame(at(t0, 16), NO_INPUT, &audio);
        assert!(scene.frame(at(t0, 32), [Command::TogglePause], &audio).is_none());

        let position = scene.guardian.position;
        let target = scene.guardian.target;
        assert!(scene
            .frame(at(t0, 5_000), [Command::MoveIntent(Vec2::X)], &audio)
            .is_none());
        assert_eq!(scene.guardian.position, position);
        assert_eq!(scene.guardian.target, target);

        let time = scene
            .frame(at(t0, 10_000), [Command::TogglePause], &audio)
            .unwrap();
        assert_relative_eq!(time.scene_ms, 16.0, epsilon = 1e-6);
        assert_relative_eq!(time.delta_ms, 0.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 11);
        let audio = RecordingAudio::default();

        for i in 1..=50u64 {
            scene.frame(at(t0, i * 16), [Command::MoveIntent(Vec2::Y)], &audio);
        }
        scene.trigger_burst(&audio);

        let snapshot = |s: &Scene| {
            (
                s.echo_rings.len(),
                s.runes.len(),
                s.travelers.len(),
                s.relics.len(),
                s.particles.len(),
                s.guardian.position,
                s.guardian.target,
                s.guardian.velocity,
                s.camera.position,
                s.camera.zoom,
                s.mode(),
            )
        };

        scene.reset();
        let once = snapshot(&scene);
        scene.reset();
        let twice = snapshot(&scene);

        assert_eq!(once, twice);
        assert_eq!(once.0 + once.1 + once.2 + once.3 + once.4, 0);
        assert_eq!(scene.guardian.position, Vec2::new(-150.0, 0.0));
        assert_eq!(scene.camera.position, Vec2::ZERO);
    }

    #[test]
    fn test_chimes_scale_with_intensity() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 12);
        let audio = RecordingAudio::default();

        scene.apply(Command::AdjustIntensity(0.5), t0, &audio);
        assert_relative_eq!(scene.intensity, 1.5);
        scene.apply(Command::AdjustIntensity(5.0), t0, &audio);
        assert_relative_eq!(scene.intensity, 2.0);

        for i in 1..=30_000u64 {
            scene.frame(at(t0, i * 16), NO_INPUT, &audio);
        }

        let tones = audio.tones.borrow();
        assert!(!tones.is_empty());
        for tone in tones.iter() {
            assert_eq!((tone.frequency_hz, tone.filter_cutoff_hz), (180.0, 300.0));
            assert_relative_eq!(tone.gain, 0.16);
            assert_eq!(tone.duration_ms, 300.0);
        }
        assert!(scene.travelers.len() <= 1);
    }

    #[test]
    fn test_volume_mute_and_resonance_reach_audio() {
        let t0 = Instant::now();
        let mut scene = scene_at(t0, 13);
        let audio = RecordingAudio::default();
        audio.set_volume(0.5);

        scene.frame(
            at(t0, 16),
            [
                Command::AdjustVolume(0.2),
                Command::AdjustVolume(0.4),
                Command::ToggleMute,
            ],
            &audio,
        );
        assert_eq!(audio.volume(), 1.0);
        assert_eq!(audio.mutes.get(), 1);
        assert_eq!(scene.resonance.low, 0.5);
    }
}
