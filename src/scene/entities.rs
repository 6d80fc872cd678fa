//! Decorative entity records and their per-tick lifecycle rules.

use glam::Vec2;
use rand::Rng;
use std::collections::VecDeque;
use std::f32::consts::TAU;

use crate::color::Rgba;
use crate::params::{
    BurstParams, EchoMode, EchoParams, ParticleParams, RelicParams, RuneParams, TravelerParams,
};
use crate::runes::{Glyph, RUNE_COUNT};

/// Uniform sample in `[lo, hi)`, tolerant of an empty range
pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    lo + (hi - lo) * rng.random::<f32>()
}

/// FIFO sequence that evicts its oldest item beyond a fixed capacity
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `item`, returning the evicted oldest item when full
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Origin of an echo ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Echo(EchoMode),
    Horn,
}

/// Expanding, fading ring emitted by the guardian
#[derive(Debug, Clone)]
pub struct EchoRing {
    pub position: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub speed: f32,
    pub color: Rgba,
    pub kind: RingKind,
}

impl EchoRing {
    /// Ring in the style of `mode`, color picked from its palette
    pub fn spawn<R: Rng + ?Sized>(
        position: Vec2,
        mode: EchoMode,
        params: &EchoParams,
        rng: &mut R,
    ) -> Self {
        let palette = mode.palette();
        Self {
            position,
            radius: params.start_radius,
            alpha: params.start_alpha,
            speed: mode.speed(),
            color: palette[rng.random_range(0..palette.len())],
            kind: RingKind::Echo(mode),
        }
    }

    /// The `index`-th ring of a horn blast cascade
    pub fn horn(position: Vec2, index: usize, params: &BurstParams) -> Self {
        let i = index as f32;
        Self {
            position,
            radius: params.ring_radius.0 + i * params.ring_radius.1,
            alpha: 1.0,
            speed: params.ring_speed.0 + i * params.ring_speed.1,
            color: Rgba::GOLD,
            kind: RingKind::Horn,
        }
    }

    pub fn update(&mut self, params: &EchoParams) {
        self.radius += self.speed;
        self.alpha -= params.fade_per_tick;
    }

    pub fn is_faded(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Drifting, spinning rune glyph
#[derive(Debug, Clone)]
pub struct Rune {
    pub position: Vec2,
    pub velocity: Vec2,
    pub glyph: Glyph,
    pub alpha: f32,
    pub size: f32,
    pub color: Rgba,
    pub shimmer_phase: f32,
    pub rotation: f32,
    pub spin: f32,
}

impl Rune {
    pub fn spawn<R: Rng + ?Sized>(
        position: Vec2,
        color: Rgba,
        params: &RuneParams,
        rng: &mut R,
    ) -> Self {
        let drift = (-params.max_drift, params.max_drift);
        Self {
            position,
            velocity: Vec2::new(sample(rng, drift), sample(rng, drift)),
            glyph: Glyph::new(rng.random_range(0..RUNE_COUNT)),
            alpha: 1.0,
            size: sample(rng, params.size_range),
            color,
            shimmer_phase: rng.random::<f32>() * TAU,
            rotation: rng.random::<f32>() * TAU,
            spin: sample(rng, (-params.max_spin, params.max_spin)),
        }
    }

    pub fn update(&mut self, params: &RuneParams) {
        self.position += self.velocity;
        self.alpha -= params.fade_per_tick;
        self.shimmer_phase += params.shimmer_step;
        self.rotation += self.spin;
    }

    /// Shimmer multiplier in 0.4..=1.0
    pub fn shimmer(&self) -> f32 {
        self.shimmer_phase.sin() * 0.3 + 0.7
    }

    pub fn is_faded(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Ghostly figure crossing the bridge
#[derive(Debug, Clone)]
pub struct Traveler {
    pub position: Vec2,
    pub velocity: Vec2,
    pub alpha: f32,
    pub fading_in: bool,
    pub size: f32,
    pub shimmer_phase: f32,
}

impl Traveler {
    /// Traveler entering behind the bridge at `bridge_origin`
    pub fn spawn<R: Rng + ?Sized>(bridge_origin: Vec2, params: &TravelerParams, rng: &mut R) -> Self {
        let spread = params.spread_y * 0.5;
        Self {
            position: bridge_origin
                + Vec2::new(params.start_offset_x, sample(rng, (-spread, spread))),
            velocity: Vec2::new(sample(rng, params.speed_range), sample(rng, (-0.25, 0.25))),
            alpha: 0.0,
            fading_in: true,
            size: sample(rng, params.size_range),
            shimmer_phase: rng.random::<f32>() * TAU,
        }
    }

    pub fn update(&mut self, params: &TravelerParams) {
        self.position += self.velocity;
        self.shimmer_phase += params.shimmer_step;

        if self.fading_in {
            self.alpha += params.fade_in_step;
            if self.alpha >= params.peak_alpha {
                self.fading_in = false;
            }
        } else {
            self.alpha -= params.fade_out_step;
        }
    }

    /// Shimmer multiplier in 0.6..=1.0
    pub fn shimmer(&self) -> f32 {
        self.shimmer_phase.sin() * 0.2 + 0.8
    }

    pub fn is_gone(&self, params: &TravelerParams) -> bool {
        self.alpha <= 0.0 || self.position.x > params.limit_x
    }
}

/// Visual variant of a relic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelicKind {
    /// Spiral horn with a central glow
    Horn,
    /// Circle of runes with spokes
    RuneCircle,
    /// Diamond with a watching eye
    Sigil,
}

impl RelicKind {
    pub const ALL: [RelicKind; 3] = [RelicKind::Horn, RelicKind::RuneCircle, RelicKind::Sigil];
}

/// Long-lived keepsake left behind by a horn blast
#[derive(Debug, Clone)]
pub struct Relic {
    pub position: Vec2,
    pub kind: RelicKind,
    pub created_ms: f64,
    pub intensity: f32,
    pub rotation: f32,
    pub spin: f32,
    pub pulse_phase: f32,
    pub size: f32,
}

impl Relic {
    /// Relic of a uniformly random kind
    pub fn spawn<R: Rng + ?Sized>(
        position: Vec2,
        now_ms: f64,
        params: &RelicParams,
        rng: &mut R,
    ) -> Self {
        Self {
            position,
            kind: RelicKind::ALL[rng.random_range(0..RelicKind::ALL.len())],
            created_ms: now_ms,
            intensity: 1.0,
            rotation: rng.random::<f32>() * TAU,
            spin: sample(rng, (-params.max_spin, params.max_spin)),
            pulse_phase: rng.random::<f32>() * TAU,
            size: sample(rng, params.size_range),
        }
    }

    pub fn update(&mut self) {
        self.rotation += self.spin;
    }

    /// Age fade: linear over `fade_seconds`, floored so relics never vanish
    pub fn fade(&self, now_ms: f64, params: &RelicParams) -> f32 {
        let age_s = ((now_ms - self.created_ms) / 1000.0).max(0.0) as f32;
        self.intensity * (1.0 - age_s / params.fade_seconds).max(params.fade_floor)
    }

    /// Slow breathing multiplier in 0.6..=1.0
    pub fn pulse(&self, now_ms: f64) -> f32 {
        ((now_ms * 0.002) as f32 + self.pulse_phase).sin() * 0.2 + 0.8
    }
}

/// Spark of a horn blast explosion
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub alpha: f32,
    pub size: f32,
    pub color: Rgba,
}

impl Particle {
    /// The `index`-th of `count` particles, launched at angle `index / count · 2π`
    pub fn radial<R: Rng + ?Sized>(
        position: Vec2,
        index: usize,
        params: &BurstParams,
        rng: &mut R,
    ) -> Self {
        let angle = index as f32 / params.particle_count.max(1) as f32 * TAU;
        let speed = sample(rng, params.particle_speed_range);
        Self {
            position,
            velocity: Vec2::from_angle(angle) * speed,
            alpha: 1.0,
            size: sample(rng, params.particle_size_range),
            color: Rgba::GOLD,
        }
    }

    pub fn update(&mut self, params: &ParticleParams) {
        self.position += self.velocity;
        self.velocity *= params.damping;
        self.alpha -= params.fade_per_tick;
    }

    pub fn is_faded(&self) -> bool {
        self.alpha <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bounded_queue_evicts_oldest() {
        let mut q = BoundedQueue::new(3);
        assert_eq!(q.push(1), None);
        assert_eq!(q.push(2), None);
        assert_eq!(q.push(3), None);
        assert_eq!(q.push(4), Some(1));
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_bounded_queue_with_zero_capacity_stays_empty() {
        let mut q = BoundedQueue::new(0);
        assert_eq!(q.push("relic"), Some("relic"));
        assert!(q.is_empty());
    }

    #[test]
    fn test_echo_ring_grows_and_fades_until_removed() {
        let params = EchoParams::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut ring = EchoRing::spawn(Vec2::ZERO, EchoMode::CosmicTravelers, &params, &mut rng);

        let mut ticks = 0;
        while !ring.is_faded() {
            let before = ring.alpha;
            ring.update(&params);
            assert!(ring.alpha < before);
            ticks += 1;
        }
        // 0.8 / 0.006 ≈ 134 ticks
        assert!((133..=135).contains(&ticks));
        assert_relative_eq!(ring.radius, 5.0 + 3.0 * ticks as f32, epsilon = 1e-3);
    }

    #[test]
    fn test_rune_decays_monotonically() {
        let params = RuneParams::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut rune = Rune::spawn(Vec2::ZERO, Rgba::GOLD, &params, &mut rng);

        assert!(rune.velocity.x.abs() <= 1.0 && rune.velocity.y.abs() <= 1.0);
        assert!(rune.size >= 16.0 && rune.size < 24.0);

        for _ in 0..200 {
            let before = rune.alpha;
            rune.update(&params);
            assert!(rune.alpha <= before);
            assert!((0.4..=1.0).contains(&rune.shimmer()));
        }
        assert!(rune.is_faded());
    }

    #[test]
    fn test_traveler_fades_in_then_out() {
        let params = TravelerParams::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut traveler = Traveler::spawn(Vec2::new(-400.0, 0.0), &params, &mut rng);
        assert_eq!(traveler.position.x, -700.0);

        while traveler.fading_in {
            let before = traveler.alpha;
            traveler.update(&params);
            assert!(traveler.alpha > before);
        }
        assert!(traveler.alpha >= params.peak_alpha);

        let mut ticks = 0;
        while !traveler.is_gone(&params) {
            let before = traveler.alpha;
            traveler.update(&params);
            assert!(traveler.alpha <= before);
            ticks += 1;
        }
        assert!(ticks >= 120);
    }

    #[test]
    fn test_traveler_removed_past_limit() {
        let params = TravelerParams::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut traveler = Traveler::spawn(Vec2::ZERO, &params, &mut rng);
        traveler.alpha = 0.5;
        traveler.position.x = 501.0;
        assert!(traveler.is_gone(&params));
    }

    #[test]
    fn test_relic_fade_has_floor() {
        let params = RelicParams::default();
        let mut rng = StdRng::seed_from_u64(5);
        let relic = Relic::spawn(Vec2::ZERO, 1_000.0, &params, &mut rng);

        assert_relative_eq!(relic.fade(1_000.0, &params), 1.0);
        assert_relative_eq!(relic.fade(61_000.0, &params), 0.5, epsilon = 1e-6);
        assert_relative_eq!(relic.fade(600_000.0, &params), 0.3);

        let mut previous = f32::MAX;
        for s in 0..200 {
            let f = relic.fade(1_000.0 + s as f64 * 1000.0, &params);
            assert!(f <= previous && f >= 0.3);
            previous = f;
        }
    }

    #[test]
    fn test_particle_slows_and_fades() {
        let params = BurstParams::default();
        let particle_params = ParticleParams::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut particle = Particle::radial(Vec2::ZERO, 0, &params, &mut rng);

        let speed = particle.velocity.length();
        assert!((2.0..5.0).contains(&speed));
        particle.update(&particle_params);
        assert_relative_eq!(particle.velocity.length(), speed * 0.98, epsilon = 1e-5);
        assert_relative_eq!(particle.alpha, 0.985);
    }
}
