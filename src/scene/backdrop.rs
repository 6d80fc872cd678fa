//! Static backdrop: star field, constellations, sacred geometry and the bridge.
//!
//! Generated once per scene. Counts never change; only phase and rotation
//! accumulators advance each tick.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use super::entities::sample;
use crate::color::Rgba;
use crate::params::BackdropParams;

/// Twinkling background star
#[derive(Debug, Clone)]
pub struct Star {
    pub position: Vec2,
    pub size: f32,
    pub brightness: f32,
    pub twinkle_speed: f32,
    pub twinkle_phase: f32,
}

impl Star {
    /// Twinkle multiplier in 0.4..=1.0
    pub fn twinkle(&self) -> f32 {
        self.twinkle_phase.sin() * 0.3 + 0.7
    }
}

/// Star of a constellation, relative to the constellation center
#[derive(Debug, Clone)]
pub struct ConstellationStar {
    pub offset: Vec2,
    pub size: f32,
    pub brightness: f32,
}

#[derive(Debug, Clone)]
pub struct Constellation {
    pub center: Vec2,
    pub stars: Vec<ConstellationStar>,
    pub pulse_phase: f32,
    pub pulse_speed: f32,
}

impl Constellation {
    /// Brightness driven by echo activity: more live rings, brighter stars
    pub fn intensity(&self, live_rings: usize) -> f32 {
        let echo_influence = (live_rings as f32 / 30.0).min(1.0) * 0.5;
        let pulse = self.pulse_phase.sin() * 0.3 + 0.7;
        (0.5 + echo_influence) * pulse
    }
}

/// Slowly rotating hexagon of sacred geometry
#[derive(Debug, Clone)]
pub struct SacredPattern {
    pub center: Vec2,
    pub radius: f32,
    pub sides: usize,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub alpha: f32,
}

/// Slice of the rainbow bridge at `distance` along its axis
#[derive(Debug, Clone)]
pub struct BridgeSegment {
    pub distance: f32,
    pub width: f32,
    pub alpha: f32,
}

/// The rainbow bridge, receding from its origin
#[derive(Debug, Clone)]
pub struct Bridge {
    pub origin: Vec2,
    pub angle: f32,
    pub colors: [Rgba; 7],
    pub pulse_phase: f32,
    pub segments: Vec<BridgeSegment>,
}

impl Bridge {
    pub const RAINBOW: [Rgba; 7] = [
        Rgba::rgb8(0xff, 0x00, 0x00),
        Rgba::rgb8(0xff, 0x7f, 0x00),
        Rgba::rgb8(0xff, 0xff, 0x00),
        Rgba::rgb8(0x00, 0xff, 0x00),
        Rgba::rgb8(0x00, 0x00, 0xff),
        Rgba::rgb8(0x4b, 0x00, 0x82),
        Rgba::rgb8(0x94, 0x00, 0xd3),
    ];

    fn new(segment_count: usize) -> Self {
        let segments = (0..segment_count)
            .map(|i| {
                let i = i as f32;
                BridgeSegment {
                    distance: i * 15.0,
                    width: (200.0 - i * 1.5).max(0.0),
                    alpha: (1.0 - i * 0.008).max(0.0),
                }
            })
            .collect();

        Self {
            origin: Vec2::new(-400.0, 0.0),
            angle: -0.3,
            colors: Self::RAINBOW,
            pulse_phase: 0.0,
            segments,
        }
    }

    /// Pulse multiplier in 0.7..=1.0
    pub fn pulse(&self) -> f32 {
        self.pulse_phase.sin() * 0.15 + 0.85
    }

    /// Colors blended for segment `index`: (base, next, mix)
    pub fn segment_colors(&self, index: usize) -> (Rgba, Rgba, f32) {
        let n = self.colors.len();
        let shift = index as f32 / self.segments.len().max(1) as f32 * n as f32;
        let base = shift.floor() as usize % n;
        (self.colors[base], self.colors[(base + 1) % n], shift.fract())
    }
}

/// Everything behind the guardian that is generated once
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub stars: Vec<Star>,
    pub constellations: Vec<Constellation>,
    pub patterns: Vec<SacredPattern>,
    pub bridge: Bridge,
}

impl Backdrop {
    /// Scatter the backdrop for a viewport of `viewport` pixels
    pub fn generate<R: Rng + ?Sized>(params: &BackdropParams, viewport: Vec2, rng: &mut R) -> Self {
        let half_field = viewport * 1.5;
        let stars = (0..params.star_count)
            .map(|_| Star {
                position: Vec2::new(
                    sample(rng, (-half_field.x, half_field.x)),
                    sample(rng, (-half_field.y, half_field.y)),
                ),
                size: sample(rng, (0.0, 1.5)),
                brightness: rng.random::<f32>(),
                twinkle_speed: sample(rng, (0.01, 0.03)),
                twinkle_phase: rng.random::<f32>() * TAU,
            })
            .collect();

        let count = params.constellation_count.max(1) as f32;
        let constellations = (0..params.constellation_count)
            .map(|i| {
                let angle = i as f32 / count * TAU;
                let distance = sample(rng, params.constellation_distance);
                let (lo, hi) = params.constellation_stars;
                let star_count = rng.random_range(lo..=hi.max(lo));
                Constellation {
                    center: Vec2::from_angle(angle) * distance - Vec2::new(0.0, 100.0),
                    stars: (0..star_count)
                        .map(|_| ConstellationStar {
                            offset: Vec2::new(sample(rng, (-40.0, 40.0)), sample(rng, (-40.0, 40.0))),
                            size: sample(rng, (1.0, 3.0)),
                            brightness: sample(rng, (0.5, 1.0)),
                        })
                        .collect(),
                    pulse_phase: rng.random::<f32>() * TAU,
                    pulse_speed: sample(rng, (0.02, 0.04)),
                }
            })
            .collect();

        let patterns = (0..params.pattern_count)
            .map(|i| SacredPattern {
                center: Vec2::new(sample(rng, (-300.0, 300.0)), sample(rng, (-200.0, 200.0))),
                radius: 80.0 + i as f32 * 60.0,
                sides: 6,
                rotation: rng.random::<f32>() * PI,
                rotation_speed: sample(rng, (0.0002, 0.0005)),
                alpha: sample(rng, (0.03, 0.06)),
            })
            .collect();

        Self {
            stars,
            constellations,
            patterns,
            bridge: Bridge::new(params.bridge_segments),
        }
    }

    /// Advance every phase and rotation accumulator by one tick
    pub fn update(&mut self) {
        for star in &mut self.stars {
            star.twinkle_phase += star.twinkle_speed;
        }
        for constellation in &mut self.constellations {
            constellation.pulse_phase += constellation.pulse_speed;
        }
        for pattern in &mut self.patterns {
            pattern.rotation += pattern.rotation_speed;
        }
        self.bridge.pulse_phase += 0.01;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn backdrop() -> Backdrop {
        let mut rng = StdRng::seed_from_u64(11);
        Backdrop::generate(&BackdropParams::default(), Vec2::new(1280.0, 720.0), &mut rng)
    }

    #[test]
    fn test_generation_counts() {
        let b = backdrop();
        assert_eq!(b.stars.len(), 200);
        assert_eq!(b.constellations.len(), 8);
        assert_eq!(b.patterns.len(), 4);
        assert_eq!(b.bridge.segments.len(), 100);

        for c in &b.constellations {
            assert!((5..=8).contains(&c.stars.len()));
        }
        for s in &b.stars {
            assert!(s.position.x.abs() <= 1920.0 && s.position.y.abs() <= 1080.0);
        }
    }

    #[test]
    fn test_bridge_segments_recede() {
        let b = backdrop();
        let last = &b.bridge.segments[99];
        assert_relative_eq!(last.distance, 1485.0);
        assert_relative_eq!(last.width, 51.5, epsilon = 1e-4);
        assert_relative_eq!(last.alpha, 0.208, epsilon = 1e-4);
        assert!(b
            .bridge
            .segments
            .windows(2)
            .all(|w| w[1].alpha < w[0].alpha && w[1].width < w[0].width));
    }

    #[test]
    fn test_segment_colors_walk_the_rainbow() {
        let b = backdrop();
        let (base, next, mix) = b.bridge.segment_colors(0);
        assert_eq!(base, Bridge::RAINBOW[0]);
        assert_eq!(next, Bridge::RAINBOW[1]);
        assert_eq!(mix, 0.0);

        let (base, next, _) = b.bridge.segment_colors(99);
        assert_eq!(base, Bridge::RAINBOW[6]);
        assert_eq!(next, Bridge::RAINBOW[0]);
    }

    #[test]
    fn test_update_keeps_counts_and_advances_phases() {
        let mut b = backdrop();
        let phase = b.stars[0].twinkle_phase;
        let rotation = b.patterns[0].rotation;
        for _ in 0..100 {
            b.update();
        }
        assert_eq!(b.stars.len(), 200);
        assert!(b.stars[0].twinkle_phase > phase);
        assert!(b.patterns[0].rotation > rotation);
        assert_relative_eq!(b.bridge.pulse_phase, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_constellations_brighten_with_echo_activity() {
        let b = backdrop();
        let c = &b.constellations[0];
        assert!(c.intensity(30) > c.intensity(0));
        assert_relative_eq!(c.intensity(30), c.intensity(300));
    }
}
