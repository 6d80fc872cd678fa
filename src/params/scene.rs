//! Entity lifecycle tuning and echo mode presets.

use crate::color::Rgba;

/// Echo mode preset: palette, propagation speed, spawn cadence and tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EchoMode {
    #[default]
    GrassGrowing,
    WoolOnSheep,
    DistantFootsteps,
    CosmicTravelers,
}

impl EchoMode {
    pub const ALL: [EchoMode; 4] = [
        EchoMode::GrassGrowing,
        EchoMode::WoolOnSheep,
        EchoMode::DistantFootsteps,
        EchoMode::CosmicTravelers,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            EchoMode::GrassGrowing => 0,
            EchoMode::WoolOnSheep => 1,
            EchoMode::DistantFootsteps => 2,
            EchoMode::CosmicTravelers => 3,
        }
    }

    /// Step through the presets, wrapping in both directions
    pub fn cycled(self, direction: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let index = (self.index() as i32 + direction).rem_euclid(len);
        Self::ALL[index as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            EchoMode::GrassGrowing => "Grass Growing",
            EchoMode::WoolOnSheep => "Wool on Sheep",
            EchoMode::DistantFootsteps => "Distant Footsteps",
            EchoMode::CosmicTravelers => "Cosmic Travelers",
        }
    }

    pub fn palette(self) -> [Rgba; 3] {
        match self {
            EchoMode::GrassGrowing => [
                Rgba::rgb8(0x6b, 0x8e, 0x23),
                Rgba::rgb8(0x8f, 0xbc, 0x8f),
                Rgba::OLD_GOLD,
            ],
            EchoMode::WoolOnSheep => [
                Rgba::rgb8(0xf5, 0xf5, 0xdc),
                Rgba::rgb8(0xff, 0xf8, 0xdc),
                Rgba::GOLD,
            ],
            EchoMode::DistantFootsteps => [
                Rgba::rgb8(0x46, 0x82, 0xb4),
                Rgba::rgb8(0xb0, 0xc4, 0xde),
                Rgba::rgb8(0xc0, 0xc0, 0xc0),
            ],
            EchoMode::CosmicTravelers => [
                Rgba::rgb8(0x93, 0x70, 0xdb),
                Rgba::rgb8(0x8a, 0x2b, 0xe2),
                Rgba::rgb8(0xe6, 0xe6, 0xfa),
            ],
        }
    }

    /// Ring radius growth per tick
    pub fn speed(self) -> f32 {
        match self {
            EchoMode::GrassGrowing => 1.2,
            EchoMode::WoolOnSheep => 1.5,
            EchoMode::DistantFootsteps => 2.0,
            EchoMode::CosmicTravelers => 3.0,
        }
    }

    /// Milliseconds between automatic rings
    pub fn interval_ms(self) -> f64 {
        match self {
            EchoMode::GrassGrowing => 600.0,
            EchoMode::WoolOnSheep => 500.0,
            EchoMode::DistantFootsteps => 400.0,
            EchoMode::CosmicTravelers => 300.0,
        }
    }

    /// Tone (frequency Hz, low-pass cutoff Hz) of the subtle ring chime
    pub fn tone(self) -> (f32, f32) {
        match self {
            EchoMode::GrassGrowing => (180.0, 300.0),
            EchoMode::WoolOnSheep => (350.0, 500.0),
            EchoMode::DistantFootsteps => (250.0, 400.0),
            EchoMode::CosmicTravelers => (900.0, 1200.0),
        }
    }
}

/// Automatic echo ring parameters
#[derive(Debug, Clone)]
pub struct EchoParams {
    /// Maximum live rings (oldest evicted beyond)
    pub max_rings: usize,

    /// Radius of a freshly spawned ring
    pub start_radius: f32,

    /// Alpha of a freshly spawned ring
    pub start_alpha: f32,

    /// Alpha lost per tick
    pub fade_per_tick: f32,

    /// Probability that a ring plays its chime
    pub tone_chance: f64,

    /// Chime duration (milliseconds)
    pub tone_duration_ms: f32,

    /// Chime peak gain before intensity scaling
    pub tone_gain: f32,
}

impl Default for EchoParams {
    fn default() -> Self {
        Self {
            max_rings: 150,
            start_radius: 5.0,
            start_alpha: 0.8,
            fade_per_tick: 0.006,
            tone_chance: 0.15,
            tone_duration_ms: 300.0,
            tone_gain: 0.08,
        }
    }
}

/// Rune glyph parameters
#[derive(Debug, Clone)]
pub struct RuneParams {
    /// Probability that a ring releases a rune
    pub spawn_chance: f64,

    /// Maximum absolute drift speed per axis (units per tick)
    pub max_drift: f32,

    /// Alpha lost per tick
    pub fade_per_tick: f32,

    /// Shimmer phase advance per tick (radians)
    pub shimmer_step: f32,

    /// Maximum absolute spin (radians per tick)
    pub max_spin: f32,

    /// Glyph size range (units)
    pub size_range: (f32, f32),
}

impl Default for RuneParams {
    fn default() -> Self {
        Self {
            spawn_chance: 0.3,
            max_drift: 1.0,
            fade_per_tick: 0.008,
            shimmer_step: 0.05,
            max_spin: 0.01,
            size_range: (16.0, 24.0),
        }
    }
}

/// Spectral traveler parameters
#[derive(Debug, Clone)]
pub struct TravelerParams {
    /// Minimum milliseconds between spawn attempts
    pub interval_ms: f64,

    /// Probability that an eligible tick attempts a spawn
    pub attempt_chance: f64,

    /// Probability that an attempt actually creates a traveler
    pub spawn_chance: f64,

    /// Spawn offset behind the bridge origin (units)
    pub start_offset_x: f32,

    /// Vertical spawn spread around the bridge (units)
    pub spread_y: f32,

    /// Horizontal speed range (units per tick)
    pub speed_range: (f32, f32),

    /// Alpha gained per tick while fading in
    pub fade_in_step: f32,

    /// Alpha at which fade-in turns into fade-out
    pub peak_alpha: f32,

    /// Alpha lost per tick while fading out
    pub fade_out_step: f32,

    /// Travelers past this x are removed
    pub limit_x: f32,

    /// Size range (units)
    pub size_range: (f32, f32),

    /// Shimmer phase advance per tick (radians)
    pub shimmer_step: f32,
}

impl Default for TravelerParams {
    fn default() -> Self {
        Self {
            interval_ms: 3000.0,
            attempt_chance: 0.3,
            spawn_chance: 0.3,
            start_offset_x: -300.0,
            spread_y: 100.0,
            speed_range: (2.0, 3.0),
            fade_in_step: 0.02,
            peak_alpha: 0.6,
            fade_out_step: 0.005,
            limit_x: 500.0,
            size_range: (20.0, 35.0),
            shimmer_step: 0.05,
        }
    }
}

/// Horn blast parameters
#[derive(Debug, Clone)]
pub struct BurstParams {
    /// Rings in the cascade
    pub ring_count: usize,

    /// Radius of the first cascade ring, and increment per ring
    pub ring_radius: (f32, f32),

    /// Speed of the first cascade ring, and increment per ring
    pub ring_speed: (f32, f32),

    /// Particles in the radial explosion
    pub particle_count: usize,

    /// Particle outward speed range (units per tick)
    pub particle_speed_range: (f32, f32),

    /// Particle size range (units)
    pub particle_size_range: (f32, f32),

    /// Delay before another blast may start (milliseconds)
    pub cooldown_ms: f64,
}

impl Default for BurstParams {
    fn default() -> Self {
        Self {
            ring_count: 8,
            ring_radius: (10.0, 5.0),
            ring_speed: (3.0, 0.3),
            particle_count: 30,
            particle_speed_range: (2.0, 5.0),
            particle_size_range: (3.0, 7.0),
            cooldown_ms: 500.0,
        }
    }
}

/// Burst particle parameters
#[derive(Debug, Clone)]
pub struct ParticleParams {
    /// Velocity multiplier per tick
    pub damping: f32,

    /// Alpha lost per tick
    pub fade_per_tick: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            damping: 0.98,
            fade_per_tick: 0.015,
        }
    }
}

/// Relic parameters
#[derive(Debug, Clone)]
pub struct RelicParams {
    /// Maximum live relics (oldest evicted beyond)
    pub max_relics: usize,

    /// Age fade never drops below this
    pub fade_floor: f32,

    /// Age (seconds) at which the fade reaches zero before the floor applies
    pub fade_seconds: f32,

    /// Maximum absolute spin (radians per tick)
    pub max_spin: f32,

    /// Size range (units)
    pub size_range: (f32, f32),
}

impl Default for RelicParams {
    fn default() -> Self {
        Self {
            max_relics: 50,
            fade_floor: 0.3,
            fade_seconds: 120.0,
            max_spin: 0.0005,
            size_range: (30.0, 50.0),
        }
    }
}

/// Static backdrop generation parameters
#[derive(Debug, Clone)]
pub struct BackdropParams {
    /// Background stars, scattered over three viewports
    pub star_count: usize,

    /// Constellations arranged on a ring
    pub constellation_count: usize,

    /// Constellation ring distance range (units)
    pub constellation_distance: (f32, f32),

    /// Stars per constellation range (inclusive)
    pub constellation_stars: (usize, usize),

    /// Hexagonal sacred geometry patterns
    pub pattern_count: usize,

    /// Bridge segments receding from the bridge origin
    pub bridge_segments: usize,
}

impl Default for BackdropParams {
    fn default() -> Self {
        Self {
            star_count: 200,
            constellation_count: 8,
            constellation_distance: (400.0, 700.0),
            constellation_stars: (5, 8),
            pattern_count: 4,
            bridge_segments: 100,
        }
    }
}

/// Complete scene tuning
#[derive(Debug, Clone)]
pub struct SceneParams {
    pub echo: EchoParams,
    pub rune: RuneParams,
    pub traveler: TravelerParams,
    pub burst: BurstParams,
    pub particle: ParticleParams,
    pub relic: RelicParams,
    pub backdrop: BackdropParams,

    /// Echo mode active at startup
    pub start_mode: EchoMode,

    /// Visual intensity multiplier at startup
    pub intensity: f32,

    /// Allowed intensity range
    pub intensity_range: (f32, f32),
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            echo: EchoParams::default(),
            rune: RuneParams::default(),
            traveler: TravelerParams::default(),
            burst: BurstParams::default(),
            particle: ParticleParams::default(),
            relic: RelicParams::default(),
            backdrop: BackdropParams::default(),
            start_mode: EchoMode::default(),
            intensity: 1.0,
            intensity_range: (0.2, 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_mode_index_round_trip() {
        for (i, mode) in EchoMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
            assert_eq!(EchoMode::from_index(i), Some(*mode));
        }
        assert_eq!(EchoMode::from_index(4), None);
    }

    #[test]
    fn test_echo_mode_cycles_both_ways() {
        assert_eq!(EchoMode::GrassGrowing.cycled(1), EchoMode::WoolOnSheep);
        assert_eq!(EchoMode::GrassGrowing.cycled(-1), EchoMode::CosmicTravelers);
        assert_eq!(EchoMode::CosmicTravelers.cycled(1), EchoMode::GrassGrowing);
        assert_eq!(EchoMode::WoolOnSheep.cycled(-5), EchoMode::GrassGrowing);
    }

    #[test]
    fn test_faster_modes_spawn_more_often() {
        let intervals: Vec<f64> = EchoMode::ALL.iter().map(|m| m.interval_ms()).collect();
        let speeds: Vec<f32> = EchoMode::ALL.iter().map(|m| m.speed()).collect();
        assert!(intervals.windows(2).all(|w| w[0] > w[1]));
        assert!(speeds.windows(2).all(|w| w[0] < w[1]));
    }
}
