//! Time-gated factories deciding when entities appear.

use rand::Rng;

use crate::params::{EchoMode, TravelerParams};

/// Fires once more than `interval` milliseconds passed since the last firing
#[derive(Debug, Clone, Default)]
pub struct SpawnTimer {
    last_ms: f64,
}

impl SpawnTimer {
    pub fn is_due(&self, now_ms: f64, interval_ms: f64) -> bool {
        now_ms - self.last_ms > interval_ms
    }

    pub fn mark(&mut self, now_ms: f64) {
        self.last_ms = now_ms;
    }

    /// `is_due`, marking the timer when it fires
    pub fn fire(&mut self, now_ms: f64, interval_ms: f64) -> bool {
        let due = self.is_due(now_ms, interval_ms);
        if due {
            self.mark(now_ms);
        }
        due
    }
}

/// Spawn schedule for echo rings and travelers
#[derive(Debug, Clone)]
pub struct Spawner {
    mode: EchoMode,
    echo: SpawnTimer,
    traveler: SpawnTimer,
}

impl Spawner {
    pub fn new(mode: EchoMode) -> Self {
        Self {
            mode,
            echo: SpawnTimer::default(),
            traveler: SpawnTimer::default(),
        }
    }

    pub fn mode(&self) -> EchoMode {
        self.mode
    }

    /// Switch presets; live rings keep the style they were born with
    pub fn set_mode(&mut self, mode: EchoMode) {
        if mode != self.mode {
            log::debug!("Echo mode: {}", mode.name());
        }
        self.mode = mode;
    }

    /// Whether an echo ring is due at `now_ms` under the current mode
    pub fn echo_due(&mut self, now_ms: f64) -> bool {
        self.echo.fire(now_ms, self.mode.interval_ms())
    }

    /// Whether a traveler appears at `now_ms`.
    ///
    /// An eligible tick attempts with `attempt_chance`, which restarts the
    /// interval; the attempt then succeeds with `spawn_chance`.
    pub fn traveler_due<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        params: &TravelerParams,
        rng: &mut R,
    ) -> bool {
        if !self.traveler.is_due(now_ms, params.interval_ms) {
            return false;
        }
        if rng.random::<f64>() >= params.attempt_chance {
            return false;
        }
        self.traveler.mark(now_ms);
        rng.random::<f64>() < params.spawn_chance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_timer_requires_strictly_more_than_interval() {
        let mut timer = SpawnTimer::default();
        assert!(!timer.fire(400.0, 400.0));
        assert!(timer.fire(400.5, 400.0));
        assert!(!timer.fire(800.0, 400.0));
        assert!(timer.fire(801.0, 400.0));
    }

    #[test]
    fn test_echo_cadence_follows_mode() {
        let mut spawner = Spawner::new(EchoMode::CosmicTravelers);
        let fired = (1..=600).filter(|i| spawner.echo_due(*i as f64 * 10.0)).count();
        // 6 s at one ring per >300 ms
        assert!((18..=20).contains(&fired));

        spawner.set_mode(EchoMode::GrassGrowing);
        let fired = (601..=1200).filter(|i| spawner.echo_due(*i as f64 * 10.0)).count();
        assert!((9..=10).contains(&fired));
    }

    #[test]
    fn test_traveler_rate_is_bounded() {
        let params = TravelerParams::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut spawner = Spawner::new(EchoMode::default());

        // 10 minutes at 60 fps
        let mut spawned = Vec::new();
        for frame in 0..36_000u32 {
            let now = frame as f64 * 1000.0 / 60.0;
            if spawner.traveler_due(now, &params, &mut rng) {
                spawned.push(now);
            }
        }

        // Never two travelers within one interval
        assert!(spawned.windows(2).all(|w| w[1] - w[0] > params.interval_ms));
        assert!(spawned.len() <= 200);
        assert!(!spawned.is_empty());
    }
}
