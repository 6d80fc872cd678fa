//! Command-line argument parsing.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::params::{AudioConfig, EchoMode, RenderConfig, SceneParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Bifröst Vigil")]
#[command(about = "Heimdall's watch over the rainbow bridge, in echoes and runes", long_about = None)]
pub struct Args {
    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Seed for the backdrop and spawn randomness (OS entropy when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Echo mode at startup: 1 grass, 2 wool, 3 footsteps, 4 cosmic
    #[arg(long, value_name = "1-4", default_value = "1", value_parser = clap::value_parser!(u8).range(1..=4))]
    pub mode: u8,

    /// Visual intensity multiplier
    #[arg(long, value_name = "FACTOR", default_value = "1.0")]
    pub intensity: f32,

    /// Master volume (0-1)
    #[arg(long, value_name = "LEVEL", default_value = "0.6")]
    pub volume: f32,

    /// Start muted
    #[arg(long)]
    pub mute: bool,

    /// Start in the wide birds-eye view
    #[arg(long)]
    pub birds_eye: bool,
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            ..RenderConfig::default()
        }
    }

    pub fn scene_params(&self) -> SceneParams {
        let defaults = SceneParams::default();
        let (lo, hi) = defaults.intensity_range;
        SceneParams {
            start_mode: EchoMode::from_index(self.mode.saturating_sub(1) as usize)
                .unwrap_or_default(),
            intensity: self.intensity.clamp(lo, hi),
            ..defaults
        }
    }

    pub fn audio_config(&self) -> AudioConfig {
        AudioConfig {
            master_volume: self.volume.clamp(0.0, 1.0),
            muted: self.mute,
            ..AudioConfig::default()
        }
    }

    /// Seeded generator for reproducible scenes, entropy otherwise
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => {
                log::info!("Seed: {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["bifrost-vigil"]);
        assert_eq!(args.render_config().window_width, 1280);
        assert_eq!(args.scene_params().start_mode, EchoMode::GrassGrowing);
        assert_eq!(args.scene_params().intensity, 1.0);
        assert!(!args.audio_config().muted);
        assert!(!args.birds_eye);
    }

    #[test]
    fn test_overrides_are_clamped() {
        let args = Args::parse_from([
            "bifrost-vigil",
            "--mode",
            "4",
            "--intensity",
            "9",
            "--volume",
            "3",
            "--mute",
        ]);
        assert_eq!(args.scene_params().start_mode, EchoMode::CosmicTravelers);
        assert_eq!(args.scene_params().intensity, 2.0);
        assert_eq!(args.audio_config().master_volume, 1.0);
        assert!(args.audio_config().muted);
    }

    #[test]
    fn test_mode_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["bifrost-vigil", "--mode", "5"]).is_err());
    }

    #[test]
    fn test_same_seed_same_stream() {
        let args = Args::parse_from(["bifrost-vigil", "--seed", "42"]);
        let a: u64 = args.rng().random();
        let b: u64 = args.rng().random();
        assert_eq!(a, b);
    }
}
