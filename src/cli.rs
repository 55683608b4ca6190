//! Command-line argument parsing.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::params::{RenderConfig, VoiceSettings};
use crate::voice::{FrequencyModel, StringPhysics};
use crate::waveform::DrawMode;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "stringsynth")]
#[command(about = "Physical string synthesizer with live waveform view", long_about = None)]
pub struct Args {
    /// Audio sample rate
    #[arg(long, value_name = "HZ", default_value_t = 44100)]
    pub sample_rate: u32,

    /// Clip length
    #[arg(long, value_name = "SECONDS", default_value_t = 1.5)]
    pub duration: f64,

    /// String length
    #[arg(long, value_name = "METERS", default_value_t = 10.0)]
    pub length: f64,

    /// Harmonic number n
    #[arg(short = 'n', long = "harmonic", value_name = "N", default_value_t = 1.0)]
    pub harmonic_number: f64,

    /// String tension
    #[arg(long, value_name = "NEWTONS", default_value_t = 345.23)]
    pub tension: f64,

    /// Linear density of the string
    #[arg(long, value_name = "KG_PER_M", default_value_t = 5.1)]
    pub density: f64,

    /// Harmonic clamp ratio
    #[arg(long, value_name = "RATIO", default_value_t = 1.0)]
    pub strength: f64,

    /// Explicit harmonic amplitudes, comma separated (fundamental first)
    #[arg(long, value_name = "AMPS", value_delimiter = ',', allow_negative_numbers = true)]
    pub harmonics: Option<Vec<f64>>,

    /// Play a plain tone at this frequency instead of a string
    #[arg(
        long,
        value_name = "HZ",
        conflicts_with_all = ["length", "harmonic_number", "tension", "density"]
    )]
    pub tone: Option<f64>,

    /// Draw mode: lines (default), circles, both
    #[arg(long, value_name = "MODE", default_value = "lines")]
    pub draw_mode: DrawMode,

    /// Initial window width
    #[arg(long, value_name = "PIXELS", default_value_t = 1128)]
    pub width: u32,

    /// Initial window height
    #[arg(long, value_name = "PIXELS", default_value_t = 752)]
    pub height: u32,

    /// Seed for random harmonics (entropy if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not open an audio device
    #[arg(long)]
    pub mute: bool,
}

impl Args {
    /// Voice parameters from the command line
    pub fn voice_settings(&self) -> VoiceSettings {
        let model = match self.tone {
            Some(frequency_hz) => FrequencyModel::Tone { frequency_hz },
            None => FrequencyModel::String(StringPhysics {
                length_m: self.length,
                harmonic_number: self.harmonic_number,
                tension_n: self.tension,
                linear_density: self.density,
            }),
        };

        VoiceSettings {
            sample_rate_hz: self.sample_rate,
            duration_s: self.duration,
            strength: self.strength,
            model,
            harmonics: self.harmonics.clone(),
        }
    }

    /// Rendering configuration from the command line
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            draw_mode: self.draw_mode,
            ..Default::default()
        }
    }

    /// Random source for harmonic generation
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let args = Args::parse_from(["stringsynth"]);
        let settings = args.voice_settings();
        let defaults = VoiceSettings::default();

        assert_eq!(settings.sample_rate_hz, defaults.sample_rate_hz);
        assert_eq!(settings.duration_s, defaults.duration_s);
        assert_eq!(settings.model, defaults.model);
        assert!(settings.harmonics.is_none());
        assert_eq!(args.render_config().draw_mode, DrawMode::Lines);
    }

    #[test]
    fn test_harmonics_list() {
        let args = Args::parse_from(["stringsynth", "--harmonics", "0.2,0.4,0.1", "--strength", "0.5"]);
        assert_eq!(args.voice_settings().harmonics, Some(vec![0.2, 0.4, 0.1]));
        assert_eq!(args.strength, 0.5);
    }

    #[test]
    fn test_tone_model() {
        let args = Args::parse_from(["stringsynth", "--tone", "440"]);
        assert_eq!(
            args.voice_settings().model,
            FrequencyModel::Tone { frequency_hz: 440.0 }
        );
        assert!(Args::try_parse_from(["stringsynth", "--tone", "440", "--tension", "3"]).is_err());
    }

    #[test]
    fn test_invalid_draw_mode_fails_fast() {
        assert!(Args::try_parse_from(["stringsynth", "--draw-mode", "dots"]).is_err());
        let args = Args::parse_from(["stringsynth", "--draw-mode", "both"]);
        assert_eq!(args.draw_mode, DrawMode::Both);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let args = Args::parse_from(["stringsynth", "--seed", "11"]);
        let a: u64 = args.rng().gen();
        let b: u64 = args.rng().gen();
        assert_eq!(a, b);
    }
}
