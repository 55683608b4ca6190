//! Voice parameters: sampling, clip length, timbre and frequency model.

use crate::voice::FrequencyModel;

/// Everything needed to construct a voice
#[derive(Debug, Clone)]
pub struct VoiceSettings {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Clip length (seconds)
    pub duration_s: f64,

    /// Harmonic clamp ratio, nominally in (0, 1]
    /// Every harmonic becomes `strength * max(harmonics)`
    pub strength: f64,

    /// How the fundamental is derived
    pub model: FrequencyModel,

    /// Explicit harmonic amplitudes (index 0 = fundamental)
    /// `None` draws the model's default series
    pub harmonics: Option<Vec<f64>>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            duration_s: 1.5,
            strength: 1.0,
            model: FrequencyModel::default(),
            harmonics: None,
        }
    }
}
