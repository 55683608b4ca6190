//! Harmonic series generation and the strength clamp.

use rand::Rng;

use crate::error::VoiceError;
use crate::voice::FrequencyModel;

/// Bounds for the random harmonic count of a string voice (always even)
pub const MIN_STRING_HARMONICS: usize = 2;
pub const MAX_STRING_HARMONICS: usize = 32;

/// Peak amplitude scale for randomly generated string harmonics
const STRING_HARMONIC_SCALE: f64 = 0.5;

/// Pick a random even harmonic count in `[MIN_STRING_HARMONICS, MAX_STRING_HARMONICS]`.
pub fn random_harmonic_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    rng.gen_range(MIN_STRING_HARMONICS / 2..=MAX_STRING_HARMONICS / 2) * 2
}

/// Random string timbre of `len` harmonics.
///
/// Even indices get `0.5 * r * |(i - len/2) / len|` with `r` drawn from
/// `{0.00, 0.01, .., 1.00}`, a triangular window that dips to zero in the
/// middle of the series. Odd indices are silent.
pub fn string_harmonics<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<f64> {
    let half = len as f64 / 2.0;
    (0..len)
        .map(|i| {
            if i % 2 == 0 {
                let r = rng.gen_range(0..=100) as f64 / 100.0;
                STRING_HARMONIC_SCALE * r * ((i as f64 - half) / len as f64).abs()
            } else {
                0.0
            }
        })
        .collect()
}

/// Default harmonic series for a frequency model.
///
/// Tones are a single pure partial. Strings get a random series, redrawn
/// until at least one partial is audible.
pub fn default_harmonics<R: Rng + ?Sized>(model: &FrequencyModel, rng: &mut R) -> Vec<f64> {
    match model {
        FrequencyModel::Tone { .. } => vec![1.0],
        FrequencyModel::String(_) => loop {
            let len = random_harmonic_count(rng);
            let harmonics = string_harmonics(rng, len);
            if max_amplitude(&harmonics).is_some_and(|max| max > 0.0) {
                break harmonics;
            }
        },
    }
}

/// Largest amplitude in the series, `None` when empty.
pub fn max_amplitude(harmonics: &[f64]) -> Option<f64> {
    harmonics.iter().copied().reduce(f64::max)
}

/// Apply the strength clamp.
///
/// Every harmonic is replaced by `strength * max(harmonics)`, not only the
/// ones above that threshold. This flattens the series on purpose.
pub fn clamp_harmonics(harmonics: &[f64], strength: f64) -> Result<Vec<f64>, VoiceError> {
    let max = max_amplitude(harmonics).ok_or(VoiceError::NoHarmonics)?;
    if max == 0.0 || !max.is_finite() {
        return Err(VoiceError::SilentHarmonics(max));
    }
    Ok(vec![strength * max; harmonics.len()])
}
