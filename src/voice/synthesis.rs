//! Additive time-domain synthesis into 16-bit PCM.

use std::f64::consts::PI;

use crate::error::VoiceError;
use crate::voice::harmonics::clamp_harmonics;

/// Scale from unit amplitude to signed 16-bit
pub const FULL_SCALE: f64 = 32767.0;

/// Exponential decay rate of the envelope `exp(-rate * t)` (1/seconds)
pub const DECAY_RATE: f64 = 3.0;

/// Longest clip a voice will synthesize (frames).
///
/// 2^25 frames is about 12.7 minutes at 44.1 kHz and 64 MiB of samples.
pub const MAX_FRAMES: usize = 1 << 25;

/// Mono 16-bit clip. Played back as two identical channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    samples: Vec<i16>,
    sample_rate_hz: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<i16>, sample_rate_hz: u32) -> Self {
        Self {
            samples,
            sample_rate_hz,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Stereo frames `[left, right]`, both channels equal
    pub fn frames(&self) -> impl Iterator<Item = [i16; 2]> + '_ {
        self.samples.iter().map(|&s| [s, s])
    }

    /// Largest absolute sample value (widened so `i16::MIN` fits)
    pub fn max_abs(&self) -> i32 {
        max_abs(&self.samples)
    }
}

pub(crate) fn max_abs(samples: &[i16]) -> i32 {
    samples
        .iter()
        .map(|&s| i32::from(s).abs())
        .max()
        .unwrap_or(0)
}

/// Number of frames for a clip: `round(duration * sample_rate)`.
///
/// Anything outside `1..=MAX_FRAMES` is an `InvalidDuration`.
pub fn frame_count(duration_s: f64, sample_rate_hz: u32) -> Result<usize, VoiceError> {
    if sample_rate_hz == 0 {
        return Err(VoiceError::InvalidSampleRate);
    }
    if !duration_s.is_finite() || duration_s <= 0.0 {
        return Err(VoiceError::InvalidDuration(duration_s));
    }
    let frames = (duration_s * sample_rate_hz as f64).round();
    if frames < 1.0 || frames > MAX_FRAMES as f64 {
        return Err(VoiceError::InvalidDuration(duration_s));
    }
    Ok(frames as usize)
}

/// `count` evenly spaced values over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = if count > 1 {
        (end - start) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(move |k| {
        if k + 1 == count && count > 1 {
            end
        } else {
            start + step * k as f64
        }
    })
}

/// Everything the synthesizer needs for one clip.
#[derive(Debug, Clone, Copy)]
pub struct Synthesis<'a> {
    /// Fundamental frequency (Hz)
    pub frequency_hz: f64,

    /// Raw harmonic amplitudes, index 0 = fundamental
    pub harmonics: &'a [f64],

    /// Strength clamp ratio
    pub strength: f64,

    /// Clip length (seconds)
    pub duration_s: f64,

    /// Samples per second
    pub sample_rate_hz: u32,
}

impl Synthesis<'_> {
    /// Build the clip.
    ///
    /// Partial `i` sounds at `frequency * (i + 1)` with the clamped amplitude.
    /// The sum is shaped by `exp(-3t)` and scaled to 16-bit. Samples beyond
    /// full scale saturate. No randomness: equal inputs give equal buffers.
    pub fn render(&self) -> Result<PcmBuffer, VoiceError> {
        let frames = frame_count(self.duration_s, self.sample_rate_hz)?;
        let amplitudes = clamp_harmonics(self.harmonics, self.strength)?;

        let omegas: Vec<f64> = (1..=amplitudes.len())
            .map(|k| 2.0 * PI * self.frequency_hz * k as f64)
            .collect();

        let samples = linspace(0.0, self.duration_s, frames)
            .map(|t| {
                let wave: f64 = amplitudes
                    .iter()
                    .zip(&omegas)
                    .map(|(a, w)| a * (w * t).cos())
                    .sum();
                let decayed = wave * (-DECAY_RATE * t).exp();
                // Float-to-int casts saturate
                (FULL_SCALE * decayed) as i16
            })
            .collect();

        Ok(PcmBuffer::new(samples, self.sample_rate_hz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesis(harmonics: &[f64]) -> Synthesis<'_> {
        Synthesis {
            frequency_hz: 164.55,
            harmonics,
            strength: 1.0,
            duration_s: 0.5,
            sample_rate_hz: 8000,
        }
    }

    #[test]
    fn test_frame_count_rounds() {
        assert_eq!(frame_count(2.0, 44100).unwrap(), 88200);
        assert_eq!(frame_count(1.5, 44100).unwrap(), 66150);
        assert_eq!(frame_count(0.00003, 44100).unwrap(), 1);
        assert!(frame_count(0.00001, 44100).is_err());
    }

    #[test]
    fn test_frame_count_errors() {
        assert_eq!(frame_count(1.0, 0), Err(VoiceError::InvalidSampleRate));
        assert_eq!(frame_count(0.0, 44100), Err(VoiceError::InvalidDuration(0.0)));
        assert_eq!(
            frame_count(-1.0, 44100),
            Err(VoiceError::InvalidDuration(-1.0))
        );
        assert!(frame_count(f64::NAN, 44100).is_err());
    }

    #[test]
    fn test_frame_count_upper_bound() {
        assert_eq!(
            frame_count(1e20, 44100),
            Err(VoiceError::InvalidDuration(1e20))
        );
        assert_eq!(frame_count(1e5, 44100), Err(VoiceError::InvalidDuration(1e5)));
        assert_eq!(frame_count(1.0, MAX_FRAMES as u32).unwrap(), MAX_FRAMES);
        assert!(frame_count(2.0, MAX_FRAMES as u32).is_err());
    }

    #[test]
    fn test_render_rejects_huge_duration() {
        let harmonics = [0.5];
        let huge = Synthesis {
            duration_s: 1e20,
            ..synthesis(&harmonics)
        };
        assert_eq!(huge.render(), Err(VoiceError::InvalidDuration(1e20)));
    }

    #[test]
    fn test_linspace() {
        let v: Vec<f64> = linspace(0.0, 2.0, 5).collect();
        assert_eq!(v, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(linspace(0.0, 2.0, 1).collect::<Vec<_>>(), vec![0.0]);
        assert_eq!(linspace(0.0, 2.0, 0).count(), 0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let harmonics = [0.3, 0.0, 0.2];
        let a = synthesis(&harmonics).render().unwrap();
        let b = synthesis(&harmonics).render().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.frame_count(), 4000);
    }

    #[test]
    fn test_render_starts_at_full_clamped_sum() {
        // t = 0: every cosine is 1 and the envelope is 1
        let harmonics = [0.1, 0.1];
        let buffer = synthesis(&harmonics).render().unwrap();
        assert_eq!(buffer.samples()[0], (FULL_SCALE * 0.2) as i16);
    }

    #[test]
    fn test_render_saturates_instead_of_wrapping() {
        // 26 partials at 0.5 sum to 13x full scale at t = 0
        let harmonics = vec![0.5; 26];
        let buffer = synthesis(&harmonics).render().unwrap();
        assert_eq!(buffer.samples()[0], i16::MAX);
        assert!(buffer.max_abs() <= 32768);
    }

    #[test]
    fn test_render_decays() {
        let harmonics = [0.5];
        let buffer = synthesis(&harmonics).render().unwrap();
        let n = buffer.frame_count();
        let head = max_abs(&buffer.samples()[..n / 10]);
        let tail = max_abs(&buffer.samples()[n - n / 10..]);
        assert!(tail < head);
    }

    #[test]
    fn test_render_rejects_empty_harmonics() {
        assert_eq!(synthesis(&[]).render(), Err(VoiceError::NoHarmonics));
    }

    #[test]
    fn test_frames_are_stereo_copies() {
        let buffer = PcmBuffer::new(vec![1, -2, 3], 100);
        let frames: Vec<_> = buffer.frames().collect();
        assert_eq!(frames, vec![[1, 1], [-2, -2], [3, 3]]);
    }

    #[test]
    fn test_max_abs_handles_i16_min() {
        let buffer = PcmBuffer::new(vec![i16::MIN, 5], 100);
        assert_eq!(buffer.max_abs(), 32768);
        assert_eq!(PcmBuffer::new(vec![], 100).max_abs(), 0);
    }
}
