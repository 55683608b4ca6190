//! Frequency models: how a voice turns its parameters into a fundamental.

use crate::error::VoiceError;

/// Physical description of an idealized vibrating string.
///
/// Frequency relation: `f = (2L / n) * sqrt(T / μ)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringPhysics {
    /// String length (meters)
    pub length_m: f64,

    /// Harmonic number n (dimensionless, must be non-zero)
    pub harmonic_number: f64,

    /// String tension (newtons, must be >= 0)
    pub tension_n: f64,

    /// Linear density μ (kg per meter, must be > 0)
    pub linear_density: f64,
}

impl Default for StringPhysics {
    fn default() -> Self {
        Self {
            length_m: 10.0,
            harmonic_number: 1.0,
            tension_n: 345.23,
            linear_density: 5.1,
        }
    }
}

impl StringPhysics {
    /// Check the parameters without computing anything.
    pub fn validate(&self) -> Result<(), VoiceError> {
        if self.harmonic_number == 0.0 {
            return Err(VoiceError::ZeroHarmonicNumber);
        }
        if self.linear_density.is_nan() || self.linear_density <= 0.0 {
            return Err(VoiceError::NonPositiveDensity(self.linear_density));
        }
        if self.tension_n < 0.0 {
            return Err(VoiceError::NegativeTension(self.tension_n));
        }
        Ok(())
    }

    /// The `2L / n` term.
    pub fn length_term(&self) -> f64 {
        2.0 * self.length_m / self.harmonic_number
    }

    /// The `sqrt(T / μ)` term (wave speed along the string).
    pub fn wave_speed(&self) -> f64 {
        (self.tension_n / self.linear_density).sqrt()
    }

    /// Fundamental frequency (Hz)
    pub fn frequency(&self) -> Result<f64, VoiceError> {
        self.validate()?;
        finite(self.length_term() * self.wave_speed())
    }
}

/// Closed set of ways a voice derives its fundamental.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrequencyModel {
    /// Plain tone with a directly specified frequency (Hz)
    Tone { frequency_hz: f64 },

    /// Frequency derived from string physics
    String(StringPhysics),
}

impl Default for FrequencyModel {
    fn default() -> Self {
        Self::String(StringPhysics::default())
    }
}

impl FrequencyModel {
    /// Fundamental frequency (Hz)
    pub fn frequency(&self) -> Result<f64, VoiceError> {
        match self {
            Self::Tone { frequency_hz } => finite(*frequency_hz),
            Self::String(physics) => physics.frequency(),
        }
    }

    pub fn string_physics(&self) -> Option<&StringPhysics> {
        match self {
            Self::String(physics) => Some(physics),
            Self::Tone { .. } => None,
        }
    }
}

fn finite(frequency: f64) -> Result<f64, VoiceError> {
    if frequency.is_finite() {
        Ok(frequency)
    } else {
        Err(VoiceError::NonFiniteFrequency(frequency))
    }
}
