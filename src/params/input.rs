//! Keyboard control timing and edit step sizes.

/// Input configuration
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Minimum time between two triggered actions while keys are held (seconds)
    pub cooldown_s: f32,

    /// Factor for multiplicative edits (length, tension, density, duration)
    pub scale_step: f64,

    /// Step for the harmonic number (dimensionless)
    pub harmonic_step: f64,

    /// Step for the strength ratio
    pub strength_step: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            cooldown_s: 0.125,
            scale_step: 1.1,
            harmonic_step: 1.0,
            strength_step: 0.05,
        }
    }
}
