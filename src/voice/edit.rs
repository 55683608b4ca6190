//! Typed parameter edits for the control surface.

use std::fmt;

/// Editable voice parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceParam {
    Length,
    HarmonicNumber,
    Tension,
    LinearDensity,
    Strength,
    Duration,
}

impl VoiceParam {
    pub fn name(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::HarmonicNumber => "harmonic number",
            Self::Tension => "tension",
            Self::LinearDensity => "linear density",
            Self::Strength => "strength",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for VoiceParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed operation applied to a parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOp {
    /// Multiply by a factor
    Scale(f64),

    /// Add a delta
    Add(f64),
}

impl EditOp {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Scale(factor) => value * factor,
            Self::Add(delta) => value + delta,
        }
    }
}
