//! String voice synthesis engine.
//!
//! Maps physical string parameters to a fundamental frequency and builds a
//! decaying multi-harmonic 16-bit clip from it.

mod edit;
mod frequency;
pub mod harmonics;
mod string_voice;
pub mod synthesis;

// Re-export public types
pub use edit::{EditOp, VoiceParam};
pub use frequency::{FrequencyModel, StringPhysics};
pub use string_voice::{StringVoice, VoiceStats};
pub use synthesis::{PcmBuffer, Synthesis};
