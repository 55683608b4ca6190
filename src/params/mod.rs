//! Parameter definitions with physical units and documented semantics.
//!
//! Defaults live here with:
//! - Physical units (meters, seconds, Hz, pixels)
//! - Documented ranges and meanings

mod input;
mod render;
mod voice;

// Re-export all types
pub use input::InputConfig;
pub use render::{RenderConfig, WavePalette};
pub use voice::VoiceSettings;
