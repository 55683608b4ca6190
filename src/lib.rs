//! Stringsynth library - physical string synthesis with live waveform views

pub mod audio;
pub mod cli;
pub mod error;
pub mod input;
pub mod params;
pub mod rendering;
pub mod voice;
pub mod waveform;
