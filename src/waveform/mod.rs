//! Waveform views: a static preview of the whole clip and a moving view
//! that follows playback.

mod geometry;
mod renderer;

pub use geometry::{DrawMode, Primitive, Viewport, WaveGeometry, WavePoint};
pub use renderer::{WaveformRenderer, Window};
