//! Window and drawing configuration.

use crate::waveform::DrawMode;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial window width (pixels)
    pub window_width: u32,

    /// Initial window height (pixels)
    pub window_height: u32,

    /// How wave points are connected
    pub draw_mode: DrawMode,

    /// Radius of point markers (pixels)
    pub circle_radius_px: f32,

    /// Clear color (linear RGB)
    pub background: [f64; 3],

    pub palette: WavePalette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1128, // Half of a 2256x1504 panel
            window_height: 752,
            draw_mode: DrawMode::Lines,
            circle_radius_px: 1.0,
            background: [0.0, 0.0, 0.0],
            palette: WavePalette::default(),
        }
    }
}

/// Wave colors (RGBA, 0..1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavePalette {
    /// Line color at the start of the clip
    pub line_start: [f32; 4],

    /// Line color at the end of the clip
    pub line_end: [f32; 4],

    /// Point marker color
    pub circle: [f32; 4],
}

impl Default for WavePalette {
    fn default() -> Self {
        Self {
            line_start: [0.0, 0.0, 1.0, 1.0],
            line_end: [0.0, 1.0, 1.0, 1.0],
            circle: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl WavePalette {
    /// Line color at `fraction` of the clip
    pub fn line_color(&self, fraction: f32) -> [f32; 4] {
        let t = fraction.clamp(0.0, 1.0);
        std::array::from_fn(|i| self.line_start[i] + (self.line_end[i] - self.line_start[i]) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_color_interpolates() {
        let palette = WavePalette {
            line_start: [0.0, 0.0, 0.0, 1.0],
            line_end: [1.0, 0.5, 0.0, 1.0],
            circle: [1.0; 4],
        };
        assert_eq!(palette.line_color(0.0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(palette.line_color(0.5), [0.5, 0.25, 0.0, 1.0]);
        assert_eq!(palette.line_color(2.0), [1.0, 0.5, 0.0, 1.0]);
    }
}
