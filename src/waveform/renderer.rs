//! Full-clip preview and incremental "now audible" window.

use std::time::Instant;

use glam::Vec2;

use super::geometry::{Viewport, WaveGeometry, WavePoint};
use crate::voice::synthesis::{linspace, max_abs};

/// Per-voice renderer state.
///
/// Holds the watermark: the end of the last drawn window in the current
/// playback session. It only moves forward until `reset` is called by a new
/// playback, and never exceeds the clip's frame count.
#[derive(Debug, Clone, Default)]
pub struct WaveformRenderer {
    watermark: usize,
}

/// Sample range chosen for one moving-wave frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl WaveformRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watermark(&self) -> usize {
        self.watermark
    }

    /// Start a new playback session
    pub fn reset(&mut self) {
        self.watermark = 0;
    }

    /// Whole clip, subsampled to about one point per pixel column.
    ///
    /// Normalized by the largest magnitude among the kept samples and
    /// centred at `height - 3 * height/6`. Silent or empty clips give nothing.
    pub fn render_full_wave(&self, samples: &[i16], viewport: Viewport) -> WaveGeometry {
        if samples.is_empty() || viewport.is_degenerate() {
            return WaveGeometry::empty();
        }

        let frames = samples.len();
        let stride = ((frames as f64 / viewport.width as f64).ceil() as usize).max(1);
        let reduced: Vec<i16> = samples.iter().step_by(stride).copied().collect();

        let peak = max_abs(&reduced);
        if peak == 0 {
            return WaveGeometry::empty();
        }

        let scale = viewport.wave_scale();
        let baseline = viewport.height - 3.0 * scale;
        let points = project(&reduced, peak, scale, baseline, viewport.width)
            .enumerate()
            .map(|(k, position)| WavePoint {
                position,
                fraction: (k * stride) as f32 / frames as f32,
            })
            .collect();

        WaveGeometry { points }
    }

    /// Compute the sample window that became audible since the last frame.
    ///
    /// Returns `None` for a non-positive span, which happens right after
    /// playback starts and for every frame once the clip has been drawn to
    /// its end.
    pub fn moving_window(
        &self,
        frames: usize,
        elapsed_s: f64,
        duration_s: f64,
        sample_rate_hz: u32,
    ) -> Option<Window> {
        if frames == 0 || duration_s <= 0.0 {
            return None;
        }

        let elapsed = elapsed_s.clamp(0.0, duration_s);
        let current = ((elapsed / duration_s) * frames as f64).round() as i64;
        let span = (sample_rate_hz as f64 * elapsed).round() as i64;

        let start = (self.watermark as i64).max(current - span);
        let end = (frames as i64).min(current + span);

        (end > start).then(|| Window {
            start: start as usize,
            end: end as usize,
        })
    }

    /// Draw only the newly audible part of the clip.
    ///
    /// Normalized by the whole clip's peak (unlike the full view), centred at
    /// `height - height/6`, spread across the full width. Advances the
    /// watermark to the window end on every non-empty render.
    pub fn render_moving_wave(
        &mut self,
        samples: &[i16],
        playback_start: Option<Instant>,
        duration_s: f64,
        sample_rate_hz: u32,
        now: Instant,
        viewport: Viewport,
    ) -> WaveGeometry {
        let Some(start) = playback_start else {
            return WaveGeometry::empty();
        };
        if viewport.is_degenerate() {
            return WaveGeometry::empty();
        }

        let elapsed_s = now.saturating_duration_since(start).as_secs_f64();
        let Some(window) =
            self.moving_window(samples.len(), elapsed_s, duration_s, sample_rate_hz)
        else {
            return WaveGeometry::empty();
        };

        let peak = max_abs(samples);
        if peak == 0 {
            return WaveGeometry::empty();
        }

        let frames = samples.len() as f32;
        let scale = viewport.wave_scale();
        let baseline = viewport.height - scale;
        let points = project(
            &samples[window.start..window.end],
            peak,
            scale,
            baseline,
            viewport.width,
        )
        .enumerate()
        .map(|(i, position)| WavePoint {
            position,
            fraction: (window.start + i) as f32 / frames,
        })
        .collect();

        log::trace!(
            "moving wave {}..{} (watermark {})",
            window.start,
            window.end,
            self.watermark
        );
        self.watermark = window.end;

        WaveGeometry { points }
    }
}

/// Map samples to screen space: x evenly over `[0, width]`, y around `baseline`.
fn project<'a>(
    samples: &'a [i16],
    peak: i32,
    scale: f32,
    baseline: f32,
    width: f32,
) -> impl Iterator<Item = Vec2> + 'a {
    linspace(0.0, width as f64, samples.len())
        .zip(samples)
        .map(move |(x, &s)| {
            let normalized = s as f32 / peak as f32;
            Vec2::new(x as f32, baseline + normalized * scale)
        })
}
