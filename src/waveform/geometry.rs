//! Screen-space geometry produced by the waveform renderer.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;

use crate::error::DrawModeError;

/// Drawable area (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Vertical unit used by both wave views: a sixth of the height
    pub fn wave_scale(&self) -> f32 {
        self.height / 6.0
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// One rendered sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavePoint {
    /// Position (pixels)
    pub position: Vec2,

    /// Position within the playback session in `[0, 1)`, for color gradients.
    /// Continuous across partial redraws.
    pub fraction: f32,
}

/// Ordered point sequence for one wave view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveGeometry {
    pub points: Vec<WavePoint>,
}

impl WaveGeometry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Connect consecutive points according to the draw mode.
    ///
    /// Point 0 only ever serves as the start of the first segment.
    pub fn primitives(&self, mode: DrawMode) -> Vec<Primitive> {
        let mut out = Vec::new();
        for pair in self.points.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            if mode.draws_lines() {
                out.push(Primitive::Line {
                    from: prev.position,
                    to: cur.position,
                    fraction: prev.fraction,
                });
            }
            if mode.draws_circles() {
                out.push(Primitive::Circle {
                    center: cur.position,
                    fraction: cur.fraction,
                });
            }
        }
        out
    }
}

/// Draw call for the render surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Line { from: Vec2, to: Vec2, fraction: f32 },
    Circle { center: Vec2, fraction: f32 },
}

/// How consecutive wave points are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Lines,
    Circles,
    Both,
}

impl DrawMode {
    pub fn draws_lines(self) -> bool {
        matches!(self, Self::Lines | Self::Both)
    }

    pub fn draws_circles(self) -> bool {
        matches!(self, Self::Circles | Self::Both)
    }

    /// Next mode in `Lines -> Circles -> Both -> Lines` order
    pub fn next(self) -> Self {
        match self {
            Self::Lines => Self::Circles,
            Self::Circles => Self::Both,
            Self::Both => Self::Lines,
        }
    }
}

impl FromStr for DrawMode {
    type Err = DrawModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" => Ok(Self::Lines),
            "circles" => Ok(Self::Circles),
            "both" => Ok(Self::Both),
            _ => Err(DrawModeError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lines => "lines",
            Self::Circles => "circles",
            Self::Both => "both",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(n: usize) -> WaveGeometry {
        WaveGeometry {
            points: (0..n)
                .map(|i| WavePoint {
                    position: Vec2::new(i as f32, 0.0),
                    fraction: i as f32 / n as f32,
                })
                .collect(),
        }
    }

    #[test]
    fn test_draw_mode_parsing() {
        assert_eq!("Lines".parse::<DrawMode>().unwrap(), DrawMode::Lines);
        assert_eq!("circles".parse::<DrawMode>().unwrap(), DrawMode::Circles);
        assert_eq!("BOTH".parse::<DrawMode>().unwrap(), DrawMode::Both);
        assert_eq!(
            "dots".parse::<DrawMode>(),
            Err(DrawModeError::Unknown("dots".to_string()))
        );
    }

    #[test]
    fn test_draw_mode_cycle() {
        let mut mode = DrawMode::Lines;
        for expected in [DrawMode::Circles, DrawMode::Both, DrawMode::Lines] {
            mode = mode.next();
            assert_eq!(mode, expected);
        }
    }

    #[test]
    fn test_primitive_counts() {
        let g = geometry(5);
        assert_eq!(g.primitives(DrawMode::Lines).len(), 4);
        assert_eq!(g.primitives(DrawMode::Circles).len(), 4);
        assert_eq!(g.primitives(DrawMode::Both).len(), 8);
        assert!(geometry(1).primitives(DrawMode::Both).is_empty());
        assert!(WaveGeometry::empty().primitives(DrawMode::Lines).is_empty());
    }

    #[test]
    fn test_lines_connect_neighbours() {
        let prims = geometry(3).primitives(DrawMode::Lines);
        assert_eq!(
            prims[1],
            Primitive::Line {
                from: Vec2::new(1.0, 0.0),
                to: Vec2::new(2.0, 0.0),
                fraction: 1.0 / 3.0,
            }
        );
    }

    #[test]
    fn test_circles_skip_first_point() {
        let prims = geometry(3).primitives(DrawMode::Circles);
        assert_eq!(
            prims[0],
            Primitive::Circle {
                center: Vec2::new(1.0, 0.0),
                fraction: 1.0 / 3.0,
            }
        );
    }
}
