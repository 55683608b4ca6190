//! CPU-side vertex data for wave primitives.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::params::WavePalette;
use crate::waveform::Primitive;

/// Pixel-space vertex shared by the line and circle pipelines
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    /// Disc coordinates for circle quads, zero for lines
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Uniform buffer for the wave shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub screen_size: [f32; 2],
    pub _padding: [f32; 2], // Padding for alignment
}

/// One frame worth of wave vertices
#[derive(Debug, Clone, Default)]
pub struct WaveMesh {
    /// Line list (two vertices per segment)
    pub lines: Vec<Vertex>,

    /// Triangle list (six vertices per circle quad)
    pub circles: Vec<Vertex>,
}

impl WaveMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append primitives, coloring lines along the palette gradient
    pub fn extend(&mut self, primitives: &[Primitive], palette: &WavePalette, radius_px: f32) {
        for primitive in primitives {
            match *primitive {
                Primitive::Line { from, to, fraction } => {
                    let color = palette.line_color(fraction);
                    self.lines.push(vertex(from, Vec2::ZERO, color));
                    self.lines.push(vertex(to, Vec2::ZERO, color));
                }
                Primitive::Circle { center, .. } => {
                    self.push_circle(center, radius_px, palette.circle);
                }
            }
        }
    }

    fn push_circle(&mut self, center: Vec2, radius_px: f32, color: [f32; 4]) {
        let corners = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        for index in [0, 1, 2, 0, 2, 3] {
            let uv = corners[index];
            self.circles
                .push(vertex(center + uv * radius_px, uv, color));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.circles.is_empty()
    }
}

fn vertex(position: Vec2, uv: Vec2, color: [f32; 4]) -> Vertex {
    Vertex {
        position: position.to_array(),
        uv: uv.to_array(),
        color,
    }
}
