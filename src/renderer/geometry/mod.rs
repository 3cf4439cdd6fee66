//! Volume geometry
//!
//! The shaft effect renders a fixed bounding cube; shadow casters supplied
//! by the caller go through the same [`Geometry`] trait.

use crate::context::GpuContext;
use crate::core::buffer::{IndexBuffer, VertexBuffer};
use crate::core::vertex::VertexP;

/// Trait for drawable geometry.
pub trait Geometry {
    /// Get the vertex buffer.
    fn vertex_buffer(&self) -> &VertexBuffer;

    /// Get the index buffer, if indexed.
    fn index_buffer(&self) -> Option<&IndexBuffer>;

    /// Number of indices (or vertices when non-indexed) to draw.
    fn draw_count(&self) -> u32;

    /// Bind buffers and issue the draw call into an active pass.
    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer().slice());
        if let Some(index_buffer) = self.index_buffer() {
            render_pass.set_index_buffer(index_buffer.slice(), index_buffer.format());
            render_pass.draw_indexed(0..self.draw_count(), 0, 0..1);
        } else {
            render_pass.draw(0..self.draw_count(), 0..1);
        }
    }
}

/// The shaft bounding volume: an axis-aligned cube spanning [-1, 1].
pub struct CubeGeometry {
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    draw_count: u32,
}

impl CubeGeometry {
    /// Upload the unit cube. Topology is fixed; this never fails at this
    /// layer (buffer exhaustion is reported by wgpu itself).
    pub fn unit(ctx: &GpuContext) -> Self {
        let vertices = cube_positions();
        let indices = cube_indices();

        let vertex_buffer = VertexBuffer::new(ctx, &vertices, Some("shaft volume"));
        let index_buffer = IndexBuffer::new_u16(ctx, &indices, Some("shaft volume"));

        Self {
            vertex_buffer,
            index_buffer,
            draw_count: indices.len() as u32,
        }
    }
}

impl Geometry for CubeGeometry {
    fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    fn index_buffer(&self) -> Option<&IndexBuffer> {
        Some(&self.index_buffer)
    }

    fn draw_count(&self) -> u32 {
        self.draw_count
    }
}

// The 8 corners; faces are wound CCW viewed from outside.

fn cube_positions() -> [VertexP; 8] {
    [
        VertexP::new([-1.0, -1.0, -1.0]),
        VertexP::new([1.0, -1.0, -1.0]),
        VertexP::new([1.0, 1.0, -1.0]),
        VertexP::new([-1.0, 1.0, -1.0]),
        VertexP::new([-1.0, -1.0, 1.0]),
        VertexP::new([1.0, -1.0, 1.0]),
        VertexP::new([1.0, 1.0, 1.0]),
        VertexP::new([-1.0, 1.0, 1.0]),
    ]
}

fn cube_indices() -> [u16; 36] {
    [
        // +Z
        4, 5, 6, 4, 6, 7, // -Z
        1, 0, 3, 1, 3, 2, // +X
        5, 1, 2, 5, 2, 6, // -X
        0, 4, 7, 0, 7, 3, // +Y
        7, 6, 2, 7, 2, 3, // -Y
        0, 1, 5, 0, 5, 4,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_topology_is_deterministic() {
        assert_eq!(cube_positions().len(), 8);
        assert_eq!(cube_indices().len(), 36);
        let first: Vec<[f32; 3]> = cube_positions().iter().map(|v| v.position).collect();
        let second: Vec<[f32; 3]> = cube_positions().iter().map(|v| v.position).collect();
        assert_eq!(first, second);
        assert_eq!(cube_indices(), cube_indices());
    }

    #[test]
    fn test_cube_spans_unit_extent() {
        for vertex in cube_positions() {
            for coordinate in vertex.position {
                assert!(coordinate == 1.0 || coordinate == -1.0);
            }
        }
    }

    #[test]
    fn test_cube_indices_in_range_and_non_degenerate() {
        let indices = cube_indices();
        for index in indices {
            assert!((index as usize) < 8);
        }
        for triangle in indices.chunks(3) {
            assert!(triangle[0] != triangle[1]);
            assert!(triangle[1] != triangle[2]);
            assert!(triangle[0] != triangle[2]);
        }
    }
}
