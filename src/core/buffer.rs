//! GPU buffer abstractions
//!
//! Typed wrappers for vertex, index, and uniform buffers.

use crate::context::GpuContext;
use bytemuck::{Pod, Zeroable};

/// A GPU buffer containing vertex data.
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

impl VertexBuffer {
    /// Create a vertex buffer from a slice of vertices.
    pub fn new<V: Pod + Zeroable>(ctx: &GpuContext, vertices: &[V], label: Option<&str>) -> Self {
        use wgpu::util::DeviceExt;
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        Self {
            buffer,
            count: vertices.len() as u32,
        }
    }

    /// Get the number of vertices.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Create a buffer slice for the entire buffer.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// A GPU buffer containing index data.
pub struct IndexBuffer {
    buffer: wgpu::Buffer,
    count: u32,
    format: wgpu::IndexFormat,
}

impl IndexBuffer {
    /// Create an index buffer from u16 indices.
    pub fn new_u16(ctx: &GpuContext, indices: &[u16], label: Option<&str>) -> Self {
        Self::create(ctx, bytemuck::cast_slice(indices), indices.len() as u32, wgpu::IndexFormat::Uint16, label)
    }

    /// Create an index buffer from u32 indices.
    pub fn new_u32(ctx: &GpuContext, indices: &[u32], label: Option<&str>) -> Self {
        Self::create(ctx, bytemuck::cast_slice(indices), indices.len() as u32, wgpu::IndexFormat::Uint32, label)
    }

    fn create(
        ctx: &GpuContext,
        contents: &[u8],
        count: u32,
        format: wgpu::IndexFormat,
        label: Option<&str>,
    ) -> Self {
        use wgpu::util::DeviceExt;
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents,
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            buffer,
            count,
            format,
        }
    }

    /// Get the number of indices.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Get the index format (Uint16 or Uint32).
    pub fn format(&self) -> wgpu::IndexFormat {
        self.format
    }

    /// Create a buffer slice for the entire buffer.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// An untyped uniform buffer, rewritten wholesale each frame.
pub struct RawUniformBuffer {
    buffer: wgpu::Buffer,
    size: u64,
}

impl RawUniformBuffer {
    /// Create a uniform buffer of the given size.
    pub fn new(ctx: &GpuContext, size: u64, label: Option<&str>) -> Self {
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label,
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self { buffer, size }
    }

    /// Overwrite the buffer contents.
    pub fn write<T: Pod>(&self, ctx: &GpuContext, data: &T) {
        ctx.queue
            .write_buffer(&self.buffer, 0, bytemuck::bytes_of(data));
    }

    /// Get the raw wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Get the buffer size.
    pub fn size(&self) -> u64 {
        self.size
    }
}
