//! Offscreen render target
//!
//! An earlier pass renders the scene into a [`ColorTarget`]; the light shaft
//! effect then consumes the target's depth attachment to clip its rays
//! against scene geometry.

use crate::context::GpuContext;
use crate::core::render_states::ClearState;
use crate::core::texture::{DepthTexture, Texture2D};

/// An offscreen render target owning a color texture and a depth texture.
pub struct ColorTarget {
    color: Texture2D,
    depth: DepthTexture,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
}

impl ColorTarget {
    /// Create a new offscreen target.
    pub fn new(
        ctx: &GpuContext,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: Option<&str>,
    ) -> Self {
        let color = Texture2D::new(
            ctx,
            width,
            height,
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            label,
        );
        let depth = DepthTexture::new(
            ctx,
            width,
            height,
            label.map(|l| format!("{} depth", l)).as_deref(),
        );

        Self {
            color,
            depth,
            width,
            height,
            format,
        }
    }

    /// Get the target width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the target height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the aspect ratio.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Get the color format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Get the color texture view.
    pub fn color_view(&self) -> &wgpu::TextureView {
        self.color.view()
    }

    /// Get the color sampler.
    pub fn color_sampler(&self) -> &wgpu::Sampler {
        self.color.sampler()
    }

    /// Get the depth texture view.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        self.depth.view()
    }

    /// Begin a render pass into this target.
    pub fn begin_render_pass<'p>(
        &self,
        encoder: &'p mut wgpu::CommandEncoder,
        clear: ClearState,
    ) -> wgpu::RenderPass<'p> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: self.color.view(),
            resolve_target: None,
            ops: wgpu::Operations {
                load: clear.color_load_op(),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_attachment = wgpu::RenderPassDepthStencilAttachment {
            view: self.depth.view(),
            depth_ops: Some(wgpu::Operations {
                load: clear.depth_load_op(),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("color target pass"),
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment: Some(depth_attachment),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
