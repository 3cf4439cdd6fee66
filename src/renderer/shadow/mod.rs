//! Shadow mapping for the shaft light
//!
//! Renders scene depth from the light's point of view. The scattering shader
//! samples the resulting map with a comparison sampler to decide, per march
//! step, whether the light reaches that point.
//!
//! Scheduling precondition: the shadow pass must be recorded before the
//! effect's frame hook runs; this crate documents the ordering but does not
//! enforce it.

use crate::context::GpuContext;
use crate::core::buffer::RawUniformBuffer;
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{CullState, DepthState};
use crate::core::texture::DepthTexture;
use crate::core::vertex::VertexP;
use crate::error::ShaftError;
use crate::renderer::geometry::Geometry;
use crate::renderer::light::ShaftLight;
use glam::Mat4;

/// Shadow map configuration.
#[derive(Debug, Clone, Copy)]
pub struct ShadowConfig {
    /// Shadow map resolution (width and height).
    pub resolution: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self { resolution: 1024 }
    }
}

/// Depth map rendered from the shaft light's point of view.
pub struct ShadowMap {
    depth_texture: DepthTexture,
    sampler: wgpu::Sampler,
    config: ShadowConfig,
}

impl ShadowMap {
    /// Create a new shadow map.
    pub fn new(ctx: &GpuContext, config: ShadowConfig) -> Self {
        let depth_texture = DepthTexture::new(
            ctx,
            config.resolution,
            config.resolution,
            Some("shaft shadow map"),
        );

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shaft shadow sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            depth_texture,
            sampler,
            config,
        }
    }

    /// Get the depth texture view for sampling.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        self.depth_texture.view()
    }

    /// Get the comparison sampler.
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Get the map resolution.
    pub fn resolution(&self) -> u32 {
        self.config.resolution
    }
}

/// Per-caster uniform for the depth pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct DepthPassUniform {
    light_view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

/// Depth-only pass producing the shaft light's shadow map.
pub struct ShadowPass {
    shadow_map: ShadowMap,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: RawUniformBuffer,
}

impl ShadowPass {
    /// Create the depth pass and its shadow map.
    pub fn new(ctx: &GpuContext, config: ShadowConfig) -> anyhow::Result<Self> {
        let shadow_map = ShadowMap::new(ctx, config);

        let shader = include_str!("../../shaders/shadow.wgsl");

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("shadow depth bind group layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let pipeline = PipelineBuilder::new(ctx)
            .label("shadow depth pipeline")
            .shader(shader)
            .vertex_layout(VertexP::layout())
            .bind_group_layout(&bind_group_layout)
            .depth(DepthState::read_write())
            .cull(CullState::Back)
            .build_depth_only()?;

        let uniform_buffer = RawUniformBuffer::new(
            ctx,
            std::mem::size_of::<DepthPassUniform>() as u64,
            Some("shadow depth uniform"),
        );

        Ok(Self {
            shadow_map,
            pipeline,
            bind_group_layout,
            uniform_buffer,
        })
    }

    /// Render the shadow casters into the map from the light's point of view.
    pub fn render<G: Geometry>(
        &self,
        ctx: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        light: &ShaftLight,
        casters: &[(Mat4, &G)],
    ) -> Result<(), ShaftError> {
        let light_view_proj = light.view_projection()?;

        tracing::debug!(casters = casters.len(), "shaft shadow pass");

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("shaft shadow pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.shadow_map.depth_view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        render_pass.set_pipeline(&self.pipeline);

        for (model_matrix, geometry) in casters {
            let uniform = DepthPassUniform {
                light_view_proj: light_view_proj.to_cols_array_2d(),
                model: model_matrix.to_cols_array_2d(),
            };
            self.uniform_buffer.write(ctx, &uniform);

            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("shadow depth bind group"),
                layout: &self.bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.buffer().as_entire_binding(),
                }],
            });

            render_pass.set_bind_group(0, &bind_group, &[]);
            geometry.draw(&mut render_pass);
        }

        Ok(())
    }

    /// Get the shadow map the pass renders into.
    pub fn shadow_map(&self) -> &ShadowMap {
        &self.shadow_map
    }
}
