//! Shaft material
//!
//! The shader-binding half of the effect: the forward scattering pipeline,
//! the GPU uniform buffer, and the texture inputs (noise, shadow map,
//! deferred scene depth). Only the owning [`LightShaft`] and its one
//! extension method write here.
//!
//! [`LightShaft`]: crate::effect::LightShaft

use crate::context::GpuContext;
use crate::core::buffer::RawUniformBuffer;
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{CullState, RenderFlags};
use crate::core::texture::Texture2D;
use crate::core::vertex::VertexP;
use crate::effect::noise::noise_texture;
use crate::effect::uniforms::ShaftUniformRaw;
use crate::effect::ShaftConfig;
use crate::error::ShaftError;
use crate::renderer::shadow::ShadowMap;

/// Shader state of the forward scattering pass.
pub struct ShaftMaterial {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: RawUniformBuffer,
    noise: Texture2D,
    shadow_view: wgpu::TextureView,
    shadow_sampler: wgpu::Sampler,
    deferred_view: Option<wgpu::TextureView>,
    deferred_sampler: wgpu::Sampler,
    bind_group: Option<wgpu::BindGroup>,
    flags: RenderFlags,
}

impl ShaftMaterial {
    /// Compile the scattering pipeline and bind the construction-time
    /// inputs: the noise texture and this light's shadow map.
    ///
    /// Fails only if shader compilation or pipeline creation fails; the
    /// error is propagated and no material is constructed.
    pub(crate) fn new(
        ctx: &GpuContext,
        format: wgpu::TextureFormat,
        config: &ShaftConfig,
        shadow: &ShadowMap,
    ) -> anyhow::Result<Self> {
        let shader = include_str!("../shaders/light_shaft.wgsl");

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("light shaft bind group layout"),
                    entries: &[
                        // Shaft uniforms
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        // Noise texture
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        // Noise sampler
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                        // Shadow map
                        wgpu::BindGroupLayoutEntry {
                            binding: 3,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Depth,
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        // Shadow comparison sampler
                        wgpu::BindGroupLayoutEntry {
                            binding: 4,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                            count: None,
                        },
                        // Deferred scene depth
                        wgpu::BindGroupLayoutEntry {
                            binding: 5,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Depth,
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        // Deferred depth sampler
                        wgpu::BindGroupLayoutEntry {
                            binding: 6,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                            count: None,
                        },
                    ],
                });

        let flags = RenderFlags::default();

        let pipeline = PipelineBuilder::new(ctx)
            .label("light shaft pipeline")
            .shader(shader)
            .vertex_layout(VertexP::layout())
            .bind_group_layout(&bind_group_layout)
            .color_format(format)
            .blend(flags.blend)
            .depth(flags.depth_state())
            // back faces only, so the volume still renders with the camera inside it
            .cull(CullState::Front)
            .build()?;

        let uniform_buffer = RawUniformBuffer::new(
            ctx,
            std::mem::size_of::<ShaftUniformRaw>() as u64,
            Some("light shaft uniforms"),
        );

        let noise = noise_texture(ctx, config.noise_resolution);

        let deferred_sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shaft deferred depth sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            noise,
            shadow_view: shadow.depth_view().clone(),
            shadow_sampler: shadow.sampler().clone(),
            deferred_view: None,
            deferred_sampler,
            bind_group: None,
            flags,
        })
    }

    /// Bind the deferred scene depth input, replacing any previous one.
    /// The cached bind group is invalidated and rebuilt on the next update.
    pub(crate) fn set_deferred_depth(&mut self, view: &wgpu::TextureView) {
        self.deferred_view = Some(view.clone());
        self.bind_group = None;
    }

    /// Overwrite the GPU uniform buffer.
    pub(crate) fn upload(&self, ctx: &GpuContext, raw: &ShaftUniformRaw) {
        self.uniform_buffer.write(ctx, raw);
    }

    /// Build the bind group if it is missing. Fails until the deferred depth
    /// input has been attached.
    pub(crate) fn ensure_bind_group(&mut self, ctx: &GpuContext) -> Result<(), ShaftError> {
        if self.bind_group.is_some() {
            return Ok(());
        }

        let deferred_view = self
            .deferred_view
            .as_ref()
            .ok_or(ShaftError::DeferredTargetMissing)?;

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("light shaft bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(self.noise.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(self.noise.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&self.shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.shadow_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::TextureView(deferred_view),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: wgpu::BindingResource::Sampler(&self.deferred_sampler),
                },
            ],
        }));

        Ok(())
    }

    /// Get the render pipeline.
    pub(crate) fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Get the current bind group, if an update has built one.
    pub(crate) fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    /// Whether a deferred depth input is attached.
    pub(crate) fn has_deferred_depth(&self) -> bool {
        self.deferred_view.is_some()
    }

    /// The drawable flags the pipeline was built with.
    pub fn flags(&self) -> RenderFlags {
        self.flags
    }
}
