//! Render pipeline builder
//!
//! Builder for wgpu render pipelines. Shader compilation and layout
//! validation happen inside `build`; a failure there is fatal to whatever is
//! being constructed and is propagated unchanged.

use crate::context::GpuContext;
use crate::core::render_states::{BlendState, CullState, DepthState};
use crate::core::texture::DepthTexture;

/// Builder for render pipelines. Entry points are fixed at `vs_main` /
/// `fs_main` and topology at triangle lists.
pub struct PipelineBuilder<'a> {
    ctx: &'a GpuContext,
    label: Option<&'a str>,
    shader_source: Option<&'a str>,
    vertex_layouts: Vec<wgpu::VertexBufferLayout<'a>>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    color_format: wgpu::TextureFormat,
    depth_state: Option<DepthState>,
    blend_state: BlendState,
    cull_state: CullState,
}

impl<'a> PipelineBuilder<'a> {
    /// Create a new pipeline builder.
    pub fn new(ctx: &'a GpuContext) -> Self {
        Self {
            ctx,
            label: None,
            shader_source: None,
            vertex_layouts: Vec::new(),
            bind_group_layouts: Vec::new(),
            color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            depth_state: None,
            blend_state: BlendState::Opaque,
            cull_state: CullState::Back,
        }
    }

    /// Set the pipeline label.
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Set the shader source (WGSL).
    pub fn shader(mut self, source: &'a str) -> Self {
        self.shader_source = Some(source);
        self
    }

    /// Add a vertex buffer layout.
    pub fn vertex_layout(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_layouts.push(layout);
        self
    }

    /// Add a bind group layout.
    pub fn bind_group_layout(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bind_group_layouts.push(layout);
        self
    }

    /// Set the color target format.
    pub fn color_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = format;
        self
    }

    /// Enable depth testing.
    pub fn depth(mut self, state: DepthState) -> Self {
        self.depth_state = Some(state);
        self
    }

    /// Set the blend state.
    pub fn blend(mut self, state: BlendState) -> Self {
        self.blend_state = state;
        self
    }

    /// Set the cull state.
    pub fn cull(mut self, state: CullState) -> Self {
        self.cull_state = state;
        self
    }

    fn module_and_layout(
        &self,
    ) -> anyhow::Result<(wgpu::ShaderModule, wgpu::PipelineLayout)> {
        let shader_source = self
            .shader_source
            .ok_or_else(|| anyhow::anyhow!("Shader source is required"))?;

        let shader_module = self
            .ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: self.label,
                source: wgpu::ShaderSource::Wgsl(shader_source.into()),
            });

        let pipeline_layout =
            self.ctx
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: self.label,
                    bind_group_layouts: &self.bind_group_layouts,
                    immediate_size: 0,
                });

        Ok((shader_module, pipeline_layout))
    }

    fn primitive_state(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: self.cull_state.to_wgpu(),
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        }
    }

    /// Build a depth-only render pipeline (no color output).
    /// Used for shadow map generation.
    pub fn build_depth_only(self) -> anyhow::Result<wgpu::RenderPipeline> {
        let (shader_module, pipeline_layout) = self.module_and_layout()?;

        let depth_stencil = self
            .depth_state
            .unwrap_or_default()
            .to_wgpu(DepthTexture::FORMAT);

        let pipeline = self
            .ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: self.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader_module,
                    entry_point: Some("vs_main"),
                    buffers: &self.vertex_layouts,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader_module,
                    entry_point: Some("fs_main"),
                    targets: &[],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: self.primitive_state(),
                depth_stencil: Some(depth_stencil),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview_mask: None,
                cache: None,
            });

        Ok(pipeline)
    }

    /// Build the render pipeline.
    pub fn build(self) -> anyhow::Result<wgpu::RenderPipeline> {
        let (shader_module, pipeline_layout) = self.module_and_layout()?;

        let depth_stencil = self
            .depth_state
            .map(|state| state.to_wgpu(DepthTexture::FORMAT));

        let pipeline = self
            .ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: self.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader_module,
                    entry_point: Some("vs_main"),
                    buffers: &self.vertex_layouts,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader_module,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.color_format,
                        blend: self.blend_state.to_wgpu(),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: self.primitive_state(),
                depth_stencil,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview_mask: None,
                cache: None,
            });

        Ok(pipeline)
    }
}
