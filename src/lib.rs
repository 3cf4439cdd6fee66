//! godray - volumetric light shafts for wgpu
//!
//! Renders a coarse bounding volume around a shadow-casting light with a
//! shader that approximates in-scattered light along view rays, modulated
//! per pixel by the light's shadow map.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **context** - Core wgpu wrapper (Device, Queue)
//! 2. **core** - GPU primitives (buffers, textures, pipelines, render state)
//! 3. **renderer** - The effect's collaborators (camera, light, shadow map,
//!    volume geometry)
//! 4. **effect** - The light shaft entity and the per-frame hook protocol
//!
//! # Per-frame protocol
//!
//! The caller drives a fixed order every frame:
//!
//! 1. render the light's shadow map ([`ShadowPass::render`]),
//! 2. run the frame hooks ([`run_frame_hooks`]) - the shaft re-reads the
//!    live light and overwrites its uniforms,
//! 3. draw the shaft ([`LightShaft::draw`]) into a pass with a depth
//!    attachment.
//!
//! The shaft holds only a weak handle to the light and never enforces step
//! 1 itself; rendering the shadow map first is a documented precondition.
//!
//! ```no_run
//! use godray::{
//!     ClearState, ColorTarget, FrameContext, GpuContext, LightShaft, ShadowConfig, ShadowPass,
//!     ShaftConfig, ShaftLight,
//! };
//! use godray::glam::Vec3;
//!
//! # fn demo(ctx: &GpuContext, camera: &godray::Camera) -> anyhow::Result<()> {
//! let light = ShaftLight::aimed(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO).into_shared();
//! let shadow_pass = ShadowPass::new(ctx, ShadowConfig::default())?;
//! let scene_target = ColorTarget::new(ctx, 1280, 720, wgpu::TextureFormat::Rgba16Float, None);
//!
//! let mut shaft = LightShaft::new(
//!     ctx,
//!     &light,
//!     shadow_pass.shadow_map(),
//!     scene_target.format(),
//!     ShaftConfig::default(),
//! )?;
//! shaft.set_deferred_target(&scene_target);
//!
//! // per frame, after the shadow pass and the scene pass:
//! shaft.update(camera)?;
//! let mut encoder = ctx.create_encoder(Some("shaft"));
//! {
//!     let mut pass = scene_target.begin_render_pass(&mut encoder, ClearState::none());
//!     shaft.draw(&mut pass)?;
//! }
//! ctx.submit([encoder.finish()]);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod core;
pub mod effect;
pub mod error;
pub mod renderer;

// Re-export commonly used types
pub use context::GpuContext;

pub use crate::core::{
    BlendState, ClearState, ColorTarget, CullState, DepthState, DepthTexture, IndexBuffer,
    PipelineBuilder, RawUniformBuffer, RenderFlags, Texture2D, VertexBuffer, VertexP,
};

pub use renderer::{
    Camera, CubeGeometry, Geometry, LightHandle, Projection, ShadowConfig, ShadowMap, ShadowPass,
    ShaftLight, SharedLight,
};

pub use effect::{
    run_frame_hooks, FnHook, FrameContext, FrameHook, LightShaft, ShaftBinding, ShaftConfig,
    ShaftMaterial, ShaftUniformRaw, UniformBlock, UniformKey, UniformKind, UniformValue,
};

pub use error::ShaftError;

// Re-export glam for convenience
pub use glam;
