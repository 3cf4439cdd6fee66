//! GPU primitives
//!
//! Thin typed wrappers over wgpu buffers, textures, pipelines, and render
//! state. The effect layer builds on these; nothing here knows about lights
//! or shafts.

pub mod buffer;
pub mod pipeline;
pub mod render_states;
pub mod render_target;
pub mod texture;
pub mod vertex;

pub use buffer::{IndexBuffer, RawUniformBuffer, VertexBuffer};
pub use pipeline::PipelineBuilder;
pub use render_states::{BlendState, ClearState, CullState, DepthState, RenderFlags};
pub use render_target::ColorTarget;
pub use texture::{DepthTexture, Texture2D};
pub use vertex::VertexP;
