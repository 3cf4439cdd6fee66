//! Rendering collaborators of the shaft effect
//!
//! The camera, the light, its shadow map, and the bounding-volume geometry.

pub mod geometry;
pub mod light;
pub mod shadow;
pub mod viewer;

pub use geometry::{CubeGeometry, Geometry};
pub use light::{LightHandle, ShaftLight, SharedLight};
pub use shadow::{ShadowConfig, ShadowMap, ShadowPass};
pub use viewer::{Camera, Projection};
