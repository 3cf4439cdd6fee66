//! Render state configurations
//!
//! Plain-data render state that maps onto wgpu pipeline and pass descriptors.

/// Clear state for render targets.
#[derive(Debug, Clone, Copy)]
pub struct ClearState {
    /// Color to clear to (RGBA), or None to keep the previous contents.
    pub color: Option<[f32; 4]>,
    /// Depth value to clear to, or None to keep the previous contents.
    pub depth: Option<f32>,
}

impl ClearState {
    /// Clear color only.
    pub fn color(color: [f32; 4]) -> Self {
        Self {
            color: Some(color),
            depth: None,
        }
    }

    /// Clear both color and depth.
    pub fn color_and_depth(color: [f32; 4], depth: f32) -> Self {
        Self {
            color: Some(color),
            depth: Some(depth),
        }
    }

    /// Keep everything (load the previous contents).
    pub fn none() -> Self {
        Self {
            color: None,
            depth: None,
        }
    }

    /// Get the wgpu load operation for color.
    pub fn color_load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        match self.color {
            Some([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            }),
            None => wgpu::LoadOp::Load,
        }
    }

    /// Get the wgpu load operation for depth.
    pub fn depth_load_op(&self) -> wgpu::LoadOp<f32> {
        match self.depth {
            Some(d) => wgpu::LoadOp::Clear(d),
            None => wgpu::LoadOp::Load,
        }
    }
}

impl Default for ClearState {
    fn default() -> Self {
        Self::color_and_depth([0.0, 0.0, 0.0, 1.0], 1.0)
    }
}

/// Blend state configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendState {
    /// No blending (opaque).
    #[default]
    Opaque,
    /// Standard alpha blending.
    Alpha,
    /// Additive blending (src ONE, dst ONE). Overlapping shafts accumulate.
    Additive,
}

impl BlendState {
    /// Convert to wgpu blend state.
    pub fn to_wgpu(&self) -> Option<wgpu::BlendState> {
        match self {
            BlendState::Opaque => None,
            BlendState::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
            BlendState::Additive => Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            }),
        }
    }
}

/// Depth test configuration.
#[derive(Debug, Clone, Copy)]
pub struct DepthState {
    /// Whether to write to the depth buffer.
    pub write: bool,
    /// Comparison function for the depth test.
    pub compare: wgpu::CompareFunction,
}

impl DepthState {
    /// Depth testing enabled with writes.
    pub fn read_write() -> Self {
        Self {
            write: true,
            compare: wgpu::CompareFunction::Less,
        }
    }

    /// Depth testing enabled without writes.
    pub fn read_only() -> Self {
        Self {
            write: false,
            compare: wgpu::CompareFunction::Less,
        }
    }

    /// Depth testing disabled.
    pub fn disabled() -> Self {
        Self {
            write: false,
            compare: wgpu::CompareFunction::Always,
        }
    }

    /// Convert to wgpu depth stencil state.
    pub fn to_wgpu(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.write,
            depth_compare: self.compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

impl Default for DepthState {
    fn default() -> Self {
        Self::read_write()
    }
}

/// Cull mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullState {
    /// No culling.
    None,
    /// Cull front faces.
    Front,
    /// Cull back faces.
    #[default]
    Back,
}

impl CullState {
    /// Convert to wgpu cull mode.
    pub fn to_wgpu(&self) -> Option<wgpu::Face> {
        match self {
            CullState::None => None,
            CullState::Front => Some(wgpu::Face::Front),
            CullState::Back => Some(wgpu::Face::Back),
        }
    }
}

/// The drawable configuration of the shaft volume.
///
/// The shaft composites additively over the already-rendered scene: it must
/// neither write depth nor be rejected by the scene's depth buffer, so the
/// default has both flags off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFlags {
    /// Whether fragments are tested against the depth buffer.
    pub depth_test: bool,
    /// Whether fragments write to the depth buffer.
    pub depth_write: bool,
    /// Color blend mode.
    pub blend: BlendState,
}

impl RenderFlags {
    /// The wgpu depth state these flags describe.
    pub fn depth_state(&self) -> DepthState {
        DepthState {
            write: self.depth_write,
            compare: if self.depth_test {
                wgpu::CompareFunction::Less
            } else {
                wgpu::CompareFunction::Always
            },
        }
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            depth_test: false,
            depth_write: false,
            blend: BlendState::Additive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additive_blend_is_one_one() {
        let blend = BlendState::Additive.to_wgpu().unwrap();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.alpha.src_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.alpha.dst_factor, wgpu::BlendFactor::One);
    }

    #[test]
    fn test_default_flags_disable_depth() {
        let flags = RenderFlags::default();
        assert!(!flags.depth_test);
        assert!(!flags.depth_write);
        assert_eq!(flags.blend, BlendState::Additive);

        let depth = flags.depth_state();
        assert!(!depth.write);
        assert_eq!(depth.compare, wgpu::CompareFunction::Always);
    }
}
