//! Light shaft effect
//!
//! Renders a coarse bounding volume around a shadow-casting light with a
//! shader that approximates in-scattered light along view rays. The per-frame
//! protocol is strict: [`LightShaft::update`] re-reads the live light and
//! overwrites every time-varying uniform, then [`LightShaft::draw`] issues
//! the draw call with the now-current values. Draws before the first update
//! fail rather than render garbage.

use crate::context::GpuContext;
use crate::core::render_states::RenderFlags;
use crate::core::render_target::ColorTarget;
use crate::effect::material::ShaftMaterial;
use crate::effect::uniforms::{UniformBlock, UniformKey};
use crate::effect::{FrameContext, FrameHook};
use crate::error::ShaftError;
use crate::renderer::geometry::{CubeGeometry, Geometry};
use crate::renderer::light::{LightHandle, SharedLight};
use crate::renderer::shadow::ShadowMap;
use crate::renderer::viewer::Camera;
use glam::Mat4;

/// Construction options for [`LightShaft`].
#[derive(Debug, Clone, Copy)]
pub struct ShaftConfig {
    /// Scattering strength. Immutable after construction.
    pub intensity: f32,
    /// Side length of the dither texture.
    pub noise_resolution: u32,
}

impl Default for ShaftConfig {
    fn default() -> Self {
        Self {
            intensity: 0.01,
            noise_resolution: 32,
        }
    }
}

/// CPU half of the effect: the uniform table plus the live light binding.
///
/// Holds only a weak handle to the light; the caller keeps the light alive
/// for as long as the shaft is rendered, and `refresh` reports
/// [`ShaftError::LightDropped`] if it does not.
pub struct ShaftBinding {
    light: LightHandle,
    uniforms: UniformBlock,
    transform: Mat4,
}

impl ShaftBinding {
    /// Create the binding and seed the construction-time uniforms.
    pub fn new(light: &SharedLight, config: &ShaftConfig) -> Result<Self, ShaftError> {
        let mut uniforms = UniformBlock::new();
        uniforms.set(UniformKey::Intensity, config.intensity)?;

        Ok(Self {
            light: SharedLight::downgrade(light),
            uniforms,
            transform: Mat4::IDENTITY,
        })
    }

    /// World placement of the bounding volume.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Set the world placement of the bounding volume.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Re-read the light and overwrite every per-frame uniform.
    ///
    /// Runs synchronously on the render thread, once per frame, strictly
    /// before the draw.
    pub fn refresh(&mut self, camera: &Camera) -> Result<(), ShaftError> {
        let light = self.light.upgrade().ok_or(ShaftError::LightDropped)?;
        let light = light.read();

        let uniforms = &mut self.uniforms;
        uniforms.set(UniformKey::LightFov, light.fov)?;
        uniforms.set(UniformKey::LightNearFar, light.near_far())?;
        uniforms.set(UniformKey::LightPos, light.position())?;
        uniforms.set(UniformKey::LightColor, light.color)?;
        uniforms.set(UniformKey::LightPv, light.view_projection()?)?;
        uniforms.set(UniformKey::CameraNearFar, camera.near_far())?;
        uniforms.set(UniformKey::CameraPos, camera.position)?;
        uniforms.set(UniformKey::CameraPv, camera.view_projection_matrix())?;
        uniforms.set(UniformKey::Model, self.transform)?;

        Ok(())
    }

    /// The uniform table.
    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }
}

/// The light shaft effect entity.
pub struct LightShaft {
    ctx: GpuContext,
    binding: ShaftBinding,
    material: ShaftMaterial,
    geometry: CubeGeometry,
}

impl LightShaft {
    /// Build the effect for `light`, whose shadow map is `shadow`.
    ///
    /// `format` is the color format of the pass the shaft is drawn into.
    /// Construction fails only if shader compilation or pipeline creation
    /// fails; the error is surfaced to the caller and nothing is retained.
    ///
    /// The shadow map must belong to the same light and must be rendered
    /// before this effect's update each frame.
    pub fn new(
        ctx: &GpuContext,
        light: &SharedLight,
        shadow: &ShadowMap,
        format: wgpu::TextureFormat,
        config: ShaftConfig,
    ) -> anyhow::Result<Self> {
        let geometry = CubeGeometry::unit(ctx);
        let binding = ShaftBinding::new(light, &config)?;
        let material = ShaftMaterial::new(ctx, format, &config, shadow)?;

        Ok(Self {
            ctx: ctx.clone(),
            binding,
            material,
            geometry,
        })
    }

    /// Attach the depth output of the earlier scene pass.
    ///
    /// Callable any number of times between construction and the next
    /// update; the last target wins. The shaft cannot be updated or drawn
    /// until this has been called at least once.
    pub fn set_deferred_target(&mut self, target: &ColorTarget) {
        tracing::debug!("rebinding shaft deferred depth target");
        self.material.set_deferred_depth(target.depth_view());
    }

    /// Whether a deferred target has been attached.
    pub fn has_deferred_target(&self) -> bool {
        self.material.has_deferred_depth()
    }

    /// World placement of the bounding volume.
    pub fn transform(&self) -> Mat4 {
        self.binding.transform()
    }

    /// Set the world placement of the bounding volume.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.binding.set_transform(transform);
    }

    /// The CPU-side uniform table.
    pub fn uniforms(&self) -> &UniformBlock {
        self.binding.uniforms()
    }

    /// The drawable flags of the forward pass.
    pub fn flags(&self) -> RenderFlags {
        self.material.flags()
    }

    /// Per-frame update: refresh the uniform table from the live light,
    /// upload it, and make sure the bind group exists.
    pub fn update(&mut self, camera: &Camera) -> Result<(), ShaftError> {
        self.binding.refresh(camera)?;
        let raw = self.binding.uniforms().pack()?;
        self.material.upload(&self.ctx, &raw);
        self.material.ensure_bind_group(&self.ctx)?;
        Ok(())
    }

    /// Draw the shaft volume into an active pass.
    ///
    /// Must run after [`update`](Self::update) within the same frame; fails
    /// with [`ShaftError::NotUpdated`] if no update has completed yet.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) -> Result<(), ShaftError> {
        let bind_group = self.material.bind_group().ok_or(ShaftError::NotUpdated)?;

        render_pass.set_pipeline(self.material.pipeline());
        render_pass.set_bind_group(0, bind_group, &[]);
        self.geometry.draw(render_pass);

        Ok(())
    }
}

impl FrameHook for LightShaft {
    fn on_frame(&mut self, frame: &FrameContext<'_>) -> Result<(), ShaftError> {
        self.update(frame.camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::uniforms::UniformValue;
    use crate::renderer::light::ShaftLight;
    use glam::{Vec2, Vec3};

    fn test_camera() -> Camera {
        Camera::new_perspective(
            Vec3::new(0.0, 2.0, 8.0),
            Vec3::ZERO,
            Vec3::Y,
            60.0,
            16.0 / 9.0,
            0.5,
            50.0,
        )
    }

    #[test]
    fn test_default_intensity_is_bound_at_construction() {
        let light = ShaftLight::default().into_shared();
        let binding = ShaftBinding::new(&light, &ShaftConfig::default()).unwrap();
        assert_eq!(
            binding.uniforms().get(UniformKey::Intensity),
            Some(UniformValue::Float(0.01))
        );
    }

    #[test]
    fn test_supplied_intensity_is_bound_at_construction() {
        let light = ShaftLight::default().into_shared();
        let config = ShaftConfig {
            intensity: 0.2,
            ..Default::default()
        };
        let binding = ShaftBinding::new(&light, &config).unwrap();
        assert_eq!(
            binding.uniforms().get(UniformKey::Intensity),
            Some(UniformValue::Float(0.2))
        );
    }

    #[test]
    fn test_refresh_binds_live_light_state() {
        // end to end: light at (0,5,0), white, intensity omitted
        let light = ShaftLight::aimed(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO).into_shared();
        let mut binding = ShaftBinding::new(&light, &ShaftConfig::default()).unwrap();

        binding.refresh(&test_camera()).unwrap();

        let uniforms = binding.uniforms();
        assert_eq!(
            uniforms.get(UniformKey::Intensity),
            Some(UniformValue::Float(0.01))
        );
        match uniforms.get(UniformKey::LightPos) {
            Some(UniformValue::Vec3(pos)) => {
                assert!((pos - Vec3::new(0.0, 5.0, 0.0)).length() < 0.0001);
            }
            other => panic!("unexpected LightPos: {:?}", other),
        }
        assert_eq!(
            uniforms.get(UniformKey::LightColor),
            Some(UniformValue::Vec3(Vec3::ONE))
        );
        assert_eq!(
            uniforms.get(UniformKey::CameraNearFar),
            Some(UniformValue::Vec2(Vec2::new(0.5, 50.0)))
        );
        assert!(uniforms.is_complete());
    }

    #[test]
    fn test_refresh_overwrites_previous_light_state() {
        let light = ShaftLight::aimed(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO).into_shared();
        let mut binding = ShaftBinding::new(&light, &ShaftConfig::default()).unwrap();
        let camera = test_camera();

        binding.refresh(&camera).unwrap();

        // external animation moves and tints the light
        {
            let mut state = light.write();
            state.aim(Vec3::new(3.0, 1.0, -2.0), Vec3::new(3.0, 0.0, 0.0));
            state.color = Vec3::new(1.0, 0.5, 0.25);
        }
        binding.refresh(&camera).unwrap();

        let uniforms = binding.uniforms();
        match uniforms.get(UniformKey::LightPos) {
            Some(UniformValue::Vec3(pos)) => {
                assert!((pos - Vec3::new(3.0, 1.0, -2.0)).length() < 0.0001);
            }
            other => panic!("unexpected LightPos: {:?}", other),
        }
        assert_eq!(
            uniforms.get(UniformKey::LightColor),
            Some(UniformValue::Vec3(Vec3::new(1.0, 0.5, 0.25)))
        );
        // lightPV must reflect the new transform only
        let expected_pv = light.read().view_projection().unwrap();
        assert_eq!(
            uniforms.get(UniformKey::LightPv),
            Some(UniformValue::Mat4(expected_pv))
        );
    }

    #[test]
    fn test_refresh_fails_after_light_drop() {
        let light = ShaftLight::default().into_shared();
        let mut binding = ShaftBinding::new(&light, &ShaftConfig::default()).unwrap();
        drop(light);
        assert!(matches!(
            binding.refresh(&test_camera()),
            Err(ShaftError::LightDropped)
        ));
    }

    #[test]
    fn test_refresh_fails_fast_on_singular_transform() {
        let light = ShaftLight::default().into_shared();
        light.write().transform = Mat4::ZERO;
        let mut binding = ShaftBinding::new(&light, &ShaftConfig::default()).unwrap();
        assert!(matches!(
            binding.refresh(&test_camera()),
            Err(ShaftError::SingularTransform)
        ));
        // the failed frame must not leave a stale lightPV behind
        assert_eq!(binding.uniforms().get(UniformKey::LightPv), None);
    }

    #[test]
    fn test_model_uniform_tracks_volume_transform() {
        let light = ShaftLight::default().into_shared();
        let mut binding = ShaftBinding::new(&light, &ShaftConfig::default()).unwrap();
        let placement = Mat4::from_scale_rotation_translation(
            Vec3::splat(4.0),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, 2.0, 0.0),
        );
        binding.set_transform(placement);
        binding.refresh(&test_camera()).unwrap();
        assert_eq!(
            binding.uniforms().get(UniformKey::Model),
            Some(UniformValue::Mat4(placement))
        );
    }
}
