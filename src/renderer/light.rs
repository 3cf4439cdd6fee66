//! Shaft light source
//!
//! The light is plain data, owned and animated by the caller; its GPU-side
//! shadow map lives in [`crate::renderer::shadow`]. The effect never owns
//! the light - it holds a [`Weak`] handle and re-reads the live state every
//! frame.

use crate::error::ShaftError;
use glam::{Mat4, Vec2, Vec3};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// A shared, externally animated shaft light.
pub type SharedLight = Arc<RwLock<ShaftLight>>;

/// Non-owning handle to a shared light.
pub type LightHandle = Weak<RwLock<ShaftLight>>;

/// A spot-style light that casts volumetric shafts.
///
/// `fov`, `near`, and `far` describe the shadow projection; `transform` is
/// the light's world transform (light space to world space).
#[derive(Debug, Clone)]
pub struct ShaftLight {
    /// Light color (linear RGB).
    pub color: Vec3,
    /// Vertical field of view of the shadow projection, in radians.
    pub fov: f32,
    /// Near plane of the shadow projection.
    pub near: f32,
    /// Far plane of the shadow projection.
    pub far: f32,
    /// World transform of the light.
    pub transform: Mat4,
}

impl ShaftLight {
    /// Create a new light at the origin.
    pub fn new(color: Vec3, fov: f32, near: f32, far: f32) -> Self {
        Self {
            color,
            fov,
            near,
            far,
            transform: Mat4::IDENTITY,
        }
    }

    /// Create a white light at `position` aimed at `target`.
    pub fn aimed(position: Vec3, target: Vec3) -> Self {
        let mut light = Self::new(Vec3::ONE, std::f32::consts::FRAC_PI_4, 0.1, 20.0);
        light.aim(position, target);
        light
    }

    /// Place the light at `position`, aimed at `target`.
    pub fn aim(&mut self, position: Vec3, target: Vec3) {
        let dir = (target - position).normalize_or_zero();
        // look_at degenerates when the view direction is parallel to up
        let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        self.transform = Mat4::look_at_rh(position, target, up).inverse();
    }

    /// Wrap a light for sharing with an animation system.
    pub fn into_shared(self) -> SharedLight {
        Arc::new(RwLock::new(self))
    }

    /// World position, read from the translation of the global transform.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Near/far planes of the shadow projection.
    pub fn near_far(&self) -> Vec2 {
        Vec2::new(self.near, self.far)
    }

    /// Projection matrix of the shadow frustum (square aspect).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, 1.0, self.near, self.far)
    }

    /// World-to-light clip space transform: projection x transform^-1.
    ///
    /// Fails fast when the transform is singular instead of propagating a
    /// garbage inverse into the shadow lookup.
    pub fn view_projection(&self) -> Result<Mat4, ShaftError> {
        if self.transform.determinant().abs() < 1e-8 {
            return Err(ShaftError::SingularTransform);
        }
        Ok(self.projection_matrix() * self.transform.inverse())
    }
}

impl Default for ShaftLight {
    fn default() -> Self {
        Self::aimed(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_transform_translation() {
        let mut light = ShaftLight::new(Vec3::ONE, 1.0, 0.1, 10.0);
        light.transform = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(light.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aimed_places_light() {
        let light = ShaftLight::aimed(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        let pos = light.position();
        assert!((pos - Vec3::new(0.0, 5.0, 0.0)).length() < 0.0001);
    }

    #[test]
    fn test_view_projection_round_trip() {
        // lightPV * transform must recover the bare projection
        let light = ShaftLight::aimed(Vec3::new(2.0, 4.0, -1.0), Vec3::new(0.5, 0.0, 0.5));
        let pv = light.view_projection().unwrap();
        let round_trip = pv * light.transform;
        let projection = light.projection_matrix();
        for (a, b) in round_trip
            .to_cols_array()
            .iter()
            .zip(projection.to_cols_array().iter())
        {
            assert!((a - b).abs() < 0.0001);
        }
    }

    #[test]
    fn test_view_projection_rejects_singular_transform() {
        let mut light = ShaftLight::new(Vec3::ONE, 1.0, 0.1, 10.0);
        light.transform = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(matches!(
            light.view_projection(),
            Err(ShaftError::SingularTransform)
        ));
    }
}
