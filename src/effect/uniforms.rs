//! Shaft uniform schema
//!
//! The binding code and the WGSL shader agree on one typed schema: every
//! uniform the shader reads is a [`UniformKey`] with a fixed [`UniformKind`],
//! and [`UniformBlock`] refuses values of the wrong kind. `pack` produces the
//! Pod struct whose layout mirrors the `ShaftUniforms` struct in
//! `shaders/light_shaft.wgsl` field for field; wgpu validates the layout
//! against the shader when the pipeline is created.

use crate::error::ShaftError;
use glam::{Mat4, Vec2, Vec3};

/// Uniform slots of the shaft shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKey {
    /// Viewing camera view-projection matrix.
    CameraPv,
    /// Model matrix of the bounding volume.
    Model,
    /// World-to-light clip space transform.
    LightPv,
    /// Light world position.
    LightPos,
    /// Vertical field of view of the light's shadow projection (radians).
    LightFov,
    /// Light color (linear RGB).
    LightColor,
    /// Scattering strength; set once at construction.
    Intensity,
    /// Near/far planes of the light's shadow projection.
    LightNearFar,
    /// Near/far planes of the viewing camera.
    CameraNearFar,
    /// Viewing camera world position.
    CameraPos,
}

/// All keys, in packing order.
pub const UNIFORM_KEYS: [UniformKey; 10] = [
    UniformKey::CameraPv,
    UniformKey::Model,
    UniformKey::LightPv,
    UniformKey::LightPos,
    UniformKey::LightFov,
    UniformKey::LightColor,
    UniformKey::Intensity,
    UniformKey::LightNearFar,
    UniformKey::CameraNearFar,
    UniformKey::CameraPos,
];

/// Value kind of a uniform slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Mat4,
}

impl UniformKey {
    /// The value kind this slot accepts.
    pub const fn kind(self) -> UniformKind {
        match self {
            UniformKey::CameraPv | UniformKey::Model | UniformKey::LightPv => UniformKind::Mat4,
            UniformKey::LightPos | UniformKey::LightColor | UniformKey::CameraPos => {
                UniformKind::Vec3
            }
            UniformKey::LightFov | UniformKey::Intensity => UniformKind::Float,
            UniformKey::LightNearFar | UniformKey::CameraNearFar => UniformKind::Vec2,
        }
    }

    /// Field name in the WGSL uniform struct.
    pub const fn name(self) -> &'static str {
        match self {
            UniformKey::CameraPv => "camera_pv",
            UniformKey::Model => "model",
            UniformKey::LightPv => "light_pv",
            UniformKey::LightPos => "light_pos",
            UniformKey::LightFov => "light_fov",
            UniformKey::LightColor => "light_color",
            UniformKey::Intensity => "intensity",
            UniformKey::LightNearFar => "light_near_far",
            UniformKey::CameraNearFar => "camera_near_far",
            UniformKey::CameraPos => "camera_pos",
        }
    }
}

/// A typed uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl UniformValue {
    /// The kind of this value.
    pub const fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

/// GPU layout of the uniform table, matching `ShaftUniforms` in WGSL.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaftUniformRaw {
    pub camera_pv: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub light_pv: [[f32; 4]; 4],
    pub light_pos: [f32; 3],
    pub light_fov: f32,
    pub light_color: [f32; 3],
    pub intensity: f32,
    pub light_near_far: [f32; 2],
    pub camera_near_far: [f32; 2],
    pub camera_pos: [f32; 3],
    pub _pad: f32,
}

/// The uniform table of the shaft material.
///
/// Keys are overwritten wholesale each frame by the update hook; `Intensity`
/// is written once at construction and persists. Every key must hold a value
/// before the table can be packed for a draw.
#[derive(Debug, Clone, Default)]
pub struct UniformBlock {
    values: [Option<UniformValue>; UNIFORM_KEYS.len()],
}

impl UniformBlock {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `key`, replacing any previous value.
    pub fn set(
        &mut self,
        key: UniformKey,
        value: impl Into<UniformValue>,
    ) -> Result<(), ShaftError> {
        let value = value.into();
        if value.kind() != key.kind() {
            return Err(ShaftError::UniformTypeMismatch {
                key,
                expected: key.kind(),
                got: value.kind(),
            });
        }
        self.values[key as usize] = Some(value);
        Ok(())
    }

    /// Get the value bound to `key`, if any.
    pub fn get(&self, key: UniformKey) -> Option<UniformValue> {
        self.values[key as usize]
    }

    /// The first key with no bound value, if any.
    pub fn first_unset(&self) -> Option<UniformKey> {
        UNIFORM_KEYS
            .iter()
            .copied()
            .find(|key| self.values[*key as usize].is_none())
    }

    /// Whether every key holds a value.
    pub fn is_complete(&self) -> bool {
        self.first_unset().is_none()
    }

    fn float(&self, key: UniformKey) -> Result<f32, ShaftError> {
        match self.get(key) {
            Some(UniformValue::Float(v)) => Ok(v),
            Some(other) => Err(ShaftError::UniformTypeMismatch {
                key,
                expected: key.kind(),
                got: other.kind(),
            }),
            None => Err(ShaftError::UniformUnset(key)),
        }
    }

    fn vec2(&self, key: UniformKey) -> Result<[f32; 2], ShaftError> {
        match self.get(key) {
            Some(UniformValue::Vec2(v)) => Ok(v.to_array()),
            Some(other) => Err(ShaftError::UniformTypeMismatch {
                key,
                expected: key.kind(),
                got: other.kind(),
            }),
            None => Err(ShaftError::UniformUnset(key)),
        }
    }

    fn vec3(&self, key: UniformKey) -> Result<[f32; 3], ShaftError> {
        match self.get(key) {
            Some(UniformValue::Vec3(v)) => Ok(v.to_array()),
            Some(other) => Err(ShaftError::UniformTypeMismatch {
                key,
                expected: key.kind(),
                got: other.kind(),
            }),
            None => Err(ShaftError::UniformUnset(key)),
        }
    }

    fn mat4(&self, key: UniformKey) -> Result<[[f32; 4]; 4], ShaftError> {
        match self.get(key) {
            Some(UniformValue::Mat4(v)) => Ok(v.to_cols_array_2d()),
            Some(other) => Err(ShaftError::UniformTypeMismatch {
                key,
                expected: key.kind(),
                got: other.kind(),
            }),
            None => Err(ShaftError::UniformUnset(key)),
        }
    }

    /// Pack the table into its GPU layout. Fails on the first unbound key.
    pub fn pack(&self) -> Result<ShaftUniformRaw, ShaftError> {
        Ok(ShaftUniformRaw {
            camera_pv: self.mat4(UniformKey::CameraPv)?,
            model: self.mat4(UniformKey::Model)?,
            light_pv: self.mat4(UniformKey::LightPv)?,
            light_pos: self.vec3(UniformKey::LightPos)?,
            light_fov: self.float(UniformKey::LightFov)?,
            light_color: self.vec3(UniformKey::LightColor)?,
            intensity: self.float(UniformKey::Intensity)?,
            light_near_far: self.vec2(UniformKey::LightNearFar)?,
            camera_near_far: self.vec2(UniformKey::CameraNearFar)?,
            camera_pos: self.vec3(UniformKey::CameraPos)?,
            _pad: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_block() -> UniformBlock {
        let mut block = UniformBlock::new();
        for key in UNIFORM_KEYS {
            let value: UniformValue = match key.kind() {
                UniformKind::Float => UniformValue::Float(1.0),
                UniformKind::Vec2 => UniformValue::Vec2(Vec2::ONE),
                UniformKind::Vec3 => UniformValue::Vec3(Vec3::ONE),
                UniformKind::Mat4 => UniformValue::Mat4(Mat4::IDENTITY),
            };
            block.set(key, value).unwrap();
        }
        block
    }

    #[test]
    fn test_set_and_get() {
        let mut block = UniformBlock::new();
        block.set(UniformKey::Intensity, 0.5_f32).unwrap();
        assert_eq!(
            block.get(UniformKey::Intensity),
            Some(UniformValue::Float(0.5))
        );
        assert_eq!(block.get(UniformKey::LightPos), None);
    }

    #[test]
    fn test_set_overwrites_not_merges() {
        let mut block = UniformBlock::new();
        block
            .set(UniformKey::LightPos, Vec3::new(1.0, 2.0, 3.0))
            .unwrap();
        block
            .set(UniformKey::LightPos, Vec3::new(4.0, 5.0, 6.0))
            .unwrap();
        assert_eq!(
            block.get(UniformKey::LightPos),
            Some(UniformValue::Vec3(Vec3::new(4.0, 5.0, 6.0)))
        );
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let mut block = UniformBlock::new();
        let result = block.set(UniformKey::LightPos, 1.0_f32);
        assert!(matches!(
            result,
            Err(ShaftError::UniformTypeMismatch {
                key: UniformKey::LightPos,
                expected: UniformKind::Vec3,
                got: UniformKind::Float,
            })
        ));
        assert_eq!(block.get(UniformKey::LightPos), None);
    }

    #[test]
    fn test_completeness_tracking() {
        let mut block = UniformBlock::new();
        assert!(!block.is_complete());
        assert_eq!(block.first_unset(), Some(UniformKey::CameraPv));

        let block = filled_block();
        assert!(block.is_complete());
        assert_eq!(block.first_unset(), None);
    }

    #[test]
    fn test_pack_fails_on_unbound_key() {
        let mut block = filled_block();
        block.values[UniformKey::LightColor as usize] = None;
        assert!(matches!(
            block.pack(),
            Err(ShaftError::UniformUnset(UniformKey::LightColor))
        ));
    }

    #[test]
    fn test_pack_layout_matches_wgsl_struct() {
        // three mat4 + four 16-byte rows
        assert_eq!(std::mem::size_of::<ShaftUniformRaw>(), 256);

        let mut block = filled_block();
        block
            .set(UniformKey::LightPos, Vec3::new(7.0, 8.0, 9.0))
            .unwrap();
        block.set(UniformKey::Intensity, 0.25_f32).unwrap();
        let raw = block.pack().unwrap();
        assert_eq!(raw.light_pos, [7.0, 8.0, 9.0]);
        assert_eq!(raw.intensity, 0.25);
        assert_eq!(raw._pad, 0.0);
    }
}
