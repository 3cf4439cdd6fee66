//! Viewing camera
//!
//! The camera whose frame is being rendered. The shaft effect only ever
//! reads it through [`FrameContext`](crate::effect::FrameContext); the
//! near/far pair feeds depth linearization in the scattering shader.

use glam::{Mat4, Vec2, Vec3};

/// Projection mode for a camera.
#[derive(Debug, Clone, Copy)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fov: f32,
        /// Aspect ratio (width / height).
        aspect: f32,
        /// Near clipping plane.
        near: f32,
        /// Far clipping plane.
        far: f32,
    },
    /// Orthographic projection.
    Orthographic {
        /// Width of the view.
        width: f32,
        /// Height of the view.
        height: f32,
        /// Near clipping plane.
        near: f32,
        /// Far clipping plane.
        far: f32,
    },
}

impl Projection {
    /// Create a perspective projection.
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::Perspective {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Create an orthographic projection.
    pub fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Self {
        Self::Orthographic {
            width,
            height,
            near,
            far,
        }
    }

    /// Get the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov, aspect, near, far),
            Projection::Orthographic {
                width,
                height,
                near,
                far,
            } => Mat4::orthographic_rh(
                -width / 2.0,
                width / 2.0,
                -height / 2.0,
                height / 2.0,
                near,
                far,
            ),
        }
    }

    /// Get the near clipping plane.
    pub fn near(&self) -> f32 {
        match *self {
            Projection::Perspective { near, .. } => near,
            Projection::Orthographic { near, .. } => near,
        }
    }

    /// Get the far clipping plane.
    pub fn far(&self) -> f32 {
        match *self {
            Projection::Perspective { far, .. } => far,
            Projection::Orthographic { far, .. } => far,
        }
    }

    /// Update the aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        if let Projection::Perspective { aspect: a, .. } = self {
            *a = aspect;
        }
    }
}

/// A 3D camera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Projection mode.
    pub projection: Projection,
}

impl Camera {
    /// Create a new perspective camera.
    pub fn new_perspective(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            projection: Projection::perspective(fov_degrees, aspect, near, far),
        }
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get the near/far planes of the current projection.
    pub fn near_far(&self) -> Vec2 {
        Vec2::new(self.projection.near(), self.projection.far())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_far_reads_projection() {
        let camera = Camera::new_perspective(
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            60.0,
            16.0 / 9.0,
            0.1,
            100.0,
        );
        assert_eq!(camera.near_far(), Vec2::new(0.1, 100.0));
    }

    #[test]
    fn test_view_projection_maps_target_inside_clip() {
        let camera = Camera::new_perspective(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            60.0,
            1.0,
            0.1,
            100.0,
        );
        let clip = camera.view_projection_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 0.0001);
        assert!(ndc.y.abs() < 0.0001);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
