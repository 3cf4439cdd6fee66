//! Per-frame effect composition
//!
//! Effects recompute their shader inputs every frame through [`FrameHook`],
//! dispatched in registration order by the render loop strictly before any
//! draw call. The light shaft entity implements the hook; [`FnHook`] adapts
//! plain closures for effects small enough not to need a type.

mod light_shaft;
mod material;
mod noise;
mod uniforms;

pub use light_shaft::{LightShaft, ShaftBinding, ShaftConfig};
pub use material::ShaftMaterial;
pub use uniforms::{
    ShaftUniformRaw, UniformBlock, UniformKey, UniformKind, UniformValue, UNIFORM_KEYS,
};

use crate::error::ShaftError;
use crate::renderer::viewer::Camera;

/// Context passed to every frame hook: the camera of the current draw.
pub struct FrameContext<'a> {
    /// The viewing camera for this frame.
    pub camera: &'a Camera,
}

/// A per-frame update hook, invoked once per render before the draw call.
pub trait FrameHook {
    /// Recompute per-frame state from live dependencies.
    fn on_frame(&mut self, frame: &FrameContext<'_>) -> Result<(), ShaftError>;
}

/// Closure adapter implementing [`FrameHook`].
pub struct FnHook<F>(pub F);

impl<F> FrameHook for FnHook<F>
where
    F: FnMut(&FrameContext<'_>) -> Result<(), ShaftError>,
{
    fn on_frame(&mut self, frame: &FrameContext<'_>) -> Result<(), ShaftError> {
        (self.0)(frame)
    }
}

/// Run hooks in registration order.
///
/// The first failing hook stops the dispatch; its error is logged here and
/// returned so the caller can skip the affected draws for this frame.
pub fn run_frame_hooks(
    hooks: &mut [&mut dyn FrameHook],
    frame: &FrameContext<'_>,
) -> Result<(), ShaftError> {
    for (index, hook) in hooks.iter_mut().enumerate() {
        if let Err(error) = hook.on_frame(frame) {
            tracing::error!("frame hook {} failed: {}", index, error);
            return Err(error);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_camera() -> Camera {
        Camera::new_perspective(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y, 60.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let first_order = Rc::clone(&order);
        let mut first = FnHook(move |_: &FrameContext<'_>| {
            first_order.borrow_mut().push(1);
            Ok(())
        });
        let second_order = Rc::clone(&order);
        let mut second = FnHook(move |_: &FrameContext<'_>| {
            second_order.borrow_mut().push(2);
            Ok(())
        });

        let camera = test_camera();
        run_frame_hooks(
            &mut [&mut first, &mut second],
            &FrameContext { camera: &camera },
        )
        .unwrap();

        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_failing_hook_stops_dispatch() {
        let ran = Rc::new(RefCell::new(false));

        let mut failing =
            FnHook(|_: &FrameContext<'_>| Err(ShaftError::DeferredTargetMissing));
        let ran_flag = Rc::clone(&ran);
        let mut after = FnHook(move |_: &FrameContext<'_>| {
            *ran_flag.borrow_mut() = true;
            Ok(())
        });

        let camera = test_camera();
        let result = run_frame_hooks(
            &mut [&mut failing, &mut after],
            &FrameContext { camera: &camera },
        );

        assert!(matches!(result, Err(ShaftError::DeferredTargetMissing)));
        assert!(!*ran.borrow());
    }
}
