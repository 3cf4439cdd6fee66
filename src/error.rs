//! Crate error type

use crate::effect::{UniformKey, UniformKind};
use thiserror::Error;

/// Errors reported by the light shaft effect.
#[derive(Debug, Error)]
pub enum ShaftError {
    /// The shared light was dropped while the effect still references it.
    #[error("shaft light was dropped while the effect is still alive")]
    LightDropped,

    /// The light's world transform has no inverse, so the world-to-light
    /// clip transform cannot be computed for this frame.
    #[error("light transform is singular and cannot be inverted")]
    SingularTransform,

    /// A uniform was supplied with a value of the wrong kind.
    #[error("uniform {key:?} expects {expected:?}, got {got:?}")]
    UniformTypeMismatch {
        key: UniformKey,
        expected: UniformKind,
        got: UniformKind,
    },

    /// A uniform referenced by the shader has no bound value.
    #[error("uniform {0:?} has no bound value")]
    UniformUnset(UniformKey),

    /// The deferred depth input was never attached.
    #[error("no deferred depth target bound; call set_deferred_target first")]
    DeferredTargetMissing,

    /// A draw was issued before the first frame update.
    #[error("draw issued before the first frame update")]
    NotUpdated,
}
