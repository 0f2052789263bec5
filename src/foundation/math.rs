use rand::{Rng, RngCore};

use crate::foundation::core::Vec3;

/// Randomness source threaded through pool builds, physics and transitions.
///
/// Production scenes use the thread-local generator; tests inject a seeded `StdRng`.
pub type SceneRng = Box<dyn RngCore>;

/// Uniform sample in `[-spread / 2, spread / 2)`.
pub(crate) fn centered<R: Rng + ?Sized>(rng: &mut R, spread: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * spread
}

/// Per-axis [`centered`] sample inside a box with full extents `extents`.
pub(crate) fn centered_vec3<R: Rng + ?Sized>(rng: &mut R, extents: Vec3) -> Vec3 {
    Vec3::new(
        centered(rng, extents.x),
        centered(rng, extents.y),
        centered(rng, extents.z),
    )
}

/// Euler angles with every component in `[0, PI)`.
pub(crate) fn random_angles<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.random::<f32>() * std::f32::consts::PI,
        rng.random::<f32>() * std::f32::consts::PI,
        rng.random::<f32>() * std::f32::consts::PI,
    )
}

pub(crate) fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
