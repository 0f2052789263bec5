/// Spring grid behind the particles.
pub mod backdrop;
/// Perspective camera and pointer picking.
pub mod camera;
/// Particle state.
pub mod particle;
/// Particle and texture ownership.
pub mod pool;
