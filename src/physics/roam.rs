use rand::RngCore;

use crate::foundation::core::Vec3;
use crate::foundation::math::{centered, centered_vec3};
use crate::scene::particle::Particle;

/// Constants of the free-roam step. Velocities are per tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RoamParams {
    /// Centers closer than this collide.
    pub collision_radius: f32,
    /// Velocity impulse along the contact normal per collision.
    pub collision_impulse: f32,
    /// Full range of the random spin kick per collision.
    pub collision_spin: f32,
    /// Half extents of the roaming box; crossing a face reverses that velocity component.
    pub bounds: Vec3,
    /// Pointer influence radius on the z = 0 plane.
    pub repel_radius: f32,
    /// Push at zero distance from the pointer.
    pub repel_strength: f32,
    /// Z spin added at zero distance from the pointer.
    pub repel_spin: f32,
    /// Velocity multiplier per tick.
    pub damping: f32,
    /// Below this speed particles receive jitter.
    pub min_speed: f32,
    /// Full range of the x/y jitter.
    pub jitter: f32,
}

impl Default for RoamParams {
    fn default() -> Self {
        Self {
            collision_radius: 4.0,
            collision_impulse: 0.05,
            collision_spin: 0.02,
            bounds: Vec3::new(110.0, 70.0, 60.0),
            repel_radius: 35.0,
            repel_strength: 0.05,
            repel_spin: 0.01,
            damping: 0.995,
            min_speed: 0.05,
            jitter: 0.01,
        }
    }
}

/// Advance every particle by one tick of free roaming.
///
/// Order per tick: pairwise collision impulses, integration, wall bounce, pointer repulsion,
/// damping and low-speed jitter. `pointer` is the pointer ray's hit on the z = 0 plane.
///
/// Collision detection compares every pair, which is fine up to a few hundred particles and is
/// the known scaling limit of the step.
pub fn step(
    particles: &mut [Particle],
    pointer: Option<Vec3>,
    params: &RoamParams,
    rng: &mut dyn RngCore,
) {
    collide(particles, params, rng);
    for p in particles.iter_mut() {
        integrate(p, pointer, params, rng);
    }
}

fn collide(particles: &mut [Particle], params: &RoamParams, rng: &mut dyn RngCore) {
    let r2 = params.collision_radius * params.collision_radius;
    for i in 0..particles.len() {
        let (head, tail) = particles.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let delta = a.position - b.position;
            if delta.length_squared() >= r2 {
                continue;
            }
            let normal = delta
                .try_normalize()
                .unwrap_or_else(|| random_direction(rng));
            a.velocity += normal * params.collision_impulse;
            b.velocity -= normal * params.collision_impulse;
            a.angular_velocity.x += centered(rng, params.collision_spin);
            b.angular_velocity.y += centered(rng, params.collision_spin);
        }
    }
}

fn random_direction(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = centered_vec3(rng, Vec3::splat(2.0));
        let len2 = v.length_squared();
        if len2 > 1e-6 && len2 <= 1.0 {
            return v / len2.sqrt();
        }
    }
}

fn integrate(p: &mut Particle, pointer: Option<Vec3>, params: &RoamParams, rng: &mut dyn RngCore) {
    p.position += p.velocity;
    p.rotation += p.angular_velocity;

    let outside = p.position.abs().cmpgt(params.bounds);
    if outside.test(0) {
        p.velocity.x = -p.velocity.x;
    }
    if outside.test(1) {
        p.velocity.y = -p.velocity.y;
    }
    if outside.test(2) {
        p.velocity.z = -p.velocity.z;
    }

    if let Some(target) = pointer {
        let away = p.position - target;
        let d = away.length();
        if d < params.repel_radius {
            let force = (params.repel_radius - d) / params.repel_radius;
            if let Some(dir) = away.try_normalize() {
                p.velocity += dir * force * params.repel_strength;
            }
            p.angular_velocity.z += force * params.repel_spin;
        }
    }

    p.velocity *= params.damping;
    if p.velocity.length() < params.min_speed {
        p.velocity.x += centered(rng, params.jitter);
        p.velocity.y += centered(rng, params.jitter);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/roam.rs"]
mod tests;
