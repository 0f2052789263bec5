use rand::{Rng, RngCore};

use crate::animation::ease::Ease;
use crate::animation::tween::{Tween, stagger_delay};
use crate::foundation::core::{Vec2, Vec3};
use crate::foundation::math::centered;
use crate::scene::particle::Particle;
use crate::scene::pool::LayoutBounds;

/// Timings, curves and fit ratios of the settle and scatter transitions. Times are in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransitionParams {
    /// Share of the visible width the settled block may take.
    pub fit_width: f32,
    /// Share of the visible height the settled block may take.
    pub fit_height: f32,
    /// Upper bound of the settle scale factor.
    pub max_scale: f32,

    /// Letter flight to its layout slot.
    pub settle_duration: f32,
    /// Curve of the letter flight.
    pub settle_ease: Ease,
    /// Extra delay per particle index.
    pub settle_stagger: f32,
    /// Rotation reset length.
    pub settle_rotation_duration: f32,
    /// Rotation reset curve.
    pub settle_rotation_ease: Ease,
    /// Scale change length.
    pub settle_scale_duration: f32,
    /// Scale change curve.
    pub settle_scale_ease: Ease,

    /// Filler flight away from the camera.
    pub filler_exit_duration: f32,
    /// Curve of the filler flight.
    pub filler_exit_ease: Ease,
    /// Multiplier applied to filler x/y on exit.
    pub filler_exit_spread: f32,
    /// Filler z on exit.
    pub filler_exit_depth: f32,
    /// Filler fade-out length.
    pub filler_fade_duration: f32,
    /// Filler fade-out start.
    pub filler_fade_delay: f32,

    /// Full range of the scatter velocity.
    pub scatter_speed: f32,
    /// Full range of the scatter angular velocity.
    pub scatter_spin: f32,
    /// Letter flight off the layout.
    pub scatter_duration: f32,
    /// Curve of the scatter flight.
    pub scatter_ease: Ease,
    /// Full x/y range of scatter destinations.
    pub scatter_spread: f32,
    /// Nearest scatter destination z.
    pub scatter_depth: f32,
    /// Random z added on top of `scatter_depth`.
    pub scatter_depth_jitter: f32,
    /// Delay between scatter start and the next quote.
    pub reroll_delay: f32,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            fit_width: 0.85,
            fit_height: 0.55,
            max_scale: 1.8,

            settle_duration: 2.0,
            settle_ease: Ease::OutElastic {
                amplitude: 1.0,
                period: 0.7,
            },
            settle_stagger: 0.01,
            settle_rotation_duration: 1.5,
            settle_rotation_ease: Ease::OutCubic,
            settle_scale_duration: 1.5,
            settle_scale_ease: Ease::OutQuad,

            filler_exit_duration: 1.5,
            filler_exit_ease: Ease::InCubic,
            filler_exit_spread: 3.0,
            filler_exit_depth: 300.0,
            filler_fade_duration: 0.5,
            filler_fade_delay: 1.0,

            scatter_speed: 1.5,
            scatter_spin: 0.2,
            scatter_duration: 0.8,
            scatter_ease: Ease::InCubic,
            scatter_spread: 150.0,
            scatter_depth: 100.0,
            scatter_depth_jitter: 50.0,
            reroll_delay: 1.0,
        }
    }
}

/// Uniform scale that fits a block of `bounds` into `visible` (the extent of the z = 0 plane).
///
/// Always finite and in `(0, max_scale]` for positive bounds.
pub fn scale_factor(visible: Vec2, bounds: LayoutBounds, params: &TransitionParams) -> f32 {
    let sx = visible.x * params.fit_width / bounds.total_width;
    let sy = visible.y * params.fit_height / bounds.total_height;
    let s = sx.min(sy);
    if s.is_finite() && s > 0.0 {
        s.min(params.max_scale)
    } else {
        params.max_scale
    }
}

/// Pick the quote to show after `current`, uniformly among the other indices.
///
/// With zero or one quotes the result is 0. An out-of-range `current` allows every index.
pub fn pick_next_index(len: usize, current: usize, rng: &mut dyn RngCore) -> usize {
    if len <= 1 {
        return 0;
    }
    if current >= len {
        return rng.random_range(0..len);
    }
    let r = rng.random_range(0..len - 1);
    if r >= current { r + 1 } else { r }
}

/// Tweens driving one particle through a transition. Absent channels are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParticleTweens {
    /// Position channel.
    pub position: Option<Tween<Vec3>>,
    /// Rotation channel.
    pub rotation: Option<Tween<Vec3>>,
    /// Uniform scale channel.
    pub scale: Option<Tween<f32>>,
    /// Opacity channel.
    pub opacity: Option<Tween<f32>>,
}

impl ParticleTweens {
    fn end_time(&self) -> f32 {
        [
            self.position.map(|t| t.end_time()),
            self.rotation.map(|t| t.end_time()),
            self.scale.map(|t| t.end_time()),
            self.opacity.map(|t| t.end_time()),
        ]
        .into_iter()
        .flatten()
        .fold(0.0, f32::max)
    }

    fn apply(&self, p: &mut Particle, elapsed: f32) {
        if let Some(t) = &self.position {
            p.position = t.sample(elapsed);
        }
        if let Some(t) = &self.rotation {
            p.rotation = t.sample(elapsed);
        }
        if let Some(t) = &self.scale {
            p.scale = t.sample(elapsed);
        }
        if let Some(t) = &self.opacity {
            p.opacity = t.sample(elapsed).clamp(0.0, 1.0);
        }
    }
}

/// Per-particle tweens of one settle or scatter, indexed like the pool.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionPlan {
    tweens: Vec<ParticleTweens>,
    end_time: f32,
}

impl TransitionPlan {
    fn from_tweens(tweens: Vec<ParticleTweens>) -> Self {
        let end_time = tweens.iter().map(ParticleTweens::end_time).fold(0.0, f32::max);
        Self { tweens, end_time }
    }

    /// Seconds after which every tween has completed.
    pub fn end_time(&self) -> f32 {
        self.end_time
    }

    /// Return `true` once `elapsed` covers every tween.
    pub fn is_done(&self, elapsed: f32) -> bool {
        elapsed >= self.end_time
    }

    /// Tweens of the particle at `index`.
    pub fn get(&self, index: usize) -> Option<&ParticleTweens> {
        self.tweens.get(index)
    }

    /// Write every sampled channel into `particles` at `elapsed` seconds.
    pub fn apply(&self, particles: &mut [Particle], elapsed: f32) {
        for (p, t) in particles.iter_mut().zip(&self.tweens) {
            t.apply(p, elapsed);
        }
    }

    /// Put every channel on its end value.
    pub fn finish(&self, particles: &mut [Particle]) {
        self.apply(particles, f32::INFINITY);
    }
}

/// Freeze every particle and plan the settle into the layout scaled by `scale`.
///
/// Letters fly to their slots with a per-index stagger, reset rotation and take the fit scale;
/// fillers fly outward and away from the camera and fade out.
pub fn settle_plan(
    particles: &mut [Particle],
    scale: f32,
    params: &TransitionParams,
) -> TransitionPlan {
    let tweens = particles
        .iter_mut()
        .enumerate()
        .map(|(i, p)| {
            p.velocity = Vec3::ZERO;
            p.angular_velocity = Vec3::ZERO;
            match p.target {
                Some(target) => ParticleTweens {
                    position: Some(
                        Tween::new(
                            p.position,
                            (target.position * scale).extend(0.0),
                            params.settle_duration,
                            params.settle_ease,
                        )
                        .delayed(stagger_delay(i, params.settle_stagger)),
                    ),
                    rotation: Some(Tween::new(
                        p.rotation,
                        Vec3::ZERO,
                        params.settle_rotation_duration,
                        params.settle_rotation_ease,
                    )),
                    scale: Some(Tween::new(
                        p.scale,
                        scale * target.scale,
                        params.settle_scale_duration,
                        params.settle_scale_ease,
                    )),
                    opacity: None,
                },
                None => {
                    let exit = Vec3::new(
                        p.position.x * params.filler_exit_spread,
                        p.position.y * params.filler_exit_spread,
                        params.filler_exit_depth,
                    );
                    ParticleTweens {
                        position: Some(Tween::new(
                            p.position,
                            exit,
                            params.filler_exit_duration,
                            params.filler_exit_ease,
                        )),
                        rotation: None,
                        scale: None,
                        opacity: Some(
                            Tween::new(
                                p.opacity,
                                0.0,
                                params.filler_fade_duration,
                                Ease::OutQuad,
                            )
                            .delayed(params.filler_fade_delay),
                        ),
                    }
                }
            }
        })
        .collect();
    TransitionPlan::from_tweens(tweens)
}

/// Kick every letter with a random velocity and plan its flight toward the camera.
///
/// Fillers are left where the settle sent them.
pub fn scatter_plan(
    particles: &mut [Particle],
    params: &TransitionParams,
    rng: &mut dyn RngCore,
) -> TransitionPlan {
    let tweens = particles
        .iter_mut()
        .map(|p| {
            if !p.is_target() {
                return ParticleTweens::default();
            }
            p.velocity = Vec3::new(
                centered(rng, params.scatter_speed),
                centered(rng, params.scatter_speed),
                centered(rng, params.scatter_speed),
            );
            p.angular_velocity = Vec3::new(
                centered(rng, params.scatter_spin),
                centered(rng, params.scatter_spin),
                centered(rng, params.scatter_spin),
            );
            let dest = Vec3::new(
                centered(rng, params.scatter_spread),
                centered(rng, params.scatter_spread),
                params.scatter_depth + rng.random::<f32>() * params.scatter_depth_jitter,
            );
            ParticleTweens {
                position: Some(Tween::new(
                    p.position,
                    dest,
                    params.scatter_duration,
                    params.scatter_ease,
                )),
                ..ParticleTweens::default()
            }
        })
        .collect();
    TransitionPlan::from_tweens(tweens)
}

#[cfg(test)]
#[path = "../../tests/unit/session/transition.rs"]
mod tests;
