use crate::animation::ease::Ease;
use crate::foundation::core::Vec3;
use crate::foundation::math::lerp_f32;

/// Values that can be blended by a [`Tween`].
pub trait Lerp: Copy {
    /// Blend from `self` toward `to` by `t` (not clamped; elastic curves pass `t > 1`).
    fn lerp_to(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        lerp_f32(self, to, t)
    }
}

impl Lerp for Vec3 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// One eased interpolation from `from` to `to`, timed in seconds relative to the start of the
/// transition that owns it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<T> {
    /// Value before the tween starts.
    pub from: T,
    /// Value once the tween completes.
    pub to: T,
    /// Seconds to wait before interpolation starts.
    pub delay: f32,
    /// Interpolation length in seconds.
    pub duration: f32,
    /// Curve applied to normalized progress.
    pub ease: Ease,
}

impl<T: Lerp> Tween<T> {
    /// Build a tween with no delay.
    pub fn new(from: T, to: T, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            delay: 0.0,
            duration,
            ease,
        }
    }

    /// Return this tween with its start delayed by `secs`.
    pub fn delayed(mut self, secs: f32) -> Self {
        self.delay = secs.max(0.0);
        self
    }

    /// Time at which the tween reaches `to`.
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration.max(0.0)
    }

    /// Return `true` once `elapsed` has passed [`Tween::end_time`].
    pub fn is_done(&self, elapsed: f32) -> bool {
        elapsed >= self.end_time()
    }

    /// Sample the tween `elapsed` seconds after the owning transition started.
    pub fn sample(&self, elapsed: f32) -> T {
        let local = elapsed - self.delay;
        if local <= 0.0 {
            return self.from;
        }
        if self.duration <= 0.0 || local >= self.duration {
            return self.to;
        }
        let p = self.ease.apply(f64::from(local / self.duration)) as f32;
        self.from.lerp_to(self.to, p)
    }
}

/// Offset `i`-th of a staggered group: `i * step` seconds.
pub fn stagger_delay(index: usize, step: f32) -> f32 {
    index as f32 * step
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
