/// Easing functions used to map normalized animation progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Damped sine ease-out that overshoots the target and rings into it.
    ///
    /// `amplitude` below 1 is treated as 1. `period` is the oscillation period in normalized
    /// progress units.
    OutElastic {
        /// Peak overshoot multiplier.
        amplitude: f64,
        /// Oscillation period.
        period: f64,
    },
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    ///
    /// Every curve maps 0 to 0 and 1 to 1; only [`Ease::OutElastic`] leaves `[0, 1]` in between.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutElastic { amplitude, period } => {
                if t >= 1.0 {
                    return 1.0;
                }
                let a = amplitude.max(1.0);
                let p = if period > 0.0 { period } else { 0.3 };
                let shift = p / std::f64::consts::TAU * (1.0 / a).asin();
                a * 2f64.powf(-10.0 * t) * ((t - shift) * std::f64::consts::TAU / p).sin() + 1.0
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
