//! Easing curves for normalized progress.
//!
//! The free functions evaluate the formula as written, so `ease_out_back` and `genie_easing`
//! overshoot past `1` inside the interval. [`Ease::apply`] clamps its input first.

/// Weight of the exponential curve in [`genie_easing`]; the rest goes to back-out.
pub const GENIE_EXPO_WEIGHT: f64 = 0.8;

const BACK_C1: f64 = 1.70158;
const BACK_C3: f64 = BACK_C1 + 1.0;

/// Easing functions used to map normalized animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Quintic ease-out.
    OutQuint,
    /// Exponential ease-out.
    OutExpo,
    /// Back ease-out (overshoots).
    OutBack,
    /// Exponential/back blend used by the CSS transform driver.
    Genie,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutCubic => ease_in_out_cubic(t),
            Self::OutQuint => ease_out_quint(t),
            Self::OutExpo => ease_out_expo(t),
            Self::OutBack => ease_out_back(t),
            Self::Genie => genie_easing(t),
        }
    }
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn ease_out_quint(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(5)
}

pub fn ease_out_expo(t: f64) -> f64 {
    if t == 1.0 {
        return 1.0;
    }
    1.0 - 2f64.powf(-10.0 * t)
}

pub fn ease_out_back(t: f64) -> f64 {
    let u = t - 1.0;
    1.0 + BACK_C3 * u.powi(3) + BACK_C1 * u.powi(2)
}

/// 80% exponential-out plus 20% back-out: fast approach with a slight pop at the end.
pub fn genie_easing(t: f64) -> f64 {
    GENIE_EXPO_WEIGHT * ease_out_expo(t) + (1.0 - GENIE_EXPO_WEIGHT) * ease_out_back(t)
}

/// Linear interpolation between `start` and `end`.
pub fn interpolate(start: f64, end: f64, progress: f64) -> f64 {
    start + (end - start) * progress
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
