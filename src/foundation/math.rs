use crate::foundation::core::{Point, Vec2};

/// Threshold below which lengths, sizes and divisors count as zero.
pub(crate) const EPSILON: f64 = 0.0001;

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub(crate) fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Clamp that tolerates `min > max` (returns `min` for values below it, then `max`).
///
/// `f64::clamp` panics on inverted bounds, which degenerate boxes can produce.
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

pub(crate) fn clamp01(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Unit vector, or zero when the input is shorter than [`EPSILON`].
pub(crate) fn normalize(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len < EPSILON {
        return Vec2::ZERO;
    }
    v / len
}

/// `value / divisor`, guarded for degenerate sizes.
///
/// A near-zero divisor yields `1`; a near-zero value yields [`EPSILON`], never `0`.
pub(crate) fn safe_divide(value: f64, divisor: f64) -> f64 {
    if divisor.abs() < EPSILON {
        return 1.0;
    }
    if value.abs() < EPSILON {
        return EPSILON;
    }
    value / divisor
}

pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Format a path coordinate with at most three decimals and no trailing zeros.
pub(crate) fn fmt_coord(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    format!("{rounded}")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
