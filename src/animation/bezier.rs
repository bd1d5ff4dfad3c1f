//! CSS `cubic-bezier(x1, y1, x2, y2)` timing functions.

const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const SUBDIVISION_PRECISION: f64 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;

/// Cubic Bezier timing curve anchored at `(0, 0)` and `(1, 1)`.
///
/// Polynomial coefficients are precomputed once; [`CubicBezier::solve`] is then allocation-free.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl CubicBezier {
    /// Build a curve from the two inner control points, in CSS order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    /// Build from `[x1, y1, x2, y2]`.
    pub fn from_points(points: [f64; 4]) -> Self {
        Self::new(points[0], points[1], points[2], points[3])
    }

    /// Map a time fraction to an eased fraction. `x <= 0` gives `0`, `x >= 1` gives `1`.
    pub fn solve(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        self.sample_y(self.solve_curve_x(x))
    }

    fn sample_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn sample_derivative_x(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    fn solve_curve_x(&self, x: f64) -> f64 {
        let mut t2 = x;
        for _ in 0..NEWTON_ITERATIONS {
            let x2 = self.sample_x(t2) - x;
            let d2 = self.sample_derivative_x(t2);
            if d2.abs() < NEWTON_MIN_SLOPE {
                break;
            }
            t2 -= x2 / d2;
        }

        // Bisection refines whatever Newton left, including a flat-slope bailout.
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t2 = t2.clamp(0.0, 1.0);
        let mut i = 0;
        while i < SUBDIVISION_MAX_ITERATIONS
            && (self.sample_x(t2) - x).abs() > SUBDIVISION_PRECISION
        {
            if self.sample_x(t2) > x {
                t1 = t2;
            } else {
                t0 = t2;
            }
            t2 = (t1 + t0) / 2.0;
            i += 1;
        }
        t2
    }
}

/// Default playback curve: quick start, long soft landing.
pub const GENIE_TIMING_POINTS: [f64; 4] = [0.23, 1.0, 0.32, 1.0];

pub fn genie_timing() -> CubicBezier {
    CubicBezier::from_points(GENIE_TIMING_POINTS)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/bezier.rs"]
mod tests;
