use crate::animation::bezier::{CubicBezier, GENIE_TIMING_POINTS};
use crate::capture::sanitize_pixel_ratio;
use crate::foundation::core::{Point, Rect, Size, Vec2};
use crate::foundation::error::{GenieError, GenieResult};
use crate::geometry::metrics::GenieMetrics;

/// Which way a transition runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Open,
    Close,
}

impl Direction {
    /// Map eased timeline to progress: opening runs `0 -> 1`, closing the complement.
    pub fn progress(self, eased: f64) -> f64 {
        match self {
            Self::Open => eased,
            Self::Close => 1.0 - eased,
        }
    }
}

/// Mesh-warp tuning, merged over defaults when deserialised.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlParams {
    pub duration_ms: f64,
    pub rows: u32,
    pub cols: u32,
    /// Minimum neck width in CSS pixels.
    pub neck_min: f64,
    /// Maximum neck width as a fraction of the smaller content side.
    pub neck_max_ratio: f64,
    /// Bend strength as a fraction of the content height.
    pub curve_strength_ratio: f64,
    pub release_range: [f64; 2],
    /// `cubic-bezier` control points for the playback timeline.
    pub easing: [f64; 4],
}

impl Default for GlParams {
    fn default() -> Self {
        Self {
            duration_ms: 720.0,
            rows: 72,
            cols: 24,
            neck_min: 6.0,
            neck_max_ratio: 0.42,
            curve_strength_ratio: 0.16,
            release_range: [0.12, 0.95],
            easing: GENIE_TIMING_POINTS,
        }
    }
}

impl GlParams {
    pub fn validate(&self) -> GenieResult<()> {
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(GenieError::validation(
                "gl.duration_ms must be finite and >= 0",
            ));
        }
        for (name, v) in [
            ("gl.neck_min", self.neck_min),
            ("gl.neck_max_ratio", self.neck_max_ratio),
            ("gl.curve_strength_ratio", self.curve_strength_ratio),
        ] {
            if !v.is_finite() {
                return Err(GenieError::validation(format!("{name} must be finite")));
            }
        }
        let [lo, hi] = self.release_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(GenieError::validation(
                "gl.release_range must be finite with start < end",
            ));
        }
        let [x1, _, x2, _] = self.easing;
        if !self.easing.iter().all(|v| v.is_finite())
            || !(0.0..=1.0).contains(&x1)
            || !(0.0..=1.0).contains(&x2)
        {
            return Err(GenieError::validation(
                "gl.easing x control points must lie in [0, 1]",
            ));
        }
        Ok(())
    }

    pub fn timing(&self) -> CubicBezier {
        CubicBezier::from_points(self.easing)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Neck {
    pub min: f64,
    pub max: f64,
}

/// Everything one playback needs, in device pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeniePlayOptions {
    pub duration_ms: f64,
    pub direction: Direction,
    pub origin_local: Point,
    pub size: Size,
    pub direction_vec: Vec2,
    pub neck: Neck,
    pub curve_strength: f64,
    pub cols: u32,
    pub rows: u32,
    pub release_range: [f64; 2],
    pub easing: [f64; 4],
}

/// Derive playback options from metrics and the freshly measured content rect.
///
/// Mesh density grows with the content: at least one column per 48 CSS px and one row per
/// 10 CSS px.
pub fn build_play_options(
    metrics: &GenieMetrics,
    rect: Rect,
    direction: Direction,
    params: &GlParams,
    pixel_ratio: f64,
) -> GeniePlayOptions {
    let pr = sanitize_pixel_ratio(pixel_ratio);
    let width = rect.width.max(1.0);
    let height = rect.height.max(1.0);
    let size = Size::new(
        (width * pr).round().max(1.0) as u32,
        (height * pr).round().max(1.0) as u32,
    );

    let min_dim = width.min(height).max(1.0);
    let neck_min = params.neck_min.max(1.0) * pr;
    let neck_max = neck_min.max(min_dim * params.neck_max_ratio * pr);
    let curve_strength = (height * params.curve_strength_ratio * pr).max(0.0);
    let cols = params.cols.max((width / 48.0).ceil() as u32).max(1);
    let rows = params.rows.max((height / 10.0).ceil() as u32).max(1);

    GeniePlayOptions {
        duration_ms: params.duration_ms,
        direction,
        origin_local: Point::new(metrics.origin_x * pr, metrics.origin_y * pr),
        size,
        direction_vec: metrics.direction(),
        neck: Neck {
            min: neck_min,
            max: neck_max,
        },
        curve_strength,
        cols,
        rows,
        release_range: params.release_range,
        easing: params.easing,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/options.rs"]
mod tests;
