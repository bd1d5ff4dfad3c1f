//! CSS transform values written by the clip-path driver.

use crate::foundation::core::{Affine, Point};
use crate::foundation::math::{fmt_coord, lerp};
use crate::geometry::metrics::GenieMetrics;

pub const IDENTITY_TRANSFORM: &str = "translate3d(0px, 0px, 0px) scale(1, 1) skewY(0deg)";

/// Scale/skew pair around the origin point. Translation is carried by `transform-origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenieTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub skew_y_deg: f64,
}

impl GenieTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        skew_y_deg: 0.0,
    };

    /// Frame transform for progress `p`: scale from the origin size to `1`, skew peaking mid-way.
    pub fn at(metrics: &GenieMetrics, p: f64, max_skew_deg: f64) -> Self {
        Self {
            scale_x: lerp(metrics.scale_x, 1.0, p),
            scale_y: lerp(metrics.scale_y, 1.0, p),
            skew_y_deg: (p * std::f64::consts::PI).sin() * max_skew_deg,
        }
    }

    pub fn to_css(self) -> String {
        format!(
            "translate3d(0px, 0px, 0px) scale({}, {}) skewY({}deg)",
            fmt_coord(self.scale_x),
            fmt_coord(self.scale_y),
            fmt_coord(self.skew_y_deg)
        )
    }

    /// Same mapping as [`GenieTransform::to_css`] with `transform-origin` at `origin`.
    pub fn to_affine(self, origin: Point) -> Affine {
        let skew = self.skew_y_deg.to_radians().tan();
        Affine::translate(origin.to_vec2())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::skew(0.0, skew)
            * Affine::translate(-origin.to_vec2())
    }
}

/// `transform-origin` value anchoring the scale at the origin centre.
pub fn transform_origin(metrics: &GenieMetrics) -> String {
    format!(
        "{}px {}px",
        fmt_coord(metrics.origin_x),
        fmt_coord(metrics.origin_y)
    )
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/transform.rs"]
mod tests;
