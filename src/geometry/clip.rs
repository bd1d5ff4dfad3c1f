use crate::foundation::core::{BezPath, Point};
use crate::foundation::math::{fmt_coord, lerp};
use crate::geometry::metrics::GenieMetrics;
use crate::geometry::path::{PathTuning, genie_outline_with, svg_path_data};

/// Clip region applied to the content node for one CSS-driven frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    /// Genie outline in content-local coordinates.
    Path(BezPath),
    /// Fallback when `clip-path: path(..)` is unsupported.
    Circle { center: Point, radius: f64 },
}

impl ClipShape {
    /// CSS `clip-path` value.
    pub fn to_css(&self) -> String {
        match self {
            Self::Path(path) => format!("path('{}')", svg_path_data(path)),
            Self::Circle { center, radius } => format!(
                "circle({}px at {}px {}px)",
                fmt_coord(*radius),
                fmt_coord(center.x),
                fmt_coord(center.y)
            ),
        }
    }

    /// Geometry of the region, for rasterised previews.
    pub fn to_bez_path(&self) -> BezPath {
        match self {
            Self::Path(path) => path.clone(),
            Self::Circle { center, radius } => {
                kurbo::Shape::to_path(&kurbo::Circle::new(*center, radius.max(0.0)), 0.1)
            }
        }
    }
}

/// Circle centred on the origin, growing from the origin radius to the content diagonal.
pub fn circle_clip(metrics: &GenieMetrics, t: f64) -> ClipShape {
    ClipShape::Circle {
        center: metrics.origin_local(),
        radius: lerp(metrics.origin_radius, metrics.expanded_radius, t).max(0.0),
    }
}

/// Genie outline clip for progress `t`.
pub fn path_clip(tuning: &PathTuning, metrics: &GenieMetrics, t: f64) -> ClipShape {
    ClipShape::Path(genie_outline_with(tuning, metrics, t))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/clip.rs"]
mod tests;
