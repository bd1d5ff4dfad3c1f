//! Genie silhouette for the clip-path strategy.
//!
//! The outline is the content box with rounded corners and a "neck" pinched toward the origin
//! point. Every boundary point is pulled toward the origin by [`Morph`], strongest near `t = 0`.
//! At `t = 1` the morph is the identity and the outline is the plain rounded box.

use crate::animation::ease::{ease_in_out_cubic, ease_out_quint};
use crate::foundation::core::{BezPath, Point, Vec2};
use crate::foundation::math::{EPSILON, clamp, clamp01, fmt_coord, lerp, lerp_point, normalize};
use crate::geometry::metrics::GenieMetrics;

/// Circle-approximation constant for cubic corner arcs.
const KAPPA: f64 = 0.552_284_749_830_793_6;

/// Empirical constants shaping the outline. None of them affect correctness.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PathTuning {
    /// Progress below which the neck stays nearly closed.
    pub neck_hold_threshold: f64,
    /// Neck opening reached at the end of the hold phase.
    pub neck_hold_cap: f64,
    /// Forward scale of the origin-facing half at `t = 0`.
    pub forward_near_min: f64,
    /// Forward scale of the far half at `t = 0`.
    pub forward_far_min: f64,
    /// Lateral scale at `t = 0`.
    pub lateral_min: f64,
    /// Lean as a fraction of the corner radius.
    pub lean_factor: f64,
    /// Corner radius at `t = 0`.
    pub min_corner_radius: f64,
    /// Final corner radius as a fraction of the smaller content side.
    pub head_radius_ratio: f64,
    /// Lower bound of the final corner radius (before the half-side cap).
    pub head_radius_min: f64,
}

impl Default for PathTuning {
    fn default() -> Self {
        Self {
            neck_hold_threshold: 0.4,
            neck_hold_cap: 0.08,
            forward_near_min: 0.08,
            forward_far_min: 0.18,
            lateral_min: 0.12,
            lean_factor: 0.35,
            min_corner_radius: 4.0,
            head_radius_ratio: 0.35,
            head_radius_min: 30.0,
        }
    }
}

impl PathTuning {
    /// Two-phase neck opening: quadratic hold, then quint release to fully open.
    pub fn neck_progress(&self, progress: f64) -> f64 {
        let threshold = self.neck_hold_threshold.clamp(EPSILON, 1.0 - EPSILON);
        if progress <= threshold {
            let held = clamp01(progress / threshold);
            clamp01(held * held * self.neck_hold_cap)
        } else {
            let release = clamp01((progress - threshold) / (1.0 - threshold));
            clamp01(lerp(self.neck_hold_cap, 1.0, ease_out_quint(release)))
        }
    }
}

/// Box side the neck attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    cp1: Point,
    cp2: Point,
    end: Point,
}

fn line(start: Point, end: Point) -> Segment {
    Segment {
        cp1: start,
        cp2: end,
        end,
    }
}

fn corner(start: Point, end: Point, which: Corner, radius: f64) -> Segment {
    if radius <= 0.0 {
        return line(start, end);
    }
    let k = radius * KAPPA;
    let (cp1, cp2) = match which {
        Corner::TopLeft if start.y <= end.y => (
            Point::new(start.x - k, start.y),
            Point::new(end.x, end.y - k),
        ),
        Corner::TopLeft => (
            Point::new(start.x, start.y - k),
            Point::new(end.x - k, end.y),
        ),
        Corner::TopRight if start.y <= end.y => (
            Point::new(start.x + k, start.y),
            Point::new(end.x, end.y - k),
        ),
        Corner::TopRight => (
            Point::new(start.x, start.y - k),
            Point::new(end.x + k, end.y),
        ),
        Corner::BottomRight if start.y >= end.y => (
            Point::new(start.x + k, start.y),
            Point::new(end.x, end.y + k),
        ),
        Corner::BottomRight => (
            Point::new(start.x, start.y + k),
            Point::new(end.x + k, end.y),
        ),
        Corner::BottomLeft if start.x <= end.x => (
            Point::new(start.x, start.y + k),
            Point::new(end.x - k, end.y),
        ),
        Corner::BottomLeft => (
            Point::new(start.x - k, start.y),
            Point::new(end.x, end.y + k),
        ),
    };
    Segment { cp1, cp2, end }
}

/// Rounded-box boundary from `a` around the box to `b`, leaving through the far sides.
fn boundary_segments(side: Side, a: Point, b: Point, r: f64, w: f64, h: f64) -> Vec<Segment> {
    use Corner::*;

    let top_left_edge = Point::new(r, 0.0);
    let top_right_edge = Point::new(w - r, 0.0);
    let left_edge_top = Point::new(0.0, r);
    let left_edge_bottom = Point::new(0.0, h - r);
    let bottom_left_edge = Point::new(r, h);
    let bottom_right_edge = Point::new(w - r, h);
    let right_edge_bottom = Point::new(w, h - r);
    let right_edge_top = Point::new(w, r);

    match side {
        Side::Top => vec![
            line(a, top_left_edge),
            corner(top_left_edge, left_edge_top, TopLeft, r),
            line(left_edge_top, left_edge_bottom),
            corner(left_edge_bottom, bottom_left_edge, BottomLeft, r),
            line(bottom_left_edge, bottom_right_edge),
            corner(bottom_right_edge, right_edge_bottom, BottomRight, r),
            line(right_edge_bottom, right_edge_top),
            corner(right_edge_top, top_right_edge, TopRight, r),
            line(top_right_edge, b),
        ],
        Side::Bottom => vec![
            line(a, bottom_right_edge),
            corner(bottom_right_edge, right_edge_bottom, BottomRight, r),
            line(right_edge_bottom, right_edge_top),
            corner(right_edge_top, top_right_edge, TopRight, r),
            line(top_right_edge, top_left_edge),
            corner(top_left_edge, left_edge_top, TopLeft, r),
            line(left_edge_top, left_edge_bottom),
            corner(left_edge_bottom, bottom_left_edge, BottomLeft, r),
            line(bottom_left_edge, b),
        ],
        Side::Left => vec![
            line(a, left_edge_bottom),
            corner(left_edge_bottom, bottom_left_edge, BottomLeft, r),
            line(bottom_left_edge, bottom_right_edge),
            corner(bottom_right_edge, right_edge_bottom, BottomRight, r),
            line(right_edge_bottom, right_edge_top),
            corner(right_edge_top, top_right_edge, TopRight, r),
            line(top_right_edge, top_left_edge),
            corner(top_left_edge, left_edge_top, TopLeft, r),
            line(left_edge_top, b),
        ],
        Side::Right => vec![
            line(a, right_edge_top),
            corner(right_edge_top, top_right_edge, TopRight, r),
            line(top_right_edge, top_left_edge),
            corner(top_left_edge, left_edge_top, TopLeft, r),
            line(left_edge_top, left_edge_bottom),
            corner(left_edge_bottom, bottom_left_edge, BottomLeft, r),
            line(bottom_left_edge, bottom_right_edge),
            corner(bottom_right_edge, right_edge_bottom, BottomRight, r),
            line(right_edge_bottom, b),
        ],
    }
}

/// Pick the side the ray from the centre along `dir` leaves the box through.
pub(crate) fn determine_side(dir: Vec2, scale_x: f64, scale_y: f64) -> Side {
    if scale_x < scale_y {
        if dir.x > 0.0 { Side::Right } else { Side::Left }
    } else if dir.y > 0.0 {
        Side::Bottom
    } else {
        Side::Top
    }
}

/// Neck endpoints on `side`, kept clear of the corner arcs.
fn neck_attachments(
    side: Side,
    attach_center: Point,
    neck_half: f64,
    r: f64,
    w: f64,
    h: f64,
) -> (Point, Point) {
    match side {
        Side::Top | Side::Bottom => {
            let y = if side == Side::Top { 0.0 } else { h };
            let cx = clamp(attach_center.x, r + neck_half, w - r - neck_half);
            (
                Point::new(clamp(cx - neck_half, r, w - r), y),
                Point::new(clamp(cx + neck_half, r, w - r), y),
            )
        }
        Side::Left | Side::Right => {
            let x = if side == Side::Left { 0.0 } else { w };
            let cy = clamp(attach_center.y, r + neck_half, h - r - neck_half);
            (
                Point::new(x, clamp(cy - neck_half, r, h - r)),
                Point::new(x, clamp(cy + neck_half, r, h - r)),
            )
        }
    }
}

/// Per-frame pull of boundary points toward the origin.
struct Morph {
    center: Point,
    anchor: Point,
    dir: Vec2,
    perp: Vec2,
    forward_near: f64,
    forward_far: f64,
    lateral: f64,
    lean: Vec2,
}

impl Morph {
    fn apply(&self, p: Point) -> Point {
        let delta = p - self.center;
        let forward = delta.dot(self.dir);
        let lateral = delta.dot(self.perp);
        let forward_scale = if forward >= 0.0 {
            self.forward_near
        } else {
            self.forward_far
        };
        self.anchor
            + self.dir * (forward * forward_scale)
            + self.perp * (lateral * self.lateral)
            + self.lean
    }
}

/// Build the genie outline as a closed cubic path in content-local coordinates.
pub fn genie_outline(metrics: &GenieMetrics, t: f64) -> BezPath {
    genie_outline_with(&PathTuning::default(), metrics, t)
}

/// [`genie_outline`] with explicit tuning constants.
pub fn genie_outline_with(tuning: &PathTuning, metrics: &GenieMetrics, t: f64) -> BezPath {
    let progress = clamp01(t);
    let neck_progress = tuning.neck_progress(progress);
    let body_progress = ease_out_quint(progress);

    let width = metrics.content_rect.width.max(1.0);
    let height = metrics.content_rect.height.max(1.0);
    let min_dim = width.min(height);
    let max_radius = min_dim / 2.0;
    let head_radius =
        max_radius.min((min_dim * tuning.head_radius_ratio).max(tuning.head_radius_min));
    let radius = clamp(
        lerp(tuning.min_corner_radius, head_radius, body_progress),
        1.0,
        max_radius,
    );

    let center = Point::new(width / 2.0, height / 2.0);
    let origin = metrics.origin_local();

    let dir = if metrics.distance < EPSILON {
        Vec2::new(0.0, -1.0)
    } else {
        normalize(origin - center)
    };
    let perp = if dir == Vec2::ZERO {
        Vec2::new(1.0, 0.0)
    } else {
        normalize(Vec2::new(-dir.y, dir.x))
    };

    let scale_x = if dir.x == 0.0 {
        f64::INFINITY
    } else {
        width / 2.0 / dir.x.abs()
    };
    let scale_y = if dir.y == 0.0 {
        f64::INFINITY
    } else {
        height / 2.0 / dir.y.abs()
    };
    let boundary_scale = scale_x.min(scale_y);
    let attach_center = if boundary_scale.is_finite() {
        center + dir * boundary_scale
    } else {
        center
    };
    let side = determine_side(dir, scale_x, scale_y);

    let span = match side {
        Side::Top | Side::Bottom => width - radius * 2.0,
        Side::Left | Side::Right => height - radius * 2.0,
    };
    let span_limit = span.max(2.0);
    let neck_min = (head_radius / 14.0).max(2.0).min(span_limit);
    let neck_max = neck_min.max(span_limit.min((neck_min * 10.0).max(head_radius * 1.3)));
    let neck_width = clamp(lerp(neck_min, neck_max, neck_progress), neck_min, neck_max);
    let neck_half = neck_width / 2.0;

    let origin_width = clamp(
        lerp(neck_min * 0.6, neck_width * 0.7, neck_progress),
        (neck_min * 0.5).max(1.0),
        neck_width.max(2.0),
    );
    let origin_half = origin_width / 2.0;

    let (attach_a, attach_b) =
        neck_attachments(side, attach_center, neck_half, radius, width, height);
    let origin_left = lerp_point(origin - perp * origin_half, attach_a, neck_progress);
    let origin_right = lerp_point(origin + perp * origin_half, attach_b, neck_progress);

    let lean_strength = clamp(metrics.distance / width.max(height).max(1.0), 0.0, 1.0);
    let lean_amount = radius
        * tuning.lean_factor
        * ease_in_out_cubic(body_progress)
        * (1.0 - progress)
        * lean_strength;

    let morph = Morph {
        center,
        anchor: lerp_point(origin, center, body_progress),
        dir,
        perp,
        forward_near: clamp(
            lerp(tuning.forward_near_min, 1.0, neck_progress),
            tuning.forward_near_min,
            1.0,
        ),
        forward_far: clamp(
            lerp(tuning.forward_far_min, 1.0, body_progress),
            tuning.forward_far_min,
            1.0,
        ),
        lateral: clamp(
            lerp(tuning.lateral_min, 1.0, body_progress),
            tuning.lateral_min,
            1.0,
        ),
        lean: -dir * lean_amount,
    };

    let body_a = morph.apply(attach_a);
    let body_b = morph.apply(attach_b);
    let neck_blend = clamp(neck_progress * 1.15, 0.2, 1.0);
    let neck_left = lerp_point(origin_left, body_a, neck_blend);
    let neck_right = lerp_point(origin_right, body_b, neck_blend);

    let mut path = BezPath::new();
    path.move_to(origin_left);
    path.curve_to(origin_left, neck_left, neck_left);
    path.curve_to(neck_left, body_a, body_a);
    for seg in boundary_segments(side, attach_a, attach_b, radius, width, height) {
        path.curve_to(morph.apply(seg.cp1), morph.apply(seg.cp2), morph.apply(seg.end));
    }
    path.curve_to(body_b, neck_right, neck_right);
    path.curve_to(neck_right, origin_right, origin_right);
    path.curve_to(origin_right, origin_left, origin_left);
    path.close_path();
    path
}

/// Build the CSS clip region `path('M .. C .. Z')` for progress `t`.
pub fn build_genie_path(metrics: &GenieMetrics, t: f64) -> String {
    build_genie_path_with(&PathTuning::default(), metrics, t)
}

/// [`build_genie_path`] with explicit tuning constants.
pub fn build_genie_path_with(tuning: &PathTuning, metrics: &GenieMetrics, t: f64) -> String {
    format!("path('{}')", svg_path_data(&genie_outline_with(tuning, metrics, t)))
}

/// SVG path data with coordinates rounded to three decimals.
pub fn svg_path_data(path: &BezPath) -> String {
    use kurbo::PathEl;

    let mut parts: Vec<String> = Vec::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => parts.push(format!("M {} {}", fmt_coord(p.x), fmt_coord(p.y))),
            PathEl::LineTo(p) => parts.push(format!("L {} {}", fmt_coord(p.x), fmt_coord(p.y))),
            PathEl::QuadTo(c, p) => parts.push(format!(
                "Q {} {} {} {}",
                fmt_coord(c.x),
                fmt_coord(c.y),
                fmt_coord(p.x),
                fmt_coord(p.y)
            )),
            PathEl::CurveTo(c1, c2, p) => parts.push(format!(
                "C {} {} {} {} {} {}",
                fmt_coord(c1.x),
                fmt_coord(c1.y),
                fmt_coord(c2.x),
                fmt_coord(c2.y),
                fmt_coord(p.x),
                fmt_coord(p.y)
            )),
            PathEl::ClosePath => parts.push("Z".to_owned()),
        }
    }
    parts.join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/path.rs"]
mod tests;
