use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::math::{EPSILON, safe_divide};

/// Values derived once per transition from the origin and content rects.
///
/// `origin_x`/`origin_y` are the origin centre in content-local coordinates; every deformation
/// anchors there. `content_rect` is the content box moved to `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenieMetrics {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub origin_radius: f64,
    pub expanded_radius: f64,
    /// Radians, from origin centre toward content centre. `-PI/2` (up) when the centres coincide.
    pub angle: f64,
    pub distance: f64,
    pub content_rect: Rect,
}

impl GenieMetrics {
    pub fn origin_local(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    /// Unit vector for [`GenieMetrics::angle`], "up" when the angle is not finite.
    pub fn direction(&self) -> Vec2 {
        if !self.angle.is_finite() {
            return Vec2::new(0.0, -1.0);
        }
        let v = Vec2::new(self.angle.cos(), self.angle.sin());
        let len = v.hypot();
        if len == 0.0 {
            return Vec2::new(0.0, -1.0);
        }
        v / len
    }
}

/// Derive [`GenieMetrics`] from two viewport rects. Total for any finite input.
pub fn calculate_genie_metrics(origin: Rect, content: Rect) -> GenieMetrics {
    let origin_center = origin.center();
    let content_center = content.center();

    let translate = origin_center - content_center;
    let travel = content_center - origin_center;
    let distance = travel.hypot();
    let angle = if distance > EPSILON {
        travel.y.atan2(travel.x)
    } else {
        -std::f64::consts::FRAC_PI_2
    };

    GenieMetrics {
        translate_x: translate.x,
        translate_y: translate.y,
        scale_x: safe_divide(origin.width, content.width),
        scale_y: safe_divide(origin.height, content.height),
        origin_x: origin_center.x - content.left,
        origin_y: origin_center.y - content.top,
        origin_radius: origin.width.max(origin.height) / 2.0,
        expanded_radius: content.width.hypot(content.height),
        angle,
        distance,
        content_rect: content.at_origin(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/metrics.rs"]
mod tests;
