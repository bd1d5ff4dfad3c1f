pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Axis-aligned box in viewport coordinates (CSS pixels).
///
/// Always a value snapshot: host rect types are live objects, so callers copy the four fields
/// out at measurement time and never hand the live object to the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Distance from the viewport top edge.
    pub top: f64,
    /// Distance from the viewport left edge.
    pub left: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl Rect {
    /// Build a rect from its top-left corner and size.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Right edge (`left + width`).
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (`top + height`).
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    /// Center point.
    pub fn center(self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Same size, moved so its top-left corner sits at `(0, 0)`.
    pub fn at_origin(self) -> Self {
        Self::new(0.0, 0.0, self.width, self.height)
    }

    /// Field-wise comparison within `tolerance`.
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        (self.top - other.top).abs() <= tolerance
            && (self.left - other.left).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }

    /// Smaller of width and height.
    pub fn min_dim(self) -> f64 {
        self.width.min(self.height)
    }

    /// Convert into a `kurbo` rect (corner form).
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(self.left, self.top, self.right(), self.bottom())
    }

    /// Convert from a `kurbo` rect (corner form).
    pub fn from_kurbo(r: kurbo::Rect) -> Self {
        Self::new(r.x0, r.y0, r.width(), r.height())
    }
}

/// Device-pixel dimensions of a surface or bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in device pixels.
    pub w: u32,
    /// Height in device pixels.
    pub h: u32,
}

impl Size {
    /// Build a size, clamping both axes to at least one pixel.
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w: w.max(1),
            h: h.max(1),
        }
    }

    /// Number of pixels covered.
    pub fn area(self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }
}

/// Monotonic tag for one open/close attempt.
///
/// Asynchronous work (capture) carries the id it was issued with; on resume it is compared with
/// the controller's current id and discarded when they differ.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct OperationId(pub u64);

impl OperationId {
    /// The id issued after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
