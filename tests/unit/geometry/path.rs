use super::*;
use crate::foundation::core::Rect;
use crate::geometry::metrics::calculate_genie_metrics;
use kurbo::{PathEl, Shape};

fn scenario_a() -> GenieMetrics {
    calculate_genie_metrics(
        Rect::new(20.0, 500.0, 100.0, 40.0),
        Rect::new(200.0, 100.0, 400.0, 300.0),
    )
}

fn points(path: &BezPath) -> Vec<Point> {
    let mut out = Vec::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => out.push(p),
            PathEl::QuadTo(a, p) => out.extend([a, p]),
            PathEl::CurveTo(a, b, p) => out.extend([a, b, p]),
            PathEl::ClosePath => {}
        }
    }
    out
}

#[test]
fn fully_open_outline_is_the_content_box() {
    let m = scenario_a();
    let bbox = genie_outline(&m, 1.0).bounding_box();
    assert!(bbox.x0.abs() < 1e-6, "{bbox:?}");
    assert!(bbox.y0.abs() < 1e-6, "{bbox:?}");
    assert!((bbox.x1 - 400.0).abs() < 1e-6, "{bbox:?}");
    assert!((bbox.y1 - 300.0).abs() < 1e-6, "{bbox:?}");
}

#[test]
fn fully_open_outline_has_rounded_corners() {
    let m = scenario_a();
    let path = genie_outline(&m, 1.0);
    // The corner itself is cut off by the arc.
    assert!(!path.contains(Point::new(0.5, 0.5)));
    assert!(path.contains(Point::new(200.0, 150.0)));
    assert!(path.contains(Point::new(399.0, 150.0)));
}

#[test]
fn collapsed_outline_hugs_the_origin() {
    let m = scenario_a();
    let origin = m.origin_local();
    for p in points(&genie_outline(&m, 0.0)) {
        assert!(p.distance(origin) < 80.0, "{p:?} too far from {origin:?}");
    }
}

#[test]
fn outline_grows_with_progress() {
    let m = scenario_a();
    let area = |t: f64| genie_outline(&m, t).area().abs();
    assert!(area(0.0) < area(0.5));
    assert!(area(0.5) < area(1.0));
    let r = 105.0;
    let rounded_box = 400.0 * 300.0 - (4.0 - std::f64::consts::PI) * r * r;
    assert!((area(1.0) - rounded_box).abs() < 0.01 * rounded_box);
}

#[test]
fn path_string_is_wrapped_and_closed() {
    let s = build_genie_path(&scenario_a(), 0.5);
    assert!(s.starts_with("path('M "), "{s}");
    assert!(s.ends_with(" Z')"), "{s}");
    assert_eq!(s.matches(" C ").count() + usize::from(s.contains("M ")), 15);
    assert!(!s.contains("NaN") && !s.contains("inf"));
}

#[test]
fn progress_outside_unit_range_is_clamped() {
    let m = scenario_a();
    assert_eq!(build_genie_path(&m, -1.0), build_genie_path(&m, 0.0));
    assert_eq!(build_genie_path(&m, 2.0), build_genie_path(&m, 1.0));
}

#[test]
fn coincident_and_degenerate_inputs_stay_finite() {
    let coincident = calculate_genie_metrics(
        Rect::new(90.0, 90.0, 20.0, 20.0),
        Rect::new(0.0, 0.0, 200.0, 200.0),
    );
    let empty = calculate_genie_metrics(
        Rect::new(10.0, 10.0, 0.0, 0.0),
        Rect::new(50.0, 50.0, 0.0, 0.0),
    );
    for m in [coincident, empty] {
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            for p in points(&genie_outline(&m, t)) {
                assert!(p.x.is_finite() && p.y.is_finite());
            }
        }
    }
}

#[test]
fn neck_holds_then_releases() {
    let tuning = PathTuning::default();
    assert_eq!(tuning.neck_progress(0.0), 0.0);
    assert!((tuning.neck_progress(0.2) - 0.02).abs() < 1e-12);
    assert!((tuning.neck_progress(0.4) - 0.08).abs() < 1e-12);
    assert!(tuning.neck_progress(0.6) > 0.5);
    assert_eq!(tuning.neck_progress(1.0), 1.0);
}

#[test]
fn side_follows_the_dominant_axis() {
    let up = Vec2::new(0.0, -1.0);
    assert_eq!(determine_side(up, f64::INFINITY, 150.0), Side::Top);
    let down_left = normalize(Vec2::new(-330.0, 270.0));
    let sx = 200.0 / down_left.x.abs();
    let sy = 150.0 / down_left.y.abs();
    assert_eq!(determine_side(down_left, sx, sy), Side::Bottom);
    let right = Vec2::new(1.0, 0.1);
    assert_eq!(determine_side(right, 200.0, 1500.0), Side::Right);
    assert_eq!(determine_side(-right, 200.0, 1500.0), Side::Left);
}

#[test]
fn tuning_merges_partial_json_over_defaults() {
    let t: PathTuning = serde_json::from_str(r#"{"neck_hold_threshold":0.5}"#).unwrap();
    assert_eq!(t.neck_hold_threshold, 0.5);
    assert_eq!(t.neck_hold_cap, PathTuning::default().neck_hold_cap);
}

#[test]
fn path_data_rounds_coordinates() {
    let mut p = BezPath::new();
    p.move_to((1.23456, 2.0));
    p.line_to((-0.0001, 10.5));
    p.close_path();
    assert_eq!(svg_path_data(&p), "M 1.235 2 L 0 10.5 Z");
}
