use super::*;

#[test]
fn clamp_tolerates_inverted_bounds() {
    assert_eq!(clamp(5.0, 10.0, 2.0), 10.0);
    assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
    assert_eq!(clamp01(-3.0), 0.0);
}

#[test]
fn safe_divide_guards_degenerate_sizes() {
    assert_eq!(safe_divide(100.0, 0.0), 1.0);
    assert_eq!(safe_divide(0.0, 400.0), EPSILON);
    assert_eq!(safe_divide(100.0, 400.0), 0.25);
}

#[test]
fn normalize_returns_zero_for_tiny_vectors() {
    assert_eq!(normalize(Vec2::new(0.00001, 0.0)), Vec2::ZERO);
    let n = normalize(Vec2::new(3.0, 4.0));
    assert!((n.x - 0.6).abs() < 1e-12 && (n.y - 0.8).abs() < 1e-12);
}

#[test]
fn smoothstep_edges() {
    assert_eq!(smoothstep(0.12, 0.95, 0.0), 0.0);
    assert_eq!(smoothstep(0.12, 0.95, 1.0), 1.0);
    let mid = smoothstep(0.0, 1.0, 0.5);
    assert!((mid - 0.5).abs() < 1e-6);
}

#[test]
fn coordinates_round_to_three_decimals() {
    assert_eq!(fmt_coord(12.0), "12");
    assert_eq!(fmt_coord(12.5), "12.5");
    assert_eq!(fmt_coord(1.23456), "1.235");
    assert_eq!(fmt_coord(-0.0002), "0");
    assert_eq!(fmt_coord(f64::NAN), "0");
    assert_eq!(fmt_coord(-42.1), "-42.1");
}

#[test]
fn lerp_point_midpoint() {
    let p = lerp_point(Point::new(0.0, 0.0), Point::new(10.0, -4.0), 0.5);
    assert_eq!(p, Point::new(5.0, -2.0));
}
