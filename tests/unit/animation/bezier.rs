use super::*;

#[test]
fn linear_curve_is_identity() {
    let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
    for i in 0..=100 {
        let x = f64::from(i) / 100.0;
        assert!((linear.solve(x) - x).abs() < 1e-5, "x={x}");
    }
}

#[test]
fn endpoints_clamp() {
    let c = genie_timing();
    assert_eq!(c.solve(-0.5), 0.0);
    assert_eq!(c.solve(0.0), 0.0);
    assert_eq!(c.solve(1.0), 1.0);
    assert_eq!(c.solve(7.0), 1.0);
}

#[test]
fn ease_matches_css_reference_points() {
    // CSS `ease` = cubic-bezier(0.25, 0.1, 0.25, 1.0); browsers report ~0.8024 at x = 0.5.
    let ease = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
    assert!((ease.solve(0.5) - 0.8024).abs() < 1e-3);
}

#[test]
fn genie_curve_is_monotonic_and_front_loaded() {
    let c = genie_timing();
    let mut prev = 0.0;
    for i in 1..=50 {
        let v = c.solve(f64::from(i) / 50.0);
        assert!(v + 1e-9 >= prev);
        prev = v;
    }
    assert!(c.solve(0.25) > 0.6);
}

#[test]
fn flat_slope_falls_back_to_bisection() {
    // x1 = x2 = 0 gives a zero derivative at t = 0 for small x.
    let c = CubicBezier::new(0.0, 0.5, 0.0, 0.5);
    let y = c.solve(0.001);
    assert!(y.is_finite());
    assert!((0.0..=1.0).contains(&y));
}
