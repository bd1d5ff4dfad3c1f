use super::*;

fn scenario_a() -> GenieMetrics {
    calculate_genie_metrics(
        Rect::new(20.0, 500.0, 100.0, 40.0),
        Rect::new(200.0, 100.0, 400.0, 300.0),
    )
}

#[test]
fn translate_points_from_content_back_to_origin() {
    let m = scenario_a();
    assert_eq!(m.translate_x, -330.0);
    assert_eq!(m.translate_y, 270.0);
}

#[test]
fn origin_is_expressed_in_content_local_space() {
    let m = scenario_a();
    assert_eq!(m.origin_local(), Point::new(-130.0, 420.0));
    assert_eq!(m.content_rect, Rect::new(0.0, 0.0, 400.0, 300.0));
}

#[test]
fn scales_and_radii() {
    let m = scenario_a();
    assert_eq!(m.scale_x, 0.25);
    assert!((m.scale_y - 40.0 / 300.0).abs() < 1e-12);
    assert_eq!(m.origin_radius, 50.0);
    assert_eq!(m.expanded_radius, 500.0);
}

#[test]
fn angle_points_from_origin_to_content() {
    let m = scenario_a();
    assert!((m.distance - 330.0f64.hypot(270.0)).abs() < 1e-9);
    assert!((m.angle - (-270.0f64).atan2(330.0)).abs() < 1e-12);
    let d = m.direction();
    assert!(d.x > 0.0 && d.y < 0.0);
    assert!((d.hypot() - 1.0).abs() < 1e-12);
}

#[test]
fn zero_width_origin_gets_epsilon_scale() {
    let m = calculate_genie_metrics(
        Rect::new(20.0, 500.0, 0.0, 40.0),
        Rect::new(200.0, 100.0, 400.0, 300.0),
    );
    assert_eq!(m.scale_x, EPSILON);
    assert!(m.scale_x.is_finite() && m.scale_x > 0.0);
}

#[test]
fn zero_width_content_gets_unit_scale() {
    let m = calculate_genie_metrics(
        Rect::new(20.0, 500.0, 10.0, 40.0),
        Rect::new(200.0, 100.0, 0.0, 0.0),
    );
    assert_eq!(m.scale_x, 1.0);
    assert_eq!(m.scale_y, 1.0);
}

#[test]
fn coincident_centres_point_up() {
    let r = Rect::new(10.0, 10.0, 80.0, 80.0);
    let m = calculate_genie_metrics(Rect::new(40.0, 40.0, 20.0, 20.0), r);
    assert_eq!(m.distance, 0.0);
    assert_eq!(m.angle, -std::f64::consts::FRAC_PI_2);
    let d = m.direction();
    assert!(d.x.abs() < 1e-12 && (d.y + 1.0).abs() < 1e-12);
}

#[test]
fn scales_are_finite_and_non_zero_over_a_grid() {
    let sizes = [0.0, 0.00001, 1.0, 37.5, 1000.0];
    for &ow in &sizes {
        for &oh in &sizes {
            for &cw in &sizes {
                for &ch in &sizes {
                    let m = calculate_genie_metrics(
                        Rect::new(3.0, 7.0, ow, oh),
                        Rect::new(100.0, 50.0, cw, ch),
                    );
                    assert!(m.scale_x.is_finite() && m.scale_x != 0.0);
                    assert!(m.scale_y.is_finite() && m.scale_y != 0.0);
                    assert!(m.angle.is_finite());
                }
            }
        }
    }
}
