use super::*;

const ALL: [Ease; 6] = [
    Ease::Linear,
    Ease::InOutCubic,
    Ease::OutQuint,
    Ease::OutExpo,
    Ease::OutBack,
    Ease::Genie,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease:?} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    for ease in ALL {
        assert_eq!(ease.apply(-2.0), ease.apply(0.0));
        assert_eq!(ease.apply(3.0), ease.apply(1.0));
    }
}

#[test]
fn back_out_overshoots_inside_the_interval() {
    let peak = (1..100)
        .map(|i| ease_out_back(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
    assert!(
        (1..100)
            .map(|i| genie_easing(f64::from(i) / 100.0))
            .any(|v| v > 1.0)
    );
}

#[test]
fn genie_easing_endpoints() {
    assert!(genie_easing(0.0).abs() < 1e-9);
    assert!((genie_easing(1.0) - 1.0).abs() < 1e-9);
}

#[test]
fn expo_reaches_one_exactly() {
    assert_eq!(ease_out_expo(1.0), 1.0);
    assert!(ease_out_expo(0.5) > 0.96);
}

#[test]
fn in_out_cubic_is_symmetric() {
    for i in 0..=10 {
        let t = f64::from(i) / 10.0;
        let a = ease_in_out_cubic(t);
        let b = 1.0 - ease_in_out_cubic(1.0 - t);
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn interpolate_is_linear() {
    assert_eq!(interpolate(10.0, 20.0, 0.0), 10.0);
    assert_eq!(interpolate(10.0, 20.0, 0.25), 12.5);
    assert_eq!(interpolate(10.0, 20.0, 1.5), 25.0);
}

#[test]
fn serde_names_are_snake_case() {
    let s = serde_json::to_string(&Ease::OutQuint).unwrap();
    assert_eq!(s, "\"out_quint\"");
}
