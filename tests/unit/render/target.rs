use super::*;

#[test]
fn straight_alpha_conversion_unpremultiplies() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![64, 0, 32, 128, 9, 9, 9, 0],
        premultiplied: true,
    };
    let straight = frame.to_straight();
    assert_eq!(&straight[0..4], &[128, 0, 64, 128]);
    assert_eq!(&straight[4..8], &[9, 9, 9, 0]);
    assert_eq!(frame.pixel(1, 0), [9, 9, 9, 0]);
}

#[test]
fn cpu_target_is_always_available() {
    let t = create_target(BackendKind::Cpu, Size::new(8, 4)).unwrap();
    assert_eq!(t.size(), Size::new(8, 4));
    assert_eq!(t.live_resources(), 0);
}

#[cfg(not(feature = "gpu"))]
#[test]
fn gpu_target_requires_feature() {
    let err = create_target(BackendKind::Gpu, Size::new(8, 4)).err().unwrap();
    assert!(matches!(err, GenieError::Gpu(_)));
}
