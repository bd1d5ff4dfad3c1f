use super::*;
use crate::foundation::core::Rect;
use crate::geometry::clip::{circle_clip, path_clip};
use crate::geometry::metrics::calculate_genie_metrics;
use crate::geometry::path::PathTuning;

fn metrics() -> GenieMetrics {
    calculate_genie_metrics(
        Rect::new(10.0, 200.0, 20.0, 10.0),
        Rect::new(100.0, 50.0, 40.0, 30.0),
    )
}

fn snapshot() -> CapturedImage {
    CapturedImage::from_rgba(
        image::RgbaImage::from_pixel(40, 30, image::Rgba([0, 128, 255, 255])),
        1.0,
    )
}

#[test]
fn open_frame_shows_the_rounded_snapshot() {
    let m = metrics();
    let mut preview = ClipPreview::new(&snapshot()).unwrap();
    let clip = path_clip(&PathTuning::default(), &m, 1.0);
    let frame = preview
        .render(&m, &clip, GenieTransform::IDENTITY, 1.0)
        .unwrap();
    assert_eq!((frame.width, frame.height), (40, 30));
    let center = frame.pixel(20, 15);
    assert!(center[3] >= 250, "{center:?}");
    assert!(center[2] >= 250, "{center:?}");
    assert_eq!(frame.pixel(0, 0)[3], 0);
}

#[test]
fn opacity_scales_coverage() {
    let m = metrics();
    let mut preview = ClipPreview::new(&snapshot()).unwrap();
    let clip = path_clip(&PathTuning::default(), &m, 1.0);
    let frame = preview
        .render(&m, &clip, GenieTransform::IDENTITY, 0.5)
        .unwrap();
    let a = frame.pixel(20, 15)[3];
    assert!((120..=135).contains(&a), "alpha {a}");
}

#[test]
fn collapsed_circle_leaves_content_mostly_empty() {
    let m = metrics();
    let mut preview = ClipPreview::new(&snapshot()).unwrap();
    let frame = preview
        .render(&m, &circle_clip(&m, 0.0), GenieTransform::at(&m, 0.0, 15.0), 1.0)
        .unwrap();
    let painted = frame.data.chunks_exact(4).filter(|px| px[3] > 0).count();
    assert!(painted < 40 * 30 / 4, "painted {painted}");
}

#[test]
fn frames_do_not_accumulate() {
    let m = metrics();
    let mut preview = ClipPreview::new(&snapshot()).unwrap();
    let full = path_clip(&PathTuning::default(), &m, 1.0);
    preview
        .render(&m, &full, GenieTransform::IDENTITY, 1.0)
        .unwrap();
    let frame = preview
        .render(&m, &full, GenieTransform::IDENTITY, 0.0)
        .unwrap();
    assert!(frame.data.iter().all(|b| *b == 0));
}

#[test]
fn empty_snapshot_is_rejected() {
    let img = CapturedImage {
        width: 0,
        height: 0,
        rgba8_premul: Arc::new(Vec::new()),
        pixel_ratio: 1.0,
    };
    assert!(ClipPreview::new(&img).is_err());
}
