//! Genie-style open/close motion for a single content node.
//!
//! The content box morphs out of (or collapses into) an origin rect, usually its trigger. Two
//! strategies render the effect:
//!
//! - a mesh warp of a snapshot of the content, played on an overlay surface
//!   ([`Playback`] over a [`WarpTarget`]), and
//! - a CSS driver writing `transform` and a genie `clip-path` on the node every frame.
//!
//! The host environment supplies frames, timers, snapshots and style writes through [`Host`];
//! [`GenieController`] is the state machine and [`GenieMotion`] bundles it with [`GenieRoot`].
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod capture;
pub(crate) mod controller;
pub(crate) mod geometry;
pub(crate) mod host;
pub(crate) mod motion;
pub(crate) mod render;
pub(crate) mod root;

pub use crate::foundation::core::{Affine, BezPath, OperationId, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{GenieError, GenieResult};

pub use crate::animation::bezier::{CubicBezier, GENIE_TIMING_POINTS, genie_timing};
pub use crate::animation::ease::{
    Ease, GENIE_EXPO_WEIGHT, ease_in_out_cubic, ease_out_back, ease_out_expo, ease_out_quint,
    genie_easing, interpolate,
};
pub use crate::capture::{
    BitmapElement, CaptureTicket, CapturedImage, Rasterize, capture_element_to_image,
    sanitize_pixel_ratio, target_pixel_size,
};
pub use crate::controller::{
    AnimationState, ControllerConfig, GenieController, RestingStyle, Strategy, select_strategy,
};
pub use crate::geometry::clip::{ClipShape, circle_clip, path_clip};
pub use crate::geometry::metrics::{GenieMetrics, calculate_genie_metrics};
pub use crate::geometry::path::{
    PathTuning, build_genie_path, build_genie_path_with, genie_outline, genie_outline_with,
    svg_path_data,
};
pub use crate::geometry::transform::{GenieTransform, IDENTITY_TRANSFORM, transform_origin};
pub use crate::host::{
    ContentStyle, Capabilities, FrameHandle, FrameScheduler, Host, TimerHandle, TimerScheduler,
};
pub use crate::motion::{GenieMotion, Key, PointerTarget};
pub use crate::render::clip_preview::ClipPreview;
pub use crate::render::cpu::CpuWarpTarget;
#[cfg(feature = "gpu")]
pub use crate::render::gpu::{WgpuWarpTarget, can_use_gpu};
pub use crate::render::mesh::GridMesh;
pub use crate::render::options::{Direction, GeniePlayOptions, GlParams, Neck, build_play_options};
pub use crate::render::playback::{Playback, PlaybackStep};
pub use crate::render::shader::{
    ALPHA_DISCARD, FRAGMENT_WGSL, VERTEX_WGSL, WarpUniforms, WarpedVertex, warp_vertex,
};
pub use crate::render::target::{BackendKind, FrameRGBA, WarpTarget, create_target};
pub use crate::root::{
    ContentSlot, DataState, GenieRoot, Measure, Origin, TriggerSlot, expect_single_child,
};
