//! Host collaborator seams.
//!
//! The engine is single-threaded and host-driven: the host owns the display-refresh callback,
//! timers, the element snapshotter and the content node's style. It calls back into the
//! controller with the handles it issued.

use crate::capture::CaptureTicket;
use crate::foundation::core::{Rect, Size};
use crate::foundation::error::GenieResult;
use crate::render::target::WarpTarget;

/// Pending display-refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Pending timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

pub trait FrameScheduler {
    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Drop a pending callback. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Current time on the same clock as the `now_ms` passed to frame callbacks.
    fn now_ms(&self) -> f64;
}

pub trait TimerScheduler {
    fn set_timeout(&mut self, delay_ms: f64) -> TimerHandle;

    fn clear_timeout(&mut self, handle: TimerHandle);
}

/// Capability checks, queried fresh on every transition.
pub trait Capabilities {
    /// Whether `clip-path: path(..)` is honoured.
    fn supports_clip_path_path(&self) -> bool;

    /// Whether a mesh-warp target can be created.
    fn can_use_gpu(&self) -> bool;
}

/// Style properties the controller writes on the content node. Empty strings mean "unset".
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ContentStyle {
    pub transform: String,
    pub transform_origin: String,
    pub clip_path: String,
    pub opacity: String,
    pub transition: String,
    pub will_change: String,
    pub pointer_events: String,
}

/// Everything the controller needs from its environment.
pub trait Host: FrameScheduler + TimerScheduler + Capabilities {
    /// Viewport rect of the content node, or `None` while it is not mounted.
    fn measure_content(&self) -> Option<Rect>;

    fn content_style(&self) -> ContentStyle;

    fn apply_content_style(&mut self, style: &ContentStyle);

    /// Show or hide the live content (visibility, not layout).
    fn set_inner_visible(&mut self, visible: bool);

    /// Show or hide the mesh-warp overlay surface.
    fn set_overlay_visible(&mut self, visible: bool);

    fn pixel_ratio(&self) -> f64;

    /// Make the content node a positioning context for the overlay, if it is not one already.
    fn ensure_positioned(&mut self);

    /// Undo [`Host::ensure_positioned`].
    fn restore_positioning(&mut self);

    /// Start an asynchronous snapshot. The result comes back through
    /// [`crate::GenieController::capture_resolved`] carrying `ticket.op`.
    fn request_capture(&mut self, ticket: CaptureTicket);

    /// Surface for one mesh playback, sized in device pixels.
    fn create_warp_target(&mut self, size: Size) -> GenieResult<Box<dyn WarpTarget>>;
}
