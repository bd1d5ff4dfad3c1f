//! Open/close state machine.
//!
//! One controller drives one content node. Every transition bumps the [`OperationId`], tears
//! down whatever was running (frame loop, settle timer, mesh playback) and then starts either
//! the mesh-warp path or the CSS clip-path path. The two paths share the single `active` slot,
//! so they never write to the node at the same time.

use crate::animation::ease::Ease;
use crate::capture::{CaptureTicket, CapturedImage};
use crate::foundation::core::{OperationId, Rect};
use crate::foundation::error::{GenieError, GenieResult};
use crate::foundation::math::{clamp01, fmt_coord};
use crate::geometry::clip::circle_clip;
use crate::geometry::metrics::{GenieMetrics, calculate_genie_metrics};
use crate::geometry::path::{PathTuning, build_genie_path_with};
use crate::geometry::transform::{GenieTransform, IDENTITY_TRANSFORM, transform_origin};
use crate::host::{ContentStyle, Capabilities, FrameHandle, Host, TimerHandle};
use crate::render::options::{Direction, GlParams, build_play_options};
use crate::render::playback::{Playback, PlaybackStep};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    Idle,
    Opening,
    Closing,
    /// CSS path only: short transition after the main transform ends.
    Settling,
}

/// Rendering strategy for one transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Snapshot + mesh-warp playback on an overlay surface.
    Mesh,
    /// Transform plus `clip-path: path(..)` genie outline.
    ClipPath,
    /// Transform plus a growing circle clip.
    Circle,
}

/// Pick the strategy from fresh capability checks.
pub fn select_strategy(caps: &dyn Capabilities) -> Strategy {
    if caps.can_use_gpu() {
        Strategy::Mesh
    } else if caps.supports_clip_path_path() {
        Strategy::ClipPath
    } else {
        Strategy::Circle
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub gl: GlParams,
    pub path: PathTuning,
    /// Main CSS transition length.
    pub css_duration_ms: f64,
    /// Settle transition length after the CSS transition.
    pub settle_ms: f64,
    /// Peak `skewY` during the CSS transition.
    pub max_skew_deg: f64,
    /// Timeline easing for the CSS transition.
    pub css_ease: Ease,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gl: GlParams::default(),
            path: PathTuning::default(),
            css_duration_ms: 420.0,
            settle_ms: 180.0,
            max_skew_deg: 15.0,
            css_ease: Ease::Genie,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> GenieResult<()> {
        self.gl.validate()?;
        for (name, v) in [
            ("css_duration_ms", self.css_duration_ms),
            ("settle_ms", self.settle_ms),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(GenieError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.max_skew_deg.is_finite() {
            return Err(GenieError::validation("max_skew_deg must be finite"));
        }
        Ok(())
    }
}

/// Content style as it was before the controller first touched the node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestingStyle {
    snapshot: ContentStyle,
}

impl RestingStyle {
    pub fn capture(style: ContentStyle) -> Self {
        Self { snapshot: style }
    }

    pub fn snapshot(&self) -> &ContentStyle {
        &self.snapshot
    }

    /// Style to leave on the node once a transition in `direction` is over.
    ///
    /// Transform is the identity; a closed node keeps opacity `0`.
    pub fn final_style(&self, direction: Direction) -> ContentStyle {
        let mut style = self.snapshot.clone();
        style.transform = IDENTITY_TRANSFORM.to_owned();
        if direction == Direction::Close {
            style.opacity = "0".to_owned();
        }
        style
    }
}

#[derive(Clone, Copy, Debug)]
struct CssRun {
    direction: Direction,
    strategy: Strategy,
    metrics: GenieMetrics,
    start_ms: Option<f64>,
    frame: FrameHandle,
}

enum Active {
    None,
    AwaitingCapture {
        op: OperationId,
        direction: Direction,
        metrics: GenieMetrics,
    },
    Mesh {
        playback: Playback,
        direction: Direction,
    },
    Css(CssRun),
    Settle {
        timer: TimerHandle,
        direction: Direction,
    },
}

impl Active {
    fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Animation controller for one content node.
pub struct GenieController<H: Host> {
    host: H,
    config: ControllerConfig,
    state: AnimationState,
    is_open: bool,
    op: OperationId,
    strategy: Option<Strategy>,
    active: Active,
    resting: RestingStyle,
    positioned: bool,
    unmounted: bool,
}

impl<H: Host> GenieController<H> {
    /// Snapshots the node's current style as its resting style.
    pub fn new(host: H, config: ControllerConfig) -> Self {
        let resting = RestingStyle::capture(host.content_style());
        Self {
            host,
            config,
            state: AnimationState::Idle,
            is_open: false,
            op: OperationId::default(),
            strategy: None,
            active: Active::None,
            resting,
            positioned: false,
            unmounted: false,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn operation(&self) -> OperationId {
        self.op
    }

    /// Strategy chosen by the most recent transition.
    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn resting_style(&self) -> &RestingStyle {
        &self.resting
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Mesh playback currently running, if any.
    pub fn playback(&self) -> Option<&Playback> {
        match &self.active {
            Active::Mesh { playback, .. } => Some(playback),
            _ => None,
        }
    }

    /// Operation whose capture is outstanding, if any.
    pub fn pending_capture(&self) -> Option<OperationId> {
        match &self.active {
            Active::AwaitingCapture { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Drive the externally owned open flag. Only a change starts a transition.
    #[tracing::instrument(skip(self), fields(op = self.op.0))]
    pub fn set_open(&mut self, is_open: bool, origin: Option<Rect>) {
        if self.unmounted || is_open == self.is_open {
            return;
        }
        self.is_open = is_open;
        let direction = if is_open {
            Direction::Open
        } else {
            Direction::Close
        };
        self.transition(direction, origin);
    }

    pub fn open(&mut self, origin: Rect) {
        self.set_open(true, Some(origin));
    }

    pub fn close(&mut self, origin: Option<Rect>) {
        self.set_open(false, origin);
    }

    fn transition(&mut self, direction: Direction, origin: Option<Rect>) {
        self.op = self.op.next();
        self.teardown();

        let Some(content) = self.host.measure_content() else {
            tracing::debug!("content not mounted; transition skipped");
            self.state = AnimationState::Idle;
            return;
        };
        let Some(origin) = origin else {
            tracing::warn!("open aborted: missing origin");
            self.finish(direction);
            return;
        };

        let metrics = calculate_genie_metrics(origin, content);
        let strategy = select_strategy(&self.host);
        self.strategy = Some(strategy);
        self.state = match direction {
            Direction::Open => AnimationState::Opening,
            Direction::Close => AnimationState::Closing,
        };
        tracing::debug!(?strategy, ?direction, "transition started");

        match strategy {
            Strategy::Mesh => self.begin_mesh(direction, metrics, content),
            Strategy::ClipPath | Strategy::Circle => self.begin_css(direction, strategy, metrics),
        }
    }

    fn begin_mesh(&mut self, direction: Direction, metrics: GenieMetrics, content: Rect) {
        self.host.set_overlay_visible(false);
        self.host.set_inner_visible(true);
        self.host.ensure_positioned();
        self.positioned = true;

        let mut style = self.host.content_style();
        style.pointer_events = "none".to_owned();
        self.host.apply_content_style(&style);

        let ticket = CaptureTicket {
            op: self.op,
            pixel_ratio: self.host.pixel_ratio(),
            css_width: content.width,
            css_height: content.height,
        };
        self.active = Active::AwaitingCapture {
            op: self.op,
            direction,
            metrics,
        };
        self.host.request_capture(ticket);
    }

    /// Deliver the snapshot for `op`. Results for superseded operations are dropped.
    #[tracing::instrument(skip(self, result))]
    pub fn capture_resolved(&mut self, op: OperationId, result: GenieResult<CapturedImage>) {
        let (direction, metrics) = match &self.active {
            Active::AwaitingCapture {
                op: pending,
                direction,
                metrics,
            } if *pending == op && op == self.op => (*direction, *metrics),
            _ => {
                tracing::debug!(current = self.op.0, "stale capture dropped");
                return;
            }
        };
        self.active = Active::None;

        let image = match result {
            Ok(image) => image,
            Err(err) => {
                report_failure(&err, "capture failed; animation not played");
                self.finish(direction);
                return;
            }
        };
        if let Err(err) = self.start_playback(direction, metrics, &image) {
            report_failure(&err, "gpu setup failed; animation not played");
            self.finish(direction);
        }
    }

    fn start_playback(
        &mut self,
        direction: Direction,
        metrics: GenieMetrics,
        image: &CapturedImage,
    ) -> GenieResult<()> {
        let rect = self
            .host
            .measure_content()
            .ok_or_else(|| GenieError::capture("content unmounted during capture"))?;
        let options = build_play_options(
            &metrics,
            rect,
            direction,
            &self.config.gl,
            image.pixel_ratio,
        );
        let target = self.host.create_warp_target(options.size)?;

        self.host.set_inner_visible(false);
        self.host.set_overlay_visible(true);
        let now_ms = self.host.now_ms();
        match Playback::start(target, &mut self.host, image, options, now_ms) {
            Ok(playback) => {
                self.active = Active::Mesh {
                    playback,
                    direction,
                };
                Ok(())
            }
            Err(err) => {
                self.host.set_overlay_visible(false);
                self.host.set_inner_visible(true);
                Err(err)
            }
        }
    }

    fn begin_css(&mut self, direction: Direction, strategy: Strategy, metrics: GenieMetrics) {
        let mut style = self.host.content_style();
        style.transition = String::new();
        style.will_change = "transform, clip-path, opacity".to_owned();
        style.pointer_events = "none".to_owned();
        style.transform_origin = transform_origin(&metrics);
        self.host.apply_content_style(&style);

        let frame = self.host.request_frame();
        self.active = Active::Css(CssRun {
            direction,
            strategy,
            metrics,
            start_ms: None,
            frame,
        });
    }

    /// Display-refresh callback for a handle this controller requested.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) {
        match &mut self.active {
            Active::Mesh {
                playback,
                direction,
            } => {
                let direction = *direction;
                match playback.on_frame(handle, now_ms, &mut self.host) {
                    Ok(PlaybackStep::Finished) => {
                        self.active = Active::None;
                        self.finish(direction);
                    }
                    Ok(PlaybackStep::Running | PlaybackStep::Ignored) => {}
                    Err(err) => {
                        report_failure(&err, "mesh playback failed");
                        self.active = Active::None;
                        self.finish(direction);
                    }
                }
            }
            Active::Css(run) if run.frame == handle => {
                let run = *run;
                self.css_frame(run, now_ms);
            }
            _ => {}
        }
    }

    fn css_frame(&mut self, mut run: CssRun, now_ms: f64) {
        let start = *run.start_ms.get_or_insert(now_ms);
        let timeline = clamp01((now_ms - start) / self.config.css_duration_ms.max(1.0));
        let p = clamp01(run.direction.progress(self.config.css_ease.apply(timeline)));

        let mut style = self.host.content_style();
        style.transform = GenieTransform::at(&run.metrics, p, self.config.max_skew_deg).to_css();
        style.transform_origin = transform_origin(&run.metrics);
        style.clip_path = match run.strategy {
            Strategy::ClipPath => build_genie_path_with(&self.config.path, &run.metrics, p),
            Strategy::Circle | Strategy::Mesh => circle_clip(&run.metrics, p).to_css(),
        };
        style.opacity = fmt_coord(p);
        self.host.apply_content_style(&style);

        if timeline < 1.0 {
            run.frame = self.host.request_frame();
            self.active = Active::Css(run);
        } else {
            self.enter_settle(run.direction, &run.metrics);
        }
    }

    /// The last clip written by the frame loop stays on until the settle timer finishes.
    fn enter_settle(&mut self, direction: Direction, metrics: &GenieMetrics) {
        self.state = AnimationState::Settling;

        let mut style = self.host.content_style();
        style.transition = format!("transform {}ms ease-out", fmt_coord(self.config.settle_ms));
        match direction {
            Direction::Open => {
                style.transform = IDENTITY_TRANSFORM.to_owned();
                style.opacity = "1".to_owned();
            }
            Direction::Close => {
                style.transform = format!(
                    "translate3d(0px, 0px, 0px) scale({}, {}) skewY(-3deg)",
                    fmt_coord(metrics.scale_x),
                    fmt_coord(metrics.scale_y)
                );
                style.opacity = "0".to_owned();
            }
        }
        self.host.apply_content_style(&style);

        let timer = self.host.set_timeout(self.config.settle_ms);
        self.active = Active::Settle { timer, direction };
    }

    /// Timeout callback for a handle this controller armed.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if let Active::Settle { timer, direction } = self.active {
            if timer == handle {
                self.active = Active::None;
                self.finish(direction);
            }
        }
    }

    /// Tear down everything and restore the resting style. Later calls are ignored.
    #[tracing::instrument(skip(self))]
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.op = self.op.next();
        let direction = if self.is_open {
            Direction::Open
        } else {
            Direction::Close
        };
        let was_running = !self.active.is_none() || self.state != AnimationState::Idle;
        self.teardown();
        if was_running {
            self.finish(direction);
        }
        self.unmounted = true;
    }

    /// Stop whatever is running. Leaves the node visible and un-positioned.
    fn teardown(&mut self) {
        let active = std::mem::replace(&mut self.active, Active::None);
        let had_work = !active.is_none();
        match active {
            Active::None | Active::AwaitingCapture { .. } => {}
            Active::Mesh { mut playback, .. } => playback.cancel(&mut self.host),
            Active::Css(run) => self.host.cancel_frame(run.frame),
            Active::Settle { timer, .. } => self.host.clear_timeout(timer),
        }
        if had_work {
            // Overlay goes first so the two are never visible together.
            self.host.set_overlay_visible(false);
            self.host.set_inner_visible(true);
        }
        if self.positioned {
            self.host.restore_positioning();
            self.positioned = false;
        }
    }

    /// Land on the resting style for `direction` and go idle.
    fn finish(&mut self, direction: Direction) {
        self.teardown();
        self.host.set_overlay_visible(false);
        self.host.set_inner_visible(true);
        let style = self.resting.final_style(direction);
        self.host.apply_content_style(&style);
        self.state = AnimationState::Idle;
    }
}

/// Every failure still snaps to the resting state; only the log level differs.
fn report_failure(err: &GenieError, what: &str) {
    if err.is_recoverable() {
        tracing::warn!(error = %err, "{what}");
    } else {
        tracing::error!(error = %err, "{what}");
    }
}

#[cfg(test)]
#[path = "../tests/unit/controller.rs"]
mod tests;
