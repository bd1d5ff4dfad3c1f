use crate::animation::bezier::CubicBezier;
use crate::capture::CapturedImage;
use crate::foundation::error::GenieResult;
use crate::foundation::math::clamp01;
use crate::host::{FrameHandle, FrameScheduler};
use crate::render::mesh::GridMesh;
use crate::render::options::GeniePlayOptions;
use crate::render::shader::WarpUniforms;
use crate::render::target::WarpTarget;

/// Outcome of delivering one frame to a [`Playback`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStep {
    /// Frame drawn, another one requested.
    Running,
    /// Final frame drawn, completion callback run, resources released.
    Finished,
    /// Handle was stale or the playback had already ended.
    Ignored,
}

/// One mesh-warp run from prepare to release.
///
/// Owns its target exclusively. Resources are released exactly once: on completion, on
/// [`Playback::cancel`], on a draw failure, or on drop.
pub struct Playback {
    target: Box<dyn WarpTarget>,
    options: GeniePlayOptions,
    timing: CubicBezier,
    start_ms: f64,
    pending: Option<FrameHandle>,
    done: bool,
    on_done: Option<Box<dyn FnOnce()>>,
    frames_drawn: u32,
}

impl Playback {
    /// Upload the mesh and snapshot, then request the first frame.
    ///
    /// Elapsed time is measured from `now_ms`, so the first frame already shows progress. On
    /// mesh or upload failure the target is released before the error is returned.
    #[tracing::instrument(
        skip(target, scheduler, image, options),
        fields(direction = ?options.direction)
    )]
    pub fn start(
        mut target: Box<dyn WarpTarget>,
        scheduler: &mut dyn FrameScheduler,
        image: &CapturedImage,
        options: GeniePlayOptions,
        now_ms: f64,
    ) -> GenieResult<Self> {
        let mesh = match GridMesh::new(options.cols, options.rows) {
            Ok(mesh) => mesh,
            Err(err) => {
                target.release();
                return Err(err);
            }
        };
        let uniforms = WarpUniforms::from_options(&options);
        if let Err(err) = target.prepare(&mesh, image, &uniforms) {
            target.release();
            return Err(err);
        }
        tracing::debug!(
            cols = mesh.cols,
            rows = mesh.rows,
            w = options.size.w,
            h = options.size.h,
            "playback prepared"
        );

        let timing = CubicBezier::from_points(options.easing);
        let pending = Some(scheduler.request_frame());
        Ok(Self {
            target,
            options,
            timing,
            start_ms: now_ms,
            pending,
            done: false,
            on_done: None,
            frames_drawn: 0,
        })
    }

    /// Run `f` once, right before resources are released after the final frame.
    pub fn with_on_done(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_done = Some(Box::new(f));
        self
    }

    /// Advance to `now_ms`.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now_ms: f64,
        scheduler: &mut dyn FrameScheduler,
    ) -> GenieResult<PlaybackStep> {
        if self.done || self.pending != Some(handle) {
            return Ok(PlaybackStep::Ignored);
        }
        self.pending = None;

        let timeline = self.timeline_at(now_ms - self.start_ms);
        let eased = self.timing.solve(timeline);
        let progress = self.options.direction.progress(eased);

        if let Err(err) = self.target.draw(progress as f32) {
            self.finish();
            return Err(err);
        }
        self.frames_drawn += 1;

        if timeline < 1.0 {
            self.pending = Some(scheduler.request_frame());
            return Ok(PlaybackStep::Running);
        }

        if let Some(f) = self.on_done.take() {
            f();
        }
        self.finish();
        Ok(PlaybackStep::Finished)
    }

    /// Stop the loop and release resources. Safe to call any number of times.
    pub fn cancel(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        self.finish();
    }

    fn timeline_at(&self, elapsed_ms: f64) -> f64 {
        clamp01(elapsed_ms / self.options.duration_ms.max(1.0))
    }

    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        self.pending = None;
        self.on_done = None;
        self.target.release();
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn frames_drawn(&self) -> u32 {
        self.frames_drawn
    }

    pub fn options(&self) -> &GeniePlayOptions {
        &self.options
    }

    /// Read back the most recent frame.
    pub fn read_pixels(&mut self) -> GenieResult<crate::render::target::FrameRGBA> {
        self.target.read_pixels()
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/playback.rs"]
mod tests;
