use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::capture::CapturedImage;
use crate::foundation::core::{Point, Size, Vec2};
use crate::foundation::error::GenieError;
use crate::render::options::{Direction, Neck};
use crate::render::target::FrameRGBA;

#[derive(Default)]
struct Scheduler {
    next: u64,
    requested: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl FrameScheduler for Scheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let h = FrameHandle(self.next);
        self.requested.push(h);
        h
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }

    fn now_ms(&self) -> f64 {
        0.0
    }
}

#[derive(Default)]
struct Stats {
    releases: u32,
    progress: Vec<f32>,
    live: usize,
}

struct RecordingTarget {
    stats: Rc<RefCell<Stats>>,
    fail_prepare: bool,
    fail_draw: bool,
}

impl WarpTarget for RecordingTarget {
    fn prepare(&mut self, _: &GridMesh, _: &CapturedImage, _: &WarpUniforms) -> GenieResult<()> {
        if self.fail_prepare {
            return Err(GenieError::gpu("shader compile failed"));
        }
        self.stats.borrow_mut().live = 3;
        Ok(())
    }

    fn draw(&mut self, progress: f32) -> GenieResult<()> {
        if self.fail_draw {
            return Err(GenieError::gpu("context lost"));
        }
        self.stats.borrow_mut().progress.push(progress);
        Ok(())
    }

    fn release(&mut self) {
        let mut s = self.stats.borrow_mut();
        s.releases += 1;
        s.live = 0;
    }

    fn read_pixels(&mut self) -> GenieResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: 1,
            height: 1,
            data: vec![0; 4],
            premultiplied: true,
        })
    }

    fn live_resources(&self) -> usize {
        self.stats.borrow().live
    }

    fn size(&self) -> Size {
        Size::new(1, 1)
    }
}

fn recording_target() -> (Box<dyn WarpTarget>, Rc<RefCell<Stats>>) {
    let stats = Rc::new(RefCell::new(Stats::default()));
    let target = RecordingTarget {
        stats: stats.clone(),
        fail_prepare: false,
        fail_draw: false,
    };
    (Box::new(target), stats)
}

fn image() -> CapturedImage {
    CapturedImage::from_rgba(image::RgbaImage::new(2, 2), 1.0)
}

fn options(direction: Direction) -> GeniePlayOptions {
    GeniePlayOptions {
        duration_ms: 720.0,
        direction,
        origin_local: Point::new(10.0, -20.0),
        size: Size::new(40, 30),
        direction_vec: Vec2::new(0.0, 1.0),
        neck: Neck { min: 6.0, max: 12.0 },
        curve_strength: 4.8,
        cols: 4,
        rows: 3,
        release_range: [0.12, 0.95],
        easing: [0.23, 1.0, 0.32, 1.0],
    }
}

#[test]
fn runs_to_completion_and_releases_once() {
    let mut sched = Scheduler::default();
    let (target, stats) = recording_target();
    let done = Rc::new(Cell::new(0));
    let done_in = done.clone();
    let mut pb = Playback::start(target, &mut sched, &image(), options(Direction::Open), 1000.0)
        .unwrap()
        .with_on_done(move || done_in.set(done_in.get() + 1));
    assert_eq!(sched.requested.len(), 1);
    assert_eq!(stats.borrow().live, 3);

    let h = pb.pending_frame().unwrap();
    assert_eq!(pb.on_frame(h, 1000.0, &mut sched).unwrap(), PlaybackStep::Running);
    let h = pb.pending_frame().unwrap();
    assert_eq!(pb.on_frame(h, 1360.0, &mut sched).unwrap(), PlaybackStep::Running);
    let h = pb.pending_frame().unwrap();
    assert_eq!(pb.on_frame(h, 1720.0, &mut sched).unwrap(), PlaybackStep::Finished);

    assert!(pb.is_done());
    assert_eq!(done.get(), 1);
    assert_eq!(stats.borrow().releases, 1);
    assert_eq!(stats.borrow().live, 0);
    assert_eq!(pb.frames_drawn(), 3);

    let progress = stats.borrow().progress.clone();
    assert_eq!(progress[0], 0.0);
    assert!(progress[1] > 0.5 && progress[1] < 1.0);
    assert!((progress[2] - 1.0).abs() < 1e-6);

    pb.cancel(&mut sched);
    drop(pb);
    assert_eq!(stats.borrow().releases, 1);
    assert_eq!(done.get(), 1);
}

#[test]
fn closing_runs_progress_backwards() {
    let mut sched = Scheduler::default();
    let (target, stats) = recording_target();
    let mut pb =
        Playback::start(target, &mut sched, &image(), options(Direction::Close), 0.0).unwrap();
    let h = pb.pending_frame().unwrap();
    pb.on_frame(h, 0.0, &mut sched).unwrap();
    let h = pb.pending_frame().unwrap();
    pb.on_frame(h, 5000.0, &mut sched).unwrap();
    let progress = stats.borrow().progress.clone();
    assert!((progress[0] - 1.0).abs() < 1e-6);
    assert!(progress[1].abs() < 1e-6);
}

#[test]
fn stale_handles_are_ignored() {
    let mut sched = Scheduler::default();
    let (target, stats) = recording_target();
    let mut pb =
        Playback::start(target, &mut sched, &image(), options(Direction::Open), 0.0).unwrap();
    let step = pb.on_frame(FrameHandle(999), 0.0, &mut sched).unwrap();
    assert_eq!(step, PlaybackStep::Ignored);
    assert!(stats.borrow().progress.is_empty());
    assert!(pb.pending_frame().is_some());
}

#[test]
fn cancel_is_idempotent() {
    let mut sched = Scheduler::default();
    let (target, stats) = recording_target();
    let mut pb =
        Playback::start(target, &mut sched, &image(), options(Direction::Open), 0.0).unwrap();
    let first = pb.pending_frame().unwrap();

    pb.cancel(&mut sched);
    pb.cancel(&mut sched);

    assert_eq!(sched.cancelled, vec![first]);
    assert_eq!(stats.borrow().releases, 1);
    assert!(pb.pending_frame().is_none());
    assert_eq!(
        pb.on_frame(first, 0.0, &mut sched).unwrap(),
        PlaybackStep::Ignored
    );
    drop(pb);
    assert_eq!(stats.borrow().releases, 1);
}

#[test]
fn dropping_a_running_playback_releases() {
    let mut sched = Scheduler::default();
    let (target, stats) = recording_target();
    let pb = Playback::start(target, &mut sched, &image(), options(Direction::Open), 0.0).unwrap();
    drop(pb);
    assert_eq!(stats.borrow().releases, 1);
}

#[test]
fn prepare_failure_releases_and_requests_nothing() {
    let mut sched = Scheduler::default();
    let stats = Rc::new(RefCell::new(Stats::default()));
    let target = Box::new(RecordingTarget {
        stats: stats.clone(),
        fail_prepare: true,
        fail_draw: false,
    });
    let err = Playback::start(target, &mut sched, &image(), options(Direction::Open), 0.0)
        .err()
        .unwrap();
    assert!(matches!(err, GenieError::Gpu(_)));
    assert_eq!(stats.borrow().releases, 1);
    assert!(sched.requested.is_empty());
}

#[test]
fn draw_failure_ends_the_playback() {
    let mut sched = Scheduler::default();
    let stats = Rc::new(RefCell::new(Stats::default()));
    let target = Box::new(RecordingTarget {
        stats: stats.clone(),
        fail_prepare: false,
        fail_draw: true,
    });
    let mut pb =
        Playback::start(target, &mut sched, &image(), options(Direction::Open), 0.0).unwrap();
    let h = pb.pending_frame().unwrap();
    assert!(pb.on_frame(h, 0.0, &mut sched).is_err());
    assert!(pb.is_done());
    assert_eq!(stats.borrow().releases, 1);
    assert_eq!(sched.requested.len(), 1);
}

#[test]
fn zero_duration_finishes_on_the_first_frame() {
    let mut sched = Scheduler::default();
    let (target, stats) = recording_target();
    let mut opts = options(Direction::Open);
    opts.duration_ms = 0.0;
    let mut pb = Playback::start(target, &mut sched, &image(), opts, 100.0).unwrap();
    let h = pb.pending_frame().unwrap();
    assert_eq!(pb.on_frame(h, 116.0, &mut sched).unwrap(), PlaybackStep::Finished);
    assert_eq!(stats.borrow().progress, vec![1.0]);
    assert_eq!(stats.borrow().releases, 1);
}

#[test]
fn first_frame_measures_elapsed_time_from_start() {
    let mut sched = Scheduler::default();
    let (target, stats) = recording_target();
    let mut pb =
        Playback::start(target, &mut sched, &image(), options(Direction::Open), 500.0).unwrap();
    let h = pb.pending_frame().unwrap();
    assert_eq!(pb.on_frame(h, 860.0, &mut sched).unwrap(), PlaybackStep::Running);
    let first = stats.borrow().progress[0];
    assert!(first > 0.5 && first < 1.0, "{first}");
}

#[test]
fn frame_stamped_before_start_clamps_to_zero() {
    let mut sched = Scheduler::default();
    let (target, stats) = recording_target();
    let mut pb =
        Playback::start(target, &mut sched, &image(), options(Direction::Open), 500.0).unwrap();
    let h = pb.pending_frame().unwrap();
    pb.on_frame(h, 490.0, &mut sched).unwrap();
    assert_eq!(stats.borrow().progress, vec![0.0]);
}
