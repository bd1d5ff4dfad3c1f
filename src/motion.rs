use std::rc::Rc;

use crate::capture::CapturedImage;
use crate::controller::{ControllerConfig, GenieController};
use crate::foundation::core::{OperationId, Point};
use crate::foundation::error::GenieResult;
use crate::host::{FrameHandle, Host, TimerHandle};
use crate::root::{GenieRoot, Measure};

/// Keys the instance reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Where a pointer-down landed relative to the instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Content,
    Trigger,
    Outside,
}

/// Root state plus controller: the whole instance behind one handle.
///
/// Every close request (API, Escape, outside pointer) goes through [`GenieMotion::close`].
pub struct GenieMotion<H: Host> {
    root: GenieRoot,
    controller: GenieController<H>,
}

impl<H: Host> GenieMotion<H> {
    pub fn new(id: impl Into<String>, host: H, config: ControllerConfig) -> Self {
        Self {
            root: GenieRoot::new(id),
            controller: GenieController::new(host, config),
        }
    }

    pub fn root(&self) -> &GenieRoot {
        &self.root
    }

    pub fn controller(&self) -> &GenieController<H> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GenieController<H> {
        &mut self.controller
    }

    pub fn is_open(&self) -> bool {
        self.root.is_open()
    }

    pub fn open(&mut self, trigger: &Rc<dyn Measure>) {
        let origin = self.root.open(trigger);
        self.controller.set_open(true, origin);
    }

    pub fn open_at(&mut self, point: Point, width: f64, height: f64) {
        let origin = self.root.open_at(point, width, height);
        self.controller.set_open(true, Some(origin));
    }

    pub fn close(&mut self) {
        let origin = self.root.close();
        self.controller.set_open(false, origin);
    }

    pub fn toggle(&mut self, trigger: &Rc<dyn Measure>) {
        if self.root.is_open() {
            self.close();
        } else {
            self.open(trigger);
        }
    }

    /// Returns whether the key was consumed.
    pub fn key_down(&mut self, key: Key) -> bool {
        if key == Key::Escape && self.root.is_open() {
            self.close();
            return true;
        }
        false
    }

    /// Returns whether the pointer-down closed the instance.
    pub fn pointer_down(&mut self, target: PointerTarget) -> bool {
        if target == PointerTarget::Outside && self.root.is_open() {
            self.close();
            return true;
        }
        false
    }

    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) {
        self.controller.on_frame(handle, now_ms);
    }

    pub fn on_timer(&mut self, handle: TimerHandle) {
        self.controller.on_timer(handle);
    }

    pub fn capture_resolved(&mut self, op: OperationId, result: GenieResult<CapturedImage>) {
        self.controller.capture_resolved(op, result);
    }

    pub fn unmount(&mut self) {
        self.controller.unmount();
    }
}
