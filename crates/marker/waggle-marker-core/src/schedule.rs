//! Host frame scheduling.
//!
//! The driver never owns a clock. It asks the host for "one callback on the
//! next frame" and the host answers by calling [`crate::Driver::on_frame`]
//! with that frame's timestamp.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Opaque id of a pending frame callback.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u32);

/// The host's animation-frame facility.
pub trait FrameScheduler {
    /// Register a callback for the next frame. `None` if the host cannot.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    /// Deregister a previously requested callback.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for Box<T> {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }
}

/// Bookkeeping shared between a [`ManualScheduler`] and whoever pumps it.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next: u32,
    /// Callbacks requested and not yet fired or cancelled.
    pub pending: Vec<FrameHandle>,
    pub requested: usize,
    pub cancelled: Vec<FrameHandle>,
}

/// Scheduler for headless hosts and tests: frames fire only when the owner
/// pumps them, so time is fully controlled by the caller.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    frames: Rc<RefCell<ManualFrames>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the scheduling log.
    pub fn frames(&self) -> Rc<RefCell<ManualFrames>> {
        Rc::clone(&self.frames)
    }

    /// Number of callbacks currently registered.
    pub fn pending_count(&self) -> usize {
        self.frames.borrow().pending.len()
    }

    /// Remove and return the oldest pending callback, as a host does right
    /// before invoking it.
    pub fn take_next(&self) -> Option<FrameHandle> {
        let mut f = self.frames.borrow_mut();
        if f.pending.is_empty() {
            None
        } else {
            Some(f.pending.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let mut f = self.frames.borrow_mut();
        let h = FrameHandle(f.next);
        f.next = f.next.wrapping_add(1);
        f.pending.push(h);
        f.requested += 1;
        Some(h)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut f = self.frames.borrow_mut();
        f.pending.retain(|h| *h != handle);
        f.cancelled.push(handle);
    }
}

/// Scheduler that never provides frames; moves complete immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFrames;

impl FrameScheduler for NoFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        None
    }

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}
