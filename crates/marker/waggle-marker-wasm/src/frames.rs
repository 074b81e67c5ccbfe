//! `requestAnimationFrame` scheduling for the driver.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_render::{request_animation_frame, AnimationFrame};

use waggle_marker_core::{FrameHandle, FrameScheduler};

type PendingFrames = Rc<RefCell<HashMap<FrameHandle, AnimationFrame>>>;

/// Frame source backed by the browser. Dropping a pending [`AnimationFrame`]
/// cancels it, so cancelling a handle is just removing it.
pub struct RafScheduler {
    has_window: bool,
    next: u32,
    pending: PendingFrames,
    on_frame: Rc<dyn Fn(f64)>,
}

impl RafScheduler {
    /// `on_frame` receives the timestamp of every frame that fires.
    pub fn new(has_window: bool, on_frame: Rc<dyn Fn(f64)>) -> Self {
        Self {
            has_window,
            next: 0,
            pending: Rc::new(RefCell::new(HashMap::new())),
            on_frame,
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if !self.has_window {
            return None;
        }
        let handle = FrameHandle(self.next);
        self.next = self.next.wrapping_add(1);

        let pending = Rc::downgrade(&self.pending);
        let on_frame = Rc::clone(&self.on_frame);
        let frame = request_animation_frame(move |timestamp| {
            // Already fired; removing it does not cancel anything.
            if let Some(pending) = pending.upgrade() {
                pending.borrow_mut().remove(&handle);
            }
            on_frame(timestamp);
        });
        self.pending.borrow_mut().insert(handle, frame);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.borrow_mut().remove(&handle).is_none() {
            log::trace!("cancel of unknown frame {handle:?}");
        }
    }
}
