//! Frame scheduling abstraction
//!
//! A [`FrameScheduler`] invokes a callback once, with a timestamp in
//! milliseconds, at roughly display-refresh cadence. The browser
//! implementation wraps `requestAnimationFrame`; [`ManualScheduler`] queues
//! callbacks until its owner fires them, which is what the native driver and
//! the tests use.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::Result;

/// One-shot frame callback, receives the frame timestamp in ms
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Handle of a requested frame, valid until it fires or is cancelled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub i32);

pub trait FrameScheduler {
    /// Register `callback` for the next frame
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameId>;

    /// Deregister a pending frame; unknown or already fired ids are ignored
    fn cancel_frame(&self, id: FrameId);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Rc<S> {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameId> {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, id: FrameId) {
        (**self).cancel_frame(id)
    }
}

/// Scheduler whose frames run only when [`ManualScheduler::fire`] is called.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<(FrameId, FrameCallback)>>,
    next_id: Cell<i32>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback registered before this call.
    ///
    /// Callbacks requested while firing wait for the next call, so one
    /// `fire` is one frame. Returns the number of callbacks run.
    pub fn fire(&self, timestamp_ms: f64) -> usize {
        let due: Vec<(FrameId, FrameCallback)> = self.queue.borrow_mut().drain(..).collect();
        let count = due.len();
        for (_, callback) in due {
            callback(timestamp_ms);
        }
        count
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Dequeue the pending callbacks without running them, as a host does
    /// right before dispatching a frame.
    pub fn take_pending(&self) -> Vec<FrameCallback> {
        self.queue.borrow_mut().drain(..).map(|(_, cb)| cb).collect()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameId> {
        let id = FrameId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.queue.borrow_mut().push_back((id, callback));
        Ok(id)
    }

    fn cancel_frame(&self, id: FrameId) {
        self.queue.borrow_mut().retain(|(queued, _)| *queued != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_runs_only_already_queued() {
        let scheduler = Rc::new(ManualScheduler::new());
        let hits = Rc::new(Cell::new(0));

        let (s, h) = (scheduler.clone(), hits.clone());
        scheduler
            .request_frame(Box::new(move |_| {
                h.set(h.get() + 1);
                let h2 = h.clone();
                // Re-arm from inside the callback
                s.request_frame(Box::new(move |_| h2.set(h2.get() + 10))).unwrap();
            }))
            .unwrap();

        assert_eq!(scheduler.fire(16.0), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.fire(32.0), 1);
        assert_eq!(hits.get(), 11);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_removes_specific_frame() {
        let scheduler = ManualScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s1 = seen.clone();
        let a = scheduler.request_frame(Box::new(move |_| s1.borrow_mut().push("a"))).unwrap();
        let s2 = seen.clone();
        let b = scheduler.request_frame(Box::new(move |_| s2.borrow_mut().push("b"))).unwrap();
        assert_ne!(a, b);

        scheduler.cancel_frame(a);
        scheduler.fire(0.0);
        assert_eq!(*seen.borrow(), vec!["b"]);
    }

    #[test]
    fn test_callback_receives_timestamp() {
        let scheduler = ManualScheduler::new();
        let ts = Rc::new(Cell::new(0.0));
        let t = ts.clone();
        scheduler.request_frame(Box::new(move |now| t.set(now))).unwrap();
        scheduler.fire(1234.5);
        assert_eq!(ts.get(), 1234.5);
    }
}
