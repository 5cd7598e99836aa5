//! Self-rescheduling frame loop with explicit cancellation.
//!
//! Each activation checks the loop state first, draws exactly one frame and
//! then requests its own next activation, so frames never overlap. Scheduler
//! callbacks hold only a weak reference to the loop: once the [`FrameLoop`]
//! is stopped or dropped, a callback that was already in flight returns
//! without touching the surface.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, trace, warn};

use super::field::{FrameReport, ParticleField};
use super::scheduler::{FrameId, FrameScheduler};
use super::stats::FpsCounter;
use super::surface::Surface;
use crate::loop_state::LoopState;

pub struct FrameLoop<S: Surface + 'static, C: FrameScheduler + 'static> {
    inner: Rc<LoopInner<S, C>>,
}

struct LoopInner<S, C> {
    field: RefCell<ParticleField>,
    surface: RefCell<S>,
    scheduler: C,
    state: Cell<LoopState>,
    /// Frame requested but not yet fired
    pending: Cell<Option<FrameId>>,
    frames: Cell<u64>,
    fps: RefCell<FpsCounter>,
    last_report: Cell<FrameReport>,
}

impl<S: Surface + 'static, C: FrameScheduler + 'static> FrameLoop<S, C> {
    pub fn new(field: ParticleField, surface: S, scheduler: C) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                field: RefCell::new(field),
                surface: RefCell::new(surface),
                scheduler,
                state: Cell::new(LoopState::Idle),
                pending: Cell::new(None),
                frames: Cell::new(0),
                fps: RefCell::new(FpsCounter::new()),
                last_report: Cell::new(FrameReport::default()),
            }),
        }
    }

    /// Request the first frame. Only valid once, from `Idle`.
    pub fn start(&self) {
        match self.inner.state.get() {
            LoopState::Idle => {
                self.inner.state.set(LoopState::Running);
                info!(particles = self.particle_count(), "Frame loop started");
                LoopInner::schedule(&self.inner);
            }
            state => warn!(?state, "Frame loop start ignored"),
        }
    }

    /// Stop the loop and deregister the pending frame.
    pub fn stop(&self) {
        if self.inner.state.get() == LoopState::Stopped {
            return;
        }
        self.inner.state.set(LoopState::Stopped);
        if let Some(id) = self.inner.pending.take() {
            debug!(?id, "Cancelling pending frame");
            self.inner.scheduler.cancel_frame(id);
        }
        info!(frames = self.inner.frames.get(), "Frame loop stopped");
    }

    /// Resize the surface, then regenerate the particle set for it
    pub fn resize(&self, width: u32, height: u32) {
        self.inner.surface.borrow_mut().set_size(width, height);
        self.inner.field.borrow_mut().resize(width, height);
    }

    pub fn state(&self) -> LoopState {
        self.inner.state.get()
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.inner.frames.get()
    }

    pub fn fps(&self) -> f64 {
        self.inner.fps.borrow().fps()
    }

    pub fn last_report(&self) -> FrameReport {
        self.inner.last_report.get()
    }

    pub fn particle_count(&self) -> usize {
        self.inner.field.borrow().particles().len()
    }

    pub fn with_field<R>(&self, f: impl FnOnce(&mut ParticleField) -> R) -> R {
        f(&mut self.inner.field.borrow_mut())
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.inner.surface.borrow_mut())
    }

    pub fn scheduler(&self) -> &C {
        &self.inner.scheduler
    }
}

impl<S: Surface + 'static, C: FrameScheduler + 'static> Drop for FrameLoop<S, C> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: Surface + 'static, C: FrameScheduler + 'static> LoopInner<S, C> {
    fn schedule(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        let request = this.scheduler.request_frame(Box::new(move |timestamp| {
            if let Some(inner) = weak.upgrade() {
                LoopInner::activate(&inner, timestamp);
            }
        }));
        match request {
            Ok(id) => this.pending.set(Some(id)),
            Err(e) => {
                error!(error = %e, "Failed to request frame, stopping loop");
                this.state.set(LoopState::Stopped);
            }
        }
    }

    fn activate(this: &Rc<Self>, timestamp: f64) {
        if !this.state.get().is_running() {
            trace!(timestamp, "Frame fired after stop, ignored");
            return;
        }
        this.pending.set(None);

        let report = {
            let mut surface = this.surface.borrow_mut();
            this.field.borrow_mut().tick(&mut *surface)
        };
        this.frames.set(this.frames.get() + 1);
        this.fps.borrow_mut().tick(timestamp);
        this.last_report.set(report);

        Self::schedule(this);
    }
}
