use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use log::trace;

use crate::platform::RenderScheduler;

/// A queued state commit. Folds a cell's pending updates over its current
/// value and reports whether the value actually changed.
pub(crate) type Commit = Box<dyn FnOnce() -> bool>;

struct RuntimeInner {
    scheduler: Arc<dyn RenderScheduler>,
    needs_render: Cell<bool>,
    commits: RefCell<Vec<Commit>>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RenderScheduler>) -> Self {
        Self {
            scheduler,
            needs_render: Cell::new(false),
            commits: RefCell::new(Vec::new()),
        }
    }

    fn schedule(&self) {
        if !self.needs_render.replace(true) {
            trace!("render pass scheduled");
        }
        self.scheduler.schedule_render();
    }

    fn enqueue_commit(&self, commit: Commit) {
        self.commits.borrow_mut().push(commit);
    }

    /// Drains the commits queued so far; commits enqueued while folding (for
    /// example by a transition that re-invokes a setter) stay queued for the
    /// next pass.
    fn apply_pending(&self) -> bool {
        let pending: Vec<Commit> = self.commits.borrow_mut().drain(..).collect();
        let mut changed = false;
        for commit in pending {
            changed |= commit();
        }
        changed
    }

    fn has_pending(&self) -> bool {
        !self.commits.borrow().is_empty()
    }
}

pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RenderScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle(Rc::downgrade(&self.inner))
    }

    pub fn needs_render(&self) -> bool {
        self.inner.needs_render.get()
    }

    pub fn has_pending(&self) -> bool {
        self.inner.has_pending()
    }

    pub(crate) fn take_needs_render(&self) -> bool {
        self.inner.needs_render.replace(false)
    }

    pub(crate) fn clear_if_idle(&self) {
        if !self.inner.has_pending() {
            self.inner.needs_render.set(false);
        }
    }

    pub(crate) fn apply_pending(&self) -> bool {
        self.inner.apply_pending()
    }
}

/// Weak handle onto a runtime. Every operation becomes a no-op once the
/// owning instance is gone, so setters and schedulers captured by external
/// callbacks can outlive the instance safely.
#[derive(Clone)]
pub struct RuntimeHandle(Weak<RuntimeInner>);

impl RuntimeHandle {
    pub fn schedule(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.schedule();
        }
    }

    pub(crate) fn enqueue_commit(&self, commit: Commit) {
        if let Some(inner) = self.0.upgrade() {
            inner.enqueue_commit(commit);
        }
    }
}

/// No-op scheduler for hosts that poll `Instance::should_render` themselves.
#[derive(Default)]
pub struct DefaultScheduler;

impl RenderScheduler for DefaultScheduler {
    fn schedule_render(&self) {}
}

#[cfg(test)]
#[derive(Default)]
pub struct TestScheduler {
    requests: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl TestScheduler {
    pub fn requests(&self) -> usize {
        self.requests.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl RenderScheduler for TestScheduler {
    fn schedule_render(&self) {
        self.requests
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}
