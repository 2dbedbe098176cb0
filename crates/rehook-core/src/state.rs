use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::runtime::RuntimeHandle;

enum Update<T> {
    Assign(T),
    Transform(Box<dyn FnOnce(&T) -> T>),
}

pub(crate) struct StateCellInner<T> {
    value: RefCell<T>,
    pending: RefCell<Vec<Update<T>>>,
    enqueued: Cell<bool>,
    runtime: RuntimeHandle,
}

/// Persistent per-slot state. Reads happen during the render pass; writes go
/// through [`SetState`], which only queues transitions.
pub(crate) struct StateCell<T> {
    inner: Rc<StateCellInner<T>>,
}

impl<T: Clone + PartialEq + 'static> StateCell<T> {
    pub(crate) fn new(value: T, runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(StateCellInner {
                value: RefCell::new(value),
                pending: RefCell::new(Vec::new()),
                enqueued: Cell::new(false),
                runtime,
            }),
        }
    }

    pub(crate) fn value(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub(crate) fn setter(&self) -> SetState<T> {
        SetState {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Setter half of a state cell.
///
/// Calls queue a transition and schedule a render pass; the runtime folds all
/// queued transitions over the previous value before the next pass, so
/// updates that depend on the prior value must use [`SetState::update`].
/// After instance teardown every call is a silent no-op.
pub struct SetState<T> {
    inner: Weak<StateCellInner<T>>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> SetState<T> {
    /// Queue a replacement value.
    pub fn set(&self, value: T) {
        self.push(Update::Assign(value));
    }

    /// Queue a transition of the previous value.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.push(Update::Transform(Box::new(f)));
    }

    fn push(&self, update: Update<T>) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        inner.pending.borrow_mut().push(update);
        if !inner.enqueued.replace(true) {
            let cell = Rc::downgrade(&inner);
            inner.runtime.enqueue_commit(Box::new(move || {
                cell.upgrade().map(|cell| commit(&cell)).unwrap_or(false)
            }));
        }
        inner.runtime.schedule();
    }
}

fn commit<T: Clone + PartialEq>(inner: &StateCellInner<T>) -> bool {
    inner.enqueued.set(false);
    let pending: Vec<Update<T>> = inner.pending.borrow_mut().drain(..).collect();
    if pending.is_empty() {
        return false;
    }
    let mut value = inner.value.borrow_mut();
    let mut next = value.clone();
    for update in pending {
        next = match update {
            Update::Assign(new_value) => new_value,
            Update::Transform(f) => f(&next),
        };
    }
    if next == *value {
        return false;
    }
    *value = next;
    true
}
