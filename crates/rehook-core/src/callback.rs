use std::fmt;
use std::rc::Rc;

/// Shared handle to an event handler with identity-based equality.
///
/// Two handles compare equal only when they point at the same underlying
/// closure, which is what lets dependency-gated effects key on a memoized
/// callback without seeing spurious changes.
pub struct Callback<E> {
    inner: Rc<dyn Fn(&E)>,
}

impl<E> Callback<E> {
    pub fn new(f: impl Fn(&E) + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    pub fn invoke(&self, event: &E) {
        (self.inner)(event);
    }
}

impl<E> Clone for Callback<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> PartialEq for Callback<E> {
    fn eq(&self, other: &Self) -> bool {
        // Compare data pointers only; vtable addresses are not stable.
        std::ptr::eq(
            Rc::as_ptr(&self.inner) as *const (),
            Rc::as_ptr(&other.inner) as *const (),
        )
    }
}

impl<E> Eq for Callback<E> {}

impl<E> fmt::Debug for Callback<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("ptr", &(Rc::as_ptr(&self.inner) as *const ()))
            .finish()
    }
}

pub(crate) struct CallbackSlot<E, D> {
    pub(crate) deps: D,
    pub(crate) callback: Callback<E>,
}
