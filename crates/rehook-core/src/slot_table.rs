use std::any::Any;

use crate::owned::Owned;

/// Positional storage for an instance's hook slots.
///
/// Slot identity is the call index: the cursor advances one slot per hook
/// call, so an instance that makes the same hook calls in the same order on
/// every render pass always lands on the same slots.
#[derive(Default)]
pub struct SlotTable {
    slots: Vec<Box<dyn Any>>,
    cursor: usize,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored at the cursor, initializing it on first use.
    ///
    /// A type mismatch at the cursor means the call order diverged from the
    /// previous render; everything from the cursor on is discarded and
    /// rebuilt.
    pub fn remember<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Owned<T> {
        let cursor = self.cursor;
        if cursor < self.slots.len() {
            if let Some(existing) = self.slots[cursor].downcast_ref::<Owned<T>>() {
                let existing = existing.clone();
                self.cursor += 1;
                return existing;
            }
            self.slots.truncate(cursor);
        }
        let owned = Owned::new(init());
        self.slots.push(Box::new(owned.clone()));
        self.cursor += 1;
        owned
    }

    /// Rewind the cursor for the next render pass.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Drop slots the pass that just ended no longer reached. Dropped effect
    /// slots run their stored cleanups here.
    pub fn trim_to_cursor(&mut self) {
        self.slots.truncate(self.cursor);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
