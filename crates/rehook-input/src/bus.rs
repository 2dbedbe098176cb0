use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use log::{debug, trace};
use rehook_core::Callback;

use crate::event::Event;

type HandlerId = u64;

struct HandlerEntry {
    id: HandlerId,
    handler: Callback<Event>,
}

#[derive(Default)]
struct BusInner {
    handlers: RefCell<Vec<HandlerEntry>>,
    next_id: Cell<HandlerId>,
    delivering: Cell<bool>,
    queued: RefCell<VecDeque<Event>>,
    opened: Cell<u64>,
    closed: Cell<u64>,
}

/// Single-threaded publish/subscribe channel.
///
/// Cheap to clone; clones share the handler list. Events are delivered one at
/// a time: a publish issued from within a handler is queued and delivered
/// after the current event finishes its rounds.
#[derive(Clone, Default)]
pub struct InputBus {
    inner: Rc<BusInner>,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: Callback<Event>) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .handlers
            .borrow_mut()
            .push(HandlerEntry { id, handler });
        self.inner.opened.set(self.inner.opened.get() + 1);
        debug!("input bus: handler {id} subscribed");
        Subscription {
            bus: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn publish(&self, event: &Event) {
        if self.inner.delivering.replace(true) {
            self.inner.queued.borrow_mut().push_back(event.clone());
            return;
        }
        self.deliver(event);
        loop {
            let next = self.inner.queued.borrow_mut().pop_front();
            match next {
                Some(queued) => self.deliver(&queued),
                None => break,
            }
        }
        self.inner.delivering.set(false);
    }

    fn deliver(&self, event: &Event) {
        trace!("input bus: delivering {:?}", event.kind());
        let snapshot: Vec<(HandlerId, Callback<Event>)> = self
            .inner
            .handlers
            .borrow()
            .iter()
            .map(|entry| (entry.id, entry.handler.clone()))
            .collect();
        for (id, handler) in snapshot {
            // Re-check liveness so an unsubscribe issued mid-delivery is
            // honored before this handler's turn.
            let alive = self
                .inner
                .handlers
                .borrow()
                .iter()
                .any(|entry| entry.id == id);
            if alive {
                handler.invoke(event);
            }
        }
    }

    pub fn handler_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }

    pub fn subscriptions_opened(&self) -> u64 {
        self.inner.opened.get()
    }

    pub fn subscriptions_closed(&self) -> u64 {
        self.inner.closed.get()
    }
}

/// Registration handle returned by [`InputBus::subscribe`].
///
/// Unsubscribes explicitly or when dropped, whichever comes first.
pub struct Subscription {
    bus: Weak<BusInner>,
    id: Option<HandlerId>,
}

impl Subscription {
    /// Removes the handler; no delivery can reach it once this returns.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        let mut handlers = bus.handlers.borrow_mut();
        if let Some(index) = handlers.iter().position(|entry| entry.id == id) {
            handlers.remove(index);
            bus.closed.set(bus.closed.get() + 1);
            debug!("input bus: handler {id} unsubscribed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recording_handler(seen: &Rc<RefCell<Vec<String>>>) -> Callback<Event> {
        let seen = Rc::clone(seen);
        Callback::new(move |event: &Event| {
            seen.borrow_mut().push(event.value_or_default().to_owned());
        })
    }

    #[test]
    fn delivers_to_subscribed_handlers() {
        let bus = InputBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let subscription = bus.subscribe(recording_handler(&seen));

        bus.publish(&Event::submit("a"));
        bus.publish(&Event::submit("b"));
        assert_eq!(*seen.borrow(), ["a", "b"]);
        assert_eq!(bus.handler_count(), 1);

        subscription.unsubscribe();
        bus.publish(&Event::submit("c"));
        assert_eq!(*seen.borrow(), ["a", "b"]);
        assert_eq!(bus.handler_count(), 0);
        assert_eq!(bus.subscriptions_opened(), 1);
        assert_eq!(bus.subscriptions_closed(), 1);
    }

    #[test]
    fn dropping_the_subscription_unsubscribes() {
        let bus = InputBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let _subscription = bus.subscribe(recording_handler(&seen));
            bus.publish(&Event::submit("a"));
        }
        bus.publish(&Event::submit("b"));
        assert_eq!(*seen.borrow(), ["a"]);
        assert_eq!(bus.subscriptions_closed(), 1);
    }

    #[test]
    fn reentrant_publish_is_delivered_after_the_current_event() {
        let bus = InputBus::new();
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

        let reentrant = {
            let bus = bus.clone();
            let seen = Rc::clone(&seen);
            Callback::new(move |event: &Event| {
                seen.borrow_mut()
                    .push(format!("first:{}", event.value_or_default()));
                if event.value_or_default() == "outer" {
                    bus.publish(&Event::submit("inner"));
                }
            })
        };
        let _first = bus.subscribe(reentrant);

        let observer = {
            let seen = Rc::clone(&seen);
            Callback::new(move |event: &Event| {
                seen.borrow_mut()
                    .push(format!("second:{}", event.value_or_default()));
            })
        };
        let _second = bus.subscribe(observer);

        bus.publish(&Event::submit("outer"));
        assert_eq!(
            *seen.borrow(),
            ["first:outer", "second:outer", "first:inner", "second:inner"]
        );
    }

    #[test]
    fn unsubscribe_during_delivery_skips_the_removed_handler() {
        let bus = InputBus::new();
        let seen: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let remover = {
            let seen = Rc::clone(&seen);
            let victim = Rc::clone(&victim);
            Callback::new(move |_: &Event| {
                seen.borrow_mut().push("remover");
                if let Some(subscription) = victim.borrow_mut().take() {
                    subscription.unsubscribe();
                }
            })
        };
        let _first = bus.subscribe(remover);

        let removed = {
            let seen = Rc::clone(&seen);
            Callback::new(move |_: &Event| {
                seen.borrow_mut().push("removed");
            })
        };
        *victim.borrow_mut() = Some(bus.subscribe(removed));

        bus.publish(&Event::submit("x"));
        assert_eq!(*seen.borrow(), ["remover"]);
    }
}
