//! Input bus collaborator for rehook.
//!
//! Delivers typed events serially to subscribed handlers. Unsubscription
//! takes effect before it returns: once `Subscription::unsubscribe` (or the
//! handle's drop) completes, the handler cannot be invoked again.

pub mod bus;
pub mod event;

pub use bus::{InputBus, Subscription};
pub use event::{Event, SUBMIT};
