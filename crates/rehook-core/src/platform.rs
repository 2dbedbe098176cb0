//! Platform abstraction for the hook runtime's scheduling needs.
//!
//! The runtime never renders on its own; it asks the host for a render pass
//! and the host drives `Instance::render`/`Instance::settle` when convenient.

/// Notifies the host that an instance wants another render pass.
///
/// Implementations must tolerate being called from outside the render pass,
/// including from event-delivery callbacks that run state setters.
pub trait RenderScheduler: Send + Sync {
    fn schedule_render(&self);
}
