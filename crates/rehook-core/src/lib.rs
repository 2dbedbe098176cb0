#![doc = r"Core runtime pieces for the rehook instance model.

A component instance owns an ordered table of hook slots and re-runs its
component function as render passes. State setters called from outside a pass
(event handlers, observers) only queue transitions; the next pass folds them,
re-renders, and then runs any dependency-gated effects."]

pub mod callback;
pub mod collections;
pub mod effect;
pub mod owned;
pub mod platform;
pub mod runtime;
pub mod services;
pub mod slot_table;
pub mod state;

pub use callback::Callback;
pub use effect::{EffectCleanup, EffectScope};
pub use owned::Owned;
pub use platform::RenderScheduler;
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle};
pub use services::Services;
pub use slot_table::SlotTable;
pub use state::SetState;

use std::any::type_name;
use std::rc::Rc;
use std::sync::Arc;

use log::debug;

use callback::CallbackSlot;
use effect::EffectState;
use state::StateCell;

/// Render context threaded through a component function.
///
/// Every `use_*` call claims the next hook slot, so a component must make the
/// same hook calls in the same order on every pass.
pub struct Scope<'a> {
    slots: &'a mut SlotTable,
    runtime: RuntimeHandle,
    services: &'a Services,
    side_effects: Vec<Box<dyn FnOnce()>>,
}

impl<'a> Scope<'a> {
    fn new(slots: &'a mut SlotTable, runtime: RuntimeHandle, services: &'a Services) -> Self {
        Self {
            slots,
            runtime,
            services,
            side_effects: Vec::new(),
        }
    }

    /// Positional slot primitive: initializes on first use, returns the
    /// stored value on every later pass.
    pub fn remember<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Owned<T> {
        self.slots.remember(init)
    }

    /// Persistent state for this slot.
    ///
    /// Returns the current value and a setter. The setter only queues a
    /// transition; use its `update` form whenever the next value depends on
    /// the previous one, so queued transitions compose instead of clobbering
    /// each other. A transition that folds to an equal value causes no
    /// re-render.
    pub fn use_state<T>(&mut self, init: impl FnOnce() -> T) -> (T, SetState<T>)
    where
        T: Clone + PartialEq + 'static,
    {
        let runtime = self.runtime.clone();
        let cell = self.slots.remember(|| StateCell::new(init(), runtime));
        cell.with(|cell| (cell.value(), cell.setter()))
    }

    /// Returns a handler whose identity is stable across passes as long as
    /// `deps` compares equal to the previous pass's value.
    pub fn use_callback<E, D, F>(&mut self, deps: D, f: F) -> Callback<E>
    where
        E: 'static,
        D: PartialEq + 'static,
        F: Fn(&E) + 'static,
    {
        let mut fresh = Some((deps, f));
        let slot = self.slots.remember(|| {
            let (deps, f) = fresh.take().expect("slot init runs at most once");
            CallbackSlot {
                deps,
                callback: Callback::new(f),
            }
        });
        if let Some((deps, f)) = fresh {
            slot.update(|slot| {
                if slot.deps != deps {
                    slot.deps = deps;
                    slot.callback = Callback::new(f);
                }
            });
        }
        slot.with(|slot| slot.callback.clone())
    }

    /// Dependency-gated side effect.
    ///
    /// The body runs after the current pass completes, on the first pass and
    /// whenever `deps` differs from the previous pass's value. The cleanup it
    /// returns runs before the slot's next body and unconditionally at
    /// teardown.
    pub fn use_effect<D, F>(&mut self, deps: D, effect: F)
    where
        D: PartialEq + 'static,
        F: FnOnce(EffectScope) -> EffectCleanup + 'static,
    {
        let state = self.slots.remember(EffectState::<D>::default);
        if state.with(|state| state.should_run(&deps)) {
            state.update(|state| state.set_deps(deps));
            self.side_effects.push(effect::runner(state, effect));
        }
    }

    /// Resolve a service registered at instance construction.
    pub fn service<T: 'static>(&self) -> Rc<T> {
        self.try_service::<T>()
            .unwrap_or_else(|| panic!("no service registered for {}", type_name::<T>()))
    }

    pub fn try_service<T: 'static>(&self) -> Option<Rc<T>> {
        self.services.get::<T>()
    }

    fn take_side_effects(&mut self) -> Vec<Box<dyn FnOnce()>> {
        std::mem::take(&mut self.side_effects)
    }
}

/// Upper bound on consecutive render passes in [`Instance::settle`]. An
/// effect that unconditionally writes state would otherwise loop forever.
const MAX_SETTLE_PASSES: usize = 64;

/// A component instance: persistent identity across render passes.
///
/// Owns the hook slots, the scheduling state, and the service context. Hosts
/// drive it by calling [`Instance::render`] for an initial pass and
/// [`Instance::settle`] whenever [`Instance::should_render`] reports pending
/// work.
pub struct Instance {
    slots: SlotTable,
    runtime: Runtime,
    services: Services,
}

impl Instance {
    pub fn new(services: Services) -> Self {
        Self::with_scheduler(services, Arc::new(DefaultScheduler))
    }

    pub fn with_scheduler(services: Services, scheduler: Arc<dyn RenderScheduler>) -> Self {
        Self {
            slots: SlotTable::new(),
            runtime: Runtime::new(scheduler),
            services,
        }
    }

    /// Run one render pass unconditionally: fold queued state transitions,
    /// evaluate the component function, then run registered effects in
    /// registration order.
    pub fn render<R>(&mut self, mut content: impl FnMut(&mut Scope<'_>) -> R) -> R {
        self.runtime.apply_pending();
        self.render_pass(&mut content)
    }

    fn render_pass<R>(&mut self, content: &mut impl FnMut(&mut Scope<'_>) -> R) -> R {
        self.slots.reset();
        let (result, side_effects) = {
            let mut scope = Scope::new(&mut self.slots, self.runtime.handle(), &self.services);
            let result = content(&mut scope);
            let side_effects = scope.take_side_effects();
            (result, side_effects)
        };
        self.slots.trim_to_cursor();
        for effect in side_effects {
            effect();
        }
        self.runtime.clear_if_idle();
        result
    }

    /// Re-render while the runtime is dirty.
    ///
    /// Passes whose queued transitions fold to unchanged values are skipped
    /// entirely. Returns the last pass's output, or `None` when no pass ran.
    pub fn settle<R>(&mut self, mut content: impl FnMut(&mut Scope<'_>) -> R) -> Option<R> {
        let mut result = None;
        let mut passes = 0usize;
        while self.runtime.take_needs_render() {
            passes += 1;
            if passes > MAX_SETTLE_PASSES {
                panic!("instance did not settle after {MAX_SETTLE_PASSES} render passes");
            }
            if self.runtime.apply_pending() {
                result = Some(self.render_pass(&mut content));
            }
        }
        result
    }

    pub fn should_render(&self) -> bool {
        self.runtime.needs_render() || self.runtime.has_pending()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    /// Drop all hook slots, running every effect's stored cleanup. Setters
    /// that outlive the instance become no-ops.
    pub fn teardown(self) {
        debug!("instance teardown; running effect cleanups");
    }
}
