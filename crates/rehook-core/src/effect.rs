use crate::owned::Owned;

/// Backing storage for one effect slot: the dependency value from the last
/// run and the cleanup it returned.
pub(crate) struct EffectState<D> {
    deps: Option<D>,
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl<D> Default for EffectState<D> {
    fn default() -> Self {
        Self {
            deps: None,
            cleanup: None,
        }
    }
}

impl<D: PartialEq> EffectState<D> {
    pub(crate) fn should_run(&self, deps: &D) -> bool {
        match &self.deps {
            Some(current) => current != deps,
            None => true,
        }
    }

    pub(crate) fn set_deps(&mut self, deps: D) {
        self.deps = Some(deps);
    }
}

impl<D> EffectState<D> {
    pub(crate) fn set_cleanup(&mut self, cleanup: Option<Box<dyn FnOnce()>>) {
        self.cleanup = cleanup;
    }

    pub(crate) fn take_cleanup(&mut self) -> Option<Box<dyn FnOnce()>> {
        self.cleanup.take()
    }

    fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl<D> Drop for EffectState<D> {
    fn drop(&mut self) {
        self.run_cleanup();
    }
}

/// Passed to an effect body so it can hand back a cleanup.
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectScope;

impl EffectScope {
    pub fn on_cleanup(&self, cleanup: impl FnOnce() + 'static) -> EffectCleanup {
        EffectCleanup {
            cleanup: Some(Box::new(cleanup)),
        }
    }
}

/// Result of an effect body: an optional cleanup that runs before the slot's
/// next invocation and unconditionally at teardown.
pub struct EffectCleanup {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl EffectCleanup {
    pub fn none() -> Self {
        Self { cleanup: None }
    }

    fn into_cleanup(self) -> Option<Box<dyn FnOnce()>> {
        self.cleanup
    }
}

impl Default for EffectCleanup {
    fn default() -> Self {
        Self::none()
    }
}

/// Builds the post-render runner for an effect whose dependencies changed.
///
/// The stored cleanup runs first, outside any slot borrow, then the body; the
/// cleanup it returns is stashed for the next run.
pub(crate) fn runner<D: 'static>(
    state: Owned<EffectState<D>>,
    effect: impl FnOnce(EffectScope) -> EffectCleanup + 'static,
) -> Box<dyn FnOnce()> {
    let mut effect_opt = Some(effect);
    Box::new(move || {
        if let Some(effect) = effect_opt.take() {
            if let Some(cleanup) = state.update(|state| state.take_cleanup()) {
                cleanup();
            }
            let result = effect(EffectScope);
            state.update(|state| state.set_cleanup(result.into_cleanup()));
        }
    })
}
