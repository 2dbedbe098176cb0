use std::cell::Cell;
use std::rc::Rc;

use rehook_core::{Instance, Scope, Services};
use rehook_input::{Event, InputBus};

/// Headless harness for exercising hook instances in tests.
///
/// Owns an instance wired to an [`InputBus`] and exposes helpers for driving
/// render passes and delivering events without a host loop. Hook outputs are
/// observed by capturing them from inside the content closure.
pub struct TestRule {
    instance: Instance,
    bus: InputBus,
    content: Option<Box<dyn FnMut(&mut Scope<'_>)>>,
    renders: Rc<Cell<usize>>,
}

impl TestRule {
    /// Create a rule whose service context contains a fresh bus.
    pub fn new() -> Self {
        Self::with_services(Services::new())
    }

    /// Create a rule from caller-provided services; a fresh bus is registered
    /// on top of them.
    pub fn with_services(mut services: Services) -> Self {
        let bus = InputBus::new();
        services.register(bus.clone());
        Self {
            instance: Instance::new(services),
            bus,
            content: None,
            renders: Rc::new(Cell::new(0)),
        }
    }

    /// Install the content closure and perform the initial render pass.
    pub fn set_content(&mut self, mut content: impl FnMut(&mut Scope<'_>) + 'static) {
        let renders = Rc::clone(&self.renders);
        let mut wrapped: Box<dyn FnMut(&mut Scope<'_>)> = Box::new(move |scope: &mut Scope<'_>| {
            renders.set(renders.get() + 1);
            content(scope);
        });
        self.instance.render(&mut *wrapped);
        self.content = Some(wrapped);
    }

    /// Force a render pass using the installed content.
    pub fn recomposition(&mut self) {
        let content = self.content.as_mut().expect("no content installed");
        self.instance.render(&mut **content);
    }

    /// Drive the instance until it has no pending work.
    pub fn pump_until_idle(&mut self) {
        let content = self.content.as_mut().expect("no content installed");
        self.instance.settle(&mut **content);
    }

    /// Publish an event on the rule's bus, then pump until idle: one
    /// delivery, fully rendered, the way a host loop would process it.
    pub fn deliver(&mut self, event: Event) {
        self.bus.publish(&event);
        self.pump_until_idle();
    }

    pub fn bus(&self) -> &InputBus {
        &self.bus
    }

    /// Number of render passes executed so far.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    /// Tear the instance down, running effect cleanups. The bus outlives the
    /// rule's instance; keep a clone to assert on post-teardown delivery.
    pub fn teardown(self) {
        self.instance.teardown();
    }
}

impl Default for TestRule {
    fn default() -> Self {
        Self::new()
    }
}
