use std::any::{Any, TypeId};
use std::rc::Rc;

use crate::collections::map;

/// Typed service context handed to an instance at construction.
///
/// Lookup is keyed by the service's type, so a call site names the interface
/// it wants and a misspelled registration cannot exist; the only remaining
/// failure mode is an absent registration, surfaced as `None`.
#[derive(Default)]
pub struct Services {
    values: map::HashMap<TypeId, Rc<dyn Any>, map::DefaultState>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: 'static>(&mut self, service: T) {
        self.values.insert(TypeId::of::<T>(), Rc::new(service));
    }

    pub fn get<T: 'static>(&self) -> Option<Rc<T>> {
        self.values
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }
}
