use std::{collections::BTreeMap, fmt};

use vellum_core::Component;

/// The pages a binary can render, by name.
///
/// Route names in the configuration refer to these names.
#[derive(Default)]
pub struct Registry {
    pages: BTreeMap<String, Box<dyn Component>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page<C>(mut self, name: impl Into<String>, component: C) -> Self
    where
        C: Component + 'static,
    {
        self.pages.insert(name.into(), Box::new(component));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Component> {
        self.pages.get(name).map(|page| &**page)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
