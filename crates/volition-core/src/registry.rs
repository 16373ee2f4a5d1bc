use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::action::ActionClass;
use crate::provider::{InputProvider, ParamProvider, QueryProvider};
use crate::tag::Tag;
use crate::world::WorldMut;

/// Process-wide table mapping tags to providers.
///
/// Shared via `Arc` between all brains of one world type; read-mostly, with
/// registration expected at startup. Re-registering a tag keeps the last
/// write and logs a warning. Lookups are exact; parent-tag matching happens
/// only during auto-parameter resolution.
pub struct Registry<W: WorldMut> {
    inputs: RwLock<HashMap<Tag, Arc<dyn InputProvider<W>>>>,
    queries: RwLock<HashMap<Tag, Arc<dyn QueryProvider<W>>>>,
    params: RwLock<HashMap<Tag, Arc<dyn ParamProvider<W>>>>,
    actions: RwLock<HashMap<Tag, Arc<dyn ActionClass<W>>>>,
    disabled_actions: RwLock<HashSet<Tag>>,
}

impl<W: WorldMut> Default for Registry<W> {
    fn default() -> Self {
        Self {
            inputs: RwLock::new(HashMap::new()),
            queries: RwLock::new(HashMap::new()),
            params: RwLock::new(HashMap::new()),
            actions: RwLock::new(HashMap::new()),
            disabled_actions: RwLock::new(HashSet::new()),
        }
    }
}

impl<W: WorldMut> Registry<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_input(&self, tag: Tag, provider: Arc<dyn InputProvider<W>>) {
        if self
            .inputs
            .write()
            .expect("registry lock poisoned")
            .insert(tag.clone(), provider)
            .is_some()
        {
            warn!(%tag, "replacing previously registered input provider");
        }
    }

    pub fn register_query(&self, tag: Tag, provider: Arc<dyn QueryProvider<W>>) {
        if self
            .queries
            .write()
            .expect("registry lock poisoned")
            .insert(tag.clone(), provider)
            .is_some()
        {
            warn!(%tag, "replacing previously registered query provider");
        }
    }

    pub fn register_param(&self, tag: Tag, provider: Arc<dyn ParamProvider<W>>) {
        if self
            .params
            .write()
            .expect("registry lock poisoned")
            .insert(tag.clone(), provider)
            .is_some()
        {
            warn!(%tag, "replacing previously registered parameter provider");
        }
    }

    pub fn register_action_class(&self, tag: Tag, class: Arc<dyn ActionClass<W>>) {
        if self
            .actions
            .write()
            .expect("registry lock poisoned")
            .insert(tag.clone(), class)
            .is_some()
        {
            warn!(%tag, "replacing previously registered action class");
        }
    }

    pub fn input(&self, tag: &Tag) -> Option<Arc<dyn InputProvider<W>>> {
        self.inputs
            .read()
            .expect("registry lock poisoned")
            .get(tag)
            .cloned()
    }

    pub fn query(&self, tag: &Tag) -> Option<Arc<dyn QueryProvider<W>>> {
        self.queries
            .read()
            .expect("registry lock poisoned")
            .get(tag)
            .cloned()
    }

    pub fn param(&self, tag: &Tag) -> Option<Arc<dyn ParamProvider<W>>> {
        self.params
            .read()
            .expect("registry lock poisoned")
            .get(tag)
            .cloned()
    }

    pub fn action_class(&self, tag: &Tag) -> Option<Arc<dyn ActionClass<W>>> {
        self.actions
            .read()
            .expect("registry lock poisoned")
            .get(tag)
            .cloned()
    }

    /// Globally enable or disable an action tag across every brain.
    pub fn set_action_enabled(&self, tag: &Tag, enabled: bool) {
        let mut disabled = self.disabled_actions.write().expect("registry lock poisoned");
        if enabled {
            disabled.remove(tag);
        } else {
            disabled.insert(tag.clone());
        }
    }

    pub fn action_enabled(&self, tag: &Tag) -> bool {
        !self
            .disabled_actions
            .read()
            .expect("registry lock poisoned")
            .contains(tag)
    }
}
