use crate::config::{ActionDef, BrainConfig};

/// The merged, priority-ordered action list one brain evaluates.
///
/// Definitions from referenced action sets come first, then the brain's own,
/// stable-sorted by ascending priority. Index positions are stable for the
/// lifetime of the configuration and identify actions in history and
/// current-action state.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    defs: Vec<ActionDef>,
}

impl Catalogue {
    pub fn build(config: &BrainConfig) -> Self {
        let mut defs = Vec::with_capacity(
            config.actions.len() + config.action_sets.iter().map(|s| s.actions.len()).sum::<usize>(),
        );
        for set in &config.action_sets {
            defs.extend(set.actions.iter().cloned());
        }
        defs.extend(config.actions.iter().cloned());
        defs.sort_by_key(|def| def.priority);
        Self { defs }
    }

    pub fn defs(&self) -> &[ActionDef] {
        &self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
