//! Old-id to new-id table for one entity family within one import call.

use crate::model::EntityId;
use std::collections::HashMap;

/// Maps source-side parent ids to the ids the destination store assigned.
///
/// Built while inserting one family's parents, consulted while inserting the
/// same family's children, then dropped.
#[derive(Debug, Default)]
pub struct IdRemap {
    family: &'static str,
    ids: HashMap<EntityId, EntityId>,
}

impl IdRemap {
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            ids: HashMap::new(),
        }
    }

    /// Records a parent insert. A repeated old id keeps the latest mapping.
    pub fn record(&mut self, old_id: EntityId, new_id: EntityId) {
        self.ids.insert(old_id, new_id);
    }

    /// Destination id for a source parent id, if that parent was inserted.
    pub fn resolve(&self, old_id: EntityId) -> Option<EntityId> {
        self.ids.get(&old_id).copied()
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
