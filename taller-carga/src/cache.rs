use crate::model::EntityId;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Identifiers one simulated user has learned from the API.
///
/// Ids go in only after the API confirmed a create and leave only after it confirmed a
/// delete. Selection always draws from the cache, so a user never targets an id it did not
/// see the API hand out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdCache {
    ids: Vec<EntityId>,
}

impl IdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cache keeping the first occurrence of every id, in order.
    pub fn unique<I: IntoIterator<Item = EntityId>>(ids: I) -> Self {
        let mut seen = HashSet::new();
        Self {
            ids: ids.into_iter().filter(|id| seen.insert(id.clone())).collect(),
        }
    }

    pub fn push(&mut self, id: EntityId) {
        self.ids.push(id);
    }

    /// A random cached id, or `None` when there is nothing to pick from.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<EntityId> {
        self.ids.choose(rng).cloned()
    }

    /// Removes the first occurrence of `id`. Returns whether it was cached.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        match self.ids.iter().position(|cached| cached == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityId> {
        self.ids.iter()
    }

    /// Empties the cache, handing back what it held.
    pub fn take(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.ids)
    }
}

impl FromIterator<EntityId> for IdCache {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
