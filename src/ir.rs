use std::collections::HashMap;

use serde::Serialize;

pub type EntityId = u32;

/// Maximum number of prerequisite links a talent can declare.
pub const MAX_PREREQUISITES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Prerequisite {
    pub target: EntityId,
    /// Points the target must have before the dependent unlocks.
    pub rank: u32,
}

impl Prerequisite {
    pub const fn new(target: EntityId, rank: u32) -> Self {
        Self { target, rank }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub row: usize,
    pub column: usize,
    pub prerequisites: [Option<Prerequisite>; MAX_PREREQUISITES],
}

impl Entity {
    pub fn new(id: EntityId, row: usize, column: usize) -> Self {
        Self {
            id,
            row,
            column,
            prerequisites: [None; MAX_PREREQUISITES],
        }
    }

    /// Fills the first free prerequisite slot. Extra links beyond the last slot are ignored.
    pub fn with_prerequisite(mut self, target: EntityId, rank: u32) -> Self {
        if let Some(slot) = self.prerequisites.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(Prerequisite::new(target, rank));
        }
        self
    }

    pub fn prerequisites(&self) -> impl Iterator<Item = &Prerequisite> {
        self.prerequisites.iter().flatten()
    }

    pub fn prerequisite_count(&self) -> usize {
        self.prerequisites().count()
    }
}

/// Immutable set of placed talents with an id lookup built once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl DependencyGraph {
    /// Builds the graph. Ids are expected to be unique; on a repeat the later entity wins.
    pub fn new(entities: Vec<Entity>) -> Self {
        let mut deduped: Vec<Entity> = Vec::with_capacity(entities.len());
        let mut index: HashMap<EntityId, usize> = HashMap::with_capacity(entities.len());
        for entity in entities {
            match index.get(&entity.id) {
                Some(&pos) => deduped[pos] = entity,
                None => {
                    index.insert(entity.id, deduped.len());
                    deduped.push(entity);
                }
            }
        }
        Self {
            entities: deduped,
            index,
        }
    }

    pub fn lookup(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&pos| &self.entities[pos])
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Total prerequisite links declared, resolvable or not.
    pub fn declared_edge_count(&self) -> usize {
        self.entities.iter().map(Entity::prerequisite_count).sum()
    }

    /// Links whose target is not in this graph.
    pub fn dangling(&self) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        self.entities.iter().flat_map(move |entity| {
            entity
                .prerequisites()
                .filter(|pre| !self.index.contains_key(&pre.target))
                .map(move |pre| (entity.id, pre.target))
        })
    }

    /// Occupant of `(row, column)`, if any.
    pub fn occupant(&self, row: usize, column: usize) -> Option<&Entity> {
        self.entities
            .iter()
            .rev()
            .find(|entity| entity.row == row && entity.column == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_dangling() {
        let graph = DependencyGraph::new(vec![
            Entity::new(1, 0, 0),
            Entity::new(2, 1, 0)
                .with_prerequisite(1, 5)
                .with_prerequisite(99, 1),
        ]);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.lookup(2).map(|e| e.row), Some(1));
        assert!(graph.lookup(3).is_none());
        assert_eq!(graph.declared_edge_count(), 2);
        assert_eq!(graph.dangling().collect::<Vec<_>>(), vec![(2, 99)]);
        assert_eq!(graph.occupant(1, 0).map(|e| e.id), Some(2));
    }

    #[test]
    fn prerequisite_slots_are_capped() {
        let entity = Entity::new(7, 2, 2)
            .with_prerequisite(1, 1)
            .with_prerequisite(2, 1)
            .with_prerequisite(3, 1)
            .with_prerequisite(4, 1);
        assert_eq!(entity.prerequisite_count(), MAX_PREREQUISITES);
        assert!(entity.prerequisites().all(|pre| pre.target != 4));
    }

    #[test]
    fn repeated_id_keeps_latest_entity() {
        let graph = DependencyGraph::new(vec![Entity::new(5, 0, 0), Entity::new(5, 3, 1)]);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.lookup(5).map(|e| (e.row, e.column)), Some((3, 1)));
    }
}
