use log::warn;
use serde::Deserialize;

use crate::geometry::Size;
use crate::ir::{DependencyGraph, Entity, EntityId, MAX_PREREQUISITES, Prerequisite};
use crate::layout::{CellItem, GridSpec};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid talent document: {0}")]
    Parse(#[from] json5::Error),

    #[error("talent {id} is defined more than once")]
    DuplicateEntity { id: EntityId },

    #[error("talent {id} declares {count} prerequisites (at most {max} allowed)", max = MAX_PREREQUISITES)]
    TooManyPrerequisites { id: EntityId, count: usize },
}

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteRecord {
    /// `0` marks an unused slot.
    #[serde(default)]
    pub talent: EntityId,
    #[serde(default)]
    pub rank: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentRecord {
    pub id: EntityId,
    #[serde(default)]
    pub row: i64,
    #[serde(default)]
    pub column: i64,
    #[serde(default)]
    pub size: Option<[f32; 2]>,
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteRecord>,
}

/// One talent tab: the grid shape (optional) and its talents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentDocument {
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub columns: Option<usize>,
    #[serde(default)]
    pub talents: Vec<TalentRecord>,
}

pub fn parse_document(input: &str) -> Result<TalentDocument> {
    Ok(json5::from_str(input)?)
}

/// Graph plus the per-talent minimum sizes that survived placement.
#[derive(Debug, Clone)]
pub struct PlacedTalents {
    pub graph: DependencyGraph,
    pub sizes: Vec<(EntityId, Size)>,
}

impl PlacedTalents {
    fn size_of(&self, id: EntityId) -> Option<Size> {
        self.sizes
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, size)| *size)
    }
}

fn checked_cell(record: &TalentRecord, spec: &GridSpec) -> Option<(usize, usize)> {
    let row = usize::try_from(record.row).ok()?;
    let column = usize::try_from(record.column).ok()?;
    spec.contains(row, column).then_some((row, column))
}

/// Places talents on the grid. Out-of-range talents are dropped, and a later
/// talent in an occupied cell replaces the earlier one.
pub fn place_talents(document: &TalentDocument, spec: &GridSpec) -> Result<PlacedTalents> {
    let mut seen = std::collections::HashSet::new();
    let mut slots: Vec<Option<(Entity, Option<Size>)>> = vec![None; spec.cell_count()];

    for record in &document.talents {
        if !seen.insert(record.id) {
            return Err(DocumentError::DuplicateEntity { id: record.id });
        }
        if record.prerequisites.len() > MAX_PREREQUISITES {
            return Err(DocumentError::TooManyPrerequisites {
                id: record.id,
                count: record.prerequisites.len(),
            });
        }
        let Some((row, column)) = checked_cell(record, spec) else {
            warn!(
                "dropping talent {} placed outside the {}x{} grid at ({}, {})",
                record.id, spec.rows, spec.columns, record.row, record.column
            );
            continue;
        };

        let mut entity = Entity::new(record.id, row, column);
        for (slot, pre) in entity
            .prerequisites
            .iter_mut()
            .zip(&record.prerequisites)
        {
            if pre.talent != 0 {
                *slot = Some(Prerequisite::new(pre.talent, pre.rank));
            }
        }
        let size = record.size.map(|[w, h]| Size::new(w, h));

        let idx = row * spec.columns + column;
        if let Some((previous, _)) = &slots[idx] {
            warn!(
                "talent {} replaces talent {} at ({}, {})",
                record.id, previous.id, row, column
            );
        }
        slots[idx] = Some((entity, size));
    }

    let mut entities = Vec::new();
    let mut sizes = Vec::new();
    for (entity, size) in slots.into_iter().flatten() {
        if let Some(size) = size {
            sizes.push((entity.id, size));
        }
        entities.push(entity);
    }
    Ok(PlacedTalents {
        graph: DependencyGraph::new(entities),
        sizes,
    })
}

/// The `rows * columns` item list: talent sizes where set, `cell_size` elsewhere.
pub fn cell_items(placed: &PlacedTalents, spec: &GridSpec, cell_size: Size) -> Vec<CellItem> {
    let mut items = vec![CellItem::new(cell_size); spec.cell_count()];
    for entity in placed.graph.entities() {
        if let (Some(idx), Some(size)) = (
            spec.index(entity.row, entity.column),
            placed.size_of(entity.id),
        ) {
            items[idx] = CellItem::new(size);
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> GridSpec {
        GridSpec::new(15, 4, 23.0, 23.0)
    }

    #[test]
    fn parses_json5_document() {
        let doc = parse_document(
            r#"{
                // tab 41
                rows: 3, columns: 2,
                talents: [
                    { id: 10, row: 0, column: 1 },
                    { id: 11, row: 1, column: 1, size: [30, 20],
                      prerequisites: [ { talent: 10, rank: 5 }, { talent: 0 } ] },
                ],
            }"#,
        )
        .unwrap();
        assert_eq!(doc.rows, Some(3));
        assert_eq!(doc.talents.len(), 2);
        assert_eq!(doc.talents[1].prerequisites[0].rank, 5);
    }

    #[test]
    fn zero_prerequisite_is_an_empty_slot() {
        let doc = parse_document(
            r#"{ talents: [ { id: 1 }, { id: 2, row: 1, prerequisites: [ { talent: 0 }, { talent: 1, rank: 2 } ] } ] }"#,
        )
        .unwrap();
        let placed = place_talents(&doc, &spec()).unwrap();
        let child = placed.graph.lookup(2).unwrap();
        assert_eq!(child.prerequisite_count(), 1);
        assert_eq!(
            child.prerequisites().next(),
            Some(&Prerequisite::new(1, 2))
        );
    }

    #[test]
    fn out_of_range_talents_are_dropped() {
        let doc = parse_document(
            r#"{ talents: [ { id: 1, row: 15 }, { id: 2, column: -1 }, { id: 3, row: 14, column: 3 } ] }"#,
        )
        .unwrap();
        let placed = place_talents(&doc, &spec()).unwrap();
        assert_eq!(placed.graph.len(), 1);
        assert!(placed.graph.lookup(3).is_some());
    }

    #[test]
    fn later_talent_wins_shared_cell() {
        let doc = parse_document(r#"{ talents: [ { id: 1 }, { id: 2 } ] }"#).unwrap();
        let placed = place_talents(&doc, &spec()).unwrap();
        assert_eq!(placed.graph.len(), 1);
        assert_eq!(placed.graph.occupant(0, 0).map(|e| e.id), Some(2));
    }

    #[test]
    fn rejects_duplicates_and_excess_prerequisites() {
        let doc = parse_document(r#"{ talents: [ { id: 1 }, { id: 1, row: 2 } ] }"#).unwrap();
        assert!(matches!(
            place_talents(&doc, &spec()),
            Err(DocumentError::DuplicateEntity { id: 1 })
        ));
        let doc = parse_document(
            r#"{ talents: [ { id: 1, prerequisites: [ {talent: 2}, {talent: 3}, {talent: 4}, {talent: 5} ] } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            place_talents(&doc, &spec()),
            Err(DocumentError::TooManyPrerequisites { id: 1, count: 4 })
        ));
        assert!(matches!(
            parse_document("{ talents: [ { row: 1 } ] }"),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn cell_items_pad_empty_slots() {
        let doc =
            parse_document(r#"{ talents: [ { id: 1, row: 1, column: 2, size: [60, 30] } ] }"#)
                .unwrap();
        let spec = spec();
        let placed = place_talents(&doc, &spec).unwrap();
        let items = cell_items(&placed, &spec, Size::square(46.0));
        assert_eq!(items.len(), 60);
        assert_eq!(items[6].min_size, Size::new(60.0, 30.0));
        assert_eq!(items[0].min_size, Size::square(46.0));
    }
}
