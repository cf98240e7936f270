//! Planting history: every plant on the board together with its planting cycle.

use std::collections::BTreeMap;

use nightfield_core::{CellCoord, PlantId};

/// Entry stored for each living plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlantRecord {
    /// Cell the plant grows on.
    pub(crate) cell: CellCoord,
    /// Cycle the plant was planted on.
    pub(crate) planted_cycle: u32,
}

/// Registry that stores plants and manages identifier allocation.
///
/// Identifiers grow monotonically, so iterating the map visits plants in the
/// order they were planted.
#[derive(Debug)]
pub(crate) struct PlantRegistry {
    entries: BTreeMap<PlantId, PlantRecord>,
    next_plant_id: PlantId,
}

impl PlantRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_plant_id: PlantId::new(0),
        }
    }

    /// Records a new plant and returns its identifier.
    pub(crate) fn insert(&mut self, cell: CellCoord, planted_cycle: u32) -> PlantId {
        let id = self.next_plant_id;
        self.next_plant_id = PlantId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            PlantRecord {
                cell,
                planted_cycle,
            },
        );
        id
    }

    pub(crate) fn remove(&mut self, plant: PlantId) -> Option<PlantRecord> {
        self.entries.remove(&plant)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (PlantId, PlantRecord)> + '_ {
        self.entries.iter().map(|(id, record)| (*id, *record))
    }

    /// Closest plant by Manhattan distance; the earliest planted wins ties.
    pub(crate) fn nearest(&self, from: CellCoord) -> Option<CellCoord> {
        let mut best: Option<(u32, CellCoord)> = None;
        for record in self.entries.values() {
            let distance = from.manhattan_distance(record.cell);
            match best {
                Some((best_distance, _)) if best_distance <= distance => {}
                _ => best = Some((distance, record.cell)),
            }
        }
        best.map(|(_, cell)| cell)
    }
}
