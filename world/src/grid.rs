//! Dense tile board whose cells hold either a plant or a horde of enemies.

use std::collections::HashSet;

use nightfield_core::{CellCoord, EnemyId, GridError, PlacementError, PlantId};

/// Set of enemies currently standing on a single cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Horde {
    members: HashSet<EnemyId>,
}

impl Horde {
    /// Number of enemies standing on the cell.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Reports whether no enemy stands on the cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Reports whether the enemy stands on the cell.
    #[must_use]
    pub fn contains(&self, enemy: EnemyId) -> bool {
        self.members.contains(&enemy)
    }

    /// Enemies standing on the cell in ascending identifier order.
    #[must_use]
    pub fn members(&self) -> Vec<EnemyId> {
        let mut members: Vec<EnemyId> = self.members.iter().copied().collect();
        members.sort_unstable();
        members
    }

    /// Adds the enemy; returns `false` if it was already present.
    pub(crate) fn insert(&mut self, enemy: EnemyId) -> bool {
        self.members.insert(enemy)
    }

    /// Removes the enemy; returns `false` if it was not present.
    pub(crate) fn remove(&mut self, enemy: EnemyId) -> bool {
        self.members.remove(&enemy)
    }
}

/// Content of a single board cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// The cell holds a plant.
    Plant(PlantId),
    /// The cell holds zero or more enemies.
    Horde(Horde),
}

impl Default for Cell {
    fn default() -> Self {
        Self::Horde(Horde::default())
    }
}

impl Cell {
    /// Plant growing on the cell, if any.
    #[must_use]
    pub fn plant(&self) -> Option<PlantId> {
        match self {
            Self::Plant(plant) => Some(*plant),
            Self::Horde(_) => None,
        }
    }

    /// Horde standing on the cell, if the cell holds no plant.
    #[must_use]
    pub fn horde(&self) -> Option<&Horde> {
        match self {
            Self::Plant(_) => None,
            Self::Horde(horde) => Some(horde),
        }
    }

    /// Reports whether the cell holds neither a plant nor enemies.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        match self {
            Self::Plant(_) => false,
            Self::Horde(horde) => horde.is_empty(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![Cell::default(); capacity],
        }
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    pub(crate) fn cell(&self, cell: CellCoord) -> Result<&Cell, GridError> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .ok_or(self.out_of_bounds(cell))
    }

    fn cell_mut(&mut self, cell: CellCoord) -> Result<&mut Cell, GridError> {
        let error = self.out_of_bounds(cell);
        self.index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(error)
    }

    /// Checks that a plant may be placed without mutating anything.
    pub(crate) fn check_vacant(&self, cell: CellCoord) -> Result<(), PlacementError> {
        match self.cell(cell) {
            Err(GridError::OutOfBounds { .. }) => Err(PlacementError::OutOfBounds),
            Ok(Cell::Plant(_)) => Err(PlacementError::Occupied),
            Ok(Cell::Horde(horde)) if !horde.is_empty() => Err(PlacementError::Infested),
            Ok(Cell::Horde(_)) => Ok(()),
        }
    }

    pub(crate) fn set_plant(
        &mut self,
        cell: CellCoord,
        plant: PlantId,
    ) -> Result<(), PlacementError> {
        self.check_vacant(cell)?;
        let slot = self.cell_mut(cell).map_err(|_| PlacementError::OutOfBounds)?;
        *slot = Cell::Plant(plant);
        Ok(())
    }

    /// Removes the plant on the cell, leaving an empty horde behind.
    pub(crate) fn take_plant(&mut self, cell: CellCoord) -> Option<PlantId> {
        let slot = self.cell_mut(cell).ok()?;
        let plant = slot.plant()?;
        *slot = Cell::default();
        Some(plant)
    }

    /// Adds the enemy to the cell's horde. Cells holding a plant are left untouched.
    pub(crate) fn join(&mut self, cell: CellCoord, enemy: EnemyId) -> bool {
        match self.cell_mut(cell) {
            Ok(Cell::Horde(horde)) => horde.insert(enemy),
            Ok(Cell::Plant(_)) | Err(_) => false,
        }
    }

    pub(crate) fn leave(&mut self, cell: CellCoord, enemy: EnemyId) -> bool {
        match self.cell_mut(cell) {
            Ok(Cell::Horde(horde)) => horde.remove(enemy),
            Ok(Cell::Plant(_)) | Err(_) => false,
        }
    }

    /// Cells whose horde contains the enemy.
    pub(crate) fn cells_holding(&self, enemy: EnemyId) -> Vec<CellCoord> {
        self.iter()
            .filter(|(_, cell)| cell.horde().is_some_and(|horde| horde.contains(enemy)))
            .map(|(coord, _)| coord)
            .collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), cell)
        })
    }

    fn out_of_bounds(&self, cell: CellCoord) -> GridError {
        GridError::OutOfBounds {
            cell,
            columns: self.columns,
            rows: self.rows,
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
