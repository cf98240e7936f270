//! Authoritative enemy state and identifier allocation.

use std::collections::BTreeMap;

use glam::Vec2;
use nightfield_core::{CellCoord, EnemyId, EnemySnapshot, EnemyState};

/// Enemy agent stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) previous: CellCoord,
    pub(crate) intermediate: CellCoord,
    pub(crate) destination: Option<CellCoord>,
    pub(crate) occupied: CellCoord,
    pub(crate) speed: f32,
    pub(crate) crossed_boundary: bool,
    pub(crate) state: EnemyState,
}

impl Enemy {
    fn landing(id: EnemyId, cell: CellCoord, tile_length: f32, speed: f32) -> Self {
        Self {
            id,
            position: cell.center(tile_length),
            previous: cell,
            intermediate: cell,
            destination: None,
            occupied: cell,
            speed,
            crossed_boundary: false,
            state: EnemyState::AwaitingRoute,
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            previous: self.previous,
            intermediate: self.intermediate,
            destination: self.destination,
            occupied: self.occupied,
            speed: self.speed,
            crossed_boundary: self.crossed_boundary,
            state: self.state,
        }
    }

    /// Starts a new leg from the cell the enemy stands on.
    pub(crate) fn begin_leg(&mut self, destination: CellCoord, next: CellCoord) {
        self.previous = self.intermediate;
        self.intermediate = next;
        self.destination = Some(destination);
        self.crossed_boundary = false;
        self.state = EnemyState::Traveling;
    }

    pub(crate) fn idle(&mut self) {
        self.previous = self.intermediate;
        self.destination = None;
        self.crossed_boundary = false;
        self.state = EnemyState::Idle;
    }
}

/// Registry that stores enemies and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct EnemyRegistry {
    entries: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    /// Creates an enemy standing on the centre of `cell`.
    pub(crate) fn spawn(&mut self, cell: CellCoord, tile_length: f32, speed: f32) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        let _ = self
            .entries
            .insert(id, Enemy::landing(id, cell, tile_length, speed));
        id
    }

    pub(crate) fn get(&self, enemy: EnemyId) -> Option<&Enemy> {
        self.entries.get(&enemy)
    }

    pub(crate) fn get_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.entries.get_mut(&enemy)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_enemy_waits_on_landing_cell() {
        let mut registry = EnemyRegistry::new();
        let cell = CellCoord::new(3, 0);
        let id = registry.spawn(cell, 0.5, 1.0);

        let enemy = registry.get(id).expect("spawned enemy");
        assert_eq!(enemy.position, Vec2::new(1.5, 0.0));
        assert_eq!(enemy.previous, cell);
        assert_eq!(enemy.intermediate, cell);
        assert_eq!(enemy.occupied, cell);
        assert_eq!(enemy.state, EnemyState::AwaitingRoute);
    }

    #[test]
    fn identifiers_increment_in_spawn_order() {
        let mut registry = EnemyRegistry::new();
        let first = registry.spawn(CellCoord::new(0, 0), 1.0, 1.0);
        let second = registry.spawn(CellCoord::new(0, 0), 1.0, 1.0);
        assert_eq!(first, EnemyId::new(0));
        assert_eq!(second, EnemyId::new(1));
        assert_eq!(registry.len(), 2);

        let ids: Vec<EnemyId> = registry.iter().map(|enemy| enemy.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn legs_start_from_the_intermediate_cell() {
        let mut registry = EnemyRegistry::new();
        let id = registry.spawn(CellCoord::new(0, 0), 1.0, 1.0);
        let enemy = registry.get_mut(id).expect("spawned enemy");

        enemy.begin_leg(CellCoord::new(3, 0), CellCoord::new(1, 0));
        assert_eq!(enemy.previous, CellCoord::new(0, 0));
        assert_eq!(enemy.intermediate, CellCoord::new(1, 0));
        assert_eq!(enemy.state, EnemyState::Traveling);

        enemy.crossed_boundary = true;
        enemy.begin_leg(CellCoord::new(3, 0), CellCoord::new(2, 0));
        assert_eq!(enemy.previous, CellCoord::new(1, 0));
        assert!(!enemy.crossed_boundary);

        enemy.idle();
        assert_eq!(enemy.previous, CellCoord::new(2, 0));
        assert_eq!(enemy.destination, None);
        assert_eq!(enemy.state, EnemyState::Idle);
    }
}
