//! Seed, plant and soil counters updated by planting, harvesting and kills.

use nightfield_core::{EconomySnapshot, GameConfig};

#[derive(Clone, Debug)]
pub(crate) struct Economy {
    seeds: u32,
    plants: u32,
    extracted: u32,
    hydration: i32,
    nutrients: f32,
    seed_ratio: u32,
    hydration_floor: i32,
    nutrient_floor: f32,
    nutrient_rate: f32,
    nutrients_per_enemy: f32,
}

impl Economy {
    pub(crate) fn new(config: &GameConfig) -> Self {
        Self {
            seeds: config.initial_seeds,
            plants: 0,
            extracted: 0,
            hydration: config.initial_hydration,
            nutrients: config.initial_nutrients,
            seed_ratio: config.seed_ratio,
            hydration_floor: config.hydration_floor,
            nutrient_floor: config.nutrient_floor,
            nutrient_rate: config.nutrient_rate,
            nutrients_per_enemy: config.nutrients_per_enemy,
        }
    }

    pub(crate) fn seeds(&self) -> u32 {
        self.seeds
    }

    pub(crate) fn record_planting(&mut self) {
        self.seeds = self.seeds.saturating_sub(1);
        self.plants = self.plants.saturating_add(1);
    }

    /// Rewards a harvest.
    ///
    /// Both soil formulas use `max` where a cap was probably intended; they
    /// are kept as written so existing balancing stays reproducible.
    pub(crate) fn record_extraction(&mut self, days_alive: u32) {
        self.plants = self.plants.saturating_sub(1);
        self.extracted = self.extracted.saturating_add(1);

        let days = i32::try_from(days_alive).unwrap_or(i32::MAX);
        self.hydration = self
            .hydration_floor
            .max(self.hydration.saturating_add(days));
        self.nutrients += self
            .nutrient_floor
            .max(self.nutrients + self.nutrient_rate * days_alive as f32);
        self.seeds = self.seeds.saturating_add(self.seed_ratio);
    }

    pub(crate) fn record_kill(&mut self) {
        self.plants = self.plants.saturating_sub(1);
    }

    /// Largest number of enemies the current nutrients can sustain.
    pub(crate) fn enemy_limit(&self) -> u32 {
        if self.nutrients_per_enemy <= 0.0 {
            return 0;
        }
        (self.nutrients / self.nutrients_per_enemy).floor() as u32
    }

    pub(crate) fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            seeds: self.seeds,
            plants: self.plants,
            extracted: self.extracted,
            hydration: self.hydration,
            nutrients: self.nutrients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economy() -> Economy {
        Economy::new(&GameConfig::default())
    }

    #[test]
    fn planting_spends_a_seed() {
        let mut economy = economy();
        economy.record_planting();
        let snapshot = economy.snapshot();
        assert_eq!(snapshot.seeds, 0);
        assert_eq!(snapshot.plants, 1);
    }

    // Observed behaviour: the floors dominate, so a young harvest jumps
    // hydration to 20 and more than triples the nutrients.
    #[test]
    fn extraction_applies_floor_formulas_literally() {
        let mut economy = economy();
        economy.record_planting();
        economy.record_extraction(0);

        let snapshot = economy.snapshot();
        assert_eq!(snapshot.hydration, 20);
        assert!((snapshot.nutrients - 14.5).abs() < 1e-5);
        assert_eq!(snapshot.seeds, 2);
        assert_eq!(snapshot.plants, 0);
        assert_eq!(snapshot.extracted, 1);
    }

    #[test]
    fn extraction_above_the_floor_doubles_nutrients() {
        let mut economy = economy();
        economy.record_extraction(0);
        economy.record_extraction(5);

        let snapshot = economy.snapshot();
        assert_eq!(snapshot.hydration, 25);
        // 14.5 + max(10.0, 14.5 + 0.5)
        assert!((snapshot.nutrients - 29.5).abs() < 1e-4);
    }

    #[test]
    fn kills_only_reduce_the_plant_count() {
        let mut economy = economy();
        economy.record_planting();
        let before = economy.snapshot();
        economy.record_kill();
        economy.record_kill();

        let after = economy.snapshot();
        assert_eq!(after.plants, 0);
        assert_eq!(after.seeds, before.seeds);
        assert_eq!(after.hydration, before.hydration);
        assert_eq!(after.extracted, 0);
    }

    #[test]
    fn enemy_limit_floors_nutrients_per_enemy() {
        let economy = economy();
        assert_eq!(economy.enemy_limit(), 18);
    }
}
