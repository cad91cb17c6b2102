use shared::{Connectivity, Pos};
use slotmap::SlotMap;
use tracing::warn;

use super::ant::Ant;
use super::entity::{AntKey, EntityRef, FoodKey, HomeKey, Kind, PredatorKey};
use super::food::{Food, Home};
use super::grid::SpatialGrid;
use super::predator::Predator;

/// Owns every entity, one slotmap arena per kind.
///
/// Spawning inserts into the arena and registers in the grid in one call;
/// removal does the reverse. Nothing else touches both.
#[derive(Default)]
pub struct Registry {
    pub homes: SlotMap<HomeKey, Home>,
    pub foods: SlotMap<FoodKey, Food>,
    pub ants: SlotMap<AntKey, Ant>,
    pub predators: SlotMap<PredatorKey, Predator>,
}

impl Registry {
    pub fn spawn_home(&mut self, grid: &mut SpatialGrid, pos: Pos) -> HomeKey {
        let key = self.homes.insert(Home::new(pos));
        grid.place(EntityRef::Home(key), pos);
        key
    }

    pub fn spawn_food(&mut self, grid: &mut SpatialGrid, pos: Pos, amount: f64) -> FoodKey {
        let key = self.foods.insert(Food::new(pos, amount));
        grid.place(EntityRef::Food(key), pos);
        key
    }

    pub fn spawn_ant(
        &mut self,
        grid: &mut SpatialGrid,
        home: HomeKey,
        pos: Pos,
        connectivity: Connectivity,
    ) -> AntKey {
        let key = self
            .ants
            .insert_with_key(|k| Ant::new(k, home, pos, connectivity));
        grid.place(EntityRef::Ant(key), pos);
        key
    }

    pub fn spawn_predator(
        &mut self,
        grid: &mut SpatialGrid,
        pos: Pos,
        lifetime: u32,
        connectivity: Connectivity,
    ) -> PredatorKey {
        let key = self
            .predators
            .insert_with_key(|k| Predator::new(k, pos, lifetime, connectivity));
        grid.place(EntityRef::Predator(key), pos);
        key
    }

    /// Removes an ant from its arena and its cell.
    pub fn remove_ant(&mut self, grid: &mut SpatialGrid, key: AntKey) -> Option<Ant> {
        let Some(ant) = self.ants.remove(key) else {
            warn!(?key, "ant not found during removal");
            return None;
        };
        grid.remove(EntityRef::Ant(key), ant.pos);
        Some(ant)
    }

    /// Removes a predator from its arena and its cell.
    pub fn remove_predator(
        &mut self,
        grid: &mut SpatialGrid,
        key: PredatorKey,
    ) -> Option<Predator> {
        let Some(predator) = self.predators.remove(key) else {
            warn!(?key, "predator not found during removal");
            return None;
        };
        grid.remove(EntityRef::Predator(key), predator.pos);
        Some(predator)
    }

    pub fn count(&self, kind: Kind) -> usize {
        match kind {
            Kind::Home => self.homes.len(),
            Kind::Food => self.foods.len(),
            Kind::Ant => self.ants.len(),
            Kind::Predator => self.predators.len(),
        }
    }
}
