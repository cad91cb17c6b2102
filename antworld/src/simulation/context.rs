use rand::RngCore;

use super::grid::SpatialGrid;
use super::pheromone::{FieldParams, PheromoneField};
use crate::config::WorldConfig;

/// What an entity may read and mutate while it takes its turn.
///
/// Entities never hold a reference to the world; the scheduler lends them
/// this context for the duration of one call.
pub struct StepContext<'a> {
    pub config: &'a WorldConfig,
    pub grid: &'a mut SpatialGrid,
    pub field: &'a mut PheromoneField,
    pub rng: &'a mut dyn RngCore,
}

impl StepContext<'_> {
    pub fn field_params(&self) -> FieldParams {
        FieldParams {
            evaporate: self.config.evaporate,
            diffusion: self.config.diffusion,
            lower_bound: self.config.pheromone_lower_bound,
        }
    }
}
