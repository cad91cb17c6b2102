pub mod ant;
mod context;
pub mod entity;
pub mod food;
pub mod grid;
pub mod pheromone;
pub mod predator;
pub mod registry;
pub mod scheduler;
mod world;

// Re-export key types for easier imports
pub use ant::{Ant, AntOutcome, AntState};
pub use context::StepContext;
pub use entity::{AntKey, EntityRef, FoodKey, HomeKey, Kind, PredatorKey};
pub use food::{Food, Home};
pub use grid::{SpatialGrid, Torus};
pub use pheromone::{FieldParams, PheromoneField, StagedField};
pub use predator::{Predator, PredatorOutcome};
pub use registry::Registry;
pub use scheduler::{PHASE_ORDER, Phase, Scheduler, StepTally};
pub use world::World;

// Food below this is treated as gone
pub const FOOD_THRESHOLD: f64 = 1.0;

// Movement
pub const MOVE_RADIUS: usize = 1;
pub const PREDATOR_RANDOM_MOVE_PROB: f64 = 0.3;
