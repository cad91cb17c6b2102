//! Stigmergic foraging on a torus: ants search for food and lay a decaying
//! trail on the way home, predators hunt them, and the trail diffuses and
//! evaporates every step.

pub mod config;
pub mod error;
pub mod simulation;

pub use config::{FoodPlacement, FoodSite, WorldConfig};
pub use error::ConfigError;
pub use shared::{Connectivity, Pos, PredatorStats, StepRecord, StopReason};
pub use simulation::World;
