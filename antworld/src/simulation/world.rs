use std::collections::BTreeMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shared::{Pos, PredatorStats, StepRecord, StopReason, shannon_entropy};
use tracing::{debug, info};

use super::context::StepContext;
use super::entity::{HomeKey, Kind};
use super::grid::SpatialGrid;
use super::pheromone::PheromoneField;
use super::registry::Registry;
use super::scheduler::Scheduler;
use crate::config::{FoodPlacement, WorldConfig};
use crate::error::ConfigError;

/// Population and resource figures taken before a step mutates anything.
struct Snapshot {
    ants: usize,
    predators: usize,
    food: f64,
    home: f64,
    carrying: f64,
    food_distance: f64,
    pheromone_exposure: f64,
}

/// A complete simulation: grid, pheromone field, entities and the RNG that
/// drives them.
///
/// Built once from a [`WorldConfig`], then advanced with [`World::step`]
/// until a stop condition is met.
pub struct World {
    config: WorldConfig,
    grid: SpatialGrid,
    field: PheromoneField,
    scheduler: Scheduler,
    rng: Box<dyn RngCore + Send>,
    home: HomeKey,
    home_pos: Pos,
    tick: u64,
    running: bool,
    stop_reason: Option<StopReason>,
    entropy_history: Vec<f64>,
    history: Vec<StepRecord>,
}

impl World {
    /// Builds a world seeded from `config.seed`, or from a fresh random seed
    /// that is logged so the run can be replayed.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, "seeding world");
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng<R>(config: WorldConfig, rng: R) -> Result<Self, ConfigError>
    where
        R: RngCore + Send + 'static,
    {
        config.validate()?;

        let mut rng: Box<dyn RngCore + Send> = Box::new(rng);
        let mut grid = SpatialGrid::new(config.width, config.height);
        let mut registry = Registry::default();

        let home_pos = config.home_pos();
        let home = registry.spawn_home(&mut grid, home_pos);

        for _ in 0..config.predator_count {
            let pos = grid.random_pos(&mut *rng);
            registry.spawn_predator(&mut grid, pos, config.predator_lifetime, config.connectivity);
        }

        for _ in 0..config.initial_ants {
            registry.spawn_ant(&mut grid, home, home_pos, config.connectivity);
        }

        match &config.food {
            FoodPlacement::Sites { sites } => {
                for site in sites {
                    registry.spawn_food(&mut grid, site.pos, site.amount);
                }
            }
            FoodPlacement::Random { count, amount } => {
                for _ in 0..*count {
                    let pos = grid.random_pos(&mut *rng);
                    registry.spawn_food(&mut grid, pos, *amount);
                }
            }
        }

        info!(
            width = config.width,
            height = config.height,
            ants = config.initial_ants,
            predators = config.predator_count,
            food_sites = registry.count(Kind::Food),
            home = %home_pos,
            "world created"
        );

        let mut world = Self {
            field: PheromoneField::new(config.width, config.height),
            config,
            grid,
            scheduler: Scheduler::new(registry),
            rng,
            home,
            home_pos,
            tick: 0,
            running: true,
            stop_reason: None,
            entropy_history: Vec::new(),
            history: Vec::new(),
        };
        world.check_termination();
        Ok(world)
    }

    /// Advances the world by one step. Does nothing once stopped.
    pub fn step(&mut self) {
        if !self.running {
            return;
        }

        let before = self.snapshot();

        let tally = {
            let mut ctx = StepContext {
                config: &self.config,
                grid: &mut self.grid,
                field: &mut self.field,
                rng: &mut *self.rng,
            };
            self.scheduler.step(&mut ctx)
        };

        let births = self.spawn_births();
        let entropy = self.occupancy_entropy();
        self.entropy_history.push(entropy);

        self.history.push(StepRecord {
            tick: self.tick,
            ants: before.ants,
            predators: before.predators,
            food: before.food,
            home: before.home,
            carrying: before.carrying,
            food_distance: before.food_distance,
            pheromone_exposure: before.pheromone_exposure,
            entropy,
            births,
            starved: tally.starved,
            eaten: tally.eaten,
        });
        self.tick += 1;

        self.check_termination();
    }

    /// Steps up to `steps` times, stopping early once the world halts.
    /// Returns how many steps ran.
    pub fn run_for(&mut self, steps: u64) -> u64 {
        let mut executed = 0;
        while executed < steps && self.running {
            self.step();
            executed += 1;
        }
        executed
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            ants: self.ant_count(),
            predators: self.predator_count(),
            food: self.total_food(),
            home: self.home_amount(),
            carrying: self.total_carrying(),
            food_distance: self.average_food_distance(),
            pheromone_exposure: self.pheromone_exposure_ratio(),
        }
    }

    /// `floor(birth_rate * ants)` new ants at home.
    fn spawn_births(&mut self) -> usize {
        let births = (self.config.birth_rate * self.ant_count() as f64).floor() as usize;
        let registry = self.scheduler.registry_mut();
        for _ in 0..births {
            registry.spawn_ant(&mut self.grid, self.home, self.home_pos, self.config.connectivity);
        }
        if births > 0 {
            debug!(births, tick = self.tick, "ants born");
        }
        births
    }

    fn check_termination(&mut self) {
        let reason = if self.ant_count() == 0 {
            Some(StopReason::NoAntsLeft)
        } else if self.total_food() == 0.0 {
            Some(StopReason::NoFoodLeft)
        } else if self.config.predator_count > 0 && self.predator_count() == 0 {
            Some(StopReason::NoPredatorsLeft)
        } else {
            None
        };

        if let Some(reason) = reason {
            info!(tick = self.tick, %reason, "simulation stopped");
            self.stop_reason = Some(reason);
            self.running = false;
        }
    }

    /// Shannon entropy of the ant positions: 0 when every ant shares one
    /// cell, `ln n` when `n` ants sit on `n` distinct cells.
    pub fn occupancy_entropy(&self) -> f64 {
        let mut counts: BTreeMap<Pos, usize> = BTreeMap::new();
        for ant in self.registry().ants.values() {
            *counts.entry(ant.pos).or_default() += 1;
        }
        shannon_entropy(counts.into_values())
    }

    pub fn deposit_pheromone(&mut self, pos: Pos, amount: f64) {
        self.field.deposit(pos, amount);
    }

    pub fn ant_count(&self) -> usize {
        self.scheduler.count(Kind::Ant)
    }

    pub fn predator_count(&self) -> usize {
        self.scheduler.count(Kind::Predator)
    }

    pub fn total_food(&self) -> f64 {
        self.registry().foods.values().map(|f| f.amount).sum()
    }

    pub fn home_amount(&self) -> f64 {
        self.registry()
            .homes
            .get(self.home)
            .map_or(0.0, |h| h.amount)
    }

    pub fn total_carrying(&self) -> f64 {
        self.registry().ants.values().map(|a| a.carrying).sum()
    }

    /// Mean torus distance from home to every cache that still holds food.
    pub fn average_food_distance(&self) -> f64 {
        let torus = self.grid.torus();
        let distances: Vec<f64> = self
            .registry()
            .foods
            .values()
            .filter(|f| f.amount > 0.0)
            .map(|f| torus.distance(f.pos, self.home_pos))
            .collect();
        if distances.is_empty() {
            return 0.0;
        }
        distances.iter().sum::<f64>() / distances.len() as f64
    }

    /// Fraction of ants standing on a cell with pheromone above the lower
    /// bound.
    pub fn pheromone_exposure_ratio(&self) -> f64 {
        let ants = &self.registry().ants;
        if ants.is_empty() {
            return 0.0;
        }
        let exposed = ants
            .values()
            .filter(|a| self.field.amount(a.pos) > self.config.pheromone_lower_bound)
            .count();
        exposed as f64 / ants.len() as f64
    }

    pub fn predator_stats(&self) -> Vec<PredatorStats> {
        self.registry()
            .predators
            .values()
            .map(|p| p.stats())
            .collect()
    }

    pub fn pheromone_at(&self, pos: Pos) -> f64 {
        self.field.amount(pos)
    }

    pub fn entropy_history(&self) -> &[f64] {
        &self.entropy_history
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn home_pos(&self) -> Pos {
        self.home_pos
    }

    pub fn registry(&self) -> &Registry {
        self.scheduler.registry()
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}
