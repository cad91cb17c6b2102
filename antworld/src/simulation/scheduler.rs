use rand::seq::SliceRandom;
use shared::{Connectivity, Pos};
use tracing::debug;

use super::ant::AntOutcome;
use super::context::StepContext;
use super::entity::Kind;
use super::grid::SpatialGrid;
use super::predator::PredatorOutcome;
use super::registry::Registry;

/// One slice of a step. Kinds run in this order; entities of one kind run
/// in a fresh random order every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Predator,
    Food,
    EnvironmentCompute,
    EnvironmentCommit,
    Home,
    Ant,
}

pub const PHASE_ORDER: [Phase; 6] = [
    Phase::Predator,
    Phase::Food,
    Phase::EnvironmentCompute,
    Phase::EnvironmentCommit,
    Phase::Home,
    Phase::Ant,
];

/// A spawn requested during a step, applied once the step is over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingSpawn {
    Predator {
        pos: Pos,
        lifetime: u32,
        connectivity: Connectivity,
    },
}

/// What happened to the population during one scheduler step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepTally {
    pub starved: usize,
    pub eaten: usize,
    pub predator_deaths: usize,
    pub predator_births: usize,
}

/// Drives the entities through the phases of a step.
///
/// Each kind phase iterates a shuffled snapshot of keys. A key removed
/// earlier in the step no longer resolves and is skipped; spawns wait in
/// `pending` until every phase has run.
#[derive(Default)]
pub struct Scheduler {
    registry: Registry,
    pending: Vec<PendingSpawn>,
    steps: u64,
}

impl Scheduler {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            pending: Vec::new(),
            steps: 0,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Live entities of a kind. Pending spawns are not counted.
    pub fn count(&self, kind: Kind) -> usize {
        self.registry.count(kind)
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Queues a spawn for the end of the current step.
    pub fn defer(&mut self, spawn: PendingSpawn) {
        self.pending.push(spawn);
    }

    pub fn step(&mut self, ctx: &mut StepContext<'_>) -> StepTally {
        let mut tally = StepTally::default();
        let mut staged = None;

        for phase in PHASE_ORDER {
            match phase {
                Phase::Predator => self.step_predators(ctx, &mut tally),
                Phase::Food => self.step_foods(ctx),
                Phase::EnvironmentCompute => staged = Some(ctx.field.compute(ctx.field_params())),
                Phase::EnvironmentCommit => {
                    if let Some(staged) = staged.take() {
                        ctx.field.commit(staged);
                    }
                }
                // Homes only accumulate what ants deliver.
                Phase::Home => {}
                Phase::Ant => self.step_ants(ctx, &mut tally),
            }
        }

        tally.predator_births = self.merge_pending(ctx.grid);
        self.steps += 1;
        tally
    }

    fn step_predators(&mut self, ctx: &mut StepContext<'_>, tally: &mut StepTally) {
        let mut keys: Vec<_> = self.registry.predators.keys().collect();
        keys.shuffle(&mut *ctx.rng);

        for key in keys {
            let Some(predator) = self.registry.predators.get_mut(key) else {
                continue;
            };
            match predator.step(ctx) {
                PredatorOutcome::Died => {
                    self.registry.remove_predator(ctx.grid, key);
                    tally.predator_deaths += 1;
                }
                PredatorOutcome::Acted { prey, offspring } => {
                    if let Some(prey) = prey {
                        if self.registry.remove_ant(ctx.grid, prey).is_some() {
                            debug!(predator = ?key, ant = ?prey, "ant eaten");
                            tally.eaten += 1;
                        }
                    }
                    if let Some(pos) = offspring {
                        self.defer(PendingSpawn::Predator {
                            pos,
                            lifetime: ctx.config.predator_lifetime,
                            connectivity: ctx.config.connectivity,
                        });
                    }
                }
            }
        }
    }

    fn step_foods(&mut self, ctx: &mut StepContext<'_>) {
        let mut keys: Vec<_> = self.registry.foods.keys().collect();
        keys.shuffle(&mut *ctx.rng);

        for key in keys {
            if let Some(food) = self.registry.foods.get_mut(key) {
                food.decay(ctx.config.food_decay_rate);
            }
        }
    }

    fn step_ants(&mut self, ctx: &mut StepContext<'_>, tally: &mut StepTally) {
        let mut keys: Vec<_> = self.registry.ants.keys().collect();
        keys.shuffle(&mut *ctx.rng);

        for key in keys {
            let outcome = {
                let Registry {
                    ants, foods, homes, ..
                } = &mut self.registry;
                let Some(ant) = ants.get_mut(key) else {
                    continue;
                };
                ant.step(ctx, foods, homes)
            };
            if outcome == AntOutcome::Starved {
                debug!(ant = ?key, "ant starved");
                self.registry.remove_ant(ctx.grid, key);
                tally.starved += 1;
            }
        }
    }

    fn merge_pending(&mut self, grid: &mut SpatialGrid) -> usize {
        let spawned = self.pending.len();
        for spawn in self.pending.drain(..) {
            match spawn {
                PendingSpawn::Predator {
                    pos,
                    lifetime,
                    connectivity,
                } => {
                    let key = self
                        .registry
                        .spawn_predator(grid, pos, lifetime, connectivity);
                    debug!(predator = ?key, %pos, "predator offspring spawned");
                }
            }
        }
        spawned
    }
}
