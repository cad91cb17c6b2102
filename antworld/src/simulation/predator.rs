use rand::Rng;
use rand::seq::IndexedRandom;
use shared::{Connectivity, Pos, PredatorStats};
use tracing::debug;

use super::context::StepContext;
use super::entity::{AntKey, EntityRef, PredatorKey};
use super::{MOVE_RADIUS, PREDATOR_RANDOM_MOVE_PROB};

/// Result of one predator step. The scheduler applies it: the prey is
/// removed at once, the offspring joins after the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredatorOutcome {
    Died,
    Acted {
        prey: Option<AntKey>,
        offspring: Option<Pos>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predator {
    pub key: PredatorKey,
    pub pos: Pos,
    pub lifetime: u32,
    pub steps_without_catch: u32,
    pub catch_streak: u32,
    pub kills_since_reproduction: u32,
    pub kills_total: u32,
    pub streak_history: Vec<u32>,
    pub connectivity: Connectivity,
}

impl Predator {
    pub fn new(key: PredatorKey, pos: Pos, lifetime: u32, connectivity: Connectivity) -> Self {
        Self {
            key,
            pos,
            lifetime,
            steps_without_catch: 0,
            catch_streak: 0,
            kills_since_reproduction: 0,
            kills_total: 0,
            streak_history: Vec::new(),
            connectivity,
        }
    }

    pub fn step(&mut self, ctx: &mut StepContext<'_>) -> PredatorOutcome {
        self.lifetime = self.lifetime.saturating_sub(1);
        if self.lifetime == 0 {
            debug!(predator = ?self.key, "predator died of old age");
            return PredatorOutcome::Died;
        }
        if self.steps_without_catch > ctx.config.predator_max_steps_without_catch {
            debug!(predator = ?self.key, "predator starved");
            return PredatorOutcome::Died;
        }

        if ctx.rng.random_bool(PREDATOR_RANDOM_MOVE_PROB) {
            self.random_move(ctx);
        } else {
            self.density_move(ctx);
        }

        let prey = self.hunt(ctx);
        let offspring = self.reproduce(ctx);
        PredatorOutcome::Acted { prey, offspring }
    }

    /// Step to the neighbor holding the most ants, ties broken at random.
    fn density_move(&mut self, ctx: &mut StepContext<'_>) {
        let candidates = ctx
            .grid
            .neighborhood(self.pos, self.connectivity, false, MOVE_RADIUS);
        let Some(most) = candidates.iter().map(|&p| ctx.grid.count_ants_at(p)).max() else {
            debug!(predator = ?self.key, pos = %self.pos, "no neighbor cells; move skipped");
            return;
        };
        let densest: Vec<Pos> = candidates
            .into_iter()
            .filter(|&p| ctx.grid.count_ants_at(p) == most)
            .collect();
        if let Some(&next) = densest.choose(&mut *ctx.rng) {
            self.move_to(ctx, next);
        }
    }

    fn random_move(&mut self, ctx: &mut StepContext<'_>) {
        let choices = ctx
            .grid
            .neighborhood(self.pos, self.connectivity, true, MOVE_RADIUS);
        if let Some(&next) = choices.choose(&mut *ctx.rng) {
            self.move_to(ctx, next);
        }
    }

    fn move_to(&mut self, ctx: &mut StepContext<'_>, next: Pos) {
        ctx.grid
            .move_entity(EntityRef::Predator(self.key), self.pos, next);
        self.pos = next;
    }

    /// Pick one ant in the current cell. The caller removes it.
    fn hunt(&mut self, ctx: &mut StepContext<'_>) -> Option<AntKey> {
        let ants: Vec<AntKey> = ctx
            .grid
            .entities_at(self.pos)
            .iter()
            .filter_map(|e| match e {
                EntityRef::Ant(key) => Some(*key),
                _ => None,
            })
            .collect();

        match ants.choose(&mut *ctx.rng) {
            Some(&prey) => {
                self.kills_since_reproduction += 1;
                self.kills_total += 1;
                self.catch_streak += 1;
                self.steps_without_catch = 0;
                Some(prey)
            }
            None => {
                self.steps_without_catch += 1;
                self.streak_history.push(self.catch_streak);
                self.catch_streak = 0;
                None
            }
        }
    }

    fn reproduce(&mut self, ctx: &mut StepContext<'_>) -> Option<Pos> {
        if self.kills_since_reproduction < ctx.config.predator_reproduction_threshold {
            return None;
        }
        self.kills_since_reproduction = 0;
        Some(ctx.grid.random_pos(&mut *ctx.rng))
    }

    pub fn stats(&self) -> PredatorStats {
        PredatorStats {
            lifetime: self.lifetime,
            kills_total: self.kills_total,
            kills_since_reproduction: self.kills_since_reproduction,
            catch_streak: self.catch_streak,
            streak_history: self.streak_history.clone(),
        }
    }
}
