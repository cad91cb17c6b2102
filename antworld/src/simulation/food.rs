use shared::Pos;
use tracing::warn;

use super::FOOD_THRESHOLD;

/// A food cache. Its position never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub pos: Pos,
    pub amount: f64,
}

impl Food {
    pub fn new(pos: Pos, amount: f64) -> Self {
        Self { pos, amount }
    }

    /// Only caches holding more than the threshold count as food, so ants do
    /// not fight over crumbs.
    pub fn has_food(&self) -> bool {
        self.amount > FOOD_THRESHOLD
    }

    /// Proportional decay; anything under the threshold is gone.
    pub fn decay(&mut self, rate: f64) {
        self.amount -= self.amount * rate;
        if self.amount < FOOD_THRESHOLD {
            self.amount = 0.0;
        }
    }

    /// Takes up to `capacity` and returns what was actually taken.
    pub fn harvest(&mut self, capacity: f64) -> f64 {
        let taken = if capacity > self.amount {
            warn!(
                pos = %self.pos,
                requested = capacity,
                available = self.amount,
                "harvest exceeds available food; clamped"
            );
            self.amount.max(0.0)
        } else {
            capacity
        };
        self.amount -= taken;
        taken
    }
}

/// The nest. Accumulates everything the ants bring back.
#[derive(Debug, Clone, PartialEq)]
pub struct Home {
    pub pos: Pos,
    pub amount: f64,
}

impl Home {
    pub fn new(pos: Pos) -> Self {
        Self { pos, amount: 0.0 }
    }

    pub fn deposit(&mut self, amount: f64) {
        self.amount += amount;
    }
}
