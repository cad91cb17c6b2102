use shared::{Connectivity, Pos};
use tracing::warn;

use super::grid::Torus;

/// Diffusion and evaporation parameters of a field update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub evaporate: f64,
    pub diffusion: f64,
    pub lower_bound: f64,
}

/// Next-step amounts computed from a field, waiting to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedField {
    amounts: Vec<f64>,
}

impl StagedField {
    pub fn amounts(&self) -> &[f64] {
        &self.amounts
    }
}

/// One pheromone amount per grid cell.
///
/// Updates are synchronous: [`PheromoneField::compute`] reads only the
/// current amounts and returns a [`StagedField`], and
/// [`PheromoneField::commit`] swaps it in. Cell visiting order cannot bias
/// the result.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneField {
    torus: Torus,
    amounts: Vec<f64>,
}

impl PheromoneField {
    pub fn new(width: usize, height: usize) -> Self {
        let torus = Torus::new(width, height);
        Self {
            torus,
            amounts: vec![0.0; torus.len()],
        }
    }

    /// Amount at a cell; 0 off the grid.
    #[inline(always)]
    pub fn amount(&self, pos: Pos) -> f64 {
        if !self.torus.contains(pos) {
            return 0.0;
        }
        self.amounts[self.torus.index(pos)]
    }

    /// Adds pheromone to a cell. Off-grid deposits are dropped.
    #[inline(always)]
    pub fn deposit(&mut self, pos: Pos, amount: f64) {
        if !self.torus.contains(pos) {
            warn!(%pos, amount, "pheromone deposit out of bounds; ignored");
            return;
        }
        let idx = self.torus.index(pos);
        self.amounts[idx] += amount;
    }

    /// Read phase: next amount of every cell from current amounts only.
    pub fn compute(&self, params: FieldParams) -> StagedField {
        let amounts = (0..self.amounts.len())
            .map(|i| self.next_amount(self.torus.pos_of(i), params))
            .collect();
        StagedField { amounts }
    }

    /// Write phase.
    pub fn commit(&mut self, staged: StagedField) {
        debug_assert_eq!(staged.amounts.len(), self.amounts.len());
        self.amounts = staged.amounts;
    }

    pub fn update(&mut self, params: FieldParams) {
        let staged = self.compute(params);
        self.commit(staged);
    }

    fn next_amount(&self, pos: Pos, params: FieldParams) -> f64 {
        let current = self.amount(pos);
        let neighbors = self.torus.neighborhood(pos, Connectivity::Moore, false, 1);
        let sum = current + neighbors.iter().map(|&p| self.amount(p)).sum::<f64>();
        let average = sum / (neighbors.len() + 1) as f64;

        let next = (1.0 - params.evaporate) * (current + params.diffusion * (average - current));
        if next < params.lower_bound { 0.0 } else { next }
    }

    pub fn amounts(&self) -> &[f64] {
        &self.amounts
    }

    pub fn total(&self) -> f64 {
        self.amounts.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.amounts.iter().copied().fold(0.0, f64::max)
    }
}
