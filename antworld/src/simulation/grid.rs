use rand::Rng;
use shared::{Connectivity, Pos, torus_distance, torus_distance_sq, wrap_coord};
use tracing::warn;

use super::entity::EntityRef;

/// Dimensions of a wrapping grid plus the coordinate math on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torus {
    pub width: usize,
    pub height: usize,
}

impl Torus {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Row-major index of an in-bounds position.
    #[inline(always)]
    pub fn index(&self, pos: Pos) -> usize {
        pos.y * self.width + pos.x
    }

    #[inline(always)]
    pub fn pos_of(&self, index: usize) -> Pos {
        Pos::new(index % self.width, index / self.width)
    }

    #[inline(always)]
    pub fn offset(&self, pos: Pos, dx: isize, dy: isize) -> Pos {
        Pos::new(
            wrap_coord(pos.x as isize + dx, self.width),
            wrap_coord(pos.y as isize + dy, self.height),
        )
    }

    /// Cells around `pos` within `radius`, wrapped and deduplicated.
    ///
    /// Order is x-offset major, then y-offset, from negative to positive.
    /// When `include_center` is false the center is left out even if the
    /// wrap folds a neighbor back onto it.
    pub fn neighborhood(
        &self,
        pos: Pos,
        connectivity: Connectivity,
        include_center: bool,
        radius: usize,
    ) -> Vec<Pos> {
        let r = radius as isize;
        let side = 2 * radius + 1;
        let mut cells = Vec::with_capacity((side * side).min(self.len()));
        for dx in -r..=r {
            for dy in -r..=r {
                if connectivity == Connectivity::VonNeumann && dx.abs() + dy.abs() > r {
                    continue;
                }
                let cell = self.offset(pos, dx, dy);
                if !include_center && cell == pos {
                    continue;
                }
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Every position exactly once, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Pos> + use<> {
        let torus = *self;
        (0..torus.len()).map(move |i| torus.pos_of(i))
    }

    pub fn random_pos<R: Rng + ?Sized>(&self, rng: &mut R) -> Pos {
        Pos::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        )
    }

    #[inline(always)]
    pub fn distance_sq(&self, a: Pos, b: Pos) -> usize {
        torus_distance_sq(a, b, self.width, self.height)
    }

    pub fn distance(&self, a: Pos, b: Pos) -> f64 {
        torus_distance(a, b, self.width, self.height)
    }
}

/// Multi-occupancy spatial index: each cell lists the entities standing on it.
///
/// Entities keep their own position; the grid only mirrors it, so every
/// move and removal names the cell the entity is leaving.
pub struct SpatialGrid {
    torus: Torus,
    cells: Vec<Vec<EntityRef>>,
}

impl SpatialGrid {
    pub fn new(width: usize, height: usize) -> Self {
        let torus = Torus::new(width, height);
        Self {
            torus,
            cells: vec![Vec::new(); torus.len()],
        }
    }

    #[inline(always)]
    pub fn torus(&self) -> Torus {
        self.torus
    }

    /// Registers an entity in a cell.
    pub fn place(&mut self, entity: EntityRef, pos: Pos) {
        if !self.torus.contains(pos) {
            warn!(?entity, %pos, "attempted to place entity out of bounds; not registered");
            return;
        }
        let idx = self.torus.index(pos);
        self.cells[idx].push(entity);
    }

    /// Unregisters an entity from a cell.
    /// Returns true if the entity was found there and removed.
    pub fn remove(&mut self, entity: EntityRef, pos: Pos) -> bool {
        if self.torus.contains(pos) {
            let idx = self.torus.index(pos);
            let cell = &mut self.cells[idx];
            if let Some(i) = cell.iter().position(|e| *e == entity) {
                cell.swap_remove(i);
                return true;
            }
        }
        warn!(?entity, %pos, "entity not found in its cell during removal");
        false
    }

    /// Moves an entity between cells, keeping the index consistent.
    pub fn move_entity(&mut self, entity: EntityRef, from: Pos, to: Pos) {
        if from == to {
            return;
        }
        if !self.remove(entity, from) {
            warn!(?entity, %from, %to, "moving an entity that was not registered at its old cell");
        }
        self.place(entity, to);
    }

    pub fn entities_at(&self, pos: Pos) -> &[EntityRef] {
        if !self.torus.contains(pos) {
            return &[];
        }
        &self.cells[self.torus.index(pos)]
    }

    pub fn count_ants_at(&self, pos: Pos) -> usize {
        self.entities_at(pos)
            .iter()
            .filter(|e| matches!(e, EntityRef::Ant(_)))
            .count()
    }

    pub fn neighborhood(
        &self,
        pos: Pos,
        connectivity: Connectivity,
        include_center: bool,
        radius: usize,
    ) -> Vec<Pos> {
        self.torus
            .neighborhood(pos, connectivity, include_center, radius)
    }

    /// Entities standing anywhere in the neighborhood of `pos`.
    pub fn neighbors(
        &self,
        pos: Pos,
        connectivity: Connectivity,
        include_center: bool,
        radius: usize,
    ) -> Vec<EntityRef> {
        self.neighborhood(pos, connectivity, include_center, radius)
            .into_iter()
            .flat_map(|cell| self.entities_at(cell).iter().copied())
            .collect()
    }

    pub fn cells(&self) -> impl Iterator<Item = Pos> + use<> {
        self.torus.cells()
    }

    pub fn random_pos<R: Rng + ?Sized>(&self, rng: &mut R) -> Pos {
        self.torus.random_pos(rng)
    }

    /// Total number of registrations across all cells.
    pub fn occupancy(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}
