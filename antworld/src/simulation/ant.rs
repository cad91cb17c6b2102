use rand::Rng;
use rand::seq::IndexedRandom;
use shared::{Connectivity, Pos};
use slotmap::SlotMap;
use tracing::{debug, warn};

use super::MOVE_RADIUS;
use super::context::StepContext;
use super::entity::{AntKey, EntityRef, FoodKey, HomeKey};
use super::food::{Food, Home};
use super::grid::SpatialGrid;

/// What an ant is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntState {
    /// Searching for food: follows the trail or wanders.
    Foraging,
    /// Carrying food back to its home, laying trail on the way.
    Homing,
}

/// Result of one ant step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntOutcome {
    Alive,
    /// Went too long without food; the caller must despawn it.
    Starved,
}

/// State of an ant.
#[derive(Debug, Clone, PartialEq)]
pub struct Ant {
    pub key: AntKey,
    pub home: HomeKey,
    pub pos: Pos,
    pub state: AntState,
    pub carrying: f64,
    pub drop: f64,
    pub steps_without_food: u32,
    pub connectivity: Connectivity,
}

impl Ant {
    /// Create a new foraging ant.
    pub fn new(key: AntKey, home: HomeKey, pos: Pos, connectivity: Connectivity) -> Self {
        Self {
            key,
            home,
            pos,
            state: AntState::Foraging,
            carrying: 0.0,
            drop: 0.0,
            steps_without_food: 0,
            connectivity,
        }
    }

    /// Update ant state and behavior for one step.
    ///
    /// Starvation is checked first; a starved ant does nothing else and is
    /// left for the caller to remove.
    pub fn step(
        &mut self,
        ctx: &mut StepContext<'_>,
        foods: &mut SlotMap<FoodKey, Food>,
        homes: &mut SlotMap<HomeKey, Home>,
    ) -> AntOutcome {
        self.steps_without_food += 1;
        if self.steps_without_food > ctx.config.max_steps_without_food {
            return AntOutcome::Starved;
        }

        match self.state {
            AntState::Foraging => self.forage(ctx, foods),
            AntState::Homing => self.head_home(ctx, homes),
        }
        AntOutcome::Alive
    }

    fn forage(&mut self, ctx: &mut StepContext<'_>, foods: &mut SlotMap<FoodKey, Food>) {
        if let Some(food) = self.find_food(ctx.grid, ctx.config.food_search_radius, foods) {
            self.steps_without_food = 0;
            self.carrying = food.harvest(ctx.config.carrying_capacity);
            self.state = AntState::Homing;
            self.drop = ctx.config.initial_drop;
            return;
        }

        if ctx.rng.random_bool(ctx.config.prob_random) {
            self.random_move(ctx);
        } else {
            self.gradient_move(ctx);
        }
    }

    /// First food cache within `radius` (center included) that has food.
    fn find_food<'f>(
        &self,
        grid: &SpatialGrid,
        radius: usize,
        foods: &'f mut SlotMap<FoodKey, Food>,
    ) -> Option<&'f mut Food> {
        let key = grid
            .neighbors(self.pos, self.connectivity, true, radius)
            .into_iter()
            .filter_map(|entity| match entity {
                EntityRef::Food(key) => Some(key),
                _ => None,
            })
            .find(|&key| foods.get(key).is_some_and(Food::has_food))?;
        foods.get_mut(key)
    }

    fn head_home(&mut self, ctx: &mut StepContext<'_>, homes: &mut SlotMap<HomeKey, Home>) {
        let Some(home) = homes.get_mut(self.home) else {
            warn!(ant = ?self.key, home = ?self.home, "ant's home no longer exists");
            return;
        };

        if self.pos == home.pos {
            home.deposit(self.carrying);
            self.carrying = 0.0;
            self.drop = 0.0;
            self.state = AntState::Foraging;
            return;
        }

        let home_pos = home.pos;
        ctx.field.deposit(self.pos, self.drop);
        self.drop *= ctx.config.drop_rate;
        self.home_move(ctx, home_pos);
    }

    /// Step to the neighbor closest to home; ties are broken at random.
    fn home_move(&mut self, ctx: &mut StepContext<'_>, home_pos: Pos) {
        let torus = ctx.grid.torus();
        let candidates = ctx
            .grid
            .neighborhood(self.pos, self.connectivity, false, MOVE_RADIUS);
        let Some(best) = candidates
            .iter()
            .map(|&p| torus.distance_sq(p, home_pos))
            .min()
        else {
            debug!(ant = ?self.key, pos = %self.pos, "no neighbor cells; home move skipped");
            return;
        };

        let nearest: Vec<Pos> = candidates
            .into_iter()
            .filter(|&p| torus.distance_sq(p, home_pos) == best)
            .collect();
        if let Some(&next) = nearest.choose(&mut *ctx.rng) {
            self.move_to(ctx.grid, next);
        }
    }

    /// Step up the pheromone gradient. The first neighbor seen with the
    /// strongest trail above the lower bound wins; without any trail the ant
    /// wanders.
    fn gradient_move(&mut self, ctx: &mut StepContext<'_>) {
        let mut strongest = ctx.config.pheromone_lower_bound;
        let mut target = None;
        for p in ctx
            .grid
            .neighborhood(self.pos, self.connectivity, false, MOVE_RADIUS)
        {
            let amount = ctx.field.amount(p);
            if amount > strongest {
                strongest = amount;
                target = Some(p);
            }
        }

        match target {
            Some(p) => self.move_to(ctx.grid, p),
            None => self.random_move(ctx),
        }
    }

    /// Step to any cell of the neighborhood, staying put included.
    fn random_move(&mut self, ctx: &mut StepContext<'_>) {
        let choices = ctx
            .grid
            .neighborhood(self.pos, self.connectivity, true, MOVE_RADIUS);
        if let Some(&next) = choices.choose(&mut *ctx.rng) {
            self.move_to(ctx.grid, next);
        }
    }

    fn move_to(&mut self, grid: &mut SpatialGrid, next: Pos) {
        grid.move_entity(EntityRef::Ant(self.key), self.pos, next);
        self.pos = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FoodPlacement, WorldConfig};
    use crate::simulation::grid::SpatialGrid;
    use crate::simulation::pheromone::PheromoneField;
    use crate::simulation::registry::Registry;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        config: WorldConfig,
        grid: SpatialGrid,
        field: PheromoneField,
        registry: Registry,
        rng: ChaCha8Rng,
        home: HomeKey,
    }

    impl Fixture {
        fn new(config: WorldConfig, home: Pos) -> Self {
            let mut grid = SpatialGrid::new(config.width, config.height);
            let mut registry = Registry::default();
            let home = registry.spawn_home(&mut grid, home);
            Self {
                field: PheromoneField::new(config.width, config.height),
                config,
                grid,
                registry,
                rng: ChaCha8Rng::seed_from_u64(7),
                home,
            }
        }

        fn ant(&mut self, pos: Pos) -> AntKey {
            self.registry
                .spawn_ant(&mut self.grid, self.home, pos, Connectivity::Moore)
        }

        fn food(&mut self, pos: Pos, amount: f64) -> FoodKey {
            self.registry.spawn_food(&mut self.grid, pos, amount)
        }

        fn step(&mut self, key: AntKey) -> AntOutcome {
            let mut ctx = StepContext {
                config: &self.config,
                grid: &mut self.grid,
                field: &mut self.field,
                rng: &mut self.rng,
            };
            let Registry {
                ants, foods, homes, ..
            } = &mut self.registry;
            ants[key].step(&mut ctx, foods, homes)
        }

        fn get(&self, key: AntKey) -> &Ant {
            &self.registry.ants[key]
        }
    }

    fn config() -> WorldConfig {
        WorldConfig {
            width: 10,
            height: 10,
            prob_random: 0.0,
            initial_drop: 100.0,
            drop_rate: 0.5,
            max_steps_without_food: 100,
            food: FoodPlacement::Sites { sites: vec![] },
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_starves_after_max_steps() {
        let mut fx = Fixture::new(
            WorldConfig {
                max_steps_without_food: 2,
                ..config()
            },
            Pos::new(0, 0),
        );
        let ant = fx.ant(Pos::new(5, 5));
        assert_eq!(fx.step(ant), AntOutcome::Alive);
        assert_eq!(fx.step(ant), AntOutcome::Alive);
        assert_eq!(fx.step(ant), AntOutcome::Starved);
    }

    #[test]
    fn test_steps_without_food_counts_each_step() {
        let mut fx = Fixture::new(config(), Pos::new(0, 0));
        let ant = fx.ant(Pos::new(5, 5));
        for expected in 1..=10 {
            fx.step(ant);
            assert_eq!(fx.get(ant).steps_without_food, expected);
        }
    }

    #[test]
    fn test_harvests_food_in_range() {
        let mut fx = Fixture::new(config(), Pos::new(0, 0));
        let ant = fx.ant(Pos::new(5, 5));
        let food = fx.food(Pos::new(7, 8), 10.0);
        fx.registry.ants[ant].steps_without_food = 40;

        fx.step(ant);

        let a = fx.get(ant);
        assert_eq!(a.state, AntState::Homing);
        assert_eq!(a.carrying, 1.0);
        assert_eq!(a.drop, 100.0);
        assert_eq!(a.steps_without_food, 0, "Counter resets on the harvest step");
        assert_eq!(a.pos, Pos::new(5, 5), "Harvesting takes the whole step");
        assert_eq!(fx.registry.foods[food].amount, 9.0);
    }

    #[test]
    fn test_ignores_dust_food() {
        let mut fx = Fixture::new(config(), Pos::new(0, 0));
        let ant = fx.ant(Pos::new(5, 5));
        fx.food(Pos::new(5, 6), 1.0);
        fx.step(ant);
        assert_eq!(fx.get(ant).state, AntState::Foraging);
    }

    #[test]
    fn test_harvest_clamped_to_available() {
        let mut fx = Fixture::new(
            WorldConfig {
                carrying_capacity: 5.0,
                ..config()
            },
            Pos::new(0, 0),
        );
        let ant = fx.ant(Pos::new(5, 5));
        let food = fx.food(Pos::new(5, 5), 1.5);
        fx.step(ant);
        assert_eq!(fx.get(ant).carrying, 1.5);
        assert_eq!(fx.registry.foods[food].amount, 0.0);
    }

    #[test]
    fn test_gradient_move_follows_strongest_trail() {
        let mut fx = Fixture::new(config(), Pos::new(0, 0));
        let ant = fx.ant(Pos::new(2, 2));
        fx.field.deposit(Pos::new(1, 1), 2.0);
        fx.field.deposit(Pos::new(3, 2), 5.0);
        fx.step(ant);
        assert_eq!(fx.get(ant).pos, Pos::new(3, 2));
        assert_eq!(fx.grid.count_ants_at(Pos::new(3, 2)), 1);
        assert_eq!(fx.grid.count_ants_at(Pos::new(2, 2)), 0);
    }

    #[test]
    fn test_gradient_tie_takes_first_seen() {
        let mut fx = Fixture::new(config(), Pos::new(0, 0));
        let ant = fx.ant(Pos::new(2, 2));
        fx.field.deposit(Pos::new(3, 2), 5.0);
        fx.field.deposit(Pos::new(1, 2), 5.0);
        fx.step(ant);
        assert_eq!(fx.get(ant).pos, Pos::new(1, 2), "Offset (-1, 0) is scanned before (1, 0)");
    }

    #[test]
    fn test_trail_below_lower_bound_is_ignored() {
        let mut fx = Fixture::new(config(), Pos::new(0, 0));
        let ant = fx.ant(Pos::new(2, 2));
        fx.field.deposit(Pos::new(3, 2), 0.005);
        fx.step(ant);
        let pos = fx.get(ant).pos;
        assert!(
            fx.grid
                .neighborhood(Pos::new(2, 2), Connectivity::Moore, true, 1)
                .contains(&pos),
            "Falls back to a random move"
        );
    }

    #[test]
    fn test_homing_lays_trail_and_approaches_home() {
        let mut fx = Fixture::new(config(), Pos::new(0, 0));
        let ant = fx.ant(Pos::new(5, 5));
        {
            let a = &mut fx.registry.ants[ant];
            a.state = AntState::Homing;
            a.carrying = 1.0;
            a.drop = 100.0;
        }
        fx.step(ant);
        assert_eq!(fx.field.amount(Pos::new(5, 5)), 100.0);
        assert_eq!(fx.get(ant).drop, 50.0);
        assert_eq!(fx.get(ant).pos, Pos::new(4, 4));

        fx.step(ant);
        assert_eq!(fx.field.amount(Pos::new(4, 4)), 50.0);
        assert_eq!(fx.get(ant).pos, Pos::new(3, 3));
    }

    #[test]
    fn test_homing_takes_the_wrapped_shortcut() {
        let mut fx = Fixture::new(config(), Pos::new(0, 0));
        let ant = fx.ant(Pos::new(9, 9));
        fx.registry.ants[ant].state = AntState::Homing;
        fx.step(ant);
        assert_eq!(fx.get(ant).pos, Pos::new(0, 0));
    }

    #[test]
    fn test_delivers_food_at_home() {
        let mut fx = Fixture::new(config(), Pos::new(4, 4));
        let ant = fx.ant(Pos::new(4, 4));
        {
            let a = &mut fx.registry.ants[ant];
            a.state = AntState::Homing;
            a.carrying = 1.0;
            a.drop = 12.0;
        }
        fx.step(ant);
        let a = fx.get(ant);
        assert_eq!(a.state, AntState::Foraging);
        assert_eq!(a.carrying, 0.0);
        assert_eq!(a.drop, 0.0);
        assert_eq!(fx.registry.homes[fx.home].amount, 1.0);
        assert_eq!(fx.field.total(), 0.0, "No trail is laid on delivery");
    }

    #[test]
    fn test_homing_without_home_stays_put() {
        let mut fx = Fixture::new(config(), Pos::new(0, 0));
        let ant = fx.ant(Pos::new(5, 5));
        fx.registry.ants[ant].state = AntState::Homing;
        fx.registry.homes.remove(fx.home);
        assert_eq!(fx.step(ant), AntOutcome::Alive);
        assert_eq!(fx.get(ant).pos, Pos::new(5, 5));
        assert_eq!(fx.get(ant).state, AntState::Homing);
    }
}
