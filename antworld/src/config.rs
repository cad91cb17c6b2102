use serde::{Deserialize, Serialize};
use shared::{Connectivity, Pos};

use crate::error::ConfigError;

// Grid defaults
pub const DEFAULT_WIDTH: usize = 50;
pub const DEFAULT_HEIGHT: usize = 50;
pub const DEFAULT_FOOD_AMOUNT: f64 = 100.0;

/// A food cache placed at a fixed cell.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FoodSite {
    pub pos: Pos,
    pub amount: f64,
}

/// Where food caches are placed when the world is built.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "placement", rename_all = "snake_case")]
pub enum FoodPlacement {
    /// Explicit cells and amounts.
    Sites { sites: Vec<FoodSite> },
    /// `count` caches of `amount` each at uniformly random cells.
    Random { count: usize, amount: f64 },
}

impl Default for FoodPlacement {
    fn default() -> Self {
        let sites = [(22, 11), (35, 8), (18, 33)]
            .into_iter()
            .map(|xy| FoodSite {
                pos: Pos::from(xy),
                amount: DEFAULT_FOOD_AMOUNT,
            })
            .collect();
        FoodPlacement::Sites { sites }
    }
}

/// Every tunable parameter of a world. Missing TOML keys fall back to
/// [`WorldConfig::default`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,

    // Pheromone field
    pub evaporate: f64,
    pub diffusion: f64,
    pub initial_drop: f64,
    pub pheromone_lower_bound: f64,
    pub drop_rate: f64,

    // Ants
    pub initial_ants: usize,
    pub prob_random: f64,
    pub max_steps_without_food: u32,
    pub birth_rate: f64,
    pub carrying_capacity: f64,
    pub food_search_radius: usize,
    pub connectivity: Connectivity,
    pub home: Option<Pos>, // Grid center when absent

    // Food
    pub food: FoodPlacement,
    pub food_decay_rate: f64,

    // Predators
    pub predator_count: usize,
    pub predator_lifetime: u32,
    pub predator_max_steps_without_catch: u32,
    pub predator_reproduction_threshold: u32,

    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            evaporate: 0.5,
            diffusion: 1.0,
            initial_drop: 100.0,
            pheromone_lower_bound: 0.01,
            drop_rate: 0.9,
            initial_ants: 100,
            prob_random: 0.1,
            max_steps_without_food: 500,
            birth_rate: 0.001,
            carrying_capacity: 1.0,
            food_search_radius: 3,
            connectivity: Connectivity::Moore,
            home: None,
            food: FoodPlacement::default(),
            food_decay_rate: 0.01,
            predator_count: 1,
            predator_lifetime: 50,
            predator_max_steps_without_catch: 20,
            predator_reproduction_threshold: 20,
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Home cell, defaulting to the grid center.
    pub fn home_pos(&self) -> Pos {
        self.home
            .unwrap_or(Pos::new(self.width / 2, self.height / 2))
    }

    /// Checks every parameter; the first offending one is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }

        for (name, value) in [
            ("evaporate", self.evaporate),
            ("diffusion", self.diffusion),
            ("prob_random", self.prob_random),
            ("drop_rate", self.drop_rate),
            ("food_decay_rate", self.food_decay_rate),
            ("birth_rate", self.birth_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }

        for (name, value) in [
            ("initial_drop", self.initial_drop),
            ("pheromone_lower_bound", self.pheromone_lower_bound),
        ] {
            check_non_negative(name, value)?;
        }

        if !(self.carrying_capacity.is_finite() && self.carrying_capacity > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "carrying_capacity",
            });
        }
        if self.predator_lifetime == 0 {
            return Err(ConfigError::NotPositive {
                name: "predator_lifetime",
            });
        }
        if self.predator_reproduction_threshold == 0 {
            return Err(ConfigError::NotPositive {
                name: "predator_reproduction_threshold",
            });
        }

        self.check_in_bounds("home", self.home_pos())?;

        match &self.food {
            FoodPlacement::Sites { sites } => {
                for site in sites {
                    self.check_in_bounds("food site", site.pos)?;
                    check_non_negative("food amount", site.amount)?;
                }
            }
            FoodPlacement::Random { count, amount } => {
                if *count == 0 {
                    return Err(ConfigError::NotPositive { name: "food count" });
                }
                check_non_negative("food amount", *amount)?;
            }
        }

        Ok(())
    }

    fn check_in_bounds(&self, what: &'static str, pos: Pos) -> Result<(), ConfigError> {
        if pos.x < self.width && pos.y < self.height {
            return Ok(());
        }
        Err(ConfigError::OutOfBounds {
            what,
            pos,
            width: self.width,
            height: self.height,
        })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
