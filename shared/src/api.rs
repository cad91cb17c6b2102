use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell coordinate on the torus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Neighborhood shape used for movement and sensing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// 8-connected (Chebyshev radius).
    #[default]
    Moore,
    /// 4-connected (Manhattan radius).
    VonNeumann,
}

/// Why a run stopped. Listed in the priority they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    NoAntsLeft,
    NoFoodLeft,
    NoPredatorsLeft,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::NoAntsLeft => "no ants left",
            StopReason::NoFoodLeft => "no food left",
            StopReason::NoPredatorsLeft => "no predators left",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of collected data, taken once per step.
///
/// Population and resource columns are sampled before the step mutates the
/// world; `births`, `starved`, `eaten` and `entropy` describe the step itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub tick: u64,
    pub ants: usize,
    pub predators: usize,
    pub food: f64,
    pub home: f64,
    pub carrying: f64,
    pub food_distance: f64,
    pub pheromone_exposure: f64,
    pub entropy: f64,
    pub births: usize,
    pub starved: usize,
    pub eaten: usize,
}

/// Hunting statistics of a single predator (meal sizes are the streaks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredatorStats {
    pub lifetime: u32,
    pub kills_total: u32,
    pub kills_since_reproduction: u32,
    pub catch_streak: u32,
    pub streak_history: Vec<u32>,
}
