use antworld::simulation::AntState;
use antworld::{FoodPlacement, FoodSite, Pos, StopReason, World, WorldConfig};

fn base(width: usize, height: usize) -> WorldConfig {
    WorldConfig {
        width,
        height,
        initial_ants: 10,
        predator_count: 0,
        birth_rate: 0.0,
        max_steps_without_food: 1_000,
        home: Some(Pos::new(0, 0)),
        food: FoodPlacement::Sites {
            sites: vec![FoodSite {
                pos: Pos::new(width / 2, height / 2),
                amount: 100.0,
            }],
        },
        seed: Some(42),
        ..WorldConfig::default()
    }
}

#[test]
fn test_no_ants_halts_at_construction() {
    let world = World::new(WorldConfig {
        initial_ants: 0,
        ..base(20, 20)
    })
    .unwrap();
    assert!(!world.is_running());
    assert_eq!(world.stop_reason(), Some(StopReason::NoAntsLeft));
    assert_eq!(world.stop_reason().map(|r| r.as_str()), Some("no ants left"));
}

#[test]
fn test_no_food_halts_at_construction() {
    let world = World::new(WorldConfig {
        food: FoodPlacement::Sites { sites: vec![] },
        ..base(20, 20)
    })
    .unwrap();
    assert_eq!(world.stop_reason(), Some(StopReason::NoFoodLeft));
    assert_eq!(world.tick(), 0, "Halts before the first step");
}

#[test]
fn test_ants_checked_before_food() {
    let world = World::new(WorldConfig {
        initial_ants: 0,
        food: FoodPlacement::Sites { sites: vec![] },
        ..base(20, 20)
    })
    .unwrap();
    assert_eq!(world.stop_reason(), Some(StopReason::NoAntsLeft));
}

#[test]
fn test_food_decays_away() {
    let mut world = World::new(WorldConfig {
        food_decay_rate: 0.5,
        food: FoodPlacement::Sites {
            sites: vec![FoodSite {
                pos: Pos::new(10, 10),
                amount: 1.5,
            }],
        },
        ..base(20, 20)
    })
    .unwrap();
    assert!(world.is_running());

    assert_eq!(world.run_for(10), 1);
    assert_eq!(world.tick(), 1);
    assert_eq!(world.total_food(), 0.0);
    assert_eq!(world.stop_reason(), Some(StopReason::NoFoodLeft));
}

#[test]
fn test_last_predator_dying_halts() {
    let mut world = World::new(WorldConfig {
        predator_count: 1,
        predator_lifetime: 1,
        ..base(20, 20)
    })
    .unwrap();
    world.step();
    assert_eq!(world.predator_count(), 0);
    assert_eq!(world.stop_reason(), Some(StopReason::NoPredatorsLeft));
    assert_eq!(world.ant_count(), 10);
}

#[test]
fn test_births_floor_of_rate_times_population() {
    let mut world = World::new(WorldConfig {
        birth_rate: 0.5,
        ..base(20, 20)
    })
    .unwrap();
    world.step();
    assert_eq!(world.ant_count(), 15);
    world.step();
    assert_eq!(world.ant_count(), 22);

    let births: Vec<usize> = world.history().iter().map(|r| r.births).collect();
    assert_eq!(births, vec![5, 7]);
}

#[test]
fn test_same_seed_same_run() {
    let config = WorldConfig {
        seed: Some(2024),
        ..WorldConfig::default()
    };
    let mut a = World::new(config.clone()).unwrap();
    let mut b = World::new(config).unwrap();
    a.run_for(60);
    b.run_for(60);

    assert_eq!(a.history(), b.history());
    assert_eq!(a.entropy_history(), b.entropy_history());
    assert_eq!(a.field().amounts(), b.field().amounts());
    assert_eq!(a.predator_stats(), b.predator_stats());
}

#[test]
fn test_ant_follows_trail_to_food() {
    // Static field: no diffusion, no evaporation.
    let mut world = World::new(WorldConfig {
        width: 10,
        height: 10,
        initial_ants: 1,
        evaporate: 0.0,
        diffusion: 0.0,
        prob_random: 0.0,
        food_decay_rate: 0.0,
        food_search_radius: 0,
        home: Some(Pos::new(2, 5)),
        food: FoodPlacement::Sites {
            sites: vec![FoodSite {
                pos: Pos::new(7, 5),
                amount: 100.0,
            }],
        },
        ..base(10, 10)
    })
    .unwrap();
    for (i, x) in (3..=7).enumerate() {
        world.deposit_pheromone(Pos::new(x, 5), 10.0 * (i + 1) as f64);
    }

    let ant = |w: &World| w.registry().ants.values().next().cloned().unwrap();

    world.run_for(5);
    assert_eq!(ant(&world).pos, Pos::new(7, 5));
    assert_eq!(ant(&world).state, AntState::Foraging);

    world.step();
    let a = ant(&world);
    assert_eq!(a.state, AntState::Homing);
    assert_eq!(a.carrying, 1.0);
    assert_eq!(world.total_food(), 99.0);
}

/// Steps until the single ant picks up food, or `None` after `limit` steps.
fn steps_to_harvest(world: &mut World, limit: u64) -> Option<u64> {
    (1..=limit).find(|_| {
        world.step();
        world
            .registry()
            .ants
            .values()
            .any(|a| a.state == AntState::Homing)
    })
}

#[test]
fn test_ant_finds_food_without_trail() {
    // Food is 5 columns from home and sensed within 3 cells, so the ant needs
    // two moves before it can harvest on the third step. Without a trail it
    // wanders, and the hitting time has no fixed upper bound.
    let scenario = |seed| WorldConfig {
        width: 10,
        height: 10,
        initial_ants: 1,
        evaporate: 0.0,
        diffusion: 0.0,
        prob_random: 0.0,
        food_decay_rate: 0.0,
        home: Some(Pos::new(2, 5)),
        food: FoodPlacement::Sites {
            sites: vec![FoodSite {
                pos: Pos::new(7, 5),
                amount: 100.0,
            }],
        },
        seed: Some(seed),
        ..base(10, 10)
    };

    let steps: Vec<u64> = (0..100)
        .map(|seed| {
            let mut world = World::new(scenario(seed)).unwrap();
            steps_to_harvest(&mut world, 200)
                .unwrap_or_else(|| panic!("Seed {} did not find food in 200 steps", seed))
        })
        .collect();

    assert!(steps.iter().all(|&n| n >= 3));
    assert!(
        steps.iter().any(|&n| n > 5),
        "Without a trail some walks must take longer than the trail-guided 5 steps"
    );
}

#[test]
fn test_ant_brings_food_home() {
    let mut world = World::new(WorldConfig {
        width: 10,
        height: 10,
        initial_ants: 1,
        food_decay_rate: 0.0,
        home: Some(Pos::new(2, 2)),
        food: FoodPlacement::Sites {
            sites: vec![FoodSite {
                pos: Pos::new(4, 4),
                amount: 100.0,
            }],
        },
        ..base(10, 10)
    })
    .unwrap();

    // Food is within sensing range of home, so the ant harvests without
    // moving and delivers on the next step.
    world.step();
    assert_eq!(world.total_carrying(), 1.0);
    world.step();
    assert_eq!(world.home_amount(), 1.0);
    assert_eq!(world.total_carrying(), 0.0);
}

#[test]
fn test_history_tracks_every_step() {
    let mut world = World::new(WorldConfig {
        seed: Some(5),
        ..WorldConfig::default()
    })
    .unwrap();
    let ran = world.run_for(25);
    assert_eq!(world.history().len() as u64, ran);
    assert_eq!(world.entropy_history().len() as u64, ran);
    for (i, record) in world.history().iter().enumerate() {
        assert_eq!(record.tick, i as u64);
        assert!(record.entropy >= 0.0);
        assert!((0.0..=1.0).contains(&record.pheromone_exposure));
    }
}
