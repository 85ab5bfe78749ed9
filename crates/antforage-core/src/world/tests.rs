use super::lifecycle::sniff_uphill;
use super::{ExperimentError, World, WorldInitError};
use crate::agent::{Ant, Mode};
use crate::config::SimConfig;
use crate::field::Field;
use crate::geometry::{self, Topology};
use crate::layout::Layout;

fn small_config() -> SimConfig {
    SimConfig {
        population: 30,
        width: 20,
        height: 20,
        seed: 7,
        ..SimConfig::default()
    }
}

fn small_world() -> World {
    World::from_layout(&Layout::default(), small_config()).expect("world init")
}

/// 3x3 torus: hill at (0, 0), one unit of food at (2, 0), static scent from
/// the toroidal distance to the hill.
fn tiny_forage_world() -> World {
    let mut field = Field::new(3, 3, Topology::Torus);
    for y in 0..3 {
        for x in 0..3 {
            let d = geometry::distance([x as f64, y as f64], [0.0, 0.0], 3, 3, Topology::Torus);
            field.cell_mut(x, y).hill_scent = 200.0 - d as f32;
        }
    }
    field.cell_mut(0, 0).is_hill = true;
    field.cell_mut(2, 0).food_source_id = 1;
    field.cell_mut(2, 0).food_units = 1;

    let config = SimConfig {
        population: 1,
        width: 3,
        height: 3,
        wiggle_max_deg: 0.0,
        ..SimConfig::default()
    };
    let ant = Ant::new(0, [0.5, 0.5], 0.0);
    World::try_new(field, vec![ant], config).expect("world init")
}

#[test]
fn fixed_seed_runs_are_identical() {
    let mut a = small_world();
    let mut b = small_world();
    for _ in 0..50 {
        a.step();
        b.step();
    }
    for (ant_a, ant_b) in a.ants().iter().zip(b.ants()) {
        assert_eq!(ant_a.position, ant_b.position);
        assert_eq!(ant_a.heading, ant_b.heading);
        assert_eq!(ant_a.mode, ant_b.mode);
    }
    assert_eq!(a.field().cells(), b.field().cells());
    assert_eq!(a.tick(), 50);
}

#[test]
fn pheromones_stay_non_negative_over_a_run() {
    let mut world = small_world();
    for _ in 0..100 {
        world.step();
        for cell in world.field().cells() {
            assert!(cell.food_pheromone >= 0.0);
            assert!(cell.hill_pheromone >= 0.0);
        }
    }
}

#[test]
fn staggered_start_delays_first_action() {
    let mut world = small_world();
    let spawn: Vec<[f64; 2]> = world.ants().iter().map(|a| a.position).collect();
    let headings: Vec<f64> = world.ants().iter().map(|a| a.heading).collect();

    world.step();
    for ant in world.ants().iter().filter(|a| a.id >= 1) {
        assert_eq!(ant.position, spawn[ant.id as usize]);
        assert_eq!(ant.heading, headings[ant.id as usize]);
        assert_eq!(ant.mode, Mode::Searching);
    }

    world.step();
    world.step();
    for ant in world.ants().iter().filter(|a| a.id >= 3) {
        assert_eq!(ant.position, spawn[ant.id as usize]);
        assert_eq!(ant.heading, headings[ant.id as usize]);
    }
}

#[test]
fn mode_flips_happen_only_where_they_may() {
    let mut world = small_world();
    for _ in 0..200 {
        let before: Vec<Mode> = world.ants().iter().map(|a| a.mode).collect();
        world.step();

        let mut picked_up = 0;
        let mut dropped_off = 0;
        for (ant, prev) in world.ants().iter().zip(&before) {
            match (*prev, ant.mode) {
                (Mode::Searching, Mode::Returning) => {
                    picked_up += 1;
                    // The pickup tick is stationary, so the ant still sits
                    // on the source cell it harvested.
                    let (x, y) = geometry::cell_index(
                        ant.position,
                        world.field().width,
                        world.field().height,
                        world.field().topology,
                    )
                    .unwrap();
                    assert!(world.cell(x, y).food_source_id > 0);
                }
                (Mode::Returning, Mode::Searching) => dropped_off += 1,
                _ => {}
            }
        }
        assert_eq!(picked_up, world.harvests_last_step);
        assert_eq!(dropped_off, world.deliveries_last_step);
    }
}

#[test]
fn sniff_tie_break_prefers_right() {
    let mut field = Field::new(5, 5, Topology::Torus);
    field.cell_mut(3, 2).food_pheromone = 1.0; // ahead
    field.cell_mut(3, 3).food_pheromone = 2.0; // right
    field.cell_mut(3, 1).food_pheromone = 2.0; // left
    let mut ant = Ant::new(0, [2.5, 2.5], 0.0);

    sniff_uphill(&mut ant, &field, |c| c.food_pheromone);
    assert_eq!(ant.heading, 45.0);
}

#[test]
fn sniff_keeps_heading_when_ahead_wins() {
    let mut field = Field::new(5, 5, Topology::Torus);
    field.cell_mut(3, 2).food_pheromone = 3.0;
    field.cell_mut(3, 3).food_pheromone = 2.0;
    field.cell_mut(3, 1).food_pheromone = 2.0;
    let mut ant = Ant::new(0, [2.5, 2.5], 0.0);

    sniff_uphill(&mut ant, &field, |c| c.food_pheromone);
    assert_eq!(ant.heading, 0.0);
}

#[test]
fn sniff_turns_toward_the_stronger_side() {
    let mut field = Field::new(5, 5, Topology::Torus);
    field.cell_mut(3, 3).food_pheromone = 1.0; // right
    field.cell_mut(3, 1).food_pheromone = 4.0; // left
    let mut ant = Ant::new(0, [2.5, 2.5], 0.0);

    sniff_uphill(&mut ant, &field, |c| c.food_pheromone);
    assert_eq!(ant.heading, 315.0);
}

#[test]
fn forages_and_returns_on_a_tiny_torus() {
    let mut world = tiny_forage_world();

    // Three steps out: the ant reaches the food, harvests, and stays put.
    for _ in 0..3 {
        world.step();
    }
    let ant = &world.ants()[0];
    assert!(ant.carrying_food());
    assert_eq!(ant.position, [2.5, 0.5]);
    assert_eq!(world.cell(2, 0).food_units, 0);
    assert_eq!(world.total_harvests, 1);

    // Two more steps home along the scent gradient.
    world.step();
    world.step();
    let ant = &world.ants()[0];
    assert!(ant.carrying_food());
    assert_eq!(
        geometry::cell_index(ant.position, 3, 3, Topology::Torus),
        Some((0, 0))
    );

    // The drop happens on the next tick; the ant heads out again empty.
    world.step();
    let ant = &world.ants()[0];
    assert!(!ant.carrying_food());
    assert_eq!(world.total_deliveries, 1);
    assert_eq!(world.field().food_remaining(), 0);
}

#[test]
fn returning_ants_lay_food_trail() {
    let mut world = tiny_forage_world();
    for _ in 0..4 {
        world.step();
    }
    // The ant deposited on (2, 0) the tick after pickup; diffusion and
    // evaporation have run but the trail is still there.
    assert!(world.field().total(crate::field::Pheromone::Food) > 0.0);
}

#[test]
fn bounded_edge_reverses_instead_of_moving() {
    let config = SimConfig {
        population: 1,
        width: 5,
        height: 5,
        topology: Topology::Bounded,
        wiggle_max_deg: 0.0,
        ..SimConfig::default()
    };
    let field = Field::new(5, 5, Topology::Bounded);
    // Heading north out of the top row.
    let ant = Ant::new(0, [2.5, 0.5], 270.0);
    let mut world = World::try_new(field, vec![ant], config).expect("world init");

    world.step();
    let ant = &world.ants()[0];
    assert_eq!(ant.position, [2.5, 0.5]);
    assert_eq!(ant.heading, 90.0);
}

#[test]
fn experiment_samples_on_schedule() {
    let mut world = small_world();
    let summary = world
        .try_run_experiment(20, 5)
        .expect("experiment should run");
    assert_eq!(summary.samples.len(), 4);
    assert_eq!(summary.samples[0].tick, 5);
    assert_eq!(summary.samples[3].tick, 20);
    assert_eq!(summary.steps, 20);

    let json = serde_json::to_string(&summary).expect("summary serializes");
    let back: super::RunSummary = serde_json::from_str(&json).expect("summary round-trips");
    assert_eq!(back.samples.len(), summary.samples.len());
    assert_eq!(back.schema_version, 1);
}

#[test]
fn experiment_rejects_bad_sampling() {
    let mut world = small_world();
    assert!(matches!(
        world.try_run_experiment(10, 0),
        Err(ExperimentError::InvalidSampleEvery)
    ));
    assert!(matches!(
        world.try_run_experiment(World::MAX_EXPERIMENT_STEPS + 1, 1),
        Err(ExperimentError::TooManySteps { .. })
    ));
}

#[test]
fn try_new_rejects_mismatched_population() {
    let config = SimConfig {
        population: 2,
        width: 4,
        height: 4,
        ..SimConfig::default()
    };
    let field = Field::new(4, 4, Topology::Torus);
    let result = World::try_new(field, vec![Ant::new(0, [0.5, 0.5], 0.0)], config);
    assert!(matches!(
        result,
        Err(WorldInitError::PopulationMismatch {
            expected: 2,
            actual: 1
        })
    ));
}

#[test]
fn try_new_rejects_mismatched_field() {
    let config = SimConfig {
        population: 1,
        width: 4,
        height: 4,
        ..SimConfig::default()
    };
    let field = Field::new(5, 4, Topology::Torus);
    let result = World::try_new(field, vec![Ant::new(0, [0.5, 0.5], 0.0)], config);
    assert!(matches!(
        result,
        Err(WorldInitError::FieldSizeMismatch { .. })
    ));
}

#[test]
fn metrics_count_modes_and_food() {
    let mut world = tiny_forage_world();
    for _ in 0..3 {
        world.step();
    }
    let metrics = world.collect_step_metrics();
    assert_eq!(metrics.returning_count, 1);
    assert_eq!(metrics.searching_count, 0);
    assert_eq!(metrics.food_remaining, 0);
    assert_eq!(metrics.total_harvests, 1);
    assert!(metrics.hill_pheromone_total > 0.0);
}
