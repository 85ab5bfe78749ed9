use super::metrics::StepTimings;
use super::World;
use crate::agent::{Ant, Mode};
use crate::field::{Cell, Field, Pheromone};
use crate::geometry::{self, Topology};
use rand::Rng;
use std::time::Instant;

const SNIFF_RIGHT: f64 = 45.0;
const SNIFF_LEFT: f64 = -45.0;
const SNIFF_DISTANCE: f64 = 1.0;
const TURN_STEP: f64 = 45.0;
const STEP_DISTANCE: f64 = 1.0;

impl World {
    /// Advance the world by one tick, in fixed order: every ant in creation
    /// order, then diffusion of both channels, then evaporation of both,
    /// then the tick counter.
    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();
        self.harvests_last_step = 0;
        self.deliveries_last_step = 0;

        let t0 = Instant::now();
        for index in 0..self.ants.len() {
            // Staggered departure: ant `id` idles until the tick catches up.
            if self.tick < self.ants[index].id as usize {
                continue;
            }
            self.step_ant(index);
        }
        let agent_update_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        let food_diffusion = (self.config.food_diffusion / 100.0) as f32;
        let hill_diffusion = (self.config.hill_diffusion / 100.0) as f32;
        let food_evaporation = (self.config.food_evaporation / 100.0) as f32;
        let hill_evaporation = (self.config.hill_evaporation / 100.0) as f32;
        self.field.diffuse(Pheromone::Food, food_diffusion);
        self.field.diffuse(Pheromone::Hill, hill_diffusion);
        self.field.evaporate(Pheromone::Food, food_evaporation);
        self.field.evaporate(Pheromone::Hill, hill_evaporation);
        let field_update_us = t1.elapsed().as_micros() as u64;

        self.tick += 1;
        StepTimings {
            agent_update_us,
            field_update_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }

    /// One ant's tick: mode behavior, then wiggle, then one step of
    /// movement. Deposits land on the shared field immediately, so later
    /// ants in the same tick see them.
    fn step_ant(&mut self, index: usize) {
        let Self {
            field,
            ants,
            config,
            rng,
            harvests_last_step,
            deliveries_last_step,
            total_harvests,
            total_deliveries,
            ..
        } = self;
        let ant = &mut ants[index];
        let Some((x, y)) =
            geometry::cell_index(ant.position, field.width, field.height, field.topology)
        else {
            return;
        };

        match ant.mode {
            Mode::Returning => {
                if field.cell(x, y).is_hill {
                    // Drop the food and head back out.
                    ant.mode = Mode::Searching;
                    ant.reverse();
                    *deliveries_last_step += 1;
                    *total_deliveries += 1;
                } else {
                    field.deposit(Pheromone::Food, x, y, config.pheromone_deposit);
                    // Direct gradient homing on the static scent, no trail
                    // needed.
                    sniff_uphill(ant, field, |cell| cell.hill_scent);
                }
            }
            Mode::Searching => {
                if field.harvest(x, y) {
                    ant.mode = Mode::Returning;
                    ant.reverse();
                    *harvests_last_step += 1;
                    *total_harvests += 1;
                    // The pickup tick is stationary.
                    return;
                }
                field.deposit(Pheromone::Hill, x, y, config.pheromone_deposit);
                // Trail-following only inside the configured band.
                let here = field.cell(x, y).food_pheromone;
                if (config.trail_follow_min..config.trail_follow_max).contains(&here) {
                    sniff_uphill(ant, field, |cell| cell.food_pheromone);
                }
            }
        }

        if config.wiggle_max_deg > 0.0 {
            ant.turn_right(rng.random_range(0.0..config.wiggle_max_deg));
            ant.turn_left(rng.random_range(0.0..config.wiggle_max_deg));
        }
        advance(ant, field);
    }
}

/// Compare the scent one step ahead against ahead-right and ahead-left, and
/// turn 45 degrees toward the strongest reading. Keeps the heading when
/// neither side beats ahead; ties between the sides go right.
pub(crate) fn sniff_uphill(ant: &mut Ant, field: &Field, scent: impl Fn(&Cell) -> f32) {
    let ahead = scent_at(ant, field, 0.0, &scent);
    let right = scent_at(ant, field, SNIFF_RIGHT, &scent);
    let left = scent_at(ant, field, SNIFF_LEFT, &scent);
    if right <= ahead && left <= ahead {
        return;
    }
    if right >= left {
        ant.turn_right(TURN_STEP);
    } else {
        ant.turn_left(TURN_STEP);
    }
}

/// Scent on the cell one step out at `relative_deg`; off-grid reads zero.
fn scent_at(
    ant: &Ant,
    field: &Field,
    relative_deg: f64,
    scent: &impl Fn(&Cell) -> f32,
) -> f32 {
    geometry::neighbor_in_direction(
        ant.position,
        ant.heading,
        relative_deg,
        SNIFF_DISTANCE,
        field.width,
        field.height,
        field.topology,
    )
    .map(|(x, y)| scent(field.cell(x, y)))
    .unwrap_or(0.0)
}

/// Advance one unit along the heading. When the cell ahead does not exist
/// (bounded topology), reverse instead of moving.
fn advance(ant: &mut Ant, field: &Field) {
    let ahead = geometry::neighbor_in_direction(
        ant.position,
        ant.heading,
        0.0,
        STEP_DISTANCE,
        field.width,
        field.height,
        field.topology,
    );
    if ahead.is_none() {
        ant.reverse();
        return;
    }
    let dir = geometry::heading_vector(ant.heading);
    let next = [
        ant.position[0] + dir[0] * STEP_DISTANCE,
        ant.position[1] + dir[1] * STEP_DISTANCE,
    ];
    ant.position = match field.topology {
        Topology::Torus => geometry::wrap_position(next, field.width, field.height),
        Topology::Bounded => next,
    };
}
