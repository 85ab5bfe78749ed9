use super::World;
use crate::agent::Mode;
use crate::field::Pheromone;
use serde::{Deserialize, Serialize};

/// Wall-clock cost of one `step`, microseconds per phase.
#[derive(Clone, Debug)]
pub struct StepTimings {
    pub agent_update_us: u64,
    pub field_update_us: u64,
    pub total_us: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub tick: usize,
    pub food_pheromone_total: f64,
    pub hill_pheromone_total: f64,
    pub food_remaining: u64,
    pub searching_count: usize,
    pub returning_count: usize,
    pub harvests: usize,
    pub deliveries: usize,
    pub total_harvests: usize,
    pub total_deliveries: usize,
}

/// Read-only view of one ant, for rendering or post-run inspection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AntSnapshot {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub carrying_food: bool,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub samples: Vec<StepMetrics>,
    pub total_harvests: usize,
    pub total_deliveries: usize,
    pub food_remaining: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub final_ants: Vec<AntSnapshot>,
}

impl World {
    pub(crate) fn collect_step_metrics(&self) -> StepMetrics {
        let searching_count = self
            .ants
            .iter()
            .filter(|a| a.mode == Mode::Searching)
            .count();
        StepMetrics {
            tick: self.tick,
            food_pheromone_total: self.field.total(Pheromone::Food),
            hill_pheromone_total: self.field.total(Pheromone::Hill),
            food_remaining: self.field.food_remaining(),
            searching_count,
            returning_count: self.ants.len() - searching_count,
            harvests: self.harvests_last_step,
            deliveries: self.deliveries_last_step,
            total_harvests: self.total_harvests,
            total_deliveries: self.total_deliveries,
        }
    }

    pub fn ant_snapshots(&self) -> Vec<AntSnapshot> {
        self.ants
            .iter()
            .map(|a| AntSnapshot {
                id: a.id,
                x: a.position[0],
                y: a.position[1],
                heading: a.heading,
                carrying_food: a.carrying_food(),
            })
            .collect()
    }
}
