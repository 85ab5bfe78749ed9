use crate::geometry::Topology;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Simulation parameters, fixed for the length of a run.
///
/// Diffusion and evaporation rates are percentages in `[0, 100]`; the world
/// divides by 100 when driving the field operators.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub population: usize,
    pub width: usize,
    pub height: usize,
    pub food_diffusion: f64,
    pub food_evaporation: f64,
    pub hill_diffusion: f64,
    pub hill_evaporation: f64,
    pub topology: Topology,
    pub seed: u64,
    /// Searching ants follow the food trail only while the concentration on
    /// their cell lies in `[trail_follow_min, trail_follow_max)`.
    pub trail_follow_min: f32,
    pub trail_follow_max: f32,
    /// Amount added to a cell's channel by one deposit.
    pub pheromone_deposit: f32,
    /// Cap on each of the two uniform wiggle draws, degrees.
    pub wiggle_max_deg: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population: 100,
            width: 71,
            height: 71,
            food_diffusion: 20.0,
            food_evaporation: 8.0,
            hill_diffusion: 1.0,
            hill_evaporation: 8.0,
            topology: Topology::Torus,
            seed: 42,
            trail_follow_min: 0.05,
            trail_follow_max: 2.0,
            pheromone_deposit: 60.0,
            wiggle_max_deg: 40.0,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.population == 0 {
            return Err(SimConfigError::NonPositivePopulation);
        }
        if self.width == 0 || self.height == 0 {
            return Err(SimConfigError::NonPositiveGridDimension {
                width: self.width,
                height: self.height,
            });
        }
        for (name, value) in [
            ("food_diffusion", self.food_diffusion),
            ("food_evaporation", self.food_evaporation),
            ("hill_diffusion", self.hill_diffusion),
            ("hill_evaporation", self.hill_evaporation),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(SimConfigError::RateOutOfRange { name, value });
            }
        }
        if !(self.trail_follow_min >= 0.0 && self.trail_follow_max >= self.trail_follow_min) {
            return Err(SimConfigError::InvalidTrailBand {
                min: self.trail_follow_min,
                max: self.trail_follow_max,
            });
        }
        if !(self.pheromone_deposit >= 0.0) {
            return Err(SimConfigError::NegativeDeposit {
                value: self.pheromone_deposit,
            });
        }
        if !(0.0..=360.0).contains(&self.wiggle_max_deg) {
            return Err(SimConfigError::WiggleOutOfRange {
                value: self.wiggle_max_deg,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    NonPositivePopulation,
    NonPositiveGridDimension { width: usize, height: usize },
    RateOutOfRange { name: &'static str, value: f64 },
    InvalidTrailBand { min: f32, max: f32 },
    NegativeDeposit { value: f32 },
    WiggleOutOfRange { value: f64 },
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::NonPositivePopulation => {
                write!(f, "population must be positive")
            }
            SimConfigError::NonPositiveGridDimension { width, height } => {
                write!(f, "grid dimensions ({width}x{height}) must be positive")
            }
            SimConfigError::RateOutOfRange { name, value } => {
                write!(f, "{name} ({value}) must be a percentage in [0, 100]")
            }
            SimConfigError::InvalidTrailBand { min, max } => {
                write!(f, "trail-follow band [{min}, {max}) is not a valid range")
            }
            SimConfigError::NegativeDeposit { value } => {
                write!(f, "pheromone_deposit ({value}) must be non-negative")
            }
            SimConfigError::WiggleOutOfRange { value } => {
                write!(f, "wiggle_max_deg ({value}) must lie in [0, 360]")
            }
        }
    }
}

impl Error for SimConfigError {}
