pub mod lifecycle;
pub mod metrics;
#[cfg(test)]
mod tests;

pub use metrics::*;

use crate::agent::Ant;
use crate::config::{SimConfig, SimConfigError};
use crate::field::{Cell, Field};
use crate::layout::Layout;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};

/// The simulation clock and step driver: owns the field, the colony, the
/// seeded RNG, and the tick counter. One `step` advances the world by one
/// tick; the driver is the sole scheduler and ticks never overlap.
pub struct World {
    pub(crate) field: Field,
    pub(crate) ants: Vec<Ant>,
    pub(crate) config: SimConfig,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) tick: usize,
    pub(crate) harvests_last_step: usize,
    pub(crate) deliveries_last_step: usize,
    pub(crate) total_harvests: usize,
    pub(crate) total_deliveries: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    FieldSizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    TopologyMismatch,
    PopulationMismatch {
        expected: usize,
        actual: usize,
    },
    NoHillAnchor,
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::FieldSizeMismatch { expected, actual } => write!(
                f,
                "field is {}x{} but the config says {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            WorldInitError::TopologyMismatch => {
                write!(f, "field topology must match the configured topology")
            }
            WorldInitError::PopulationMismatch { expected, actual } => write!(
                f,
                "ants.len() ({actual}) must match population ({expected})"
            ),
            WorldInitError::NoHillAnchor => {
                write!(f, "layout needs at least one hill anchor to spawn the colony")
            }
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
        }
    }
}

impl Error for ExperimentError {}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    pub fn new(field: Field, ants: Vec<Ant>, config: SimConfig) -> Self {
        Self::try_new(field, ants, config).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Assemble a world from a pre-built field and colony. The field's
    /// dimensions and topology, and the colony size, must agree with the
    /// config.
    pub fn try_new(field: Field, ants: Vec<Ant>, config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        if (field.width, field.height) != (config.width, config.height) {
            return Err(WorldInitError::FieldSizeMismatch {
                expected: (config.width, config.height),
                actual: (field.width, field.height),
            });
        }
        if field.topology != config.topology {
            return Err(WorldInitError::TopologyMismatch);
        }
        if ants.len() != config.population {
            return Err(WorldInitError::PopulationMismatch {
                expected: config.population,
                actual: ants.len(),
            });
        }
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Ok(Self {
            field,
            ants,
            config,
            rng,
            tick: 0,
            harvests_last_step: 0,
            deliveries_last_step: 0,
            total_harvests: 0,
            total_deliveries: 0,
        })
    }

    /// Build the field from a layout and spawn the whole colony at the
    /// primary hill, headings random. Setup randomness (food amounts,
    /// initial headings) is drawn from a stream seeded off `config.seed`,
    /// separate from the run stream.
    pub fn from_layout(layout: &Layout, config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        if layout.hills.is_empty() {
            return Err(WorldInitError::NoHillAnchor);
        }
        let mut init_rng = ChaCha12Rng::seed_from_u64(config.seed.wrapping_add(1));
        let field = layout.build(config.width, config.height, config.topology, &mut init_rng);
        let spawn = layout.spawn_position(config.width, config.height);
        let ants = (0..config.population)
            .map(|i| Ant::new(i as u32, spawn, init_rng.random_range(0.0..360.0)))
            .collect();
        Self::try_new(field, ants, config)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        self.field.cell(x, y)
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    /// Completed ticks. Agent `id` first acts during the step whose tick
    /// index equals `id`.
    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Step the world `steps` times, sampling metrics every `sample_every`
    /// ticks and on the final tick.
    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.step();
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics());
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            samples,
            total_harvests: self.total_harvests,
            total_deliveries: self.total_deliveries,
            food_remaining: self.field.food_remaining(),
            final_ants: Vec::new(),
        })
    }
}
