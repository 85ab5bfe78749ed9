use antforage_core::config::SimConfig;
use antforage_core::geometry::Topology;
use antforage_core::layout::Layout;
use antforage_core::world::World;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Headless ant-foraging run: builds the default layout, steps the world,
/// and prints a JSON summary of the sampled metrics.
#[derive(Parser, Debug)]
#[command(name = "antforage", version, about)]
struct Args {
    /// Ticks to simulate.
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    /// Record metrics every N ticks.
    #[arg(long, default_value_t = 10)]
    sample_every: usize,

    #[arg(long, default_value_t = 100)]
    population: usize,

    #[arg(long, default_value_t = 71)]
    width: usize,

    #[arg(long, default_value_t = 71)]
    height: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Food-pheromone diffusion rate, percent.
    #[arg(long, default_value_t = 20.0)]
    food_diffusion: f64,

    /// Food-pheromone evaporation rate, percent.
    #[arg(long, default_value_t = 8.0)]
    food_evaporation: f64,

    /// Hill-pheromone diffusion rate, percent.
    #[arg(long, default_value_t = 1.0)]
    hill_diffusion: f64,

    /// Hill-pheromone evaporation rate, percent.
    #[arg(long, default_value_t = 8.0)]
    hill_evaporation: f64,

    /// Use hard grid edges instead of the toroidal wrap.
    #[arg(long)]
    bounded: bool,

    /// Include a per-ant snapshot in the summary.
    #[arg(long)]
    snapshot_ants: bool,

    /// Write the summary here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = SimConfig {
        population: args.population,
        width: args.width,
        height: args.height,
        food_diffusion: args.food_diffusion,
        food_evaporation: args.food_evaporation,
        hill_diffusion: args.hill_diffusion,
        hill_evaporation: args.hill_evaporation,
        seed: args.seed,
        topology: if args.bounded {
            Topology::Bounded
        } else {
            Topology::Torus
        },
        ..SimConfig::default()
    };

    let mut world =
        World::from_layout(&Layout::default(), config).context("failed to initialize world")?;
    let mut summary = world
        .try_run_experiment(args.steps, args.sample_every)
        .context("experiment failed")?;
    if args.snapshot_ants {
        summary.final_ants = world.ant_snapshots();
    }

    let json = serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
    match &args.output {
        Some(path) => std::fs::write(path, &json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
