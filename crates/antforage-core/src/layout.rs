use crate::field::{Cell, Field};
use crate::geometry::{self, Topology};
use rand::Rng;

/// Peak of the static homing gradient, at the primary hill anchor.
pub const HILL_SCENT_PEAK: f32 = 200.0;

/// A named location expressed as fractions of the grid extent, so the same
/// layout scales to any grid size.
#[derive(Clone, Copy, Debug)]
pub struct Anchor {
    pub fx: f64,
    pub fy: f64,
}

impl Anchor {
    pub const fn new(fx: f64, fy: f64) -> Self {
        Self { fx, fy }
    }

    /// Continuous grid position of this anchor on a `width` x `height` grid.
    pub fn position(&self, width: usize, height: usize) -> [f64; 2] {
        [
            self.fx * (width - 1) as f64,
            self.fy * (height - 1) as f64,
        ]
    }
}

/// Static world layout: where the hills and the numbered food sources sit.
///
/// This is the engine's setup collaborator: `build` turns the anchors into
/// per-cell static attributes exactly once, before the first tick. Food
/// source ids are anchor indices plus one.
#[derive(Clone, Debug)]
pub struct Layout {
    pub hills: Vec<Anchor>,
    pub food_sources: Vec<Anchor>,
    pub hill_radius: f64,
    pub food_radius: f64,
    /// Source cells start with a uniform draw from `1..=max_food_units`.
    pub max_food_units: u32,
}

impl Default for Layout {
    /// Two hills in opposite corners, four food sources spread around the
    /// grid, radius 3 for everything.
    fn default() -> Self {
        Self {
            hills: vec![Anchor::new(0.05, 0.10), Anchor::new(0.95, 0.90)],
            food_sources: vec![
                Anchor::new(0.80, 0.45),
                Anchor::new(0.70, 0.05),
                Anchor::new(0.60, 0.875),
                Anchor::new(0.05, 0.85),
            ],
            hill_radius: 3.0,
            food_radius: 3.0,
            max_food_units: 5,
        }
    }
}

impl Layout {
    /// Produce the per-cell static attributes for a `width` x `height` grid.
    /// Deterministic for a given RNG state; only food amounts are random.
    pub fn build<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        topology: Topology,
        rng: &mut R,
    ) -> Field {
        debug_assert!(self.max_food_units >= 1);
        let primary = self.hills.first().map(|a| a.position(width, height));
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let p = [x as f64, y as f64];
                let mut cell = Cell::default();
                if let Some(primary) = primary {
                    // The gradient always points at the primary hill, even
                    // when more hills exist.
                    cell.hill_scent = HILL_SCENT_PEAK
                        - geometry::distance(p, primary, width, height, topology) as f32;
                }
                for hill in &self.hills {
                    let d =
                        geometry::distance(p, hill.position(width, height), width, height, topology);
                    if d < self.hill_radius {
                        cell.is_hill = true;
                    }
                }
                for (i, food) in self.food_sources.iter().enumerate() {
                    let d =
                        geometry::distance(p, food.position(width, height), width, height, topology);
                    if d < self.food_radius {
                        cell.food_source_id = (i + 1) as u8;
                        cell.food_units = rng.random_range(1..=self.max_food_units);
                    }
                }
                cells.push(cell);
            }
        }
        Field::from_cells(width, height, topology, cells)
    }

    /// Cell-center spawn point for the colony: the primary hill anchor.
    pub fn spawn_position(&self, width: usize, height: usize) -> [f64; 2] {
        let anchor = self.hills.first().copied().unwrap_or(Anchor::new(0.5, 0.5));
        let p = anchor.position(width, height);
        [p[0].floor() + 0.5, p[1].floor() + 0.5]
    }
}
