use crate::geometry::Topology;
use rayon::prelude::*;

/// One grid cell: two independent pheromone concentrations plus the static
/// attributes produced by the setup collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cell {
    /// Trail toward food, deposited by returning ants.
    pub food_pheromone: f32,
    /// Trail toward home, deposited by searching ants.
    pub hill_pheromone: f32,
    /// Immutable after setup.
    pub is_hill: bool,
    /// Static gradient, highest at the primary hill. Immutable after setup.
    pub hill_scent: f32,
    /// 0 = not a food source, otherwise 1..=4. Immutable after setup.
    pub food_source_id: u8,
    /// Remaining food on a source cell; decremented by harvests.
    pub food_units: u32,
}

/// Selects one of the two pheromone channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pheromone {
    Food,
    Hill,
}

impl Cell {
    pub fn pheromone(&self, channel: Pheromone) -> f32 {
        match channel {
            Pheromone::Food => self.food_pheromone,
            Pheromone::Hill => self.hill_pheromone,
        }
    }

    fn pheromone_mut(&mut self, channel: Pheromone) -> &mut f32 {
        match channel {
            Pheromone::Food => &mut self.food_pheromone,
            Pheromone::Hill => &mut self.hill_pheromone,
        }
    }
}

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// 2D grid of cells stored as a flat arena, indexed `y * width + x`.
/// The field is the single authority over cell state; ants read and write
/// through it at specific coordinates.
#[derive(Clone, Debug)]
pub struct Field {
    pub width: usize,
    pub height: usize,
    pub topology: Topology,
    cells: Vec<Cell>,
}

impl Field {
    pub fn new(width: usize, height: usize, topology: Topology) -> Self {
        Self {
            width,
            height,
            topology,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Wrap pre-built cells (row-major, `y * width + x`).
    pub fn from_cells(width: usize, height: usize, topology: Topology, cells: Vec<Cell>) -> Self {
        assert_eq!(
            cells.len(),
            width * height,
            "cell count must match grid dimensions"
        );
        Self {
            width,
            height,
            topology,
            cells,
        }
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.idx(x, y)]
    }

    pub(crate) fn cell_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let idx = self.idx(x, y);
        &mut self.cells[idx]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn deposit(&mut self, channel: Pheromone, x: usize, y: usize, amount: f32) {
        *self.cell_mut(x, y).pheromone_mut(channel) += amount;
    }

    /// Take one unit of food from the cell. Returns whether any was there.
    pub fn harvest(&mut self, x: usize, y: usize) -> bool {
        let cell = self.cell_mut(x, y);
        if cell.food_units == 0 {
            return false;
        }
        cell.food_units -= 1;
        true
    }

    /// Index of the neighbor at offset `(dx, dy)`, or `None` when no such
    /// cell exists: off-grid in bounded topology, or an offset that wraps
    /// back onto the source cell on a degenerate torus.
    fn neighbor_idx(&self, x: usize, y: usize, dx: i64, dy: i64) -> Option<usize> {
        let (nx, ny) = match self.topology {
            Topology::Torus => (
                (x as i64 + dx).rem_euclid(self.width as i64) as usize,
                (y as i64 + dy).rem_euclid(self.height as i64) as usize,
            ),
            Topology::Bounded => {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
                    return None;
                }
                (nx as usize, ny as usize)
            }
        };
        if nx == x && ny == y {
            return None;
        }
        Some(self.idx(nx, ny))
    }

    /// Redistribute a fraction `rate` of every cell's concentration: the
    /// shed amount is split into eighths and each eligible neighbor receives
    /// one eighth. Shares aimed at missing neighbors stay on the source
    /// cell, so grid-wide mass is conserved up to rounding.
    ///
    /// All cells are read from a snapshot taken before any cell is written.
    pub fn diffuse(&mut self, channel: Pheromone, rate: f32) {
        debug_assert!((0.0..=1.0).contains(&rate), "diffusion rate {rate}");
        if rate == 0.0 {
            return;
        }
        let old: Vec<f32> = self.cells.iter().map(|c| c.pheromone(channel)).collect();
        let width = self.width;
        let next: Vec<f32> = (0..self.cells.len())
            .into_par_iter()
            .map(|i| {
                let x = i % width;
                let y = i / width;
                let mut inflow = 0.0f32;
                let mut eligible = 0u32;
                for (dx, dy) in NEIGHBOR_OFFSETS {
                    if let Some(j) = self.neighbor_idx(x, y, dx, dy) {
                        inflow += old[j];
                        eligible += 1;
                    }
                }
                old[i] * (1.0 - rate * eligible as f32 / 8.0) + inflow * rate / 8.0
            })
            .collect();
        for (cell, value) in self.cells.iter_mut().zip(next) {
            *cell.pheromone_mut(channel) = value;
        }
    }

    /// Multiplicative decay: `value *= 1 - rate` on every cell.
    pub fn evaporate(&mut self, channel: Pheromone, rate: f32) {
        debug_assert!((0.0..=1.0).contains(&rate), "evaporation rate {rate}");
        let keep = 1.0 - rate;
        for cell in &mut self.cells {
            *cell.pheromone_mut(channel) *= keep;
        }
    }

    /// Grid-wide sum of one pheromone channel.
    pub fn total(&self, channel: Pheromone) -> f64 {
        self.cells.iter().map(|c| c.pheromone(channel) as f64).sum()
    }

    /// Food units left across all source cells.
    pub fn food_remaining(&self) -> u64 {
        self.cells.iter().map(|c| c.food_units as u64).sum()
    }
}
