use serde::{Deserialize, Serialize};

/// Boundary behavior of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Opposite edges are glued together; every position wraps.
    Torus,
    /// Hard edges; cells outside the grid do not exist.
    Bounded,
}

/// Unit vector for a heading in degrees. Heading 0 points along +x and
/// positive turns are to the right (clockwise with y growing downward).
pub fn heading_vector(heading_deg: f64) -> [f64; 2] {
    let rad = heading_deg.to_radians();
    [rad.cos(), rad.sin()]
}

/// Wrap a continuous position onto a `width` x `height` torus.
pub fn wrap_position(position: [f64; 2], width: usize, height: usize) -> [f64; 2] {
    [
        position[0].rem_euclid(width as f64),
        position[1].rem_euclid(height as f64),
    ]
}

/// Grid cell containing a continuous position.
///
/// On a torus this always resolves (the position is wrapped first). With
/// bounded topology, positions outside the grid have no cell and callers
/// must treat them as "no neighbor" rather than index the field.
pub fn cell_index(
    position: [f64; 2],
    width: usize,
    height: usize,
    topology: Topology,
) -> Option<(usize, usize)> {
    match topology {
        Topology::Torus => {
            let p = wrap_position(position, width, height);
            let x = (p[0].floor() as usize).min(width - 1);
            let y = (p[1].floor() as usize).min(height - 1);
            Some((x, y))
        }
        Topology::Bounded => {
            let x = position[0].floor();
            let y = position[1].floor();
            if x < 0.0 || y < 0.0 || x >= width as f64 || y >= height as f64 {
                return None;
            }
            Some((x as usize, y as usize))
        }
    }
}

/// Cell one step away from `position` in the direction `heading_deg +
/// relative_deg`, `distance` units out. Positive relative angles sample to
/// the right of the heading.
pub fn neighbor_in_direction(
    position: [f64; 2],
    heading_deg: f64,
    relative_deg: f64,
    distance: f64,
    width: usize,
    height: usize,
    topology: Topology,
) -> Option<(usize, usize)> {
    let dir = heading_vector(heading_deg + relative_deg);
    let target = [
        position[0] + dir[0] * distance,
        position[1] + dir[1] * distance,
    ];
    cell_index(target, width, height, topology)
}

/// Shortest distance between two points, taking the wrap into account on a
/// torus.
pub fn distance(
    a: [f64; 2],
    b: [f64; 2],
    width: usize,
    height: usize,
    topology: Topology,
) -> f64 {
    let mut dx = (a[0] - b[0]).abs();
    let mut dy = (a[1] - b[1]).abs();
    if topology == Topology::Torus {
        let (w, h) = (width as f64, height as f64);
        if dx > w * 0.5 {
            dx = w - dx;
        }
        if dy > h * 0.5 {
            dy = h - dy;
        }
    }
    (dx * dx + dy * dy).sqrt()
}
