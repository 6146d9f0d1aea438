#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic maze carving via a randomized depth-first backtracker.
//!
//! Carving operates on the half-resolution room lattice: cells at odd/odd
//! coordinates are rooms, and the single cell between two adjacent rooms is
//! the connector whose state links or separates them. The walk starts at room
//! (1, 1) and repeatedly tunnels two cells toward an uncarved room, producing
//! a spanning tree over every room reachable from the entry. The traversal
//! uses an explicit stack so carving depth never presses on the call stack.

use maze_sprint_core::{GridCoord, GridDimensions, MazeGrid};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Room cell where every run begins.
pub const ENTRY: GridCoord = GridCoord::new(1, 1);

const CARDINALS: [Direction; 4] = [
    Direction::East,
    Direction::West,
    Direction::South,
    Direction::North,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    const fn offset(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Grid, entry and exit produced by one carving pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazePlan {
    grid: MazeGrid,
    entry: GridCoord,
    exit: GridCoord,
}

impl MazePlan {
    /// Carved grid backing the plan.
    #[must_use]
    pub const fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// Room cell where the run begins.
    #[must_use]
    pub const fn entry(&self) -> GridCoord {
        self.entry
    }

    /// Open cell selected for the goal marker.
    #[must_use]
    pub const fn exit(&self) -> GridCoord {
        self.exit
    }

    /// Consumes the plan, yielding its parts for installation into a world.
    #[must_use]
    pub fn into_parts(self) -> (MazeGrid, GridCoord, GridCoord) {
        (self.grid, self.entry, self.exit)
    }
}

/// Carves a maze over the provided dimensions using the seeded shuffle.
///
/// The same `dimensions` and `seed` always produce an identical plan. The
/// carved passage graph is a spanning tree over all room cells reachable
/// from [`ENTRY`]: connected, acyclic, with exactly one simple path between
/// any two rooms.
#[must_use]
pub fn carve(dimensions: GridDimensions, seed: u64) -> MazePlan {
    let mut grid = MazeGrid::filled_with_walls(dimensions);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let _ = grid.carve(ENTRY);
    let mut stack = vec![Frame::new(ENTRY, &mut rng)];

    while let Some(frame) = stack.last_mut() {
        let current = frame.room;
        let Some(direction) = frame.next_direction() else {
            let _ = stack.pop();
            continue;
        };

        let Some((connector, neighbor)) = step_twice(current, direction, dimensions) else {
            continue;
        };

        if grid.is_passage(neighbor) {
            continue;
        }

        let _ = grid.carve(connector);
        let _ = grid.carve(neighbor);
        stack.push(Frame::new(neighbor, &mut rng));
    }

    let exit = select_exit(&grid, dimensions);
    MazePlan {
        grid,
        entry: ENTRY,
        exit,
    }
}

/// One room on the carving stack together with its shuffled direction order.
struct Frame {
    room: GridCoord,
    directions: [Direction; 4],
    attempted: usize,
}

impl Frame {
    fn new(room: GridCoord, rng: &mut ChaCha8Rng) -> Self {
        let mut directions = CARDINALS;
        directions.shuffle(rng);
        Self {
            room,
            directions,
            attempted: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.attempted).copied();
        self.attempted += 1;
        direction
    }
}

/// Resolves the connector one cell away and the room two cells away, provided
/// the room lands strictly inside the border ring.
fn step_twice(
    from: GridCoord,
    direction: Direction,
    dimensions: GridDimensions,
) -> Option<(GridCoord, GridCoord)> {
    let (dx, dz) = direction.offset();
    let connector = offset_coord(from, dx, dz)?;
    let neighbor = offset_coord(from, dx * 2, dz * 2)?;

    if dimensions.is_interior(neighbor) {
        Some((connector, neighbor))
    } else {
        None
    }
}

fn offset_coord(coord: GridCoord, dx: i64, dz: i64) -> Option<GridCoord> {
    let column = i64::from(coord.column()) + dx;
    let row = i64::from(coord.row()) + dz;
    if column < 0 || row < 0 {
        return None;
    }

    Some(GridCoord::new(column as u32, row as u32))
}

/// Selects the goal cell: the room nearest the far corner, falling back to a
/// raster scan for the first open cell.
///
/// With validated odd dimensions the far corner (width-2, height-2) always
/// lands on a room cell, so the fallback never fires; it remains as a guard
/// against a malformed grid rather than a reachable code path.
fn select_exit(grid: &MazeGrid, dimensions: GridDimensions) -> GridCoord {
    let far = GridCoord::new(dimensions.width() - 2, dimensions.height() - 2);
    if grid.is_passage(far) {
        return far;
    }

    grid.first_passage().unwrap_or(ENTRY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_sprint_core::CellKind;

    fn dimensions(width: u32, height: u32) -> GridDimensions {
        GridDimensions::new(width, height).expect("test dimensions must be valid")
    }

    #[test]
    fn entry_and_far_corner_are_carved() {
        let plan = carve(dimensions(15, 15), 7);
        assert!(plan.grid().is_passage(plan.entry()));
        assert!(plan.grid().is_passage(plan.exit()));
        assert_eq!(plan.entry(), GridCoord::new(1, 1));
        assert_eq!(plan.exit(), GridCoord::new(13, 13));
    }

    #[test]
    fn pillars_are_never_carved() {
        let plan = carve(dimensions(11, 9), 42);
        for row in (0..9).step_by(2) {
            for column in (0..11).step_by(2) {
                assert_eq!(
                    plan.grid().kind(GridCoord::new(column, row)),
                    Some(CellKind::Wall),
                    "pillar at ({column}, {row}) must stay solid"
                );
            }
        }
    }

    #[test]
    fn identical_seeds_produce_identical_plans() {
        let first = carve(dimensions(15, 15), 0xDEADBEEF);
        let second = carve(dimensions(15, 15), 0xDEADBEEF);
        assert_eq!(first, second);
    }

    #[test]
    fn differing_seeds_produce_differing_grids() {
        let first = carve(dimensions(15, 15), 1);
        let second = carve(dimensions(15, 15), 2);
        assert_ne!(first.grid().cells(), second.grid().cells());
    }
}
