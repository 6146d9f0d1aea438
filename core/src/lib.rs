#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Sprint engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. The crate also hosts the grid vocabulary used
//! by the maze generator and the axis-aligned collision predicate shared by
//! the world and its tests.

use std::{error::Error, fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Side length of one grid cell expressed in world units.
pub const CELL_LENGTH: f32 = 4.0;

/// Height of a wall block expressed in world units.
pub const WALL_HEIGHT: f32 = 3.0;

/// Margin trimmed from each side of a wall cell when deriving its bounding
/// box, easing sliding along long corridors.
pub const WALL_INSET: f32 = 0.2;

/// Half-extent added to every wall box during collision tests to approximate
/// the player's collider radius.
pub const PLAYER_PADDING: f32 = 0.25;

/// Camera height above the floor while the player is grounded.
pub const EYE_HEIGHT: f32 = 1.6;

/// Height above the floor at which the goal marker rests.
pub const GOAL_HEIGHT: f32 = 0.6;

/// Distance to the goal marker below which a run counts as finished.
pub const GOAL_REACH_DISTANCE: f32 = 1.2;

/// Upper bound applied to per-frame deltas before they reach the simulation.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(50);

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Solid cell that produces a wall block.
    Wall,
    /// Carved cell the player can traverse.
    Passage,
}

/// Location of a single grid cell expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: u32,
    row: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether the coordinate sits on the odd/odd room lattice the
    /// carving algorithm expands from.
    #[must_use]
    pub const fn is_room(&self) -> bool {
        self.column % 2 == 1 && self.row % 2 == 1
    }
}

/// Validated maze dimensions: both axes odd and at least five cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    width: u32,
    height: u32,
}

impl GridDimensions {
    /// Dimensions used when no explicit configuration is supplied.
    pub const DEFAULT: Self = Self {
        width: 15,
        height: 15,
    };

    /// Smallest dimension accepted along either axis.
    pub const MIN_AXIS: u32 = 5;

    /// Validates the provided width and height.
    ///
    /// Even values break the pillar/room parity the carving algorithm relies
    /// on and are rejected rather than silently rounded.
    pub const fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        if width < Self::MIN_AXIS {
            return Err(DimensionError::TooSmall {
                axis: Axis::Width,
                value: width,
            });
        }
        if height < Self::MIN_AXIS {
            return Err(DimensionError::TooSmall {
                axis: Axis::Height,
                value: height,
            });
        }
        if width % 2 == 0 {
            return Err(DimensionError::NotOdd {
                axis: Axis::Width,
                value: width,
            });
        }
        if height % 2 == 0 {
            return Err(DimensionError::NotOdd {
                axis: Axis::Height,
                value: height,
            });
        }

        Ok(Self { width, height })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.column() < self.width && coord.row() < self.height
    }

    /// Reports whether the coordinate lies strictly inside the border ring.
    #[must_use]
    pub const fn is_interior(&self, coord: GridCoord) -> bool {
        coord.column() > 0
            && coord.column() + 1 < self.width
            && coord.row() > 0
            && coord.row() + 1 < self.height
    }

    /// World-space center of the provided cell on the X/Z plane.
    ///
    /// The grid is centered on the world origin, matching the floor plane
    /// rendered underneath it.
    #[must_use]
    pub fn cell_center(&self, coord: GridCoord) -> (f32, f32) {
        let x = (coord.column() as f32 - self.width as f32 / 2.0 + 0.5) * CELL_LENGTH;
        let z = (coord.row() as f32 - self.height as f32 / 2.0 + 0.5) * CELL_LENGTH;
        (x, z)
    }

    /// Total footprint of the grid in world units as (width, depth).
    #[must_use]
    pub const fn footprint(&self) -> (f32, f32) {
        (
            self.width as f32 * CELL_LENGTH,
            self.height as f32 * CELL_LENGTH,
        )
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Axis named by a dimension validation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal cell count.
    Width,
    /// Vertical cell count.
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// Errors raised when maze dimensions fail validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DimensionError {
    /// The axis is below the minimum carvable size.
    TooSmall {
        /// Axis that failed validation.
        axis: Axis,
        /// Value provided by the caller.
        value: u32,
    },
    /// The axis is even, which breaks room/pillar parity.
    NotOdd {
        /// Axis that failed validation.
        axis: Axis,
        /// Value provided by the caller.
        value: u32,
    },
}

impl fmt::Display for DimensionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { axis, value } => {
                write!(
                    f,
                    "maze {axis} must be at least {} (received {value})",
                    GridDimensions::MIN_AXIS
                )
            }
            Self::NotOdd { axis, value } => {
                write!(f, "maze {axis} must be odd (received {value})")
            }
        }
    }
}

impl Error for DimensionError {}

/// Dense row-major grid of cell states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    dimensions: GridDimensions,
    cells: Vec<CellKind>,
}

impl MazeGrid {
    /// Creates a grid with every cell initialized to [`CellKind::Wall`].
    #[must_use]
    pub fn filled_with_walls(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![CellKind::Wall; dimensions.cell_count()],
        }
    }

    /// Dimensions the grid was created with.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// State of the provided cell, if it lies within the grid.
    #[must_use]
    pub fn kind(&self, coord: GridCoord) -> Option<CellKind> {
        self.index(coord).and_then(|index| self.cells.get(index)).copied()
    }

    /// Reports whether the provided cell is a carved passage.
    #[must_use]
    pub fn is_passage(&self, coord: GridCoord) -> bool {
        self.kind(coord) == Some(CellKind::Passage)
    }

    /// Carves the provided cell into a passage.
    ///
    /// Returns `false` when the coordinate lies outside the grid.
    pub fn carve(&mut self, coord: GridCoord) -> bool {
        match self.index(coord) {
            Some(index) => {
                self.cells[index] = CellKind::Passage;
                true
            }
            None => false,
        }
    }

    /// Row-major slice of all cell states.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Iterates over the coordinates of every wall cell.
    pub fn wall_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let width = self.dimensions.width();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == CellKind::Wall)
            .map(move |(index, _)| {
                GridCoord::new((index as u32) % width, (index as u32) / width)
            })
    }

    /// Coordinate of the first passage cell in raster order, if any exist.
    #[must_use]
    pub fn first_passage(&self) -> Option<GridCoord> {
        let width = self.dimensions.width();
        self.cells
            .iter()
            .position(|kind| *kind == CellKind::Passage)
            .map(|index| GridCoord::new((index as u32) % width, (index as u32) / width))
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.dimensions.contains(coord) {
            let row = coord.row() as usize;
            let column = coord.column() as usize;
            Some(row * self.dimensions.width() as usize + column)
        } else {
            None
        }
    }
}

/// Normalized movement intent gathered from the input layer.
///
/// Components are clamped to {-1, 0, 1}; diagonal intent is normalized by the
/// movement system before it scales into a displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    forward: i8,
    right: i8,
}

impl MoveIntent {
    /// Creates a new intent, clamping both components to the unit range.
    #[must_use]
    pub const fn new(forward: i8, right: i8) -> Self {
        Self {
            forward: clamp_axis(forward),
            right: clamp_axis(right),
        }
    }

    /// Forward component in {-1, 0, 1}; positive moves toward the view.
    #[must_use]
    pub const fn forward(&self) -> i8 {
        self.forward
    }

    /// Strafe component in {-1, 0, 1}; positive moves to the right.
    #[must_use]
    pub const fn right(&self) -> i8 {
        self.right
    }

    /// Reports whether the intent requests no movement at all.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.forward == 0 && self.right == 0
    }
}

const fn clamp_axis(value: i8) -> i8 {
    if value > 1 {
        1
    } else if value < -1 {
        -1
    } else {
        value
    }
}

/// A position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
    z: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Depth coordinate.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Returns a copy with the horizontal coordinate replaced.
    #[must_use]
    pub const fn with_x(&self, x: f32) -> Self {
        Self {
            x,
            y: self.y,
            z: self.z,
        }
    }

    /// Returns a copy with the vertical coordinate replaced.
    #[must_use]
    pub const fn with_y(&self, y: f32) -> Self {
        Self {
            x: self.x,
            y,
            z: self.z,
        }
    }

    /// Returns a copy with the depth coordinate replaced.
    #[must_use]
    pub const fn with_z(&self, z: f32) -> Self {
        Self {
            x: self.x,
            y: self.y,
            z,
        }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Axis-aligned bounding box of one wall block on the X/Z plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallBox {
    min_x: f32,
    max_x: f32,
    min_z: f32,
    max_z: f32,
}

impl WallBox {
    /// Creates a box from explicit bounds.
    #[must_use]
    pub const fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Derives the box for a square cell centered at (`center_x`, `center_z`),
    /// inset by `inset` on every side.
    #[must_use]
    pub fn from_cell_square(center_x: f32, center_z: f32, inset: f32) -> Self {
        let half = CELL_LENGTH / 2.0;
        Self {
            min_x: center_x - half + inset,
            max_x: center_x + half - inset,
            min_z: center_z - half + inset,
            max_z: center_z + half - inset,
        }
    }

    /// Lower horizontal bound.
    #[must_use]
    pub const fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Upper horizontal bound.
    #[must_use]
    pub const fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Lower depth bound.
    #[must_use]
    pub const fn min_z(&self) -> f32 {
        self.min_z
    }

    /// Upper depth bound.
    #[must_use]
    pub const fn max_z(&self) -> f32 {
        self.max_z
    }

    /// Reports whether the point's (x, z) projection falls inside the box
    /// expanded by `padding` on all four sides.
    #[must_use]
    pub fn contains(&self, point: WorldPoint, padding: f32) -> bool {
        point.x() > self.min_x - padding
            && point.x() < self.max_x + padding
            && point.z() > self.min_z - padding
            && point.z() < self.max_z + padding
    }
}

/// Reports whether the candidate point intersects any wall box expanded by
/// `padding`.
///
/// Linear in the number of walls, which stays within a few hundred entries
/// for the grid sizes the generator produces.
#[must_use]
pub fn collides(point: WorldPoint, walls: &[WallBox], padding: f32) -> bool {
    walls.iter().any(|wall| wall.contains(point, padding))
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Regenerates the maze, wall boxes, entry, exit and goal marker.
    ConfigureMaze {
        /// Validated maze dimensions.
        dimensions: GridDimensions,
        /// Seed driving the deterministic carving shuffle.
        seed: u64,
    },
    /// Replaces the terrain with a flat arena bounded by perimeter walls.
    ConfigureArena {
        /// Half of the arena's side length in world units.
        half_extent: f32,
    },
    /// Resets the player to the entry and starts the run clock.
    BeginRun,
    /// Advances the simulation clock by the provided frame delta.
    Tick {
        /// Wall-clock time elapsed since the previous frame, capped by the
        /// world before it reaches the run clock.
        dt: Duration,
    },
    /// Records the player's view heading used for movement and replays.
    SetHeading {
        /// Yaw in radians; zero faces the negative depth axis.
        yaw: f32,
    },
    /// Requests a player displacement resolved against the wall boxes.
    Displace {
        /// Desired horizontal displacement.
        delta_x: f32,
        /// Desired depth displacement.
        delta_z: f32,
    },
    /// Requests a vertical impulse while grounded in the arena.
    Jump,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a maze was generated and installed.
    MazeReady {
        /// Dimensions of the generated grid.
        dimensions: GridDimensions,
        /// Room cell where runs begin.
        entry: GridCoord,
        /// Open cell holding the goal marker.
        exit: GridCoord,
    },
    /// Confirms that a flat arena was installed.
    ArenaReady {
        /// Half of the arena's side length in world units.
        half_extent: f32,
    },
    /// Announces that the run clock started and the player was reset.
    RunStarted,
    /// Indicates that the run clock advanced.
    TimeAdvanced {
        /// Capped duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved between two positions.
    PlayerMoved {
        /// Position before the displacement was resolved.
        from: WorldPoint,
        /// Position after sliding resolution.
        to: WorldPoint,
    },
    /// Announces that the player reached the goal marker.
    GoalReached {
        /// Run duration at the moment of arrival.
        elapsed: Duration,
    },
}
