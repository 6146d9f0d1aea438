#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative run state for Maze Sprint.
//!
//! The world owns the installed terrain (a carved maze or a flat arena), the
//! wall bounding boxes derived from it, the player's position and heading,
//! and the run clock. All mutation flows through [`apply`], which consumes
//! [`Command`] values and broadcasts [`Event`] values; read access goes
//! through the snapshot functions in [`query`].

use std::time::Duration;

use maze_sprint_core::{
    collides, Command, Event, GridCoord, GridDimensions, MazeGrid, WallBox, WorldPoint,
    CELL_LENGTH, EYE_HEIGHT, GOAL_HEIGHT, GOAL_REACH_DISTANCE, MAX_FRAME_DELTA, PLAYER_PADDING,
    WALL_INSET,
};
use maze_sprint_system_generation as generation;

const DEFAULT_MAZE_SEED: u64 = 0x6d61_7a65_7370_7269;

/// Downward acceleration applied while airborne in the arena, world units/s².
const GRAVITY: f32 = 24.0;

/// Upward velocity granted by a grounded jump, world units/s.
const JUMP_SPEED: f32 = 8.0;

/// Progress of the current run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Terrain is installed but no run has started.
    Pending,
    /// The clock is live and displacement commands are honored.
    Running,
    /// The goal was reached; displacement is ignored until the next run.
    Finished,
}

#[derive(Debug)]
enum Terrain {
    Maze {
        grid: MazeGrid,
        entry: GridCoord,
        exit: GridCoord,
        goal: WorldPoint,
    },
    Arena {
        half_extent: f32,
    },
}

/// Represents the authoritative Maze Sprint world state.
#[derive(Debug)]
pub struct World {
    terrain: Terrain,
    wall_boxes: Vec<WallBox>,
    player: WorldPoint,
    heading: f32,
    vertical_velocity: f32,
    status: RunStatus,
    elapsed: Duration,
}

impl World {
    /// Creates a world with the default 15×15 maze installed and a pending run.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            terrain: Terrain::Arena { half_extent: 0.0 },
            wall_boxes: Vec::new(),
            player: WorldPoint::new(0.0, EYE_HEIGHT, 0.0),
            heading: 0.0,
            vertical_velocity: 0.0,
            status: RunStatus::Pending,
            elapsed: Duration::ZERO,
        };
        world.install_maze(GridDimensions::DEFAULT, DEFAULT_MAZE_SEED);
        world
    }

    fn install_maze(&mut self, dimensions: GridDimensions, seed: u64) {
        let (grid, entry, exit) = generation::carve(dimensions, seed).into_parts();

        self.wall_boxes.clear();
        for coord in grid.wall_coords() {
            let (x, z) = dimensions.cell_center(coord);
            self.wall_boxes
                .push(WallBox::from_cell_square(x, z, WALL_INSET));
        }

        let (goal_x, goal_z) = dimensions.cell_center(exit);
        let goal = WorldPoint::new(goal_x, GOAL_HEIGHT, goal_z);

        self.terrain = Terrain::Maze {
            grid,
            entry,
            exit,
            goal,
        };
        self.reset_run();
    }

    fn install_arena(&mut self, half_extent: f32) {
        let h = half_extent.max(CELL_LENGTH);
        let outer = h + CELL_LENGTH;

        self.wall_boxes.clear();
        self.wall_boxes.extend([
            WallBox::new(-outer, -h, -outer, outer),
            WallBox::new(h, outer, -outer, outer),
            WallBox::new(-outer, outer, -outer, -h),
            WallBox::new(-outer, outer, h, outer),
        ]);

        self.terrain = Terrain::Arena { half_extent: h };
        self.reset_run();
    }

    fn reset_run(&mut self) {
        self.player = self.spawn_point();
        self.vertical_velocity = 0.0;
        self.status = RunStatus::Pending;
        self.elapsed = Duration::ZERO;
    }

    fn spawn_point(&self) -> WorldPoint {
        match &self.terrain {
            Terrain::Maze { grid, entry, .. } => {
                let (x, z) = grid.dimensions().cell_center(*entry);
                WorldPoint::new(x, EYE_HEIGHT, z)
            }
            Terrain::Arena { .. } => WorldPoint::new(0.0, EYE_HEIGHT, 0.0),
        }
    }

    fn integrate_vertical(&mut self, dt: Duration) {
        if matches!(self.terrain, Terrain::Maze { .. }) {
            return;
        }

        let airborne = self.player.y() > EYE_HEIGHT || self.vertical_velocity != 0.0;
        if !airborne {
            return;
        }

        let seconds = dt.as_secs_f32();
        self.vertical_velocity -= GRAVITY * seconds;
        let y = self.player.y() + self.vertical_velocity * seconds;

        if y <= EYE_HEIGHT {
            self.player = self.player.with_y(EYE_HEIGHT);
            self.vertical_velocity = 0.0;
        } else {
            self.player = self.player.with_y(y);
        }
    }

    fn grounded(&self) -> bool {
        self.player.y() <= EYE_HEIGHT && self.vertical_velocity == 0.0
    }

    fn resolve_displacement(&mut self, delta_x: f32, delta_z: f32, out_events: &mut Vec<Event>) {
        let from = self.player;

        // Each axis resolves independently so movement parallel to a wall
        // slides while the perpendicular component is discarded. X resolves
        // first; the Z test then uses the already-resolved X.
        let try_x = self.player.with_x(from.x() + delta_x);
        if !collides(try_x, &self.wall_boxes, PLAYER_PADDING) {
            self.player = try_x;
        }

        let try_z = self.player.with_z(from.z() + delta_z);
        if !collides(try_z, &self.wall_boxes, PLAYER_PADDING) {
            self.player = try_z;
        }

        if self.player != from {
            out_events.push(Event::PlayerMoved {
                from,
                to: self.player,
            });
        }

        self.check_goal(out_events);
    }

    fn check_goal(&mut self, out_events: &mut Vec<Event>) {
        let Terrain::Maze { goal, .. } = &self.terrain else {
            return;
        };

        if self.player.distance_to(*goal) < GOAL_REACH_DISTANCE {
            self.status = RunStatus::Finished;
            out_events.push(Event::GoalReached {
                elapsed: self.elapsed,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMaze { dimensions, seed } => {
            world.install_maze(dimensions, seed);
            let Terrain::Maze { entry, exit, .. } = &world.terrain else {
                return;
            };
            out_events.push(Event::MazeReady {
                dimensions,
                entry: *entry,
                exit: *exit,
            });
        }
        Command::ConfigureArena { half_extent } => {
            world.install_arena(half_extent);
            let Terrain::Arena { half_extent } = &world.terrain else {
                return;
            };
            out_events.push(Event::ArenaReady {
                half_extent: *half_extent,
            });
        }
        Command::BeginRun => {
            world.reset_run();
            world.status = RunStatus::Running;
            out_events.push(Event::RunStarted);
        }
        Command::Tick { dt } => {
            if world.status != RunStatus::Running {
                return;
            }

            let dt = dt.min(MAX_FRAME_DELTA);
            world.elapsed = world.elapsed.saturating_add(dt);
            world.integrate_vertical(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SetHeading { yaw } => {
            world.heading = yaw;
        }
        Command::Displace { delta_x, delta_z } => {
            if world.status != RunStatus::Running {
                return;
            }

            world.resolve_displacement(delta_x, delta_z, out_events);
        }
        Command::Jump => {
            if world.status != RunStatus::Running {
                return;
            }
            if matches!(world.terrain, Terrain::Maze { .. }) {
                return;
            }
            if world.grounded() {
                world.vertical_velocity = JUMP_SPEED;
            }
        }
    }
}

/// Places the player at an arbitrary position, bypassing collision.
///
/// Only compiled for tests that need to probe goal-distance boundaries.
#[cfg(feature = "run_scaffolding")]
pub fn place_player(world: &mut World, position: WorldPoint) {
    world.player = position;
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{RunStatus, Terrain, World};
    use maze_sprint_core::{GridCoord, GridDimensions, MazeGrid, WallBox, WorldPoint, CELL_LENGTH};

    /// Progress of the current run.
    #[must_use]
    pub fn run_status(world: &World) -> RunStatus {
        world.status
    }

    /// Time accumulated on the run clock.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Current player position.
    #[must_use]
    pub fn player(world: &World) -> WorldPoint {
        world.player
    }

    /// Most recently recorded view heading in radians.
    #[must_use]
    pub fn heading(world: &World) -> f32 {
        world.heading
    }

    /// Goal marker position, present only while a maze is installed.
    #[must_use]
    pub fn goal(world: &World) -> Option<WorldPoint> {
        match &world.terrain {
            Terrain::Maze { goal, .. } => Some(*goal),
            Terrain::Arena { .. } => None,
        }
    }

    /// Wall bounding boxes derived from the installed terrain.
    #[must_use]
    pub fn wall_boxes(world: &World) -> &[WallBox] {
        &world.wall_boxes
    }

    /// Floor footprint of the installed terrain in world units.
    #[must_use]
    pub fn footprint(world: &World) -> (f32, f32) {
        match &world.terrain {
            Terrain::Maze { grid, .. } => grid.dimensions().footprint(),
            Terrain::Arena { half_extent } => {
                let side = 2.0 * (half_extent + CELL_LENGTH);
                (side, side)
            }
        }
    }

    /// Captures a read-only view of the installed maze, if one exists.
    #[must_use]
    pub fn maze_view(world: &World) -> Option<MazeView<'_>> {
        match &world.terrain {
            Terrain::Maze {
                grid, entry, exit, ..
            } => Some(MazeView {
                grid,
                entry: *entry,
                exit: *exit,
            }),
            Terrain::Arena { .. } => None,
        }
    }

    /// Read-only view of the installed maze grid and its endpoints.
    #[derive(Clone, Copy, Debug)]
    pub struct MazeView<'a> {
        grid: &'a MazeGrid,
        entry: GridCoord,
        exit: GridCoord,
    }

    impl<'a> MazeView<'a> {
        /// Carved grid installed in the world.
        #[must_use]
        pub const fn grid(&self) -> &'a MazeGrid {
            self.grid
        }

        /// Dimensions of the installed grid.
        #[must_use]
        pub const fn dimensions(&self) -> GridDimensions {
            self.grid.dimensions()
        }

        /// Room cell where runs begin.
        #[must_use]
        pub const fn entry(&self) -> GridCoord {
            self.entry
        }

        /// Open cell holding the goal marker.
        #[must_use]
        pub const fn exit(&self) -> GridCoord {
            self.exit
        }
    }
}
