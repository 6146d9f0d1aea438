#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Sprint demos.
//!
//! Wires the authoritative world, the movement system and the macroquad
//! rendering backend into a frame loop. The world is only ever mutated
//! through commands; this adapter translates captured input into those
//! commands and mirrors query snapshots into the rendered scene.

use std::{f32::consts::FRAC_PI_2, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use glam::Vec3;
use maze_sprint_core::{
    Command as WorldCommand, Event, GridDimensions, WALL_HEIGHT, WALL_INSET,
};
use maze_sprint_rendering::{
    palette, CameraPose, FloorPresentation, FogPresentation, GoalPresentation, HudPresentation,
    Presentation, RenderingBackend, Scene, WallBlockPresentation,
};
use maze_sprint_rendering_macroquad::{DisplayConfig, MacroquadBackend};
use maze_sprint_system_movement::{FrameIntent, Movement};
use maze_sprint_world::{self as world, query, RunStatus, World};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

const WINDOW_TITLE: &str = "Maze Sprint";

/// Fog distances tuned so maze corridors fade out before the far border.
const FOG_NEAR: f32 = 20.0;
const FOG_FAR: f32 = 90.0;

/// Extra floor plane beyond the terrain footprint, world units per side.
const FLOOR_MARGIN: f32 = 8.0;

/// Height and radius of the rendered goal marker sphere.
const GOAL_MARKER_HEIGHT: f32 = 0.9;
const GOAL_MARKER_RADIUS: f32 = 0.6;

/// Keeps the view from flipping over the vertical axis.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;

const START_MESSAGE: &str = "Click to start";

/// Command-line options for the Maze Sprint demos.
#[derive(Debug, Parser)]
#[command(name = "maze-sprint", version, about = "First-person maze sprint demos")]
struct Cli {
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,

    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,

    /// Optional TOML file overriding window size and mouse settings.
    #[arg(long)]
    display_config: Option<PathBuf>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

/// Demo selection; the timed maze run is the default.
#[derive(Clone, Copy, Debug, Subcommand)]
enum Mode {
    /// Timed run through a procedurally generated maze.
    Maze {
        /// Grid width in cells; must be odd and at least 5.
        #[arg(long, default_value_t = 15)]
        width: u32,

        /// Grid height in cells; must be odd and at least 5.
        #[arg(long, default_value_t = 15)]
        height: u32,

        /// Generation seed; drawn from entropy when omitted.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Free walk across a flat walled arena with jumping enabled.
    Arena {
        /// Distance from the centre to each perimeter wall, world units.
        #[arg(long, default_value_t = 30.0)]
        half_extent: f32,
    },
}

/// Validated terrain selection derived from the command line.
#[derive(Clone, Copy, Debug)]
enum Plan {
    Maze {
        dimensions: GridDimensions,
        seed: Option<u64>,
    },
    Arena {
        half_extent: f32,
    },
}

impl Plan {
    fn from_mode(mode: Mode) -> Result<Self> {
        match mode {
            Mode::Maze {
                width,
                height,
                seed,
            } => {
                let dimensions = GridDimensions::new(width, height)?;
                Ok(Self::Maze { dimensions, seed })
            }
            Mode::Arena { half_extent } => Ok(Self::Arena { half_extent }),
        }
    }
}

/// Entry point for the Maze Sprint command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let display = match &cli.display_config {
        Some(path) => DisplayConfig::from_path(path)?,
        None => DisplayConfig::default(),
    };

    let mode = cli.mode.unwrap_or(Mode::Maze {
        width: 15,
        height: 15,
        seed: None,
    });
    let plan = Plan::from_mode(mode)?;

    let backend = MacroquadBackend::new()
        .with_vsync(cli.vsync)
        .with_show_fps(cli.show_fps)
        .with_display_config(display);

    run(plan, backend)
}

fn run<B>(plan: Plan, backend: B) -> Result<()>
where
    B: RenderingBackend,
{
    let mut world = World::new();
    let movement = Movement::default();
    let mut events = Vec::new();

    configure_terrain(&mut world, plan, &mut events);

    let fog = FogPresentation::new(palette::SKY, FOG_NEAR, FOG_FAR)?;
    let scene = initial_scene(&world, fog);
    let presentation = Presentation::new(WINDOW_TITLE, palette::SKY, scene);

    let mut yaw = 0.0_f32;
    let mut pitch = 0.0_f32;

    backend.run(presentation, move |dt, input, scene| {
        let status = query::run_status(&world);

        let first_start = input.lock_acquired && status != RunStatus::Running;
        let restart = input.pointer_locked && input.jump_pressed && status == RunStatus::Finished;
        if first_start || restart {
            if restart {
                configure_terrain(&mut world, plan, &mut events);
                populate_terrain(scene, &world);
            }
            world::apply(&mut world, WorldCommand::BeginRun, &mut events);
            yaw = 0.0;
            pitch = 0.0;
        }

        if input.pointer_locked {
            yaw -= input.look_delta.x;
            pitch = (pitch - input.look_delta.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            world::apply(&mut world, WorldCommand::SetHeading { yaw }, &mut events);
        }

        let mut tick_events = Vec::new();
        world::apply(&mut world, WorldCommand::Tick { dt }, &mut tick_events);

        let intent = FrameIntent {
            movement: input.movement,
            sprinting: input.sprinting,
            jump: input.jump_pressed,
        };
        let mut commands = Vec::new();
        movement.handle(&tick_events, query::heading(&world), intent, &mut commands);

        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }

        for event in &events {
            if let Event::GoalReached { elapsed } = event {
                println!("goal reached in {:.2} s", elapsed.as_secs_f32());
            }
        }

        scene.camera = camera_pose(&world, pitch);
        scene.hud = hud_for(&world);
    })
}

/// Installs the selected terrain, drawing and reporting a seed when needed.
fn configure_terrain(world: &mut World, plan: Plan, events: &mut Vec<Event>) {
    match plan {
        Plan::Maze { dimensions, seed } => {
            let seed = seed.unwrap_or_else(|| ChaCha8Rng::from_entropy().next_u64());
            println!("maze seed: {seed}");
            world::apply(
                world,
                WorldCommand::ConfigureMaze { dimensions, seed },
                events,
            );
        }
        Plan::Arena { half_extent } => {
            world::apply(world, WorldCommand::ConfigureArena { half_extent }, events);
        }
    }
}

/// Mirrors the world's wall boxes, goal and floor footprint into the scene.
fn populate_terrain(scene: &mut Scene, world: &World) {
    scene.walls = query::wall_boxes(world)
        .iter()
        .map(|wall| {
            WallBlockPresentation::from_wall_box(wall, WALL_INSET, WALL_HEIGHT, palette::WALL)
        })
        .collect();

    scene.goal = query::goal(world).map(|goal| {
        GoalPresentation::new(
            Vec3::new(goal.x(), GOAL_MARKER_HEIGHT, goal.z()),
            GOAL_MARKER_RADIUS,
            palette::GOAL,
            palette::GOAL_GLOW,
        )
    });

    let (width, depth) = query::footprint(world);
    scene.floor =
        FloorPresentation::new(width + FLOOR_MARGIN, depth + FLOOR_MARGIN, palette::FLOOR);
}

fn initial_scene(world: &World, fog: FogPresentation) -> Scene {
    let floor = FloorPresentation::new(FLOOR_MARGIN, FLOOR_MARGIN, palette::FLOOR);
    let mut scene = Scene::new(
        fog,
        floor,
        Vec::new(),
        None,
        camera_pose(world, 0.0),
        HudPresentation::default(),
    );
    populate_terrain(&mut scene, world);
    scene.hud = hud_for(world);
    scene
}

fn camera_pose(world: &World, pitch: f32) -> CameraPose {
    let player = query::player(world);
    CameraPose::new(
        Vec3::new(player.x(), player.y(), player.z()),
        query::heading(world),
        pitch,
    )
}

fn hud_for(world: &World) -> HudPresentation {
    match query::run_status(world) {
        RunStatus::Pending => HudPresentation {
            timer: None,
            message: Some(START_MESSAGE.to_owned()),
        },
        RunStatus::Running => HudPresentation {
            timer: Some(query::elapsed(world)),
            message: None,
        },
        RunStatus::Finished => {
            let elapsed = query::elapsed(world);
            HudPresentation {
                timer: Some(elapsed),
                message: Some(format!(
                    "Finished in {:.2} s. Press Space for a new run.",
                    elapsed.as_secs_f32()
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_mode_parses_without_arguments() {
        let cli = Cli::parse_from(["maze-sprint"]);
        assert!(cli.mode.is_none());
        assert!(cli.vsync);
        assert!(!cli.show_fps);
    }

    #[test]
    fn maze_mode_accepts_dimensions_and_seed() {
        let cli = Cli::parse_from([
            "maze-sprint",
            "maze",
            "--width",
            "21",
            "--height",
            "9",
            "--seed",
            "42",
        ]);
        let Some(Mode::Maze {
            width,
            height,
            seed,
        }) = cli.mode
        else {
            panic!("expected maze mode");
        };
        assert_eq!(width, 21);
        assert_eq!(height, 9);
        assert_eq!(seed, Some(42));
    }

    #[test]
    fn even_maze_dimensions_are_rejected() {
        let cli = Cli::parse_from(["maze-sprint", "maze", "--width", "14"]);
        let mode = cli.mode.expect("maze mode parsed");
        assert!(Plan::from_mode(mode).is_err());
    }

    #[test]
    fn arena_mode_accepts_half_extent() {
        let cli = Cli::parse_from(["maze-sprint", "arena", "--half-extent", "12.5"]);
        let Some(Mode::Arena { half_extent }) = cli.mode else {
            panic!("expected arena mode");
        };
        assert!((half_extent - 12.5).abs() < f32::EPSILON);
    }

    #[test]
    fn hud_reflects_each_run_phase() {
        let mut world = World::new();
        let mut events = Vec::new();

        let pending = hud_for(&world);
        assert_eq!(pending.message.as_deref(), Some(START_MESSAGE));
        assert!(pending.timer.is_none());

        world::apply(&mut world, WorldCommand::BeginRun, &mut events);
        world::apply(
            &mut world,
            WorldCommand::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        let running = hud_for(&world);
        assert!(running.message.is_none());
        assert_eq!(running.timer, Some(Duration::from_millis(16)));
    }

    #[test]
    fn populated_scene_mirrors_the_world_terrain() {
        let world = World::new();
        let fog = FogPresentation::new(palette::SKY, FOG_NEAR, FOG_FAR).expect("valid fog");
        let scene = initial_scene(&world, fog);

        assert_eq!(scene.walls.len(), query::wall_boxes(&world).len());
        assert!(scene.goal.is_some());

        let (width, depth) = query::footprint(&world);
        assert!((scene.floor.width - (width + FLOOR_MARGIN)).abs() < f32::EPSILON);
        assert!((scene.floor.depth - (depth + FLOOR_MARGIN)).abs() < f32::EPSILON);
    }

    #[test]
    fn camera_follows_the_player_position() {
        let world = World::new();
        let pose = camera_pose(&world, 0.25);
        let player = query::player(&world);

        assert!((pose.position.x - player.x()).abs() < f32::EPSILON);
        assert!((pose.position.y - player.y()).abs() < f32::EPSILON);
        assert!((pose.position.z - player.z()).abs() < f32::EPSILON);
        assert!((pose.pitch - 0.25).abs() < f32::EPSILON);
    }
}
