use std::time::Duration;

use maze_sprint_core::{Command, Event, GridDimensions, MoveIntent};
use maze_sprint_system_movement::{FrameIntent, Movement};
use maze_sprint_world::{self as world, query, World};

/// Drives a fixed command script and records every broadcast event.
fn run_script(seed: u64) -> (Vec<Event>, maze_sprint_core::WorldPoint) {
    let mut world = World::new();
    let movement = Movement::default();
    let mut log = Vec::new();

    world::apply(
        &mut world,
        Command::ConfigureMaze {
            dimensions: GridDimensions::new(15, 15).expect("valid dimensions"),
            seed,
        },
        &mut log,
    );
    world::apply(&mut world, Command::BeginRun, &mut log);

    let script: [(f32, i8, i8); 6] = [
        (0.0, 1, 0),
        (0.0, 1, 0),
        (0.6, 1, 0),
        (1.2, 0, 1),
        (2.1, 1, -1),
        (3.0, -1, 0),
    ];

    for (yaw, forward, right) in script {
        world::apply(&mut world, Command::SetHeading { yaw }, &mut log);

        let mut tick_events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut tick_events,
        );

        let intent = FrameIntent {
            movement: MoveIntent::new(forward, right),
            sprinting: false,
            jump: false,
        };
        let mut commands = Vec::new();
        movement.handle(&tick_events, query::heading(&world), intent, &mut commands);

        log.append(&mut tick_events);
        for command in commands {
            world::apply(&mut world, command, &mut log);
        }
    }

    (log, query::player(&world))
}

#[test]
fn identical_scripts_replay_identically() {
    let (first_log, first_player) = run_script(0xF15E);
    let (second_log, second_player) = run_script(0xF15E);

    assert_eq!(first_log, second_log);
    assert_eq!(first_player, second_player);
}
