#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure per-frame movement system.
//!
//! Consumes the world's [`Event::TimeAdvanced`] broadcasts together with the
//! adapter-supplied movement intent and view heading, and responds with
//! [`Command::Displace`] values describing the frame's desired displacement.
//! Collision resolution stays in the world; this system only shapes intent
//! into world-space deltas.

use glam::Vec2;
use maze_sprint_core::{Command, Event, MoveIntent};

/// Ground speed while walking, world units per second.
pub const WALK_SPEED: f32 = 6.0;

/// Ground speed while sprinting, world units per second.
pub const SPRINT_SPEED: f32 = 10.0;

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    walk_speed: f32,
    sprint_speed: f32,
}

impl Config {
    /// Creates a new configuration using the provided ground speeds.
    #[must_use]
    pub const fn new(walk_speed: f32, sprint_speed: f32) -> Self {
        Self {
            walk_speed,
            sprint_speed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(WALK_SPEED, SPRINT_SPEED)
    }
}

/// Snapshot of input gathered by an adapter for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameIntent {
    /// Normalized movement request on the forward/right axes.
    pub movement: MoveIntent,
    /// Whether the sprint modifier is held.
    pub sprinting: bool,
    /// Whether a jump was requested this frame.
    pub jump: bool,
}

/// Pure system that reacts to world events and emits displacement commands.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    config: Config,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Consumes world events and frame input to emit movement commands.
    ///
    /// `heading` is the view yaw in radians; zero faces the negative depth
    /// axis, matching the camera convention used by the adapters.
    pub fn handle(
        &self,
        events: &[Event],
        heading: f32,
        intent: FrameIntent,
        out: &mut Vec<Command>,
    ) {
        if intent.jump {
            out.push(Command::Jump);
        }

        if intent.movement.is_idle() {
            return;
        }

        let direction = planar_direction(heading, intent.movement);
        if direction == Vec2::ZERO {
            return;
        }

        let speed = if intent.sprinting {
            self.config.sprint_speed
        } else {
            self.config.walk_speed
        };

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                let delta = direction * speed * dt.as_secs_f32();
                out.push(Command::Displace {
                    delta_x: delta.x,
                    delta_z: delta.y,
                });
            }
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Combines forward and strafe intent into a normalized X/Z direction.
///
/// Forward at yaw zero points down negative Z; the right vector is the
/// ground-plane cross product of world-up and forward.
#[must_use]
fn planar_direction(heading: f32, movement: MoveIntent) -> Vec2 {
    let forward = Vec2::new(-heading.sin(), -heading.cos());
    let right = Vec2::new(-forward.y, forward.x);

    let combined =
        forward * f32::from(movement.forward()) + right * f32::from(movement.right());
    combined.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tick(millis: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }]
    }

    fn intent(forward: i8, right: i8) -> FrameIntent {
        FrameIntent {
            movement: MoveIntent::new(forward, right),
            sprinting: false,
            jump: false,
        }
    }

    #[test]
    fn idle_intent_emits_nothing() {
        let movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(&tick(16), 0.0, FrameIntent::default(), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn forward_at_zero_heading_moves_down_negative_z() {
        let movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(&tick(50), 0.0, intent(1, 0), &mut out);

        let [Command::Displace { delta_x, delta_z }] = out.as_slice() else {
            panic!("expected a single displacement command");
        };
        assert!(delta_x.abs() < 1e-6);
        assert!((delta_z - (-WALK_SPEED * 0.05)).abs() < 1e-6);
    }

    #[test]
    fn diagonal_intent_is_normalized() {
        let movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(&tick(50), 0.0, intent(1, 1), &mut out);

        let [Command::Displace { delta_x, delta_z }] = out.as_slice() else {
            panic!("expected a single displacement command");
        };
        let magnitude = (delta_x * delta_x + delta_z * delta_z).sqrt();
        assert!((magnitude - WALK_SPEED * 0.05).abs() < 1e-5);
    }

    #[test]
    fn sprint_scales_the_displacement() {
        let movement = Movement::default();
        let mut out = Vec::new();
        let sprinting = FrameIntent {
            movement: MoveIntent::new(1, 0),
            sprinting: true,
            jump: false,
        };

        movement.handle(&tick(50), 0.0, sprinting, &mut out);

        let [Command::Displace { delta_z, .. }] = out.as_slice() else {
            panic!("expected a single displacement command");
        };
        assert!((delta_z - (-SPRINT_SPEED * 0.05)).abs() < 1e-5);
    }

    #[test]
    fn quarter_turn_heading_rotates_the_forward_axis() {
        let movement = Movement::default();
        let mut out = Vec::new();

        // Yaw of +90° turns the view toward negative X.
        movement.handle(&tick(50), std::f32::consts::FRAC_PI_2, intent(1, 0), &mut out);

        let [Command::Displace { delta_x, delta_z }] = out.as_slice() else {
            panic!("expected a single displacement command");
        };
        assert!((delta_x - (-WALK_SPEED * 0.05)).abs() < 1e-5);
        assert!(delta_z.abs() < 1e-5);
    }

    #[test]
    fn jump_request_is_forwarded_even_without_movement() {
        let movement = Movement::default();
        let mut out = Vec::new();
        let jump_only = FrameIntent {
            movement: MoveIntent::default(),
            sprinting: false,
            jump: true,
        };

        movement.handle(&tick(16), 0.0, jump_only, &mut out);

        assert_eq!(out, vec![Command::Jump]);
    }

    #[test]
    fn strafe_right_at_zero_heading_moves_positive_x() {
        let movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(&tick(50), 0.0, intent(0, 1), &mut out);

        let [Command::Displace { delta_x, delta_z }] = out.as_slice() else {
            panic!("expected a single displacement command");
        };
        assert!((delta_x - WALK_SPEED * 0.05).abs() < 1e-5);
        assert!(delta_z.abs() < 1e-5);
    }
}
