#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Sprint.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.

mod config;

pub use self::config::DisplayConfig;

use anyhow::Result;
use glam::{Vec2, Vec3};
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, set_cursor_grab,
    show_mouse, KeyCode, MouseButton,
};
use maze_sprint_core::MoveIntent;
use maze_sprint_rendering::{
    Color, FrameInput, GoalPresentation, Presentation, RenderingBackend, Scene,
    WallBlockPresentation,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Snapshot of keyboard state observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    /// `Q` quits the game loop; `Escape` does too while the pointer is free.
    quit_requested: bool,
    /// `Escape` releases an active pointer grab.
    escape_pressed: bool,
    forward_held: bool,
    backward_held: bool,
    left_held: bool,
    right_held: bool,
    sprint_held: bool,
    jump_pressed: bool,
}

impl KeyboardState {
    fn poll() -> Self {
        let escape_pressed = is_key_pressed(KeyCode::Escape);
        let quit_requested = is_key_pressed(KeyCode::Q);
        let forward_held = is_key_down(KeyCode::W) || is_key_down(KeyCode::Up);
        let backward_held = is_key_down(KeyCode::S) || is_key_down(KeyCode::Down);
        let left_held = is_key_down(KeyCode::A) || is_key_down(KeyCode::Left);
        let right_held = is_key_down(KeyCode::D) || is_key_down(KeyCode::Right);
        let sprint_held = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
        let jump_pressed = is_key_pressed(KeyCode::Space);

        Self {
            quit_requested,
            escape_pressed,
            forward_held,
            backward_held,
            left_held,
            right_held,
            sprint_held,
            jump_pressed,
        }
    }
}

/// Combines held movement keys into a single intent value.
fn movement_from_keys(keyboard: &KeyboardState) -> MoveIntent {
    let forward = i8::from(keyboard.forward_held) - i8::from(keyboard.backward_held);
    let right = i8::from(keyboard.right_held) - i8::from(keyboard.left_held);
    MoveIntent::new(forward, right)
}

/// Tracks pointer-grab state and derives per-frame look deltas.
#[derive(Clone, Copy, Debug, Default)]
struct PointerState {
    locked: bool,
    last_cursor: Option<Vec2>,
}

impl PointerState {
    /// Processes this frame's pointer events and returns the scaled look
    /// delta together with whether the grab was acquired on this frame.
    fn update(&mut self, keyboard: &KeyboardState, sensitivity: f32) -> (Vec2, bool) {
        let mut lock_acquired = false;

        if !self.locked && is_mouse_button_pressed(MouseButton::Left) {
            set_cursor_grab(true);
            show_mouse(false);
            self.locked = true;
            // Drop the stale cursor sample so the grab does not snap the view.
            self.last_cursor = None;
            lock_acquired = true;
        } else if self.locked && keyboard.escape_pressed {
            set_cursor_grab(false);
            show_mouse(true);
            self.locked = false;
            self.last_cursor = None;
        }

        if !self.locked {
            return (Vec2::ZERO, lock_acquired);
        }

        let (cursor_x, cursor_y) = mouse_position();
        let cursor = Vec2::new(cursor_x, cursor_y);
        let delta = match self.last_cursor {
            Some(previous) => (cursor - previous) * sensitivity,
            None => Vec2::ZERO,
        };
        self.last_cursor = Some(cursor);

        (delta, lock_acquired)
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    display: DisplayConfig,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            display: DisplayConfig::default(),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures window size, field of view and mouse sensitivity.
    #[must_use]
    pub fn with_display_config(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing
    /// ten-second averages once one second has elapsed.
    fn record_frame(&mut self, frame: Duration, render: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        if seconds <= f32::EPSILON {
            self.elapsed = Duration::ZERO;
            self.frames = 0;
            self.render_accum = Duration::ZERO;
            return None;
        }

        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = if self.frames == 0 {
            Duration::ZERO
        } else {
            self.render_accum / self.frames
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;

        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            display,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: display.window_width,
            window_height: display.window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let fovy = display.fov_degrees.to_radians();
            let mut fps_counter = FpsCounter::default();
            let mut pointer = PointerState::default();

            loop {
                let keyboard = KeyboardState::poll();
                if keyboard.quit_requested || (keyboard.escape_pressed && !pointer.locked) {
                    break;
                }

                let (mut look_delta, lock_acquired) =
                    pointer.update(&keyboard, display.mouse_sensitivity);
                if display.invert_y {
                    look_delta.y = -look_delta.y;
                }

                let frame_input = FrameInput {
                    movement: movement_from_keys(&keyboard),
                    sprinting: keyboard.sprint_held,
                    jump_pressed: keyboard.jump_pressed,
                    look_delta,
                    pointer_locked: pointer.locked,
                    lock_acquired,
                };

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                update_scene(frame_dt, frame_input, &mut scene);

                macroquad::window::clear_background(background);

                let render_start = Instant::now();

                let camera = scene.camera;
                macroquad::camera::set_camera(&macroquad::camera::Camera3D {
                    position: to_macroquad_vec3(camera.position),
                    target: to_macroquad_vec3(camera.position + camera.forward()),
                    up: to_macroquad_vec3(Vec3::Y),
                    fovy,
                    ..Default::default()
                });

                draw_floor(&scene);
                draw_wall_blocks(&scene, camera.position);
                if let Some(goal) = scene.goal {
                    draw_goal(&goal, macroquad::time::get_time());
                }

                macroquad::camera::set_default_camera();
                draw_hud(&scene);

                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(frame_dt, render_duration);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_floor(scene: &Scene) {
    let floor = scene.floor;

    // Macroquad planes take half extents.
    macroquad::models::draw_plane(
        to_macroquad_vec3(Vec3::ZERO),
        macroquad::math::Vec2::new(floor.width * 0.5, floor.depth * 0.5),
        None,
        to_macroquad_color(floor.color),
    );
}

fn draw_wall_blocks(scene: &Scene, eye: Vec3) {
    for wall in &scene.walls {
        let color = fogged_wall_color(wall, &scene.fog, eye);
        macroquad::models::draw_cube(
            to_macroquad_vec3(wall.center),
            to_macroquad_vec3(wall.size),
            None,
            to_macroquad_color(color),
        );
    }
}

/// Blends a wall's color toward the fog color based on eye distance.
fn fogged_wall_color(
    wall: &WallBlockPresentation,
    fog: &maze_sprint_rendering::FogPresentation,
    eye: Vec3,
) -> Color {
    let distance = wall.center.distance(eye);
    wall.color.blend(fog.color, fog.factor_at(distance))
}

fn draw_goal(goal: &GoalPresentation, time_seconds: f64) {
    let color = goal.color.blend(goal.glow_color, goal_pulse(time_seconds));
    macroquad::models::draw_sphere(
        to_macroquad_vec3(goal.position),
        goal.radius,
        None,
        to_macroquad_color(color),
    );
}

/// Pulse factor in 0.0..=0.8 animating the goal marker glow.
fn goal_pulse(time_seconds: f64) -> f32 {
    let wave = (time_seconds * 3.0).sin() as f32;
    0.4 + wave * 0.4
}

fn draw_hud(scene: &Scene) {
    let text_color = macroquad::color::WHITE;

    if let Some(timer) = scene.hud.timer {
        let label = format!("{:.2}s", timer.as_secs_f32());
        macroquad::text::draw_text(&label, 16.0, 32.0, 28.0, text_color);
    }

    if let Some(message) = &scene.hud.message {
        let font_size = 32.0;
        let dimensions = macroquad::text::measure_text(message, None, font_size as u16, 1.0);
        let x = (macroquad::window::screen_width() - dimensions.width) * 0.5;
        let y = macroquad::window::screen_height() * 0.5;
        macroquad::text::draw_text(message, x, y, font_size, text_color);
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

fn to_macroquad_vec3(v: Vec3) -> macroquad::math::Vec3 {
    macroquad::math::Vec3::new(v.x, v.y, v.z)
}
