#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Sprint adapters.
//!
//! Backends consume a declarative [`Scene`] describing the floor, wall
//! blocks, goal marker and camera pose, and hand per-frame input back to the
//! caller through [`FrameInput`]. Nothing in this crate touches a concrete
//! graphics API.

use anyhow::Result as AnyResult;
use glam::{Vec2, Vec3};
use maze_sprint_core::{MoveIntent, WallBox};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Linearly blends this color towards `other` by `t` in 0.0..=1.0.
    #[must_use]
    pub fn blend(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);

        Self {
            red: self.red + (other.red - self.red) * t,
            green: self.green + (other.green - self.green) * t,
            blue: self.blue + (other.blue - self.blue) * t,
            alpha: self.alpha + (other.alpha - self.alpha) * t,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Default colors shared by the demo scenes.
pub mod palette {
    use super::Color;

    /// Sky and clear color.
    pub const SKY: Color = Color::from_rgb_u8(0x88, 0xba, 0xff);
    /// Grass-green floor plane.
    pub const FLOOR: Color = Color::from_rgb_u8(0x6a, 0xa8, 0x4f);
    /// Earthy wall blocks.
    pub const WALL: Color = Color::from_rgb_u8(0x70, 0x50, 0x40);
    /// Goal marker body.
    pub const GOAL: Color = Color::from_rgb_u8(0xff, 0xd1, 0x66);
    /// Warm glow around the goal marker.
    pub const GOAL_GLOW: Color = Color::from_rgb_u8(0xff, 0xaa, 0x33);
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Normalized movement request captured from the keyboard.
    pub movement: MoveIntent,
    /// Whether the sprint modifier is held.
    pub sprinting: bool,
    /// Whether a jump was requested on this frame.
    pub jump_pressed: bool,
    /// Mouse-look delta in radians, already scaled by the adapter's
    /// configured sensitivity; x turns, y tilts.
    pub look_delta: Vec2,
    /// Whether the adapter currently holds exclusive pointer input.
    pub pointer_locked: bool,
    /// Whether the pointer became locked on this frame.
    pub lock_acquired: bool,
}

/// First-person camera pose driving the projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space.
    pub position: Vec3,
    /// Yaw in radians; zero faces the negative depth axis.
    pub yaw: f32,
    /// Pitch in radians, positive looking up, clamped by the caller.
    pub pitch: f32,
}

impl CameraPose {
    /// Creates a new camera pose.
    #[must_use]
    pub const fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
        }
    }

    /// Unit view direction derived from yaw and pitch.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }
}

/// Linear distance fog blended over distant geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogPresentation {
    /// Color fully applied at and beyond the far distance.
    pub color: Color,
    /// Distance at which fog starts to blend in.
    pub near: f32,
    /// Distance at which geometry is fully fogged.
    pub far: f32,
}

impl FogPresentation {
    /// Creates a new fog descriptor.
    ///
    /// Returns an error when the near distance does not precede the far one.
    pub fn new(color: Color, near: f32, far: f32) -> Result<Self, RenderingError> {
        if near < 0.0 || far <= near {
            return Err(RenderingError::InvalidFogRange { near, far });
        }

        Ok(Self { color, near, far })
    }

    /// Blend factor in 0.0..=1.0 for geometry at the provided distance.
    #[must_use]
    pub fn factor_at(&self, distance: f32) -> f32 {
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// Flat floor plane centered on the world origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorPresentation {
    /// Extent along the horizontal axis in world units.
    pub width: f32,
    /// Extent along the depth axis in world units.
    pub depth: f32,
    /// Fill color of the plane.
    pub color: Color,
}

impl FloorPresentation {
    /// Creates a new floor descriptor.
    #[must_use]
    pub const fn new(width: f32, depth: f32, color: Color) -> Self {
        Self {
            width,
            depth,
            color,
        }
    }
}

/// Single wall block rendered as an axis-aligned cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallBlockPresentation {
    /// Center of the block in world space.
    pub center: Vec3,
    /// Full extents of the block along each axis.
    pub size: Vec3,
    /// Fill color before fog is applied.
    pub color: Color,
}

impl WallBlockPresentation {
    /// Creates a new wall block descriptor.
    #[must_use]
    pub const fn new(center: Vec3, size: Vec3, color: Color) -> Self {
        Self {
            center,
            size,
            color,
        }
    }

    /// Derives a block from a collision box.
    ///
    /// Collision boxes are inset from the nominal cell square to ease
    /// sliding; `expand` puts that margin back so adjacent blocks render
    /// flush, and `height` extrudes the footprint upward from the floor.
    #[must_use]
    pub fn from_wall_box(wall: &WallBox, expand: f32, height: f32, color: Color) -> Self {
        let width = wall.max_x() - wall.min_x() + 2.0 * expand;
        let depth = wall.max_z() - wall.min_z() + 2.0 * expand;
        let center_x = (wall.min_x() + wall.max_x()) / 2.0;
        let center_z = (wall.min_z() + wall.max_z()) / 2.0;

        Self {
            center: Vec3::new(center_x, height / 2.0, center_z),
            size: Vec3::new(width, height, depth),
            color,
        }
    }
}

/// Glowing marker placed at the goal cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoalPresentation {
    /// Center of the marker sphere in world space.
    pub position: Vec3,
    /// Radius of the marker sphere.
    pub radius: f32,
    /// Body color of the marker.
    pub color: Color,
    /// Emissive glow color pulsed by backends.
    pub glow_color: Color,
}

impl GoalPresentation {
    /// Creates a new goal marker descriptor.
    #[must_use]
    pub const fn new(position: Vec3, radius: f32, color: Color, glow_color: Color) -> Self {
        Self {
            position,
            radius,
            color,
            glow_color,
        }
    }
}

/// Heads-up display content drawn over the 3D scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HudPresentation {
    /// Run clock shown while a run is live or finished.
    pub timer: Option<Duration>,
    /// Status or instruction line shown to the player.
    pub message: Option<String>,
}

/// Scene description combining terrain, goal, camera and HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Distance fog applied to wall blocks.
    pub fog: FogPresentation,
    /// Floor plane underneath the terrain.
    pub floor: FloorPresentation,
    /// Wall blocks currently installed in the world.
    pub walls: Vec<WallBlockPresentation>,
    /// Goal marker, absent in arena mode.
    pub goal: Option<GoalPresentation>,
    /// First-person camera pose for this frame.
    pub camera: CameraPose,
    /// Overlay content drawn after the 3D pass.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub const fn new(
        fog: FogPresentation,
        floor: FloorPresentation,
        walls: Vec<WallBlockPresentation>,
        goal: Option<GoalPresentation>,
        camera: CameraPose,
        hud: HudPresentation,
    ) -> Self {
        Self {
            fog,
            floor,
            walls,
            goal,
            camera,
            hud,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame; doubles as the sky.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Sprint scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered, letting the caller animate world snapshots deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Fog distances must satisfy `0 <= near < far`.
    InvalidFogRange {
        /// Near distance provided by the caller.
        near: f32,
        /// Far distance provided by the caller.
        far: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFogRange { near, far } => {
                write!(f, "fog range must satisfy 0 <= near < far (received {near}..{far})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fog_accepts_ordered_distances() {
        let fog = FogPresentation::new(palette::SKY, 20.0, 200.0).expect("valid fog range");
        assert!(fog.factor_at(10.0).abs() < f32::EPSILON);
        assert!((fog.factor_at(200.0) - 1.0).abs() < f32::EPSILON);
        assert!((fog.factor_at(110.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn fog_rejects_inverted_distances() {
        let error =
            FogPresentation::new(palette::SKY, 50.0, 20.0).expect_err("inverted range must fail");
        let RenderingError::InvalidFogRange { near, far } = error;
        assert!((near - 50.0).abs() < f32::EPSILON);
        assert!((far - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fog_factor_clamps_beyond_far() {
        let fog = FogPresentation::new(palette::SKY, 1.0, 2.0).expect("valid fog range");
        assert!((fog.factor_at(100.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn wall_block_restores_the_full_cell_footprint() {
        let wall = WallBox::from_cell_square(4.0, -8.0, maze_sprint_core::WALL_INSET);
        let block = WallBlockPresentation::from_wall_box(
            &wall,
            maze_sprint_core::WALL_INSET,
            maze_sprint_core::WALL_HEIGHT,
            palette::WALL,
        );

        assert!((block.size.x - maze_sprint_core::CELL_LENGTH).abs() < 1e-5);
        assert!((block.size.z - maze_sprint_core::CELL_LENGTH).abs() < 1e-5);
        assert!((block.size.y - maze_sprint_core::WALL_HEIGHT).abs() < f32::EPSILON);
        assert!((block.center.x - 4.0).abs() < 1e-5);
        assert!((block.center.z - (-8.0)).abs() < 1e-5);
        assert!((block.center.y - maze_sprint_core::WALL_HEIGHT / 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn camera_forward_faces_negative_z_at_rest() {
        let pose = CameraPose::new(Vec3::ZERO, 0.0, 0.0);
        let forward = pose.forward();
        assert!(forward.x.abs() < 1e-6);
        assert!(forward.y.abs() < 1e-6);
        assert!((forward.z - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn camera_pitch_tilts_the_view_upward() {
        let pose = CameraPose::new(Vec3::ZERO, 0.0, std::f32::consts::FRAC_PI_4);
        assert!(pose.forward().y > 0.0);
    }

    #[test]
    fn color_blend_interpolates_channels() {
        let black = Color::new(0.0, 0.0, 0.0, 1.0);
        let white = Color::new(1.0, 1.0, 1.0, 1.0);
        let mid = black.blend(white, 0.5);
        assert!((mid.red - 0.5).abs() < f32::EPSILON);
        assert!((mid.green - 0.5).abs() < f32::EPSILON);
        assert!((mid.blue - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn lighten_clamps_the_amount() {
        let base = Color::from_rgb_u8(0x70, 0x50, 0x40);
        let lightened = base.lighten(2.0);
        assert!((lightened.red - 1.0).abs() < f32::EPSILON);
        assert!((lightened.green - 1.0).abs() < f32::EPSILON);
        assert!((lightened.blue - 1.0).abs() < f32::EPSILON);
    }
}
