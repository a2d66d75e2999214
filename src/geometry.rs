// =============================================================================
// GEOMETRY.RS: Directions, hitboxes and frame rectangles
//
// Small value types shared by the movement controller, the animation state
// machine and the renderer:
// - Direction (movement intent, facing, sprite-sheet row, listener vector)
// - Hitbox sample set (four corners + center, fed to the collision resolver)
// - Frame rectangles (sub-image of the actor sprite sheet)
// =============================================================================

use glam::{Vec2, Vec3};
use winit::keyboard::KeyCode;

/// Cardinal facing / movement direction.
///
/// The discriminant doubles as the row index into the actor sprite sheet.
/// Keys that map to no direction yield `None` from [`Direction::from_key`]
/// rather than a "center" variant, so a committed facing is always one of
/// these four.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Down = 0,
    Left = 1,
    Right = 2,
    Up = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Down, Direction::Left, Direction::Right, Direction::Up];

    /// Map a movement key (arrows or WASD) to its direction.
    pub fn from_key(key: KeyCode) -> Option<Direction> {
        match key {
            KeyCode::ArrowDown | KeyCode::KeyS => Some(Direction::Down),
            KeyCode::ArrowLeft | KeyCode::KeyA => Some(Direction::Left),
            KeyCode::ArrowRight | KeyCode::KeyD => Some(Direction::Right),
            KeyCode::ArrowUp | KeyCode::KeyW => Some(Direction::Up),
            _ => None,
        }
    }

    /// Sprite-sheet row sampled while facing this way.
    #[inline]
    pub fn row(self) -> u32 {
        self as u32
    }

    /// Unit step in world space (y grows downward).
    #[inline]
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Up => Vec2::new(0.0, -1.0),
        }
    }

    /// Orientation handed to the spatial audio listener.
    #[inline]
    pub fn listener_vector(self) -> Vec3 {
        self.unit().extend(0.0)
    }

    /// Advance `position` by `distance` along this direction's axis.
    #[inline]
    pub fn advance(self, position: Vec2, distance: f32) -> Vec2 {
        position + self.unit() * distance
    }
}

// =============================================================================
// HITBOX SAMPLES
// =============================================================================

/// Number of points in a hitbox sample set.
pub const HITBOX_SAMPLES: usize = 5;

/// Axis-aligned box size of an actor, centered on its position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The four corners plus the center of the box centered on `center`.
    ///
    /// Order: top-left, bottom-left, top-right, bottom-right, center.
    pub fn samples(&self, center: Vec2) -> [Vec2; HITBOX_SAMPLES] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            Vec2::new(center.x - hw, center.y - hh),
            Vec2::new(center.x - hw, center.y + hh),
            Vec2::new(center.x + hw, center.y - hh),
            Vec2::new(center.x + hw, center.y + hh),
            center,
        ]
    }
}

// =============================================================================
// FRAME RECTANGLES
// =============================================================================

/// Pixel rectangle inside a sprite sheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameRect {
    /// Normalised `(uv_min, uv_max)` of this rectangle inside a sheet of the given size.
    pub fn uv(&self, sheet_w: u32, sheet_h: u32) -> ([f32; 2], [f32; 2]) {
        let sw = sheet_w.max(1) as f32;
        let sh = sheet_h.max(1) as f32;
        (
            [self.x as f32 / sw, self.y as f32 / sh],
            [(self.x + self.width) as f32 / sw, (self.y + self.height) as f32 / sh],
        )
    }
}
