pub mod animation;
pub mod movement;

use std::time::Duration;

use glam::Vec2;

use crate::geometry::{FrameRect, Hitbox};
use crate::input::InputEvent;
use crate::lighting::{ActorLight, LightRegistry};
use crate::world::OpacityMask;

pub use animation::{AnimationState, Animator, FrameBand, SheetLayout};
pub use movement::{MIN_HEALTH, MovementController};

/// Tunables for the controllable actor.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorConfig {
    pub layout: SheetLayout,
    /// Collision box; defaults to one sprite frame.
    pub hitbox: Hitbox,
    /// World units per tick.
    pub speed: f32,
    pub health: f32,
    pub no_clip: bool,
    pub terrain_drag: bool,
    pub light: ActorLight,
}

impl ActorConfig {
    /// Config for a sprite sheet of the given pixel size.
    pub fn from_sheet(sheet_width: u32, sheet_height: u32) -> Self {
        let layout = SheetLayout::from_sheet(sheet_width, sheet_height);
        Self {
            layout,
            hitbox: Hitbox::new(layout.frame_width as f32, layout.frame_height as f32),
            ..Self::default()
        }
    }
}

impl Default for ActorConfig {
    fn default() -> Self {
        let layout = SheetLayout::default();
        Self {
            layout,
            hitbox: Hitbox::new(layout.frame_width as f32, layout.frame_height as f32),
            speed: 2.0,
            health: 10.0,
            no_clip: false,
            terrain_drag: false,
            light: ActorLight::default(),
        }
    }
}

/// The player-controlled body: movement, animation and its own light.
#[derive(Clone, Debug)]
pub struct Actor {
    pub movement: MovementController,
    pub animator: Animator,
    pub light: ActorLight,
}

impl Actor {
    pub fn new(spawn: Vec2, config: &ActorConfig) -> Self {
        let movement = MovementController::new(spawn, config.hitbox, config.speed)
            .with_no_clip(config.no_clip)
            .with_terrain_drag(config.terrain_drag)
            .with_health(config.health);
        Self { movement, animator: Animator::new(config.layout), light: config.light.clone() }
    }

    pub fn handle(&mut self, event: InputEvent) {
        self.movement.handle(event);
    }

    /// One tick: move, animate, then emit this frame's actor light.
    pub fn update(&mut self, mask: &OpacityMask, dt: Duration, tick: u64, lights: &mut LightRegistry) {
        let m = &mut self.movement;
        m.update(mask);
        self.animator.update(m.is_walking(), m.is_attacking(), m.is_dead(), m.facing(), dt);
        lights.push(self.light.emit(m.position(), tick));
    }

    pub fn position(&self) -> Vec2 { self.movement.position() }

    pub fn frame_rect(&self) -> FrameRect { self.animator.frame_rect() }
}
