use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::geometry::{Direction, Hitbox};
use crate::input::{InputEvent, Intent};
use crate::world::{OpacityMask, can_move_to};

/// Health below this marks the actor dead.
pub const MIN_HEALTH: f32 = 1.0;

/// Owns the actor's position, facing and locomotion flags.
///
/// Direction input is tracked as a press-ordered stack: the most recently
/// pressed direction that is still held drives movement, and releasing it
/// falls back to the one pressed before. Every committed position has
/// passed [`can_move_to`] for the actor's hitbox.
#[derive(Debug, Clone)]
pub struct MovementController {
    position: Vec2,
    facing: Direction,
    hitbox: Hitbox,
    speed: f32,
    no_clip: bool,
    terrain_drag: bool,
    health: f32,

    /// Held directions, oldest first.
    held: Vec<Direction>,
    attack_held: bool,

    walking: bool,
    attacking: bool,
    dead: bool,
}

impl MovementController {
    pub fn new(position: Vec2, hitbox: Hitbox, speed: f32) -> Self {
        Self {
            position,
            facing: Direction::Down,
            hitbox,
            speed,
            no_clip: false,
            terrain_drag: false,
            health: 10.0,
            held: Vec::with_capacity(Direction::ALL.len()),
            attack_held: false,
            walking: false,
            attacking: false,
            dead: false,
        }
    }

    pub fn with_no_clip(mut self, no_clip: bool) -> Self {
        self.no_clip = no_clip;
        self
    }

    /// Scale each step by the terrain's [`OpacityMask::speed_factor`].
    pub fn with_terrain_drag(mut self, terrain_drag: bool) -> Self {
        self.terrain_drag = terrain_drag;
        self
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.set_health(health);
        self
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Apply one press/release. Ignored once dead.
    ///
    /// The shift modifier is carried on the event but has no effect on
    /// locomotion.
    pub fn handle(&mut self, event: InputEvent) {
        if self.dead {
            return;
        }
        match event {
            InputEvent::Pressed { intent: Intent::Move(dir), .. } => {
                // Re-pressing an already held key moves it to the top.
                self.held.retain(|&d| d != dir);
                self.held.push(dir);
            }
            InputEvent::Released { intent: Intent::Move(dir), .. } => {
                self.held.retain(|&d| d != dir);
            }
            InputEvent::Pressed { intent: Intent::Attack, .. } => self.attack_held = true,
            InputEvent::Released { intent: Intent::Attack, .. } => self.attack_held = false,
        }
    }

    /// Reconcile with a "currently held" snapshot instead of discrete events.
    ///
    /// Directions no longer held are dropped; newly held ones are pushed in
    /// the order given, so a caller that knows press order should list the
    /// newest last. Ignored once dead.
    pub fn sync_held(&mut self, directions: &[Direction], attack: bool) {
        if self.dead {
            return;
        }
        self.held.retain(|d| directions.contains(d));
        for &dir in directions {
            if !self.held.contains(&dir) {
                self.held.push(dir);
            }
        }
        self.attack_held = attack;
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Advance one tick against `mask`. Returns the new `walking` flag.
    pub fn update(&mut self, mask: &OpacityMask) -> bool {
        if self.dead {
            self.walking = false;
            self.attacking = false;
            return false;
        }

        self.walking = false;
        if let Some(dir) = self.active_direction() {
            self.facing = dir;
            if !self.attack_held {
                self.walking = self.try_step(mask, dir);
            }
        }
        self.attacking = self.attack_held;
        self.walking
    }

    fn try_step(&mut self, mask: &OpacityMask, dir: Direction) -> bool {
        let mut distance = self.speed;
        if self.terrain_drag {
            distance *= mask.speed_factor(self.position);
        }
        if distance <= 0.0 {
            return false;
        }

        let candidate = dir.advance(self.position, distance);
        if candidate.is_finite() && can_move_to(mask, &self.hitbox.samples(candidate), self.no_clip) {
            self.position = candidate;
            true
        } else {
            false
        }
    }

    // ── Health ───────────────────────────────────────────────────────────────

    pub fn set_health(&mut self, health: f32) {
        self.health = health;
        if !self.dead && self.health < MIN_HEALTH {
            info!(health = self.health, "actor died");
            self.dead = true;
            self.walking = false;
            self.attacking = false;
            self.held.clear();
            self.attack_held = false;
        }
    }

    pub fn damage(&mut self, amount: f32) {
        debug!(amount, health = self.health, "actor damaged");
        self.set_health(self.health - amount);
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    /// Most recently pressed direction still held.
    pub fn active_direction(&self) -> Option<Direction> {
        self.held.last().copied()
    }

    pub fn position(&self) -> Vec2 { self.position }
    pub fn facing(&self) -> Direction { self.facing }
    pub fn hitbox(&self) -> Hitbox { self.hitbox }
    pub fn speed(&self) -> f32 { self.speed }
    pub fn health(&self) -> f32 { self.health }
    pub fn is_walking(&self) -> bool { self.walking }
    pub fn is_attacking(&self) -> bool { self.attacking }
    pub fn is_dead(&self) -> bool { self.dead }

    /// Listener orientation for spatial audio.
    pub fn listener_orientation(&self) -> Vec3 {
        self.facing.listener_vector()
    }
}
