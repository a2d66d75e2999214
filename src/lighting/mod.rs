pub mod compositor;
pub mod shapes;

use std::sync::Arc;

use glam::Vec2;
use serde::Deserialize;

use crate::color::{Color, pseudo_rand};

pub use compositor::DarknessBuffer;
pub use shapes::ShapeLibrary;

/// Shape used when a light definition does not name one.
pub const DEFAULT_SHAPE: &str = "circle";

// ── LightSource ───────────────────────────────────────────────────────────────

/// One emitter for the current frame.
///
/// Lights have no identity across frames: the actor and every static world
/// light are re-emitted each tick into a freshly cleared [`LightRegistry`].
#[derive(Clone, Debug, PartialEq)]
pub struct LightSource {
    /// World-space center.
    pub position: Vec2,
    pub color: Color,
    /// Uniform scale applied to the shape image.
    pub scale: f32,
    /// Key into the [`ShapeLibrary`] selecting the falloff image.
    pub shape: Arc<str>,
}

impl LightSource {
    pub fn new(position: Vec2, color: Color, scale: f32, shape: &str) -> Self {
        Self { position, color, scale, shape: Arc::from(shape) }
    }
}

// ── LightRegistry ─────────────────────────────────────────────────────────────

/// Per-frame collection of active lights.
///
/// Cleared at the start of every update, appended to by the actor and the
/// region during the update, and read whole by the compositor.
#[derive(Debug, Default)]
pub struct LightRegistry {
    lights: Vec<LightSource>,
}

impl LightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn push(&mut self, light: LightSource) {
        self.lights.push(light);
    }

    pub fn len(&self) -> usize { self.lights.len() }
    pub fn is_empty(&self) -> bool { self.lights.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, LightSource> {
        self.lights.iter()
    }

    pub fn as_slice(&self) -> &[LightSource] {
        &self.lights
    }
}

impl Extend<LightSource> for LightRegistry {
    fn extend<I: IntoIterator<Item = LightSource>>(&mut self, iter: I) {
        self.lights.extend(iter);
    }
}

impl<'a> IntoIterator for &'a LightRegistry {
    type Item = &'a LightSource;
    type IntoIter = std::slice::Iter<'a, LightSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.lights.iter()
    }
}

// ── ActorLight ────────────────────────────────────────────────────────────────

/// How the actor's own light picks its color each frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightColor {
    Fixed(Color),
    /// A fresh random hue every frame, derived from the tick counter.
    Flicker,
}

/// The light carried by the actor, centered on its position.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorLight {
    pub color: LightColor,
    pub scale: f32,
    pub shape: Arc<str>,
}

impl Default for ActorLight {
    fn default() -> Self {
        Self { color: LightColor::Fixed(Color::YELLOW), scale: 1.0, shape: Arc::from(DEFAULT_SHAPE) }
    }
}

impl ActorLight {
    /// The light for frame `tick` at `position`.
    pub fn emit(&self, position: Vec2, tick: u64) -> LightSource {
        let color = match self.color {
            LightColor::Fixed(c) => c,
            LightColor::Flicker => {
                let seed = tick.wrapping_mul(3);
                Color([pseudo_rand(seed), pseudo_rand(seed + 1), pseudo_rand(seed + 2), 1.0])
            }
        };
        LightSource { position, color, scale: self.scale, shape: Arc::clone(&self.shape) }
    }
}

// ── On-disk light definitions ─────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PointDef {
    pub x: f32,
    pub y: f32,
}

impl From<PointDef> for Vec2 {
    fn from(p: PointDef) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ColorDef {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 { 255 }

/// A statically placed light as stored in a region's `lights.json`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LightDef {
    pub position: PointDef,
    pub color: ColorDef,
    #[serde(default = "unit_size")]
    pub size: f32,
    #[serde(default)]
    pub shape: Option<String>,
}

fn unit_size() -> f32 { 1.0 }

impl From<LightDef> for LightSource {
    fn from(def: LightDef) -> Self {
        let c = def.color;
        LightSource::new(
            def.position.into(),
            Color::from_rgba8(c.r, c.g, c.b, c.a),
            def.size,
            def.shape.as_deref().unwrap_or(DEFAULT_SHAPE),
        )
    }
}
