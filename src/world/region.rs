use std::path::{Path, PathBuf};

use glam::Vec2;
use image::RgbaImage;
use tracing::{debug, info};

use crate::error::{Error, Result, read_json, read_rgba};
use crate::lighting::{LightDef, LightRegistry, LightSource, PointDef};
use crate::world::mask::OpacityMask;

pub const COLLISIONS_FILE: &str = "collisions.png";
pub const LOWER_LAYERS_FILE: &str = "lower_layers.png";
pub const UPPER_LAYERS_FILE: &str = "upper_layers.png";
pub const LIGHTS_FILE: &str = "lights.json";
pub const SPAWN_FILE: &str = "spawn_point.json";

/// The scene images drawn below and above the actor.
#[derive(Clone, Debug)]
pub struct RegionLayers {
    pub lower: RgbaImage,
    pub upper: RgbaImage,
}

/// One loaded world region.
///
/// Owns its opacity mask and its static lights for as long as it is the
/// active region; dropping it releases both.
#[derive(Clone, Debug)]
pub struct Region {
    pub name: String,
    pub mask: OpacityMask,
    pub lights: Vec<LightSource>,
    pub spawn: Vec2,
    pub layers: Option<RegionLayers>,
}

impl Region {
    /// Build a region in memory (no scene layers).
    pub fn new(name: &str, mask: OpacityMask, lights: Vec<LightSource>, spawn: Vec2) -> Self {
        Self { name: name.to_string(), mask, lights, spawn, layers: None }
    }

    /// Directory holding region `name` under `maps_dir`.
    pub fn dir(maps_dir: &Path, name: &str) -> PathBuf {
        maps_dir.join(name)
    }

    /// Load `maps_dir/<name>/`.
    ///
    /// The mask, light list and spawn point are required. The layer images
    /// are loaded when both exist; a region without them still simulates and
    /// renders as backdrop plus lights.
    pub fn load(maps_dir: &Path, name: &str) -> Result<Self> {
        let dir = Self::dir(maps_dir, name);
        if !dir.is_dir() {
            return Err(Error::InvalidAsset { path: dir, reason: "region directory not found".into() });
        }

        let mask_path = dir.join(COLLISIONS_FILE);
        let mask = OpacityMask::load(&mask_path)?;
        if mask.width() == 0 || mask.height() == 0 {
            return Err(Error::InvalidAsset { path: mask_path, reason: "empty collision mask".into() });
        }

        let defs: Vec<LightDef> = read_json(&dir.join(LIGHTS_FILE))?;
        let lights: Vec<LightSource> = defs.into_iter().map(LightSource::from).collect();

        let spawn: Vec2 = read_json::<PointDef>(&dir.join(SPAWN_FILE))?.into();
        if !spawn.is_finite() {
            return Err(Error::InvalidAsset { path: dir.join(SPAWN_FILE), reason: "non-finite spawn point".into() });
        }

        let lower = dir.join(LOWER_LAYERS_FILE);
        let upper = dir.join(UPPER_LAYERS_FILE);
        let layers = if lower.is_file() && upper.is_file() {
            Some(RegionLayers { lower: read_rgba(&lower)?, upper: read_rgba(&upper)? })
        } else {
            debug!(region = name, "no scene layers; rendering lights only");
            None
        };

        info!(
            region = name,
            width = mask.width(),
            height = mask.height(),
            lights = lights.len(),
            spawn = ?spawn,
            "region loaded"
        );

        Ok(Self { name: name.to_string(), mask, lights, spawn, layers })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.mask.width(), self.mask.height())
    }

    /// Append every static light, unmodified, to this frame's registry.
    pub fn emit_lights(&self, registry: &mut LightRegistry) {
        registry.extend(self.lights.iter().cloned());
    }
}
