use std::collections::HashMap;
use std::path::Path;

use image::{Rgba, RgbaImage};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::read_rgba;
use crate::lighting::DEFAULT_SHAPE;

/// Edge length of the built-in radial falloff.
pub const BUILTIN_SHAPE_SIZE: u32 = 128;

// ── ShapeLibrary ──────────────────────────────────────────────────────────────

/// Radial falloff images keyed by light shape id.
///
/// Shape images are white with the falloff stored in alpha; a light tints
/// them with its own color. The built-in `"circle"` is always available so a
/// region without custom light textures still renders.
#[derive(Debug, Clone)]
pub struct ShapeLibrary {
    shapes: HashMap<String, RgbaImage>,
}

impl Default for ShapeLibrary {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl ShapeLibrary {
    /// A library holding only the built-in circle.
    pub fn with_builtin() -> Self {
        let mut shapes = HashMap::new();
        shapes.insert(DEFAULT_SHAPE.to_string(), radial_falloff(BUILTIN_SHAPE_SIZE));
        Self { shapes }
    }

    /// Load every `.png` under `dir` (recursively), keyed by file stem.
    ///
    /// A missing directory leaves only the built-in shape. Files that fail to
    /// decode are skipped with a warning.
    pub fn load_dir(dir: &Path) -> Self {
        let mut lib = Self::with_builtin();
        if !dir.is_dir() {
            debug!(path = %dir.display(), "no light shape directory; using built-in shapes");
            return lib;
        }

        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            let is_png = path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("png"));
            if !entry.file_type().is_file() || !is_png {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            match read_rgba(path) {
                Ok(img) => {
                    debug!(shape = stem, w = img.width(), h = img.height(), "loaded light shape");
                    lib.shapes.insert(stem.to_string(), img);
                }
                Err(e) => warn!("skipping light shape: {e}"),
            }
        }
        lib
    }

    pub fn insert(&mut self, name: &str, image: RgbaImage) {
        self.shapes.insert(name.to_string(), image);
    }

    pub fn get(&self, name: &str) -> Option<&RgbaImage> {
        self.shapes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RgbaImage)> {
        self.shapes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize { self.shapes.len() }
    pub fn is_empty(&self) -> bool { self.shapes.is_empty() }
}

/// White square image whose alpha falls off smoothly from 1 at the center to
/// 0 at the inscribed circle.
pub fn radial_falloff(size: u32) -> RgbaImage {
    let c = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - c;
        let dy = y as f32 + 0.5 - c;
        let t = ((dx * dx + dy * dy).sqrt() / c).min(1.0);
        // Smoothstep from the rim inward.
        let s = 1.0 - t;
        let a = s * s * (3.0 - 2.0 * s);
        Rgba([255, 255, 255, (a * 255.0).round() as u8])
    })
}
