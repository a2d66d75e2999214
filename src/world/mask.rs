use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use crate::error::{Result, read_rgba};

/// Opacity at or above which a mask pixel blocks movement.
pub const FULL_OPACITY: u8 = 255;

/// Immutable per-region obstruction field.
///
/// Each cell holds an alpha value: low opacity is traversable, `FULL_OPACITY`
/// is solid. Lookups outside the grid report "blocked" (`None`) instead of
/// failing, so callers never need to pre-clip coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct OpacityMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl OpacityMask {
    /// Build a mask from raw row-major alpha values.
    ///
    /// `alpha.len()` must equal `width * height`; any shortfall is padded as solid.
    pub fn from_alpha(width: u32, height: u32, mut alpha: Vec<u8>) -> Self {
        alpha.resize((width as usize) * (height as usize), FULL_OPACITY);
        Self { width, height, alpha }
    }

    /// A mask of the given size where every pixel has opacity `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self::from_alpha(width, height, vec![value; (width as usize) * (height as usize)])
    }

    /// Take the alpha channel of a decoded collision image.
    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let alpha = image.pixels().map(|p| p.0[3]).collect();
        Self { width, height, alpha }
    }

    /// Load a collision image (any format the `image` crate decodes).
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_image(&read_rgba(path)?))
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    /// True when `point` lies strictly inside the mask.
    ///
    /// The edges themselves (`0` and `width`/`height`) count as outside.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > 0.0
            && point.y > 0.0
            && point.x < self.width as f32
            && point.y < self.height as f32
    }

    /// Opacity of the pixel containing `point`, or `None` outside the mask.
    #[inline]
    pub fn opacity_at(&self, point: Vec2) -> Option<u8> {
        if !self.contains(point) {
            return None;
        }
        let x = (point.x.floor() as u32).min(self.width - 1);
        let y = (point.y.floor() as u32).min(self.height - 1);
        self.alpha.get((y * self.width + x) as usize).copied()
    }

    /// True when the pixel under `point` is below full opacity.
    #[inline]
    pub fn is_traversable(&self, point: Vec2) -> bool {
        matches!(self.opacity_at(point), Some(a) if a < FULL_OPACITY)
    }

    /// Movement multiplier for the terrain under `point`: `1 - alpha / 255`.
    ///
    /// Zero outside the mask and on solid pixels.
    pub fn speed_factor(&self, point: Vec2) -> f32 {
        match self.opacity_at(point) {
            Some(a) => 1.0 - a as f32 / FULL_OPACITY as f32,
            None => 0.0,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
