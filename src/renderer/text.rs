use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use image::RgbaImage;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result, read_json, read_rgba};

pub const FONT_DESCRIPTOR_FILE: &str = "label.json";
pub const FONT_ATLAS_FILE: &str = "label.png";

/// Height of the region-name label in world units.
pub const LABEL_SIZE: f32 = 12.0;

// ── GlyphQuad ─────────────────────────────────────────────────────────────────

/// One laid-out character: a world-space rectangle and its atlas UVs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub min: Vec2,
    pub max: Vec2,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Lay `text` out left to right from `origin` (top-left of the first line).
///
/// Glyph metrics are scaled by `size / font.line_height`. `'\n'` starts a new
/// line; characters missing from the font are skipped.
pub fn layout_text(text: &str, font: &BitmapFont, origin: Vec2, size: f32) -> Vec<GlyphQuad> {
    if font.line_height == 0 || font.texture_width == 0 || font.texture_height == 0 {
        return Vec::new();
    }

    let scale = size / font.line_height as f32;
    let tw = font.texture_width as f32;
    let th = font.texture_height as f32;
    let mut cursor = origin;
    let mut quads = Vec::with_capacity(text.len());

    for ch in text.chars() {
        if ch == '\n' {
            cursor.x = origin.x;
            cursor.y += font.line_height as f32 * scale;
            continue;
        }
        let Some(g) = font.glyphs.get(&ch) else { continue };

        let min = cursor + Vec2::new(g.x_offset as f32, g.y_offset as f32) * scale;
        let max = min + Vec2::new(g.width as f32, g.height as f32) * scale;
        quads.push(GlyphQuad {
            min,
            max,
            uv_min: [g.x as f32 / tw, g.y as f32 / th],
            uv_max: [(g.x + g.width) as f32 / tw, (g.y + g.height) as f32 / th],
        });

        cursor.x += g.x_advance as f32 * scale;
    }
    quads
}

/// Text of the label drawn in the top-left corner of the view.
pub fn region_label(region_name: &str) -> String {
    format!("map name: {region_name}")
}

// ── BitmapFont ────────────────────────────────────────────────────────────────

/// Metrics for a single character in the atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: u32,
}

/// A bitmap font described by a JSON glyph table.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapFont {
    pub glyphs: HashMap<char, Glyph>,
    /// Distance between successive baselines in atlas pixels.
    pub line_height: u32,
    pub texture_width: u32,
    pub texture_height: u32,
}

impl From<RawFont> for BitmapFont {
    fn from(raw: RawFont) -> Self {
        let glyphs = raw
            .glyphs
            .into_iter()
            .filter_map(|g| {
                // Code points that are not Unicode scalar values are dropped.
                char::from_u32(g.id).map(|ch| {
                    (ch, Glyph {
                        x: g.x,
                        y: g.y,
                        width: g.width,
                        height: g.height,
                        x_offset: g.x_offset,
                        y_offset: g.y_offset,
                        x_advance: g.x_advance,
                    })
                })
            })
            .collect();
        Self {
            glyphs,
            line_height: raw.line_height,
            texture_width: raw.texture_width,
            texture_height: raw.texture_height,
        }
    }
}

impl BitmapFont {
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str::<RawFont>(json).map(Self::from)
    }
}

// ── LabelFont ─────────────────────────────────────────────────────────────────

/// Font metrics plus the atlas image they index (white glyphs, coverage in alpha).
#[derive(Debug, Clone)]
pub struct LabelFont {
    pub font: BitmapFont,
    pub atlas: RgbaImage,
}

impl LabelFont {
    /// Load `label.json` and `label.png` from `dir`.
    ///
    /// `Ok(None)` when either file is absent; the client then runs without
    /// the region label.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let descriptor = dir.join(FONT_DESCRIPTOR_FILE);
        let atlas_path = dir.join(FONT_ATLAS_FILE);
        if !descriptor.is_file() || !atlas_path.is_file() {
            debug!(path = %dir.display(), "no label font; region label disabled");
            return Ok(None);
        }

        let font: BitmapFont = read_json::<RawFont>(&descriptor)?.into();
        let atlas = read_rgba(&atlas_path)?;
        if atlas.dimensions() != (font.texture_width, font.texture_height) {
            return Err(Error::InvalidAsset {
                path: atlas_path,
                reason: format!(
                    "atlas is {}x{} but the font expects {}x{}",
                    atlas.width(),
                    atlas.height(),
                    font.texture_width,
                    font.texture_height
                ),
            });
        }
        info!(glyphs = font.glyphs.len(), "label font loaded");
        Ok(Some(Self { font, atlas }))
    }
}

// ── JSON-facing types ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawGlyph {
    /// Unicode code point (65 for 'A').
    id: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    #[serde(default)]
    x_offset: i32,
    #[serde(default)]
    y_offset: i32,
    x_advance: u32,
}

#[derive(Deserialize)]
struct RawFont {
    line_height: u32,
    texture_width: u32,
    texture_height: u32,
    glyphs: Vec<RawGlyph>,
}
