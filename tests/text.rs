use std::fs;
use std::time::Duration;

use glam::Vec2;
use image::{Rgba, RgbaImage};
use surrounded::actor::ActorConfig;
use surrounded::error::Error;
use surrounded::lighting::ShapeLibrary;
use surrounded::renderer::text::*;
use surrounded::sim::Simulation;
use surrounded::snapshot::{advance, render_frame};
use surrounded::world::{OpacityMask, Region};
use tempfile::tempdir;

const FONT_JSON: &str = r#"{
    "line_height": 8,
    "texture_width": 64,
    "texture_height": 8,
    "glyphs": [
        { "id": 65, "x": 0, "y": 0, "width": 6, "height": 8, "x_advance": 7 },
        { "id": 66, "x": 8, "y": 0, "width": 6, "height": 8, "x_offset": 1, "y_offset": -1, "x_advance": 7 },
        { "id": 55296, "x": 16, "y": 0, "width": 6, "height": 8, "x_advance": 7 }
    ]
}"#;

fn font() -> BitmapFont {
    BitmapFont::from_json(FONT_JSON).unwrap()
}

// ── Layout ───────────────────────────────────────────────────────────────────

#[test]
fn from_json_drops_invalid_code_points() {
    let f = font();
    assert_eq!(f.glyphs.len(), 2);
    assert_eq!(f.glyphs[&'B'].x_offset, 1);
    assert_eq!(f.glyphs[&'A'].y_offset, 0);
}

#[test]
fn glyphs_scale_to_requested_size_and_advance() {
    let quads = layout_text("AB", &font(), Vec2::new(10.0, 20.0), 16.0);
    assert_eq!(quads.len(), 2);

    assert_eq!(quads[0].min, Vec2::new(10.0, 20.0));
    assert_eq!(quads[0].max, Vec2::new(22.0, 36.0));
    assert_eq!(quads[0].uv_min, [0.0, 0.0]);

    // Advance 7 * 2, plus the scaled offsets.
    assert_eq!(quads[1].min, Vec2::new(26.0, 18.0));
    assert_eq!(quads[1].uv_min, [8.0 / 64.0, 0.0]);
    assert_eq!(quads[1].uv_max, [14.0 / 64.0, 1.0]);
}

#[test]
fn unknown_characters_are_skipped_and_newline_wraps() {
    let quads = layout_text("A?\nA", &font(), Vec2::ZERO, 8.0);
    assert_eq!(quads.len(), 2);
    assert_eq!(quads[1].min, Vec2::new(0.0, 8.0));
}

#[test]
fn zero_line_height_lays_out_nothing() {
    let mut f = font();
    f.line_height = 0;
    assert!(layout_text("AB", &f, Vec2::ZERO, 12.0).is_empty());
}

#[test]
fn label_names_the_region() {
    assert_eq!(region_label("start"), "map name: start");
}

// ── Loading ──────────────────────────────────────────────────────────────────

#[test]
fn missing_font_files_disable_the_label() {
    let dir = tempdir().unwrap();
    assert!(LabelFont::load(dir.path()).unwrap().is_none());
}

#[test]
fn font_loads_with_matching_atlas() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(FONT_DESCRIPTOR_FILE), FONT_JSON).unwrap();
    RgbaImage::new(64, 8).save(dir.path().join(FONT_ATLAS_FILE)).unwrap();
    let lf = LabelFont::load(dir.path()).unwrap().expect("font");
    assert_eq!(lf.font, font());
}

#[test]
fn atlas_size_mismatch_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(FONT_DESCRIPTOR_FILE), FONT_JSON).unwrap();
    RgbaImage::new(32, 8).save(dir.path().join(FONT_ATLAS_FILE)).unwrap();
    assert!(matches!(LabelFont::load(dir.path()), Err(Error::InvalidAsset { .. })));
}

// ── Snapshot ─────────────────────────────────────────────────────────────────

#[test]
fn snapshot_draws_yellow_label_in_view_corner() {
    let block = r#"{ "line_height": 8, "texture_width": 8, "texture_height": 8,
        "glyphs": [ { "id": 109, "x": 0, "y": 0, "width": 8, "height": 8, "x_advance": 8 } ] }"#;
    let lf = LabelFont {
        font: BitmapFont::from_json(block).unwrap(),
        atlas: RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255])),
    };

    let region = Region::new("empty", OpacityMask::filled(1000, 1000, 0), Vec::new(), Vec2::new(500.0, 500.0));
    let mut sim = Simulation::new(region, &ActorConfig::from_sheet(6 * 16, 4 * 16));
    advance(&mut sim, 1, Duration::from_millis(16));
    let sheet = RgbaImage::new(6 * 16, 4 * 16);

    let with = render_frame(&sim, &sheet, &ShapeLibrary::default(), Some(&lf), (640, 360), false);
    assert_eq!(with.get_pixel(1, 1).0, [255, 255, 0, 255]);
    // Only 'm' has a glyph: three 12-unit blocks side by side on one line.
    assert_eq!(with.get_pixel(35, 11).0, [255, 255, 0, 255]);
    assert_ne!(with.get_pixel(37, 1).0, [255, 255, 0, 255]);
    assert_ne!(with.get_pixel(1, 13).0, [255, 255, 0, 255]);

    let without = render_frame(&sim, &sheet, &ShapeLibrary::default(), None, (640, 360), false);
    assert_ne!(without.get_pixel(1, 1).0, [255, 255, 0, 255]);
}
