//! Loading of persisted options and region directories.
use std::fs;
use std::path::Path;

use glam::Vec2;
use image::{Rgba, RgbaImage};
use surrounded::error::Error;
use surrounded::options::Options;
use surrounded::world::Region;
use surrounded::world::region::{COLLISIONS_FILE, LIGHTS_FILE, LOWER_LAYERS_FILE, SPAWN_FILE, UPPER_LAYERS_FILE};
use tempfile::tempdir;

// ── Options ──────────────────────────────────────────────────────────────────

#[test]
fn missing_options_are_created_with_defaults() {
    let dir = tempdir().unwrap();
    let options = Options::load(dir.path(), "options").unwrap();
    assert!(dir.path().join("options.json").exists());
    assert!(!options.fullscreen);
    assert_eq!((options.width, options.height), (960, 540));
    assert_eq!(options.antialiasing_level, 8);
    assert!(!options.vertical_sync);
    assert_eq!(options.framerate_limit, 60);
}

#[test]
fn saved_options_reload_equal() {
    let dir = tempdir().unwrap();
    let mut options = Options::load(dir.path(), "player2").unwrap();
    options.fullscreen = true;
    options.width = 1280;
    options.framerate_limit = 144;
    options.save().unwrap();

    let reloaded = Options::load(dir.path(), "player2").unwrap();
    assert_eq!(reloaded, options);
}

#[test]
fn options_file_uses_pascal_case_and_fills_gaps() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("options.json"), r#"{ "Fullscreen": true, "FramerateLimit": 30 }"#).unwrap();
    let options = Options::load(dir.path(), "options").unwrap();
    assert!(options.fullscreen);
    assert_eq!(options.framerate_limit, 30);
    assert_eq!(options.width, 960);

    let text = fs::read_to_string(dir.path().join("options.json")).unwrap();
    assert!(text.contains("Fullscreen"), "existing file is left untouched: {text}");
}

#[test]
fn malformed_options_are_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("options.json"), "{ not json").unwrap();
    assert!(matches!(Options::load(dir.path(), "options"), Err(Error::Json { .. })));
}

#[test]
fn zero_framerate_still_updates() {
    let mut options = Options::default();
    options.framerate_limit = 0;
    assert_eq!(options.updates_per_second(), 1);
}

#[test]
fn fixed_timestep_rounds_up() {
    let mut options = Options::default();
    assert_eq!(options.fixed_timestep(), std::time::Duration::from_nanos(16_666_667));
    assert!(options.fixed_timestep() * 18 >= std::time::Duration::from_millis(300));

    options.framerate_limit = 0;
    assert_eq!(options.fixed_timestep(), std::time::Duration::from_secs(1));
}

// ── Region ───────────────────────────────────────────────────────────────────

fn write_region(maps: &Path, name: &str, with_layers: bool) {
    let dir = maps.join(name);
    fs::create_dir_all(&dir).unwrap();

    let mut mask = RgbaImage::from_pixel(40, 30, Rgba([0, 0, 0, 0]));
    mask.put_pixel(5, 6, Rgba([0, 0, 0, 255]));
    mask.save(dir.join(COLLISIONS_FILE)).unwrap();

    fs::write(
        dir.join(LIGHTS_FILE),
        r#"[
            { "Position": { "X": 10, "Y": 12 }, "Color": { "R": 255, "G": 200, "B": 100, "A": 255 }, "Size": 2.5, "Shape": "torch" },
            { "Position": { "X": 30, "Y": 4 }, "Color": { "R": 0, "G": 0, "B": 255 } }
        ]"#,
    )
    .unwrap();
    fs::write(dir.join(SPAWN_FILE), r#"{ "X": 20, "Y": 15 }"#).unwrap();

    if with_layers {
        RgbaImage::from_pixel(40, 30, Rgba([10, 20, 30, 255])).save(dir.join(LOWER_LAYERS_FILE)).unwrap();
        RgbaImage::from_pixel(40, 30, Rgba([0, 0, 0, 0])).save(dir.join(UPPER_LAYERS_FILE)).unwrap();
    }
}

#[test]
fn region_loads_mask_lights_and_spawn() {
    let maps = tempdir().unwrap();
    write_region(maps.path(), "start", false);
    let region = Region::load(maps.path(), "start").unwrap();

    assert_eq!(region.size(), (40, 30));
    assert!(!region.mask.is_traversable(Vec2::new(5.5, 6.5)));
    assert!(region.mask.is_traversable(Vec2::new(6.5, 6.5)));
    assert_eq!(region.spawn, Vec2::new(20.0, 15.0));
    assert!(region.layers.is_none());

    assert_eq!(region.lights.len(), 2);
    assert_eq!(region.lights[0].position, Vec2::new(10.0, 12.0));
    assert_eq!(region.lights[0].scale, 2.5);
    assert_eq!(&*region.lights[0].shape, "torch");
    assert_eq!(region.lights[1].color.to_rgba8(), [0, 0, 255, 255]);
}

#[test]
fn region_layers_load_when_present() {
    let maps = tempdir().unwrap();
    write_region(maps.path(), "cave", true);
    let region = Region::load(maps.path(), "cave").unwrap();
    let layers = region.layers.expect("layers");
    assert_eq!(layers.lower.get_pixel(0, 0).0, [10, 20, 30, 255]);
}

#[test]
fn missing_region_is_an_error() {
    let maps = tempdir().unwrap();
    assert!(matches!(Region::load(maps.path(), "nowhere"), Err(Error::InvalidAsset { .. })));
}

#[test]
fn missing_spawn_is_an_error() {
    let maps = tempdir().unwrap();
    write_region(maps.path(), "start", false);
    fs::remove_file(maps.path().join("start").join(SPAWN_FILE)).unwrap();
    assert!(matches!(Region::load(maps.path(), "start"), Err(Error::Io { .. })));
}
