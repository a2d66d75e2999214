use std::time::Duration;

use glam::Vec2;
use image::{Rgba, RgbaImage};
use surrounded::actor::ActorConfig;
use surrounded::color::Color;
use surrounded::lighting::ShapeLibrary;
use surrounded::sim::Simulation;
use surrounded::snapshot::{advance, render_frame, write_snapshot};
use surrounded::world::{OpacityMask, Region};
use tempfile::tempdir;

const VIEWPORT: (u32, u32) = (640, 360);

fn sim() -> Simulation {
    let region = Region::new("empty", OpacityMask::filled(1000, 1000, 0), Vec::new(), Vec2::new(500.0, 500.0));
    Simulation::new(region, &ActorConfig::from_sheet(6 * 16, 4 * 16))
}

fn transparent_sheet() -> RgbaImage {
    RgbaImage::from_pixel(6 * 16, 4 * 16, Rgba([0, 0, 0, 0]))
}

#[test]
fn actor_light_lights_center_and_leaves_corners_dark() {
    let mut sim = sim();
    advance(&mut sim, 1, Duration::from_millis(16));
    let img = render_frame(&sim, &transparent_sheet(), &ShapeLibrary::default(), None, VIEWPORT, true);

    assert_eq!(img.get_pixel(0, 0).0[..3], [0, 0, 0]);
    let [r, g, _, _] = Color::BACKDROP.to_rgba8();
    let center = img.get_pixel(VIEWPORT.0 / 2, VIEWPORT.1 / 2).0;
    assert!(center[0] + 2 >= r && center[1] + 2 >= g, "got {center:?}");
}

#[test]
fn overlay_off_leaves_backdrop_untouched() {
    let mut sim = sim();
    advance(&mut sim, 1, Duration::from_millis(16));
    let img = render_frame(&sim, &transparent_sheet(), &ShapeLibrary::default(), None, VIEWPORT, false);
    assert_eq!(img.get_pixel(0, 0).0, Color::BACKDROP.to_rgba8());
}

#[test]
fn actor_frame_is_drawn_at_center() {
    let mut sim = sim();
    advance(&mut sim, 1, Duration::from_millis(16));
    let sheet = RgbaImage::from_pixel(6 * 16, 4 * 16, Rgba([200, 10, 10, 255]));
    let img = render_frame(&sim, &sheet, &ShapeLibrary::default(), None, VIEWPORT, false);
    assert_eq!(img.get_pixel(VIEWPORT.0 / 2, VIEWPORT.1 / 2).0[..3], [200, 10, 10]);
}

#[test]
fn snapshot_is_written_as_png() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frame.png");
    let mut sim = sim();
    advance(&mut sim, 3, Duration::from_millis(16));
    write_snapshot(&sim, &transparent_sheet(), &ShapeLibrary::default(), None, VIEWPORT, &path).unwrap();

    let written = image::open(&path).unwrap();
    assert_eq!((written.width(), written.height()), VIEWPORT);
}
