use glam::{Vec2, Vec3};
use surrounded::geometry::*;
use surrounded::input::KeyCode;

#[test]
fn direction_rows_match_sheet_layout() {
    assert_eq!(Direction::Down.row(), 0);
    assert_eq!(Direction::Left.row(), 1);
    assert_eq!(Direction::Right.row(), 2);
    assert_eq!(Direction::Up.row(), 3);
}

#[test]
fn arrows_and_wasd_map_to_directions() {
    assert_eq!(Direction::from_key(KeyCode::ArrowUp), Some(Direction::Up));
    assert_eq!(Direction::from_key(KeyCode::KeyW), Some(Direction::Up));
    assert_eq!(Direction::from_key(KeyCode::KeyA), Some(Direction::Left));
    assert_eq!(Direction::from_key(KeyCode::ArrowRight), Some(Direction::Right));
    assert_eq!(Direction::from_key(KeyCode::KeyS), Some(Direction::Down));
}

#[test]
fn non_movement_key_has_no_direction() {
    assert_eq!(Direction::from_key(KeyCode::Space), None);
    assert_eq!(Direction::from_key(KeyCode::ControlLeft), None);
}

#[test]
fn advance_moves_along_one_axis_y_down() {
    let p = Vec2::new(10.0, 10.0);
    assert_eq!(Direction::Up.advance(p, 2.0), Vec2::new(10.0, 8.0));
    assert_eq!(Direction::Down.advance(p, 2.0), Vec2::new(10.0, 12.0));
    assert_eq!(Direction::Left.advance(p, 2.0), Vec2::new(8.0, 10.0));
    assert_eq!(Direction::Right.advance(p, 2.0), Vec2::new(12.0, 10.0));
}

#[test]
fn listener_vectors() {
    assert_eq!(Direction::Down.listener_vector(), Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(Direction::Left.listener_vector(), Vec3::new(-1.0, 0.0, 0.0));
    assert_eq!(Direction::Right.listener_vector(), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(Direction::Up.listener_vector(), Vec3::new(0.0, -1.0, 0.0));
}

#[test]
fn hitbox_samples_are_corners_then_center() {
    let hb = Hitbox::new(4.0, 6.0);
    let s = hb.samples(Vec2::new(10.0, 20.0));
    assert_eq!(s.len(), HITBOX_SAMPLES);
    assert_eq!(s[0], Vec2::new(8.0, 17.0));  // top-left
    assert_eq!(s[1], Vec2::new(8.0, 23.0));  // bottom-left
    assert_eq!(s[2], Vec2::new(12.0, 17.0)); // top-right
    assert_eq!(s[3], Vec2::new(12.0, 23.0)); // bottom-right
    assert_eq!(s[4], Vec2::new(10.0, 20.0)); // center
}

#[test]
fn frame_rect_uv_covers_sub_image() {
    let r = FrameRect { x: 32, y: 64, width: 32, height: 32 };
    let (min, max) = r.uv(192, 128);
    assert!((min[0] - 32.0 / 192.0).abs() < 1e-6);
    assert!((min[1] - 0.5).abs() < 1e-6);
    assert!((max[0] - 64.0 / 192.0).abs() < 1e-6);
    assert!((max[1] - 0.75).abs() < 1e-6);
}
