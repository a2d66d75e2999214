use glam::{Vec2, Vec3, Vec4};
use surrounded::audio::{AudioContext, Listener};
use surrounded::camera::{Camera, CameraUniform, VIEW_HEIGHT, VIEW_WIDTH};

fn to_ndc(u: &CameraUniform, p: Vec2) -> Vec2 {
    let m = glam::Mat4::from_cols_array_2d(&u.view_proj);
    let v = m * Vec4::new(p.x, p.y, 0.0, 1.0);
    Vec2::new(v.x, v.y)
}

// ── Camera ───────────────────────────────────────────────────────────────────

#[test]
fn follow_centers_view_on_target() {
    let mut cam = Camera::default();
    cam.follow(Vec2::new(400.0, 300.0));
    assert_eq!(cam.top_left(), Vec2::new(400.0 - VIEW_WIDTH / 2.0, 300.0 - VIEW_HEIGHT / 2.0));
}

#[test]
fn view_proj_maps_center_to_origin_and_corners_to_edges() {
    let cam = Camera::new(Vec2::new(100.0, 50.0));
    let u = cam.build_view_proj();
    assert!(to_ndc(&u, cam.position).length() < 1e-5);

    let tl = to_ndc(&u, cam.top_left());
    assert!((tl - Vec2::new(-1.0, 1.0)).length() < 1e-5, "top-left maps to (-1, 1), got {tl}");
}

#[test]
fn viewport_conversion_round_trips_under_stretch() {
    let cam = Camera::new(Vec2::new(250.0, 250.0));
    let viewport = (1280, 720);
    assert_eq!(cam.viewport_scale(viewport), Vec2::new(2.0, 2.0));

    let world = Vec2::new(260.0, 240.0);
    let pixel = cam.world_to_viewport(world, viewport);
    assert_eq!(pixel, Vec2::new(660.0, 340.0));
    assert_eq!(cam.viewport_to_world(pixel, viewport), world);
}

#[test]
fn identity_ortho_spans_target() {
    let u = CameraUniform::identity_ortho(200.0, 100.0);
    assert!((to_ndc(&u, Vec2::ZERO) - Vec2::new(-1.0, 1.0)).length() < 1e-6);
    assert!((to_ndc(&u, Vec2::new(200.0, 100.0)) - Vec2::new(1.0, -1.0)).length() < 1e-6);
}

// ── Listener ─────────────────────────────────────────────────────────────────

#[test]
fn facing_up_hears_east_on_the_right() {
    let listener = Listener { position: Vec2::ZERO, direction: Vec3::new(0.0, -1.0, 0.0) };
    let (volume, pan) = listener.attenuate(Vec2::new(100.0, 0.0), 200.0).unwrap();
    assert!((volume - 0.5).abs() < 1e-6);
    assert!((pan - 0.5).abs() < 1e-6);
}

#[test]
fn facing_down_swaps_sides() {
    let listener = Listener { position: Vec2::ZERO, direction: Vec3::new(0.0, 1.0, 0.0) };
    let (_, pan) = listener.attenuate(Vec2::new(100.0, 0.0), 200.0).unwrap();
    assert!(pan < 0.0);
}

#[test]
fn sounds_beyond_hearing_distance_are_dropped() {
    let listener = Listener::default();
    assert!(listener.attenuate(Vec2::new(0.0, 500.0), 200.0).is_none());
}

#[test]
fn disabled_audio_ignores_playback() {
    let mut audio = AudioContext::disabled();
    assert!(!audio.is_available());
    audio.set_listener(Vec2::new(1.0, 2.0), Vec3::X);
    audio.play_spatial("click", Vec2::ZERO, 100.0);
    assert_eq!(audio.listener().position, Vec2::new(1.0, 2.0));
}
