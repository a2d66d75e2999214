//! Animation state machine tests. The animator is pure, so no GPU or window.
use std::time::Duration;

use surrounded::actor::{AnimationState, Animator, FrameBand, SheetLayout};
use surrounded::geometry::Direction;
use surrounded::options::Options;

const TICK: Duration = Duration::from_millis(100);

fn animator() -> Animator {
    Animator::new(SheetLayout::new(32, 48))
}

fn walk(a: &mut Animator, dt: Duration) {
    a.update(true, false, false, Direction::Right, dt);
}

// ── Walking ──────────────────────────────────────────────────────────────────

#[test]
fn first_walking_tick_enters_band_start_without_counting_time() {
    let mut a = animator();
    walk(&mut a, Duration::from_millis(500));
    assert_eq!(a.state(), AnimationState::Walking);
    assert_eq!(a.step(), 1);
    assert_eq!(a.timer(), Duration::ZERO);
}

#[test]
fn walk_cycle_advances_twice_then_wraps_to_first_walk_frame() {
    let mut a = animator();
    walk(&mut a, TICK); // transition tick

    let mut history = Vec::new();
    for _ in 0..9 {
        walk(&mut a, TICK);
        if history.last() != Some(&a.step()) {
            history.push(a.step());
        }
    }
    // 900 ms: advanced 1 → 2 → 3, then wrapped back to 1, never to rest frame 0.
    assert_eq!(history, vec![1, 2, 3, 1]);
    assert_eq!(a.step(), 1);
}

#[test]
fn timer_below_duration_holds_frame() {
    let mut a = animator();
    walk(&mut a, TICK);
    walk(&mut a, Duration::from_millis(299));
    assert_eq!(a.step(), 1);
    walk(&mut a, Duration::from_millis(1));
    assert_eq!(a.step(), 2);
}

#[test]
fn walk_frame_turns_after_eighteen_steps_at_sixty_hertz() {
    let step = Options::default().fixed_timestep();
    let mut a = animator();
    walk(&mut a, step);
    for _ in 0..17 {
        walk(&mut a, step);
    }
    assert_eq!(a.step(), 1);
    walk(&mut a, step);
    assert_eq!(a.step(), 2);
}

#[test]
fn stopping_returns_to_rest_frame() {
    let mut a = animator();
    walk(&mut a, TICK);
    walk(&mut a, Duration::from_millis(300));
    assert_eq!(a.step(), 2);
    a.update(false, false, false, Direction::Right, TICK);
    assert_eq!(a.state(), AnimationState::Idle);
    assert_eq!(a.step(), 0);
}

// ── Priority ─────────────────────────────────────────────────────────────────

#[test]
fn attack_outranks_walking() {
    let mut a = animator();
    a.update(true, true, false, Direction::Up, TICK);
    assert_eq!(a.state(), AnimationState::Attacking);
    assert_eq!(a.step(), 4);
    a.update(true, true, false, Direction::Up, Duration::from_millis(1000));
    assert_eq!(a.step(), 4, "single-frame attack band wraps onto itself");
}

#[test]
fn dead_is_absorbing_and_freezes_frame() {
    let mut a = animator();
    a.update(true, false, false, Direction::Left, TICK);
    a.update(false, false, true, Direction::Left, TICK);
    assert_eq!(a.state(), AnimationState::Dead);
    assert_eq!(a.step(), 5);

    for _ in 0..10 {
        a.update(true, true, false, Direction::Up, Duration::from_secs(1));
    }
    assert_eq!(a.state(), AnimationState::Dead);
    assert_eq!(a.step(), 5);
    assert_eq!(a.direction(), Direction::Left);
}

// ── Frame rectangle ──────────────────────────────────────────────────────────

#[test]
fn frame_rect_uses_step_column_and_direction_row() {
    let mut a = animator();
    a.update(true, false, false, Direction::Up, TICK);
    let r = a.frame_rect();
    assert_eq!((r.x, r.y, r.width, r.height), (32, 3 * 48, 32, 48));
}

#[test]
fn layout_from_sheet_divides_six_by_four() {
    let layout = SheetLayout::from_sheet(192, 128);
    assert_eq!((layout.frame_width, layout.frame_height), (32, 32));
    assert_eq!(layout.sheet_size(), (192, 128));
}

#[test]
fn out_of_range_step_is_clamped_to_sheet() {
    let mut layout = SheetLayout::new(16, 16);
    layout.dead_frame = 42;
    let mut a = Animator::new(layout);
    a.update(false, false, true, Direction::Down, TICK);
    assert_eq!(a.frame_rect().x, 5 * 16);
}

#[test]
fn frame_band_next_wraps_within_band() {
    let band = FrameBand::new(1, 3, Duration::from_millis(300));
    assert_eq!(band.next(1), 2);
    assert_eq!(band.next(3), 1);
    assert!(band.contains(3));
    assert!(!band.contains(0));
}
