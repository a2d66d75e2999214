//! Frame-loop ordering through the simulation context.
use std::time::Duration;

use glam::Vec2;
use surrounded::actor::ActorConfig;
use surrounded::color::Color;
use surrounded::geometry::Direction;
use surrounded::input::{InputEvent, Intent};
use surrounded::lighting::{DEFAULT_SHAPE, LightSource};
use surrounded::sim::Simulation;
use surrounded::world::{OpacityMask, Region};

const DT: Duration = Duration::from_millis(100);

fn region_with_lights(n: usize) -> Region {
    let lights = (0..n)
        .map(|i| LightSource::new(Vec2::new(10.0 * i as f32, 5.0), Color::ORANGE, 1.0, DEFAULT_SHAPE))
        .collect();
    Region::new("test", OpacityMask::filled(200, 200, 0), lights, Vec2::new(100.0, 100.0))
}

fn config() -> ActorConfig {
    ActorConfig::from_sheet(6 * 16, 4 * 16)
}

#[test]
fn actor_spawns_at_region_spawn() {
    let sim = Simulation::new(region_with_lights(0), &config());
    assert_eq!(sim.actor.position(), Vec2::new(100.0, 100.0));
}

#[test]
fn registry_holds_actor_light_then_world_lights() {
    let mut sim = Simulation::new(region_with_lights(3), &config());
    sim.step(&[], DT);
    assert_eq!(sim.lights.len(), 4);
    assert_eq!(sim.lights.as_slice()[0].position, sim.actor.position());
    assert_eq!(&sim.lights.as_slice()[1..], sim.region.lights.as_slice());
}

#[test]
fn registry_never_carries_lights_across_frames() {
    let mut sim = Simulation::new(region_with_lights(3), &config());
    for _ in 0..5 {
        sim.step(&[], DT);
        assert_eq!(sim.lights.len(), 1 + 3);
    }
}

#[test]
fn events_move_actor_and_light_follows() {
    let mut sim = Simulation::new(region_with_lights(1), &config());
    sim.step(&[InputEvent::pressed(Intent::Move(Direction::Down))], DT);
    sim.step(&[], DT);
    assert_eq!(sim.actor.position(), Vec2::new(100.0, 104.0));
    assert_eq!(sim.lights.as_slice()[0].position, Vec2::new(100.0, 104.0));
    assert!(sim.actor.movement.is_walking());
}

#[test]
fn walking_selects_walk_band_row() {
    let mut sim = Simulation::new(region_with_lights(0), &config());
    sim.step(&[InputEvent::pressed(Intent::Move(Direction::Left))], DT);
    let r = sim.actor.frame_rect();
    assert_eq!((r.x, r.y), (16, 16));
}

#[test]
fn dead_actor_still_emits_its_light() {
    let mut sim = Simulation::new(region_with_lights(2), &config());
    sim.actor.movement.set_health(0.0);
    sim.step(&[InputEvent::pressed(Intent::Move(Direction::Up))], DT);
    assert_eq!(sim.lights.len(), 3);
    assert_eq!(sim.actor.position(), Vec2::new(100.0, 100.0));
    assert_eq!(sim.actor.animator.step(), 5);
}

#[test]
fn tick_counts_steps() {
    let mut sim = Simulation::new(region_with_lights(0), &config());
    for _ in 0..7 {
        sim.step(&[], DT);
    }
    assert_eq!(sim.tick, 7);
}
