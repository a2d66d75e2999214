//! The simulation context: everything one frame of gameplay reads and writes.

use std::time::Duration;

use tracing::trace;

use crate::actor::{Actor, ActorConfig};
use crate::input::InputEvent;
use crate::lighting::LightRegistry;
use crate::world::Region;

/// Owned by the client loop and passed by `&mut` to each update.
#[derive(Debug)]
pub struct Simulation {
    pub region: Region,
    pub actor: Actor,
    pub lights: LightRegistry,
    /// Completed steps. Seeds the flicker light.
    pub tick: u64,
}

impl Simulation {
    /// Place a fresh actor at the region's spawn point.
    pub fn new(region: Region, config: &ActorConfig) -> Self {
        let actor = Actor::new(region.spawn, config);
        Self { region, actor, lights: LightRegistry::new(), tick: 0 }
    }

    /// Run one fixed update:
    ///
    /// 1. apply the event batch in order,
    /// 2. clear the light registry,
    /// 3. update the actor (which emits its light), then emit the region's lights.
    pub fn step(&mut self, events: &[InputEvent], dt: Duration) {
        for &event in events {
            self.actor.handle(event);
        }

        self.lights.clear();
        self.actor.update(&self.region.mask, dt, self.tick, &mut self.lights);
        self.region.emit_lights(&mut self.lights);

        trace!(tick = self.tick, lights = self.lights.len(), pos = ?self.actor.position(), "sim step");
        self.tick += 1;
    }
}
