use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::geometry::Direction;

/// Represents a raw input source that can be bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Raw hardware state for a single frame.
///
/// The window handler writes into this as events arrive; the client loop
/// reads it once per frame and then calls [`InputState::clear_frame_state`].
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    pub keys_released: HashSet<KeyCode>,
    /// Keys pressed this frame, oldest first.
    pub press_order: Vec<KeyCode>,

    pub mouse_pos: [f32; 2],
    pub mouse_held: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,
    pub mouse_released: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            if self.keys_pressed.insert(key) {
                self.press_order.push(key);
            }
        }
    }

    pub fn key_up(&mut self, key: KeyCode) {
        if self.keys_held.remove(&key) {
            self.keys_released.insert(key);
        }
    }

    pub fn mouse_down(&mut self, button: MouseButton) {
        if self.mouse_held.insert(button) {
            self.mouse_pressed.insert(button);
        }
    }

    pub fn mouse_up(&mut self, button: MouseButton) {
        if self.mouse_held.remove(&button) {
            self.mouse_released.insert(button);
        }
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.press_order.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
    }

    /// Drop everything held, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_released.extend(self.keys_held.drain());
        self.mouse_released.extend(self.mouse_held.drain());
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }
    pub fn is_key_released(&self, key: KeyCode) -> bool { self.keys_released.contains(&key) }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool { self.mouse_held.contains(&button) }
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool { self.mouse_pressed.contains(&button) }
    pub fn is_mouse_released(&self, button: MouseButton) -> bool { self.mouse_released.contains(&button) }

    /// Position of `key` among this frame's presses, oldest first.
    pub fn press_rank(&self, key: KeyCode) -> Option<usize> {
        self.press_order.iter().position(|&k| k == key)
    }

    /// Either shift key is down.
    pub fn shift_held(&self) -> bool {
        self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight)
    }
}

/// Maps logical actions (defined by the game) to one or more physical inputs.
#[derive(Debug, Clone)]
pub struct ActionMap<A: Hash + Eq + Copy> {
    bindings: HashMap<A, Vec<InputSource>>,
}

impl<A: Hash + Eq + Copy> ActionMap<A> {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, action: A, source: InputSource) {
        self.bindings.entry(action).or_default().push(source);
    }

    pub fn sources(&self, action: A) -> &[InputSource] {
        self.bindings.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Returns true if any bound source was pressed this frame.
    pub fn is_pressed(&self, action: A, input: &InputState) -> bool {
        self.sources(action).iter().any(|s| match s {
            InputSource::Key(k) => input.is_key_pressed(*k),
            InputSource::Mouse(b) => input.is_mouse_pressed(*b),
        })
    }

    /// Earliest press rank among the action's bound keys this frame.
    ///
    /// Mouse sources and unpressed keys sort last.
    pub fn press_rank(&self, action: A, input: &InputState) -> usize {
        self.sources(action)
            .iter()
            .filter_map(|s| match s {
                InputSource::Key(k) => input.press_rank(*k),
                InputSource::Mouse(_) => None,
            })
            .min()
            .unwrap_or(usize::MAX)
    }

    /// Returns true if the action is currently being held.
    pub fn is_held(&self, action: A, input: &InputState) -> bool {
        self.sources(action).iter().any(|s| match s {
            InputSource::Key(k) => input.is_key_held(*k),
            InputSource::Mouse(b) => input.is_mouse_held(*b),
        })
    }

    /// Returns true if any bound source was released this frame.
    pub fn is_released(&self, action: A, input: &InputState) -> bool {
        self.sources(action).iter().any(|s| match s {
            InputSource::Key(k) => input.is_key_released(*k),
            InputSource::Mouse(b) => input.is_mouse_released(*b),
        })
    }
}

impl<A: Hash + Eq + Copy> Default for ActionMap<A> {
    fn default() -> Self { Self::new() }
}

// ── Gameplay intents ──────────────────────────────────────────────────────────

/// What the actor is asked to do, independent of the key that asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Move(Direction),
    Attack,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Move(Direction::Down),
        Intent::Move(Direction::Left),
        Intent::Move(Direction::Right),
        Intent::Move(Direction::Up),
        Intent::Attack,
    ];
}

/// One discrete press or release of an intent, with the shift modifier as it
/// was at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed { intent: Intent, shift: bool },
    Released { intent: Intent, shift: bool },
}

impl InputEvent {
    pub fn pressed(intent: Intent) -> Self {
        InputEvent::Pressed { intent, shift: false }
    }

    pub fn released(intent: Intent) -> Self {
        InputEvent::Released { intent, shift: false }
    }

    pub fn intent(&self) -> Intent {
        match *self {
            InputEvent::Pressed { intent, .. } | InputEvent::Released { intent, .. } => intent,
        }
    }
}

/// Arrows and WASD for movement, either control key or `Q` for attack.
pub fn default_bindings() -> ActionMap<Intent> {
    let mut map = ActionMap::new();
    for key in [
        KeyCode::ArrowDown, KeyCode::ArrowLeft, KeyCode::ArrowRight, KeyCode::ArrowUp,
        KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyD, KeyCode::KeyW,
    ] {
        if let Some(dir) = Direction::from_key(key) {
            map.bind(Intent::Move(dir), InputSource::Key(key));
        }
    }
    map.bind(Intent::Attack, InputSource::Key(KeyCode::ControlLeft));
    map.bind(Intent::Attack, InputSource::Key(KeyCode::ControlRight));
    map.bind(Intent::Attack, InputSource::Key(KeyCode::KeyQ));
    map
}

/// Turns per-frame key state into a batch of intent press/release events.
///
/// An intent counts as held while any of its bound sources is held, so
/// pressing both `W` and `ArrowUp` and releasing one of them produces no
/// release. Releases are emitted before presses so a direction swapped within
/// one frame ends up as the most recent, and presses keep the order the keys
/// went down in.
#[derive(Debug, Default)]
pub struct IntentTracker {
    held: HashSet<Intent>,
}

impl IntentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, bindings: &ActionMap<Intent>, input: &InputState) -> Vec<InputEvent> {
        let shift = input.shift_held();
        let mut released = Vec::new();
        let mut pressed: Vec<(usize, InputEvent)> = Vec::new();

        for intent in Intent::ALL {
            let was = self.held.contains(&intent);
            let now = bindings.is_held(intent, input);
            let rank = bindings.press_rank(intent, input);
            match (was, now) {
                (false, true) => {
                    self.held.insert(intent);
                    pressed.push((rank, InputEvent::Pressed { intent, shift }));
                }
                (true, false) => {
                    self.held.remove(&intent);
                    released.push(InputEvent::Released { intent, shift });
                }
                // Tapped and let go within one frame.
                (false, false) if bindings.is_pressed(intent, input) => {
                    pressed.push((rank, InputEvent::Pressed { intent, shift }));
                    pressed.push((rank, InputEvent::Released { intent, shift }));
                }
                _ => {}
            }
        }

        // Stable: a tap's press/release pair stays adjacent.
        pressed.sort_by_key(|&(rank, _)| rank);
        released.extend(pressed.into_iter().map(|(_, event)| event));
        released
    }

    /// Intents currently considered held.
    pub fn held(&self) -> impl Iterator<Item = Intent> + '_ {
        self.held.iter().copied()
    }
}
