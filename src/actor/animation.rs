use std::time::Duration;

use tracing::trace;

use crate::geometry::{Direction, FrameRect};

/// Which animation the actor is playing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimationState {
    Idle,
    Walking,
    Attacking,
    /// Absorbing: once entered, nothing leaves it.
    Dead,
}

impl AnimationState {
    /// Pick the state for this tick's flags, highest priority first.
    pub fn select(walking: bool, attacking: bool, dead: bool) -> Self {
        if dead {
            AnimationState::Dead
        } else if attacking {
            AnimationState::Attacking
        } else if walking {
            AnimationState::Walking
        } else {
            AnimationState::Idle
        }
    }
}

/// A contiguous run of sheet columns played on a fixed cadence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameBand {
    pub start: u32,
    pub len: u32,
    /// Time each frame is shown. Zero holds the first frame.
    pub duration: Duration,
}

impl FrameBand {
    pub const fn new(start: u32, len: u32, duration: Duration) -> Self {
        Self { start, len, duration }
    }

    pub fn contains(&self, step: u32) -> bool {
        step >= self.start && step < self.start + self.len.max(1)
    }

    /// The step after `step`, wrapping to `start`.
    pub fn next(&self, step: u32) -> u32 {
        let len = self.len.max(1);
        let offset = step.saturating_sub(self.start) % len;
        self.start + (offset + 1) % len
    }
}

/// Geometry of the actor sprite sheet.
///
/// Columns: rest, three walk frames, attack, dead. Rows follow
/// [`Direction::row`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    pub columns: u32,
    pub rows: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub idle: FrameBand,
    pub walk: FrameBand,
    pub attack: FrameBand,
    pub dead_frame: u32,
}

impl SheetLayout {
    pub const COLUMNS: u32 = 6;
    pub const ROWS: u32 = 4;

    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            columns: Self::COLUMNS,
            rows: Self::ROWS,
            frame_width,
            frame_height,
            idle: FrameBand::new(0, 1, Duration::ZERO),
            walk: FrameBand::new(1, 3, Duration::from_millis(300)),
            attack: FrameBand::new(4, 1, Duration::from_millis(1000)),
            dead_frame: 5,
        }
    }

    /// Derive frame size from the full sheet's pixel size.
    pub fn from_sheet(sheet_width: u32, sheet_height: u32) -> Self {
        Self::new(sheet_width / Self::COLUMNS, sheet_height / Self::ROWS)
    }

    pub fn band(&self, state: AnimationState) -> Option<FrameBand> {
        match state {
            AnimationState::Idle => Some(self.idle),
            AnimationState::Walking => Some(self.walk),
            AnimationState::Attacking => Some(self.attack),
            AnimationState::Dead => None,
        }
    }

    pub fn sheet_size(&self) -> (u32, u32) {
        (self.columns * self.frame_width, self.rows * self.frame_height)
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::new(32, 32)
    }
}

// ── Animator ──────────────────────────────────────────────────────────────────

/// Frame selection for the actor sprite.
///
/// Entering any state restarts its band: the timer is zeroed and `step`
/// jumps to the band start. That includes the first walking tick, which
/// does not count towards the first frame's duration.
#[derive(Clone, Debug)]
pub struct Animator {
    layout: SheetLayout,
    state: AnimationState,
    step: u32,
    direction: Direction,
    timer: Duration,
}

impl Animator {
    pub fn new(layout: SheetLayout) -> Self {
        Self {
            layout,
            state: AnimationState::Idle,
            step: layout.idle.start,
            direction: Direction::Down,
            timer: Duration::ZERO,
        }
    }

    /// Advance by `dt` given this tick's flags and facing.
    pub fn update(&mut self, walking: bool, attacking: bool, dead: bool, direction: Direction, dt: Duration) {
        if self.state == AnimationState::Dead {
            return;
        }
        self.direction = direction;

        let next = AnimationState::select(walking, attacking, dead);
        if next != self.state {
            trace!(from = ?self.state, to = ?next, "animation state change");
            self.enter(next);
            return;
        }

        let Some(band) = self.layout.band(next) else { return };
        if band.duration.is_zero() {
            return;
        }
        self.timer += dt;
        if self.timer >= band.duration {
            self.step = band.next(self.step);
            self.timer = Duration::ZERO;
        }
    }

    fn enter(&mut self, state: AnimationState) {
        self.state = state;
        self.timer = Duration::ZERO;
        self.step = match self.layout.band(state) {
            Some(band) => band.start,
            None => self.layout.dead_frame,
        };
    }

    /// Sub-image of the sheet to draw this frame.
    ///
    /// Column and row are clamped to the sheet.
    pub fn frame_rect(&self) -> FrameRect {
        let col = self.step.min(self.layout.columns.saturating_sub(1));
        let row = self.direction.row().min(self.layout.rows.saturating_sub(1));
        FrameRect {
            x: col * self.layout.frame_width,
            y: row * self.layout.frame_height,
            width: self.layout.frame_width,
            height: self.layout.frame_height,
        }
    }

    pub fn state(&self) -> AnimationState { self.state }
    pub fn step(&self) -> u32 { self.step }
    pub fn direction(&self) -> Direction { self.direction }
    pub fn timer(&self) -> Duration { self.timer }
    pub fn layout(&self) -> &SheetLayout { &self.layout }
}
