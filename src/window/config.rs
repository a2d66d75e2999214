use crate::options::Options;

// ── WindowMode ────────────────────────────────────────────────────────────────

/// Controls how the OS window is presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WindowMode {
    /// Standard decorated window at the configured resolution.
    Windowed,
    /// Exclusive hardware fullscreen at the configured resolution.
    Fullscreen,
}

impl WindowMode {
    pub fn toggled(self) -> Self {
        match self {
            WindowMode::Windowed => WindowMode::Fullscreen,
            WindowMode::Fullscreen => WindowMode::Windowed,
        }
    }
}

// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Window configuration snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    /// Requested window width in physical pixels.
    pub width: u32,
    /// Requested window height in physical pixels.
    pub height: u32,
    pub mode: WindowMode,
    /// Wait for vblank when presenting.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

impl WindowConfig {
    pub fn from_options(options: &Options) -> Self {
        Self {
            title: "Surrounded".to_string(),
            width: options.width.max(1),
            height: options.height.max(1),
            mode: if options.fullscreen { WindowMode::Fullscreen } else { WindowMode::Windowed },
            vsync: options.vertical_sync,
        }
    }

    /// Write the mode back so it is persisted with the options.
    pub fn store(&self, options: &mut Options) {
        options.fullscreen = self.mode == WindowMode::Fullscreen;
    }
}
