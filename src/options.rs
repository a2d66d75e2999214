//! Persisted user options (`<name>.json` in the working directory).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result, read_json};

pub const DEFAULT_OPTIONS_NAME: &str = "options";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Options {
    pub fullscreen: bool,
    pub width: u32,
    pub height: u32,
    /// Kept so existing option files round-trip; the renderer does not multisample.
    pub antialiasing_level: u32,
    pub vertical_sync: bool,
    /// Fixed updates per second.
    pub framerate_limit: u32,

    #[serde(skip)]
    path: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fullscreen: false,
            width: 960,
            height: 540,
            antialiasing_level: 8,
            vertical_sync: false,
            framerate_limit: 60,
            path: Self::path_for(Path::new("."), DEFAULT_OPTIONS_NAME),
        }
    }
}

impl Options {
    /// `<dir>/<name>.json`.
    pub fn path_for(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.json"))
    }

    /// Load `<dir>/<name>.json`, creating it with defaults when absent.
    pub fn load(dir: &Path, name: &str) -> Result<Self> {
        let path = Self::path_for(dir, name);
        let mut options = if path.exists() {
            let loaded: Options = read_json(&path)?;
            info!(path = %path.display(), "options loaded");
            loaded
        } else {
            info!(path = %path.display(), "options file missing; writing defaults");
            Options::default()
        };
        options.path = path;
        if !options.path.exists() {
            options.save()?;
        }
        Ok(options)
    }

    /// Write back to the file this was loaded from.
    pub fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|e| Error::json(&self.path, e))?;
        std::fs::write(&self.path, text).map_err(|e| Error::io(&self.path, e))?;
        info!(path = %self.path.display(), "options saved");
        Ok(())
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Updates per second, never zero.
    pub fn updates_per_second(&self) -> u32 {
        self.framerate_limit.max(1)
    }

    /// Length of one fixed update, rounded up to the next nanosecond.
    ///
    /// Rounding up keeps `n` steps at or above `n / rate` seconds, so a
    /// 300 ms animation frame at 60 updates per second turns after exactly
    /// 18 steps.
    pub fn fixed_timestep(&self) -> Duration {
        let ups = self.updates_per_second() as u64;
        Duration::from_nanos(1_000_000_000_u64.div_ceil(ups))
    }
}
