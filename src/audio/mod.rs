use std::collections::HashMap;
use std::path::Path;

use glam::{Vec2, Vec3};
use kira::{
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::static_sound::{StaticSoundData, StaticSoundSettings},
    Volume,
};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Default audible radius for spatial one-shots, in world units.
pub const DEFAULT_HEARING_DISTANCE: f32 = 640.0;

/// Listener pose, updated from the actor every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listener {
    pub position: Vec2,
    /// Facing as a unit vector, z = 0.
    pub direction: Vec3,
}

impl Default for Listener {
    fn default() -> Self {
        Self { position: Vec2::ZERO, direction: Vec3::Y }
    }
}

impl Listener {
    /// Unit vector to the listener's right in y-down world space.
    pub fn right(&self) -> Vec2 {
        Vec2::new(-self.direction.y, self.direction.x)
    }

    /// Volume and stereo pan (-1 left .. 1 right) for a sound at `source`.
    ///
    /// `None` when the source is beyond `max_dist`.
    pub fn attenuate(&self, source: Vec2, max_dist: f32) -> Option<(f32, f32)> {
        let max_dist = max_dist.max(f32::EPSILON);
        let offset = source - self.position;
        let dist = offset.length();
        if dist > max_dist {
            return None;
        }
        let volume = (1.0 - dist / max_dist).clamp(0.0, 1.0);
        let pan = (offset.dot(self.right()) / max_dist).clamp(-1.0, 1.0);
        Some((volume, pan))
    }
}

pub struct AudioContext {
    /// `None` when audio hardware is unavailable (headless / CI / no audio device).
    manager: Option<AudioManager>,
    sounds: HashMap<String, StaticSoundData>,
    listener: Listener,
}

impl AudioContext {
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => {
                info!("audio manager initialised");
                Some(m)
            }
            Err(e) => {
                warn!("failed to initialise audio manager: {e}; audio disabled");
                None
            }
        };
        Self { manager, sounds: HashMap::new(), listener: Listener::default() }
    }

    /// A context that never touches the audio device.
    pub fn disabled() -> Self {
        Self { manager: None, sounds: HashMap::new(), listener: Listener::default() }
    }

    /// Returns true if audio hardware is available.
    pub fn is_available(&self) -> bool { self.manager.is_some() }

    /// Load a sound file (OGG, WAV, etc.) into memory.
    /// Logs a warning and returns if the file cannot be read.
    pub fn load_sound<P: AsRef<Path>>(&mut self, name: &str, path: P) {
        match StaticSoundData::from_file(path.as_ref()) {
            Ok(sound) => {
                debug!(sound = name, "loaded sound");
                self.sounds.insert(name.to_string(), sound);
            }
            Err(e) => warn!("failed to load sound '{}' from '{}': {e}", name, path.as_ref().display()),
        }
    }

    /// Load every `.wav` / `.ogg` under `dir`, keyed by file stem.
    pub fn load_dir(&mut self, dir: &Path) {
        if !dir.is_dir() {
            debug!(path = %dir.display(), "no sound directory");
            return;
        }
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            let is_audio = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("wav") || e.eq_ignore_ascii_case("ogg"));
            if !entry.file_type().is_file() || !is_audio {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                self.load_sound(stem, path);
            }
        }
    }

    pub fn has_sound(&self, name: &str) -> bool { self.sounds.contains_key(name) }

    pub fn set_listener(&mut self, position: Vec2, direction: Vec3) {
        self.listener = Listener { position, direction };
    }

    pub fn listener(&self) -> Listener { self.listener }

    /// Play a sound at world position `source`, panned and attenuated
    /// relative to the current listener.
    pub fn play_spatial(&mut self, name: &str, source: Vec2, max_dist: f32) {
        let Some(manager) = self.manager.as_mut() else { return };
        let Some(data) = self.sounds.get(name) else {
            debug!(sound = name, "sound not loaded");
            return;
        };
        let Some((volume, pan)) = self.listener.attenuate(source, max_dist) else { return };

        let mut settings = StaticSoundSettings::new();
        settings.volume = Volume::Amplitude(volume as f64).into();
        // kira pans 0.0 (left) .. 1.0 (right).
        settings.panning = ((pan as f64 + 1.0) / 2.0).into();

        if let Err(e) = manager.play(data.clone().with_settings(settings)) {
            warn!("failed to play '{name}': {e}");
        }
    }
}

impl Default for AudioContext {
    fn default() -> Self { Self::new() }
}
