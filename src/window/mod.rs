pub mod config;

pub use config::{WindowConfig, WindowMode};

use tracing::info;
use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window};

/// Apply `config` to `window`, updating decorations, fullscreen state, and size.
///
/// # Windowed
/// Removes any active fullscreen mode, restores decorations and requests the
/// window be resized to `config.width × config.height`.
///
/// # Fullscreen
/// Attempts exclusive hardware fullscreen by searching the current monitor's
/// video modes for the best match against `config.width × config.height`.
/// Falls back to borderless on the current monitor when no monitor handle or
/// video mode is available.
pub fn apply_window_settings(window: &Window, config: &WindowConfig) {
    match config.mode {
        WindowMode::Windowed => {
            window.set_fullscreen(None);
            window.set_decorations(true);
            window.set_resizable(true);

            // `None` means the size arrives later as `WindowEvent::Resized`;
            // the resize handler reconciles either way.
            let _ = window.request_inner_size(PhysicalSize::new(config.width, config.height));
        }

        WindowMode::Fullscreen => {
            let fullscreen = match window.current_monitor() {
                Some(monitor) => {
                    let target_area = config.width as u64 * config.height as u64;
                    let best = monitor.video_modes().min_by_key(|vm| {
                        let s = vm.size();
                        (s.width as u64 * s.height as u64).abs_diff(target_area)
                    });
                    match best {
                        Some(vm) => Fullscreen::Exclusive(vm),
                        None => Fullscreen::Borderless(Some(monitor)),
                    }
                }
                None => Fullscreen::Borderless(None),
            };
            window.set_fullscreen(Some(fullscreen));
        }
    }
    info!(mode = ?config.mode, width = config.width, height = config.height, "window settings applied");
}
