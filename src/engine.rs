use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use image::RgbaImage;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Icon, Window, WindowId};

use crate::audio::{AudioContext, DEFAULT_HEARING_DISTANCE};
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::input::{ActionMap, InputEvent, InputState, Intent, IntentTracker, default_bindings};
use crate::lighting::ShapeLibrary;
use crate::options::Options;
use crate::renderer::text::{LabelFont, region_label};
use crate::renderer::{FrameScene, RenderAssets, Renderer};
use crate::sim::Simulation;
use crate::window::{WindowConfig, WindowMode, apply_window_settings};

/// Longest wall-clock gap fed into the update accumulator in one frame.
const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

/// Sound played at the cursor on mouse press.
pub const CLICK_SOUND: &str = "click";

// ── ClientBuilder ───────────────────────────────────────────────────────────

/// Collects everything the windowed client needs before the event loop starts.
pub struct ClientBuilder {
    simulation: Simulation,
    options: Options,
    actor_sheet: RgbaImage,
    shapes: ShapeLibrary,
    label_font: Option<LabelFont>,
    icon: Option<RgbaImage>,
    sounds_dir: Option<PathBuf>,
    debug_enabled: bool,
}

impl ClientBuilder {
    pub fn new(simulation: Simulation, options: Options, actor_sheet: RgbaImage) -> Self {
        Self {
            simulation,
            options,
            actor_sheet,
            shapes: ShapeLibrary::default(),
            label_font: None,
            icon: None,
            sounds_dir: None,
            debug_enabled: false,
        }
    }

    pub fn with_shapes(mut self, shapes: ShapeLibrary) -> Self { self.shapes = shapes; self }

    /// Font for the region-name label; without one the label is not drawn.
    pub fn with_label_font(mut self, font: Option<LabelFont>) -> Self { self.label_font = font; self }

    pub fn with_icon(mut self, icon: Option<RgbaImage>) -> Self { self.icon = icon; self }

    /// Every `.wav` / `.ogg` under `dir` becomes a named sound.
    pub fn with_sounds_dir(mut self, dir: PathBuf) -> Self { self.sounds_dir = Some(dir); self }

    /// Enables the F3 darkness-overlay toggle.
    pub fn with_debug(mut self, enabled: bool) -> Self { self.debug_enabled = enabled; self }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        let fixed_dt = self.options.fixed_timestep();

        let mut audio = AudioContext::new();
        if let Some(dir) = &self.sounds_dir {
            audio.load_dir(dir);
        }

        let mut app = App {
            window_config: WindowConfig::from_options(&self.options),
            camera: Camera::new(self.simulation.actor.position()),
            map_label: region_label(&self.simulation.region.name),
            simulation: self.simulation,
            options: self.options,
            actor_sheet: self.actor_sheet,
            shapes: self.shapes,
            label_font: self.label_font,
            icon: self.icon,
            debug_enabled: self.debug_enabled,
            audio,
            input: InputState::new(),
            bindings: default_bindings(),
            tracker: IntentTracker::new(),
            pending: Vec::new(),
            renderer: None,
            last_instant: None,
            accumulator: Duration::ZERO,
            fixed_dt,
            error: None,
        };
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    simulation: Simulation,
    options: Options,
    window_config: WindowConfig,
    actor_sheet: RgbaImage,
    shapes: ShapeLibrary,
    label_font: Option<LabelFont>,
    icon: Option<RgbaImage>,
    map_label: String,
    debug_enabled: bool,
    camera: Camera,
    audio: AudioContext,
    input: InputState,
    bindings: ActionMap<Intent>,
    tracker: IntentTracker,
    /// Events polled on frames that ran no fixed update yet.
    pending: Vec<InputEvent>,
    renderer: Option<Renderer>,
    last_instant: Option<Instant>,
    accumulator: Duration,
    fixed_dt: Duration,
    /// Fatal error raised inside a callback, returned from `run`.
    error: Option<Error>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, e: Error) {
        error!("{e}");
        self.error = Some(e);
        event_loop.exit();
    }

    fn save_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.window_config.store(&mut self.options);
        if let Err(e) = self.options.save() {
            warn!("could not save options on exit: {e}");
        }
        info!("exiting");
        event_loop.exit();
    }

    fn toggle_fullscreen(&mut self) {
        self.window_config.mode = self.window_config.mode.toggled();
        self.window_config.store(&mut self.options);
        if let Some(renderer) = &self.renderer {
            apply_window_settings(&renderer.window, &self.window_config);
        }
        if let Err(e) = self.options.save() {
            warn!("could not save options: {e}");
        }
    }

    fn toggle_overlay(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            let enabled = !renderer.overlay_enabled();
            renderer.set_overlay_enabled(enabled);
            info!(enabled, "darkness overlay toggled");
        }
    }

    fn play_click(&mut self) {
        let Some(renderer) = &self.renderer else { return };
        let [mx, my] = self.input.mouse_pos;
        let world = self.camera.viewport_to_world(Vec2::new(mx, my), renderer.size());
        self.audio.play_spatial(CLICK_SOUND, world, DEFAULT_HEARING_DISTANCE);
    }

    /// One displayed frame: poll input, run the due fixed updates, draw.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let elapsed = match self.last_instant {
            Some(prev) => now.duration_since(prev).min(MAX_FRAME_TIME),
            None => self.fixed_dt,
        };
        self.last_instant = Some(now);
        self.accumulator += elapsed;

        // (1) input → intent events
        let polled = self.tracker.poll(&self.bindings, &self.input);
        self.pending.extend(polled);
        self.input.clear_frame_state();

        // (2)–(3) fixed updates; the batch goes to the first one
        while self.accumulator >= self.fixed_dt {
            let events = std::mem::take(&mut self.pending);
            self.simulation.step(&events, self.fixed_dt);
            self.accumulator -= self.fixed_dt;
        }

        let actor = &self.simulation.actor;
        self.camera.follow(actor.position());
        self.audio.set_listener(actor.position(), actor.movement.listener_orientation());

        let Some(renderer) = self.renderer.as_mut() else { return };
        renderer.update_camera(&self.camera.build_view_proj());

        // (4)–(8) scene, darkness, composite, present
        let scene = FrameScene {
            actor_position: actor.position(),
            actor_frame: actor.frame_rect(),
            lights: &self.simulation.lights,
            label: Some((&self.map_label, self.camera.top_left())),
        };
        match renderer.render(&scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, Error::Gpu("out of memory".into()));
            }
            Err(e) => warn!("render error: {e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        let icon = self.icon.as_ref().and_then(|img| {
            Icon::from_rgba(img.as_raw().clone(), img.width(), img.height())
                .map_err(|e| warn!("window icon rejected: {e}"))
                .ok()
        });
        let attrs = Window::default_attributes()
            .with_title(&self.window_config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(self.window_config.width, self.window_config.height))
            .with_window_icon(icon)
            .with_resizable(true);
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        window.set_cursor_visible(false);
        if self.window_config.mode == WindowMode::Fullscreen {
            apply_window_settings(&window, &self.window_config);
        }

        let assets = RenderAssets {
            layers: self.simulation.region.layers.as_ref(),
            actor_sheet: &self.actor_sheet,
            shapes: &self.shapes,
            label_font: self.label_font.as_ref(),
        };
        match pollster::block_on(Renderer::new(window, assets, self.window_config.vsync)) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.save_and_exit(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                if self.window_config.mode == WindowMode::Windowed && size.width > 0 && size.height > 0 {
                    self.options.width = size.width;
                    self.options.height = size.height;
                    self.window_config.width = size.width;
                    self.window_config.height = size.height;
                }
            }

            WindowEvent::Focused(false) => self.input.release_all(),

            WindowEvent::CursorMoved { position, .. } => {
                self.input.mouse_pos = [position.x as f32, position.y as f32];
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => {
                    self.input.mouse_down(button);
                    if button == MouseButton::Left {
                        self.play_click();
                    }
                }
                ElementState::Released => self.input.mouse_up(button),
            },

            WindowEvent::RedrawRequested => self.frame(event_loop),

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, repeat, .. },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.input.key_down(code);
                    if repeat {
                        return;
                    }
                    match code {
                        KeyCode::Escape => self.save_and_exit(event_loop),
                        KeyCode::Insert => self.toggle_fullscreen(),
                        KeyCode::F3 if self.debug_enabled => self.toggle_overlay(),
                        _ => {}
                    }
                }
                ElementState::Released => self.input.key_up(code),
            },

            _ => {}
        }
    }
}
