// ── Software darkness compositor ─────────────────────────────────────────────
//
// CPU rendition of the darkness pipeline the GPU renderer runs every frame:
//
//   clear to black → additively splat every light's shape → display →
//   multiply the finished buffer over the scene.
//
// Used by the headless snapshot mode and by the tests; the wgpu path in
// `renderer::darkness` mirrors it blend-for-blend.

use glam::Vec2;
use image::{Rgba, RgbaImage};
use tracing::{trace, warn};

use crate::camera::Camera;
use crate::lighting::{LightRegistry, LightSource, ShapeLibrary};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Viewport-sized light accumulation target.
#[derive(Debug, Clone)]
pub struct DarknessBuffer {
    image: RgbaImage,
    /// Set by `display()`; cleared again by `clear()`.
    finalized: bool,
    /// Debug toggle: when false, accumulation still runs but the multiply
    /// step leaves the scene untouched.
    overlay_enabled: bool,
}

impl DarknessBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), BLACK),
            finalized: false,
            overlay_enabled: true,
        }
    }

    /// Reallocate for a new viewport size. Contents are reset to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width.max(1), height.max(1)) == self.image.dimensions() {
            return;
        }
        self.image = RgbaImage::from_pixel(width.max(1), height.max(1), BLACK);
        self.finalized = false;
    }

    pub fn size(&self) -> (u32, u32) { self.image.dimensions() }

    pub fn image(&self) -> &RgbaImage { &self.image }

    pub fn is_finalized(&self) -> bool { self.finalized }

    pub fn overlay_enabled(&self) -> bool { self.overlay_enabled }

    pub fn set_overlay_enabled(&mut self, enabled: bool) {
        self.overlay_enabled = enabled;
    }

    pub fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = BLACK;
        }
        self.finalized = false;
    }

    /// Additively splat every registered light. Returns how many were drawn.
    pub fn draw_lights(&mut self, lights: &LightRegistry, shapes: &ShapeLibrary, camera: &Camera) -> usize {
        lights.iter().filter(|l| self.draw_light(l, shapes, camera)).count()
    }

    /// Additively splat one light. Returns false when its shape is unknown.
    pub fn draw_light(&mut self, light: &LightSource, shapes: &ShapeLibrary, camera: &Camera) -> bool {
        let Some(shape) = shapes.get(&light.shape) else {
            warn!(shape = %light.shape, "light shape not loaded; skipping light");
            return false;
        };

        let viewport = self.image.dimensions();
        let center = camera.world_to_viewport(light.position, viewport);
        let scale = camera.viewport_scale(viewport) * light.scale;
        let (sw, sh) = shape.dimensions();
        let size = Vec2::new(sw as f32, sh as f32) * scale;
        if size.x <= 0.0 || size.y <= 0.0 {
            return true;
        }
        let origin = center - size / 2.0;

        // Clip the destination rectangle to the buffer.
        let x0 = origin.x.floor().max(0.0) as u32;
        let y0 = origin.y.floor().max(0.0) as u32;
        let x1 = ((origin.x + size.x).ceil().max(0.0) as u32).min(viewport.0);
        let y1 = ((origin.y + size.y).ceil().max(0.0) as u32).min(viewport.1);

        let [tr, tg, tb, ta] = light.color.0;
        for y in y0..y1 {
            let v = ((y as f32 + 0.5 - origin.y) / size.y * sh as f32).floor();
            if v < 0.0 || v >= sh as f32 {
                continue;
            }
            for x in x0..x1 {
                let u = ((x as f32 + 0.5 - origin.x) / size.x * sw as f32).floor();
                if u < 0.0 || u >= sw as f32 {
                    continue;
                }
                let src = shape.get_pixel(u as u32, v as u32).0;
                let alpha = src[3] as f32 / 255.0 * ta;
                if alpha <= 0.0 {
                    continue;
                }
                let dst = self.image.get_pixel_mut(x, y);
                for (i, tint) in [tr, tg, tb].into_iter().enumerate() {
                    let add = src[i] as f32 * tint * alpha;
                    dst.0[i] = (dst.0[i] as f32 + add).round().min(255.0) as u8;
                }
            }
        }
        true
    }

    /// Finish accumulation for this frame.
    pub fn display(&mut self) {
        self.finalized = true;
    }

    /// Multiply the finished buffer over `scene` (stretched to fit).
    ///
    /// Lit texels pass the scene through; unlit texels drive it to black.
    /// Returns false when the overlay is disabled or the buffer was never
    /// displayed this frame.
    pub fn composite_onto(&self, scene: &mut RgbaImage) -> bool {
        if !self.overlay_enabled {
            trace!("darkness overlay disabled; scene left unmultiplied");
            return false;
        }
        if !self.finalized {
            warn!("darkness buffer composited before display(); skipping");
            return false;
        }

        let (dw, dh) = self.image.dimensions();
        let (sw, sh) = scene.dimensions();
        for (x, y, p) in scene.enumerate_pixels_mut() {
            let dx = ((x as u64 * dw as u64) / sw.max(1) as u64) as u32;
            let dy = ((y as u64 * dh as u64) / sh.max(1) as u64) as u32;
            let d = self.image.get_pixel(dx.min(dw - 1), dy.min(dh - 1)).0;
            for i in 0..3 {
                p.0[i] = ((p.0[i] as u16 * d[i] as u16 + 127) / 255) as u8;
            }
        }
        true
    }
}
