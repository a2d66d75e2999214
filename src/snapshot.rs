// ── Headless snapshot ────────────────────────────────────────────────────────
//
// Software rendition of one client frame: backdrop, lower layer, actor
// frame, upper layer, region label, then the darkness buffer multiplied over
// the result.
// Runs without a window or GPU.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use image::{Rgba, RgbaImage};
use tracing::info;

use crate::camera::Camera;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::FrameRect;
use crate::lighting::{DarknessBuffer, ShapeLibrary};
use crate::renderer::text::{LABEL_SIZE, LabelFont, layout_text, region_label};
use crate::sim::Simulation;

/// Run `ticks` input-free updates of `dt` each.
pub fn advance(sim: &mut Simulation, ticks: u64, dt: Duration) {
    for _ in 0..ticks {
        sim.step(&[], dt);
    }
}

/// Compose the current frame of `sim` into a `viewport`-sized image.
///
/// `overlay` mirrors the debug toggle: when false the darkness is still
/// accumulated but not multiplied in. The region label is drawn only when a
/// font is given.
pub fn render_frame(
    sim: &Simulation,
    actor_sheet: &RgbaImage,
    shapes: &ShapeLibrary,
    label_font: Option<&LabelFont>,
    viewport: (u32, u32),
    overlay: bool,
) -> RgbaImage {
    let camera = Camera::new(sim.actor.position());
    let [r, g, b, a] = Color::BACKDROP.to_rgba8();
    let mut scene = RgbaImage::from_pixel(viewport.0.max(1), viewport.1.max(1), Rgba([r, g, b, a]));

    if let Some(layers) = &sim.region.layers {
        draw_layer(&mut scene, &layers.lower, &camera);
    }
    let frame = sim.actor.frame_rect();
    let half = Vec2::new(frame.width as f32, frame.height as f32) / 2.0;
    draw_image(&mut scene, actor_sheet, frame, sim.actor.position() - half, natural_size(frame), Color::WHITE, &camera);
    if let Some(layers) = &sim.region.layers {
        draw_layer(&mut scene, &layers.upper, &camera);
    }
    if let Some(lf) = label_font {
        let text = region_label(&sim.region.name);
        for g in layout_text(&text, &lf.font, camera.top_left(), LABEL_SIZE) {
            let src = FrameRect {
                x: (g.uv_min[0] * lf.atlas.width() as f32).round() as u32,
                y: (g.uv_min[1] * lf.atlas.height() as f32).round() as u32,
                width: ((g.uv_max[0] - g.uv_min[0]) * lf.atlas.width() as f32).round() as u32,
                height: ((g.uv_max[1] - g.uv_min[1]) * lf.atlas.height() as f32).round() as u32,
            };
            draw_image(&mut scene, &lf.atlas, src, g.min, g.max - g.min, Color::YELLOW, &camera);
        }
    }

    let mut darkness = DarknessBuffer::new(scene.width(), scene.height());
    darkness.set_overlay_enabled(overlay);
    darkness.clear();
    darkness.draw_lights(&sim.lights, shapes, &camera);
    darkness.display();
    darkness.composite_onto(&mut scene);
    scene
}

/// Render and write a PNG.
pub fn write_snapshot(
    sim: &Simulation,
    actor_sheet: &RgbaImage,
    shapes: &ShapeLibrary,
    label_font: Option<&LabelFont>,
    viewport: (u32, u32),
    path: &Path,
) -> Result<()> {
    let img = render_frame(sim, actor_sheet, shapes, label_font, viewport, true);
    img.save(path).map_err(|e| Error::image(path, e))?;
    info!(path = %path.display(), tick = sim.tick, "snapshot written");
    Ok(())
}

/// A scene layer covers the region from the world origin at one pixel per unit.
fn draw_layer(target: &mut RgbaImage, layer: &RgbaImage, camera: &Camera) {
    let rect = FrameRect { x: 0, y: 0, width: layer.width(), height: layer.height() };
    draw_image(target, layer, rect, Vec2::ZERO, natural_size(rect), Color::WHITE, camera);
}

fn natural_size(rect: FrameRect) -> Vec2 {
    Vec2::new(rect.width as f32, rect.height as f32)
}

/// Alpha-blend `src_rect` of `src`, stretched over the world rectangle
/// `origin .. origin + size` and tinted, into `target`.
fn draw_image(
    target: &mut RgbaImage,
    src: &RgbaImage,
    src_rect: FrameRect,
    origin: Vec2,
    size: Vec2,
    tint: Color,
    camera: &Camera,
) {
    let viewport = target.dimensions();
    let min = camera.world_to_viewport(origin, viewport);
    let size = size * camera.viewport_scale(viewport);
    if size.x <= 0.0 || size.y <= 0.0 || src_rect.width == 0 || src_rect.height == 0 {
        return;
    }
    // Viewport pixels per source pixel.
    let scale = size / Vec2::new(src_rect.width as f32, src_rect.height as f32);
    let tint = tint.to_rgba8();

    let x0 = min.x.floor().max(0.0) as u32;
    let y0 = min.y.floor().max(0.0) as u32;
    let x1 = ((min.x + size.x).ceil().max(0.0) as u32).min(viewport.0);
    let y1 = ((min.y + size.y).ceil().max(0.0) as u32).min(viewport.1);

    for y in y0..y1 {
        let v = ((y as f32 + 0.5 - min.y) / scale.y).floor();
        if v < 0.0 || v >= src_rect.height as f32 {
            continue;
        }
        for x in x0..x1 {
            let u = ((x as f32 + 0.5 - min.x) / scale.x).floor();
            if u < 0.0 || u >= src_rect.width as f32 {
                continue;
            }
            let (sx, sy) = (src_rect.x + u as u32, src_rect.y + v as u32);
            if sx >= src.width() || sy >= src.height() {
                continue;
            }
            let p = src.get_pixel(sx, sy).0;
            let s = [0usize, 1, 2].map(|i| (p[i] as u16 * tint[i] as u16 / 255) as u8);
            let alpha = p[3] as u16 * tint[3] as u16 / 255;
            if alpha == 0 {
                continue;
            }
            let d = target.get_pixel_mut(x, y);
            for i in 0..3 {
                d.0[i] = ((s[i] as u16 * alpha + d.0[i] as u16 * (255 - alpha) + 127) / 255) as u8;
            }
        }
    }
}
