// ── GPU darkness pass ─────────────────────────────────────────────────────────
//
// Offscreen viewport-sized target. Each frame:
//   1. clear to opaque black,
//   2. draw every light's shape additively (camera space),
//   3. draw the target over the surface with a multiply blend.
// Step 3 is skipped when the debug overlay toggle is off.

use std::collections::HashMap;

use glam::Vec2;
use tracing::{debug, warn};

use crate::lighting::LightRegistry;
use crate::renderer::pipeline::{BlendMode, QuadLayouts, QuadVertex, create_quad_pipeline, quad};
use crate::renderer::texture::{GpuTexture, LINEAR_FORMAT, vertex_buffer};

pub struct DarknessTarget {
    target: GpuTexture,
    additive: wgpu::RenderPipeline,
    multiply: wgpu::RenderPipeline,
    pub overlay_enabled: bool,
}

impl DarknessTarget {
    pub fn new(
        device: &wgpu::Device,
        layouts: &QuadLayouts,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            target: GpuTexture::render_target(device, &layouts.texture, LINEAR_FORMAT, width, height, "darkness_target"),
            additive: create_quad_pipeline(device, layouts, LINEAR_FORMAT, BlendMode::Additive, "light_pipeline"),
            multiply: create_quad_pipeline(device, layouts, surface_format, BlendMode::Multiply, "darkness_composite"),
            overlay_enabled: true,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.target.width, self.target.height)
    }

    /// Reallocate for a new viewport size.
    pub fn resize(&mut self, device: &wgpu::Device, layouts: &QuadLayouts, width: u32, height: u32) {
        if (width, height) == self.size() || width == 0 || height == 0 {
            return;
        }
        debug!(width, height, "resizing darkness target");
        self.target = GpuTexture::render_target(device, &layouts.texture, LINEAR_FORMAT, width, height, "darkness_target");
    }

    /// Clear the target and accumulate every light. Returns how many were drawn.
    pub fn draw_lights(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        camera_bind_group: &wgpu::BindGroup,
        lights: &LightRegistry,
        shapes: &HashMap<String, GpuTexture>,
    ) -> usize {
        let mut verts: Vec<QuadVertex> = Vec::with_capacity(lights.len() * 6);
        let mut draws: Vec<&GpuTexture> = Vec::with_capacity(lights.len());
        for light in lights {
            let Some(shape) = shapes.get(light.shape.as_ref()) else {
                warn!(shape = %light.shape, "light shape not loaded; skipping light");
                continue;
            };
            let half = Vec2::new(shape.width as f32, shape.height as f32) * light.scale / 2.0;
            verts.extend(quad(light.position - half, light.position + half, [0.0, 0.0], [1.0, 1.0], light.color.0));
            draws.push(shape);
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("darkness_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.target.view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if draws.is_empty() {
            return 0;
        }
        let vbuf = vertex_buffer(device, "light_vertex_buffer", &verts);
        pass.set_pipeline(&self.additive);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_vertex_buffer(0, vbuf.slice(..));
        for (i, shape) in draws.iter().enumerate() {
            let first = (i * 6) as u32;
            pass.set_bind_group(1, &shape.bind_group, &[]);
            pass.draw(first..first + 6, 0..1);
        }
        draws.len()
    }

    /// Multiply the finished target over `surface_view`.
    ///
    /// `identity_bind_group` must hold an identity view-projection so the
    /// quad can be given directly in clip space.
    pub fn composite(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        identity_bind_group: &wgpu::BindGroup,
        surface_view: &wgpu::TextureView,
    ) -> bool {
        if !self.overlay_enabled {
            return false;
        }
        let verts = quad(Vec2::new(-1.0, 1.0), Vec2::new(1.0, -1.0), [0.0, 0.0], [1.0, 1.0], [1.0; 4]);
        let vbuf = vertex_buffer(device, "darkness_composite_quad", &verts);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("darkness_composite"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_pipeline(&self.multiply);
        pass.set_bind_group(0, identity_bind_group, &[]);
        pass.set_bind_group(1, &self.target.bind_group, &[]);
        pass.set_vertex_buffer(0, vbuf.slice(..));
        pass.draw(0..6, 0..1);
        true
    }
}
