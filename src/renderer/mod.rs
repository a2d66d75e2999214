pub mod darkness;
pub mod pipeline;
pub mod text;
pub mod texture;

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat4, Vec2};
use image::RgbaImage;
use tracing::{info, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use darkness::DarknessTarget;
use pipeline::{BlendMode, QuadLayouts, QuadVertex, create_quad_pipeline, quad};
use text::{BitmapFont, LABEL_SIZE, LabelFont, layout_text};
use texture::{GpuTexture, LINEAR_FORMAT, vertex_buffer};

use crate::camera::CameraUniform;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::FrameRect;
use crate::lighting::{LightRegistry, ShapeLibrary};
use crate::world::RegionLayers;

/// Images uploaded once when the renderer starts.
pub struct RenderAssets<'a> {
    pub layers: Option<&'a RegionLayers>,
    pub actor_sheet: &'a RgbaImage,
    pub shapes: &'a ShapeLibrary,
    pub label_font: Option<&'a LabelFont>,
}

/// Everything one frame draws.
pub struct FrameScene<'a> {
    pub actor_position: Vec2,
    pub actor_frame: FrameRect,
    pub lights: &'a LightRegistry,
    /// Label text and its world-space top-left corner.
    pub label: Option<(&'a str, Vec2)>,
}

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    layouts: QuadLayouts,
    scene_pipeline: wgpu::RenderPipeline,
    /// Camera view-projection: world passes (layers, actor, lights).
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    /// Identity view-projection: clip-space passes (darkness composite).
    identity_bind_group: wgpu::BindGroup,
    lower: Option<GpuTexture>,
    upper: Option<GpuTexture>,
    actor_sheet: GpuTexture,
    shapes: HashMap<String, GpuTexture>,
    label_font: Option<(GpuTexture, BitmapFont)>,
    darkness: DarknessTarget,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, assets: RenderAssets<'_>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| Error::Gpu(format!("surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::Gpu(format!("no suitable adapter: {e}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| Error::Gpu(format!("device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| Error::Gpu("surface reports no formats".into()))?;
        let alpha_mode = caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync { wgpu::PresentMode::AutoVsync } else { wgpu::PresentMode::AutoNoVsync },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        info!(?format, width = config.width, height = config.height, vsync, "render surface configured");

        let layouts = QuadLayouts::new(&device);
        let scene_pipeline = create_quad_pipeline(&device, &layouts, format, BlendMode::Alpha, "scene_pipeline");

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::identity_ortho(config.width as f32, config.height as f32)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = uniform_bind_group(&device, &layouts.camera, &camera_buffer, "camera_bg");

        let identity = CameraUniform { view_proj: Mat4::IDENTITY.to_cols_array_2d() };
        let identity_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("identity_buffer"),
            contents: bytemuck::cast_slice(&[identity]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let identity_bind_group = uniform_bind_group(&device, &layouts.camera, &identity_buffer, "identity_bg");

        let srgb = wgpu::TextureFormat::Rgba8UnormSrgb;
        let (lower, upper) = match assets.layers {
            Some(layers) => (
                Some(GpuTexture::from_image(&device, &queue, &layouts.texture, &layers.lower, srgb, false, "lower_layers")),
                Some(GpuTexture::from_image(&device, &queue, &layouts.texture, &layers.upper, srgb, false, "upper_layers")),
            ),
            None => (None, None),
        };
        let actor_sheet = GpuTexture::from_image(&device, &queue, &layouts.texture, assets.actor_sheet, srgb, false, "actor_sheet");
        let shapes = assets
            .shapes
            .iter()
            .map(|(name, img)| {
                let tex = GpuTexture::from_image(&device, &queue, &layouts.texture, img, LINEAR_FORMAT, true, name);
                (name.to_string(), tex)
            })
            .collect();
        let label_font = assets.label_font.map(|lf| {
            let tex = GpuTexture::from_image(&device, &queue, &layouts.texture, &lf.atlas, srgb, true, "label_font");
            (tex, lf.font.clone())
        });

        let darkness = DarknessTarget::new(&device, &layouts, format, config.width, config.height);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            layouts,
            scene_pipeline,
            camera_buffer,
            camera_bind_group,
            identity_bind_group,
            lower,
            upper,
            actor_sheet,
            shapes,
            label_font,
            darkness,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.darkness.resize(&self.device, &self.layouts, new_size.width, new_size.height);
    }

    /// Re-apply the current size, e.g. after `SurfaceError::Lost`.
    pub fn reconfigure(&mut self) {
        warn!("render surface lost; reconfiguring");
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Upload a new camera view-projection matrix to the GPU.
    pub fn update_camera(&mut self, uniform: &CameraUniform) {
        self.queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(std::slice::from_ref(uniform)));
    }

    pub fn overlay_enabled(&self) -> bool { self.darkness.overlay_enabled }

    pub fn set_overlay_enabled(&mut self, enabled: bool) {
        self.darkness.overlay_enabled = enabled;
    }

    /// Render one frame.
    ///
    /// 1. scene pass onto the surface: backdrop clear, lower layer, actor
    ///    frame, upper layer, region label (alpha blend, camera space);
    /// 2. darkness pass: clear black, lights additively;
    /// 3. multiply the darkness target over the surface (unless disabled);
    /// 4. present.
    pub fn render(&mut self, scene: &FrameScene<'_>) -> std::result::Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame_encoder") });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu(Color::BACKDROP)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(&self.scene_pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            let layer_quad = |tex: &GpuTexture| {
                quad(Vec2::ZERO, Vec2::new(tex.width as f32, tex.height as f32), [0.0, 0.0], [1.0, 1.0], Color::WHITE.0)
            };

            let frame_rect = scene.actor_frame;
            let half = Vec2::new(frame_rect.width as f32, frame_rect.height as f32) / 2.0;
            let (uv_min, uv_max) = frame_rect.uv(self.actor_sheet.width, self.actor_sheet.height);
            let actor = quad(scene.actor_position - half, scene.actor_position + half, uv_min, uv_max, Color::WHITE.0);

            let draws: [Option<(&GpuTexture, [QuadVertex; 6])>; 3] = [
                self.lower.as_ref().map(|t| (t, layer_quad(t))),
                Some((&self.actor_sheet, actor)),
                self.upper.as_ref().map(|t| (t, layer_quad(t))),
            ];
            for (tex, verts) in draws.into_iter().flatten() {
                let vbuf = vertex_buffer(&self.device, "scene_quad", &verts);
                pass.set_bind_group(1, &tex.bind_group, &[]);
                pass.set_vertex_buffer(0, vbuf.slice(..));
                pass.draw(0..6, 0..1);
            }

            if let (Some((text, origin)), Some((atlas, font))) = (scene.label, self.label_font.as_ref()) {
                let verts: Vec<QuadVertex> = layout_text(text, font, origin, LABEL_SIZE)
                    .into_iter()
                    .flat_map(|g| quad(g.min, g.max, g.uv_min, g.uv_max, Color::YELLOW.0))
                    .collect();
                if !verts.is_empty() {
                    let vbuf = vertex_buffer(&self.device, "label_quads", &verts);
                    pass.set_bind_group(1, &atlas.bind_group, &[]);
                    pass.set_vertex_buffer(0, vbuf.slice(..));
                    pass.draw(0..verts.len() as u32, 0..1);
                }
            }
        }

        self.darkness.draw_lights(&self.device, &mut encoder, &self.camera_bind_group, scene.lights, &self.shapes);
        self.darkness.composite(&self.device, &mut encoder, &self.identity_bind_group, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
    })
}

fn to_wgpu(color: Color) -> wgpu::Color {
    let [r, g, b, a] = color.0;
    wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: a as f64 }
}
