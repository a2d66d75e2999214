use glam::Vec2;

/// World-space size of the visible area, independent of window size.
pub const VIEW_WIDTH: f32 = 640.0;
pub const VIEW_HEIGHT: f32 = 360.0;

/// Camera uniform uploaded to the GPU: the combined view-projection matrix.
///
/// Layout (column-major, matching WGSL `mat4x4<f32>`):
/// ```text
/// col0: [sx,  0,   0,  0]
/// col1: [0,   sy,  0,  0]
/// col2: [0,   0,   1,  0]
/// col3: [tx,  ty,  0,  1]
/// ```
/// where `sx = 2/vw`, `sy = -2/vh`, `tx = -sx*cx`, `ty = -sy*cy`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Maps `[0..w] × [0..h]` straight to clip space. Used for full-target
    /// passes (the darkness composite) that ignore the camera.
    pub fn identity_ortho(width: f32, height: f32) -> Self {
        let sx = 2.0 / width;
        let sy = -2.0 / height;
        Self {
            view_proj: [
                [sx,   0.0,  0.0, 0.0],
                [0.0,  sy,   0.0, 0.0],
                [0.0,  0.0,  1.0, 0.0],
                [-1.0, 1.0,  0.0, 1.0],
            ],
        }
    }
}

/// 2D camera centered on the actor with a fixed world-space view size.
///
/// The view is stretched over the whole viewport, so a larger window shows
/// the same world area at a larger scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// World-space point at the center of the view.
    pub position: Vec2,
    /// World-space width and height of the view.
    pub view_size: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl Camera {
    pub fn new(center: Vec2) -> Self {
        Self { position: center, view_size: Vec2::new(VIEW_WIDTH, VIEW_HEIGHT) }
    }

    pub fn follow(&mut self, target: Vec2) {
        self.position = target;
    }

    /// World-space top-left corner of the view.
    pub fn top_left(&self) -> Vec2 {
        self.position - self.view_size / 2.0
    }

    /// Pixels per world unit on each axis for a viewport of the given size.
    pub fn viewport_scale(&self, viewport: (u32, u32)) -> Vec2 {
        Vec2::new(viewport.0 as f32, viewport.1 as f32) / self.view_size.max(Vec2::splat(f32::EPSILON))
    }

    pub fn world_to_viewport(&self, world: Vec2, viewport: (u32, u32)) -> Vec2 {
        (world - self.top_left()) * self.viewport_scale(viewport)
    }

    pub fn viewport_to_world(&self, pixel: Vec2, viewport: (u32, u32)) -> Vec2 {
        pixel / self.viewport_scale(viewport) + self.top_left()
    }

    /// Build the GPU-ready [`CameraUniform`].
    ///
    /// Derivation (y-down world space → NDC):
    /// ```text
    /// x_ndc = sx * world_x + tx    (sx = 2/vw,  tx = -sx*cx)
    /// y_ndc = sy * world_y + ty    (sy = -2/vh, ty = -sy*cy)
    /// ```
    pub fn build_view_proj(&self) -> CameraUniform {
        let sx = 2.0 / self.view_size.x.max(f32::EPSILON);
        let sy = -2.0 / self.view_size.y.max(f32::EPSILON);
        let tx = -sx * self.position.x;
        let ty = -sy * self.position.y;

        CameraUniform {
            view_proj: [
                [sx,  0.0, 0.0, 0.0],
                [0.0, sy,  0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [tx,  ty,  0.0, 1.0],
            ],
        }
    }
}
