// ── Color ──────────────────────────────────────────────────────────────────

/// Linear RGBA color with components in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const YELLOW: Self = Self([1.0, 1.0, 0.0, 1.0]);
    pub const ORANGE: Self = Self([1.0, 0.55, 0.0, 1.0]);
    /// Clear color of the scene target before the layers are drawn.
    pub const BACKDROP: Self = Self([64.0 / 255.0, 64.0 / 255.0, 64.0 / 255.0, 1.0]);

    /// Build a color from 8-bit channels (the on-disk representation).
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0])
    }

    /// Convert back to 8-bit channels, clamping out-of-range components.
    pub fn to_rgba8(self) -> [u8; 4] {
        self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Cheap deterministic hash into `0.0..1.0`, used for the flicker light.
pub(crate) fn pseudo_rand(seed: u64) -> f32 {
    let x = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    // Top 24 bits fit an f32 mantissa exactly.
    (x >> 40) as f32 / (1u64 << 24) as f32
}
