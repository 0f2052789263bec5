use crate::foundation::error::{SwarmError, SwarmResult};

pub use glam::{Vec2, Vec3};

/// Output viewport dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a validated viewport with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> SwarmResult<Self> {
        if width == 0 || height == 0 {
            return Err(SwarmError::validation("viewport dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height.
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Map a pixel position (origin top-left, y down) to normalized device coordinates
    /// (`[-1, 1]`, y up).
    pub fn pixel_to_ndc(self, x_px: f32, y_px: f32) -> Vec2 {
        Vec2::new(
            (x_px / self.width.max(1) as f32) * 2.0 - 1.0,
            -(y_px / self.height.max(1) as f32) * 2.0 + 1.0,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Fixed simulation tick rate in ticks per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TickRate(pub u32);

impl TickRate {
    /// Create a validated tick rate.
    pub fn new(hz: u32) -> SwarmResult<Self> {
        if hz == 0 {
            return Err(SwarmError::validation("tick rate must be > 0"));
        }
        Ok(Self(hz))
    }

    /// Duration of one tick in seconds.
    pub fn tick_secs(self) -> f32 {
        1.0 / self.0.max(1) as f32
    }

    /// Number of whole ticks needed to cover `secs`.
    pub fn secs_to_ticks_ceil(self, secs: f32) -> u64 {
        (secs.max(0.0) * self.0 as f32).ceil() as u64
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self(60)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Build an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
