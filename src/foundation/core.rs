use std::time::Duration;

use crate::foundation::error::{EpicycleError, EpicycleResult};

pub use kurbo::{Affine, BezPath, Circle, Line, Point, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> EpicycleResult<Self> {
        let fps = Self { num, den };
        fps.validate()?;
        Ok(fps)
    }

    pub fn validate(self) -> EpicycleResult<()> {
        if self.den == 0 {
            return Err(EpicycleError::validation("Fps den must be > 0"));
        }
        if self.num == 0 {
            return Err(EpicycleError::validation("Fps num must be > 0"));
        }
        Ok(())
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frame_duration(self) -> Duration {
        Duration::from_secs_f64(self.frame_duration_secs())
    }
}

/// Output canvas in pixels. Sampling, animation and rasterization all share these coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> EpicycleResult<Self> {
        let vp = Self { width, height };
        vp.validate()?;
        Ok(vp)
    }

    pub fn validate(self) -> EpicycleResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EpicycleError::validation(
                "viewport width/height must be non-zero",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(EpicycleError::validation(format!(
                "viewport {}x{} exceeds the rasterizer limit of {}",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        Ok(())
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
