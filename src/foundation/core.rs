use crate::foundation::error::{RingburstError, RingburstResult};
use crate::foundation::math::{hsl_to_rgb, rgb_to_hue};

pub use kurbo::{Affine, Point, Vec2};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> RingburstResult<Self> {
        if width == 0 || height == 0 {
            return Err(RingburstError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    /// Pixel center of the canvas.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Shorter side in pixels.
    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// Byte length of one tightly packed RGBA8 frame.
    pub fn frame_len_bytes(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Integer frame rate and total duration of a render.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Frames per second, already rounded from the probed rational rate.
    pub fps: u32,
    /// Total duration in seconds.
    pub duration_sec: f64,
}

impl Timeline {
    /// Create a validated timeline.
    pub fn new(fps: u32, duration_sec: f64) -> RingburstResult<Self> {
        if fps == 0 {
            return Err(RingburstError::validation("fps must be non-zero"));
        }
        if !duration_sec.is_finite() || duration_sec < 0.0 {
            return Err(RingburstError::validation(
                "duration must be a finite, non-negative number of seconds",
            ));
        }
        Ok(Self { fps, duration_sec })
    }

    /// Fixed simulation step per output frame.
    pub fn frame_dt(self) -> f64 {
        1.0 / f64::from(self.fps)
    }

    /// `ceil(duration * fps)`.
    pub fn frame_count(self) -> u64 {
        (self.duration_sec * f64::from(self.fps)).ceil().max(0.0) as u64
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque color from hue (degrees), saturation and lightness in `[0, 1]`.
    pub fn from_hsl(hue_deg: f64, saturation: f64, lightness: f64) -> Self {
        let [r, g, b] = hsl_to_rgb(hue_deg, saturation, lightness);
        Self::rgb(r, g, b)
    }

    /// Hue of this color in degrees `[0, 360)`.
    pub fn hue(self) -> f64 {
        rgb_to_hue(self.r, self.g, self.b)
    }

    /// Same color with alpha scaled by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        Self {
            a: (f64::from(self.a) * o).round() as u8,
            ..self
        }
    }

    /// Mix toward white by `t` in `[0, 1]`; alpha is kept.
    pub fn lighten(self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |c: u8| (f64::from(c) + (255.0 - f64::from(c)) * t).round() as u8;
        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
            a: self.a,
        }
    }

    /// Scale RGB by `k` in `[0, 1]`; alpha is kept.
    pub fn darken(self, k: f64) -> Self {
        let k = k.clamp(0.0, 1.0);
        let mul = |c: u8| (f64::from(c) * k).round() as u8;
        Self {
            r: mul(self.r),
            g: mul(self.g),
            b: mul(self.b),
            a: self.a,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
