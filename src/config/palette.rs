use crate::foundation::core::Rgba8;

/// Hue progression used to color rings and the ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Full hue wheel across the ring set.
    Rainbow,
    /// Cyan to violet.
    Cool,
    /// Red to yellow.
    Warm,
    /// A few saturated accent hues, cycled.
    Neon,
}

const NEON_HUES: [f64; 4] = [320.0, 185.0, 95.0, 55.0];

impl ColorScheme {
    /// Every scheme, in selection order.
    pub const ALL: [Self; 4] = [Self::Rainbow, Self::Cool, Self::Warm, Self::Neon];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rainbow => "rainbow",
            Self::Cool => "cool",
            Self::Warm => "warm",
            Self::Neon => "neon",
        }
    }

    /// Color of ring `index` out of `count`.
    pub fn ring_color(self, index: usize, count: usize) -> Rgba8 {
        let t = if count <= 1 {
            0.0
        } else {
            (index % count) as f64 / (count - 1) as f64
        };
        match self {
            Self::Rainbow => {
                let step = 360.0 / count.max(1) as f64;
                Rgba8::from_hsl((index % count.max(1)) as f64 * step, 0.85, 0.58)
            }
            Self::Cool => Rgba8::from_hsl(175.0 + 95.0 * t, 0.8, 0.6),
            Self::Warm => Rgba8::from_hsl(60.0 * t, 0.9, 0.56),
            Self::Neon => Rgba8::from_hsl(NEON_HUES[index % NEON_HUES.len()], 1.0, 0.6),
        }
    }

    /// Base color of the ball.
    pub fn ball_color(self) -> Rgba8 {
        match self {
            Self::Rainbow => Rgba8::WHITE,
            Self::Cool => Rgba8::from_hsl(190.0, 0.35, 0.92),
            Self::Warm => Rgba8::from_hsl(45.0, 1.0, 0.85),
            Self::Neon => Rgba8::from_hsl(300.0, 1.0, 0.75),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/palette.rs"]
mod tests;
