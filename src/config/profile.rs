use rand::Rng;

use crate::config::palette::ColorScheme;
use crate::scene::ball::BallStyle;
use crate::scene::particles::DestructionEffect;
use crate::scene::ring::RingLayout;

/// The visual profile of one run. Chosen once, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    /// Ring and ball colors.
    pub scheme: ColorScheme,
    /// Initial ring angles and speeds.
    pub layout: RingLayout,
    /// Ball appearance.
    pub ball: BallStyle,
    /// Ring destruction response.
    pub effect: DestructionEffect,
}

fn pick<T: Copy, const N: usize>(all: &[T; N], rng: &mut impl Rng) -> T {
    all[rng.random_range(0..N)]
}

impl Profile {
    /// Pick each policy independently and uniformly.
    pub fn choose(rng: &mut impl Rng) -> Self {
        let profile = Self {
            scheme: pick(&ColorScheme::ALL, rng),
            layout: pick(&RingLayout::ALL, rng),
            ball: pick(&BallStyle::ALL, rng),
            effect: pick(&DestructionEffect::ALL, rng),
        };
        tracing::info!(
            scheme = profile.scheme.name(),
            layout = profile.layout.name(),
            ball = profile.ball.name(),
            effect = profile.effect.name(),
            "selected visual profile"
        );
        profile
    }
}
