//! Color definitions for entities and visual states

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::cycle::Phase;
use crate::simulation::resources::ResourceKind;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// 8-bit channels, rounded
    pub fn to_rgb8(&self) -> [u8; 3] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// Random bright color, every channel in [80, 255]
    pub fn random_tribe_color(rng: &mut impl Rng) -> Self {
        Self::from_rgb8(rng.gen_range(80..=255), rng.gen_range(80..=255), rng.gen_range(80..=255))
    }
}

/// Agents without a tribe
pub const UNAFFILIATED: Color = Color::new(1.0, 1.0, 1.0, 1.0);
/// Shelters without a tribe
pub const SHELTER_DEFAULT: Color = Color::new(150.0 / 255.0, 75.0 / 255.0, 0.0, 1.0);
pub const PREDATOR: Color = Color::new(200.0 / 255.0, 0.0, 0.0, 1.0);
/// Translucent blue laid over the world at night
pub const NIGHT_OVERLAY: Color = Color::new(0.0, 0.0, 50.0 / 255.0, 100.0 / 255.0);

/// Background color for the current phase
pub fn background(phase: Phase) -> Color {
    match phase {
        Phase::Day => Color::from_rgb8(0, 120, 0),
        Phase::Night => Color::from_rgb8(10, 30, 60),
    }
}

/// Base color of a resource item
pub fn resource_color(kind: ResourceKind) -> Color {
    match kind {
        ResourceKind::Tree => Color::from_rgb8(139, 69, 19),   // Brown
        ResourceKind::Stone => Color::from_rgb8(120, 120, 120), // Grey
        ResourceKind::Bush => Color::from_rgb8(0, 180, 0),     // Green
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_tribe_colors_are_bright() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let [r, g, b] = Color::random_tribe_color(&mut rng).to_rgb8();
            assert!(r >= 80 && g >= 80 && b >= 80);
        }
    }

    #[test]
    fn test_rgb8_round_trip() {
        assert_eq!(Color::from_rgb8(12, 200, 255).to_rgb8(), [12, 200, 255]);
    }
}
