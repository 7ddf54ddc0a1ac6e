//! Additive RGB color math for the light puzzle.

use serde::{Deserialize, Serialize};

/// Linear RGB color, nominally in `[0, 1]` per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    pub const YELLOW: Rgb = Rgb::new(1.0, 1.0, 0.0);
    pub const CYAN: Rgb = Rgb::new(0.0, 1.0, 1.0);
    pub const MAGENTA: Rgb = Rgb::new(1.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn add(self, other: Rgb) -> Rgb {
        Rgb::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }

    pub fn scale(self, k: f32) -> Rgb {
        Rgb::new(self.r * k, self.g * k, self.b * k)
    }

    pub fn clamped(self) -> Rgb {
        Rgb::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    /// Euclidean distance in RGB space.
    pub fn distance(&self, other: &Rgb) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Per-channel maximum.
    pub fn max_channels(self, other: Rgb) -> Rgb {
        Rgb::new(self.r.max(other.r), self.g.max(other.g), self.b.max(other.b))
    }
}

/// Weight one light's color contributes to another at `distance`.
/// `None` at or beyond the threshold.
pub fn mix_weight(distance: f32, threshold: f32, max_weight: f32) -> Option<f32> {
    if threshold <= 0.0 || distance >= threshold {
        return None;
    }
    Some((1.0 - distance / threshold) * max_weight)
}

/// Primary plus weighted mixes, clamped per channel.
pub fn blend(primary: Rgb, mixes: &[(Rgb, f32)]) -> Rgb {
    mixes
        .iter()
        .fold(primary, |acc, (color, weight)| acc.add(color.scale(*weight)))
        .clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_falls_off_linearly() {
        assert_eq!(mix_weight(0.0, 1.0, 0.8), Some(0.8));
        assert!((mix_weight(0.5, 1.0, 0.8).unwrap() - 0.4).abs() < 1e-6);
        assert_eq!(mix_weight(1.0, 1.0, 0.8), None);
        assert_eq!(mix_weight(3.0, 1.0, 0.8), None);
    }

    #[test]
    fn blend_clamps_each_channel() {
        let c = blend(Rgb::RED, &[(Rgb::RED, 0.8), (Rgb::GREEN, 0.4)]);
        assert_eq!(c, Rgb::new(1.0, 0.4, 0.0));
    }

    #[test]
    fn distance_between_primaries() {
        assert!((Rgb::RED.distance(&Rgb::GREEN) - 2f32.sqrt()).abs() < 1e-6);
        assert_eq!(Rgb::BLUE.distance(&Rgb::BLUE), 0.0);
    }

    #[test]
    fn max_channels_combines() {
        assert_eq!(Rgb::RED.max_channels(Rgb::BLUE), Rgb::MAGENTA);
    }
}
