//! Spatial primitives shared by layouts, zones and the light puzzle.
//!
//! Coordinates are right-handed with Y up. Rooms are rectilinear, so the
//! only rotations that ever apply to layout data are quarter turns about Y.
//! Those are evaluated exactly (swaps and negations) rather than with
//! `sin`/`cos`, which keeps four quarter turns bit-identical to the input.

use serde::{Deserialize, Deserializer, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;

/// 3D position vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Component-wise product.
    pub fn scale(&self, other: &Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Rotate about the +Y axis by an arbitrary angle (radians).
    pub fn rotate_y(&self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }

    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.z - other.z).abs() <= eps
    }

    /// Drop the Y component.
    pub fn xz(&self) -> Point2 {
        Point2::new(self.x, self.z)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

/// A point on the floor plane (x, z).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub z: f32,
}

impl Point2 {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.z + other.z) / 2.0)
    }

    pub fn at_height(&self, y: f32) -> Vec3 {
        Vec3::new(self.x, y, self.z)
    }
}

/// Axis-aligned rectangle on the floor plane.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect2 {
    pub min: Point2,
    pub max: Point2,
}

impl Rect2 {
    /// Build from two arbitrary corners.
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.z.min(b.z)),
            max: Point2::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn depth(&self) -> f32 {
        self.max.z - self.min.z
    }

    pub fn center(&self) -> Point2 {
        self.min.midpoint(&self.max)
    }

    /// Inclusive containment on the floor plane.
    pub fn contains_xz(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }

    pub fn contains_rect(&self, other: &Rect2, eps: f32) -> bool {
        other.min.x >= self.min.x - eps
            && other.min.z >= self.min.z - eps
            && other.max.x <= self.max.x + eps
            && other.max.z <= self.max.z + eps
    }

    /// Grow by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.z - margin),
            max: Point2::new(self.max.x + margin, self.max.z + margin),
        }
    }

    pub fn rotated(&self, turns: QuarterTurns) -> Self {
        Self::from_corners(turns.rotate_point2(self.min), turns.rotate_point2(self.max))
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: Point2::new(self.min.x + offset.x, self.min.z + offset.z),
            max: Point2::new(self.max.x + offset.x, self.max.z + offset.z),
        }
    }
}

/// Cardinal facing of a doorway or zone.
///
/// A side is named by the direction one faces when walking out through
/// it: `North` is the `z = 0` wall of a layout, `South` is `z = depth`,
/// `West` is `x = 0` and `East` is `x = width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

/// Failed strict parse of a direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction {0:?}")]
pub struct ParseDirectionError(pub String);

impl Direction {
    /// Direction used when layout data names something unrecognised.
    pub const FALLBACK: Direction = Direction::North;

    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Unit vector pointing out through this side.
    pub fn unit(self) -> Vec3 {
        match self {
            Direction::North => Vec3::new(0.0, 0.0, -1.0),
            Direction::South => Vec3::new(0.0, 0.0, 1.0),
            Direction::East => Vec3::new(1.0, 0.0, 0.0),
            Direction::West => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// Direction after rotating by `turns` about +Y.
    /// One quarter turn maps east → north → west → south → east.
    pub fn rotated(self, turns: QuarterTurns) -> Self {
        let mut d = self;
        for _ in 0..turns.count() {
            d = match d {
                Direction::East => Direction::North,
                Direction::North => Direction::West,
                Direction::West => Direction::South,
                Direction::South => Direction::East,
            };
        }
        d
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    /// Parse a direction name, falling back to [`Direction::FALLBACK`] with
    /// a warning instead of failing. Used wherever malformed data must not
    /// stop the per-tick loop.
    pub fn parse_lenient(s: &str) -> Self {
        match s.parse() {
            Ok(d) => d,
            Err(e) => {
                log::warn!("{}; using {}", e, Self::FALLBACK.name());
                Self::FALLBACK
            }
        }
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" => Ok(Direction::North),
            "south" => Ok(Direction::South),
            "east" => Ok(Direction::East),
            "west" => Ok(Direction::West),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Direction::parse_lenient(&raw))
    }
}

/// Rotation about +Y by a whole number of quarter turns (0..4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8")]
pub struct QuarterTurns(u8);

impl From<u8> for QuarterTurns {
    fn from(count: u8) -> Self {
        QuarterTurns::new(count as u32)
    }
}

impl QuarterTurns {
    pub const ZERO: Self = QuarterTurns(0);

    pub fn new(count: u32) -> Self {
        QuarterTurns((count % 4) as u8)
    }

    pub fn count(self) -> u32 {
        self.0 as u32
    }

    /// Smallest rotation mapping `from` onto `to`.
    pub fn between(from: Direction, to: Direction) -> Self {
        (0..4)
            .map(QuarterTurns::new)
            .find(|t| from.rotated(*t) == to)
            .unwrap_or(QuarterTurns::ZERO)
    }

    /// Rotation angle in radians, in `[0, 2π)`.
    pub fn radians(self) -> f32 {
        self.0 as f32 * FRAC_PI_2
    }

    pub fn then(self, other: QuarterTurns) -> Self {
        QuarterTurns::new(self.count() + other.count())
    }

    /// Exact right-handed rotation about Y: `x' = x·cos + z·sin`,
    /// `z' = −x·sin + z·cos`.
    pub fn rotate_point2(self, p: Point2) -> Point2 {
        match self.0 {
            0 => p,
            1 => Point2::new(p.z, -p.x),
            2 => Point2::new(-p.x, -p.z),
            _ => Point2::new(-p.z, p.x),
        }
    }

    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = self.rotate_point2(v.xz());
        Vec3::new(p.x, v.y, p.z)
    }

    /// Add this rotation to a yaw angle, normalised to `[0, 2π)`.
    pub fn rotate_yaw(self, yaw: f32) -> f32 {
        (yaw + self.radians()).rem_euclid(TAU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn quarter_turn_matches_trig_rotation() {
        let v = Vec3::new(3.0, 1.0, -2.0);
        for k in 0..4 {
            let t = QuarterTurns::new(k);
            let exact = t.rotate(v);
            let trig = v.rotate_y(t.radians());
            assert!(exact.approx_eq(&trig, 1e-5), "k={k}: {exact:?} vs {trig:?}");
        }
    }

    #[test]
    fn direction_rotation_agrees_with_vector_rotation() {
        for d in Direction::ALL {
            for k in 0..4 {
                let t = QuarterTurns::new(k);
                assert!(t.rotate(d.unit()).approx_eq(&d.rotated(t).unit(), 1e-6));
            }
        }
    }

    #[test]
    fn between_is_minimal() {
        assert_eq!(QuarterTurns::between(Direction::East, Direction::East).count(), 0);
        assert_eq!(QuarterTurns::between(Direction::East, Direction::North).count(), 1);
        assert_eq!(QuarterTurns::between(Direction::East, Direction::West).count(), 2);
        assert_eq!(QuarterTurns::between(Direction::East, Direction::South).count(), 3);
        for from in Direction::ALL {
            for to in Direction::ALL {
                assert_eq!(from.rotated(QuarterTurns::between(from, to)), to);
            }
        }
    }

    #[test]
    fn four_turns_wrap_to_zero() {
        assert_eq!(QuarterTurns::new(4), QuarterTurns::ZERO);
        assert_eq!(QuarterTurns::new(3).then(QuarterTurns::new(1)), QuarterTurns::ZERO);
    }

    #[test]
    fn deserialized_turns_wrap_into_range() {
        let t: QuarterTurns = serde_json::from_str("7").unwrap();
        assert_eq!(t, QuarterTurns::new(3));
        assert_eq!(t.count(), 3);
        assert_eq!(serde_json::to_string(&t).unwrap(), "3");
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert_eq!("West".parse::<Direction>(), Ok(Direction::West));
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn lenient_parse_falls_back() {
        assert_eq!(Direction::parse_lenient(" south "), Direction::South);
        assert_eq!(Direction::parse_lenient("sideways"), Direction::FALLBACK);
    }

    #[test]
    fn deserialize_uses_lenient_path() {
        let d: Direction = serde_json::from_str("\"EAST\"").unwrap();
        assert_eq!(d, Direction::East);
        let d: Direction = serde_json::from_str("\"nowhere\"").unwrap();
        assert_eq!(d, Direction::North);
        assert_eq!(serde_json::to_string(&Direction::West).unwrap(), "\"west\"");
    }

    #[test]
    fn rect_rotation_keeps_size() {
        let r = Rect2::from_corners(Point2::new(0.0, 0.0), Point2::new(12.0, 8.0));
        let q = r.rotated(QuarterTurns::new(1));
        assert_eq!(q.width(), 8.0);
        assert_eq!(q.depth(), 12.0);
        assert!(r.contains_xz(12.0, 8.0));
        assert!(!r.contains_xz(12.1, 8.0));
    }
}
