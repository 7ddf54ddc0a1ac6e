//! Doorway trigger volumes and the per-sample zone scan.

use crate::geometry::{Direction, Vec3};
use crate::layout::ZoneSpec;
use serde::{Deserialize, Serialize};

/// Stable identifier of a room on a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// A zone addressed by its owning room and index within that room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneRef {
    pub room: RoomId,
    pub index: usize,
}

/// Axis-aligned trigger volume at a doorway, in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderingZone {
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub direction: Direction,
    pub opening_center: Vec3,
    /// True iff the last sampled player position was inside.
    pub has_triggered: bool,
    pub is_active: bool,
    /// Manual flag for debug tooling; the scan never reads it.
    pub debug_triggered: bool,
    pub owner: RoomId,
    /// Room attached through this doorway, if any.
    pub connected: Option<RoomId>,
}

impl RenderingZone {
    /// World-space zone from a (possibly rotated) layout zone and the
    /// owning room's world position.
    pub fn from_spec(spec: &ZoneSpec, position: Vec3, owner: RoomId) -> Self {
        let a = spec.from + position;
        let b = spec.to + position;
        Self {
            bounds_min: Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            bounds_max: Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
            direction: spec.direction,
            opening_center: spec.opening_center + position,
            has_triggered: false,
            is_active: true,
            debug_triggered: false,
            owner,
            connected: None,
        }
    }

    /// Inclusive AABB test.
    pub fn contains_point(&self, p: &Vec3) -> bool {
        p.x >= self.bounds_min.x
            && p.x <= self.bounds_max.x
            && p.y >= self.bounds_min.y
            && p.y <= self.bounds_max.y
            && p.z >= self.bounds_min.z
            && p.z <= self.bounds_max.z
    }

    pub fn trigger(&mut self) {
        self.debug_triggered = true;
    }

    pub fn reset(&mut self) {
        self.debug_triggered = false;
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        if !active {
            self.has_triggered = false;
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.bounds_min + self.bounds_max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.bounds_max - self.bounds_min
    }
}

/// Result of sampling one player position against every zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneScan {
    /// First zone, in room traversal order, containing the player.
    pub active: Option<ZoneRef>,
    /// Zones whose containment flipped false → true on this sample.
    pub triggered: Vec<ZoneRef>,
}

/// Sample `p` against the zones of every room, in order, updating each
/// zone's `has_triggered` edge state.
pub fn scan_zones<'a, I>(rooms: I, p: &Vec3) -> ZoneScan
where
    I: IntoIterator<Item = (RoomId, &'a mut [RenderingZone])>,
{
    let mut scan = ZoneScan::default();
    for (room, zones) in rooms {
        for (index, zone) in zones.iter_mut().enumerate() {
            if !zone.is_active {
                zone.has_triggered = false;
                continue;
            }
            let inside = zone.contains_point(p);
            let zone_ref = ZoneRef { room, index };
            if inside && !zone.has_triggered {
                scan.triggered.push(zone_ref);
            }
            if inside && scan.active.is_none() {
                scan.active = Some(zone_ref);
            }
            zone.has_triggered = inside;
        }
    }
    scan
}
