//! Static collider interface.
//!
//! The floor engine only ever adds and removes static boxes; everything
//! else about physics belongs to the host. [`StaticColliderSet`] is the
//! in-memory world used by tests and the headless harness.

use liminal_logic::geometry::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque handle to a body in a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderHandle(pub u64);

/// Immovable box collider in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticBox {
    pub center: Vec3,
    pub half_extents: Vec3,
    /// Rotation about +Y in radians.
    pub rotation_y: f32,
}

impl StaticBox {
    pub fn axis_aligned(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
            rotation_y: 0.0,
        }
    }

    pub fn contains_point(&self, p: &Vec3) -> bool {
        let local = (*p - self.center).rotate_y(-self.rotation_y);
        local.x.abs() <= self.half_extents.x
            && local.y.abs() <= self.half_extents.y
            && local.z.abs() <= self.half_extents.z
    }
}

pub trait PhysicsWorld {
    fn add_static_box(&mut self, shape: StaticBox) -> ColliderHandle;

    /// Returns false when the handle is unknown (already removed).
    fn remove_body(&mut self, handle: ColliderHandle) -> bool;

    fn body_count(&self) -> usize;
}

/// Physics world that only stores static boxes.
#[derive(Debug, Clone, Default)]
pub struct StaticColliderSet {
    next: u64,
    bodies: BTreeMap<ColliderHandle, StaticBox>,
}

impl StaticColliderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&StaticBox> {
        self.bodies.get(&handle)
    }

    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    pub fn handles(&self) -> impl Iterator<Item = ColliderHandle> + '_ {
        self.bodies.keys().copied()
    }

    /// Every body containing `p`.
    pub fn query_point(&self, p: &Vec3) -> Vec<ColliderHandle> {
        self.bodies
            .iter()
            .filter(|(_, b)| b.contains_point(p))
            .map(|(h, _)| *h)
            .collect()
    }
}

impl PhysicsWorld for StaticColliderSet {
    fn add_static_box(&mut self, shape: StaticBox) -> ColliderHandle {
        let handle = ColliderHandle(self.next);
        self.next += 1;
        self.bodies.insert(handle, shape);
        handle
    }

    fn remove_body(&mut self, handle: ColliderHandle) -> bool {
        self.bodies.remove(&handle).is_some()
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut set = StaticColliderSet::new();
        let a = set.add_static_box(StaticBox::axis_aligned(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)));
        let b = set.add_static_box(StaticBox::axis_aligned(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)));
        assert_ne!(a, b);
        assert_eq!(set.body_count(), 2);
        assert!(set.remove_body(a));
        assert!(!set.remove_body(a));
        assert_eq!(set.body_count(), 1);
    }

    #[test]
    fn rotated_box_point_query() {
        let mut set = StaticColliderSet::new();
        // long thin wall along z
        let wall = set.add_static_box(StaticBox {
            center: Vec3::new(0.0, 1.5, 5.0),
            half_extents: Vec3::new(5.0, 1.5, 0.1),
            rotation_y: -std::f32::consts::FRAC_PI_2,
        });
        assert_eq!(set.query_point(&Vec3::new(0.0, 1.0, 9.0)), vec![wall]);
        assert!(set.query_point(&Vec3::new(3.0, 1.0, 5.0)).is_empty());
    }
}
