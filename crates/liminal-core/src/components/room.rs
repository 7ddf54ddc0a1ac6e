//! Room instances - one live room on the floor.

use hecs::{Entity, World};
use liminal_logic::geometry::{QuarterTurns, Rect2, Vec3};
use liminal_logic::zone::{RenderingZone, RoomId};

use crate::physics::{ColliderHandle, PhysicsWorld};
use crate::systems::despawn_subtree;

/// Load state of one decorative model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelSlotState {
    Pending,
    Loaded { collider: ColliderHandle },
    Failed,
}

#[derive(Debug, Clone)]
pub struct ModelSlot {
    pub path: String,
    pub node: Entity,
    pub state: ModelSlotState,
}

/// A room built from a layout plan at a world position.
#[derive(Debug, Clone)]
pub struct RoomInstance {
    pub id: RoomId,
    pub layout_name: String,
    /// World origin of the room frame (y = 0).
    pub position: Vec3,
    pub rotation: QuarterTurns,
    pub height: f32,
    /// World-space floor rectangle.
    pub footprint: Rect2,
    pub root: Entity,
    /// Every static collider this room owns, model colliders included.
    pub colliders: Vec<ColliderHandle>,
    pub zones: Vec<RenderingZone>,
    pub models: Vec<ModelSlot>,
    pub zone_gizmos: Vec<Entity>,
    unloaded: bool,
}

impl RoomInstance {
    pub fn new(
        id: RoomId,
        layout_name: String,
        position: Vec3,
        rotation: QuarterTurns,
        height: f32,
        footprint: Rect2,
        root: Entity,
    ) -> Self {
        Self {
            id,
            layout_name,
            position,
            rotation,
            height,
            footprint,
            root,
            colliders: Vec::new(),
            zones: Vec::new(),
            models: Vec::new(),
            zone_gizmos: Vec::new(),
            unloaded: false,
        }
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation.radians()
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    /// Whether a world point lies over this room's floor.
    pub fn contains_xz(&self, p: &Vec3) -> bool {
        self.footprint.contains_xz(p.x, p.z)
    }

    /// Zone on this room's doorway that leads to `other`.
    pub fn zone_connected_to(&self, other: RoomId) -> Option<usize> {
        self.zones.iter().position(|z| z.connected == Some(other))
    }

    /// Despawn the scene subtree and remove every collider. Calling it
    /// twice is a no-op.
    pub fn unload<P: PhysicsWorld>(&mut self, scene: &mut World, physics: &mut P) {
        if self.unloaded {
            return;
        }
        let nodes = despawn_subtree(scene, self.root);
        let mut removed = 0;
        for handle in self.colliders.drain(..) {
            if physics.remove_body(handle) {
                removed += 1;
            }
        }
        for zone in &mut self.zones {
            zone.set_active(false);
            zone.connected = None;
        }
        self.zone_gizmos.clear();
        self.unloaded = true;
        log::debug!(
            "unloaded {} ({}): {} nodes, {} colliders",
            self.id,
            self.layout_name,
            nodes,
            removed
        );
    }
}
