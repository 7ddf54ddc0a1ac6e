//! Scene node components - the explicit node arena.
//!
//! Every renderable thing on a floor is a `hecs` entity with a
//! [`SceneNode`]. Parent links are plain entity handles; world transforms
//! are only ever written by `propagate_transforms`.

use hecs::Entity;
use liminal_logic::color::Rgb;
use liminal_logic::geometry::Vec3;
use liminal_logic::zone::RoomId;
use serde::{Deserialize, Serialize};

/// Translation, yaw and uniform scale relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    /// Rotation about +Y in radians.
    pub rotation_y: f32,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation_y: 0.0,
        scale: 1.0,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation_y(mut self, rotation_y: f32) -> Self {
        self.rotation_y = rotation_y;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Apply this transform to a point in its local space.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.translation + (p * self.scale).rotate_y(self.rotation_y)
    }

    /// `self` as parent, `child` relative to it.
    pub fn then(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation_y: self.rotation_y + child.rotation_y,
            scale: self.scale * child.scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Membership in the scene tree.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<Entity>,
    pub local: Transform,
}

/// World transform, written by the propagation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobalTransform(pub Transform);

/// Marks the root node of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomRoot(pub RoomId);

/// Mesh shape, centred on the node origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Box with full extents along local x, y, z.
    Box { size: Vec3 },
    /// Horizontal plane.
    Plane { width: f32, depth: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    Carpet,
    CeilingTile,
    Wallpaper,
    /// Translucent debug volume.
    Gizmo,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub primitive: Primitive,
    pub material: Material,
}

/// Fluorescent ceiling light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub color: Rgb,
    pub intensity: f32,
    pub range: f32,
    pub flicker: bool,
}

impl LightSource {
    pub fn fluorescent(flicker: bool) -> Self {
        Self {
            color: Rgb::new(1.0, 0.96, 0.85),
            intensity: 0.8,
            range: 12.0,
            flicker,
        }
    }
}

/// Decorative model attached to a node once its load resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    pub path: String,
    /// Bounding size once loaded.
    pub loaded_size: Option<Vec3>,
}

/// Debug visualization of a rendering zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneGizmo {
    pub zone_index: usize,
    pub size: Vec3,
    pub visible: bool,
}
