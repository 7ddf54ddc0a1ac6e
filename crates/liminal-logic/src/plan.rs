//! Resolved room geometry and layout rotation.
//!
//! [`Layout::resolve`] turns a template into a [`RoomPlan`] with every
//! wall segment concrete. [`rotate_layout`] then turns the whole plan about
//! the origin so a room can be attached to a doorway facing any way.

use crate::geometry::{Point2, QuarterTurns, Rect2};
use crate::layout::{Layout, LightFixture, ModelPlacement, WallSegment, ZoneSpec};
use crate::openings::perimeter_walls;
use serde::{Deserialize, Serialize};

/// Concrete room geometry in the layout frame (possibly rotated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPlan {
    pub layout_name: String,
    pub rotation: QuarterTurns,
    pub height: f32,
    pub footprint: Rect2,
    pub walls: Vec<WallSegment>,
    pub lights: Vec<LightFixture>,
    pub zones: Vec<ZoneSpec>,
    pub models: Vec<ModelPlacement>,
}

impl Layout {
    /// Resolve perimeter walls around doorways and gather everything else.
    pub fn resolve(&self) -> RoomPlan {
        let mut walls = perimeter_walls(self);
        walls.extend(self.walls.iter().copied());
        RoomPlan {
            layout_name: self.name.clone(),
            rotation: QuarterTurns::ZERO,
            height: self.height,
            footprint: self.footprint(),
            walls,
            lights: self.lights.clone(),
            zones: self.zones.clone(),
            models: self.models.clone(),
        }
    }
}

impl RoomPlan {
    pub fn rotated(&self, turns: QuarterTurns) -> RoomPlan {
        rotate_layout(self, turns)
    }
}

/// Rotate every wall, light, zone, model and the footprint of `plan` about
/// the Y axis through the origin. Y coordinates are untouched.
pub fn rotate_layout(plan: &RoomPlan, turns: QuarterTurns) -> RoomPlan {
    if turns == QuarterTurns::ZERO {
        return plan.clone();
    }

    let walls = plan
        .walls
        .iter()
        .map(|w| WallSegment {
            from: turns.rotate_point2(w.from),
            to: turns.rotate_point2(w.to),
            thickness: w.thickness,
        })
        .collect();

    let lights = plan
        .lights
        .iter()
        .map(|l| {
            let p = turns.rotate_point2(Point2::new(l.x, l.z));
            LightFixture {
                x: p.x,
                z: p.z,
                flicker: l.flicker,
            }
        })
        .collect();

    let zones = plan
        .zones
        .iter()
        .map(|z| ZoneSpec {
            from: turns.rotate(z.from),
            to: turns.rotate(z.to),
            direction: z.direction.rotated(turns),
            opening_center: turns.rotate(z.opening_center),
        })
        .collect();

    let models = plan
        .models
        .iter()
        .map(|m| ModelPlacement {
            path: m.path.clone(),
            position: turns.rotate(m.position),
            rotation_y: turns.rotate_yaw(m.rotation_y),
            scale: m.scale,
        })
        .collect();

    RoomPlan {
        layout_name: plan.layout_name.clone(),
        rotation: plan.rotation.then(turns),
        height: plan.height,
        footprint: plan.footprint.rotated(turns),
        walls,
        lights,
        zones,
        models,
    }
}
