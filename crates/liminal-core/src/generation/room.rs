//! Room construction - turns a placed plan into scene nodes and colliders

use hecs::World;
use liminal_logic::config::FloorTuning;
use liminal_logic::geometry::Vec3;
use liminal_logic::plan::RoomPlan;
use liminal_logic::zone::{RenderingZone, RoomId};

use crate::assets::{ModelLoader, ModelRequest, ModelTicket};
use crate::components::*;
use crate::physics::{PhysicsWorld, StaticBox};
use crate::systems::spawn_node;

/// Build a room from an already rotated plan whose origin sits at
/// `position`. Walls, slabs and zones are complete on return; models are
/// requested and arrive later.
pub fn build_room<P: PhysicsWorld, L: ModelLoader>(
    scene: &mut World,
    physics: &mut P,
    loader: &mut L,
    id: RoomId,
    plan: &RoomPlan,
    position: Vec3,
    tuning: &FloorTuning,
) -> RoomInstance {
    let position = position.with_y(0.0);
    let height = plan.height;
    let root = spawn_node(
        scene,
        format!("{} ({})", id, plan.layout_name),
        None,
        Transform::from_translation(position),
    );
    let _ = scene.insert_one(root, RoomRoot(id));

    let mut room = RoomInstance::new(
        id,
        plan.layout_name.clone(),
        position,
        plan.rotation,
        height,
        plan.footprint.translated(position),
        root,
    );

    // Floor and ceiling slabs
    let center = plan.footprint.center();
    let (width, depth) = (plan.footprint.width(), plan.footprint.depth());
    let half_slab = tuning.slab_thickness / 2.0;
    for (name, y, material, collider_y) in [
        ("floor", 0.0, Material::Carpet, -half_slab),
        ("ceiling", height, Material::CeilingTile, height + half_slab),
    ] {
        let node = spawn_node(
            scene,
            name,
            Some(root),
            Transform::from_translation(center.at_height(y)),
        );
        let _ = scene.insert_one(
            node,
            Mesh {
                primitive: Primitive::Plane { width, depth },
                material,
            },
        );
        room.colliders.push(physics.add_static_box(StaticBox::axis_aligned(
            center.at_height(collider_y) + position,
            Vec3::new(width / 2.0, half_slab, depth / 2.0),
        )));
    }

    // Walls: one panel and one box per segment
    for (i, wall) in plan.walls.iter().enumerate() {
        let mid = wall.midpoint().at_height(height / 2.0);
        let length = wall.length();
        let yaw = wall.yaw();
        let node = spawn_node(
            scene,
            format!("wall {i}"),
            Some(root),
            Transform::from_translation(mid).with_rotation_y(yaw),
        );
        let _ = scene.insert_one(
            node,
            Mesh {
                primitive: Primitive::Box {
                    size: Vec3::new(length, height, wall.thickness),
                },
                material: Material::Wallpaper,
            },
        );
        room.colliders.push(physics.add_static_box(StaticBox {
            center: mid + position,
            half_extents: Vec3::new(length / 2.0, height / 2.0, wall.thickness / 2.0),
            rotation_y: yaw,
        }));
    }

    // Ceiling lights
    for (i, light) in plan.lights.iter().enumerate() {
        let node = spawn_node(
            scene,
            format!("light {i}"),
            Some(root),
            Transform::from_translation(Vec3::new(
                light.x,
                height - tuning.light_ceiling_offset,
                light.z,
            )),
        );
        let _ = scene.insert_one(node, LightSource::fluorescent(light.flicker));
    }

    // Model slots, loaded asynchronously
    for (slot, model) in plan.models.iter().enumerate() {
        let node = spawn_node(
            scene,
            model.path.clone(),
            Some(root),
            Transform::from_translation(model.position)
                .with_rotation_y(model.rotation_y)
                .with_scale(model.scale),
        );
        let _ = scene.insert_one(
            node,
            ModelInstance {
                path: model.path.clone(),
                loaded_size: None,
            },
        );
        room.models.push(ModelSlot {
            path: model.path.clone(),
            node,
            state: ModelSlotState::Pending,
        });
        loader.request(ModelRequest {
            ticket: ModelTicket { room: id, slot },
            path: model.path.clone(),
        });
    }

    // World-space zones plus hidden gizmos
    for (i, spec) in plan.zones.iter().enumerate() {
        let zone = RenderingZone::from_spec(spec, position, id);
        let node = spawn_node(
            scene,
            format!("zone {i} ({})", zone.direction),
            Some(root),
            Transform::from_translation(zone.center() - position),
        );
        let _ = scene.insert_one(
            node,
            ZoneGizmo {
                zone_index: i,
                size: zone.size(),
                visible: false,
            },
        );
        room.zone_gizmos.push(node);
        room.zones.push(zone);
    }

    log::debug!(
        "built {} ({}) at ({:.2}, {:.2}) turned {}°: {} walls, {} colliders, {} zones",
        id,
        plan.layout_name,
        position.x,
        position.z,
        plan.rotation.count() * 90,
        plan.walls.len(),
        room.colliders.len(),
        room.zones.len()
    );
    room
}
