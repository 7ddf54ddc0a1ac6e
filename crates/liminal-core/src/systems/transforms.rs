//! Transform system - explicit parent/child composition over the arena

use hecs::{Entity, World};
use std::collections::HashMap;

use crate::components::{GlobalTransform, SceneNode, Transform};

/// Spawn a bare scene node.
pub fn spawn_node(
    world: &mut World,
    name: impl Into<String>,
    parent: Option<Entity>,
    local: Transform,
) -> Entity {
    world.spawn((
        SceneNode {
            name: name.into(),
            parent,
            local,
        },
        GlobalTransform(local),
    ))
}

/// Direct children of `parent`.
pub fn children_of(world: &World, parent: Entity) -> Vec<Entity> {
    world
        .query::<&SceneNode>()
        .iter()
        .filter(|(_, node)| node.parent == Some(parent))
        .map(|(e, _)| e)
        .collect()
}

/// Recompute `GlobalTransform` for every node, parents before children.
/// Nodes whose parent no longer exists are treated as roots.
pub fn propagate_transforms(world: &mut World) {
    let nodes: HashMap<Entity, (Option<Entity>, Transform)> = world
        .query::<&SceneNode>()
        .iter()
        .map(|(e, node)| (e, (node.parent, node.local)))
        .collect();

    let mut globals: HashMap<Entity, Transform> = HashMap::with_capacity(nodes.len());
    for &entity in nodes.keys() {
        resolve_global(entity, &nodes, &mut globals);
    }

    // Collect first, then write (can't mutate while querying)
    for (entity, global) in globals {
        let _ = world.insert_one(entity, GlobalTransform(global));
    }
}

fn resolve_global(
    entity: Entity,
    nodes: &HashMap<Entity, (Option<Entity>, Transform)>,
    globals: &mut HashMap<Entity, Transform>,
) -> Transform {
    if let Some(t) = globals.get(&entity) {
        return *t;
    }
    // Walk up to the nearest resolved ancestor, then compose back down.
    let mut chain = vec![entity];
    let mut base = Transform::IDENTITY;
    let mut cursor = nodes.get(&entity).and_then(|(p, _)| *p);
    while let Some(parent) = cursor {
        if let Some(t) = globals.get(&parent) {
            base = *t;
            break;
        }
        if !nodes.contains_key(&parent) || chain.contains(&parent) {
            break;
        }
        chain.push(parent);
        cursor = nodes.get(&parent).and_then(|(p, _)| *p);
    }
    for &node in chain.iter().rev() {
        let local = nodes.get(&node).map(|(_, t)| *t).unwrap_or_default();
        base = base.then(&local);
        globals.insert(node, base);
    }
    base
}

/// Despawn `root` and every descendant. Returns the number removed.
pub fn despawn_subtree(world: &mut World, root: Entity) -> usize {
    let mut children: HashMap<Entity, Vec<Entity>> = HashMap::new();
    for (e, node) in world.query::<&SceneNode>().iter() {
        if let Some(parent) = node.parent {
            children.entry(parent).or_default().push(e);
        }
    }

    let mut stack = vec![root];
    let mut removed = 0;
    while let Some(entity) = stack.pop() {
        if let Some(kids) = children.remove(&entity) {
            stack.extend(kids);
        }
        if world.despawn(entity).is_ok() {
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use liminal_logic::geometry::Vec3;

    #[test]
    fn children_follow_parents() {
        let mut world = World::new();
        let root = spawn_node(
            &mut world,
            "root",
            None,
            Transform::from_translation(Vec3::new(10.0, 0.0, 5.0)),
        );
        let child = spawn_node(
            &mut world,
            "child",
            Some(root),
            Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)),
        );
        let grandchild = spawn_node(
            &mut world,
            "grandchild",
            Some(child),
            Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)),
        );
        propagate_transforms(&mut world);

        let g = world.get::<&GlobalTransform>(grandchild).unwrap().0;
        assert_eq!(g.translation, Vec3::new(11.0, 3.0, 8.0));

        // moving the root only takes effect on the next pass
        world.get::<&mut SceneNode>(root).unwrap().local.translation = Vec3::ZERO;
        assert_eq!(
            world.get::<&GlobalTransform>(grandchild).unwrap().0.translation,
            Vec3::new(11.0, 3.0, 8.0)
        );
        propagate_transforms(&mut world);
        assert_eq!(
            world.get::<&GlobalTransform>(grandchild).unwrap().0.translation,
            Vec3::new(1.0, 3.0, 3.0)
        );
    }

    #[test]
    fn despawn_takes_whole_subtree_only() {
        let mut world = World::new();
        let a = spawn_node(&mut world, "a", None, Transform::IDENTITY);
        let b = spawn_node(&mut world, "b", Some(a), Transform::IDENTITY);
        let _c = spawn_node(&mut world, "c", Some(b), Transform::IDENTITY);
        let other = spawn_node(&mut world, "other", None, Transform::IDENTITY);

        assert_eq!(children_of(&world, a), vec![b]);
        assert_eq!(despawn_subtree(&mut world, a), 3);
        assert!(world.contains(other));
        assert_eq!(world.len(), 1);
        assert_eq!(despawn_subtree(&mut world, a), 0);
    }
}
