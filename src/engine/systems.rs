// ECS systems for the scene graph
// Systems operate on entities with specific component combinations

use bevy_ecs::prelude::*;
use glam::Mat4;
use super::components::*;

/// Compose local transforms down every parent chain into `GlobalTransform`.
/// Runs after any node was added, re-parented or moved.
pub fn propagate_transforms_system(
    roots: Query<Entity, Without<ParentNode>>,
    nodes: Query<(&Transform, Option<&Children>)>,
    mut globals: Query<&mut GlobalTransform>,
) {
    let mut stack: Vec<(Entity, Mat4)> = roots.iter().map(|e| (e, Mat4::IDENTITY)).collect();

    while let Some((entity, parent_matrix)) = stack.pop() {
        let Ok((transform, children)) = nodes.get(entity) else {
            continue;
        };
        let world = parent_matrix * transform.to_matrix();
        if let Ok(mut global) = globals.get_mut(entity) {
            global.0 = world;
        }
        if let Some(children) = children {
            stack.extend(children.0.iter().map(|&child| (child, world)));
        }
    }
}
