// Scene graph backed by an ECS world.
//
// Nodes are entities with a local `Transform`, a `GlobalTransform` and a
// `Children` list; non-root nodes carry `ParentNode`. Generated geometry is
// spawned as node subtrees and handed over to whatever renders the world.

use bevy_ecs::prelude::*;

use super::city::GeneratedTile;
use super::components::*;
use super::rig::SkinnedMesh;
use super::systems::propagate_transforms_system;
use super::terrain::TerrainPlane;

/// Entities created for a skinned rig.
#[derive(Debug, Clone)]
pub struct RigNodes {
    pub body:  Entity,
    /// Indexed like the bone chain.
    pub bones: Vec<Entity>,
}

pub struct Scene {
    world:    World,
    schedule: Schedule,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let mut schedule = Schedule::default();
        schedule.add_systems(propagate_transforms_system);
        Self { world: World::new(), schedule }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Add a root node.
    pub fn add(&mut self, transform: Transform) -> Entity {
        self.world
            .spawn((transform, GlobalTransform::default(), Children::default()))
            .id()
    }

    /// Add a node under `parent`.
    pub fn add_child(&mut self, parent: Entity, transform: Transform) -> Entity {
        let child = self.add(transform);
        self.attach(parent, child);
        child
    }

    /// Move `child` under `parent`, detaching it from any previous parent.
    ///
    /// Refused (returns `false`) when `parent` is `child` or one of its
    /// descendants, since the graph must stay a forest.
    pub fn attach(&mut self, parent: Entity, child: Entity) -> bool {
        if self.is_ancestor_or_self(child, parent) {
            log::warn!("refusing to attach {child:?} under its own descendant {parent:?}");
            return false;
        }
        if let Some(ParentNode(old)) = self.world.get::<ParentNode>(child).copied() {
            if let Some(mut siblings) = self.world.get_mut::<Children>(old) {
                siblings.0.retain(|&e| e != child);
            }
        }
        self.world.entity_mut(child).insert(ParentNode(parent));
        if let Some(mut children) = self.world.get_mut::<Children>(parent) {
            children.0.push(child);
        }
        true
    }

    fn is_ancestor_or_self(&self, ancestor: Entity, node: Entity) -> bool {
        let mut current = Some(node);
        while let Some(entity) = current {
            if entity == ancestor {
                return true;
            }
            current = self.world.get::<ParentNode>(entity).map(|p| p.0);
        }
        false
    }

    pub fn transform_mut(&mut self, entity: Entity) -> Option<Mut<'_, Transform>> {
        self.world.get_mut::<Transform>(entity)
    }

    pub fn global_transform(&self, entity: Entity) -> Option<GlobalTransform> {
        self.world.get::<GlobalTransform>(entity).copied()
    }

    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.world.get::<Children>(entity).map(|c| c.0.as_slice()).unwrap_or(&[])
    }

    /// Recompute world transforms.
    pub fn update(&mut self) {
        self.schedule.run(&mut self.world);
    }

    pub fn mesh_part_count(&mut self) -> usize {
        self.world.query::<&MeshPart>().iter(&self.world).count()
    }

    /// One node per tile, each with a frame node and a mesh node per part.
    /// Ownership of the tiles' geometry moves into the scene.
    pub fn spawn_city(&mut self, tiles: &[GeneratedTile]) -> Entity {
        let root = self.add(Transform::IDENTITY);
        for tile in tiles {
            let tile_node = self.add_child(root, Transform::from_translation(tile.position));
            self.world.entity_mut(tile_node).insert(TileCell { col: tile.col, row: tile.row });

            for part in tile.parts() {
                let frame = self.add_child(tile_node, part.frame);
                let mesh = self.add_child(frame, part.offset);
                self.world.entity_mut(mesh).insert((
                    MeshPart { primitive: part.primitive.clone() },
                    part.color,
                ));
            }
        }
        log::debug!("spawned city with {} tiles", tiles.len());
        root
    }

    /// Body node with the bone chain beneath it: bone 0 under the body,
    /// every further bone under its parent bone.
    pub fn spawn_rig(&mut self, rig: &SkinnedMesh) -> RigNodes {
        let chain = rig.skeleton.chain();
        let body = self.add(Transform::IDENTITY);
        self.world.entity_mut(body).insert((
            SkinnedBody { vertex_count: rig.mesh.vertex_count(), bone_count: chain.len() },
            Color::BODY,
        ));

        let mut bones: Vec<Entity> = Vec::with_capacity(chain.len());
        for (index, bone) in chain.bones().iter().enumerate() {
            let parent = bone.parent().map_or(body, |p| bones[p]);
            let node = self.add_child(parent, bone.local);
            self.world.entity_mut(node).insert(BoneLink { index });
            bones.push(node);
        }
        RigNodes { body, bones }
    }

    pub fn spawn_terrain(&mut self, plane: &TerrainPlane) -> Entity {
        let node = self.add(plane.transform);
        self.world.entity_mut(node).insert(MeshPart { primitive: plane.primitive() });
        node
    }
}
