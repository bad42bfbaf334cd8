// Procedural scene generators: street-grid city blocks, a segmented skinned
// rig and a heightfield terrain plane, plus an ECS scene graph to hold them.

pub mod engine;

pub use engine::city::{GeneratedTile, TileCode, TileGrid, TileGridGenerator, TileKind};
pub use engine::rig::{CylinderParams, RigSizing, SegmentedRigBuilder, SkinnedMesh};
pub use engine::scene::Scene;
pub use engine::terrain::{HeightfieldTerrain, TerrainPlane, TerrainSpec};
